//! # bytecraft
//!
//! Bytes to structured and encoded values: a bit cursor, a declarative struct
//! decoder and a truncated-binary base-N codec.
//!
//! - [`bit_reader::BitCursor`] reads runs of up to 64 bits with a selectable
//!   [`bits::BitOrder`]; [`bit_writer::BitWriter`] is its inverse.
//! - [`schema::Schema`] compiles an ordered field map of type descriptors
//!   (`"uint16"`, `"str[12]"`, `"str[count]"`, `"@-4"`, ...) and unpacks byte
//!   buffers into ordered [`assembly::Record`]s.
//! - [`base_n`] turns bytes into text over any alphabet of 2 to 256 symbols and back.
//!
//! ## Example
//!
//! ```
//! use bytecraft::assembly::Value;
//! use bytecraft::schema::unpack;
//!
//! let data = [0x50, 0x4B, 0x03, 0x04, 0x0A, 0x00];
//! let (record, end) = unpack([("sig", "str[4]"), ("ver", "-uint16")], &data, 0).unwrap();
//!
//! assert_eq!(record.get("sig"), Some(&Value::Bytes(b"PK\x03\x04".to_vec())));
//! assert_eq!(record.get("ver"), Some(&Value::U64(10)));
//! assert_eq!(end, 6);
//! ```

pub mod alphabet;
pub mod assembly;
pub mod base_n;
pub mod bit_reader;
pub mod bit_writer;
pub mod bits;
pub mod errors;
pub mod field;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;

pub use alphabet::Alphabet;
pub use assembly::{Record, Value};
pub use base_n::{decode, encode};
pub use bit_reader::BitCursor;
pub use bit_writer::BitWriter;
pub use bits::{BitOrder, Whence};
pub use errors::CodecError;
pub use schema::{Schema, unpack};
