//! JSON-deserializable schema description.
//!
//! A field map is a list so that declaration order survives any JSON tooling:
//!
//! ```json
//! { "fields": [ { "name": "sig", "type": "str[4]" }, { "name": "ver", "type": "-uint16" } ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::{errors::CodecError, schema::Schema};

/// Top-level schema definition: the ordered field map.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SchemaDef {
    pub fields: Vec<FieldDef>,
}

/// One `(name, descriptor)` entry of a field map.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Key in the decoded record. Any string, including numeric-looking ones.
    pub name: String,
    /// Type descriptor, e.g. `"+uint32"`, `"str[len]"` or `"@+4"`.
    #[serde(rename = "type")]
    pub spec: String,
}

impl TryFrom<SchemaDef> for Schema {
    type Error = CodecError;

    fn try_from(value: SchemaDef) -> Result<Self, Self::Error> {
        Schema::compile(value.fields.into_iter().map(|field| (field.name, field.spec)))
    }
}

impl TryFrom<&SchemaDef> for Schema {
    type Error = CodecError;

    fn try_from(value: &SchemaDef) -> Result<Self, Self::Error> {
        Schema::compile(value.fields.iter().map(|field| (&field.name, &field.spec)))
    }
}
