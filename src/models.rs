use serde::{Deserialize, Serialize};

/// A single constructor (team) entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorRecord {
    #[serde(rename = "constructorId")]
    pub constructor_id: String,
    pub url: String,
    pub name: String,
    pub nationality: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorTableRecord {
    pub season: String,
    #[serde(rename = "Constructors")]
    pub constructors: Vec<ConstructorRecord>,
}

/// Paging metadata plus the constructor table.
///
/// Paging values stay strings because that is how the wire document
/// carries them ("30", not 30).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub xmlns: String,
    pub series: String,
    pub url: String,
    pub limit: String,
    pub offset: String,
    pub total: String,
    #[serde(rename = "ConstructorTable")]
    pub table: ConstructorTableRecord,
}

// Outer wrapper of the wire document: {"MRData": {...}}
#[derive(Debug, Deserialize)]
pub(crate) struct WireDocument {
    #[serde(rename = "MRData")]
    pub mr_data: ResponseEnvelope,
}

impl ResponseEnvelope {
    /// Serialize back into the wire shape, `MRData` wrapper included.
    pub fn to_wire_json(&self) -> Result<String, serde_json::Error> {
        #[derive(Serialize)]
        struct WireRef<'a> {
            #[serde(rename = "MRData")]
            mr_data: &'a ResponseEnvelope,
        }
        serde_json::to_string_pretty(&WireRef { mr_data: self })
    }
}
