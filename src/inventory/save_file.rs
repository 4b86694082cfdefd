//! JSON schema of the inventory save file

use serde::{Deserialize, Deserializer, Serialize};

use crate::blueprints::ShapeBlueprint;
use crate::core::error::Result;

/// Root structure of the save file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    /// Claimed items
    #[serde(default, deserialize_with = "null_as_empty")]
    pub inventory: Vec<ShapeBlueprint>,
    /// Freshly welded items not yet claimed
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pile: Vec<ShapeBlueprint>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<ShapeBlueprint>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ShapeBlueprint>>::deserialize(deserializer)?.unwrap_or_default())
}

impl SaveFile {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
