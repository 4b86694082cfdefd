use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeldError {
    #[error("Item ID not found in catalog: {0}")]
    LookupMiss(String),

    #[error("Simple blueprint references unknown catalog item: {item_id}")]
    LeafNotInCatalog { item_id: String },

    #[error("Validation errors: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Missing prerequisite: {0}")]
    MissingPrerequisite(String),

    #[error("Invalid state: expected {expected}, was {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, WeldError>;
