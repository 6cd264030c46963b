use thiserror::Error;

/// Everything that can abort the catalog workflow.
///
/// Driver and BSON failures pass through untouched; only configuration
/// problems are raised by this crate itself.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    #[error(transparent)]
    Decode(#[from] mongodb::bson::de::Error),

    #[error(transparent)]
    Encode(#[from] mongodb::bson::ser::Error),

    #[error("invalid value for {key}: {value:?}")]
    Config { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
