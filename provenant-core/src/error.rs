use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvenantError {
    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Signing gate error: {0}")]
    SigningGate(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[cfg(feature = "network")]
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ProvenantError>;
