use thiserror::Error;

#[derive(Error, Debug)]
pub enum TypesError {
    #[error("Malformed proof document: {0}")]
    MalformedProof(#[from] serde_json::Error),
}
