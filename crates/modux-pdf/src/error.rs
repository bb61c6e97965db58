use thiserror::Error;

use crate::filters::FilterError;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("Encrypted PDFs are not supported")]
    Encrypted,

    #[error("PDF has no pages")]
    NoPages,

    #[error("Failed to decode stream {object}: {source}")]
    Decode {
        object: String,
        #[source]
        source: FilterError,
    },

    #[error("Resource limit exceeded: {0}")]
    LimitExceeded(String),
}
