use thiserror::Error;

/// Failures of a single request to the validation backend.
///
/// A well-formed response with `isValid = false` is not an error; it is returned to the
/// caller as a normal result.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}
