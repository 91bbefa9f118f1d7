use thiserror::Error;

/// Classifies an outbound vendor call failure so handlers can map it onto
/// 500 (vendor rejected), 502 (unreachable / malformed response) or 504
/// (timed out).
#[derive(Debug, Error)]
pub enum VendorCallError {
    #[error("vendor request timed out")]
    Timeout,

    #[error("vendor unreachable: {0}")]
    Unreachable(String),

    #[error("vendor responded with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed vendor response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VendorCallError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            VendorCallError::Timeout
        } else if err.is_connect() {
            VendorCallError::Unreachable(err.to_string())
        } else {
            VendorCallError::Other(err.into())
        }
    }
}
