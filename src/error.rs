use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("request failed: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("{url} returned HTTP {code}")]
    Status { code: u16, url: String },

    #[error("unexpected response from {url}: {message}")]
    Malformed { url: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("map access token missing from {url}")]
    MissingToken { url: String },
}

impl FlowError {
    /// Split a ureq error into a status failure or a transport failure
    pub fn from_ureq(url: &str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => FlowError::Status {
                code,
                url: url.to_string(),
            },
            other => FlowError::Http(Box::new(other)),
        }
    }

    pub fn malformed(url: &str, message: impl Into<String>) -> Self {
        FlowError::Malformed {
            url: url.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FlowError>;
