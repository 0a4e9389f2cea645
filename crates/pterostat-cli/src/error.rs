/// Fatal failures talking to the panel API. Any of these aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection, TLS or body-read failure.
    #[error("transport error")]
    Transport(#[from] reqwest::Error),

    /// Body is not JSON, is JSON `null`, or is not a list envelope.
    #[error("error decoding JSON response")]
    Decode(#[from] serde_json::Error),

    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl ApiError {
    pub fn null_body() -> Self {
        ApiError::Decode(serde::de::Error::custom("response body is null"))
    }
}
