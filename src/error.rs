pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid token pattern: {0}")]
    Tokenizer(#[from] regex::Error),
}
