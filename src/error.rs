use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
    #[error("config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
