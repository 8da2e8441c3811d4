#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Regex(#[from] fancy_regex::Error),
    #[error(transparent)]
    AhoCorasick(#[from] aho_corasick::BuildError),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("history store unavailable: {0}")]
    Store(String),
    #[error("renderer failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;
