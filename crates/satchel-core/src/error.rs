use thiserror::Error;

#[derive(Debug, Error)]
pub enum SatchelError {
    // IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Config
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file not found at {0}, run `satchel init` first")]
    ConfigNotFound(String),

    #[error("TOML deserialization error: {0}")]
    TomlDe(String),

    #[error("TOML serialization error: {0}")]
    TomlSer(String),

    // Naming
    #[error("Invalid recipient id: {0}")]
    InvalidRecipientId(String),
}

pub type Result<T> = std::result::Result<T, SatchelError>;
