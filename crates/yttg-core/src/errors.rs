/// Core error type.
///
/// Adapter crates map their transport errors into the `Gateway` / `Channel`
/// variants so the sync engine and command handlers can recover uniformly at
/// the boundary of the operation that failed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// Video platform query failed (network, auth, quota, bad payload).
    #[error("gateway error: {0}")]
    Gateway(String),

    /// Chat message delivery failed.
    #[error("channel error: {0}")]
    Channel(String),

    /// Seen-set persistence failed.
    #[error("storage error: {0}")]
    Storage(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
