/// Errors that can occur when opening a display session.
///
/// Everything after a successful open degrades to "retry later" inside
/// the supervisor and is never surfaced synchronously.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The display target string could not be parsed.
    #[error("invalid display target: {0}")]
    Config(#[from] lcdlink_transport::TargetError),

    /// The connection supervisor thread could not be spawned.
    #[error("failed to start connection supervisor: {0}")]
    Spawn(std::io::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
