//! Error type shared by every node and engine operation.

use std::io;

/// Errors surfaced by node operations and terminal I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The node was removed; every further operation on it fails.
    #[error("operating on a node that has been unmounted")]
    Unmounted,

    /// The root node lives as long as the engine.
    #[error("the root node cannot be removed")]
    RemoveRoot,

    /// The root node never gets a parent.
    #[error("the root node cannot be inserted under another node")]
    InsertRoot,

    /// Inserting a node under itself or one of its descendants.
    #[error("a node cannot be inserted into itself or one of its descendants")]
    InsertCycle,

    /// Reading the terminal size, the keystroke source, or writing a frame failed.
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            Error::Unmounted.to_string(),
            "operating on a node that has been unmounted"
        );
        assert_eq!(Error::RemoveRoot.to_string(), "the root node cannot be removed");
    }

    #[test]
    fn test_io_conversion() {
        let err: Error = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert!(matches!(err, Error::Terminal(_)));
        assert!(err.to_string().contains("gone"));
    }
}
