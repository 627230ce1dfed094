use std::path::PathBuf;
use thiserror::Error;

/// Exit codes following Unix conventions.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_INTERRUPTED: i32 = 130; // 128 + SIGINT(2)

#[derive(Debug, Error)]
pub enum Error {
    /// Contradictory flags, missing rule source, invalid suffix, and similar.
    #[error("{0}")]
    Usage(String),

    /// Malformed rule line or a regex that does not compile.
    #[error("error parsing pattern: {0}")]
    PatternParse(String),

    /// Filesystem failure while reading, writing, or moving a file.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A replaced path is no longer valid UTF-8 and cannot be used as a filename.
    #[error("replaced path is not valid UTF-8 (from '{0}')")]
    InvalidPath(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The process exit code this error maps to.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => EXIT_USAGE,
            _ => EXIT_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_map_to_exit_2() {
        let err = Error::Usage("cannot use --insensitive and --preserve-case at once".to_string());
        assert_eq!(err.exit_code(), EXIT_USAGE);
    }

    #[test]
    fn runtime_errors_map_to_exit_1() {
        let err = Error::PatternParse("bad line".to_string());
        assert_eq!(err.exit_code(), EXIT_ERROR);

        let err = Error::io(
            "some/file",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.exit_code(), EXIT_ERROR);
    }

    #[test]
    fn io_error_message_includes_path() {
        let err = Error::io(
            "tree/a.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("tree/a.txt"));
    }
}
