use snafu::Snafu;

use crate::filesystem::NormalizedPath;
use crate::storage::StorageError;

/// Error raised by every filesystem operation.
///
/// Messages always name the failing operation and, where one exists, the
/// fully resolved path it was applied to.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FilesystemError {
    #[snafu(display("Cannot {operation}: {reason}"))]
    InvalidArgument {
        operation: &'static str,
        reason: String,
    },
    #[snafu(display("Cannot {operation} because no node exists at '{path}'"))]
    NotFound {
        operation: &'static str,
        path: NormalizedPath,
    },
    #[snafu(display("Cannot {operation} because a node already exists at '{path}'"))]
    AlreadyExists {
        operation: &'static str,
        path: NormalizedPath,
    },
    #[snafu(display("Cannot {operation} because the node is a directory at '{path}'"))]
    IsADirectory {
        operation: &'static str,
        path: NormalizedPath,
    },
    #[snafu(display("Cannot {operation} because the node is a file at '{path}'"))]
    NotADirectory {
        operation: &'static str,
        path: NormalizedPath,
    },
    #[snafu(display("Cannot {operation} because the backing store failed"))]
    Storage {
        operation: &'static str,
        source: StorageError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    IsADirectory,
    NotADirectory,
    Storage,
}

impl FilesystemError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FilesystemError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            FilesystemError::NotFound { .. } => ErrorKind::NotFound,
            FilesystemError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            FilesystemError::IsADirectory { .. } => ErrorKind::IsADirectory,
            FilesystemError::NotADirectory { .. } => ErrorKind::NotADirectory,
            FilesystemError::Storage { .. } => ErrorKind::Storage,
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            FilesystemError::InvalidArgument { operation, .. }
            | FilesystemError::NotFound { operation, .. }
            | FilesystemError::AlreadyExists { operation, .. }
            | FilesystemError::IsADirectory { operation, .. }
            | FilesystemError::NotADirectory { operation, .. }
            | FilesystemError::Storage { operation, .. } => operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::path::resolve;

    #[test]
    fn messages_include_operation_and_path() {
        let path = resolve(&NormalizedPath::root(), &["/a/b.txt"]).unwrap();
        let error = FilesystemError::NotFound {
            operation: "read_file",
            path,
        };

        let message = error.to_string();
        assert!(message.contains("read_file"));
        assert!(message.contains("/a/b.txt"));
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.operation(), "read_file");
    }
}
