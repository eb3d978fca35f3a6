//! Error type for file, text and parallel operations

use hopblocks_core::HoppingError;

/// Errors raised by the `hopblocks` crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Error from the core store or format checks
    Hopping(HoppingError),
    /// Operating system I/O failure
    IoError(&'static str),
    /// File content does not match what the reader expects
    InvalidState(&'static str),
    /// Line that could not be read, e.g. invalid UTF-8
    Read { line: usize },
    /// Malformed or rejected triplet on a 1-based line
    Parse { line: usize, source: HoppingError },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Hopping(err) => write!(f, "{err}"),
            Error::IoError(msg) => write!(f, "I/O error: {msg}"),
            Error::InvalidState(msg) => write!(f, "Invalid state: {msg}"),
            Error::Read { line } => write!(f, "Line {line}: failed to read"),
            Error::Parse { line, source } => write!(f, "Line {line}: {source}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<HoppingError> for Error {
    fn from(err: HoppingError) -> Self {
        Error::Hopping(err)
    }
}

/// Result type for `hopblocks` operations
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::Parse {
            line: 3,
            source: HoppingError::SiteOutOfRange,
        };
        assert_eq!(err.to_string(), "Line 3: Site index out of range");
        assert_eq!(
            Error::from(HoppingError::LengthMismatch).to_string(),
            "Sequence length mismatch"
        );
        assert_eq!(Error::Read { line: 2 }.to_string(), "Line 2: failed to read");
    }
}
