use std::fmt;

/// Unified error type for work buffer operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Index or count outside the buffer's logical range
    OutOfRange { index: usize, len: usize },

    /// Pooled append hit a never-used slot with no factory configured
    MissingFactory,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRange { index, len } => {
                write!(f, "index {} out of range for length {}", index, len)
            }
            Error::MissingFactory => {
                write!(f, "no element factory configured for pooled append")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result type alias for work buffer operations
pub type Result<T> = std::result::Result<T, Error>;
