//! Utility module with colormatch's errors.

#[cfg(feature = "pyffi")]
use pyo3::exceptions::{PyIOError, PyIndexError, PyValueError};
#[cfg(feature = "pyffi")]
use pyo3::prelude::*;

/// An out-of-bounds error.
///
/// This error indicates a value that is out of bounds for some range. Notably,
/// RGB values must fit into 24 bits, i.e., `0..=0xffffff`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutOfBoundsError {
    pub value: u32,
    pub expected: std::ops::RangeInclusive<u32>,
}

impl OutOfBoundsError {
    /// Create a new out-of-bounds error.
    pub fn new(value: u32, expected: std::ops::RangeInclusive<u32>) -> Self {
        Self { value, expected }
    }
}

impl std::fmt::Display for OutOfBoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "{:#x} does not fit into range {:#x}..={:#x}",
            self.value,
            self.expected.start(),
            self.expected.end()
        ))
    }
}

impl std::error::Error for OutOfBoundsError {}

#[cfg(feature = "pyffi")]
impl From<OutOfBoundsError> for PyErr {
    fn from(value: OutOfBoundsError) -> Self {
        PyIndexError::new_err(value.to_string())
    }
}

// ====================================================================================================================

/// An erroneous color record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordError {
    /// A color record without name.
    EmptyName,
    /// A color record with an RGB value that does not fit into 24 bits.
    OutOfBounds(OutOfBoundsError),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => f.write_str("color record should have a name but has none"),
            Self::OutOfBounds(error) => write!(f, "color record has invalid RGB value: {}", error),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EmptyName => None,
            Self::OutOfBounds(error) => Some(error),
        }
    }
}

impl From<OutOfBoundsError> for RecordError {
    fn from(value: OutOfBoundsError) -> Self {
        Self::OutOfBounds(value)
    }
}

#[cfg(feature = "pyffi")]
impl From<RecordError> for PyErr {
    fn from(value: RecordError) -> Self {
        PyValueError::new_err(value.to_string())
    }
}

// ====================================================================================================================

/// An unknown distance metric name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownMetricError {
    name: String,
}

impl UnknownMetricError {
    /// Create a new unknown metric error.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Get the unknown name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for UnknownMetricError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "distance metric should be `cie94` or `ciede2000` but is `{}`",
            self.name
        )
    }
}

impl std::error::Error for UnknownMetricError {}

// ====================================================================================================================

/// A violated precondition for matching colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchError {
    /// There are no original colors to match.
    NoOriginals,
    /// There are no specification colors to match against.
    NoSpecifications,
}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoOriginals => f.write_str("original colors should not be empty"),
            Self::NoSpecifications => f.write_str("specification colors should not be empty"),
        }
    }
}

impl std::error::Error for MatchError {}

#[cfg(feature = "pyffi")]
impl From<MatchError> for PyErr {
    fn from(value: MatchError) -> Self {
        PyValueError::new_err(value.to_string())
    }
}

// ====================================================================================================================

/// The kinds of errors while rewriting a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewriteErrorKind {
    /// The document has more color definitions than there are matches. The
    /// position is the zero-based index of the first color definition without
    /// a match.
    InsufficientMatches { position: usize, available: usize },
    /// The document has fewer color definitions than there are matches.
    InsufficientColorNodes { consumed: usize, available: usize },
    /// The rewritten document could not be stored.
    Serialize,
    /// The rewriter has already been used for a document.
    AlreadyStarted,
}

/// An error while rewriting a document.
///
/// After a rewrite fails, the document may be partially rewritten and should
/// not be used any further.
#[derive(Debug)]
pub struct RewriteError {
    kind: RewriteErrorKind,
    source: Option<std::io::Error>,
}

impl RewriteError {
    /// Create a new serialization error.
    pub fn serialize(source: std::io::Error) -> Self {
        Self {
            kind: RewriteErrorKind::Serialize,
            source: Some(source),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> RewriteErrorKind {
        self.kind
    }

    /// Determine whether the document's color definitions and the matches do
    /// not line up.
    pub fn is_structural_mismatch(&self) -> bool {
        matches!(
            self.kind,
            RewriteErrorKind::InsufficientMatches { .. }
                | RewriteErrorKind::InsufficientColorNodes { .. }
        )
    }
}

impl From<RewriteErrorKind> for RewriteError {
    fn from(kind: RewriteErrorKind) -> Self {
        Self { kind, source: None }
    }
}

impl std::fmt::Display for RewriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            RewriteErrorKind::InsufficientMatches {
                position,
                available,
            } => write!(
                f,
                "color definition #{} has no match; only {} matches are available",
                position + 1,
                available
            ),
            RewriteErrorKind::InsufficientColorNodes {
                consumed,
                available,
            } => write!(
                f,
                "insufficient color nodes: document has {} color definitions for {} matches",
                consumed, available
            ),
            RewriteErrorKind::Serialize => f.write_str("could not store rewritten document"),
            RewriteErrorKind::AlreadyStarted => f.write_str("rewriter has already been used"),
        }
    }
}

impl std::error::Error for RewriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|error| error as &(dyn std::error::Error + 'static))
    }
}

impl From<RewriteError> for std::io::Error {
    fn from(value: RewriteError) -> Self {
        match value.kind {
            RewriteErrorKind::InsufficientMatches { .. }
            | RewriteErrorKind::InsufficientColorNodes { .. } => {
                Self::new(std::io::ErrorKind::InvalidData, value)
            }
            RewriteErrorKind::Serialize => match value.source {
                Some(error) => error,
                None => Self::other(value),
            },
            RewriteErrorKind::AlreadyStarted => Self::other(value),
        }
    }
}

#[cfg(feature = "pyffi")]
impl From<RewriteError> for PyErr {
    fn from(value: RewriteError) -> Self {
        if value.is_structural_mismatch() {
            PyValueError::new_err(value.to_string())
        } else {
            PyIOError::new_err(value.to_string())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rewrite_error() {
        let error = RewriteError::from(RewriteErrorKind::InsufficientColorNodes {
            consumed: 2,
            available: 3,
        });
        assert!(error.is_structural_mismatch(), "too many matches is structural");
        assert_eq!(
            error.to_string(),
            "insufficient color nodes: document has 2 color definitions for 3 matches",
            "message for unused matches"
        );

        let io_error: std::io::Error = error.into();
        assert_eq!(
            io_error.kind(),
            std::io::ErrorKind::InvalidData,
            "structural mismatch is invalid data"
        );

        let error = RewriteError::serialize(std::io::ErrorKind::PermissionDenied.into());
        assert!(!error.is_structural_mismatch(), "storage failure is not structural");
        assert!(
            std::error::Error::source(&error).is_some(),
            "storage failure has a source"
        );
        let io_error: std::io::Error = error.into();
        assert_eq!(
            io_error.kind(),
            std::io::ErrorKind::PermissionDenied,
            "storage failure converts back to its source"
        );
    }

    #[test]
    fn test_record_error() {
        let error = RecordError::from(OutOfBoundsError::new(0x1000000, 0..=0xffffff));
        assert_eq!(
            error.to_string(),
            "color record has invalid RGB value: 0x1000000 does not fit into range 0x0..=0xffffff",
            "message for out-of-bounds RGB value"
        );
    }
}
