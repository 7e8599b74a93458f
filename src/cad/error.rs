//! Error types for CAD automation calls.

use std::path::PathBuf;
use thiserror::Error;

use super::model::DocumentKind;

/// Result type for CAD automation calls.
pub type CadResult<T> = Result<T, CadError>;

/// Errors reported by a [`super::CadEngine`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CadError {
    /// No document is active.
    #[error("No active document")]
    NoActiveDocument,

    /// No documents are open at all.
    #[error("No documents are open")]
    NoOpenDocuments,

    /// Document lookup by name failed.
    #[error("Document '{name}' not found")]
    DocumentNotFound {
        /// Requested name.
        name: String,
    },

    /// Document lookup by index failed.
    #[error("Invalid index: {index}. {count} documents open.")]
    DocumentIndexOutOfRange {
        /// Requested 0-based index.
        index: usize,
        /// Number of open documents.
        count: usize,
    },

    /// File does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// File extension does not map to a document type.
    #[error("Unsupported file type: {path}")]
    UnsupportedFileType {
        /// Requested path.
        path: PathBuf,
    },

    /// Operation needs a different kind of document.
    #[error("{operation} is not available in a {actual} document (requires {expected})")]
    WrongDocumentType {
        /// Operation being attempted.
        operation: &'static str,
        /// Required kind(s), human readable.
        expected: &'static str,
        /// Kind of the active document.
        actual: DocumentKind,
    },

    /// A sketch element or axis was added with no sketch open.
    #[error("No active sketch. Call create_sketch() first")]
    NoOpenSketch,

    /// A sketch was started while another is still open.
    #[error("A sketch is already open. Call close_sketch() first")]
    SketchAlreadyOpen,

    /// Reference plane index out of range.
    #[error("Invalid reference plane index: {index}. Document has {count} planes.")]
    InvalidRefPlane {
        /// Requested 1-based index.
        index: usize,
        /// Number of reference planes.
        count: usize,
    },

    /// A feature request references a profile or axis that the active
    /// document did not issue.
    #[error("{what} {id} does not belong to the active document")]
    StaleReference {
        /// "Profile" or "Axis".
        what: &'static str,
        /// Raw handle id.
        id: u64,
    },

    /// A cut or pattern was requested before any solid exists.
    #[error("No base feature exists. Create a base feature first.")]
    NoBaseFeature,

    /// Named feature does not exist.
    #[error("Feature '{name}' not found")]
    FeatureNotFound {
        /// Requested name.
        name: String,
    },

    /// Assembly occurrence index out of range.
    #[error("Invalid occurrence index: {index}. Assembly has {count} occurrences.")]
    InvalidOccurrence {
        /// Requested 0-based index.
        index: usize,
        /// Number of occurrences.
        count: usize,
    },

    /// The automation call itself failed.
    #[error("Automation call {method} failed: {message}")]
    CallFailed {
        /// Automation method name.
        method: String,
        /// Failure description.
        message: String,
    },
}

impl CadError {
    /// Creates a stale reference error for a profile.
    #[must_use]
    pub const fn stale_profile(id: u64) -> Self {
        Self::StaleReference {
            what: "Profile",
            id,
        }
    }

    /// Creates a stale reference error for an axis.
    #[must_use]
    pub const fn stale_axis(id: u64) -> Self {
        Self::StaleReference { what: "Axis", id }
    }

    /// Creates a failed automation call error.
    pub fn call_failed(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CallFailed {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoActiveDocument => "NO_ACTIVE_DOCUMENT",
            Self::NoOpenDocuments => "NO_OPEN_DOCUMENTS",
            Self::DocumentNotFound { .. } => "DOCUMENT_NOT_FOUND",
            Self::DocumentIndexOutOfRange { .. } => "DOCUMENT_INDEX_OUT_OF_RANGE",
            Self::FileNotFound { .. } => "FILE_NOT_FOUND",
            Self::UnsupportedFileType { .. } => "UNSUPPORTED_FILE_TYPE",
            Self::WrongDocumentType { .. } => "WRONG_DOCUMENT_TYPE",
            Self::NoOpenSketch => "NO_OPEN_SKETCH",
            Self::SketchAlreadyOpen => "SKETCH_ALREADY_OPEN",
            Self::InvalidRefPlane { .. } => "INVALID_REF_PLANE",
            Self::StaleReference { .. } => "STALE_REFERENCE",
            Self::NoBaseFeature => "NO_BASE_FEATURE",
            Self::FeatureNotFound { .. } => "FEATURE_NOT_FOUND",
            Self::InvalidOccurrence { .. } => "INVALID_OCCURRENCE",
            Self::CallFailed { .. } => "CALL_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CadError::stale_profile(7);
        assert_eq!(
            err.to_string(),
            "Profile 7 does not belong to the active document"
        );
    }

    #[test]
    fn wrong_document_type_display() {
        let err = CadError::WrongDocumentType {
            operation: "Assembly cutout",
            expected: "Assembly",
            actual: DocumentKind::Part,
        };
        assert_eq!(
            err.to_string(),
            "Assembly cutout is not available in a Part document (requires Assembly)"
        );
    }

    #[test]
    fn call_failed_code() {
        let err = CadError::call_failed("Models.AddFiniteExtrudedProtrusion", "E_FAIL");
        assert_eq!(err.code(), "CALL_FAILED");
        assert!(err.to_string().contains("E_FAIL"));
    }
}
