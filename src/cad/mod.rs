//! CAD automation seam.
//!
//! Everything that touches documents or geometry goes through the
//! [`CadEngine`] trait. The rest of the crate only ever holds opaque
//! [`Profile`] and [`RefAxis`] handles returned by the engine.
//!
//! # Engines
//!
//! - [`memory::MemoryEngine`]: in-process document model. Tracks which
//!   document issued every handle and rejects feature requests that
//!   reference another document's geometry.

pub mod error;
pub mod memory;
pub mod model;

pub use error::{CadError, CadResult};
pub use memory::MemoryEngine;
pub use model::{
    ClosedSketch, DocumentInfo, DocumentKind, DocumentSelector, FeatureInfo, FeatureOperation,
    FeatureRequest, OccurrenceInfo, SketchElement, SketchInfo,
};

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Opaque handle to a finished 2D profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Profile(u64);

impl Profile {
    /// Wraps a raw engine id.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw engine id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "profile#{}", self.0)
    }
}

/// Opaque handle to a reference axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RefAxis(u64);

impl RefAxis {
    /// Wraps a raw engine id.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw engine id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RefAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "axis#{}", self.0)
    }
}

/// Automation interface to a CAD application session.
///
/// One engine represents one application session with at most one active
/// document.
pub trait CadEngine {
    /// Creates a new document and makes it active.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be used.
    fn create_document(
        &mut self,
        kind: DocumentKind,
        template: Option<&Path>,
    ) -> CadResult<DocumentInfo>;

    /// Opens a document from disk and makes it active.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not a supported type.
    fn open_document(&mut self, path: &Path) -> CadResult<DocumentInfo>;

    /// Saves the active document, optionally under a new path.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no active document.
    fn save_document(&mut self, path: Option<&Path>) -> CadResult<DocumentInfo>;

    /// Closes the active document.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no active document.
    fn close_document(&mut self, save: bool) -> CadResult<DocumentInfo>;

    /// Activates an open document.
    ///
    /// # Errors
    ///
    /// Returns an error if no document matches.
    fn activate_document(&mut self, selector: &DocumentSelector) -> CadResult<DocumentInfo>;

    /// Lists open documents in open order.
    fn list_documents(&self) -> Vec<DocumentInfo>;

    /// Returns the active document.
    ///
    /// # Errors
    ///
    /// Returns [`CadError::NoActiveDocument`] if none is active.
    fn active_document(&self) -> CadResult<DocumentInfo>;

    /// Starts a sketch on a 1-based reference plane of the active document.
    ///
    /// # Errors
    ///
    /// Returns an error if a sketch is already open or the plane is invalid.
    fn begin_sketch(&mut self, plane_index: usize) -> CadResult<SketchInfo>;

    /// Adds an element to the open sketch. Returns the new element count.
    ///
    /// # Errors
    ///
    /// Returns [`CadError::NoOpenSketch`] if no sketch is open.
    fn add_sketch_element(&mut self, element: SketchElement) -> CadResult<usize>;

    /// Draws an axis of revolution in the open sketch.
    ///
    /// # Errors
    ///
    /// Returns [`CadError::NoOpenSketch`] if no sketch is open.
    fn add_axis_of_revolution(&mut self, start: [f64; 2], end: [f64; 2]) -> CadResult<RefAxis>;

    /// Finishes the open sketch and returns its profile.
    ///
    /// # Errors
    ///
    /// Returns [`CadError::NoOpenSketch`] if no sketch is open.
    fn end_sketch(&mut self) -> CadResult<ClosedSketch>;

    /// Builds a feature in the active document.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be satisfied.
    fn add_feature(&mut self, request: &FeatureRequest) -> CadResult<FeatureInfo>;

    /// Lists features of the active document.
    ///
    /// # Errors
    ///
    /// Returns [`CadError::NoActiveDocument`] if none is active.
    fn features(&self) -> CadResult<Vec<FeatureInfo>>;

    /// Places a component file into the active assembly.
    ///
    /// # Errors
    ///
    /// Returns an error if the active document is not an assembly or the
    /// file cannot be placed.
    fn place_component(&mut self, path: &Path) -> CadResult<OccurrenceInfo>;
}
