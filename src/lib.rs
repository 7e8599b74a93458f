//! solidedge-mcp: MCP server for AI-driven Solid Edge modelling
//!
//! An AI assistant builds parts and assemblies the way a designer does:
//! open a document, draw a closed sketch, then turn it into a feature. The
//! server keeps track of what the last sketches produced so that feature
//! tools can be called without passing geometry around.
//!
//! # Architecture
//!
//! - **Sketch state** ([`sketch::SketchState`]): the active profile, the
//!   accumulated profiles and the axis of revolution for one session
//! - **Automation seam** ([`cad::CadEngine`]): every document, sketch and
//!   feature call goes through this trait; [`cad::MemoryEngine`] is the
//!   in-process implementation
//! - **Managers**: [`documents::DocumentManager`], [`sketch::SketchManager`]
//!   and [`features::FeatureManager`] apply the rules for when sketch state
//!   is produced, consumed and discarded
//!
//! # Modules
//!
//! - [`cad`]: Automation interface, handles and the in-memory engine
//! - [`config`]: Configuration loading and validation
//! - [`documents`]: Document lifecycle
//! - [`error`]: Error types
//! - [`features`]: Feature creation from sketch state
//! - [`mcp`]: MCP protocol implementation
//! - [`session`]: One engine plus its sketch state
//! - [`sketch`]: Sketch operations and the sketch state coordinator

pub mod cad;
pub mod config;
pub mod documents;
pub mod error;
pub mod features;
pub mod mcp;
pub mod session;
pub mod sketch;
