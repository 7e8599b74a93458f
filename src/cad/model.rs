//! Request and response types exchanged with a [`super::CadEngine`].
//!
//! Lengths are in metres and angles in radians, matching the automation
//! interface. Tool handlers convert user-facing degrees before building a
//! [`FeatureRequest`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{Profile, RefAxis};

/// Solid Edge document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocumentKind {
    /// Part document (`.par`).
    Part,
    /// Assembly document (`.asm`).
    Assembly,
    /// Sheet metal document (`.psm`).
    SheetMetal,
    /// Draft document (`.dft`).
    Draft,
}

impl DocumentKind {
    /// All kinds, in the order tools list them.
    pub const ALL: [Self; 4] = [Self::Part, Self::Assembly, Self::SheetMetal, Self::Draft];

    /// Parses a tool-facing type name (`part`, `assembly`, `sheet_metal`, `draft`).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "part" => Some(Self::Part),
            "assembly" => Some(Self::Assembly),
            "sheet_metal" | "sheetmetal" => Some(Self::SheetMetal),
            "draft" => Some(Self::Draft),
            _ => None,
        }
    }

    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Part => "par",
            Self::Assembly => "asm",
            Self::SheetMetal => "psm",
            Self::Draft => "dft",
        }
    }

    /// Infers the kind from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.extension() == ext)
    }

    /// Prefix used for untitled documents (`Part1`, `Asm2`, ...).
    #[must_use]
    pub const fn untitled_prefix(self) -> &'static str {
        match self {
            Self::Part => "Part",
            Self::Assembly => "Asm",
            Self::SheetMetal => "SheetMetal",
            Self::Draft => "Draft",
        }
    }

    /// Whether solid features (extrude, revolve, ...) can be built here.
    #[must_use]
    pub const fn is_modeling(self) -> bool {
        matches!(self, Self::Part | Self::SheetMetal)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Part => "Part",
            Self::Assembly => "Assembly",
            Self::SheetMetal => "SheetMetal",
            Self::Draft => "Draft",
        };
        f.write_str(name)
    }
}

/// Description of an open document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentInfo {
    /// Position in the open-document list (0-based).
    pub index: usize,
    /// Document name as shown in the application.
    pub name: String,
    /// Full path, if the document has been saved or was opened from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Document type.
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    /// Whether there are unsaved changes.
    pub modified: bool,
    /// Whether this is the active document.
    pub active: bool,
}

/// How to pick a document to activate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSelector {
    /// By document name.
    Name(String),
    /// By 0-based position in the open-document list.
    Index(usize),
}

/// Maps a plane name to its 1-based reference plane index.
///
/// `Top`/`XZ` is 1, `Front`/`XY` is 2, `Right`/`YZ` is 3.
#[must_use]
pub fn plane_index(name: &str) -> Option<usize> {
    match name {
        "Top" | "XZ" => Some(1),
        "Front" | "XY" => Some(2),
        "Right" | "YZ" => Some(3),
        _ => None,
    }
}

/// An open sketch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SketchInfo {
    /// Sketch (profile set) name.
    pub name: String,
    /// 1-based reference plane index the sketch lies on.
    pub plane_index: usize,
    /// Owning document.
    pub document: String,
}

/// A closed sketch and the profile it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosedSketch {
    /// Sketch name.
    pub name: String,
    /// Handle of the finished profile.
    pub profile: Profile,
    /// Number of geometry elements in the profile.
    pub elements: usize,
}

/// A single 2D element added to the open sketch.
#[derive(Debug, Clone, PartialEq)]
pub enum SketchElement {
    /// Line between two points.
    Line {
        /// Start point.
        start: [f64; 2],
        /// End point.
        end: [f64; 2],
    },
    /// Full circle.
    Circle {
        /// Center point.
        center: [f64; 2],
        /// Radius.
        radius: f64,
    },
    /// Arc by center and end points.
    Arc {
        /// Center point.
        center: [f64; 2],
        /// Start point.
        start: [f64; 2],
        /// End point.
        end: [f64; 2],
    },
    /// Ellipse by center, radii and major axis direction.
    Ellipse {
        /// Center point.
        center: [f64; 2],
        /// Major radius.
        major_radius: f64,
        /// Minor radius.
        minor_radius: f64,
        /// Unit direction of the major axis.
        major_axis: [f64; 2],
    },
    /// Cubic B-spline through points.
    Spline {
        /// Fit points.
        points: Vec<[f64; 2]>,
    },
    /// Construction point.
    Point {
        /// Location.
        at: [f64; 2],
    },
}

impl SketchElement {
    /// Element type name for reporting.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Line { .. } => "line",
            Self::Circle { .. } => "circle",
            Self::Arc { .. } => "arc",
            Self::Ellipse { .. } => "ellipse",
            Self::Spline { .. } => "spline",
            Self::Point { .. } => "point",
        }
    }
}

/// Side of the profile plane a feature extends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSide {
    /// Along the plane normal.
    #[default]
    Normal,
    /// Against the plane normal.
    Reverse,
    /// Equally both ways.
    Symmetric,
}

impl ProfileSide {
    /// Parses `Normal`, `Reverse` or `Symmetric` (case-insensitive).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "reverse" => Some(Self::Reverse),
            "symmetric" => Some(Self::Symmetric),
            _ => None,
        }
    }
}

/// Whether a feature adds or removes material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureOperation {
    /// Protrusion.
    #[default]
    Add,
    /// Cutout.
    Cut,
}

/// Helix handedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HelixHand {
    /// Right-handed.
    #[default]
    Right,
    /// Left-handed.
    Left,
}

impl HelixHand {
    /// Parses `Right` or `Left` (case-insensitive).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "right" => Some(Self::Right),
            "left" => Some(Self::Left),
            _ => None,
        }
    }
}

/// Extent of an assembly-level extruded cutout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssemblyExtent {
    /// Fixed depth in metres.
    Finite(f64),
    /// Through every part in scope.
    ThroughAll,
}

/// A feature to build from consumed profile state.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureRequest {
    /// Extruded protrusion or cutout.
    Extrude {
        /// Profile to extrude.
        profile: Profile,
        /// Extrusion side.
        side: ProfileSide,
        /// Distance in metres.
        distance: f64,
        /// Add or cut.
        operation: FeatureOperation,
        /// Wall thickness for a thin-wall feature.
        wall_thickness: Option<f64>,
    },
    /// Revolved protrusion or cutout.
    Revolve {
        /// Profile to revolve.
        profile: Profile,
        /// Axis of revolution.
        axis: RefAxis,
        /// Angle in radians.
        angle: f64,
        /// Add or cut.
        operation: FeatureOperation,
        /// Wall thickness for a thin-wall feature.
        wall_thickness: Option<f64>,
    },
    /// Revolved construction surface.
    RevolvedSurface {
        /// Profile to revolve.
        profile: Profile,
        /// Axis of revolution.
        axis: RefAxis,
        /// Angle in radians.
        angle: f64,
    },
    /// Helical protrusion or cutout.
    Helix {
        /// Cross-section profile.
        profile: Profile,
        /// Helix axis.
        axis: RefAxis,
        /// Distance between coils in metres.
        pitch: f64,
        /// Total height in metres.
        height: f64,
        /// Number of turns.
        revolutions: f64,
        /// Handedness.
        hand: HelixHand,
        /// Add or cut.
        operation: FeatureOperation,
        /// Wall thickness for a thin-wall feature.
        wall_thickness: Option<f64>,
    },
    /// Lofted protrusion or cutout, optionally guided.
    Loft {
        /// Cross-sections in traversal order.
        sections: Vec<Profile>,
        /// Guide curves (may be empty).
        guides: Vec<Profile>,
        /// Add or cut.
        operation: FeatureOperation,
        /// Wall thickness for a thin-wall feature.
        wall_thickness: Option<f64>,
    },
    /// Swept protrusion or cutout.
    Sweep {
        /// Path profile.
        path: Profile,
        /// Cross-sections.
        sections: Vec<Profile>,
        /// Add or cut.
        operation: FeatureOperation,
        /// Wall thickness for a thin-wall feature.
        wall_thickness: Option<f64>,
    },
    /// Pattern of a seed feature at profile-defined locations.
    UserDefinedPattern {
        /// Name of the feature to copy.
        seed_feature: String,
        /// One profile per occurrence.
        occurrences: Vec<Profile>,
    },
    /// Assembly-level extruded cutout across occurrences.
    AssemblyExtrudedCutout {
        /// 0-based occurrence indices.
        scope: Vec<usize>,
        /// Profiles to cut.
        profiles: Vec<Profile>,
        /// Depth.
        extent: AssemblyExtent,
        /// Cut side.
        side: ProfileSide,
    },
    /// Assembly-level revolved cutout across occurrences.
    AssemblyRevolvedCutout {
        /// 0-based occurrence indices.
        scope: Vec<usize>,
        /// Profiles to revolve.
        profiles: Vec<Profile>,
        /// Axis of revolution.
        axis: RefAxis,
        /// Angle in radians.
        angle: f64,
    },
    /// Assembly-level swept protrusion.
    AssemblySweptProtrusion {
        /// Trace curves.
        trace_curves: Vec<Profile>,
        /// Cross-sections.
        sections: Vec<Profile>,
    },
}

impl FeatureRequest {
    /// Feature type name for reporting and naming.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Extrude {
                operation: FeatureOperation::Add,
                ..
            } => "Extrude",
            Self::Extrude {
                operation: FeatureOperation::Cut,
                ..
            } => "Cutout",
            Self::Revolve {
                operation: FeatureOperation::Add,
                ..
            } => "Revolve",
            Self::Revolve {
                operation: FeatureOperation::Cut,
                ..
            } => "RevolvedCutout",
            Self::RevolvedSurface { .. } => "RevolvedSurface",
            Self::Helix {
                operation: FeatureOperation::Add,
                ..
            } => "Helix",
            Self::Helix {
                operation: FeatureOperation::Cut,
                ..
            } => "HelixCutout",
            Self::Loft {
                operation: FeatureOperation::Add,
                ..
            } => "Loft",
            Self::Loft {
                operation: FeatureOperation::Cut,
                ..
            } => "LoftedCutout",
            Self::Sweep {
                operation: FeatureOperation::Add,
                ..
            } => "Sweep",
            Self::Sweep {
                operation: FeatureOperation::Cut,
                ..
            } => "SweptCutout",
            Self::UserDefinedPattern { .. } => "Pattern",
            Self::AssemblyExtrudedCutout { .. } => "AssemblyCutout",
            Self::AssemblyRevolvedCutout { .. } => "AssemblyRevolvedCutout",
            Self::AssemblySweptProtrusion { .. } => "AssemblySweep",
        }
    }

    /// Every profile the request references, in argument order.
    #[must_use]
    pub fn profiles(&self) -> Vec<Profile> {
        match self {
            Self::Extrude { profile, .. }
            | Self::Revolve { profile, .. }
            | Self::RevolvedSurface { profile, .. }
            | Self::Helix { profile, .. } => vec![*profile],
            Self::Loft {
                sections, guides, ..
            } => sections.iter().chain(guides).copied().collect(),
            Self::Sweep { path, sections, .. } => {
                std::iter::once(*path).chain(sections.iter().copied()).collect()
            }
            Self::UserDefinedPattern { occurrences, .. } => occurrences.clone(),
            Self::AssemblyExtrudedCutout { profiles, .. }
            | Self::AssemblyRevolvedCutout { profiles, .. } => profiles.clone(),
            Self::AssemblySweptProtrusion {
                trace_curves,
                sections,
            } => trace_curves.iter().chain(sections).copied().collect(),
        }
    }

    /// The axis of revolution the request references, if any.
    #[must_use]
    pub const fn axis(&self) -> Option<RefAxis> {
        match self {
            Self::Revolve { axis, .. }
            | Self::RevolvedSurface { axis, .. }
            | Self::Helix { axis, .. }
            | Self::AssemblyRevolvedCutout { axis, .. } => Some(*axis),
            _ => None,
        }
    }

    /// Whether this feature is built in an assembly rather than a part.
    #[must_use]
    pub const fn is_assembly_feature(&self) -> bool {
        matches!(
            self,
            Self::AssemblyExtrudedCutout { .. }
                | Self::AssemblyRevolvedCutout { .. }
                | Self::AssemblySweptProtrusion { .. }
        )
    }

    /// Add or cut, for features that do either.
    #[must_use]
    pub const fn operation(&self) -> Option<FeatureOperation> {
        match self {
            Self::Extrude { operation, .. }
            | Self::Revolve { operation, .. }
            | Self::Helix { operation, .. }
            | Self::Loft { operation, .. }
            | Self::Sweep { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    /// Whether the feature needs existing solid material.
    #[must_use]
    pub const fn needs_base_feature(&self) -> bool {
        matches!(self, Self::UserDefinedPattern { .. })
            || matches!(self.operation(), Some(FeatureOperation::Cut))
    }
}

/// A feature that exists in the active document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureInfo {
    /// Feature name (e.g. `Extrude 1`).
    pub name: String,
    /// Feature type name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Number of profiles consumed.
    pub profiles: usize,
}

/// A component placed in an assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccurrenceInfo {
    /// 0-based occurrence index.
    pub index: usize,
    /// Occurrence name (e.g. `bracket.par:1`).
    pub name: String,
    /// Source file.
    pub path: PathBuf,
}
