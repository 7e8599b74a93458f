//! Tool catalogue and argument extraction for `tools/call`.
//!
//! Lengths are metres and angles are degrees throughout. Tools that consume
//! sketch profiles say which part of the sketch state they read.

use serde::Serialize;
use serde_json::{json, Value};

use crate::cad::CadError;
use crate::features::FeatureError;
use crate::sketch::SketchError;

/// A tool definition for tools/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// A failed tool call, reported to the client as `{"error", "code"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    /// Human-readable message.
    pub message: String,
    /// Stable machine-readable code.
    pub code: &'static str,
}

impl ToolError {
    /// Creates an error with an explicit code.
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// A required argument is absent.
    #[must_use]
    pub fn missing(name: &str) -> Self {
        Self::new(
            "MISSING_PARAMETER",
            format!("Missing required parameter: {name}"),
        )
    }

    /// An argument has the wrong type or value.
    pub fn invalid(name: &str, message: impl std::fmt::Display) -> Self {
        Self::new(
            "INVALID_PARAMETER",
            format!("Invalid parameter '{name}': {message}"),
        )
    }

    /// JSON body returned in the tool result.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({ "error": self.message, "code": self.code })
    }
}

impl From<CadError> for ToolError {
    fn from(e: CadError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

impl From<SketchError> for ToolError {
    fn from(e: SketchError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

impl From<FeatureError> for ToolError {
    fn from(e: FeatureError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

/// Typed access to a `tools/call` arguments object.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a>(&'a Value);

impl<'a> Args<'a> {
    /// Wraps the raw arguments value.
    #[must_use]
    pub const fn new(value: &'a Value) -> Self {
        Self(value)
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    /// Optional number.
    pub fn opt_f64(&self, name: &str) -> Result<Option<f64>, ToolError> {
        self.get(name)
            .map(|v| {
                v.as_f64()
                    .ok_or_else(|| ToolError::invalid(name, "expected a number"))
            })
            .transpose()
    }

    /// Required number.
    pub fn f64(&self, name: &str) -> Result<f64, ToolError> {
        self.opt_f64(name)?.ok_or_else(|| ToolError::missing(name))
    }

    /// Optional string.
    pub fn opt_str(&self, name: &str) -> Result<Option<&'a str>, ToolError> {
        self.get(name)
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| ToolError::invalid(name, "expected a string"))
            })
            .transpose()
    }

    /// Required string.
    pub fn str(&self, name: &str) -> Result<&'a str, ToolError> {
        self.opt_str(name)?.ok_or_else(|| ToolError::missing(name))
    }

    /// Optional non-negative integer.
    pub fn opt_usize(&self, name: &str) -> Result<Option<usize>, ToolError> {
        self.get(name)
            .map(|v| {
                v.as_u64()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| ToolError::invalid(name, "expected a non-negative integer"))
            })
            .transpose()
    }

    /// Required non-negative integer.
    pub fn usize(&self, name: &str) -> Result<usize, ToolError> {
        self.opt_usize(name)?.ok_or_else(|| ToolError::missing(name))
    }

    /// Optional boolean with a default.
    pub fn bool_or(&self, name: &str, default: bool) -> Result<bool, ToolError> {
        self.get(name).map_or(Ok(default), |v| {
            v.as_bool()
                .ok_or_else(|| ToolError::invalid(name, "expected a boolean"))
        })
    }

    /// Optional list of non-negative integers.
    pub fn opt_indices(&self, name: &str) -> Result<Option<Vec<usize>>, ToolError> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        let items = value
            .as_array()
            .ok_or_else(|| ToolError::invalid(name, "expected an array of integers"))?;
        items
            .iter()
            .map(|v| {
                v.as_u64()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| ToolError::invalid(name, "expected an array of integers"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Required list of `[x, y]` points.
    pub fn points(&self, name: &str) -> Result<Vec<[f64; 2]>, ToolError> {
        let items = self
            .get(name)
            .ok_or_else(|| ToolError::missing(name))?
            .as_array()
            .ok_or_else(|| ToolError::invalid(name, "expected an array of [x, y] pairs"))?;
        items
            .iter()
            .map(|p| match p.as_array().map(Vec::as_slice) {
                Some([x, y]) => match (x.as_f64(), y.as_f64()) {
                    (Some(x), Some(y)) => Ok([x, y]),
                    _ => Err(ToolError::invalid(name, "point coordinates must be numbers")),
                },
                _ => Err(ToolError::invalid(name, "expected an array of [x, y] pairs")),
            })
            .collect()
    }

    /// Text form of a string-or-integer argument.
    pub fn str_or_int(&self, name: &str) -> Result<String, ToolError> {
        match self.get(name) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(v) if v.is_u64() => Ok(v.to_string()),
            Some(_) => Err(ToolError::invalid(name, "expected a string or an integer")),
            None => Err(ToolError::missing(name)),
        }
    }
}

fn tool(name: &str, description: &str, input_schema: Value) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: Some(description.to_string()),
        input_schema,
    }
}

fn no_args() -> Value {
    json!({ "type": "object", "properties": {} })
}

fn two_points(what: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "x1": { "type": "number", "description": format!("{what} start X (m)") },
            "y1": { "type": "number", "description": format!("{what} start Y (m)") },
            "x2": { "type": "number", "description": format!("{what} end X (m)") },
            "y2": { "type": "number", "description": format!("{what} end Y (m)") }
        },
        "required": ["x1", "y1", "x2", "y2"]
    })
}

const DIRECTION: &str = "'Normal' (default), 'Reverse' or 'Symmetric'";

/// Returns every tool the server exposes.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        // === Documents ===
        tool(
            "create_document",
            "Create a new document and make it active. Clears the sketch state.",
            json!({
                "type": "object",
                "properties": {
                    "type": {
                        "type": "string",
                        "enum": ["part", "assembly", "sheet_metal", "draft"],
                        "description": "Document type"
                    },
                    "template": {
                        "type": "string",
                        "description": "Optional template file. Defaults to the configured template for the type"
                    }
                },
                "required": ["type"]
            }),
        ),
        tool(
            "open_document",
            "Open a .par, .asm, .psm or .dft file and make it active. Clears the sketch state.",
            json!({
                "type": "object",
                "properties": {
                    "path": { "type": "string", "description": "File to open" }
                },
                "required": ["path"]
            }),
        ),
        tool(
            "save_document",
            "Save the active document, optionally under a new path.",
            json!({
                "type": "object",
                "properties": {
                    "path": { "type": "string", "description": "Optional target path (required for untitled documents)" }
                }
            }),
        ),
        tool(
            "close_document",
            "Close the active document. Clears the sketch state.",
            json!({
                "type": "object",
                "properties": {
                    "save": { "type": "boolean", "description": "Save before closing (default: false)" }
                }
            }),
        ),
        tool(
            "activate_document",
            "Activate an open document by name or 0-based index. Clears the sketch state.",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Document name" },
                    "index": { "type": "integer", "minimum": 0, "description": "0-based position in list_documents" }
                }
            }),
        ),
        tool("list_documents", "List open documents in open order.", no_args()),
        tool("get_active_document", "Describe the active document.", no_args()),
        tool(
            "place_component",
            "Place a part or sub-assembly file into the active assembly.",
            json!({
                "type": "object",
                "properties": {
                    "path": { "type": "string", "description": "Component file (.par, .psm or .asm)" }
                },
                "required": ["path"]
            }),
        ),
        // === Sketching ===
        tool(
            "create_sketch",
            "Start a sketch on a reference plane of the active document.",
            json!({
                "type": "object",
                "properties": {
                    "plane": {
                        "type": ["string", "integer"],
                        "description": "Top, Front, Right, XZ, XY, YZ or a 1-based reference plane index"
                    }
                },
                "required": ["plane"]
            }),
        ),
        tool("draw_line", "Draw a line in the open sketch.", two_points("Line")),
        tool(
            "draw_circle",
            "Draw a circle in the open sketch.",
            json!({
                "type": "object",
                "properties": {
                    "center_x": { "type": "number" },
                    "center_y": { "type": "number" },
                    "radius": { "type": "number", "exclusiveMinimum": 0 }
                },
                "required": ["center_x", "center_y", "radius"]
            }),
        ),
        tool(
            "draw_rectangle",
            "Draw an axis-aligned rectangle from two opposite corners (four lines).",
            two_points("Corner"),
        ),
        tool(
            "draw_arc",
            "Draw an arc by center, radius and start/end angles in degrees.",
            json!({
                "type": "object",
                "properties": {
                    "center_x": { "type": "number" },
                    "center_y": { "type": "number" },
                    "radius": { "type": "number", "exclusiveMinimum": 0 },
                    "start_angle": { "type": "number", "description": "Degrees" },
                    "end_angle": { "type": "number", "description": "Degrees" }
                },
                "required": ["center_x", "center_y", "radius", "start_angle", "end_angle"]
            }),
        ),
        tool(
            "draw_polygon",
            "Draw a regular polygon inscribed in a circle.",
            json!({
                "type": "object",
                "properties": {
                    "center_x": { "type": "number" },
                    "center_y": { "type": "number" },
                    "radius": { "type": "number", "exclusiveMinimum": 0 },
                    "sides": { "type": "integer", "minimum": 3 }
                },
                "required": ["center_x", "center_y", "radius", "sides"]
            }),
        ),
        tool(
            "draw_ellipse",
            "Draw an ellipse. 'angle' rotates the major axis (degrees).",
            json!({
                "type": "object",
                "properties": {
                    "center_x": { "type": "number" },
                    "center_y": { "type": "number" },
                    "major_radius": { "type": "number", "exclusiveMinimum": 0 },
                    "minor_radius": { "type": "number", "exclusiveMinimum": 0 },
                    "angle": { "type": "number", "description": "Degrees (default: 0)" }
                },
                "required": ["center_x", "center_y", "major_radius", "minor_radius"]
            }),
        ),
        tool(
            "draw_spline",
            "Draw a B-spline through two or more points.",
            json!({
                "type": "object",
                "properties": {
                    "points": {
                        "type": "array",
                        "minItems": 2,
                        "items": { "type": "array", "items": { "type": "number" }, "minItems": 2, "maxItems": 2 }
                    }
                },
                "required": ["points"]
            }),
        ),
        tool(
            "draw_point",
            "Place a construction point (used as a pattern occurrence location).",
            json!({
                "type": "object",
                "properties": {
                    "x": { "type": "number" },
                    "y": { "type": "number" }
                },
                "required": ["x", "y"]
            }),
        ),
        tool(
            "set_axis_of_revolution",
            "Draw the axis of revolution in the open sketch. Call before close_sketch. \
             The axis stays set across revolve features until the active document changes.",
            two_points("Axis"),
        ),
        tool(
            "close_sketch",
            "Close the open sketch. Its profile becomes the active profile and is appended \
             to the accumulated profiles.",
            no_args(),
        ),
        tool(
            "get_sketch_state",
            "Show the active profile, accumulated profiles and axis of revolution.",
            no_args(),
        ),
        // === Features from the active profile ===
        tool(
            "create_extrude",
            "Extrude the active profile.",
            json!({
                "type": "object",
                "properties": {
                    "distance": { "type": "number", "exclusiveMinimum": 0, "description": "Metres" },
                    "direction": { "type": "string", "description": DIRECTION }
                },
                "required": ["distance"]
            }),
        ),
        tool(
            "create_extruded_cutout",
            "Cut the active profile into existing material.",
            json!({
                "type": "object",
                "properties": {
                    "distance": { "type": "number", "exclusiveMinimum": 0, "description": "Metres" },
                    "direction": { "type": "string", "description": DIRECTION }
                },
                "required": ["distance"]
            }),
        ),
        tool(
            "create_extrude_thin_wall",
            "Extrude the active profile as a thin-walled shell.",
            json!({
                "type": "object",
                "properties": {
                    "distance": { "type": "number", "exclusiveMinimum": 0 },
                    "wall_thickness": { "type": "number", "exclusiveMinimum": 0 },
                    "direction": { "type": "string", "description": DIRECTION }
                },
                "required": ["distance", "wall_thickness"]
            }),
        ),
        tool(
            "create_revolve",
            "Revolve the active profile about the axis of revolution.",
            json!({
                "type": "object",
                "properties": {
                    "angle": { "type": "number", "description": "Degrees (default: 360)" }
                }
            }),
        ),
        tool(
            "create_revolved_cutout",
            "Revolved cutout of the active profile about the axis of revolution.",
            json!({
                "type": "object",
                "properties": {
                    "angle": { "type": "number", "description": "Degrees (default: 360)" }
                }
            }),
        ),
        tool(
            "create_revolve_thin_wall",
            "Thin-walled revolve of the active profile about the axis of revolution.",
            json!({
                "type": "object",
                "properties": {
                    "angle": { "type": "number", "description": "Degrees (default: 360)" },
                    "wall_thickness": { "type": "number", "exclusiveMinimum": 0 }
                },
                "required": ["wall_thickness"]
            }),
        ),
        tool(
            "create_revolved_surface",
            "Revolved construction surface from the active profile.",
            json!({
                "type": "object",
                "properties": {
                    "angle": { "type": "number", "description": "Degrees (default: 360)" }
                }
            }),
        ),
        tool(
            "create_helix",
            "Sweep the active profile along a helix around the axis of revolution.",
            json!({
                "type": "object",
                "properties": {
                    "pitch": { "type": "number", "exclusiveMinimum": 0 },
                    "height": { "type": "number", "exclusiveMinimum": 0 },
                    "revolutions": { "type": "number", "description": "Default: height / pitch" },
                    "direction": { "type": "string", "enum": ["Right", "Left"] },
                    "wall_thickness": { "type": "number", "exclusiveMinimum": 0 }
                },
                "required": ["pitch", "height"]
            }),
        ),
        tool(
            "create_helix_cutout",
            "Remove material along a helix around the axis of revolution, using the active \
             profile. Needs an existing base feature.",
            json!({
                "type": "object",
                "properties": {
                    "pitch": { "type": "number", "exclusiveMinimum": 0 },
                    "height": { "type": "number", "exclusiveMinimum": 0 },
                    "revolutions": { "type": "number", "description": "Default: height / pitch" },
                    "direction": { "type": "string", "enum": ["Right", "Left"] }
                },
                "required": ["pitch", "height"]
            }),
        ),
        // === Features from accumulated profiles ===
        tool(
            "create_loft",
            "Loft through the accumulated profiles in the order they were closed.",
            json!({
                "type": "object",
                "properties": {
                    "profile_indices": {
                        "type": "array", "items": { "type": "integer", "minimum": 0 },
                        "description": "Optional subset and order of accumulated profiles"
                    },
                    "wall_thickness": { "type": "number", "exclusiveMinimum": 0 }
                }
            }),
        ),
        tool(
            "create_loft_with_guides",
            "Loft through cross-sections constrained by guide curves. Needs at least two \
             cross-sections and one guide among the accumulated profiles.",
            json!({
                "type": "object",
                "properties": {
                    "guide_profile_indices": {
                        "type": "array", "items": { "type": "integer", "minimum": 0 },
                        "description": "Accumulated profile indices that are guide curves"
                    },
                    "profile_indices": {
                        "type": "array", "items": { "type": "integer", "minimum": 0 },
                        "description": "Cross-section indices (default: every non-guide profile)"
                    }
                },
                "required": ["guide_profile_indices"]
            }),
        ),
        tool(
            "create_sweep",
            "Sweep cross-sections along a path. The path is accumulated profile 0 unless \
             path_profile_index says otherwise.",
            json!({
                "type": "object",
                "properties": {
                    "path_profile_index": { "type": "integer", "minimum": 0 },
                    "wall_thickness": { "type": "number", "exclusiveMinimum": 0 }
                }
            }),
        ),
        tool(
            "create_lofted_cutout",
            "Remove material lofted through the accumulated profiles. Needs an existing base \
             feature.",
            json!({
                "type": "object",
                "properties": {
                    "profile_indices": {
                        "type": "array", "items": { "type": "integer", "minimum": 0 },
                        "description": "Optional subset and order of accumulated profiles"
                    }
                }
            }),
        ),
        tool(
            "create_swept_cutout",
            "Remove material swept along a path. The path is accumulated profile 0 unless \
             path_profile_index says otherwise. Needs an existing base feature.",
            json!({
                "type": "object",
                "properties": {
                    "path_profile_index": { "type": "integer", "minimum": 0 }
                }
            }),
        ),
        tool(
            "create_user_defined_pattern",
            "Copy a feature to the location of every accumulated profile.",
            json!({
                "type": "object",
                "properties": {
                    "feature_name": { "type": "string", "description": "Seed feature, e.g. 'Extrude 2'" }
                },
                "required": ["feature_name"]
            }),
        ),
        tool("list_features", "List features of the active document.", no_args()),
        // === Assembly features ===
        tool(
            "create_assembly_extruded_cutout",
            "Cut the accumulated profiles through placed occurrences.",
            json!({
                "type": "object",
                "properties": {
                    "scope_parts": {
                        "type": "array", "items": { "type": "integer", "minimum": 0 },
                        "description": "0-based occurrence indices"
                    },
                    "distance": { "type": "number", "description": "Depth in metres. Omit for through all" },
                    "direction": { "type": "string", "description": DIRECTION }
                },
                "required": ["scope_parts"]
            }),
        ),
        tool(
            "create_assembly_revolved_cutout",
            "Revolve the accumulated profiles about the axis of revolution, cutting placed occurrences.",
            json!({
                "type": "object",
                "properties": {
                    "scope_parts": {
                        "type": "array", "items": { "type": "integer", "minimum": 0 }
                    },
                    "angle": { "type": "number", "description": "Degrees (default: 360)" }
                },
                "required": ["scope_parts"]
            }),
        ),
        tool(
            "create_assembly_swept_protrusion",
            "Swept protrusion: the first num_trace_curves accumulated profiles are trace curves, \
             the next num_cross_sections are cross-sections.",
            json!({
                "type": "object",
                "properties": {
                    "num_trace_curves": { "type": "integer", "minimum": 1, "description": "Default: 1" },
                    "num_cross_sections": { "type": "integer", "minimum": 1, "description": "Default: 1" }
                }
            }),
        ),
    ]
}
