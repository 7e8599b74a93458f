//! Sketching and the profile state it produces.
//!
//! [`SketchManager`] drives the engine's sketch calls and feeds their results
//! into [`SketchState`]: closing a sketch promotes its profile, and
//! designating an axis of revolution stores it straight away, before the
//! sketch is closed.

mod consume;
mod state;

pub use consume::ProfileError;
pub use state::{SketchState, SketchStateSummary};

use std::f64::consts::TAU;

use thiserror::Error;
use tracing::{debug, info};

use crate::cad::{
    model::plane_index, CadEngine, CadError, ClosedSketch, Profile, RefAxis, SketchElement,
    SketchInfo,
};

/// Errors from sketch operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SketchError {
    /// The engine rejected the call.
    #[error(transparent)]
    Engine(#[from] CadError),

    /// An argument is out of range.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

impl SketchError {
    fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Engine(e) => e.code(),
            Self::InvalidParameter { .. } => "INVALID_PARAMETER",
        }
    }
}

/// Result type for sketch operations.
pub type SketchResult<T> = Result<T, SketchError>;

fn finite(name: &'static str, value: f64) -> SketchResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SketchError::invalid(name, "must be a finite number"))
    }
}

fn positive(name: &'static str, value: f64) -> SketchResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SketchError::invalid(name, "must be a positive number"))
    }
}

fn point(x: f64, y: f64) -> SketchResult<[f64; 2]> {
    Ok([finite("x", x)?, finite("y", y)?])
}

/// Resolves a plane name (`Top`, `Front`, `Right`, `XZ`, `XY`, `YZ`) or a
/// 1-based index written as text.
///
/// # Errors
///
/// Returns [`SketchError::InvalidParameter`] for anything else.
pub fn resolve_plane(plane: &str) -> SketchResult<usize> {
    plane_index(plane)
        .or_else(|| plane.parse::<usize>().ok().filter(|&i| i > 0))
        .ok_or_else(|| {
            SketchError::invalid(
                "plane",
                format!("unknown plane '{plane}'. Use Top, Front, Right, XZ, XY, YZ or a 1-based index"),
            )
        })
}

/// Sketch operations bound to one engine and one [`SketchState`].
pub struct SketchManager<'a> {
    engine: &'a mut dyn CadEngine,
    state: &'a mut SketchState,
}

impl<'a> SketchManager<'a> {
    /// Binds the manager to a session's engine and state.
    pub fn new(engine: &'a mut dyn CadEngine, state: &'a mut SketchState) -> Self {
        Self { engine, state }
    }

    /// Starts a sketch on the given plane.
    ///
    /// # Errors
    ///
    /// Fails if the plane is unknown, a sketch is already open, or there is
    /// no active document.
    pub fn create_sketch(&mut self, plane: &str) -> SketchResult<SketchInfo> {
        let index = resolve_plane(plane)?;
        let sketch = self.engine.begin_sketch(index)?;
        info!(sketch = %sketch.name, plane = index, document = %sketch.document, "Sketch created");
        Ok(sketch)
    }

    fn add(&mut self, element: SketchElement) -> SketchResult<usize> {
        let kind = element.kind();
        let count = self.engine.add_sketch_element(element)?;
        debug!(element = kind, count, "Sketch element drawn");
        Ok(count)
    }

    /// Draws a line. Returns the sketch's element count.
    ///
    /// # Errors
    ///
    /// Fails on non-finite coordinates or when no sketch is open.
    pub fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> SketchResult<usize> {
        let start = point(x1, y1)?;
        let end = point(x2, y2)?;
        self.add(SketchElement::Line { start, end })
    }

    /// Draws a full circle.
    ///
    /// # Errors
    ///
    /// Fails on a non-positive radius or when no sketch is open.
    pub fn draw_circle(&mut self, cx: f64, cy: f64, radius: f64) -> SketchResult<usize> {
        let center = point(cx, cy)?;
        let radius = positive("radius", radius)?;
        self.add(SketchElement::Circle { center, radius })
    }

    /// Draws an axis-aligned rectangle as four connected lines.
    ///
    /// # Errors
    ///
    /// Fails if the rectangle has zero width or height, or when no sketch is
    /// open.
    pub fn draw_rectangle(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> SketchResult<usize> {
        let [x1, y1] = point(x1, y1)?;
        let [x2, y2] = point(x2, y2)?;
        positive("width", (x2 - x1).abs())?;
        positive("height", (y2 - y1).abs())?;

        let corners = [[x1, y1], [x2, y1], [x2, y2], [x1, y2]];
        let mut count = 0;
        for (i, &start) in corners.iter().enumerate() {
            let end = corners[(i + 1) % corners.len()];
            count = self.add(SketchElement::Line { start, end })?;
        }
        Ok(count)
    }

    /// Draws an arc by center, radius and start/end angles in degrees.
    ///
    /// # Errors
    ///
    /// Fails on a non-positive radius, equal angles, or when no sketch is
    /// open.
    pub fn draw_arc(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> SketchResult<usize> {
        let center = point(cx, cy)?;
        let radius = positive("radius", radius)?;
        let start_angle = finite("start_angle", start_angle)?;
        let end_angle = finite("end_angle", end_angle)?;
        if (end_angle - start_angle).abs() < f64::EPSILON {
            return Err(SketchError::invalid(
                "end_angle",
                "must differ from start_angle",
            ));
        }

        let at = |deg: f64| {
            let rad = deg.to_radians();
            [center[0] + radius * rad.cos(), center[1] + radius * rad.sin()]
        };
        self.add(SketchElement::Arc {
            center,
            start: at(start_angle),
            end: at(end_angle),
        })
    }

    /// Draws a regular polygon inscribed in a circle of `radius`.
    ///
    /// # Errors
    ///
    /// Fails with fewer than three sides, a non-positive radius, or when no
    /// sketch is open.
    pub fn draw_polygon(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        sides: usize,
    ) -> SketchResult<usize> {
        let [cx, cy] = point(cx, cy)?;
        let radius = positive("radius", radius)?;
        if sides < 3 {
            return Err(SketchError::invalid("sides", "a polygon needs at least 3 sides"));
        }

        #[allow(clippy::cast_precision_loss)]
        let vertex = |i: usize| {
            let angle = TAU * i as f64 / sides as f64;
            [cx + radius * angle.cos(), cy + radius * angle.sin()]
        };
        let mut count = 0;
        for i in 0..sides {
            count = self.add(SketchElement::Line {
                start: vertex(i),
                end: vertex((i + 1) % sides),
            })?;
        }
        Ok(count)
    }

    /// Draws an ellipse. `angle` rotates the major axis, in degrees.
    ///
    /// # Errors
    ///
    /// Fails if a radius is non-positive, the minor radius exceeds the major
    /// one, or no sketch is open.
    pub fn draw_ellipse(
        &mut self,
        cx: f64,
        cy: f64,
        major_radius: f64,
        minor_radius: f64,
        angle: f64,
    ) -> SketchResult<usize> {
        let center = point(cx, cy)?;
        let major_radius = positive("major_radius", major_radius)?;
        let minor_radius = positive("minor_radius", minor_radius)?;
        if minor_radius > major_radius {
            return Err(SketchError::invalid(
                "minor_radius",
                "must not exceed major_radius",
            ));
        }
        let rad = finite("angle", angle)?.to_radians();
        self.add(SketchElement::Ellipse {
            center,
            major_radius,
            minor_radius,
            major_axis: [rad.cos(), rad.sin()],
        })
    }

    /// Draws a B-spline through the given points.
    ///
    /// # Errors
    ///
    /// Fails with fewer than two points or when no sketch is open.
    pub fn draw_spline(&mut self, points: &[[f64; 2]]) -> SketchResult<usize> {
        if points.len() < 2 {
            return Err(SketchError::invalid("points", "a spline needs at least 2 points"));
        }
        let points = points
            .iter()
            .map(|&[x, y]| point(x, y))
            .collect::<SketchResult<Vec<_>>>()?;
        self.add(SketchElement::Spline { points })
    }

    /// Places a construction point.
    ///
    /// # Errors
    ///
    /// Fails on non-finite coordinates or when no sketch is open.
    pub fn draw_point(&mut self, x: f64, y: f64) -> SketchResult<usize> {
        let at = point(x, y)?;
        self.add(SketchElement::Point { at })
    }

    /// Draws the axis of revolution in the open sketch and makes it the
    /// active axis.
    ///
    /// # Errors
    ///
    /// Fails if the two points coincide or no sketch is open. The active
    /// axis is unchanged on failure.
    pub fn set_axis_of_revolution(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    ) -> SketchResult<RefAxis> {
        let start = point(x1, y1)?;
        let end = point(x2, y2)?;
        if (end[0] - start[0]).hypot(end[1] - start[1]) <= f64::EPSILON {
            return Err(SketchError::invalid(
                "end",
                "axis start and end points must differ",
            ));
        }

        let axis = self.engine.add_axis_of_revolution(start, end)?;
        self.state.set_active_axis(axis);
        info!(%axis, "Axis of revolution set");
        Ok(axis)
    }

    /// Closes the open sketch and promotes its profile.
    ///
    /// # Errors
    ///
    /// Fails if no sketch is open. Nothing is promoted on failure.
    pub fn close_sketch(&mut self) -> SketchResult<ClosedSketch> {
        let closed = self.engine.end_sketch()?;
        self.state.promote_profile(closed.profile);
        info!(
            sketch = %closed.name,
            profile = %closed.profile,
            accumulated = self.state.accumulated_profiles().len(),
            "Sketch closed, profile promoted"
        );
        Ok(closed)
    }

    /// Snapshot of the profile state.
    #[must_use]
    pub fn state_summary(&self) -> SketchStateSummary<Profile, RefAxis> {
        self.state.summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cad::{DocumentKind, MemoryEngine};

    fn part() -> MemoryEngine {
        let mut engine = MemoryEngine::new();
        engine.create_document(DocumentKind::Part, None).unwrap();
        engine
    }

    #[test]
    fn plane_names_and_indices() {
        assert_eq!(resolve_plane("Top"), Ok(1));
        assert_eq!(resolve_plane("YZ"), Ok(3));
        assert_eq!(resolve_plane("2"), Ok(2));
        assert!(resolve_plane("0").is_err());
        assert!(resolve_plane("Diagonal").is_err());
    }

    #[test]
    fn close_promotes_profile() {
        let mut engine = part();
        let mut state = SketchState::new();
        let mut sketches = SketchManager::new(&mut engine, &mut state);

        sketches.create_sketch("Front").unwrap();
        assert_eq!(sketches.draw_rectangle(0.0, 0.0, 0.1, 0.05), Ok(4));
        let closed = sketches.close_sketch().unwrap();
        assert_eq!(closed.elements, 4);

        assert_eq!(state.active_profile(), Some(&closed.profile));
        assert_eq!(state.accumulated_profiles(), &[closed.profile]);
    }

    #[test]
    fn axis_is_set_before_close() {
        let mut engine = part();
        let mut state = SketchState::new();
        let mut sketches = SketchManager::new(&mut engine, &mut state);

        sketches.create_sketch("Top").unwrap();
        sketches.draw_circle(0.05, 0.0, 0.01).unwrap();
        let axis = sketches.set_axis_of_revolution(0.0, 0.0, 0.0, 1.0).unwrap();

        let summary = sketches.state_summary();
        assert_eq!(summary.active_axis, Some(axis));
        assert_eq!(summary.active_profile, None);

        sketches.close_sketch().unwrap();
        assert_eq!(state.active_axis(), Some(&axis));
        assert!(state.active_profile().is_some());
    }

    #[test]
    fn axis_requires_open_sketch() {
        let mut engine = part();
        let mut state = SketchState::new();
        let mut sketches = SketchManager::new(&mut engine, &mut state);

        let err = sketches
            .set_axis_of_revolution(0.0, 0.0, 0.0, 1.0)
            .unwrap_err();
        assert_eq!(err.code(), "NO_OPEN_SKETCH");
        assert!(state.is_empty());
    }

    #[test]
    fn degenerate_axis_rejected() {
        let mut engine = part();
        let mut state = SketchState::new();
        let mut sketches = SketchManager::new(&mut engine, &mut state);
        sketches.create_sketch("Top").unwrap();

        let err = sketches
            .set_axis_of_revolution(1.0, 1.0, 1.0, 1.0)
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMETER");
        assert_eq!(state.active_axis(), None);
    }

    #[test]
    fn failed_close_promotes_nothing() {
        let mut engine = part();
        let mut state = SketchState::new();
        let mut sketches = SketchManager::new(&mut engine, &mut state);

        let err = sketches.close_sketch().unwrap_err();
        assert_eq!(err, SketchError::Engine(CadError::NoOpenSketch));
        assert!(state.is_empty());
    }

    #[test]
    fn each_close_appends() {
        let mut engine = part();
        let mut state = SketchState::new();
        let mut sketches = SketchManager::new(&mut engine, &mut state);

        let mut profiles = Vec::new();
        for plane in ["Top", "Front", "Right"] {
            sketches.create_sketch(plane).unwrap();
            sketches.draw_circle(0.0, 0.0, 0.01).unwrap();
            profiles.push(sketches.close_sketch().unwrap().profile);
        }

        assert_eq!(state.accumulated_profiles(), profiles.as_slice());
        assert_eq!(state.active_profile(), profiles.last());
    }

    #[test]
    fn shape_validation() {
        let mut engine = part();
        let mut state = SketchState::new();
        let mut sketches = SketchManager::new(&mut engine, &mut state);
        sketches.create_sketch("Top").unwrap();

        assert!(sketches.draw_circle(0.0, 0.0, -1.0).is_err());
        assert!(sketches.draw_circle(f64::NAN, 0.0, 1.0).is_err());
        assert!(sketches.draw_polygon(0.0, 0.0, 1.0, 2).is_err());
        assert!(sketches.draw_spline(&[[0.0, 0.0]]).is_err());
        assert!(sketches.draw_ellipse(0.0, 0.0, 1.0, 2.0, 0.0).is_err());
        assert!(sketches.draw_rectangle(0.0, 0.0, 0.0, 1.0).is_err());
        assert!(sketches.draw_arc(0.0, 0.0, 1.0, 90.0, 90.0).is_err());

        assert_eq!(sketches.draw_polygon(0.0, 0.0, 1.0, 6), Ok(6));
        assert_eq!(sketches.draw_arc(0.0, 0.0, 1.0, 0.0, 90.0), Ok(7));
        assert_eq!(sketches.draw_spline(&[[0.0, 0.0], [1.0, 1.0], [2.0, 0.0]]), Ok(8));
        assert_eq!(sketches.draw_ellipse(0.0, 0.0, 2.0, 1.0, 30.0), Ok(9));
        assert_eq!(sketches.draw_point(0.5, 0.5), Ok(10));
        assert_eq!(sketches.draw_line(0.0, 0.0, 1.0, 0.0), Ok(11));
    }

    #[test]
    fn drawing_without_sketch_fails() {
        let mut engine = part();
        let mut state = SketchState::new();
        let mut sketches = SketchManager::new(&mut engine, &mut state);
        assert_eq!(
            sketches.draw_line(0.0, 0.0, 1.0, 1.0),
            Err(SketchError::Engine(CadError::NoOpenSketch))
        );
    }
}
