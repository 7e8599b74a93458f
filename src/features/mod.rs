//! Feature creation from consumed profile state.
//!
//! Every creator follows the same protocol:
//!
//! 1. Read the profile(s) and, for revolve-family features, the axis through
//!    the `require_*` helpers on [`SketchState`].
//! 2. Fail with a [`ProfileError`] if anything is missing. The engine is not
//!    called.
//! 3. Validate parameters and build a [`FeatureRequest`].
//! 4. Hand the request to the engine.
//! 5. On success clear the accumulated profiles (never the axis). On failure
//!    leave the state as it was so the caller can fix the cause and retry.
//!
//! Steps 4 and 5 live in [`FeatureManager::commit`]; the submodules only do
//! the first three.

mod assembly;
mod extrude;
mod loft_sweep;
mod pattern;
mod revolve;

use thiserror::Error;
use tracing::info;

use crate::cad::{CadEngine, CadError, CadResult, FeatureInfo, FeatureRequest};
use crate::sketch::{ProfileError, SketchState};

/// Errors from feature creation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Required profile state is missing or unusable.
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// The engine rejected the request.
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

impl FeatureError {
    pub(crate) fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Profile(e) => e.code(),
            Self::Engine(e) => e.code(),
            Self::InvalidParameter { .. } => "INVALID_PARAMETER",
        }
    }
}

/// Result type for feature creation.
pub type FeatureResult<T> = Result<T, FeatureError>;

fn positive(name: &'static str, value: f64) -> FeatureResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(FeatureError::invalid(name, "must be a positive number"))
    }
}

fn wall_thickness(value: Option<f64>) -> FeatureResult<Option<f64>> {
    value.map(|t| positive("wall_thickness", t)).transpose()
}

/// Converts a sweep angle in degrees to radians. Accepts (0, 360].
fn angle_radians(name: &'static str, degrees: f64) -> FeatureResult<f64> {
    if degrees.is_finite() && degrees > 0.0 && degrees <= 360.0 {
        Ok(degrees.to_radians())
    } else {
        Err(FeatureError::invalid(
            name,
            "must be greater than 0 and at most 360 degrees",
        ))
    }
}

/// Feature operations bound to one engine and one [`SketchState`].
pub struct FeatureManager<'a> {
    engine: &'a mut dyn CadEngine,
    state: &'a mut SketchState,
}

impl<'a> FeatureManager<'a> {
    /// Binds the manager to a session's engine and state.
    pub fn new(engine: &'a mut dyn CadEngine, state: &'a mut SketchState) -> Self {
        Self { engine, state }
    }

    /// Builds `request` and consumes the accumulated profiles on success.
    ///
    /// # Errors
    ///
    /// Returns the engine's error unchanged. The sketch state is not touched
    /// in that case.
    pub fn commit(&mut self, request: &FeatureRequest) -> FeatureResult<FeatureInfo> {
        let feature = self.engine.add_feature(request)?;
        self.state.clear_accumulated_profiles();
        info!(
            feature = %feature.name,
            kind = %feature.kind,
            profiles = feature.profiles,
            "Feature created, accumulated profiles consumed"
        );
        Ok(feature)
    }

    /// Lists features of the active document.
    ///
    /// # Errors
    ///
    /// Fails if no document is active.
    pub fn list_features(&self) -> CadResult<Vec<FeatureInfo>> {
        self.engine.features()
    }
}
