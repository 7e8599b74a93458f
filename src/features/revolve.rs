//! Revolve-family features: revolved protrusions, cutouts and surfaces, and
//! helical protrusions and cutouts.
//!
//! All of them need the active profile *and* the axis of revolution. The two
//! are reported separately so a caller knows whether to sketch again or to
//! call `set_axis_of_revolution`. Only the profile is consumed; the axis stays
//! set for the next revolve.

use super::{angle_radians, positive, wall_thickness, FeatureError, FeatureManager, FeatureResult};
use crate::cad::model::HelixHand;
use crate::cad::{FeatureInfo, FeatureOperation, FeatureRequest};

impl FeatureManager<'_> {
    fn revolve_active(
        &mut self,
        angle: f64,
        operation: FeatureOperation,
        wall: Option<f64>,
    ) -> FeatureResult<FeatureInfo> {
        let (profile, axis) = self.state.require_revolution()?;
        let request = FeatureRequest::Revolve {
            profile,
            axis,
            angle: angle_radians("angle", angle)?,
            operation,
            wall_thickness: wall_thickness(wall)?,
        };
        self.commit(&request)
    }

    /// Revolves the active profile about the active axis by `angle` degrees.
    ///
    /// # Errors
    ///
    /// Fails without an active profile or axis, or with an angle outside
    /// (0, 360].
    pub fn revolve(&mut self, angle: f64) -> FeatureResult<FeatureInfo> {
        self.revolve_active(angle, FeatureOperation::Add, None)
    }

    /// Revolved cutout.
    ///
    /// # Errors
    ///
    /// As [`Self::revolve`], and fails when there is no base feature.
    pub fn revolved_cutout(&mut self, angle: f64) -> FeatureResult<FeatureInfo> {
        self.revolve_active(angle, FeatureOperation::Cut, None)
    }

    /// Revolved protrusion with a hollow wall.
    ///
    /// # Errors
    ///
    /// As [`Self::revolve`], and fails with a non-positive thickness.
    pub fn revolve_thin_wall(&mut self, angle: f64, thickness: f64) -> FeatureResult<FeatureInfo> {
        self.revolve_active(angle, FeatureOperation::Add, Some(thickness))
    }

    /// Revolved construction surface.
    ///
    /// # Errors
    ///
    /// As [`Self::revolve`].
    pub fn revolved_surface(&mut self, angle: f64) -> FeatureResult<FeatureInfo> {
        let (profile, axis) = self.state.require_revolution()?;
        let request = FeatureRequest::RevolvedSurface {
            profile,
            axis,
            angle: angle_radians("angle", angle)?,
        };
        self.commit(&request)
    }

    /// Sweeps the active profile along a helix around the active axis.
    ///
    /// `revolutions` defaults to `height / pitch`.
    ///
    /// # Errors
    ///
    /// Fails without an active profile or axis, or when pitch, height,
    /// revolutions or thickness is not positive.
    pub fn helix(
        &mut self,
        pitch: f64,
        height: f64,
        revolutions: Option<f64>,
        hand: HelixHand,
        wall: Option<f64>,
    ) -> FeatureResult<FeatureInfo> {
        let (profile, axis) = self.state.require_revolution()?;
        let (pitch, height, revolutions) = helix_turns(pitch, height, revolutions)?;
        let request = FeatureRequest::Helix {
            profile,
            axis,
            pitch,
            height,
            revolutions,
            hand,
            operation: FeatureOperation::Add,
            wall_thickness: wall_thickness(wall)?,
        };
        self.commit(&request)
    }

    /// Removes material along a helix around the active axis.
    ///
    /// # Errors
    ///
    /// As [`Self::helix`], and fails when there is no base feature.
    pub fn helix_cutout(
        &mut self,
        pitch: f64,
        height: f64,
        revolutions: Option<f64>,
        hand: HelixHand,
    ) -> FeatureResult<FeatureInfo> {
        let (profile, axis) = self.state.require_revolution()?;
        let (pitch, height, revolutions) = helix_turns(pitch, height, revolutions)?;
        let request = FeatureRequest::Helix {
            profile,
            axis,
            pitch,
            height,
            revolutions,
            hand,
            operation: FeatureOperation::Cut,
            wall_thickness: None,
        };
        self.commit(&request)
    }
}

/// Validated `(pitch, height, revolutions)`; revolutions default to
/// `height / pitch`.
fn helix_turns(
    pitch: f64,
    height: f64,
    revolutions: Option<f64>,
) -> FeatureResult<(f64, f64, f64)> {
    let pitch = positive("pitch", pitch)?;
    let height = positive("height", height)?;
    let revolutions = match revolutions {
        Some(r) => positive("revolutions", r)?,
        None => height / pitch,
    };
    if !revolutions.is_finite() {
        return Err(FeatureError::invalid(
            "revolutions",
            "height / pitch does not give a finite number of turns",
        ));
    }
    Ok((pitch, height, revolutions))
}
