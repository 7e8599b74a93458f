//! Extruded protrusions and cutouts. These consume the active profile.

use super::{positive, wall_thickness, FeatureManager, FeatureResult};
use crate::cad::model::ProfileSide;
use crate::cad::{FeatureInfo, FeatureOperation, FeatureRequest};

impl FeatureManager<'_> {
    fn extrude_active(
        &mut self,
        distance: f64,
        side: ProfileSide,
        operation: FeatureOperation,
        wall: Option<f64>,
    ) -> FeatureResult<FeatureInfo> {
        let profile = self.state.require_active_profile()?;
        let request = FeatureRequest::Extrude {
            profile,
            side,
            distance: positive("distance", distance)?,
            operation,
            wall_thickness: wall_thickness(wall)?,
        };
        self.commit(&request)
    }

    /// Extrudes the active profile by `distance` metres.
    ///
    /// # Errors
    ///
    /// Fails without an active profile or with a non-positive distance.
    pub fn extrude(&mut self, distance: f64, side: ProfileSide) -> FeatureResult<FeatureInfo> {
        self.extrude_active(distance, side, FeatureOperation::Add, None)
    }

    /// Cuts the active profile into existing material.
    ///
    /// # Errors
    ///
    /// Fails without an active profile or when there is no base feature.
    pub fn extruded_cutout(
        &mut self,
        distance: f64,
        side: ProfileSide,
    ) -> FeatureResult<FeatureInfo> {
        self.extrude_active(distance, side, FeatureOperation::Cut, None)
    }

    /// Extrudes the active profile as a hollow shell.
    ///
    /// # Errors
    ///
    /// Fails without an active profile or with a non-positive distance or
    /// thickness.
    pub fn extrude_thin_wall(
        &mut self,
        distance: f64,
        thickness: f64,
        side: ProfileSide,
    ) -> FeatureResult<FeatureInfo> {
        self.extrude_active(distance, side, FeatureOperation::Add, Some(thickness))
    }
}
