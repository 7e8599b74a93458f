//! Assembly-level features that cut or add across placed occurrences.
//!
//! These read the accumulated sequence, not just the active profile, because
//! an assembly feature may span several sketches.

use super::{angle_radians, positive, FeatureError, FeatureManager, FeatureResult};
use crate::cad::model::{AssemblyExtent, ProfileSide};
use crate::cad::{FeatureInfo, FeatureRequest};

fn require_scope(scope: &[usize]) -> FeatureResult<Vec<usize>> {
    if scope.is_empty() {
        return Err(FeatureError::invalid(
            "scope_parts",
            "at least one occurrence index is required",
        ));
    }
    Ok(scope.to_vec())
}

impl FeatureManager<'_> {
    /// Extruded cutout through the occurrences in `scope`.
    ///
    /// # Errors
    ///
    /// Fails with no accumulated profiles, an empty scope, a non-positive
    /// finite depth, or an occurrence index out of range.
    pub fn assembly_extruded_cutout(
        &mut self,
        scope: &[usize],
        extent: AssemblyExtent,
        side: ProfileSide,
    ) -> FeatureResult<FeatureInfo> {
        let profiles = self
            .state
            .require_profiles("Assembly extruded cutout", 1)?;
        let scope = require_scope(scope)?;
        if let AssemblyExtent::Finite(depth) = extent {
            positive("distance", depth)?;
        }

        let request = FeatureRequest::AssemblyExtrudedCutout {
            scope,
            profiles,
            extent,
            side,
        };
        self.commit(&request)
    }

    /// Revolved cutout through the occurrences in `scope`.
    ///
    /// # Errors
    ///
    /// Fails with no accumulated profiles or axis, an empty scope, or an
    /// angle outside (0, 360].
    pub fn assembly_revolved_cutout(
        &mut self,
        scope: &[usize],
        angle: f64,
    ) -> FeatureResult<FeatureInfo> {
        let profiles = self
            .state
            .require_profiles("Assembly revolved cutout", 1)?;
        let axis = self.state.require_active_axis()?;
        let scope = require_scope(scope)?;

        let request = FeatureRequest::AssemblyRevolvedCutout {
            scope,
            profiles,
            axis,
            angle: angle_radians("angle", angle)?,
        };
        self.commit(&request)
    }

    /// Swept protrusion. The first `num_trace_curves` accumulated profiles
    /// are trace curves and the next `num_cross_sections` are cross-sections.
    ///
    /// # Errors
    ///
    /// Fails if either count is zero or fewer profiles are accumulated than
    /// the two counts together.
    pub fn assembly_swept_protrusion(
        &mut self,
        num_trace_curves: usize,
        num_cross_sections: usize,
    ) -> FeatureResult<FeatureInfo> {
        if num_trace_curves == 0 {
            return Err(FeatureError::invalid("num_trace_curves", "must be at least 1"));
        }
        if num_cross_sections == 0 {
            return Err(FeatureError::invalid("num_cross_sections", "must be at least 1"));
        }
        let required = num_trace_curves
            .checked_add(num_cross_sections)
            .ok_or_else(|| {
                FeatureError::invalid("num_cross_sections", "too many profiles requested")
            })?;
        let mut profiles = self
            .state
            .require_profiles("Assembly swept protrusion", required)?;

        profiles.truncate(required);
        let sections = profiles.split_off(num_trace_curves);

        let request = FeatureRequest::AssemblySweptProtrusion {
            trace_curves: profiles,
            sections,
        };
        self.commit(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cad::{CadEngine, DocumentKind, MemoryEngine};
    use crate::sketch::{ProfileError, SketchManager, SketchState};

    struct Fixture {
        _dir: tempfile::TempDir,
        engine: MemoryEngine,
        state: SketchState,
    }

    fn assembly(components: usize, profiles: usize, axis: bool) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let part = dir.path().join("plate.par");
        std::fs::write(&part, b"").unwrap();

        let mut engine = MemoryEngine::new();
        engine.create_document(DocumentKind::Assembly, None).unwrap();
        for _ in 0..components {
            engine.place_component(&part).unwrap();
        }

        let mut state = SketchState::new();
        let mut sketches = SketchManager::new(&mut engine, &mut state);
        for _ in 0..profiles {
            sketches.create_sketch("Front").unwrap();
            sketches.draw_circle(0.0, 0.0, 0.003).unwrap();
            if axis {
                sketches.set_axis_of_revolution(0.01, 0.0, 0.01, 1.0).unwrap();
            }
            sketches.close_sketch().unwrap();
        }

        Fixture {
            _dir: dir,
            engine,
            state,
        }
    }

    #[test]
    fn extruded_cutout_across_scope() {
        let mut fx = assembly(2, 2, false);
        let mut features = FeatureManager::new(&mut fx.engine, &mut fx.state);

        let cut = features
            .assembly_extruded_cutout(&[0, 1], AssemblyExtent::ThroughAll, ProfileSide::Normal)
            .unwrap();
        assert_eq!(cut.kind, "AssemblyCutout");
        assert_eq!(cut.profiles, 2);
        assert!(fx.state.accumulated_profiles().is_empty());
    }

    #[test]
    fn extruded_cutout_validation() {
        let mut fx = assembly(1, 1, false);
        let before = fx.state.clone();
        let mut features = FeatureManager::new(&mut fx.engine, &mut fx.state);

        assert_eq!(
            features
                .assembly_extruded_cutout(&[], AssemblyExtent::ThroughAll, ProfileSide::Normal)
                .unwrap_err()
                .code(),
            "INVALID_PARAMETER"
        );
        assert_eq!(
            features
                .assembly_extruded_cutout(&[0], AssemblyExtent::Finite(0.0), ProfileSide::Normal)
                .unwrap_err()
                .code(),
            "INVALID_PARAMETER"
        );
        assert_eq!(
            features
                .assembly_extruded_cutout(&[4], AssemblyExtent::Finite(0.01), ProfileSide::Normal)
                .unwrap_err()
                .code(),
            "INVALID_OCCURRENCE"
        );
        assert_eq!(fx.state, before);
    }

    #[test]
    fn revolved_cutout_needs_axis() {
        let mut fx = assembly(1, 1, false);
        let mut features = FeatureManager::new(&mut fx.engine, &mut fx.state);
        assert_eq!(
            features.assembly_revolved_cutout(&[0], 360.0).unwrap_err().code(),
            "NO_AXIS_OF_REVOLUTION"
        );

        let mut fx = assembly(1, 1, true);
        let mut features = FeatureManager::new(&mut fx.engine, &mut fx.state);
        features.assembly_revolved_cutout(&[0], 360.0).unwrap();
        assert!(fx.state.active_profile().is_none());
        assert!(fx.state.active_axis().is_some());
    }

    #[test]
    fn swept_protrusion_splits_by_count() {
        let mut fx = assembly(0, 2, false);
        let mut features = FeatureManager::new(&mut fx.engine, &mut fx.state);
        assert_eq!(
            features.assembly_swept_protrusion(2, 1).unwrap_err(),
            FeatureError::Profile(ProfileError::InsufficientProfiles {
                feature: "Assembly swept protrusion",
                required: 3,
                available: 2,
            })
        );
        assert_eq!(
            features.assembly_swept_protrusion(0, 1).unwrap_err().code(),
            "INVALID_PARAMETER"
        );

        let sweep = features.assembly_swept_protrusion(1, 1).unwrap();
        assert_eq!(sweep.profiles, 2);
        assert!(fx.state.is_empty());
    }

    #[test]
    fn swept_protrusion_rejects_overflowing_counts() {
        let mut fx = assembly(0, 0, false);
        let mut features = FeatureManager::new(&mut fx.engine, &mut fx.state);
        assert_eq!(
            features
                .assembly_swept_protrusion(usize::MAX, 1)
                .unwrap_err()
                .code(),
            "INVALID_PARAMETER"
        );

        let mut fx = assembly(0, 2, false);
        let before = fx.state.clone();
        let mut features = FeatureManager::new(&mut fx.engine, &mut fx.state);
        assert_eq!(
            features
                .assembly_swept_protrusion(1, usize::MAX)
                .unwrap_err()
                .code(),
            "INVALID_PARAMETER"
        );
        assert_eq!(
            features
                .assembly_swept_protrusion(usize::MAX / 2 + 1, usize::MAX / 2)
                .unwrap_err()
                .code(),
            "INSUFFICIENT_PROFILES"
        );
        assert_eq!(fx.state, before);
    }

    #[test]
    fn assembly_features_rejected_in_parts() {
        let mut engine = MemoryEngine::new();
        engine.create_document(DocumentKind::Part, None).unwrap();
        let mut state = SketchState::new();
        let mut sketches = SketchManager::new(&mut engine, &mut state);
        sketches.create_sketch("Top").unwrap();
        sketches.draw_circle(0.0, 0.0, 0.01).unwrap();
        sketches.close_sketch().unwrap();

        let mut features = FeatureManager::new(&mut engine, &mut state);
        assert_eq!(
            features
                .assembly_extruded_cutout(&[0], AssemblyExtent::ThroughAll, ProfileSide::Normal)
                .unwrap_err()
                .code(),
            "WRONG_DOCUMENT_TYPE"
        );
        assert_eq!(state.accumulated_profiles().len(), 1);
    }
}
