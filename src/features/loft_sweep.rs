//! Lofts and sweeps, as protrusions or cutouts. These consume the whole
//! accumulated profile sequence.
//!
//! Roles are assigned by position. A plain loft uses every accumulated
//! profile as a cross-section in promotion order unless `profile_indices`
//! picks a subset. A guided loft needs `guide_profile_indices`; the rest are
//! cross-sections. A sweep takes one path (index 0 unless told otherwise)
//! and uses the others as cross-sections.

use super::{wall_thickness, FeatureManager, FeatureResult};
use crate::cad::{FeatureInfo, FeatureOperation, FeatureRequest, Profile};
use crate::sketch::ProfileError;

const LOFT: &str = "Loft";
const LOFT_SELECTED: &str = "Loft (selected profiles)";
const LOFTED_CUTOUT: &str = "Lofted cutout";
const LOFTED_CUTOUT_SELECTED: &str = "Lofted cutout (selected profiles)";
const GUIDED_LOFT: &str = "Loft with guides";
const GUIDED_LOFT_SECTIONS: &str = "Loft with guides (cross-sections)";
const SWEEP: &str = "Sweep";
const SWEPT_CUTOUT: &str = "Swept cutout";

/// `feature` names what was counted, so a short selection is not reported
/// as a short accumulation.
fn require_sections(feature: &'static str, sections: &[Profile]) -> Result<(), ProfileError> {
    if sections.len() < 2 {
        return Err(ProfileError::InsufficientProfiles {
            feature,
            required: 2,
            available: sections.len(),
        });
    }
    Ok(())
}

impl FeatureManager<'_> {
    fn loft_sections(
        &mut self,
        operation: FeatureOperation,
        profile_indices: Option<&[usize]>,
        wall: Option<f64>,
    ) -> FeatureResult<FeatureInfo> {
        let (feature, selected) = match operation {
            FeatureOperation::Add => (LOFT, LOFT_SELECTED),
            FeatureOperation::Cut => (LOFTED_CUTOUT, LOFTED_CUTOUT_SELECTED),
        };
        let all = self.state.require_profiles(feature, 2)?;
        let sections = match profile_indices {
            Some(indices) => {
                let sections = self.state.select_profiles(indices)?;
                require_sections(selected, &sections)?;
                sections
            }
            None => all,
        };

        let request = FeatureRequest::Loft {
            sections,
            guides: Vec::new(),
            operation,
            wall_thickness: wall_thickness(wall)?,
        };
        self.commit(&request)
    }

    fn sweep_along_path(
        &mut self,
        operation: FeatureOperation,
        path_profile_index: Option<usize>,
        wall: Option<f64>,
    ) -> FeatureResult<FeatureInfo> {
        let feature = match operation {
            FeatureOperation::Add => SWEEP,
            FeatureOperation::Cut => SWEPT_CUTOUT,
        };
        let (path, sections) = self
            .state
            .require_path_and_sections(feature, path_profile_index)?;
        let request = FeatureRequest::Sweep {
            path,
            sections,
            operation,
            wall_thickness: wall_thickness(wall)?,
        };
        self.commit(&request)
    }

    /// Lofts through the accumulated profiles.
    ///
    /// # Errors
    ///
    /// Fails with fewer than two (selected) profiles, a bad index, or a
    /// non-positive wall thickness.
    pub fn loft(
        &mut self,
        profile_indices: Option<&[usize]>,
        wall: Option<f64>,
    ) -> FeatureResult<FeatureInfo> {
        self.loft_sections(FeatureOperation::Add, profile_indices, wall)
    }

    /// Removes material lofted through the accumulated profiles.
    ///
    /// # Errors
    ///
    /// As [`Self::loft`], and fails when there is no base feature.
    pub fn lofted_cutout(
        &mut self,
        profile_indices: Option<&[usize]>,
    ) -> FeatureResult<FeatureInfo> {
        self.loft_sections(FeatureOperation::Cut, profile_indices, None)
    }

    /// Lofts through cross-sections constrained by guide curves.
    ///
    /// Without `profile_indices` every accumulated profile that is not a
    /// guide becomes a cross-section.
    ///
    /// # Errors
    ///
    /// Fails without guides, with fewer than two cross-sections, or when an
    /// index is out of range or used for both roles.
    pub fn loft_with_guides(
        &mut self,
        guide_profile_indices: Option<&[usize]>,
        profile_indices: Option<&[usize]>,
    ) -> FeatureResult<FeatureInfo> {
        let guide_indices = guide_profile_indices
            .filter(|g| !g.is_empty())
            .ok_or(ProfileError::GuideCurvesRequired)?;
        let all = self.state.require_profiles(GUIDED_LOFT, 3)?;
        let guides = self.state.select_profiles(guide_indices)?;

        let section_indices: Vec<usize> = match profile_indices {
            Some(indices) => {
                if let Some(&index) = indices.iter().find(|i| guide_indices.contains(i)) {
                    return Err(ProfileError::DuplicateProfileIndex { index }.into());
                }
                indices.to_vec()
            }
            None => (0..all.len())
                .filter(|i| !guide_indices.contains(i))
                .collect(),
        };
        let sections = self.state.select_profiles(&section_indices)?;
        require_sections(GUIDED_LOFT_SECTIONS, &sections)?;

        let request = FeatureRequest::Loft {
            sections,
            guides,
            operation: FeatureOperation::Add,
            wall_thickness: None,
        };
        self.commit(&request)
    }

    /// Sweeps cross-sections along a path profile.
    ///
    /// # Errors
    ///
    /// Fails with fewer than two accumulated profiles, a path index out of
    /// range, or a non-positive wall thickness.
    pub fn sweep(
        &mut self,
        path_profile_index: Option<usize>,
        wall: Option<f64>,
    ) -> FeatureResult<FeatureInfo> {
        self.sweep_along_path(FeatureOperation::Add, path_profile_index, wall)
    }

    /// Removes material swept along a path profile.
    ///
    /// # Errors
    ///
    /// As [`Self::sweep`], and fails when there is no base feature.
    pub fn swept_cutout(
        &mut self,
        path_profile_index: Option<usize>,
    ) -> FeatureResult<FeatureInfo> {
        self.sweep_along_path(FeatureOperation::Cut, path_profile_index, None)
    }
}
