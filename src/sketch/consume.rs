//! Read side of the profile consumption contract.
//!
//! Feature creators never read [`SketchState`] directly. They go through the
//! `require_*` helpers here, which turn an empty slot into a
//! [`ProfileError`] before any engine call is attempted. Clearing after a
//! successful feature is the caller's job (see
//! [`crate::features::FeatureManager`]).

use thiserror::Error;

use super::state::SketchState;

/// Missing or unusable profile state.
///
/// Each variant names a different remedy: a missing profile means a sketch
/// has to be drawn and closed, a missing axis means
/// `set_axis_of_revolution` has to be called.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// A single-profile feature was requested with no promoted profile.
    #[error("No active sketch profile. Create and close a sketch first.")]
    NoActiveProfile,

    /// A multi-profile feature was requested with nothing accumulated.
    #[error("No accumulated profiles. Create and close one or more sketches first.")]
    NoAccumulatedProfiles,

    /// Fewer profiles are accumulated than the feature needs.
    #[error(
        "{feature} requires at least {required} profiles, got {available}. \
         Create and close more sketches first."
    )]
    InsufficientProfiles {
        /// Feature being created.
        feature: &'static str,
        /// Minimum number of profiles.
        required: usize,
        /// Number of profiles available.
        available: usize,
    },

    /// A revolve-family feature was requested with no axis set.
    #[error("No axis of revolution set. Use set_axis_of_revolution() before closing the sketch.")]
    NoAxisOfRevolution,

    /// A caller-supplied index does not address an accumulated profile.
    #[error("Profile index {index} is out of range ({available} profiles accumulated)")]
    ProfileIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of profiles available.
        available: usize,
    },

    /// The same accumulated profile was selected twice.
    #[error("Profile index {index} was selected more than once")]
    DuplicateProfileIndex {
        /// Repeated index.
        index: usize,
    },

    /// A guided loft was requested without guide curves.
    #[error(
        "guide_profile_indices is required for loft with guides. \
         Specify which accumulated profile indices are guide curves."
    )]
    GuideCurvesRequired,
}

impl ProfileError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoActiveProfile => "NO_ACTIVE_PROFILE",
            Self::NoAccumulatedProfiles => "NO_ACCUMULATED_PROFILES",
            Self::InsufficientProfiles { .. } => "INSUFFICIENT_PROFILES",
            Self::NoAxisOfRevolution => "NO_AXIS_OF_REVOLUTION",
            Self::ProfileIndexOutOfRange { .. } => "PROFILE_INDEX_OUT_OF_RANGE",
            Self::DuplicateProfileIndex { .. } => "DUPLICATE_PROFILE_INDEX",
            Self::GuideCurvesRequired => "GUIDE_CURVES_REQUIRED",
        }
    }
}

impl<P: Clone, A: Clone> SketchState<P, A> {
    /// Returns the active profile or [`ProfileError::NoActiveProfile`].
    ///
    /// # Errors
    ///
    /// Fails if no profile has been promoted since the last clear.
    pub fn require_active_profile(&self) -> Result<P, ProfileError> {
        self.active_profile()
            .cloned()
            .ok_or(ProfileError::NoActiveProfile)
    }

    /// Returns the axis of revolution or [`ProfileError::NoAxisOfRevolution`].
    ///
    /// # Errors
    ///
    /// Fails if no axis is set.
    pub fn require_active_axis(&self) -> Result<A, ProfileError> {
        self.active_axis()
            .cloned()
            .ok_or(ProfileError::NoAxisOfRevolution)
    }

    /// Returns the active profile together with the axis of revolution.
    ///
    /// The profile is checked first; each missing piece reports its own error.
    ///
    /// # Errors
    ///
    /// Fails with [`ProfileError::NoActiveProfile`] or
    /// [`ProfileError::NoAxisOfRevolution`].
    pub fn require_revolution(&self) -> Result<(P, A), ProfileError> {
        let profile = self.require_active_profile()?;
        let axis = self.require_active_axis()?;
        Ok((profile, axis))
    }

    /// Returns all accumulated profiles, requiring at least `required`.
    ///
    /// Every consumer needs at least one profile, so a `required` of 0 is
    /// treated as 1.
    ///
    /// # Errors
    ///
    /// Fails with [`ProfileError::NoAccumulatedProfiles`] when nothing is
    /// accumulated, or [`ProfileError::InsufficientProfiles`] when too few are.
    pub fn require_profiles(
        &self,
        feature: &'static str,
        required: usize,
    ) -> Result<Vec<P>, ProfileError> {
        let required = required.max(1);
        let available = self.accumulated_profiles().len();
        if available == 0 {
            return Err(ProfileError::NoAccumulatedProfiles);
        }
        if available < required {
            return Err(ProfileError::InsufficientProfiles {
                feature,
                required,
                available,
            });
        }
        Ok(self.accumulated_profiles().to_vec())
    }

    /// Picks accumulated profiles by index, in the order given.
    ///
    /// # Errors
    ///
    /// Fails if an index is out of range or repeated.
    pub fn select_profiles(&self, indices: &[usize]) -> Result<Vec<P>, ProfileError> {
        let all = self.accumulated_profiles();
        let mut seen = Vec::with_capacity(indices.len());
        indices
            .iter()
            .map(|&index| {
                if seen.contains(&index) {
                    return Err(ProfileError::DuplicateProfileIndex { index });
                }
                seen.push(index);
                all.get(index)
                    .cloned()
                    .ok_or(ProfileError::ProfileIndexOutOfRange {
                        index,
                        available: all.len(),
                    })
            })
            .collect()
    }

    /// Splits the accumulated profiles into one path and the remaining
    /// cross-sections.
    ///
    /// `path_index` defaults to 0. The cross-sections keep promotion order.
    ///
    /// # Errors
    ///
    /// Fails if fewer than two profiles are accumulated or the path index is
    /// out of range.
    pub fn require_path_and_sections(
        &self,
        feature: &'static str,
        path_index: Option<usize>,
    ) -> Result<(P, Vec<P>), ProfileError> {
        let all = self.require_profiles(feature, 2)?;
        let path_index = path_index.unwrap_or(0);
        let path = all
            .get(path_index)
            .cloned()
            .ok_or(ProfileError::ProfileIndexOutOfRange {
                index: path_index,
                available: all.len(),
            })?;
        let sections = all
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i != path_index)
            .map(|(_, p)| p)
            .collect();
        Ok((path, sections))
    }
}
