//! User-defined patterns. Each accumulated profile marks one occurrence of
//! the seed feature, in promotion order.

use super::{FeatureError, FeatureManager, FeatureResult};
use crate::cad::{FeatureInfo, FeatureRequest};

impl FeatureManager<'_> {
    /// Copies `seed_feature` to every accumulated profile.
    ///
    /// # Errors
    ///
    /// Fails with no accumulated profiles, an empty seed name, or when the
    /// seed feature does not exist.
    pub fn user_defined_pattern(&mut self, seed_feature: &str) -> FeatureResult<FeatureInfo> {
        let occurrences = self.state.require_profiles("User-defined pattern", 1)?;
        if seed_feature.trim().is_empty() {
            return Err(FeatureError::invalid(
                "feature_name",
                "seed feature name must not be empty",
            ));
        }

        let request = FeatureRequest::UserDefinedPattern {
            seed_feature: seed_feature.to_string(),
            occurrences,
        };
        self.commit(&request)
    }
}
