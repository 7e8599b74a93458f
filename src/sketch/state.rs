//! Profile state shared between sketching and feature creation.
//!
//! Closing a sketch *promotes* its profile: the profile becomes the active
//! one and is appended to the accumulated sequence. Feature creators read
//! either the active profile (extrude, revolve, helix) or the whole
//! accumulated sequence (loft, sweep, patterns), and clear what they used
//! once the feature exists.
//!
//! # Invalidation
//!
//! There are two clears with different scope:
//!
//! - [`SketchState::clear_accumulated_profiles`] drops profiles only. The
//!   axis of revolution survives so several revolve-family features can
//!   share one axis across sequentially drawn profiles.
//! - [`SketchState::clear_state`] drops everything. It runs on every
//!   document create/open/close/activate so no handle from a previously
//!   active document can reach a feature call.

use serde::Serialize;

/// Coordinator for the current profile(s) and axis of revolution.
///
/// Profiles and axes are opaque: the state never inspects them, so any
/// cloneable handle type works. The defaults are the engine handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SketchState<P = crate::cad::Profile, A = crate::cad::RefAxis> {
    /// Profiles promoted since the last clear, in promotion order.
    accumulated: Vec<P>,
    /// Axis of revolution, independent of the profiles.
    axis: Option<A>,
}

impl<P, A> Default for SketchState<P, A> {
    fn default() -> Self {
        Self {
            accumulated: Vec::new(),
            axis: None,
        }
    }
}

impl<P, A> SketchState<P, A> {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Promotes a freshly closed profile.
    ///
    /// The profile is appended to the accumulated sequence and becomes the
    /// active profile.
    pub fn promote_profile(&mut self, profile: P) {
        self.accumulated.push(profile);
    }

    /// Sets the axis of revolution.
    ///
    /// May be called before or after the profile it belongs to is promoted.
    pub fn set_active_axis(&mut self, axis: A) {
        self.axis = Some(axis);
    }

    /// Returns the active profile, if any.
    ///
    /// The active profile is always the last accumulated one, so the two
    /// can never diverge.
    #[must_use]
    pub fn active_profile(&self) -> Option<&P> {
        self.accumulated.last()
    }

    /// Returns every accumulated profile in promotion order.
    #[must_use]
    pub fn accumulated_profiles(&self) -> &[P] {
        &self.accumulated
    }

    /// Returns the axis of revolution, if any.
    #[must_use]
    pub const fn active_axis(&self) -> Option<&A> {
        self.axis.as_ref()
    }

    /// Returns `true` when nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accumulated.is_empty() && self.axis.is_none()
    }

    /// Drops the active and accumulated profiles after a feature consumed them.
    ///
    /// The axis of revolution is kept.
    pub fn clear_accumulated_profiles(&mut self) {
        self.accumulated.clear();
    }

    /// Drops everything. Called on document lifecycle transitions.
    pub fn clear_state(&mut self) {
        self.accumulated.clear();
        self.axis = None;
    }
}

/// Serialisable snapshot of a [`SketchState`].
#[derive(Debug, Clone, Serialize)]
pub struct SketchStateSummary<P: Serialize, A: Serialize> {
    /// Active profile, if any.
    pub active_profile: Option<P>,
    /// Accumulated profiles in promotion order.
    pub accumulated_profiles: Vec<P>,
    /// Number of accumulated profiles.
    pub accumulated_count: usize,
    /// Axis of revolution, if any.
    pub active_axis: Option<A>,
}

impl<P: Clone + Serialize, A: Clone + Serialize> SketchState<P, A> {
    /// Takes a snapshot for reporting.
    #[must_use]
    pub fn summary(&self) -> SketchStateSummary<P, A> {
        SketchStateSummary {
            active_profile: self.active_profile().cloned(),
            accumulated_profiles: self.accumulated.clone(),
            accumulated_count: self.accumulated.len(),
            active_axis: self.axis.clone(),
        }
    }
}
