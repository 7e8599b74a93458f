//! One automation session: an engine plus the sketch state that belongs to
//! it.
//!
//! The managers borrow both for the duration of one operation, so there is
//! exactly one [`SketchState`] per engine and no global.

use crate::cad::{CadEngine, MemoryEngine};
use crate::config::TemplateConfig;
use crate::documents::DocumentManager;
use crate::features::FeatureManager;
use crate::sketch::{SketchManager, SketchState};

/// Owns an engine and its sketch state.
pub struct Session {
    engine: Box<dyn CadEngine>,
    state: SketchState,
    templates: TemplateConfig,
}

impl Session {
    /// Creates a session around `engine`.
    #[must_use]
    pub fn new(engine: Box<dyn CadEngine>, templates: TemplateConfig) -> Self {
        Self {
            engine,
            state: SketchState::new(),
            templates,
        }
    }

    /// Creates a session backed by a fresh [`MemoryEngine`].
    #[must_use]
    pub fn in_memory(templates: TemplateConfig) -> Self {
        Self::new(Box::new(MemoryEngine::new()), templates)
    }

    /// Document lifecycle operations.
    pub fn documents(&mut self) -> DocumentManager<'_> {
        DocumentManager::new(self.engine.as_mut(), &mut self.state, &self.templates)
    }

    /// Sketch operations.
    pub fn sketches(&mut self) -> SketchManager<'_> {
        SketchManager::new(self.engine.as_mut(), &mut self.state)
    }

    /// Feature operations.
    pub fn features(&mut self) -> FeatureManager<'_> {
        FeatureManager::new(self.engine.as_mut(), &mut self.state)
    }

    /// Read-only view of the sketch state.
    #[must_use]
    pub const fn sketch_state(&self) -> &SketchState {
        &self.state
    }

    /// Read-only view of the engine.
    #[must_use]
    pub fn engine(&self) -> &dyn CadEngine {
        self.engine.as_ref()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::in_memory(TemplateConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cad::DocumentKind;

    #[test]
    fn sessions_are_isolated() {
        let mut a = Session::default();
        let mut b = Session::default();

        a.documents()
            .create_document(DocumentKind::Part, None)
            .unwrap();
        a.sketches().create_sketch("Top").unwrap();
        a.sketches().draw_circle(0.0, 0.0, 0.01).unwrap();
        a.sketches().close_sketch().unwrap();

        assert_eq!(a.sketch_state().accumulated_profiles().len(), 1);
        assert!(b.sketch_state().is_empty());
        assert!(b.documents().list_documents().is_empty());
    }

    #[test]
    fn managers_share_state() {
        let mut session = Session::default();
        session
            .documents()
            .create_document(DocumentKind::Part, None)
            .unwrap();

        let mut sketches = session.sketches();
        sketches.create_sketch("Front").unwrap();
        sketches.draw_rectangle(0.0, 0.0, 0.02, 0.01).unwrap();
        sketches.close_sketch().unwrap();

        session
            .features()
            .extrude(0.005, crate::cad::model::ProfileSide::Normal)
            .unwrap();
        assert!(session.sketch_state().is_empty());
        assert_eq!(session.engine().features().unwrap().len(), 1);
    }
}
