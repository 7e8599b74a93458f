//! Document lifecycle.
//!
//! Every successful create, open, close or activate resets the session's
//! [`SketchState`]. Profiles and axes are only valid in the document that
//! issued them, so nothing may survive a change of active document. A
//! failed transition leaves the state alone because the active document did
//! not change. Saving is not a transition.

use std::path::Path;

use tracing::info;

use crate::cad::{
    CadEngine, CadResult, DocumentInfo, DocumentKind, DocumentSelector, OccurrenceInfo,
};
use crate::config::TemplateConfig;
use crate::sketch::SketchState;

/// Document operations bound to one engine and one [`SketchState`].
pub struct DocumentManager<'a> {
    engine: &'a mut dyn CadEngine,
    state: &'a mut SketchState,
    templates: &'a TemplateConfig,
}

impl<'a> DocumentManager<'a> {
    /// Binds the manager to a session's engine, state and templates.
    pub fn new(
        engine: &'a mut dyn CadEngine,
        state: &'a mut SketchState,
        templates: &'a TemplateConfig,
    ) -> Self {
        Self {
            engine,
            state,
            templates,
        }
    }

    fn transition(
        &mut self,
        action: &'static str,
        result: CadResult<DocumentInfo>,
    ) -> CadResult<DocumentInfo> {
        let doc = result?;
        self.state.clear_state();
        info!(action, document = %doc.name, kind = %doc.kind, "Active document changed, sketch state cleared");
        Ok(doc)
    }

    /// Creates a document. Without an explicit `template` the configured
    /// template for `kind` is used, if any.
    ///
    /// # Errors
    ///
    /// Fails if the template does not exist.
    pub fn create_document(
        &mut self,
        kind: DocumentKind,
        template: Option<&Path>,
    ) -> CadResult<DocumentInfo> {
        let template = template.or_else(|| self.templates.for_kind(kind));
        let result = self.engine.create_document(kind, template);
        self.transition("create", result)
    }

    /// Opens a document, or activates it if it is already open.
    ///
    /// # Errors
    ///
    /// Fails if the file does not exist or has an unknown extension.
    pub fn open_document(&mut self, path: &Path) -> CadResult<DocumentInfo> {
        let result = self.engine.open_document(path);
        self.transition("open", result)
    }

    /// Saves the active document, optionally under a new path.
    ///
    /// # Errors
    ///
    /// Fails if there is no active document or an untitled document is saved
    /// without a path.
    pub fn save_document(&mut self, path: Option<&Path>) -> CadResult<DocumentInfo> {
        let doc = self.engine.save_document(path)?;
        info!(document = %doc.name, "Document saved");
        Ok(doc)
    }

    /// Closes the active document.
    ///
    /// # Errors
    ///
    /// Fails if there is no active document.
    pub fn close_document(&mut self, save: bool) -> CadResult<DocumentInfo> {
        let result = self.engine.close_document(save);
        self.transition("close", result)
    }

    /// Activates an open document by name or 0-based index.
    ///
    /// # Errors
    ///
    /// Fails if no open document matches.
    pub fn activate_document(&mut self, selector: &DocumentSelector) -> CadResult<DocumentInfo> {
        let result = self.engine.activate_document(selector);
        self.transition("activate", result)
    }

    /// Lists open documents.
    #[must_use]
    pub fn list_documents(&self) -> Vec<DocumentInfo> {
        self.engine.list_documents()
    }

    /// Returns the active document.
    ///
    /// # Errors
    ///
    /// Fails if no document is active.
    pub fn active_document(&self) -> CadResult<DocumentInfo> {
        self.engine.active_document()
    }

    /// Places a part or sub-assembly into the active assembly. The active
    /// document does not change, so the sketch state is kept.
    ///
    /// # Errors
    ///
    /// Fails if the active document is not an assembly or the file cannot be
    /// placed.
    pub fn place_component(&mut self, path: &Path) -> CadResult<OccurrenceInfo> {
        let occurrence = self.engine.place_component(path)?;
        info!(occurrence = %occurrence.name, index = occurrence.index, "Component placed");
        Ok(occurrence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cad::{CadError, MemoryEngine, Profile, RefAxis};

    fn dirty_state() -> SketchState {
        let mut state = SketchState::new();
        state.promote_profile(Profile::from_raw(100));
        state.set_active_axis(RefAxis::from_raw(101));
        state
    }

    #[test]
    fn create_clears_state() {
        let mut engine = MemoryEngine::new();
        let mut state = dirty_state();
        let templates = TemplateConfig::default();
        let mut docs = DocumentManager::new(&mut engine, &mut state, &templates);

        let doc = docs.create_document(DocumentKind::Part, None).unwrap();
        assert_eq!(doc.name, "Part1");
        assert!(state.is_empty());
    }

    #[test]
    fn activate_and_close_clear_state() {
        let mut engine = MemoryEngine::new();
        let mut state = SketchState::new();
        let templates = TemplateConfig::default();

        let mut docs = DocumentManager::new(&mut engine, &mut state, &templates);
        docs.create_document(DocumentKind::Part, None).unwrap();
        docs.create_document(DocumentKind::Part, None).unwrap();

        state = dirty_state();
        let mut docs = DocumentManager::new(&mut engine, &mut state, &templates);
        docs.activate_document(&DocumentSelector::Index(0)).unwrap();
        assert!(state.is_empty());

        state = dirty_state();
        let mut docs = DocumentManager::new(&mut engine, &mut state, &templates);
        docs.close_document(false).unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn open_clears_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shaft.par");
        std::fs::write(&path, b"").unwrap();

        let mut engine = MemoryEngine::new();
        let mut state = dirty_state();
        let templates = TemplateConfig::default();
        let mut docs = DocumentManager::new(&mut engine, &mut state, &templates);

        docs.open_document(&path).unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn failed_transition_keeps_state() {
        let mut engine = MemoryEngine::new();
        engine.create_document(DocumentKind::Part, None).unwrap();
        let mut state = dirty_state();
        let before = state.clone();
        let templates = TemplateConfig::default();
        let mut docs = DocumentManager::new(&mut engine, &mut state, &templates);

        let err = docs
            .activate_document(&DocumentSelector::Name("Missing".to_string()))
            .unwrap_err();
        assert!(matches!(err, CadError::DocumentNotFound { .. }));
        let err = docs
            .open_document(Path::new("/definitely/not/here.par"))
            .unwrap_err();
        assert_eq!(err.code(), "FILE_NOT_FOUND");

        assert_eq!(state, before);
    }

    #[test]
    fn save_keeps_state() {
        let mut engine = MemoryEngine::new();
        engine.create_document(DocumentKind::Part, None).unwrap();
        let mut state = dirty_state();
        let before = state.clone();
        let templates = TemplateConfig::default();
        let mut docs = DocumentManager::new(&mut engine, &mut state, &templates);

        docs.save_document(Some(Path::new("saved.par"))).unwrap();
        assert_eq!(state, before);
    }

    #[test]
    fn configured_template_is_used() {
        let templates = TemplateConfig {
            part: Some("/no/such/template.par".into()),
            ..TemplateConfig::default()
        };
        let mut engine = MemoryEngine::new();
        let mut state = dirty_state();
        let before = state.clone();
        let mut docs = DocumentManager::new(&mut engine, &mut state, &templates);

        let err = docs.create_document(DocumentKind::Part, None).unwrap_err();
        assert_eq!(err.code(), "FILE_NOT_FOUND");
        assert!(docs.create_document(DocumentKind::Assembly, None).is_ok());
        assert_ne!(state, before);
    }

    #[test]
    fn place_component_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let part = dir.path().join("pin.par");
        std::fs::write(&part, b"").unwrap();

        let mut engine = MemoryEngine::new();
        engine.create_document(DocumentKind::Assembly, None).unwrap();
        let mut state = dirty_state();
        let before = state.clone();
        let templates = TemplateConfig::default();
        let mut docs = DocumentManager::new(&mut engine, &mut state, &templates);

        let occurrence = docs.place_component(&part).unwrap();
        assert_eq!(occurrence.name, "pin.par:1");
        assert_eq!(state, before);
    }
}
