//! In-process CAD engine.
//!
//! `MemoryEngine` keeps a document table with the same observable behaviour
//! the tool layer relies on: one active document, at most one open sketch
//! per document, three default reference planes, named features, and
//! assembly occurrences. Geometry itself is not evaluated.
//!
//! Every profile and axis handle comes from one engine-wide counter and is
//! recorded against the document that issued it, so a handle can never be
//! valid in two documents. [`CadEngine::add_feature`] rejects handles the
//! active document did not issue with [`CadError::StaleReference`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use super::error::{CadError, CadResult};
use super::model::{
    ClosedSketch, DocumentInfo, DocumentKind, DocumentSelector, FeatureInfo, FeatureOperation,
    FeatureRequest, OccurrenceInfo, SketchElement, SketchInfo,
};
use super::{CadEngine, Profile, RefAxis};

/// Number of default reference planes in part and assembly documents.
const DEFAULT_REF_PLANES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct DocumentId(u64);

#[derive(Debug)]
struct OpenSketch {
    name: String,
    plane_index: usize,
    elements: usize,
}

#[derive(Debug)]
struct Document {
    name: String,
    path: Option<PathBuf>,
    kind: DocumentKind,
    modified: bool,
    sketch_count: usize,
    open_sketch: Option<OpenSketch>,
    profiles: HashSet<Profile>,
    axes: HashSet<RefAxis>,
    features: Vec<FeatureInfo>,
    has_solid: bool,
    occurrences: Vec<OccurrenceInfo>,
}

impl Document {
    fn new(kind: DocumentKind, name: String, path: Option<PathBuf>) -> Self {
        Self {
            name,
            path,
            kind,
            modified: false,
            sketch_count: 0,
            open_sketch: None,
            profiles: HashSet::new(),
            axes: HashSet::new(),
            features: Vec::new(),
            has_solid: false,
            occurrences: Vec::new(),
        }
    }

    const fn ref_plane_count(&self) -> usize {
        match self.kind {
            DocumentKind::Draft => 0,
            _ => DEFAULT_REF_PLANES,
        }
    }

    fn open_sketch_mut(&mut self) -> CadResult<&mut OpenSketch> {
        self.open_sketch.as_mut().ok_or(CadError::NoOpenSketch)
    }

    fn check_request(&self, request: &FeatureRequest) -> CadResult<()> {
        if request.is_assembly_feature() {
            if self.kind != DocumentKind::Assembly {
                return Err(CadError::WrongDocumentType {
                    operation: request.kind(),
                    expected: "Assembly",
                    actual: self.kind,
                });
            }
        } else if !self.kind.is_modeling() {
            return Err(CadError::WrongDocumentType {
                operation: request.kind(),
                expected: "Part or SheetMetal",
                actual: self.kind,
            });
        }

        for profile in request.profiles() {
            if !self.profiles.contains(&profile) {
                return Err(CadError::stale_profile(profile.raw()));
            }
        }
        if let Some(axis) = request.axis() {
            if !self.axes.contains(&axis) {
                return Err(CadError::stale_axis(axis.raw()));
            }
        }

        if request.needs_base_feature() && !self.has_solid {
            return Err(CadError::NoBaseFeature);
        }

        match request {
            FeatureRequest::UserDefinedPattern { seed_feature, .. } => {
                if !self.features.iter().any(|f| &f.name == seed_feature) {
                    return Err(CadError::FeatureNotFound {
                        name: seed_feature.clone(),
                    });
                }
            }
            FeatureRequest::AssemblyExtrudedCutout { scope, .. }
            | FeatureRequest::AssemblyRevolvedCutout { scope, .. } => {
                let count = self.occurrences.len();
                if let Some(&index) = scope.iter().find(|&&i| i >= count) {
                    return Err(CadError::InvalidOccurrence { index, count });
                }
            }
            _ => {}
        }

        Ok(())
    }
}

const fn adds_solid(request: &FeatureRequest) -> bool {
    matches!(request.operation(), Some(FeatureOperation::Add))
}

fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

/// In-process implementation of [`CadEngine`].
#[derive(Debug, Default)]
pub struct MemoryEngine {
    documents: IndexMap<DocumentId, Document>,
    active: Option<DocumentId>,
    next_document: u64,
    next_handle: u64,
    untitled: [usize; DocumentKind::ALL.len()],
}

impl MemoryEngine {
    /// Creates an engine with no open documents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn active_doc<'a>(
        documents: &'a IndexMap<DocumentId, Document>,
        active: Option<DocumentId>,
    ) -> CadResult<&'a Document> {
        active
            .and_then(|id| documents.get(&id))
            .ok_or(CadError::NoActiveDocument)
    }

    fn active_doc_mut<'a>(
        documents: &'a mut IndexMap<DocumentId, Document>,
        active: Option<DocumentId>,
    ) -> CadResult<&'a mut Document> {
        active
            .and_then(|id| documents.get_mut(&id))
            .ok_or(CadError::NoActiveDocument)
    }

    fn info(&self, id: DocumentId) -> CadResult<DocumentInfo> {
        let (index, _, doc) = self
            .documents
            .get_full(&id)
            .ok_or(CadError::NoActiveDocument)?;
        Ok(DocumentInfo {
            index,
            name: doc.name.clone(),
            path: doc.path.clone(),
            kind: doc.kind,
            modified: doc.modified,
            active: self.active == Some(id),
        })
    }

    fn insert_document(&mut self, doc: Document) -> CadResult<DocumentInfo> {
        self.next_document += 1;
        let id = DocumentId(self.next_document);
        self.documents.insert(id, doc);
        self.active = Some(id);
        self.info(id)
    }
}

impl CadEngine for MemoryEngine {
    fn create_document(
        &mut self,
        kind: DocumentKind,
        template: Option<&Path>,
    ) -> CadResult<DocumentInfo> {
        if let Some(template) = template {
            if !template.exists() {
                return Err(CadError::FileNotFound {
                    path: template.to_path_buf(),
                });
            }
        }

        let slot = DocumentKind::ALL
            .iter()
            .position(|&k| k == kind)
            .unwrap_or_default();
        self.untitled[slot] += 1;
        let name = format!("{}{}", kind.untitled_prefix(), self.untitled[slot]);

        self.insert_document(Document::new(kind, name, None))
    }

    fn open_document(&mut self, path: &Path) -> CadResult<DocumentInfo> {
        if !path.exists() {
            return Err(CadError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let kind = DocumentKind::from_path(path).ok_or_else(|| CadError::UnsupportedFileType {
            path: path.to_path_buf(),
        })?;

        let already_open = self
            .documents
            .iter()
            .find(|(_, d)| d.path.as_deref() == Some(path))
            .map(|(&id, _)| id);
        if let Some(id) = already_open {
            self.active = Some(id);
            return self.info(id);
        }

        let doc = Document::new(kind, file_name(path), Some(path.to_path_buf()));
        self.insert_document(doc)
    }

    fn save_document(&mut self, path: Option<&Path>) -> CadResult<DocumentInfo> {
        let id = self.active.ok_or(CadError::NoActiveDocument)?;
        let doc = Self::active_doc_mut(&mut self.documents, self.active)?;

        match path {
            Some(path) => {
                if DocumentKind::from_path(path) != Some(doc.kind) {
                    return Err(CadError::UnsupportedFileType {
                        path: path.to_path_buf(),
                    });
                }
                doc.name = file_name(path);
                doc.path = Some(path.to_path_buf());
            }
            None if doc.path.is_none() => {
                return Err(CadError::call_failed(
                    "Save",
                    "document has never been saved; provide a file path",
                ));
            }
            None => {}
        }
        doc.modified = false;

        self.info(id)
    }

    fn close_document(&mut self, save: bool) -> CadResult<DocumentInfo> {
        let id = self.active.ok_or(CadError::NoActiveDocument)?;
        let mut info = self.info(id)?;

        self.documents.shift_remove(&id);
        self.active = self.documents.last().map(|(&id, _)| id);

        if save {
            info.modified = false;
        }
        info.active = false;
        Ok(info)
    }

    fn activate_document(&mut self, selector: &DocumentSelector) -> CadResult<DocumentInfo> {
        if self.documents.is_empty() {
            return Err(CadError::NoOpenDocuments);
        }

        let id = match selector {
            DocumentSelector::Index(index) => self
                .documents
                .get_index(*index)
                .map(|(&id, _)| id)
                .ok_or(CadError::DocumentIndexOutOfRange {
                    index: *index,
                    count: self.documents.len(),
                })?,
            DocumentSelector::Name(name) => self
                .documents
                .iter()
                .find(|(_, d)| &d.name == name)
                .map(|(&id, _)| id)
                .ok_or_else(|| CadError::DocumentNotFound { name: name.clone() })?,
        };

        self.active = Some(id);
        self.info(id)
    }

    fn list_documents(&self) -> Vec<DocumentInfo> {
        self.documents
            .keys()
            .filter_map(|&id| self.info(id).ok())
            .collect()
    }

    fn active_document(&self) -> CadResult<DocumentInfo> {
        let id = self.active.ok_or(CadError::NoActiveDocument)?;
        self.info(id)
    }

    fn begin_sketch(&mut self, plane_index: usize) -> CadResult<SketchInfo> {
        let doc = Self::active_doc_mut(&mut self.documents, self.active)?;

        if doc.kind == DocumentKind::Draft {
            return Err(CadError::WrongDocumentType {
                operation: "Sketch",
                expected: "Part, SheetMetal or Assembly",
                actual: doc.kind,
            });
        }
        if doc.open_sketch.is_some() {
            return Err(CadError::SketchAlreadyOpen);
        }
        let count = doc.ref_plane_count();
        if plane_index == 0 || plane_index > count {
            return Err(CadError::InvalidRefPlane {
                index: plane_index,
                count,
            });
        }

        doc.sketch_count += 1;
        let name = format!("Sketch {}", doc.sketch_count);
        doc.open_sketch = Some(OpenSketch {
            name: name.clone(),
            plane_index,
            elements: 0,
        });
        doc.modified = true;

        Ok(SketchInfo {
            name,
            plane_index,
            document: doc.name.clone(),
        })
    }

    fn add_sketch_element(&mut self, element: SketchElement) -> CadResult<usize> {
        let doc = Self::active_doc_mut(&mut self.documents, self.active)?;
        let sketch = doc.open_sketch_mut()?;
        sketch.elements += 1;
        tracing::trace!(kind = element.kind(), sketch = %sketch.name, "Sketch element added");
        Ok(sketch.elements)
    }

    fn add_axis_of_revolution(&mut self, start: [f64; 2], end: [f64; 2]) -> CadResult<RefAxis> {
        let doc = Self::active_doc_mut(&mut self.documents, self.active)?;
        let sketch = doc.open_sketch_mut()?;
        sketch.elements += 1;
        tracing::trace!(?start, ?end, sketch = %sketch.name, "Axis of revolution drawn");

        self.next_handle += 1;
        let axis = RefAxis::from_raw(self.next_handle);
        doc.axes.insert(axis);
        Ok(axis)
    }

    fn end_sketch(&mut self) -> CadResult<ClosedSketch> {
        let doc = Self::active_doc_mut(&mut self.documents, self.active)?;
        let sketch = doc.open_sketch.take().ok_or(CadError::NoOpenSketch)?;

        self.next_handle += 1;
        let profile = Profile::from_raw(self.next_handle);
        doc.profiles.insert(profile);

        tracing::trace!(
            sketch = %sketch.name,
            plane = sketch.plane_index,
            %profile,
            "Sketch ended"
        );
        Ok(ClosedSketch {
            name: sketch.name,
            profile,
            elements: sketch.elements,
        })
    }

    fn add_feature(&mut self, request: &FeatureRequest) -> CadResult<FeatureInfo> {
        let doc = Self::active_doc_mut(&mut self.documents, self.active)?;
        doc.check_request(request)?;

        let kind = request.kind();
        let ordinal = doc.features.iter().filter(|f| f.kind == kind).count() + 1;
        let feature = FeatureInfo {
            name: format!("{kind} {ordinal}"),
            kind: kind.to_string(),
            profiles: request.profiles().len(),
        };

        doc.features.push(feature.clone());
        doc.has_solid |= adds_solid(request);
        doc.modified = true;
        Ok(feature)
    }

    fn features(&self) -> CadResult<Vec<FeatureInfo>> {
        let doc = Self::active_doc(&self.documents, self.active)?;
        Ok(doc.features.clone())
    }

    fn place_component(&mut self, path: &Path) -> CadResult<OccurrenceInfo> {
        let doc = Self::active_doc_mut(&mut self.documents, self.active)?;
        if doc.kind != DocumentKind::Assembly {
            return Err(CadError::WrongDocumentType {
                operation: "Place component",
                expected: "Assembly",
                actual: doc.kind,
            });
        }
        if !path.exists() {
            return Err(CadError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        match DocumentKind::from_path(path) {
            Some(DocumentKind::Part | DocumentKind::SheetMetal | DocumentKind::Assembly) => {}
            _ => {
                return Err(CadError::UnsupportedFileType {
                    path: path.to_path_buf(),
                })
            }
        }

        let base = file_name(path);
        let copies = doc
            .occurrences
            .iter()
            .filter(|o| o.path.as_path() == path)
            .count();
        let occurrence = OccurrenceInfo {
            index: doc.occurrences.len(),
            name: format!("{base}:{}", copies + 1),
            path: path.to_path_buf(),
        };
        doc.occurrences.push(occurrence.clone());
        doc.modified = true;
        Ok(occurrence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cad::model::ProfileSide;

    fn extrude(profile: Profile, operation: FeatureOperation) -> FeatureRequest {
        FeatureRequest::Extrude {
            profile,
            side: ProfileSide::Normal,
            distance: 0.01,
            operation,
            wall_thickness: None,
        }
    }

    fn closed_profile(engine: &mut MemoryEngine) -> Profile {
        engine.begin_sketch(1).unwrap();
        engine
            .add_sketch_element(SketchElement::Circle {
                center: [0.0, 0.0],
                radius: 0.01,
            })
            .unwrap();
        engine.end_sketch().unwrap().profile
    }

    #[test]
    fn untitled_names_increment_per_kind() {
        let mut engine = MemoryEngine::new();
        let a = engine.create_document(DocumentKind::Part, None).unwrap();
        let b = engine.create_document(DocumentKind::Part, None).unwrap();
        let c = engine.create_document(DocumentKind::Assembly, None).unwrap();
        assert_eq!(a.name, "Part1");
        assert_eq!(b.name, "Part2");
        assert_eq!(c.name, "Asm1");
        assert!(c.active);
        assert_eq!(c.index, 2);
    }

    #[test]
    fn missing_template_rejected() {
        let mut engine = MemoryEngine::new();
        let err = engine
            .create_document(DocumentKind::Part, Some(Path::new("/no/such/template.par")))
            .unwrap_err();
        assert_eq!(err.code(), "FILE_NOT_FOUND");
    }

    #[test]
    fn open_infers_kind_and_reuses_open_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bracket.par");
        std::fs::write(&path, b"").unwrap();

        let mut engine = MemoryEngine::new();
        let first = engine.open_document(&path).unwrap();
        assert_eq!(first.kind, DocumentKind::Part);
        assert_eq!(first.name, "bracket.par");

        engine.create_document(DocumentKind::Part, None).unwrap();
        let again = engine.open_document(&path).unwrap();
        assert_eq!(again.index, 0);
        assert!(again.active);
        assert_eq!(engine.list_documents().len(), 2);
    }

    #[test]
    fn open_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"").unwrap();

        let mut engine = MemoryEngine::new();
        let err = engine.open_document(&path).unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_FILE_TYPE");
    }

    #[test]
    fn close_activates_last_remaining_document() {
        let mut engine = MemoryEngine::new();
        engine.create_document(DocumentKind::Part, None).unwrap();
        engine.create_document(DocumentKind::Part, None).unwrap();

        let closed = engine.close_document(false).unwrap();
        assert_eq!(closed.name, "Part2");
        assert_eq!(engine.active_document().unwrap().name, "Part1");

        engine.close_document(false).unwrap();
        assert_eq!(engine.active_document(), Err(CadError::NoActiveDocument));
        assert_eq!(engine.close_document(true), Err(CadError::NoActiveDocument));
    }

    #[test]
    fn activate_by_name_and_index() {
        let mut engine = MemoryEngine::new();
        assert_eq!(
            engine.activate_document(&DocumentSelector::Index(0)),
            Err(CadError::NoOpenDocuments)
        );

        engine.create_document(DocumentKind::Part, None).unwrap();
        engine.create_document(DocumentKind::Assembly, None).unwrap();

        let doc = engine
            .activate_document(&DocumentSelector::Name("Part1".to_string()))
            .unwrap();
        assert_eq!(doc.index, 0);
        let doc = engine
            .activate_document(&DocumentSelector::Index(1))
            .unwrap();
        assert_eq!(doc.name, "Asm1");

        assert_eq!(
            engine.activate_document(&DocumentSelector::Index(5)),
            Err(CadError::DocumentIndexOutOfRange { index: 5, count: 2 })
        );
        assert!(matches!(
            engine.activate_document(&DocumentSelector::Name("Nope".to_string())),
            Err(CadError::DocumentNotFound { .. })
        ));
    }

    #[test]
    fn save_requires_path_for_untitled() {
        let mut engine = MemoryEngine::new();
        engine.create_document(DocumentKind::Part, None).unwrap();
        closed_profile(&mut engine);
        assert!(engine.active_document().unwrap().modified);

        assert_eq!(engine.save_document(None).unwrap_err().code(), "CALL_FAILED");
        assert_eq!(
            engine
                .save_document(Some(Path::new("out.asm")))
                .unwrap_err()
                .code(),
            "UNSUPPORTED_FILE_TYPE"
        );

        let saved = engine.save_document(Some(Path::new("out.par"))).unwrap();
        assert_eq!(saved.name, "out.par");
        assert!(!saved.modified);
        assert!(engine.save_document(None).is_ok());
    }

    #[test]
    fn sketch_lifecycle() {
        let mut engine = MemoryEngine::new();
        assert_eq!(engine.begin_sketch(1), Err(CadError::NoActiveDocument));

        engine.create_document(DocumentKind::Part, None).unwrap();
        assert_eq!(
            engine.begin_sketch(4),
            Err(CadError::InvalidRefPlane { index: 4, count: 3 })
        );
        assert_eq!(engine.end_sketch(), Err(CadError::NoOpenSketch));

        let sketch = engine.begin_sketch(2).unwrap();
        assert_eq!(sketch.name, "Sketch 1");
        assert_eq!(engine.begin_sketch(1), Err(CadError::SketchAlreadyOpen));

        let count = engine
            .add_sketch_element(SketchElement::Point { at: [0.0, 0.0] })
            .unwrap();
        assert_eq!(count, 1);

        let closed = engine.end_sketch().unwrap();
        assert_eq!(closed.elements, 1);
        assert_eq!(
            engine.add_sketch_element(SketchElement::Point { at: [0.0, 0.0] }),
            Err(CadError::NoOpenSketch)
        );
    }

    #[test]
    fn draft_documents_cannot_sketch() {
        let mut engine = MemoryEngine::new();
        engine.create_document(DocumentKind::Draft, None).unwrap();
        assert_eq!(
            engine.begin_sketch(1).unwrap_err().code(),
            "WRONG_DOCUMENT_TYPE"
        );
    }

    #[test]
    fn handles_are_unique_across_documents() {
        let mut engine = MemoryEngine::new();
        engine.create_document(DocumentKind::Part, None).unwrap();
        let a = closed_profile(&mut engine);
        engine.create_document(DocumentKind::Part, None).unwrap();
        let b = closed_profile(&mut engine);
        assert_ne!(a, b);
    }

    #[test]
    fn feature_rejects_profile_from_other_document() {
        let mut engine = MemoryEngine::new();
        engine.create_document(DocumentKind::Part, None).unwrap();
        let foreign = closed_profile(&mut engine);

        engine.create_document(DocumentKind::Part, None).unwrap();
        let err = engine
            .add_feature(&extrude(foreign, FeatureOperation::Add))
            .unwrap_err();
        assert_eq!(err, CadError::stale_profile(foreign.raw()));
        assert!(engine.features().unwrap().is_empty());
    }

    #[test]
    fn feature_rejects_axis_from_other_document() {
        let mut engine = MemoryEngine::new();
        engine.create_document(DocumentKind::Part, None).unwrap();
        engine.begin_sketch(1).unwrap();
        let foreign_axis = engine
            .add_axis_of_revolution([0.0, 0.0], [0.0, 1.0])
            .unwrap();
        engine.end_sketch().unwrap();

        engine.create_document(DocumentKind::Part, None).unwrap();
        let profile = closed_profile(&mut engine);
        let err = engine
            .add_feature(&FeatureRequest::Revolve {
                profile,
                axis: foreign_axis,
                angle: std::f64::consts::PI,
                operation: FeatureOperation::Add,
                wall_thickness: None,
            })
            .unwrap_err();
        assert_eq!(err, CadError::stale_axis(foreign_axis.raw()));
    }

    #[test]
    fn cut_needs_base_feature() {
        let mut engine = MemoryEngine::new();
        engine.create_document(DocumentKind::Part, None).unwrap();
        let profile = closed_profile(&mut engine);

        assert_eq!(
            engine.add_feature(&extrude(profile, FeatureOperation::Cut)),
            Err(CadError::NoBaseFeature)
        );

        let base = engine
            .add_feature(&extrude(profile, FeatureOperation::Add))
            .unwrap();
        assert_eq!(base.name, "Extrude 1");

        let cut = engine
            .add_feature(&extrude(profile, FeatureOperation::Cut))
            .unwrap();
        assert_eq!(cut.name, "Cutout 1");
        assert_eq!(engine.features().unwrap().len(), 2);
    }

    #[test]
    fn pattern_needs_existing_seed() {
        let mut engine = MemoryEngine::new();
        engine.create_document(DocumentKind::Part, None).unwrap();
        let profile = closed_profile(&mut engine);
        engine
            .add_feature(&extrude(profile, FeatureOperation::Add))
            .unwrap();

        let err = engine
            .add_feature(&FeatureRequest::UserDefinedPattern {
                seed_feature: "Hole 1".to_string(),
                occurrences: vec![profile],
            })
            .unwrap_err();
        assert!(matches!(err, CadError::FeatureNotFound { .. }));

        let pattern = engine
            .add_feature(&FeatureRequest::UserDefinedPattern {
                seed_feature: "Extrude 1".to_string(),
                occurrences: vec![profile],
            })
            .unwrap();
        assert_eq!(pattern.kind, "Pattern");
    }

    #[test]
    fn assembly_features_need_assembly_and_valid_scope() {
        let dir = tempfile::tempdir().unwrap();
        let part = dir.path().join("plate.par");
        std::fs::write(&part, b"").unwrap();

        let mut engine = MemoryEngine::new();
        engine.create_document(DocumentKind::Part, None).unwrap();
        let profile = closed_profile(&mut engine);
        let request = FeatureRequest::AssemblyExtrudedCutout {
            scope: vec![0],
            profiles: vec![profile],
            extent: crate::cad::model::AssemblyExtent::ThroughAll,
            side: ProfileSide::Normal,
        };
        assert_eq!(
            engine.add_feature(&request).unwrap_err().code(),
            "WRONG_DOCUMENT_TYPE"
        );
        assert_eq!(
            engine.place_component(&part).unwrap_err().code(),
            "WRONG_DOCUMENT_TYPE"
        );

        engine.create_document(DocumentKind::Assembly, None).unwrap();
        let profile = closed_profile(&mut engine);
        let request = FeatureRequest::AssemblyExtrudedCutout {
            scope: vec![0],
            profiles: vec![profile],
            extent: crate::cad::model::AssemblyExtent::ThroughAll,
            side: ProfileSide::Normal,
        };
        assert_eq!(
            engine.add_feature(&request),
            Err(CadError::InvalidOccurrence { index: 0, count: 0 })
        );

        let first = engine.place_component(&part).unwrap();
        let second = engine.place_component(&part).unwrap();
        assert_eq!(first.name, "plate.par:1");
        assert_eq!(second.name, "plate.par:2");
        assert_eq!(second.index, 1);

        let feature = engine.add_feature(&request).unwrap();
        assert_eq!(feature.name, "AssemblyCutout 1");
    }
}
