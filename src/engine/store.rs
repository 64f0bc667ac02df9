use std::fmt;

use rand::{Rng, distributions::Alphanumeric};

const ID_LENGTH: usize = 21;

/// Opaque, client-generated annotation identifier. Generated ids are long
/// enough that collisions are negligible within a session.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct AnnotationId(String);

impl AnnotationId {
    pub fn generate() -> Self {
        let id = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(ID_LENGTH)
            .map(char::from)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AnnotationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AnnotationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an annotation marks. A single variant for now; adding variants must
/// not change the id/hover contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnnotationKind {
    Claim,
}

#[derive(Clone, Debug)]
pub struct Annotation {
    pub id: AnnotationId,
    pub kind: AnnotationKind,
    pub hover: bool,
}

/// The authoritative, creation-ordered list of annotations. Entries are
/// never removed; the only mutation after creation is the hover flag.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an annotation with a fresh id, appended in creation order.
    pub fn create(&mut self, kind: AnnotationKind) -> Annotation {
        let annotation = Annotation {
            id: AnnotationId::generate(),
            kind,
            hover: false,
        };
        self.annotations.push(annotation.clone());
        annotation
    }

    /// Register an id first seen in seeded document content, so no rendered
    /// region ever references an id the store does not know. Returns whether
    /// a new entry was added; an id already present is left untouched.
    pub fn adopt(&mut self, id: &AnnotationId, kind: AnnotationKind) -> bool {
        if self.contains(id) {
            return false;
        }
        self.annotations.push(Annotation {
            id: id.clone(),
            kind,
            hover: false,
        });
        true
    }

    /// Update the hover flag. Unknown ids are tolerated as a no-op since
    /// hover notifications can race region instrumentation. Returns whether
    /// the flag actually changed.
    pub fn set_hover(&mut self, id: &AnnotationId, hover: bool) -> bool {
        let Some(annotation) = self.annotations.iter_mut().find(|a| &a.id == id) else {
            return false;
        };
        if annotation.hover == hover {
            return false;
        }
        annotation.hover = hover;
        true
    }

    pub fn hover(&self, id: &AnnotationId) -> Option<bool> {
        self.get(id).map(|annotation| annotation.hover)
    }

    pub fn contains(&self, id: &AnnotationId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| &a.id == id)
    }

    /// Read-only snapshot, in creation order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}
