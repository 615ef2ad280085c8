use std::{collections::HashSet, path::Path, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::models::{CardImage, CardItem, SiteInfo};

/// The manifest compiled into the binary, used unless `CONTENT_MANIFEST` points elsewhere.
pub const BUILTIN_MANIFEST: &str = include_str!("../content/manifest.json");

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("empty id in {0}")]
    EmptyId(&'static str),

    #[error("duplicate document id: {0}")]
    DuplicateDocument(String),

    #[error("duplicate question set id: {0}")]
    DuplicateQuestionSet(String),
}

/// DocumentConfig
///
/// One node of the document tree. `source` is the storage key of the MDX body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    pub id: String,
    pub title: String,
    pub source: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<CardImage>,
    #[serde(default)]
    pub sub_documents: Vec<DocumentConfig>,
}

impl DocumentConfig {
    /// Card linking to this document under `parent_path` (e.g. `/documents/oop`).
    pub fn card(&self, parent_path: &str) -> CardItem {
        card(parent_path, &self.id, &self.title, &self.description, &self.image)
    }
}

/// QuestionSetConfig
///
/// One interview-question dataset. `source` is the storage key of the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSetConfig {
    pub id: String,
    pub title: String,
    pub source: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<CardImage>,
}

impl QuestionSetConfig {
    pub fn card(&self) -> CardItem {
        card(
            "/interview-questions",
            &self.id,
            &self.title,
            &self.description,
            &self.image,
        )
    }
}

fn card(
    parent_path: &str,
    id: &str,
    title: &str,
    description: &str,
    image: &Option<CardImage>,
) -> CardItem {
    CardItem {
        title: title.to_string(),
        href: format!("{}/{}", parent_path, id),
        description: description.to_string(),
        image: image.clone(),
    }
}

/// Manifest
///
/// On-disk shape of the content registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub site: SiteInfo,
    pub documents: Vec<DocumentConfig>,
    pub question_sets: Vec<QuestionSetConfig>,
}

/// flatten_documents
///
/// Depth-first, pre-order flattening of the document tree: every parent is
/// followed by its whole subtree before the next sibling.
pub fn flatten_documents(docs: &[DocumentConfig]) -> Vec<&DocumentConfig> {
    docs.iter().fold(Vec::new(), |mut acc, doc| {
        acc.push(doc);
        acc.extend(flatten_documents(&doc.sub_documents));
        acc
    })
}

fn trail_to<'a>(
    docs: &'a [DocumentConfig],
    id: &str,
    trail: &mut Vec<&'a DocumentConfig>,
) -> bool {
    for doc in docs {
        trail.push(doc);
        if doc.id == id || trail_to(&doc.sub_documents, id, trail) {
            return true;
        }
        trail.pop();
    }
    false
}

fn validate(manifest: &Manifest) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    for doc in flatten_documents(&manifest.documents) {
        if doc.id.is_empty() {
            return Err(RegistryError::EmptyId("documents"));
        }
        if !seen.insert(doc.id.as_str()) {
            return Err(RegistryError::DuplicateDocument(doc.id.clone()));
        }
    }

    let mut seen = HashSet::new();
    for set in &manifest.question_sets {
        if set.id.is_empty() {
            return Err(RegistryError::EmptyId("question_sets"));
        }
        if !seen.insert(set.id.as_str()) {
            return Err(RegistryError::DuplicateQuestionSet(set.id.clone()));
        }
    }
    Ok(())
}

/// ContentRegistry
///
/// Immutable, validated view over a `Manifest`. All lookups are by slug.
#[derive(Debug, Clone)]
pub struct ContentRegistry {
    manifest: Manifest,
}

/// RegistryState
///
/// The concrete type used to share the registry across the application state.
pub type RegistryState = Arc<ContentRegistry>;

impl ContentRegistry {
    /// Validates the manifest and wraps it.
    pub fn new(manifest: Manifest) -> Result<Self, RegistryError> {
        validate(&manifest)?;
        Ok(Self { manifest })
    }

    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_json(BUILTIN_MANIFEST)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn site(&self) -> &SiteInfo {
        &self.manifest.site
    }

    pub fn documents(&self) -> &[DocumentConfig] {
        &self.manifest.documents
    }

    pub fn question_sets(&self) -> &[QuestionSetConfig] {
        &self.manifest.question_sets
    }

    pub fn find_document(&self, id: &str) -> Option<&DocumentConfig> {
        flatten_documents(&self.manifest.documents)
            .into_iter()
            .find(|doc| doc.id == id)
    }

    pub fn find_question_set(&self, id: &str) -> Option<&QuestionSetConfig> {
        self.manifest.question_sets.iter().find(|set| set.id == id)
    }

    /// Ancestors of `id` from the root down, ending with the node itself.
    pub fn document_trail(&self, id: &str) -> Option<Vec<&DocumentConfig>> {
        let mut trail = Vec::new();
        trail_to(&self.manifest.documents, id, &mut trail).then_some(trail)
    }

    /// Canonical route of a document, e.g. `/documents/design-patterns/creational`.
    pub fn document_path(&self, id: &str) -> Option<String> {
        self.document_trail(id).map(|trail| {
            trail.iter().fold(String::from("/documents"), |path, doc| {
                format!("{}/{}", path, doc.id)
            })
        })
    }

    /// Cards for the direct children of `id`; empty for leaves and unknown ids.
    pub fn sub_document_cards(&self, id: &str) -> Vec<CardItem> {
        let (Some(doc), Some(path)) = (self.find_document(id), self.document_path(id)) else {
            return vec![];
        };
        doc.sub_documents.iter().map(|sub| sub.card(&path)).collect()
    }

    pub fn document_cards(&self) -> Vec<CardItem> {
        self.manifest
            .documents
            .iter()
            .map(|doc| doc.card("/documents"))
            .collect()
    }

    pub fn technology_cards(&self) -> Vec<CardItem> {
        self.manifest
            .question_sets
            .iter()
            .map(QuestionSetConfig::card)
            .collect()
    }
}
