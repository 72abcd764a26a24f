//! Structure metadata - content-type schemas keyed by template name.
//!
//! A structure describes the editable fields of a page template. Content
//! nodes reference their template by name; templates can be removed from
//! configuration while content still references them, so lookups return
//! `Option` and callers degrade gracefully instead of failing.

use rustc_hash::FxHashMap;
use serde::Serialize;

/// One editable field of a structure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldMetadata {
    pub name: String,
    /// Localized fields are stored per-locale (`i18n:<locale>-<name>`).
    pub localized: bool,
    pub required: bool,
}

impl FieldMetadata {
    pub fn localized(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            localized: true,
            required: false,
        }
    }

    pub fn general(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            localized: false,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A named content-type schema.
#[derive(Debug, Clone, Serialize)]
pub struct StructureMetadata {
    pub name: String,
    pub fields: Vec<FieldMetadata>,
}

impl StructureMetadata {
    pub fn new(name: impl Into<String>, fields: Vec<FieldMetadata>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Registry of all known structures, built once at boot.
#[derive(Debug, Default)]
pub struct StructureMetadataRegistry {
    structures: FxHashMap<String, StructureMetadata>,
}

impl StructureMetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, structure: StructureMetadata) {
        self.structures.insert(structure.name.clone(), structure);
    }

    pub fn with(mut self, structure: StructureMetadata) -> Self {
        self.register(structure);
        self
    }

    /// Look up a structure by template name. `None` means the template was
    /// removed from configuration - callers flag, they do not fail.
    pub fn get(&self, name: &str) -> Option<&StructureMetadata> {
        self.structures.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.structures.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}
