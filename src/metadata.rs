//! Library metadata provider.
//!
//! Types and members come from a JSON manifest extracted from the compiled
//! library ahead of time. The engine only sees the descriptor model.

use crate::error::LoadError;
use crate::model::{MemberDescriptor, TypeDescriptor};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Source of the types and members of one library.
pub trait MetadataProvider {
    /// Name used as the index page title.
    fn library_name(&self) -> &str;

    /// Every type declared by the library, documentable or not.
    fn types(&self) -> &[TypeDescriptor];

    fn members_of<'a>(&'a self, ty: &'a TypeDescriptor) -> &'a [MemberDescriptor] {
        &ty.members
    }

    /// Public, non-delegate types.
    fn public_types(&self) -> Vec<&TypeDescriptor> {
        self.types().iter().filter(|t| t.is_documentable()).collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    types: Vec<TypeDescriptor>,
}

/// Library described by a metadata manifest.
#[derive(Debug, Clone)]
pub struct ManifestLibrary {
    name: String,
    types: Vec<TypeDescriptor>,
}

impl ManifestLibrary {
    /// Load the manifest belonging to `source` (see [`manifest_path`]).
    pub fn load(source: &Path) -> Result<Self, LoadError> {
        let path = manifest_path(source);
        let json = fs::read_to_string(&path).map_err(|source| LoadError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_json(&json, &library_stem(source))
            .map_err(|source| LoadError::Manifest { path, source })
    }

    /// Parse a manifest; `fallback_name` is used when it names no library.
    pub fn from_json(json: &str, fallback_name: &str) -> Result<Self, serde_json::Error> {
        let manifest: Manifest = serde_json::from_str(json)?;
        Ok(Self {
            name: manifest
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| fallback_name.to_string()),
            types: manifest.types,
        })
    }
}

impl MetadataProvider for ManifestLibrary {
    fn library_name(&self) -> &str {
        &self.name
    }

    fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }
}

/// `Acme.Core.dll` → `Acme.Core.json`; a `.json` source is the manifest itself.
pub fn manifest_path(source: &Path) -> PathBuf {
    match source.extension().and_then(|e| e.to_str()) {
        Some("json") => source.to_path_buf(),
        _ => source.with_extension("json"),
    }
}

/// `Acme.Core.dll` → `Acme.Core.xml`.
pub fn documentation_path(source: &Path) -> PathBuf {
    source.with_extension("xml")
}

fn library_stem(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
