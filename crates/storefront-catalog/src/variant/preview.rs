//! Position-keyed preview table for variant images that are still uploading.
//!
//! Positions are not identities: every structural change of the matrix produces a
//! new index, either by shifting keys past a removed row or by carrying artifacts
//! through their identity key to the rows' new positions.

use std::collections::{BTreeMap, HashMap};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::CatalogError;
use crate::media::ImageBlob;
use crate::variant::record::IdentityKey;

/// A locally held preview shown before (or instead of) the stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewArtifact(String);

impl PreviewArtifact {
    /// Inline `data:` URL for a picked file.
    pub fn from_blob(blob: &ImageBlob) -> Self {
        Self(format!(
            "data:{};base64,{}",
            blob.content_type,
            STANDARD.encode(&blob.bytes)
        ))
    }

    /// Preview pointing at an already stored image (template fill).
    pub fn from_reference(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Map from row position to preview artifact. Every key is below the row count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewIndex {
    entries: BTreeMap<usize, PreviewArtifact>,
}

impl PreviewIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&PreviewArtifact> {
        self.entries.get(&position)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &PreviewArtifact)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Store an artifact for a row. `row_count` is the current matrix length.
    pub fn set(
        &mut self,
        position: usize,
        artifact: PreviewArtifact,
        row_count: usize,
    ) -> Result<Option<PreviewArtifact>, CatalogError> {
        if position >= row_count {
            return Err(CatalogError::VariantOutOfRange(position));
        }
        Ok(self.entries.insert(position, artifact))
    }

    /// Drop the artifact at a position.
    pub fn clear(&mut self, position: usize) -> Option<PreviewArtifact> {
        self.entries.remove(&position)
    }

    /// Index for the matrix after the row at `removed` is deleted.
    pub fn after_removal(&self, removed: usize) -> PreviewIndex {
        let entries = self
            .entries
            .iter()
            .filter(|(k, _)| **k != removed)
            .map(|(k, v)| {
                let key = if *k > removed { k - 1 } else { *k };
                (key, v.clone())
            })
            .collect();
        PreviewIndex { entries }
    }

    /// Artifacts keyed by the identity of the row they currently sit on.
    ///
    /// `keys` are the matrix's identity keys in row order; entries beyond it are dropped.
    pub fn by_identity(&self, keys: &[IdentityKey]) -> HashMap<IdentityKey, PreviewArtifact> {
        self.entries
            .iter()
            .filter_map(|(position, artifact)| {
                keys.get(*position).map(|key| (key.clone(), artifact.clone()))
            })
            .collect()
    }

    /// Place each artifact at the new position of its identity; vanished identities are dropped.
    pub fn rebuild(
        by_identity: &HashMap<IdentityKey, PreviewArtifact>,
        keys: &[IdentityKey],
    ) -> PreviewIndex {
        let entries = keys
            .iter()
            .enumerate()
            .filter_map(|(position, key)| by_identity.get(key).map(|a| (position, a.clone())))
            .collect();
        PreviewIndex { entries }
    }

    /// True when every key addresses an existing row.
    pub fn is_consistent(&self, row_count: usize) -> bool {
        self.entries.keys().all(|k| *k < row_count)
    }
}
