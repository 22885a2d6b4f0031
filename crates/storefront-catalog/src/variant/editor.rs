//! The variant section of a product editor.
//!
//! [`VariantEditor`] owns the option list, the generated matrix and the preview
//! table, and keeps them consistent: every option or value change regenerates
//! the matrix, re-sorts it and rebuilds the previews through identity keys.
//! Image uploads run outside the editor and come back as [`UploadOutcome`]s that
//! address their row by identity, so completions may arrive in any order.

use std::collections::HashMap;

use storefront_observability::StructuredLogger;

use crate::error::CatalogError;
use crate::media::{ImageBlob, ImageStore, ImageStoreError, StoredImage};
use crate::money::Money;
use crate::variant::matrix::{Regeneration, VariantDefaults, VariantMatrix};
use crate::variant::option::OptionList;
use crate::variant::preview::{PreviewArtifact, PreviewIndex};
use crate::variant::record::{IdentityKey, VariantRecord};
use crate::variant::template::{FillReport, TemplateFiller, VariantTemplate};

/// An upload staged for a row, detached from the editor so it can be awaited freely.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    key: IdentityKey,
    ticket: u64,
    blob: ImageBlob,
}

impl PendingUpload {
    /// Identity of the row the image belongs to.
    pub fn key(&self) -> &IdentityKey {
        &self.key
    }

    pub fn blob(&self) -> &ImageBlob {
        &self.blob
    }

    /// Send the blob to the store.
    pub async fn run<S>(self, store: &S) -> UploadOutcome
    where
        S: ImageStore + ?Sized,
    {
        let result = store.upload(&self.blob).await;
        UploadOutcome {
            key: self.key,
            ticket: self.ticket,
            result,
        }
    }
}

/// A finished upload, ready to be applied with [`VariantEditor::apply_upload`].
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub key: IdentityKey,
    /// Staging sequence number; only the latest one per identity is applied.
    pub ticket: u64,
    pub result: Result<StoredImage, ImageStoreError>,
}

/// What applying an upload did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadApplied {
    /// The reference was written to the row now at `position`.
    Stored { position: usize },
    /// The upload failed; the row's image and preview were cleared.
    Failed {
        position: Option<usize>,
        error: ImageStoreError,
    },
    /// The row disappeared while uploading; the stored image is scheduled for deletion.
    Orphaned { reference: String },
    /// A later image was staged or the image was removed since this upload started.
    /// The row is untouched; a stored image is scheduled for deletion.
    Superseded { reference: Option<String> },
}

/// Result of [`VariantEditor::flush_image_deletions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub removed: Vec<String>,
    /// References kept for the next flush.
    pub failed: Vec<String>,
}

/// Editor state for a product's variants.
#[derive(Debug, Clone)]
pub struct VariantEditor {
    options: OptionList,
    matrix: VariantMatrix,
    previews: PreviewIndex,
    defaults: VariantDefaults,
    pending_deletions: Vec<String>,
    upload_tickets: HashMap<IdentityKey, u64>,
    next_ticket: u64,
    logger: StructuredLogger,
}

impl VariantEditor {
    /// Editor for a new product: one blank option, no rows.
    pub fn new(max_options: usize, defaults: VariantDefaults, logger: StructuredLogger) -> Self {
        Self {
            options: OptionList::new(max_options),
            matrix: VariantMatrix::new(),
            previews: PreviewIndex::new(),
            defaults,
            pending_deletions: Vec::new(),
            upload_tickets: HashMap::new(),
            next_ticket: 0,
            logger,
        }
    }

    /// Editor for stored data. The stored rows are reconciled against `options` at once,
    /// so rows that no longer match a combination are dropped.
    pub fn from_stored(
        options: OptionList,
        records: Vec<VariantRecord>,
        defaults: VariantDefaults,
        logger: StructuredLogger,
    ) -> Self {
        let mut editor = Self {
            options,
            matrix: VariantMatrix::from_records(records),
            previews: PreviewIndex::new(),
            defaults,
            pending_deletions: Vec::new(),
            upload_tickets: HashMap::new(),
            next_ticket: 0,
            logger,
        };
        editor.regenerate();
        editor
    }

    pub fn options(&self) -> &OptionList {
        &self.options
    }

    pub fn matrix(&self) -> &VariantMatrix {
        &self.matrix
    }

    pub fn records(&self) -> &[VariantRecord] {
        self.matrix.records()
    }

    pub fn previews(&self) -> &PreviewIndex {
        &self.previews
    }

    pub fn defaults(&self) -> VariantDefaults {
        self.defaults
    }

    /// Defaults for rows created from now on. Existing rows keep their prices.
    pub fn set_defaults(&mut self, defaults: VariantDefaults) {
        self.defaults = defaults;
    }

    /// Image references waiting to be deleted from the store.
    pub fn pending_deletions(&self) -> &[String] {
        &self.pending_deletions
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut StructuredLogger {
        &mut self.logger
    }

    // ---- options and values ----

    /// Append a blank option. Blank options do not generate rows, so the matrix is unchanged.
    pub fn add_option(&mut self) -> Result<usize, CatalogError> {
        self.options.add_option()
    }

    pub fn remove_option(&mut self, index: usize) -> Result<(), CatalogError> {
        self.options.remove_option(index)?;
        self.regenerate();
        Ok(())
    }

    pub fn rename_option(&mut self, index: usize, name: &str) -> Result<(), CatalogError> {
        self.options.rename_option(index, name)?;
        self.regenerate();
        Ok(())
    }

    pub fn move_option(&mut self, from: usize, to: usize) -> Result<(), CatalogError> {
        self.options.move_option(from, to)?;
        self.resort();
        Ok(())
    }

    pub fn add_value(&mut self, option_index: usize, name: &str) -> Result<usize, CatalogError> {
        let index = self.options.add_value(option_index, name)?;
        self.regenerate();
        Ok(index)
    }

    pub fn remove_value(
        &mut self,
        option_index: usize,
        value_index: usize,
    ) -> Result<(), CatalogError> {
        self.options.remove_value(option_index, value_index)?;
        self.regenerate();
        Ok(())
    }

    pub fn move_value(
        &mut self,
        option_index: usize,
        from: usize,
        to: usize,
    ) -> Result<(), CatalogError> {
        self.options.move_value(option_index, from, to)?;
        self.resort();
        Ok(())
    }

    /// Recompute the rows from the options, then sort and carry previews over by identity.
    pub fn regenerate(&mut self) -> Regeneration {
        let previews = self.previews.by_identity(&self.matrix.identity_keys());
        let outcome = self.matrix.regenerate(&self.options, &self.defaults);
        self.matrix.sort(&self.options);
        self.previews = PreviewIndex::rebuild(&previews, &self.matrix.identity_keys());

        self.logger
            .debug_builder("variants regenerated")
            .field_usize("rows", self.matrix.len())
            .field_usize("created", outcome.created)
            .field_usize("reconciled", outcome.reconciled)
            .field_usize("discarded", outcome.discarded.len())
            .emit();
        for reference in outcome.discarded_images() {
            self.schedule_deletion(reference.to_string(), "variant discarded");
        }
        outcome
    }

    fn resort(&mut self) {
        let previews = self.previews.by_identity(&self.matrix.identity_keys());
        self.matrix.sort(&self.options);
        self.previews = PreviewIndex::rebuild(&previews, &self.matrix.identity_keys());
    }

    // ---- rows ----

    /// Delete a row. Its stored image is scheduled for deletion.
    pub fn remove_variant(&mut self, position: usize) -> Result<VariantRecord, CatalogError> {
        let record = self.matrix.remove(position)?;
        self.previews = self.previews.after_removal(position);
        if let Some(reference) = &record.variation_image {
            self.schedule_deletion(reference.clone(), "variant removed");
        }
        Ok(record)
    }

    /// Drag a row to a new position. Kept until the next sort.
    pub fn move_variant(&mut self, from: usize, to: usize) -> Result<(), CatalogError> {
        let previews = self.previews.by_identity(&self.matrix.identity_keys());
        self.matrix.move_row(from, to)?;
        self.previews = PreviewIndex::rebuild(&previews, &self.matrix.identity_keys());
        Ok(())
    }

    pub fn apply_uniform_price(&mut self, price: Money) {
        self.matrix.apply_uniform_price(price);
    }

    pub fn set_price(&mut self, position: usize, price: Money) -> Result<(), CatalogError> {
        self.row_mut(position)?.price = price;
        Ok(())
    }

    pub fn set_original_price(&mut self, position: usize, price: Money) -> Result<(), CatalogError> {
        self.row_mut(position)?.original_price = price;
        Ok(())
    }

    pub fn set_stock(&mut self, position: usize, stock: i64) -> Result<(), CatalogError> {
        self.row_mut(position)?.stock = stock;
        Ok(())
    }

    pub fn set_sold_count(&mut self, position: usize, sold: i64) -> Result<(), CatalogError> {
        self.row_mut(position)?.sold_count = sold;
        Ok(())
    }

    pub fn set_sku(&mut self, position: usize, sku: &str) -> Result<(), CatalogError> {
        self.row_mut(position)?.sku = sku.trim().to_string();
        Ok(())
    }

    fn row_mut(&mut self, position: usize) -> Result<&mut VariantRecord, CatalogError> {
        self.matrix
            .get_mut(position)
            .ok_or(CatalogError::VariantOutOfRange(position))
    }

    /// Fill empty fields of the rows accepted by `filter` from `template`.
    ///
    /// Rows that receive the template image also show it as their preview.
    pub fn fill_from_template<F>(
        &mut self,
        template: &VariantTemplate,
        filter: F,
    ) -> Result<FillReport, CatalogError>
    where
        F: Fn(&VariantRecord) -> bool,
    {
        let report = TemplateFiller::fill(template, self.matrix.records_mut(), filter);
        if let Some(image) = template.image.as_deref() {
            let rows = self.matrix.len();
            for &position in &report.images_filled {
                self.previews
                    .set(position, PreviewArtifact::from_reference(image), rows)?;
            }
        }
        self.logger
            .debug_builder("template applied")
            .field_usize("rows_matched", report.rows_matched)
            .field_usize("fields_filled", report.fields_filled)
            .emit();
        Ok(report)
    }

    /// Switch variants off: every row is dropped and its stored image scheduled for deletion.
    pub fn clear(&mut self) -> Vec<VariantRecord> {
        let records = self.matrix.clear();
        self.previews = PreviewIndex::new();
        for reference in records.iter().filter_map(|r| r.variation_image.clone()) {
            self.schedule_deletion(reference, "variants disabled");
        }
        records
    }

    /// Write backend ids into the rows with matching identity. Returns how many were written.
    pub fn assign_ids(&mut self, saved: &[VariantRecord]) -> usize {
        let mut assigned = 0;
        for stored in saved {
            let Some(id) = &stored.id else { continue };
            if let Some(position) = self.matrix.position_of(&stored.identity_key()) {
                if let Some(record) = self.matrix.get_mut(position) {
                    record.id = Some(id.clone());
                    assigned += 1;
                }
            }
        }
        assigned
    }

    // ---- images ----

    /// Show a local preview for a row right away and hand back the upload to run.
    pub fn stage_variant_image(
        &mut self,
        position: usize,
        blob: ImageBlob,
    ) -> Result<PendingUpload, CatalogError> {
        let key = self
            .matrix
            .get(position)
            .map(VariantRecord::identity_key)
            .ok_or(CatalogError::VariantOutOfRange(position))?;
        self.previews
            .set(position, PreviewArtifact::from_blob(&blob), self.matrix.len())?;
        let ticket = self.bump_ticket(&key);
        Ok(PendingUpload { key, ticket, blob })
    }

    /// Invalidate every upload staged so far for this identity.
    fn bump_ticket(&mut self, key: &IdentityKey) -> u64 {
        self.next_ticket += 1;
        self.upload_tickets.insert(key.clone(), self.next_ticket);
        self.next_ticket
    }

    fn is_superseded(&self, outcome: &UploadOutcome) -> bool {
        self.upload_tickets
            .get(&outcome.key)
            .is_some_and(|&latest| latest != outcome.ticket)
    }

    /// Apply a finished upload to the row with the outcome's identity, wherever it is now.
    ///
    /// An outcome older than the latest staging for its row is dropped.
    pub fn apply_upload(&mut self, outcome: UploadOutcome) -> UploadApplied {
        let position = self.matrix.position_of(&outcome.key);
        if position.is_some() && self.is_superseded(&outcome) {
            let reference = outcome.result.ok().map(|s| s.reference().to_string());
            self.logger
                .debug_builder("stale variant upload dropped")
                .field("variant", outcome.key.to_string())
                .field_bool("stored", reference.is_some())
                .emit();
            if let Some(reference) = &reference {
                self.schedule_deletion(reference.clone(), "variant upload superseded");
            }
            return UploadApplied::Superseded { reference };
        }
        match (outcome.result, position) {
            (Ok(stored), Some(position)) => {
                let reference = stored.reference().to_string();
                let replaced = self
                    .matrix
                    .get_mut(position)
                    .and_then(|r| r.variation_image.replace(reference.clone()));
                if let Some(old) = replaced.filter(|old| *old != reference) {
                    self.schedule_deletion(old, "variant image replaced");
                }
                UploadApplied::Stored { position }
            }
            (Ok(stored), None) => {
                let reference = stored.reference().to_string();
                self.schedule_deletion(reference.clone(), "variant gone before upload finished");
                UploadApplied::Orphaned { reference }
            }
            (Err(error), position) => {
                self.logger
                    .warn_builder("variant image upload failed")
                    .field("variant", outcome.key.to_string())
                    .field("error", error.to_string())
                    .emit();
                if let Some(position) = position {
                    self.previews.clear(position);
                    let cleared = self
                        .matrix
                        .get_mut(position)
                        .and_then(|r| r.variation_image.take());
                    if let Some(old) = cleared {
                        self.schedule_deletion(old, "variant image cleared");
                    }
                }
                UploadApplied::Failed { position, error }
            }
        }
    }

    /// Clear a row's image and preview. The stored image is scheduled for deletion.
    ///
    /// Uploads still in flight for the row are superseded.
    pub fn remove_variant_image(&mut self, position: usize) -> Result<Option<String>, CatalogError> {
        let row = self.row_mut(position)?;
        let removed = row.variation_image.take();
        let key = row.identity_key();
        self.bump_ticket(&key);
        self.previews.clear(position);
        if let Some(reference) = &removed {
            self.schedule_deletion(reference.clone(), "variant image removed");
        }
        Ok(removed)
    }

    /// What to show for a row: the local preview, else the stored image.
    pub fn preview_for(&self, position: usize) -> Option<&str> {
        self.previews
            .get(position)
            .map(PreviewArtifact::as_str)
            .or_else(|| {
                self.matrix
                    .get(position)
                    .and_then(|r| r.variation_image.as_deref())
            })
    }

    /// Delete every scheduled reference. Missing images count as deleted; other
    /// failures stay scheduled.
    pub async fn flush_image_deletions<S>(&mut self, store: &S) -> FlushReport
    where
        S: ImageStore + ?Sized,
    {
        let mut report = FlushReport::default();
        for reference in std::mem::take(&mut self.pending_deletions) {
            match store.remove(&reference).await {
                Ok(()) => report.removed.push(reference),
                Err(e) if e.is_not_found() => report.removed.push(reference),
                Err(e) => {
                    self.logger
                        .warn_builder("image deletion failed")
                        .field("reference", reference.clone())
                        .field("error", e.to_string())
                        .emit();
                    report.failed.push(reference);
                }
            }
        }
        self.pending_deletions = report.failed.clone();
        report
    }

    fn schedule_deletion(&mut self, reference: String, reason: &str) {
        if self.pending_deletions.contains(&reference) {
            return;
        }
        self.logger
            .info_builder("image scheduled for deletion")
            .field("reference", reference.clone())
            .field("reason", reason)
            .emit();
        self.pending_deletions.push(reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::InMemoryImageStore;
    use crate::money::Currency;
    use storefront_observability::{LogSink, MemorySink, SessionId};

    fn vnd(amount: i64) -> Money {
        Money::new(amount, Currency::VND)
    }

    fn editor() -> (VariantEditor, MemorySink) {
        let sink = MemorySink::new();
        let logger = StructuredLogger::new(SessionId::from_string("sess-test"))
            .with_min_level(storefront_observability::LogLevel::Debug)
            .with_sink(LogSink::Memory(sink.clone()));
        let editor = VariantEditor::new(3, VariantDefaults::new(vnd(50), vnd(0)), logger);
        (editor, sink)
    }

    fn colors(editor: &mut VariantEditor, values: &[&str]) {
        editor.rename_option(0, "Color").unwrap();
        for value in values {
            editor.add_value(0, value).unwrap();
        }
    }

    fn blob(name: &str) -> ImageBlob {
        ImageBlob::new(name, "image/png", vec![1, 2, 3])
    }

    #[test]
    fn test_value_changes_regenerate() {
        let (mut editor, sink) = editor();
        colors(&mut editor, &["Red", "Blue"]);
        assert_eq!(editor.records().len(), 2);
        assert!(editor.records().iter().all(|r| r.price == vnd(50)));
        assert!(!sink.find("variants regenerated").is_empty());
    }

    #[test]
    fn test_rejected_change_leaves_state() {
        let (mut editor, _) = editor();
        colors(&mut editor, &["Red"]);
        let before = editor.records().to_vec();
        assert!(editor.add_value(0, "Red").is_err());
        assert!(editor.add_value(0, " ").is_err());
        assert_eq!(editor.records(), before.as_slice());
    }

    #[test]
    fn test_preview_follows_row_through_reorder() {
        let (mut editor, _) = editor();
        colors(&mut editor, &["Red", "Blue", "Green"]);
        editor.stage_variant_image(2, blob("green.png")).unwrap();

        editor.move_value(0, 2, 0).unwrap();
        assert_eq!(editor.records()[0].label(), "Green");
        assert!(editor.previews().get(0).is_some());
        assert!(editor.previews().get(2).is_none());

        editor.remove_variant(1).unwrap();
        assert!(editor.previews().get(0).is_some());
        assert!(editor.previews().is_consistent(editor.records().len()));
    }

    #[test]
    fn test_move_variant_until_next_sort() {
        let (mut editor, _) = editor();
        colors(&mut editor, &["Red", "Blue"]);
        editor.stage_variant_image(0, blob("red.png")).unwrap();
        editor.move_variant(0, 1).unwrap();
        assert_eq!(editor.records()[1].label(), "Red");
        assert!(editor.previews().get(1).is_some());

        editor.add_value(0, "Green").unwrap();
        assert_eq!(editor.records()[0].label(), "Red");
        assert!(editor.previews().get(0).is_some());
    }

    #[tokio::test]
    async fn test_upload_lands_on_moved_row() {
        let (mut editor, _) = editor();
        let store = InMemoryImageStore::default();
        colors(&mut editor, &["Red", "Blue"]);
        let pending = editor.stage_variant_image(1, blob("blue.png")).unwrap();

        editor.move_value(0, 1, 0).unwrap();
        let outcome = pending.run(&store).await;
        assert_eq!(editor.apply_upload(outcome), UploadApplied::Stored { position: 0 });
        assert_eq!(editor.records()[0].label(), "Blue");
        assert_eq!(
            editor.records()[0].variation_image.as_deref(),
            Some("memory://images/1-blue.png")
        );
    }

    #[tokio::test]
    async fn test_failed_upload_clears_image_and_preview() {
        let (mut editor, sink) = editor();
        let store = InMemoryImageStore::default();
        colors(&mut editor, &["Red"]);
        store.fail_next_uploads(1).await;

        let pending = editor.stage_variant_image(0, blob("red.png")).unwrap();
        assert!(editor.preview_for(0).unwrap().starts_with("data:image/png;base64,"));
        let applied = editor.apply_upload(pending.run(&store).await);

        assert!(matches!(applied, UploadApplied::Failed { position: Some(0), .. }));
        assert!(editor.records()[0].variation_image.is_none());
        assert!(editor.preview_for(0).is_none());
        assert_eq!(sink.find("variant image upload failed").len(), 1);
    }

    #[tokio::test]
    async fn test_older_upload_does_not_overwrite_newer() {
        let (mut editor, _) = editor();
        let store = InMemoryImageStore::default();
        colors(&mut editor, &["Red"]);
        let first = editor.stage_variant_image(0, blob("a.png")).unwrap();
        let second = editor
            .stage_variant_image(0, ImageBlob::new("b.png", "image/png", vec![2]))
            .unwrap();
        let shown = editor.preview_for(0).unwrap().to_string();

        let second_done = second.run(&store).await;
        let first_done = first.run(&store).await;
        assert_eq!(editor.apply_upload(second_done), UploadApplied::Stored { position: 0 });
        let stale = "memory://images/2-a.png".to_string();
        assert_eq!(
            editor.apply_upload(first_done),
            UploadApplied::Superseded { reference: Some(stale.clone()) }
        );

        assert_eq!(
            editor.records()[0].variation_image.as_deref(),
            Some("memory://images/1-b.png")
        );
        assert_eq!(editor.preview_for(0), Some(shown.as_str()));
        assert_eq!(editor.pending_deletions(), &[stale]);
    }

    #[tokio::test]
    async fn test_stale_failure_keeps_newer_image() {
        let (mut editor, _) = editor();
        let store = InMemoryImageStore::default();
        colors(&mut editor, &["Red"]);
        let first = editor.stage_variant_image(0, blob("a.png")).unwrap();
        let second = editor.stage_variant_image(0, blob("b.png")).unwrap();

        let second_done = second.run(&store).await;
        editor.apply_upload(second_done);
        store.fail_next_uploads(1).await;
        let first_done = first.run(&store).await;

        assert_eq!(
            editor.apply_upload(first_done),
            UploadApplied::Superseded { reference: None }
        );
        assert_eq!(
            editor.records()[0].variation_image.as_deref(),
            Some("memory://images/1-b.png")
        );
        assert!(editor.previews().get(0).is_some());
        assert!(editor.pending_deletions().is_empty());
    }

    #[tokio::test]
    async fn test_removed_image_supersedes_upload_in_flight() {
        let (mut editor, _) = editor();
        let store = InMemoryImageStore::default();
        colors(&mut editor, &["Red"]);
        let pending = editor.stage_variant_image(0, blob("red.png")).unwrap();
        editor.remove_variant_image(0).unwrap();

        let applied = editor.apply_upload(pending.run(&store).await);
        assert!(matches!(applied, UploadApplied::Superseded { reference: Some(_) }));
        assert!(editor.records()[0].variation_image.is_none());
        assert_eq!(editor.preview_for(0), None);
        assert_eq!(editor.pending_deletions().len(), 1);
    }

    #[tokio::test]
    async fn test_upload_for_vanished_row_is_orphaned() {
        let (mut editor, _) = editor();
        let store = InMemoryImageStore::default();
        colors(&mut editor, &["Red", "Blue"]);
        let pending = editor.stage_variant_image(0, blob("red.png")).unwrap();
        editor.remove_value(0, 0).unwrap();

        let applied = editor.apply_upload(pending.run(&store).await);
        let reference = "memory://images/1-red.png".to_string();
        assert_eq!(applied, UploadApplied::Orphaned { reference: reference.clone() });
        assert_eq!(editor.pending_deletions(), &[reference.clone()]);

        let report = editor.flush_image_deletions(&store).await;
        assert_eq!(report.removed, vec![reference]);
        assert!(editor.pending_deletions().is_empty());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_removed_variant_schedules_image() {
        let (mut editor, _) = editor();
        let store = InMemoryImageStore::default();
        colors(&mut editor, &["Red", "Blue"]);
        let pending = editor.stage_variant_image(0, blob("red.png")).unwrap();
        editor.apply_upload(pending.run(&store).await);

        let removed = editor.remove_variant(0).unwrap();
        assert_eq!(removed.label(), "Red");
        assert_eq!(editor.pending_deletions().len(), 1);
        assert!(editor.previews().is_empty());
    }

    #[tokio::test]
    async fn test_flush_treats_missing_as_removed() {
        let (mut editor, _) = editor();
        let store = InMemoryImageStore::default();
        colors(&mut editor, &["Red"]);
        editor.matrix.get_mut(0).unwrap().variation_image = Some("memory://images/gone.png".into());
        editor.remove_variant_image(0).unwrap();

        let report = editor.flush_image_deletions(&store).await;
        assert_eq!(report.removed.len(), 1);
        assert!(report.failed.is_empty());
    }

    #[test]
    fn test_template_image_sets_preview() {
        let (mut editor, _) = editor();
        colors(&mut editor, &["Red", "Blue"]);
        let template = VariantTemplate {
            image: Some("memory://images/shared.png".to_string()),
            ..Default::default()
        };
        let report = editor
            .fill_from_template(&template, |r| r.attribute("Color") == Some("Blue"))
            .unwrap();
        assert_eq!(report.images_filled, vec![1]);
        assert_eq!(editor.preview_for(1), Some("memory://images/shared.png"));
        assert_eq!(editor.preview_for(0), None);
    }

    #[test]
    fn test_clear_drops_rows_and_schedules_images() {
        let (mut editor, _) = editor();
        colors(&mut editor, &["Red", "Blue"]);
        editor.matrix.get_mut(1).unwrap().variation_image = Some("img/blue.png".into());
        let dropped = editor.clear();
        assert_eq!(dropped.len(), 2);
        assert!(editor.records().is_empty());
        assert_eq!(editor.pending_deletions(), &["img/blue.png".to_string()]);
    }

    #[test]
    fn test_assign_ids_by_identity() {
        let (mut editor, _) = editor();
        colors(&mut editor, &["Red", "Blue"]);
        let mut saved = editor.records().to_vec();
        saved.reverse();
        saved[0].id = Some(crate::ids::VariantId::new("v-blue"));
        assert_eq!(editor.assign_ids(&saved), 1);
        assert_eq!(
            editor.records()[1].id,
            Some(crate::ids::VariantId::new("v-blue"))
        );
    }
}
