//! Variant engine: options, the generated matrix, previews and template fill.

mod editor;
mod matrix;
mod option;
mod preview;
mod record;
mod template;

pub use editor::{FlushReport, PendingUpload, UploadApplied, UploadOutcome, VariantEditor};
pub use matrix::{Regeneration, VariantDefaults, VariantMatrix};
pub use option::{OptionList, OptionSnapshot, OptionValue, ValueSet, VariantOption};
pub use preview::{PreviewArtifact, PreviewIndex};
pub use record::{IdentityKey, VariantAttribute, VariantRecord};
pub use template::{FillFilter, FillReport, TemplateFiller, VariantTemplate};

/// Move an element within a vector. Both indices must be in bounds.
pub(crate) fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}
