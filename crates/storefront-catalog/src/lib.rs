//! Product variant engine for the storefront admin console.
//!
//! This crate provides the editing model behind the product create and edit screens:
//!
//! - **Variant**: options and values, the generated variant matrix, image previews,
//!   template fill, and the `VariantEditor` tying them together
//! - **Media**: the image store contract and the product gallery
//! - **Product**: the `ProductDraft` edit buffer, the payload sent on save, and the
//!   product store contract
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_catalog::prelude::*;
//!
//! let mut draft = ProductDraft::new(EditorConfig::default());
//! draft.name = "Áo thun basic".to_string();
//! draft.set_price(Money::new(150_000, Currency::VND));
//! draft.set_has_variants(true);
//!
//! let variants = draft.variants_mut()?;
//! variants.rename_option(0, "Màu")?;
//! variants.add_value(0, "Đỏ")?;
//! variants.add_value(0, "Xanh")?;
//!
//! // Two rows, both at 150.000₫
//! let payload = draft.to_payload()?;
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod money;

pub mod media;
pub mod product;
pub mod variant;

pub use config::EditorConfig;
pub use error::CatalogError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{EditorConfig, LogConfig, LogDestination};
    pub use crate::error::CatalogError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Variant
    pub use crate::variant::{
        FillFilter, FillReport, IdentityKey, OptionList, OptionSnapshot, PendingUpload,
        PreviewIndex, TemplateFiller, UploadApplied, UploadOutcome, VariantAttribute,
        VariantDefaults, VariantEditor, VariantMatrix, VariantRecord, VariantTemplate,
    };

    // Media
    pub use crate::media::{
        GalleryRemoval, ImageBlob, ImageGallery, ImageStore, ImageStoreError, InMemoryImageStore,
        StoredImage,
    };

    // Product
    pub use crate::product::{
        InMemoryProductStore, Product, ProductDetail, ProductDraft, ProductPayload, ProductStore,
        ProductStoreError, VariantSection,
    };
}
