//! Edit buffer behind the product create and edit screens.
//!
//! A draft takes a snapshot of its state when it is opened (or created) and
//! again after every successful save. [`ProductDraft::changes`] diffs the
//! current state against that snapshot.

use storefront_observability::StructuredLogger;

use crate::config::EditorConfig;
use crate::error::CatalogError;
use crate::ids::{CategoryId, ProductId};
use crate::media::{GalleryRemoval, ImageGallery, ImageStore};
use crate::money::Money;
use crate::product::model::{
    discount_percent, Product, ProductDetail, ProductPayload, ProductUpdate, VariantSection,
};
use crate::product::store::{ProductStore, ProductStoreError};
use crate::variant::{
    OptionList, OptionSnapshot, VariantDefaults, VariantEditor, VariantRecord,
};

/// Errors from [`ProductDraft::save`].
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The draft cannot be sent as it is.
    #[error(transparent)]
    Invalid(#[from] CatalogError),

    /// The product store refused or failed.
    #[error(transparent)]
    Store(#[from] ProductStoreError),
}

/// Comparable copy of everything a save would send.
#[derive(Debug, Clone, PartialEq)]
struct DraftState {
    name: String,
    category_id: Option<CategoryId>,
    details: Vec<ProductDetail>,
    images: Vec<String>,
    size_guide: Option<String>,
    sold_count: i64,
    price: Money,
    original_price: Money,
    stock: i64,
    sku: String,
    has_variants: bool,
    options: Vec<OptionSnapshot>,
    variants: Vec<VariantRecord>,
}

/// A product being created or edited.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    id: Option<ProductId>,
    pub name: String,
    pub category_id: Option<CategoryId>,
    pub details: Vec<ProductDetail>,
    pub size_guide: Option<String>,
    pub sold_count: i64,
    pub stock: i64,
    pub sku: String,
    price: Money,
    original_price: Money,
    has_variants: bool,
    gallery: ImageGallery,
    variants: VariantEditor,
    /// Stored gallery images removed since the last save.
    deleted_images: Vec<String>,
    baseline: DraftState,
    config: EditorConfig,
}

impl ProductDraft {
    /// Empty draft for the create screen.
    pub fn new(config: EditorConfig) -> Self {
        let logger = config.logger().with_screen("create");
        Self::with_logger(config, logger)
    }

    /// Empty draft logging through `logger`.
    pub fn with_logger(config: EditorConfig, logger: StructuredLogger) -> Self {
        let zero = Money::zero(config.currency);
        let variants =
            VariantEditor::new(config.max_options, VariantDefaults::zero(config.currency), logger);
        let mut draft = Self {
            id: None,
            name: String::new(),
            category_id: None,
            details: Vec::new(),
            size_guide: None,
            sold_count: 0,
            stock: 0,
            sku: String::new(),
            price: zero,
            original_price: zero,
            has_variants: false,
            gallery: ImageGallery::new(config.max_images),
            variants,
            deleted_images: Vec::new(),
            baseline: empty_state(zero),
            config,
        };
        draft.baseline = draft.state();
        draft
    }

    /// Draft for the edit screen.
    ///
    /// The option list comes from the stored option snapshot, or, for products
    /// saved without one, from the variants' attributes in first-seen order. The
    /// stored variants then reconcile against it by identity key.
    pub fn open(product: &Product, config: EditorConfig) -> Result<Self, CatalogError> {
        let logger = config
            .logger()
            .with_screen("edit")
            .with_product(product.id.as_str());
        Self::open_with_logger(product, config, logger)
    }

    pub fn open_with_logger(
        product: &Product,
        config: EditorConfig,
        logger: StructuredLogger,
    ) -> Result<Self, CatalogError> {
        let defaults = VariantDefaults::new(product.price, product.original_price);
        let variants = if product.has_variants {
            let snapshots = if product.variant_options.is_empty() {
                options_from_attributes(&product.variants)
            } else {
                product.variant_options.clone()
            };
            let mut options = OptionList::from_snapshots(config.max_options, &snapshots)?;
            if options.is_empty() && config.max_options > 0 {
                options.add_option()?;
            }
            VariantEditor::from_stored(options, product.variants.clone(), defaults, logger)
        } else {
            VariantEditor::new(config.max_options, defaults, logger)
        };

        let mut draft = Self {
            id: Some(product.id.clone()),
            name: product.name.clone(),
            category_id: product.category_id.clone(),
            details: product.details.clone(),
            size_guide: product.size_guide.clone(),
            sold_count: product.sold_count,
            stock: product.stock,
            sku: product.sku.clone(),
            price: product.price,
            original_price: product.original_price,
            has_variants: product.has_variants,
            gallery: ImageGallery::from_persisted(&product.images, config.max_images),
            variants,
            deleted_images: Vec::new(),
            baseline: empty_state(product.price),
            config,
        };
        draft.baseline = draft.state();
        Ok(draft)
    }

    pub fn id(&self) -> Option<&ProductId> {
        self.id.as_ref()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    // ---- pricing ----

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn original_price(&self) -> Money {
        self.original_price
    }

    /// Set the product price. Variant rows created from now on start at this price.
    pub fn set_price(&mut self, price: Money) {
        self.price = price;
        self.sync_defaults();
    }

    pub fn set_original_price(&mut self, original_price: Money) {
        self.original_price = original_price;
        self.sync_defaults();
    }

    fn sync_defaults(&mut self) {
        self.variants
            .set_defaults(VariantDefaults::new(self.price, self.original_price));
    }

    /// Price shown in listings: the lowest variant price when variants are on.
    pub fn display_price(&self) -> Money {
        if self.has_variants {
            self.variants
                .matrix()
                .lowest_price()
                .unwrap_or_else(|| Money::zero(self.config.currency))
        } else {
            self.price
        }
    }

    pub fn display_original_price(&self) -> Money {
        if self.has_variants {
            self.variants
                .matrix()
                .lowest_original_price()
                .unwrap_or_else(|| Money::zero(self.config.currency))
        } else {
            self.original_price
        }
    }

    pub fn discount_percent(&self) -> i64 {
        discount_percent(self.display_price(), self.display_original_price())
    }

    // ---- variants ----

    pub fn has_variants(&self) -> bool {
        self.has_variants
    }

    /// Switch variants on or off. Off drops every row; on regenerates from the options.
    pub fn set_has_variants(&mut self, enabled: bool) {
        if enabled == self.has_variants {
            return;
        }
        self.has_variants = enabled;
        if enabled {
            self.variants.regenerate();
        } else {
            self.variants.clear();
        }
    }

    pub fn variants(&self) -> &VariantEditor {
        &self.variants
    }

    /// Variant editor, available only while variants are on.
    pub fn variants_mut(&mut self) -> Result<&mut VariantEditor, CatalogError> {
        if !self.has_variants {
            return Err(CatalogError::VariantsDisabled);
        }
        Ok(&mut self.variants)
    }

    /// Predefined option names offered for the option at `index`.
    pub fn available_variant_types(&self, index: usize) -> Vec<String> {
        self.variants
            .options()
            .available_variant_types(index, &self.config.variant_types)
    }

    // ---- gallery ----

    pub fn gallery(&self) -> &ImageGallery {
        &self.gallery
    }

    /// Append an uploaded image to the gallery.
    pub fn add_image(&mut self, reference: impl Into<String>) -> Result<(), CatalogError> {
        self.gallery.push(reference)
    }

    pub fn move_image(&mut self, from: usize, to: usize) -> Result<(), CatalogError> {
        self.gallery.move_image(from, to)
    }

    /// Remove a gallery image.
    ///
    /// Stored images are deleted by the next save; images uploaded in this
    /// session are deleted from `images` right away.
    pub async fn remove_image<S>(&mut self, index: usize, images: &S) -> Result<(), CatalogError>
    where
        S: ImageStore + ?Sized,
    {
        match self.gallery.remove(index)? {
            GalleryRemoval::Deferred(reference) => {
                self.deleted_images.push(reference);
            }
            GalleryRemoval::Immediate(reference) => match images.remove(&reference).await {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => {
                    self.variants
                        .logger()
                        .warn_builder("image deletion failed")
                        .field("reference", reference)
                        .field("error", e.to_string())
                        .emit();
                }
            },
        }
        Ok(())
    }

    /// Stored gallery images that the next save will ask the store to delete.
    pub fn deleted_images(&self) -> &[String] {
        &self.deleted_images
    }

    // ---- payload and save ----

    /// Build the request body.
    pub fn to_payload(&self) -> Result<ProductPayload, CatalogError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CatalogError::ValidationError(
                "product name is required".to_string(),
            ));
        }

        let variants = if self.has_variants {
            if self.variants.records().is_empty() {
                return Err(CatalogError::ValidationError(
                    "at least one variant is required".to_string(),
                ));
            }
            VariantSection::Variants {
                options: self.variants.options().snapshots(),
                variants: self.variants.records().to_vec(),
            }
        } else {
            VariantSection::Simple {
                price: self.price,
                original_price: self.original_price,
                stock: self.stock,
                sku: self.sku.trim().to_string(),
            }
        };

        Ok(ProductPayload {
            name: name.to_string(),
            category_id: self.category_id.clone(),
            details: self
                .details
                .iter()
                .filter(|d| !d.is_blank())
                .cloned()
                .collect(),
            images: self.gallery.references(),
            size_guide: self.size_guide.clone(),
            sold_count: self.sold_count,
            price: self.display_price(),
            original_price: self.display_original_price(),
            variants,
        })
    }

    fn state(&self) -> DraftState {
        DraftState {
            name: self.name.clone(),
            category_id: self.category_id.clone(),
            details: self.details.clone(),
            images: self.gallery.references(),
            size_guide: self.size_guide.clone(),
            sold_count: self.sold_count,
            price: self.price,
            original_price: self.original_price,
            stock: self.stock,
            sku: self.sku.clone(),
            has_variants: self.has_variants,
            options: self.variants.options().snapshots(),
            variants: self.variants.records().to_vec(),
        }
    }

    /// Names of the fields changed since the draft was opened or last saved.
    pub fn changes(&self) -> Vec<&'static str> {
        let now = self.state();
        let was = &self.baseline;
        let mut changed = Vec::new();
        let checks = [
            ("name", now.name != was.name),
            ("category", now.category_id != was.category_id),
            ("details", now.details != was.details),
            ("images", now.images != was.images),
            ("size_guide", now.size_guide != was.size_guide),
            ("sold_count", now.sold_count != was.sold_count),
            ("price", now.price != was.price),
            ("original_price", now.original_price != was.original_price),
            ("stock", now.stock != was.stock),
            ("sku", now.sku != was.sku),
            ("has_variants", now.has_variants != was.has_variants),
            ("variant_options", now.options != was.options),
            ("variants", now.variants != was.variants),
        ];
        for (field, differs) in checks {
            if differs {
                changed.push(field);
            }
        }
        changed
    }

    pub fn is_dirty(&self) -> bool {
        !self.changes().is_empty()
    }

    /// Create or update the product.
    ///
    /// After the store accepts it, scheduled image deletions are flushed,
    /// backend variant ids are written into the matching rows and the draft
    /// takes a new snapshot.
    pub async fn save<P, S>(&mut self, products: &P, images: &S) -> Result<Product, SaveError>
    where
        P: ProductStore + ?Sized,
        S: ImageStore + ?Sized,
    {
        let payload = self.to_payload()?;
        let stored = match &self.id {
            None => products.create(&payload).await,
            Some(id) => {
                let update = ProductUpdate {
                    id: id.clone(),
                    payload,
                    deleted_image_references: self.deleted_images.clone(),
                };
                products.update(&update).await
            }
        };
        let product = match stored {
            Ok(product) => product,
            Err(e) => {
                self.variants
                    .logger()
                    .error_builder("product save failed")
                    .field("error", e.to_string())
                    .field_bool("new", self.id.is_none())
                    .emit();
                return Err(e.into());
            }
        };

        self.deleted_images.clear();
        if self.id.is_none() {
            self.variants.logger_mut().set_product(product.id.as_str());
        }
        self.id = Some(product.id.clone());
        let assigned = self.variants.assign_ids(&product.variants);
        let flushed = self.variants.flush_image_deletions(images).await;
        self.gallery.mark_persisted();
        self.baseline = self.state();

        self.variants
            .logger()
            .info_builder("product saved")
            .field_usize("variants", product.variants.len())
            .field_i64("stock", product.total_stock())
            .field_usize("variant_ids_assigned", assigned)
            .field_usize("images_deleted", flushed.removed.len())
            .field_usize("images_pending", flushed.failed.len())
            .emit();
        Ok(product)
    }
}

fn empty_state(zero: Money) -> DraftState {
    DraftState {
        name: String::new(),
        category_id: None,
        details: Vec::new(),
        images: Vec::new(),
        size_guide: None,
        sold_count: 0,
        price: zero,
        original_price: zero,
        stock: 0,
        sku: String::new(),
        has_variants: false,
        options: Vec::new(),
        variants: Vec::new(),
    }
}

/// Option snapshots recovered from variant attributes, names and values in first-seen order.
fn options_from_attributes(records: &[VariantRecord]) -> Vec<OptionSnapshot> {
    let mut options: Vec<OptionSnapshot> = Vec::new();
    for attribute in records.iter().flat_map(|r| r.attributes.iter()) {
        let index = match options.iter().position(|o| o.name == attribute.name) {
            Some(index) => index,
            None => {
                options.push(OptionSnapshot {
                    name: attribute.name.clone(),
                    values: Vec::new(),
                });
                options.len() - 1
            }
        };
        let values = &mut options[index].values;
        if !values.contains(&attribute.value) {
            values.push(attribute.value.clone());
        }
    }
    options
}
