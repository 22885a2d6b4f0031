//! Product store contract and an in-memory implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::ids::{ProductId, VariantId};
use crate::product::model::{Product, ProductPayload, ProductUpdate};

/// Errors returned by a product store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductStoreError {
    /// Product not found.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// The store refused the payload.
    #[error("product rejected: {0}")]
    Rejected(String),

    /// The store could not be reached.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Backend holding products.
///
/// The returned product carries backend-assigned variant ids.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn get(&self, id: &ProductId) -> Result<Product, ProductStoreError>;

    async fn create(&self, payload: &ProductPayload) -> Result<Product, ProductStoreError>;

    async fn update(&self, update: &ProductUpdate) -> Result<Product, ProductStoreError>;
}

#[derive(Debug, Default)]
struct StoreState {
    products: HashMap<ProductId, Product>,
    next_variant: u64,
    deleted_images: Vec<String>,
}

impl StoreState {
    fn assign_variant_ids(&mut self, product: &mut Product) {
        for variant in &mut product.variants {
            if variant.id.is_none() {
                self.next_variant += 1;
                variant.id = Some(VariantId::new(format!("var-{}", self.next_variant)));
            }
        }
    }
}

/// In-memory product store (for development/testing).
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    state: Mutex<StoreState>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Image references received in update requests, in order.
    pub async fn deleted_images(&self) -> Vec<String> {
        self.state.lock().await.deleted_images.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.products.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn validate(payload: &ProductPayload) -> Result<(), ProductStoreError> {
    if payload.name.trim().is_empty() {
        return Err(ProductStoreError::Rejected("name is required".to_string()));
    }
    Ok(())
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn get(&self, id: &ProductId) -> Result<Product, ProductStoreError> {
        self.state
            .lock()
            .await
            .products
            .get(id)
            .cloned()
            .ok_or_else(|| ProductStoreError::NotFound(id.clone()))
    }

    async fn create(&self, payload: &ProductPayload) -> Result<Product, ProductStoreError> {
        validate(payload)?;
        let mut state = self.state.lock().await;
        let mut product = Product::from_payload(ProductId::generate(), payload);
        state.assign_variant_ids(&mut product);
        state.products.insert(product.id.clone(), product.clone());
        Ok(product)
    }

    async fn update(&self, update: &ProductUpdate) -> Result<Product, ProductStoreError> {
        validate(&update.payload)?;
        let mut state = self.state.lock().await;
        if !state.products.contains_key(&update.id) {
            return Err(ProductStoreError::NotFound(update.id.clone()));
        }
        let mut product = Product::from_payload(update.id.clone(), &update.payload);
        state.assign_variant_ids(&mut product);
        state
            .deleted_images
            .extend(update.deleted_image_references.iter().cloned());
        state.products.insert(product.id.clone(), product.clone());
        Ok(product)
    }
}
