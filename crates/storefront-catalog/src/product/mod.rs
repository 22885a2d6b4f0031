//! Product drafts, payloads and the product store.

mod draft;
mod model;
mod store;

pub use draft::{ProductDraft, SaveError};
pub use model::{
    discount_percent, Product, ProductDetail, ProductPayload, ProductUpdate, VariantSection,
};
pub use store::{InMemoryProductStore, ProductStore, ProductStoreError};
