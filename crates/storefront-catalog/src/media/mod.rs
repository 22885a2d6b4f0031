//! Image storage collaborator and the product gallery.

mod gallery;
mod store;

pub use gallery::{GalleryRemoval, ImageGallery};
pub use store::{ImageBlob, ImageStore, ImageStoreError, InMemoryImageStore, StoredImage};
