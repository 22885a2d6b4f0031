//! Ordered product gallery with a size cap.

use crate::error::CatalogError;
use crate::variant::move_item;

#[derive(Debug, Clone, PartialEq, Eq)]
struct GalleryImage {
    reference: String,
    /// Present when the product was opened; deleting it must wait for the save.
    persisted: bool,
}

/// How a removed gallery image must be cleaned up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryRemoval {
    /// Saved with the product: send in the update's deleted-image list.
    Deferred(String),
    /// Uploaded during this session only: delete from the store right away.
    Immediate(String),
}

/// Product gallery images, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGallery {
    images: Vec<GalleryImage>,
    max_images: usize,
}

impl ImageGallery {
    pub fn new(max_images: usize) -> Self {
        Self {
            images: Vec::new(),
            max_images,
        }
    }

    /// Gallery of an existing product. Stored references beyond the cap are kept.
    pub fn from_persisted(references: &[String], max_images: usize) -> Self {
        Self {
            images: references
                .iter()
                .map(|r| GalleryImage {
                    reference: r.clone(),
                    persisted: true,
                })
                .collect(),
            max_images,
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// How many more images fit.
    pub fn remaining_slots(&self) -> usize {
        self.max_images.saturating_sub(self.images.len())
    }

    /// Append a freshly uploaded image.
    pub fn push(&mut self, reference: impl Into<String>) -> Result<(), CatalogError> {
        if self.remaining_slots() == 0 {
            return Err(CatalogError::ImageLimitReached {
                max: self.max_images,
            });
        }
        self.images.push(GalleryImage {
            reference: reference.into(),
            persisted: false,
        });
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<GalleryRemoval, CatalogError> {
        if index >= self.images.len() {
            return Err(CatalogError::ImageOutOfRange(index));
        }
        let image = self.images.remove(index);
        Ok(if image.persisted {
            GalleryRemoval::Deferred(image.reference)
        } else {
            GalleryRemoval::Immediate(image.reference)
        })
    }

    pub fn move_image(&mut self, from: usize, to: usize) -> Result<(), CatalogError> {
        for index in [from, to] {
            if index >= self.images.len() {
                return Err(CatalogError::ImageOutOfRange(index));
            }
        }
        move_item(&mut self.images, from, to);
        Ok(())
    }

    /// References in display order.
    pub fn references(&self) -> Vec<String> {
        self.images.iter().map(|i| i.reference.clone()).collect()
    }

    /// After a successful save every image counts as persisted.
    pub(crate) fn mark_persisted(&mut self) {
        for image in &mut self.images {
            image.persisted = true;
        }
    }
}
