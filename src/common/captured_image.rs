use chrono::{DateTime, Utc};
use image::RgbaImage;
use std::sync::Arc;
use uuid::Uuid;

/// A single photo handed over by a capture service. The pixel buffer is
/// shared, never mutated, and cropping produces a new image.
#[derive(Clone)]
pub struct CapturedImage {
    id: Uuid,
    image: Arc<RgbaImage>,
    captured_at: DateTime<Utc>,
}

impl CapturedImage {
    pub fn new(image: RgbaImage) -> Self {
        Self::with_metadata(Uuid::new_v4(), image, Utc::now())
    }

    pub fn with_metadata(id: Uuid, image: RgbaImage, captured_at: DateTime<Utc>) -> Self {
        Self {
            id,
            image: Arc::new(image),
            captured_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

impl std::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedImage")
            .field("id", &self.id)
            .field("dimensions", &self.image.dimensions())
            .field("captured_at", &self.captured_at)
            .finish()
    }
}
