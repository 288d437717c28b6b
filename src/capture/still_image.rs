use super::service::{CaptureService, IlluminationMode, PermissionStatus};
use crate::common::CapturedImage;
use crate::error::CaptureError;
use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use uuid::Uuid;

/// Capture backed by a photo on disk. Every request decodes the file again,
/// the way a device would hand back a fresh frame.
pub struct StillImageCapture {
    path: PathBuf,
    permission: PermissionStatus,
    grant_on_request: bool,
    has_torch: bool,
    illumination: IlluminationMode,
    started: bool,
}

impl StillImageCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            permission: PermissionStatus::Authorized,
            grant_on_request: true,
            has_torch: true,
            illumination: IlluminationMode::Off,
            started: false,
        }
    }

    pub fn with_permission(mut self, permission: PermissionStatus, grant_on_request: bool) -> Self {
        self.permission = permission;
        self.grant_on_request = grant_on_request;
        self
    }

    pub fn without_torch(mut self) -> Self {
        self.has_torch = false;
        self
    }
}

#[async_trait]
impl CaptureService for StillImageCapture {
    async fn start(&mut self) -> Result<(), CaptureError> {
        let grant = self.grant_on_request;
        self.permission = self.permission.resolve(|| grant).inspect_err(|e| {
            tracing::warn!("Camera permission not granted: {}", e);
        })?;

        if !self.path.is_file() {
            return Err(CaptureError::DeviceUnavailable(format!(
                "no photo at '{}'",
                self.path.display()
            )));
        }

        self.illumination = IlluminationMode::Off;
        self.started = true;
        tracing::info!("Still image capture started from {}", self.path.display());
        Ok(())
    }

    async fn request_capture(&mut self) -> Result<CapturedImage, CaptureError> {
        if !self.started {
            return Err(CaptureError::NotStarted);
        }

        let capture_id = Uuid::new_v4();
        let path = self.path.clone();
        let decoded = tokio::task::spawn_blocking(move || image::open(path))
            .await
            .map_err(|e| CaptureError::NoImageData {
                capture_id,
                reason: e.to_string(),
            })?
            .map_err(|e| CaptureError::NoImageData {
                capture_id,
                reason: e.to_string(),
            })?;

        let image = CapturedImage::with_metadata(capture_id, decoded.to_rgba8(), Utc::now());
        tracing::debug!("Captured {:?}", image);
        Ok(image)
    }

    fn set_illumination(&mut self, mode: IlluminationMode) -> Result<(), CaptureError> {
        if !self.started {
            return Err(CaptureError::NotStarted);
        }
        if self.has_torch {
            self.illumination = mode;
        }
        Ok(())
    }

    fn illumination(&self) -> IlluminationMode {
        self.illumination
    }

    fn has_illumination(&self) -> bool {
        self.has_torch
    }

    fn stop(&mut self) {
        if self.started {
            tracing::info!("Still image capture stopped");
        }
        self.started = false;
        self.illumination = IlluminationMode::Off;
    }

    fn name(&self) -> &'static str {
        "still-image"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_photo(color: [u8; 4]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("color-coder-{}.png", Uuid::new_v4()));
        RgbaImage::from_pixel(12, 8, Rgba(color))
            .save(&path)
            .expect("Failed to write test photo");
        path
    }

    #[tokio::test]
    async fn decodes_photo_from_disk() {
        let path = write_photo([0, 0, 255, 255]);
        let mut capture = StillImageCapture::new(&path);
        capture.start().await.unwrap();

        let image = capture.request_capture().await.unwrap();
        assert_eq!(image.dimensions(), (12, 8));
        assert_eq!(*image.pixels().get_pixel(3, 3), Rgba([0, 0, 255, 255]));

        let again = capture.request_capture().await.unwrap();
        assert_ne!(image.id(), again.id());

        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn capture_before_start_is_rejected() {
        let mut capture = StillImageCapture::new("/tmp/whatever.png");
        assert_eq!(
            capture.request_capture().await.unwrap_err(),
            CaptureError::NotStarted
        );
    }

    #[tokio::test]
    async fn missing_photo_means_no_device() {
        let mut capture = StillImageCapture::new("/no/such/photo.png");
        assert!(matches!(
            capture.start().await,
            Err(CaptureError::DeviceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn refused_permission_blocks_start() {
        let path = write_photo([1, 2, 3, 255]);
        let mut capture = StillImageCapture::new(&path)
            .with_permission(PermissionStatus::NotDetermined, false);
        assert_eq!(capture.start().await, Err(CaptureError::PermissionDenied));
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn torchless_device_ignores_illumination() {
        let path = write_photo([1, 2, 3, 255]);
        let mut capture = StillImageCapture::new(&path).without_torch();
        capture.start().await.unwrap();
        capture.set_illumination(IlluminationMode::On).unwrap();
        assert_eq!(capture.illumination(), IlluminationMode::Off);
        std::fs::remove_file(path).unwrap();
    }
}
