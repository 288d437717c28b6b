use super::service::{CaptureService, IlluminationMode, PermissionStatus};
use crate::common::CapturedImage;
use crate::error::CaptureError;
use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use std::collections::VecDeque;
use std::time::Duration;

/// In-memory capture that replays prepared frames in a loop.
pub struct SyntheticCapture {
    frames: VecDeque<RgbaImage>,
    permission: PermissionStatus,
    grant_on_request: bool,
    has_torch: bool,
    illumination: IlluminationMode,
    latency: Duration,
    started: bool,
    captures_taken: usize,
}

impl SyntheticCapture {
    pub fn from_frames(frames: Vec<RgbaImage>) -> Self {
        Self {
            frames: frames.into(),
            permission: PermissionStatus::Authorized,
            grant_on_request: true,
            has_torch: true,
            illumination: IlluminationMode::Off,
            latency: Duration::ZERO,
            started: false,
            captures_taken: 0,
        }
    }

    pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self::from_frames(vec![RgbaImage::from_pixel(width, height, color)])
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

    /// Delay applied to each capture request.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn captures_taken(&self) -> usize {
        self.captures_taken
    }
}

#[async_trait]
impl CaptureService for SyntheticCapture {
    async fn start(&mut self) -> Result<(), CaptureError> {
        let grant = self.grant_on_request;
        self.permission = self.permission.resolve(|| grant)?;
        self.illumination = IlluminationMode::Off;
        self.started = true;
        tracing::debug!("Synthetic capture started with {} frame(s)", self.frames.len());
        Ok(())
    }

    async fn request_capture(&mut self) -> Result<CapturedImage, CaptureError> {
        if !self.started {
            return Err(CaptureError::NotStarted);
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let frame = self
            .frames
            .pop_front()
            .ok_or_else(|| CaptureError::DeviceUnavailable("no frames queued".to_string()))?;
        self.frames.push_back(frame.clone());
        self.captures_taken += 1;

        Ok(CapturedImage::new(frame))
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
        self.started = false;
        self.illumination = IlluminationMode::Off;
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}
