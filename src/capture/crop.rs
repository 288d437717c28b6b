use crate::common::CapturedImage;
use crate::error::CaptureError;
use image::imageops;
use serde::Deserialize;

/// Where the on-screen cursor sits relative to the full-screen preview,
/// in display units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CropGeometry {
    /// Height of the preview the user aimed with.
    pub display_height: f64,
    /// Distance of the cursor center from the top of the preview.
    pub cursor_center_vertical: f64,
    /// Side of the square inspected around the cursor.
    pub crop_box_length: f64,
}

impl Default for CropGeometry {
    fn default() -> Self {
        Self {
            display_height: 852.0,
            cursor_center_vertical: 230.0,
            crop_box_length: 50.0,
        }
    }
}

/// Cuts the square under the cursor out of a full capture.
///
/// The capture is in sensor orientation, so the preview's vertical axis runs
/// along the image width and the cursor sits on the image's horizontal
/// midline. The rect is snapped outward to whole pixels and clipped to the
/// image.
pub fn crop_inspection_region(
    image: &CapturedImage,
    geometry: &CropGeometry,
) -> Result<CapturedImage, CaptureError> {
    let (width, height) = image.dimensions();
    let outside = CaptureError::CropOutsideImage { width, height };

    if !(geometry.display_height > 0.0) || !geometry.display_height.is_finite() {
        return Err(outside);
    }

    let unit_to_pixel = width as f64 / geometry.display_height;
    let center_x = geometry.cursor_center_vertical * unit_to_pixel;
    let center_y = (height / 2) as f64;
    let side = geometry.crop_box_length * unit_to_pixel;

    let left = (center_x - side / 2.0).floor().max(0.0);
    let top = (center_y - side / 2.0).floor().max(0.0);
    let right = (center_x + side / 2.0).ceil().min(width as f64);
    let bottom = (center_y + side / 2.0).ceil().min(height as f64);

    if !(right > left && bottom > top) {
        return Err(outside);
    }

    let (x, y) = (left as u32, top as u32);
    let (w, h) = ((right - left) as u32, (bottom - top) as u32);
    let cropped = imageops::crop_imm(image.pixels(), x, y, w, h).to_image();

    tracing::debug!(
        "Cropped inspection region {}x{} at ({}, {}) from {}x{} capture {}",
        w,
        h,
        x,
        y,
        width,
        height,
        image.id()
    );

    Ok(CapturedImage::with_metadata(
        image.id(),
        cropped,
        image.captured_at(),
    ))
}
