use crate::common::{CapturedImage, ColorSample, DisplayPoint};
use crate::error::SampleError;

/// Reads the color under `point` from `image`.
///
/// `region_width` is the rendered width of the inspection region in display
/// units. Display and pixel axes are swapped: the capture is stored in sensor
/// orientation while the display is portrait, so display `y` selects the
/// pixel column and display `x` the pixel row.
pub fn sample(
    image: &CapturedImage,
    point: DisplayPoint,
    region_width: f64,
) -> Result<ColorSample, SampleError> {
    if !region_width.is_finite() || region_width <= 0.0 {
        return Err(SampleError::InvalidRegion(region_width));
    }

    let (width, height) = image.dimensions();
    let scale = height as f64 / region_width;

    let pixel_x = point.y * scale;
    let pixel_y = point.x * scale;

    // Negated comparisons so NaN lands out of bounds.
    if !(pixel_x >= 0.0 && pixel_x < width as f64 && pixel_y >= 0.0 && pixel_y < height as f64) {
        return Err(SampleError::OutOfBounds {
            x: pixel_x,
            y: pixel_y,
            width,
            height,
        });
    }

    let pixel = image
        .pixels()
        .get_pixel(pixel_x.floor() as u32, pixel_y.floor() as u32);

    Ok(ColorSample::new(*pixel))
}
