pub mod captured_image;
pub mod color_sample;
pub mod geometry;

pub use captured_image::CapturedImage;
pub use color_sample::ColorSample;
pub use geometry::{DisplayPoint, Translation};
