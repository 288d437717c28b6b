pub mod crop;
pub mod service;
pub mod still_image;
pub mod synthetic;

pub use crop::{crop_inspection_region, CropGeometry};
pub use service::{CaptureService, IlluminationMode, PermissionStatus};
pub use still_image::StillImageCapture;
pub use synthetic::SyntheticCapture;
