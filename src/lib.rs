pub mod capture;
pub mod classifier;
pub mod common;
pub mod config;
pub mod error;
pub mod inspection;
pub mod sampler;

pub use error::{AppError, CaptureError, ClassifierError, SampleError};

pub use capture::{CaptureService, IlluminationMode, StillImageCapture, SyntheticCapture};
pub use classifier::{ClassificationResult, ColorClassifier, ModelSource};
pub use common::{CapturedImage, ColorSample, DisplayPoint, Translation};
pub use config::Configuration;
pub use inspection::{ClassificationState, ColorStat, InspectionSession};
pub use sampler::sample;
