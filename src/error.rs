use thiserror::Error;
use uuid::Uuid;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Capture Error: {0}")]
    Capture(#[from] CaptureError),
    #[error("Classifier Error: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("Sample Error: {0}")]
    Sample(#[from] SampleError),
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Session Error: {0}")]
    Session(String),
}

// Pixel sampling error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SampleError {
    #[error("Pixel ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: f64,
        y: f64,
        width: u32,
        height: u32,
    },
    #[error("Display region width must be positive, got {0}")]
    InvalidRegion(f64),
}

#[derive(Error, Debug, Clone)]
pub enum ClassifierError {
    #[error("Failed to load model from {source_name}: {reason}")]
    ModelLoad { source_name: String, reason: String },
    #[error("Model artifact is invalid: {0}")]
    InvalidModel(String),
    #[error("Inference failed: {0}")]
    Inference(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    #[error("Camera access was denied")]
    PermissionDenied,
    #[error("Camera access is restricted on this device")]
    PermissionRestricted,
    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("Capture {capture_id} produced no image data: {reason}")]
    NoImageData { capture_id: Uuid, reason: String },
    #[error("Capture did not complete within {0}ms")]
    Timeout(u64),
    #[error("Inspection region does not intersect the {width}x{height} capture")]
    CropOutsideImage { width: u32, height: u32 },
    #[error("Capture service has not been started")]
    NotStarted,
}
