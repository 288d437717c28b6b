use crate::common::CapturedImage;
use crate::error::CaptureError;
use async_trait::async_trait;

/// Camera access as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    NotDetermined,
    Authorized,
    Denied,
    Restricted,
}

impl PermissionStatus {
    /// Settles the status, asking for access when the user has not decided
    /// yet. `request_access` is only invoked for `NotDetermined`.
    pub fn resolve(self, request_access: impl FnOnce() -> bool) -> Result<Self, CaptureError> {
        match self {
            PermissionStatus::Authorized => Ok(PermissionStatus::Authorized),
            PermissionStatus::NotDetermined => {
                if request_access() {
                    Ok(PermissionStatus::Authorized)
                } else {
                    Err(CaptureError::PermissionDenied)
                }
            }
            PermissionStatus::Denied => Err(CaptureError::PermissionDenied),
            PermissionStatus::Restricted => Err(CaptureError::PermissionRestricted),
        }
    }
}

/// Torch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IlluminationMode {
    On,
    #[default]
    Off,
}

impl IlluminationMode {
    pub fn toggled(self) -> Self {
        match self {
            IlluminationMode::On => IlluminationMode::Off,
            IlluminationMode::Off => IlluminationMode::On,
        }
    }
}

/// The camera, as seen by an inspection session. A session owns exactly one
/// service and drives it through these calls.
#[async_trait]
pub trait CaptureService: Send {
    /// Checks permission and brings the device up. Illumination starts off.
    async fn start(&mut self) -> Result<(), CaptureError>;

    /// Takes one photo. Fails with `NotStarted` before a successful `start`.
    async fn request_capture(&mut self) -> Result<CapturedImage, CaptureError>;

    /// Switches the torch. Devices without one accept and ignore the call.
    fn set_illumination(&mut self, mode: IlluminationMode) -> Result<(), CaptureError>;

    fn illumination(&self) -> IlluminationMode;

    fn has_illumination(&self) -> bool;

    fn stop(&mut self);

    fn name(&self) -> &'static str;
}
