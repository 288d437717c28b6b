use crate::capture::{crop_inspection_region, CaptureService, IlluminationMode};
use crate::classifier::{load_classifier, ColorClassifier};
use crate::common::{CapturedImage, ColorSample, DisplayPoint, Translation};
use crate::config::Configuration;
use crate::error::{AppError, CaptureError};
use crate::inspection::color_stat::{ClassificationState, ColorStat};
use crate::inspection::picker::Picker;
use crate::sampler;
use image::Rgba;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Whether the camera can be used this session.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureStatus {
    NotStarted,
    Ready,
    Unavailable(String),
}

/// A photo being inspected.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub capture: CapturedImage,
    pub region: CapturedImage,
    pub picker: Picker,
    /// Color under the picker, follows the drag.
    pub picker_color: ColorSample,
    /// Classified color, refreshed when a drag ends.
    pub stat: ColorStat,
}

#[derive(Debug, Clone)]
pub enum Phase {
    Preview,
    Inspecting(Inspection),
}

/// Owns the capture service and the classifier for the lifetime of one
/// camera screen, and turns gestures into samples and classifications.
pub struct InspectionSession {
    configuration: Configuration,
    capture: Box<dyn CaptureService>,
    classifier: Option<Arc<dyn ColorClassifier>>,
    classifier_failure: Option<String>,
    capture_status: CaptureStatus,
    phase: Phase,
    last_error: Option<String>,
}

impl InspectionSession {
    fn new(
        configuration: Configuration,
        capture: Box<dyn CaptureService>,
        classifier: Result<Arc<dyn ColorClassifier>, String>,
    ) -> Self {
        let (classifier, classifier_failure) = match classifier {
            Ok(classifier) => (Some(classifier), None),
            Err(reason) => (None, Some(reason)),
        };

        Self {
            configuration,
            capture,
            classifier,
            classifier_failure,
            capture_status: CaptureStatus::NotStarted,
            phase: Phase::Preview,
            last_error: None,
        }
    }

    pub fn builder(configuration: Configuration) -> SessionBuilder {
        SessionBuilder::new(configuration)
    }

    /// Brings the camera up. A refusal leaves the session running with
    /// capture disabled.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> &CaptureStatus {
        self.capture_status = match self.capture.start().await {
            Ok(()) => {
                info!("Capture service '{}' ready", self.capture.name());
                CaptureStatus::Ready
            }
            Err(e) => {
                warn!("Capture disabled: {}", e);
                self.last_error = Some(e.to_string());
                CaptureStatus::Unavailable(e.to_string())
            }
        };
        &self.capture_status
    }

    pub fn set_illumination(&mut self, mode: IlluminationMode) -> Result<(), AppError> {
        self.ensure_capture_ready()?;
        self.capture.set_illumination(mode)?;
        debug!("Illumination set to {:?}", self.capture.illumination());
        Ok(())
    }

    pub fn toggle_illumination(&mut self) -> Result<IlluminationMode, AppError> {
        let next = self.capture.illumination().toggled();
        self.set_illumination(next)?;
        Ok(self.capture.illumination())
    }

    pub fn illumination(&self) -> IlluminationMode {
        self.capture.illumination()
    }

    /// Takes a photo, crops the region under the cursor and classifies its
    /// center. On failure the session stays in preview.
    #[instrument(skip(self))]
    pub async fn capture(&mut self) -> Result<&Inspection, AppError> {
        match self.try_capture().await {
            Ok(inspection) => {
                self.last_error = None;
                self.phase = Phase::Inspecting(inspection);
                match &self.phase {
                    Phase::Inspecting(inspection) => Ok(inspection),
                    Phase::Preview => Err(AppError::Session("Inspection was not stored".to_string())),
                }
            }
            Err(e) => {
                error!("Capture failed: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn try_capture(&mut self) -> Result<Inspection, AppError> {
        self.ensure_capture_ready()?;

        let timeout = self.configuration.capture.timeout();
        let capture = tokio::time::timeout(timeout, self.capture.request_capture())
            .await
            .map_err(|_| CaptureError::Timeout(self.configuration.capture.timeout_ms))??;

        let region = crop_inspection_region(&capture, &self.configuration.display.crop)?;

        // the torch is only for aiming
        self.capture.set_illumination(IlluminationMode::Off)?;

        let region_width = self.configuration.display.region_width();
        let picker = Picker::centered(region_width);
        let picker_color = match sampler::sample(&region, picker.pointer(), region_width) {
            Ok(color) => color,
            Err(e) => {
                warn!("Center of inspection region not sampled: {}", e);
                ColorSample::new(Rgba([0, 0, 0, 255]))
            }
        };
        let stat = self.classify(picker_color);

        info!(
            "Captured {} ({}x{} region), picked {} as {}",
            capture.id(),
            region.width(),
            region.height(),
            picker_color.hex(),
            stat.title
        );

        Ok(Inspection {
            capture,
            region,
            picker,
            picker_color,
            stat,
        })
    }

    /// Follows a drag. Returns the color under the picker, which stays at
    /// the previous sample when the pointer maps outside the image.
    pub fn drag_changed(&mut self, translation: Translation) -> Option<ColorSample> {
        let region_width = self.configuration.display.region_width();
        let Phase::Inspecting(inspection) = &mut self.phase else {
            return None;
        };

        let pointer = inspection.picker.drag_changed(translation);
        Self::resample(inspection, pointer, region_width);
        Some(inspection.picker_color)
    }

    /// Finishes a drag and classifies the color where the picker came to rest.
    #[instrument(skip(self))]
    pub fn drag_ended(&mut self) -> Option<&ColorStat> {
        let region_width = self.configuration.display.region_width();
        let color = {
            let Phase::Inspecting(inspection) = &mut self.phase else {
                return None;
            };
            let pointer = inspection.picker.drag_ended();
            Self::resample(inspection, pointer, region_width);
            inspection.picker_color
        };

        let stat = self.classify(color);
        match &mut self.phase {
            Phase::Inspecting(inspection) => {
                inspection.stat = stat;
                Some(&inspection.stat)
            }
            Phase::Preview => None,
        }
    }

    /// Leaves the photo and returns to the live preview.
    pub fn dismiss(&mut self) {
        if let Phase::Inspecting(inspection) = &self.phase {
            debug!("Dismissing inspection of {}", inspection.capture.id());
        }
        self.phase = Phase::Preview;
    }

    pub fn stop(&mut self) {
        self.capture.stop();
        self.capture_status = CaptureStatus::NotStarted;
        self.phase = Phase::Preview;
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn inspection(&self) -> Option<&Inspection> {
        match &self.phase {
            Phase::Inspecting(inspection) => Some(inspection),
            Phase::Preview => None,
        }
    }

    pub fn capture_status(&self) -> &CaptureStatus {
        &self.capture_status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn classification_available(&self) -> bool {
        self.classifier.is_some()
    }

    fn ensure_capture_ready(&self) -> Result<(), CaptureError> {
        match &self.capture_status {
            CaptureStatus::Ready => Ok(()),
            CaptureStatus::NotStarted => Err(CaptureError::NotStarted),
            CaptureStatus::Unavailable(reason) => {
                Err(CaptureError::DeviceUnavailable(reason.clone()))
            }
        }
    }

    fn resample(inspection: &mut Inspection, pointer: DisplayPoint, region_width: f64) {
        match sampler::sample(&inspection.region, pointer, region_width) {
            Ok(color) => inspection.picker_color = color,
            Err(e) => debug!("Keeping previous sample: {}", e),
        }
    }

    /// A classifier that fails once is dropped for the rest of the session.
    fn classify(&mut self, color: ColorSample) -> ColorStat {
        let state = match self.classifier.clone() {
            Some(classifier) => match classifier.classify(color.rgb()) {
                Ok(result) => ClassificationState::Ready(result),
                Err(e) => {
                    error!("Classifier '{}' failed, disabling it: {}", classifier.name(), e);
                    self.classifier = None;
                    self.classifier_failure = Some(e.to_string());
                    ClassificationState::Unavailable {
                        reason: e.to_string(),
                    }
                }
            },
            None => ClassificationState::Unavailable {
                reason: self
                    .classifier_failure
                    .clone()
                    .unwrap_or_else(|| "no classifier configured".to_string()),
            },
        };
        ColorStat::new(color, state)
    }
}

impl Drop for InspectionSession {
    fn drop(&mut self) {
        self.capture.stop();
    }
}

pub struct SessionBuilder {
    configuration: Configuration,
    capture: Option<Box<dyn CaptureService>>,
    classifier: Option<Arc<dyn ColorClassifier>>,
}

impl SessionBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            capture: None,
            classifier: None,
        }
    }

    pub fn capture_service(mut self, capture: Box<dyn CaptureService>) -> Self {
        self.capture = Some(capture);
        self
    }

    // Overrides the model named in the configuration.
    pub fn classifier(mut self, classifier: Arc<dyn ColorClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Fails only when no capture service was given. A model that cannot be
    /// loaded leaves the session without classification.
    pub fn build(self) -> Result<InspectionSession, AppError> {
        let capture = self
            .capture
            .ok_or(AppError::Session("Capture service not set".to_string()))?;

        let classifier = match self.classifier {
            Some(classifier) => Ok(classifier),
            None => load_classifier(&self.configuration.model)
                .map(|c| c as Arc<dyn ColorClassifier>)
                .map_err(|e| {
                    warn!("Classification unavailable: {}", e);
                    e.to_string()
                }),
        };

        Ok(InspectionSession::new(self.configuration, capture, classifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{PermissionStatus, SyntheticCapture};
    use crate::classifier::{ClassificationResult, ModelSource};
    use crate::error::ClassifierError;
    use image::{Rgb, RgbaImage};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Small display so the crop maths stays readable: 100 units tall preview,
    /// 20x20 unit region, cursor 50 units from the top.
    fn configuration() -> Configuration {
        let mut configuration = Configuration::default();
        configuration.display.screen_width = 60.0;
        configuration.display.region_inset = 40.0;
        configuration.display.crop.display_height = 100.0;
        configuration.display.crop.cursor_center_vertical = 50.0;
        configuration.display.crop.crop_box_length = 20.0;
        configuration.capture.timeout_ms = 200;
        configuration
    }

    /// 200x100 capture: crop lands on x 80..120, y 30..70. The left half of
    /// the region is red, the right half blue.
    fn split_frame() -> RgbaImage {
        let mut frame = RgbaImage::from_pixel(200, 100, Rgba([0, 0, 0, 255]));
        for x in 80..120 {
            for y in 30..70 {
                let color = if x < 100 { [255, 0, 0, 255] } else { [0, 70, 255, 255] };
                frame.put_pixel(x, y, Rgba(color));
            }
        }
        frame
    }

    async fn started_session(capture: SyntheticCapture) -> InspectionSession {
        let mut session = InspectionSession::builder(configuration())
            .capture_service(Box::new(capture))
            .build()
            .expect("Failed to build session");
        session.start().await;
        session
    }

    struct FlakyClassifier {
        calls: AtomicUsize,
    }

    impl ColorClassifier for FlakyClassifier {
        fn classify(&self, rgb: Rgb<u8>) -> Result<ClassificationResult, ClassifierError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(ClassificationResult::from_distribution(
                    rgb,
                    [("Only".to_string(), 1.0)].into_iter().collect(),
                ))
            } else {
                Err(ClassifierError::Inference("tensor shape mismatch".to_string()))
            }
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    #[tokio::test]
    async fn capture_classifies_region_center() {
        let mut session = started_session(SyntheticCapture::from_frames(vec![split_frame()])).await;
        assert_eq!(session.capture_status(), &CaptureStatus::Ready);

        let inspection = session.capture().await.unwrap();
        assert_eq!(inspection.region.dimensions(), (40, 40));
        // the center (20, 20) falls on the first blue column
        assert_eq!(inspection.picker_color.rgba(), Rgba([0, 70, 255, 255]));
        assert_eq!(inspection.stat.title, "Blue");
    }

    #[tokio::test]
    async fn drag_samples_follow_swapped_axes() {
        let mut session = started_session(SyntheticCapture::from_frames(vec![split_frame()])).await;
        session.capture().await.unwrap();

        // display y drives the pixel column
        let color = session.drag_changed(Translation::new(0.0, -5.0)).unwrap();
        assert_eq!(color.rgba(), Rgba([255, 0, 0, 255]));

        let stat = session.drag_ended().unwrap();
        assert_eq!(stat.title, "Red");
        assert_eq!(stat.color.rgba(), Rgba([255, 0, 0, 255]));
    }

    #[tokio::test]
    async fn pointer_on_far_edge_keeps_previous_sample() {
        let mut session = started_session(SyntheticCapture::from_frames(vec![split_frame()])).await;
        session.capture().await.unwrap();

        let red = session.drag_changed(Translation::new(0.0, -5.0)).unwrap();
        // clamped to the region edge, which maps one past the last pixel
        let kept = session.drag_changed(Translation::new(0.0, 500.0)).unwrap();
        assert_eq!(kept, red);
        assert_eq!(
            session.inspection().unwrap().picker.pointer(),
            DisplayPoint::new(10.0, 20.0)
        );
    }

    #[tokio::test]
    async fn capture_turns_illumination_off() {
        let mut session = started_session(SyntheticCapture::solid(200, 100, Rgba([255, 0, 0, 255]))).await;
        assert_eq!(session.toggle_illumination().unwrap(), IlluminationMode::On);

        session.capture().await.unwrap();
        assert_eq!(session.illumination(), IlluminationMode::Off);

        session.dismiss();
        assert!(matches!(session.phase(), Phase::Preview));
        assert!(session.drag_changed(Translation::new(1.0, 1.0)).is_none());
    }

    #[tokio::test]
    async fn denied_camera_disables_capture_without_failing() {
        let capture = SyntheticCapture::solid(200, 100, Rgba([255, 0, 0, 255]))
            .with_permission(PermissionStatus::NotDetermined, false);
        let mut session = started_session(capture).await;

        assert!(matches!(session.capture_status(), CaptureStatus::Unavailable(_)));
        assert!(session.capture().await.is_err());
        assert!(session.last_error().is_some());
        assert!(matches!(session.phase(), Phase::Preview));
    }

    #[tokio::test]
    async fn capture_before_start_is_rejected() {
        let mut session = InspectionSession::builder(configuration())
            .capture_service(Box::new(SyntheticCapture::solid(10, 10, Rgba([0, 0, 0, 255]))))
            .build()
            .unwrap();
        assert!(matches!(
            session.capture().await,
            Err(AppError::Capture(CaptureError::NotStarted))
        ));
    }

    #[tokio::test]
    async fn slow_capture_times_out() {
        let capture = SyntheticCapture::solid(200, 100, Rgba([255, 0, 0, 255]))
            .with_latency(Duration::from_secs(5));
        let mut session = started_session(capture).await;
        assert!(matches!(
            session.capture().await,
            Err(AppError::Capture(CaptureError::Timeout(200)))
        ));
    }

    #[tokio::test]
    async fn missing_model_degrades_to_unavailable() {
        let configuration =
            configuration().with_model(ModelSource::File(PathBuf::from("/no/such/model.json")));
        let mut session = InspectionSession::builder(configuration)
            .capture_service(Box::new(SyntheticCapture::solid(200, 100, Rgba([255, 0, 0, 255]))))
            .build()
            .unwrap();
        session.start().await;

        assert!(!session.classification_available());
        let inspection = session.capture().await.unwrap();
        assert_eq!(inspection.picker_color.rgba(), Rgba([255, 0, 0, 255]));
        assert_eq!(inspection.stat.title, "Color");
        assert!(matches!(
            inspection.stat.state,
            ClassificationState::Unavailable { .. }
        ));
    }

    #[tokio::test]
    async fn failing_inference_disables_classifier_for_session() {
        let mut session = InspectionSession::builder(configuration())
            .capture_service(Box::new(SyntheticCapture::solid(200, 100, Rgba([255, 0, 0, 255]))))
            .classifier(Arc::new(FlakyClassifier {
                calls: AtomicUsize::new(0),
            }))
            .build()
            .unwrap();
        session.start().await;

        assert_eq!(session.capture().await.unwrap().stat.title, "Only");

        let stat = session.drag_ended().unwrap();
        assert_eq!(stat.probability, "NA%");
        assert!(!session.classification_available());

        // stays off after a fresh capture too
        session.dismiss();
        assert_eq!(session.capture().await.unwrap().stat.title, "Color");
    }

    #[test]
    fn builder_requires_capture_service() {
        assert!(matches!(
            InspectionSession::builder(configuration()).build(),
            Err(AppError::Session(_))
        ));
    }
}
