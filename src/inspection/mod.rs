pub mod color_stat;
pub mod picker;
pub mod session;

pub use color_stat::{probability_string, ClassificationState, ColorStat};
pub use picker::Picker;
pub use session::{CaptureStatus, Inspection, InspectionSession, Phase, SessionBuilder};
