pub mod interface;
pub mod model_cache;
pub mod prototype;

pub use interface::{Classification, ClassificationResult, ColorClassifier};
pub use model_cache::{load_classifier, ModelSource};
pub use prototype::{ModelArtifact, PrototypeClassifier};
