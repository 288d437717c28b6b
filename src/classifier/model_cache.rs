use super::interface::ColorClassifier;
use super::prototype::{ModelArtifact, PrototypeClassifier};
use crate::error::ClassifierError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

const DEFAULT_MODEL: &str = include_str!("default_model.json");

/// Where a model artifact comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSource {
    #[default]
    BuiltIn,
    File(PathBuf),
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelSource::BuiltIn => write!(f, "built-in model"),
            ModelSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

static MODEL_CACHE: OnceLock<Mutex<HashMap<ModelSource, Arc<PrototypeClassifier>>>> =
    OnceLock::new();

/// Loads a classifier, reusing an earlier load of the same source for the
/// rest of the process. Failed loads are not cached.
pub fn load_classifier(source: &ModelSource) -> Result<Arc<PrototypeClassifier>, ClassifierError> {
    let cache = MODEL_CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    if let Some(classifier) = cache
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(source)
    {
        tracing::debug!("Reusing cached classifier for {}", source);
        return Ok(classifier.clone());
    }

    let artifact = match source {
        ModelSource::BuiltIn => ModelArtifact::from_json(DEFAULT_MODEL),
        ModelSource::File(path) => ModelArtifact::from_path(path),
    }
    .map_err(|e| match e {
        ClassifierError::InvalidModel(reason) => ClassifierError::ModelLoad {
            source_name: source.to_string(),
            reason,
        },
        other => other,
    })?;

    let classifier = Arc::new(PrototypeClassifier::new(artifact)?);
    tracing::info!(
        "Loaded classifier '{}' with {} labels from {}",
        classifier.name(),
        classifier.labels().count(),
        source
    );

    // A concurrent load may have won; keep whichever landed first.
    let cached = cache
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .entry(source.clone())
        .or_insert(classifier)
        .clone();

    Ok(cached)
}
