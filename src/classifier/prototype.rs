//! Prototype color model.
//!
//! Each class owns a handful of reference colors. A query color scores every
//! reference by negative squared RGB distance over the model temperature,
//! the scores go through a softmax, and each class receives the probability
//! mass of its own references.

use super::interface::{ClassificationResult, ColorClassifier};
use crate::error::ClassifierError;
use image::Rgb;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColorClass {
    pub label: String,
    pub prototypes: Vec<[u8; 3]>,
}

/// On-disk form of a trained model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelArtifact {
    pub name: String,
    pub temperature: f32,
    pub classes: Vec<ColorClass>,
}

impl ModelArtifact {
    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        serde_json::from_str(json).map_err(|e| ClassifierError::InvalidModel(e.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self, ClassifierError> {
        let json = std::fs::read_to_string(path).map_err(|e| ClassifierError::ModelLoad {
            source_name: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.classes.is_empty() {
            return Err(ClassifierError::InvalidModel(
                "model has no classes".to_string(),
            ));
        }

        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(ClassifierError::InvalidModel(format!(
                "temperature must be positive, got {}",
                self.temperature
            )));
        }

        let mut seen = HashSet::new();
        for class in &self.classes {
            if class.label.trim().is_empty() {
                return Err(ClassifierError::InvalidModel(
                    "class label is empty".to_string(),
                ));
            }
            if !seen.insert(class.label.as_str()) {
                return Err(ClassifierError::InvalidModel(format!(
                    "duplicate class label '{}'",
                    class.label
                )));
            }
            if class.prototypes.is_empty() {
                return Err(ClassifierError::InvalidModel(format!(
                    "class '{}' has no prototypes",
                    class.label
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug)]
pub struct PrototypeClassifier {
    artifact: ModelArtifact,
}

impl PrototypeClassifier {
    pub fn new(artifact: ModelArtifact) -> Result<Self, ClassifierError> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.artifact.classes.iter().map(|c| c.label.as_str())
    }

    fn distance_squared(a: Rgb<u8>, b: [u8; 3]) -> f64 {
        a.0.iter()
            .zip(b.iter())
            .map(|(&x, &y)| {
                let d = x as f64 - y as f64;
                d * d
            })
            .sum()
    }
}

impl ColorClassifier for PrototypeClassifier {
    fn classify(&self, rgb: Rgb<u8>) -> Result<ClassificationResult, ClassifierError> {
        let temperature = self.artifact.temperature as f64;

        let logits: Vec<Vec<f64>> = self
            .artifact
            .classes
            .iter()
            .map(|class| {
                class
                    .prototypes
                    .iter()
                    .map(|p| -Self::distance_squared(rgb, *p) / temperature)
                    .collect()
            })
            .collect();

        // shift by the max logit so the best prototype is exp(0)
        let max_logit = logits
            .iter()
            .flatten()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        let masses: Vec<f64> = logits
            .iter()
            .map(|class| class.iter().map(|l| (l - max_logit).exp()).sum())
            .collect();
        let total: f64 = masses.iter().sum();

        if !total.is_finite() || total <= 0.0 {
            return Err(ClassifierError::Inference(format!(
                "degenerate distribution for rgb({}, {}, {})",
                rgb[0], rgb[1], rgb[2]
            )));
        }

        let distribution: IndexMap<String, f32> = self
            .artifact
            .classes
            .iter()
            .zip(masses)
            .map(|(class, mass)| (class.label.clone(), (mass / total) as f32))
            .collect();

        Ok(ClassificationResult::from_distribution(rgb, distribution))
    }

    fn name(&self) -> &str {
        &self.artifact.name
    }
}
