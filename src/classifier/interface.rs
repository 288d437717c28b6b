use crate::error::ClassifierError;
use image::Rgb;
use indexmap::IndexMap;

/// One label of a ranked classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub probability: f32,
}

/// Labels ranked by probability, highest first. Built once from a single
/// RGB input and never edited afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    input: Rgb<u8>,
    ranked: Vec<Classification>,
}

impl ClassificationResult {
    /// Ranks a model distribution. The map's insertion order is the model's
    /// output order and decides ties.
    pub fn from_distribution(input: Rgb<u8>, distribution: IndexMap<String, f32>) -> Self {
        let mut ranked: Vec<Classification> = distribution
            .into_iter()
            .map(|(label, probability)| Classification { label, probability })
            .collect();
        // stable sort keeps model order among equal probabilities
        ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        Self { input, ranked }
    }

    pub fn input(&self) -> Rgb<u8> {
        self.input
    }

    pub fn top(&self) -> Option<&Classification> {
        self.ranked.first()
    }

    /// Second and third ranked labels, when the model has them.
    pub fn runners_up(&self) -> &[Classification] {
        let end = self.ranked.len().min(3);
        self.ranked.get(1..end).unwrap_or(&[])
    }

    pub fn ranked(&self) -> &[Classification] {
        &self.ranked
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn total_probability(&self) -> f32 {
        self.ranked.iter().map(|c| c.probability).sum()
    }
}

/// Anything that can name a color. The bundled implementation is a
/// prototype model, but callers only see this boundary.
pub trait ColorClassifier: Send + Sync {
    fn classify(&self, rgb: Rgb<u8>) -> Result<ClassificationResult, ClassifierError>;
    fn name(&self) -> &str;
}
