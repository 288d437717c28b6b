use crate::classifier::ClassificationResult;
use crate::common::ColorSample;

/// Outcome of classifying one sample.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationState {
    Ready(ClassificationResult),
    Unavailable { reason: String },
}

impl ClassificationState {
    pub fn result(&self) -> Option<&ClassificationResult> {
        match self {
            ClassificationState::Ready(result) => Some(result),
            ClassificationState::Unavailable { .. } => None,
        }
    }
}

/// The text shown next to the sampled swatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStat {
    pub color: ColorSample,
    pub title: String,
    pub probability: String,
    pub footer: String,
    pub state: ClassificationState,
}

impl ColorStat {
    pub fn new(color: ColorSample, state: ClassificationState) -> Self {
        let (title, probability, footer) = match state.result().and_then(|r| r.top().map(|top| (r, top))) {
            Some((result, top)) => (
                top.label.clone(),
                probability_string(top.probability),
                result
                    .runners_up()
                    .iter()
                    .map(|c| format!("{} {}", probability_string(c.probability), c.label))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            None => ("Color".to_string(), "NA%".to_string(), "NA".to_string()),
        };

        Self {
            color,
            title,
            probability,
            footer,
            state,
        }
    }
}

/// Whole percent, truncated. Anything under one percent reads `<0%`.
pub fn probability_string(probability: f32) -> String {
    let percentage = (probability * 100.0) as i32;
    if percentage == 0 {
        return "<0%".to_string();
    }
    format!("{}%", percentage)
}
