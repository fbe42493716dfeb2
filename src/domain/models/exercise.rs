use serde::{Deserialize, Serialize};

pub const DEFAULT_DISCLAIMER: &str = "Consult a professional before attempting these exercises";

/// Validated advice for a single exercise, as accepted from the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseRecommendation {
    exercise_name: String,
    steps: Vec<String>,
    precautions: Vec<String>,
    disclaimer: String,
}

impl ExerciseRecommendation {
    pub fn new(
        exercise_name: impl Into<String>,
        steps: Vec<String>,
        precautions: Vec<String>,
        disclaimer: Option<String>,
    ) -> Self {
        Self {
            exercise_name: exercise_name.into(),
            steps,
            precautions,
            disclaimer: disclaimer
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DISCLAIMER.to_string()),
        }
    }

    pub fn exercise_name(&self) -> &str {
        &self.exercise_name
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn precautions(&self) -> &[String] {
        &self.precautions
    }

    pub fn disclaimer(&self) -> &str {
        &self.disclaimer
    }

    /// Attaches the demonstration media found for this exercise.
    pub fn with_media_url(self, media_url: impl Into<String>) -> Recommendation {
        Recommendation {
            advice: self,
            media_url: media_url.into(),
        }
    }
}

/// An [`ExerciseRecommendation`] together with its demonstration media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    advice: ExerciseRecommendation,
    media_url: String,
}

impl Recommendation {
    pub fn advice(&self) -> &ExerciseRecommendation {
        &self.advice
    }

    pub fn exercise_name(&self) -> &str {
        self.advice.exercise_name()
    }

    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    pub fn into_parts(self) -> (ExerciseRecommendation, String) {
        (self.advice, self.media_url)
    }
}
