use serde::Deserialize;
use tracing::debug;

use crate::domain::{DomainError, ExerciseRecommendation, VocabularyRegistry};

/// Steps beyond this count are dropped.
pub const MAX_STEPS: usize = 3;
/// Precautions beyond this count are dropped.
pub const MAX_PRECAUTIONS: usize = 2;

#[derive(Debug, Deserialize)]
struct RawAdvice {
    exercises: Option<Vec<RawExercise>>,
    disclaimer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawExercise {
    #[serde(alias = "exerciseName")]
    exercise_name: Option<String>,
    steps: Option<Vec<String>>,
    precautions: Option<Vec<String>>,
}

/// Strips code-fence markers and wrapping quotes from a completion.
///
/// Applied until the text stops changing, so normalizing already-clean text
/// returns it unchanged.
pub fn normalize_completion(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let unfenced = current.replace("```json", "").replace("```", "");
        let next = unfenced.trim().trim_matches('"').trim().to_string();
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Turns raw completion text into a validated [`ExerciseRecommendation`].
///
/// Every rejection maps to its own [`DomainError`] variant:
/// - unparsable text: [`DomainError::MalformedResponse`]
/// - missing or empty fields, or not exactly one exercise: [`DomainError::IncompleteResponse`]
/// - a name outside the vocabulary: [`DomainError::UnrecognizedExercise`]
#[derive(Debug, Clone, Copy)]
pub struct AdviceParser<'r> {
    registry: &'r VocabularyRegistry,
}

impl AdviceParser<'static> {
    pub fn standard() -> Self {
        Self::new(VocabularyRegistry::standard())
    }
}

impl<'r> AdviceParser<'r> {
    pub fn new(registry: &'r VocabularyRegistry) -> Self {
        Self { registry }
    }

    pub fn parse(&self, raw: &str) -> Result<ExerciseRecommendation, DomainError> {
        let normalized = normalize_completion(raw);
        let advice = Self::decode(&normalized)?;

        let mut exercises = advice
            .exercises
            .ok_or_else(|| DomainError::incomplete("missing 'exercises'"))?;
        if exercises.len() != 1 {
            return Err(DomainError::incomplete(format!(
                "expected exactly one exercise, found {}",
                exercises.len()
            )));
        }
        let exercise = exercises.remove(0);

        let name = exercise
            .exercise_name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| DomainError::incomplete("missing 'exercise_name'"))?;
        let steps = non_blank(exercise.steps)
            .ok_or_else(|| DomainError::incomplete("missing 'steps'"))?;
        let precautions = non_blank(exercise.precautions)
            .ok_or_else(|| DomainError::incomplete("missing 'precautions'"))?;

        let canonical = self
            .registry
            .canonical(&name)
            .ok_or_else(|| DomainError::unrecognized(name.trim()))?;

        Ok(ExerciseRecommendation::new(
            canonical,
            steps.into_iter().take(MAX_STEPS).collect(),
            precautions.into_iter().take(MAX_PRECAUTIONS).collect(),
            advice.disclaimer,
        ))
    }

    fn decode(text: &str) -> Result<RawAdvice, DomainError> {
        let first_error = match serde_json::from_str::<RawAdvice>(text) {
            Ok(advice) => return Ok(advice),
            Err(e) => e,
        };

        // Models sometimes wrap the object in prose; retry on the outermost braces.
        if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
            if start < end && (start > 0 || end + 1 < text.len()) {
                if let Ok(advice) = serde_json::from_str::<RawAdvice>(&text[start..=end]) {
                    debug!("Recovered advice object embedded in surrounding text");
                    return Ok(advice);
                }
            }
        }

        Err(DomainError::malformed(first_error.to_string()))
    }
}

fn non_blank(items: Option<Vec<String>>) -> Option<Vec<String>> {
    let items: Vec<String> = items?
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    (!items.is_empty()).then_some(items)
}
