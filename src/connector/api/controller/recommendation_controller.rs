use anyhow::Result;

use crate::domain::{PainDescription, Recommendation};

use super::super::Container;

pub struct RecommendationController<'a> {
    container: &'a Container,
}

impl<'a> RecommendationController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn recommend(&self, pain_description: String) -> Result<String> {
        let pain = PainDescription::new(pain_description)?;
        let use_case = self.container.recommend_use_case();
        let shutdown = self.container.shutdown_token();

        let recommendation = use_case.execute_with_cancellation(&pain, &shutdown).await?;
        Ok(self.format_recommendation(&recommendation))
    }

    fn format_recommendation(&self, recommendation: &Recommendation) -> String {
        let advice = recommendation.advice();
        let mut out = format!("Exercise: {}\n\nSteps:\n", advice.exercise_name());

        for (i, step) in advice.steps().iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, step));
        }

        if !advice.precautions().is_empty() {
            out.push_str("\nPrecautions:\n");
            for precaution in advice.precautions() {
                out.push_str(&format!("  - {}\n", precaution));
            }
        }

        out.push_str(&format!(
            "\nGIF URL: {}\n\nDisclaimer: {}",
            recommendation.media_url(),
            advice.disclaimer()
        ));
        out
    }
}
