use anyhow::Result;

use crate::cli::Commands;
use crate::domain::VocabularyRegistry;

use super::container::Container;
use super::controller::{ExercisesController, RecommendationController};

pub struct Router<'a> {
    recommendation_controller: RecommendationController<'a>,
    exercises_controller: ExercisesController<'static>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            recommendation_controller: RecommendationController::new(container),
            exercises_controller: ExercisesController::new(VocabularyRegistry::standard()),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Recommend { pain_description } => {
                self.recommendation_controller
                    .recommend(pain_description.join(" "))
                    .await
            }
            Commands::Exercises => self.exercises_controller.list().await,
            Commands::Serve { .. } => unreachable!("serve is handled separately in main"),
        }
    }
}
