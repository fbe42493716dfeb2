mod exercises_controller;
mod recommendation_controller;

pub use exercises_controller::ExercisesController;
pub use recommendation_controller::RecommendationController;
