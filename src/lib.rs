pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    AdviceGenerator, BackoffSleeper, MediaLookup, MediaResolver, PipelineStage,
    RecommendExerciseUseCase,
};

pub use connector::{
    ChatClient, Container, ContainerConfig, ExerciseDbResolver, LlmAdviceGenerator,
    MockChatClient, MockMediaResolver, TokioSleeper, WorkersAiClient,
};

pub use domain::{
    AdviceParser, DomainError, ExerciseRecommendation, PainDescription, Recommendation,
    RetryPolicy, VocabularyRegistry,
};
