use std::fmt;
use std::sync::Arc;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::application::{AdviceGenerator, BackoffSleeper, MediaLookup, MediaResolver};
use crate::domain::{AdviceParser, DomainError, PainDescription, Recommendation, RetryPolicy};

/// Where in an attempt a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Generating,
    Parsing,
    Resolving,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Generating => "generating",
            PipelineStage::Parsing => "parsing",
            PipelineStage::Resolving => "resolving",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum AttemptOutcome {
    Succeeded(Recommendation),
    Failed(PipelineStage, DomainError),
    TimedOut,
}

/// Generates advice, validates it, and attaches demonstration media, retrying
/// the whole chain with exponential backoff.
///
/// An attempt is all-or-nothing: a failure at any stage throws away what the
/// earlier stages produced, and the next attempt asks the model again. The
/// model's choice of exercise is often what went wrong, so reusing it would
/// just fail the same way.
pub struct RecommendExerciseUseCase {
    advice_generator: Arc<dyn AdviceGenerator>,
    media_resolver: Arc<dyn MediaResolver>,
    sleeper: Arc<dyn BackoffSleeper>,
    parser: AdviceParser<'static>,
    policy: RetryPolicy,
}

impl RecommendExerciseUseCase {
    pub fn new(
        advice_generator: Arc<dyn AdviceGenerator>,
        media_resolver: Arc<dyn MediaResolver>,
        sleeper: Arc<dyn BackoffSleeper>,
    ) -> Self {
        Self {
            advice_generator,
            media_resolver,
            sleeper,
            parser: AdviceParser::standard(),
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_parser(mut self, parser: AdviceParser<'static>) -> Self {
        self.parser = parser;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn execute(&self, pain: &PainDescription) -> Result<Recommendation, DomainError> {
        self.execute_with_cancellation(pain, &CancellationToken::new())
            .await
    }

    /// Like [`execute`](Self::execute), but gives up with
    /// [`DomainError::Cancelled`] as soon as `cancel` fires.
    pub async fn execute_with_cancellation(
        &self,
        pain: &PainDescription,
        cancel: &CancellationToken,
    ) -> Result<Recommendation, DomainError> {
        let max_attempts = self.policy.max_attempts();
        let budget = self.policy.max_elapsed();
        let started = Instant::now();
        let deadline = budget.map(|b| started + b);
        let mut delay = self.policy.initial_delay();
        let mut attempt: u32 = 0;

        info!(
            "Recommending exercise (max_attempts={}, initial_delay={:?}, budget={:?})",
            max_attempts, delay, budget
        );

        loop {
            attempt += 1;

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(attempt, "Recommendation cancelled");
                    return Err(DomainError::Cancelled);
                }
                outcome = self.run_bounded_attempt(pain, deadline) => outcome,
            };

            let (stage, err) = match outcome {
                AttemptOutcome::Succeeded(recommendation) => {
                    info!(
                        "Recommended '{}' on attempt {}/{} in {:.2}s",
                        recommendation.exercise_name(),
                        attempt,
                        max_attempts,
                        started.elapsed().as_secs_f64()
                    );
                    return Ok(recommendation);
                }
                AttemptOutcome::TimedOut => {
                    let budget = budget.unwrap_or_default();
                    warn!(attempt, "Attempt abandoned: {:?} budget exhausted", budget);
                    return Err(exhausted(attempt, DomainError::DeadlineExceeded(budget)));
                }
                AttemptOutcome::Failed(stage, err) => (stage, err),
            };

            if !err.is_retryable() {
                error!(attempt, stage = %stage, "Recommendation failed permanently: {}", err);
                return Err(err);
            }

            warn!(
                attempt,
                max_attempts,
                stage = %stage,
                "Recommendation attempt failed: {}",
                err
            );

            if attempt >= max_attempts {
                error!("All {} recommendation attempts failed", attempt);
                return Err(exhausted(attempt, err));
            }

            if let Some(budget) = budget {
                if started.elapsed().saturating_add(delay) > budget {
                    warn!(
                        "Not retrying: waiting {:?} would exceed the {:?} budget",
                        delay, budget
                    );
                    return Err(exhausted(attempt, err));
                }
            }

            info!(
                "Retrying in {:?} ({} attempts left)",
                delay,
                max_attempts - attempt
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(attempt, "Recommendation cancelled during backoff");
                    return Err(DomainError::Cancelled);
                }
                _ = self.sleeper.sleep(delay) => {}
            }

            delay = self.policy.next_delay(delay);
        }
    }

    async fn run_bounded_attempt(
        &self,
        pain: &PainDescription,
        deadline: Option<Instant>,
    ) -> AttemptOutcome {
        let result = match deadline {
            Some(at) => match tokio::time::timeout_at(at, self.run_attempt(pain)).await {
                Ok(result) => result,
                Err(_) => return AttemptOutcome::TimedOut,
            },
            None => self.run_attempt(pain).await,
        };

        match result {
            Ok(recommendation) => AttemptOutcome::Succeeded(recommendation),
            Err((stage, err)) => AttemptOutcome::Failed(stage, err),
        }
    }

    async fn run_attempt(
        &self,
        pain: &PainDescription,
    ) -> Result<Recommendation, (PipelineStage, DomainError)> {
        debug!(stage = %PipelineStage::Generating, "Requesting advice");
        let raw = self
            .advice_generator
            .generate(pain)
            .await
            .map_err(|e| (PipelineStage::Generating, e))?;

        debug!(stage = %PipelineStage::Parsing, "Validating advice");
        let advice = self.parser.parse(&raw).map_err(|e| {
            debug!("Rejected completion text: {}", raw);
            (PipelineStage::Parsing, e)
        })?;

        let name = advice.exercise_name().to_string();
        debug!(stage = %PipelineStage::Resolving, "Looking up media for '{}'", name);
        match self
            .media_resolver
            .resolve(&name)
            .await
            .map_err(|e| (PipelineStage::Resolving, e))?
        {
            MediaLookup::Found(url) => Ok(advice.with_media_url(url)),
            MediaLookup::NotFound => Err((
                PipelineStage::Resolving,
                DomainError::resolution_not_found(name),
            )),
        }
    }
}

fn exhausted(attempts: u32, last: DomainError) -> DomainError {
    DomainError::Exhausted {
        attempts,
        last: Box::new(last),
    }
}
