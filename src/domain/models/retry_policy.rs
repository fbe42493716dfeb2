use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// How many times the recommendation pipeline is attempted and how long to
/// wait between attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_factor: f64,
    max_delay: Option<Duration>,
    max_elapsed: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_delay: Some(DEFAULT_MAX_DELAY),
            max_elapsed: None,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        // At least one attempt is always made
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = if factor.is_finite() && factor >= 1.0 {
            factor
        } else {
            1.0
        };
        self
    }

    /// `None` lets delays grow without bound.
    pub fn with_max_delay(mut self, max_delay: Option<Duration>) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Total wall-clock budget across all attempts and waits.
    pub fn with_max_elapsed(mut self, max_elapsed: Option<Duration>) -> Self {
        self.max_elapsed = max_elapsed;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn initial_delay(&self) -> Duration {
        self.capped(self.initial_delay)
    }

    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    pub fn max_delay(&self) -> Option<Duration> {
        self.max_delay
    }

    pub fn max_elapsed(&self) -> Option<Duration> {
        self.max_elapsed
    }

    /// The wait that follows `current`.
    pub fn next_delay(&self, current: Duration) -> Duration {
        let scaled = Duration::try_from_secs_f64(current.as_secs_f64() * self.backoff_factor)
            .unwrap_or(Duration::MAX);
        self.capped(scaled)
    }

    fn capped(&self, delay: Duration) -> Duration {
        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.initial_delay(), Duration::from_secs(1));
        assert_eq!(policy.backoff_factor(), 2.0);
        assert_eq!(policy.max_delay(), Some(Duration::from_secs(30)));
        assert_eq!(policy.max_elapsed(), None);
    }

    #[test]
    fn delays_double_until_cap() {
        let policy = RetryPolicy::new()
            .with_initial_delay(Duration::from_millis(100))
            .with_max_delay(Some(Duration::from_millis(500)));

        let mut delay = policy.initial_delay();
        let mut seen = vec![delay];
        for _ in 0..4 {
            delay = policy.next_delay(delay);
            seen.push(delay);
        }

        let millis: Vec<u128> = seen.iter().map(Duration::as_millis).collect();
        assert_eq!(millis, vec![100, 200, 400, 500, 500]);
    }

    #[test]
    fn uncapped_growth_saturates_instead_of_overflowing() {
        let policy = RetryPolicy::new().with_max_delay(None);
        assert_eq!(policy.next_delay(Duration::MAX), Duration::MAX);
    }

    #[test]
    fn invalid_settings_are_clamped() {
        let policy = RetryPolicy::new()
            .with_max_attempts(0)
            .with_backoff_factor(0.5);
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.backoff_factor(), 1.0);

        let policy = RetryPolicy::new().with_backoff_factor(f64::NAN);
        assert_eq!(policy.backoff_factor(), 1.0);
    }
}
