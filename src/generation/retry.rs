//! Exponential backoff for rate-limited generation calls.

use std::time::Duration;
use tracing::warn;

use crate::config::RetrySettings;

use super::{GenerationError, TextGenerator};

/// Backoff parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            initial_delay: Duration::from_millis(settings.initial_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            multiplier: settings.multiplier,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (zero-based), capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(attempt as i32);
        let millis = self.initial_delay.as_millis() as f64 * factor;
        let capped = millis.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }
}

/// Wraps a generator and retries transient failures.
pub struct RetryingGenerator<G> {
    inner: G,
    policy: RetryPolicy,
    sleep: Box<dyn Fn(Duration)>,
}

impl<G: TextGenerator> RetryingGenerator<G> {
    /// Wrap `inner` with the given policy, sleeping the current thread between attempts.
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Replace the sleep function (tests use this to avoid real delays).
    pub fn with_sleeper(mut self, sleep: impl Fn(Duration) + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<G: TextGenerator> TextGenerator for RetryingGenerator<G> {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut attempt = 0;
        loop {
            match self.inner.generate(prompt) {
                Err(e) if e.is_transient() && attempt < self.policy.max_retries => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        "Generation rate limited, retrying in {:?} ({}/{})",
                        delay,
                        attempt + 1,
                        self.policy.max_retries
                    );
                    (self.sleep)(delay);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::ScriptedGenerator;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn rate_limited() -> GenerationError {
        GenerationError::RateLimited {
            message: "slow down".into(),
        }
    }

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(250),
            multiplier: 2.0,
        }
    }

    #[test]
    fn delays_grow_and_are_capped() {
        let policy = policy(5);
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(250));
        assert_eq!(policy.delay_for(6), Duration::from_millis(250));
    }

    #[test]
    fn retries_rate_limits_until_success() {
        let sleeps = Rc::new(RefCell::new(Vec::new()));
        let recorded = Rc::clone(&sleeps);
        let inner = ScriptedGenerator::new()
            .with_error(rate_limited())
            .with_error(rate_limited())
            .with_response("done");

        let generator = RetryingGenerator::new(inner, policy(5))
            .with_sleeper(move |d| recorded.borrow_mut().push(d));

        assert_eq!(generator.generate("p").unwrap(), "done");
        assert_eq!(
            *sleeps.borrow(),
            vec![Duration::from_millis(100), Duration::from_millis(200)]
        );
    }

    #[test]
    fn gives_up_after_max_retries() {
        let inner = ScriptedGenerator::new()
            .with_error(rate_limited())
            .with_error(rate_limited())
            .with_error(rate_limited());

        let generator = RetryingGenerator::new(inner, policy(2)).with_sleeper(|_| {});

        assert_eq!(generator.generate("p").unwrap_err(), rate_limited());
    }

    #[test]
    fn other_errors_are_not_retried() {
        let inner = ScriptedGenerator::new()
            .with_error(GenerationError::Request {
                message: "boom".into(),
            })
            .with_response("never reached");

        let generator = RetryingGenerator::new(inner, policy(3)).with_sleeper(|_| {
            panic!("should not sleep");
        });

        assert!(matches!(
            generator.generate("p"),
            Err(GenerationError::Request { .. })
        ));
    }

    #[test]
    fn policy_from_settings() {
        let policy = RetryPolicy::from(&RetrySettings::default());
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.initial_delay, Duration::from_secs(1));
        assert_eq!(policy.max_delay, Duration::from_secs(30));
    }
}
