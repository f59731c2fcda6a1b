use bon::Builder;
use std::time::Duration;

/// Bounded exponential backoff for dates the source throttles.
///
/// `max_attempts` counts every fetch of a date, the first one included, so the default
/// of 3 means one initial try plus two retries.
///
/// # Examples
///
/// ```
/// use weatherscrape::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::builder()
///     .max_attempts(4)
///     .initial_backoff(Duration::from_millis(500))
///     .build();
///
/// assert_eq!(policy.delay_before(2, None), Duration::from_millis(500));
/// assert_eq!(policy.delay_before(3, None), Duration::from_secs(1));
/// // A longer delay requested by the source wins.
/// assert_eq!(policy.delay_before(2, Some(Duration::from_secs(5))), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct RetryPolicy {
    #[builder(default = 3)]
    pub max_attempts: u32,
    #[builder(default = Duration::from_secs(2))]
    pub initial_backoff: Duration,
    #[builder(default = 2)]
    pub multiplier: u32,
    #[builder(default = Duration::from_secs(60))]
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn no_retries() -> Self {
        Self::builder().max_attempts(1).build()
    }

    /// Whether another attempt is allowed after `attempts_made` fetches.
    pub fn allows_another(&self, attempts_made: u32) -> bool {
        attempts_made < self.max_attempts.max(1)
    }

    /// Delay to wait before attempt number `attempt` (2 for the first retry).
    pub fn delay_before(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let exponent = attempt.saturating_sub(2);
        let factor = self.multiplier.max(1).saturating_pow(exponent);
        let computed = self
            .initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff);
        match retry_after {
            Some(requested) => computed.max(requested).min(self.max_backoff),
            None => computed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert!(policy.allows_another(1));
        assert!(policy.allows_another(2));
        assert!(!policy.allows_another(3));
    }

    #[test]
    fn test_backoff_grows_and_is_capped() {
        let policy = RetryPolicy::builder()
            .initial_backoff(Duration::from_secs(2))
            .max_backoff(Duration::from_secs(10))
            .build();
        assert_eq!(policy.delay_before(2, None), Duration::from_secs(2));
        assert_eq!(policy.delay_before(3, None), Duration::from_secs(4));
        assert_eq!(policy.delay_before(4, None), Duration::from_secs(8));
        assert_eq!(policy.delay_before(5, None), Duration::from_secs(10));
        assert_eq!(policy.delay_before(60, None), Duration::from_secs(10));
    }

    #[test]
    fn test_retry_after_is_capped_too() {
        let policy = RetryPolicy::builder().max_backoff(Duration::from_secs(30)).build();
        assert_eq!(
            policy.delay_before(2, Some(Duration::from_secs(3600))),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_no_retries() {
        let policy = RetryPolicy::no_retries();
        assert!(!policy.allows_another(1));
    }
}
