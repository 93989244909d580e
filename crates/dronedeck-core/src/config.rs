// ── Coordinator configuration ──

use std::time::Duration;

/// Tuning knobs for the mutation executor's retry behaviour.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Additional attempts after the first, for idempotent kinds on
    /// transient failure.
    pub max_retries: u32,
    /// First backoff delay; doubles per attempt.
    pub backoff_base: Duration,
    /// Upper bound on any single backoff delay.
    pub backoff_cap: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_base: Duration::from_millis(250),
            backoff_cap: Duration::from_secs(2),
        }
    }
}

impl CoordinatorConfig {
    /// Backoff before the given retry attempt (0-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.backoff_base
            .saturating_mul(factor)
            .min(self.backoff_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.backoff_for(0), Duration::from_millis(250));
        assert_eq!(config.backoff_for(1), Duration::from_millis(500));
        assert_eq!(config.backoff_for(10), Duration::from_secs(2));
    }
}
