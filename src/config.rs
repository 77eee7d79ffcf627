use std::time::Duration;

/// Default wait before a queued booking is promoted to priority waiting.
pub const DEFAULT_PROMOTION_DELAY: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// How long a booking sits in a standard queue before promotion.
    pub promotion_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            promotion_delay: DEFAULT_PROMOTION_DELAY,
        }
    }
}

impl EngineConfig {
    pub fn with_promotion_delay(mut self, delay: Duration) -> Self {
        self.promotion_delay = delay;
        self
    }

    /// Read `VACANCY_PROMOTION_DELAY_MS`; unset or unparsable keeps the default.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let promotion_delay = get("VACANCY_PROMOTION_DELAY_MS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_PROMOTION_DELAY);
        Self { promotion_delay }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_twenty_seconds() {
        assert_eq!(EngineConfig::default().promotion_delay, Duration::from_secs(20));
    }

    #[test]
    fn reads_delay_in_millis() {
        let cfg = EngineConfig::from_vars(|k| {
            (k == "VACANCY_PROMOTION_DELAY_MS").then(|| "1500".to_string())
        });
        assert_eq!(cfg.promotion_delay, Duration::from_millis(1500));
    }

    #[test]
    fn garbage_falls_back_to_default() {
        let cfg = EngineConfig::from_vars(|_| Some("soon".to_string()));
        assert_eq!(cfg, EngineConfig::default());
        let cfg = EngineConfig::from_vars(|_| None);
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn builder_overrides_delay() {
        let cfg = EngineConfig::default().with_promotion_delay(Duration::from_secs(1));
        assert_eq!(cfg.promotion_delay, Duration::from_secs(1));
    }
}
