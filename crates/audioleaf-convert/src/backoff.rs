//! Linear backoff for conversion retries.

use backon::BackoffBuilder;
use std::time::Duration;

/// Builds a backoff waiting `base × n` before retry `n`, for at most
/// `max_times` retries.
#[derive(Debug, Clone, Copy)]
pub struct LinearBackoffBuilder {
    base: Duration,
    max_times: usize,
}

impl LinearBackoffBuilder {
    pub fn new(base: Duration, max_times: usize) -> Self {
        Self { base, max_times }
    }
}

impl BackoffBuilder for LinearBackoffBuilder {
    type Backoff = LinearBackoff;

    fn build(self) -> Self::Backoff {
        LinearBackoff {
            base: self.base,
            max_times: self.max_times,
            attempt: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinearBackoff {
    base: Duration,
    max_times: usize,
    attempt: usize,
}

impl Iterator for LinearBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.attempt >= self.max_times {
            return None;
        }
        self.attempt += 1;
        Some(self.base.saturating_mul(self.attempt as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_grow_linearly() {
        let delays: Vec<_> = LinearBackoffBuilder::new(Duration::from_millis(1000), 2)
            .build()
            .collect();
        assert_eq!(
            delays,
            vec![Duration::from_millis(1000), Duration::from_millis(2000)]
        );
    }

    #[test]
    fn test_zero_retries() {
        assert_eq!(
            LinearBackoffBuilder::new(Duration::from_secs(1), 0).build().next(),
            None
        );
    }
}
