//! Per-episode expansion statistics

use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlanningStatistics {
    /// Number of `expand` calls that ran to completion
    pub expansions: u64,
    /// Wall-clock time spent inside those calls
    pub expansion_time: Duration,
}

impl PlanningStatistics {
    pub fn record_expansion(&mut self, elapsed: Duration) {
        self.expansions += 1;
        self.expansion_time += elapsed;
    }

    pub fn mean_expansion_time(&self) -> Option<Duration> {
        if self.expansions == 0 {
            return None;
        }
        let n = u32::try_from(self.expansions).unwrap_or(u32::MAX);
        Some(self.expansion_time / n)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_reset() {
        let mut stats = PlanningStatistics::default();
        assert!(stats.mean_expansion_time().is_none());

        stats.record_expansion(Duration::from_millis(2));
        stats.record_expansion(Duration::from_millis(4));
        assert_eq!(stats.expansions, 2);
        assert_eq!(stats.expansion_time, Duration::from_millis(6));
        assert_eq!(stats.mean_expansion_time(), Some(Duration::from_millis(3)));

        stats.reset();
        assert_eq!(stats, PlanningStatistics::default());
    }
}
