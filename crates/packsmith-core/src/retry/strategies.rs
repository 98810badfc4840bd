//! Delay computation between attempts

use crate::types::{RetryPolicy, RetryStrategy};
use rand::Rng;
use std::time::Duration;

/// Delay before the attempt following `failed_attempt` (1-indexed)
///
/// Capped at `max_delay_ms`. With `jitter`, up to a quarter of the capped delay
/// is added on top.
///
/// ```rust
/// use packsmith_core::retry::calculate_delay;
/// use packsmith_core::types::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// let delays: Vec<u128> = (1..=3)
///     .map(|n| calculate_delay(&policy, n, false).as_millis())
///     .collect();
/// assert_eq!(delays, [1000, 3000, 9000]);
/// ```
pub fn calculate_delay(policy: &RetryPolicy, failed_attempt: u32, jitter: bool) -> Duration {
    let delay_ms = base_delay_ms(policy, failed_attempt.saturating_sub(1)).min(policy.max_delay_ms);
    let extra_ms = match delay_ms / 4 {
        spread if jitter && spread > 0 => rand::rng().random_range(0..=spread),
        _ => 0,
    };
    Duration::from_millis(delay_ms + extra_ms)
}

fn base_delay_ms(policy: &RetryPolicy, index: u32) -> u64 {
    let initial = policy.initial_delay_ms;
    match policy.strategy {
        RetryStrategy::None => 0,
        RetryStrategy::FixedDelay => initial,
        RetryStrategy::LinearBackoff => initial.saturating_mul(u64::from(index) + 1),
        RetryStrategy::ExponentialBackoff => {
            (initial as f64 * policy.backoff_multiplier.powi(index as i32)) as u64
        }
        // Past the end of the table the last entry repeats.
        RetryStrategy::Sequence => match policy.delays_ms.as_slice() {
            [] => 0,
            table => table[(index as usize).min(table.len() - 1)],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_strategy(strategy: RetryStrategy) -> RetryPolicy {
        RetryPolicy {
            strategy,
            ..RetryPolicy::default()
        }
    }

    fn delays(policy: &RetryPolicy, attempts: std::ops::RangeInclusive<u32>) -> Vec<u64> {
        attempts
            .map(|n| calculate_delay(policy, n, false).as_millis() as u64)
            .collect()
    }

    #[test]
    fn test_default_is_one_three_nine_seconds() {
        assert_eq!(delays(&RetryPolicy::default(), 1..=3), [1000, 3000, 9000]);
    }

    #[test]
    fn test_sequence_past_table_end() {
        assert_eq!(delays(&RetryPolicy::default(), 4..=6), [9000, 9000, 9000]);
        assert_eq!(delays(&RetryPolicy::sequence(3, vec![]), 1..=2), [0, 0]);
    }

    #[test]
    fn test_cap_applies_before_jitter() {
        let policy = RetryPolicy {
            max_delay_ms: 2000,
            ..RetryPolicy::default()
        };
        assert_eq!(delays(&policy, 1..=3), [1000, 2000, 2000]);

        for _ in 0..50 {
            let jittered = calculate_delay(&policy, 3, true).as_millis();
            assert!((2000..=2500).contains(&jittered));
        }
    }

    #[test]
    fn test_other_strategies() {
        assert_eq!(delays(&with_strategy(RetryStrategy::None), 1..=2), [0, 0]);
        assert_eq!(delays(&with_strategy(RetryStrategy::FixedDelay), 1..=2), [1000, 1000]);
        assert_eq!(
            delays(&with_strategy(RetryStrategy::LinearBackoff), 1..=3),
            [1000, 2000, 3000]
        );
        assert_eq!(
            delays(&with_strategy(RetryStrategy::ExponentialBackoff), 1..=3),
            [1000, 2000, 4000]
        );
    }

    #[test]
    fn test_zero_delay_gets_no_jitter() {
        let policy = with_strategy(RetryStrategy::None);
        assert_eq!(calculate_delay(&policy, 1, true), Duration::ZERO);
    }
}
