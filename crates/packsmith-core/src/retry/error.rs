//! Why a retried operation gave up

use std::time::Duration;
use thiserror::Error;

/// Terminal outcome of a failed retry loop, generic over the operation's error
#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} attempt(s) over {elapsed:?}: {last}")]
    Exhausted {
        attempts: u32,
        /// Error of the final attempt
        last: E,
        /// Wall time including delays
        elapsed: Duration,
    },

    /// The policy allowed zero attempts, so the operation never ran
    #[error("retry policy allows no attempts")]
    Cancelled,
}

impl<E> RetryError<E> {
    /// Attempts actually made; zero for `Cancelled`
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
            RetryError::Cancelled => 0,
        }
    }

    /// The operation's own error, if any attempt ran
    pub fn into_error(self) -> Option<E> {
        match self {
            RetryError::Exhausted { last, .. } => Some(last),
            RetryError::Cancelled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempts_per_variant() {
        let exhausted: RetryError<String> = RetryError::Exhausted {
            attempts: 3,
            last: "exit code 1".into(),
            elapsed: Duration::from_secs(13),
        };

        assert_eq!(exhausted.attempts(), 3);
        assert_eq!(RetryError::<String>::Cancelled.attempts(), 0);
    }

    #[test]
    fn test_into_error() {
        let err: RetryError<String> = RetryError::Exhausted {
            attempts: 3,
            last: "timed out after 300s".into(),
            elapsed: Duration::from_secs(1),
        };
        assert_eq!(err.into_error().as_deref(), Some("timed out after 300s"));
        assert!(RetryError::<String>::Cancelled.into_error().is_none());
    }

    #[test]
    fn test_display_includes_final_error() {
        let err: RetryError<String> = RetryError::Exhausted {
            attempts: 3,
            last: "packwiz exited with code 1".into(),
            elapsed: Duration::from_millis(1500),
        };
        let display = err.to_string();
        assert!(display.starts_with("gave up after 3 attempt(s)"));
        assert!(display.ends_with("packwiz exited with code 1"));
        assert_eq!(
            RetryError::<String>::Cancelled.to_string(),
            "retry policy allows no attempts"
        );
    }
}
