//! Query orchestration: combining criteria into one ranked result set.

pub mod engine;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub use engine::{ScoreBreakdown, SearchEngine, SearchTuning};

/// Cooperative cancellation flag, checked between criteria during a search.
///
/// Cloning shares the flag, so a token handed to a long search can be
/// cancelled from elsewhere.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_shared_across_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
