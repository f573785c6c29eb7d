pub mod keypress;
pub mod signal;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio_util::sync::CancellationToken;
use tracing::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Keypress,
    Signal,
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keypress => write!(f, "keypress"),
            Self::Signal => write!(f, "OS signal"),
        }
    }
}

/// Single-fire broadcast shutdown request.
///
/// Clones share the same state. Only the first [`Shutdown::fire`] has any
/// effect, every listener observes it through [`Shutdown::cancelled`].
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    fired: Arc<AtomicBool>,
    token: CancellationToken,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` only for the call that actually fired the signal.
    pub fn fire(&self, trigger: Trigger) -> bool {
        if self
            .fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Shutdown already requested, ignoring {trigger}");
            return false;
        }

        info!("Shutdown requested by {trigger}");
        self.token.cancel();
        true
    }

    pub fn is_fired(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}
