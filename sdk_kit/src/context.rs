use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::schema::{Reflect, TypeDesc};

/// Request context handed to every handler as its first argument.
///
/// Carries an optional deadline and a cancellation token shared by all clones. A context made
/// with [`Context::child`] is cancelled with its parent but can also be cancelled on its own.
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    token: CancellationToken,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Request-scoped context. Keeps the deadline, never cancels the parent.
    pub fn child(&self) -> Self {
        Self {
            deadline: self.deadline,
            token: self.token.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once this context or one of its parents is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// True once cancelled or once the deadline has passed.
    pub fn is_done(&self) -> bool {
        self.is_cancelled() || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

impl Reflect for Context {
    fn describe() -> TypeDesc {
        TypeDesc::context()
    }
}
