//! Live position port
//!
//! Position fixes are pushed by the device; the application consumes them
//! through an explicit subscription handle that must be released when
//! navigation ends.

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// An open stream of position fixes
///
/// Fixes are delivered in arrival order. Dropping the handle releases it as
/// well, but callers are expected to [`cancel`](Self::cancel) explicitly.
#[async_trait]
pub trait PositionSubscription: Send {
    /// Wait for the next fix; `None` once the stream has ended or was cancelled
    async fn next_position(&mut self) -> Option<Coordinate>;

    /// Release the subscription
    ///
    /// Synchronous and safe to call any number of times.
    fn cancel(&mut self);

    /// Whether [`cancel`](Self::cancel) has been called
    fn is_cancelled(&self) -> bool;
}

/// Port for opening position subscriptions
#[cfg_attr(test, automock)]
pub trait PositionPort: Send + Sync {
    /// Open a new subscription to live position fixes
    fn subscribe(&self) -> Result<Box<dyn PositionSubscription>, ApplicationError>;
}
