//! Position sources - Implement PositionPort
//!
//! [`ChannelPositionSource`] forwards fixes pushed by the host (a GPS
//! callback, a test harness) to the active subscriber.
//! [`TrackReplayPositionSource`] replays a recorded or simulated track.
//! Both hand out at most one live subscription: subscribing again ends the
//! previous stream.

use std::time::Duration;

use application::error::ApplicationError;
use application::ports::{PositionPort, PositionSubscription};
use async_trait::async_trait;
use domain::Coordinate;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

/// Position source fed by [`ChannelPositionSource::publish`]
#[derive(Debug, Default)]
pub struct ChannelPositionSource {
    sender: Mutex<Option<mpsc::UnboundedSender<Coordinate>>>,
}

impl ChannelPositionSource {
    /// Create a source with no subscriber
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a fix to the current subscriber
    ///
    /// Returns `false` when nobody is listening.
    pub fn publish(&self, position: Coordinate) -> bool {
        let guard = self.sender.lock();
        guard
            .as_ref()
            .is_some_and(|sender| sender.send(position).is_ok())
    }

    /// Whether a live subscription exists
    pub fn has_subscriber(&self) -> bool {
        self.sender
            .lock()
            .as_ref()
            .is_some_and(|sender| !sender.is_closed())
    }
}

impl PositionPort for ChannelPositionSource {
    fn subscribe(&self) -> Result<Box<dyn PositionSubscription>, ApplicationError> {
        let (sender, receiver) = mpsc::unbounded_channel();
        if self.sender.lock().replace(sender).is_some() {
            debug!("Replacing previous position subscription");
        }
        Ok(Box::new(ChannelSubscription {
            receiver,
            cancelled: false,
        }))
    }
}

#[derive(Debug)]
struct ChannelSubscription {
    receiver: mpsc::UnboundedReceiver<Coordinate>,
    cancelled: bool,
}

#[async_trait]
impl PositionSubscription for ChannelSubscription {
    async fn next_position(&mut self) -> Option<Coordinate> {
        if self.cancelled {
            return None;
        }
        self.receiver.recv().await
    }

    fn cancel(&mut self) {
        if !self.cancelled {
            self.cancelled = true;
            self.receiver.close();
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Position source replaying a fixed track at a steady pace
#[derive(Debug)]
pub struct TrackReplayPositionSource {
    track: Mutex<Vec<Coordinate>>,
    interval: Duration,
}

impl TrackReplayPositionSource {
    /// Create a source that yields `track` with `interval` between fixes
    pub fn new(track: Vec<Coordinate>, interval: Duration) -> Self {
        Self {
            track: Mutex::new(track),
            interval,
        }
    }

    /// Replace the track used by future subscriptions
    pub fn load(&self, track: Vec<Coordinate>) {
        debug!(fixes = track.len(), "Loaded replay track");
        *self.track.lock() = track;
    }

    /// Number of fixes in the track
    pub fn len(&self) -> usize {
        self.track.lock().len()
    }

    /// Whether the track is empty
    pub fn is_empty(&self) -> bool {
        self.track.lock().is_empty()
    }
}

impl PositionPort for TrackReplayPositionSource {
    fn subscribe(&self) -> Result<Box<dyn PositionSubscription>, ApplicationError> {
        let track = self.track.lock().clone();
        if track.is_empty() {
            return Err(ApplicationError::Configuration(
                "replay track has no positions".to_string(),
            ));
        }
        Ok(Box::new(ReplaySubscription {
            remaining: track.into_iter(),
            interval: self.interval,
            started: false,
            cancelled: false,
        }))
    }
}

#[derive(Debug)]
struct ReplaySubscription {
    remaining: std::vec::IntoIter<Coordinate>,
    interval: Duration,
    started: bool,
    cancelled: bool,
}

#[async_trait]
impl PositionSubscription for ReplaySubscription {
    async fn next_position(&mut self) -> Option<Coordinate> {
        if self.cancelled {
            return None;
        }
        if self.started && !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
        self.started = true;
        self.remaining.next()
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
