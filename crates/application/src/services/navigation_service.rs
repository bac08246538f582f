//! Navigation service
//!
//! Drives the domain navigation state machine: opens and releases the single
//! position subscription, feeds live fixes into the machine, and performs the
//! reroutes it asks for. Reroute failures never end the session; they surface
//! as notices while the stale route stays active.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use domain::{
    Coordinate, NavigationEffect, NavigationEvent, NavigationState, NavigationThresholds, Route,
    RouteStep,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{PositionPort, PositionSubscription, RoutingPort};

/// What changed as a result of one navigation call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationProgress {
    /// Current step index after the call (`None` when idle)
    pub step_index: Option<usize>,
    /// New instruction, present only when it changed
    pub instruction: Option<String>,
    /// Compact next-turn banner for the new instruction, e.g. "← Next turn: left"
    pub banner: Option<String>,
    /// Whether the route was replaced by a reroute
    pub rerouted: bool,
    /// Non-fatal notices for the user
    pub notices: Vec<String>,
}

/// Turn-by-turn navigation session driver
pub struct NavigationService {
    routing: Arc<dyn RoutingPort>,
    positions: Arc<dyn PositionPort>,
    thresholds: NavigationThresholds,
    state: NavigationState,
    subscription: Option<Box<dyn PositionSubscription>>,
    last_position: Option<Coordinate>,
}

impl fmt::Debug for NavigationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationService")
            .field("thresholds", &self.thresholds)
            .field("active", &self.state.is_active())
            .field("step_index", &self.current_step_index())
            .field("subscribed", &self.subscription.is_some())
            .field("last_position", &self.last_position)
            .finish_non_exhaustive()
    }
}

impl NavigationService {
    /// Create an idle navigation service
    pub fn new(
        routing: Arc<dyn RoutingPort>,
        positions: Arc<dyn PositionPort>,
        thresholds: NavigationThresholds,
    ) -> Self {
        Self {
            routing,
            positions,
            thresholds,
            state: NavigationState::Idle,
            subscription: None,
            last_position: None,
        }
    }

    /// Current machine state
    pub const fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Whether guidance is in progress
    pub const fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Whether a position subscription is currently held
    pub const fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Route being followed, if navigating
    pub fn route(&self) -> Option<&Route> {
        self.state.active().map(domain::ActiveNavigation::route)
    }

    /// Index of the current step, if navigating
    pub fn current_step_index(&self) -> Option<usize> {
        self.state
            .active()
            .map(domain::ActiveNavigation::current_step_index)
    }

    /// Current maneuver, if navigating
    pub fn current_step(&self) -> Option<&RouteStep> {
        self.state.active().map(domain::ActiveNavigation::current_step)
    }

    /// Most recent position fix seen by the service
    pub const fn last_position(&self) -> Option<Coordinate> {
        self.last_position
    }

    /// Start guidance along `route`
    ///
    /// Rejects routes without steps. If guidance was already running, its
    /// subscription is released before the new one is opened. If the
    /// subscription cannot be opened the service ends up idle.
    #[instrument(skip_all, fields(steps = route.steps.len(), %destination))]
    pub async fn start(
        &mut self,
        route: Route,
        destination: Coordinate,
    ) -> Result<NavigationProgress, ApplicationError> {
        let effects = self
            .state
            .apply(NavigationEvent::Start { route, destination }, &self.thresholds)?;

        match self.execute(effects).await {
            Ok(progress) => {
                info!("Navigation started");
                Ok(progress)
            },
            Err(e) => {
                warn!(error = %e, "Could not start navigation");
                self.stop();
                Err(e)
            },
        }
    }

    /// Process one live position fix
    ///
    /// Ignored (empty progress) while idle.
    #[instrument(skip_all, fields(%position))]
    pub async fn on_position_update(
        &mut self,
        position: Coordinate,
    ) -> Result<NavigationProgress, ApplicationError> {
        self.last_position = Some(position);
        if !self.state.is_active() {
            return Ok(NavigationProgress::default());
        }

        let effects = self
            .state
            .apply(NavigationEvent::PositionUpdated(position), &self.thresholds)?;
        self.execute(effects).await
    }

    /// Wait for the next fix from the subscription and process it
    ///
    /// Returns `None` when not subscribed, or when the position stream ends;
    /// in the latter case navigation is stopped.
    pub async fn next_update(&mut self) -> Option<Result<NavigationProgress, ApplicationError>> {
        let next = self.subscription.as_mut()?.next_position().await;
        match next {
            Some(position) => Some(self.on_position_update(position).await),
            None => {
                info!("Position stream ended, stopping navigation");
                self.stop();
                None
            },
        }
    }

    /// Stop guidance and release the position subscription
    ///
    /// Safe to call at any time, any number of times.
    pub fn stop(&mut self) {
        match self.state.apply(NavigationEvent::Stop, &self.thresholds) {
            Ok(effects) if effects.is_empty() => debug!("Stop requested while idle"),
            Ok(_) => info!("Navigation stopped"),
            Err(e) => warn!(error = %e, "Unexpected error while stopping navigation"),
        }
        // Idle never holds a subscription
        self.release_subscription();
    }

    async fn execute(
        &mut self,
        effects: Vec<NavigationEffect>,
    ) -> Result<NavigationProgress, ApplicationError> {
        let mut progress = NavigationProgress::default();
        let mut queue: VecDeque<NavigationEffect> = effects.into();

        while let Some(effect) = queue.pop_front() {
            match effect {
                NavigationEffect::SubscribePositions => {
                    self.release_subscription();
                    self.subscription = Some(self.positions.subscribe()?);
                    debug!("Position subscription opened");
                },
                NavigationEffect::UnsubscribePositions => self.release_subscription(),
                NavigationEffect::RequestReroute {
                    origin,
                    destination,
                } => {
                    let follow_up = self.reroute(origin, destination).await?;
                    progress.rerouted |= follow_up
                        .iter()
                        .any(|e| matches!(e, NavigationEffect::InstructionChanged { .. }));
                    queue.extend(follow_up);
                },
                NavigationEffect::InstructionChanged {
                    step_index,
                    directive_text,
                } => {
                    info!(step_index, instruction = %directive_text, "Instruction changed");
                    progress.instruction = Some(directive_text);
                    progress.banner = self.current_step().map(RouteStep::banner);
                },
                NavigationEffect::Notice(message) => {
                    warn!(%message, "Navigation notice");
                    progress.notices.push(message);
                },
            }
        }

        progress.step_index = self.current_step_index();
        Ok(progress)
    }

    #[instrument(skip_all, fields(%origin, %destination))]
    async fn reroute(
        &mut self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<NavigationEffect>, ApplicationError> {
        info!("Off route, requesting a new route");
        let event = match self.routing.build_route(&origin, &destination).await {
            Ok(route) => NavigationEvent::RerouteSucceeded(route),
            Err(e) => {
                warn!(error = %e, "Reroute failed, keeping current route");
                NavigationEvent::RerouteFailed(e.to_string())
            },
        };
        Ok(self.state.apply(event, &self.thresholds)?)
    }

    fn release_subscription(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
            debug!("Position subscription released");
        }
    }
}

impl Drop for NavigationService {
    fn drop(&mut self) {
        self.release_subscription();
    }
}
