//! Turn-by-turn navigation state machine
//!
//! The machine is pure: [`NavigationState::apply`] takes an event and returns
//! the side effects the caller must carry out (subscribing to positions,
//! requesting a reroute, updating the instruction banner). It never performs
//! I/O itself. On error the state is left untouched.
//!
//! ```text
//! Idle --Start--> Active --Stop--> Idle
//!                   |  ^
//!                   +--+ PositionUpdated / RerouteSucceeded / RerouteFailed
//! ```

use serde::{Deserialize, Serialize};

use crate::entities::{Route, RouteStep};
use crate::errors::DomainError;
use crate::value_objects::Coordinate;

/// Distance to the current maneuver below which the next step becomes current
pub const ADVANCE_THRESHOLD_METERS: f64 = 10.0;

/// Slack beyond the current step's approach length before a new route is requested
pub const DEFAULT_REROUTE_THRESHOLD_METERS: f64 = 50.0;

/// Proximity thresholds driving step advancement and rerouting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigationThresholds {
    /// Advance when closer than this to the current maneuver
    pub advance_meters: f64,
    /// Reroute when the distance to the current maneuver exceeds the step's
    /// approach length by more than this
    pub reroute_meters: f64,
}

impl Default for NavigationThresholds {
    fn default() -> Self {
        Self {
            advance_meters: ADVANCE_THRESHOLD_METERS,
            reroute_meters: DEFAULT_REROUTE_THRESHOLD_METERS,
        }
    }
}

impl NavigationThresholds {
    /// Validate the thresholds
    ///
    /// # Errors
    ///
    /// Returns a validation error unless `0 < advance_meters < reroute_meters`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.advance_meters.is_nan() || self.advance_meters <= 0.0 {
            return Err(DomainError::ValidationError(
                "advance threshold must be greater than 0".to_string(),
            ));
        }
        if self.reroute_meters.is_nan() || self.reroute_meters <= self.advance_meters {
            return Err(DomainError::ValidationError(
                "reroute threshold must exceed the advance threshold".to_string(),
            ));
        }
        Ok(())
    }
}

/// Inputs to the navigation state machine
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    /// Begin guidance along `route` towards `destination`
    Start {
        /// Route to follow; must contain at least one step
        route: Route,
        /// Final destination, kept for rerouting
        destination: Coordinate,
    },
    /// A live position fix arrived
    PositionUpdated(Coordinate),
    /// A requested reroute produced a new route
    RerouteSucceeded(Route),
    /// A requested reroute failed
    RerouteFailed(String),
    /// End guidance
    Stop,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEffect {
    /// Open the live position subscription
    SubscribePositions,
    /// Release the live position subscription
    UnsubscribePositions,
    /// Build a new route from `origin` to `destination`
    RequestReroute {
        /// Current position
        origin: Coordinate,
        /// Original destination
        destination: Coordinate,
    },
    /// The current instruction changed
    InstructionChanged {
        /// Index into the active route's steps
        step_index: usize,
        /// Directive to display
        directive_text: String,
    },
    /// Non-fatal notice for the user
    Notice(String),
}

/// Guidance in progress
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveNavigation {
    route: Route,
    destination: Coordinate,
    current_step_index: usize,
    reroute_pending: bool,
}

impl ActiveNavigation {
    /// Route currently being followed
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Destination the session was started for
    #[must_use]
    pub const fn destination(&self) -> Coordinate {
        self.destination
    }

    /// Index of the current step; always within `route().steps`
    #[must_use]
    pub const fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    /// The maneuver the user is heading towards
    #[must_use]
    pub fn current_step(&self) -> &RouteStep {
        &self.route.steps[self.current_step_index]
    }

    /// Whether the current step is the final one
    #[must_use]
    pub fn is_on_last_step(&self) -> bool {
        self.route.last_step_index() == Some(self.current_step_index)
    }

    /// Straight-line length of the approach to the current maneuver
    ///
    /// Measured from the previous maneuver; zero for the first step.
    #[must_use]
    pub fn approach_meters(&self) -> f64 {
        self.current_step_index
            .checked_sub(1)
            .and_then(|previous| self.route.steps.get(previous))
            .map_or(0.0, |previous| {
                previous
                    .maneuver_location
                    .distance_meters(&self.current_step().maneuver_location)
            })
    }

    /// Whether a reroute has been requested and not yet answered
    #[must_use]
    pub const fn reroute_pending(&self) -> bool {
        self.reroute_pending
    }

    fn instruction_changed(&self) -> NavigationEffect {
        NavigationEffect::InstructionChanged {
            step_index: self.current_step_index,
            directive_text: self.current_step().directive_text.clone(),
        }
    }
}

/// Navigation state: idle or actively guiding
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NavigationState {
    /// No guidance, no position subscription
    #[default]
    Idle,
    /// Guidance in progress
    Active(ActiveNavigation),
}

impl NavigationState {
    /// Whether guidance is in progress
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// Active session details, if any
    #[must_use]
    pub const fn active(&self) -> Option<&ActiveNavigation> {
        match self {
            Self::Active(nav) => Some(nav),
            Self::Idle => None,
        }
    }

    /// Apply an event and return the effects the caller must perform
    ///
    /// # Errors
    ///
    /// Returns a validation error when starting with a route that has no
    /// steps. The state is unchanged in that case.
    pub fn apply(
        &mut self,
        event: NavigationEvent,
        thresholds: &NavigationThresholds,
    ) -> Result<Vec<NavigationEffect>, DomainError> {
        match event {
            NavigationEvent::Start { route, destination } => self.start(route, destination),
            NavigationEvent::PositionUpdated(position) => {
                Ok(self.on_position(position, thresholds))
            },
            NavigationEvent::RerouteSucceeded(route) => Ok(self.on_reroute_succeeded(route)),
            NavigationEvent::RerouteFailed(reason) => Ok(self.on_reroute_failed(&reason)),
            NavigationEvent::Stop => Ok(self.stop()),
        }
    }

    fn start(
        &mut self,
        route: Route,
        destination: Coordinate,
    ) -> Result<Vec<NavigationEffect>, DomainError> {
        if !route.is_navigable() {
            return Err(DomainError::ValidationError(
                "cannot navigate a route without steps".to_string(),
            ));
        }

        let mut effects = Vec::with_capacity(3);
        // one subscription at a time
        if self.is_active() {
            effects.push(NavigationEffect::UnsubscribePositions);
        }

        let nav = ActiveNavigation {
            route,
            destination,
            current_step_index: 0,
            reroute_pending: false,
        };
        effects.push(NavigationEffect::SubscribePositions);
        effects.push(nav.instruction_changed());
        *self = Self::Active(nav);
        Ok(effects)
    }

    fn on_position(
        &mut self,
        position: Coordinate,
        thresholds: &NavigationThresholds,
    ) -> Vec<NavigationEffect> {
        let Self::Active(nav) = self else {
            return Vec::new();
        };

        let distance = position.distance_meters(&nav.current_step().maneuver_location);

        // Advance wins over reroute; at most one step per update.
        if distance < thresholds.advance_meters {
            if nav.is_on_last_step() {
                return Vec::new();
            }
            nav.current_step_index += 1;
            return vec![nav.instruction_changed()];
        }

        // Anywhere on the approach to the maneuver counts as on route
        let reroute_distance = nav.approach_meters() + thresholds.reroute_meters;
        if distance > reroute_distance && !nav.reroute_pending {
            nav.reroute_pending = true;
            return vec![NavigationEffect::RequestReroute {
                origin: position,
                destination: nav.destination,
            }];
        }

        Vec::new()
    }

    fn on_reroute_succeeded(&mut self, route: Route) -> Vec<NavigationEffect> {
        let Self::Active(nav) = self else {
            return Vec::new();
        };

        nav.reroute_pending = false;
        if !route.is_navigable() {
            return vec![NavigationEffect::Notice(
                "New route has no instructions, keeping the current route".to_string(),
            )];
        }

        nav.route = route;
        nav.current_step_index = 0;
        vec![nav.instruction_changed()]
    }

    fn on_reroute_failed(&mut self, reason: &str) -> Vec<NavigationEffect> {
        let Self::Active(nav) = self else {
            return Vec::new();
        };

        nav.reroute_pending = false;
        vec![NavigationEffect::Notice(format!("Rerouting failed: {reason}"))]
    }

    fn stop(&mut self) -> Vec<NavigationEffect> {
        if self.is_active() {
            *self = Self::Idle;
            vec![NavigationEffect::UnsubscribePositions]
        } else {
            Vec::new()
        }
    }
}
