//! Map session
//!
//! Holds everything the map screen works with (search text, suggestions,
//! destination marker, user location, route, navigation) as explicit
//! fields. Each operation either completes or leaves the session exactly as
//! it was; failures are returned for the caller to show as a notice.

use std::fmt;
use std::sync::Arc;

use domain::{Coordinate, DomainError, NavigationThresholds, PlaceResult, Route};
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{GeocodingPort, PositionPort, RoutingPort};
use crate::services::navigation_service::{NavigationProgress, NavigationService};

/// Notice shown when a route is requested without both endpoints
pub const MISSING_ENDPOINTS: &str = "Location not found or destination not selected";

/// State of the map screen and the operations that change it
pub struct MapSession {
    geocoding: Arc<dyn GeocodingPort>,
    routing: Arc<dyn RoutingPort>,
    navigation: NavigationService,
    search_query: String,
    suggestions: Vec<PlaceResult>,
    marker: Option<PlaceResult>,
    user_location: Option<Coordinate>,
    route: Option<Route>,
}

impl fmt::Debug for MapSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapSession")
            .field("search_query", &self.search_query)
            .field("suggestions", &self.suggestions.len())
            .field("marker", &self.marker)
            .field("user_location", &self.user_location)
            .field("route_steps", &self.route.as_ref().map(|r| r.steps.len()))
            .field("navigation", &self.navigation)
            .finish_non_exhaustive()
    }
}

impl MapSession {
    /// Create an empty session
    pub fn new(
        geocoding: Arc<dyn GeocodingPort>,
        routing: Arc<dyn RoutingPort>,
        positions: Arc<dyn PositionPort>,
        thresholds: NavigationThresholds,
    ) -> Self {
        let navigation = NavigationService::new(Arc::clone(&routing), positions, thresholds);
        Self {
            geocoding,
            routing,
            navigation,
            search_query: String::new(),
            suggestions: Vec::new(),
            marker: None,
            user_location: None,
            route: None,
        }
    }

    /// Current search box text
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Current autocomplete suggestions
    pub fn suggestions(&self) -> &[PlaceResult] {
        &self.suggestions
    }

    /// Selected destination
    pub const fn marker(&self) -> Option<&PlaceResult> {
        self.marker.as_ref()
    }

    /// Last known user location
    pub const fn user_location(&self) -> Option<Coordinate> {
        self.user_location
    }

    /// Route drawn on the map
    pub const fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Navigation driver
    pub const fn navigation(&self) -> &NavigationService {
        &self.navigation
    }

    /// Where the map should be centred
    pub fn map_center(&self) -> Coordinate {
        self.marker
            .as_ref()
            .map(|m| m.coordinate)
            .or(self.user_location)
            .unwrap_or_else(Coordinate::default_map_center)
    }

    /// Record the device position
    pub fn set_user_location(&mut self, location: Coordinate) {
        self.user_location = Some(location);
    }

    /// Replace the search text without fetching suggestions
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.search_query = text.into();
        self.suggestions.clear();
    }

    /// Update the search text and refresh suggestions (best effort)
    #[instrument(skip(self, text))]
    pub async fn update_query(&mut self, text: impl Into<String> + Send) -> &[PlaceResult] {
        self.search_query = text.into();
        self.suggestions = self.geocoding.suggest(&self.search_query).await;
        debug!(count = self.suggestions.len(), "Suggestions refreshed");
        &self.suggestions
    }

    /// Look up the current query and place the destination marker
    #[instrument(skip(self), fields(query = %self.search_query))]
    pub async fn search(&mut self) -> Result<&PlaceResult, ApplicationError> {
        let query = self.search_query.trim().to_string();
        if query.is_empty() {
            return Err(ApplicationError::InvalidInput(
                "Enter a place name".to_string(),
            ));
        }

        let place = self.geocoding.search(&query).await.inspect_err(|e| {
            warn!(error = %e, "Search failed");
        })?;

        Ok(self.set_destination(place.relabelled(query)))
    }

    /// Pick an autocomplete suggestion and search for it
    pub async fn select_suggestion(
        &mut self,
        index: usize,
    ) -> Result<&PlaceResult, ApplicationError> {
        let Some(suggestion) = self.suggestions.get(index) else {
            return Err(DomainError::not_found("Suggestion", index.to_string()).into());
        };

        let previous_query =
            std::mem::replace(&mut self.search_query, suggestion.label.clone());
        let previous_suggestions = std::mem::take(&mut self.suggestions);

        let searched = self.search().await.map(|_| ());
        if let Err(e) = searched {
            self.search_query = previous_query;
            self.suggestions = previous_suggestions;
            return Err(e);
        }
        self.marker
            .as_ref()
            .ok_or_else(|| ApplicationError::Internal("marker missing after search".to_string()))
    }

    /// Use a tapped map point as the destination
    #[instrument(skip(self))]
    pub async fn tap_map(
        &mut self,
        coordinate: Coordinate,
    ) -> Result<&PlaceResult, ApplicationError> {
        let place = self.geocoding.reverse_lookup(&coordinate).await?;
        Ok(self.set_destination(place))
    }

    /// Build a route from the user location to the marker
    #[instrument(skip(self))]
    pub async fn build_route(&mut self) -> Result<&Route, ApplicationError> {
        let (Some(origin), Some(destination)) =
            (self.user_location, self.marker.as_ref().map(|m| m.coordinate))
        else {
            return Err(ApplicationError::InvalidInput(MISSING_ENDPOINTS.to_string()));
        };

        let route = self
            .routing
            .build_route(&origin, &destination)
            .await
            .inspect_err(|e| warn!(error = %e, "Route build failed"))?;

        info!(summary = %route.format_summary(), "Route built");
        self.navigation.stop();
        Ok(self.route.insert(route))
    }

    /// Start turn-by-turn guidance along the current route
    pub async fn start_navigation(&mut self) -> Result<NavigationProgress, ApplicationError> {
        let (Some(route), Some(marker)) = (self.route.as_ref(), self.marker.as_ref()) else {
            return Err(ApplicationError::InvalidInput(
                "Build a route before starting navigation".to_string(),
            ));
        };
        self.navigation.start(route.clone(), marker.coordinate).await
    }

    /// Process the next live position while navigating
    ///
    /// Keeps the user location and the drawn route in sync with the
    /// navigation session. `None` once navigation is no longer receiving fixes.
    pub async fn next_navigation_update(
        &mut self,
    ) -> Option<Result<NavigationProgress, ApplicationError>> {
        let update = self.navigation.next_update().await;
        if let Some(position) = self.navigation.last_position() {
            self.user_location = Some(position);
        }
        if let Some(Ok(progress)) = &update
            && progress.rerouted
        {
            self.route = self.navigation.route().cloned();
        }
        update
    }

    /// Stop turn-by-turn guidance
    pub fn stop_navigation(&mut self) {
        self.navigation.stop();
    }

    /// Reset the search, destination, route and navigation
    pub fn clear_search(&mut self) {
        self.navigation.stop();
        self.search_query.clear();
        self.suggestions.clear();
        self.marker = None;
        self.route = None;
        debug!("Search cleared");
    }

    fn set_destination(&mut self, place: PlaceResult) -> &PlaceResult {
        info!(label = %place.label, coordinate = %place.coordinate, "Destination selected");
        // a new destination invalidates the old route
        self.navigation.stop();
        self.route = None;
        self.marker.insert(place)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::ports::{
        MockGeocodingPort, MockPositionPort, MockRoutingPort, PositionSubscription,
    };

    struct SilentSubscription {
        cancelled: bool,
    }

    #[async_trait]
    impl PositionSubscription for SilentSubscription {
        async fn next_position(&mut self) -> Option<Coordinate> {
            None
        }

        fn cancel(&mut self) {
            self.cancelled = true;
        }

        fn is_cancelled(&self) -> bool {
            self.cancelled
        }
    }

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new_unchecked(lat, lon)
    }

    fn hermitage() -> PlaceResult {
        PlaceResult::new(coord(59.9398, 30.3146), "Hermitage Museum, Palace Square, 2")
            .with_place_id(7)
    }

    fn sample_route() -> Route {
        Route::new(
            vec![coord(59.93, 30.31), coord(59.9398, 30.3146)],
            vec![
                domain::RouteStep::new(coord(59.93, 30.31), "Depart"),
                domain::RouteStep::new(coord(59.9398, 30.3146), "Arrive at your destination"),
            ],
        )
    }

    fn positions() -> MockPositionPort {
        let mut positions = MockPositionPort::new();
        positions
            .expect_subscribe()
            .returning(|| Ok(Box::new(SilentSubscription { cancelled: false })));
        positions
    }

    fn session(geocoding: MockGeocodingPort, routing: MockRoutingPort) -> MapSession {
        MapSession::new(
            Arc::new(geocoding),
            Arc::new(routing),
            Arc::new(positions()),
            NavigationThresholds::default(),
        )
    }

    fn geocoding_finding_hermitage() -> MockGeocodingPort {
        let mut geocoding = MockGeocodingPort::new();
        geocoding.expect_search().returning(|_| Ok(hermitage()));
        geocoding
    }

    fn routing_returning(route: Route) -> MockRoutingPort {
        let mut routing = MockRoutingPort::new();
        routing
            .expect_build_route()
            .returning(move |_, _| Ok(route.clone()));
        routing
    }

    #[tokio::test]
    async fn update_query_stores_suggestions() {
        let mut geocoding = MockGeocodingPort::new();
        geocoding
            .expect_suggest()
            .withf(|q| q == "hermi")
            .returning(|_| vec![hermitage()]);

        let mut s = session(geocoding, MockRoutingPort::new());
        let suggestions = s.update_query("hermi").await;
        assert_eq!(suggestions.len(), 1);
        assert_eq!(s.search_query(), "hermi");
    }

    #[tokio::test]
    async fn search_places_marker_labelled_with_query() {
        let mut s = session(geocoding_finding_hermitage(), MockRoutingPort::new());
        s.set_query("  Hermitage ");

        let marker = s.search().await.unwrap();
        assert_eq!(marker.label, "Hermitage");
        assert_eq!(marker.coordinate, hermitage().coordinate);
        assert_eq!(s.map_center(), hermitage().coordinate);
    }

    #[tokio::test]
    async fn empty_search_is_rejected_without_lookup() {
        let mut s = session(MockGeocodingPort::new(), MockRoutingPort::new());
        let result = s.search().await;
        assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn failed_search_leaves_marker_unchanged() {
        let mut geocoding = MockGeocodingPort::new();
        geocoding
            .expect_search()
            .returning(|q| Err(ApplicationError::NotFound(format!("Place '{q}'"))));

        let mut s = session(geocoding, MockRoutingPort::new());
        s.marker = Some(hermitage());
        s.set_query("Atlantis");

        let err = s.search().await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(s.marker(), Some(&hermitage()));
    }

    #[tokio::test]
    async fn select_suggestion_searches_for_its_label() {
        let mut geocoding = MockGeocodingPort::new();
        geocoding
            .expect_search()
            .withf(|q| q == "Hermitage Museum, Palace Square, 2")
            .returning(|_| Ok(hermitage()));

        let mut s = session(geocoding, MockRoutingPort::new());
        s.suggestions = vec![hermitage()];

        let marker = s.select_suggestion(0).await.unwrap();
        assert_eq!(marker.label, "Hermitage Museum, Palace Square, 2");
        assert!(s.suggestions().is_empty());
        assert_eq!(s.search_query(), "Hermitage Museum, Palace Square, 2");
    }

    #[tokio::test]
    async fn select_missing_suggestion_fails() {
        let mut s = session(MockGeocodingPort::new(), MockRoutingPort::new());
        let result = s.select_suggestion(3).await;
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn tap_map_uses_reverse_lookup() {
        let mut geocoding = MockGeocodingPort::new();
        geocoding
            .expect_reverse_lookup()
            .returning(|c| Ok(PlaceResult::new(*c, "Selected location")));

        let mut s = session(geocoding, MockRoutingPort::new());
        let marker = s.tap_map(coord(59.95, 30.32)).await.unwrap();
        assert_eq!(marker.label, "Selected location");
        assert_eq!(marker.coordinate, coord(59.95, 30.32));
    }

    #[tokio::test]
    async fn build_route_requires_location_and_destination() {
        let mut s = session(geocoding_finding_hermitage(), MockRoutingPort::new());

        let err = s.build_route().await.unwrap_err();
        assert_eq!(err.to_string(), format!("Invalid input: {MISSING_ENDPOINTS}"));

        s.set_query("Hermitage");
        s.search().await.unwrap();
        assert!(s.build_route().await.is_err());
    }

    #[tokio::test]
    async fn build_route_stores_route() {
        let mut s = session(geocoding_finding_hermitage(), routing_returning(sample_route()));
        s.set_user_location(coord(59.93, 30.31));
        s.set_query("Hermitage");
        s.search().await.unwrap();

        let route = s.build_route().await.unwrap();
        assert_eq!(route.steps.len(), 2);
        assert!(s.route().is_some());
    }

    #[tokio::test]
    async fn failed_route_build_keeps_previous_route() {
        let mut routing = MockRoutingPort::new();
        routing
            .expect_build_route()
            .returning(|_, _| Err(ApplicationError::NotFound("Route".to_string())));

        let mut s = session(MockGeocodingPort::new(), routing);
        s.user_location = Some(coord(59.93, 30.31));
        s.marker = Some(hermitage());
        s.route = Some(sample_route());

        assert!(s.build_route().await.is_err());
        assert_eq!(s.route(), Some(&sample_route()));
    }

    #[tokio::test]
    async fn new_destination_discards_route_and_navigation() {
        let mut s = session(geocoding_finding_hermitage(), routing_returning(sample_route()));
        s.set_user_location(coord(59.93, 30.31));
        s.set_query("Hermitage");
        s.search().await.unwrap();
        s.build_route().await.unwrap();
        s.start_navigation().await.unwrap();
        assert!(s.navigation().is_active());

        s.search().await.unwrap();
        assert!(s.route().is_none());
        assert!(!s.navigation().is_active());
        assert!(!s.navigation().is_subscribed());
    }

    #[tokio::test]
    async fn start_navigation_requires_route() {
        let mut s = session(MockGeocodingPort::new(), MockRoutingPort::new());
        assert!(matches!(
            s.start_navigation().await,
            Err(ApplicationError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn navigation_stream_end_stops_navigation() {
        let mut s = session(MockGeocodingPort::new(), MockRoutingPort::new());
        s.marker = Some(hermitage());
        s.route = Some(sample_route());

        let progress = s.start_navigation().await.unwrap();
        assert_eq!(progress.instruction.as_deref(), Some("Depart"));

        assert!(s.next_navigation_update().await.is_none());
        assert!(!s.navigation().is_active());
    }

    #[tokio::test]
    async fn clear_search_resets_everything() {
        let mut s = session(geocoding_finding_hermitage(), routing_returning(sample_route()));
        s.set_user_location(coord(59.93, 30.31));
        s.set_query("Hermitage");
        s.suggestions = vec![hermitage()];
        s.search().await.unwrap();
        s.build_route().await.unwrap();
        s.start_navigation().await.unwrap();

        s.clear_search();

        assert!(s.search_query().is_empty());
        assert!(s.suggestions().is_empty());
        assert!(s.marker().is_none());
        assert!(s.route().is_none());
        assert!(!s.navigation().is_active());
        assert_eq!(s.user_location(), Some(coord(59.93, 30.31)));
    }

    #[tokio::test]
    async fn stop_navigation_keeps_route() {
        let mut s = session(MockGeocodingPort::new(), MockRoutingPort::new());
        s.marker = Some(hermitage());
        s.route = Some(sample_route());
        s.start_navigation().await.unwrap();

        s.stop_navigation();
        s.stop_navigation();

        assert!(!s.navigation().is_active());
        assert!(s.route().is_some());
    }
}
