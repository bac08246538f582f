//! Raw OSRM route service response types

use domain::{Coordinate, Maneuver, ManeuverModifier, Route, RouteStep};
use serde::Deserialize;

use crate::error::RoutingError;
use crate::instructions::directive_text;

/// Top-level `/route` response
#[derive(Debug, Deserialize)]
pub(crate) struct RawRouteResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRoute {
    pub geometry: RawGeometry,
    #[serde(default)]
    pub legs: Vec<RawLeg>,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

/// GeoJSON `LineString` geometry
#[derive(Debug, Deserialize)]
pub(crate) struct RawGeometry {
    pub coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLeg {
    #[serde(default)]
    pub steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawStep {
    pub maneuver: RawManeuver,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub distance: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawManeuver {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub modifier: Option<String>,
    pub location: Vec<f64>,
    #[serde(default)]
    pub exit: Option<u32>,
}

/// OSRM positions are `[longitude, latitude]`
fn position(values: &[f64]) -> Result<Coordinate, RoutingError> {
    let [lon, lat, ..] = values else {
        return Err(RoutingError::ParseError(format!(
            "position needs two values, got {}",
            values.len()
        )));
    };
    Coordinate::new(*lat, *lon).map_err(|e| RoutingError::ParseError(e.to_string()))
}

impl RawStep {
    fn into_step(self) -> Result<RouteStep, RoutingError> {
        let modifier = self
            .maneuver
            .modifier
            .as_deref()
            .and_then(ManeuverModifier::parse);
        Ok(RouteStep {
            maneuver_location: position(&self.maneuver.location)?,
            directive_text: directive_text(
                &self.maneuver.kind,
                modifier,
                &self.name,
                self.maneuver.exit,
            ),
            maneuver: Maneuver {
                kind: self.maneuver.kind,
                modifier,
            },
            distance_meters: self.distance,
        })
    }
}

impl RawRoute {
    /// Convert into a domain route, concatenating the steps of every leg
    pub fn into_route(self) -> Result<Route, RoutingError> {
        let polyline = self
            .geometry
            .coordinates
            .iter()
            .map(|p| position(p))
            .collect::<Result<Vec<_>, _>>()?;

        let steps = self
            .legs
            .into_iter()
            .flat_map(|leg| leg.steps)
            .map(RawStep::into_step)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Route::new(polyline, steps).with_totals(self.distance, self.duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_lon_lat() {
        let c = position(&[30.3146, 59.9398]).unwrap();
        assert!((c.latitude() - 59.9398).abs() < 1e-9);
        assert!((c.longitude() - 30.3146).abs() < 1e-9);
    }

    #[test]
    fn short_positions_are_rejected() {
        assert!(matches!(position(&[30.0]), Err(RoutingError::ParseError(_))));
    }

    #[test]
    fn step_conversion() {
        let raw: RawStep = serde_json::from_str(
            r#"{
                "name": "Nevsky Prospekt",
                "distance": 120.5,
                "maneuver": {"type": "turn", "modifier": "left", "location": [30.32, 59.93]}
            }"#,
        )
        .unwrap();

        let step = raw.into_step().unwrap();
        assert_eq!(step.directive_text, "Turn left onto Nevsky Prospekt");
        assert_eq!(step.maneuver.kind, "turn");
        assert_eq!(step.maneuver.modifier, Some(ManeuverModifier::Left));
        assert!((step.distance_meters - 120.5).abs() < f64::EPSILON);
    }

    #[test]
    fn legs_are_concatenated_in_order() {
        let raw: RawRoute = serde_json::from_str(
            r#"{
                "geometry": {"type": "LineString", "coordinates": [[30.30, 59.93], [30.31, 59.94]]},
                "distance": 1500.0,
                "duration": 300.0,
                "legs": [
                    {"steps": [
                        {"name": "", "maneuver": {"type": "depart", "location": [30.30, 59.93]}},
                        {"name": "A", "maneuver": {"type": "turn", "modifier": "right", "location": [30.305, 59.935]}}
                    ]},
                    {"steps": [
                        {"name": "B", "maneuver": {"type": "turn", "modifier": "left", "location": [30.308, 59.938]}},
                        {"name": "", "maneuver": {"type": "arrive", "location": [30.31, 59.94]}}
                    ]}
                ]
            }"#,
        )
        .unwrap();

        let route = raw.into_route().unwrap();
        let texts: Vec<_> = route.steps.iter().map(|s| s.directive_text.as_str()).collect();
        assert_eq!(
            texts,
            [
                "Depart",
                "Turn right onto A",
                "Turn left onto B",
                "Arrive at your destination"
            ]
        );
        assert_eq!(route.polyline.len(), 2);
        assert!((route.distance_meters - 1500.0).abs() < f64::EPSILON);
        assert!((route.duration_secs - 300.0).abs() < f64::EPSILON);
    }
}
