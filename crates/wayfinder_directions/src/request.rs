use std::fmt::Display;

use serde::{Deserialize, Serialize};
use wayfinder_providers::raw::RouteQuery;

use crate::endpoint::Endpoint;
use crate::error::DirectionsError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    Walking,
    Bicycling,
    Transit,
    Driving,
}

impl TravelMode {
    pub fn parse(value: &str) -> Option<TravelMode> {
        match value.to_ascii_uppercase().as_str() {
            "WALKING" => Some(TravelMode::Walking),
            "BICYCLING" => Some(TravelMode::Bicycling),
            "TRANSIT" => Some(TravelMode::Transit),
            "DRIVING" => Some(TravelMode::Driving),
            _ => None,
        }
    }
}

impl Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TravelMode::Walking => "WALKING",
                TravelMode::Bicycling => "BICYCLING",
                TravelMode::Transit => "TRANSIT",
                TravelMode::Driving => "DRIVING",
            }
        )
    }
}

/// Immutable value describing one directions request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    origin: Endpoint,
    destination: Endpoint,
    travel_mode: TravelMode,
    avoid_stairs: bool,
}

impl RouteRequest {
    /// Fails with `IncompleteEndpoints` when either side is absent; the
    /// caller must not issue a directions call in that case.
    pub fn build(
        origin: Option<&Endpoint>,
        destination: Option<&Endpoint>,
        travel_mode: TravelMode,
        avoid_stairs: bool,
    ) -> Result<RouteRequest, DirectionsError> {
        match (origin, destination) {
            (Some(origin), Some(destination)) => Ok(RouteRequest {
                origin: origin.clone(),
                destination: destination.clone(),
                travel_mode,
                avoid_stairs,
            }),
            _ => Err(DirectionsError::IncompleteEndpoints),
        }
    }

    pub fn travel_mode(&self) -> TravelMode {
        self.travel_mode
    }

    pub fn query(&self) -> RouteQuery {
        RouteQuery {
            origin: self.origin.route_point(),
            destination: self.destination.route_point(),
            travel_mode: self.travel_mode.to_string(),
            avoid_stairs: self.avoid_stairs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_routing::geopoint::GeoPoint;

    fn endpoint() -> Endpoint {
        Endpoint::ExternalPlace {
            name: String::from("Station"),
            subtitle: None,
            position: GeoPoint::new(50.0, 4.0),
        }
    }

    #[test]
    fn test_build_requires_both_endpoints() {
        let endpoint = endpoint();

        assert!(matches!(
            RouteRequest::build(None, Some(&endpoint), TravelMode::Walking, false),
            Err(DirectionsError::IncompleteEndpoints)
        ));
        assert!(matches!(
            RouteRequest::build(Some(&endpoint), None, TravelMode::Walking, false),
            Err(DirectionsError::IncompleteEndpoints)
        ));
        assert!(
            RouteRequest::build(Some(&endpoint), Some(&endpoint), TravelMode::Walking, false)
                .is_ok()
        );
    }

    #[test]
    fn test_query_uppercases_travel_mode() {
        let endpoint = endpoint();
        let request =
            RouteRequest::build(Some(&endpoint), Some(&endpoint), TravelMode::Transit, true)
                .unwrap();

        let query = request.query();
        assert_eq!(query.travel_mode, "TRANSIT");
        assert!(query.avoid_stairs);
    }

    #[test]
    fn test_travel_mode_parse_case_insensitive() {
        assert_eq!(TravelMode::parse("walking"), Some(TravelMode::Walking));
        assert_eq!(TravelMode::parse("TRANSIT"), Some(TravelMode::Transit));
        assert_eq!(TravelMode::parse("teleport"), None);
    }
}
