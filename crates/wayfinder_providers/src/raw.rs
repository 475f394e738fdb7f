//! Wire shapes exchanged with the external directions engine. Legs arrive
//! heterogeneous (indoor-routing legs, transit-shaped legs, plain walking
//! legs); normalization resolves them into the tagged domain model once.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
}

/// Argument shape of the external directions call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteQuery {
    pub origin: RoutePoint,
    pub destination: RoutePoint,
    pub travel_mode: String,
    pub avoid_stairs: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRouteResponse {
    #[serde(default)]
    pub routes: Vec<RawRoute>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRoute {
    #[serde(default)]
    pub legs: Vec<RawLeg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLeg {
    pub start_location: RawPosition,
    pub end_location: RawPosition,
    pub distance: RawMeasure,
    pub duration: RawMeasure,
    #[serde(default)]
    pub steps: Vec<RawStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStep {
    pub start_location: RawPosition,
    pub end_location: RawPosition,
    pub distance: RawMeasure,
    pub duration: RawMeasure,
    #[serde(default)]
    pub maneuver: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub travel_mode: Option<String>,
    /// Indoor feature tag (stairs/elevator/escalator) on indoor steps.
    #[serde(default)]
    pub highway: Option<String>,
    /// Adjacent-space classification used to detect indoor/outdoor
    /// transitions.
    #[serde(default)]
    pub abutters: Option<String>,
    #[serde(default)]
    pub geometry: Vec<RawPosition>,
    #[serde(default)]
    pub transit: Option<RawTransitDetails>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawPosition {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub floor: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawMeasure {
    pub value: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransitDetails {
    #[serde(default)]
    pub line: Option<RawTransitLine>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransitLine {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub agencies: Vec<RawAgency>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAgency {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}
