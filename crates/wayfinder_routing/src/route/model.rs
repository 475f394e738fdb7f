use serde::{Deserialize, Serialize};

use crate::format::{UnitSystem, format_distance, format_duration};
use crate::geopoint::GeoPoint;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Maneuver {
    Straight,
    TurnLeft,
    TurnRight,
    TurnSharpLeft,
    TurnSharpRight,
    TurnSlightLeft,
    TurnSlightRight,
    UturnLeft,
    UturnRight,
}

impl Maneuver {
    pub fn parse(value: &str) -> Option<Maneuver> {
        match value {
            "straight" => Some(Maneuver::Straight),
            "turn-left" => Some(Maneuver::TurnLeft),
            "turn-right" => Some(Maneuver::TurnRight),
            "turn-sharp-left" => Some(Maneuver::TurnSharpLeft),
            "turn-sharp-right" => Some(Maneuver::TurnSharpRight),
            "turn-slight-left" => Some(Maneuver::TurnSlightLeft),
            "turn-slight-right" => Some(Maneuver::TurnSlightRight),
            "uturn-left" | "uturn" => Some(Maneuver::UturnLeft),
            "uturn-right" => Some(Maneuver::UturnRight),
            _ => None,
        }
    }

    /// Synthesized instruction text for steps the provider left blank.
    pub fn instruction_text(&self) -> &'static str {
        match self {
            Maneuver::Straight => "Continue straight ahead",
            Maneuver::TurnLeft => "Go left and continue",
            Maneuver::TurnRight => "Go right and continue",
            Maneuver::TurnSharpLeft => "Go sharp left and continue",
            Maneuver::TurnSharpRight => "Go sharp right and continue",
            Maneuver::TurnSlightLeft => "Go slight left and continue",
            Maneuver::TurnSlightRight => "Go slight right and continue",
            Maneuver::UturnLeft | Maneuver::UturnRight => "Turn around and continue",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndoorFeature {
    Stairs,
    Elevator,
    Escalator,
}

impl IndoorFeature {
    pub fn parse(highway: &str) -> Option<IndoorFeature> {
        match highway {
            "steps" | "stairs" => Some(IndoorFeature::Stairs),
            "elevator" => Some(IndoorFeature::Elevator),
            "escalator" => Some(IndoorFeature::Escalator),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IndoorFeature::Stairs => "Stairs",
            IndoorFeature::Elevator => "Elevator",
            IndoorFeature::Escalator => "Escalator",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitAgency {
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitLine {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub agencies: Vec<TransitAgency>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub maneuver: Option<Maneuver>,
    pub instruction: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub distance_text: String,
    pub duration_text: String,
    pub path: Vec<GeoPoint>,
    pub feature: Option<IndoorFeature>,
    pub abutters: Option<String>,
    pub transit: Option<TransitLine>,
    pub start_floor: Option<String>,
    pub end_floor: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegEndpoint {
    pub position: GeoPoint,
    pub floor: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegBody {
    pub start: LegEndpoint,
    pub end: LegEndpoint,
    pub steps: Vec<Step>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub distance_text: String,
    pub duration_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndoorLeg {
    pub body: LegBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitLeg {
    pub body: LegBody,
    pub line: Option<TransitLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalkLeg {
    pub body: LegBody,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Provenance {
    IndoorSystem,
    ExternalProvider,
}

/// One travel-mode-homogeneous segment of a route, resolved into its
/// provenance once so downstream code never branches on field presence.
#[derive(Debug, Clone, PartialEq)]
pub enum Leg {
    Indoor(IndoorLeg),
    Transit(TransitLeg),
    Walk(WalkLeg),
}

impl Leg {
    pub fn body(&self) -> &LegBody {
        match self {
            Leg::Indoor(leg) => &leg.body,
            Leg::Transit(leg) => &leg.body,
            Leg::Walk(leg) => &leg.body,
        }
    }

    pub fn body_mut(&mut self) -> &mut LegBody {
        match self {
            Leg::Indoor(leg) => &mut leg.body,
            Leg::Transit(leg) => &mut leg.body,
            Leg::Walk(leg) => &mut leg.body,
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.body().steps
    }

    pub fn provenance(&self) -> Provenance {
        match self {
            Leg::Indoor(_) => Provenance::IndoorSystem,
            Leg::Transit(_) | Leg::Walk(_) => Provenance::ExternalProvider,
        }
    }

    pub fn is_transit(&self) -> bool {
        matches!(self, Leg::Transit(_))
    }

    /// Coordinate path of the whole leg, in step order.
    pub fn path(&self) -> Vec<GeoPoint> {
        self.steps()
            .iter()
            .flat_map(|step| step.path.iter().copied())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    legs: Vec<Leg>,
    distance_meters: f64,
    duration_seconds: f64,
    distance_text: String,
    duration_text: String,
    agencies: Vec<TransitAgency>,
}

impl Route {
    pub fn new(legs: Vec<Leg>, units: UnitSystem) -> Route {
        let distance_meters = legs.iter().map(|leg| leg.body().distance_meters).sum();
        let duration_seconds = legs.iter().map(|leg| leg.body().duration_seconds).sum();
        let agencies = collect_agencies(&legs);

        Route {
            distance_text: format_distance(distance_meters, units),
            duration_text: format_duration(duration_seconds),
            legs,
            distance_meters,
            duration_seconds,
            agencies,
        }
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn distance_text(&self) -> &str {
        &self.distance_text
    }

    pub fn duration_text(&self) -> &str {
        &self.duration_text
    }

    pub fn agencies(&self) -> &[TransitAgency] {
        &self.agencies
    }
}

/// Unique transit agencies across all legs, deduplicated by name in
/// first-seen order.
fn collect_agencies(legs: &[Leg]) -> Vec<TransitAgency> {
    let mut agencies: Vec<TransitAgency> = Vec::new();

    let lines = legs.iter().flat_map(|leg| {
        let leg_line = match leg {
            Leg::Transit(transit) => transit.line.as_ref(),
            _ => None,
        };
        leg_line
            .into_iter()
            .chain(leg.steps().iter().filter_map(|step| step.transit.as_ref()))
    });

    for line in lines {
        for agency in &line.agencies {
            if !agencies.iter().any(|seen| seen.name == agency.name) {
                agencies.push(agency.clone());
            }
        }
    }

    agencies
}
