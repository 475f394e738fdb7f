//! Post-processing of the raw directions response: resolves heterogeneous
//! legs into the tagged domain model, backfills instruction text, annotates
//! indoor/outdoor transitions, and attaches display formatting.

use tracing::warn;
use wayfinder_providers::capabilities::IndoorServices;
use wayfinder_providers::raw::{RawLeg, RawRouteResponse, RawStep, RawTransitLine};
use wayfinder_routing::format::{UnitSystem, format_distance, format_duration};
use wayfinder_routing::geopoint::GeoPoint;
use wayfinder_routing::route::{
    IndoorFeature, IndoorLeg, Leg, LegBody, LegEndpoint, Maneuver, Provenance, Route, Step,
    TransitAgency, TransitLeg, TransitLine, WalkLeg,
};

use crate::error::DirectionsError;

pub async fn normalize<I>(
    raw: RawRouteResponse,
    units: UnitSystem,
    indoor: &I,
) -> Result<Route, DirectionsError>
where
    I: IndoorServices,
{
    let raw_route = raw
        .routes
        .into_iter()
        .next()
        .ok_or(DirectionsError::NoRoute)?;
    if raw_route.legs.is_empty() {
        return Err(DirectionsError::NoRoute);
    }

    let mut legs: Vec<Leg> = raw_route
        .legs
        .iter()
        .map(|leg| convert_leg(leg, units))
        .collect();

    let queued = annotate_transitions(&mut legs);
    annotate_vertical_transitions(&mut legs);
    enrich_with_building_names(&mut legs, queued, indoor).await;

    Ok(Route::new(legs, units))
}

fn convert_leg(raw: &RawLeg, units: UnitSystem) -> Leg {
    let steps: Vec<Step> = raw
        .steps
        .iter()
        .map(|step| convert_step(step, units))
        .collect();

    let body = LegBody {
        start: LegEndpoint {
            position: GeoPoint::new(raw.start_location.lat, raw.start_location.lng),
            floor: raw.start_location.floor.map(|f| f.to_string()),
        },
        end: LegEndpoint {
            position: GeoPoint::new(raw.end_location.lat, raw.end_location.lng),
            floor: raw.end_location.floor.map(|f| f.to_string()),
        },
        distance_meters: raw.distance.value,
        duration_seconds: raw.duration.value,
        distance_text: format_distance(raw.distance.value, units),
        duration_text: format_duration(raw.duration.value),
        steps,
    };

    let is_transit = raw.steps.iter().any(|step| {
        step.transit.is_some() || step.travel_mode.as_deref() == Some("TRANSIT")
    });
    if is_transit {
        let line = raw
            .steps
            .iter()
            .find_map(|step| step.transit.as_ref())
            .and_then(|transit| transit.line.as_ref())
            .map(convert_line);
        return Leg::Transit(TransitLeg { body, line });
    }

    let is_indoor = raw
        .steps
        .iter()
        .any(|step| step.highway.is_some() || step.abutters.is_some());
    if is_indoor {
        Leg::Indoor(IndoorLeg { body })
    } else {
        Leg::Walk(WalkLeg { body })
    }
}

fn convert_step(raw: &RawStep, units: UnitSystem) -> Step {
    let mut maneuver = raw.maneuver.as_deref().and_then(Maneuver::parse);
    let mut instruction = raw.instructions.clone().unwrap_or_default();

    // Maneuver backfill: indoor steps often arrive with a maneuver code but
    // no text, and provider text like "Head north" with no maneuver code.
    if raw.highway.is_some() && instruction.is_empty() {
        if let Some(maneuver) = maneuver {
            instruction = String::from(maneuver.instruction_text());
        }
    }
    if maneuver.is_none() && mentions_heading(&instruction) {
        maneuver = Some(Maneuver::Straight);
    }

    Step {
        maneuver,
        instruction,
        distance_meters: raw.distance.value,
        duration_seconds: raw.duration.value,
        distance_text: format_distance(raw.distance.value, units),
        duration_text: format_duration(raw.duration.value),
        path: raw
            .geometry
            .iter()
            .map(|p| GeoPoint::new(p.lat, p.lng))
            .collect(),
        feature: raw.highway.as_deref().and_then(IndoorFeature::parse),
        abutters: raw.abutters.clone(),
        transit: raw
            .transit
            .as_ref()
            .and_then(|transit| transit.line.as_ref())
            .map(convert_line),
        start_floor: raw.start_location.floor.map(|f| f.to_string()),
        end_floor: raw.end_location.floor.map(|f| f.to_string()),
    }
}

fn convert_line(raw: &RawTransitLine) -> TransitLine {
    TransitLine {
        name: raw.name.clone(),
        short_name: raw.short_name.clone(),
        agencies: raw
            .agencies
            .iter()
            .map(|agency| TransitAgency {
                name: agency.name.clone(),
                url: agency.url.clone(),
            })
            .collect(),
    }
}

fn mentions_heading(instruction: &str) -> bool {
    let lowered = instruction.to_ascii_lowercase();
    lowered.contains("head") || lowered.contains("walk")
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Transition {
    Enter,
    Exit,
}

/// Marks enter/exit steps at indoor/outdoor boundaries and returns the leg
/// indices queued for the building-name lookup.
fn annotate_transitions(legs: &mut [Leg]) -> Vec<usize> {
    let mut queued = Vec::new();

    for i in 1..legs.len() {
        let previous = legs[i - 1].provenance();
        let current = legs[i].provenance();

        let mut transition = match (previous, current) {
            (Provenance::ExternalProvider, Provenance::IndoorSystem) => Some(Transition::Enter),
            (Provenance::IndoorSystem, Provenance::ExternalProvider) => Some(Transition::Exit),
            _ => None,
        };

        if transition.is_none() {
            let previous_inside = legs[i - 1]
                .steps()
                .last()
                .and_then(|step| step.abutters.as_deref())
                .map(abutters_is_inside);
            let current_inside = legs[i]
                .steps()
                .first()
                .and_then(|step| step.abutters.as_deref())
                .map(abutters_is_inside);

            transition = match (previous_inside, current_inside) {
                (Some(true), Some(false)) => Some(Transition::Exit),
                (Some(false), Some(true)) => Some(Transition::Enter),
                _ => None,
            };
        }

        let Some(transition) = transition else {
            continue;
        };

        if let Some(step) = legs[i].body_mut().steps.first_mut() {
            let marker = match transition {
                Transition::Enter => "Enter:",
                Transition::Exit => "Exit:",
            };
            step.instruction = if step.instruction.is_empty() {
                String::from(marker)
            } else {
                format!("{} {}", marker, step.instruction)
            };
            queued.push(i);
        }
    }

    queued
}

fn abutters_is_inside(abutters: &str) -> bool {
    let lowered = abutters.to_ascii_lowercase();
    lowered.contains("indoor") || lowered.contains("inside")
}

/// Stairs/elevator/escalator at the start of an indoor leg replace the
/// instruction with the level change.
fn annotate_vertical_transitions(legs: &mut [Leg]) {
    for leg in legs {
        let Leg::Indoor(indoor) = leg else {
            continue;
        };
        let leg_start_floor = indoor.body.start.floor.clone();
        let leg_end_floor = indoor.body.end.floor.clone();

        let Some(step) = indoor.body.steps.first_mut() else {
            continue;
        };
        let Some(feature) = step.feature else {
            continue;
        };

        let from = step
            .start_floor
            .clone()
            .or(leg_start_floor)
            .unwrap_or_else(|| String::from("0"));
        let to = step
            .end_floor
            .clone()
            .or(leg_end_floor)
            .unwrap_or_else(|| String::from("0"));

        step.instruction = format!("{}: Level {} to {}", feature.label(), from, to);
    }
}

/// Batch-reverse-geocodes the start coordinate of every queued enter/exit
/// step and appends the resolved building or venue name. The literal word
/// "Building" stands in when the lookup yields neither, or fails entirely.
async fn enrich_with_building_names<I>(legs: &mut [Leg], queued: Vec<usize>, indoor: &I)
where
    I: IndoorServices,
{
    if queued.is_empty() {
        return;
    }

    let points: Vec<GeoPoint> = queued
        .iter()
        .map(|&leg_index| {
            let leg = &legs[leg_index];
            leg.steps()
                .first()
                .and_then(|step| step.path.first().copied())
                .unwrap_or(leg.body().start.position)
        })
        .collect();

    let hits = match indoor.reverse_geocode(&points).await {
        Ok(hits) => hits,
        Err(e) => {
            warn!("Reverse geocode failed: {}", e);
            Vec::new()
        }
    };

    for (queue_index, leg_index) in queued.into_iter().enumerate() {
        let name = hits
            .get(queue_index)
            .and_then(|hit| hit.building.clone().or_else(|| hit.venue.clone()))
            .unwrap_or_else(|| String::from("Building"));

        if let Some(step) = legs[leg_index].body_mut().steps.first_mut() {
            step.instruction = format!("{} {}", step.instruction, name);
        }
    }
}
