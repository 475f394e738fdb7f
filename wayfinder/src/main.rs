//! Demo driver: wires in-memory providers into the directions flow and
//! walks a canned venue route end to end, logging what a host UI would
//! render at each stage.

use std::collections::HashMap;

use tracing::{Level, debug, info};
use wayfinder_directions::flow::{Breakpoint, DirectionsFlow, FlowConfig};
use wayfinder_directions::resolver::RouteParams;
use wayfinder_providers::capabilities::{
    Bounds, Directions, Geolocation, IndoorServices, MapSurface, OverlayId, PlaceAutocomplete,
    PolylineStyle, PreferenceStore, SearchParams,
};
use wayfinder_providers::error::ProviderError;
use wayfinder_providers::location::{GeocodeHit, Location, LocationGeometry, PlacePrediction};
use wayfinder_providers::raw::{RawRouteResponse, RouteQuery};
use wayfinder_routing::geopoint::GeoPoint;

struct DemoDirections;

impl Directions for DemoDirections {
    async fn get_route(&self, query: &RouteQuery) -> Result<RawRouteResponse, ProviderError> {
        debug!("Computing {} route", query.travel_mode);

        let payload = serde_json::json!({
            "routes": [{
                "legs": [
                    {
                        "start_location": { "lat": 50.8465, "lng": 4.3517 },
                        "end_location": { "lat": 50.8476, "lng": 4.3525 },
                        "distance": { "value": 155.0 },
                        "duration": { "value": 140.0 },
                        "steps": [{
                            "start_location": { "lat": 50.8465, "lng": 4.3517 },
                            "end_location": { "lat": 50.8476, "lng": 4.3525 },
                            "distance": { "value": 155.0 },
                            "duration": { "value": 140.0 },
                            "instructions": "Walk northeast toward the main entrance",
                            "geometry": [
                                { "lat": 50.8465, "lng": 4.3517 },
                                { "lat": 50.8476, "lng": 4.3525 }
                            ]
                        }]
                    },
                    {
                        "start_location": { "lat": 50.8476, "lng": 4.3525, "floor": 0 },
                        "end_location": { "lat": 50.8479, "lng": 4.3529, "floor": 1 },
                        "distance": { "value": 60.0 },
                        "duration": { "value": 80.0 },
                        "steps": [
                            {
                                "start_location": { "lat": 50.8476, "lng": 4.3525, "floor": 0 },
                                "end_location": { "lat": 50.8477, "lng": 4.3527, "floor": 1 },
                                "distance": { "value": 20.0 },
                                "duration": { "value": 40.0 },
                                "highway": "elevator",
                                "abutters": "indoor",
                                "geometry": [
                                    { "lat": 50.8476, "lng": 4.3525 },
                                    { "lat": 50.8477, "lng": 4.3527 }
                                ]
                            },
                            {
                                "start_location": { "lat": 50.8477, "lng": 4.3527, "floor": 1 },
                                "end_location": { "lat": 50.8479, "lng": 4.3529, "floor": 1 },
                                "distance": { "value": 40.0 },
                                "duration": { "value": 40.0 },
                                "maneuver": "turn-right",
                                "highway": "footway",
                                "abutters": "indoor",
                                "geometry": [
                                    { "lat": 50.8477, "lng": 4.3527 },
                                    { "lat": 50.8479, "lng": 4.3529 }
                                ]
                            }
                        ]
                    }
                ]
            }]
        });

        Ok(serde_json::from_value(payload)?)
    }
}

struct DemoIndoor {
    locations: HashMap<String, Location>,
}

impl DemoIndoor {
    fn new() -> DemoIndoor {
        let cafe = Location {
            id: String::from("atrium-cafe"),
            name: String::from("Atrium Cafe"),
            floor: String::from("1"),
            building: Some(String::from("North Wing")),
            venue: Some(String::from("HQ Campus")),
            geometry: LocationGeometry::Point(GeoPoint::new(50.8479, 4.3529)),
        };
        DemoIndoor {
            locations: HashMap::from([(cafe.id.clone(), cafe)]),
        }
    }
}

impl IndoorServices for DemoIndoor {
    async fn location_by_id(&self, id: &str) -> Result<Option<Location>, ProviderError> {
        Ok(self.locations.get(id).cloned())
    }

    async fn search(
        &self,
        query: &str,
        _params: &SearchParams,
    ) -> Result<Vec<Location>, ProviderError> {
        let needle = query.to_ascii_lowercase();
        Ok(self
            .locations
            .values()
            .filter(|location| location.name.to_ascii_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn reverse_geocode(
        &self,
        points: &[GeoPoint],
    ) -> Result<Vec<GeocodeHit>, ProviderError> {
        Ok(points
            .iter()
            .map(|_| GeocodeHit {
                building: Some(String::from("North Wing")),
                venue: Some(String::from("HQ Campus")),
            })
            .collect())
    }
}

struct DemoPlaces;

impl PlaceAutocomplete for DemoPlaces {
    async fn predict(
        &self,
        _query: &str,
        _country: Option<&str>,
    ) -> Result<Vec<PlacePrediction>, ProviderError> {
        Ok(vec![PlacePrediction {
            place_id: String::from("central-station"),
            primary_text: String::from("Central Station"),
            secondary_text: Some(String::from("Carrefour de l'Europe 2")),
        }])
    }

    async fn geocode(&self, _place_id: &str) -> Result<GeoPoint, ProviderError> {
        Ok(GeoPoint::new(50.8454, 4.3571))
    }
}

struct DemoGeolocation;

impl Geolocation for DemoGeolocation {
    async fn current_position(&self) -> Result<GeoPoint, ProviderError> {
        Ok(GeoPoint::new(50.8465, 4.3517))
    }
}

/// Map surface that logs every side effect instead of rendering.
#[derive(Default)]
struct LogMap {
    floor: Option<String>,
    next_overlay: OverlayId,
}

impl MapSurface for LogMap {
    fn draw_polyline(&mut self, path: &[GeoPoint], style: PolylineStyle) -> OverlayId {
        self.next_overlay += 1;
        debug!(
            "Polyline {} drawn: {} points, weight {}",
            self.next_overlay,
            path.len(),
            style.weight
        );
        self.next_overlay
    }

    fn update_polyline(&mut self, id: OverlayId, path: &[GeoPoint]) {
        debug!("Polyline {} now {} points", id, path.len());
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        debug!("Overlay {} removed", id);
    }

    async fn fit_bounds(&mut self, bounds: Bounds) {
        debug!(
            "Viewport fit to ({}, {})..({}, {})",
            bounds.south_west.lat, bounds.south_west.lng, bounds.north_east.lat,
            bounds.north_east.lng
        );
    }

    fn floor(&self) -> Option<String> {
        self.floor.clone()
    }

    fn set_floor(&mut self, floor: &str) {
        info!("Active floor: {}", floor);
        self.floor = Some(floor.to_string());
    }

    fn attach_step_switcher(&mut self, step_count: usize) {
        debug!("Step switcher attached for {} steps", step_count);
    }

    fn update_step_switcher(&mut self, index: usize) {
        debug!("Step switcher at {}", index);
    }

    fn detach_step_switcher(&mut self) {
        debug!("Step switcher detached");
    }
}

#[derive(Default)]
struct SessionPrefs {
    values: HashMap<String, String>,
}

impl PreferenceStore for SessionPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename("./.env.local").ok();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let mut flow = DirectionsFlow::new(
        DemoDirections,
        DemoIndoor::new(),
        DemoPlaces,
        DemoGeolocation,
        LogMap::default(),
        SessionPrefs::default(),
        FlowConfig {
            breakpoint: Breakpoint::Handset,
            ..FlowConfig::default()
        },
    );

    flow.initialize(&RouteParams {
        destination_id: Some(String::from("atrium-cafe")),
        origin_id: None,
    })
    .await?;

    if let Some(notice) = flow.take_notice() {
        info!("Notice: {}", notice);
    }

    if let Some(route) = flow.route() {
        info!(
            "Route found: {} in {} over {} legs",
            route.distance_text(),
            route.duration_text(),
            route.legs().len()
        );
    }

    // Walk the flattened step sequence the way the UI's next button would.
    loop {
        if let (Some(route), Some((leg_index, step_index))) = (flow.route(), flow.current_step())
            && let Some(step) = route.legs()[leg_index].steps().get(step_index)
        {
            info!(
                "Leg {} step {}: {} ({}, {})",
                leg_index, step_index, step.instruction, step.distance_text, step.duration_text
            );
        }

        let before = flow.current_step();
        flow.next_step().await;
        if flow.current_step() == before {
            break;
        }
    }

    // Drive the progress animation of the final step to completion.
    let mut frames = 0;
    while !flow.animation_tick(0.25) {
        frames += 1;
    }
    info!("Progress animation settled after {} frames", frames);

    flow.teardown();
    Ok(())
}
