//! In-memory fakes for the external capabilities, shared by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use wayfinder_providers::capabilities::{
    Bounds, Directions, Geolocation, IndoorServices, MapSurface, OverlayId, PlaceAutocomplete,
    PolylineStyle, PreferenceStore, SearchParams,
};
use wayfinder_providers::error::ProviderError;
use wayfinder_providers::location::{GeocodeHit, Location, LocationGeometry, PlacePrediction};
use wayfinder_providers::raw::{
    RawLeg, RawMeasure, RawPosition, RawRoute, RawRouteResponse, RawStep, RawTransitDetails,
    RawTransitLine, RouteQuery,
};
use wayfinder_routing::geopoint::GeoPoint;

pub fn indoor_location(id: &str, name: &str) -> Location {
    Location {
        id: id.to_string(),
        name: name.to_string(),
        floor: String::from("0"),
        building: None,
        venue: None,
        geometry: LocationGeometry::Point(GeoPoint::new(50.0, 4.0)),
    }
}

pub fn boundary_location(id: &str, name: &str) -> Location {
    Location {
        id: id.to_string(),
        name: name.to_string(),
        floor: String::from("1"),
        building: None,
        venue: None,
        geometry: LocationGeometry::Boundary(vec![vec![
            GeoPoint::new(50.0, 4.0),
            GeoPoint::new(50.0, 4.002),
            GeoPoint::new(50.002, 4.002),
            GeoPoint::new(50.002, 4.0),
        ]]),
    }
}

#[derive(Default)]
pub struct FakeIndoor {
    locations: HashMap<String, Location>,
    search_results: Vec<Location>,
    search_delays: HashMap<String, Duration>,
    geocode_hits: Vec<GeocodeHit>,
    search_calls: Mutex<Vec<String>>,
    geocode_calls: Mutex<Vec<Vec<GeoPoint>>>,
}

impl FakeIndoor {
    pub fn with_locations(locations: Vec<Location>) -> FakeIndoor {
        FakeIndoor {
            locations: locations
                .into_iter()
                .map(|location| (location.id.clone(), location))
                .collect(),
            ..FakeIndoor::default()
        }
    }

    pub fn with_search_results(results: Vec<Location>) -> FakeIndoor {
        FakeIndoor {
            search_results: results,
            ..FakeIndoor::default()
        }
    }

    pub fn with_geocode_hits(mut self, hits: Vec<GeocodeHit>) -> FakeIndoor {
        self.geocode_hits = hits;
        self
    }

    pub fn with_search_delay(mut self, query: &str, delay: Duration) -> FakeIndoor {
        self.search_delays.insert(query.to_string(), delay);
        self
    }

    pub fn search_queries(&self) -> Vec<String> {
        self.search_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn geocode_batches(&self) -> Vec<Vec<GeoPoint>> {
        self.geocode_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl IndoorServices for FakeIndoor {
    async fn location_by_id(&self, id: &str) -> Result<Option<Location>, ProviderError> {
        Ok(self.locations.get(id).cloned())
    }

    async fn search(
        &self,
        query: &str,
        _params: &SearchParams,
    ) -> Result<Vec<Location>, ProviderError> {
        self.search_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(query.to_string());

        if let Some(delay) = self.search_delays.get(query) {
            tokio::time::sleep(*delay).await;
        }

        Ok(self.search_results.clone())
    }

    async fn reverse_geocode(
        &self,
        points: &[GeoPoint],
    ) -> Result<Vec<GeocodeHit>, ProviderError> {
        self.geocode_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(points.to_vec());
        Ok(self.geocode_hits.clone())
    }
}

pub struct FakeGeolocation {
    position: Option<GeoPoint>,
}

impl FakeGeolocation {
    pub fn at(position: GeoPoint) -> FakeGeolocation {
        FakeGeolocation {
            position: Some(position),
        }
    }

    pub fn denied() -> FakeGeolocation {
        FakeGeolocation { position: None }
    }
}

impl Geolocation for FakeGeolocation {
    async fn current_position(&self) -> Result<GeoPoint, ProviderError> {
        self.position
            .ok_or_else(|| ProviderError::Unavailable(String::from("permission denied")))
    }
}

#[derive(Default)]
pub struct FakePlaces {
    predictions: Vec<PlacePrediction>,
    geocodes: HashMap<String, GeoPoint>,
    fail_geocode: bool,
}

impl FakePlaces {
    pub fn with_predictions(names: Vec<&str>) -> FakePlaces {
        FakePlaces {
            predictions: names
                .into_iter()
                .map(|name| PlacePrediction {
                    place_id: name.to_string(),
                    primary_text: name.to_string(),
                    secondary_text: None,
                })
                .collect(),
            ..FakePlaces::default()
        }
    }

    pub fn with_geocode(place_id: &str, position: GeoPoint) -> FakePlaces {
        FakePlaces {
            geocodes: HashMap::from([(place_id.to_string(), position)]),
            ..FakePlaces::default()
        }
    }

    pub fn failing_geocode() -> FakePlaces {
        FakePlaces {
            fail_geocode: true,
            ..FakePlaces::default()
        }
    }
}

impl PlaceAutocomplete for FakePlaces {
    async fn predict(
        &self,
        _query: &str,
        _country: Option<&str>,
    ) -> Result<Vec<PlacePrediction>, ProviderError> {
        Ok(self.predictions.clone())
    }

    async fn geocode(&self, place_id: &str) -> Result<GeoPoint, ProviderError> {
        if self.fail_geocode {
            return Err(ProviderError::Unavailable(String::from("geocoder down")));
        }
        self.geocodes
            .get(place_id)
            .copied()
            .ok_or_else(|| ProviderError::Unavailable(String::from("unknown place")))
    }
}

#[derive(Default)]
pub struct FakeDirections {
    response: Option<RawRouteResponse>,
    fail: bool,
    calls: Mutex<Vec<RouteQuery>>,
}

impl FakeDirections {
    pub fn with_response(response: RawRouteResponse) -> FakeDirections {
        FakeDirections {
            response: Some(response),
            ..FakeDirections::default()
        }
    }

    pub fn failing() -> FakeDirections {
        FakeDirections {
            fail: true,
            ..FakeDirections::default()
        }
    }

    pub fn calls(&self) -> Vec<RouteQuery> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Directions for FakeDirections {
    async fn get_route(&self, query: &RouteQuery) -> Result<RawRouteResponse, ProviderError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(query.clone());

        if self.fail {
            return Err(ProviderError::Unavailable(String::from("engine down")));
        }
        Ok(self.response.clone().unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    DrawPolyline(OverlayId, usize),
    UpdatePolyline(OverlayId),
    RemoveOverlay(OverlayId),
    FitBounds,
    SetFloor(String),
    AttachSwitcher(usize),
    UpdateSwitcher(usize),
    DetachSwitcher,
}

#[derive(Default)]
pub struct RecordingMap {
    pub events: Vec<MapEvent>,
    floor: Option<String>,
    next_overlay: OverlayId,
    live_overlays: Vec<OverlayId>,
    pub switcher_attached: bool,
}

impl RecordingMap {
    pub fn live_overlays(&self) -> &[OverlayId] {
        &self.live_overlays
    }

    pub fn count(&self, matches: impl Fn(&MapEvent) -> bool) -> usize {
        self.events.iter().filter(|event| matches(event)).count()
    }
}

impl MapSurface for RecordingMap {
    fn draw_polyline(&mut self, path: &[GeoPoint], _style: PolylineStyle) -> OverlayId {
        self.next_overlay += 1;
        self.live_overlays.push(self.next_overlay);
        self.events
            .push(MapEvent::DrawPolyline(self.next_overlay, path.len()));
        self.next_overlay
    }

    fn update_polyline(&mut self, id: OverlayId, _path: &[GeoPoint]) {
        self.events.push(MapEvent::UpdatePolyline(id));
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        self.live_overlays.retain(|&live| live != id);
        self.events.push(MapEvent::RemoveOverlay(id));
    }

    async fn fit_bounds(&mut self, _bounds: Bounds) {
        self.events.push(MapEvent::FitBounds);
    }

    fn floor(&self) -> Option<String> {
        self.floor.clone()
    }

    fn set_floor(&mut self, floor: &str) {
        self.floor = Some(floor.to_string());
        self.events.push(MapEvent::SetFloor(floor.to_string()));
    }

    fn attach_step_switcher(&mut self, step_count: usize) {
        self.switcher_attached = true;
        self.events.push(MapEvent::AttachSwitcher(step_count));
    }

    fn update_step_switcher(&mut self, index: usize) {
        self.events.push(MapEvent::UpdateSwitcher(index));
    }

    fn detach_step_switcher(&mut self) {
        self.switcher_attached = false;
        self.events.push(MapEvent::DetachSwitcher);
    }
}

#[derive(Default)]
pub struct MemoryPrefs {
    values: HashMap<String, String>,
}

impl MemoryPrefs {
    pub fn with(key: &str, value: &str) -> MemoryPrefs {
        MemoryPrefs {
            values: HashMap::from([(key.to_string(), value.to_string())]),
        }
    }
}

impl PreferenceStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

fn position(lat: f64, lng: f64, floor: Option<i32>) -> RawPosition {
    RawPosition { lat, lng, floor }
}

pub fn raw_step(floor: Option<i32>) -> RawStep {
    RawStep {
        start_location: position(50.0, 4.0, floor),
        end_location: position(50.001, 4.0, floor),
        distance: RawMeasure { value: 120.0 },
        duration: RawMeasure { value: 120.0 },
        maneuver: None,
        instructions: None,
        travel_mode: None,
        highway: None,
        abutters: None,
        geometry: vec![position(50.0, 4.0, None), position(50.001, 4.0, None)],
        transit: None,
    }
}

pub fn raw_walk_leg() -> RawLeg {
    let mut step = raw_step(None);
    step.instructions = Some(String::from("Walk to the entrance"));
    RawLeg {
        start_location: position(50.0, 4.0, None),
        end_location: position(50.001, 4.0, None),
        distance: RawMeasure { value: 120.0 },
        duration: RawMeasure { value: 120.0 },
        steps: vec![step],
    }
}

pub fn raw_indoor_leg(highway: Option<&str>, from_floor: i32, to_floor: i32) -> RawLeg {
    let mut step = raw_step(Some(from_floor));
    step.end_location.floor = Some(to_floor);
    step.highway = Some(highway.unwrap_or("footway").to_string());
    RawLeg {
        start_location: position(50.0, 4.0, Some(from_floor)),
        end_location: position(50.001, 4.0, Some(to_floor)),
        distance: RawMeasure { value: 120.0 },
        duration: RawMeasure { value: 120.0 },
        steps: vec![step],
    }
}

pub fn raw_transit_leg(line: &str, agency: &str) -> RawLeg {
    let mut step = raw_step(None);
    step.travel_mode = Some(String::from("TRANSIT"));
    step.transit = Some(RawTransitDetails {
        line: Some(RawTransitLine {
            name: Some(line.to_string()),
            short_name: None,
            agencies: vec![wayfinder_providers::raw::RawAgency {
                name: agency.to_string(),
                url: None,
            }],
        }),
    });
    RawLeg {
        start_location: position(50.001, 4.0, None),
        end_location: position(50.01, 4.0, None),
        distance: RawMeasure { value: 900.0 },
        duration: RawMeasure { value: 300.0 },
        steps: vec![step],
    }
}

pub fn raw_response(legs: Vec<RawLeg>) -> RawRouteResponse {
    RawRouteResponse {
        routes: vec![RawRoute { legs }],
    }
}
