//! Contracts of the external collaborators the directions core consumes.
//! The core never owns a wire format; each capability is a seam behind
//! which a real SDK, an HTTP client, or a test fake can sit.

use wayfinder_routing::geopoint::GeoPoint;

use crate::error::ProviderError;
use crate::location::{GeocodeHit, Location, PlacePrediction};
use crate::raw::{RawRouteResponse, RouteQuery};

/// External directions-computation engine.
pub trait Directions {
    async fn get_route(&self, query: &RouteQuery) -> Result<RawRouteResponse, ProviderError>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    pub near: Option<GeoPoint>,
    pub take: Option<usize>,
    pub categories: Vec<String>,
}

/// Indoor-mapping SDK services: location lookup, place search, and batch
/// reverse geocoding.
pub trait IndoorServices {
    async fn location_by_id(&self, id: &str) -> Result<Option<Location>, ProviderError>;

    async fn search(
        &self,
        query: &str,
        params: &SearchParams,
    ) -> Result<Vec<Location>, ProviderError>;

    /// Batch, order-preserving: one hit per input point.
    async fn reverse_geocode(
        &self,
        points: &[GeoPoint],
    ) -> Result<Vec<GeocodeHit>, ProviderError>;
}

/// External place-autocomplete capability (predictions plus the follow-up
/// geocode that turns a prediction into coordinates).
pub trait PlaceAutocomplete {
    async fn predict(
        &self,
        query: &str,
        country: Option<&str>,
    ) -> Result<Vec<PlacePrediction>, ProviderError>;

    async fn geocode(&self, place_id: &str) -> Result<GeoPoint, ProviderError>;
}

/// Browser geolocation; may reject with a permission/unavailable error.
pub trait Geolocation {
    async fn current_position(&self) -> Result<GeoPoint, ProviderError>;
}

pub type OverlayId = u64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineStyle {
    pub weight: u32,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl Bounds {
    pub fn from_points(points: &[GeoPoint]) -> Option<Bounds> {
        let first = points.first()?;
        let mut south = first.lat;
        let mut north = first.lat;
        let mut west = first.lng;
        let mut east = first.lng;

        for point in &points[1..] {
            south = south.min(point.lat);
            north = north.max(point.lat);
            west = west.min(point.lng);
            east = east.max(point.lng);
        }

        Some(Bounds {
            south_west: GeoPoint::new(south, west),
            north_east: GeoPoint::new(north, east),
        })
    }
}

/// The shared map surface: overlays, viewport, active floor, and the
/// on-map step-switcher control. A single directions view writes to it at
/// a time; teardown must undo every side effect.
pub trait MapSurface {
    fn draw_polyline(&mut self, path: &[GeoPoint], style: PolylineStyle) -> OverlayId;
    fn update_polyline(&mut self, id: OverlayId, path: &[GeoPoint]);
    fn remove_overlay(&mut self, id: OverlayId);

    /// Resolves once the viewport has settled (map idle).
    async fn fit_bounds(&mut self, bounds: Bounds);

    fn floor(&self) -> Option<String>;
    fn set_floor(&mut self, floor: &str);

    fn attach_step_switcher(&mut self, step_count: usize);
    fn update_step_switcher(&mut self, index: usize);
    fn detach_step_switcher(&mut self);
}

/// Session-scoped key/value storage for user preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

// Read-only capabilities are typically shared SDK handles; forward through
// `Arc` so a host can keep its own reference to the same instance.

impl<T: Directions> Directions for std::sync::Arc<T> {
    async fn get_route(&self, query: &RouteQuery) -> Result<RawRouteResponse, ProviderError> {
        T::get_route(self, query).await
    }
}

impl<T: IndoorServices> IndoorServices for std::sync::Arc<T> {
    async fn location_by_id(&self, id: &str) -> Result<Option<Location>, ProviderError> {
        T::location_by_id(self, id).await
    }

    async fn search(
        &self,
        query: &str,
        params: &SearchParams,
    ) -> Result<Vec<Location>, ProviderError> {
        T::search(self, query, params).await
    }

    async fn reverse_geocode(
        &self,
        points: &[GeoPoint],
    ) -> Result<Vec<GeocodeHit>, ProviderError> {
        T::reverse_geocode(self, points).await
    }
}

impl<T: PlaceAutocomplete> PlaceAutocomplete for std::sync::Arc<T> {
    async fn predict(
        &self,
        query: &str,
        country: Option<&str>,
    ) -> Result<Vec<PlacePrediction>, ProviderError> {
        T::predict(self, query, country).await
    }

    async fn geocode(&self, place_id: &str) -> Result<GeoPoint, ProviderError> {
        T::geocode(self, place_id).await
    }
}

impl<T: Geolocation> Geolocation for std::sync::Arc<T> {
    async fn current_position(&self) -> Result<GeoPoint, ProviderError> {
        T::current_position(self).await
    }
}
