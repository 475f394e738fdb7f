use serde::{Deserialize, Serialize};
use wayfinder_routing::geopoint::GeoPoint;

/// Indoor location as returned by the indoor-mapping backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub floor: String,
    pub building: Option<String>,
    pub venue: Option<String>,
    pub geometry: LocationGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationGeometry {
    /// Point geometry with an explicit anchor.
    Point(GeoPoint),
    /// Polygon boundary as one or more rings of coordinates.
    Boundary(Vec<Vec<GeoPoint>>),
}

impl Location {
    /// Routable coordinate: the anchor for point geometries, otherwise the
    /// centroid of the first boundary ring.
    pub fn anchor(&self) -> Option<GeoPoint> {
        match &self.geometry {
            LocationGeometry::Point(point) => Some(*point),
            LocationGeometry::Boundary(rings) => {
                let ring = rings.first()?;
                if ring.is_empty() {
                    return None;
                }
                let count = ring.len() as f64;
                let lat = ring.iter().map(|p| p.lat).sum::<f64>() / count;
                let lng = ring.iter().map(|p| p.lng).sum::<f64>() / count;
                Some(GeoPoint::new(lat, lng))
            }
        }
    }
}

/// Candidate from the external place-autocomplete capability. Carries no
/// coordinates; a follow-up geocode of `place_id` produces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacePrediction {
    pub place_id: String,
    pub primary_text: String,
    pub secondary_text: Option<String>,
}

/// One entry of a batch reverse-geocode response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodeHit {
    pub building: Option<String>,
    pub venue: Option<String>,
}
