use wayfinder_providers::location::Location;
use wayfinder_providers::raw::RoutePoint;
use wayfinder_routing::geopoint::GeoPoint;

pub const LIVE_POSITION_NAME: &str = "My position";

/// Resolved origin or destination. Exactly one provenance: backed by an
/// indoor location, by a live device position, or by a geocoded external
/// place. Replaced wholesale on change, never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    IndoorLocation {
        id: String,
        name: String,
        floor: String,
        position: GeoPoint,
        building: Option<String>,
        venue: Option<String>,
    },
    LivePosition {
        position: GeoPoint,
        floor: String,
    },
    ExternalPlace {
        name: String,
        subtitle: Option<String>,
        position: GeoPoint,
    },
}

impl Endpoint {
    /// Indoor endpoint from a backend location; `None` when the location
    /// carries no usable geometry.
    pub fn from_location(location: &Location) -> Option<Endpoint> {
        Some(Endpoint::IndoorLocation {
            id: location.id.clone(),
            name: location.name.clone(),
            floor: location.floor.clone(),
            position: location.anchor()?,
            building: location.building.clone(),
            venue: location.venue.clone(),
        })
    }

    pub fn position(&self) -> GeoPoint {
        match self {
            Endpoint::IndoorLocation { position, .. }
            | Endpoint::LivePosition { position, .. }
            | Endpoint::ExternalPlace { position, .. } => *position,
        }
    }

    /// Venue-local floor; external places are routed from ground level.
    pub fn floor(&self) -> Option<&str> {
        match self {
            Endpoint::IndoorLocation { floor, .. } | Endpoint::LivePosition { floor, .. } => {
                Some(floor)
            }
            Endpoint::ExternalPlace { .. } => None,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Endpoint::IndoorLocation { name, .. } | Endpoint::ExternalPlace { name, .. } => name,
            Endpoint::LivePosition { .. } => LIVE_POSITION_NAME,
        }
    }

    /// Formatted search-field label: name, floor, building, venue for
    /// indoor locations; "name, subtitle" for external places.
    pub fn display_label(&self) -> String {
        match self {
            Endpoint::IndoorLocation {
                name,
                floor,
                building,
                venue,
                ..
            } => {
                let mut parts = vec![name.clone(), format!("Level {}", floor)];
                if let Some(building) = building {
                    parts.push(building.clone());
                }
                if let Some(venue) = venue {
                    parts.push(venue.clone());
                }
                parts.join(", ")
            }
            Endpoint::LivePosition { .. } => String::from(LIVE_POSITION_NAME),
            Endpoint::ExternalPlace { name, subtitle, .. } => match subtitle {
                Some(subtitle) => format!("{}, {}", name, subtitle),
                None => name.clone(),
            },
        }
    }

    /// Projection sent to the external directions engine.
    pub fn route_point(&self) -> RoutePoint {
        let position = self.position();
        RoutePoint {
            lat: position.lat,
            lng: position.lng,
            floor: self.floor().map(String::from),
        }
    }
}
