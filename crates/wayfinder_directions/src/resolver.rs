use tracing::{debug, warn};
use wayfinder_providers::capabilities::{Geolocation, IndoorServices, PlaceAutocomplete};

use crate::endpoint::Endpoint;
use crate::error::DirectionsError;
use crate::search::Candidate;

/// Deep-link route parameters the directions view is opened with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteParams {
    pub destination_id: Option<String>,
    pub origin_id: Option<String>,
}

/// Result of origin resolution. A missing origin is recoverable (the user
/// provides one explicitly); `notice` carries the one-per-session
/// geolocation hint when device position was attempted and failed.
#[derive(Debug)]
pub struct OriginOutcome {
    pub endpoint: Option<Endpoint>,
    pub notice: Option<DirectionsError>,
}

pub async fn resolve_destination<I>(id: &str, indoor: &I) -> Result<Endpoint, DirectionsError>
where
    I: IndoorServices,
{
    let location = match indoor.location_by_id(id).await {
        Ok(Some(location)) => location,
        Ok(None) => return Err(DirectionsError::EndpointNotFound(id.to_string())),
        Err(e) => {
            warn!("Location lookup for '{}' failed: {}", id, e);
            return Err(DirectionsError::EndpointNotFound(id.to_string()));
        }
    };

    Endpoint::from_location(&location)
        .ok_or_else(|| DirectionsError::EndpointNotFound(id.to_string()))
}

/// Origin resolution priority, first match wins: an already-resolved
/// endpoint, an explicit origin id, then device geolocation when enabled.
/// Geolocation failure leaves the origin slot empty instead of failing the
/// flow.
pub async fn resolve_origin<I, G>(
    current: Option<&Endpoint>,
    params: &RouteParams,
    indoor: &I,
    geolocation: &G,
    geolocation_enabled: bool,
) -> Result<OriginOutcome, DirectionsError>
where
    I: IndoorServices,
    G: Geolocation,
{
    if let Some(endpoint) = current {
        return Ok(OriginOutcome {
            endpoint: Some(endpoint.clone()),
            notice: None,
        });
    }

    if let Some(id) = &params.origin_id {
        let endpoint = resolve_destination(id, indoor).await?;
        return Ok(OriginOutcome {
            endpoint: Some(endpoint),
            notice: None,
        });
    }

    if !geolocation_enabled {
        return Ok(OriginOutcome {
            endpoint: None,
            notice: None,
        });
    }

    match geolocation.current_position().await {
        Ok(position) => {
            debug!("Origin resolved from device position");
            Ok(OriginOutcome {
                endpoint: Some(Endpoint::LivePosition {
                    position,
                    floor: String::from("0"),
                }),
                notice: None,
            })
        }
        Err(e) => {
            warn!("Geolocation unavailable: {}", e);
            Ok(OriginOutcome {
                endpoint: None,
                notice: Some(DirectionsError::GeolocationUnavailable),
            })
        }
    }
}

/// Promotes a selected search candidate to a routable endpoint. External
/// places need a follow-up geocode; until it resolves the selection is not
/// usable for routing.
pub async fn resolve_candidate<P>(
    candidate: &Candidate,
    places: &P,
) -> Result<Endpoint, DirectionsError>
where
    P: PlaceAutocomplete,
{
    match candidate {
        Candidate::Indoor(location) => Endpoint::from_location(location)
            .ok_or_else(|| DirectionsError::EndpointNotFound(location.id.clone())),
        Candidate::Place(prediction) => match places.geocode(&prediction.place_id).await {
            Ok(position) => Ok(Endpoint::ExternalPlace {
                name: prediction.primary_text.clone(),
                subtitle: prediction.secondary_text.clone(),
                position,
            }),
            Err(e) => {
                warn!("Geocode failed for '{}': {}", prediction.place_id, e);
                Err(DirectionsError::GeocodeFailed(
                    prediction.primary_text.clone(),
                ))
            }
        },
    }
}
