use thiserror::Error;

/// User-facing failure taxonomy of the directions flow. Every capability
/// failure is converted into one of these at the point of call.
#[derive(Debug, Error)]
pub enum DirectionsError {
    /// A referenced location id does not exist. Not retried.
    #[error("Location '{0}' could not be found")]
    EndpointNotFound(String),

    /// Route requested before both endpoints resolved. Non-fatal; shown as
    /// an inline hint and no directions call is issued.
    #[error("Both origin and destination are required")]
    IncompleteEndpoints,

    /// The directions call rejected or yielded no usable path. No retry.
    #[error("No route found")]
    NoRoute,

    /// A non-empty query matched nothing; shown inline near the field.
    #[error("No results match '{0}'")]
    NoMatchingResults(String),

    /// Device position could not be obtained; the user enters an explicit
    /// origin instead. Surfaced once per session.
    #[error("Your position is not available")]
    GeolocationUnavailable,

    /// Geocoding an external place selection failed; the selection is not
    /// promoted to an endpoint and the field stays unresolved.
    #[error("Could not geocode place '{0}'")]
    GeocodeFailed(String),
}
