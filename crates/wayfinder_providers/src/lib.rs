pub mod capabilities;
pub mod error;
pub mod location;
pub mod places_http;
pub mod raw;
