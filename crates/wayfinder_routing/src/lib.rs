pub mod animation;
pub mod format;
pub mod geopoint;
pub mod route;
