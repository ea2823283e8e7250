pub mod functions;
pub mod models;

pub use functions::{interpolate, interpolate_input};
pub use models::GeoSample;
