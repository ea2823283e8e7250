use serde_derive::{Deserialize, Serialize};

use crate::models::input::InputElement;

/// A weather observation at a location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoSample {
    /// latitude [°]
    pub latitude: f64,
    /// longitude [°]
    pub longitude: f64,
    /// wind speed [km/h]
    pub wind_speed: f64,
    /// air temperature [°C]
    pub temperature: f64,
    /// relative humidity [%]
    pub humidity: f64,
    /// rainfall [mm]
    pub rainfall: f64,
}

impl From<&GeoSample> for InputElement {
    fn from(sample: &GeoSample) -> Self {
        InputElement {
            temperature: sample.temperature,
            rain: sample.rainfall,
            wind_speed: sample.wind_speed,
            humidity: sample.humidity,
        }
    }
}
