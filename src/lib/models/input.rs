use chrono::{DateTime, Utc};
use ndarray::Array1;

use crate::constants::NODATAVAL;

/// InputElement holds one cell's daily weather, usually noon observations
/// or the result of interpolating station data onto the cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputElement {
    /// air temperature [°C]
    pub temperature: f64,
    /// 24h cumulated rain [mm]
    pub rain: f64,
    /// wind speed [km/h]
    pub wind_speed: f64,
    /// relative humidity [%]
    pub humidity: f64,
}

impl Default for InputElement {
    fn default() -> Self {
        Self {
            temperature: NODATAVAL,
            rain: NODATAVAL,
            wind_speed: NODATAVAL,
            humidity: NODATAVAL,
        }
    }
}

impl InputElement {
    /// true when every weather variable is available
    pub fn is_complete(&self) -> bool {
        self.temperature != NODATAVAL
            && self.rain != NODATAVAL
            && self.wind_speed != NODATAVAL
            && self.humidity != NODATAVAL
    }
}

pub struct Input {
    pub time: DateTime<Utc>,
    pub data: Array1<InputElement>,
}
