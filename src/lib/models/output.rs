use chrono::{DateTime, Utc};
use ndarray::Array1;
use rayon::prelude::*;
use serde_derive::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumProperty, EnumString};

use crate::constants::NODATAVAL;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputElement {
    /// Fine Fuel Moisture Code
    pub ffmc: f64,
    /// Duff Moisture Code
    pub dmc: f64,
    /// Drought Code
    pub dc: f64,
    /// Initial Spread Index
    pub isi: f64,
    /// Build Up Index
    pub bui: f64,
    /// Fire Weather Index
    pub fwi: f64,

    // ----------------- INPUTS ---------------//
    /// Input temperature in celsius
    pub temperature: f64,
    /// Input rain in mm
    pub rain: f64,
    /// Input wind speed in km/h
    pub wind_speed: f64,
    /// Input relative humidity in %
    pub humidity: f64,
}

impl Default for OutputElement {
    fn default() -> Self {
        Self {
            ffmc: NODATAVAL,
            dmc: NODATAVAL,
            dc: NODATAVAL,
            isi: NODATAVAL,
            bui: NODATAVAL,
            fwi: NODATAVAL,

            temperature: NODATAVAL,
            rain: NODATAVAL,
            wind_speed: NODATAVAL,
            humidity: NODATAVAL,
        }
    }
}

#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
#[derive(
    Debug,
    PartialEq,
    Eq,
    Hash,
    Copy,
    Clone,
    EnumString,
    EnumProperty,
    EnumIter,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum OutputVariableName {
    /// Fine Fuel Moisture Code
    #[strum(props(long_name = "Fine Fuel Moisture Code", units = "-"))]
    ffmc,
    /// Duff Moisture Code
    #[strum(props(long_name = "Duff Moisture Code", units = "-"))]
    dmc,
    /// Drought Code
    #[strum(props(long_name = "Drought Code", units = "-"))]
    dc,
    /// Initial Spread Index
    #[strum(props(long_name = "Initial Spread Index", units = "-"))]
    isi,
    /// Build Up Index
    #[strum(props(long_name = "Build Up Index", units = "-"))]
    bui,
    /// Fire Weather Index
    #[strum(props(long_name = "Fire Weather Index", units = "-"))]
    fwi,

    /// Input Temperature
    #[strum(props(long_name = "Input Temperature", units = "°C"))]
    temperature,
    /// Input Rain
    #[strum(props(long_name = "Input Rain", units = "mm"))]
    rain,
    /// Input Wind Speed
    #[strum(props(long_name = "Input Wind Speed", units = "km/h"))]
    windSpeed,
    /// Input Relative Humidity
    #[strum(props(long_name = "Input Relative Humidity", units = "%"))]
    humidity,
}

pub struct Output {
    pub time: DateTime<Utc>,
    pub data: Array1<OutputElement>,
}

impl Output {
    pub fn new(time: DateTime<Utc>, data: Array1<OutputElement>) -> Self {
        Self { time, data }
    }

    pub fn get_array(&self, func: fn(&OutputElement) -> f64) -> Array1<f64> {
        let vec = self.data.par_iter().map(func).collect::<Vec<_>>();
        Array1::from_vec(vec)
    }

    pub fn get(&self, variable: &OutputVariableName) -> Array1<f64> {
        use OutputVariableName::*;
        match variable {
            ffmc => self.get_array(|o| o.ffmc),
            dmc => self.get_array(|o| o.dmc),
            dc => self.get_array(|o| o.dc),
            isi => self.get_array(|o| o.isi),
            bui => self.get_array(|o| o.bui),
            fwi => self.get_array(|o| o.fwi),

            temperature => self.get_array(|o| o.temperature),
            rain => self.get_array(|o| o.rain),
            windSpeed => self.get_array(|o| o.wind_speed),
            humidity => self.get_array(|o| o.humidity),
        }
    }
}
