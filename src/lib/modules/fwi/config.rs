use std::str::FromStr;

use strum_macros::{Display, EnumString};

use crate::error::FWIError;

use super::functions::{
    compute_bui, compute_fwi, compute_indices, compute_isi, update_dc, update_dmc,
    update_dmc_legacy, update_ffmc,
};
use super::models::{DailyWeather, FWIIndices, MoistureCodes};

type FfmcFn = fn(f64, f64, f64, f64, f64) -> f64;
type DmcFn = fn(f64, f64, f64, f64, f64, u32) -> Result<f64, FWIError>;
type DcFn = fn(f64, f64, f64, f64, u32) -> Result<f64, FWIError>;
type IndexFn = fn(f64, f64) -> f64;

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, EnumString, Display)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum ModelVersion {
    /// day length lookup errors are returned to the caller
    #[default]
    Strict,
    /// day length lookup errors count as no daylight
    Legacy,
}

/// configuration structure for model config
/// can be used to store functions and constants
#[derive(Debug)]
pub struct FWIModelConfig {
    pub model_version: ModelVersion,

    ffmc_fn: FfmcFn,
    dmc_fn: DmcFn,
    dc_fn: DcFn,
    isi_fn: IndexFn,
    bui_fn: IndexFn,
    fwi_fn: IndexFn,
}

impl Default for FWIModelConfig {
    fn default() -> Self {
        FWIModelConfig::from_version(ModelVersion::default())
    }
}

impl FWIModelConfig {
    /// Unknown versions fall back to the default one
    pub fn new(model_version_str: &str) -> Self {
        let model_version = ModelVersion::from_str(model_version_str).unwrap_or_else(|_| {
            log::warn!("Unknown model version {}, using {}", model_version_str, ModelVersion::default());
            ModelVersion::default()
        });
        log::info!("Model version: {}", model_version);
        FWIModelConfig::from_version(model_version)
    }

    pub fn from_version(model_version: ModelVersion) -> Self {
        let dmc_fn: DmcFn = match model_version {
            ModelVersion::Strict => update_dmc,
            ModelVersion::Legacy => update_dmc_legacy,
        };

        FWIModelConfig {
            model_version,
            ffmc_fn: update_ffmc,
            dmc_fn,
            dc_fn: update_dc,
            isi_fn: compute_isi,
            bui_fn: compute_bui,
            fwi_fn: compute_fwi,
        }
    }

    pub fn ffmc(&self, ffmc: f64, rain: f64, humidity: f64, temperature: f64, wind_speed: f64) -> f64 {
        (self.ffmc_fn)(ffmc, rain, humidity, temperature, wind_speed)
    }

    pub fn dmc(
        &self,
        dmc: f64,
        rain: f64,
        temperature: f64,
        humidity: f64,
        latitude: f64,
        month: u32,
    ) -> Result<f64, FWIError> {
        (self.dmc_fn)(dmc, rain, temperature, humidity, latitude, month)
    }

    pub fn dc(&self, dc: f64, rain: f64, temperature: f64, latitude: f64, month: u32) -> Result<f64, FWIError> {
        (self.dc_fn)(dc, rain, temperature, latitude, month)
    }

    pub fn isi(&self, ffmc: f64, wind_speed: f64) -> f64 {
        (self.isi_fn)(ffmc, wind_speed)
    }

    pub fn bui(&self, dmc: f64, dc: f64) -> f64 {
        (self.bui_fn)(dmc, dc)
    }

    pub fn fwi(&self, isi: f64, bui: f64) -> f64 {
        (self.fwi_fn)(isi, bui)
    }

    /// One day of the model with this configuration
    pub fn calc_fwi(
        &self,
        month: u32,
        weather: &DailyWeather,
        previous: &MoistureCodes,
        latitude: f64,
    ) -> Result<FWIIndices, FWIError> {
        compute_indices(self, month, weather, previous, latitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_model_version() {
        assert_eq!(FWIModelConfig::new("legacy").model_version, ModelVersion::Legacy);
        assert_eq!(FWIModelConfig::new("LEGACY").model_version, ModelVersion::Legacy);
        assert_eq!(FWIModelConfig::new("strict").model_version, ModelVersion::Strict);
        assert_eq!(FWIModelConfig::new("v2023").model_version, ModelVersion::Strict);
        assert_eq!(ModelVersion::Legacy.to_string(), "legacy");
    }

    #[test]
    fn legacy_ignores_bad_latitude() {
        let weather = DailyWeather {
            temperature: 20.0,
            humidity: 21.0,
            wind_speed: 25.0,
            rain: 0.0,
        };
        let previous = MoistureCodes::default();

        let strict = FWIModelConfig::default().calc_fwi(4, &weather, &previous, 91.0);
        assert_eq!(strict, Err(FWIError::InvalidLatitude(91.0)));

        let legacy = FWIModelConfig::new("legacy")
            .calc_fwi(4, &weather, &previous, 91.0)
            .expect("legacy should not fail on latitude");
        // no daylight, no drying
        assert_eq!(legacy.dmc, previous.dmc);
    }
}
