use chrono::prelude::*;
use log::warn;
use ndarray::{Array1, Zip};
use serde_derive::{Deserialize, Serialize};

use crate::models::{input::Input, output::Output};

use super::{
    config::FWIModelConfig,
    constants::*,
    functions::{get_output_fn, update_state_fn},
};

/// One day of weather at a location, observed at local noon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyWeather {
    /// air temperature [°C]
    pub temperature: f64,
    /// relative humidity [%], values above 100 are clamped
    pub humidity: f64,
    /// wind speed [km/h]
    pub wind_speed: f64,
    /// 24h cumulated rain [mm]
    pub rain: f64,
}

/// The three moisture codes carried from one day to the next.
/// The model keeps no memory: yesterday's codes must be handed back in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoistureCodes {
    pub ffmc: f64,
    pub dmc: f64,
    pub dc: f64,
}

impl Default for MoistureCodes {
    fn default() -> Self {
        MoistureCodes {
            ffmc: FFMC_INIT,
            dmc: DMC_INIT,
            dc: DC_INIT,
        }
    }
}

/// All the indices of one day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FWIIndices {
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
}

impl FWIIndices {
    /// codes to be used as the previous state of the next day
    pub fn codes(&self) -> MoistureCodes {
        MoistureCodes {
            ffmc: self.ffmc,
            dmc: self.dmc,
            dc: self.dc,
        }
    }
}

// CELLS PROPERTIES
#[derive(Debug)]
pub struct FWIPropertiesElement {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug)]
pub struct FWIProperties {
    pub data: Array1<FWIPropertiesElement>,
    pub len: usize,
}

pub struct FWICellPropertiesContainer {
    pub lons: Vec<f64>,
    pub lats: Vec<f64>,
}

impl FWIProperties {
    pub fn new(props: FWICellPropertiesContainer) -> Self {
        let data: Array1<FWIPropertiesElement> = props
            .lons
            .into_iter()
            .zip(props.lats)
            .map(|(lon, lat)| FWIPropertiesElement { lon, lat })
            .collect();

        let len = data.len();
        Self { data, len }
    }

    pub fn get_coords(&self) -> (Vec<f64>, Vec<f64>) {
        let lats: Vec<f64> = self.data.iter().map(|p| p.lat).collect();
        let lons: Vec<f64> = self.data.iter().map(|p| p.lon).collect();
        (lats, lons)
    }
}

// STATE
#[derive(Debug)]
pub struct FWIState {
    pub time: DateTime<Utc>,
    pub data: Array1<MoistureCodes>,
    /// cells whose last update failed, their indices are not reliable
    failed: Array1<bool>,
    config: FWIModelConfig,
}

impl FWIState {
    /// Create a new state from the codes of the previous day.
    pub fn new(warm_state: &[MoistureCodes], time: &DateTime<Utc>, config: FWIModelConfig) -> FWIState {
        FWIState {
            time: *time,
            data: Array1::from_vec(warm_state.to_vec()),
            failed: Array1::from_elem(warm_state.len(), false),
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn update_state(&mut self, props: &FWIProperties, input: &Input) {
        let time = &self.time;
        let config = &self.config;
        self.failed = Zip::from(&mut self.data)
            .and(&props.data)
            .and(&input.data)
            .par_map_collect(|state, props, input_data| {
                update_state_fn(state, props, input_data, time, config).is_err()
            });

        let n_failed = self.failed.iter().filter(|failed| **failed).count();
        if n_failed > 0 {
            warn!(
                "{} cells kept the previous state at {}: day length lookup failed",
                n_failed,
                time.format("%Y-%m-%d")
            );
        }
    }

    /// Update the state of the cells with one day of weather
    pub fn update(&mut self, props: &FWIProperties, input: &Input) {
        self.time = input.time;
        self.update_state(props, input);
    }

    pub fn output(&self, input: &Input) -> Output {
        let output_data = Zip::from(&self.data)
            .and(&self.failed)
            .and(&input.data)
            .par_map_collect(|state, failed, input| {
                get_output_fn(state, input, !*failed, &self.config)
            });

        Output::new(self.time, output_data)
    }

    /// Codes to be stored by the caller and passed to [`FWIState::new`] on the next run
    pub fn warm_state(&self) -> Vec<MoistureCodes> {
        self.data.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use crate::constants::NODATAVAL;
    use crate::models::input::InputElement;
    use crate::models::output::OutputVariableName;

    use super::*;

    fn properties(lats: Vec<f64>) -> FWIProperties {
        let lons = vec![8.0; lats.len()];
        FWIProperties::new(FWICellPropertiesContainer { lons, lats })
    }

    fn day_14() -> InputElement {
        InputElement {
            temperature: 20.0,
            rain: 2.4,
            wind_speed: 25.0,
            humidity: 21.0,
        }
    }

    fn april(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn grid_update_matches_single_point() {
        let props = properties(vec![45.98, 45.98]);
        let mut state = FWIState::new(&[MoistureCodes::default(); 2], &april(13), FWIModelConfig::default());
        let input = Input {
            time: april(14),
            data: array![day_14(), day_14()],
        };
        state.update(&props, &input);
        assert_eq!(state.time, april(14));

        let output = state.output(&input);
        for fwi in output.get(&OutputVariableName::fwi) {
            assert_abs_diff_eq!(fwi, 8.0247, epsilon = 5e-5);
        }
        for dc in output.get(&OutputVariableName::dc) {
            assert_abs_diff_eq!(dc, 19.554, epsilon = 5e-5);
        }
    }

    #[test]
    fn missing_weather_keeps_state() {
        let props = properties(vec![45.98, 45.98]);
        let mut state = FWIState::new(&[MoistureCodes::default(); 2], &april(13), FWIModelConfig::default());
        let input = Input {
            time: april(14),
            data: array![day_14(), InputElement { rain: NODATAVAL, ..day_14() }],
        };
        state.update(&props, &input);
        assert_eq!(state.data[1], MoistureCodes::default());
        assert_ne!(state.data[0], MoistureCodes::default());

        let output = state.output(&input);
        assert_eq!(output.data[1].fwi, NODATAVAL);
        assert_eq!(output.data[1].isi, NODATAVAL);
        assert_eq!(output.data[1].ffmc, FFMC_INIT);
    }

    #[test]
    fn invalid_latitude_keeps_state_when_strict() {
        let props = properties(vec![45.98, 95.0]);
        let mut state = FWIState::new(&[MoistureCodes::default(); 2], &april(13), FWIModelConfig::default());
        let input = Input {
            time: april(14),
            data: array![day_14(), day_14()],
        };
        state.update(&props, &input);
        assert_eq!(state.data[1], MoistureCodes::default());

        let output = state.output(&input);
        assert_abs_diff_eq!(output.data[0].fwi, 8.0247, epsilon = 5e-5);
        assert_eq!(output.data[1].isi, NODATAVAL);
        assert_eq!(output.data[1].bui, NODATAVAL);
        assert_eq!(output.data[1].fwi, NODATAVAL);
        // codes and inputs are still reported
        assert_eq!(output.data[1].ffmc, FFMC_INIT);
        assert_eq!(output.data[1].temperature, 20.0);

        // a successful day clears the flag
        state.update(&properties(vec![45.98, 45.98]), &input);
        let output = state.output(&input);
        assert_ne!(output.data[1].fwi, NODATAVAL);

        let mut legacy = FWIState::new(&[MoistureCodes::default(); 2], &april(13), FWIModelConfig::new("legacy"));
        legacy.update(&props, &input);
        assert_ne!(legacy.data[1], MoistureCodes::default());
    }

    #[test]
    fn warm_state_survives_serialization() {
        let props = properties(vec![45.98]);
        let mut state = FWIState::new(&[MoistureCodes::default()], &april(13), FWIModelConfig::default());
        let input = Input {
            time: april(14),
            data: array![day_14()],
        };
        state.update(&props, &input);

        let json = serde_json::to_string(&state.warm_state()).expect("should serialize");
        let warm: Vec<MoistureCodes> = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(warm, state.warm_state());

        let restored = FWIState::new(&warm, &april(14), FWIModelConfig::default());
        assert_eq!(restored.len(), 1);
        assert!(!restored.is_empty());
    }

    #[test]
    fn coords_follow_cell_order() {
        let props = FWIProperties::new(FWICellPropertiesContainer {
            lons: vec![7.0, 8.0],
            lats: vec![44.0, 45.0],
        });
        assert_eq!(props.len, 2);
        assert_eq!(props.get_coords(), (vec![44.0, 45.0], vec![7.0, 8.0]));
    }
}
