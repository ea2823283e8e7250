pub mod config;
pub mod constants;
pub mod functions;
pub mod models;

pub use config::{FWIModelConfig, ModelVersion};
pub use functions::calc_fwi;
pub use models::{DailyWeather, FWIIndices, MoistureCodes};
