use std::fmt::{Display, Formatter};

/// Errors raised by the fire weather and interpolation functions.
#[derive(Debug, Clone, PartialEq)]
pub enum FWIError {
    /// month outside 1..=12
    InvalidMonth(u32),
    /// latitude outside every day-length band
    InvalidLatitude(f64),
    /// no samples given to the interpolator
    EmptyInput,
    /// inverse-distance weights summed to zero
    DegenerateWeights,
}

impl std::error::Error for FWIError {}

impl Display for FWIError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            FWIError::InvalidMonth(month) => write!(f, "invalid month: {month}"),
            FWIError::InvalidLatitude(lat) => write!(f, "invalid latitude: {lat}"),
            FWIError::EmptyInput => write!(f, "no data points provided"),
            FWIError::DegenerateWeights => write!(f, "sum of weights is zero"),
        }
    }
}
