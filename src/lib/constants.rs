/// Sentinel for missing values in gridded inputs and outputs
pub const NODATAVAL: f64 = -9999.0;
