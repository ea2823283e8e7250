pub mod functions;
pub mod fwi;
pub mod idw;
