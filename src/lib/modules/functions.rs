use std::f64::consts::PI;

/// mean Earth radius [km]
pub const EARTH_RADIUS: f64 = 6371.0;

pub fn degrees_to_radians(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Great-circle distance [km] between two points given in degrees,
/// computed with the haversine formula on a spherical Earth
pub fn haversine_distance(
    lat1: f64,  // latitude of the first point [°]
    lon1: f64,  // longitude of the first point [°]
    lat2: f64,  // latitude of the second point [°]
    lon2: f64,  // longitude of the second point [°]
) -> f64 {
    let d_lat = degrees_to_radians(lat2 - lat1);
    let d_lon = degrees_to_radians(lon2 - lon1);

    let a = (d_lat / 2.0).sin().powi(2)
        + degrees_to_radians(lat1).cos()
            * degrees_to_radians(lat2).cos()
            * (d_lon / 2.0).sin().powi(2);
    // rounding can push antipodal points slightly above 1
    let a = a.min(1.0);

    let c = 2.0 * f64::atan2(a.sqrt(), (1.0 - a).sqrt());
    EARTH_RADIUS * c
}
