use chrono::{DateTime, Utc};
use log::trace;
use ndarray::Array1;
use rayon::prelude::*;

use crate::error::FWIError;
use crate::models::input::{Input, InputElement};
use crate::modules::functions::haversine_distance;

use super::models::GeoSample;

/// Inverse Distance Weighting of wind, temperature, humidity and rainfall
/// at (`lat`, `lon`). A sample lying exactly on the target is returned unchanged.
pub fn interpolate(lat: f64, lon: f64, samples: &[GeoSample], power: f64) -> Result<GeoSample, FWIError> {
    if samples.is_empty() {
        return Err(FWIError::EmptyInput);
    }

    // exact match first, its distance would be zero
    if let Some(sample) = samples
        .iter()
        .find(|s| s.latitude == lat && s.longitude == lon)
    {
        trace!("exact match at ({}, {})", lat, lon);
        return Ok(*sample);
    }

    let mut wind_speed = 0.0;
    let mut temperature = 0.0;
    let mut humidity = 0.0;
    let mut rainfall = 0.0;
    let mut weights = 0.0;

    for sample in samples {
        let dist = haversine_distance(sample.latitude, sample.longitude, lat, lon);
        let weight = 1.0 / dist.powf(power);

        wind_speed += weight * sample.wind_speed;
        temperature += weight * sample.temperature;
        humidity += weight * sample.humidity;
        rainfall += weight * sample.rainfall;
        weights += weight;
    }

    if weights == 0.0 {
        return Err(FWIError::DegenerateWeights);
    }

    Ok(GeoSample {
        latitude: lat,
        longitude: lon,
        wind_speed: wind_speed / weights,
        temperature: temperature / weights,
        humidity: humidity / weights,
        rainfall: rainfall / weights,
    })
}

/// Interpolate the samples on every cell of a grid, building the input of a model step
pub fn interpolate_input(
    time: DateTime<Utc>,
    lats: &[f64],
    lons: &[f64],
    samples: &[GeoSample],
    power: f64,
) -> Result<Input, FWIError> {
    let data = lats
        .par_iter()
        .zip(lons.par_iter())
        .map(|(lat, lon)| interpolate(*lat, *lon, samples, power).map(|s| InputElement::from(&s)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Input {
        time,
        data: Array1::from_vec(data),
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn samples() -> Vec<GeoSample> {
        vec![
            GeoSample {
                latitude: 10.0,
                longitude: 105.0,
                wind_speed: 15.0,
                temperature: 30.0,
                humidity: 60.0,
                rainfall: 2.0,
            },
            GeoSample {
                latitude: 10.1,
                longitude: 105.1,
                wind_speed: 10.0,
                temperature: 32.0,
                humidity: 62.0,
                rainfall: 4.0,
            },
            GeoSample {
                latitude: 9.9,
                longitude: 104.9,
                wind_speed: 12.0,
                temperature: 29.0,
                humidity: 63.0,
                rainfall: 3.0,
            },
        ]
    }

    #[test]
    fn interpolation_stays_within_sample_range() {
        let result = interpolate(10.05, 105.05, &samples(), 2.0).expect("should interpolate");

        assert_eq!(result.latitude, 10.05);
        assert_eq!(result.longitude, 105.05);
        assert!((10.0..=15.0).contains(&result.wind_speed), "wind {}", result.wind_speed);
        assert!((29.0..=32.0).contains(&result.temperature), "temp {}", result.temperature);
        assert!((60.0..=63.0).contains(&result.humidity), "humidity {}", result.humidity);
        assert!((2.0..=4.0).contains(&result.rainfall), "rain {}", result.rainfall);
    }

    #[test]
    fn exact_match_returns_sample() {
        let points = samples();
        let result = interpolate(10.0, 105.0, &points, 2.0).expect("should match");
        assert_eq!(result, points[0]);

        let result = interpolate(10.0, 105.0, &points[..1], 2.0).expect("should match");
        assert_eq!(result, points[0]);
    }

    #[test]
    fn empty_samples_fail() {
        assert_eq!(interpolate(10.0, 105.0, &[], 2.0), Err(FWIError::EmptyInput));
    }

    #[test]
    fn vanishing_weights_are_degenerate() {
        // every distance is several km, so distance^power overflows and weights are 0
        let result = interpolate(10.05, 105.05, &samples(), 1e4);
        assert_eq!(result, Err(FWIError::DegenerateWeights));
    }

    #[test]
    fn antipodal_sample_gets_finite_weight() {
        let antipode = GeoSample {
            latitude: 50.06,
            longitude: -97.27,
            ..samples()[0]
        };
        let nearby = GeoSample {
            latitude: -50.0,
            longitude: 82.7,
            ..samples()[1]
        };
        let result = interpolate(-50.06, 82.73, &[antipode, nearby], 2.0).expect("should interpolate");
        assert!(result.wind_speed.is_finite());
        assert!((10.0..=15.0).contains(&result.wind_speed));
        assert!((30.0..=32.0).contains(&result.temperature));
        assert!((2.0..=4.0).contains(&result.rainfall));
    }

    #[test]
    fn equidistant_samples_are_averaged() {
        let mut points = samples();
        points[1].latitude = 10.0;
        points[1].longitude = 105.2;
        let result = interpolate(10.0, 105.1, &points[..2], 2.0).expect("should interpolate");
        assert!((result.temperature - 31.0).abs() < 1e-6);
        assert!((result.rainfall - 3.0).abs() < 1e-6);
    }

    #[test]
    fn grid_input_from_samples() {
        let time = Utc.with_ymd_and_hms(2024, 4, 14, 12, 0, 0).unwrap();
        let input = interpolate_input(time, &[10.0, 10.05], &[105.0, 105.05], &samples(), 2.0)
            .expect("should interpolate");

        assert_eq!(input.time, time);
        assert_eq!(input.data.len(), 2);
        assert_eq!(input.data[0].temperature, 30.0);
        assert_eq!(input.data[0].rain, 2.0);
        assert!(input.data[1].is_complete());

        let err = interpolate_input(time, &[10.0], &[105.0], &[], 2.0);
        assert!(matches!(err, Err(FWIError::EmptyInput)));
    }
}
