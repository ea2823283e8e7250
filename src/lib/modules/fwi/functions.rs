use chrono::{DateTime, Datelike, Utc};
use log::warn;

use crate::error::FWIError;
use crate::models::input::InputElement;
use crate::models::output::OutputElement;

use super::{
    config::FWIModelConfig,
    constants::*,
    models::{DailyWeather, FWIIndices, FWIPropertiesElement, MoistureCodes},
};

// FFMC MODULE
pub fn from_ffmc_to_moisture(ffmc: f64) -> f64 {
    FFMC_S1 * (101.0 - ffmc) / (FFMC_S2 + ffmc)
}

pub fn from_moisture_to_ffmc(moisture: f64) -> f64 {
    FFMC_S2 * ((FFMC_MAX_MOISTURE - moisture) / (FFMC_S1 + moisture))
}

pub fn moisture_rain_effect(moisture: f64, rain: f64) -> f64 {
    let rain_eff: f64 = rain - FFMC_MIN_RAIN;
    let mut moisture_new: f64 = moisture
        + FFMC_R1
            * rain_eff
            * f64::exp(-100.0 / (251.0 - moisture))
            * (1.0 - f64::exp(-FFMC_R2 / rain_eff));
    // sovra-saturation conditions
    if moisture > FFMC_NORMAL_COND {
        moisture_new += FFMC_R3 * (moisture - FFMC_NORMAL_COND).powi(2) * rain_eff.sqrt();
    }
    f64::min(FFMC_MAX_MOISTURE, moisture_new)
}

/// Daily update of the fine fuel moisture content (moisture scale, not ffmc scale)
pub fn update_moisture(moisture: f64, rain: f64, hum: f64, temp: f64, w_speed: f64) -> f64 {
    let hum = f64::min(hum, 100.0);
    let mut moisture_new: f64 = moisture;
    if rain > FFMC_MIN_RAIN {
        moisture_new = moisture_rain_effect(moisture, rain);
    }
    let hum_term: f64 = FFMC_A4 * (21.1 - temp) * (1.0 - f64::exp(-FFMC_A5 * hum));
    let emc_dry: f64 =
        FFMC_A1D * hum.powf(FFMC_A2D) + FFMC_A3D * f64::exp((hum - 100.0) / 10.0) + hum_term;
    let emc_wet: f64 =
        FFMC_A1W * hum.powf(FFMC_A2W) + FFMC_A3W * f64::exp((hum - 100.0) / 10.0) + hum_term;

    if moisture_new > emc_dry {
        // drying process
        let k0_dry: f64 = FFMC_B1 * (1.0 - (hum / 100.0).powf(FFMC_B2))
            + FFMC_B3 * w_speed.sqrt() * (1.0 - (hum / 100.0).powf(FFMC_B5));
        let k_dry: f64 = FFMC_B6 * k0_dry * f64::exp(FFMC_B7 * temp);
        moisture_new = emc_dry + (moisture_new - emc_dry) * f64::powf(10.0, -k_dry);
    } else if moisture_new < emc_wet {
        // wetting process
        let k0_wet: f64 = FFMC_B1 * (1.0 - ((100.0 - hum) / 100.0).powf(FFMC_B2))
            + FFMC_B3 * w_speed.sqrt() * (1.0 - ((100.0 - hum) / 100.0).powf(FFMC_B5));
        let k_wet: f64 = FFMC_B6 * k0_wet * f64::exp(FFMC_B7 * temp);
        moisture_new = emc_wet + (moisture_new - emc_wet) * f64::powf(10.0, -k_wet);
    }
    moisture_new
}

/// Fine Fuel Moisture Code of today given yesterday's value
pub fn update_ffmc(ffmc: f64, rain: f64, hum: f64, temp: f64, w_speed: f64) -> f64 {
    let moisture = from_ffmc_to_moisture(ffmc);
    from_moisture_to_ffmc(update_moisture(moisture, rain, hum, temp, w_speed))
}

// SEASONAL TABLES
fn month_index(month: u32) -> Result<usize, FWIError> {
    match month {
        1..=12 => Ok(month as usize - 1),
        _ => Err(FWIError::InvalidMonth(month)),
    }
}

/// Effective day length [h] used by the duff moisture code.
/// Bands are (33, 90], (0, 33], (-30, 0] and [-90, -30].
pub fn day_length(latitude: f64, month: u32) -> Result<f64, FWIError> {
    let idx = month_index(month)?;
    let table = if latitude > 33.0 && latitude <= 90.0 {
        &DAY_LENGTH_NORTH
    } else if latitude > 0.0 && latitude <= 33.0 {
        &DAY_LENGTH_NORTH_TROPICAL
    } else if latitude > -30.0 && latitude <= 0.0 {
        &DAY_LENGTH_SOUTH_TROPICAL
    } else if (-90.0..=-30.0).contains(&latitude) {
        &DAY_LENGTH_SOUTH
    } else {
        return Err(FWIError::InvalidLatitude(latitude));
    };
    Ok(table[idx])
}

/// Same as [`day_length`], but a failed lookup counts as no daylight
pub fn day_length_or_zero(latitude: f64, month: u32) -> Result<f64, FWIError> {
    match day_length(latitude, month) {
        Ok(l_e) => Ok(l_e),
        Err(err) => {
            warn!("day length lookup failed ({err}), using 0");
            Ok(0.0)
        }
    }
}

/// Day length adjustment of the drought code, selected by hemisphere
pub fn drying_factor(latitude: f64, month: u32) -> Result<f64, FWIError> {
    let idx = month_index(month)?;
    if latitude > 0.0 {
        Ok(DRYING_FACTOR_NORTH[idx])
    } else {
        Ok(DRYING_FACTOR_SOUTH[idx])
    }
}

// DMC MODULE
pub fn dmc_rain_effect(dmc: f64, rain: f64) -> f64 {
    let re: f64 = DMC_R1 * rain - DMC_R2;
    let b: f64 = if dmc <= DMC_A1 {
        100.0 / (DMC_R3 + DMC_R4 * dmc)
    } else if dmc <= DMC_A2 {
        DMC_R5 - DMC_R6 * f64::ln(dmc)
    } else {
        DMC_R7 * f64::ln(dmc) - DMC_R8
    };
    let m0: f64 = DMC_R9 + f64::exp(DMC_R13 - dmc / DMC_R11);
    let mr: f64 = m0 + 1000.0 * (re / (DMC_R12 + b * re));
    let dmc_new: f64 = DMC_R10 - DMC_R11 * f64::ln(mr - DMC_R9);
    // clip to positive values
    if dmc_new > 0.0 {
        dmc_new
    } else {
        0.0
    }
}

fn update_dmc_with(
    dmc: f64,
    rain: f64,
    temp: f64,
    hum: f64,
    latitude: f64,
    month: u32,
    day_length_fn: fn(f64, u32) -> Result<f64, FWIError>,
) -> Result<f64, FWIError> {
    let hum = f64::min(hum, 100.0);
    let mut dmc_new: f64 = dmc;
    if rain > DMC_MIN_RAIN {
        dmc_new = dmc_rain_effect(dmc, rain);
    }
    if temp > DMC_MIN_TEMP {
        // temperature effect
        let l_e = day_length_fn(latitude, month)?;
        let k: f64 = DMC_T1 * (temp - DMC_MIN_TEMP) * (100.0 - hum) * l_e * 1e-6;
        dmc_new += 100.0 * k;
    }
    Ok(dmc_new)
}

/// Duff Moisture Code of today given yesterday's value.
/// The day length is looked up only when the drying term applies.
pub fn update_dmc(
    dmc: f64,
    rain: f64,
    temp: f64,
    hum: f64,
    latitude: f64,
    month: u32,
) -> Result<f64, FWIError> {
    update_dmc_with(dmc, rain, temp, hum, latitude, month, day_length)
}

/// Like [`update_dmc`] but an unknown latitude band or month contributes no drying
pub fn update_dmc_legacy(
    dmc: f64,
    rain: f64,
    temp: f64,
    hum: f64,
    latitude: f64,
    month: u32,
) -> Result<f64, FWIError> {
    update_dmc_with(dmc, rain, temp, hum, latitude, month, day_length_or_zero)
}

// DC MODULE
pub fn dc_rain_effect(dc: f64, rain: f64) -> f64 {
    let rd: f64 = DC_R1 * rain - DC_R2;
    let q0: f64 = DC_R3 * f64::exp(-dc / DC_R4);
    let qr: f64 = q0 + DC_R5 * rd;
    let dc_new: f64 = DC_R4 * f64::ln(DC_R3 / qr);
    if dc_new > 0.0 {
        dc_new
    } else {
        0.0
    }
}

/// Drought Code of today given yesterday's value
pub fn update_dc(dc: f64, rain: f64, temp: f64, latitude: f64, month: u32) -> Result<f64, FWIError> {
    let l_f = drying_factor(latitude, month)?;
    let mut dc_new = dc;
    if rain > DC_MIN_RAIN {
        dc_new = dc_rain_effect(dc, rain);
    }
    let v: f64 = if temp <= DC_MIN_TEMP {
        l_f
    } else {
        DC_T1 * (temp - DC_MIN_TEMP) + l_f
    };
    Ok(dc_new + DC_T3 * f64::max(v, 0.0))
}

// ISI MODULE
pub fn compute_isi(ffmc: f64, w_speed: f64) -> f64 {
    let moisture: f64 = from_ffmc_to_moisture(ffmc);
    let fw: f64 = f64::exp(ISI_A0 * w_speed);
    let ff: f64 =
        ISI_A1 * f64::exp(ISI_A2 * moisture) * (1.0 + moisture.powf(ISI_A3) / ISI_A4);
    ISI_A5 * fw * ff
}

// BUI MODULE
pub fn compute_bui(dmc: f64, dc: f64) -> f64 {
    if dmc == 0.0 && dc == 0.0 {
        0.0
    } else if dmc <= BUI_A1 * dc {
        BUI_A2 * ((dmc * dc) / (dmc + BUI_A1 * dc))
    } else {
        dmc - (1.0 - BUI_A2 * (dc / (dmc + BUI_A1 * dc))) * (BUI_A3 + (BUI_A4 * dmc).powf(BUI_A5))
    }
}

// FWI MODULE
pub fn compute_fwi(isi: f64, bui: f64) -> f64 {
    let fd: f64 = if bui <= FWI_BUI_LIMIT {
        FWI_A1 * bui.powf(FWI_A2) + FWI_A3
    } else {
        1000.0 / (FWI_A4 + FWI_A5 * f64::exp(FWI_A6 * bui))
    };
    let b: f64 = 0.1 * isi * fd;
    if b > 1.0 {
        f64::exp(FWI_A7 * (FWI_A8 * f64::ln(b)).powf(FWI_A9))
    } else {
        b
    }
}

/// Chain all the sub-indices for one day of weather
pub fn compute_indices(
    config: &FWIModelConfig,
    month: u32,
    weather: &DailyWeather,
    previous: &MoistureCodes,
    latitude: f64,
) -> Result<FWIIndices, FWIError> {
    let DailyWeather {
        temperature,
        humidity,
        wind_speed,
        rain,
    } = *weather;

    let ffmc = config.ffmc(previous.ffmc, rain, humidity, temperature, wind_speed);
    let dmc = config.dmc(previous.dmc, rain, temperature, humidity, latitude, month)?;
    let dc = config.dc(previous.dc, rain, temperature, latitude, month)?;
    let isi = config.isi(ffmc, wind_speed);
    let bui = config.bui(dmc, dc);
    let fwi = config.fwi(isi, bui);

    Ok(FWIIndices {
        ffmc,
        dmc,
        dc,
        isi,
        bui,
        fwi,
    })
}

/// Fire weather indices of one day, propagating any lookup error.
/// The returned codes are tomorrow's `previous`.
pub fn calc_fwi(
    month: u32,
    weather: &DailyWeather,
    previous: &MoistureCodes,
    latitude: f64,
) -> Result<FWIIndices, FWIError> {
    compute_indices(&FWIModelConfig::default(), month, weather, previous, latitude)
}

// UPDATE STATES
/// Advance the moisture codes of one cell. Cells with missing weather are left untouched.
pub fn update_state_fn(
    state: &mut MoistureCodes,
    props: &FWIPropertiesElement,
    input: &InputElement,
    time: &DateTime<Utc>,
    config: &FWIModelConfig,
) -> Result<(), FWIError> {
    if !input.is_complete() {
        // keep current state if we don't have all the data
        return Ok(());
    }
    let month = time.month();

    let ffmc = config.ffmc(state.ffmc, input.rain, input.humidity, input.temperature, input.wind_speed);
    let dmc = config.dmc(state.dmc, input.rain, input.temperature, input.humidity, props.lat, month)?;
    let dc = config.dc(state.dc, input.rain, input.temperature, props.lat, month)?;

    *state = MoistureCodes { ffmc, dmc, dc };
    Ok(())
}

// COMPUTE OUTPUTS
/// Indices of one cell. `updated` is false when the last update of the cell failed:
/// its codes are yesterday's and the derived indices are reported as missing.
pub fn get_output_fn(
    state: &MoistureCodes,
    input: &InputElement,
    updated: bool,
    config: &FWIModelConfig,
) -> OutputElement {
    let mut output = OutputElement {
        ffmc: state.ffmc,
        dmc: state.dmc,
        dc: state.dc,
        temperature: input.temperature,
        rain: input.rain,
        wind_speed: input.wind_speed,
        humidity: input.humidity,
        ..OutputElement::default()
    };
    if !updated {
        return output;
    }
    output.bui = config.bui(state.dmc, state.dc);
    if input.is_complete() {
        output.isi = config.isi(state.ffmc, input.wind_speed);
        output.fwi = config.fwi(output.isi, output.bui);
    }
    output
}
