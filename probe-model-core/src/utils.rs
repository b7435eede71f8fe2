use serde::{Deserialize, Serialize};

const ZERO_CELSIUS_IN_KELVIN: f64 = 273.15;
const METERS_PER_SECOND_PER_MPH: f64 = 0.44704;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirConstants {
    /// J/(kg K), dry air
    pub specific_gas_constant: f64,
}

impl Default for AirConstants {
    fn default() -> Self {
        Self {
            specific_gas_constant: 287.058,
        }
    }
}

/// returns air density (kg/m^3) from static pressure (Pa) and temperature (C),
/// ideal gas law
pub fn air_density(pressure: f64, temperature_c: f64, air: &AirConstants) -> f64 {
    pressure / (air.specific_gas_constant * (temperature_c + ZERO_CELSIUS_IN_KELVIN))
}

pub fn mph_to_mps(mph: f64) -> f64 {
    mph * METERS_PER_SECOND_PER_MPH
}

/// returns dynamic pressure (Pa) for the given static pressure (Pa),
/// temperature (C) and airspeed (mph)
pub fn dynamic_pressure(pressure: f64, temperature_c: f64, mph: f64, air: &AirConstants) -> f64 {
    let v = mph_to_mps(mph);
    0.5 * air_density(pressure, temperature_c, air) * v * v
}

/// returns true airspeed (m/s) from dynamic pressure (Pa) and density (kg/m^3)
pub fn airspeed_from_dynamic_pressure(q: f64, density: f64) -> f64 {
    if q <= 0.0 || density <= 0.0 {
        return 0.0;
    }
    libm::sqrt(2.0 * q / density)
}
