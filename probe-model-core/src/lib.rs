// only use std when feature = "std" is enabled or during testing
#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod fmt;

mod error;
mod fixture;
mod forward_model;
mod geometry;
mod inverter;
mod pressure;
mod solver;
mod utils;
mod welford;

#[cfg(feature = "std")]
mod calibration;
#[cfg(feature = "std")]
mod comparison;

pub use error::ProbeError;
pub use fixture::{MountAngles, alpha_beta_to_az_el, mount_beta};
pub use forward_model::{FlowState, ForwardModel, RawPressures, TapPressures, predict};
pub use geometry::{ProbeGeometry, Tap, TapPosition};
pub use inverter::{Inverter, invert};
pub use pressure::{SPHERE_PRESSURE_FACTOR, pressure_coefficient, pressure_coefficient_cartesian};
pub use solver::{Solution2, SolverConfig, newton_2d, secant};
pub use utils::{
    AirConstants, air_density, airspeed_from_dynamic_pressure, dynamic_pressure, mph_to_mps,
};
pub use welford::Welford;

#[cfg(feature = "std")]
pub use calibration::{
    AngleGrid, CalibrationFailure, CalibrationGrid, CalibrationPoint, CalibrationSurface,
    PressurePoint, calibration_surface, pressure_surface,
};
#[cfg(feature = "std")]
pub use comparison::{
    AttitudeAverage, Component, TheoryComparison, TunnelSample, best_fit_scaling, compare,
    reduce_by_attitude, scaling_error, scaling_sweep,
};

#[cfg(test)]
mod tests;
