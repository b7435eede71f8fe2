use serde::Serialize;

use crate::{
    ProbeError,
    solver::{SolverConfig, secant},
};

/// Angles to slew an altazimuth calibration mount to, in degrees.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MountAngles {
    pub azimuth: f64,
    pub elevation: f64,
}

/// Sideslip (radians) seen by a probe on a mount at azimuth `u` and
/// elevation `v` (radians). Only valid for `u`, `v` in [0, 90) degrees.
pub fn mount_beta(u: f64, v: f64) -> f64 {
    let cos_u = libm::cos(u);
    let cos_v = libm::cos(v);
    let c = cos_u * cos_v / libm::sqrt(1.0 + cos_u * cos_u * (cos_v * cos_v - 1.0));
    libm::acos(c.clamp(-1.0, 1.0))
}

/// Mount angles that put the probe at the commanded `alpha`, `beta` (degrees).
///
/// On an altazimuth mount, elevation equals angle of attack over the range we
/// care about, but azimuth and sideslip differ once the probe is pitched, so
/// the azimuth is found by root finding on `mount_beta`.
pub fn alpha_beta_to_az_el(
    alpha: f64,
    beta: f64,
    config: &SolverConfig,
) -> Result<MountAngles, ProbeError> {
    let v = libm::fabs(alpha).to_radians();
    let target_beta = libm::fabs(beta).to_radians();

    let u = if target_beta == 0.0 {
        0.0
    } else {
        secant(
            |u| mount_beta(u, v) - target_beta,
            target_beta,
            target_beta + 0.1,
            config,
        )?
    };

    Ok(MountAngles {
        azimuth: libm::copysign(u.to_degrees(), beta),
        elevation: libm::copysign(v.to_degrees(), alpha),
    })
}
