use core::f64::consts::FRAC_PI_2;

/// 9/4, from ideal potential flow around a sphere
pub const SPHERE_PRESSURE_FACTOR: f64 = 9.0 / 4.0;

/// Pressure coefficient on the surface of a sphere at `angle` (radians) from
/// the stagnation point, as a fraction of dynamic pressure.
///
/// Ranges from 1.0 at the stagnation point to -1.25 at 90 degrees.
pub fn pressure_coefficient(angle: f64) -> f64 {
    let c = libm::cos(angle - FRAC_PI_2);
    1.0 - SPHERE_PRESSURE_FACTOR * c * c
}

/// Pressure coefficient at the point offset by (`alpha`, `beta`) from the
/// stagnation point.
///
/// The two angles are treated as cartesian offsets and combined with the
/// distance formula. This is only a small-angle approximation of the true
/// great-circle distance on the sphere, good enough for the +-25 degree range
/// the probe is used over.
pub fn pressure_coefficient_cartesian(alpha: f64, beta: f64) -> f64 {
    pressure_coefficient(libm::sqrt(alpha * alpha + beta * beta))
}
