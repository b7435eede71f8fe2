//! Comparison of wind tunnel measurements against the potential flow model.
//!
//! Tunnel sessions command the probe fixture to a grid of (alpha, beta) angles
//! in degrees and log many samples at each one. The samples are normalised by
//! the tunnel dynamic pressure, averaged per attitude, and compared with the
//! model's prediction at unit q.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    forward_model::{RawPressures, predict},
    geometry::ProbeGeometry,
    utils::{AirConstants, dynamic_pressure},
    welford::Welford,
};

/// One logged row of a tunnel session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TunnelSample {
    /// tunnel airspeed setting
    pub mph: f64,
    /// commanded angle of attack, degrees
    pub alpha: f64,
    /// commanded sideslip, degrees
    pub beta: f64,
    pub seq: u64,
    /// static pressure, Pa
    pub baro: f64,
    /// outside air temperature, C
    pub oat: f64,
    pub dp0: f64,
    #[serde(rename = "dpA")]
    pub dp_a: f64,
    #[serde(rename = "dpB")]
    pub dp_b: f64,
}

impl TunnelSample {
    /// (dp0, dpA, dpB) / q, or None for rows that carry no usable reading
    pub fn coefficients(&self, air: &AirConstants) -> Option<Vector3<f64>> {
        // the logger writes dp0 = 0 when the sensor read failed
        if self.dp0 == 0.0 {
            return None;
        }
        let q = dynamic_pressure(self.baro, self.oat, self.mph, air);
        if !(q > 0.0) {
            return None;
        }
        Some(Vector3::new(self.dp0, self.dp_a, self.dp_b) / q)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Component {
    Dp0,
    DpA,
    DpB,
}

impl Component {
    pub const ALL: [Component; 3] = [Component::Dp0, Component::DpA, Component::DpB];

    pub fn of(self, raw: &RawPressures) -> f64 {
        match self {
            Component::Dp0 => raw.dp0,
            Component::DpA => raw.dp_a,
            Component::DpB => raw.dp_b,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Component::Dp0 => "dp0",
            Component::DpA => "dpA",
            Component::DpB => "dpB",
        }
    }

    /// cross-axis terms are zero on their axis in both data and theory, so
    /// those points say nothing about scaling
    fn is_informative(self, average: &AttitudeAverage) -> bool {
        match self {
            Component::Dp0 => true,
            Component::DpA => average.alpha != 0.0,
            Component::DpB => average.beta != 0.0,
        }
    }
}

/// Mean pressure coefficients for one commanded attitude.
#[derive(Debug, Clone, PartialEq)]
pub struct AttitudeAverage {
    /// degrees
    pub alpha: f64,
    /// degrees
    pub beta: f64,
    /// averaged (dp0, dpA, dpB) / q
    pub coefficients: RawPressures,
    pub samples: u32,
}

impl AttitudeAverage {
    pub fn theory(&self, geometry: ProbeGeometry) -> RawPressures {
        predict(self.alpha.to_radians(), self.beta.to_radians(), 1.0, geometry)
    }
}

/// Groups samples by commanded attitude and averages their coefficients.
/// Attitudes come out in the order they were first logged.
pub fn reduce_by_attitude(samples: &[TunnelSample], air: &AirConstants) -> Vec<AttitudeAverage> {
    let mut groups: Vec<(f64, f64, Welford<3>)> = Vec::new();
    let mut dropped = 0usize;

    for sample in samples {
        let Some(coefficients) = sample.coefficients(air) else {
            dropped += 1;
            continue;
        };

        let index = match groups
            .iter()
            .position(|(alpha, beta, _)| *alpha == sample.alpha && *beta == sample.beta)
        {
            Some(index) => index,
            None => {
                groups.push((sample.alpha, sample.beta, Welford::new()));
                groups.len() - 1
            }
        };
        groups[index].2.update(&coefficients);
    }

    if dropped > 0 {
        log_info!("dropped {} samples without a usable reading", dropped);
    }

    groups
        .into_iter()
        .map(|(alpha, beta, welford)| {
            let mean = welford.mean();
            AttitudeAverage {
                alpha,
                beta,
                coefficients: RawPressures::new(mean.x, mean.y, mean.z),
                samples: welford.count(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TheoryComparison {
    pub alpha: f64,
    pub beta: f64,
    pub measured: RawPressures,
    pub theory: RawPressures,
    /// measured / theory per component, None where theory is zero
    pub ratio: [Option<f64>; 3],
}

pub fn compare(averages: &[AttitudeAverage], geometry: ProbeGeometry) -> Vec<TheoryComparison> {
    averages
        .iter()
        .map(|average| {
            let theory = average.theory(geometry);
            let ratio = Component::ALL.map(|component| {
                let t = component.of(&theory);
                if t == 0.0 {
                    None
                } else {
                    Some(component.of(&average.coefficients) / t)
                }
            });
            TheoryComparison {
                alpha: average.alpha,
                beta: average.beta,
                measured: average.coefficients,
                theory,
                ratio,
            }
        })
        .collect()
}

/// Total squared error between the data and the theory scaled by `scaling`.
pub fn scaling_error(
    averages: &[AttitudeAverage],
    component: Component,
    scaling: f64,
    geometry: ProbeGeometry,
) -> f64 {
    averages
        .iter()
        .filter(|average| component.is_informative(average))
        .map(|average| {
            let theory = component.of(&average.theory(geometry));
            let e = component.of(&average.coefficients) - scaling * theory;
            e * e
        })
        .sum()
}

/// (scaling, error) pairs for scalings in `from..to` (end exclusive).
pub fn scaling_sweep(
    averages: &[AttitudeAverage],
    component: Component,
    geometry: ProbeGeometry,
    from: f64,
    to: f64,
    step: f64,
) -> Vec<(f64, f64)> {
    let finite = from.is_finite() && to.is_finite() && step.is_finite();
    if !finite || !(step > 0.0) || !(to > from) {
        return Vec::new();
    }
    let n = ((to - from) / step).ceil() as usize;
    (0..n)
        .map(|i| from + i as f64 * step)
        .filter(|s| *s < to)
        .map(|s| (s, scaling_error(averages, component, s, geometry)))
        .collect()
}

/// Least squares scaling of the theory onto the data. None when every
/// informative theory value is zero.
pub fn best_fit_scaling(
    averages: &[AttitudeAverage],
    component: Component,
    geometry: ProbeGeometry,
) -> Option<f64> {
    let (dt, tt) = averages
        .iter()
        .filter(|average| component.is_informative(average))
        .fold((0.0, 0.0), |(dt, tt), average| {
            let d = component.of(&average.coefficients);
            let t = component.of(&average.theory(geometry));
            (dt + d * t, tt + t * t)
        });

    if tt == 0.0 { None } else { Some(dt / tt) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::init_logger;
    use approx::assert_relative_eq;
    use csv::ReaderBuilder;

    const BARO: f64 = 98_500.0;
    const OAT: f64 = 18.0;
    const MPH: f64 = 45.0;

    /// samples as a probe would log them if it read `scaling` times the theory
    fn synthetic_session(scaling: f64, geometry: ProbeGeometry) -> Vec<TunnelSample> {
        let q = dynamic_pressure(BARO, OAT, MPH, &AirConstants::default());
        let mut samples = Vec::new();
        let mut seq = 0;
        for alpha in [-10.0, 0.0, 10.0] {
            for beta in [-5.0, 0.0, 5.0] {
                let raw = predict(
                    f64::to_radians(alpha),
                    f64::to_radians(beta),
                    scaling * q,
                    geometry,
                );
                // two readings per attitude straddling the true value
                for noise in [-0.01, 0.01] {
                    samples.push(TunnelSample {
                        mph: MPH,
                        alpha,
                        beta,
                        seq,
                        baro: BARO,
                        oat: OAT,
                        dp0: raw.dp0 + noise,
                        dp_a: raw.dp_a - noise,
                        dp_b: raw.dp_b + noise,
                    });
                    seq += 1;
                }
            }
        }
        samples
    }

    #[test]
    fn averages_group_by_attitude_in_logged_order() {
        init_logger();

        let samples = synthetic_session(1.0, ProbeGeometry::V2);
        let averages = reduce_by_attitude(&samples, &AirConstants::default());
        assert_eq!(averages.len(), 9);
        assert_eq!((averages[0].alpha, averages[0].beta), (-10.0, -5.0));
        assert_eq!((averages[8].alpha, averages[8].beta), (10.0, 5.0));
        for average in &averages {
            assert_eq!(average.samples, 2);
            let theory = average.theory(ProbeGeometry::V2);
            assert_relative_eq!(average.coefficients.dp0, theory.dp0, epsilon = 1e-9);
            assert_relative_eq!(average.coefficients.dp_a, theory.dp_a, epsilon = 1e-9);
            assert_relative_eq!(average.coefficients.dp_b, theory.dp_b, epsilon = 1e-9);
        }
    }

    #[test]
    fn failed_readings_are_dropped() {
        let mut samples = synthetic_session(1.0, ProbeGeometry::V1);
        samples[0].dp0 = 0.0;
        samples[1].mph = 0.0;
        let averages = reduce_by_attitude(&samples, &AirConstants::default());
        // both readings of the first attitude are gone
        assert_eq!(averages.len(), 8);
        assert_eq!((averages[0].alpha, averages[0].beta), (-10.0, 0.0));
    }

    #[test]
    fn ratio_is_undefined_on_axis() {
        let samples = synthetic_session(0.9, ProbeGeometry::V2);
        let averages = reduce_by_attitude(&samples, &AirConstants::default());
        let comparisons = compare(&averages, ProbeGeometry::V2);

        let on_alpha_axis = comparisons
            .iter()
            .find(|c| c.alpha == 10.0 && c.beta == 0.0)
            .unwrap();
        assert_eq!(on_alpha_axis.ratio[2], None);
        assert_relative_eq!(on_alpha_axis.ratio[0].unwrap(), 0.9, epsilon = 1e-6);
        assert_relative_eq!(on_alpha_axis.ratio[1].unwrap(), 0.9, epsilon = 1e-6);

        let centered = comparisons
            .iter()
            .find(|c| c.alpha == 0.0 && c.beta == 0.0)
            .unwrap();
        assert_eq!(centered.ratio[1], None);
        assert_eq!(centered.ratio[2], None);
    }

    #[test]
    fn best_fit_recovers_known_scaling() {
        init_logger();

        for geometry in ProbeGeometry::ALL {
            let samples = synthetic_session(0.8, geometry);
            let averages = reduce_by_attitude(&samples, &AirConstants::default());
            for component in Component::ALL {
                let scaling = best_fit_scaling(&averages, component, geometry).unwrap();
                assert_relative_eq!(scaling, 0.8, epsilon = 1e-9);
                assert!(scaling_error(&averages, component, scaling, geometry) < 1e-18);
                assert!(scaling_error(&averages, component, 1.0, geometry) > 1e-6);
            }
        }
    }

    #[test]
    fn sweep_minimum_is_near_best_fit() {
        let samples = synthetic_session(1.3, ProbeGeometry::V2);
        let averages = reduce_by_attitude(&samples, &AirConstants::default());
        let sweep = scaling_sweep(&averages, Component::DpA, ProbeGeometry::V2, 0.1, 1.9, 0.05);
        assert_eq!(sweep.len(), 36);
        let (best, _) = sweep
            .iter()
            .copied()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap();
        assert_relative_eq!(best, 1.3, epsilon = 1e-9);
    }

    #[test]
    fn sweep_rejects_unbounded_ranges() {
        let samples = synthetic_session(1.0, ProbeGeometry::V1);
        let averages = reduce_by_attitude(&samples, &AirConstants::default());
        for (from, to, step) in [
            (0.1, f64::INFINITY, 0.05),
            (f64::NEG_INFINITY, 1.9, 0.05),
            (0.1, 1.9, f64::INFINITY),
            (0.1, f64::NAN, 0.05),
        ] {
            let sweep = scaling_sweep(&averages, Component::Dp0, ProbeGeometry::V1, from, to, step);
            assert!(sweep.is_empty());
        }
    }

    #[test]
    fn no_fit_without_informative_points() {
        let averages = vec![AttitudeAverage {
            alpha: 0.0,
            beta: 0.0,
            coefficients: RawPressures::new(2.0, 0.0, 0.0),
            samples: 1,
        }];
        assert_eq!(
            best_fit_scaling(&averages, Component::DpA, ProbeGeometry::V2),
            None
        );
        assert_eq!(
            scaling_error(&averages, Component::DpB, 3.0, ProbeGeometry::V2),
            0.0
        );
    }

    #[test]
    fn reads_logged_session_csv() {
        let data = "\
mph,alpha,beta,seq,baro,oat,dp0,dpA,dpB
45,5,0,0,98500,18.5,210.25,-36.5,0.0
45,5,0,1,98500,18.5,209.75,-37.5,0.0
45,0,0,2,98500,18.5,0,0,0
";
        let mut reader = ReaderBuilder::new().from_reader(data.as_bytes());
        let samples: Vec<TunnelSample> = reader
            .deserialize()
            .map(|row| row.unwrap())
            .collect();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[1].seq, 1);
        assert_eq!(samples[1].dp_a, -37.5);

        let averages = reduce_by_attitude(&samples, &AirConstants::default());
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].samples, 2);

        let q = dynamic_pressure(98_500.0, 18.5, 45.0, &AirConstants::default());
        assert_relative_eq!(averages[0].coefficients.dp0, 210.0 / q, max_relative = 1e-12);
        assert_relative_eq!(averages[0].coefficients.dp_a, -37.0 / q, max_relative = 1e-12);
    }
}
