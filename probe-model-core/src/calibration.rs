use serde::{Deserialize, Serialize};

use crate::{
    ProbeError,
    forward_model::{RawPressures, predict},
    geometry::ProbeGeometry,
    inverter::Inverter,
    solver::SolverConfig,
};

/// Square grid of pressure ratios, `ratio_min..ratio_max` (end exclusive) on
/// both axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationGrid {
    pub ratio_min: f64,
    pub ratio_max: f64,
    pub ratio_step: f64,
}

impl Default for CalibrationGrid {
    fn default() -> Self {
        Self {
            ratio_min: -1.25,
            ratio_max: 1.25,
            ratio_step: 0.025,
        }
    }
}

impl CalibrationGrid {
    /// ratio values along one axis
    pub fn axis(&self) -> Vec<f64> {
        let finite = self.ratio_min.is_finite()
            && self.ratio_max.is_finite()
            && self.ratio_step.is_finite();
        if !finite || !(self.ratio_step > 0.0) || !(self.ratio_max > self.ratio_min) {
            return Vec::new();
        }

        // index based so the step error doesn't accumulate
        let n = ((self.ratio_max - self.ratio_min) / self.ratio_step).ceil() as usize;
        (0..n)
            .map(|i| self.ratio_min + i as f64 * self.ratio_step)
            .filter(|r| *r < self.ratio_max)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationPoint {
    /// dpA / dp0
    pub ra0: f64,
    /// dpB / dp0
    pub rb0: f64,
    pub alpha: f64,
    pub beta: f64,
    pub q_over_dp0: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationFailure {
    pub ra0: f64,
    pub rb0: f64,
    pub error: ProbeError,
}

/// Lookup surface from pressure ratios to flow angles and q / dp0.
#[derive(Debug, Clone, Default)]
pub struct CalibrationSurface {
    pub points: Vec<CalibrationPoint>,
    pub failures: Vec<CalibrationFailure>,
}

impl CalibrationSurface {
    pub fn total(&self) -> usize {
        self.points.len() + self.failures.len()
    }

    pub fn point_at(&self, ra0: f64, rb0: f64) -> Option<&CalibrationPoint> {
        self.points.iter().find(|p| p.ra0 == ra0 && p.rb0 == rb0)
    }
}

/// Inverts a unit dp0 measurement at every grid point.
///
/// Points are independent; one that fails to invert is recorded in
/// `failures` and the sweep moves on.
pub fn calibration_surface(
    grid: &CalibrationGrid,
    geometry: ProbeGeometry,
    config: &SolverConfig,
) -> CalibrationSurface {
    let inverter = Inverter::new(geometry, config.clone());
    let axis = grid.axis();
    let mut surface = CalibrationSurface::default();

    for &ra0 in &axis {
        for &rb0 in &axis {
            match inverter.invert(&RawPressures::new(1.0, ra0, rb0)) {
                Ok(flow) => surface.points.push(CalibrationPoint {
                    ra0,
                    rb0,
                    alpha: flow.alpha,
                    beta: flow.beta,
                    q_over_dp0: flow.q,
                }),
                Err(error) => {
                    log_debug!("no {} calibration point at ({}, {})", geometry.name(), ra0, rb0);
                    surface.failures.push(CalibrationFailure { ra0, rb0, error });
                }
            }
        }
    }

    log_info!(
        "{} calibration surface: {} of {} points inverted",
        geometry.name(),
        surface.points.len(),
        surface.total()
    );
    surface
}

/// Square grid of flow angles in degrees, `angle_min..=angle_max` on both
/// axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleGrid {
    pub angle_min: f64,
    pub angle_max: f64,
    pub angle_step: f64,
}

impl Default for AngleGrid {
    fn default() -> Self {
        Self {
            angle_min: -25.0,
            angle_max: 25.0,
            angle_step: 0.5,
        }
    }
}

impl AngleGrid {
    /// angle values along one axis, degrees, both ends included
    pub fn axis(&self) -> Vec<f64> {
        let finite = self.angle_min.is_finite()
            && self.angle_max.is_finite()
            && self.angle_step.is_finite();
        if !finite || !(self.angle_step > 0.0) || self.angle_max < self.angle_min {
            return Vec::new();
        }

        // slack so a max that sits on the grid isn't lost to rounding
        let span = (self.angle_max - self.angle_min) / self.angle_step;
        let n = (span + 1e-9).floor() as usize + 1;
        (0..n)
            .map(|i| self.angle_min + i as f64 * self.angle_step)
            .collect()
    }
}

/// Model pressures at one grid attitude, per unit dynamic pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PressurePoint {
    /// radians
    pub alpha: f64,
    /// radians
    pub beta: f64,
    pub dp0: f64,
    pub dp_a: f64,
    pub dp_b: f64,
    /// dpA / dp0, None where dp0 is zero
    pub ra0: Option<f64>,
    /// dpB / dp0, None where dp0 is zero
    pub rb0: Option<f64>,
}

/// Runs the forward model at unit q over every (alpha, beta) in `grid`,
/// alpha outermost.
pub fn pressure_surface(grid: &AngleGrid, geometry: ProbeGeometry) -> Vec<PressurePoint> {
    let axis = grid.axis();
    let mut points = Vec::with_capacity(axis.len() * axis.len());

    for &alpha_deg in &axis {
        for &beta_deg in &axis {
            let alpha = alpha_deg.to_radians();
            let beta = beta_deg.to_radians();
            let raw = predict(alpha, beta, 1.0, geometry);
            let (ra0, rb0) = match raw.ratios() {
                Ok((ra0, rb0)) => (Some(ra0), Some(rb0)),
                Err(_) => (None, None),
            };
            points.push(PressurePoint {
                alpha,
                beta,
                dp0: raw.dp0,
                dp_a: raw.dp_a,
                dp_b: raw.dp_b,
                ra0,
                rb0,
            });
        }
    }

    log_info!(
        "{} pressure surface: {} attitudes",
        geometry.name(),
        points.len()
    );
    points
}
