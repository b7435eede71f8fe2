use nalgebra::Vector2;

use crate::{
    ProbeError,
    forward_model::{FlowState, ForwardModel, RawPressures},
    geometry::ProbeGeometry,
    solver::{SolverConfig, newton_2d},
};

/// Recovers flow angles and dynamic pressure from raw probe pressures.
///
/// Only the two ratios dpA/dp0 and dpB/dp0 depend on the angles, so the angles
/// are found by root finding on the ratios at unit q, and q then falls out of
/// a single division.
#[derive(Debug, Clone)]
pub struct Inverter {
    geometry: ProbeGeometry,
    config: SolverConfig,
}

impl Inverter {
    pub fn new(geometry: ProbeGeometry, config: SolverConfig) -> Self {
        Self { geometry, config }
    }

    pub fn geometry(&self) -> ProbeGeometry {
        self.geometry
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Fails with `DegenerateInput` when dp0 is zero, or when its sign
    /// would make q negative at the recovered angles.
    pub fn invert(&self, raw: &RawPressures) -> Result<FlowState, ProbeError> {
        let (ra0, rb0) = raw.ratios()?;
        let geometry = self.geometry;

        let solution = newton_2d(
            |angles: Vector2<f64>| {
                let (ra, rb) = ForwardModel::ratios(angles.x, angles.y, geometry);
                Vector2::new(ra - ra0, rb - rb0)
            },
            Vector2::zeros(),
            &self.config,
        )?;

        let alpha = solution.x.x;
        let beta = solution.x.y;
        let dp0_over_q = ForwardModel::predict(alpha, beta, 1.0, geometry).dp0;
        let q = raw.dp0 / dp0_over_q;
        // dp0 with the wrong sign for the recovered attitude
        if !(q > 0.0) || !q.is_finite() {
            log_debug!("rejecting q = {} at ({}, {})", q, alpha, beta);
            return Err(ProbeError::DegenerateInput);
        }

        Ok(FlowState { alpha, beta, q })
    }
}

/// Inverts with the default solver settings.
pub fn invert(raw: &RawPressures, geometry: ProbeGeometry) -> Result<FlowState, ProbeError> {
    Inverter::new(geometry, SolverConfig::default()).invert(raw)
}
