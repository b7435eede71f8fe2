use core::f64::consts::PI;

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

use crate::ProbeError;

const MAX_LINE_SEARCH_HALVINGS: u32 = 20;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub max_iterations: u32,
    /// converged once every residual component is below this
    pub tolerance: f64,
    /// central difference step used to build the jacobian, in radians
    pub jacobian_step: f64,
    /// radius (radians) of the disk around the centerline the search is confined to
    pub max_flow_angle: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            tolerance: 1e-10,
            jacobian_step: 1e-6,
            // 36 degrees. The v1 dp0 crosses zero at ~41.8 degrees, past which
            // any ratio becomes reachable.
            max_flow_angle: PI / 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution2 {
    pub x: Vector2<f64>,
    pub residual: Vector2<f64>,
    pub iterations: u32,
}

fn convergence_error(x: &Vector2<f64>, residual: &Vector2<f64>, iterations: u32) -> ProbeError {
    ProbeError::Convergence {
        x: [x.x, x.y],
        residual: [residual.x, residual.y],
        iterations,
    }
}

fn is_finite(v: &Vector2<f64>) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

fn project_onto_disk(x: Vector2<f64>, radius: f64) -> Vector2<f64> {
    let norm = x.norm();
    if norm > radius { x * (radius / norm) } else { x }
}

fn jacobian<F>(residual: &mut F, x: &Vector2<f64>, h: f64) -> Matrix2<f64>
where
    F: FnMut(Vector2<f64>) -> Vector2<f64>,
{
    let dx = Vector2::new(h, 0.0);
    let dy = Vector2::new(0.0, h);
    let col_x = (residual(x + dx) - residual(x - dx)) / (2.0 * h);
    let col_y = (residual(x + dy) - residual(x - dy)) / (2.0 * h);
    Matrix2::from_columns(&[col_x, col_y])
}

/// Damped newton iteration for a 2 equation, 2 unknown system.
///
/// The jacobian is estimated with central differences. Each newton step is
/// halved until the max-norm of the residual decreases, and every iterate is
/// projected back onto the disk of radius `config.max_flow_angle`, so a root
/// outside that disk is reported as a convergence failure instead of being
/// chased to infinity.
pub fn newton_2d<F>(
    mut residual: F,
    x0: Vector2<f64>,
    config: &SolverConfig,
) -> Result<Solution2, ProbeError>
where
    F: FnMut(Vector2<f64>) -> Vector2<f64>,
{
    let mut x = project_onto_disk(x0, config.max_flow_angle);
    let mut f = residual(x);
    if !is_finite(&f) {
        log_warn!("residual is not finite at the initial guess");
        return Err(convergence_error(&x, &f, 0));
    }

    for iteration in 0..config.max_iterations {
        let f_norm = f.amax();
        log_trace!(
            "newton iteration {}: x = ({}, {}), |f| = {}",
            iteration,
            x.x,
            x.y,
            f_norm
        );

        if f_norm < config.tolerance {
            log_debug!("newton converged after {} iterations", iteration);
            return Ok(Solution2 {
                x,
                residual: f,
                iterations: iteration,
            });
        }

        let j = jacobian(&mut residual, &x, config.jacobian_step);
        let Some(step) = j.try_inverse().map(|j_inv| -(j_inv * f)) else {
            log_warn!("singular jacobian at ({}, {})", x.x, x.y);
            return Err(convergence_error(&x, &f, iteration));
        };
        if !is_finite(&step) {
            log_warn!("non-finite newton step at ({}, {})", x.x, x.y);
            return Err(convergence_error(&x, &f, iteration));
        }

        let mut t = 1.0;
        let mut accepted = None;
        for _ in 0..MAX_LINE_SEARCH_HALVINGS {
            let candidate = project_onto_disk(x + step * t, config.max_flow_angle);
            let f_candidate = residual(candidate);
            if is_finite(&f_candidate) && f_candidate.amax() < f_norm {
                accepted = Some((candidate, f_candidate));
                break;
            }
            t *= 0.5;
        }

        let Some((next_x, next_f)) = accepted else {
            log_warn!(
                "line search stalled at ({}, {}) with |f| = {}",
                x.x,
                x.y,
                f_norm
            );
            return Err(convergence_error(&x, &f, iteration));
        };

        x = next_x;
        f = next_f;
    }

    if f.amax() < config.tolerance {
        return Ok(Solution2 {
            x,
            residual: f,
            iterations: config.max_iterations,
        });
    }

    log_warn!(
        "newton did not converge within {} iterations",
        config.max_iterations
    );
    Err(convergence_error(&x, &f, config.max_iterations))
}

/// Scalar secant method. `f` only needs to be defined near the root; the
/// iterate is not bounded.
pub fn secant<F>(mut f: F, x0: f64, x1: f64, config: &SolverConfig) -> Result<f64, ProbeError>
where
    F: FnMut(f64) -> f64,
{
    let mut x_prev = x0;
    let mut x = x1;
    let mut f_prev = f(x_prev);
    if libm::fabs(f_prev) < config.tolerance {
        return Ok(x_prev);
    }
    let mut f_x = f(x);

    for iteration in 0..config.max_iterations {
        if !f_x.is_finite() || !f_prev.is_finite() {
            return Err(ProbeError::Convergence {
                x: [x, x_prev],
                residual: [f_x, f_prev],
                iterations: iteration,
            });
        }
        if libm::fabs(f_x) < config.tolerance {
            log_debug!("secant converged after {} iterations", iteration);
            return Ok(x);
        }

        let denominator = f_x - f_prev;
        if denominator == 0.0 {
            log_warn!("secant slope vanished at {}", x);
            return Err(ProbeError::Convergence {
                x: [x, x_prev],
                residual: [f_x, f_prev],
                iterations: iteration,
            });
        }

        let next = x - f_x * (x - x_prev) / denominator;
        x_prev = x;
        f_prev = f_x;
        x = next;
        f_x = f(x);
    }

    if libm::fabs(f_x) < config.tolerance {
        return Ok(x);
    }
    Err(ProbeError::Convergence {
        x: [x, x_prev],
        residual: [f_x, f_prev],
        iterations: config.max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::init_logger;
    use approx::assert_relative_eq;

    #[test]
    fn solves_linear_system_in_one_step() {
        init_logger();

        let solution = newton_2d(
            |x| Vector2::new(2.0 * x.x + x.y - 0.3, x.x - x.y + 0.1),
            Vector2::zeros(),
            &SolverConfig::default(),
        )
        .unwrap();

        assert_relative_eq!(solution.x.x, 0.2 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(solution.x.y, 0.5 / 3.0, epsilon = 1e-9);
        assert!(solution.iterations <= 2);
    }

    #[test]
    fn solves_coupled_nonlinear_system() {
        init_logger();

        // x^2 + y^2 = 0.1, x = 2y
        let solution = newton_2d(
            |x| Vector2::new(x.x * x.x + x.y * x.y - 0.1, x.x - 2.0 * x.y),
            Vector2::new(0.1, 0.1),
            &SolverConfig::default(),
        )
        .unwrap();

        assert_relative_eq!(solution.x.x, 2.0 * (0.02f64).sqrt(), epsilon = 1e-8);
        assert_relative_eq!(solution.x.y, (0.02f64).sqrt(), epsilon = 1e-8);
        assert!(solution.residual.amax() < 1e-10);
    }

    #[test]
    fn root_outside_search_disk_is_an_error() {
        init_logger();

        let config = SolverConfig {
            max_flow_angle: 0.5,
            ..SolverConfig::default()
        };
        let result = newton_2d(
            |x| Vector2::new(x.x - 2.0, x.y),
            Vector2::zeros(),
            &config,
        );

        match result {
            Err(ProbeError::Convergence { x, residual, .. }) => {
                assert!(x[0] <= 0.5 + 1e-12);
                assert!(residual[0].abs() > 1.0);
            }
            other => panic!("expected convergence error, got {other:?}"),
        }
    }

    #[test]
    fn singular_jacobian_is_an_error() {
        let result = newton_2d(
            |x| Vector2::new(x.x + x.y - 1.0, 2.0 * (x.x + x.y) - 1.0),
            Vector2::zeros(),
            &SolverConfig::default(),
        );
        assert!(matches!(result, Err(ProbeError::Convergence { .. })));
    }

    #[test]
    fn iteration_budget_is_enforced() {
        let config = SolverConfig {
            max_iterations: 1,
            ..SolverConfig::default()
        };
        let result = newton_2d(
            |x| Vector2::new(libm::sin(5.0 * x.x) - 0.4, libm::sinh(x.y) - 0.2),
            Vector2::zeros(),
            &config,
        );
        assert!(matches!(
            result,
            Err(ProbeError::Convergence { iterations: 1, .. })
        ));
    }

    #[test]
    fn secant_finds_cosine_fixed_point() {
        let root = secant(|x| libm::cos(x) - x, 0.5, 0.6, &SolverConfig::default()).unwrap();
        assert_relative_eq!(root, 0.7390851332151607, epsilon = 1e-9);
    }

    #[test]
    fn secant_reports_flat_function() {
        let result = secant(|_| 1.0, 0.0, 1.0, &SolverConfig::default());
        assert!(matches!(result, Err(ProbeError::Convergence { .. })));
    }
}
