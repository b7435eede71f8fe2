use core::fmt;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeError {
    /// dp0 is zero, negative for the recovered attitude, or an input is not finite
    DegenerateInput,
    /// the root finder gave up; `x` and `residual` are from the last accepted iterate
    Convergence {
        x: [f64; 2],
        residual: [f64; 2],
        iterations: u32,
    },
    InvalidGeometry,
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::DegenerateInput => {
                write!(f, "degenerate input: dp0 is zero, not finite or has the wrong sign")
            }
            ProbeError::Convergence {
                x,
                residual,
                iterations,
            } => write!(
                f,
                "root finder did not converge after {} iterations \
                 (last iterate {:?}, residual {:?})",
                iterations, x, residual
            ),
            ProbeError::InvalidGeometry => {
                write!(f, "invalid probe geometry, expected \"v1\" or \"v2\"")
            }
        }
    }
}

impl core::error::Error for ProbeError {}
