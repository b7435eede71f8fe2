use core::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use core::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ProbeError;

/// Angular offset of a pressure tap from the probe centerline, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    pub d_alpha: f64,
    pub d_beta: f64,
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapPosition {
    Center,
    Upper,
    Lower,
    Left,
    Right,
    /// on the centerline, 90 degrees below the center hole
    Bottom,
}

impl TapPosition {
    pub const fn offset(self) -> Tap {
        let (d_alpha, d_beta) = match self {
            TapPosition::Center => (0.0, 0.0),
            TapPosition::Upper => (-FRAC_PI_4, 0.0),
            TapPosition::Lower => (FRAC_PI_4, 0.0),
            TapPosition::Left => (0.0, -FRAC_PI_4),
            TapPosition::Right => (0.0, FRAC_PI_4),
            TapPosition::Bottom => (FRAC_PI_2, 0.0),
        };
        Tap { d_alpha, d_beta }
    }
}

/// Which pressure the center hole is referenced against.
///
/// Both variants share the four 45 degree holes, so dpA and dpB are computed the
/// same way; only dp0 differs.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeGeometry {
    /// 5-hole sphere plus a dedicated static source
    V1,
    /// 5-hole sphere referenced against a sixth hole at 90 degrees (`TapPosition::Bottom`)
    V2,
}

const V1_TAPS: [TapPosition; 5] = [
    TapPosition::Center,
    TapPosition::Upper,
    TapPosition::Lower,
    TapPosition::Left,
    TapPosition::Right,
];

const V2_TAPS: [TapPosition; 6] = [
    TapPosition::Center,
    TapPosition::Upper,
    TapPosition::Lower,
    TapPosition::Left,
    TapPosition::Right,
    TapPosition::Bottom,
];

impl ProbeGeometry {
    pub const ALL: [ProbeGeometry; 2] = [ProbeGeometry::V1, ProbeGeometry::V2];

    /// None means the reference is an external static source (coefficient 0)
    pub const fn reference_tap(self) -> Option<TapPosition> {
        match self {
            ProbeGeometry::V1 => None,
            ProbeGeometry::V2 => Some(TapPosition::Bottom),
        }
    }

    /// every sphere tap the geometry reads
    pub fn taps(self) -> &'static [TapPosition] {
        match self {
            ProbeGeometry::V1 => &V1_TAPS,
            ProbeGeometry::V2 => &V2_TAPS,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ProbeGeometry::V1 => "v1",
            ProbeGeometry::V2 => "v2",
        }
    }
}

impl fmt::Display for ProbeGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProbeGeometry {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("v1") {
            Ok(ProbeGeometry::V1)
        } else if s.eq_ignore_ascii_case("v2") {
            Ok(ProbeGeometry::V2)
        } else {
            Err(ProbeError::InvalidGeometry)
        }
    }
}
