use serde::{Deserialize, Serialize};

use crate::{
    ProbeError,
    geometry::{ProbeGeometry, TapPosition},
    pressure::pressure_coefficient_cartesian,
};

/// Airflow seen by the probe. Angles are in radians, `q` is in whatever
/// pressure unit the caller measures in (we always use Pa).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowState {
    /// angle of attack
    pub alpha: f64,
    /// sideslip
    pub beta: f64,
    /// dynamic pressure
    pub q: f64,
}

impl FlowState {
    pub fn new(alpha: f64, beta: f64, q: f64) -> Self {
        Self { alpha, beta, q }
    }
}

/// The three differential pressures the probe sensors report.
///
/// - dp0 = (center hole) - (reference)
/// - dp_a = (lower hole) - (upper hole)
/// - dp_b = (right hole) - (left hole)
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPressures {
    pub dp0: f64,
    #[serde(rename = "dpA")]
    pub dp_a: f64,
    #[serde(rename = "dpB")]
    pub dp_b: f64,
}

impl RawPressures {
    pub fn new(dp0: f64, dp_a: f64, dp_b: f64) -> Self {
        Self { dp0, dp_a, dp_b }
    }

    /// (dpA / dp0, dpB / dp0), independent of q
    pub fn ratios(&self) -> Result<(f64, f64), ProbeError> {
        if self.dp0 == 0.0
            || !self.dp0.is_finite()
            || !self.dp_a.is_finite()
            || !self.dp_b.is_finite()
        {
            return Err(ProbeError::DegenerateInput);
        }
        Ok((self.dp_a / self.dp0, self.dp_b / self.dp0))
    }
}

/// Pressure at every sphere hole, before differencing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapPressures {
    pub center: f64,
    pub upper: f64,
    pub lower: f64,
    pub left: f64,
    pub right: f64,
    /// only read by `ProbeGeometry::V2`
    pub bottom: Option<f64>,
}

impl TapPressures {
    /// None for a hole the geometry doesn't have
    pub fn tap(&self, position: TapPosition) -> Option<f64> {
        match position {
            TapPosition::Center => Some(self.center),
            TapPosition::Upper => Some(self.upper),
            TapPosition::Lower => Some(self.lower),
            TapPosition::Left => Some(self.left),
            TapPosition::Right => Some(self.right),
            TapPosition::Bottom => self.bottom,
        }
    }

    pub fn differentials(&self, geometry: ProbeGeometry) -> RawPressures {
        // no reference tap means an external static source, 0 relative to freestream
        let reference = match geometry.reference_tap() {
            Some(position) => self.tap(position).unwrap_or(0.0),
            None => 0.0,
        };
        RawPressures {
            dp0: self.center - reference,
            dp_a: self.lower - self.upper,
            dp_b: self.right - self.left,
        }
    }
}

/// Potential flow model of a spherical 5-hole probe.
pub struct ForwardModel;

impl ForwardModel {
    pub fn tap_pressures(alpha: f64, beta: f64, q: f64, geometry: ProbeGeometry) -> TapPressures {
        let mut taps = TapPressures {
            center: 0.0,
            upper: 0.0,
            lower: 0.0,
            left: 0.0,
            right: 0.0,
            bottom: None,
        };

        for &position in geometry.taps() {
            let offset = position.offset();
            let p =
                q * pressure_coefficient_cartesian(alpha + offset.d_alpha, beta + offset.d_beta);
            match position {
                TapPosition::Center => taps.center = p,
                TapPosition::Upper => taps.upper = p,
                TapPosition::Lower => taps.lower = p,
                TapPosition::Left => taps.left = p,
                TapPosition::Right => taps.right = p,
                TapPosition::Bottom => taps.bottom = Some(p),
            }
        }

        taps
    }

    pub fn predict(alpha: f64, beta: f64, q: f64, geometry: ProbeGeometry) -> RawPressures {
        Self::tap_pressures(alpha, beta, q, geometry).differentials(geometry)
    }

    /// (dpA / dp0, dpB / dp0) at unit dynamic pressure.
    /// Not finite where the model's dp0 crosses zero.
    pub fn ratios(alpha: f64, beta: f64, geometry: ProbeGeometry) -> (f64, f64) {
        let raw = Self::predict(alpha, beta, 1.0, geometry);
        (raw.dp_a / raw.dp0, raw.dp_b / raw.dp0)
    }
}

/// See [`ForwardModel::predict`].
pub fn predict(alpha: f64, beta: f64, q: f64, geometry: ProbeGeometry) -> RawPressures {
    ForwardModel::predict(alpha, beta, q, geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pressure::pressure_coefficient;
    use approx::assert_relative_eq;

    #[test]
    fn v2_regression_at_ten_degrees_alpha() {
        // center 10deg, upper -35deg, lower 55deg, bottom 100deg,
        // left/right both at hypot(10, 45) deg
        let raw = predict(10f64.to_radians(), 0.0, 1.0, ProbeGeometry::V2);
        assert_relative_eq!(raw.dp0, 2.1143083967682936, epsilon = 1e-12);
        assert_relative_eq!(raw.dp_a, -0.7695453224827544, epsilon = 1e-12);
        assert_relative_eq!(raw.dp_b, 0.0, epsilon = 1e-12);

        let expected_dp0 =
            pressure_coefficient(10f64.to_radians()) - pressure_coefficient(100f64.to_radians());
        let expected_dp_a =
            pressure_coefficient(55f64.to_radians()) - pressure_coefficient(-35f64.to_radians());
        assert_relative_eq!(raw.dp0, expected_dp0, epsilon = 1e-12);
        assert_relative_eq!(raw.dp_a, expected_dp_a, epsilon = 1e-12);
    }

    #[test]
    fn v1_regression_off_both_axes() {
        let raw = predict(
            10f64.to_radians(),
            (-5f64).to_radians(),
            1.0,
            ProbeGeometry::V1,
        );
        assert_relative_eq!(raw.dp0, 0.9154082485568235, epsilon = 1e-12);
        assert_relative_eq!(raw.dp_a, -0.7647607995488509, epsilon = 1e-12);
        assert_relative_eq!(raw.dp_b, 0.38110350516785674, epsilon = 1e-12);
    }

    #[test]
    fn zero_angle_reference_values() {
        for q in [1.0, 250.0, 1234.5] {
            // cp(0) - cp(90deg) = 1 - (-1.25)
            let v2 = predict(0.0, 0.0, q, ProbeGeometry::V2);
            assert_relative_eq!(v2.dp0, 2.25 * q, max_relative = 1e-12);
            assert_relative_eq!(v2.dp_a, 0.0, epsilon = 1e-9);
            assert_relative_eq!(v2.dp_b, 0.0, epsilon = 1e-9);

            let v1 = predict(0.0, 0.0, q, ProbeGeometry::V1);
            assert_relative_eq!(v1.dp0, q, max_relative = 1e-12);
        }
    }

    #[test]
    fn on_axis_flow_has_no_cross_axis_differential() {
        for geometry in ProbeGeometry::ALL {
            for deg in -25..=25 {
                let angle = (deg as f64).to_radians();
                let pitch_only = predict(angle, 0.0, 400.0, geometry);
                assert_eq!(pitch_only.dp_b, 0.0, "{geometry} alpha {deg}");

                let yaw_only = predict(0.0, angle, 400.0, geometry);
                assert_eq!(yaw_only.dp_a, 0.0, "{geometry} beta {deg}");
            }
        }
    }

    #[test]
    fn scales_linearly_with_q() {
        let alpha = 7f64.to_radians();
        let beta = (-12f64).to_radians();
        for geometry in ProbeGeometry::ALL {
            let unit = predict(alpha, beta, 1.0, geometry);
            let scaled = predict(alpha, beta, 321.0, geometry);
            assert_relative_eq!(scaled.dp0, unit.dp0 * 321.0, max_relative = 1e-12);
            assert_relative_eq!(scaled.dp_a, unit.dp_a * 321.0, max_relative = 1e-12);
            assert_relative_eq!(scaled.dp_b, unit.dp_b * 321.0, max_relative = 1e-12);

            let (ra, rb) = ForwardModel::ratios(alpha, beta, geometry);
            let (sa, sb) = scaled.ratios().unwrap();
            assert_relative_eq!(ra, sa, max_relative = 1e-12);
            assert_relative_eq!(rb, sb, max_relative = 1e-12);
        }
    }

    #[test]
    fn geometries_share_cross_axis_terms() {
        let alpha = 3f64.to_radians();
        let beta = 15f64.to_radians();
        let v1 = predict(alpha, beta, 1.0, ProbeGeometry::V1);
        let v2 = predict(alpha, beta, 1.0, ProbeGeometry::V2);
        assert_eq!(v1.dp_a, v2.dp_a);
        assert_eq!(v1.dp_b, v2.dp_b);
        assert!(v2.dp0 > v1.dp0);
    }

    #[test]
    fn v1_taps_skip_bottom_hole() {
        let taps = ForwardModel::tap_pressures(0.1, 0.2, 1.0, ProbeGeometry::V1);
        assert_eq!(taps.bottom, None);
        let taps = ForwardModel::tap_pressures(0.1, 0.2, 1.0, ProbeGeometry::V2);
        assert!(taps.bottom.is_some());
    }

    #[test]
    fn dp0_is_referenced_against_the_geometry_reference_tap() {
        let alpha = 0.2;
        let beta = -0.1;
        for geometry in ProbeGeometry::ALL {
            let taps = ForwardModel::tap_pressures(alpha, beta, 10.0, geometry);
            let reference = geometry
                .reference_tap()
                .and_then(|position| taps.tap(position))
                .unwrap_or(0.0);
            let raw = taps.differentials(geometry);
            assert_eq!(raw.dp0, taps.center - reference);
            assert_eq!(raw, predict(alpha, beta, 10.0, geometry));
        }
        let v1_taps = ForwardModel::tap_pressures(alpha, beta, 10.0, ProbeGeometry::V1);
        assert_eq!(v1_taps.tap(TapPosition::Bottom), None);
        assert_eq!(v1_taps.differentials(ProbeGeometry::V1).dp0, v1_taps.center);
    }

    #[test]
    fn ratios_reject_zero_reference() {
        assert_eq!(
            RawPressures::new(0.0, 1.0, 1.0).ratios(),
            Err(ProbeError::DegenerateInput)
        );
        assert_eq!(
            RawPressures::new(1.0, f64::NAN, 1.0).ratios(),
            Err(ProbeError::DegenerateInput)
        );
    }
}
