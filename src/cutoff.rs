//! Dead-zone and cutoff normalization for analog input values.
//!
//! Raw hardware axes drift: a stick at rest rarely reports exactly zero.
//! The functions here shape a raw sample into a clean `[-1.0, 1.0]` range
//! (or the unit disc for stick vectors) by suppressing values inside a
//! dead zone and, optionally, rescaling the remaining "live zone" so the
//! output still sweeps the full range.
//!
//! Everything in this module is a pure function: deterministic, free of
//! side effects, and total over all finite inputs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How a dead zone is applied to an analog value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CutoffKind {
    /// No cutoff is applied; the value passes through (clamped to the unit
    /// range like every other kind).
    #[default]
    None,

    /// Values inside the dead zone become `0.0`; values outside are rescaled
    /// so the live zone `[deadzone, 1.0]` maps back onto `[0.0, 1.0]`,
    /// preserving sign.
    ///
    /// ```rust
    /// use virtual_input::cutoff::{cutoff_axis, CutoffKind};
    ///
    /// assert_eq!(cutoff_axis(0.1, 0.2, CutoffKind::Scaled), 0.0);
    /// assert_eq!(cutoff_axis(0.6, 0.2, CutoffKind::Scaled), 0.5);
    /// assert_eq!(cutoff_axis(1.0, 0.0, CutoffKind::Scaled), 1.0);
    /// ```
    Scaled,

    /// Values inside the dead zone become `0.0`; values outside pass through
    /// unchanged. This leaves a discontinuity at the dead-zone edge.
    ///
    /// ```rust
    /// use virtual_input::cutoff::{cutoff_axis, CutoffKind};
    ///
    /// assert_eq!(cutoff_axis(0.2, 0.2, CutoffKind::Shear), 0.0);
    /// assert_eq!(cutoff_axis(0.6, 0.2, CutoffKind::Shear), 0.6);
    /// ```
    Shear,
}

/// Normalizes a single axis sample against a dead zone.
///
/// A negative `deadzone` is clamped to zero. Samples with a magnitude above
/// `1.0` are hard-clamped to `value.signum()` before any cutoff logic runs,
/// so the result always satisfies `|result| <= 1.0`.
///
/// Samples with a magnitude at or below the dead zone map to exactly `0.0`
/// under both [`CutoffKind::Scaled`] and [`CutoffKind::Shear`].
#[must_use]
pub fn cutoff_axis(value: f32, deadzone: f32, kind: CutoffKind) -> f32 {
    let deadzone = deadzone.max(0.0);
    if value.abs() > 1.0 {
        return value.signum();
    }

    match kind {
        CutoffKind::None => value,
        CutoffKind::Scaled => {
            if value.abs() <= deadzone {
                return 0.0;
            }
            let livezone = 1.0 - deadzone;
            if livezone <= f32::EPSILON {
                return 0.0;
            }
            value.signum() * (value.abs() - deadzone) / livezone
        }
        CutoffKind::Shear => {
            if value.abs() <= deadzone {
                0.0
            } else {
                value
            }
        }
    }
}

/// Normalizes a stick vector against per-axis and radial dead zones.
///
/// Processing order:
///
/// 1. When `axle_deadzone > 0.0`, each component is run through
///    [`cutoff_axis`] independently (per-axis "snapping" toward pure axial
///    motion).
/// 2. The vector is clamped to unit length.
/// 3. The radial cutoff is applied against the vector's magnitude:
///    [`CutoffKind::Scaled`] rescales the direction by
///    `(magnitude - deadzone) / (1.0 - deadzone)`, while
///    [`CutoffKind::Shear`] zeroes the whole vector when the magnitude sits
///    inside the radial dead zone.
///
/// The result's magnitude never exceeds `1.0`.
///
/// ```rust
/// use glam::Vec2;
/// use virtual_input::cutoff::{cutoff_dual_axis, CutoffKind};
///
/// let out = cutoff_dual_axis(
///     Vec2::new(2.0, 0.0),
///     0.0,
///     CutoffKind::Scaled,
///     0.0,
///     CutoffKind::Scaled,
/// );
/// assert_eq!(out, Vec2::new(1.0, 0.0));
/// ```
#[must_use]
pub fn cutoff_dual_axis(
    value: Vec2,
    axle_deadzone: f32,
    axle_kind: CutoffKind,
    radial_deadzone: f32,
    radial_kind: CutoffKind,
) -> Vec2 {
    let axle_deadzone = axle_deadzone.max(0.0);
    let radial_deadzone = radial_deadzone.max(0.0);

    let mut value = value;
    if axle_deadzone > 0.0 {
        value = Vec2::new(
            cutoff_axis(value.x, axle_deadzone, axle_kind),
            cutoff_axis(value.y, axle_deadzone, axle_kind),
        );
    }
    value = value.clamp_length_max(1.0);

    match radial_kind {
        CutoffKind::None => value,
        CutoffKind::Scaled => {
            let magnitude = value.length();
            if magnitude <= radial_deadzone {
                return Vec2::ZERO;
            }
            let livezone = 1.0 - radial_deadzone;
            if livezone <= f32::EPSILON {
                return Vec2::ZERO;
            }
            value.normalize_or_zero() * ((magnitude - radial_deadzone) / livezone)
        }
        CutoffKind::Shear => {
            if value.length() <= radial_deadzone {
                Vec2::ZERO
            } else {
                value
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_never_exceeds_unit_range() {
        for kind in [CutoffKind::None, CutoffKind::Scaled, CutoffKind::Shear] {
            for raw in -40..=40 {
                let value = raw as f32 * 0.1;
                for dz in 0..=10 {
                    let deadzone = dz as f32 * 0.1;
                    let out = cutoff_axis(value, deadzone, kind);
                    assert!(
                        out.abs() <= 1.0,
                        "cutoff_axis({value}, {deadzone}, {kind:?}) = {out}"
                    );
                }
            }
        }
    }

    #[test]
    fn out_of_range_samples_clamp_to_sign() {
        assert_eq!(cutoff_axis(3.7, 0.2, CutoffKind::Scaled), 1.0);
        assert_eq!(cutoff_axis(-1.5, 0.2, CutoffKind::Shear), -1.0);
        assert_eq!(cutoff_axis(2.0, 0.0, CutoffKind::None), 1.0);
    }

    #[test]
    fn shear_zeroes_everything_inside_the_deadzone() {
        for raw in -30..=30 {
            let value = raw as f32 * 0.01;
            assert_eq!(cutoff_axis(value, 0.3, CutoffKind::Shear), 0.0);
        }
        assert_eq!(cutoff_axis(0.3, 0.3, CutoffKind::Shear), 0.0);
        assert_eq!(cutoff_axis(0.31, 0.3, CutoffKind::Shear), 0.31);
    }

    #[test]
    fn scaled_identity_at_boundaries_without_deadzone() {
        assert_eq!(cutoff_axis(1.0, 0.0, CutoffKind::Scaled), 1.0);
        assert_eq!(cutoff_axis(-1.0, 0.0, CutoffKind::Scaled), -1.0);
        assert_eq!(cutoff_axis(0.0, 0.0, CutoffKind::Scaled), 0.0);
    }

    #[test]
    fn scaled_rescales_the_livezone() {
        assert_eq!(cutoff_axis(0.5, 0.5, CutoffKind::Scaled), 0.0);
        assert_eq!(cutoff_axis(0.75, 0.5, CutoffKind::Scaled), 0.5);
        assert_eq!(cutoff_axis(1.0, 0.5, CutoffKind::Scaled), 1.0);
        assert_eq!(cutoff_axis(-0.75, 0.5, CutoffKind::Scaled), -0.5);
    }

    #[test]
    fn negative_deadzone_is_clamped() {
        assert_eq!(cutoff_axis(0.5, -1.0, CutoffKind::Scaled), 0.5);
        assert_eq!(cutoff_axis(0.5, -1.0, CutoffKind::Shear), 0.5);
    }

    #[test]
    fn full_deadzone_never_divides_by_zero() {
        let out = cutoff_axis(1.0, 1.0, CutoffKind::Scaled);
        assert_eq!(out, 0.0);
    }

    #[test]
    fn oversized_vector_clamps_to_unit_length() {
        let out = cutoff_dual_axis(
            Vec2::new(2.0, 0.0),
            0.0,
            CutoffKind::Scaled,
            0.0,
            CutoffKind::Scaled,
        );
        assert!((out.length() - 1.0).abs() < 1e-6);

        let out = cutoff_dual_axis(
            Vec2::new(3.0, 4.0),
            0.0,
            CutoffKind::None,
            0.0,
            CutoffKind::None,
        );
        assert!((out.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn radial_shear_zeroes_the_whole_vector() {
        let out = cutoff_dual_axis(
            Vec2::new(0.1, 0.1),
            0.0,
            CutoffKind::None,
            0.25,
            CutoffKind::Shear,
        );
        assert_eq!(out, Vec2::ZERO);

        let out = cutoff_dual_axis(
            Vec2::new(0.5, 0.0),
            0.0,
            CutoffKind::None,
            0.25,
            CutoffKind::Shear,
        );
        assert_eq!(out, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn radial_scaled_rescales_magnitude() {
        let out = cutoff_dual_axis(
            Vec2::new(0.75, 0.0),
            0.0,
            CutoffKind::None,
            0.5,
            CutoffKind::Scaled,
        );
        assert!((out.x - 0.5).abs() < 1e-6);
        assert_eq!(out.y, 0.0);
    }

    #[test]
    fn per_axis_cutoff_runs_before_the_radial_pass() {
        // With a per-axis shear of 0.3, a slight diagonal snaps onto the X
        // axis before the radial pass sees it.
        let out = cutoff_dual_axis(
            Vec2::new(0.8, 0.2),
            0.3,
            CutoffKind::Shear,
            0.0,
            CutoffKind::None,
        );
        assert_eq!(out, Vec2::new(0.8, 0.0));
    }

    #[test]
    fn dual_axis_magnitude_never_exceeds_one() {
        for kind in [CutoffKind::None, CutoffKind::Scaled, CutoffKind::Shear] {
            for x in -25..=25 {
                for y in -25..=25 {
                    let value = Vec2::new(x as f32 * 0.1, y as f32 * 0.1);
                    let out = cutoff_dual_axis(value, 0.1, kind, 0.2, kind);
                    assert!(out.length() <= 1.0 + 1e-6, "{value:?} -> {out:?}");
                }
            }
        }
    }
}
