// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change thresholds that decide when a transform must be rebaked.

use kurbo::Vec2;

/// Per-component change thresholds.
///
/// A setter only invalidates the cached matrix when the new value differs from the
/// value that produced the cache by *more than* the matching threshold. Positions
/// and scales are compared by Euclidean distance, angles (degrees) by absolute
/// difference.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Epsilons {
    /// Position threshold, in local units.
    pub position: f64,
    /// Rotation threshold, in degrees.
    pub angle: f64,
    /// Scale threshold.
    pub scale: f64,
}

impl Epsilons {
    /// Filters floating-point noise but tracks any visible change.
    pub const DEFAULT: Self = Self {
        position: 1e-4,
        angle: 1e-4,
        scale: 1e-5,
    };

    /// Every difference invalidates.
    pub const EXACT: Self = Self {
        position: 0.0,
        angle: 0.0,
        scale: 0.0,
    };

    /// Coarse thresholds for targets where sub-pixel motion is not worth a rebake.
    pub const STEPPED: Self = Self {
        position: 0.1,
        angle: 1e-4,
        scale: 1e-3,
    };

    /// Returns true if moving from `old` to `new` exceeds the position threshold.
    #[inline]
    pub fn position_changed(&self, old: Vec2, new: Vec2) -> bool {
        (new - old).hypot() > self.position
    }

    /// Returns true if rotating from `old` to `new` degrees exceeds the angle threshold.
    #[inline]
    pub fn angle_changed(&self, old: f64, new: f64) -> bool {
        (new - old).abs() > self.angle
    }

    /// Returns true if scaling from `old` to `new` exceeds the scale threshold.
    #[inline]
    pub fn scale_changed(&self, old: Vec2, new: Vec2) -> bool {
        (new - old).hypot() > self.scale
    }
}

impl Default for Epsilons {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_exclusive() {
        let eps = Epsilons {
            position: 1.0,
            angle: 1.0,
            scale: 1.0,
        };
        assert!(!eps.position_changed(Vec2::ZERO, Vec2::new(1.0, 0.0)));
        assert!(eps.position_changed(Vec2::ZERO, Vec2::new(1.0, 0.1)));
        assert!(!eps.angle_changed(10.0, 11.0));
        assert!(eps.angle_changed(10.0, 11.5));
    }

    #[test]
    fn exact_flags_any_difference() {
        let eps = Epsilons::EXACT;
        assert!(!eps.scale_changed(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0)));
        assert!(eps.scale_changed(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0 + 1e-12)));
    }
}
