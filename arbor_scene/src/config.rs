// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene-wide configuration.

use arbor_focus::WrapMode;
use arbor_transform::Epsilons;

use crate::anim::Easing;
use crate::types::DispatchOrder;

/// Knobs shared by every node of a [`Scene`](crate::Scene).
///
/// ```rust
/// use arbor_scene::{DispatchOrder, SceneConfig};
/// use arbor_transform::Epsilons;
///
/// let config = SceneConfig::default()
///     .with_epsilons(Epsilons::STEPPED)
///     .with_dispatch_order(DispatchOrder::PaintOrder);
/// assert_eq!(config.epsilons, Epsilons::STEPPED);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SceneConfig {
    /// Change thresholds for transform setters and animation start.
    pub epsilons: Epsilons,
    /// Whether focus rings wrap around.
    pub focus_wrap: WrapMode,
    /// Default child order for input dispatch. Containers may override it.
    pub dispatch_order: DispatchOrder,
    /// Easing used by `move_to`, `rotate_to` and `scale_to`.
    pub easing: Easing,
}

impl SceneConfig {
    /// Set the change thresholds.
    pub fn with_epsilons(mut self, epsilons: Epsilons) -> Self {
        self.epsilons = epsilons;
        self
    }

    /// Set the focus wrap mode.
    pub fn with_focus_wrap(mut self, wrap: WrapMode) -> Self {
        self.focus_wrap = wrap;
        self
    }

    /// Set the default dispatch order.
    pub fn with_dispatch_order(mut self, order: DispatchOrder) -> Self {
        self.dispatch_order = order;
        self
    }

    /// Set the animation easing.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}
