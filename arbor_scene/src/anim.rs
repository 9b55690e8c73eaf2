// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node transform animations.

use kurbo::Vec2;
use smallvec::SmallVec;

/// Callback invoked once an animation reaches its target.
pub type Completion = Box<dyn FnOnce()>;

/// Easing curve applied to animation progress.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// Accelerating.
    InQuad,
    /// Decelerating.
    OutQuad,
    /// Accelerating, then decelerating.
    InOutQuad,
    /// Strongly decelerating.
    OutCubic,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Transform component driven by an animation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    /// Local position.
    Position,
    /// Local rotation.
    Rotation,
    /// Local scale.
    Scale,
}

/// An amount of change for one transform component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Motion {
    /// Offset added to the position.
    Position(Vec2),
    /// Degrees added to the rotation.
    Rotation(f64),
    /// Amount added to the scale.
    Scale(Vec2),
}

impl Motion {
    /// Component this motion drives.
    pub fn kind(self) -> AnimationKind {
        match self {
            Self::Position(_) => AnimationKind::Position,
            Self::Rotation(_) => AnimationKind::Rotation,
            Self::Scale(_) => AnimationKind::Scale,
        }
    }

    fn times(self, f: f64) -> Self {
        match self {
            Self::Position(v) => Self::Position(v * f),
            Self::Rotation(a) => Self::Rotation(a * f),
            Self::Scale(v) => Self::Scale(v * f),
        }
    }
}

struct Track {
    motion: Motion,
    start_ms: u64,
    duration_ms: u64,
    easing: Easing,
    /// Eased fraction already handed out.
    applied: f64,
    completion: Option<Completion>,
}

impl core::fmt::Debug for Track {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Track")
            .field("motion", &self.motion)
            .field("start_ms", &self.start_ms)
            .field("duration_ms", &self.duration_ms)
            .field("easing", &self.easing)
            .field("applied", &self.applied)
            .field("completion", &self.completion.is_some())
            .finish()
    }
}

/// Output of one [`Animator::update`].
#[derive(Default)]
pub struct AnimationFrame {
    /// Increments to add to the transform, at most one per kind.
    pub steps: SmallVec<[Motion; 3]>,
    /// Completions of animations that finished this frame. Invoke them after the
    /// steps are applied.
    pub completions: SmallVec<[Completion; 3]>,
}

impl core::fmt::Debug for AnimationFrame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AnimationFrame")
            .field("steps", &self.steps)
            .field("completions", &self.completions.len())
            .finish()
    }
}

/// Drives at most one animation per [`AnimationKind`].
///
/// The animator hands out increments rather than absolute values, so it composes
/// with direct edits made to the transform while an animation runs.
#[derive(Debug, Default)]
pub struct Animator {
    tracks: SmallVec<[Track; 3]>,
}

impl Animator {
    /// Create an idle animator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start animating by `motion` over `duration_ms`, starting at `now_ms`.
    ///
    /// A running animation of the same kind is dropped without calling its
    /// completion.
    pub fn start(
        &mut self,
        motion: Motion,
        now_ms: u64,
        duration_ms: u64,
        easing: Easing,
        completion: Option<Completion>,
    ) {
        self.cancel(motion.kind());
        self.tracks.push(Track {
            motion,
            start_ms: now_ms,
            duration_ms,
            easing,
            applied: 0.0,
            completion,
        });
    }

    /// Advance every animation to `now_ms`.
    pub fn update(&mut self, now_ms: u64) -> AnimationFrame {
        let mut frame = AnimationFrame::default();
        let mut i = 0;
        while i < self.tracks.len() {
            let track = &mut self.tracks[i];
            let t = if track.duration_ms == 0 {
                1.0
            } else {
                #[allow(
                    clippy::cast_precision_loss,
                    reason = "Animation durations are far below 2^52 milliseconds."
                )]
                let t = now_ms.saturating_sub(track.start_ms) as f64 / track.duration_ms as f64;
                t.min(1.0)
            };
            let eased = track.easing.apply(t);
            let step = eased - track.applied;
            if step != 0.0 {
                frame.steps.push(track.motion.times(step));
            }
            track.applied = eased;
            if t >= 1.0 {
                let done = self.tracks.remove(i);
                frame.completions.extend(done.completion);
            } else {
                i += 1;
            }
        }
        frame
    }

    /// Whether an animation of `kind` is running.
    pub fn is_running(&self, kind: AnimationKind) -> bool {
        self.tracks.iter().any(|t| t.motion.kind() == kind)
    }

    /// Whether any animation is running.
    pub fn is_idle(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Drop the animation of `kind`, if any, without calling its completion.
    pub fn cancel(&mut self, kind: AnimationKind) {
        self.tracks.retain(|t| t.motion.kind() != kind);
    }

    /// Drop every animation without calling completions.
    pub fn reset(&mut self) {
        self.tracks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn total_position(steps: &[Motion]) -> Vec2 {
        steps
            .iter()
            .map(|m| match m {
                Motion::Position(v) => *v,
                _ => Vec2::ZERO,
            })
            .fold(Vec2::ZERO, |a, b| a + b)
    }

    #[test]
    fn easing_endpoints_are_stable() {
        for ease in [
            Easing::Linear,
            Easing::InQuad,
            Easing::OutQuad,
            Easing::InOutQuad,
            Easing::OutCubic,
        ] {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
            assert!(ease.apply(0.25) < ease.apply(0.75));
        }
    }

    #[test]
    fn increments_sum_to_the_full_motion() {
        let mut animator = Animator::new();
        animator.start(
            Motion::Position(Vec2::new(100.0, -40.0)),
            1_000,
            200,
            Easing::InOutQuad,
            None,
        );
        let mut steps = Vec::new();
        for now in [1_050, 1_100, 1_150, 1_250] {
            steps.extend(animator.update(now).steps);
        }
        let total = total_position(&steps);
        assert!((total - Vec2::new(100.0, -40.0)).hypot() < 1e-9);
        assert!(animator.is_idle());
    }

    #[test]
    fn completion_is_returned_once() {
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let mut animator = Animator::new();
        animator.start(
            Motion::Rotation(90.0),
            0,
            100,
            Easing::Linear,
            Some(Box::new(move || c.set(c.get() + 1))),
        );
        assert!(animator.update(50).completions.is_empty());
        for done in animator.update(100).completions {
            done();
        }
        assert!(animator.update(200).completions.is_empty());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn restarting_a_kind_replaces_it_silently() {
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let mut animator = Animator::new();
        animator.start(
            Motion::Scale(Vec2::new(1.0, 1.0)),
            0,
            100,
            Easing::Linear,
            Some(Box::new(move || c.set(c.get() + 1))),
        );
        animator.start(Motion::Scale(Vec2::new(2.0, 2.0)), 0, 100, Easing::Linear, None);
        animator.start(Motion::Position(Vec2::new(5.0, 0.0)), 0, 100, Easing::Linear, None);
        assert!(animator.is_running(AnimationKind::Scale));
        assert!(animator.is_running(AnimationKind::Position));

        let frame = animator.update(100);
        assert_eq!(frame.steps.len(), 2);
        assert!(frame.steps.contains(&Motion::Scale(Vec2::new(2.0, 2.0))));
        assert!(frame.completions.is_empty());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn zero_duration_finishes_on_next_update() {
        let mut animator = Animator::new();
        animator.start(Motion::Rotation(-30.0), 10, 0, Easing::OutCubic, None);
        let frame = animator.update(10);
        assert_eq!(frame.steps.as_slice(), &[Motion::Rotation(-30.0)]);
        assert!(animator.is_idle());
    }

    #[test]
    fn cancel_only_touches_one_kind() {
        let mut animator = Animator::new();
        animator.start(Motion::Rotation(10.0), 0, 100, Easing::Linear, None);
        animator.start(Motion::Position(Vec2::new(1.0, 0.0)), 0, 100, Easing::Linear, None);
        animator.cancel(AnimationKind::Rotation);
        assert!(!animator.is_running(AnimationKind::Rotation));
        assert!(animator.is_running(AnimationKind::Position));
    }

    #[test]
    fn reset_drops_tracks() {
        let mut animator = Animator::new();
        animator.start(Motion::Rotation(10.0), 0, 100, Easing::Linear, None);
        animator.reset();
        assert!(animator.is_idle());
        assert!(animator.update(100).steps.is_empty());
    }
}
