//! Time-driven camera transitions.
//!
//! A `Transition` is advanced by calling `tick` with the current time once per
//! frame. Progress depends only on elapsed time, eased with smoothstep, and the
//! pose snaps exactly onto the target once the duration has passed. A started
//! transition always runs to completion.

use glam::{Quat, Vec3};

/// Camera position and orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Eased blend from `self` towards `target`; `t` is clamped to [0, 1]
    pub fn lerp(&self, target: &Pose, t: f32) -> Pose {
        let t = t.clamp(0.0, 1.0);
        Pose {
            position: self.position.lerp(target.position, t),
            rotation: self.rotation.lerp(target.rotation, t),
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

/// Ease-in-out curve `t²(3 − 2t)`
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Idle,
    Transitioning {
        start: Pose,
        target: Pose,
        /// Seconds, on the same clock as `tick`
        start_time: f64,
        duration: f64,
    },
    Done {
        target: Pose,
    },
}

impl Default for Transition {
    fn default() -> Self {
        Transition::Idle
    }
}

impl Transition {
    /// Begin moving from `from` to `to`, starting at time `now`.
    ///
    /// A duration that is not a positive finite number of seconds jumps
    /// straight to `Done`.
    pub fn start(from: Pose, to: Pose, now: f64, duration: f64) -> Self {
        if !(duration.is_finite() && duration > 0.0) || !now.is_finite() {
            tracing::warn!("Camera transition of {}s skipped", duration);
            return Transition::Done { target: to };
        }
        Transition::Transitioning {
            start: from,
            target: to,
            start_time: now,
            duration,
        }
    }

    /// Advance to time `now` and return the pose to apply, if any.
    ///
    /// `Idle` yields nothing; `Done` keeps yielding the target.
    pub fn tick(&mut self, now: f64) -> Option<Pose> {
        match *self {
            Transition::Idle => None,
            Transition::Done { target } => Some(target),
            Transition::Transitioning {
                start,
                target,
                start_time,
                duration,
            } => {
                let elapsed = (now - start_time).max(0.0);
                if elapsed >= duration {
                    *self = Transition::Done { target };
                    return Some(target);
                }
                let t = smoothstep((elapsed / duration) as f32);
                Some(start.lerp(&target, t))
            }
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Transition::Transitioning { .. })
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Transition::Done { .. })
    }
}
