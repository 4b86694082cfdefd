//! Headless crafting session.
//!
//! Drives one weld from start to finish: the camera moves to the crafting
//! view, object A and then object B are placed at the spawn point and nudged
//! into position, the camera moves in for welding, and `finish` stores the
//! composite in the crafting pile. Rendering and input belong to the host;
//! the session only tracks state, poses and placements.

use glam::{Quat, Vec3};

use crate::blueprints::{weld, ShapeBlueprint};
use crate::core::config::WeldConfig;
use crate::core::error::{Result, WeldError};
use crate::core::types::{EntryId, ItemId, Transform};
use crate::inventory::{write_snapshot, InventoryStore, Persistence};

use super::transition::{Pose, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraftingState {
    Idle,
    MovingCamera,
    PlacingObjectA,
    PlacingObjectB,
    MovingToWeld,
    ReadyToWeld,
}

impl CraftingState {
    pub fn name(&self) -> &'static str {
        match self {
            CraftingState::Idle => "Idle",
            CraftingState::MovingCamera => "MovingCamera",
            CraftingState::PlacingObjectA => "PlacingObjectA",
            CraftingState::PlacingObjectB => "PlacingObjectB",
            CraftingState::MovingToWeld => "MovingToWeld",
            CraftingState::ReadyToWeld => "ReadyToWeld",
        }
    }
}

/// Fixed scene locations the session moves between
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLayout {
    pub crafting_view: Pose,
    pub welding_view: Pose,
    pub spawn_point: Vec3,
}

/// A blueprint placed in the scene during a session
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObject {
    pub blueprint: ShapeBlueprint,
    pub transform: Transform,
}

/// What `finish` produced
#[derive(Debug, Clone, PartialEq)]
pub struct WeldOutcome {
    pub entry: EntryId,
    pub item_id: ItemId,
    pub display_name: String,
}

pub struct CraftingSession {
    config: WeldConfig,
    layout: SceneLayout,
    state: CraftingState,
    camera: Pose,
    original_camera: Pose,
    transition: Transition,
    pending: Option<(ShapeBlueprint, ShapeBlueprint)>,
    object_a: Option<PlacedObject>,
    object_b: Option<PlacedObject>,
}

impl CraftingSession {
    pub fn new(config: WeldConfig, layout: SceneLayout, camera: Pose) -> Self {
        Self {
            config,
            layout,
            state: CraftingState::Idle,
            camera,
            original_camera: camera,
            transition: Transition::Idle,
            pending: None,
            object_a: None,
            object_b: None,
        }
    }

    /// Begin welding `a` and `b`; the camera starts moving to the crafting view
    pub fn start(&mut self, a: ShapeBlueprint, b: ShapeBlueprint, now: f64) -> Result<()> {
        self.expect_state(CraftingState::Idle)?;

        self.original_camera = self.camera;
        self.pending = Some((a, b));
        self.begin_transition(self.layout.crafting_view, now);
        self.state = CraftingState::MovingCamera;
        Ok(())
    }

    /// Advance camera transitions to time `now` and return the camera pose
    pub fn tick(&mut self, now: f64) -> Pose {
        if let Some(pose) = self.transition.tick(now) {
            self.camera = pose;
        }

        if self.transition.is_done() {
            self.transition = Transition::Idle;
            match self.state {
                CraftingState::MovingCamera => {
                    self.state = CraftingState::PlacingObjectA;
                    self.object_a = self.pending.as_ref().map(|(a, _)| self.place_at_spawn(a));
                }
                CraftingState::MovingToWeld => {
                    self.state = CraftingState::ReadyToWeld;
                    tracing::info!("Camera moved. Ready for final weld.");
                }
                _ => {}
            }
        }

        self.camera
    }

    /// Move the object being placed along `direction` (world space) for `dt` seconds.
    ///
    /// Returns `false` when no object is being placed or the move would
    /// leave the object at a non-finite position.
    pub fn translate(&mut self, direction: Vec3, dt: f32) -> bool {
        let step = direction * self.config.move_speed * dt;
        match self.active_object_mut() {
            Some(object) => {
                let position = object.transform.position + step;
                if !position.is_finite() {
                    tracing::warn!("Ignoring move to non-finite position {:?}", position);
                    return false;
                }
                object.transform.position = position;
                true
            }
            None => false,
        }
    }

    /// Turn the object being placed one rotate step around its own `axis`
    pub fn rotate(&mut self, axis: Vec3) -> bool {
        let Some(axis) = axis.try_normalize() else {
            return false;
        };
        let step = Quat::from_axis_angle(axis, self.config.rotate_step_degrees.to_radians());
        match self.active_object_mut() {
            Some(object) => {
                object.transform.rotation = (object.transform.rotation * step).normalize();
                true
            }
            None => false,
        }
    }

    /// Confirm the current placement.
    ///
    /// After A, object B is placed; after B, the camera moves to the welding
    /// view. Returns `false` in any other state.
    pub fn done(&mut self, now: f64) -> bool {
        match self.state {
            CraftingState::PlacingObjectA => {
                self.state = CraftingState::PlacingObjectB;
                self.object_b = self.pending.as_ref().map(|(_, b)| self.place_at_spawn(b));
                true
            }
            CraftingState::PlacingObjectB => {
                self.begin_transition(self.layout.welding_view, now);
                self.state = CraftingState::MovingToWeld;
                true
            }
            _ => false,
        }
    }

    /// Weld the two placed objects into a composite, add it to the pile and reset.
    ///
    /// Fails with `MissingPrerequisite` and changes nothing if either object
    /// has not been placed. A snapshot image, if given, is stored under the
    /// composite's id.
    pub fn finish<P: Persistence>(
        &mut self,
        store: &mut InventoryStore<P>,
        snapshot: Option<&[u8]>,
    ) -> Result<WeldOutcome> {
        let (a, b) = match (&self.object_a, &self.object_b) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                tracing::error!("Objects missing. Cannot save.");
                return Err(WeldError::MissingPrerequisite(
                    "both objects must be placed before welding".into(),
                ));
            }
        };

        let composite = weld(&a.blueprint, &a.transform, &b.blueprint, &b.transform);
        let item_id = composite.item_id.clone();
        let display_name = composite.display_name.clone();

        if let Some(png) = snapshot {
            write_snapshot(store.backend_mut(), &item_id, png)?;
        }

        let entry = store.add_to_pile(composite)?;
        tracing::info!("Saved {} to crafting pile", display_name);

        self.cleanup();
        Ok(WeldOutcome {
            entry,
            item_id,
            display_name,
        })
    }

    fn cleanup(&mut self) {
        self.object_a = None;
        self.object_b = None;
        self.pending = None;
        self.transition = Transition::Idle;
        self.camera = self.original_camera;
        self.state = CraftingState::Idle;
    }

    fn begin_transition(&mut self, target: Pose, now: f64) {
        self.transition = Transition::start(
            self.camera,
            target,
            now,
            f64::from(self.config.camera_transition_secs),
        );
    }

    fn place_at_spawn(&self, blueprint: &ShapeBlueprint) -> PlacedObject {
        PlacedObject {
            blueprint: blueprint.clone(),
            transform: Transform::from_position(self.layout.spawn_point),
        }
    }

    fn active_object_mut(&mut self) -> Option<&mut PlacedObject> {
        match self.state {
            CraftingState::PlacingObjectA => self.object_a.as_mut(),
            CraftingState::PlacingObjectB => self.object_b.as_mut(),
            _ => None,
        }
    }

    fn expect_state(&self, expected: CraftingState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(WeldError::InvalidState {
                expected: expected.name(),
                actual: self.state.name(),
            })
        }
    }

    pub fn state(&self) -> CraftingState {
        self.state
    }

    /// True while a camera move is still in progress
    pub fn is_camera_moving(&self) -> bool {
        self.transition.is_active()
    }

    pub fn camera(&self) -> Pose {
        self.camera
    }

    pub fn object_a(&self) -> Option<&PlacedObject> {
        self.object_a.as_ref()
    }

    pub fn object_b(&self) -> Option<&PlacedObject> {
        self.object_b.as_ref()
    }
}
