//! Host engine boundary
//!
//! The simulation never integrates physics or detects collisions itself.
//! The host (a real engine, or [`crate::sandbox::Sandbox`]) answers
//! ray-casts, exposes body velocity/kinematic/trigger toggles, and reports
//! trigger overlaps through [`crate::sim::TickInput`].

use glam::{Mat3, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Stable identity of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// A world-space ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// One intersection reported by the host's ray-cast
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    pub entity: EntityId,
    pub tag: String,
    pub layer: u32,
    pub point: Vec3,
    pub distance: f32,
}

/// The three basket trigger zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriggerZone {
    /// Above the rim; entered while falling to start a score
    Top,
    /// The rim itself
    Ring,
    /// Below the rim; completes a score
    Bottom,
}

/// An object entered a trigger zone this frame
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerOverlap {
    pub zone: TriggerZone,
    pub entity: EntityId,
    pub tag: String,
}

/// Engine services the simulation drives
///
/// Body accessors return `None` / do nothing when the entity has no rigid
/// body (or collider, for the trigger toggle). Callers treat that as
/// "skip the optional step", never as an error.
pub trait PhysicsHost {
    /// All intersections along `ray` up to `max_distance`, nearest first
    fn raycast_all(&self, ray: &Ray, max_distance: f32) -> Vec<RayHit>;

    fn has_body(&self, entity: EntityId) -> bool;
    fn has_collider(&self, entity: EntityId) -> bool;

    fn position(&self, entity: EntityId) -> Option<Vec3>;
    fn set_position(&mut self, entity: EntityId, position: Vec3);

    fn velocity(&self, entity: EntityId) -> Option<Vec3>;
    fn set_velocity(&mut self, entity: EntityId, velocity: Vec3);
    fn set_angular_velocity(&mut self, entity: EntityId, angular: Vec3);

    fn set_kinematic(&mut self, entity: EntityId, kinematic: bool);
    fn set_collider_trigger(&mut self, entity: EntityId, is_trigger: bool);

    /// Number of objects carrying `tag` (used for the round summary)
    fn count_tagged(&self, tag: &str) -> usize;
}

/// Perspective camera used to map screen space to world space
///
/// Screen coordinates have their origin at the bottom-left corner with Y up,
/// matching touch/pointer positions reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Quat,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    /// Viewport size in pixels
    pub viewport: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.6, 0.0),
            rotation: Quat::IDENTITY,
            fov_y: 60f32.to_radians(),
            viewport: Vec2::new(1080.0, 1920.0),
        }
    }
}

impl Camera {
    /// Camera looking from `position` toward `target` with no roll
    pub fn looking_at(position: Vec3, target: Vec3, fov_y: f32, viewport: Vec2) -> Self {
        let forward = (target - position).normalize_or_zero();
        let right = Vec3::Y.cross(forward).normalize_or_zero();
        let rotation = if forward == Vec3::ZERO {
            Quat::IDENTITY
        } else if right == Vec3::ZERO {
            // Looking straight up or down
            Quat::from_rotation_arc(Vec3::Z, forward)
        } else {
            let up = forward.cross(right);
            Quat::from_mat3(&Mat3::from_cols(right, up, forward))
        };
        Self {
            position,
            rotation,
            fov_y,
            viewport,
        }
    }

    /// Camera-space +Z
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Camera-space +X
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Camera-space +Y
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    fn aspect(&self) -> f32 {
        if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        }
    }

    /// Unnormalized direction through `screen` with unit forward component
    fn view_direction(&self, screen: Vec2) -> Vec3 {
        let half_h = (self.fov_y * 0.5).tan();
        let half_w = half_h * self.aspect();
        let ndc = Vec2::new(
            screen.x / self.viewport.x.max(1.0) * 2.0 - 1.0,
            screen.y / self.viewport.y.max(1.0) * 2.0 - 1.0,
        );
        self.forward() + self.right() * (ndc.x * half_w) + self.up() * (ndc.y * half_h)
    }

    /// Ray from the camera through a screen point
    pub fn screen_point_to_ray(&self, screen: Vec2) -> Ray {
        Ray {
            origin: self.position,
            direction: self.view_direction(screen).normalize(),
        }
    }

    /// World point under `screen` at `depth` units along camera forward
    pub fn screen_to_world(&self, screen: Vec2, depth: f32) -> Vec3 {
        self.position + self.view_direction(screen) * depth
    }

    /// Project a world point to screen space (None if behind the camera)
    pub fn world_to_screen(&self, world: Vec3) -> Option<Vec2> {
        let d = world - self.position;
        let depth = d.dot(self.forward());
        if depth <= f32::EPSILON {
            return None;
        }
        let half_h = (self.fov_y * 0.5).tan();
        let half_w = half_h * self.aspect();
        let ndc = Vec2::new(
            d.dot(self.right()) / (depth * half_w),
            d.dot(self.up()) / (depth * half_h),
        );
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (ndc.y + 1.0) * 0.5 * self.viewport.y,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_default_camera_basis() {
        let cam = Camera::default();
        assert!(approx(cam.forward(), Vec3::Z));
        assert!(approx(cam.right(), Vec3::X));
        assert!(approx(cam.up(), Vec3::Y));
    }

    #[test]
    fn test_center_ray_is_forward() {
        let cam = Camera::default();
        let ray = cam.screen_point_to_ray(cam.viewport * 0.5);
        assert!(approx(ray.direction, Vec3::Z));
        assert!(approx(ray.origin, cam.position));
    }

    #[test]
    fn test_screen_world_round_trip() {
        let cam = Camera::looking_at(
            Vec3::new(0.0, 2.0, -4.0),
            Vec3::new(0.0, 3.0, 6.0),
            1.0,
            Vec2::new(800.0, 600.0),
        );
        let screen = Vec2::new(620.0, 150.0);
        let world = cam.screen_to_world(screen, 5.0);
        let back = cam.world_to_screen(world).expect("in front of camera");
        assert!((back - screen).length() < 0.05);
    }

    #[test]
    fn test_looking_at_has_no_roll() {
        let cam = Camera::looking_at(Vec3::ZERO, Vec3::new(1.0, 0.5, 3.0), 1.0, Vec2::ONE);
        assert!(cam.right().y.abs() < 1e-4);
        assert!(cam.up().y > 0.0);
    }

    #[test]
    fn test_behind_camera_does_not_project() {
        let cam = Camera::default();
        assert!(cam.world_to_screen(cam.position - Vec3::Z).is_none());
    }
}
