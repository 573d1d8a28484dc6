//! Minimal in-memory host
//!
//! Spheres under gravity above a flat floor, sphere ray-casts, and box/ring
//! trigger volumes that report entries once. There is no body-body
//! collision; this only exists so the simulation can run headless.

use std::collections::BTreeSet;

use glam::{Vec2, Vec3};

use crate::consts::{BALL_LAYER, BALL_TAG};
use crate::sim::{Camera, EntityId, PhysicsHost, Ray, RayHit, TriggerOverlap, TriggerZone};
use crate::tuning::Tuning;

pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);
const FLOOR_RESTITUTION: f32 = 0.6;
const FLOOR_FRICTION: f32 = 0.98;

/// Default tuning scaled for [`Sandbox::court`]
///
/// Sandbox balls have unit mass and no drag, so stock forces send every
/// throw over the hoop. The higher sensitivity lets an on-screen swipe bend
/// the throw up to the rim from the free-throw spot.
pub fn court_tuning() -> Tuning {
    Tuning {
        throw_force_multiplier: 1.0,
        min_throw_force: 4.0,
        max_throw_force: 12.0,
        swipe_sensitivity: 3.0,
        ..Tuning::default()
    }
}

/// A simulated object
#[derive(Debug, Clone, PartialEq)]
pub struct SandboxBody {
    pub entity: EntityId,
    pub tag: String,
    pub layer: u32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub radius: f32,
    pub kinematic: bool,
    pub is_trigger: bool,
    pub has_body: bool,
    pub has_collider: bool,
}

/// Trigger volume shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerShape {
    Box { min: Vec3, max: Vec3 },
    /// Horizontal ring (torus) around `center`
    Ring {
        center: Vec3,
        radius: f32,
        thickness: f32,
    },
}

impl TriggerShape {
    /// Does a sphere overlap this volume?
    pub fn overlaps_sphere(&self, center: Vec3, radius: f32) -> bool {
        match *self {
            TriggerShape::Box { min, max } => {
                let closest = center.clamp(min, max);
                closest.distance_squared(center) <= radius * radius
            }
            TriggerShape::Ring {
                center: ring_center,
                radius: ring_radius,
                thickness,
            } => {
                let d = center - ring_center;
                let radial = Vec2::new(d.x, d.z).length() - ring_radius;
                let reach = thickness + radius;
                radial * radial + d.y * d.y <= reach * reach
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerVolume {
    pub zone: TriggerZone,
    pub shape: TriggerShape,
}

/// Basket geometry for [`Sandbox::court`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hoop {
    pub center: Vec3,
    pub radius: f32,
}

impl Default for Hoop {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, 3.05, 7.0),
            radius: 0.23,
        }
    }
}

impl Hoop {
    pub fn trigger_volumes(&self) -> [TriggerVolume; 3] {
        let half = Vec3::new(self.radius, 0.0, self.radius);
        let c = self.center;
        [
            TriggerVolume {
                zone: TriggerZone::Top,
                shape: TriggerShape::Box {
                    min: c - half + Vec3::Y * 0.1,
                    max: c + half + Vec3::Y * 0.3,
                },
            },
            TriggerVolume {
                zone: TriggerZone::Ring,
                shape: TriggerShape::Ring {
                    center: c,
                    radius: self.radius,
                    thickness: 0.02,
                },
            },
            TriggerVolume {
                zone: TriggerZone::Bottom,
                shape: TriggerShape::Box {
                    min: c - half - Vec3::Y * 0.35,
                    max: c + half - Vec3::Y * 0.2,
                },
            },
        ]
    }
}

/// In-memory physics host
#[derive(Debug, Clone)]
pub struct Sandbox {
    bodies: Vec<SandboxBody>,
    volumes: Vec<TriggerVolume>,
    gravity: Vec3,
    floor_y: f32,
    /// (volume index, entity) pairs currently overlapping
    inside: BTreeSet<(usize, EntityId)>,
    next_id: u32,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            volumes: Vec::new(),
            gravity: GRAVITY,
            floor_y: 0.0,
            inside: BTreeSet::new(),
            next_id: 1,
        }
    }

    /// A hoop, `balls` balls lined up on the floor and a camera behind them
    pub fn court(balls: usize) -> (Self, Camera, Hoop) {
        let mut sandbox = Self::new();
        let hoop = Hoop::default();
        for volume in hoop.trigger_volumes() {
            sandbox.add_trigger(volume.zone, volume.shape);
        }

        let spacing = 0.4;
        let offset = (balls.saturating_sub(1)) as f32 * spacing * 0.5;
        for i in 0..balls {
            let x = i as f32 * spacing - offset;
            sandbox.spawn_ball(Vec3::new(x, 0.12, 1.5), 0.12);
        }

        let camera = Camera::looking_at(
            Vec3::new(0.0, 1.6, -1.0),
            Vec3::new(0.0, 0.9, 6.0),
            60f32.to_radians(),
            Vec2::new(1080.0, 1920.0),
        );
        (sandbox, camera, hoop)
    }

    fn alloc_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn a tagged ball on the ball layer
    pub fn spawn_ball(&mut self, position: Vec3, radius: f32) -> EntityId {
        self.spawn_prop(BALL_TAG, BALL_LAYER, position, radius)
    }

    /// Spawn any sphere with a body and collider
    pub fn spawn_prop(&mut self, tag: &str, layer: u32, position: Vec3, radius: f32) -> EntityId {
        let entity = self.alloc_id();
        self.bodies.push(SandboxBody {
            entity,
            tag: tag.to_string(),
            layer,
            position,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            radius,
            kinematic: false,
            is_trigger: false,
            has_body: true,
            has_collider: true,
        });
        entity
    }

    pub fn add_trigger(&mut self, zone: TriggerZone, shape: TriggerShape) {
        self.volumes.push(TriggerVolume { zone, shape });
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    pub fn body(&self, entity: EntityId) -> Option<&SandboxBody> {
        self.bodies.iter().find(|b| b.entity == entity)
    }

    pub fn body_mut(&mut self, entity: EntityId) -> Option<&mut SandboxBody> {
        self.bodies.iter_mut().find(|b| b.entity == entity)
    }

    pub fn bodies(&self) -> &[SandboxBody] {
        &self.bodies
    }

    /// Integrate one step and return trigger entries, volume order first
    pub fn step(&mut self, dt: f32) -> Vec<TriggerOverlap> {
        for body in self.bodies.iter_mut() {
            if !body.has_body || body.kinematic {
                continue;
            }
            body.velocity += self.gravity * dt;
            body.position += body.velocity * dt;

            let floor = self.floor_y + body.radius;
            if body.position.y < floor {
                body.position.y = floor;
                if body.velocity.y < 0.0 {
                    body.velocity.y = -body.velocity.y * FLOOR_RESTITUTION;
                }
                body.velocity.x *= FLOOR_FRICTION;
                body.velocity.z *= FLOOR_FRICTION;
            }
        }

        let mut entered = Vec::new();
        for (index, volume) in self.volumes.iter().enumerate() {
            for body in self.bodies.iter().filter(|b| b.has_collider) {
                let key = (index, body.entity);
                if volume.shape.overlaps_sphere(body.position, body.radius) {
                    if self.inside.insert(key) {
                        entered.push(TriggerOverlap {
                            zone: volume.zone,
                            entity: body.entity,
                            tag: body.tag.clone(),
                        });
                    }
                } else {
                    self.inside.remove(&key);
                }
            }
        }
        entered
    }
}

/// Nearest non-negative hit distance of a ray against a sphere
fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let near = -b - root;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + root;
    (far >= 0.0).then_some(far)
}

impl PhysicsHost for Sandbox {
    fn raycast_all(&self, ray: &Ray, max_distance: f32) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self
            .bodies
            .iter()
            .filter(|b| b.has_collider)
            .filter_map(|b| {
                let distance = ray_sphere(ray, b.position, b.radius)?;
                (distance <= max_distance).then(|| RayHit {
                    entity: b.entity,
                    tag: b.tag.clone(),
                    layer: b.layer,
                    point: ray.at(distance),
                    distance,
                })
            })
            .collect();
        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits
    }

    fn has_body(&self, entity: EntityId) -> bool {
        self.body(entity).is_some_and(|b| b.has_body)
    }

    fn has_collider(&self, entity: EntityId) -> bool {
        self.body(entity).is_some_and(|b| b.has_collider)
    }

    fn position(&self, entity: EntityId) -> Option<Vec3> {
        self.body(entity).map(|b| b.position)
    }

    fn set_position(&mut self, entity: EntityId, position: Vec3) {
        if let Some(body) = self.body_mut(entity) {
            body.position = position;
        }
    }

    fn velocity(&self, entity: EntityId) -> Option<Vec3> {
        self.body(entity).filter(|b| b.has_body).map(|b| b.velocity)
    }

    fn set_velocity(&mut self, entity: EntityId, velocity: Vec3) {
        if let Some(body) = self.body_mut(entity).filter(|b| b.has_body) {
            body.velocity = velocity;
        }
    }

    fn set_angular_velocity(&mut self, entity: EntityId, angular: Vec3) {
        if let Some(body) = self.body_mut(entity).filter(|b| b.has_body) {
            body.angular_velocity = angular;
        }
    }

    fn set_kinematic(&mut self, entity: EntityId, kinematic: bool) {
        if let Some(body) = self.body_mut(entity).filter(|b| b.has_body) {
            body.kinematic = kinematic;
        }
    }

    fn set_collider_trigger(&mut self, entity: EntityId, is_trigger: bool) {
        if let Some(body) = self.body_mut(entity).filter(|b| b.has_collider) {
            body.is_trigger = is_trigger;
        }
    }

    fn count_tagged(&self, tag: &str) -> usize {
        self.bodies.iter().filter(|b| b.tag == tag).count()
    }
}
