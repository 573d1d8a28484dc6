//! Touch gesture interpretation: pick up, drag and swipe-throw a ball
//!
//! A press ray-casts for a ball. Holding drags it under the finger. Letting
//! go either throws it (fast upward swipe) or drops it gently.

use glam::{Vec2, Vec3};

use super::host::{Camera, EntityId, PhysicsHost};
use crate::lerp_clamped;
use crate::tuning::Tuning;

/// Phase of the primary touch, as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Moved,
    Stationary,
    Ended,
    Canceled,
}

/// Primary touch sample for this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub phase: TouchPhase,
    pub position: Vec2,
}

/// Raw pointer state for one frame (mouse emulation plus optional touch)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerInput {
    /// Mouse button went down this frame
    pub mouse_pressed: bool,
    /// Mouse button is down
    pub mouse_held: bool,
    /// Mouse button went up this frame
    pub mouse_released: bool,
    pub mouse_position: Vec2,
    /// Primary touch, if any finger is on screen
    pub touch: Option<TouchSample>,
}

impl PointerInput {
    pub fn touch(phase: TouchPhase, position: Vec2) -> Self {
        Self {
            touch: Some(TouchSample { phase, position }),
            ..Default::default()
        }
    }

    pub fn mouse_down(position: Vec2) -> Self {
        Self {
            mouse_pressed: true,
            mouse_held: true,
            mouse_position: position,
            ..Default::default()
        }
    }

    pub fn mouse_drag(position: Vec2) -> Self {
        Self {
            mouse_held: true,
            mouse_position: position,
            ..Default::default()
        }
    }

    pub fn mouse_up(position: Vec2) -> Self {
        Self {
            mouse_released: true,
            mouse_position: position,
            ..Default::default()
        }
    }

    /// Collapse mouse and touch into one pointer (touch wins)
    pub fn resolve(&self) -> PointerFrame {
        let touch_phase = self.touch.map(|t| t.phase);
        PointerFrame {
            down: self.mouse_pressed || touch_phase == Some(TouchPhase::Began),
            held: self.mouse_held || self.touch.is_some(),
            up: self.mouse_released
                || matches!(touch_phase, Some(TouchPhase::Ended | TouchPhase::Canceled)),
            position: self.touch.map_or(self.mouse_position, |t| t.position),
        }
    }
}

/// Resolved pointer state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerFrame {
    pub down: bool,
    pub held: bool,
    pub up: bool,
    /// Screen position, origin bottom-left
    pub position: Vec2,
}

/// The ball currently in the player's hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeldBall {
    pub entity: EntityId,
    pub has_body: bool,
    pub has_collider: bool,
    /// Body was switched to kinematic on pickup and must be restored
    pub kinematic_override: bool,
}

/// Computed throw for a qualifying swipe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowImpulse {
    /// Unit length, `y >= min_throw_lift`
    pub direction: Vec3,
    /// Clamped to [min_throw_force, max_throw_force]
    pub force: f32,
    pub swipe_delta: Vec2,
    /// px/s
    pub swipe_speed: f32,
}

impl ThrowImpulse {
    pub fn velocity(&self) -> Vec3 {
        self.direction * self.force
    }
}

/// What a gesture did this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    PickedUp { entity: EntityId },
    Thrown { entity: EntityId, impulse: ThrowImpulse },
    Released { entity: EntityId },
}

/// Swipe speed in px/s if the swipe should become a throw
///
/// Needs positive elapsed time, speed at or above `min_speed` and an
/// upward (positive Y) displacement.
pub fn swipe_throw_speed(delta: Vec2, elapsed: f32, min_speed: f32) -> Option<f32> {
    if !(elapsed > 0.0) {
        return None;
    }
    let speed = delta.length() / elapsed;
    (speed.is_finite() && speed >= min_speed && delta.y > 0.0).then_some(speed)
}

/// Raise a unit direction so its vertical component is at least `min_lift`
///
/// The horizontal heading is kept; the result is unit length.
pub fn enforce_min_lift(direction: Vec3, min_lift: f32) -> Vec3 {
    if direction.y >= min_lift {
        return direction;
    }
    let heading = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
    if heading == Vec3::ZERO {
        return Vec3::Y;
    }
    heading * (1.0 - min_lift * min_lift).max(0.0).sqrt() + Vec3::Y * min_lift
}

/// Convert a screen swipe into a world-space throw
pub fn throw_impulse(
    camera: &Camera,
    swipe_delta: Vec2,
    swipe_speed: f32,
    tuning: &Tuning,
) -> ThrowImpulse {
    // Fractions of the screen, roughly -1..1
    let horizontal = swipe_delta.x / camera.viewport.x.max(1.0);
    let vertical = swipe_delta.y / camera.viewport.y.max(1.0);

    let bent = camera.forward()
        + camera.right() * horizontal * tuning.swipe_sensitivity
        + camera.up() * vertical * tuning.swipe_sensitivity;
    let direction = enforce_min_lift(bent.normalize_or_zero(), tuning.min_throw_lift);

    // max/min rather than clamp: inverted bounds must not panic mid-throw
    let force = (swipe_speed / 100.0 * tuning.throw_force_multiplier)
        .max(tuning.min_throw_force)
        .min(tuning.max_throw_force);

    ThrowImpulse {
        direction,
        force,
        swipe_delta,
        swipe_speed,
    }
}

/// One frame of a held ball chasing the pointer
///
/// The ball keeps its distance from the camera and its world Z; `t` is the
/// lerp factor for this frame.
pub fn follow_step(camera: &Camera, current: Vec3, pointer: Vec2, t: f32) -> Vec3 {
    let depth = camera.position.distance(current);
    let world = camera.screen_to_world(pointer, depth);
    let target = Vec3::new(world.x, world.y, current.z);
    lerp_clamped(current, target, t)
}

/// Per-frame gesture state machine
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    held: Option<HeldBall>,
    dragging: bool,
    touch_start: Vec2,
    touch_current: Vec2,
    touch_start_time: f32,
    /// Seconds since the tracker was created
    clock: f32,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self) -> Option<&HeldBall> {
        self.held.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Process one frame of pointer input
    pub fn update<H: PhysicsHost + ?Sized>(
        &mut self,
        host: &mut H,
        camera: &Camera,
        pointer: &PointerFrame,
        tuning: &Tuning,
        dt: f32,
    ) -> Option<GestureEvent> {
        self.clock += dt;
        let event = self.handle_input(host, camera, pointer, tuning);

        if self.dragging {
            self.follow_pointer(host, camera, tuning, dt);
        }
        event
    }

    fn handle_input<H: PhysicsHost + ?Sized>(
        &mut self,
        host: &mut H,
        camera: &Camera,
        pointer: &PointerFrame,
        tuning: &Tuning,
    ) -> Option<GestureEvent> {
        if pointer.down {
            self.touch_start = pointer.position;
            self.touch_current = pointer.position;
            self.touch_start_time = self.clock;
            log::debug!("Pointer down at {:?}", pointer.position);

            if self.held.is_none() {
                return self.try_pickup(host, camera, pointer.position, tuning);
            }
            return None;
        }

        let held = self.held?;

        // Release is checked before hold: an ended touch still counts as held
        if pointer.up {
            self.touch_current = pointer.position;
            if !self.dragging {
                // Tap without drag
                return Some(self.release(host, held));
            }

            let elapsed = self.clock - self.touch_start_time;
            let delta = self.touch_current - self.touch_start;
            return match swipe_throw_speed(delta, elapsed, tuning.min_swipe_speed) {
                Some(speed) if held.has_body => {
                    Some(self.throw(host, held, throw_impulse(camera, delta, speed, tuning)))
                }
                _ => Some(self.release(host, held)),
            };
        }

        if pointer.held {
            self.touch_current = pointer.position;
            self.dragging = true;
        }
        None
    }

    fn try_pickup<H: PhysicsHost + ?Sized>(
        &mut self,
        host: &mut H,
        camera: &Camera,
        screen: Vec2,
        tuning: &Tuning,
    ) -> Option<GestureEvent> {
        let ray = camera.screen_point_to_ray(screen);
        let hits = host.raycast_all(&ray, tuning.max_pickup_distance);
        log::debug!("Pickup ray {:?} -> {:?}: {} hits", ray.origin, ray.direction, hits.len());

        // Balls behind other objects are still pickable
        let Some(hit) = hits
            .iter()
            .find(|h| h.tag == tuning.ball_tag && h.layer == tuning.ball_layer)
        else {
            log::debug!("No '{}' ball under pointer", tuning.ball_tag);
            return None;
        };

        let entity = hit.entity;
        let has_body = host.has_body(entity);
        if has_body {
            host.set_kinematic(entity, true);
            host.set_velocity(entity, Vec3::ZERO);
            host.set_angular_velocity(entity, Vec3::ZERO);
        }
        self.held = Some(HeldBall {
            entity,
            has_body,
            has_collider: host.has_collider(entity),
            kinematic_override: has_body,
        });
        self.dragging = false;
        log::info!("Picked up ball {:?}", entity);
        Some(GestureEvent::PickedUp { entity })
    }

    /// Move the held ball toward the pointer at its current camera distance
    fn follow_pointer<H: PhysicsHost + ?Sized>(
        &mut self,
        host: &mut H,
        camera: &Camera,
        tuning: &Tuning,
        dt: f32,
    ) {
        let Some(held) = self.held else {
            return;
        };
        let Some(current) = host.position(held.entity) else {
            return;
        };
        let next = follow_step(
            camera,
            current,
            self.touch_current,
            tuning.hold_follow_rate * dt,
        );
        host.set_position(held.entity, next);
    }

    fn restore_physics<H: PhysicsHost + ?Sized>(host: &mut H, held: &HeldBall) {
        if held.kinematic_override {
            host.set_kinematic(held.entity, false);
        }
        if held.has_collider {
            host.set_collider_trigger(held.entity, false);
        }
    }

    fn throw<H: PhysicsHost + ?Sized>(
        &mut self,
        host: &mut H,
        held: HeldBall,
        impulse: ThrowImpulse,
    ) -> GestureEvent {
        Self::restore_physics(host, &held);
        host.set_velocity(held.entity, impulse.velocity());
        log::info!(
            "Threw ball {:?} with force {:.1}, direction {:?}",
            held.entity,
            impulse.force,
            impulse.direction
        );
        log::debug!(
            "Swipe delta {:?}, speed {:.1} px/s",
            impulse.swipe_delta,
            impulse.swipe_speed
        );
        self.clear();
        GestureEvent::Thrown {
            entity: held.entity,
            impulse,
        }
    }

    fn release<H: PhysicsHost + ?Sized>(&mut self, host: &mut H, held: HeldBall) -> GestureEvent {
        Self::restore_physics(host, &held);
        log::info!("Released ball {:?}", held.entity);
        self.clear();
        GestureEvent::Released {
            entity: held.entity,
        }
    }

    fn clear(&mut self) {
        self.held = None;
        self.dragging = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::Sandbox;

    fn setup() -> (Sandbox, Camera, EntityId) {
        let camera = Camera::default();
        let mut sandbox = Sandbox::new();
        // Straight ahead of the default camera
        let ball = sandbox.spawn_ball(camera.position + Vec3::Z * 3.0, 0.12);
        (sandbox, camera, ball)
    }

    fn step(
        tracker: &mut GestureTracker,
        sandbox: &mut Sandbox,
        camera: &Camera,
        input: PointerInput,
    ) -> Option<GestureEvent> {
        tracker.update(sandbox, camera, &input.resolve(), &Tuning::default(), 0.1)
    }

    #[test]
    fn test_touch_wins_over_mouse() {
        let input = PointerInput {
            mouse_position: Vec2::new(1.0, 1.0),
            touch: Some(TouchSample {
                phase: TouchPhase::Moved,
                position: Vec2::new(50.0, 60.0),
            }),
            ..Default::default()
        };
        let frame = input.resolve();
        assert_eq!(frame.position, Vec2::new(50.0, 60.0));
        assert!(frame.held);
        assert!(!frame.down);
    }

    #[test]
    fn test_pickup_makes_ball_kinematic() {
        let (mut sandbox, camera, ball) = setup();
        let mut tracker = GestureTracker::new();
        let center = camera.viewport * 0.5;

        let event = step(&mut tracker, &mut sandbox, &camera, PointerInput::mouse_down(center));
        assert_eq!(event, Some(GestureEvent::PickedUp { entity: ball }));
        assert!(sandbox.body(ball).unwrap().kinematic);
        assert_eq!(tracker.held().map(|h| h.entity), Some(ball));
    }

    #[test]
    fn test_pickup_ignores_wrong_tag() {
        let camera = Camera::default();
        let mut sandbox = Sandbox::new();
        sandbox.spawn_prop("hoop", 9, camera.position + Vec3::Z * 3.0, 0.5);
        let mut tracker = GestureTracker::new();

        let event = step(
            &mut tracker,
            &mut sandbox,
            &camera,
            PointerInput::mouse_down(camera.viewport * 0.5),
        );
        assert_eq!(event, None);
        assert!(tracker.held().is_none());
    }

    #[test]
    fn test_pickup_sees_ball_behind_prop() {
        let (mut sandbox, camera, ball) = setup();
        sandbox.spawn_prop("glass", 0, camera.position + Vec3::Z * 1.5, 0.3);
        let mut tracker = GestureTracker::new();

        let event = step(
            &mut tracker,
            &mut sandbox,
            &camera,
            PointerInput::mouse_down(camera.viewport * 0.5),
        );
        assert_eq!(event, Some(GestureEvent::PickedUp { entity: ball }));
    }

    #[test]
    fn test_tap_releases_gently() {
        let (mut sandbox, camera, ball) = setup();
        let mut tracker = GestureTracker::new();
        let center = camera.viewport * 0.5;

        step(&mut tracker, &mut sandbox, &camera, PointerInput::mouse_down(center));
        let event = step(&mut tracker, &mut sandbox, &camera, PointerInput::mouse_up(center));
        assert_eq!(event, Some(GestureEvent::Released { entity: ball }));

        let body = sandbox.body(ball).unwrap();
        assert!(!body.kinematic);
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_fast_upward_swipe_throws() {
        let (mut sandbox, camera, ball) = setup();
        let mut tracker = GestureTracker::new();
        let start = camera.viewport * 0.5;
        let end = start + Vec2::new(0.0, 400.0);

        step(&mut tracker, &mut sandbox, &camera, PointerInput::mouse_down(start));
        step(&mut tracker, &mut sandbox, &camera, PointerInput::mouse_drag(end));
        let event = step(&mut tracker, &mut sandbox, &camera, PointerInput::mouse_up(end));

        // 400 px over 0.2 s = 2000 px/s -> 300 force, clamped to 50
        let Some(GestureEvent::Thrown { entity, impulse }) = event else {
            panic!("expected a throw, got {event:?}");
        };
        assert_eq!(entity, ball);
        assert_eq!(impulse.force, 50.0);
        assert!(impulse.direction.y >= 0.3);

        let body = sandbox.body(ball).unwrap();
        assert!(!body.kinematic);
        assert!((body.velocity - impulse.velocity()).length() < 1e-4);
    }

    #[test]
    fn test_downward_swipe_drops() {
        let (mut sandbox, camera, ball) = setup();
        let mut tracker = GestureTracker::new();
        let start = camera.viewport * 0.5;
        let end = start - Vec2::new(0.0, 400.0);

        step(&mut tracker, &mut sandbox, &camera, PointerInput::mouse_down(start));
        step(&mut tracker, &mut sandbox, &camera, PointerInput::mouse_drag(end));
        let event = step(&mut tracker, &mut sandbox, &camera, PointerInput::mouse_up(end));
        assert_eq!(event, Some(GestureEvent::Released { entity: ball }));
    }

    #[test]
    fn test_touch_ended_releases_even_though_touch_present() {
        let (mut sandbox, camera, ball) = setup();
        let mut tracker = GestureTracker::new();
        let center = camera.viewport * 0.5;

        step(&mut tracker, &mut sandbox, &camera, PointerInput::touch(TouchPhase::Began, center));
        step(&mut tracker, &mut sandbox, &camera, PointerInput::touch(TouchPhase::Moved, center));
        let event = step(
            &mut tracker,
            &mut sandbox,
            &camera,
            PointerInput::touch(TouchPhase::Ended, center),
        );
        assert_eq!(event, Some(GestureEvent::Released { entity: ball }));
        assert!(tracker.held().is_none());
    }

    #[test]
    fn test_drag_moves_ball_toward_pointer() {
        let (mut sandbox, camera, ball) = setup();
        let mut tracker = GestureTracker::new();
        let center = camera.viewport * 0.5;
        let right = center + Vec2::new(300.0, 0.0);

        step(&mut tracker, &mut sandbox, &camera, PointerInput::mouse_down(center));
        let before = sandbox.body(ball).unwrap().position;
        step(&mut tracker, &mut sandbox, &camera, PointerInput::mouse_drag(right));
        let after = sandbox.body(ball).unwrap().position;

        assert!(tracker.is_dragging());
        assert!(after.x > before.x);
        assert_eq!(after.z, before.z);
    }

    #[test]
    fn test_throw_and_release_turn_trigger_mode_off() {
        for swipe in [Vec2::ZERO, Vec2::new(0.0, 400.0)] {
            let (mut sandbox, camera, ball) = setup();
            sandbox.body_mut(ball).unwrap().is_trigger = true;
            let mut tracker = GestureTracker::new();
            let start = camera.viewport * 0.5;

            step(&mut tracker, &mut sandbox, &camera, PointerInput::mouse_down(start));
            step(&mut tracker, &mut sandbox, &camera, PointerInput::mouse_drag(start + swipe));
            let event = step(
                &mut tracker,
                &mut sandbox,
                &camera,
                PointerInput::mouse_up(start + swipe),
            );

            assert!(event.is_some());
            let body = sandbox.body(ball).unwrap();
            assert!(!body.is_trigger, "trigger left on after {event:?}");
            assert!(!body.kinematic);
        }
    }

    #[test]
    fn test_inverted_force_bounds_do_not_panic() {
        let tuning = Tuning {
            min_throw_force: 60.0,
            max_throw_force: 10.0,
            ..Tuning::default()
        };
        let impulse = throw_impulse(&Camera::default(), Vec2::new(0.0, 500.0), 2000.0, &tuning);
        assert_eq!(impulse.force, 10.0);
    }

    #[test]
    fn test_follow_step_keeps_depth_axis() {
        let camera = Camera::default();
        let current = camera.position + Vec3::Z * 3.0;
        let next = follow_step(&camera, current, camera.viewport * 0.5 + Vec2::X * 200.0, 0.5);
        assert_eq!(next.z, current.z);
        assert!(next.x > current.x);
        // Full step lands on the pointer's world point
        let snapped = follow_step(&camera, current, camera.viewport * 0.5, 1.0);
        assert!((snapped - current).length() < 1e-4);
    }

    #[test]
    fn test_swipe_speed_rules() {
        assert!(swipe_throw_speed(Vec2::new(0.0, 100.0), 0.5, 150.0).is_some());
        assert!(swipe_throw_speed(Vec2::new(0.0, 10.0), 0.5, 150.0).is_none());
        assert!(swipe_throw_speed(Vec2::new(300.0, 0.0), 0.1, 150.0).is_none());
        assert!(swipe_throw_speed(Vec2::new(0.0, 100.0), 0.0, 150.0).is_none());
    }

    #[test]
    fn test_min_lift_keeps_heading() {
        let dir = enforce_min_lift(Vec3::new(0.0, 0.0, 1.0), 0.3);
        assert!((dir.y - 0.3).abs() < 1e-6);
        assert!(dir.z > 0.0);
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert_eq!(enforce_min_lift(Vec3::NEG_Y, 0.3), Vec3::Y);
    }
}
