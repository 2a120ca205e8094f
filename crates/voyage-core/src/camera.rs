//! Camera description and the flight controller that moves it between cities.
//!
//! A flight is a plain value ([`CameraAnimation`]) sampled with an absolute
//! timestamp, so a skipped frame never accumulates drift. The
//! [`CameraController`] owns the camera while the globe view is mounted: it
//! starts a flight whenever the store's active city changes, keeps the store's
//! `camera_flying` flag in step with the flight, and clears it on unmount.

use crate::city::{CityRegistry, CitySlug};
use crate::constants::{
    ExperienceParams, AUTO_ROTATE_RADIANS_PER_SEC, DEFAULT_VIEW_DISTANCE, DEFAULT_VIEW_LAT,
    DEFAULT_VIEW_LNG, MAX_PITCH_RADIANS, MAX_VIEW_DISTANCE, MIN_VIEW_DISTANCE,
};
use crate::env::Clock;
use crate::geo::{camera_position_for_city, ease_in_out_cubic, project_to_sphere};
use crate::store::{AppStore, Subscription};
use glam::{Mat4, Quat, Vec3};
use std::cell::RefCell;
use std::rc::Rc;

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: camera_position_for_city(DEFAULT_VIEW_LAT, DEFAULT_VIEW_LNG, DEFAULT_VIEW_DISTANCE),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 16.0 / 9.0,
            fovy_radians: std::f32::consts::FRAC_PI_4,
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    #[inline]
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.eye,
            target: self.target,
        }
    }

    #[inline]
    pub fn set_pose(&mut self, pose: CameraPose) {
        self.eye = pose.position;
        self.target = pose.target;
    }
}

/// Where the camera sits and what it looks at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

/// One in-flight transition between two poses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraAnimation {
    pub start_ms: f64,
    pub duration_ms: f64,
    pub start_position: Vec3,
    pub end_position: Vec3,
    pub start_target: Vec3,
    pub end_target: Vec3,
}

/// Interpolated pose for one frame of a flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFrame {
    pub position: Vec3,
    pub target: Vec3,
    /// Linear progress in \[0, 1\], before easing.
    pub progress: f32,
    pub done: bool,
}

impl CameraFrame {
    #[inline]
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            target: self.target,
        }
    }
}

impl CameraAnimation {
    #[inline]
    pub fn progress_at(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    /// True once `now_ms` has reached the end, compared at full precision.
    #[inline]
    pub fn is_done_at(&self, now_ms: f64) -> bool {
        self.duration_ms <= 0.0 || now_ms - self.start_ms >= self.duration_ms
    }

    /// Sample the flight at an absolute time.
    pub fn frame_at(&self, now_ms: f64) -> CameraFrame {
        let done = self.is_done_at(now_ms);
        let progress = if done { 1.0 } else { self.progress_at(now_ms) };
        if done {
            return CameraFrame {
                position: self.end_position,
                target: self.end_target,
                progress,
                done,
            };
        }
        let eased = ease_in_out_cubic(progress);
        CameraFrame {
            position: self.start_position.lerp(self.end_position, eased),
            target: self.start_target.lerp(self.end_target, eased),
            progress,
            done,
        }
    }
}

struct FlightState {
    camera: Camera,
    animation: Option<CameraAnimation>,
}

struct ControllerCore {
    store: AppStore,
    registry: Rc<CityRegistry>,
    clock: Rc<dyn Clock>,
    params: ExperienceParams,
    flight: RefCell<FlightState>,
}

impl ControllerCore {
    fn begin_flight(&self, slug: CitySlug) {
        let Some(city) = self.registry.get(slug) else {
            log::warn!("[camera] no registry entry for '{}'; staying put", slug);
            return;
        };
        let c = city.coordinates();
        let end_position = camera_position_for_city(c.lat, c.lng, self.params.camera_distance);
        let end_target = project_to_sphere(c.lat, c.lng, self.params.globe_radius);
        let reduced = self.store.get_state().reduced_motion_preferred;
        let duration_ms = self.params.flight_duration_ms(reduced);
        let now = self.clock.now_ms();

        self.store.set_camera_flying(true);

        let mut flight = self.flight.borrow_mut();
        if let Some(interrupted) = flight.animation.take() {
            // Restart from wherever the camera is right now, not the old start.
            let frame = interrupted.frame_at(now);
            flight.camera.set_pose(frame.pose());
            log::debug!(
                "[camera] flight interrupted at {:.0}% for {}",
                frame.progress * 100.0,
                slug
            );
        }
        let start = flight.camera.pose();
        flight.animation = Some(CameraAnimation {
            start_ms: now,
            duration_ms,
            start_position: start.position,
            end_position,
            start_target: start.target,
            end_target,
        });
        log::info!("[camera] flying to {} over {:.0}ms", slug, duration_ms);
    }
}

/// Drives the globe camera while the globe view is mounted.
pub struct CameraController {
    core: Rc<ControllerCore>,
    subscription: Option<Subscription>,
}

impl CameraController {
    /// Mount the globe view: mark the globe ready and start reacting to city
    /// selections.
    pub fn mount(
        store: AppStore,
        registry: Rc<CityRegistry>,
        clock: Rc<dyn Clock>,
        params: ExperienceParams,
    ) -> Self {
        let core = Rc::new(ControllerCore {
            store: store.clone(),
            registry,
            clock,
            params,
            flight: RefCell::new(FlightState {
                camera: Camera::default(),
                animation: None,
            }),
        });
        store.set_globe_ready(true);
        let weak = Rc::downgrade(&core);
        let subscription = store.subscribe(
            |s| s.active_city,
            move |city, _previous| {
                if let (Some(slug), Some(core)) = (*city, weak.upgrade()) {
                    core.begin_flight(slug);
                }
            },
        );
        Self {
            core,
            subscription: Some(subscription),
        }
    }

    /// Advance the current flight to `now_ms`. Returns `None` when idle.
    pub fn tick(&self, now_ms: f64) -> Option<CameraFrame> {
        let frame = {
            let mut flight = self.core.flight.borrow_mut();
            let animation = flight.animation?;
            let frame = animation.frame_at(now_ms);
            flight.camera.set_pose(frame.pose());
            if frame.done {
                flight.animation = None;
            }
            frame
        };
        if frame.done {
            self.core.store.set_camera_flying(false);
            log::debug!("[camera] landed");
        }
        Some(frame)
    }

    /// Advance using the controller's own clock.
    pub fn tick_now(&self) -> Option<CameraFrame> {
        self.tick(self.core.clock.now_ms())
    }

    #[inline]
    pub fn is_flying(&self) -> bool {
        self.core.flight.borrow().animation.is_some()
    }

    pub fn animation(&self) -> Option<CameraAnimation> {
        self.core.flight.borrow().animation
    }

    pub fn camera(&self) -> Camera {
        self.core.flight.borrow().camera.clone()
    }

    pub fn pose(&self) -> CameraPose {
        self.core.flight.borrow().camera.pose()
    }

    pub fn set_aspect(&self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.core.flight.borrow_mut().camera.aspect = aspect;
        }
    }

    /// Drag-rotate the view about the globe centre. Ignored mid-flight.
    pub fn orbit(&self, delta_yaw: f32, delta_pitch: f32) -> bool {
        if self.core.store.get_state().camera_flying {
            return false;
        }
        let mut flight = self.core.flight.borrow_mut();
        let camera = &mut flight.camera;
        let yaw = Quat::from_rotation_y(delta_yaw);
        let mut rotation = yaw;
        let eye = yaw * camera.eye;
        let axis = eye.cross(Vec3::Y).normalize_or_zero();
        let radius = eye.length();
        if axis != Vec3::ZERO && radius > 0.0 {
            let elevation = (eye.y / radius).clamp(-1.0, 1.0).asin();
            let allowed = (elevation + delta_pitch).clamp(-MAX_PITCH_RADIANS, MAX_PITCH_RADIANS)
                - elevation;
            rotation = Quat::from_axis_angle(axis, allowed) * yaw;
        }
        camera.eye = rotation * camera.eye;
        camera.target = rotation * camera.target;
        true
    }

    /// Move the eye towards or away from the globe centre. Ignored mid-flight.
    pub fn zoom(&self, delta: f32) -> bool {
        if self.core.store.get_state().camera_flying || !delta.is_finite() {
            return false;
        }
        let mut flight = self.core.flight.borrow_mut();
        let camera = &mut flight.camera;
        let distance = camera.eye.length();
        let direction = camera.eye.normalize_or_zero();
        if direction == Vec3::ZERO {
            return false;
        }
        let next = (distance + delta).clamp(MIN_VIEW_DISTANCE, MAX_VIEW_DISTANCE);
        camera.eye = direction * next;
        true
    }

    /// Idle spin of the globe. Paused while a city is active or hovered, while
    /// flying, and when reduced motion is preferred.
    pub fn auto_rotate(&self, dt_sec: f32) -> bool {
        let state = self.core.store.get_state();
        if state.camera_flying
            || state.active_city.is_some()
            || state.preview_city.is_some()
            || state.reduced_motion_preferred
        {
            return false;
        }
        let spin = Quat::from_rotation_y(AUTO_ROTATE_RADIANS_PER_SEC * dt_sec);
        let mut flight = self.core.flight.borrow_mut();
        flight.camera.eye = spin * flight.camera.eye;
        flight.camera.target = spin * flight.camera.target;
        true
    }

    /// Tear down the globe view. Equivalent to dropping the controller.
    pub fn unmount(self) {}
}

impl Drop for CameraController {
    fn drop(&mut self) {
        self.subscription.take();
        let cancelled = self.core.flight.borrow_mut().animation.take().is_some();
        if cancelled {
            log::debug!("[camera] flight cancelled by unmount");
        }
        self.core.store.set_camera_flying(false);
        self.core.store.set_globe_ready(false);
    }
}
