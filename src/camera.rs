//! Orbit camera and perspective projection state.
//!
//! The camera circles a fixed center point: yaw and pitch place the eye on a
//! sphere of radius `distance`, the view matrix looks back at the center.
//! Mouse drags feed [`CameraController::handle_mouse`], the scroll wheel
//! zooms.

use cgmath::{Matrix4, Point3, Rad, Vector3, Vector4};
use winit::event::MouseScrollDelta;

use crate::math;

/// Closest the eye may get to the center.
const MIN_DISTANCE: f32 = 1.5;
/// Farthest the eye may get from the center.
const MAX_DISTANCE: f32 = 80.0;
/// Keep the pitch just off the poles so the up vector never degenerates.
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.05;

#[derive(Debug)]
pub struct Camera {
    pub center: Point3<f32>,
    pub distance: f32,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        center: V,
        distance: f32,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            center: center.into(),
            distance,
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// Eye position: `(0, 0, distance)` rotated by the Y*X*Z Euler angles,
    /// offset from the center.
    pub fn eye(&self) -> Point3<f32> {
        let offset = math::from_euler_yxz(Vector3::new(self.pitch.0, self.yaw.0, 0.0))
            * Vector4::new(0.0, 0.0, self.distance, 0.0);
        self.center + offset.truncate()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        math::look_at(self.eye(), self.center, Vector3::unit_y())
    }

    /// Rotate the eye around the center. Pitch is clamped away from the
    /// poles.
    pub fn orbit(&mut self, delta_yaw: Rad<f32>, delta_pitch: Rad<f32>) {
        self.yaw += delta_yaw;
        self.pitch = Rad((self.pitch + delta_pitch).0.clamp(-MAX_PITCH, MAX_PITCH));
    }

    /// Move the eye along the view direction, clamped to a sane range.
    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance - amount).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

/// Translates raw winit input deltas into camera motion.
#[derive(Debug)]
pub struct CameraController {
    rotate_speed: f32,
    zoom_speed: f32,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
        }
    }

    /// Apply a mouse drag delta (pixels) as an orbit.
    pub fn handle_mouse(&self, camera: &mut Camera, dx: f64, dy: f64) {
        camera.orbit(
            Rad(-dx as f32 * self.rotate_speed),
            Rad(-dy as f32 * self.rotate_speed),
        );
    }

    /// Apply a scroll wheel delta as a zoom.
    pub fn handle_scroll(&self, camera: &mut Camera, delta: &MouseScrollDelta) {
        let amount = match delta {
            MouseScrollDelta::LineDelta(_, rows) => *rows * self.zoom_speed,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.05 * self.zoom_speed,
        };
        camera.zoom(amount);
    }
}

/// Perspective projection parameters, updated on resize.
#[derive(Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// The projection matrix for right-handed view space, depth in [0, 1].
    pub fn matrix(&self) -> Matrix4<f32> {
        math::perspective(self.fovy.0, self.znear, self.zfar, self.aspect, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::Deg;

    #[test]
    fn neutral_camera_sits_on_positive_z() {
        let camera = Camera::new((0.0, 0.0, 0.0), 5.0, Deg(0.0), Deg(0.0));
        let eye = camera.eye();
        assert_relative_eq!(eye.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(eye.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(eye.z, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn negative_pitch_raises_the_eye() {
        let camera = Camera::new((0.0, 0.0, 0.0), 5.0, Deg(0.0), Deg(-30.0));
        assert!(camera.eye().y > 0.0);
    }

    #[test]
    fn orbit_clamps_the_pitch() {
        let mut camera = Camera::new((0.0, 0.0, 0.0), 5.0, Deg(0.0), Deg(0.0));
        camera.orbit(Rad(0.0), Rad(10.0));
        assert!(camera.pitch.0 <= MAX_PITCH);
        camera.orbit(Rad(0.0), Rad(-20.0));
        assert!(camera.pitch.0 >= -MAX_PITCH);
    }

    #[test]
    fn zoom_clamps_the_distance() {
        let mut camera = Camera::new((0.0, 0.0, 0.0), 5.0, Deg(0.0), Deg(0.0));
        camera.zoom(1000.0);
        assert_eq!(camera.distance, MIN_DISTANCE);
        camera.zoom(-1000.0);
        assert_eq!(camera.distance, MAX_DISTANCE);
    }

    #[test]
    fn view_matrix_centers_the_target() {
        let camera = Camera::new((1.0, 2.0, 3.0), 8.0, Deg(40.0), Deg(-20.0));
        let center = camera.view_matrix() * Vector4::new(1.0, 2.0, 3.0, 1.0);
        assert_relative_eq!(center.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(center.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(center.z, -8.0, epsilon = 1e-4);
    }

    #[test]
    fn resize_updates_the_aspect() {
        let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 500.0);
        projection.resize(1600, 600);
        let m = projection.matrix();
        // Twice the aspect halves the x scale.
        let reference = Projection::new(800, 600, Deg(45.0), 0.1, 500.0).matrix();
        assert_relative_eq!(m.x.x, reference.x.x / 2.0, epsilon = 1e-6);
    }
}
