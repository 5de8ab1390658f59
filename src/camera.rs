use glam::{Mat4, Vec3};

const MIN_POLAR: f32 = 0.05;
const MAX_POLAR: f32 = std::f32::consts::PI - 0.05;
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 50.0;

/// Perspective camera looking at a fixed target
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
}

impl Camera {
    pub fn new(position: Vec3, fov_y_degrees: f32) -> Self {
        Self {
            position,
            target: Vec3::ZERO,
            fov_y_degrees,
        }
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize()
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let projection =
            Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, 0.1, 100.0);
        projection * self.view()
    }
}

/// Pointer input relevant to orbiting, already mapped from window events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// Primary-button drag in logical pixels
    Drag { dx: f32, dy: f32 },
    /// Wheel scroll, positive away from the user
    Scroll { amount: f32 },
    /// Secondary-button drag in logical pixels
    Pan { dx: f32, dy: f32 },
}

/// Orbit-style camera controls around a fixed look-at point
///
/// Maintains spherical coordinates (azimuth around Y, polar from +Y) for the
/// camera eye. Zoom and pan can be disabled independently; a disabled input
/// leaves the state untouched rather than being clamped after the fact.
#[derive(Debug, Clone, Copy)]
pub struct OrbitControls {
    pub target: Vec3,
    pub distance: f32,
    pub azimuth: f32,
    pub polar: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
}

impl OrbitControls {
    /// Derive orbit state from the camera's current eye and target
    pub fn from_camera(camera: &Camera) -> Self {
        let offset = camera.position - camera.target;
        let distance = offset.length().max(MIN_DISTANCE);
        let polar = (offset.y / distance).clamp(-1.0, 1.0).acos();
        let azimuth = offset.x.atan2(offset.z);

        Self {
            target: camera.target,
            distance,
            azimuth,
            polar: polar.clamp(MIN_POLAR, MAX_POLAR),
            rotate_speed: 0.005,
            zoom_speed: 0.25,
            pan_speed: 0.002,
            enable_rotate: true,
            enable_zoom: true,
            enable_pan: true,
        }
    }

    pub fn with_zoom(mut self, enabled: bool) -> Self {
        self.enable_zoom = enabled;
        self
    }

    pub fn with_pan(mut self, enabled: bool) -> Self {
        self.enable_pan = enabled;
        self
    }

    /// Route one pointer action into the orbit state
    pub fn handle(&mut self, action: PointerAction) {
        match action {
            PointerAction::Drag { dx, dy } => self.rotate(dx, dy),
            PointerAction::Scroll { amount } => self.zoom(amount),
            PointerAction::Pan { dx, dy } => self.pan(dx, dy),
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        if !self.enable_rotate {
            return;
        }
        self.azimuth -= dx * self.rotate_speed;
        self.polar = (self.polar - dy * self.rotate_speed).clamp(MIN_POLAR, MAX_POLAR);
    }

    pub fn zoom(&mut self, amount: f32) {
        if !self.enable_zoom {
            return;
        }
        self.distance = (self.distance - amount * self.zoom_speed).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        if !self.enable_pan {
            return;
        }
        let eye = self.eye();
        let forward = (self.target - eye).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward).normalize();

        let scale = self.distance * self.pan_speed;
        self.target += right * (-dx * scale) + up * (dy * scale);
    }

    /// Camera eye position for the current orbit state
    pub fn eye(&self) -> Vec3 {
        let sin_polar = self.polar.sin();
        self.target
            + self.distance
                * Vec3::new(
                    sin_polar * self.azimuth.sin(),
                    self.polar.cos(),
                    sin_polar * self.azimuth.cos(),
                )
    }

    /// Write the orbit state back into the camera
    pub fn apply(&self, camera: &mut Camera) {
        camera.position = self.eye();
        camera.target = self.target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero_camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 7.0), 50.0)
    }

    #[test]
    fn orbit_state_matches_camera_eye() {
        let camera = hero_camera();
        let controls = OrbitControls::from_camera(&camera);

        let eye = controls.eye();
        assert!(
            (eye - camera.position).length() < 1e-4,
            "derived eye should match the camera, got {:?}",
            eye
        );
        assert!((controls.distance - 7.0).abs() < 1e-4);
    }

    #[test]
    fn drag_changes_angles_but_not_distance() {
        let camera = hero_camera();
        let mut controls = OrbitControls::from_camera(&camera);
        let (azimuth, polar, distance) = (controls.azimuth, controls.polar, controls.distance);

        controls.handle(PointerAction::Drag { dx: 40.0, dy: -25.0 });

        assert!(controls.azimuth != azimuth);
        assert!(controls.polar != polar);
        assert_eq!(controls.distance, distance);
        assert_eq!(controls.target, Vec3::ZERO);
    }

    #[test]
    fn disabled_zoom_is_a_no_op() {
        let camera = hero_camera();
        let mut controls = OrbitControls::from_camera(&camera).with_zoom(false);
        let before = controls.distance;

        controls.handle(PointerAction::Scroll { amount: 3.0 });
        controls.handle(PointerAction::Scroll { amount: -3.0 });

        assert_eq!(controls.distance, before);
        assert!((controls.eye() - camera.position).length() < 1e-4);
    }

    #[test]
    fn disabled_pan_is_a_no_op() {
        let camera = hero_camera();
        let mut controls = OrbitControls::from_camera(&camera).with_pan(false);

        controls.handle(PointerAction::Pan { dx: 15.0, dy: -8.0 });

        assert_eq!(controls.target, Vec3::ZERO);
    }

    #[test]
    fn enabled_zoom_moves_along_view_axis_only() {
        let camera = hero_camera();
        let mut controls = OrbitControls::from_camera(&camera);

        controls.handle(PointerAction::Scroll { amount: 4.0 });

        assert!(controls.distance < 7.0);
        assert_eq!(controls.target, Vec3::ZERO);
    }

    #[test]
    fn polar_angle_is_clamped_at_the_poles() {
        let camera = hero_camera();
        let mut controls = OrbitControls::from_camera(&camera);

        controls.rotate(0.0, 10_000.0);
        assert!(controls.polar >= MIN_POLAR);

        controls.rotate(0.0, -20_000.0);
        assert!(controls.polar <= MAX_POLAR);
    }

    #[test]
    fn apply_writes_eye_and_target() {
        let mut camera = hero_camera();
        let mut controls = OrbitControls::from_camera(&camera);

        controls.rotate(120.0, 0.0);
        controls.apply(&mut camera);

        assert!((camera.position.length() - 7.0).abs() < 1e-3);
        assert_eq!(camera.target, Vec3::ZERO);
    }
}
