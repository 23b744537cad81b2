/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

/// Camera looking down onto the table from one side
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            position: Point3::new(0.0, 150.0, -150.0),
            target: Point3::origin(),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: 75f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        };
        camera.resize(width, height);
        camera
    }

    /// Update the aspect ratio for a new terminal size (in cells)
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / (height.max(1) as f32 * CELL_ASPECT);
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unit vector from the target towards the camera
    pub fn view_direction(&self) -> Vector3<f32> {
        (self.position - self.target).normalize()
    }

    /// Project a world-space point to screen space
    ///
    /// Returns `(x, y, depth)` with depth in normalized device coordinates, or
    /// `None` when the point is outside the view frustum.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        view_projection: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let clip = view_projection * point.to_homogeneous();

        // Behind the camera or on the eye plane
        if clip.w < 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.iter().any(|c| !(-1.0..=1.0).contains(c)) {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(80, 20);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
        assert!((camera.fov - 75f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = Camera::new(80, 24);
        let vp = camera.view_projection();
        let (x, y, depth) = camera
            .project_to_screen(&Point3::origin(), &vp, 80, 24)
            .unwrap();

        assert!((x - 40.0).abs() < 1e-3);
        assert!((y - 12.0).abs() < 1e-3);
        assert!((-1.0..=1.0).contains(&depth));
    }

    #[test]
    fn test_point_behind_camera_is_clipped() {
        let camera = Camera::default();
        let vp = camera.view_projection();
        let behind = Point3::new(0.0, 300.0, -300.0);

        assert!(camera.project_to_screen(&behind, &vp, 80, 24).is_none());
    }

    #[test]
    fn test_nearer_point_has_smaller_depth() {
        let camera = Camera::default();
        let vp = camera.view_projection();
        let (_, _, near) = camera
            .project_to_screen(&Point3::new(0.0, 0.0, -50.0), &vp, 80, 24)
            .unwrap();
        let (_, _, far) = camera
            .project_to_screen(&Point3::new(0.0, 0.0, 50.0), &vp, 80, 24)
            .unwrap();

        assert!(near < far);
    }
}
