/// Axis-aligned bounding boxes and the world-space box of a mesh
use nalgebra::{Point3, Vector3};

use crate::mesh::Mesh;

/// An axis-aligned bounding box.
///
/// A box built from at least one point satisfies `min <= max` on every axis.
/// [`Aabb::empty`] is the exception: it starts inverted so the first
/// [`Aabb::expand_to_include`] snaps both corners to that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    /// Create a box from two corners, swapping components where needed.
    pub fn new(a: Point3<f32>, b: Point3<f32>) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    pub fn expand_to_include(&mut self, point: &Point3<f32>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Edge lengths; zero for an empty box.
    pub fn size(&self) -> Vector3<f32> {
        if self.is_empty() {
            Vector3::zeros()
        } else {
            self.max - self.min
        }
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// The eight corners, bottom face first.
    pub fn corners(&self) -> [Point3<f32>; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(hi.x, hi.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
        ]
    }
}

/// World-space bounding box of a mesh under its current transform.
///
/// Every vertex is pushed through the model matrix, so the box is tight for
/// rotated meshes too. One pass over the vertex buffer, no side effects.
pub fn compute(mesh: &Mesh) -> Aabb {
    let model = mesh.transform.model_matrix();
    let mut aabb = Aabb::empty();
    for point in mesh.geometry.points() {
        aabb.expand_to_include(&model.transform_point(&point));
    }
    aabb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::transform::RotationState;

    fn cube_mesh() -> Mesh {
        Mesh::new(Geometry::cube(2.0))
    }

    #[test]
    fn test_empty_box() {
        let aabb = Aabb::empty();
        assert!(aabb.is_empty());
        assert_eq!(aabb.size(), Vector3::zeros());
    }

    #[test]
    fn test_new_orders_corners() {
        let aabb = Aabb::new(Point3::new(1.0, -1.0, 5.0), Point3::new(-1.0, 1.0, 2.0));
        assert_eq!(aabb.min, Point3::new(-1.0, -1.0, 2.0));
        assert_eq!(aabb.max, Point3::new(1.0, 1.0, 5.0));
    }

    #[test]
    fn test_compute_identity() {
        let aabb = compute(&cube_mesh());
        assert_eq!(aabb.min, Point3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_compute_applies_translation_and_scale() {
        let mut mesh = cube_mesh();
        mesh.transform.position = Vector3::new(10.0, 5.0, -3.0);
        mesh.transform.scale = Vector3::new(2.0, 1.0, 0.5);

        let aabb = compute(&mesh);
        assert!((aabb.min - Point3::new(8.0, 4.0, -3.5)).norm() < 1e-5);
        assert!((aabb.max - Point3::new(12.0, 6.0, -2.5)).norm() < 1e-5);
    }

    #[test]
    fn test_compute_rotated_box_grows() {
        let mut mesh = cube_mesh();
        mesh.transform.rotation = RotationState::new(0.0, std::f32::consts::FRAC_PI_4, 0.0);

        let size = compute(&mesh).size();
        let diagonal = 2.0 * std::f32::consts::SQRT_2;
        assert!((size.x - diagonal).abs() < 1e-5);
        assert!((size.y - 2.0).abs() < 1e-5);
        assert!((size.z - diagonal).abs() < 1e-5);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let mut mesh = cube_mesh();
        mesh.transform.position = Vector3::new(1.25, 7.5, -42.0);
        mesh.transform.rotation = RotationState::new(0.3, 1.1, -0.7);
        mesh.transform.scale = Vector3::new(1.5, 0.25, 3.0);

        assert_eq!(compute(&mesh), compute(&mesh));
    }

    #[test]
    fn test_box_min_not_above_max() {
        let mut mesh = cube_mesh();
        mesh.transform.scale = Vector3::new(-2.0, 1.0, -0.5);

        let aabb = compute(&mesh);
        assert!(aabb.min.x <= aabb.max.x);
        assert!(aabb.min.y <= aabb.max.y);
        assert!(aabb.min.z <= aabb.max.z);
    }
}
