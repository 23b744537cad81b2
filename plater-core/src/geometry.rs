/// Triangle-soup geometry backed by a flat vertex buffer
use nalgebra::{Point3, Vector3};

use crate::bounds::Aabb;

/// A vertex position as it appears in an export payload.
pub type Vertex = [f32; 3];

/// Scalars per vertex (x, y, z).
pub const VERTEX_STRIDE: usize = 3;

/// Scalars per triangle (3 vertices × 3 coordinates).
pub const TRIANGLE_STRIDE: usize = 9;

/// A triangle borrowed from a [`Geometry`] buffer.
///
/// Each vertex is a three-scalar window into the buffer, not a copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle<'a> {
    pub vertices: [&'a [f32]; 3],
}

impl<'a> Triangle<'a> {
    fn from_chunk(chunk: &'a [f32]) -> Self {
        Self {
            vertices: [&chunk[0..3], &chunk[3..6], &chunk[6..9]],
        }
    }

    /// Copy out the coordinates of vertex `i` (0, 1 or 2).
    pub fn vertex(&self, i: usize) -> Vertex {
        let v = self.vertices[i];
        [v[0], v[1], v[2]]
    }

    pub fn point(&self, i: usize) -> Point3<f32> {
        let [x, y, z] = self.vertex(i);
        Point3::new(x, y, z)
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.point(0);
        let edge1 = self.point(1) - v0;
        let edge2 = self.point(2) - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// Non-indexed triangle geometry in the mesh's local space.
///
/// `positions` holds x, y, z for every vertex, three vertices per triangle.
/// `normals` uses the same layout and may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
}

impl Geometry {
    pub fn new(positions: Vec<f32>) -> Self {
        Self {
            positions,
            normals: Vec::new(),
        }
    }

    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(triangles * TRIANGLE_STRIDE),
            normals: Vec::with_capacity(triangles * TRIANGLE_STRIDE),
        }
    }

    /// Append one triangle, replicating the facet normal on each vertex.
    pub fn push_triangle(&mut self, vertices: [Vertex; 3], normal: Vertex) {
        for vertex in vertices {
            self.positions.extend_from_slice(&vertex);
            self.normals.extend_from_slice(&normal);
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / VERTEX_STRIDE
    }

    /// Number of complete triangles in the buffer.
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / TRIANGLE_STRIDE
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    /// Stored normal of triangle `index`, taken from its first vertex.
    ///
    /// `None` when no normals were loaded or the stored one is zero, as many
    /// STL exporters leave it.
    pub fn facet_normal(&self, index: usize) -> Option<Vector3<f32>> {
        let start = index * TRIANGLE_STRIDE;
        let n = self.normals.get(start..start + VERTEX_STRIDE)?;
        let normal = Vector3::new(n[0], n[1], n[2]);
        (normal != Vector3::zeros()).then_some(normal)
    }

    /// Iterate over complete triangles; a trailing partial triangle is skipped.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle<'_>> + '_ {
        self.positions
            .chunks_exact(TRIANGLE_STRIDE)
            .map(Triangle::from_chunk)
    }

    pub fn points(&self) -> impl Iterator<Item = Point3<f32>> + '_ {
        self.positions
            .chunks_exact(VERTEX_STRIDE)
            .map(|p| Point3::new(p[0], p[1], p[2]))
    }

    /// Bounding box in local space, without any transform applied.
    pub fn bounding_box(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        for point in self.points() {
            aabb.expand_to_include(&point);
        }
        aabb
    }

    /// Translate the geometry so its local bounding box is centered on the
    /// origin. Returns the offset that was applied.
    pub fn center(&mut self) -> Vector3<f32> {
        let aabb = self.bounding_box();
        if aabb.is_empty() {
            return Vector3::zeros();
        }

        let offset = -aabb.center().coords;
        for p in self.positions.chunks_exact_mut(VERTEX_STRIDE) {
            p[0] += offset.x;
            p[1] += offset.y;
            p[2] += offset.z;
        }
        offset
    }

    /// Create an axis-aligned cube centered at the origin: 12 triangles over
    /// 8 shared corners.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        // (normal, quad corners counter-clockwise seen from outside)
        let faces: [(Vertex, [Vertex; 4]); 6] = [
            // Front
            ([0.0, 0.0, 1.0], [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]]),
            // Back
            ([0.0, 0.0, -1.0], [[-h, -h, -h], [-h, h, -h], [h, h, -h], [h, -h, -h]]),
            // Top
            ([0.0, 1.0, 0.0], [[-h, h, -h], [-h, h, h], [h, h, h], [h, h, -h]]),
            // Bottom
            ([0.0, -1.0, 0.0], [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]]),
            // Right
            ([1.0, 0.0, 0.0], [[h, -h, -h], [h, h, -h], [h, h, h], [h, -h, h]]),
            // Left
            ([-1.0, 0.0, 0.0], [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]]),
        ];

        let mut geometry = Self::with_capacity(12);
        for (normal, [a, b, c, d]) in faces {
            geometry.push_triangle([a, b, c], normal);
            geometry.push_triangle([a, c, d], normal);
        }
        geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        let cube = Geometry::cube(2.0);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.vertex_count(), 36);
        assert_eq!(cube.normals.len(), cube.positions.len());
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = Geometry::cube(2.0);
        for (i, triangle) in cube.triangles().enumerate() {
            let stored = cube.facet_normal(i).unwrap();
            let computed = triangle.calculate_normal();
            assert!((computed - stored).norm() < 1e-6);
        }
    }

    #[test]
    fn test_facet_normal_missing_or_zero() {
        let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        assert_eq!(Geometry::new(positions).facet_normal(0), None);

        let mut geometry = Geometry::default();
        geometry.push_triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], [0.0; 3]);
        assert_eq!(geometry.facet_normal(0), None);
        assert_eq!(geometry.facet_normal(1), None);

        geometry.push_triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], [0.0, 0.0, 1.0]);
        assert_eq!(geometry.facet_normal(1), Some(Vector3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_triangles_borrow_buffer() {
        let geometry = Geometry::new(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let triangle = geometry.triangles().next().unwrap();
        assert_eq!(triangle.vertex(1), [3.0, 4.0, 5.0]);
        assert!(std::ptr::eq(triangle.vertices[0].as_ptr(), geometry.positions.as_ptr()));
    }

    #[test]
    fn test_partial_triangle_is_skipped() {
        let geometry = Geometry::new(vec![0.0; 10]);
        assert_eq!(geometry.triangle_count(), 1);
        assert_eq!(geometry.triangles().count(), 1);
    }

    #[test]
    fn test_center_moves_box_to_origin() {
        let mut geometry = Geometry::cube(1.0);
        for p in geometry.positions.chunks_exact_mut(3) {
            p[0] += 10.0;
            p[1] += 3.0;
        }

        let offset = geometry.center();
        assert!((offset.x + 10.0).abs() < 1e-6);
        assert!((offset.y + 3.0).abs() < 1e-6);

        let aabb = geometry.bounding_box();
        assert!(aabb.center().coords.norm() < 1e-6);
        assert!((aabb.min.y + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_center_empty_is_noop() {
        let mut geometry = Geometry::default();
        assert_eq!(geometry.center(), Vector3::zeros());
        assert!(geometry.bounding_box().is_empty());
    }
}
