/// Triangle extraction for the fabrication backend
///
/// The payload is built from the raw local-space vertex buffer. Vertices are
/// deduplicated by exact value: two coordinates that differ in the last bit,
/// or only in sign (`0` and `-0`), are different points.
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CoreError, Result};
use crate::geometry::{Vertex, TRIANGLE_STRIDE};
use crate::mesh::Mesh;

/// Triangles and their distinct corner points, in buffer order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub triangles: Vec<[Vertex; 3]>,
    pub unique_points: Vec<Vertex>,
}

impl ExportPayload {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Canonical identity of a vertex: its exact coordinates as text.
///
/// `f32` display is the shortest string that parses back to the same value,
/// so equal keys mean bit-equal coordinates (NaN payloads aside).
pub fn vertex_key(vertex: &Vertex) -> String {
    format!("{},{},{}", vertex[0], vertex[1], vertex[2])
}

pub fn extract_triangles(mesh: &Mesh) -> Result<ExportPayload> {
    extract_from_positions(&mesh.geometry.positions)
}

/// Split a flat `[x, y, z, ...]` buffer into triangles and collect each
/// distinct vertex the first time it appears.
pub fn extract_from_positions(positions: &[f32]) -> Result<ExportPayload> {
    if positions.len() % TRIANGLE_STRIDE != 0 {
        return Err(CoreError::InvalidGeometry {
            len: positions.len(),
        });
    }

    let triangle_count = positions.len() / TRIANGLE_STRIDE;
    let mut payload = ExportPayload {
        triangles: Vec::with_capacity(triangle_count),
        unique_points: Vec::new(),
    };
    let mut seen = HashSet::new();

    for chunk in positions.chunks_exact(TRIANGLE_STRIDE) {
        let triangle = [
            [chunk[0], chunk[1], chunk[2]],
            [chunk[3], chunk[4], chunk[5]],
            [chunk[6], chunk[7], chunk[8]],
        ];
        for vertex in &triangle {
            if seen.insert(vertex_key(vertex)) {
                payload.unique_points.push(*vertex);
            }
        }
        payload.triangles.push(triangle);
    }

    info!(
        triangles = payload.triangles.len(),
        unique_points = payload.unique_points.len(),
        "extracted export payload"
    );
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;

    #[test]
    fn test_cube_dedup() {
        let mesh = Mesh::new(Geometry::cube(1.0));
        let payload = extract_triangles(&mesh).unwrap();

        assert_eq!(payload.triangles.len(), 12);
        assert_eq!(payload.unique_points.len(), 8);
        for triangle in &payload.triangles {
            for vertex in triangle {
                assert!(payload.unique_points.contains(vertex));
            }
        }
    }

    #[test]
    fn test_first_seen_order() {
        let positions = [
            1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, //
            0.0, 0.0, 1.0, 2.0, 2.0, 2.0, 1.0, 0.0, 0.0,
        ];
        let payload = extract_from_positions(&positions).unwrap();

        assert_eq!(
            payload.unique_points,
            vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [2.0, 2.0, 2.0]]
        );
        assert_eq!(payload.triangles[1], [[0.0, 0.0, 1.0], [2.0, 2.0, 2.0], [1.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_invalid_length() {
        let result = extract_from_positions(&[0.0; 10]);
        assert!(matches!(result, Err(CoreError::InvalidGeometry { len: 10 })));
    }

    #[test]
    fn test_empty_buffer() {
        let payload = extract_from_positions(&[]).unwrap();
        assert!(payload.triangles.is_empty());
        assert!(payload.unique_points.is_empty());
    }

    #[test]
    fn test_no_tolerance_in_keys() {
        let nudged = f32::from_bits(0.5f32.to_bits() + 1);
        let positions = [
            0.5, 0.0, 0.0, nudged, 0.0, 0.0, 0.0, 0.0, 0.0, //
            -0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0,
        ];
        let payload = extract_from_positions(&positions).unwrap();

        // 0.5, nudged, 0 and -0 are all distinct
        assert_eq!(payload.unique_points.len(), 4);
    }

    #[test]
    fn test_vertex_key() {
        assert_eq!(vertex_key(&[1.0, -0.5, 0.1]), "1,-0.5,0.1");
        assert_ne!(vertex_key(&[0.0, 0.0, 0.0]), vertex_key(&[-0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_json_shape() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.5, 0.0];
        let json = extract_from_positions(&positions).unwrap().to_json().unwrap();

        assert_eq!(
            json,
            r#"{"triangles":[[[0.0,0.0,0.0],[1.0,0.0,0.0],[0.0,1.5,0.0]]],"uniquePoints":[[0.0,0.0,0.0],[1.0,0.0,0.0],[0.0,1.5,0.0]]}"#
        );
    }
}
