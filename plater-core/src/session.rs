/// Session state for one plating workspace
///
/// Holds the single active mesh, the bounding box currently on display and
/// the manipulation mode. Every action that needs a mesh is skipped when none
/// is loaded.
use nalgebra::Vector3;
use tracing::{debug, info};

use crate::bounds::{self, Aabb};
use crate::constraints::{self, Mode};
use crate::error::{CoreError, Result};
use crate::export::{self, ExportPayload};
use crate::geometry::Geometry;
use crate::grounding;
use crate::mesh::Mesh;
use crate::stl;
use crate::transform::Transform;

#[derive(Debug, Default)]
pub struct Session {
    mesh: Option<Mesh>,
    bounding_box: Option<Aabb>,
    mode: Mode,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    /// The box last computed for display, if a mesh is loaded.
    pub fn bounding_box(&self) -> Option<&Aabb> {
        self.bounding_box.as_ref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            info!(from = %self.mode, to = %mode, "mode changed");
        }
        self.mode = mode;
    }

    /// Replace the active mesh.
    ///
    /// The geometry is re-centered on its local origin and lifted so that it
    /// starts resting on the ground. No constraint pass runs here.
    pub fn load(&mut self, mut geometry: Geometry) -> Result<()> {
        if geometry.is_empty() {
            return Err(CoreError::EmptyGeometry);
        }

        geometry.center();
        let local = geometry.bounding_box();

        let mut mesh = Mesh::new(geometry);
        mesh.transform.position.y = local.max.y;

        if self.mesh.is_some() {
            debug!("replacing active mesh");
        }
        info!(
            triangles = mesh.geometry.triangle_count(),
            size = ?local.size(),
            "mesh loaded"
        );

        self.bounding_box = Some(bounds::compute(&mesh));
        self.mesh = Some(mesh);
        Ok(())
    }

    pub fn load_stl(&mut self, data: &[u8]) -> Result<()> {
        let geometry = stl::parse_stl(data)?;
        self.load(geometry)
    }

    /// Apply a drag delta in the current mode, then run the constraint pass.
    ///
    /// Translate adds to the position, rotate adds radians per axis and scale
    /// adds to the per-axis scale factors.
    pub fn drag(&mut self, delta: Vector3<f32>) {
        let mode = self.mode;
        let Some(mesh) = self.mesh.as_mut() else {
            return;
        };

        let transform = &mut mesh.transform;
        match mode {
            Mode::Translate => transform.position += delta,
            Mode::Rotate => transform.rotation.rotate(delta.x, delta.y, delta.z),
            Mode::Scale => transform.scale += delta,
        }
        self.transform_changed();
    }

    /// Run the constraint pass on the active mesh after an external change to
    /// its transform.
    pub fn transform_changed(&mut self) {
        if let Some(mesh) = self.mesh.as_mut() {
            self.bounding_box = Some(constraints::on_transform_changed(mesh, self.mode));
        }
    }

    /// Direct access to the transform for an external manipulation widget.
    /// Follow up with [`Session::transform_changed`].
    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        self.mesh.as_mut().map(|mesh| &mut mesh.transform)
    }

    /// Back to the identity transform. The result is not constrained, so a
    /// centered mesh ends up half below the ground until the next drag.
    pub fn reset_transform(&mut self) {
        if let Some(mesh) = self.mesh.as_mut() {
            mesh.transform = Transform::identity();
            self.bounding_box = Some(bounds::compute(mesh));
            info!("transform reset");
        }
    }

    pub fn lower_to_ground(&mut self) {
        if let Some(mesh) = self.mesh.as_mut() {
            self.bounding_box = Some(grounding::lower_to_ground(mesh));
        }
    }

    /// Build the export payload, or `None` when no mesh is loaded.
    pub fn export(&self) -> Result<Option<ExportPayload>> {
        self.mesh.as_ref().map(export::extract_triangles).transpose()
    }
}
