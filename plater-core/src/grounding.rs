/// Rest a floating mesh on the ground plane
use tracing::info;

use crate::bounds::{self, Aabb};
use crate::constants::{GROUND_LEVEL, GROUND_TOLERANCE};
use crate::mesh::Mesh;

/// Drop the mesh straight down until its lowest point touches the ground.
///
/// Meshes already on (or, transiently, below) the ground are left where they
/// are; sinking is the constraint engine's concern. Returns the current box.
pub fn lower_to_ground(mesh: &mut Mesh) -> Aabb {
    let aabb = bounds::compute(mesh);
    let gap = aabb.min.y - GROUND_LEVEL;
    if gap <= GROUND_TOLERANCE {
        return aabb;
    }

    info!(gap, "lowering mesh to ground");
    settle_on_ground(mesh, aabb.min.y)
}

/// Move the mesh vertically so that a box bottom at `min_y` lands on the
/// ground, and return the resulting box.
///
/// The first shift rounds at the magnitude of the old height and can leave
/// a residue of one ulp of it. The second shift runs near the ground, where
/// the residue is a few ulps of the mesh's own size.
pub(crate) fn settle_on_ground(mesh: &mut Mesh, min_y: f32) -> Aabb {
    mesh.transform.position.y -= min_y - GROUND_LEVEL;
    let aabb = bounds::compute(mesh);
    mesh.transform.position.y -= aabb.min.y - GROUND_LEVEL;
    bounds::compute(mesh)
}
