/// Corrective clamps applied after every manipulation delta
///
/// Nothing here rejects an interaction. A mesh pushed below the ground, off
/// the table or past the scale limits is moved or rescaled back into range.
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::bounds::{self, Aabb};
use crate::constants::{GROUND_LEVEL, MAX_SCALE, MIN_SCALE, TABLE_HALF_SIZE};
use crate::error::CoreError;
use crate::grounding;
use crate::mesh::Mesh;

/// Interaction mode of the manipulation widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Translate => "translate",
            Mode::Rotate => "rotate",
            Mode::Scale => "scale",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "translate" => Ok(Mode::Translate),
            "rotate" => Ok(Mode::Rotate),
            "scale" => Ok(Mode::Scale),
            other => Err(CoreError::UnknownMode(other.to_string())),
        }
    }
}

/// Pull the mesh back into a valid placement after a manipulation delta.
///
/// Returns the bounding box of the final transform.
pub fn on_transform_changed(mesh: &mut Mesh, mode: Mode) -> Aabb {
    let aabb = bounds::compute(mesh);

    clamp_to_ground(mesh, &aabb);

    // Only the negative x edge gets this pre-clamp; it moves min.x to 0, not
    // to the table edge. The symmetric clamp below handles everything else.
    if aabb.min.x < -TABLE_HALF_SIZE {
        debug!(min_x = aabb.min.x, "mesh past negative x edge");
        mesh.transform.position.x -= aabb.min.x;
    }

    clamp_to_table(mesh, &aabb);

    if mode == Mode::Scale && clamp_scale(mesh) {
        // The box from above no longer matches the geometry
        let rescaled = bounds::compute(mesh);
        clamp_to_ground(mesh, &rescaled);
    }

    bounds::compute(mesh)
}

fn clamp_to_ground(mesh: &mut Mesh, aabb: &Aabb) {
    if aabb.min.y < GROUND_LEVEL {
        debug!(min_y = aabb.min.y, "mesh below ground");
        grounding::settle_on_ground(mesh, aabb.min.y);
    }
}

/// Keep the footprint centered within the table on x and z.
///
/// Works on the mesh origin and the box half-size. A mesh wider than the
/// table ends up centered on the edge it was pushed past last, overhanging
/// the other one.
fn clamp_to_table(mesh: &mut Mesh, aabb: &Aabb) {
    // Translation does not change the size, so the box from before the
    // ground and x pre-clamps is still valid here.
    let half = aabb.size() / 2.0;
    clamp_axis(&mut mesh.transform.position.x, half.x);
    clamp_axis(&mut mesh.transform.position.z, half.z);
}

fn clamp_axis(coord: &mut f32, half: f32) {
    if *coord + half > TABLE_HALF_SIZE {
        debug!(coord = *coord, half, "mesh past positive table edge");
        *coord = TABLE_HALF_SIZE - half;
    }
    if *coord - half < -TABLE_HALF_SIZE {
        debug!(coord = *coord, half, "mesh past negative table edge");
        *coord = -TABLE_HALF_SIZE + half;
    }
}

/// Clamp each scale factor into `[MIN_SCALE, MAX_SCALE]`. Returns whether
/// anything changed.
fn clamp_scale(mesh: &mut Mesh) -> bool {
    let scale = &mut mesh.transform.scale;
    let clamped = scale.map(|s| s.clamp(MIN_SCALE, MAX_SCALE));
    if clamped == *scale {
        return false;
    }

    debug!(?scale, ?clamped, "scale out of range");
    *scale = clamped;
    true
}
