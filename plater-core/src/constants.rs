//! Fixed limits of the work surface
//!
//! These are not configurable: the table footprint, the ground plane and the
//! allowed scale range are properties of the machine the payload is sent to.

// =============================================================================
// TABLE
// =============================================================================

/// Side length of the square table footprint, centered at the origin.
pub const TABLE_SIZE: f32 = 200.0;

/// Half of [`TABLE_SIZE`]; the footprint spans `[-TABLE_HALF_SIZE, TABLE_HALF_SIZE]`
/// on both x and z.
pub const TABLE_HALF_SIZE: f32 = TABLE_SIZE / 2.0;

/// Height of the ground plane.
pub const GROUND_LEVEL: f32 = 0.0;

/// Distance above the ground plane that still counts as resting on it.
///
/// Grounding shifts leave a residue of a few ulps of the mesh's size; anything
/// within this band is left alone by [`crate::grounding::lower_to_ground`].
pub const GROUND_TOLERANCE: f32 = 1e-4;

// =============================================================================
// SCALE
// =============================================================================

/// Smallest scale factor allowed on any axis.
pub const MIN_SCALE: f32 = 0.1;

/// Largest scale factor allowed on any axis.
pub const MAX_SCALE: f32 = 10.0;
