/// Plater Core Library - placement constraints and triangle export
///
/// Keeps a loaded mesh physically valid on the work table (resting on the
/// ground, inside the footprint, within scale limits) and turns its vertex
/// buffer into a deduplicated triangle payload.

pub mod bounds;
pub mod constants;
pub mod constraints;
pub mod error;
pub mod export;
pub mod geometry;
pub mod grounding;
pub mod mesh;
pub mod session;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use bounds::Aabb;
pub use constraints::Mode;
pub use error::{CoreError, Result};
pub use export::ExportPayload;
pub use geometry::{Geometry, Triangle, Vertex};
pub use mesh::Mesh;
pub use session::Session;
pub use transform::{RotationState, Transform};
