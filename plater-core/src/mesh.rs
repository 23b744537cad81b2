/// The manipulated solid: geometry plus its placement
use crate::geometry::Geometry;
use crate::transform::Transform;

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub transform: Transform,
}

impl Mesh {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            transform: Transform::identity(),
        }
    }
}
