use super::shape::Shape;

/// Narrow-phase overlap test consumed by the world step. Implementations
/// must be symmetric: `collides(a, b) == collides(b, a)`.
pub trait CollisionTest: Send + Sync {
    fn collides(&self, a: &Shape, b: &Shape) -> bool;
}

/// Axis-aligned bounding-box overlap.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingBoxes;

impl CollisionTest for BoundingBoxes {
    fn collides(&self, a: &Shape, b: &Shape) -> bool {
        a.bounds().intersects(&b.bounds())
    }
}
