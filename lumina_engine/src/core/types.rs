/// Numeric type used for most calculations in the engine
pub type Number = f64;
pub type Vector2 = glam::DVec2;
pub type Vector3 = glam::DVec3;
pub type Point2 = glam::DVec2;
pub type Point3 = glam::DVec3;
pub type Matrix3 = glam::DMat3;
/// Affine transform from an object's local space into world space
pub type Transform3 = glam::DAffine3;
/// Linear RGB colour. Channels are not clamped, so lights may be brighter than `1.0`
pub type Colour = glam::DVec3;
/// Numeric identifier used to uniquely mark entities, used in object tokens
pub type IdToken = usize;
