use crate::core::types::Number;
use std::fmt::Debug;

pub mod aabb;
pub mod intersect;
pub mod math;
pub mod ray;
pub mod token;
pub mod validate;

/// A simple marker trait that enforces a few other traits we need
/// in the engine, so that scenes can be shared between render threads
pub trait ComponentRequirements: Clone + Debug + Send + Sync {}
impl<T: Clone + Debug + Send + Sync> ComponentRequirements for T {}

/// Tolerance used for self-intersection guards on primitives, and for containment tests on bounding boxes
pub const RAY_EPSILON: Number = 1e-8;
