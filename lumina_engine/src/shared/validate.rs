//! Debug-only invariant checks. All of these compile to nothing in release builds

use crate::core::types::{Number, Point2, Vector3};
use crate::shared::intersect::MeshIntersection;
use approx::relative_eq;
use std::borrow::Borrow;

macro_rules! debug_assert_only {
    () => {
        if cfg!(not(debug_assertions)) {
            return;
        }
    };
}

pub const EPSILON: Number = 1e-6;

#[inline(always)]
#[track_caller]
pub fn number(val: impl Borrow<Number>) {
    debug_assert_only!();

    let val = val.borrow();
    assert!(!val.is_nan(), "should not be nan; val: {val}");
}

#[inline(always)]
#[track_caller]
pub fn vector3(v: impl Borrow<Vector3>) {
    debug_assert_only!();
    let v = v.borrow();
    assert!(!v.is_nan(), "should not be nan; vec: {v:?}");
}

#[inline(always)]
#[track_caller]
pub fn normal3(n: impl Borrow<Vector3>) {
    debug_assert_only!();
    let n = n.borrow();
    vector3(n);
    assert!(
        relative_eq!(n.length(), 1., epsilon = EPSILON),
        "should be normalised; vec: {n:?}, len: {:?}",
        n.length()
    );
}

#[inline(always)]
#[track_caller]
pub fn uv(uv: impl Borrow<Point2>) {
    debug_assert_only!();
    let uv = uv.borrow();
    assert!(!uv.is_nan(), "should not be nan; uvs: {uv:?}");
}

/// Asserts that a local-space intersection returned by a mesh was valid
#[inline(always)]
#[track_caller]
pub fn mesh_intersection(intersect: impl Borrow<MeshIntersection>) {
    debug_assert_only!();

    let intersect = intersect.borrow();
    number(intersect.dist);
    assert!(intersect.dist >= 0., "intersect dist {} should be positive", intersect.dist);
    uv(intersect.uv);
    normal3(intersect.normal);
}
