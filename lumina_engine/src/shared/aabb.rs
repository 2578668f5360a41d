use getset::CopyGetters;
use itertools::iproduct;
use once_cell::sync::OnceCell;
use std::borrow::Borrow;

use crate::core::types::{Number, Point3, Transform3, Vector3};
use crate::shared::ray::Ray;
use crate::shared::{ComponentRequirements, RAY_EPSILON};

/// An **Axis-Aligned Bounding Box** (AABB)
///
/// The box spans between the two corners `min` and `max`. A box may also be *empty*, in which case it contains
/// nothing, is never hit by any ray, and adopts the extents of the first box merged into it.
///
/// # Invariants
/// If the box is not empty, `min <= max` holds componentwise
#[derive(CopyGetters, Clone, Debug)]
pub struct BoundingBox {
    empty: bool,
    /// The lower corner of the [BoundingBox]; the corner with the smallest coordinates
    #[getset(get_copy = "pub")]
    min: Point3,
    /// The upper corner of the [BoundingBox]; the corner with the largest coordinates
    #[getset(get_copy = "pub")]
    max: Point3,
    /// Lazily calculated surface area. Unset means the value is stale
    area: OnceCell<Number>,
    /// Lazily calculated volume. Unset means the value is stale
    volume: OnceCell<Number>,
}

// region Constructors

impl BoundingBox {
    /// The empty box, that contains nothing
    pub fn empty() -> Self {
        Self {
            empty: true,
            min: Point3::ZERO,
            max: Point3::ZERO,
            area: OnceCell::new(),
            volume: OnceCell::new(),
        }
    }

    /// Creates a new [BoundingBox] from two points, which do *not* have to be sorted by min/max
    pub fn new(a: impl Into<Point3>, b: impl Into<Point3>) -> Self {
        let (a, b) = (a.into(), b.into());
        Self {
            empty: false,
            min: Point3::min(a, b),
            max: Point3::max(a, b),
            area: OnceCell::new(),
            volume: OnceCell::new(),
        }
    }

    pub fn new_centred(centre: impl Into<Point3>, size: impl Into<Vector3>) -> Self {
        let (centre, size) = (centre.into(), size.into());
        Self::new(centre - size / 2., centre + size / 2.)
    }

    /// Returns a [BoundingBox] that surrounds all the given boxes. Empty if there were no boxes
    pub fn encompass_iter<B: Borrow<Self>>(iter: impl IntoIterator<Item = B>) -> Self {
        iter.into_iter().fold(Self::empty(), |mut acc, b| {
            acc.merge(b.borrow());
            acc
        })
    }

    /// Returns a [BoundingBox] that surrounds all the given points. Empty if there were no points
    pub fn encompass_points<P: Borrow<Point3>>(iter: impl IntoIterator<Item = P>) -> Self {
        iter.into_iter().fold(Self::empty(), |mut acc, p| {
            acc.merge_point(*p.borrow());
            acc
        })
    }
}

impl Default for BoundingBox {
    fn default() -> Self { Self::empty() }
}

// endregion Constructors

// region Merging

impl BoundingBox {
    /// Grows this box so that it contains `other`.
    ///
    /// Merging an empty box is a no-op, and merging into an empty box adopts the other box exactly.
    pub fn merge(&mut self, other: &Self) {
        if other.empty {
            return;
        }
        if self.empty {
            self.min = other.min;
            self.max = other.max;
        } else {
            self.min = self.min.min(other.min);
            self.max = self.max.max(other.max);
        }
        self.empty = false;
        self.invalidate();
    }

    /// Grows this box so that it contains the point `p`
    pub fn merge_point(&mut self, p: Point3) {
        if self.empty {
            self.min = p;
            self.max = p;
        } else {
            self.min = self.min.min(p);
            self.max = self.max.max(p);
        }
        self.empty = false;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.area.take();
        self.volume.take();
    }
}

// endregion Merging

// region Helper

impl BoundingBox {
    /// The difference between [min](fn@Self::min) and [max](fn@Self::max); how large the box is
    pub fn size(&self) -> Vector3 {
        if self.empty {
            Vector3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Whether the box contains nothing at all. A zero-extent box around a single point is *not* empty
    pub fn is_empty(&self) -> bool { self.empty }

    pub fn area(&self) -> Number {
        if self.empty {
            return 0.;
        }
        *self.area.get_or_init(|| {
            let s = self.size();
            2. * ((s.x * s.y) + (s.y * s.z) + (s.z * s.x))
        })
    }

    pub fn volume(&self) -> Number {
        if self.empty {
            return 0.;
        }
        *self.volume.get_or_init(|| {
            let s = self.size();
            s.x * s.y * s.z
        })
    }

    /// Iterates over the 8 corners of the box
    pub fn corners(&self) -> impl Iterator<Item = Point3> {
        let (l, h) = (self.min, self.max);
        iproduct!([l.x, h.x], [l.y, h.y], [l.z, h.z]).map(|(x, y, z)| Point3::new(x, y, z))
    }

    /// Calculates the axis-aligned box that encloses this box, after all its corners are mapped through `transform`
    pub fn transformed(&self, transform: &Transform3) -> Self {
        if self.empty {
            return Self::empty();
        }
        Self::encompass_points(self.corners().map(|c| transform.transform_point3(c)))
    }

    /// Checks whether the point lies inside the box (including the surface), with a small tolerance
    pub fn contains_point(&self, p: Point3) -> bool {
        !self.empty
            && (0..3).all(|i| p[i] + RAY_EPSILON >= self.min[i] && p[i] - RAY_EPSILON <= self.max[i])
    }

    /// Checks whether the two boxes overlap (or touch), with a small tolerance
    pub fn intersects_box(&self, other: &Self) -> bool {
        !self.empty
            && !other.empty
            && (0..3).all(|i| other.min[i] - RAY_EPSILON <= self.max[i] && other.max[i] + RAY_EPSILON >= self.min[i])
    }
}

// endregion Helper

// region Ray Intersection

impl BoundingBox {
    /// Slab test between the ray and the box.
    ///
    /// Returns the distances `(t_min, t_max)` along the ray that it is inside the box, with the
    /// search window starting at `0`, so boxes behind the ray are never hit.
    ///
    /// Axes where the ray is parallel to the slab (zero direction component) constrain nothing
    /// while the origin is inside that slab, else the box is missed. The `NaN` values that
    /// `0 * inf` would produce never reach the comparisons.
    pub fn intersect(&self, ray: &Ray) -> Option<(Number, Number)> {
        if self.empty {
            return None;
        }

        let (ro, rd, inv_d) = (ray.pos(), ray.dir(), ray.inv_dir());
        let mut t0: Number = 0.;
        let mut t1 = Number::INFINITY;

        for i in 0..3 {
            let mut t_near = (self.min[i] - ro[i]) * inv_d[i];
            let mut t_far = (self.max[i] - ro[i]) * inv_d[i];

            if rd[i] == 0. || t_near.is_nan() || t_far.is_nan() {
                if ro[i] < self.min[i] || ro[i] > self.max[i] {
                    return None;
                }
                continue;
            }

            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            t0 = t0.max(t_near);
            t1 = t1.min(t_far);

            if t0 > t1 {
                return None;
            }
        }

        Some((t0, t1))
    }

    /// Whether the ray hits the box at all. See [Self::intersect()]
    pub fn hit(&self, ray: &Ray) -> bool { self.intersect(ray).is_some() }
}

// endregion Ray Intersection

// region Bounded trait

/// Trait for types that may have a bounding box
pub trait Bounded: ComponentRequirements {
    /// Gets the bounding box for this item. If the item can't be bounded (e.g. infinite plane), return [None]
    fn bounding_box(&self) -> Option<&BoundingBox>;
}

impl Bounded for BoundingBox {
    fn bounding_box(&self) -> Option<&BoundingBox> { Some(self) }
}

// endregion Bounded trait

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn arb_point() -> impl Strategy<Value = Point3> {
        (-100.0..100.0, -100.0..100.0, -100.0..100.0).prop_map(|(x, y, z)| Point3::new(x, y, z))
    }

    fn arb_box() -> impl Strategy<Value = BoundingBox> { (arb_point(), arb_point()).prop_map(|(a, b)| BoundingBox::new(a, b)) }

    proptest! {
        #[test]
        fn merge_contains_both(a in arb_box(), b in arb_box()) {
            let mut merged = a.clone();
            merged.merge(&b);

            for p in a.corners().chain(b.corners()) {
                prop_assert!(merged.contains_point(p));
            }
            prop_assert!(merged.volume() >= a.volume().max(b.volume()));
            prop_assert!(merged.area() >= a.area().max(b.area()));
        }
    }

    #[test]
    fn merge_into_empty_adopts_other() {
        let mut b = BoundingBox::empty();
        b.merge(&BoundingBox::new((1., 2., 3.), (4., 5., 6.)));
        assert!(!b.is_empty());
        assert_eq!(b.min(), Point3::new(1., 2., 3.));
        assert_eq!(b.max(), Point3::new(4., 5., 6.));
    }

    #[test]
    fn merge_empty_is_noop() {
        let mut b = BoundingBox::new((0., 0., 0.), (1., 1., 1.));
        b.merge(&BoundingBox::empty());
        assert_eq!(b.min(), Point3::ZERO);
        assert_eq!(b.max(), Point3::ONE);
    }

    #[test]
    fn cached_scalars_refresh_after_merge() {
        let mut b = BoundingBox::new((0., 0., 0.), (1., 1., 1.));
        assert_relative_eq!(b.volume(), 1.);
        assert_relative_eq!(b.area(), 6.);
        b.merge(&BoundingBox::new((0., 0., 0.), (2., 2., 2.)));
        assert_relative_eq!(b.volume(), 8.);
        assert_relative_eq!(b.area(), 24.);
    }

    #[test]
    fn empty_box_has_no_extent() {
        let b = BoundingBox::empty();
        assert!(b.is_empty());
        assert!(BoundingBox::default().is_empty());
        assert!(!BoundingBox::new(Point3::ONE, Point3::ONE).is_empty());
        assert_eq!(b.area(), 0.);
        assert_eq!(b.volume(), 0.);
        assert!(!b.contains_point(Point3::ZERO));
        assert!(b.intersect(&Ray::new(Point3::ZERO, Vector3::X)).is_none());
    }

    #[test]
    fn slab_hit_distances() {
        let b = BoundingBox::new((-1., -1., -1.), (1., 1., 1.));
        let (t0, t1) = b
            .intersect(&Ray::new(Point3::new(0., 0., -5.), Vector3::Z))
            .expect("ray should hit box");
        assert_relative_eq!(t0, 4.);
        assert_relative_eq!(t1, 6.);

        // Diagonal ray through opposite corners
        let dir = Vector3::ONE.normalize();
        let (t0, t1) = b
            .intersect(&Ray::new(Point3::splat(-2.), dir))
            .expect("diagonal ray should hit box");
        assert_relative_eq!(t0, 3f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(t1, 3. * 3f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn slab_origin_inside_starts_at_zero() {
        let b = BoundingBox::new((-1., -1., -1.), (1., 1., 1.));
        let (t0, t1) = b.intersect(&Ray::new(Point3::ZERO, Vector3::X)).expect("inside");
        assert_eq!(t0, 0.);
        assert_relative_eq!(t1, 1.);
    }

    #[test]
    fn slab_misses() {
        let b = BoundingBox::new((-1., -1., -1.), (1., 1., 1.));
        // Passes above the box
        assert!(b.intersect(&Ray::new(Point3::new(0., 1.5, -5.), Vector3::Z)).is_none());
        // Box is behind the ray
        assert!(b.intersect(&Ray::new(Point3::new(0., 0., 5.), Vector3::Z)).is_none());
        // Parallel to an axis, and outside that slab
        assert!(b.intersect(&Ray::new(Point3::new(5., 0., 0.), Vector3::Z)).is_none());
    }

    #[test]
    fn slab_axis_parallel_on_face_is_not_nan() {
        // Origin lies exactly on the `x = 1` plane, with zero x-direction, which would give `0 * inf`
        let b = BoundingBox::new((-1., -1., -1.), (1., 1., 1.));
        let (t0, t1) = b
            .intersect(&Ray::new(Point3::new(1., 0., -5.), Vector3::Z))
            .expect("ray grazing the face should hit");
        assert!(!t0.is_nan() && !t1.is_nan());
        assert_relative_eq!(t0, 4.);
    }

    #[test]
    fn zero_extent_box_can_be_hit() {
        let b = BoundingBox::new((0., 0., 0.), (0., 0., 0.));
        assert!(b.hit(&Ray::new(Point3::new(0., 0., -3.), Vector3::Z)));
        assert!(!b.hit(&Ray::new(Point3::new(0.1, 0., -3.), Vector3::Z)));
    }

    #[test]
    fn box_overlap_with_tolerance() {
        let a = BoundingBox::new((0., 0., 0.), (1., 1., 1.));
        let touching = BoundingBox::new((1., 0., 0.), (2., 1., 1.));
        let apart = BoundingBox::new((1.1, 0., 0.), (2., 1., 1.));
        assert!(a.intersects_box(&touching));
        assert!(!a.intersects_box(&apart));
        assert!(a.contains_point(Point3::new(1. + RAY_EPSILON / 2., 0.5, 0.5)));
    }

    #[test]
    fn transformed_box_encloses_rotated_corners() {
        let b = BoundingBox::new((-1., -1., -1.), (1., 1., 1.));
        let t = Transform3::from_rotation_z(std::f64::consts::FRAC_PI_4);
        let out = b.transformed(&t);
        assert_relative_eq!(out.max().x, 2f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(out.max().z, 1., epsilon = 1e-9);
    }
}
