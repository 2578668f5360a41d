//! Module containing the **Bounding Volume Hierarchy** (BVH) structure
//!
//! These are used to accelerate ray intersection tests by narrowing the search space,
//! by skipping items that obviously can't be intersected.
//!
//! The same tree is used both over the objects in a [Scene](crate::scene::Scene), and over the faces
//! of a [TrimeshMesh](crate::mesh::trimesh::TrimeshMesh). The tree never owns the items themselves;
//! it stores indices into the owner's item slice, and the owner supplies a closure to intersect a single item.
//!
//! # Construction
//! Median split along the largest axis: at each level the items are (stably) sorted by the minimum
//! coordinate of their bounding box along the longest axis of the node's bounds, and split into two halves.
//! Nodes with few enough items (or that are too deep) become leaves.

use getset::{CopyGetters, Getters};
use indextree::{Arena, NodeId};
use nonzero::nonzero;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::num::NonZeroUsize;
use tracing::{debug, trace};

use crate::core::targets::BVH;
use crate::core::types::{Number, Vector3};
use crate::shared::aabb::{Bounded, BoundingBox};
use crate::shared::intersect::{Intersection, MeshIntersection};
use crate::shared::ray::Ray;

/// Options controlling how a [Bvh] is built
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BvhOpts {
    /// Nodes holding at most this many items are not split any further
    pub leaf_size: NonZeroUsize,
    /// Nodes deeper than this become leaves, no matter how many items they hold.
    ///
    /// Guards against runaway depth when the splits are badly skewed. [None] means unlimited
    pub max_depth: Option<usize>,
}

impl BvhOpts {
    /// Options for the top-level tree over scene objects
    pub const SCENE: Self = Self {
        leaf_size: nonzero!(4_usize),
        max_depth: Some(20),
    };
    /// Options for the per-mesh tree over triangle faces
    pub const MESH: Self = Self {
        leaf_size: nonzero!(4_usize),
        max_depth: None,
    };
}

impl Default for BvhOpts {
    fn default() -> Self { Self::SCENE }
}

/// Anything that a [Bvh] traversal can return as a hit
pub trait BvhHit {
    /// Distance along the ray, used to pick the closest hit
    fn dist(&self) -> Number;
}

impl BvhHit for Intersection<'_> {
    fn dist(&self) -> Number { self.t }
}

impl BvhHit for MeshIntersection {
    fn dist(&self) -> Number { self.dist }
}

/// The type for each node in the BVH tree
///
/// Branch nodes have children (tracked by the arena) and no items, leaves have items and no children
#[derive(Getters, CopyGetters, Clone, Debug)]
pub struct BvhNode {
    /// Union of the bounds of every bounded item in this subtree
    #[get = "pub"]
    bounds: BoundingBox,
    /// Set when at least one item in the subtree has no bounding box, in which case [Self::bounds]
    /// does not cover the whole subtree and the node can never be skipped
    #[get_copy = "pub"]
    unbounded: bool,
    /// Indices of the items held by a leaf
    #[get = "pub"]
    items: SmallVec<[usize; 4]>,
}

#[derive(Getters, CopyGetters, Clone, Debug)]
pub struct Bvh {
    /// The backing store containing all of our nodes, as well as their hierarchy
    #[get = "pub"]
    arena: Arena<BvhNode>,
    /// The node of the root object in the tree. [None] for an empty tree
    #[get_copy = "pub"]
    root_id: Option<NodeId>,
    /// How many levels deep the tree is (a single leaf is depth `0`)
    #[get_copy = "pub"]
    depth: usize,
}

// region Construction

impl Bvh {
    /// Creates a new tree over all the items in the slice. The tree refers to items by their index in the slice,
    /// so the slice must not be reordered while the tree is used.
    pub fn new<T: Bounded>(items: &[T], opts: BvhOpts) -> Self {
        puffin::profile_function!();

        let mut arena = Arena::with_capacity(items.len() * 2);
        let mut depth = 0;
        let root_id = if items.is_empty() {
            None
        } else {
            let indices = (0..items.len()).collect::<Vec<_>>();
            Some(Self::generate_nodes(indices, items, 0, opts, &mut arena, &mut depth))
        };

        debug!(
            target: BVH,
            items = items.len(),
            nodes = arena.len(),
            depth,
            "built bvh"
        );

        Self { arena, root_id, depth }
    }

    /// Recursively splits the set of `indices` until each chunk fits in a leaf
    fn generate_nodes<T: Bounded>(
        mut indices: Vec<usize>,
        items: &[T],
        depth: usize,
        opts: BvhOpts,
        arena: &mut Arena<BvhNode>,
        max_depth_seen: &mut usize,
    ) -> NodeId {
        *max_depth_seen = usize::max(*max_depth_seen, depth);

        let mut bounds = BoundingBox::empty();
        let mut unbounded = false;
        for &i in &indices {
            match items[i].bounding_box() {
                Some(b) => bounds.merge(b),
                None => unbounded = true,
            }
        }

        let too_deep = opts.max_depth.is_some_and(|max| depth > max);
        if indices.len() <= opts.leaf_size.get() || too_deep {
            if too_deep {
                trace!(target: BVH, depth, count = indices.len(), "depth limit reached, forcing leaf");
            }
            return arena.new_node(BvhNode {
                bounds,
                unbounded,
                items: SmallVec::from_vec(indices),
            });
        }

        let axis = Self::split_axis(bounds.size());
        // Unbounded items don't have a position, so they get sorted as if they were at the origin
        let sort_key = |i: usize| items[i].bounding_box().map_or(0., |b| b.min()[axis]);
        // NOTE: `sort_by` is stable, so the tree is deterministic for a given item order
        indices.sort_by(|&a, &b| Number::total_cmp(&sort_key(a), &sort_key(b)));

        let right_indices = indices.split_off(indices.len() / 2);
        let left_indices = indices;

        let node = arena.new_node(BvhNode {
            bounds,
            unbounded,
            items: SmallVec::new(),
        });
        let left = Self::generate_nodes(left_indices, items, depth + 1, opts, arena, max_depth_seen);
        let right = Self::generate_nodes(right_indices, items, depth + 1, opts, arena, max_depth_seen);
        node.append(left, arena);
        node.append(right, arena);
        node
    }

    /// Picks the axis with the largest extent. `Y` wins only if strictly largest, then `Z` if larger than `X`
    fn split_axis(extent: Vector3) -> usize {
        if extent.y > extent.x && extent.y > extent.z {
            1
        } else if extent.z > extent.x {
            2
        } else {
            0
        }
    }
}

// endregion Construction

// region Traversal

impl Bvh {
    /// Finds the nearest hit along the ray.
    ///
    /// The closure is called with the index of each candidate item that could not be culled, and should
    /// intersect the ray with that item.
    pub fn intersect<H: BvhHit>(&self, ray: &Ray, mut intersect_item: impl FnMut(usize) -> Option<H>) -> Option<H> {
        let root = self.root_id?;
        Self::node_intersect(ray, root, &self.arena, &mut intersect_item)
    }

    /// Given a [NodeId] on the [Arena] tree, calculates the nearest intersection for the given `ray`
    ///
    /// - Bails early if the node's bounds are missed
    /// - For leaves, tests every item and keeps the closest
    /// - For branches, intersects both children (by calling itself recursively) and keeps the closest
    fn node_intersect<H: BvhHit, F: FnMut(usize) -> Option<H>>(
        ray: &Ray,
        node_id: NodeId,
        arena: &Arena<BvhNode>,
        intersect_item: &mut F,
    ) -> Option<H> {
        let Some(node) = arena.get(node_id) else {
            return None;
        };
        let node = node.get();

        if !node.unbounded && !node.bounds.hit(ray) {
            return None;
        }

        // Leaf
        if !node.items.is_empty() {
            return node
                .items
                .iter()
                .filter_map(|&i| intersect_item(i))
                .fold(None, |closest: Option<H>, hit| match closest {
                    Some(c) if c.dist() <= hit.dist() => Some(c),
                    _ => Some(hit),
                });
        }

        // TODO: Visit the nearer child first and skip the other once a closer hit is known
        let mut closest: Option<H> = None;
        for child in node_id.children(arena) {
            if let Some(hit) = Self::node_intersect(ray, child, arena, intersect_item) {
                closest = match closest {
                    Some(c) if c.dist() <= hit.dist() => Some(c),
                    _ => Some(hit),
                };
            }
        }
        closest
    }

    /// The bounds of the whole tree, [None] if the tree is empty
    pub fn bounds(&self) -> Option<&BoundingBox> {
        let root = self.root_id?;
        self.arena.get(root).map(|n| &n.get().bounds)
    }

    /// Number of nodes (branches and leaves) in the tree
    pub fn node_count(&self) -> usize { self.arena.len() }
}

// endregion Traversal

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Point3;
    use approx::assert_relative_eq;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    /// A minimal item for driving the tree directly: the box is the item, and a hit is the entry distance
    #[derive(Clone, Debug)]
    struct BoxItem(Option<BoundingBox>);

    impl Bounded for BoxItem {
        fn bounding_box(&self) -> Option<&BoundingBox> { self.0.as_ref() }
    }

    impl BvhHit for (usize, Number) {
        fn dist(&self) -> Number { self.1 }
    }

    fn item_hit(items: &[BoxItem], ray: &Ray, i: usize) -> Option<(usize, Number)> {
        // Unbounded items act as boxes that are always hit far away
        match &items[i].0 {
            Some(b) => b.intersect(ray).map(|(t, _)| (i, t)),
            None => Some((i, 500.)),
        }
    }

    fn brute_force(items: &[BoxItem], ray: &Ray) -> Option<Number> {
        (0..items.len())
            .filter_map(|i| item_hit(items, ray, i))
            .map(|(_, t)| t)
            .min_by(Number::total_cmp)
    }

    fn random_box(rng: &mut SmallRng, degenerate: bool) -> BoundingBox {
        let a = Point3::new(rng.gen_range(-20.0..20.), rng.gen_range(-20.0..20.), rng.gen_range(-20.0..20.));
        if degenerate {
            return BoundingBox::new(a, a);
        }
        let size = Vector3::new(rng.gen_range(0.0..3.), rng.gen_range(0.0..3.), rng.gen_range(0.0..3.));
        BoundingBox::new(a, a + size)
    }

    fn random_ray(rng: &mut SmallRng) -> Ray {
        let pos = Point3::new(rng.gen_range(-30.0..30.), rng.gen_range(-30.0..30.), rng.gen_range(-30.0..30.));
        // Aim roughly at the cluster so that a good fraction of rays hit something
        let target = Point3::new(rng.gen_range(-20.0..20.), rng.gen_range(-20.0..20.), rng.gen_range(-20.0..20.));
        Ray::new(pos, target - pos)
    }

    #[test]
    fn empty_tree_never_hits() {
        let bvh = Bvh::new::<BoxItem>(&[], BvhOpts::SCENE);
        assert!(bvh.root_id().is_none());
        assert!(bvh.bounds().is_none());
        let hit = bvh.intersect(&Ray::new(Point3::ZERO, Vector3::Z), |i| Some((i, 0.)));
        assert!(hit.is_none());
    }

    #[test]
    fn leaf_threshold_creates_single_node() {
        let items = (0..4)
            .map(|i| BoxItem(Some(BoundingBox::new_centred(Point3::splat(i as Number), Vector3::ONE))))
            .collect::<Vec<_>>();
        let bvh = Bvh::new(&items, BvhOpts::MESH);
        assert_eq!(bvh.node_count(), 1);
        assert_eq!(bvh.depth(), 0);

        let items = (0..5)
            .map(|i| BoxItem(Some(BoundingBox::new_centred(Point3::splat(i as Number), Vector3::ONE))))
            .collect::<Vec<_>>();
        let bvh = Bvh::new(&items, BvhOpts::MESH);
        assert_eq!(bvh.node_count(), 3);
        assert_eq!(bvh.depth(), 1);
    }

    #[test]
    fn node_bounds_contain_children() {
        let mut rng = SmallRng::seed_from_u64(0xB0B);
        let items = (0..200)
            .map(|_| BoxItem(Some(random_box(&mut rng, false))))
            .collect::<Vec<_>>();
        let bvh = Bvh::new(&items, BvhOpts::SCENE);

        for node in bvh.arena().iter() {
            let node = node.get();
            for &i in node.items() {
                let b = items[i].0.as_ref().unwrap();
                assert!(node.bounds().contains_point(b.min()));
                assert!(node.bounds().contains_point(b.max()));
            }
        }
        // Every item lands in exactly one leaf
        let mut seen = bvh
            .arena()
            .iter()
            .flat_map(|n| n.get().items().clone())
            .collect::<Vec<_>>();
        seen.sort();
        assert_eq!(seen, (0..200).collect::<Vec<_>>());
    }

    #[test]
    fn depth_cap_limits_tree() {
        let items = (0..1000)
            .map(|i| BoxItem(Some(BoundingBox::new_centred(Point3::new(i as Number, 0., 0.), Vector3::ONE))))
            .collect::<Vec<_>>();
        let bvh = Bvh::new(
            &items,
            BvhOpts {
                leaf_size: nonzero!(1_usize),
                max_depth: Some(3),
            },
        );
        assert!(bvh.depth() <= 4);
    }

    #[test]
    fn matches_brute_force() {
        let mut rng = SmallRng::seed_from_u64(0x5EED);
        for n in [0, 1, 2, 3, 4, 5, 7, 16, 33, 100, 300] {
            let items = (0..n)
                .map(|i| BoxItem(Some(random_box(&mut rng, i % 5 == 0))))
                .collect::<Vec<_>>();
            let bvh = Bvh::new(&items, BvhOpts::SCENE);

            for _ in 0..200 {
                let ray = random_ray(&mut rng);
                let expected = brute_force(&items, &ray);
                let actual = bvh.intersect(&ray, |i| item_hit(&items, &ray, i)).map(|(_, t)| t);
                match (expected, actual) {
                    (None, None) => {}
                    (Some(e), Some(a)) => assert_relative_eq!(e, a, epsilon = 1e-9),
                    (e, a) => panic!("bvh disagreed with brute force for n={n}: expected {e:?}, got {a:?}"),
                }
            }
        }
    }

    #[test]
    fn unbounded_items_are_never_culled() {
        let mut items = vec![
            BoxItem(Some(BoundingBox::new((10., 10., 10.), (11., 11., 11.)))),
            BoxItem(None),
        ];
        items.extend((0..10).map(|i| BoxItem(Some(BoundingBox::new_centred(Point3::new(i as Number, 5., 5.), Vector3::ONE)))));
        let bvh = Bvh::new(&items, BvhOpts::SCENE);

        // Misses every bounded box, so only the unbounded item can be returned
        let ray = Ray::new(Point3::new(0., -50., 0.), Vector3::NEG_Y);
        let hit = bvh.intersect(&ray, |i| item_hit(&items, &ray, i));
        assert_eq!(hit.map(|(i, _)| i), Some(1));
    }

    #[test]
    fn split_axis_prefers_y_then_z() {
        assert_eq!(Bvh::split_axis(Vector3::new(1., 2., 1.)), 1);
        assert_eq!(Bvh::split_axis(Vector3::new(1., 1., 2.)), 2);
        assert_eq!(Bvh::split_axis(Vector3::new(2., 1., 1.)), 0);
        // Ties
        assert_eq!(Bvh::split_axis(Vector3::new(1., 1., 1.)), 0);
        assert_eq!(Bvh::split_axis(Vector3::new(1., 2., 2.)), 2);
    }
}
