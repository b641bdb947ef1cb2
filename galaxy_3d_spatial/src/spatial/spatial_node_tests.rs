use glam::Vec3;
use crate::spatial::DebugLine;
use super::*;

fn world() -> AABB {
    AABB::cube(10.0)
}

fn config(max_depth: u32, max_objects: usize) -> SpatialIndexConfig {
    SpatialIndexConfig::new(world(), max_depth, max_objects)
}

fn entry(key: u32, min: Vec3, max: Vec3) -> SpatialEntry<u32> {
    SpatialEntry::new(key, AABB::new(min, max))
}

/// Small box centered in the given root octant.
fn entry_in_octant(key: u32, octant: usize) -> SpatialEntry<u32> {
    let center = octant_region(&world(), octant).center();
    SpatialEntry::new(key, AABB::from_center_half_extents(center, Vec3::splat(1.0)))
}

fn keys_of(node: &SpatialNode<u32>) -> Vec<u32> {
    let mut keys: Vec<u32> = node.members().iter().map(|e| e.key).collect();
    keys.sort();
    keys
}

// ============================================================================
// Octant regions
// ============================================================================

#[test]
fn test_octant_bit_mapping() {
    let parent = world();

    let o0 = octant_region(&parent, 0);
    assert_eq!(o0.min, Vec3::new(-10.0, -10.0, 0.0));
    assert_eq!(o0.max, Vec3::new(0.0, 0.0, 10.0));

    let o2 = octant_region(&parent, 2);
    assert_eq!(o2.min, Vec3::new(0.0, 0.0, 0.0));
    assert_eq!(o2.max, Vec3::new(10.0, 10.0, 10.0));

    let o7 = octant_region(&parent, 7);
    assert_eq!(o7.min, Vec3::new(-10.0, 0.0, -10.0));
    assert_eq!(o7.max, Vec3::new(0.0, 10.0, 0.0));
}

#[test]
fn test_octants_tile_parent() {
    let parent = AABB::new(Vec3::new(-3.0, 1.0, 2.0), Vec3::new(5.0, 9.0, 4.0));
    let octants: Vec<AABB> = (0..8).map(|i| octant_region(&parent, i)).collect();

    for (i, octant) in octants.iter().enumerate() {
        assert!(parent.contains(octant), "octant {} leaves the parent", i);
        assert!((octant.volume() - parent.volume() / 8.0).abs() < 1e-4,
            "octant {} does not hold 1/8 of the volume", i);
    }

    // No two octants share interior volume
    for i in 0..8 {
        for j in (i + 1)..8 {
            let overlap = octants[i].max.min(octants[j].max) - octants[i].min.max(octants[j].min);
            let shared = overlap.x.max(0.0) * overlap.y.max(0.0) * overlap.z.max(0.0);
            assert_eq!(shared, 0.0, "octants {} and {} overlap", i, j);
        }
    }

    // Every parent corner belongs to exactly one octant's corner set
    for corner in parent.corners() {
        let owners = octants.iter().filter(|o| o.corners().contains(&corner)).count();
        assert_eq!(owners, 1);
    }
}

// ============================================================================
// Insertion
// ============================================================================

#[test]
fn test_leaf_keeps_objects_below_capacity() {
    let cfg = config(3, 4);
    let mut node = SpatialNode::new_root(world());

    for octant in 0..4 {
        node.insert_object(entry_in_octant(octant as u32, octant), &cfg);
    }

    assert!(node.is_leaf());
    assert_eq!(node.members().len(), 4);
}

#[test]
fn test_depth_ceiling_overrides_capacity() {
    let cfg = config(0, 1);
    let mut node = SpatialNode::new_root(world());

    for key in 0..5 {
        node.insert_object(entry_in_octant(key, key as usize), &cfg);
    }

    assert!(node.is_leaf());
    assert_eq!(node.members().len(), 5);
}

#[test]
fn test_overflow_triggers_exactly_one_split() {
    let cfg = config(3, 2);
    let mut node = SpatialNode::new_root(world());

    node.insert_object(entry_in_octant(1, 0), &cfg);
    node.insert_object(entry_in_octant(2, 3), &cfg);
    assert!(node.is_leaf());

    node.insert_object(entry_in_octant(3, 6), &cfg);

    assert!(!node.is_leaf());
    assert_eq!(node.node_count(), 9);
    assert_eq!(node.member_count(), 3);
    assert!(node.members().is_empty());

    let children = node.children().unwrap();
    assert_eq!(keys_of(&children[0]), vec![1]);
    assert_eq!(keys_of(&children[3]), vec![2]);
    assert_eq!(keys_of(&children[6]), vec![3]);
    assert!(children.iter().all(SpatialNode::is_leaf));
    assert!(children.iter().all(|c| c.depth() == 1));
}

#[test]
fn test_full_overlap_member_stays_in_parent_on_split() {
    let cfg = config(3, 1);
    let mut node = SpatialNode::new_root(world());

    node.insert_object(SpatialEntry::new(99, world()), &cfg);
    node.insert_object(entry_in_octant(1, 5), &cfg);

    assert!(!node.is_leaf());
    assert_eq!(keys_of(&node), vec![99]);
    assert_eq!(node.member_count(), 2);
    assert_eq!(keys_of(&node.children().unwrap()[5]), vec![1]);
}

#[test]
fn test_full_overlap_insert_into_internal_node() {
    let cfg = config(3, 1);
    let mut node = SpatialNode::new_root(world());
    node.insert_object(entry_in_octant(1, 0), &cfg);
    node.insert_object(entry_in_octant(2, 1), &cfg);
    assert!(!node.is_leaf());

    // Spans the whole root region: stored once, at the root
    node.insert_object(SpatialEntry::new(3, world()), &cfg);

    assert_eq!(keys_of(&node), vec![3]);
    assert_eq!(node.member_count(), 3);
}

#[test]
fn test_straddling_object_is_duplicated() {
    let cfg = config(3, 1);
    let mut node = SpatialNode::new_root(world());
    node.insert_object(entry_in_octant(1, 4), &cfg);
    node.insert_object(entry_in_octant(2, 6), &cfg);

    // Crosses the X split plane inside the upper-Y / upper-Z quarter: octants 2 and 3
    node.insert_object(entry(3, Vec3::new(-1.0, 4.0, 4.0), Vec3::new(1.0, 6.0, 6.0)), &cfg);

    let children = node.children().unwrap();
    assert_eq!(keys_of(&children[2]), vec![3]);
    assert_eq!(keys_of(&children[3]), vec![3]);
    assert_eq!(node.member_count(), 4);
}

#[test]
fn test_object_outside_region_stays_in_internal_root() {
    let cfg = config(3, 1);
    let mut node = SpatialNode::new_root(world());
    node.insert_object(entry_in_octant(1, 0), &cfg);
    node.insert_object(entry_in_octant(2, 1), &cfg);

    node.insert_object(entry(3, Vec3::splat(50.0), Vec3::splat(51.0)), &cfg);

    assert_eq!(keys_of(&node), vec![3]);
}

#[test]
fn test_object_outside_region_survives_split() {
    let cfg = config(3, 1);
    let mut node = SpatialNode::new_root(world());
    node.insert_object(entry(1, Vec3::splat(50.0), Vec3::splat(51.0)), &cfg);
    node.insert_object(entry_in_octant(2, 1), &cfg);

    assert!(!node.is_leaf());
    assert_eq!(keys_of(&node), vec![1]);
    assert_eq!(node.member_count(), 2);
}

#[test]
fn test_object_crossing_root_region_stays_in_root() {
    let cfg = config(3, 1);
    let mut node = SpatialNode::new_root(world());
    node.insert_object(entry(1, Vec3::new(5.0, 1.0, 1.0), Vec3::new(15.0, 2.0, 2.0)), &cfg);
    node.insert_object(entry_in_octant(2, 1), &cfg);
    node.insert_object(entry(3, Vec3::new(8.0, 8.0, 8.0), Vec3::new(12.0, 9.0, 9.0)), &cfg);

    assert!(!node.is_leaf());
    assert_eq!(keys_of(&node), vec![1, 3]);
    assert_eq!(node.member_count(), 3);
}

#[test]
fn test_insertion_terminates_at_max_depth() {
    let cfg = config(3, 1);
    let mut node = SpatialNode::new_root(world());

    // Identical boxes can never be separated by splitting
    for key in 0..50 {
        node.insert_object(entry(key, Vec3::splat(6.0), Vec3::splat(7.0)), &cfg);
    }

    assert_eq!(node.deepest_depth(), 3);
    assert_eq!(node.member_count(), 50);
}

// ============================================================================
// Deletion
// ============================================================================

#[test]
fn test_delete_single_entry() {
    let cfg = config(3, 1);
    let mut node = SpatialNode::new_root(world());
    for octant in 0..4 {
        node.insert_object(entry_in_octant(octant as u32, octant), &cfg);
    }
    let before = node.member_count();

    assert_eq!(node.delete_object(2), 1);

    assert_eq!(node.member_count(), before - 1);
    assert_eq!(node.delete_object(2), 0);
}

#[test]
fn test_delete_removes_all_duplicates() {
    let cfg = config(3, 1);
    let mut node = SpatialNode::new_root(world());
    node.insert_object(entry_in_octant(1, 4), &cfg);
    node.insert_object(entry_in_octant(2, 6), &cfg);
    node.insert_object(entry(3, Vec3::new(-1.0, 4.0, 4.0), Vec3::new(1.0, 6.0, 6.0)), &cfg);

    assert_eq!(node.delete_object(3), 2);
    assert_eq!(node.member_count(), 2);
}

#[test]
fn test_split_is_permanent() {
    let cfg = config(3, 1);
    let mut node = SpatialNode::new_root(world());
    node.insert_object(entry_in_octant(1, 0), &cfg);
    node.insert_object(entry_in_octant(2, 1), &cfg);

    node.delete_object(1);
    node.delete_object(2);

    assert!(!node.is_leaf());
    assert_eq!(node.member_count(), 0);
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn test_teardown_releases_everything() {
    let cfg = config(3, 1);
    let mut node = SpatialNode::new_root(world());
    for octant in 0..8 {
        node.insert_object(entry_in_octant(octant as u32, octant), &cfg);
    }

    node.teardown();
    assert!(node.is_leaf());
    assert_eq!(node.member_count(), 0);
    assert_eq!(node.node_count(), 1);

    // Second call is harmless
    node.teardown();
    assert_eq!(node.node_count(), 1);
}

// ============================================================================
// Debug draw / statistics
// ============================================================================

#[test]
fn test_debug_draw_emits_twelve_edges_per_node() {
    let cfg = config(3, 1);
    let mut node = SpatialNode::new_root(world());
    node.insert_object(entry_in_octant(1, 0), &cfg);
    node.insert_object(entry_in_octant(2, 1), &cfg);

    let mut lines: Vec<DebugLine> = Vec::new();
    node.debug_draw(&mut lines);

    assert_eq!(lines.len(), 12 * node.node_count());
    assert_eq!(lines[0].start, world().corner(0));
    assert_eq!(lines[0].end, world().corner(1));
    assert_eq!(lines[0].depth, 0);
    assert_eq!(lines[12].depth, 1);
}

#[test]
fn test_wireframe_edges_cover_the_box() {
    let aabb = world();
    let corners = aabb.corners();
    for &(a, b) in &WIREFRAME_EDGES {
        // Each edge changes exactly one coordinate
        let delta = corners[a] - corners[b];
        let changed = [delta.x, delta.y, delta.z].iter().filter(|d| **d != 0.0).count();
        assert_eq!(changed, 1, "edge ({}, {}) is not a box edge", a, b);
    }

    let mut unique: Vec<(usize, usize)> = WIREFRAME_EDGES.iter()
        .map(|&(a, b)| (a.min(b), a.max(b)))
        .collect();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 12);
}

#[test]
fn test_nodes_with_at_least() {
    let cfg = config(0, 2);
    let mut node = SpatialNode::new_root(world());
    node.insert_object(entry_in_octant(1, 0), &cfg);
    assert_eq!(node.nodes_with_at_least(2), 0);

    node.insert_object(entry_in_octant(2, 1), &cfg);
    assert_eq!(node.nodes_with_at_least(2), 1);
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_collect_in_aabb_deduplicates() {
    let cfg = config(3, 1);
    let mut node = SpatialNode::new_root(world());
    node.insert_object(entry_in_octant(1, 4), &cfg);
    node.insert_object(entry_in_octant(2, 6), &cfg);
    node.insert_object(entry(3, Vec3::new(-1.0, 4.0, 4.0), Vec3::new(1.0, 6.0, 6.0)), &cfg);

    let mut results = Candidates::new();
    node.collect_in_aabb(&AABB::new(Vec3::new(-2.0, 3.0, 3.0), Vec3::new(2.0, 7.0, 7.0)), &mut results);

    assert_eq!(results.into_keys(), vec![3]);
}

#[test]
fn test_collect_on_ray() {
    let cfg = config(3, 1);
    let mut node = SpatialNode::new_root(world());
    node.insert_object(entry_in_octant(1, 0), &cfg);
    node.insert_object(entry_in_octant(2, 1), &cfg);

    // Octant 0 centered at (-5, -5, 5); shoot along -Z through it
    let ray = Ray::new(Vec3::new(-5.0, -5.0, 50.0), Vec3::NEG_Z);
    let mut results = Candidates::new();
    node.collect_on_ray(&ray, &mut results);

    assert_eq!(results.into_keys(), vec![1]);
}
