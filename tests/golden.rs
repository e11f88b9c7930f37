//! Golden tests for skeleton pruning.
//!
//! These tests pin the reference scenarios and the determinism of the
//! threshold output.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use skeleton_significance::{
    medial_graph, vanishing_thresholds, Point2, PruneError, PruningPolicy, InputError,
    SignificancePruner, SkeletonGraph, SkeletonInput, SkeletonPruner, VoronoiRidges, NEVER_DROPS,
    MULTI_STROKE_CUTOFF,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn skeleton(points: &[(f64, f64)], edges: &[[usize; 2]], angles: &[f64]) -> SkeletonInput {
    SkeletonInput::new(
        points.iter().map(|&p| Point2::from(p)).collect(),
        edges.to_vec(),
        angles.to_vec(),
    )
}

fn simple_path() -> SkeletonInput {
    skeleton(
        &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)],
        &[[0, 1], [1, 2], [2, 3]],
        &[FRAC_PI_4; 3],
    )
}

fn single_cycle() -> SkeletonInput {
    skeleton(
        &[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)],
        &[[0, 1], [1, 2], [2, 3], [3, 0]],
        &[0.7; 4],
    )
}

fn star_junction() -> SkeletonInput {
    skeleton(
        &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0)],
        &[[0, 1], [0, 2], [0, 3]],
        &[0.2f64.asin(), 0.5f64.asin(), 0.9f64.asin()],
    )
}

/// Two loops joined by a bridge, with branches of different lengths,
/// plus a separate tree component.
fn mixed_skeleton() -> SkeletonInput {
    skeleton(
        &[
            (0.0, 0.0),
            (1.0, 0.0),
            (0.5, 1.0),
            (3.5, 1.0),
            (3.0, 0.0),
            (4.0, 0.0),
            (-1.0, -1.0),
            (-2.0, -1.5),
            (-1.0, -3.0),
            (5.0, 2.0),
            (10.0, 10.0),
            (11.0, 10.0),
            (12.0, 11.0),
            (12.0, 9.0),
        ],
        &[
            [0, 1],
            [1, 2],
            [2, 0],
            [2, 3],
            [3, 4],
            [4, 5],
            [5, 3],
            [0, 6],
            [6, 7],
            [6, 8],
            [5, 9],
            [10, 11],
            [11, 12],
            [11, 13],
        ],
        &[0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 1.1, 0.4, 0.9, 0.6, 0.3, 1.4],
    )
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Reference Scenarios
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_simple_path_scenario() {
    let input = simple_path();
    let graph = SkeletonGraph::build(&input, &PruningPolicy::default()).unwrap();
    let components = graph.to_components();
    assert_eq!(components.len(), 1);
    assert_eq!(graph.core_edge_count(), 0);

    let tree = components[0].to_junction_tree();
    assert_eq!(tree.core_node(), None);
    assert_eq!(tree.num_nodes(), 3);
    assert_eq!(tree.num_edges(), 2);

    let outcome = SignificancePruner::default().prune(&tree).unwrap();
    assert_eq!(outcome.alpha_list.len(), 3);
    // Both endpoint branches go before the middle one
    let first_two: Vec<usize> = outcome.rounds.iter().flat_map(|r| r.removed.clone()).collect();
    assert_eq!(first_two, vec![0, 2]);

    let pruning = SkeletonPruner::default().prune(&input).unwrap();
    let r = FRAC_PI_4.sin();
    for &t in &pruning.thresholds {
        assert_close(t, r);
    }
}

#[test]
fn test_single_cycle_scenario() {
    let input = single_cycle();
    let mut graph = SkeletonGraph::build(&input, &PruningPolicy::default()).unwrap();

    assert_eq!(graph.burn(), 0);
    assert_eq!(graph.core_edge_count(), 4);

    let tree = graph.to_components()[0].to_junction_tree();
    assert_eq!(tree.num_nodes(), 1);
    assert_eq!(tree.num_edges(), 0);

    let pruning = SkeletonPruner::default().prune(&input).unwrap();
    assert_eq!(pruning.thresholds, vec![NEVER_DROPS; 4]);
    assert_eq!(pruning.components[0].alpha_list, vec![0.0]);
}

#[test]
fn test_star_junction_scenario() {
    let input = star_junction();
    let graph = SkeletonGraph::build(&input, &PruningPolicy::default()).unwrap();
    let tree = graph.to_components()[0].to_junction_tree();

    assert_eq!(tree.num_nodes(), 4);
    assert_eq!(tree.node(3).degree(), 3);

    let outcome = SignificancePruner::default().prune(&tree).unwrap();
    let order: Vec<Vec<usize>> = outcome.rounds.iter().map(|r| r.removed.clone()).collect();
    assert_eq!(order, vec![vec![0], vec![1], vec![2]]);

    let thresholds = vanishing_thresholds(&input.points, &input.edges, &input.angles).unwrap();
    assert_close(thresholds[0], 0.2);
    assert_close(thresholds[1], 0.5);
    assert_close(thresholds[2], 0.9);
}

// ─────────────────────────────────────────────────────────────────────────────
// Threshold Coverage
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_every_branch_gets_finite_threshold() {
    let input = mixed_skeleton();
    let graph = SkeletonGraph::build(&input, &PruningPolicy::default()).unwrap();
    let pruning = SkeletonPruner::default().prune(&input).unwrap();

    assert_eq!(pruning.len(), input.num_edges());
    for (edge, &t) in graph.edges().iter().zip(&pruning.thresholds) {
        if edge.is_core {
            assert_eq!(t, NEVER_DROPS);
        } else {
            assert!(t.is_finite() && t != NEVER_DROPS, "edge {} has {t}", edge.original_index);
        }
    }
    // Two loops and their bridge form the core
    assert_eq!(graph.core_edge_count(), 7);
    assert_eq!(pruning.components.len(), 2);
}

#[test]
fn test_alpha_lists_non_decreasing() {
    let pruning = SkeletonPruner::default().prune(&mixed_skeleton()).unwrap();

    for report in &pruning.components {
        assert_eq!(report.alpha_list[0], 0.0);
        for pair in report.alpha_list.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }
}

#[test]
fn test_zero_length_edge_policies() {
    let input = skeleton(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0)], &[[0, 1], [1, 2]], &[FRAC_PI_4; 2]);

    let pruning = SkeletonPruner::default().prune(&input).unwrap();
    assert!(pruning.thresholds.iter().all(|t| t.is_finite()));

    let strict = SkeletonPruner::new(PruningPolicy::strict());
    assert_eq!(
        strict.prune(&input),
        Err(PruneError::InvalidInput(InputError::ZeroLengthEdge { edge: 1 }))
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Determinism Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_same_input_same_fingerprint_100_runs() {
    let input = mixed_skeleton();
    let pruner = SkeletonPruner::default();
    let first = pruner.prune(&input).unwrap();

    for _ in 0..100 {
        let again = pruner.prune(&input).unwrap();
        assert_eq!(again.fingerprint, first.fingerprint);
        assert_eq!(again.thresholds, first.thresholds);
    }
    assert!(first.verify_fingerprint());
}

#[test]
fn test_policy_change_changes_fingerprint() {
    let input = mixed_skeleton();
    let default = SkeletonPruner::default().prune(&input).unwrap();
    let custom = SkeletonPruner::new(PruningPolicy::with_core_threshold(1e9))
        .prune(&input)
        .unwrap();

    assert_ne!(default.params_hash, custom.params_hash);
    assert_ne!(default.fingerprint, custom.fingerprint);
}

#[test]
fn test_result_serializes() {
    let pruning = SkeletonPruner::default().prune(&star_junction()).unwrap();
    let json = serde_json::to_value(&pruning).unwrap();

    assert_eq!(json["schema_version"], "1.0.0");
    assert_eq!(json["policy_id"], "pruning_policy_v1");
    assert_eq!(json["thresholds"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["components"][0]["tree_nodes"], 4);
}

// ─────────────────────────────────────────────────────────────────────────────
// Medial Graph to Thresholds
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_medial_graph_feeds_pruner() {
    // Boundary samples of a 4x2 rectangle, one closed curve
    let points = vec![
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(4.0, 0.0),
        Point2::new(4.0, 2.0),
        Point2::new(2.0, 2.0),
        Point2::new(0.0, 2.0),
    ];
    let mut curve = points.clone();
    curve.push(points[0]);

    let ridges = VoronoiRidges {
        points,
        // Spine ridges between opposite samples, then ridges to the corners
        ridge_points: vec![[1, 4], [0, 4], [1, 3], [0, 2], [2, 4]],
        ridge_vertices: vec![[0, 1], [0, 2], [1, 3], [4, -1], [1, 1]],
        vertices: vec![
            Point2::new(1.0, 1.0),
            Point2::new(3.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(4.0, 1.0),
            Point2::new(2.0, -5.0),
        ],
        sample: vec![curve],
    };

    let medial = medial_graph(&ridges).unwrap();
    assert_eq!(medial.skeleton.edges, vec![[0, 1], [0, 2], [1, 3]]);
    assert_eq!(medial.vertex_ids, vec![0, 1, 2, 3]);

    // Spine ridge sees its samples straight across; the two end ridges
    // are mirror images of each other
    let end_angle = 0.5 * ((-0.75 - 1.0) / (1.25f64.sqrt() * 3.25f64.sqrt())).acos();
    assert_close(medial.skeleton.angles[0], FRAC_PI_2);
    assert_close(medial.skeleton.angles[1], end_angle);
    assert_close(medial.skeleton.angles[2], end_angle);

    // End branches go first at their own ratio; the spine (reward 2, cost 2)
    // survives with ratio 1
    let end_ratio = end_angle.sin();
    assert_close(end_ratio, 0.9664996487646695);
    let pruning = SkeletonPruner::default().prune(&medial.skeleton).unwrap();
    assert_close(pruning.thresholds[0], 1.0);
    assert_close(pruning.thresholds[1], end_ratio);
    assert_close(pruning.thresholds[2], end_ratio);

    let kept_all = pruning.simplify(&medial.skeleton, MULTI_STROKE_CUTOFF);
    assert_eq!(kept_all.edge_origin, vec![0, 1, 2]);
    assert_eq!(kept_all.vertex_origin, vec![0, 1, 2, 3]);

    let spine_only = pruning.simplify(&medial.skeleton, 0.99);
    assert_eq!(spine_only.edge_origin, vec![0]);
    assert_eq!(spine_only.vertex_origin, vec![0, 1]);
    assert_eq!(spine_only.skeleton.edges, vec![[0, 1]]);
    assert_eq!(spine_only.skeleton.points, vec![Point2::new(1.0, 1.0), Point2::new(3.0, 1.0)]);
    assert_close(spine_only.skeleton.angles[0], FRAC_PI_2);
}
