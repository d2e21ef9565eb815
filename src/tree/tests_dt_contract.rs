// =========================================================================
// FALSIFY-DT: decision tree and forest contract
//
// The trial runner trusts tree-based oracles to:
//   - return labels seen during training
//   - be deterministic for a fixed random state
//   - classify separable training data perfectly (single tree)
//
// References:
//   - Breiman et al. (1984) "Classification and Regression Trees"
//   - Breiman (2001) "Random Forests"
// =========================================================================

use super::*;
use crate::primitives::Matrix;

/// FALSIFY-DT-001: Predictions in label range
#[test]
fn falsify_dt_001_predictions_in_label_range() {
    let x = Matrix::from_vec(6, 2, vec![
        0.0, 0.0, 1.0, 0.0, 2.0, 0.0,
        0.0, 1.0, 1.0, 1.0, 2.0, 1.0,
    ]).expect("valid matrix");
    let y = vec![0_usize, 0, 1, 1, 2, 2];

    let mut dt = DecisionTreeClassifier::new();
    dt.fit(&x, &y).expect("fit succeeds");

    let preds = dt.predict(&x).expect("predict");
    for (i, &p) in preds.iter().enumerate() {
        assert!(
            p <= 2,
            "FALSIFIED DT-001: prediction[{i}] = {p}, not in [0, 2]"
        );
    }
}

/// FALSIFY-DT-002: Deterministic, same input produces same output
#[test]
fn falsify_dt_002_deterministic() {
    let x = Matrix::from_vec(4, 2, vec![
        0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0,
    ]).expect("valid matrix");
    let y = vec![0_usize, 0, 1, 1];

    let mut dt = DecisionTreeClassifier::new();
    dt.fit(&x, &y).expect("fit");

    let p1 = dt.predict(&x).expect("predict");
    let p2 = dt.predict(&x).expect("predict");
    assert_eq!(p1, p2, "FALSIFIED DT-002: predictions differ on same input");
}

/// FALSIFY-DT-003: Perfect fit on separable data with distinct rows
#[test]
fn falsify_dt_003_perfect_fit_separable() {
    let x = Matrix::from_vec(5, 1, vec![0.0, 1.0, 2.0, 3.0, 4.0]).expect("valid matrix");
    let y = vec![3_usize, 1, 4, 1, 0];

    let mut dt = DecisionTreeClassifier::new();
    dt.fit(&x, &y).expect("fit");

    assert_eq!(
        dt.predict(&x).expect("predict"),
        y,
        "FALSIFIED DT-003: unbounded tree failed to memorize distinct rows"
    );
}

/// FALSIFY-DT-004: Depth never exceeds max_depth
#[test]
fn falsify_dt_004_depth_bound() {
    let x = Matrix::from_vec(8, 1, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0])
        .expect("valid matrix");
    let y = vec![0_usize, 1, 0, 1, 0, 1, 0, 1];

    for max_depth in 0..4 {
        let mut dt = DecisionTreeClassifier::new().with_max_depth(max_depth);
        dt.fit(&x, &y).expect("fit");
        let depth = dt.depth().expect("fitted");
        assert!(
            depth <= max_depth,
            "FALSIFIED DT-004: depth {depth} > max_depth {max_depth}"
        );
    }
}

/// FALSIFY-DT-005: Forest with a random state is reproducible
#[test]
fn falsify_dt_005_forest_seeded_reproducible() {
    let x = Matrix::from_vec(8, 2, vec![
        0.0, 0.0, 0.5, 0.5, 5.0, 5.0, 5.5, 5.5,
        10.0, 10.0, 10.5, 10.5, 1.0, 1.0, 6.0, 6.0,
    ]).expect("valid matrix");
    let y = vec![0_usize, 0, 1, 1, 2, 2, 0, 1];

    let mut a = RandomForestClassifier::new(9).with_random_state(3);
    let mut b = RandomForestClassifier::new(9).with_random_state(3);
    a.fit(&x, &y).expect("fit");
    b.fit(&x, &y).expect("fit");

    assert_eq!(
        a.predict(&x).expect("predict"),
        b.predict(&x).expect("predict"),
        "FALSIFIED DT-005: same random_state gave different forests"
    );
}
