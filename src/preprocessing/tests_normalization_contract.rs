// =========================================================================
// FALSIFY-PN: per-trial normalization contract
//
// The trial runner relies on:
//   - one divisor vector shared by batch and query
//   - strictly positive, finite divisors (or an explicit error)
//   - re-standardizing normalized data pulling the scale toward 1
// =========================================================================

use super::*;
use crate::primitives::Matrix;

fn batch() -> (Matrix<f32>, Matrix<f32>, Matrix<f32>) {
    let a = Matrix::from_vec(3, 2, vec![1.0, 10.0, 2.0, 40.0, 3.0, 20.0]).expect("valid");
    let b = Matrix::from_vec(3, 2, vec![7.0, 90.0, 5.0, 60.0, 6.0, 30.0]).expect("valid");
    let q = Matrix::from_vec(2, 2, vec![4.0, 50.0, 8.0, 70.0]).expect("valid");
    (a, b, q)
}

/// FALSIFY-PN-001: Batch and query are divided by the same vector
#[test]
fn falsify_pn_001_shared_divisor() {
    let (a, b, q) = batch();
    let policy = NormalizationPolicy::default();
    let scale = policy.fit(&[&a, &b]).expect("fit");
    let out = policy.normalize(&[&a, &b], &q).expect("normalize");

    for j in 0..2 {
        let expected_block = a.get(0, j) / scale.divisor()[j];
        let expected_query = q.get(1, j) / scale.divisor()[j];
        assert!(
            (out.blocks[0].get(0, j) - expected_block).abs() < 1e-6,
            "FALSIFIED PN-001: block feature {j} not divided by shared scale"
        );
        assert!(
            (out.query.get(1, j) - expected_query).abs() < 1e-6,
            "FALSIFIED PN-001: query feature {j} not divided by shared scale"
        );
    }
}

/// FALSIFY-PN-002: Every divisor exceeds eps
#[test]
fn falsify_pn_002_divisor_at_least_eps() {
    let (a, b, _) = batch();
    for eps in [0.01_f32, 0.1, 1.0] {
        let scale = NormalizationPolicy::standardize(eps).fit(&[&a, &b]).expect("fit");
        for (j, &d) in scale.divisor().iter().enumerate() {
            assert!(
                d >= eps,
                "FALSIFIED PN-002: divisor[{j}] = {d} < eps = {eps}"
            );
        }
    }
}

/// FALSIFY-PN-003: Re-standardizing moves the scale estimate toward 1
#[test]
fn falsify_pn_003_restandardize_toward_one() {
    let (a, b, q) = batch();
    let policy = NormalizationPolicy::default();
    let first = policy.fit(&[&a, &b]).expect("fit");
    let once = policy.normalize(&[&a, &b], &q).expect("normalize");
    let second = policy
        .fit(&[&once.blocks[0], &once.blocks[1]])
        .expect("refit");

    for j in 0..2 {
        let before = (first.divisor()[j] - 1.0).abs();
        let after = (second.divisor()[j] - 1.0).abs();
        assert!(
            after < before,
            "FALSIFIED PN-003: feature {j} scale moved from {} to {}",
            first.divisor()[j],
            second.divisor()[j]
        );
    }
}

/// FALSIFY-PN-004: Min-max maps the pooled batch into [0, 1]
#[test]
fn falsify_pn_004_min_max_batch_in_unit_range() {
    let (a, b, q) = batch();
    let out = NormalizationPolicy::MinMaxBound
        .normalize(&[&a, &b], &q)
        .expect("normalize");
    for block in &out.blocks {
        for &v in block.as_slice() {
            assert!(
                (-1e-6..=1.0 + 1e-6).contains(&v),
                "FALSIFIED PN-004: batch value {v} outside [0, 1]"
            );
        }
    }
}
