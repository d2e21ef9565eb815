// =========================================================================
// FALSIFY-KNN: contract tests for the nearest-neighbor oracle
//
// The Monte Carlo engine relies on three properties of every oracle:
//   - predictions are labels seen during training
//   - one prediction per query row
//   - equal votes resolve to the lowest label
//
// References:
//   - Cover & Hart (1967) "Nearest Neighbor Pattern Classification"
// =========================================================================

use super::*;
use crate::primitives::Matrix;

fn fixture() -> (Matrix<f32>, Vec<usize>) {
    let x = Matrix::from_vec(6, 2, vec![
        0.0, 0.0, 0.5, 0.5, 1.0, 0.0,
        5.0, 5.0, 5.5, 5.5, 6.0, 5.0,
    ]).expect("valid");
    (x, vec![0_usize, 0, 0, 1, 1, 1])
}

/// FALSIFY-KNN-001: Predictions in training label set
#[test]
fn falsify_knn_001_predictions_in_label_range() {
    let (x, y) = fixture();
    let mut knn = KNearestNeighbors::new(3);
    knn.fit(&x, &y).expect("fit");

    let preds = knn.predict(&x).expect("predict");
    for (i, &p) in preds.iter().enumerate() {
        assert!(
            p <= 1,
            "FALSIFIED KNN-001: prediction[{i}] = {p}, not in {{0, 1}}"
        );
    }
}

/// FALSIFY-KNN-002: Prediction count matches input count
#[test]
fn falsify_knn_002_prediction_count() {
    let (x, y) = fixture();
    let mut knn = KNearestNeighbors::new(3);
    knn.fit(&x, &y).expect("fit");

    let x_test = Matrix::from_vec(3, 2, vec![0.2, 0.2, 3.0, 3.0, 5.8, 5.8]).expect("valid");
    let preds = knn.predict(&x_test).expect("predict");
    assert_eq!(preds.len(), 3, "FALSIFIED KNN-002: {} predictions for 3 inputs", preds.len());
}

/// FALSIFY-KNN-003: Well-separated clusters classified correctly
#[test]
fn falsify_knn_003_separable_data() {
    let (x, y) = fixture();
    let mut knn = KNearestNeighbors::new(1);
    knn.fit(&x, &y).expect("fit");

    let preds = knn.predict(&x).expect("predict");
    assert_eq!(preds, y, "FALSIFIED KNN-003: 1-NN misclassified its own training rows");
}

/// FALSIFY-KNN-004: Prediction is deterministic
#[test]
fn falsify_knn_004_deterministic() {
    let (x, y) = fixture();
    let mut knn = KNearestNeighbors::new(3);
    knn.fit(&x, &y).expect("fit");

    let query = Matrix::from_vec(1, 2, vec![2.9, 2.9]).expect("valid");
    let first = knn.predict(&query).expect("predict");
    let second = knn.predict(&query).expect("predict");
    assert_eq!(first, second, "FALSIFIED KNN-004: repeated predict differs");
}

/// FALSIFY-KNN-005: Equal vote counts resolve to the lowest label
#[test]
fn falsify_knn_005_tie_to_lowest_label() {
    // Query at 0.0 has one neighbor of each label at distance 1
    let x = Matrix::from_vec(2, 1, vec![1.0, -1.0]).expect("valid");
    let y = vec![2_usize, 0];
    let mut knn = KNearestNeighbors::new(2);
    knn.fit(&x, &y).expect("fit");

    let query = Matrix::from_vec(1, 1, vec![0.0]).expect("valid");
    let preds = knn.predict(&query).expect("predict");
    assert_eq!(preds, vec![0], "FALSIFIED KNN-005: tie resolved to {:?}, expected 0", preds);
}

/// FALSIFY-KNN-006: Duplicated rows with different labels take the lowest label
#[test]
fn falsify_knn_006_duplicate_rows_lowest_label() {
    let x = Matrix::from_vec(2, 1, vec![3.0, 3.0]).expect("valid");
    let y = vec![1_usize, 0];
    let mut knn = KNearestNeighbors::new(2);
    knn.fit(&x, &y).expect("fit");

    let preds = knn.predict(&x).expect("predict");
    assert_eq!(preds, vec![0, 0], "FALSIFIED KNN-006: got {:?}", preds);
}
