//! Tests for classification module.

pub(crate) use super::*;

fn two_clusters() -> (Matrix<f32>, Vec<usize>) {
    let x = Matrix::from_vec(
        6,
        2,
        vec![
            0.0, 0.0, // class 0
            0.0, 1.0, // class 0
            1.0, 0.0, // class 0
            8.0, 8.0, // class 1
            8.0, 9.0, // class 1
            9.0, 8.0, // class 1
        ],
    )
    .expect("6x2 matrix with 12 values");
    (x, vec![0, 0, 0, 1, 1, 1])
}

#[test]
fn test_argmax_lowest_prefers_first_on_ties() {
    assert_eq!(argmax_lowest(&[1.0, 3.0, 3.0]), Some(1));
    assert_eq!(argmax_lowest(&[2.0, 2.0]), Some(0));
    assert_eq!(argmax_lowest(&[]), None);
}

#[test]
fn test_argmax_lowest_skips_neg_infinity() {
    assert_eq!(argmax_lowest(&[f64::NEG_INFINITY, -5.0]), Some(1));
}

#[test]
fn test_n_classes() {
    assert_eq!(n_classes(&[0, 2, 1]), 3);
    assert_eq!(n_classes(&[4]), 5);
    assert_eq!(n_classes(&[]), 0);
}

#[test]
fn test_knn_new() {
    let knn = KNearestNeighbors::new(3);
    assert_eq!(knn.k(), 3);
    assert_eq!(knn.metric, DistanceMetric::Euclidean);
    assert!(!knn.weights);
    assert!(knn.x_train.is_none());
}

#[test]
fn test_knn_builder() {
    let knn = KNearestNeighbors::new(5)
        .with_metric(DistanceMetric::Minkowski(3.0))
        .with_weights(true);
    assert_eq!(knn.metric, DistanceMetric::Minkowski(3.0));
    assert!(knn.weights);
}

#[test]
fn test_knn_fit_stores_data() {
    let (x, y) = two_clusters();
    let mut knn = KNearestNeighbors::new(1);
    knn.fit(&x, &y).expect("fit");
    assert_eq!(knn.x_train.as_ref().map(Matrix::shape), Some((6, 2)));
    assert_eq!(knn.y_train.as_deref(), Some(&y[..]));
}

#[test]
fn test_knn_fit_zero_k() {
    let (x, y) = two_clusters();
    let mut knn = KNearestNeighbors::new(0);
    let err = knn.fit(&x, &y).unwrap_err();
    assert!(matches!(
        err,
        ReidentError::InvalidHyperparameter { ref param, .. } if param == "n_neighbors"
    ));
}

#[test]
fn test_knn_fit_k_too_large() {
    let (x, y) = two_clusters();
    let mut knn = KNearestNeighbors::new(7);
    assert!(knn.fit(&x, &y).is_err());
}

#[test]
fn test_knn_fit_label_mismatch() {
    let (x, _) = two_clusters();
    let mut knn = KNearestNeighbors::new(1);
    assert!(knn.fit(&x, &[0, 1]).is_err());
}

#[test]
fn test_knn_predict_not_fitted() {
    let (x, _) = two_clusters();
    let knn = KNearestNeighbors::new(1);
    assert!(knn.predict(&x).is_err());
}

#[test]
fn test_knn_predict_feature_mismatch() {
    let (x, y) = two_clusters();
    let mut knn = KNearestNeighbors::new(1);
    knn.fit(&x, &y).expect("fit");
    let narrow = Matrix::from_vec(1, 1, vec![0.0]).expect("1x1");
    let err = knn.predict(&narrow).unwrap_err();
    assert!(matches!(err, ReidentError::DimensionMismatch { .. }));
}

#[test]
fn test_knn_euclidean_vs_manhattan() {
    let knn_e = KNearestNeighbors::new(1);
    let knn_m = KNearestNeighbors::new(1).with_metric(DistanceMetric::Manhattan);
    let a = [0.0, 0.0];
    let b = [3.0, 4.0];
    assert!((knn_e.compute_distance(&a, &b) - 5.0).abs() < 1e-6);
    assert!((knn_m.compute_distance(&a, &b) - 7.0).abs() < 1e-6);
}

#[test]
fn test_knn_minkowski_p2_is_euclidean() {
    let knn = KNearestNeighbors::new(1).with_metric(DistanceMetric::Minkowski(2.0));
    let d = knn.compute_distance(&[1.0, 1.0], &[4.0, 5.0]);
    assert!((d - 5.0).abs() < 1e-4);
}

#[test]
fn test_knn_weighted_vote_closer_neighbor_wins() {
    // One close neighbor of class 1 outweighs two distant class 0 neighbors
    let neighbors = [(0.1, 1), (5.0, 0), (5.0, 0)];
    assert_eq!(KNearestNeighbors::weighted_vote(&neighbors), Some(1));
}

#[test]
fn test_knn_weighted_vote_tie_goes_to_lowest() {
    let neighbors = [(2.0, 3), (2.0, 1)];
    assert_eq!(KNearestNeighbors::weighted_vote(&neighbors), Some(1));
}

#[test]
fn test_knn_weighted_vote_zero_distance() {
    let neighbors = [(0.0, 2), (0.5, 0)];
    // Zero distance gets weight 1.0, 0.5 distance gets weight 2.0
    assert_eq!(KNearestNeighbors::weighted_vote(&neighbors), Some(0));
}

#[test]
fn test_knn_k3_majority() {
    let x = Matrix::from_vec(4, 1, vec![0.0, 1.0, 1.1, 10.0]).expect("4x1");
    let y = vec![0, 1, 1, 0];
    let mut knn = KNearestNeighbors::new(3);
    knn.fit(&x, &y).expect("fit");
    let query = Matrix::from_vec(1, 1, vec![0.4]).expect("1x1");
    // Neighbors: 0.0 (0), 1.0 (1), 1.1 (1)
    assert_eq!(knn.predict(&query).expect("predict"), vec![1]);
}

#[test]
fn test_svm_builder() {
    let svm = KernelSvm::new()
        .with_kernel(SvmKernel::Linear)
        .with_c(10.0)
        .with_gamma(0.1)
        .with_max_iter(5);
    assert_eq!(svm.kernel, SvmKernel::Linear);
    assert_eq!(svm.c, 10.0);
    assert_eq!(svm.gamma, 0.1);
    assert_eq!(svm.max_iter, 5);
}

#[test]
fn test_svm_default_matches_new() {
    let svm = KernelSvm::default();
    assert_eq!(svm.kernel, SvmKernel::Rbf);
    assert_eq!(svm.c, 1.0);
}

#[test]
fn test_svm_separates_two_clusters() {
    let (x, y) = two_clusters();
    let mut svm = KernelSvm::new().with_c(100.0).with_gamma(0.5);
    svm.fit(&x, &y).expect("fit");
    assert_eq!(svm.predict(&x).expect("predict"), y);
}

#[test]
fn test_svm_linear_kernel_separates_two_clusters() {
    let (x, y) = two_clusters();
    let mut svm = KernelSvm::new().with_kernel(SvmKernel::Linear);
    svm.fit(&x, &y).expect("fit");
    let query = Matrix::from_vec(2, 2, vec![0.5, 0.5, 8.5, 8.5]).expect("2x2");
    assert_eq!(svm.predict(&query).expect("predict"), vec![0, 1]);
}

#[test]
fn test_svm_three_classes() {
    let x = Matrix::from_vec(6, 1, vec![0.0, 0.3, 5.0, 5.3, 10.0, 10.3]).expect("6x1");
    let y = vec![0, 0, 1, 1, 2, 2];
    let mut svm = KernelSvm::new().with_c(100.0).with_gamma(0.5);
    svm.fit(&x, &y).expect("fit");
    assert_eq!(svm.predict(&x).expect("predict"), y);
}

#[test]
fn test_svm_rejects_non_positive_c() {
    let (x, y) = two_clusters();
    let mut svm = KernelSvm::new().with_c(0.0);
    let err = svm.fit(&x, &y).unwrap_err();
    assert!(matches!(
        err,
        ReidentError::InvalidHyperparameter { ref param, .. } if param == "C"
    ));
}

#[test]
fn test_svm_rejects_non_positive_gamma_for_rbf() {
    let (x, y) = two_clusters();
    let mut svm = KernelSvm::new().with_gamma(-1.0);
    assert!(svm.fit(&x, &y).is_err());
}

#[test]
fn test_svm_linear_ignores_gamma() {
    let (x, y) = two_clusters();
    let mut svm = KernelSvm::new().with_kernel(SvmKernel::Linear).with_gamma(0.0);
    assert!(svm.fit(&x, &y).is_ok());
}

#[test]
fn test_svm_predict_not_fitted() {
    let (x, _) = two_clusters();
    assert!(KernelSvm::new().predict(&x).is_err());
}

#[test]
fn test_kde_new() {
    let kde = KernelDensityClassifier::new(0.25);
    assert_eq!(kde.bandwidth(), 0.25);
}

#[test]
fn test_kde_separates_two_clusters() {
    let (x, y) = two_clusters();
    let mut kde = KernelDensityClassifier::new(1.0);
    kde.fit(&x, &y).expect("fit");
    assert_eq!(kde.predict(&x).expect("predict"), y);
}

#[test]
fn test_kde_equidistant_tie_goes_to_lowest() {
    let x = Matrix::from_vec(2, 1, vec![-1.0, 1.0]).expect("2x1");
    let mut kde = KernelDensityClassifier::new(1.0);
    kde.fit(&x, &[1, 0]).expect("fit");
    let origin = Matrix::from_vec(1, 1, vec![0.0]).expect("1x1");
    assert_eq!(kde.predict(&origin).expect("predict"), vec![0]);
}

#[test]
fn test_kde_predict_not_fitted() {
    let (x, _) = two_clusters();
    assert!(KernelDensityClassifier::new(1.0).predict(&x).is_err());
}

#[test]
fn test_kde_predict_feature_mismatch() {
    let (x, y) = two_clusters();
    let mut kde = KernelDensityClassifier::new(1.0);
    kde.fit(&x, &y).expect("fit");
    let wide = Matrix::from_vec(1, 3, vec![0.0, 0.0, 0.0]).expect("1x3");
    assert!(kde.predict(&wide).is_err());
}

#[test]
fn test_distance_metric_serde_names() {
    let json = serde_json::to_string(&DistanceMetric::Manhattan).expect("serialize");
    assert_eq!(json, "\"manhattan\"");
    let kernel: SvmKernel = serde_json::from_str("\"linear\"").expect("deserialize");
    assert_eq!(kernel, SvmKernel::Linear);
}
