pub(crate) use super::*;

#[test]
fn test_from_vec() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.shape(), (2, 3));
    assert!((m.get(0, 0) - 1.0).abs() < 1e-6);
    assert!((m.get(1, 2) - 6.0).abs() < 1e-6);
}

#[test]
fn test_from_vec_error() {
    let result = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0]);
    assert!(result.is_err());
}

#[test]
fn test_row_and_column() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
    assert_eq!(m.column(1), vec![2.0, 5.0]);
    assert_eq!(m.rows().count(), 2);
}

#[test]
fn test_vstack_preserves_order() {
    let a = Matrix::from_vec(2, 2, vec![1.0_f32, 2.0, 3.0, 4.0]).expect("2x2");
    let b = Matrix::from_vec(1, 2, vec![5.0_f32, 6.0]).expect("1x2");
    let stacked = Matrix::vstack(&[&a, &b]).expect("same width");
    assert_eq!(stacked.shape(), (3, 2));
    assert_eq!(stacked.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn test_vstack_rejects_width_mismatch() {
    let a = Matrix::from_vec(1, 2, vec![1.0_f32, 2.0]).expect("1x2");
    let b = Matrix::from_vec(1, 3, vec![1.0_f32, 2.0, 3.0]).expect("1x3");
    assert!(Matrix::vstack(&[&a, &b]).is_err());
    assert!(Matrix::<f32>::vstack(&[]).is_err());
}

#[test]
fn test_select_rows() {
    let m = Matrix::from_vec(3, 1, vec![10.0_f32, 20.0, 30.0]).expect("3x1");
    let picked = m.select_rows(&[2, 0, 2]);
    assert_eq!(picked.as_slice(), &[30.0, 10.0, 30.0]);
}

#[test]
fn test_map_columns_uses_column_index() {
    let m = Matrix::from_vec(2, 2, vec![1.0_f32, 2.0, 3.0, 4.0]).expect("2x2");
    let scaled = m.map_columns(|v, col| v * (col as f32 + 1.0));
    assert_eq!(scaled.as_slice(), &[1.0, 4.0, 3.0, 8.0]);
    // source untouched
    assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_squared_euclidean_rows() {
    let a = Matrix::from_vec(1, 2, vec![0.0_f32, 0.0]).expect("1x2");
    let b = Matrix::from_vec(1, 2, vec![3.0_f32, 4.0]).expect("1x2");
    assert!((squared_euclidean(a.row(0), b.row(0)) - 25.0).abs() < 1e-12);
    assert_eq!(squared_euclidean(b.row(0), b.row(0)), 0.0);
}
