#![cfg(feature = "nalgebra")]

mod common;

use nalgebra::DVector;
use riesz::Vector;

#[test]
fn dvector_satisfies_contract() {
    let a = DVector::from_row_slice(&common::A);
    let b = DVector::from_row_slice(&common::B);
    common::check_euclidean(&a, &b);
}

#[test]
fn dvector_matches_vec() {
    let mut x = DVector::from_row_slice(&common::A);
    let mut y = common::A.to_vec();
    // DVector has an inherent three-argument axpy
    Vector::axpy(&mut x, -0.5, &DVector::from_row_slice(&common::B));
    y.axpy(-0.5, &common::B.to_vec());
    assert_eq!(x.as_slice(), y.as_slice());
}

#[test]
fn single_precision_dvector() {
    let mut x = DVector::from_vec(vec![3.0f32, 4.0]);
    assert_eq!(Vector::norm(&x), 5.0);
    Vector::scale(&mut x, 2.0);
    assert_eq!(x.as_slice(), &[6.0, 8.0]);
}
