#![cfg(feature = "ndarray")]

mod common;

use ndarray::{array, Array1};
use riesz::Vector;

#[test]
fn array1_satisfies_contract() {
    let a = Array1::from(common::A.to_vec());
    let b = Array1::from(common::B.to_vec());
    common::check_euclidean(&a, &b);
}

#[test]
fn array1_axpy_in_place() {
    let mut x = array![1.0, 2.0, 3.0];
    x.axpy(2.0, &array![1.0, 0.0, -1.0]);
    assert_eq!(x, array![3.0, 2.0, 1.0]);
    Vector::zero(&mut x);
    assert_eq!(x, array![0.0, 0.0, 0.0]);
}
