#![allow(dead_code)]

use riesz::Vector;

pub const A: [f64; 4] = [1.0, 2.0, 3.0, 4.0];
pub const B: [f64; 4] = [0.5, -1.0, 2.0, 0.0];

/// Identities every Euclidean vector must satisfy, for `a = A` and `b = B`.
pub fn check_euclidean<V: Vector<f64>>(a: &V, b: &V) {
    assert_eq!(a.dimension(), 4);
    assert_eq!(b.dimension(), 4);

    assert!((a.dot(b) - 4.5).abs() < 1e-14);
    assert!((a.dot(a) - 30.0).abs() < 1e-14);
    assert!((a.norm() - 30f64.sqrt()).abs() < 1e-14);

    // c = a + 2b
    let mut c = a.clone();
    c.axpy(2.0, b);
    assert!((c.dot(a) - (30.0 + 2.0 * 4.5)).abs() < 1e-12);

    // c = 0.5 (a + 2b)
    c.scale(0.5);
    assert!((c.dot(a) - 0.5 * 39.0).abs() < 1e-12);

    c.zero();
    assert_eq!(c.norm(), 0.0);

    c.set(b);
    assert!((c.dot(&c) - 5.25).abs() < 1e-14);
    c.plus(a);
    assert!((c.dot(&c) - (30.0 + 2.0 * 4.5 + 5.25)).abs() < 1e-12);

    // Euclidean Riesz map is the identity
    assert!((a.dual().dot(&b.dual()) - 4.5).abs() < 1e-14);
    assert!((a.dual().norm() - a.norm()).abs() < 1e-14);
}
