use std::sync::Arc;

use approx::assert_relative_eq;
use nalgebra::DVector;
use riesz::{ScaledVector, Vector};
use riesz_optim::{
    Algorithm, KrylovKind, NewtonKrylovConfig, NewtonKrylovStep, Objective, SecantKind,
    StatusTest, TerminationReason, Unconstrained,
};

/// f(x) = sum_i cosh(x_i - c_i). Minimum at c, value n.
struct CoshSum {
    center: Vec<f64>,
}

impl CoshSum {
    fn new(n: usize) -> Self {
        CoshSum {
            center: (0..n).map(|i| 0.25 * i as f64 - 0.5).collect(),
        }
    }
}

impl Objective<f64, Vec<f64>> for CoshSum {
    fn value(&self, x: &Vec<f64>, _tol: &mut f64) -> f64 {
        x.iter().zip(&self.center).map(|(xi, ci)| (xi - ci).cosh()).sum()
    }

    fn gradient(&self, g: &mut Vec<f64>, x: &Vec<f64>, _tol: &mut f64) {
        for i in 0..x.len() {
            g[i] = (x[i] - self.center[i]).sinh();
        }
    }

    fn hess_vec(&self, hv: &mut Vec<f64>, v: &Vec<f64>, x: &Vec<f64>, _tol: &mut f64) {
        for i in 0..x.len() {
            hv[i] = (x[i] - self.center[i]).cosh() * v[i];
        }
    }
}

impl Objective<f64, DVector<f64>> for CoshSum {
    fn value(&self, x: &DVector<f64>, _tol: &mut f64) -> f64 {
        x.iter().zip(&self.center).map(|(xi, ci)| (xi - ci).cosh()).sum()
    }

    fn gradient(&self, g: &mut DVector<f64>, x: &DVector<f64>, _tol: &mut f64) {
        for i in 0..x.len() {
            g[i] = (x[i] - self.center[i]).sinh();
        }
    }
}

/// f(x) = 0.5 * sum_i a_i x_i^2 on a weighted space, finite-difference Hessian.
struct WeightedQuadratic {
    a: Vec<f64>,
}

impl Objective<f64, ScaledVector<f64>> for WeightedQuadratic {
    fn value(&self, x: &ScaledVector<f64>, _tol: &mut f64) -> f64 {
        0.5 * x
            .values()
            .iter()
            .zip(&self.a)
            .map(|(xi, ai)| ai * xi * xi)
            .sum::<f64>()
    }

    fn gradient(&self, g: &mut ScaledVector<f64>, x: &ScaledVector<f64>, _tol: &mut f64) {
        let values = x.values().iter().zip(&self.a).map(|(xi, ai)| ai * xi).collect();
        *g = ScaledVector::dual_space(values, Arc::clone(x.weights()));
    }
}

fn start(n: usize) -> Vec<f64> {
    (0..n).map(|i| if i % 2 == 0 { 0.8 } else { -0.9 }).collect()
}

fn assert_at_center(x: &[f64], obj: &CoshSum) {
    for (xi, ci) in x.iter().zip(&obj.center) {
        assert_relative_eq!(*xi, *ci, epsilon = 1e-5);
    }
}

fn run_with(config: &NewtonKrylovConfig<f64>, n: usize) -> (Vec<f64>, TerminationReason, usize) {
    let mut obj = CoshSum::new(n);
    let mut step = NewtonKrylovStep::new(config).unwrap();
    let out = Algorithm::<f64>::default()
        .run(&mut step, &start(n), &mut obj, &Unconstrained)
        .unwrap();
    assert_at_center(&out.x, &obj);
    assert_eq!(out.func_evals, out.iterations + 1);
    assert_eq!(out.grad_evals, out.iterations + 1);
    assert_eq!(out.history.len(), out.iterations + 1);
    (out.x, out.termination, out.iterations)
}

#[test]
fn conjugate_gradients_converges() {
    let (_, termination, iterations) = run_with(&NewtonKrylovConfig::default(), 6);
    assert_eq!(termination, TerminationReason::GradientNorm);
    assert!(iterations < 15, "iterations = {iterations}");
}

#[test]
fn conjugate_residuals_converges() {
    let mut config = NewtonKrylovConfig::default();
    config.krylov.kind = KrylovKind::ConjugateResiduals;
    let (_, termination, _) = run_with(&config, 6);
    assert_eq!(termination, TerminationReason::GradientNorm);
}

#[test]
fn positive_definite_secant_preconditioners_converge() {
    for kind in [
        SecantKind::LimitedMemoryBfgs,
        SecantKind::LimitedMemoryDfp,
        SecantKind::BarzilaiBorwein,
    ] {
        let mut config = NewtonKrylovConfig::default();
        config.secant.use_as_preconditioner = true;
        config.secant.kind = kind;
        config.secant.max_storage = 3;
        let (_, termination, iterations) = run_with(&config, 5);
        assert!(termination.is_converged(), "{kind}: {termination}");
        assert!(iterations < 30, "{kind}: iterations = {iterations}");
    }
}

#[test]
fn sr1_preconditioner_in_one_dimension() {
    // in one dimension every SR1 update of a convex function stays positive
    let mut config = NewtonKrylovConfig::default();
    config.secant.use_as_preconditioner = true;
    config.secant.kind = SecantKind::LimitedMemorySr1;
    let (_, termination, _) = run_with(&config, 1);
    assert_eq!(termination, TerminationReason::GradientNorm);
}

#[test]
fn nalgebra_vectors() {
    let mut obj = CoshSum::new(4);
    let mut step = NewtonKrylovStep::new(&NewtonKrylovConfig::default()).unwrap();
    let x0 = DVector::from_vec(start(4));
    let out = Algorithm::<f64>::default()
        .run(&mut step, &x0, &mut obj, &Unconstrained)
        .unwrap();
    assert!(out.termination.is_converged());
    assert_at_center(out.x.as_slice(), &obj);
}

#[test]
fn weighted_space_with_finite_differences() {
    let weights: Arc<[f64]> = Arc::from(vec![1.0, 10.0, 0.1]);
    let x0 = ScaledVector::primal(vec![1.0, -1.0, 2.0], weights);
    let mut obj = WeightedQuadratic {
        a: vec![1.0, 3.0, 0.5],
    };
    let mut step = NewtonKrylovStep::new(&NewtonKrylovConfig::default()).unwrap();
    let out = Algorithm::<f64>::default()
        .run(&mut step, &x0, &mut obj, &Unconstrained)
        .unwrap();
    assert!(out.termination.is_converged(), "{}", out.termination);
    for xi in out.x.values() {
        assert!(xi.abs() < 1e-5, "x = {:?}", out.x.values());
    }
    assert_eq!(out.x.space(), riesz::Space::Primal);
}

#[test]
fn iteration_limit_stops_the_run() {
    let mut obj = CoshSum::new(3);
    let mut config = NewtonKrylovConfig::default();
    config.krylov.iteration_limit = 1;
    let mut step = NewtonKrylovStep::new(&config).unwrap();
    let status = StatusTest {
        iteration_limit: 1,
        ..StatusTest::default()
    };
    let out = Algorithm::new(status)
        .unwrap()
        .run(&mut step, &start(3), &mut obj, &Unconstrained)
        .unwrap();
    assert_eq!(out.termination, TerminationReason::IterationLimit);
    assert_eq!(out.iterations, 1);
    assert!(out.step_norm.is_finite());
}

#[test]
fn history_header_and_verbose_legend() {
    let mut obj = CoshSum::new(2);
    let config = NewtonKrylovConfig::<f64> {
        print_verbosity: 1,
        ..NewtonKrylovConfig::default()
    };
    let mut step = NewtonKrylovStep::new(&config).unwrap();
    let out = Algorithm::<f64>::default()
        .with_header(true)
        .run(&mut step, &start(2), &mut obj, &Unconstrained)
        .unwrap();
    assert!(out.history[0].starts_with("\nNewton-Krylov using Conjugate Gradients\n"));
    assert!(out.history[0].contains("status output definitions"));
    for entry in &out.history[1..] {
        assert!(entry.contains("#fval"));
    }
}

#[test]
fn single_precision() {
    struct Bowl;
    impl Objective<f32, Vec<f32>> for Bowl {
        fn value(&self, x: &Vec<f32>, _tol: &mut f32) -> f32 {
            x.iter().map(|xi| (xi - 1.0).powi(2)).sum()
        }
        fn gradient(&self, g: &mut Vec<f32>, x: &Vec<f32>, _tol: &mut f32) {
            for i in 0..x.len() {
                g[i] = 2.0 * (x[i] - 1.0);
            }
        }
        fn hess_vec(&self, hv: &mut Vec<f32>, v: &Vec<f32>, _x: &Vec<f32>, _tol: &mut f32) {
            for i in 0..v.len() {
                hv[i] = 2.0 * v[i];
            }
        }
    }

    let mut step = NewtonKrylovStep::new(&NewtonKrylovConfig::<f32>::default()).unwrap();
    let out = Algorithm::<f32>::default()
        .run(&mut step, &vec![3.0f32, -2.0], &mut Bowl, &Unconstrained)
        .unwrap();
    assert!(out.termination.is_converged());
    assert_relative_eq!(out.x[0], 1.0, epsilon = 1e-4);
    assert_relative_eq!(out.x[1], 1.0, epsilon = 1e-4);
    assert!(out.x.norm() > 0.0);
}
