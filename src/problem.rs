//! 逆問題として解く1次元楕円型方程式 `-u'' + q = 0`。
//!
//! 厳密解は `u(x) = sin(πx)`, `q(x) = -π² sin(πx)` です。
//! 学習では `u` の境界値と観測値のみを与え、`q` は方程式の残差から推定します。

use std::f32::consts::PI;

use burn::prelude::Backend;
use burn::tensor::Tensor;

use crate::geometry::Interval;
use crate::model::FieldJet;

/// 出力成分のインデックス（状態u）
pub const U: usize = 0;
/// 出力成分のインデックス（未知の場q）
pub const Q: usize = 1;

#[derive(Debug, Clone, Copy)]
pub struct EllipticInverseProblem {
    pub interval: Interval,
}

impl EllipticInverseProblem {
    pub fn new(interval: Interval) -> Self {
        Self { interval }
    }

    pub fn exact_u(&self, x: f32) -> f32 {
        (PI * x).sin()
    }

    pub fn exact_q(&self, x: f32) -> f32 {
        -PI * PI * (PI * x).sin()
    }

    /// Dirichlet境界条件として課すuの値。
    pub fn boundary_value(&self, x: f32) -> f32 {
        self.exact_u(x)
    }

    /// 区間全体に等間隔に並べた `n` 点でのuの観測データを生成します。
    pub fn observations(&self, n: usize) -> (Vec<f32>, Vec<f32>) {
        let xs = self.interval.uniform_points(n, true);
        let us = xs.iter().map(|&x| self.exact_u(x)).collect();
        (xs, us)
    }

    /// 方程式の残差 `-u_xx + q` を計算します。形状は `[n, 1]` です。
    pub fn residual<B: Backend>(&self, jet: &FieldJet<B>) -> Tensor<B, 2> {
        let u = jet.component(U);
        let q = jet.component(Q);
        q.value - u.dxx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor_ext::{column, to_vec};
    use approx::assert_relative_eq;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    fn problem() -> EllipticInverseProblem {
        EllipticInverseProblem::new(Interval::new(-1.0, 1.0).unwrap())
    }

    #[test]
    fn exact_fields_vanish_on_the_boundary() {
        let problem = problem();
        assert!(problem.boundary_value(-1.0).abs() < 1e-6);
        assert!(problem.boundary_value(1.0).abs() < 1e-6);
        assert_relative_eq!(problem.exact_u(0.5), 1.0);
        assert_relative_eq!(problem.exact_q(0.5), -PI * PI);
    }

    #[test]
    fn observations_are_equally_spaced_samples_of_u() {
        let (xs, us) = problem().observations(100);
        assert_eq!(xs.len(), 100);
        assert_relative_eq!(xs[0], -1.0);
        assert_relative_eq!(xs[99], 1.0);
        for (x, u) in xs.iter().zip(&us) {
            assert_relative_eq!(*u, (PI * x).sin());
        }
    }

    #[test]
    fn exact_solution_has_zero_residual() {
        let problem = problem();
        let device = Default::default();
        let xs = [-0.8f32, -0.3, 0.1, 0.6];
        let u: Vec<f32> = xs.iter().map(|&x| problem.exact_u(x)).collect();
        let q: Vec<f32> = xs.iter().map(|&x| problem.exact_q(x)).collect();
        let u_x: Vec<f32> = xs.iter().map(|&x| PI * (PI * x).cos()).collect();
        let u_xx: Vec<f32> = xs.iter().map(|&x| -PI * PI * (PI * x).sin()).collect();
        let zeros = vec![0.0; xs.len()];

        let jet = FieldJet {
            value: Tensor::cat(
                vec![column::<TestBackend>(&u, &device), column(&q, &device)],
                1,
            ),
            dx: Tensor::cat(
                vec![column::<TestBackend>(&u_x, &device), column(&zeros, &device)],
                1,
            ),
            dxx: Tensor::cat(
                vec![column::<TestBackend>(&u_xx, &device), column(&zeros, &device)],
                1,
            ),
        };
        let residual = to_vec(problem.residual(&jet)).unwrap();
        assert_eq!(residual.len(), xs.len());
        assert!(residual.iter().all(|r| r.abs() < 1e-4));
    }
}
