use burn::nn::loss::{MseLoss, Reduction};
use burn::prelude::Backend;
use burn::tensor::Tensor;

use crate::data::PinnBatch;
use crate::model::Pfnn;
use crate::problem::{EllipticInverseProblem, U};

/// 各損失項の重み。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossWeights {
    pub pde: f32,
    pub boundary: f32,
    pub observation: f32,
}

impl Default for LossWeights {
    fn default() -> Self {
        Self {
            pde: 1.0,
            boundary: 100.0,
            observation: 1000.0,
        }
    }
}

/// 重み付け前の損失項。
#[derive(Debug, Clone)]
pub struct LossTerms<B: Backend> {
    pub pde: Tensor<B, 1>,
    pub boundary: Tensor<B, 1>,
    pub observation: Tensor<B, 1>,
    weights: LossWeights,
}

impl<B: Backend> LossTerms<B> {
    /// 重み付きの総損失。
    pub fn total(&self) -> Tensor<B, 1> {
        self.pde.clone().mul_scalar(self.weights.pde)
            + self.boundary.clone().mul_scalar(self.weights.boundary)
            + self.observation.clone().mul_scalar(self.weights.observation)
    }
}

/// 物理損失を計算します。
///
/// 方程式の残差 `-u_xx + q`（0になるべき値）の二乗平均誤差を返します。
pub fn pde_loss<B: Backend>(
    model: &Pfnn<B>,
    problem: &EllipticInverseProblem,
    coords: Tensor<B, 2>,
) -> Tensor<B, 1> {
    let jet = model.forward_jet(coords, 0);
    let residual = problem.residual(&jet);
    MseLoss::new().forward(residual.clone(), Tensor::zeros_like(&residual), Reduction::Mean)
}

/// 状態uの予測値と目標値の二乗平均誤差。境界条件と観測の両方に使います。
pub fn state_loss<B: Backend>(
    model: &Pfnn<B>,
    coords: Tensor<B, 2>,
    target: Tensor<B, 2>,
) -> Tensor<B, 1> {
    let n = coords.dims()[0];
    let u = model.forward(coords).slice([0..n, U..U + 1]);
    MseLoss::new().forward(u, target, Reduction::Mean)
}

pub fn compute_losses<B: Backend>(
    model: &Pfnn<B>,
    problem: &EllipticInverseProblem,
    batch: &PinnBatch<B>,
    weights: LossWeights,
) -> LossTerms<B> {
    LossTerms {
        pde: pde_loss(model, problem, batch.domain.clone()),
        boundary: state_loss(model, batch.boundary.clone(), batch.boundary_values.clone()),
        observation: state_loss(
            model,
            batch.observation_x.clone(),
            batch.observation_u.clone(),
        ),
        weights,
    }
}
