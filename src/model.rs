use burn::config::Config;
use burn::module::{Module, Param};
use burn::nn::{Initializer, Linear, LinearConfig, Tanh};
use burn::prelude::Backend;
use burn::tensor::Tensor;

/// 並列全結合ネットワーク（PFNN）の設定。
///
/// 出力成分ごとに独立した多層パーセプトロン（ブランチ）を持ちます。
/// 既定値は `[1, [20, 20], [20, 20], [20, 20], 2]` に相当します。
#[derive(Config, Debug)]
pub struct PfnnConfig {
    #[config(default = 1)]
    pub in_features: usize,
    /// 各ブランチの隠れ層の幅
    #[config(default = "vec![20, 20, 20]")]
    pub hidden: Vec<usize>,
    /// 出力成分の数（= ブランチの数）
    #[config(default = 2)]
    pub outputs: usize,
}

impl PfnnConfig {
    /// 重みをGlorot一様分布、バイアスを0で初期化したモデルを作成します。
    pub fn init<B: Backend>(&self, device: &B::Device) -> Pfnn<B> {
        let branches = (0..self.outputs)
            .map(|_| self.init_branch(device))
            .collect();
        Pfnn { branches }
    }

    fn init_branch<B: Backend>(&self, device: &B::Device) -> Branch<B> {
        let mut widths = Vec::with_capacity(self.hidden.len() + 2);
        widths.push(self.in_features);
        widths.extend(self.hidden.iter().copied());
        widths.push(1);
        let linears = widths
            .windows(2)
            .map(|w| {
                let mut linear = LinearConfig::new(w[0], w[1])
                    .with_initializer(Initializer::XavierUniform { gain: 1.0 })
                    .init(device);
                linear.bias = Some(Param::from_tensor(Tensor::zeros([w[1]], device)));
                linear
            })
            .collect();
        Branch {
            linears,
            activation: Tanh::new(),
        }
    }
}

/// 出力値とその入力座標に関する1階・2階微分の組。
///
/// いずれも形状は `[n, outputs]` です。
#[derive(Debug, Clone)]
pub struct FieldJet<B: Backend> {
    pub value: Tensor<B, 2>,
    pub dx: Tensor<B, 2>,
    pub dxx: Tensor<B, 2>,
}

impl<B: Backend> FieldJet<B> {
    /// `component` 番目の出力成分だけを取り出します。
    pub fn component(&self, component: usize) -> FieldJet<B> {
        let n = self.value.dims()[0];
        let range = [0..n, component..component + 1];
        FieldJet {
            value: self.value.clone().slice(range.clone()),
            dx: self.dx.clone().slice(range.clone()),
            dxx: self.dxx.clone().slice(range),
        }
    }

    fn cat(jets: Vec<FieldJet<B>>) -> FieldJet<B> {
        let mut values = Vec::with_capacity(jets.len());
        let mut dxs = Vec::with_capacity(jets.len());
        let mut dxxs = Vec::with_capacity(jets.len());
        for jet in jets {
            values.push(jet.value);
            dxs.push(jet.dx);
            dxxs.push(jet.dxx);
        }
        FieldJet {
            value: Tensor::cat(values, 1),
            dx: Tensor::cat(dxs, 1),
            dxx: Tensor::cat(dxxs, 1),
        }
    }
}

/// 1つの出力成分を担当する多層パーセプトロン。
#[derive(Module, Debug)]
pub struct Branch<B: Backend> {
    linears: Vec<Linear<B>>,
    activation: Tanh,
}

impl<B: Backend> Branch<B> {
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let last = self.linears.len() - 1;
        let mut x = input;
        for (i, linear) in self.linears.iter().enumerate() {
            x = linear.forward(x);
            if i < last {
                x = self.activation.forward(x);
            }
        }
        x
    }

    /// 値と微分を層ごとに連鎖律で伝播させます。
    ///
    /// 全結合層 `z = a W + b` では `z' = a' W`, `z'' = a'' W`、
    /// 活性化 `s = tanh(z)` では `s' = (1 - s^2) z'`,
    /// `s'' = (1 - s^2) (z'' - 2 s z'^2)` となります。
    pub fn forward_jet(&self, jet: FieldJet<B>) -> FieldJet<B> {
        let last = self.linears.len() - 1;
        let mut jet = jet;
        for (i, linear) in self.linears.iter().enumerate() {
            let weight = linear.weight.val();
            jet = FieldJet {
                value: linear.forward(jet.value),
                dx: jet.dx.matmul(weight.clone()),
                dxx: jet.dxx.matmul(weight),
            };
            if i < last {
                let s = self.activation.forward(jet.value);
                let ds = (s.clone() * s.clone()).neg().add_scalar(1.0);
                let dx = ds.clone() * jet.dx.clone();
                let curvature = jet.dxx - s.clone().mul_scalar(2.0) * jet.dx.clone() * jet.dx;
                jet = FieldJet {
                    value: s,
                    dx,
                    dxx: ds * curvature,
                };
            }
        }
        jet
    }
}

/// PINNの本体となるニューラルネットワークモデル。
///
/// 座標xを入力とし、状態uと未知の場qを並列のブランチで予測します。
#[derive(Module, Debug)]
pub struct Pfnn<B: Backend> {
    branches: Vec<Branch<B>>,
}

impl<B: Backend> Pfnn<B> {
    pub fn outputs(&self) -> usize {
        self.branches.len()
    }

    /// 順伝播を実行します。出力の形状は `[n, outputs]` です。
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let outputs = self
            .branches
            .iter()
            .map(|branch| branch.forward(input.clone()))
            .collect();
        Tensor::cat(outputs, 1)
    }

    /// 出力と、入力座標 `dim` に関する厳密な1階・2階微分を計算します。
    ///
    /// 結果はパラメータについて微分可能なままなので、損失にそのまま使えます。
    pub fn forward_jet(&self, input: Tensor<B, 2>, dim: usize) -> FieldJet<B> {
        let [n, in_features] = input.dims();
        let device = input.device();
        let direction: Vec<f32> = (0..in_features)
            .map(|i| if i == dim { 1.0 } else { 0.0 })
            .collect();
        let direction =
            Tensor::<B, 1>::from_floats(direction.as_slice(), &device).reshape([1, in_features]);
        let seed = FieldJet {
            dx: Tensor::ones([n, in_features], &device) * direction,
            dxx: Tensor::zeros([n, in_features], &device),
            value: input,
        };
        let jets = self
            .branches
            .iter()
            .map(|branch| branch.forward_jet(seed.clone()))
            .collect();
        FieldJet::cat(jets)
    }
}
