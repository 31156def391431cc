//! ホスト側の `Vec<f32>` とテンソルの相互変換。

use burn::prelude::Backend;
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::{ElementConversion, Tensor};

use crate::error::{PinnError, Result};

/// 値の列を形状 `[n, 1]` の列ベクトルに変換します。
pub fn column<B: Backend>(values: &[f32], device: &B::Device) -> Tensor<B, 2> {
    Tensor::<B, 1>::from_floats(values, device).reshape([values.len(), 1])
}

/// テンソルの要素を行優先順に取り出します。
pub fn to_vec<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Result<Vec<f32>> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| PinnError::TensorData(format!("{e:?}")))
}

/// 形状 `[n, k]` のテンソルから `k` 本の列を取り出します。
pub fn columns<B: Backend>(tensor: Tensor<B, 2>) -> Result<Vec<Vec<f32>>> {
    let [_, k] = tensor.dims();
    let flat = to_vec(tensor)?;
    Ok((0..k)
        .map(|j| flat.iter().skip(j).step_by(k).copied().collect())
        .collect())
}

pub fn scalar<B: Backend>(tensor: Tensor<B, 1>) -> f32 {
    tensor.into_scalar().elem::<f32>()
}

/// 自動微分バックエンドのテンソルが置かれているデバイスを、内側のバックエンドのデバイスとして返します。
pub fn inner_device<B: AutodiffBackend, const D: usize>(
    tensor: &Tensor<B, D>,
) -> <B::InnerBackend as Backend>::Device {
    tensor.clone().inner().device()
}
