use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use burn::backend::NdArray;
use burn::config::Config;
use burn::module::Module;
use burn::prelude::Backend;
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder};
use tracing::info;

use crate::config::ExperimentConfig;
use crate::error::{PinnError, Result};
use crate::metrics::l2_relative_error;
use crate::model::Pfnn;
use crate::plot::plot_field;
use crate::problem::{EllipticInverseProblem, Q, U};
use crate::tensor_ext::{column, columns};
use crate::{CONFIG_FILENAME, MODEL_FILENAME, PREDICTION_FILENAME};

type MyBackend = NdArray<f32>;

/// 評価点での予測値・厳密解と相対L2誤差。
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub x: Vec<f32>,
    pub u_hat: Vec<f32>,
    pub u_true: Vec<f32>,
    pub q_hat: Vec<f32>,
    pub q_true: Vec<f32>,
    pub l2_u: f32,
    pub l2_q: f32,
}

/// 与えられた点でモデルを評価し、uとqそれぞれの相対L2誤差を計算します。
pub fn evaluate<B: Backend>(
    model: &Pfnn<B>,
    problem: &EllipticInverseProblem,
    x: &[f32],
    device: &B::Device,
) -> Result<Evaluation> {
    let predictions = model.forward(column(x, device));
    let mut fields = columns(predictions)?;
    let q_hat = fields.swap_remove(Q);
    let u_hat = fields.swap_remove(U);
    let u_true: Vec<f32> = x.iter().map(|&x| problem.exact_u(x)).collect();
    let q_true: Vec<f32> = x.iter().map(|&x| problem.exact_q(x)).collect();
    Ok(Evaluation {
        l2_u: l2_relative_error(&u_true, &u_hat)?,
        l2_q: l2_relative_error(&q_true, &q_hat)?,
        x: x.to_vec(),
        u_hat,
        u_true,
        q_hat,
        q_true,
    })
}

/// 評価結果を表示し、予測値のテキストファイルとグラフを保存します。
pub fn report(evaluation: &Evaluation, artifact_dir: &Path) -> Result<()> {
    info!("l2 relative error for u: {:.6e}", evaluation.l2_u);
    info!("l2 relative error for q: {:.6e}", evaluation.l2_q);

    let path = artifact_dir.join(PREDICTION_FILENAME);
    let mut out = BufWriter::new(File::create(&path)?);
    writeln!(out, "# x u_hat u_true q_hat q_true")?;
    for i in 0..evaluation.x.len() {
        writeln!(
            out,
            "{:.6e} {:.6e} {:.6e} {:.6e} {:.6e}",
            evaluation.x[i],
            evaluation.u_hat[i],
            evaluation.u_true[i],
            evaluation.q_hat[i],
            evaluation.q_true[i]
        )?;
    }
    out.flush()?;
    info!("=> 予測値を '{}' に保存しました。", path.display());

    let u_path = artifact_dir.join("u.png");
    plot_field("u", &evaluation.x, &evaluation.u_hat, &evaluation.u_true, &u_path)?;
    let q_path = artifact_dir.join("q.png");
    plot_field("q", &evaluation.x, &evaluation.q_hat, &evaluation.q_true, &q_path)?;
    info!(
        "=> グラフを '{}' と '{}' に保存しました。",
        u_path.display(),
        q_path.display()
    );
    Ok(())
}

/// `infer`サブコマンドを実行します。
pub fn run(artifact_dir: &Path, points: Option<usize>) -> Result<()> {
    let device = Default::default();

    let model_path = artifact_dir.join(MODEL_FILENAME);
    if !model_path.exists() {
        return Err(PinnError::MissingModel(model_path));
    }
    let config = ExperimentConfig::load(artifact_dir.join(CONFIG_FILENAME))?;
    config.validate()?;
    let num_points = points.unwrap_or(config.num_eval_points);
    if num_points == 0 {
        return Err(PinnError::InvalidConfig(
            "評価点の数は1以上である必要があります".to_string(),
        ));
    }
    let problem = EllipticInverseProblem::new(config.interval()?);

    info!("推論を実行します - バックエンド: NdArray (CPU)");
    let inference_start = Instant::now();

    info!("保存済みモデルを '{}' からロード中...", model_path.display());
    let model = config.model.init::<MyBackend>(&device).load_file(
        model_path.clone(),
        &NamedMpkFileRecorder::<FullPrecisionSettings>::new(),
        &device,
    )?;

    let x = problem.interval.uniform_points(num_points, true);
    let evaluation = evaluate(&model, &problem, &x, &device)?;
    info!(
        "推論が完了しました。評価点の数: {}, 推論時間: {:.2?}",
        num_points,
        inference_start.elapsed()
    );

    report(&evaluation, artifact_dir)
}
