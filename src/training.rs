use std::path::Path;
use std::time::Instant;

use burn::backend::{Autodiff, NdArray};
use burn::config::Config;
use burn::module::{AutodiffModule, Module};
use burn::optim::{GradientsParams, Optimizer};
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder};
use burn::tensor::backend::AutodiffBackend;
use tracing::{debug, info};

use crate::config::ExperimentConfig;
use crate::data::TrainingPoints;
use crate::error::Result;
use crate::history::{LossHistory, LossRecord};
use crate::inference::{evaluate, report};
use crate::model::Pfnn;
use crate::pinn::{compute_losses, pde_loss};
use crate::plot::{plot_field, plot_loss_history};
use crate::problem::EllipticInverseProblem;
use crate::tensor_ext::{column, inner_device, scalar};
use crate::{
    CONFIG_FILENAME, LOSS_FILENAME, LOSS_PLOT_FILENAME, MODEL_FILENAME, TEST_FILENAME,
    TRAIN_FILENAME,
};

type MyBackend = Autodiff<NdArray<f32>>;

/// 学習済みモデル、損失の履歴、学習に用いた点。
#[derive(Debug)]
pub struct TrainOutput<B: AutodiffBackend> {
    pub model: Pfnn<B>,
    pub history: LossHistory,
    pub points: TrainingPoints,
}

/// モデルを学習します。
///
/// `log_every` ステップごと（および最終ステップ）に学習損失とテスト点での指標を記録します。
pub fn train<B: AutodiffBackend>(
    config: &ExperimentConfig,
    device: &B::Device,
) -> Result<TrainOutput<B>> {
    config.validate()?;
    B::seed(config.seed);

    // --- データセットの準備 ---
    let problem = EllipticInverseProblem::new(config.interval()?);
    let points = TrainingPoints::generate(&problem, config);
    let batch = points.to_batch::<B>(device);
    let weights = config.loss_weights();
    info!(
        "残差評価点: {}, 境界点: {}, 観測点: {}, テスト点: {}",
        points.domain.len(),
        points.boundary.len(),
        points.observation_x.len(),
        points.test.len()
    );

    // --- モデルとオプティマイザの初期化 ---
    let mut model = config.model.init::<B>(device);
    let mut optim = config.optimizer.init();
    let mut history = LossHistory::new();

    // --- 学習ループ ---
    for epoch in 1..=config.epochs {
        let terms = compute_losses(&model, &problem, &batch, weights);
        let total_loss = terms.total();

        if epoch % config.log_every == 0 || epoch == config.epochs {
            let valid = model.valid();
            let inner_device = inner_device(&batch.domain);
            let test_pde = scalar(pde_loss(
                &valid,
                &problem,
                column(&points.test, &inner_device),
            ));
            let evaluation = evaluate(&valid, &problem, &points.test, &inner_device)?;
            let record = LossRecord {
                step: epoch,
                pde: scalar(terms.pde.clone()),
                boundary: scalar(terms.boundary.clone()),
                observation: scalar(terms.observation.clone()),
                total: scalar(total_loss.clone()),
                test_pde,
                l2_u: evaluation.l2_u,
                l2_q: evaluation.l2_q,
            };
            info!(
                "[Epoch {}] Total Loss: {:.6e}, PDE: {:.6e}, BC: {:.6e}, Obs: {:.6e}, Test PDE: {:.6e}, L2(u): {:.3e}, L2(q): {:.3e}",
                record.step,
                record.total,
                record.pde,
                record.boundary,
                record.observation,
                record.test_pde,
                record.l2_u,
                record.l2_q
            );
            history.push(record, evaluation);
        }

        let grads = total_loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optim.step(config.learning_rate, model, grads);
    }

    if let Some(best) = history.best() {
        debug!("最良のステップ: {} (総損失 {:.6e})", best.step, best.total);
    }
    Ok(TrainOutput {
        model,
        history,
        points,
    })
}

/// `train`サブコマンドを実行します。
///
/// 学習後、設定・モデル・損失履歴を成果物ディレクトリに保存し、評価まで行います。
pub fn run(config: &ExperimentConfig, artifact_dir: &Path) -> Result<()> {
    let device = Default::default();
    config.validate()?;
    std::fs::create_dir_all(artifact_dir)?;
    config.save(artifact_dir.join(CONFIG_FILENAME))?;

    info!("学習を開始します (楕円型方程式の逆問題) - バックエンド: NdArray (CPU)");
    let training_start = Instant::now();
    let TrainOutput {
        model,
        history,
        points,
    } = train::<MyBackend>(config, &device)?;
    info!("学習が完了しました。");
    info!("=> 学習時間: {:.2?}", training_start.elapsed());

    // --- 結果の保存と描画 ---
    let loss_path = artifact_dir.join(LOSS_FILENAME);
    history.write_dat(&loss_path)?;
    info!("=> 損失の履歴を '{}' に保存しました。", loss_path.display());
    let plot_path = artifact_dir.join(LOSS_PLOT_FILENAME);
    plot_loss_history(&history, &plot_path)?;
    info!("=> 損失グラフを '{}' に保存しました。", plot_path.display());

    let train_path = artifact_dir.join(TRAIN_FILENAME);
    points.write_dat(&train_path)?;
    let test_path = artifact_dir.join(TEST_FILENAME);
    history.write_best_dat(&test_path)?;
    if let Some(best) = history.best_prediction() {
        plot_field("u", &best.x, &best.u_hat, &best.u_true, &artifact_dir.join("test_u.png"))?;
        plot_field("q", &best.x, &best.q_hat, &best.q_true, &artifact_dir.join("test_q.png"))?;
    }
    info!(
        "=> 学習点を '{}' に、最良のステップでの予測値を '{}' に保存しました。",
        train_path.display(),
        test_path.display()
    );

    info!("学習済みモデルを保存中...");
    let model_path = artifact_dir.join(MODEL_FILENAME);
    let model = model.valid();
    model.clone().save_file(
        model_path.clone(),
        &NamedMpkFileRecorder::<FullPrecisionSettings>::new(),
    )?;
    info!("=> モデルを '{}' に保存しました。", model_path.display());

    let problem = EllipticInverseProblem::new(config.interval()?);
    let x = problem.interval.uniform_points(config.num_eval_points, true);
    let evaluation = evaluate(&model, &problem, &x, &device)?;
    report(&evaluation, artifact_dir)
}
