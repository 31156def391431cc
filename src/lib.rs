//! # 物理情報ニューラルネットワーク (PINN) による逆問題
//!
//! `burn` フレームワークを使用して、1次元の楕円型方程式 `-u'' + q = 0` の
//! 逆問題を解くための主要なコンポーネントを提供します。
//! 状態uの境界値と観測値のみから、未知の場qをネットワークで推定します。

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod history;
pub mod inference;
pub mod metrics;
pub mod model;
pub mod pinn;
pub mod plot;
pub mod problem;
pub mod tensor_ext;
pub mod training;

pub use error::{PinnError, Result};

/// 成果物を保存する既定のディレクトリ
pub const DEFAULT_ARTIFACT_DIR: &str = "artifacts";
/// モデルを保存するファイル名
pub const MODEL_FILENAME: &str = "model.mpk";
pub const CONFIG_FILENAME: &str = "config.json";
pub const LOSS_FILENAME: &str = "loss.dat";
pub const LOSS_PLOT_FILENAME: &str = "loss.png";
pub const PREDICTION_FILENAME: &str = "prediction.dat";
/// 学習点と目標値
pub const TRAIN_FILENAME: &str = "train.dat";
/// 最良のステップでのテスト点の予測値
pub const TEST_FILENAME: &str = "test.dat";
