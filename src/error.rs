use std::path::PathBuf;

use burn::config::ConfigError;
use burn::record::RecorderError;
use thiserror::Error;

/// クレート全体で使用するエラー型。
#[derive(Debug, Error)]
pub enum PinnError {
    #[error("設定が不正です: {0}")]
    InvalidConfig(String),
    #[error("区間が不正です: [{l}, {r}]")]
    InvalidInterval { l: f32, r: f32 },
    #[error(
        "モデルファイル '{}' が見つかりません。最初に 'train' コマンドでモデルを学習・保存してください。",
        .0.display()
    )]
    MissingModel(PathBuf),
    #[error("設定ファイルの読み込みに失敗しました: {0}")]
    Config(#[from] ConfigError),
    #[error("モデルの保存または読み込みに失敗しました: {0}")]
    Record(#[from] RecorderError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("テンソルデータの変換に失敗しました: {0}")]
    TensorData(String),
    #[error("指標を計算できません: {0}")]
    Metric(&'static str),
    #[error("損失の履歴が空です")]
    EmptyHistory,
    #[error("グラフの描画に失敗しました: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, PinnError>;
