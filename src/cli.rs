use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::DEFAULT_ARTIFACT_DIR;

/// clapでコマンドラインの構造を定義します。
#[derive(Parser, Debug)]
#[command(author, version, about = "An inverse-problem PINN for a 1-D elliptic equation with Burn", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 実行するサブコマンドを定義します（train または infer）。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// PINNモデルを学習し、結果をファイルに保存します
    Train {
        /// 設定ファイル（JSON）。省略時は既定の設定を使います
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// 成果物を保存するディレクトリ
        #[arg(short, long, default_value = DEFAULT_ARTIFACT_DIR)]
        artifact_dir: PathBuf,
        /// 学習ステップ数を上書きします
        #[arg(long)]
        epochs: Option<usize>,
        /// 乱数シードを上書きします
        #[arg(long)]
        seed: Option<u64>,
    },
    /// 保存されたPINNモデルを使い、推論を実行します
    Infer {
        #[arg(short, long, default_value = DEFAULT_ARTIFACT_DIR)]
        artifact_dir: PathBuf,
        /// 評価点の数を上書きします
        #[arg(long)]
        points: Option<usize>,
    },
}
