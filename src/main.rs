//! # 物理情報ニューラルネットワーク (PINN) による逆問題
//!
//! 1次元の楕円型方程式 `-u'' + q = 0` について、uの観測値から
//! 未知の場qを推定するサンプルです。
//!
//! ## 使い方
//!
//! ### 学習
//! ```bash
//! cargo run --release -- train
//! ```
//!
//! ### 推論
//! ```bash
//! cargo run --release -- infer
//! ```
//!
//! ログの詳細度は `RUST_LOG` 環境変数で変更できます。

use std::process::ExitCode;

use burn::config::Config;
use clap::Parser;
use elliptic_inverse_pinn::cli::{Cli, Commands};
use elliptic_inverse_pinn::config::ExperimentConfig;
use elliptic_inverse_pinn::{Result, inference, training};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Train {
            config,
            artifact_dir,
            epochs,
            seed,
        } => {
            let mut config = match config {
                Some(path) => ExperimentConfig::load(path)?,
                None => ExperimentConfig::default(),
            };
            if let Some(epochs) = epochs {
                config.epochs = epochs;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            training::run(&config, &artifact_dir)
        }
        Commands::Infer {
            artifact_dir,
            points,
        } => inference::run(&artifact_dir, points),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
