use burn::config::Config;
use burn::optim::AdamConfig;
use serde::{Deserialize, Serialize};

use crate::error::PinnError;
use crate::geometry::Interval;
use crate::model::PfnnConfig;
use crate::pinn::LossWeights;

/// 領域内の残差評価点の配置方法。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainDistribution {
    Uniform,
    Random,
}

/// 学習と評価の全設定。
///
/// 学習時に成果物ディレクトリへ `config.json` として保存され、
/// 推論時にはそこからモデルを再構築します。
#[derive(Config)]
pub struct ExperimentConfig {
    pub model: PfnnConfig,
    pub optimizer: AdamConfig,
    #[config(default = "-1.0")]
    pub domain_min: f32,
    #[config(default = 1.0)]
    pub domain_max: f32,
    /// 領域内の残差評価点の数（観測点はこれとは別にアンカーとして追加されます）
    #[config(default = 200)]
    pub num_domain: usize,
    #[config(default = 50)]
    pub num_boundary: usize,
    #[config(default = 100)]
    pub num_observations: usize,
    #[config(default = 1000)]
    pub num_test: usize,
    #[config(default = 500)]
    pub num_eval_points: usize,
    #[config(default = "TrainDistribution::Random")]
    pub train_distribution: TrainDistribution,
    #[config(default = 1e-4)]
    pub learning_rate: f64,
    #[config(default = 20000)]
    pub epochs: usize,
    #[config(default = 1000)]
    pub log_every: usize,
    #[config(default = 1.0)]
    pub pde_weight: f32,
    #[config(default = 100.0)]
    pub boundary_weight: f32,
    #[config(default = 1000.0)]
    pub observation_weight: f32,
    #[config(default = 42)]
    pub seed: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self::new(PfnnConfig::new(), AdamConfig::new())
    }
}

impl ExperimentConfig {
    pub fn interval(&self) -> crate::error::Result<Interval> {
        Interval::new(self.domain_min, self.domain_max)
    }

    pub fn loss_weights(&self) -> LossWeights {
        LossWeights {
            pde: self.pde_weight,
            boundary: self.boundary_weight,
            observation: self.observation_weight,
        }
    }

    /// 学習を始める前に設定の整合性を検査します。
    pub fn validate(&self) -> crate::error::Result<()> {
        self.interval()?;
        let counts = [
            ("num_domain", self.num_domain),
            ("num_boundary", self.num_boundary),
            ("num_observations", self.num_observations),
            ("num_test", self.num_test),
            ("num_eval_points", self.num_eval_points),
            ("epochs", self.epochs),
            ("log_every", self.log_every),
        ];
        if let Some((name, _)) = counts.iter().find(|(_, n)| *n == 0) {
            return Err(PinnError::InvalidConfig(format!(
                "{name} は1以上である必要があります"
            )));
        }
        if self.model.in_features != 1 {
            return Err(PinnError::InvalidConfig(
                "入力は1次元の座標xのみです (in_features = 1)".to_string(),
            ));
        }
        if self.model.outputs != 2 {
            return Err(PinnError::InvalidConfig(
                "出力は u と q の2成分です (outputs = 2)".to_string(),
            ));
        }
        if self.model.hidden.contains(&0) {
            return Err(PinnError::InvalidConfig(
                "隠れ層の幅は1以上である必要があります".to_string(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(PinnError::InvalidConfig(
                "学習率は正の有限値である必要があります".to_string(),
            ));
        }
        let weights = [self.pde_weight, self.boundary_weight, self.observation_weight];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(PinnError::InvalidConfig(
                "損失の重みは0以上の有限値である必要があります".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_reference_experiment() {
        let config = ExperimentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model.hidden, vec![20, 20, 20]);
        assert_eq!(config.epochs, 20000);
        assert_eq!(config.num_domain, 200);
        assert_eq!(config.num_boundary, 50);
        assert_eq!(config.num_observations, 100);
        let weights = config.loss_weights();
        assert_eq!((weights.pde, weights.boundary, weights.observation), (1.0, 100.0, 1000.0));
    }

    #[test]
    fn rejects_inconsistent_settings() {
        assert!(ExperimentConfig::default().with_epochs(0).validate().is_err());
        assert!(
            ExperimentConfig::default()
                .with_domain_min(2.0)
                .validate()
                .is_err()
        );
        assert!(
            ExperimentConfig::default()
                .with_learning_rate(-1.0)
                .validate()
                .is_err()
        );
        assert!(
            ExperimentConfig::new(PfnnConfig::new().with_outputs(3), AdamConfig::new())
                .validate()
                .is_err()
        );
        assert!(
            ExperimentConfig::default()
                .with_observation_weight(f32::NAN)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn survives_a_json_file() {
        let path = std::env::temp_dir().join(format!("pinn-config-{}.json", std::process::id()));
        let config = ExperimentConfig::default()
            .with_epochs(123)
            .with_train_distribution(TrainDistribution::Uniform);
        config.save(&path).unwrap();
        let loaded = ExperimentConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.epochs, 123);
        assert_eq!(loaded.train_distribution, TrainDistribution::Uniform);
        assert_eq!(loaded.model.hidden, config.model.hidden);
    }
}
