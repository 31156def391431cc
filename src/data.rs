use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use burn::prelude::Backend;
use burn::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{ExperimentConfig, TrainDistribution};
use crate::error::Result;
use crate::problem::EllipticInverseProblem;
use crate::tensor_ext::column;

/// 学習・テストに用いる点の集合（ホスト側）。
#[derive(Debug, Clone)]
pub struct TrainingPoints {
    /// 残差を評価する点（領域内の点 + 境界点 + アンカーとしての観測点）
    pub domain: Vec<f32>,
    /// Dirichlet条件を課す点（境界点 + 区間の端にあるアンカー）
    pub boundary: Vec<f32>,
    pub boundary_values: Vec<f32>,
    pub observation_x: Vec<f32>,
    pub observation_u: Vec<f32>,
    pub test: Vec<f32>,
}

impl TrainingPoints {
    pub fn generate(problem: &EllipticInverseProblem, config: &ExperimentConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let interval = problem.interval;

        let (observation_x, observation_u) = problem.observations(config.num_observations);

        let (mut domain, mut boundary) = match config.train_distribution {
            TrainDistribution::Uniform => (
                interval.uniform_points(config.num_domain, false),
                interval.uniform_boundary_points(config.num_boundary),
            ),
            TrainDistribution::Random => (
                interval.random_points(config.num_domain, &mut rng),
                interval.random_boundary_points(config.num_boundary, &mut rng),
            ),
        };
        domain.extend_from_slice(&boundary);
        domain.extend_from_slice(&observation_x);
        boundary.extend(observation_x.iter().filter(|&&x| interval.on_boundary(x)));

        let boundary_values = boundary
            .iter()
            .map(|&x| problem.boundary_value(x))
            .collect();
        let test = interval.uniform_points(config.num_test, false);

        Self {
            domain,
            boundary,
            boundary_values,
            observation_x,
            observation_u,
            test,
        }
    }

    /// 学習点とそれぞれの制約の目標値を書き出します（`train.dat`）。
    ///
    /// 残差点の目標値は0、Dirichlet点と観測点の目標値はuの値です。
    pub fn write_dat(&self, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "# x constraint target")?;
        let rows = self
            .domain
            .iter()
            .map(|&x| (x, "pde", 0.0))
            .chain(
                self.boundary
                    .iter()
                    .zip(&self.boundary_values)
                    .map(|(&x, &v)| (x, "dirichlet", v)),
            )
            .chain(
                self.observation_x
                    .iter()
                    .zip(&self.observation_u)
                    .map(|(&x, &u)| (x, "observation", u)),
            );
        for (x, constraint, target) in rows {
            writeln!(out, "{x:.6e} {constraint} {target:.6e}")?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn to_batch<B: Backend>(&self, device: &B::Device) -> PinnBatch<B> {
        PinnBatch {
            domain: column(&self.domain, device),
            boundary: column(&self.boundary, device),
            boundary_values: column(&self.boundary_values, device),
            observation_x: column(&self.observation_x, device),
            observation_u: column(&self.observation_u, device),
        }
    }
}

/// 損失計算に渡すテンソル群。いずれも形状は `[n, 1]` です。
#[derive(Debug, Clone)]
pub struct PinnBatch<B: Backend> {
    pub domain: Tensor<B, 2>,
    pub boundary: Tensor<B, 2>,
    pub boundary_values: Tensor<B, 2>,
    pub observation_x: Tensor<B, 2>,
    pub observation_u: Tensor<B, 2>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    fn problem(config: &ExperimentConfig) -> EllipticInverseProblem {
        EllipticInverseProblem::new(config.interval().unwrap())
    }

    #[test]
    fn observation_points_are_added_as_anchors() {
        let config = ExperimentConfig::default();
        let points = TrainingPoints::generate(&problem(&config), &config);
        assert_eq!(points.domain.len(), 200 + 50 + 100);
        assert_eq!(points.observation_x.len(), 100);
        assert_eq!(points.test.len(), 1000);
        assert_eq!(&points.domain[250..], points.observation_x.as_slice());
    }

    #[test]
    fn residual_and_dirichlet_sets_share_the_boundary_samples() {
        let config = ExperimentConfig::default();
        let points = TrainingPoints::generate(&problem(&config), &config);
        // 50個の境界点に、x = -1 と x = 1 の観測点が加わる
        assert_eq!(points.boundary.len(), 52);
        assert_eq!(points.boundary_values.len(), 52);
        assert_eq!(&points.domain[200..250], &points.boundary[..50]);
        assert_eq!(&points.boundary[50..], &[-1.0, 1.0]);
    }

    #[test]
    fn same_seed_gives_same_points() {
        let config = ExperimentConfig::default();
        let a = TrainingPoints::generate(&problem(&config), &config);
        let b = TrainingPoints::generate(&problem(&config), &config);
        assert_eq!(a.domain, b.domain);
        assert_eq!(a.boundary, b.boundary);

        let other = config.clone().with_seed(config.seed + 1);
        let c = TrainingPoints::generate(&problem(&other), &other);
        assert_ne!(a.domain, c.domain);
    }

    #[test]
    fn boundary_values_are_homogeneous() {
        let config = ExperimentConfig::default().with_train_distribution(TrainDistribution::Uniform);
        let points = TrainingPoints::generate(&problem(&config), &config);
        assert!(points.boundary_values.iter().all(|v| v.abs() < 1e-6));
        assert!(points.domain[..200].iter().all(|&x| x > -1.0 && x < 1.0));
    }

    #[test]
    fn dat_file_lists_every_constraint_point() {
        let config = ExperimentConfig::default()
            .with_num_domain(4)
            .with_num_boundary(2)
            .with_num_observations(3);
        let points = TrainingPoints::generate(&problem(&config), &config);
        let path = std::env::temp_dir().join(format!("pinn-train-{}.dat", std::process::id()));
        points.write_dat(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let lines: Vec<&str> = text.lines().skip(1).collect();
        let count = |kind: &str| lines.iter().filter(|l| l.contains(kind)).count();
        // 残差点: 4 + 2 + 3, Dirichlet点: 2 + 両端の観測点2, 観測点: 3
        assert_eq!(count(" pde "), 9);
        assert_eq!(count(" dirichlet "), 4);
        assert_eq!(count(" observation "), 3);
        assert!(lines.contains(&"0.000000e0 observation 0.000000e0"));
    }

    #[test]
    fn batch_tensors_are_columns() {
        let config = ExperimentConfig::default();
        let points = TrainingPoints::generate(&problem(&config), &config);
        let batch = points.to_batch::<NdArray<f32>>(&Default::default());
        assert_eq!(batch.domain.dims(), [350, 1]);
        assert_eq!(batch.boundary.dims(), [52, 1]);
        assert_eq!(batch.observation_u.dims(), [100, 1]);
    }
}
