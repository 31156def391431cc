use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{PinnError, Result};
use crate::inference::Evaluation;

/// ある学習ステップでの損失と評価指標。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossRecord {
    pub step: usize,
    pub pde: f32,
    pub boundary: f32,
    pub observation: f32,
    /// 重み付きの総損失
    pub total: f32,
    /// テスト点での残差の二乗平均誤差
    pub test_pde: f32,
    pub l2_u: f32,
    pub l2_q: f32,
}

/// 学習中の損失の履歴と、総損失が最小だったステップ。
///
/// 最良のステップについては、テスト点での予測値も保持します。
#[derive(Debug, Clone, Default)]
pub struct LossHistory {
    records: Vec<LossRecord>,
    best: Option<LossRecord>,
    best_prediction: Option<Evaluation>,
}

impl LossHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記録を追加します。総損失が最小を更新した場合は `true` を返し、
    /// そのときのテスト点での予測値を保持します。
    pub fn push(&mut self, record: LossRecord, test_prediction: Evaluation) -> bool {
        let improved = self.best.is_none_or(|best| record.total < best.total);
        if improved {
            self.best = Some(record);
            self.best_prediction = Some(test_prediction);
        }
        self.records.push(record);
        improved
    }

    pub fn records(&self) -> &[LossRecord] {
        &self.records
    }

    pub fn best(&self) -> Option<&LossRecord> {
        self.best.as_ref()
    }

    pub fn best_prediction(&self) -> Option<&Evaluation> {
        self.best_prediction.as_ref()
    }

    pub fn last(&self) -> Option<&LossRecord> {
        self.records.last()
    }

    pub fn write_dat(&self, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(
            out,
            "# step loss_pde loss_boundary loss_observation loss_total test_pde l2_u l2_q"
        )?;
        for r in &self.records {
            writeln!(
                out,
                "{} {:.6e} {:.6e} {:.6e} {:.6e} {:.6e} {:.6e} {:.6e}",
                r.step, r.pde, r.boundary, r.observation, r.total, r.test_pde, r.l2_u, r.l2_q
            )?;
        }
        out.flush()?;
        Ok(())
    }

    /// 最良のステップでのテスト点の予測値を書き出します（`test.dat`）。
    pub fn write_best_dat(&self, path: &Path) -> Result<()> {
        let (Some(best), Some(prediction)) = (self.best, self.best_prediction.as_ref()) else {
            return Err(PinnError::EmptyHistory);
        };
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "# best step: {}", best.step)?;
        writeln!(out, "# x u_true q_true u_best q_best")?;
        for i in 0..prediction.x.len() {
            writeln!(
                out,
                "{:.6e} {:.6e} {:.6e} {:.6e} {:.6e}",
                prediction.x[i],
                prediction.u_true[i],
                prediction.q_true[i],
                prediction.u_hat[i],
                prediction.q_hat[i]
            )?;
        }
        out.flush()?;
        Ok(())
    }
}
