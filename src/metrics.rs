use crate::error::{PinnError, Result};

/// 相対L2誤差 `||truth - pred|| / ||truth||`。
pub fn l2_relative_error(truth: &[f32], pred: &[f32]) -> Result<f32> {
    check_lengths(truth, pred)?;
    let norm = truth.iter().map(|t| t * t).sum::<f32>().sqrt();
    if norm == 0.0 {
        return Err(PinnError::Metric("真値のノルムが0です"));
    }
    let diff = truth
        .iter()
        .zip(pred)
        .map(|(t, p)| (t - p) * (t - p))
        .sum::<f32>()
        .sqrt();
    Ok(diff / norm)
}

pub fn mean_squared_error(truth: &[f32], pred: &[f32]) -> Result<f32> {
    check_lengths(truth, pred)?;
    let sum = truth
        .iter()
        .zip(pred)
        .map(|(t, p)| (t - p) * (t - p))
        .sum::<f32>();
    Ok(sum / truth.len() as f32)
}

fn check_lengths(truth: &[f32], pred: &[f32]) -> Result<()> {
    if truth.is_empty() {
        return Err(PinnError::Metric("入力が空です"));
    }
    if truth.len() != pred.len() {
        return Err(PinnError::Metric("真値と予測値の長さが一致しません"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn relative_error_of_scaled_prediction() {
        let truth = [3.0, 4.0];
        let pred = [3.3, 4.4];
        assert_relative_eq!(l2_relative_error(&truth, &pred).unwrap(), 0.1, epsilon = 1e-6);
        assert_relative_eq!(l2_relative_error(&truth, &truth).unwrap(), 0.0);
    }

    #[test]
    fn mse_of_constant_offset() {
        assert_relative_eq!(
            mean_squared_error(&[1.0, 2.0, 3.0], &[1.5, 2.5, 3.5]).unwrap(),
            0.25
        );
    }

    #[test]
    fn undefined_inputs_are_errors() {
        assert!(l2_relative_error(&[0.0, 0.0], &[1.0, 1.0]).is_err());
        assert!(l2_relative_error(&[1.0], &[1.0, 2.0]).is_err());
        assert!(mean_squared_error(&[], &[]).is_err());
    }
}
