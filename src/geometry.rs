//! 1次元の計算領域（区間）と、その上での点のサンプリング。

use rand::Rng;

use crate::error::{PinnError, Result};

/// 境界判定に用いる許容誤差
const BOUNDARY_TOLERANCE: f32 = 1e-6;

/// 閉区間 `[l, r]`。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    l: f32,
    r: f32,
}

impl Interval {
    /// 新しい区間を作成します。`l < r` かつ両端が有限である必要があります。
    pub fn new(l: f32, r: f32) -> Result<Self> {
        if !l.is_finite() || !r.is_finite() || l >= r {
            return Err(PinnError::InvalidInterval { l, r });
        }
        Ok(Self { l, r })
    }

    pub fn l(&self) -> f32 {
        self.l
    }

    pub fn r(&self) -> f32 {
        self.r
    }

    pub fn length(&self) -> f32 {
        self.r - self.l
    }

    pub fn contains(&self, x: f32) -> bool {
        (self.l..=self.r).contains(&x)
    }

    pub fn on_boundary(&self, x: f32) -> bool {
        (x - self.l).abs() < BOUNDARY_TOLERANCE || (x - self.r).abs() < BOUNDARY_TOLERANCE
    }

    /// 等間隔の点を `n` 個生成します。
    ///
    /// `boundary` が真なら両端を含み、偽なら両端を除いた内部の点のみを返します。
    pub fn uniform_points(&self, n: usize, boundary: bool) -> Vec<f32> {
        if boundary {
            match n {
                0 => Vec::new(),
                1 => vec![self.l],
                _ => {
                    let step = self.length() / (n - 1) as f32;
                    (0..n)
                        .map(|i| if i == n - 1 { self.r } else { self.l + i as f32 * step })
                        .collect()
                }
            }
        } else {
            let step = self.length() / (n + 1) as f32;
            (1..=n).map(|i| self.l + i as f32 * step).collect()
        }
    }

    pub fn random_points<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f32> {
        (0..n).map(|_| rng.random_range(self.l..self.r)).collect()
    }

    /// 境界点を `n` 個生成します。前半が左端、残りが右端です。
    pub fn uniform_boundary_points(&self, n: usize) -> Vec<f32> {
        let n_left = n / 2;
        (0..n)
            .map(|i| if i < n_left { self.l } else { self.r })
            .collect()
    }

    pub fn random_boundary_points<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f32> {
        (0..n)
            .map(|_| if rng.random_bool(0.5) { self.l } else { self.r })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn rejects_empty_or_reversed_interval() {
        assert!(Interval::new(1.0, 1.0).is_err());
        assert!(Interval::new(1.0, -1.0).is_err());
        assert!(Interval::new(f32::NAN, 1.0).is_err());
    }

    #[test]
    fn uniform_points_with_boundary_hit_both_ends() {
        let interval = Interval::new(-1.0, 1.0).unwrap();
        let xs = interval.uniform_points(5, true);
        assert_eq!(xs.len(), 5);
        assert_relative_eq!(xs[0], -1.0);
        assert_relative_eq!(xs[2], 0.0);
        assert_relative_eq!(xs[4], 1.0);

        assert_eq!(interval.uniform_points(1, true), vec![-1.0]);
        assert!(interval.uniform_points(0, true).is_empty());
    }

    #[test]
    fn uniform_points_without_boundary_stay_inside() {
        let interval = Interval::new(-1.0, 1.0).unwrap();
        let xs = interval.uniform_points(3, false);
        assert_eq!(xs.len(), 3);
        assert_relative_eq!(xs[0], -0.5);
        assert_relative_eq!(xs[1], 0.0);
        assert_relative_eq!(xs[2], 0.5);
        assert!(xs.iter().all(|&x| !interval.on_boundary(x)));
    }

    #[test]
    fn random_points_lie_in_interval() {
        let interval = Interval::new(-1.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let xs = interval.random_points(1000, &mut rng);
        assert_eq!(xs.len(), 1000);
        assert!(xs.iter().all(|&x| interval.contains(x)));
    }

    #[test]
    fn boundary_points_are_ends_only() {
        let interval = Interval::new(-1.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let random = interval.random_boundary_points(50, &mut rng);
        assert!(random.iter().all(|&x| interval.on_boundary(x)));
        assert!(random.contains(&-1.0) && random.contains(&1.0));

        let uniform = interval.uniform_boundary_points(5);
        assert_eq!(uniform, vec![-1.0, -1.0, 1.0, 1.0, 1.0]);
    }
}
