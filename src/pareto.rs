//! Pareto frontier over (volume, loss) and the tolerance band around it.

use crate::math::{interp, Scalar};

/// Two lower-is-better axes of a design.
pub trait Objectives {
    /// `(volume, loss)` or any other pair of minimised quantities.
    fn objectives(&self) -> (Scalar, Scalar);
}

impl Objectives for (Scalar, Scalar) {
    fn objectives(&self) -> (Scalar, Scalar) {
        *self
    }
}

impl<T: Objectives> Objectives for &T {
    fn objectives(&self) -> (Scalar, Scalar) {
        T::objectives(self)
    }
}

fn finite<T: Objectives>(item: &T) -> bool {
    let (x, y) = item.objectives();
    x.is_finite() && y.is_finite()
}

/// Indices of the Pareto-efficient items, ascending.
///
/// Each surviving point in turn acts as a pivot and removes every point that is not
/// strictly better than it on at least one axis. Exact duplicates therefore collapse
/// onto their first occurrence. Items with a non-finite objective are skipped.
#[must_use]
pub fn pareto_front<T: Objectives>(items: &[T]) -> Vec<usize> {
    let mut efficient: Vec<usize> = (0..items.len()).filter(|&i| finite(&items[i])).collect();
    let mut next = 0;
    while next < efficient.len() {
        let (px, py) = items[efficient[next]].objectives();
        let mut kept_before = 0;
        let mut survivors = Vec::with_capacity(efficient.len());
        for (pos, &i) in efficient.iter().enumerate() {
            let (x, y) = items[i].objectives();
            if pos == next || x < px || y < py {
                if pos < next {
                    kept_before += 1;
                }
                survivors.push(i);
            }
        }
        efficient = survivors;
        next = kept_before + 1;
    }
    efficient
}

/// Width of the band kept around the frontier, in multiples of the smallest frontier loss.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandConfig {
    /// Offset added above the interpolated frontier loss.
    pub factor_min: Scalar,
    /// Absolute ceiling on admitted loss.
    pub factor_max: Scalar,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            factor_min: 0.5,
            factor_max: 1000.0,
        }
    }
}

/// Indices of items whose loss lies within the band above the frontier, ascending.
///
/// `front` must be the output of [`pareto_front`] for the same items. Frontier points
/// are always part of the band.
#[must_use]
pub fn band<T: Objectives>(items: &[T], front: &[usize], config: &BandConfig) -> Vec<usize> {
    let mut curve: Vec<(Scalar, Scalar)> = front.iter().map(|&i| items[i].objectives()).collect();
    curve.sort_by(|a, b| a.0.total_cmp(&b.0));
    let (xs, ys): (Vec<Scalar>, Vec<Scalar>) = curve.into_iter().unzip();
    let Some(min_loss) = ys.iter().copied().reduce(Scalar::min) else {
        return Vec::new();
    };
    let offset = config.factor_min * min_loss;
    let ceiling = config.factor_max * min_loss;

    (0..items.len())
        .filter(|i| {
            if front.binary_search(i).is_ok() {
                return true;
            }
            let (x, y) = items[*i].objectives();
            if !(x.is_finite() && y.is_finite()) {
                return false;
            }
            interp(x, &xs, &ys).is_some_and(|reference| y < (reference + offset).max(-1.0).min(ceiling))
        })
        .collect()
}

/// Frontier and band indices of one design set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frontier {
    /// Pareto-efficient indices.
    pub efficient: Vec<usize>,
    /// Band indices; a superset of `efficient`.
    pub band: Vec<usize>,
}

impl Frontier {
    /// Computes frontier and band of `items`.
    #[must_use]
    pub fn compute<T: Objectives>(items: &[T], config: &BandConfig) -> Self {
        let efficient = pareto_front(items);
        let band = band(items, &efficient, config);
        Self { efficient, band }
    }

    /// Clones the Pareto-efficient items.
    #[must_use]
    pub fn efficient_items<T: Clone>(&self, items: &[T]) -> Vec<T> {
        self.efficient.iter().map(|&i| items[i].clone()).collect()
    }

    /// Clones the band items.
    #[must_use]
    pub fn band_items<T: Clone>(&self, items: &[T]) -> Vec<T> {
        self.band.iter().map(|&i| items[i].clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<(Scalar, Scalar)> {
        (0..40_u32)
            .map(|k| {
                let v = 10.0 + 7.0 * Scalar::from(k % 9) + Scalar::from(k);
                let l = 50.0 / v + Scalar::from((k * 7) % 5);
                (v, l)
            })
            .collect()
    }

    #[test]
    fn two_point_tradeoff_excludes_interior_loser() {
        let mut items = vec![(100.0, 5.0), (200.0, 3.0)];
        assert_eq!(pareto_front(&items), vec![0, 1]);

        items.push((150.0, 6.0));
        let front = pareto_front(&items);
        assert_eq!(front, vec![0, 1]);
        // interpolated frontier loss at 150 is 4; offset 0.5·3 leaves 6 outside
        assert_eq!(band(&items, &front, &BandConfig::default()), vec![0, 1]);
        let wide = BandConfig {
            factor_min: 2.0,
            factor_max: 1000.0,
        };
        assert_eq!(band(&items, &front, &wide), vec![0, 1, 2]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let items = grid();
        let front = Frontier::compute(&items, &BandConfig::default()).efficient_items(&items);
        assert!(!front.is_empty());
        assert_eq!(pareto_front(&front), (0..front.len()).collect::<Vec<_>>());
    }

    #[test]
    fn band_contains_frontier() {
        let items = grid();
        for (factor_min, factor_max) in [(0.0, 0.0), (0.01, 1.0), (0.5, 1000.0), (10.0, 2.0)] {
            let config = BandConfig { factor_min, factor_max };
            let frontier = Frontier::compute(&items, &config);
            assert!(frontier.efficient.iter().all(|i| frontier.band.contains(i)));
            assert!(frontier.band.iter().all(|&i| i < items.len()));
        }
    }

    #[test]
    fn duplicates_keep_first_and_nan_is_skipped() {
        let items = [(1.0, 1.0), (1.0, 1.0), (2.0, 0.5), (Scalar::NAN, 0.1), (0.5, Scalar::INFINITY)];
        assert_eq!(pareto_front(&items), vec![0, 2]);
    }

    #[test]
    fn result_does_not_depend_on_order() {
        let items = grid();
        let reversed: Vec<_> = items.iter().rev().copied().collect();
        let mut a: Vec<_> = pareto_front(&items).into_iter().map(|i| items[i]).collect();
        let mut b: Vec<_> = pareto_front(&reversed).into_iter().map(|i| reversed[i]).collect();
        a.sort_by(|p, q| p.0.total_cmp(&q.0));
        b.sort_by(|p, q| p.0.total_cmp(&q.0));
        assert_eq!(a, b);
    }
}
