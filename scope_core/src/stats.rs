//! Summary statistics over a history snapshot.
//!
//! Pure and stateless: recomputed from the snapshot on every call.

/// Statistics for a non-empty snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation; `None` with fewer than two readings.
    pub std_dev: Option<f64>,
}

/// Summarize `values`; `None` when there is nothing to summarize.
pub fn summarize(values: &[f64]) -> Option<Summary> {
    let (&first, rest) = values.split_first()?;
    let mut min = first;
    let mut max = first;
    let mut sum = first;
    for &v in rest {
        min = min.min(v);
        max = max.max(v);
        sum += v;
    }
    let n = values.len() as f64;
    let mean = sum / n;
    let std_dev = (values.len() > 1).then(|| {
        let var = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n;
        var.sqrt()
    });
    Some(Summary {
        count: values.len(),
        min,
        max,
        mean,
        std_dev,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_unavailable() {
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn single_value_has_no_std_dev() {
        let s = summarize(&[42.0]).unwrap();
        assert_eq!((s.min, s.max, s.mean), (42.0, 42.0, 42.0));
        assert_eq!(s.std_dev, None);
    }

    #[test]
    fn population_std_dev() {
        let s = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(s.mean, 5.0);
        assert_eq!(s.std_dev, Some(2.0));
        assert_eq!(s.count, 8);
    }
}
