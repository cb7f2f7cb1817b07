//! Dataset model shared by all chart types.

use crate::error::{ChartError, ChartResult};

/// Which axis a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// A single data point.
///
/// Unpaired points carry no `x`; their position is implied by index.
/// `text` overrides the displayed label when data values are shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: Option<f64>,
    pub y: f64,
    pub text: Option<String>,
}

impl Point {
    /// An unpaired value (x implied by index).
    pub fn value(y: f64) -> Self {
        Point {
            x: None,
            y,
            text: None,
        }
    }

    /// A paired (x, y) point.
    pub fn pair(x: f64, y: f64) -> Self {
        Point {
            x: Some(x),
            y,
            text: None,
        }
    }

    /// Set the displayed label for this point.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// An ordered series of points with a title used for the chart key.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub title: String,
    pub points: Vec<Point>,
}

impl Dataset {
    /// Build an unpaired dataset from bare y values.
    ///
    /// The input is materialized immediately, so one-shot iterators are
    /// safe to pass.
    pub fn from_values(title: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Dataset {
            title: title.into(),
            points: values.into_iter().map(Point::value).collect(),
        }
    }

    /// Build a paired dataset from (x, y) tuples.
    pub fn from_pairs(
        title: impl Into<String>,
        pairs: impl IntoIterator<Item = (f64, f64)>,
    ) -> Self {
        Dataset {
            title: title.into(),
            points: pairs.into_iter().map(|(x, y)| Point::pair(x, y)).collect(),
        }
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when the points carry explicit x values.
    ///
    /// Meaningful only after [`Dataset::validate`] has passed.
    pub fn is_paired(&self) -> bool {
        self.points.first().is_some_and(|p| p.x.is_some())
    }

    /// Check the dataset invariant: non-empty, and every point shares
    /// the dimensionality of the first.
    pub fn validate(&self) -> ChartResult<()> {
        if self.points.is_empty() {
            return Err(ChartError::DataShape(format!(
                "dataset '{}' contains no points",
                self.title
            )));
        }
        let paired = self.is_paired();
        if self.points.iter().any(|p| p.x.is_some() != paired) {
            return Err(ChartError::DataShape(format!(
                "dataset '{}' mixes paired and unpaired points",
                self.title
            )));
        }
        Ok(())
    }

    /// All values along one axis. For unpaired data the x values are
    /// the point indices.
    pub fn axis_values(&self, axis: Axis) -> Vec<f64> {
        match axis {
            Axis::Y => self.points.iter().map(|p| p.y).collect(),
            Axis::X => self
                .points
                .iter()
                .enumerate()
                .map(|(i, p)| p.x.unwrap_or(i as f64))
                .collect(),
        }
    }

    /// Order points by x, then y. Paired plots apply this so series
    /// render left to right regardless of input order.
    pub fn sort_by_x(&mut self) {
        self.points.sort_by(|a, b| {
            let ka = (a.x.unwrap_or(0.0), a.y);
            let kb = (b.x.unwrap_or(0.0), b.y);
            ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
        });
    }
}

/// Row-wise cumulative sums across datasets: row `d` holds, for every
/// field index, the sum of values from datasets `0..=d`. Used by
/// stacked bar and line charts.
pub fn cumulative_rows(datasets: &[Dataset]) -> Vec<Vec<f64>> {
    let width = datasets.iter().map(Dataset::len).max().unwrap_or(0);
    let mut running = vec![0.0; width];
    let mut rows = Vec::with_capacity(datasets.len());
    for set in datasets {
        for (i, point) in set.points.iter().enumerate() {
            running[i] += point.y;
        }
        rows.push(running.clone());
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpaired_axis_values_use_index() {
        let set = Dataset::from_values("a", [5.0, 7.0, 9.0]);
        assert_eq!(set.axis_values(Axis::X), vec![0.0, 1.0, 2.0]);
        assert_eq!(set.axis_values(Axis::Y), vec![5.0, 7.0, 9.0]);
    }

    #[test]
    fn mixed_dimensionality_is_rejected() {
        let mut set = Dataset::from_pairs("a", [(1.0, 2.0)]);
        set.push(Point::value(3.0));
        assert!(matches!(set.validate(), Err(ChartError::DataShape(_))));
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let set = Dataset::from_values("a", []);
        assert!(set.validate().is_err());
    }

    #[test]
    fn sort_by_x_orders_pairs() {
        let mut set = Dataset::from_pairs("a", [(3.0, 1.0), (1.0, 2.0), (2.0, 0.0)]);
        set.sort_by_x();
        let xs: Vec<f64> = set.points.iter().map(|p| p.x.unwrap()).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn cumulative_rows_accumulate_per_field() {
        let sets = vec![
            Dataset::from_values("a", [1.0, 2.0]),
            Dataset::from_values("b", [10.0, 20.0]),
        ];
        let rows = cumulative_rows(&sets);
        assert_eq!(rows[0], vec![1.0, 2.0]);
        assert_eq!(rows[1], vec![11.0, 22.0]);
    }
}
