use std::collections::HashMap;

use tracing::{debug, instrument};

use super::series::TimedValue;

#[derive(Debug, Default, Clone, Copy)]
struct RunningMean {
    sum: f64,
    count: usize,
}

impl RunningMean {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/**
Average the observations of each year in a single grouping pass.

## Arguments
- `observations`: `(year, value)` pairs in any order; a year may repeat.

## Returns
One `TimedValue` per distinct year, in first-seen year order. Years without a
contributing observation never appear.
 */
#[instrument(level = "debug", skip(observations))]
pub fn yearly_averages<I>(observations: I) -> Vec<TimedValue>
where
    I: IntoIterator<Item = (i32, f64)>,
{
    let mut order: Vec<i32> = Vec::new();
    let mut groups: HashMap<i32, RunningMean> = HashMap::new();

    for (year, value) in observations {
        groups
            .entry(year)
            .or_insert_with(|| {
                order.push(year);
                RunningMean::default()
            })
            .push(value);
    }

    let averages: Vec<TimedValue> = order
        .into_iter()
        .filter_map(|year| {
            let mean = groups.get(&year).and_then(RunningMean::mean)?;
            Some(TimedValue::new(year, mean))
        })
        .collect();
    debug!("Averaged {} distinct years", averages.len());
    averages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yearly_averages_first_seen_order() {
        let observations = vec![
            (2005, 10.0),
            (2001, 4.0),
            (2005, 20.0),
            (2003, 7.0),
            (2001, 6.0),
        ];
        let averages = yearly_averages(observations);
        assert_eq!(
            averages,
            vec![
                TimedValue::new(2005, 15.0),
                TimedValue::new(2001, 5.0),
                TimedValue::new(2003, 7.0),
            ]
        );
    }

    #[test]
    fn test_yearly_average_is_mean_of_exactly_its_year() {
        let observations = vec![(2010, 1.0), (2011, 100.0), (2010, 2.0), (2010, 6.0)];
        let averages = yearly_averages(observations.clone());
        for average in &averages {
            let members: Vec<f64> = observations
                .iter()
                .filter(|(year, _)| *year == average.year)
                .map(|(_, value)| *value)
                .collect();
            assert!(!members.is_empty());
            let expected = members.iter().sum::<f64>() / members.len() as f64;
            assert!((average.value - expected).abs() < 1e-12);
        }
        assert_eq!(averages.len(), 2);
    }

    #[test]
    fn test_yearly_averages_empty_input() {
        let averages = yearly_averages(Vec::<(i32, f64)>::new());
        assert!(averages.is_empty());
    }
}
