//! Accumulators and rounding rules used by the daily rollup

/// Aggregation type for rollups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateType {
    Min,
    Max,
    Avg,
}

/// Accumulator for calculating an aggregate over multiple values
#[derive(Debug, Clone)]
pub struct Accumulator {
    values: Vec<f64>,
    aggregate_type: AggregateType,
}

impl Accumulator {
    pub fn with_values<I>(aggregate_type: AggregateType, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self {
            values: values.into_iter().collect(),
            aggregate_type,
        }
    }

    pub fn result(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }

        Some(match self.aggregate_type {
            AggregateType::Min => self.values.iter().copied().fold(f64::INFINITY, f64::min),
            AggregateType::Max => self
                .values
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max),
            AggregateType::Avg => {
                let sum: f64 = self.values.iter().sum();
                sum / self.values.len() as f64
            }
        })
    }
}

/// Round to the nearest integer, halves toward positive infinity
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round half-up to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    round_half_up(value * factor) / factor
}
