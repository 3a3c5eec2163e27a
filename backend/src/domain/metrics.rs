//! Diet metrics derived from a user's meal history.
//!
//! The calculator is a pure function of the meals' `(date, is_on_diet)`
//! pairs: no I/O, no clock access, fully unit testable. The store does not
//! guarantee any ordering, so the meals are sorted here before the streak
//! scan; the sort is stable so equal timestamps keep their source order.

use chrono::{DateTime, Utc};

use super::meal::Meal;

/// Aggregate statistics over a user's meal set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DietMetrics {
    /// Count of all meals.
    pub total: u64,
    /// Count of meals flagged on-diet.
    pub meals_in_diet: u64,
    /// Count of meals flagged off-diet.
    pub meals_out_diet: u64,
    /// Longest run of consecutive on-diet meals in chronological order.
    pub best_sequence: u64,
}

impl DietMetrics {
    /// Compute metrics for `meals`; all zeros for an empty set.
    pub fn from_meals(meals: &[Meal]) -> Self {
        let samples: Vec<(DateTime<Utc>, bool)> = meals
            .iter()
            .map(|meal| (meal.date(), meal.is_on_diet()))
            .collect();
        Self::from_samples(samples)
    }

    fn from_samples(mut samples: Vec<(DateTime<Utc>, bool)>) -> Self {
        let total = samples.len() as u64;
        let meals_in_diet = samples.iter().filter(|(_, on_diet)| *on_diet).count() as u64;
        let meals_out_diet = total - meals_in_diet;

        samples.sort_by_key(|(date, _)| *date);

        let mut best_sequence = 0u64;
        let mut current = 0u64;
        for (_, on_diet) in samples {
            current = if on_diet { current + 1 } else { 0 };
            best_sequence = best_sequence.max(current);
        }

        Self {
            total,
            meals_in_diet,
            meals_out_diet,
            best_sequence,
        }
    }
}
