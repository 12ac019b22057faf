use rand::seq::IndexedRandom;
use rand::Rng;
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::types::{Cuisine, Diet, Dish};

/// Cooking-time bucket of the time filter. The serialized values mirror the
/// select options of the UI ("10" … "120"); `Under*` buckets are inclusive
/// upper bounds, `Over60` matches strictly more than an hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString, VariantArray)]
pub enum TimeBucket {
    #[strum(serialize = "10")]
    Under10,
    #[strum(serialize = "15")]
    Under15,
    #[strum(serialize = "25")]
    Under25,
    #[strum(serialize = "45")]
    Under45,
    #[strum(serialize = "60")]
    Under60,
    #[strum(serialize = "120")]
    Over60,
}

impl TimeBucket {
    pub fn matches(self, minutes: u16) -> bool {
        match self {
            TimeBucket::Under10 => minutes <= 10,
            TimeBucket::Under15 => minutes <= 15,
            TimeBucket::Under25 => minutes <= 25,
            TimeBucket::Under45 => minutes <= 45,
            TimeBucket::Under60 => minutes <= 60,
            TimeBucket::Over60 => minutes > 60,
        }
    }

    /// Label shown in the time select.
    pub fn label(self) -> &'static str {
        match self {
            TimeBucket::Under10 => "unter 10 min",
            TimeBucket::Under15 => "unter 15 min",
            TimeBucket::Under25 => "unter 25 min",
            TimeBucket::Under45 => "unter 45 min",
            TimeBucket::Under60 => "unter 1h",
            TimeBucket::Over60 => "über 1h",
        }
    }
}

/// Active filter selections. `None` means "Alle" for that criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub time: Option<TimeBucket>,
    pub cuisine: Option<Cuisine>,
    pub diet: Option<Diet>,
}

impl FilterCriteria {
    pub fn is_any(&self) -> bool {
        self.time.is_none() && self.cuisine.is_none() && self.diet.is_none()
    }
}

/// Narrow `dishes` down to those matching every active criterion. An
/// all-"Alle" filter returns the full catalog; zero matches is an empty
/// list, not an error.
pub fn filter<'a>(dishes: &'a [Dish], criteria: &FilterCriteria) -> Vec<&'a Dish> {
    dishes
        .iter()
        .filter(|d| criteria.time.is_none_or(|t| t.matches(d.prep_minutes)))
        .filter(|d| criteria.cuisine.is_none_or(|c| d.cuisine == c))
        .filter(|d| criteria.diet.is_none_or(|v| d.diet == v))
        .collect()
}

/// Uniform random pick from `filtered`, falling back to the full catalog
/// when the filter matched nothing. `None` only for an empty catalog, which
/// the static seed rules out.
pub fn pick_with<'a, R: Rng + ?Sized>(
    filtered: &[&'a Dish],
    dishes: &'a [Dish],
    rng: &mut R,
) -> Option<&'a Dish> {
    if filtered.is_empty() {
        dishes.choose(rng)
    } else {
        filtered.choose(rng).copied()
    }
}

/// [`pick_with`] using the thread-local generator.
pub fn pick<'a>(filtered: &[&'a Dish], dishes: &'a [Dish]) -> Option<&'a Dish> {
    pick_with(filtered, dishes, &mut rand::rng())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_buckets_are_inclusive_upper_bounds() {
        assert!(TimeBucket::Under15.matches(15));
        assert!(!TimeBucket::Under15.matches(16));
        assert!(TimeBucket::Under60.matches(60));
        assert!(!TimeBucket::Over60.matches(60));
        assert!(TimeBucket::Over60.matches(61));
    }

    #[test]
    fn bucket_values_round_trip_the_select_options() {
        for (value, bucket) in [
            ("10", TimeBucket::Under10),
            ("15", TimeBucket::Under15),
            ("25", TimeBucket::Under25),
            ("45", TimeBucket::Under45),
            ("60", TimeBucket::Under60),
            ("120", TimeBucket::Over60),
        ] {
            assert_eq!(value.parse::<TimeBucket>().unwrap(), bucket);
            assert_eq!(bucket.as_ref(), value);
        }
        assert!("Alle".parse::<TimeBucket>().is_err());
    }
}
