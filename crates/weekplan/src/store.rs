use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::slot::{Day, Meal, Slot};

/// Assignments of one day: lunch and dinner, each an optional dish id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMeals {
    #[serde(rename = "Mittag")]
    pub lunch: Option<String>,
    #[serde(rename = "Abend")]
    pub dinner: Option<String>,
}

impl DayMeals {
    pub fn get(&self, meal: Meal) -> Option<&str> {
        match meal {
            Meal::Lunch => self.lunch.as_deref(),
            Meal::Dinner => self.dinner.as_deref(),
        }
    }

    fn set(&mut self, meal: Meal, dish_id: Option<String>) {
        match meal {
            Meal::Lunch => self.lunch = dish_id,
            Meal::Dinner => self.dinner = dish_id,
        }
    }
}

/// One week's plan. Every weekday is always present; a fresh plan has all
/// 14 cells empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekPlan {
    days: BTreeMap<Day, DayMeals>,
}

impl Default for WeekPlan {
    fn default() -> Self {
        let days = Day::VARIANTS
            .iter()
            .map(|day| (*day, DayMeals::default()))
            .collect();
        Self { days }
    }
}

impl WeekPlan {
    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.days.get(&slot.day)?.get(slot.meal)
    }

    pub fn set(&mut self, slot: Slot, dish_id: Option<String>) {
        self.days.entry(slot.day).or_default().set(slot.meal, dish_id);
    }

    pub fn day(&self, day: Day) -> DayMeals {
        self.days.get(&day).cloned().unwrap_or_default()
    }

    /// Monday-first iteration over all seven days.
    pub fn iter(&self) -> impl Iterator<Item = (Day, &DayMeals)> {
        self.days.iter().map(|(day, meals)| (*day, meals))
    }

    pub fn is_empty(&self) -> bool {
        self.days
            .values()
            .all(|meals| meals.lunch.is_none() && meals.dinner.is_none())
    }

    /// Externally stored plans may miss days; restore the all-days invariant.
    fn fill_missing(&mut self) {
        for day in Day::VARIANTS {
            self.days.entry(*day).or_default();
        }
    }
}

/// All weekly plans, keyed by week id (ISO date of the week's Monday).
///
/// Reading a week that was never written yields an all-empty plan. Every
/// mutation transforms a copy of the affected week and replaces it
/// wholesale, so a persisted snapshot of the store is never
/// partially-applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanStore {
    weeks: BTreeMap<String, WeekPlan>,
}

impl PlanStore {
    /// The plan for `week_id`; an all-empty week if none was stored yet.
    pub fn week(&self, week_id: &str) -> WeekPlan {
        let mut plan = self.weeks.get(week_id).cloned().unwrap_or_default();
        plan.fill_missing();
        plan
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Assign `dish_id` to a cell, overwriting any previous assignment.
    pub fn assign(&mut self, week_id: &str, slot: Slot, dish_id: impl Into<String>) {
        let mut plan = self.week(week_id);
        plan.set(slot, Some(dish_id.into()));
        self.weeks.insert(week_id.to_owned(), plan);
    }

    /// Empty one cell.
    pub fn clear(&mut self, week_id: &str, slot: Slot) {
        let mut plan = self.week(week_id);
        plan.set(slot, None);
        self.weeks.insert(week_id.to_owned(), plan);
    }

    /// Move the source assignment into the destination cell, swapping the two
    /// values when the destination is occupied. A no-op when the source cell
    /// is empty.
    pub fn move_or_swap(&mut self, week_id: &str, from: Slot, to: Slot) {
        let mut plan = self.week(week_id);
        let Some(source) = plan.get(from).map(str::to_owned) else {
            return;
        };
        let displaced = plan.get(to).map(str::to_owned);
        plan.set(to, Some(source));
        plan.set(from, displaced);
        self.weeks.insert(week_id.to_owned(), plan);
    }

    /// Reset all 14 cells of `week_id`. Other weeks are untouched.
    pub fn clear_week(&mut self, week_id: &str) {
        self.weeks.insert(week_id.to_owned(), WeekPlan::default());
    }
}
