pub mod slot;
pub mod store;
pub mod week;

pub use slot::{Day, Meal, Slot};
pub use store::{DayMeals, PlanStore, WeekPlan};
pub use week::{format_date_de, week_id, week_start};
