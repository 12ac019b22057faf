pub mod catalog;
pub mod filter;
pub mod types;

pub use catalog::{catalog, find};
pub use filter::{filter, pick, pick_with, FilterCriteria, TimeBucket};
pub use types::{Cuisine, Diet, Dish};
