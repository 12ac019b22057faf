use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Weekday of a plan cell. Monday-first, independent of the host locale's
/// week start; the serialized names match the stored plan JSON.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    VariantArray,
)]
pub enum Day {
    #[serde(rename = "Montag")]
    #[strum(serialize = "Montag")]
    Monday,
    #[serde(rename = "Dienstag")]
    #[strum(serialize = "Dienstag")]
    Tuesday,
    #[serde(rename = "Mittwoch")]
    #[strum(serialize = "Mittwoch")]
    Wednesday,
    #[serde(rename = "Donnerstag")]
    #[strum(serialize = "Donnerstag")]
    Thursday,
    #[serde(rename = "Freitag")]
    #[strum(serialize = "Freitag")]
    Friday,
    #[serde(rename = "Samstag")]
    #[strum(serialize = "Samstag")]
    Saturday,
    #[serde(rename = "Sonntag")]
    #[strum(serialize = "Sonntag")]
    Sunday,
}

impl Day {
    /// Monday is 0, Sunday is 6.
    pub fn from_weekday(weekday: chrono::Weekday) -> Self {
        Day::VARIANTS[weekday.num_days_from_monday() as usize]
    }
}

/// Meal slot of a day.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    VariantArray,
)]
pub enum Meal {
    #[serde(rename = "Mittag")]
    #[strum(serialize = "Mittag")]
    Lunch,
    #[serde(rename = "Abend")]
    #[strum(serialize = "Abend")]
    Dinner,
}

/// Address of one cell within a week's plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub day: Day,
    pub meal: Meal,
}

impl Slot {
    pub fn new(day: Day, meal: Meal) -> Self {
        Self { day, meal }
    }
}
