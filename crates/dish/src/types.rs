use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Cuisine of a dish. Serialized with the German labels the UI and the
/// stored filter values use.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    VariantArray,
)]
pub enum Cuisine {
    #[serde(rename = "Spanisch")]
    #[strum(serialize = "Spanisch")]
    Spanish,
    #[serde(rename = "Deutsch")]
    #[strum(serialize = "Deutsch")]
    German,
    #[serde(rename = "Italienisch")]
    #[strum(serialize = "Italienisch")]
    Italian,
    #[serde(rename = "Französisch")]
    #[strum(serialize = "Französisch")]
    French,
    #[serde(rename = "Asiatisch")]
    #[strum(serialize = "Asiatisch")]
    Asian,
}

/// Dietary classification of a dish.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    VariantArray,
)]
pub enum Diet {
    #[serde(rename = "Vegan")]
    #[strum(serialize = "Vegan")]
    Vegan,
    #[serde(rename = "Vegetarisch")]
    #[strum(serialize = "Vegetarisch")]
    Vegetarian,
    #[serde(rename = "Pescetarisch")]
    #[strum(serialize = "Pescetarisch")]
    Pescatarian,
    #[serde(rename = "Fleisch")]
    #[strum(serialize = "Fleisch")]
    Meat,
}

/// A dish from the static catalog. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: String,
    pub name: String,
    pub cuisine: Cuisine,
    pub diet: Diet,
    /// Preparation time in minutes.
    pub prep_minutes: u16,
}

impl Dish {
    /// "Italienisch • Vegetarisch • 20 min", the summary line shown under a
    /// dish everywhere in the UI.
    pub fn summary(&self) -> String {
        format!("{} • {} • {} min", self.cuisine, self.diet, self.prep_minutes)
    }
}
