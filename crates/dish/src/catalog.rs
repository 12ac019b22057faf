use std::sync::LazyLock;

use crate::types::{Cuisine, Diet, Dish};

static CATALOG: LazyLock<Vec<Dish>> = LazyLock::new(|| {
    vec![
        dish("1", "Spaghetti Aglio e Olio", Cuisine::Italian, Diet::Vegetarian, 20),
        dish("2", "Gebratener Reis mit Gemüse", Cuisine::Asian, Diet::Vegetarian, 15),
        dish("3", "Tomatensuppe mit Basilikum", Cuisine::German, Diet::Vegan, 10),
        dish("4", "Hähnchen aus dem Ofen", Cuisine::German, Diet::Meat, 60),
        dish("5", "Ofenlachs mit Zitronen-Dill", Cuisine::French, Diet::Pescatarian, 45),
        dish("6", "Veganes Kichererbsen-Curry", Cuisine::Asian, Diet::Vegan, 30),
        dish("7", "Gemischter Salat mit Feta", Cuisine::French, Diet::Vegetarian, 15),
        dish("8", "Penne Arrabbiata", Cuisine::Italian, Diet::Vegan, 20),
        dish("9", "Pilzrisotto", Cuisine::Italian, Diet::Vegetarian, 40),
        dish("10", "Linsensuppe", Cuisine::German, Diet::Vegan, 25),
        dish("11", "Veggie-Bowl", Cuisine::Spanish, Diet::Vegetarian, 35),
        dish("12", "Rindergeschnetzeltes mit Paprika", Cuisine::Spanish, Diet::Meat, 90),
    ]
});

fn dish(id: &str, name: &str, cuisine: Cuisine, diet: Diet, prep_minutes: u16) -> Dish {
    Dish {
        id: id.to_string(),
        name: name.to_string(),
        cuisine,
        diet,
        prep_minutes,
    }
}

/// The full seed catalog. Static and never empty.
pub fn catalog() -> &'static [Dish] {
    &CATALOG
}

/// Look up a dish by id.
pub fn find(id: &str) -> Option<&'static Dish> {
    CATALOG.iter().find(|d| d.id == id)
}
