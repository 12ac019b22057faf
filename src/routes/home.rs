use askama::Template;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use chrono::{Datelike, Duration, Local};
use serde::Deserialize;
use strum::VariantArray;

use dish::{Cuisine, Diet, FilterCriteria, TimeBucket};
use weekplan::{format_date_de, week_id, Day, Meal, Slot};

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::routes::AppState;

pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

pub struct SuggestionView {
    pub id: String,
    pub name: String,
    pub summary: String,
}

pub struct DishRow {
    pub name: String,
    pub summary: String,
    pub propose_url: String,
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub theme: &'static str,
    pub current_path: &'static str,
    pub user_name: String,
    pub date_label: String,
    pub day_offset: i64,
    pub is_today: bool,
    pub meal_label: String,
    pub lunch_selected: bool,
    pub dinner_selected: bool,
    pub prev_day_url: String,
    pub next_day_url: String,
    pub today_url: String,
    pub lunch_url: String,
    pub dinner_url: String,
    pub suggest_url: String,
    pub dismiss_url: String,
    pub time_value: String,
    pub cuisine_value: String,
    pub diet_value: String,
    pub time_options: Vec<SelectOption>,
    pub cuisine_options: Vec<SelectOption>,
    pub diet_options: Vec<SelectOption>,
    pub suggestion: Option<SuggestionView>,
    pub dishes: Vec<DishRow>,
    pub filtered_count: usize,
    pub total_count: usize,
}

#[derive(Deserialize)]
pub struct HomeQuery {
    day: Option<i64>,
    meal: Option<String>,
    time: Option<String>,
    cuisine: Option<String>,
    diet: Option<String>,
    suggest: Option<String>,
    dish: Option<String>,
}

/// Filter and day/meal selections carried through every link on the page.
struct ViewState {
    day_offset: i64,
    meal: Meal,
    criteria: FilterCriteria,
}

impl ViewState {
    fn from_query(query: &HomeQuery) -> Self {
        // "Alle" (and anything unknown) parses to None, meaning no filter
        let raw = |value: &Option<String>| value.as_deref().unwrap_or("Alle").to_owned();
        Self {
            day_offset: query.day.unwrap_or(0),
            meal: query
                .meal
                .as_deref()
                .and_then(|m| m.parse().ok())
                .unwrap_or(Meal::Lunch),
            criteria: FilterCriteria {
                time: raw(&query.time).parse().ok(),
                cuisine: raw(&query.cuisine).parse().ok(),
                diet: raw(&query.diet).parse().ok(),
            },
        }
    }

    fn time_value(&self) -> String {
        self.criteria
            .time
            .map(|t| t.to_string())
            .unwrap_or_else(|| "Alle".to_owned())
    }

    fn cuisine_value(&self) -> String {
        self.criteria
            .cuisine
            .map(|c| c.to_string())
            .unwrap_or_else(|| "Alle".to_owned())
    }

    fn diet_value(&self) -> String {
        self.criteria
            .diet
            .map(|d| d.to_string())
            .unwrap_or_else(|| "Alle".to_owned())
    }

    fn url(&self, day_offset: i64, meal: Meal, extra: &str) -> String {
        format!(
            "/home?day={}&meal={}&time={}&cuisine={}&diet={}{}",
            day_offset,
            meal,
            urlencoding::encode(&self.time_value()),
            urlencoding::encode(&self.cuisine_value()),
            urlencoding::encode(&self.diet_value()),
            extra
        )
    }
}

fn time_options(selected: Option<TimeBucket>) -> Vec<SelectOption> {
    let mut options = vec![SelectOption {
        value: "Alle".to_owned(),
        label: "Alle".to_owned(),
        selected: selected.is_none(),
    }];
    options.extend(TimeBucket::VARIANTS.iter().map(|bucket| SelectOption {
        value: bucket.to_string(),
        label: bucket.label().to_owned(),
        selected: selected == Some(*bucket),
    }));
    options
}

fn cuisine_options(selected: Option<Cuisine>) -> Vec<SelectOption> {
    let mut options = vec![SelectOption {
        value: "Alle".to_owned(),
        label: "Alle".to_owned(),
        selected: selected.is_none(),
    }];
    options.extend(Cuisine::VARIANTS.iter().map(|cuisine| SelectOption {
        value: cuisine.to_string(),
        label: cuisine.to_string(),
        selected: selected == Some(*cuisine),
    }));
    options
}

fn diet_options(selected: Option<Diet>) -> Vec<SelectOption> {
    let mut options = vec![SelectOption {
        value: "Alle".to_owned(),
        label: "Alle".to_owned(),
        selected: selected.is_none(),
    }];
    options.extend(Diet::VARIANTS.iter().map(|diet| SelectOption {
        value: diet.to_string(),
        label: diet.to_string(),
        selected: selected == Some(*diet),
    }));
    options
}

/// GET /home - suggestion page: filters, random pick, dish library.
///
/// `suggest=1` draws a fresh uniform pick from the filtered dishes (full
/// catalog when the filter matches nothing); `dish=<id>` proposes a
/// specific dish from the library. The suggestion itself is transient: any
/// link without those parameters drops it.
pub async fn page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<HomeQuery>,
) -> Result<Response, AppError> {
    let theme = state.store.theme(&user.id).await;
    let view = ViewState::from_query(&query);

    let catalog = dish::catalog();
    let filtered = dish::filter(catalog, &view.criteria);

    let suggestion = if let Some(id) = query.dish.as_deref() {
        dish::find(id)
    } else if query.suggest.as_deref() == Some("1") {
        dish::pick(&filtered, catalog)
    } else {
        None
    };

    let today = Local::now().date_naive();
    let target_date = today + Duration::days(view.day_offset);

    let template = HomeTemplate {
        theme: theme.as_str(),
        current_path: "home",
        user_name: user.name.clone(),
        date_label: format_date_de(target_date),
        day_offset: view.day_offset,
        is_today: view.day_offset == 0,
        meal_label: view.meal.to_string(),
        lunch_selected: view.meal == Meal::Lunch,
        dinner_selected: view.meal == Meal::Dinner,
        prev_day_url: view.url(view.day_offset - 1, view.meal, ""),
        next_day_url: view.url(view.day_offset + 1, view.meal, ""),
        today_url: view.url(0, view.meal, ""),
        lunch_url: view.url(view.day_offset, Meal::Lunch, ""),
        dinner_url: view.url(view.day_offset, Meal::Dinner, ""),
        suggest_url: view.url(view.day_offset, view.meal, "&suggest=1"),
        dismiss_url: view.url(view.day_offset, view.meal, ""),
        time_value: view.time_value(),
        cuisine_value: view.cuisine_value(),
        diet_value: view.diet_value(),
        time_options: time_options(view.criteria.time),
        cuisine_options: cuisine_options(view.criteria.cuisine),
        diet_options: diet_options(view.criteria.diet),
        suggestion: suggestion.map(|d| SuggestionView {
            id: d.id.clone(),
            name: d.name.clone(),
            summary: d.summary(),
        }),
        dishes: filtered
            .iter()
            .map(|d| DishRow {
                name: d.name.clone(),
                summary: d.summary(),
                propose_url: view.url(view.day_offset, view.meal, &format!("&dish={}", d.id)),
            })
            .collect(),
        filtered_count: filtered.len(),
        total_count: catalog.len(),
    };

    crate::routes::render_template(template)
}

#[derive(Deserialize)]
pub struct AssignForm {
    dish_id: String,
    day: i64,
    meal: String,
    time: Option<String>,
    cuisine: Option<String>,
    diet: Option<String>,
}

/// POST /home/assign - put the suggested dish into the plan slot addressed
/// by (today + day offset, meal). The target week follows from the target
/// date, so assigning across a week boundary lands in the right plan.
pub async fn assign(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<AssignForm>,
) -> Response {
    let back = ViewState::from_query(&HomeQuery {
        day: Some(form.day),
        meal: Some(form.meal.clone()),
        time: form.time.clone(),
        cuisine: form.cuisine.clone(),
        diet: form.diet.clone(),
        suggest: None,
        dish: None,
    });

    let Some(dish) = dish::find(&form.dish_id) else {
        tracing::warn!(dish_id = form.dish_id, "assignment for unknown dish ignored");
        return Redirect::to(&back.url(back.day_offset, back.meal, "")).into_response();
    };

    let today = Local::now().date_naive();
    let target_date = today + Duration::days(back.day_offset);
    let id = week_id(target_date, 0);
    let slot = Slot::new(Day::from_weekday(target_date.weekday()), back.meal);

    state
        .store
        .update_plan_store(&user.id, |plan| plan.assign(&id, slot, dish.id.clone()))
        .await;

    Redirect::to(&back.url(back.day_offset, back.meal, "")).into_response()
}
