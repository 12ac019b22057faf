use askama::Template;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use chrono::{Datelike, Local};
use serde::Deserialize;

use weekplan::{format_date_de, week_id, week_start, Day, Meal, Slot, WeekPlan};

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::routes::AppState;

pub struct PlanOption {
    pub id: String,
    pub label: String,
    pub selected: bool,
}

pub struct CellView {
    pub meal_label: String,
    pub day_value: String,
    pub meal_value: String,
    pub selected_name: Option<String>,
    pub options: Vec<PlanOption>,
}

pub struct DayCol {
    pub label: String,
    pub cells: Vec<CellView>,
}

#[derive(Template)]
#[template(path = "plan.html")]
pub struct PlanTemplate {
    pub theme: &'static str,
    pub current_path: &'static str,
    pub user_name: String,
    pub week_label: String,
    pub prev_url: String,
    pub next_url: String,
    pub current_url: String,
    pub is_current: bool,
    pub today_lunch: Option<String>,
    pub today_dinner: Option<String>,
    pub days: Vec<DayCol>,
    pub assign_action: String,
    pub move_action: String,
    pub clear_action: String,
}

/// GET /plan - the current week.
pub async fn index() -> Redirect {
    Redirect::to("/plan/0")
}

fn dish_name(id: Option<&str>) -> Option<String> {
    id.and_then(dish::find).map(|d| d.name.clone())
}

fn cell_view(plan: &WeekPlan, day: Day, meal: Meal) -> CellView {
    let selected_id = plan.get(Slot::new(day, meal)).map(str::to_owned);

    let mut options = vec![PlanOption {
        id: String::new(),
        label: "– auswählen –".to_owned(),
        selected: selected_id.is_none(),
    }];
    options.extend(dish::catalog().iter().map(|d| PlanOption {
        id: d.id.clone(),
        label: format!("{} ({})", d.name, d.summary()),
        selected: selected_id.as_deref() == Some(d.id.as_str()),
    }));

    CellView {
        meal_label: meal.to_string(),
        day_value: day.to_string(),
        meal_value: meal.to_string(),
        selected_name: dish_name(selected_id.as_deref()),
        options,
    }
}

/// GET /plan/{offset} - weekly planner, `offset` whole weeks from the
/// current one (0 = this week, negative = past weeks).
pub async fn page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(offset): Path<i64>,
) -> Result<Response, AppError> {
    let theme = state.store.theme(&user.id).await;

    let today = Local::now().date_naive();
    let start = week_start(today, offset);
    let id = week_id(today, offset);
    let plan = state.store.plan_store(&user.id).await.week(&id);

    let today_meals = plan.day(Day::from_weekday(today.weekday()));

    let days = plan
        .iter()
        .map(|(day, _)| DayCol {
            label: day.to_string(),
            cells: vec![
                cell_view(&plan, day, Meal::Lunch),
                cell_view(&plan, day, Meal::Dinner),
            ],
        })
        .collect();

    let template = PlanTemplate {
        theme: theme.as_str(),
        current_path: "plan",
        user_name: user.name.clone(),
        week_label: format_date_de(start),
        prev_url: format!("/plan/{}", offset - 1),
        next_url: format!("/plan/{}", offset + 1),
        current_url: "/plan/0".to_owned(),
        is_current: offset == 0,
        today_lunch: dish_name(today_meals.lunch.as_deref()),
        today_dinner: dish_name(today_meals.dinner.as_deref()),
        days,
        assign_action: format!("/plan/{offset}/assign"),
        move_action: format!("/plan/{offset}/move"),
        clear_action: format!("/plan/{offset}/clear"),
    };

    crate::routes::render_template(template)
}

#[derive(Deserialize)]
pub struct PlanAssignForm {
    day: String,
    meal: String,
    #[serde(default)]
    dish_id: String,
}

/// POST /plan/{offset}/assign - set one cell from its dropdown; an empty
/// selection clears the cell.
pub async fn assign(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(offset): Path<i64>,
    Form(form): Form<PlanAssignForm>,
) -> Response {
    let back = Redirect::to(&format!("/plan/{offset}"));

    let (Ok(day), Ok(meal)) = (form.day.parse::<Day>(), form.meal.parse::<Meal>()) else {
        tracing::warn!(day = form.day, meal = form.meal, "assignment for unknown slot ignored");
        return back.into_response();
    };
    let slot = Slot::new(day, meal);

    let id = week_id(Local::now().date_naive(), offset);

    if form.dish_id.is_empty() {
        state
            .store
            .update_plan_store(&user.id, |plan| plan.clear(&id, slot))
            .await;
    } else if let Some(dish) = dish::find(&form.dish_id) {
        state
            .store
            .update_plan_store(&user.id, |plan| plan.assign(&id, slot, dish.id.clone()))
            .await;
    } else {
        tracing::warn!(dish_id = form.dish_id, "assignment for unknown dish ignored");
    }

    back.into_response()
}

#[derive(Deserialize)]
pub struct MoveForm {
    from_day: String,
    from_meal: String,
    to_day: String,
    to_meal: String,
}

/// POST /plan/{offset}/move - drag-and-drop reassignment: move into an
/// empty cell, swap with an occupied one. Dropping an empty source cell
/// changes nothing.
pub async fn move_slot(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(offset): Path<i64>,
    Form(form): Form<MoveForm>,
) -> Response {
    let back = Redirect::to(&format!("/plan/{offset}"));

    let parsed = (
        form.from_day.parse::<Day>(),
        form.from_meal.parse::<Meal>(),
        form.to_day.parse::<Day>(),
        form.to_meal.parse::<Meal>(),
    );
    let (Ok(from_day), Ok(from_meal), Ok(to_day), Ok(to_meal)) = parsed else {
        tracing::warn!("move between unknown slots ignored");
        return back.into_response();
    };

    let id = week_id(Local::now().date_naive(), offset);
    state
        .store
        .update_plan_store(&user.id, |plan| {
            plan.move_or_swap(
                &id,
                Slot::new(from_day, from_meal),
                Slot::new(to_day, to_meal),
            )
        })
        .await;

    back.into_response()
}

/// POST /plan/{offset}/clear - reset all 14 cells of the week.
pub async fn clear_week(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(offset): Path<i64>,
) -> Response {
    let id = week_id(Local::now().date_naive(), offset);
    state
        .store
        .update_plan_store(&user.id, |plan| plan.clear_week(&id))
        .await;

    Redirect::to(&format!("/plan/{offset}")).into_response()
}
