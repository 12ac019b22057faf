use chrono::{Datelike, Duration, NaiveDate};

use crate::slot::Day;

/// Monday of the week containing `today`, shifted by `offset` whole weeks.
/// Day-of-week arithmetic treats Monday as day 0 and Sunday as day 6.
pub fn week_start(today: NaiveDate, offset: i64) -> NaiveDate {
    let back = i64::from(today.weekday().num_days_from_monday());
    today - Duration::days(back) + Duration::weeks(offset)
}

/// Identifier a week's plan is stored under: the ISO `YYYY-MM-DD` date of
/// that week's Monday.
pub fn week_id(today: NaiveDate, offset: i64) -> String {
    week_start(today, offset).format("%Y-%m-%d").to_string()
}

const MONTHS_DE: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// Full German date, e.g. "Montag, 3. Juni 2024".
pub fn format_date_de(date: NaiveDate) -> String {
    let day = Day::from_weekday(date.weekday());
    let month = MONTHS_DE[date.month0() as usize];
    format!("{}, {}. {} {}", day, date.day(), month, date.year())
}
