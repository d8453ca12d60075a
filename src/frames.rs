//! Tabular export of pipeline output as polars `DataFrame`s, one row per day.

use crate::engine::DayOutcome;
use crate::types::fused_day::FusedDay;
use crate::types::variable::StandardVariable;
use chrono::NaiveDate;
use polars::prelude::*;

/// Fused values with one `<variable>` and one `<variable>_method` column per standard variable.
pub fn fused_frame(days: &[FusedDay]) -> PolarsResult<DataFrame> {
    let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
    let mut columns = vec![Column::new("date".into(), dates)];

    for variable in StandardVariable::ALL {
        let values: Vec<Option<f64>> = days.iter().map(|d| d.value(variable)).collect();
        let methods: Vec<&str> = days.iter().map(|d| d.method(variable).as_str()).collect();
        columns.push(Column::new(variable.name().into(), values));
        columns.push(Column::new(format!("{}_method", variable.name()).into(), methods));
    }
    DataFrame::new(columns)
}

/// ETo outcomes: value, method and comma-separated flags, or the failure message.
pub fn eto_frame(days: &[DayOutcome]) -> PolarsResult<DataFrame> {
    let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
    let eto: Vec<Option<f64>> = days
        .iter()
        .map(|d| d.result().map(|r| r.eto_mm_per_day))
        .collect();
    let method: Vec<Option<&str>> = days
        .iter()
        .map(|d| d.result().map(|r| r.method.as_str()))
        .collect();
    let flags: Vec<Option<String>> = days
        .iter()
        .map(|d| d.result().map(|r| r.flag_names().join(",")))
        .collect();
    let error: Vec<Option<String>> = days
        .iter()
        .map(|d| d.error().map(|e| e.to_string()))
        .collect();

    df!(
        "date" => dates,
        "eto_mm_per_day" => eto,
        "method" => method,
        "flags" => flags,
        "error" => error,
    )
}

/// Keeps the rows whose `date` lies in `start..=end`.
pub fn filter_dates(frame: LazyFrame, start: NaiveDate, end: NaiveDate) -> LazyFrame {
    frame.filter(col("date").gt_eq(lit(start)).and(col("date").lt_eq(lit(end))))
}
