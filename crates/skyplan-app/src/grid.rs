// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ids::RecordId;
use crate::model::{Column, WeatherRecord, format_number};
use crate::plan::Plan;

pub const PLAN_COLUMNS: [&str; 4] = ["ID", "Temp", "Season", "Weather"];

/// State of the per-row plan control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    Add,
    Remove,
}

impl PlanAction {
    pub const fn for_membership(in_plan: bool) -> Self {
        if in_plan { Self::Remove } else { Self::Add }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Remove => "Remove",
        }
    }
}

/// One row of the primary grid: the record plus its plan control.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub record: WeatherRecord,
    pub action: PlanAction,
}

impl GridRow {
    pub fn id(&self) -> &RecordId {
        &self.record.id
    }

    pub fn cells(&self) -> Vec<String> {
        Column::ALL
            .into_iter()
            .map(|column| self.record.display(column))
            .chain(std::iter::once(self.action.label().to_owned()))
            .collect()
    }
}

pub fn grid_headers() -> Vec<&'static str> {
    Column::ALL
        .into_iter()
        .map(Column::label)
        .chain(std::iter::once("Plan"))
        .collect()
}

/// Projects records into grid rows. The result replaces whatever grid was
/// shown before; controls reflect current plan membership.
pub fn render_grid(records: &[WeatherRecord], plan: &Plan) -> Vec<GridRow> {
    records
        .iter()
        .map(|record| GridRow {
            record: record.clone(),
            action: PlanAction::for_membership(plan.contains(&record.id)),
        })
        .collect()
}

/// Summary row mirrored into the plan panel, keyed by record id.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRow {
    pub id: RecordId,
    pub temperature: f64,
    pub season: String,
    pub weather_type: String,
}

impl PlanRow {
    pub fn from_record(record: &WeatherRecord) -> Self {
        Self {
            id: record.id.clone(),
            temperature: record.temperature,
            season: record.season.clone(),
            weather_type: record.weather_type.clone(),
        }
    }

    pub fn cells(&self) -> [String; 4] {
        [
            self.id.to_string(),
            format_number(self.temperature),
            self.season.clone(),
            self.weather_type.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{GridRow, PlanAction, PlanRow, grid_headers, render_grid};
    use crate::{Plan, RecordId, WeatherRecord};

    fn record(id: &str) -> WeatherRecord {
        WeatherRecord {
            id: RecordId::from(id),
            temperature: 21.5,
            humidity: 70.0,
            wind_speed: 9.0,
            precipitation: 40.0,
            cloud_cover: "overcast".to_owned(),
            atmospheric_pressure: 1005.5,
            uv_index: 2.0,
            season: "Spring".to_owned(),
            visibility: f64::NAN,
            location: "coastal".to_owned(),
            weather_type: "Rainy".to_owned(),
        }
    }

    #[test]
    fn rows_reflect_plan_membership() {
        let records = vec![record("A1"), record("B2")];
        let mut plan = Plan::default();
        plan.toggle(&records[1]);

        let grid = render_grid(&records, &plan);
        assert_eq!(grid[0].action, PlanAction::Add);
        assert_eq!(grid[1].action, PlanAction::Remove);
    }

    #[test]
    fn cells_cover_every_column_plus_control() {
        let row = GridRow {
            record: record("A1"),
            action: PlanAction::Remove,
        };
        let cells = row.cells();
        assert_eq!(cells.len(), grid_headers().len());
        assert_eq!(
            cells,
            vec![
                "A1", "21.5", "70", "9", "40", "overcast", "1005.5", "2", "Spring", "NaN",
                "coastal", "Rainy", "Remove",
            ]
        );
    }

    #[test]
    fn plan_row_keeps_summary_fields() {
        let row = PlanRow::from_record(&record("C3"));
        assert_eq!(row.cells(), ["C3", "21.5", "Spring", "Rainy"].map(str::to_owned));
    }
}
