// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::debug;

use crate::filter::{FilterForm, FilterOptions, filter_records};
use crate::grid::{GridRow, PlanAction, render_grid};
use crate::ids::RecordId;
use crate::model::WeatherRecord;
use crate::plan::{Membership, Plan, PlanVisibility, confirmation_message};
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub load_status: LoadStatus,
    pub filters: FilterForm,
    pub plan_panel: PlanVisibility,
    pub notification: Option<String>,
    pub status_line: Option<String>,
    store: RecordStore,
    options: FilterOptions,
    grid: Vec<GridRow>,
    plan: Plan,
}

impl Default for AppState {
    fn default() -> Self {
        let plan = Plan::default();
        Self {
            load_status: LoadStatus::Loading,
            filters: FilterForm::default(),
            plan_panel: plan.visibility(),
            notification: None,
            status_line: None,
            store: RecordStore::default(),
            options: FilterOptions::default(),
            grid: Vec::new(),
            plan,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    RecordsLoaded(Vec<WeatherRecord>),
    LoadFailed(String),
    ApplyFilters,
    ResetFilters,
    /// Toggle plan membership from the control on this grid row.
    TogglePlan(usize),
    ConfirmPlan,
    DismissNotification,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    RecordsLoaded { total: usize, shown: usize },
    LoadFailed(String),
    GridRendered { rows: usize },
    FiltersReset,
    PlanToggled { id: RecordId, action: PlanAction },
    PlanConfirmed { count: usize, message: String },
    PlanVisibilityChanged(PlanVisibility),
    NotificationDismissed,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn records(&self) -> &[WeatherRecord] {
        self.store.records()
    }

    pub fn grid(&self) -> &[GridRow] {
        &self.grid
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::RecordsLoaded(records) => self.load_records(records),
            AppCommand::LoadFailed(message) => {
                self.load_status = LoadStatus::Failed;
                self.grid.clear();
                vec![
                    AppEvent::LoadFailed(message.clone()),
                    self.set_status(&format!("load failed: {message}")),
                ]
            }
            AppCommand::ApplyFilters => self.apply_filters(),
            AppCommand::ResetFilters => self.reset_filters(),
            AppCommand::TogglePlan(row) => {
                let Some(id) = self.grid.get(row).map(|row| row.id().clone()) else {
                    return Vec::new();
                };
                self.toggle_plan(&id, Some(row))
            }
            AppCommand::ConfirmPlan => self.confirm_plan(),
            AppCommand::DismissNotification => {
                if self.notification.take().is_some() {
                    vec![AppEvent::NotificationDismissed]
                } else {
                    Vec::new()
                }
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    /// Toggles `id` and updates the first grid control showing it.
    pub fn toggle(&mut self, id: &RecordId) -> Vec<AppEvent> {
        let origin = self.grid.iter().position(|row| row.id() == id);
        self.toggle_plan(id, origin)
    }

    /// Re-derives plan panel visibility; emits an event only on change.
    pub fn update_visibility(&mut self) -> Option<AppEvent> {
        let visibility = self.plan.visibility();
        if visibility == self.plan_panel {
            return None;
        }
        self.plan_panel = visibility;
        Some(AppEvent::PlanVisibilityChanged(visibility))
    }

    fn load_records(&mut self, records: Vec<WeatherRecord>) -> Vec<AppEvent> {
        if self.load_status == LoadStatus::Loaded {
            return vec![self.set_status("records already loaded")];
        }

        let total = records.len();
        self.store = RecordStore::from_loaded(records);
        self.options = FilterOptions::from_records(self.store.records());
        self.load_status = LoadStatus::Loaded;
        let shown = self.store.len();

        let mut events = vec![AppEvent::RecordsLoaded { total, shown }];
        events.push(self.render(self.store.records().to_vec()));
        events.push(self.set_status(&format!("loaded {shown} of {total} records")));
        events.extend(self.update_visibility());
        events
    }

    fn apply_filters(&mut self) -> Vec<AppEvent> {
        let criteria = self.filters.criteria();
        let filtered = filter_records(self.store.records(), &criteria);
        let rows = filtered.len();
        vec![
            self.render(filtered),
            self.set_status(&format!("filters applied: {rows} rows")),
        ]
    }

    fn reset_filters(&mut self) -> Vec<AppEvent> {
        self.filters = FilterForm::default();
        vec![
            AppEvent::FiltersReset,
            self.render(self.store.records().to_vec()),
        ]
    }

    fn render(&mut self, records: Vec<WeatherRecord>) -> AppEvent {
        self.grid = render_grid(&records, &self.plan);
        AppEvent::GridRendered {
            rows: self.grid.len(),
        }
    }

    fn toggle_plan(&mut self, id: &RecordId, origin: Option<usize>) -> Vec<AppEvent> {
        let Some(record) = self.store.find(id) else {
            return Vec::new();
        };

        let membership = self.plan.toggle(record);
        let action = PlanAction::for_membership(self.plan.contains(id));
        if let Some(row) = origin.and_then(|index| self.grid.get_mut(index)) {
            row.action = action;
        }
        debug!(id = %id, ?membership, planned = self.plan.len(), "plan toggled");

        let mut events = vec![AppEvent::PlanToggled {
            id: id.clone(),
            action,
        }];
        let status = match membership {
            Membership::Added => format!("added {id} to plan"),
            Membership::Removed => format!("removed {id} from plan"),
        };
        events.push(self.set_status(&status));
        events.extend(self.update_visibility());
        events
    }

    fn confirm_plan(&mut self) -> Vec<AppEvent> {
        for row in &mut self.grid {
            row.action = PlanAction::Add;
        }
        let count = self.plan.clear();
        let message = confirmation_message(count);
        self.notification = Some(message.clone());
        debug!(count, "plan confirmed");

        let mut events = vec![AppEvent::PlanConfirmed { count, message }];
        events.extend(self.update_visibility());
        events
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
