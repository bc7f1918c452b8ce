// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::grid::PlanRow;
use crate::ids::RecordId;
use crate::model::WeatherRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanVisibility {
    Hidden,
    Visible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Added,
    Removed,
}

/// Selected record ids in insertion order, mirrored 1:1 into summary rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plan {
    members: Vec<RecordId>,
    rows: Vec<PlanRow>,
}

impl Plan {
    pub fn contains(&self, id: &RecordId) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn ids(&self) -> &[RecordId] {
        &self.members
    }

    pub fn rows(&self) -> &[PlanRow] {
        &self.rows
    }

    pub fn toggle(&mut self, record: &WeatherRecord) -> Membership {
        if let Some(index) = self.members.iter().position(|id| *id == record.id) {
            self.members.remove(index);
            self.remove_row(&record.id);
            Membership::Removed
        } else {
            self.members.push(record.id.clone());
            self.rows.push(PlanRow::from_record(record));
            Membership::Added
        }
    }

    /// Drops the summary row keyed by `id`; a missing row is not an error.
    fn remove_row(&mut self, id: &RecordId) {
        if let Some(index) = self.rows.iter().position(|row| row.id == *id) {
            self.rows.remove(index);
        }
    }

    /// Empties the plan and returns how many entries it held.
    pub fn clear(&mut self) -> usize {
        let count = self.members.len();
        self.members.clear();
        self.rows.clear();
        count
    }

    pub fn visibility(&self) -> PlanVisibility {
        if self.is_empty() {
            PlanVisibility::Hidden
        } else {
            PlanVisibility::Visible
        }
    }
}

pub fn confirmation_message(count: usize) -> String {
    if count == 1 {
        format!("You have successfully planned {count} day!")
    } else {
        format!("You have successfully planned {count} days!")
    }
}
