// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::filter::DISPLAY_LIMIT;
use crate::ids::RecordId;
use crate::model::WeatherRecord;

/// Records kept after the startup load, capped to the display limit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordStore {
    records: Vec<WeatherRecord>,
}

impl RecordStore {
    pub fn from_loaded(mut records: Vec<WeatherRecord>) -> Self {
        records.truncate(DISPLAY_LIMIT);
        Self { records }
    }

    pub fn records(&self) -> &[WeatherRecord] {
        &self.records
    }

    /// First record carrying `id`.
    pub fn find(&self, id: &RecordId) -> Option<&WeatherRecord> {
        self.records.iter().find(|record| record.id == *id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
