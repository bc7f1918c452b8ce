// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use skyplan_app::{Column, RecordId, SEASONS, WEATHER_TYPES, WeatherRecord};
use std::path::PathBuf;

pub const DEMO_SEED: u64 = 2024;
pub const DEMO_ROWS: usize = 40;

const CLOUD_COVERS: [&str; 4] = ["clear", "partly cloudy", "cloudy", "overcast"];
const LOCATIONS: [&str; 3] = ["inland", "mountain", "coastal"];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator of plausible weather rows.
#[derive(Debug, Clone)]
pub struct WeatherFaker {
    rng: DeterministicRng,
}

impl WeatherFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn record(&mut self, id: &str) -> WeatherRecord {
        let season = self.pick(&SEASONS);
        let (low, high) = temperature_range(season);
        let weather_type = if season == "Winter" && self.rng.int_n(3) == 0 {
            "Snowy"
        } else {
            self.pick(&WEATHER_TYPES)
        };

        WeatherRecord {
            id: RecordId::from(id),
            temperature: f64::from(self.int_range(low, high)),
            humidity: f64::from(self.int_range(20, 100)),
            wind_speed: f64::from(self.int_range(0, 300)) / 10.0,
            precipitation: f64::from(self.int_range(0, 100)),
            cloud_cover: self.pick(&CLOUD_COVERS).to_owned(),
            atmospheric_pressure: f64::from(self.int_range(9_800, 10_400)) / 10.0,
            uv_index: f64::from(self.int_range(0, 11)),
            season: season.to_owned(),
            visibility: f64::from(self.int_range(0, 100)) / 10.0,
            location: self.pick(&LOCATIONS).to_owned(),
            weather_type: weather_type.to_owned(),
        }
    }

    pub fn records(&mut self, count: usize) -> Vec<WeatherRecord> {
        (1..=count)
            .map(|index| self.record(&format!("W{index:03}")))
            .collect()
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = i64::from(max) - i64::from(min) + 1;
        let offset = (self.rng.next_u64() % (span as u64)) as i64;
        (i64::from(min) + offset) as i32
    }
}

fn temperature_range(season: &str) -> (i32, i32) {
    match season {
        "Winter" => (-10, 10),
        "Spring" => (5, 22),
        "Summer" => (18, 38),
        "Autumn" => (4, 20),
        _ => (0, 25),
    }
}

/// Hand-built record for tests that care about a few fields only.
pub fn record(
    id: &str,
    season: &str,
    weather_type: &str,
    temperature: f64,
    wind_speed: f64,
) -> WeatherRecord {
    WeatherRecord {
        id: RecordId::from(id),
        temperature,
        humidity: 65.0,
        wind_speed,
        precipitation: 20.0,
        cloud_cover: "partly cloudy".to_owned(),
        atmospheric_pressure: 1013.0,
        uv_index: 4.0,
        season: season.to_owned(),
        visibility: 6.5,
        location: "inland".to_owned(),
        weather_type: weather_type.to_owned(),
    }
}

pub fn header_line() -> String {
    Column::ALL
        .iter()
        .map(|column| column.header())
        .collect::<Vec<_>>()
        .join(",")
}

/// Serializes records with the source header, one CSV line per record.
pub fn csv_fixture(records: &[WeatherRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(Column::ALL.iter().map(|column| column.header()))
        .context("write CSV header")?;
    for record in records {
        writer
            .write_record(Column::ALL.iter().map(|column| record.display(*column)))
            .with_context(|| format!("write CSV row {}", record.id))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|error| anyhow!("flush CSV writer: {}", error.error()))?;
    String::from_utf8(bytes).context("CSV fixture is not UTF-8")
}

pub fn demo_csv() -> Result<String> {
    csv_fixture(&WeatherFaker::new(DEMO_SEED).records(DEMO_ROWS))
}

pub fn temp_csv(contents: &str) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("weather_Small.csv");
    std::fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok((dir, path))
}
