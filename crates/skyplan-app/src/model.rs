// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ids::RecordId;

pub const SEASONS: [&str; 4] = ["Winter", "Spring", "Summer", "Autumn"];
pub const WEATHER_TYPES: [&str; 4] = ["Rainy", "Cloudy", "Sunny", "Snowy"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    Temperature,
    Humidity,
    WindSpeed,
    Precipitation,
    CloudCover,
    AtmosphericPressure,
    UvIndex,
    Season,
    Visibility,
    Location,
    WeatherType,
}

impl Column {
    pub const ALL: [Self; 12] = [
        Self::Id,
        Self::Temperature,
        Self::Humidity,
        Self::WindSpeed,
        Self::Precipitation,
        Self::CloudCover,
        Self::AtmosphericPressure,
        Self::UvIndex,
        Self::Season,
        Self::Visibility,
        Self::Location,
        Self::WeatherType,
    ];

    /// Column name in the source header.
    pub const fn header(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
            Self::WindSpeed => "WindSpeed",
            Self::Precipitation => "Precipitation",
            Self::CloudCover => "CloudCover",
            Self::AtmosphericPressure => "AtmosphericPressure",
            Self::UvIndex => "UVIndex",
            Self::Season => "Season",
            Self::Visibility => "Visibility",
            Self::Location => "Location",
            Self::WeatherType => "WeatherType",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Temperature => "Temp",
            Self::Humidity => "Humidity",
            Self::WindSpeed => "Wind",
            Self::Precipitation => "Precip",
            Self::CloudCover => "Clouds",
            Self::AtmosphericPressure => "Pressure",
            Self::UvIndex => "UV",
            Self::Season => "Season",
            Self::Visibility => "Visibility",
            Self::Location => "Location",
            Self::WeatherType => "Weather",
        }
    }

    pub fn parse(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.header() == header)
    }

    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Temperature
                | Self::Humidity
                | Self::WindSpeed
                | Self::Precipitation
                | Self::AtmosphericPressure
                | Self::UvIndex
                | Self::Visibility
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub id: RecordId,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub precipitation: f64,
    pub cloud_cover: String,
    pub atmospheric_pressure: f64,
    pub uv_index: f64,
    pub season: String,
    pub visibility: f64,
    pub location: String,
    pub weather_type: String,
}

impl WeatherRecord {
    pub fn display(&self, column: Column) -> String {
        match column {
            Column::Id => self.id.to_string(),
            Column::Temperature => format_number(self.temperature),
            Column::Humidity => format_number(self.humidity),
            Column::WindSpeed => format_number(self.wind_speed),
            Column::Precipitation => format_number(self.precipitation),
            Column::CloudCover => self.cloud_cover.clone(),
            Column::AtmosphericPressure => format_number(self.atmospheric_pressure),
            Column::UvIndex => format_number(self.uv_index),
            Column::Season => self.season.clone(),
            Column::Visibility => format_number(self.visibility),
            Column::Location => self.location.clone(),
            Column::WeatherType => self.weather_type.clone(),
        }
    }

    /// Number of numeric fields holding the not-a-number sentinel.
    pub fn nan_count(&self) -> usize {
        [
            self.temperature,
            self.humidity,
            self.wind_speed,
            self.precipitation,
            self.atmospheric_pressure,
            self.uv_index,
            self.visibility,
        ]
        .into_iter()
        .filter(|value| value.is_nan())
        .count()
    }
}

/// Permissive numeric coercion. Anything that is not a number, including an
/// empty cell, becomes `f64::NAN` instead of an error.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() {
            "Infinity".to_owned()
        } else {
            "-Infinity".to_owned()
        };
    }
    value.to_string()
}
