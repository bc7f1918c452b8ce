// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{SEASONS, WEATHER_TYPES, WeatherRecord};

/// Rows shown in the primary grid, filtered or not.
pub const DISPLAY_LIMIT: usize = 20;

/// Inclusive numeric range. A missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    pub const UNBOUNDED: Self = Self {
        min: None,
        max: None,
    };

    pub const fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    // NaN fails every present bound because every comparison with it is false.
    pub fn contains(self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    pub const fn is_unbounded(self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    pub season: Option<String>,
    pub weather_type: Option<String>,
    pub temperature: Bounds,
    pub wind_speed: Bounds,
}

impl FilterCriteria {
    pub fn matches(&self, record: &WeatherRecord) -> bool {
        let season = self
            .season
            .as_deref()
            .is_none_or(|season| record.season == season);
        let weather = self
            .weather_type
            .as_deref()
            .is_none_or(|weather_type| record.weather_type == weather_type);

        season
            && weather
            && self.temperature.contains(record.temperature)
            && self.wind_speed.contains(record.wind_speed)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.season.is_none()
            && self.weather_type.is_none()
            && self.temperature.is_unbounded()
            && self.wind_speed.is_unbounded()
    }
}

pub fn filter_records(records: &[WeatherRecord], criteria: &FilterCriteria) -> Vec<WeatherRecord> {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .take(DISPLAY_LIMIT)
        .cloned()
        .collect()
}

/// Reads a bound input. Blank or non-numeric text means "no constraint".
pub fn parse_bound(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| !value.is_nan())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Season,
    WeatherType,
    TempMin,
    TempMax,
    WindMin,
    WindMax,
}

impl FilterField {
    pub const ALL: [Self; 6] = [
        Self::Season,
        Self::WeatherType,
        Self::TempMin,
        Self::TempMax,
        Self::WindMin,
        Self::WindMax,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Season => "season",
            Self::WeatherType => "weather",
            Self::TempMin => "temp min",
            Self::TempMax => "temp max",
            Self::WindMin => "wind min",
            Self::WindMax => "wind max",
        }
    }

    pub const fn is_choice(self) -> bool {
        matches!(self, Self::Season | Self::WeatherType)
    }
}

/// Raw contents of the filter inputs, read when filters are applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterForm {
    pub season: Option<String>,
    pub weather_type: Option<String>,
    pub temp_min: String,
    pub temp_max: String,
    pub wind_min: String,
    pub wind_max: String,
}

impl FilterForm {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            season: non_empty(self.season.as_deref()),
            weather_type: non_empty(self.weather_type.as_deref()),
            temperature: Bounds::new(parse_bound(&self.temp_min), parse_bound(&self.temp_max)),
            wind_speed: Bounds::new(parse_bound(&self.wind_min), parse_bound(&self.wind_max)),
        }
    }

    pub fn text(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Season | FilterField::WeatherType => None,
            FilterField::TempMin => Some(&self.temp_min),
            FilterField::TempMax => Some(&self.temp_max),
            FilterField::WindMin => Some(&self.wind_min),
            FilterField::WindMax => Some(&self.wind_max),
        }
    }

    fn text_mut(&mut self, field: FilterField) -> Option<&mut String> {
        match field {
            FilterField::Season | FilterField::WeatherType => None,
            FilterField::TempMin => Some(&mut self.temp_min),
            FilterField::TempMax => Some(&mut self.temp_max),
            FilterField::WindMin => Some(&mut self.wind_min),
            FilterField::WindMax => Some(&mut self.wind_max),
        }
    }

    pub fn choice(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Season => self.season.as_deref(),
            FilterField::WeatherType => self.weather_type.as_deref(),
            _ => None,
        }
    }

    pub fn push_char(&mut self, field: FilterField, value: char) -> bool {
        match self.text_mut(field) {
            Some(text) => {
                text.push(value);
                true
            }
            None => false,
        }
    }

    pub fn pop_char(&mut self, field: FilterField) -> bool {
        self.text_mut(field)
            .and_then(|text| text.pop())
            .is_some()
    }

    /// Steps a selector through "any" followed by `options`, wrapping around.
    pub fn cycle_choice(&mut self, field: FilterField, options: &FilterOptions, delta: isize) {
        let (slot, choices) = match field {
            FilterField::Season => (&mut self.season, &options.seasons),
            FilterField::WeatherType => (&mut self.weather_type, &options.weather_types),
            _ => return,
        };

        let current = slot
            .as_ref()
            .and_then(|value| choices.iter().position(|choice| choice == value))
            .map_or(0, |index| index as isize + 1);
        let len = choices.len() as isize + 1;
        let next = (current + delta).rem_euclid(len) as usize;
        *slot = next.checked_sub(1).map(|index| choices[index].clone());
    }

    pub fn display(&self, field: FilterField) -> String {
        if field.is_choice() {
            return self.choice(field).unwrap_or("any").to_owned();
        }
        self.text(field).unwrap_or_default().to_owned()
    }
}

/// Values offered by the season and weather-type selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    pub seasons: Vec<String>,
    pub weather_types: Vec<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            seasons: SEASONS.iter().map(|value| (*value).to_owned()).collect(),
            weather_types: WEATHER_TYPES.iter().map(|value| (*value).to_owned()).collect(),
        }
    }
}

impl FilterOptions {
    pub fn from_records(records: &[WeatherRecord]) -> Self {
        let mut options = Self::default();
        for record in records {
            push_unique(&mut options.seasons, &record.season);
            push_unique(&mut options.weather_types, &record.weather_type);
        }
        options
    }
}

fn push_unique(values: &mut Vec<String>, candidate: &str) {
    if candidate.is_empty() || values.iter().any(|value| value == candidate) {
        return;
    }
    values.push(candidate.to_owned());
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::{
        Bounds, DISPLAY_LIMIT, FilterCriteria, FilterField, FilterForm, FilterOptions,
        filter_records, parse_bound,
    };
    use crate::{RecordId, WeatherRecord, coerce_number};

    fn record(id: &str, temperature: f64, wind_speed: f64, season: &str, weather: &str) -> WeatherRecord {
        WeatherRecord {
            id: RecordId::from(id),
            temperature,
            humidity: 50.0,
            wind_speed,
            precipitation: 10.0,
            cloud_cover: "partly cloudy".to_owned(),
            atmospheric_pressure: 1010.0,
            uv_index: 3.0,
            season: season.to_owned(),
            visibility: 5.0,
            location: "inland".to_owned(),
            weather_type: weather.to_owned(),
        }
    }

    fn ids(records: &[WeatherRecord]) -> Vec<&str> {
        records.iter().map(|record| record.id.as_str()).collect()
    }

    fn sample() -> Vec<WeatherRecord> {
        vec![
            record("A1", 30.0, 5.0, "Summer", "Sunny"),
            record("B2", -2.0, 12.0, "Winter", "Snowy"),
            record("C3", 22.0, 8.5, "Summer", "Cloudy"),
            record("D4", 15.0, 20.0, "Autumn", "Rainy"),
            record("E5", f64::NAN, 3.0, "Summer", "Sunny"),
        ]
    }

    #[test]
    fn unconstrained_criteria_keep_input_order() {
        let records = sample();
        let filtered = filter_records(&records, &FilterCriteria::default());
        assert_eq!(ids(&filtered), ids(&records));
        assert!(filtered[4].temperature.is_nan());
    }

    #[test]
    fn unconstrained_criteria_cap_at_display_limit() {
        let records = (0..25)
            .map(|index| record(&format!("R{index}"), 10.0, 1.0, "Spring", "Rainy"))
            .collect::<Vec<_>>();
        let filtered = filter_records(&records, &FilterCriteria::default());
        assert_eq!(filtered.len(), DISPLAY_LIMIT);
        assert_eq!(filtered[..], records[..DISPLAY_LIMIT]);
    }

    #[test]
    fn season_filter_keeps_relative_order() {
        let criteria = FilterCriteria {
            season: Some("Summer".to_owned()),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_records(&sample(), &criteria)), vec!["A1", "C3", "E5"]);
    }

    #[test]
    fn bounds_are_inclusive_and_combine_with_and() {
        let criteria = FilterCriteria {
            weather_type: Some("Sunny".to_owned()),
            temperature: Bounds::new(Some(20.0), Some(30.0)),
            wind_speed: Bounds::new(None, Some(5.0)),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_records(&sample(), &criteria)), vec!["A1"]);
    }

    #[test]
    fn nan_fields_never_satisfy_a_present_bound() {
        let criteria = FilterCriteria {
            temperature: Bounds::new(Some(f64::NEG_INFINITY), None),
            ..FilterCriteria::default()
        };
        let filtered = filter_records(&sample(), &criteria);
        assert!(!ids(&filtered).contains(&"E5"));
        assert_eq!(filtered.len(), 4);
    }

    #[test]
    fn blank_temperature_cell_is_unknown_not_zero() {
        let blank = record("F6", coerce_number(""), 3.0, "Summer", "Sunny");
        let criteria = FilterCriteria {
            temperature: Bounds::new(Some(-5.0), None),
            ..FilterCriteria::default()
        };
        assert!(filter_records(&[blank.clone()], &criteria).is_empty());
        assert_eq!(ids(&filter_records(&[blank], &FilterCriteria::default())), vec!["F6"]);
    }

    #[test]
    fn filter_output_is_subsequence_satisfying_criteria() {
        let records = sample();
        let criteria = FilterCriteria {
            wind_speed: Bounds::new(Some(4.0), Some(15.0)),
            ..FilterCriteria::default()
        };
        let filtered = filter_records(&records, &criteria);

        let mut cursor = records.iter();
        for kept in &filtered {
            assert!(criteria.matches(kept));
            assert!(cursor.any(|candidate| candidate == kept), "order broken at {}", kept.id);
        }
    }

    #[test]
    fn parse_bound_treats_malformed_text_as_unbounded() {
        assert_eq!(parse_bound(""), None);
        assert_eq!(parse_bound("   "), None);
        assert_eq!(parse_bound("cold"), None);
        assert_eq!(parse_bound("NaN"), None);
        assert_eq!(parse_bound("0"), Some(0.0));
        assert_eq!(parse_bound(" -4.5 "), Some(-4.5));
    }

    #[test]
    fn form_criteria_ignore_malformed_bounds() {
        let form = FilterForm {
            season: Some("Winter".to_owned()),
            temp_min: "abc".to_owned(),
            temp_max: "10".to_owned(),
            ..FilterForm::default()
        };
        let criteria = form.criteria();
        assert_eq!(criteria.season.as_deref(), Some("Winter"));
        assert_eq!(criteria.temperature, Bounds::new(None, Some(10.0)));
        assert!(criteria.wind_speed.is_unbounded());
    }

    #[test]
    fn cycle_choice_walks_through_any_and_wraps() {
        let options = FilterOptions::default();
        let mut form = FilterForm::default();

        form.cycle_choice(FilterField::Season, &options, 1);
        assert_eq!(form.season.as_deref(), Some("Winter"));

        form.cycle_choice(FilterField::Season, &options, -1);
        assert_eq!(form.season, None);

        form.cycle_choice(FilterField::Season, &options, -1);
        assert_eq!(form.season.as_deref(), Some("Autumn"));
        assert_eq!(form.display(FilterField::Season), "Autumn");
    }

    #[test]
    fn text_fields_accept_edits_and_choice_fields_do_not() {
        let mut form = FilterForm::default();
        assert!(form.push_char(FilterField::WindMax, '9'));
        assert!(!form.push_char(FilterField::Season, '9'));
        assert_eq!(form.wind_max, "9");
        assert!(form.pop_char(FilterField::WindMax));
        assert!(!form.pop_char(FilterField::WindMax));
    }

    #[test]
    fn options_extend_defaults_with_unseen_values() {
        let mut records = sample();
        records.push(record("F6", 1.0, 1.0, "Monsoon", "Foggy"));
        let options = FilterOptions::from_records(&records);
        assert_eq!(options.seasons.last().map(String::as_str), Some("Monsoon"));
        assert_eq!(options.seasons.len(), 5);
        assert_eq!(options.weather_types.last().map(String::as_str), Some("Foggy"));
    }
}
