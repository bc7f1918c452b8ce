// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use csv::{ReaderBuilder, StringRecord};
use reqwest::blocking::Client as HttpClient;
use skyplan_app::{Column, RecordId, WeatherRecord, coerce_number};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

pub const DEFAULT_SOURCE: &str = "weather_Small.csv";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("invalid data source {raw:?}: {message}")]
    InvalidSource { raw: String, message: String },
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("fetch {url}: {message}")]
    Fetch { url: String, message: String },
    #[error("fetch {url}: server returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("parse CSV line {line}: {message}")]
    Parse { line: u64, message: String },
}

/// Where the weather CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(Url),
    Inline(String),
}

impl DataSource {
    /// `http://` and `https://` values are fetched over the network; anything
    /// else is a filesystem path.
    pub fn parse(raw: &str) -> Result<Self, DataLoadError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DataLoadError::InvalidSource {
                raw: raw.to_owned(),
                message: "source must not be empty".to_owned(),
            });
        }

        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(trimmed).map_err(|error| DataLoadError::InvalidSource {
                raw: raw.to_owned(),
                message: error.to_string(),
            })?;
            return Ok(Self::Url(url));
        }

        Ok(Self::File(PathBuf::from(trimmed)))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
            Self::Inline(_) => f.write_str("<inline>"),
        }
    }
}

/// Fetches `source` and parses every row. Fails as a whole; there is no
/// partial result.
pub fn load(source: &DataSource, timeout: Duration) -> Result<Vec<WeatherRecord>, DataLoadError> {
    let records = match source {
        DataSource::File(path) => {
            let bytes = fs::read(path).map_err(|source| DataLoadError::Read {
                path: path.clone(),
                source,
            })?;
            parse_csv(&bytes)?
        }
        DataSource::Url(url) => parse_csv(&fetch(url, timeout)?)?,
        DataSource::Inline(text) => parse_csv(text.as_bytes())?,
    };
    info!(source = %source, rows = records.len(), "weather data loaded");
    Ok(records)
}

fn fetch(url: &Url, timeout: Duration) -> Result<Vec<u8>, DataLoadError> {
    let fetch_error = |error: reqwest::Error| DataLoadError::Fetch {
        url: url.to_string(),
        message: error.to_string(),
    };

    let http = HttpClient::builder()
        .timeout(timeout)
        .build()
        .map_err(fetch_error)?;
    let response = http.get(url.clone()).send().map_err(fetch_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(DataLoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().map_err(fetch_error)?;
    Ok(body.to_vec())
}

/// Header-driven parse: the first line names the columns, each further
/// non-empty line is one record. Numeric cells that do not parse become NaN.
/// Bytes that are not UTF-8 decode to U+FFFD rather than failing the load.
pub fn parse_csv(input: &[u8]) -> Result<Vec<WeatherRecord>, DataLoadError> {
    let text = String::from_utf8_lossy(input);
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let layout = HeaderLayout::from_headers(reader.headers().map_err(parse_error)?);

    let mut records = Vec::new();
    let mut coerced = 0;
    for row in reader.records() {
        let row = row.map_err(parse_error)?;
        if is_blank(&row) {
            continue;
        }
        let record = layout.record(&row);
        coerced += record.nan_count();
        records.push(record);
    }

    if coerced > 0 {
        warn!(cells = coerced, "non-numeric cells coerced to NaN");
    }
    Ok(records)
}

fn parse_error(error: csv::Error) -> DataLoadError {
    let line = error.position().map_or(0, csv::Position::line);
    DataLoadError::Parse {
        line,
        message: error.to_string(),
    }
}

fn is_blank(row: &StringRecord) -> bool {
    row.len() == 1 && row.get(0).is_some_and(str::is_empty)
}

/// Position of each known column in the header; first occurrence wins.
struct HeaderLayout {
    positions: [Option<usize>; Column::ALL.len()],
}

impl HeaderLayout {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut positions = [None; Column::ALL.len()];
        for (index, name) in headers.iter().enumerate() {
            if let Some(column) = Column::parse(name) {
                positions[column as usize].get_or_insert(index);
            }
        }
        Self { positions }
    }

    fn cell<'a>(&self, row: &'a StringRecord, column: Column) -> &'a str {
        self.positions[column as usize]
            .and_then(|index| row.get(index))
            .unwrap_or("")
    }

    fn number(&self, row: &StringRecord, column: Column) -> f64 {
        coerce_number(self.cell(row, column))
    }

    fn text(&self, row: &StringRecord, column: Column) -> String {
        self.cell(row, column).to_owned()
    }

    fn record(&self, row: &StringRecord) -> WeatherRecord {
        WeatherRecord {
            id: RecordId::from(self.cell(row, Column::Id)),
            temperature: self.number(row, Column::Temperature),
            humidity: self.number(row, Column::Humidity),
            wind_speed: self.number(row, Column::WindSpeed),
            precipitation: self.number(row, Column::Precipitation),
            cloud_cover: self.text(row, Column::CloudCover),
            atmospheric_pressure: self.number(row, Column::AtmosphericPressure),
            uv_index: self.number(row, Column::UvIndex),
            season: self.text(row, Column::Season),
            visibility: self.number(row, Column::Visibility),
            location: self.text(row, Column::Location),
            weather_type: self.text(row, Column::WeatherType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DataSource, parse_csv};
    use anyhow::Result;
    use std::path::PathBuf;

    const HEADER: &str = "ID,Temperature,Humidity,WindSpeed,Precipitation,CloudCover,AtmosphericPressure,UVIndex,Season,Visibility,Location,WeatherType";

    #[test]
    fn parses_rows_in_source_order() -> Result<()> {
        let input = format!(
            "{HEADER}\nA1,14,73,9.5,82,partly cloudy,1010.82,2,Winter,3.5,inland,Rainy\nB2,39,96,8.5,71,partly cloudy,1011.43,7,Spring,10,inland,Cloudy\n"
        );
        let records = parse_csv(input.as_bytes())?;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_str(), "A1");
        assert_eq!(records[0].wind_speed, 9.5);
        assert_eq!(records[0].atmospheric_pressure, 1010.82);
        assert_eq!(records[0].cloud_cover, "partly cloudy");
        assert_eq!(records[1].weather_type, "Cloudy");
        Ok(())
    }

    #[test]
    fn skips_empty_lines() -> Result<()> {
        let input = format!("{HEADER}\n\nA1,1,1,1,1,clear,1,1,Summer,1,coastal,Sunny\n\n\n");
        assert_eq!(parse_csv(input.as_bytes())?.len(), 1);
        Ok(())
    }

    #[test]
    fn non_numeric_cells_become_nan() -> Result<()> {
        let input = format!("{HEADER}\nA1,hot,,1,1,clear,1,1,Summer,1,coastal,Sunny\n");
        let records = parse_csv(input.as_bytes())?;
        assert!(records[0].temperature.is_nan());
        assert!(records[0].humidity.is_nan());
        assert_eq!(records[0].nan_count(), 2);
        Ok(())
    }

    #[test]
    fn reordered_header_maps_by_name() -> Result<()> {
        let input = "Season,ID,Temperature\nAutumn,Z9,12\n";
        let records = parse_csv(input.as_bytes())?;
        assert_eq!(records[0].id.as_str(), "Z9");
        assert_eq!(records[0].season, "Autumn");
        assert_eq!(records[0].temperature, 12.0);
        assert!(records[0].wind_speed.is_nan());
        assert_eq!(records[0].location, "");
        Ok(())
    }

    #[test]
    fn renamed_columns_silently_yield_nan() -> Result<()> {
        let input = "ID,Temp\nA1,12\n";
        let records = parse_csv(input.as_bytes())?;
        assert!(records[0].temperature.is_nan());
        Ok(())
    }

    #[test]
    fn short_rows_are_accepted() -> Result<()> {
        let input = format!("{HEADER}\nA1,20\n");
        let records = parse_csv(input.as_bytes())?;
        assert_eq!(records[0].temperature, 20.0);
        assert!(records[0].humidity.is_nan());
        assert_eq!(records[0].weather_type, "");
        Ok(())
    }

    #[test]
    fn invalid_utf8_decodes_lossily() -> Result<()> {
        let mut input = format!("{HEADER}\n").into_bytes();
        input.extend_from_slice(b"A1,14,73,9.5,82,clear,1010,2,Winter,3.5,Z\xfcrich,Rainy\n");
        let records = parse_csv(&input)?;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location, "Z\u{FFFD}rich");
        assert_eq!(records[0].temperature, 14.0);
        assert_eq!(records[0].weather_type, "Rainy");
        Ok(())
    }

    #[test]
    fn empty_input_yields_no_records() -> Result<()> {
        assert!(parse_csv(b"")?.is_empty());
        assert!(parse_csv(HEADER.as_bytes())?.is_empty());
        Ok(())
    }

    #[test]
    fn source_parse_distinguishes_urls_from_paths() -> Result<()> {
        assert!(matches!(
            DataSource::parse("https://example.com/weather.csv")?,
            DataSource::Url(_)
        ));
        assert_eq!(
            DataSource::parse(" data/weather_Small.csv ")?,
            DataSource::File(PathBuf::from("data/weather_Small.csv"))
        );
        assert!(DataSource::parse("  ").is_err());
        assert!(DataSource::parse("http://").is_err());
        Ok(())
    }

    #[test]
    fn source_display_hides_inline_payload() {
        assert_eq!(DataSource::Inline("ID\n".to_owned()).to_string(), "<inline>");
    }
}
