// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use skyplan_app::WeatherRecord;
use skyplan_data::DataSource;
use skyplan_tui::InternalEvent;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

pub struct DataRuntime {
    source: DataSource,
    timeout: Duration,
}

impl DataRuntime {
    pub fn new(source: DataSource, timeout: Duration) -> Self {
        Self { source, timeout }
    }
}

impl skyplan_tui::AppRuntime for DataRuntime {
    fn load_records(&mut self) -> Result<Vec<WeatherRecord>> {
        skyplan_data::load(&self.source, self.timeout)
            .with_context(|| format!("load weather data from {}", self.source))
    }

    /// Loads on a worker thread so the first frame draws while the fetch runs.
    fn spawn_load(&mut self, tx: Sender<InternalEvent>) -> Result<()> {
        let source = self.source.clone();
        let timeout = self.timeout;
        thread::Builder::new()
            .name("skyplan-load".to_owned())
            .spawn(move || {
                let event = match skyplan_data::load(&source, timeout) {
                    Ok(records) => InternalEvent::DataLoaded(records),
                    Err(error) => InternalEvent::DataLoadFailed(format!(
                        "load weather data from {source}: {error}"
                    )),
                };
                let _ = tx.send(event);
            })
            .context("spawn data load thread")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::DataRuntime;
    use anyhow::{Result, bail};
    use skyplan_data::DataSource;
    use skyplan_testkit::{WeatherFaker, csv_fixture, temp_csv};
    use skyplan_tui::{AppRuntime, InternalEvent};
    use std::sync::mpsc;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn spawn_load_delivers_records_from_worker() -> Result<()> {
        let expected = WeatherFaker::new(3).records(6);
        let (_dir, path) = temp_csv(&csv_fixture(&expected)?)?;
        let mut runtime = DataRuntime::new(DataSource::File(path), Duration::from_secs(1));

        let (tx, rx) = mpsc::channel();
        runtime.spawn_load(tx)?;

        match rx.recv_timeout(WAIT)? {
            InternalEvent::DataLoaded(records) => assert_eq!(records, expected),
            other => bail!("unexpected event {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn spawn_load_reports_failure_with_source() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("gone.csv");
        let mut runtime = DataRuntime::new(DataSource::File(path), Duration::from_secs(1));

        let (tx, rx) = mpsc::channel();
        runtime.spawn_load(tx)?;

        match rx.recv_timeout(WAIT)? {
            InternalEvent::DataLoadFailed(message) => {
                assert!(message.contains("gone.csv"), "got {message}");
            }
            other => bail!("unexpected event {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn load_records_reads_inline_source() -> Result<()> {
        let csv = csv_fixture(&WeatherFaker::new(8).records(2))?;
        let mut runtime = DataRuntime::new(DataSource::Inline(csv), Duration::from_secs(1));
        assert_eq!(runtime.load_records()?.len(), 2);
        Ok(())
    }
}
