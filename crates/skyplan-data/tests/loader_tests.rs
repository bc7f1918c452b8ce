// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use skyplan_data::{DataLoadError, DataSource, load};
use skyplan_testkit::{WeatherFaker, csv_fixture, temp_csv};
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

#[test]
fn load_reads_file_source_in_order() -> Result<()> {
    let expected = WeatherFaker::new(11).records(25);
    let (_dir, path) = temp_csv(&csv_fixture(&expected)?)?;

    let records = load(&DataSource::File(path), Duration::from_secs(1))?;

    assert_eq!(records, expected);
    Ok(())
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.csv");

    let error = load(&DataSource::File(path.clone()), Duration::from_secs(1))
        .expect_err("missing file should fail");
    match &error {
        DataLoadError::Read { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(error.to_string().contains("absent.csv"));
}

#[test]
fn load_parses_inline_source() -> Result<()> {
    let csv = csv_fixture(&WeatherFaker::new(5).records(3))?;
    let records = load(&DataSource::Inline(csv), Duration::from_secs(1))?;
    assert_eq!(records.len(), 3);
    Ok(())
}

#[test]
fn load_fetches_url_source_from_mock_server() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let url = format!("http://{}/weather_Small.csv", server.server_addr());
    let expected = WeatherFaker::new(9).records(4);
    let body = csv_fixture(&expected)?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/weather_Small.csv");
        let response = Response::from_string(body).with_status_code(200).with_header(
            Header::from_bytes("Content-Type", "text/csv").expect("valid content type header"),
        );
        request.respond(response).expect("response should succeed");
    });

    let records = load(&DataSource::parse(&url)?, Duration::from_secs(2))?;
    assert_eq!(records, expected);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn load_rejects_non_success_status() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let url = format!("http://{}/weather_Small.csv", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let response = Response::from_string("not here").with_status_code(404);
        request.respond(response).expect("response should succeed");
    });

    let error = load(&DataSource::parse(&url)?, Duration::from_secs(2))
        .expect_err("404 should fail");
    assert!(
        matches!(error, DataLoadError::Status { status: 404, .. }),
        "got {error:?}"
    );

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn load_reports_unreachable_server() -> Result<()> {
    let source = DataSource::parse("http://127.0.0.1:1/weather_Small.csv")?;
    let error = load(&source, Duration::from_millis(200)).expect_err("connection should fail");
    assert!(matches!(error, DataLoadError::Fetch { .. }), "got {error:?}");
    Ok(())
}
