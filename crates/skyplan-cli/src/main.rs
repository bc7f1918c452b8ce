// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use runtime::DataRuntime;
use skyplan_app::{AppState, DISPLAY_LIMIT};
use skyplan_data::DataSource;
use std::env;
use std::path::PathBuf;
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `skyplan --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    logging::init(&config.log_file()?, &config.log_level())?;

    let source = resolve_source(&options, &config)?;
    let timeout = config.data_timeout().with_context(|| {
        format!(
            "invalid [data].timeout in {}",
            options.config_path.display()
        )
    })?;
    info!(source = %source, demo = options.demo, "starting skyplan");

    if options.check_only {
        let records = skyplan_data::load(&source, timeout)
            .with_context(|| format!("load weather data from {source}"))?;
        println!(
            "{} records in {source}; {} shown",
            records.len(),
            records.len().min(DISPLAY_LIMIT)
        );
        return Ok(());
    }

    let mut state = AppState::default();
    let mut runtime = DataRuntime::new(source, timeout);
    skyplan_tui::run_app(&mut state, &mut runtime)
}

fn resolve_source(options: &CliOptions, config: &Config) -> Result<DataSource> {
    if options.demo {
        return Ok(DataSource::Inline(skyplan_testkit::demo_csv()?));
    }
    match &options.source {
        Some(raw) => DataSource::parse(raw)
            .with_context(|| format!("invalid --source {raw:?}; pass a file path or http(s) URL")),
        None => config.data_source().with_context(|| {
            format!(
                "invalid [data].source in {}",
                options.config_path.display()
            )
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    source: Option<String>,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        source: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--source" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--source requires a file path or URL"))?;
                options.source = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("skyplan: browse weather records and plan days");
    println!("  --config <path>          Use a specific config path");
    println!("  --source <path|url>      Load weather CSV from this file or URL");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Launch with generated demo weather data");
    println!("  --check                  Load the data source, print the row count and exit");
    println!("  --help                   Show this help");
}
