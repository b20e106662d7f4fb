#![deny(warnings)]

//! Headless CLI: load a program scenario, apply overrides, print the KPIs.

mod report;

use anyhow::{anyhow, Context, Result};
use calc_core::{Configuration, SolveMode};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    scenario: Option<String>,
    mode: Option<SolveMode>,
    overrides: Vec<(String, String)>,
    json: bool,
    dump_config: bool,
    version: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut out = Args::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--scenario" => out.scenario = it.next(),
            "--mode" => {
                let text = it.next().ok_or_else(|| anyhow!("--mode needs a value"))?;
                out.mode = Some(text.parse()?);
            }
            "--set" => {
                let pair = it.next().ok_or_else(|| anyhow!("--set needs key=value"))?;
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| anyhow!("expected key=value, got {pair}"))?;
                out.overrides.push((key.trim().to_string(), value.to_string()));
            }
            "--json" => out.json = true,
            "--dump-config" => out.dump_config = true,
            "--version" => out.version = true,
            _ => {}
        }
    }
    Ok(out)
}

fn build_config(args: &Args) -> Result<Configuration> {
    let mut config = match &args.scenario {
        Some(path) => Configuration::load(path)
            .with_context(|| format!("failed to load scenario {path}"))?,
        None => Configuration::default(),
    };
    for (key, value) in &args.overrides {
        config.set_field(key, value)?;
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    Ok(config)
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.version {
        println!(
            "partner-calc {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }
    info!(scenario = ?args.scenario, overrides = args.overrides.len(), "starting CLI");

    let config = build_config(&args)?;
    if args.dump_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let eval = calc_econ::evaluate(&config);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&eval)?);
    } else {
        print!("{}", report::render(&eval)?);
    }
    Ok(())
}
