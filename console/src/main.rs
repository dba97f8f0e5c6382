//! Ajime Console - Entry Point
//!
//! Command line access to device filter queries and application scheduling
//! rules on the Ajime backend.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use ajconsole::http::client::HttpClient;
use ajconsole::logs::{init_logging, LogOptions};
use ajconsole::query::codec::{raw_filters, scheduling_rule_from_json, DeviceListState};
use ajconsole::query::render::{render_chips, render_raw_chips, FilterChip, RENDER_ERROR_LABEL};
use ajconsole::screens::devices::DeviceListScreen;
use ajconsole::screens::scheduling::SchedulingRuleScreen;
use ajconsole::storage::layout::StorageLayout;
use ajconsole::storage::settings::{api_token_from_env, load_settings, Settings};
use ajconsole::utils::version_info;
use anyhow::{bail, Context};
use colored::Colorize;
use openapi_client::models::DeviceStatus;
use tracing::{error, info};

const USAGE: &str = "\
Usage: ajconsole <command>

  --version                          Print version information
  --init                             Write default settings to the console home
  --encode=<query json>              Encode a query as a device list query string
  --decode=<query string>            Decode a device list query string
  --devices[=<query string>]         List devices matching a query string
  --schedule --app=<id> [--rule=<query json>]
                                     Show or replace an application's scheduling rule";

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{version}"),
            Err(e) => eprintln!("Failed to print version: {e}"),
        }
        return;
    }

    let layout = StorageLayout::default();
    let settings = match load_settings(&layout).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Unable to read settings file: {e}");
            std::process::exit(1);
        }
    };

    let log_options = LogOptions {
        log_level: settings.log_level,
        json_format: settings.json_logs,
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    if let Err(e) = dispatch(&cli_args, &layout, &settings).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn dispatch(
    cli_args: &HashMap<String, String>,
    layout: &StorageLayout,
    settings: &Settings,
) -> anyhow::Result<()> {
    if cli_args.contains_key("init") {
        let file = layout.settings_file();
        if file.exists().await {
            bail!("Settings already exist at {}", file.path().display());
        }
        file.write_json(&Settings::default()).await?;
        info!("Wrote default settings to {}", file.path().display());
        return Ok(());
    }

    if let Some(json) = cli_args.get("encode") {
        let value: serde_json::Value =
            serde_json::from_str(json).context("Query must be a JSON array of filters")?;
        let state = DeviceListState::new(scheduling_rule_from_json(&value));
        println!("{}", state.to_query_string()?);
        return Ok(());
    }

    if let Some(query_string) = cli_args.get("decode") {
        let state = DeviceListState::from_query_string(query_string);
        println!("{}", serde_json::to_string_pretty(&state.query)?);
        print_chips(&render_chips(&state.query, false));

        let written = render_raw_chips(&raw_filters(query_string), false);
        if written
            .iter()
            .any(|chip| chip.labels.iter().any(|label| label == RENDER_ERROR_LABEL))
        {
            println!("{}", "Invalid conditions were dropped from:".yellow());
            print_chips(&written);
        }
        println!(
            "page: {}  order_by: {}  order: {}",
            state.page,
            state.order_by.as_deref().unwrap_or("-"),
            state.order.as_deref().unwrap_or("-")
        );
        return Ok(());
    }

    if let Some(query_string) = cli_args.get("devices") {
        let query_string = if query_string == "true" { "" } else { query_string.as_str() };
        let client = http_client(settings)?;
        let mut screen = DeviceListScreen::from_url(query_string, settings.devices.page_size)?;
        print_chips(&screen.chips());
        screen.refresh(&client).await?;
        for device in screen.devices() {
            let status = match device.status {
                DeviceStatus::Online => device.status.as_str().green(),
                DeviceStatus::Offline => device.status.as_str().red(),
            };
            println!("{}  {}  {}", device.id.dimmed(), device.name.bold(), status);
        }
        println!("{} device(s) in total", screen.total().unwrap_or_default());
        return Ok(());
    }

    if cli_args.contains_key("schedule") {
        let Some(application_id) = cli_args.get("app") else {
            bail!("--schedule requires --app=<id>");
        };
        let client = http_client(settings)?;
        let kinds = settings.scheduling.selectable_kinds()?;
        let mut screen = SchedulingRuleScreen::load(&client, application_id, kinds).await?;

        if let Some(json) = cli_args.get("rule") {
            let value: serde_json::Value =
                serde_json::from_str(json).context("Rule must be a JSON array of filters")?;
            screen.replace_rule(scheduling_rule_from_json(&value));
            screen.save(&client).await?;
            info!("Saved scheduling rule of {}", application_id);
        }

        println!("{}", screen.application().name.bold());
        print_chips(&screen.chips());
        return Ok(());
    }

    println!("{USAGE}");
    Ok(())
}

fn http_client(settings: &Settings) -> anyhow::Result<HttpClient> {
    let client = HttpClient::new(
        &settings.backend.base_url,
        api_token_from_env(),
        Duration::from_secs(settings.backend.timeout_secs),
    )?;
    Ok(client)
}

fn print_chips(chips: &[FilterChip]) {
    if chips.is_empty() {
        println!("{}", "(no filters)".dimmed());
        return;
    }
    let rendered: Vec<String> = chips
        .iter()
        .map(|chip| format!("[{}]", chip.text()).cyan().to_string())
        .collect();
    println!("{}", rendered.join(" AND "));
}
