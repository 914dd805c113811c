#![allow(missing_docs)]
use std::process::ExitCode;

use anyhow::Result;
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use techniq_fetch::api::{CustomDrillRequest, DrillRequirements, PlayerProfile, TechniqApi};
use techniq_fetch::{
    Authentication, FetchError, KeyStrategy, QueryParams, RequestExecutor, RequestExecutorBuilder,
};

mod args;
use self::args::{Command, DrillArgs, FetchArgs, USAGE};

const USAGE_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command = match Command::parse() {
        Ok(command) => command,
        Err(error) => {
            error!("{error:#}");
            print_usage();
            return ExitCode::from(USAGE_ERROR);
        }
    };

    let result = match command {
        Command::Fetch(args) => fetch(args).await,
        Command::Drill(args) => drill(args).await,
        Command::Help => {
            print_usage();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match error.downcast_ref::<FetchError>() {
                Some(FetchError::HttpError { status_code }) => {
                    error!(status_code, "request rejected: {error}");
                }
                _ => error!("{error:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn builder(base: &str, token: Option<String>) -> RequestExecutorBuilder {
    let builder = RequestExecutor::builder().with_base_address(base);
    match token {
        Some(token) => builder.with_authentication(Authentication::Bearer(token.into())),
        None => builder,
    }
}

async fn fetch(args: FetchArgs) -> Result<()> {
    let FetchArgs {
        base,
        path,
        query,
        timeout,
        resource_timeout,
        token,
        snake_case_keys,
    } = args;

    let mut builder = builder(&base, token);
    if let Some(timeout) = timeout {
        builder = builder.with_request_timeout(timeout);
    }
    if let Some(timeout) = resource_timeout {
        builder = builder.with_resource_timeout(timeout);
    }
    // print the payload as sent unless asked otherwise
    let key_strategy = if snake_case_keys {
        KeyStrategy::SnakeCase
    } else {
        KeyStrategy::Verbatim
    };
    builder = builder.with_key_strategy(key_strategy);
    let executor = builder.build()?;

    let query = query
        .into_iter()
        .fold(QueryParams::new(), |query, (name, value)| query.add_param(name, value));
    let address = executor.address(&path, &query)?;

    info!(%address, "fetching");
    let value = executor.execute::<Value>(address).await?;
    print_json(&value);
    Ok(())
}

async fn drill(args: DrillArgs) -> Result<()> {
    let DrillArgs {
        base,
        user,
        skill,
        position,
        level,
        category,
        difficulty,
        equipment,
        players,
        field,
        token,
    } = args;

    let executor = builder(&base, token).build()?;
    let api = TechniqApi::new(executor);

    let mut requirements = DrillRequirements::new(skill)
        .with_category(category)
        .with_difficulty(difficulty);
    for item in equipment {
        requirements = requirements.add_equipment(item);
    }
    if let Some(players) = players {
        requirements = requirements.with_number_of_players(players);
    }
    let request = CustomDrillRequest::new(
        user,
        PlayerProfile::new(position, level),
        requirements,
    )
    .with_field_size(field);

    info!(field = field.display_name(), "generating drill");
    let response = api.generate_custom_drill(&request).await?;

    let missing = response.drill.unavailable_equipment(&request.requirements.equipment);
    if !missing.is_empty() {
        let missing = missing
            .iter()
            .map(|item| item.display_name())
            .collect::<Vec<_>>();
        info!(?missing, "the drill uses equipment that was not listed");
    }

    print_json(&serde_json::to_value(&response.drill)?);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_json(value: &Value) {
    println!("{value:#}");
}

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("{USAGE}");
}
