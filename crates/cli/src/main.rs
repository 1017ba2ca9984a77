//! Command-line entry point for Forcelink.
//!
//! Run with: `forcelink <command> [args]`
//!
//! Configuration comes from `.env`, `SALESFORCE_*` variables or a
//! `forcelink.{json,toml}` file. Records are printed to stdout as JSON; logs
//! go to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::env;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use forcelink_infra::{config, connect, init_tracing};
use serde_json::json;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialise logging: {e}");
    }

    let args: Vec<String> = env::args().skip(1).collect();

    let result = match args.first().map(String::as_str) {
        Some("help") | None => {
            print_help();
            Ok(())
        }
        Some(command) => run(command, &args[1..]).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: &str, args: &[String]) -> anyhow::Result<()> {
    if !matches!(command, "login" | "query" | "get" | "search" | "delete") {
        print_help();
        bail!("Unknown command: {command}");
    }

    let config = config::load().context("failed to load configuration")?;
    let client = connect(&config).await.context("login failed")?;

    let output = match (command, args) {
        ("login", []) => {
            let credential = client.provider().credential().await?;
            json!({
                "instance_url": credential.instance_url,
                "identity_url": credential.identity_url,
                "scope": credential.scope,
            })
        }
        ("query", [soql]) => json!(client.query(soql).await?),
        ("get", [object, id, fields]) => {
            let fields: Vec<&str> = fields.split(',').map(str::trim).collect();
            json!(client.get_object(object, id, &fields).await?)
        }
        ("search", [object, query, fields, limit]) => {
            let fields: Vec<&str> = fields.split(',').map(str::trim).collect();
            let limit: u32 =
                limit.parse().with_context(|| format!("invalid limit: {limit}"))?;
            json!(client.search_object(object, query, &fields, limit).await?)
        }
        ("delete", [object, id]) => json!(client.delete_object(object, id).await?),
        _ => {
            print_help();
            return Err(anyhow!("wrong number of arguments for {command}"));
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_help() {
    println!("Forcelink: Salesforce JWT bearer login and sObject access");
    println!();
    println!("USAGE:");
    println!("    forcelink <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    login                                  Log in and show the session");
    println!("    query <SOQL>                           Run a SOQL query");
    println!("    get <OBJECT> <ID> <FIELD,...>          Fetch fields of one record");
    println!("    search <OBJECT> <TEXT> <FIELD,...> <LIMIT>");
    println!("                                           Parameterized search");
    println!("    delete <OBJECT> <ID>                   Delete a record");
    println!("    help                                   Show this message");
}
