//! `journal` command-line client.
//!
//! # Responsibility
//! - Issue the four journal RPC operations against a local database.
//! - Print wire responses as JSON on stdout and failures as JSON on stderr.
//!
//! # Invariants
//! - Every request goes through `JournalService`; the client never touches
//!   the manager or repository directly.
//! - Exit code is 0 on success and status-specific otherwise.

mod config;

use clap::{Parser, Subcommand};
use config::GlobalOptions;
use journal_core::{init_logging, SqliteEntryRepository};
use journal_rpc::{
    Code, CreateEntryRequest, DeleteEntryRequest, JournalService, ListEntriesRequest,
    ListEntriesResponse, Status, UpdateEntryRequest,
};
use log::{error, info};
use serde::Serialize;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "journal", version, about = "Micro journal client")]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an entry
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Replace title and content of an entry
    Update {
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Delete an entry
    Delete { id: String },
    /// List entries, newest first
    List {
        /// Entries per page (<= 0 means 10, capped at 100)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        page_size: i32,
        /// Token returned as `nextPageToken` by a previous call
        #[arg(long, default_value = "")]
        page_token: String,
        /// Follow page tokens until the last page
        #[arg(long)]
        all: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(&cli.global.logging_config()) {
        eprintln!("journal: logging disabled: {err}");
    }
    info!(
        "event=app_start module=cli status=ok version={}",
        journal_core::core_version()
    );

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(status) => {
            error!(
                "event=app_exit module=cli status=error code={:?}",
                status.code
            );
            match serde_json::to_string(&status) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{status}"),
            }
            ExitCode::from(exit_code(status.code))
        }
    }
}

fn run(cli: &Cli) -> Result<(), Status> {
    let db_path = cli.global.resolved_db_path();
    let repo = SqliteEntryRepository::open(&db_path).map_err(|err| {
        Status::internal(format!(
            "failed to open journal at `{}`: {err}",
            db_path.display()
        ))
    })?;
    let service = JournalService::with_repository(repo);
    let ctx = cli.global.request_context();

    match &cli.command {
        Command::Create { title, content } => print_json(&service.create_entry(
            &ctx,
            CreateEntryRequest {
                title: title.clone(),
                content: content.clone(),
            },
        )?),
        Command::Update { id, title, content } => print_json(&service.update_entry(
            &ctx,
            UpdateEntryRequest {
                id: id.clone(),
                title: title.clone(),
                content: content.clone(),
            },
        )?),
        Command::Delete { id } => {
            print_json(&service.delete_entry(&ctx, DeleteEntryRequest { id: id.clone() })?)
        }
        Command::List {
            page_size,
            page_token,
            all,
        } => {
            let mut request = ListEntriesRequest {
                page_size: *page_size,
                page_token: page_token.clone(),
            };
            if !*all {
                return print_json(&service.list_entries(&ctx, request)?);
            }

            let mut combined = ListEntriesResponse {
                entries: Vec::new(),
                next_page_token: String::new(),
                total_count: 0,
            };
            loop {
                let page = service.list_entries(&ctx, request.clone())?;
                combined.entries.extend(page.entries);
                combined.total_count = page.total_count;
                if page.next_page_token.is_empty() {
                    break;
                }
                request.page_token = page.next_page_token;
            }
            print_json(&combined)
        }
    }
}

fn print_json(value: &impl Serialize) -> Result<(), Status> {
    let json = serde_json::to_string_pretty(value).map_err(|err| {
        Status::internal(format!("failed to encode response: {err}"))
    })?;
    println!("{json}");
    Ok(())
}

fn exit_code(code: Code) -> u8 {
    match code {
        Code::InvalidArgument => 2,
        Code::NotFound => 3,
        Code::Cancelled => 4,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::{exit_code, Cli, Command};
    use clap::Parser;
    use journal_rpc::Code;

    #[test]
    fn list_accepts_negative_page_size() {
        let cli = Cli::try_parse_from(["journal", "list", "--page-size", "-4"]).unwrap();
        match cli.command {
            Command::List { page_size, .. } => assert_eq!(page_size, -4),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "journal",
            "delete",
            "7",
            "--db",
            "/tmp/j.db",
            "--timeout-ms",
            "50",
        ])
        .unwrap();
        assert_eq!(cli.global.timeout_ms, Some(50));
        assert!(matches!(cli.command, Command::Delete { ref id } if id == "7"));
    }

    #[test]
    fn exit_codes_are_distinct_and_non_zero() {
        let codes = [
            Code::InvalidArgument,
            Code::NotFound,
            Code::Cancelled,
            Code::Internal,
        ]
        .map(exit_code);
        assert!(codes.iter().all(|code| *code != 0));
        let mut unique = codes.to_vec();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), codes.len());
    }
}
