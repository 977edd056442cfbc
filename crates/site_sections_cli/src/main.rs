//! CLI probe for the section policy.
//!
//! # Responsibility
//! - Verify `site_sections_core` linkage with a deterministic ping.
//! - Evaluate one capability check against a database file.
//!
//! Usage:
//! - `site_sections_cli`
//! - `site_sections_cli <db-path> can-edit <user-id> <content-id>`

use site_sections_core::db::open_db;
use site_sections_core::{Action, SectionService, SqliteSectionStore};
use std::error::Error;
use std::process::ExitCode;
use uuid::Uuid;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        println!("site_sections_core ping={}", site_sections_core::ping());
        println!(
            "site_sections_core version={}",
            site_sections_core::core_version()
        );
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let [db_path, command, user_id, content_id] = args else {
        return Err("expected: <db-path> can-edit|can-delete <user-id> <content-id>".into());
    };
    let action = match command.as_str() {
        "can-edit" => Action::Edit,
        "can-delete" => Action::Delete,
        other => return Err(format!("unknown command `{other}`").into()),
    };

    let conn = open_db(db_path)?;
    let store = SqliteSectionStore::try_new(&conn)?;
    let service = SectionService::new(store);
    let allowed = service.can_perform(
        Uuid::parse_str(user_id)?,
        Uuid::parse_str(content_id)?,
        action,
    )?;
    println!("allowed={allowed}");
    Ok(())
}
