//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `journal_core` linkage.
//! - Open a throwaway in-memory journal to check that migrations apply.

use journal_core::db::migrations::current_version;
use journal_core::JournalStore;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("journal_core ping={}", journal_core::ping());
    println!("journal_core version={}", journal_core::core_version());

    let store = match JournalStore::open_in_memory() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("journal_core store=error {err}");
            return ExitCode::FAILURE;
        }
    };
    match current_version(store.connection()) {
        Ok(version) => {
            println!("journal_core schema_version={version}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("journal_core schema=error {err}");
            ExitCode::FAILURE
        }
    }
}
