//! Show the most recent analysis.

use ethiscan::storage::LastResultStore;

use crate::cli::helpers::{print_detail, print_response};
use crate::cli::icons::warn;

pub async fn cmd_last(json: bool) -> anyhow::Result<()> {
    let store = LastResultStore::default_location();
    let Some(outcome) = store.load().await? else {
        eprintln!("{} No analysis has been run yet", warn());
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    print_response(&outcome.response);
    println!();
    print_detail("Target", &outcome.target);
    print_detail(
        "Analyzed",
        outcome.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );
    if !outcome.rubric_version.is_empty() {
        print_detail("Rubric", &outcome.rubric_version);
    }
    Ok(())
}
