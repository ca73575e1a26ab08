//! API key management commands.

use console::style;
use tokio::io::AsyncReadExt;

use ethiscan::storage::{FileCredentialStore, API_KEY_ENV};

use crate::cli::icons::{dim_arrow, success, warn};

/// Store the API key, reading it from stdin when not given.
pub async fn cmd_key_set(key: Option<String>) -> anyhow::Result<()> {
    let key = match key {
        Some(key) => key,
        None => {
            let mut input = String::new();
            tokio::io::stdin().read_to_string(&mut input).await?;
            input
        }
    };
    if key.trim().is_empty() {
        anyhow::bail!("API key is empty");
    }

    let store = FileCredentialStore::default_location();
    store.set_api_key(&key).await?;
    eprintln!("{} API key saved", success());
    eprintln!("  {} {}", dim_arrow(), store.path().display());
    Ok(())
}

/// Show the configured key, masked, and where it comes from.
pub async fn cmd_key_show() -> anyhow::Result<()> {
    let store = FileCredentialStore::default_location();

    if let Some(key) = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()) {
        println!("{} (from {})", mask(&key), API_KEY_ENV);
        return Ok(());
    }
    match store.stored_key().await? {
        Some(key) => println!("{} (from {})", mask(&key), store.path().display()),
        None => {
            eprintln!(
                "{} No API key configured. Set one with {}",
                warn(),
                style("ethiscan key set").bold()
            );
        }
    }
    Ok(())
}

/// Remove the stored key.
pub async fn cmd_key_clear() -> anyhow::Result<()> {
    let store = FileCredentialStore::default_location();
    if store.clear().await? {
        eprintln!("{} API key removed", success());
    } else {
        eprintln!("{} No stored API key", warn());
    }
    Ok(())
}

/// Keep the last four characters visible.
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
