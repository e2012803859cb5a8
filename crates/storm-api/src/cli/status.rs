//! Configuration and saved-state status command.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use storm_core::repository::state::StateRepository;
use storm_infra::json::JsonStateRepository;
use storm_types::config::ChatConfig;

/// Display the effective configuration and what is saved on disk.
///
/// Saved counts are read straight from the state documents, so they are
/// shown even when amnesia is on.
pub async fn status(data_dir: &Path, config: &ChatConfig, json: bool) -> Result<()> {
    let repo = JsonStateRepository::from_config(data_dir, config);
    let saved = repo
        .load()
        .await
        .with_context(|| format!("failed to read saved state in {}", data_dir.display()))?;
    let (users, messages) = saved
        .as_ref()
        .map(|s| (s.users.len(), s.messages.len()))
        .unwrap_or((0, 0));

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": data_dir.display().to_string(),
            "config": config,
            "saved": {
                "present": saved.is_some(),
                "users_file": repo.users_path().display().to_string(),
                "messages_file": repo.messages_path().display().to_string(),
                "users": users,
                "messages": messages,
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("  {} storm v{}", style("⚡").bold(), env!("CARGO_PKG_VERSION"));
    println!();

    println!("  {}", style("── Config ──").dim());
    println!("  Identity:     {}", style(config.identity_mode).cyan());
    println!("  Nick length:  {}", config.nick_length);
    println!("  Token length: {}", config.token_length);
    println!("  Message cap:  {}", config.messages_max);
    println!("  Encoding:     {}", config.encoding);
    if config.amnesia {
        println!("  Persistence:  {}", style("off (amnesia)").yellow());
    } else {
        println!("  Persistence:  {}", style("on").green());
    }
    println!();

    println!("  {}", style("── Saved state ──").dim());
    println!("  Users file:    {}", style(repo.users_path().display()).dim());
    println!("  Messages file: {}", style(repo.messages_path().display()).dim());
    if saved.is_some() {
        println!("  {} users, {} messages", style(users).bold(), style(messages).bold());
    } else {
        println!("  {}", style("nothing saved").dim());
    }
    println!();

    Ok(())
}
