use anyhow::Result;
use chrono::{Local, TimeZone};
use colored::Colorize;
use seeker_core::history::HistoryEntry;

use crate::context::AppContext;

fn when(timestamp_millis: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp_millis)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn print_entries(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("No searches yet.");
        return;
    }
    for entry in entries {
        println!(
            "{}  {}  {}",
            when(entry.timestamp).dimmed(),
            entry.id.bold(),
            entry.query
        );
        if !entry.description.is_empty() {
            println!("    {}", entry.description.dimmed());
        }
    }
}

pub async fn list(ctx: &AppContext, remote: bool) -> Result<()> {
    let entries = if remote {
        ctx.api()?.list_history().await?
    } else {
        ctx.history_usecase().list()?
    };
    print_entries(&entries);
    Ok(())
}

pub async fn remove(ctx: &AppContext, id: &str, purge: bool, remote: bool) -> Result<()> {
    ctx.history_usecase().forget(id, purge)?;
    if remote {
        ctx.api()?.delete_history(id).await?;
    }
    println!("🗑  Removed {}", id);
    Ok(())
}

pub fn clear(ctx: &AppContext, purge: bool) -> Result<()> {
    let purged = ctx.history_usecase().clear(purge)?;
    if purge {
        println!("🗑  History cleared, {} cached result(s) deleted", purged);
    } else {
        println!("🗑  History cleared");
    }
    Ok(())
}
