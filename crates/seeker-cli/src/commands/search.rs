use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use seeker_application::{SearchOutcome, SearchRequest};
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;
use crate::render;
use crate::sink::ConsoleSink;

/// Cancels `cancel` on the first Ctrl-C so the session can flush and stop.
fn cancel_on_ctrl_c(cancel: &CancellationToken) {
    let cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted; stopping the search");
            cancel.cancel();
        }
    });
}

pub async fn run(ctx: &AppContext, query: String, id: Option<String>, json: bool) -> Result<()> {
    let usecase = ctx.search_usecase()?;
    let mut request = SearchRequest::new(query);
    if let Some(id) = id {
        request = request.with_search_id(id);
    }

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(&cancel);

    println!("{} {}", "🔎 Searching".bold(), request.query);
    let outcome = usecase
        .search(request, Arc::new(ConsoleSink::new()), &cancel)
        .await?;

    let result = match &outcome {
        SearchOutcome::Cached { envelope, .. } => {
            println!("{} {}", "📦 Loaded from cache:".dimmed(), outcome.search_id());
            &envelope.results
        }
        SearchOutcome::Streamed(report) => &report.result,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!();
        render::print_result(result);
    }
    Ok(())
}
