use anyhow::Result;

use crate::context::AppContext;

pub fn show(ctx: &AppContext) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&ctx.config)?);
    println!("stream url: {}", ctx.config.stream_url());
    Ok(())
}

pub fn set(
    ctx: &AppContext,
    api_url: Option<String>,
    stream_path: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let mut config = ctx.config.clone();
    if let Some(url) = api_url {
        config.api_base_url = url;
    }
    if let Some(path) = stream_path {
        config.stream_path = path;
    }
    if let Some(secs) = timeout_secs {
        config.request_timeout_secs = secs;
    }
    ctx.config_service.save(&config)?;
    println!("✅ Saved configuration");
    Ok(())
}
