use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use seeker_core::result::{Figure, ResultCache};

use crate::context::AppContext;
use crate::render;

const DATA_URL_PREFIX: &str = "base64,";

/// Decodes a figure payload. A `data:` URL prefix is tolerated.
pub fn decode_figure(figure: &Figure) -> Result<Vec<u8>> {
    let payload = match figure.image_base64.find(DATA_URL_PREFIX) {
        Some(at) => &figure.image_base64[at + DATA_URL_PREFIX.len()..],
        None => figure.image_base64.as_str(),
    };
    STANDARD
        .decode(payload.trim())
        .with_context(|| format!("Figure {} is not valid base64", figure.index))
}

/// Writes each figure as `figure-<index>.png` and returns how many were written.
pub fn export_figures(figures: &[Figure], dir: &Path) -> Result<usize> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    for figure in figures {
        let path = dir.join(format!("figure-{}.png", figure.index));
        fs::write(&path, decode_figure(figure)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(figures.len())
}

pub fn run(ctx: &AppContext, id: &str, figures: Option<&Path>, json: bool) -> Result<()> {
    let Some(envelope) = ctx.cache.load(id)? else {
        bail!("No cached result for '{}'", id);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else {
        println!("🔎 {}", envelope.query);
        render::print_result(&envelope.results);
    }

    if let Some(dir) = figures {
        let written = export_figures(&envelope.results.figures, dir)?;
        println!("🖼  Wrote {} figure(s) to {}", written, dir.display());
    }
    Ok(())
}
