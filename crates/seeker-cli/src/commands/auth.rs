use anyhow::{Context, Result, bail};
use colored::Colorize;
use seeker_core::auth::{RememberMeStore, RememberedCredentials};

use crate::context::AppContext;

pub async fn login(
    ctx: &AppContext,
    email: Option<String>,
    password: Option<String>,
    remember: bool,
) -> Result<()> {
    let (email, password) = match (email, password) {
        (Some(email), Some(password)) => (email, password),
        (email, None) => {
            let saved = ctx
                .remember
                .load()?
                .context("No password given and no remembered credentials")?;
            if email.as_deref().is_some_and(|e| e != saved.email) {
                bail!("No password given for {}", email.unwrap_or_default());
            }
            (saved.email, saved.password)
        }
        (None, Some(_)) => bail!("An email is required with --password"),
    };

    let api = ctx.api()?;
    if let Err(e) = api.login(&email, &password).await {
        if e.is_unauthorized() {
            ctx.remember.clear()?;
            bail!("Wrong email or password");
        }
        return Err(e.into());
    }

    if remember {
        ctx.remember
            .save(&RememberedCredentials::new(email.as_str(), password.as_str()))?;
    }
    println!("{} {}", "✅ Signed in as".green(), email);
    Ok(())
}

pub async fn register(ctx: &AppContext, email: &str, password: &str, name: &str) -> Result<()> {
    ctx.api()?.register(email, password, name).await?;
    println!("📧 Check {} for the activation link, then run `seeker activate <token>`", email);
    Ok(())
}

pub async fn activate(ctx: &AppContext, token: &str) -> Result<()> {
    ctx.api()?.activate(token).await?;
    println!("{}", "✅ Account activated".green());
    Ok(())
}

pub fn google_login(ctx: &AppContext) -> Result<()> {
    println!("Open this URL to sign in with Google:");
    println!("  {}", ctx.api()?.google_auth_url());
    Ok(())
}

pub async fn logout(ctx: &AppContext, forget: bool) -> Result<()> {
    if forget {
        ctx.remember.clear()?;
    }
    if let Err(e) = ctx.api()?.logout().await {
        tracing::warn!(error = %e, "Server did not confirm logout");
    }
    println!("👋 Signed out");
    Ok(())
}

pub async fn credits(ctx: &AppContext) -> Result<()> {
    let balance = ctx.api()?.credits().await?;
    match balance.total {
        Some(total) => println!("💳 {} / {} credits left", balance.remaining, total),
        None => println!("💳 {} credits left", balance.remaining),
    }
    Ok(())
}
