use crate::api;
use crate::cli::actions::Action;
use anyhow::{Context, Result};
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server { port, dsn, secret } => {
            // Fail fast on an unparseable DSN instead of at pool creation
            Url::parse(&dsn).context("Invalid database connection string")?;

            api::new(port, dsn, secret).await?;
        }
    }

    Ok(())
}
