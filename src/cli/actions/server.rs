use crate::biogate::new;
use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::Result;
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            origins,
            session_idle_seconds,
        } => {
            // Reject malformed connection strings before touching the pool
            let dsn = Url::parse(&dsn)?;

            let globals = GlobalArgs::new(origins, session_idle_seconds);

            new(port, dsn.to_string(), &globals).await?;
        }
    }

    Ok(())
}
