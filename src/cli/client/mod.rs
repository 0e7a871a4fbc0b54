//! Client command - drives the user page against a running backend

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Subcommand};
use tracing::info;

use crate::client::{
    BackendClient, DeleteOutcome, HealthMonitor, HttpBackendClient, StderrNotifier, UserForm,
    UserPage,
};
use crate::config::AppConfig;
use crate::domain::UserId;

#[derive(Debug, Args)]
pub struct ClientArgs {
    /// Backend base URL; overrides `client.api_base_url`
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: ClientCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientCommand {
    /// Show the user list and the backend health until Ctrl+C
    Watch,

    /// Create a user
    Add {
        #[arg(long)]
        email: String,

        #[arg(long)]
        name: Option<String>,
    },

    /// Delete a user by id
    Delete { id: String },
}

pub async fn run(args: ClientArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let base_url = args
        .api_url
        .unwrap_or_else(|| config.client.api_base_url.clone());
    info!(base_url = %base_url, "Using backend");

    let client: Arc<dyn BackendClient> = Arc::new(HttpBackendClient::new(base_url)?);
    let page = UserPage::new(client.clone(), Arc::new(StderrNotifier));

    match args.command {
        ClientCommand::Watch => watch(&config, client, &page).await,
        ClientCommand::Add { email, name } => {
            page.mount().await;

            let mut form = UserForm::new(email, name.unwrap_or_default());
            let user = form
                .submit(&page)
                .await
                .context("Failed to create user")?;

            info!(user_id = %user.id(), "Created user");
            println!("{}", page.render());
            Ok(())
        }
        ClientCommand::Delete { id } => {
            let id = UserId::parse(&id)?;
            page.mount().await;

            match page.delete_user(id).await {
                DeleteOutcome::Deleted => {
                    println!("{}", page.render());
                    Ok(())
                }
                outcome => anyhow::bail!("User {} was not deleted ({:?})", id, outcome),
            }
        }
    }
}

async fn watch(
    config: &AppConfig,
    client: Arc<dyn BackendClient>,
    page: &UserPage,
) -> anyhow::Result<()> {
    let interval = Duration::from_secs(config.client.health_poll_interval_secs);
    let mut monitor = HealthMonitor::start(client, interval);
    let mut health = monitor.subscribe();

    page.mount().await;
    println!("{}", page.render());

    loop {
        tokio::select! {
            _ = super::serve::shutdown_signal() => break,
            changed = health.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", *health.borrow_and_update());
            }
        }
    }

    monitor.stop();
    Ok(())
}
