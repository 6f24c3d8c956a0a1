mod api;
mod cli;
mod config;
mod error;
mod notify;
mod orchestrator;
mod router;
mod store;
mod ticket;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use api::types::SubmitQueryRequest;
use api::{AppState, HelpdeskClient};
use cli::{Cli, Command};
use config::HelpdeskConfig;
use notify::{LogNotifier, Notifier, SmtpNotifier};
use orchestrator::TicketOrchestrator;
use router::DepartmentRouter;
use store::SqliteStore;
use ui::RequestProgress;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut config = HelpdeskConfig::load(&cli.config)?;

    match cli.command {
        Command::Serve { bind, database } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(database) = database {
                config.database = database;
            }
            serve(config).await
        }
        Command::Classify { text } => {
            let router = DepartmentRouter::from_config(&config);
            let label = router.classify(Some(text.as_str()));
            let address = router.address_for(label).unwrap_or_default();
            ui::print_classification(label, address, label == router.fallback().name);
            Ok(())
        }
        Command::Submit {
            email,
            subject,
            body,
            server,
        } => {
            let client = HelpdeskClient::new(&server)?;
            let progress = RequestProgress::start("Submitting query...");
            let req = SubmitQueryRequest {
                email: Some(email),
                subject: Some(subject),
                body: Some(body),
            };
            match client.submit_query(&req).await {
                Ok(resp) => {
                    progress.submitted(&resp);
                    Ok(())
                }
                Err(e) => {
                    progress.failed(&e.to_string());
                    Err(e.into())
                }
            }
        }
        Command::Status { ticket_id, server } => {
            let client = HelpdeskClient::new(&server)?;
            let progress = RequestProgress::start(&format!("Looking up {ticket_id}..."));
            match client.ticket_status(&ticket_id).await {
                Ok(view) => {
                    progress.status(&view);
                    Ok(())
                }
                Err(e) => {
                    progress.failed(&e.to_string());
                    Err(e.into())
                }
            }
        }
    }
}

async fn serve(config: HelpdeskConfig) -> Result<()> {
    info!("helpdesk v{} starting", env!("CARGO_PKG_VERSION"));

    let store = SqliteStore::open(&config.database)?;
    info!(database = %config.database.display(), "ticket store ready");

    let notifier: Arc<dyn Notifier> = match &config.smtp {
        Some(smtp) => {
            info!(host = %smtp.host, port = smtp.port, "sending email via SMTP");
            Arc::new(SmtpNotifier::from_config(smtp)?)
        }
        None => {
            warn!("no [smtp] section configured; notifications will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let router = DepartmentRouter::from_config(&config);
    info!(
        departments = config.departments.len(),
        default = %config.default_department,
        "routing table loaded"
    );

    let orchestrator = TicketOrchestrator::new(router, Arc::new(store), notifier);
    api::serve(&config.bind, AppState::new(orchestrator)).await
}
