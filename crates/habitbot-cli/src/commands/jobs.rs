use std::sync::atomic::{AtomicU64, Ordering};

use clap::Subcommand;
use habitbot_core::error::Result;
use habitbot_core::jobs::{JobRunner, Transport};

use crate::common::{open, CliResult};

#[derive(Subcommand)]
pub enum JobsAction {
    /// Run the scheduler in the foreground, printing outbound messages
    Run,
}

/// Stdout-backed transport for running the scheduler without Discord.
struct ConsoleTransport {
    next_id: AtomicU64,
}

impl Transport for ConsoleTransport {
    async fn send_dm(&self, user_id: &str, message: &str) -> Result<()> {
        println!("[dm -> {user_id}] {message}");
        Ok(())
    }

    async fn post_channel(&self, channel: &str, message: &str) -> Result<u64> {
        println!("[#{channel}]\n{message}");
        Ok(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    async fn pin_message(&self, channel: &str, message_id: u64) -> Result<()> {
        println!("[#{channel}] pinned message {message_id}");
        Ok(())
    }

    async fn unpin_message(&self, channel: &str, message_id: u64) -> Result<()> {
        println!("[#{channel}] unpinned message {message_id}");
        Ok(())
    }
}

pub fn run(action: JobsAction) -> CliResult {
    match action {
        JobsAction::Run => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "info".into()),
                )
                .init();

            let (store, config) = open()?;
            let transport = ConsoleTransport {
                next_id: AtomicU64::new(1),
            };
            let runner = JobRunner::new(store, config, transport);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(runner.run())?;
        }
    }
    Ok(())
}
