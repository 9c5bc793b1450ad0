use clap::Subcommand;
use habitbot_core::digest::{build_digest, OpenAiSummarizer};
use habitbot_core::jobs::{checkin_post_message, digest_message};

use crate::common::{open, today, CliResult};

#[derive(Subcommand)]
pub enum DigestAction {
    /// Print today's digest (uses the summarizer when configured)
    Show,
    /// Print today's digest without calling the summarizer
    Plain,
    /// Preview today's reaction check-in post
    Post,
}

pub fn run(action: DigestAction) -> CliResult {
    let (store, config) = open()?;
    let today = today(&config)?;
    let runtime = tokio::runtime::Runtime::new()?;

    match action {
        DigestAction::Show => {
            let summarizer = if config.ai.enabled {
                Some(OpenAiSummarizer::from_config(&config.ai)?)
            } else {
                None
            };
            let digest = runtime.block_on(build_digest(&store, today, summarizer.as_ref()))?;
            println!("{}", digest_message(&digest));
        }
        DigestAction::Plain => {
            let digest =
                runtime.block_on(build_digest::<OpenAiSummarizer>(&store, today, None))?;
            println!("{}", digest_message(&digest));
        }
        DigestAction::Post => {
            println!("{}", checkin_post_message(&store, today)?);
        }
    }
    Ok(())
}
