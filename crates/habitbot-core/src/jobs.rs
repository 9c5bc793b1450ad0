//! Scheduled daily jobs: reminder sweep, digest post, check-in post.
//!
//! The runner ticks once a minute, converts the wall clock into the
//! configured timezone and fires each job the first time its scheduled
//! time has passed that local day. A job that errors is logged and
//! retried on the next tick; one failing job never blocks the others.

use chrono::{NaiveDate, NaiveTime, Utc};

use crate::digest::{build_digest, Digest, OpenAiSummarizer};
use crate::error::Result;
use crate::format::post_line;
use crate::reactions::daily_post_lines;
use crate::reminder::users_needing_reminder;
use crate::storage::{Config, JobTime, Store};

/// Outbound messaging seam. The Discord adapter implements this; tests
/// use a recording fake.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send_dm(&self, user_id: &str, message: &str) -> Result<()>;
    /// Post to a named channel, returning the new message's id.
    async fn post_channel(&self, channel: &str, message: &str) -> Result<u64>;
    async fn pin_message(&self, channel: &str, message_id: u64) -> Result<()>;
    async fn unpin_message(&self, channel: &str, message_id: u64) -> Result<()>;
}

/// True when a job scheduled at `at` should fire: its time has passed
/// in the local day and it has not fired for that date yet.
fn due(now: NaiveTime, today: NaiveDate, at: JobTime, last_run: Option<NaiveDate>) -> bool {
    if last_run == Some(today) {
        return false;
    }
    let Some(scheduled) = NaiveTime::from_hms_opt(at.hour, at.minute, 0) else {
        return false;
    };
    now >= scheduled
}

/// Render the digest as a channel message.
pub fn digest_message(digest: &Digest) -> String {
    let mut out = format!(
        "📊 **Daily update** — week of {}, day {}/7\n\
         Rank {}: {}\n\n{}\n",
        digest.week_start, digest.days_elapsed, digest.rank_level, digest.rank_name,
        digest.status_block,
    );
    out.push('\n');
    out.push_str(&digest.summary);
    out
}

/// Render the daily reaction check-in post for `date`.
pub fn checkin_post_message(store: &Store, date: NaiveDate) -> Result<String> {
    let lines = daily_post_lines(store)?;
    let mut out = format!("✅ **Check-ins for {}**\nReact to log a habit:\n", date.format("%A, %d %b"));
    for line in &lines {
        out.push_str(&post_line(line));
        out.push('\n');
    }
    Ok(out)
}

const REMINDER_MESSAGE: &str =
    "⏰ You haven't checked in today. A quick `checkin` before midnight keeps your streak alive.";

/// Drives the three daily jobs against one store and transport.
pub struct JobRunner<T: Transport> {
    store: Store,
    config: Config,
    transport: T,
    last_reminder: Option<NaiveDate>,
    last_digest: Option<NaiveDate>,
    last_post: Option<NaiveDate>,
}

impl<T: Transport> JobRunner<T> {
    pub fn new(store: Store, config: Config, transport: T) -> Self {
        Self {
            store,
            config,
            transport,
            last_reminder: None,
            last_digest: None,
            last_post: None,
        }
    }

    /// Tick forever. Jobs run inline on the tick, so a day's jobs never
    /// overlap each other.
    pub async fn run(mut self) -> Result<()> {
        let tz = self.config.tz()?;
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let now = Utc::now().with_timezone(&tz);
            self.tick(now.date_naive(), now.time()).await;
        }
    }

    /// Run whatever is due at the given local date and time.
    pub async fn tick(&mut self, today: NaiveDate, now: NaiveTime) {
        if due(now, today, self.config.post_time, self.last_post) {
            match self.run_checkin_post(today).await {
                Ok(()) => self.last_post = Some(today),
                Err(e) => tracing::warn!("check-in post failed: {e}"),
            }
        }
        if due(now, today, self.config.digest_time, self.last_digest) {
            match self.run_digest_post(today).await {
                Ok(()) => self.last_digest = Some(today),
                Err(e) => tracing::warn!("digest post failed: {e}"),
            }
        }
        if due(now, today, self.config.reminder_time, self.last_reminder) {
            match self.run_reminder_sweep(today).await {
                Ok(()) => self.last_reminder = Some(today),
                Err(e) => tracing::warn!("reminder sweep failed: {e}"),
            }
        }
    }

    /// DM every opted-in user with no check-in for `today`.
    pub async fn run_reminder_sweep(&self, today: NaiveDate) -> Result<()> {
        for user_id in users_needing_reminder(&self.store, today)? {
            if let Err(e) = self.transport.send_dm(&user_id, REMINDER_MESSAGE).await {
                tracing::warn!("reminder to {user_id} failed: {e}");
            }
        }
        Ok(())
    }

    /// Post the daily digest to the updates channel.
    pub async fn run_digest_post(&self, today: NaiveDate) -> Result<()> {
        let summarizer = if self.config.ai.enabled {
            match OpenAiSummarizer::from_config(&self.config.ai) {
                Ok(s) => Some(s),
                Err(e) => {
                    tracing::warn!("summarizer unavailable: {e}");
                    None
                }
            }
        } else {
            None
        };
        let digest = build_digest(&self.store, today, summarizer.as_ref()).await?;
        self.transport
            .post_channel(&self.config.updates_channel, &digest_message(&digest))
            .await?;
        Ok(())
    }

    /// Post the reaction check-in message and remember its id so later
    /// reactions resolve to `today`. The new post is pinned and the
    /// previous day's posts unpinned; pinning is decoration and never
    /// fails the job.
    pub async fn run_checkin_post(&self, today: NaiveDate) -> Result<()> {
        let channel = &self.config.checkins_channel;
        let message = checkin_post_message(&self.store, today)?;
        let message_id = self.transport.post_channel(channel, &message).await?;
        self.store.record_post(&today.to_string(), message_id)?;

        if let Err(e) = self.transport.pin_message(channel, message_id).await {
            tracing::warn!("pin of {message_id} failed: {e}");
        }
        let yesterday = (today - chrono::Duration::days(1)).to_string();
        if let Some(ids) = self.store.load_posts()?.get(&yesterday) {
            for id in ids {
                if let Err(e) = self.transport.unpin_message(channel, *id).await {
                    tracing::warn!("unpin of {id} failed: {e}");
                }
            }
        }
        Ok(())
    }
}
