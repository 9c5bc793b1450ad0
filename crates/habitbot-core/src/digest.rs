//! Daily digest: structured team snapshot, deterministic status lines,
//! and the optional AI summarizer collaborator.
//!
//! Everything that matters (statuses, targets, risks) is computed here
//! from the store; the summarizer only phrases a short paragraph and
//! the digest renders fully when it is absent or failing.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

use crate::catalog::rank;
use crate::error::{CoreError, Result};
use crate::resolver::effective_targets;
use crate::risk::{classify, rollup, Risk, UserStatus};
use crate::storage::{AiConfig, Store};
use crate::streaks::{streaks_for, Streak};
use crate::summary::summarize_week;
use crate::week::{days_elapsed, days_remaining, monday_of, week_id};

/// Position within the current week.
#[derive(Debug, Clone, Serialize)]
pub struct WeekInfo {
    pub week_start: String,
    pub days_elapsed: u32,
    pub days_remaining: u32,
    pub current_date: String,
}

/// One habit's progress for one user.
#[derive(Debug, Clone, Serialize)]
pub struct HabitProgress {
    pub completed: u32,
    pub target: u32,
    pub is_daily: bool,
    pub risk: Risk,
}

/// One user's full mid-week picture.
#[derive(Debug, Clone, Serialize)]
pub struct UserSnapshot {
    pub habits: BTreeMap<String, HabitProgress>,
    /// Days with at least one check-in this week
    pub recent_checkins: u32,
    /// Days since the last check-in, bounded by the week start
    pub days_since_last: u32,
    pub streaks: BTreeMap<String, Streak>,
}

impl UserSnapshot {
    /// Worst-wins rollup across this user's habits.
    pub fn status(&self) -> UserStatus {
        rollup(self.habits.values().map(|h| h.risk))
    }
}

/// Team-wide aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct TeamStats {
    pub total_users: u32,
    pub active_users: u32,
    pub users_behind: u32,
    pub habits_at_risk: BTreeMap<String, u32>,
}

/// Structured input for the status block and the summarizer.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub week: WeekInfo,
    pub rank_level: u32,
    pub rank_name: String,
    /// habit -> effective weekly day-count target
    pub targets: BTreeMap<String, u32>,
    pub users: BTreeMap<String, UserSnapshot>,
    pub team: TeamStats,
}

/// Assemble the full snapshot for `today` from the store.
pub fn gather_snapshot(store: &Store, today: NaiveDate) -> Result<Snapshot> {
    let rank_level = store.load_rank()?;
    let rank_name = rank(rank_level)?
        .map(|r| r.name.to_string())
        .unwrap_or_else(|| format!("rank {rank_level}"));

    let week_monday = monday_of(today);
    let current_week = week_id(today);
    let elapsed = days_elapsed(week_monday, today);
    let remaining = days_remaining(week_monday, today);

    let targets: BTreeMap<String, u32> = effective_targets(rank_level)?
        .into_iter()
        .map(|(id, t)| (id.to_string(), t.count))
        .collect();

    let ledger = store.load_ledger()?;
    let week_data = ledger.get(&current_week).cloned().unwrap_or_default();
    let summary = summarize_week(&week_data);

    let mut users = BTreeMap::new();
    for (user_id, days) in &week_data {
        let user_summary = summary.get(user_id).cloned().unwrap_or_default();

        let mut habits = BTreeMap::new();
        for (habit_id, target) in &targets {
            let completed = user_summary.get(habit_id).copied().unwrap_or(0);
            habits.insert(
                habit_id.clone(),
                HabitProgress {
                    completed,
                    target: *target,
                    is_daily: *target == 7,
                    risk: classify(completed, *target, elapsed, remaining),
                },
            );
        }

        let recent_checkins = days.values().filter(|entries| !entries.is_empty()).count() as u32;
        let mut days_since_last = 0;
        for back in 0..elapsed {
            let day = today - chrono::Duration::days(back as i64);
            if days.contains_key(&day.to_string()) {
                break;
            }
            days_since_last += 1;
        }

        users.insert(
            user_id.clone(),
            UserSnapshot {
                habits,
                recent_checkins,
                days_since_last,
                streaks: streaks_for(store, user_id, today)?,
            },
        );
    }

    let mut habits_at_risk: BTreeMap<String, u32> = BTreeMap::new();
    for user in users.values() {
        for (habit_id, progress) in &user.habits {
            if matches!(progress.risk, Risk::High | Risk::Medium) {
                *habits_at_risk.entry(habit_id.clone()).or_default() += 1;
            }
        }
    }
    let team = TeamStats {
        total_users: users.len() as u32,
        active_users: users.values().filter(|u| u.recent_checkins > 0).count() as u32,
        users_behind: users
            .values()
            .filter(|u| {
                u.habits
                    .values()
                    .any(|h| matches!(h.risk, Risk::High | Risk::Medium))
            })
            .count() as u32,
        habits_at_risk,
    };

    Ok(Snapshot {
        week: WeekInfo {
            week_start: current_week,
            days_elapsed: elapsed,
            days_remaining: remaining,
            current_date: today.to_string(),
        },
        rank_level,
        rank_name,
        targets,
        users,
        team,
    })
}

/// Deterministic per-user status block, one "name: status" line per
/// user in alphabetical order.
pub fn status_lines(snapshot: &Snapshot) -> String {
    snapshot
        .users
        .iter()
        .map(|(user_id, user)| format!("{user_id}: {}", user.status().display()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Deterministic prose used when the summarizer is absent or failing.
pub fn fallback_summary(snapshot: &Snapshot) -> String {
    let active = snapshot.team.active_users;
    let behind = snapshot.team.users_behind;
    let elapsed = snapshot.week.days_elapsed;
    if behind == 0 {
        format!(
            "The team is on track: all {active} active members are meeting their weekly targets \
             with {} days remaining.",
            snapshot.week.days_remaining
        )
    } else {
        format!(
            "{elapsed} days into the week, {behind} member(s) still need to catch up on their \
             habit targets. Daily habits cannot recover missed days, so today's check-ins matter."
        )
    }
}

/// Produces the free-text paragraph of the daily digest. Failures are
/// decoration failures only; callers fall back to deterministic prose.
#[allow(async_fn_in_trait)]
pub trait Summarizer {
    async fn summarize(&self, snapshot: &Snapshot) -> Result<String>;
}

/// OpenAI-compatible chat-completions summarizer.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_chars: usize,
    temperature: f32,
}

impl OpenAiSummarizer {
    /// Build from config, reading the API key from the configured
    /// environment variable.
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            CoreError::Summarizer(format!("{} not set in environment", config.api_key_env))
        })?;
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: config.model.clone(),
            max_chars: config.max_chars,
            temperature: config.temperature,
        })
    }

    fn user_prompt(&self, snapshot: &Snapshot) -> Result<String> {
        Ok(format!(
            "Analyze this team's habit tracking data:\n\n\
             WEEK: Day {}/7, {} days remaining\n\
             RANK: {} ({})\n\
             CHALLENGES: {}\n\
             TEAM: {}/{} active\n\n\
             DETAILED ANALYSIS:\n{}\n\n\
             Provide a very concise 3-sentence maximum analysis covering overall team \
             performance and trends. Don't provide a final supportive sentence, and don't \
             reference the team's rank.\n\n\
             IMPORTANT: Be very concise with a STRICT character limit of {}!",
            snapshot.week.days_elapsed,
            snapshot.week.days_remaining,
            snapshot.rank_level,
            snapshot.rank_name,
            serde_json::to_string(&snapshot.targets)?,
            snapshot.team.active_users,
            snapshot.team.total_users,
            serde_json::to_string_pretty(&snapshot.users)?,
            self.max_chars,
        ))
    }
}

impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, snapshot: &Snapshot) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are an assistant for a team habit tracking bot. Analyze \
                                the team data and provide a very concise summary covering team \
                                performance, trends and insights. Be honest about challenges."
                },
                { "role": "user", "content": self.user_prompt(snapshot)? }
            ],
            "max_tokens": 500,
            "temperature": self.temperature,
        });

        let resp = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(CoreError::Summarizer(format!(
                "chat completion failed (HTTP {status}): {text}"
            )));
        }

        let parsed: serde_json::Value = resp.json().await?;
        let content = parsed["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| CoreError::Summarizer("response had no message content".to_string()))?
            .trim()
            .to_string();
        Ok(truncate_chars(&content, self.max_chars))
    }
}

// Truncate at a char boundary, not a byte boundary.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut = max_chars.saturating_sub(3);
    format!("{}...", text.chars().take(cut).collect::<String>())
}

/// The rendered daily digest.
#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub week_start: String,
    pub days_elapsed: u32,
    pub days_remaining: u32,
    pub rank_level: u32,
    pub rank_name: String,
    pub status_block: String,
    pub summary: String,
    pub ai_generated: bool,
}

/// Build the daily digest, decorating with AI prose when a summarizer
/// is supplied and succeeds.
pub async fn build_digest<S: Summarizer>(
    store: &Store,
    today: NaiveDate,
    summarizer: Option<&S>,
) -> Result<Digest> {
    let snapshot = gather_snapshot(store, today)?;
    let status_block = status_lines(&snapshot);

    let (summary, ai_generated) = match summarizer {
        Some(s) => match s.summarize(&snapshot).await {
            Ok(text) => (text, true),
            Err(e) => {
                tracing::warn!("summarizer failed, using deterministic fallback: {e}");
                (fallback_summary(&snapshot), false)
            }
        },
        None => (fallback_summary(&snapshot), false),
    };

    Ok(Digest {
        week_start: snapshot.week.week_start.clone(),
        days_elapsed: snapshot.week.days_elapsed,
        days_remaining: snapshot.week.days_remaining,
        rank_level: snapshot.rank_level,
        rank_name: snapshot.rank_name.clone(),
        status_block,
        summary,
        ai_generated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkin::record_check_ins;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    struct FailingSummarizer;

    impl Summarizer for FailingSummarizer {
        async fn summarize(&self, _snapshot: &Snapshot) -> Result<String> {
            Err(CoreError::Summarizer("boom".to_string()))
        }
    }

    struct CannedSummarizer;

    impl Summarizer for CannedSummarizer {
        async fn summarize(&self, _snapshot: &Snapshot) -> Result<String> {
            Ok("Great week so far.".to_string())
        }
    }

    // Rank 3 scenario from the challenge ladder: meditation (default 7),
    // exercise (4 days), reading (default 7).
    fn seed_rank3(store: &Store) {
        store.save_rank(3).unwrap();
        let monday = date(2025, 4, 28);
        for (day, habit) in [
            (0, "meditation"),
            (1, "meditation"),
            (2, "meditation"),
            (0, "exercise"),
            (2, "exercise"),
        ] {
            record_check_ins(
                store,
                "u1",
                &tokens(&[habit]),
                monday + chrono::Duration::days(day),
            )
            .unwrap();
        }
    }

    #[test]
    fn test_snapshot_rank3_scenario() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        seed_rank3(&store);
        // Wednesday: 3 days elapsed
        let snapshot = gather_snapshot(&store, date(2025, 4, 30)).unwrap();

        assert_eq!(snapshot.rank_level, 3);
        assert_eq!(snapshot.week.days_elapsed, 3);
        let u1 = &snapshot.users["u1"];
        // exercise logged Mon/Wed so far this snapshot date
        assert_eq!(u1.habits["exercise"].completed, 2);
        assert_eq!(u1.habits["exercise"].target, 4);
        assert_eq!(u1.habits["exercise"].risk, Risk::Low);
        // meditation every day so far: up to date
        assert_eq!(u1.habits["meditation"].completed, 3);
        assert_eq!(u1.habits["meditation"].target, 7);
        assert_eq!(u1.habits["meditation"].risk, Risk::None);
        // reading untouched, 3 days elapsed: already behind
        assert_eq!(u1.habits["reading"].completed, 0);
        assert_eq!(u1.habits["reading"].risk, Risk::High);
        assert_eq!(u1.status(), UserStatus::Behind);
    }

    #[test]
    fn test_status_lines_sorted_and_deterministic() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        store.save_rank(1).unwrap();
        let monday = date(2025, 4, 28);
        for user in ["zoe", "adam"] {
            record_check_ins(&store, user, &tokens(&["meditation"]), monday).unwrap();
        }
        let snapshot = gather_snapshot(&store, monday).unwrap();
        let lines = status_lines(&snapshot);
        let rendered: Vec<&str> = lines.lines().collect();
        assert_eq!(rendered.len(), 2);
        assert!(rendered[0].starts_with("adam:"));
        assert!(rendered[1].starts_with("zoe:"));
    }

    #[test]
    fn test_fallback_summary_mentions_behind_count() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        seed_rank3(&store);
        let snapshot = gather_snapshot(&store, date(2025, 4, 30)).unwrap();
        assert_eq!(snapshot.team.users_behind, 1);
        let text = fallback_summary(&snapshot);
        assert!(text.contains("1 member(s)"));
    }

    #[tokio::test]
    async fn test_digest_without_summarizer() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        seed_rank3(&store);
        let digest = build_digest::<CannedSummarizer>(&store, date(2025, 4, 30), None)
            .await
            .unwrap();
        assert!(!digest.ai_generated);
        assert!(!digest.summary.is_empty());
        assert!(digest.status_block.contains("u1:"));
    }

    #[tokio::test]
    async fn test_digest_survives_summarizer_failure() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        seed_rank3(&store);
        let digest = build_digest(&store, date(2025, 4, 30), Some(&FailingSummarizer))
            .await
            .unwrap();
        assert!(!digest.ai_generated);
        assert!(!digest.summary.is_empty());
    }

    #[tokio::test]
    async fn test_digest_uses_summarizer_when_it_works() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        seed_rank3(&store);
        let digest = build_digest(&store, date(2025, 4, 30), Some(&CannedSummarizer))
            .await
            .unwrap();
        assert!(digest.ai_generated);
        assert_eq!(digest.summary, "Great week so far.");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        let long = "a".repeat(20);
        let cut = truncate_chars(&long, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with("..."));
    }
}
