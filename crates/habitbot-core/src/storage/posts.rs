//! Reaction-post message-id index (`checkin_posts.json`).
//!
//! Maps each local date to the ids of the daily check-in messages
//! posted for it, so reactions on older posts can backfill the right
//! day.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::storage::Store;

/// Date ISO string -> message ids posted for that day.
pub type PostIndex = BTreeMap<String, Vec<u64>>;

const POSTS_FILE: &str = "checkin_posts.json";

impl Store {
    pub fn load_posts(&self) -> Result<PostIndex> {
        self.load_json(POSTS_FILE)
    }

    /// Remember a posted message id under its date.
    pub fn record_post(&self, date_iso: &str, message_id: u64) -> Result<()> {
        self.update(POSTS_FILE, |posts: &mut PostIndex| {
            posts.entry(date_iso.to_string()).or_default().push(message_id);
            Ok(())
        })
    }

    /// The date a message id was posted for, if it is one of ours.
    pub fn post_date(&self, message_id: u64) -> Result<Option<String>> {
        let posts = self.load_posts()?;
        Ok(posts
            .iter()
            .find(|(_, ids)| ids.contains(&message_id))
            .map(|(date, _)| date.clone()))
    }
}
