//! Daily reminder selection and opt-in bookkeeping.

use chrono::NaiveDate;

use crate::error::Result;
use crate::storage::Store;
use crate::week::week_id;

/// Users who opted into reminders and have no check-in for `today`.
pub fn users_needing_reminder(store: &Store, today: NaiveDate) -> Result<Vec<String>> {
    let meta = store.load_meta()?;
    if meta.reminder_users.is_empty() {
        return Ok(Vec::new());
    }
    let ledger = store.load_ledger()?;
    let day_iso = today.to_string();
    let bucket = ledger.get(&week_id(today));

    Ok(meta
        .reminder_users
        .into_iter()
        .filter(|user_id| {
            let logged_today = bucket
                .and_then(|b| b.get(user_id))
                .and_then(|days| days.get(&day_iso))
                .map(|entries| !entries.is_empty())
                .unwrap_or(false);
            !logged_today
        })
        .collect())
}

/// Toggle reminder opt-in for a user. Returns the new state.
pub fn set_opt_in(store: &Store, user_id: &str, enabled: bool) -> Result<bool> {
    store.update_meta(|meta| {
        meta.reminder_users.retain(|u| u != user_id);
        if enabled {
            meta.reminder_users.push(user_id.to_string());
        }
        Ok(enabled)
    })
}

/// Users currently opted into reminders.
pub fn opted_in(store: &Store) -> Result<Vec<String>> {
    Ok(store.load_meta()?.reminder_users)
}
