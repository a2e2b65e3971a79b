//! Reminder planning
//!
//! Decides which items deserve a reminder and what it says. Delivery is left
//! to the caller; this module only produces [`Reminder`] values and the
//! updated [`NotificationState`].

use crate::models::{ComputedStatus, NotificationState, StatusType};
use avtrack_common::{pluralize, DEEP_LINK_SCHEME, NOTIFICATION_PREFIX};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Days between weekly digests
pub const DIGEST_INTERVAL_DAYS: i64 = 7;

/// A planned local notification for one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// Stable identifier; replaces any earlier reminder with the same id
    pub id: String,
    pub item_id: String,
    pub title: String,
    pub body: String,
    pub deep_link: String,
}

impl Reminder {
    /// Reminder for a due-soon or overdue item; good items get none
    #[must_use]
    pub fn for_status(status: &ComputedStatus) -> Option<Self> {
        let item = &status.item;
        let (suffix, title, body) = match status.status {
            StatusType::Good => return None,
            StatusType::DueSoon => ("due_soon", "Due soon", due_soon_body(status)),
            StatusType::Overdue => ("overdue", "Overdue", format!("{} is overdue", item.name)),
        };

        Some(Self {
            id: reminder_id(&item.id, suffix),
            item_id: item.id.clone(),
            title: title.to_string(),
            body,
            deep_link: deep_link(&item.id),
        })
    }
}

fn reminder_id(item_id: &str, suffix: &str) -> String {
    format!("{NOTIFICATION_PREFIX}{item_id}_{suffix}")
}

/// Link that opens an item's detail view
#[must_use]
pub fn deep_link(item_id: &str) -> String {
    format!("{DEEP_LINK_SCHEME}://maintenance/{item_id}")
}

fn due_soon_body(status: &ComputedStatus) -> String {
    let name = &status.item.name;
    if let Some(hours) = status.hours_remaining.filter(|hours| *hours >= 0.0) {
        return format!("{name} due in {}h", hours.round() as i64);
    }
    if let Some(days) = status.days_remaining.filter(|days| *days >= 0) {
        return format!("{name} due in {days} {}", pluralize(days, "day"));
    }
    format!("{name} is due")
}

/// Items whose status escalated since the last notification
///
/// Entering overdue always counts. Entering due soon counts only from good or
/// from an item never notified before, so recovering from overdue is silent.
#[must_use]
pub fn status_changes<'a>(
    current: &'a [ComputedStatus],
    previous: &NotificationState,
) -> Vec<&'a ComputedStatus> {
    current
        .iter()
        .filter(|status| {
            let before = previous.last_notified_status.get(&status.item.id).copied();
            match status.status {
                StatusType::Overdue => before != Some(StatusType::Overdue),
                StatusType::DueSoon => matches!(before, None | Some(StatusType::Good)),
                StatusType::Good => false,
            }
        })
        .collect()
}

impl NotificationState {
    /// Remember each status by item id, leaving other entries untouched
    pub fn record(&mut self, statuses: &[ComputedStatus]) {
        for status in statuses {
            self.last_notified_status
                .insert(status.item.id.clone(), status.status);
        }
    }

    /// Fresh state from the given statuses, stamped as the latest digest
    #[must_use]
    pub fn from_statuses(statuses: &[ComputedStatus], now: DateTime<Utc>) -> Self {
        let mut state = Self {
            last_weekly_digest: Some(now.to_rfc3339()),
            ..Self::default()
        };
        state.record(statuses);
        state
    }

    /// Whether a weekly digest should go out at `now`
    ///
    /// True when no digest was sent yet or the stored timestamp is unreadable.
    #[must_use]
    pub fn digest_due(&self, now: DateTime<Utc>) -> bool {
        let Some(raw) = self.last_weekly_digest.as_deref() else {
            return true;
        };
        match DateTime::parse_from_rfc3339(raw) {
            Ok(last) => now.signed_duration_since(last) >= Duration::days(DIGEST_INTERVAL_DAYS),
            Err(e) => {
                warn!("Ignoring stored digest timestamp '{}': {}", raw, e);
                true
            }
        }
    }
}

/// Reminders for escalated items plus the state to persist afterwards
///
/// With notifications disabled nothing is planned and `previous` is returned
/// unchanged.
#[must_use]
pub fn plan_transitions(
    statuses: &[ComputedStatus],
    previous: &NotificationState,
    enabled: bool,
) -> (Vec<Reminder>, NotificationState) {
    if !enabled {
        debug!("Notifications disabled; skipping transition planning");
        return (Vec::new(), previous.clone());
    }

    let reminders: Vec<Reminder> = status_changes(statuses, previous)
        .into_iter()
        .filter_map(Reminder::for_status)
        .collect();

    let mut next = previous.clone();
    next.record(statuses);

    debug!(
        "Planned {} reminder(s) from {} statuses",
        reminders.len(),
        statuses.len()
    );
    (reminders, next)
}

/// Full reminder set replacing everything previously scheduled
#[must_use]
pub fn plan_refresh(statuses: &[ComputedStatus], enabled: bool) -> Vec<Reminder> {
    if !enabled {
        return Vec::new();
    }
    statuses.iter().filter_map(Reminder::for_status).collect()
}

/// Weekly summary notification for one aircraft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyDigest {
    pub title: String,
    pub body: String,
}

impl WeeklyDigest {
    #[must_use]
    pub fn build(statuses: &[ComputedStatus], tail: &str) -> Self {
        let count = |wanted: StatusType| statuses.iter().filter(|s| s.status == wanted).count();
        let overdue = count(StatusType::Overdue);
        let due_soon = count(StatusType::DueSoon);

        let body = if overdue == 0 && due_soon == 0 {
            "All maintenance items are current. Great job!".to_string()
        } else {
            let mut body = String::new();
            if overdue > 0 {
                body.push_str(&format!("{overdue} overdue. "));
            }
            if due_soon > 0 {
                body.push_str(&format!("{due_soon} due soon."));
            }
            body.trim().to_string()
        };

        Self {
            title: format!("Weekly Summary: {tail}"),
            body,
        }
    }
}
