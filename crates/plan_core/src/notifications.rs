use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::RelativeDay;
use crate::record::TaskRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    TaskAssigned,
    TaskCompleted,
    ProjectUpdated,
    CommentAdded,
    DeadlineApproaching,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub related_id: Option<String>,
    pub scheduled_for: DateTime<Utc>,
}

/// Delivery adapters (desktop, push, log) implement this trait.
pub trait NotificationSink: Send + Sync {
    fn schedule(&self, notification: Notification);
}

fn reminder_at(date: NaiveDate) -> DateTime<Utc> {
    let morning = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&date.and_time(morning))
}

fn recipient(task: &TaskRecord) -> String {
    task.assigned_to
        .clone()
        .unwrap_or_else(|| task.created_by.clone())
}

/// Open tasks due between `today` and `today + warning_days`, inclusive.
pub fn deadline_notifications<'a, I>(
    tasks: I,
    today: NaiveDate,
    warning_days: u32,
) -> Vec<Notification>
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    tasks
        .into_iter()
        .filter(|task| !task.is_completed())
        .filter_map(|task| {
            let message = match RelativeDay::between(today, task.due_date?) {
                RelativeDay::DaysAgo(_) => return None,
                RelativeDay::DaysAhead(days) if days > warning_days => return None,
                when => format!("Due {when}"),
            };
            Some(Notification {
                user_id: recipient(task),
                kind: NotificationKind::DeadlineApproaching,
                title: format!("Deadline: {}", task.title),
                message,
                related_id: Some(task.id.clone()),
                scheduled_for: reminder_at(today),
            })
        })
        .collect()
}

/// Sent to the creator when someone completes their task.
pub fn task_completed(task: &TaskRecord, at: DateTime<Utc>) -> Notification {
    Notification {
        user_id: task.created_by.clone(),
        kind: NotificationKind::TaskCompleted,
        title: format!("Completed: {}", task.title),
        message: match &task.due_date {
            Some(due) => format!("Finished (due {due})"),
            None => "Finished".to_string(),
        },
        related_id: Some(task.id.clone()),
        scheduled_for: at,
    }
}
