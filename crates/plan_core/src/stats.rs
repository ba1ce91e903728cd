use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::record::{ProjectRecord, ProjectStatus, TaskRecord, TaskStatus, TimeEntry};

/// Count per status; every status is present, absent ones as zero.
pub fn count_by_status<'a, I>(records: I) -> BTreeMap<TaskStatus, usize>
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    let mut counts: BTreeMap<TaskStatus, usize> =
        TaskStatus::ALL.iter().map(|status| (*status, 0)).collect();
    for record in records {
        *counts.entry(record.status).or_default() += 1;
    }
    counts
}

/// Due strictly before `today` and not completed. A task due today is not overdue.
pub fn is_overdue(record: &TaskRecord, today: NaiveDate) -> bool {
    match record.due_date {
        Some(due) => due < today && !record.is_completed(),
        None => false,
    }
}

pub fn overdue_count<'a, I>(records: I, today: NaiveDate) -> usize
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    records
        .into_iter()
        .filter(|record| is_overdue(record, today))
        .count()
}

/// Whole percentage of completed records, 0 for an empty set.
pub fn completion_rate<'a, I>(records: I) -> u8
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    let (total, completed) = records
        .into_iter()
        .fold((0usize, 0usize), |(total, completed), record| {
            (total + 1, completed + usize::from(record.is_completed()))
        });
    percentage(completed, total)
}

fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u8
}

/// Started but not finished: anything other than `todo` and `completed`.
/// Content drafts fold onto `todo`, so they are not counted here.
pub fn in_progress_count<'a, I>(records: I) -> usize
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    records
        .into_iter()
        .filter(|record| matches!(record.status, TaskStatus::InProgress | TaskStatus::Review))
        .count()
}

/// Logged minutes in hours. Entries without a duration count as zero.
pub fn total_hours<'a, I>(entries: I) -> f64
where
    I: IntoIterator<Item = &'a TimeEntry>,
{
    let minutes: u64 = entries
        .into_iter()
        .map(|entry| u64::from(entry.duration_minutes.unwrap_or(0)))
        .sum();
    minutes as f64 / 60.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,
    pub overdue_tasks: usize,
    pub total_projects: usize,
    pub active_projects: usize,
    pub completed_projects: usize,
    pub team_members: usize,
    pub hours_logged: f64,
    pub completion_rate: u8,
}

impl DashboardStats {
    pub fn compute(
        tasks: &[TaskRecord],
        projects: &[ProjectRecord],
        entries: &[TimeEntry],
        today: NaiveDate,
    ) -> Self {
        let counts = count_by_status(tasks);
        let members: BTreeSet<&str> = projects
            .iter()
            .flat_map(|project| project.team_members.iter().map(String::as_str))
            .collect();
        let projects_in = |status: ProjectStatus| {
            projects
                .iter()
                .filter(|project| project.status == status)
                .count()
        };

        Self {
            total_tasks: tasks.len(),
            completed_tasks: counts[&TaskStatus::Completed],
            in_progress_tasks: in_progress_count(tasks),
            overdue_tasks: overdue_count(tasks, today),
            total_projects: projects.len(),
            active_projects: projects_in(ProjectStatus::Active),
            completed_projects: projects_in(ProjectStatus::Completed),
            team_members: members.len(),
            hours_logged: total_hours(entries),
            completion_rate: completion_rate(tasks),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetailStats {
    pub tasks_by_status: BTreeMap<TaskStatus, usize>,
    pub completion_rate: u8,
    pub total_hours: f64,
    pub planned_hours: f64,
    /// Logged against planned hours, capped at 100. Less than one planned
    /// hour counts as one.
    pub time_progress: u8,
}

impl ProjectDetailStats {
    pub fn compute(tasks: &[TaskRecord], entries: &[TimeEntry]) -> Self {
        let spent = total_hours(entries);
        let planned: f64 = tasks
            .iter()
            .filter_map(|task| task.estimated_hours)
            .filter(|hours| hours.is_finite())
            .sum();
        let time_progress = (spent / planned.max(1.0) * 100.0).min(100.0).round() as u8;
        Self {
            tasks_by_status: count_by_status(tasks),
            completion_rate: completion_rate(tasks),
            total_hours: spent,
            planned_hours: planned,
            time_progress,
        }
    }
}
