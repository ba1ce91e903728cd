use std::fmt::Write;

use chrono::{NaiveDate, Weekday};
use plan_core::calendar::weekday_headers;
use plan_core::notifications::Notification;
use plan_core::record::{ProjectRecord, TaskRecord};
use plan_core::stats::is_overdue;
use plan_core::{DashboardStats, GridCell, MonthView, RelativeDay};

const CELL_WIDTH: usize = 7;

fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

fn day_heading(date: NaiveDate, today: NaiveDate) -> String {
    format!(
        "{} ({})",
        date.format("%A, %B %d"),
        RelativeDay::between(today, date)
    )
}

fn describe_task(task: &TaskRecord, today: NaiveDate) -> String {
    let mut line = format!(
        "[{}] {} ({}, {})",
        task.calendar_type.label(),
        task.title,
        task.status.label(),
        task.priority.label()
    );
    if let Some((start, end)) = task.time_window() {
        let _ = write!(line, " {}", start.format("%H:%M"));
        if let Some(end) = end {
            let _ = write!(line, "-{}", end.format("%H:%M"));
        }
    } else if task.is_all_day {
        line.push_str(" all day");
    }
    if is_overdue(task, today) {
        line.push_str(" OVERDUE");
    }
    line
}

/// Month grid followed by the tasks of each busy day and the undated ones.
pub fn render_month(view: &MonthView<'_>, today: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.cursor.title());
    for day in weekday_headers(view.week_start) {
        let _ = write!(out, "{:<width$}", weekday_abbrev(day), width = CELL_WIDTH);
    }
    out.push('\n');

    for week in view.weeks() {
        for cell in week {
            let text = match cell {
                GridCell::Blank => String::new(),
                GridCell::Day(date) => match view.tasks_on(*date).len() {
                    0 => date.format("%e").to_string(),
                    n => format!("{}+{}", date.format("%e"), n),
                },
            };
            let _ = write!(out, "{:<width$}", text, width = CELL_WIDTH);
        }
        let trimmed = out.trim_end_matches(' ').len();
        out.truncate(trimmed);
        out.push('\n');
    }

    for (date, tasks) in &view.buckets {
        if tasks.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{}", day_heading(*date, today));
        for task in tasks {
            let _ = writeln!(out, "  {}", describe_task(task, today));
        }
    }

    if !view.undated.is_empty() {
        let _ = writeln!(out, "\nNo due date");
        for task in &view.undated {
            let _ = writeln!(out, "  {}", describe_task(task, today));
        }
    }
    out
}

pub fn render_dashboard(stats: &DashboardStats) -> String {
    let mut out = String::from("Dashboard\n");
    let rows = [
        ("Tasks", stats.total_tasks.to_string()),
        ("Completed", stats.completed_tasks.to_string()),
        ("In progress", stats.in_progress_tasks.to_string()),
        ("Overdue", stats.overdue_tasks.to_string()),
        ("Completion", format!("{}%", stats.completion_rate)),
        (
            "Projects",
            format!(
                "{} ({} active, {} completed)",
                stats.total_projects, stats.active_projects, stats.completed_projects
            ),
        ),
        ("Team members", stats.team_members.to_string()),
        ("Hours logged", format!("{:.1}", stats.hours_logged)),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "  {label:<14}{value}");
    }
    out
}

pub fn render_projects(projects: &[ProjectRecord]) -> String {
    if projects.is_empty() {
        return "No projects\n".to_string();
    }
    let mut out = String::from("Projects\n");
    for project in projects {
        let _ = write!(
            out,
            "  {} [{}] {}%",
            project.name,
            project.status.label(),
            project.progress.percent()
        );
        if let Some(end) = project.end_date {
            let _ = write!(out, " until {end}");
        }
        out.push('\n');
    }
    out
}

pub fn render_alerts(alerts: &[Notification]) -> String {
    if alerts.is_empty() {
        return "No upcoming deadlines\n".to_string();
    }
    let mut out = String::from("Upcoming deadlines\n");
    for alert in alerts {
        let _ = writeln!(out, "  {}: {}", alert.title, alert.message);
    }
    out
}
