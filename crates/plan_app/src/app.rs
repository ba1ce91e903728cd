use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate, Weekday};
use plan_core::notifications::{Notification, NotificationSink};
use plan_core::{FilterConfiguration, MonthCursor, PlannerService};
use tracing::{debug, info, warn};

use crate::render;
use crate::snapshot::Snapshot;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub(crate) data: Option<PathBuf>,
    pub(crate) month: Option<MonthCursor>,
    pub(crate) week_start: Weekday,
    pub(crate) deadline_warning_days: u32,
    pub(crate) show_completed: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_lookup(|key| std::env::var(key).ok()))
    }

    /// Reads every `PLANBOARD_*` setting through `lookup`. Invalid values
    /// are logged and the default kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = lookup("PLANBOARD_DATA") {
            let path = PathBuf::from(path.trim());
            info!(path = %path.display(), "using snapshot");
            config.data = Some(path);
        }
        if let Some(month) = lookup("PLANBOARD_MONTH") {
            match MonthCursor::parse(&month) {
                Some(cursor) => config.month = Some(cursor),
                None => warn!(value = %month, "PLANBOARD_MONTH must look like YYYY-MM"),
            }
        }
        if let Some(start) = lookup("PLANBOARD_WEEK_START") {
            match start.trim().to_ascii_lowercase().as_str() {
                "sunday" | "sun" => config.week_start = Weekday::Sun,
                "monday" | "mon" => config.week_start = Weekday::Mon,
                other => warn!(value = other, "PLANBOARD_WEEK_START must be sunday or monday"),
            }
        }
        if let Some(warning) = lookup("PLANBOARD_DEADLINE_WARNING_DAYS") {
            match warning.trim().parse::<u32>() {
                Ok(value) => config.deadline_warning_days = value,
                Err(err) => warn!(value = %warning, %err, "ignoring PLANBOARD_DEADLINE_WARNING_DAYS"),
            }
        }
        if let Some(flag) = lookup("PLANBOARD_SHOW_COMPLETED") {
            match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.show_completed = true,
                "0" | "false" | "no" | "off" => config.show_completed = false,
                other => warn!(value = other, "ignoring PLANBOARD_SHOW_COMPLETED"),
            }
        }
        config
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: None,
            month: None,
            week_start: Weekday::Sun,
            deadline_warning_days: 3,
            show_completed: true,
        }
    }
}

/// Forwards scheduled notifications to the log.
struct LogSink;

impl NotificationSink for LogSink {
    fn schedule(&self, notification: Notification) {
        info!(
            user = %notification.user_id,
            kind = ?notification.kind,
            at = %notification.scheduled_for,
            "{}: {}",
            notification.title,
            notification.message
        );
    }
}

/// Loads the configured snapshot and renders the dashboard, month grid,
/// project list and deadline alerts as of `today`.
pub fn report(config: &AppConfig, today: NaiveDate) -> Result<String> {
    let start = Instant::now();
    let path = config
        .data
        .as_ref()
        .ok_or_else(|| anyhow!("PLANBOARD_DATA is not set; point it at a snapshot file"))?;
    let session = Snapshot::load(path)?.into_session();
    let service = PlannerService::builder(session)
        .week_start(config.week_start)
        .deadline_warning_days(config.deadline_warning_days)
        .with_notification_sink(Box::new(LogSink))
        .build();
    let cursor = config
        .month
        .unwrap_or_else(|| MonthCursor::containing(today));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("failed to start async runtime")?;

    runtime
        .block_on(service.load_dashboard())
        .context("failed to load dashboard")?;
    let mut out = render::render_dashboard(&service.dashboard(today));

    runtime
        .block_on(service.load_month(cursor))
        .with_context(|| format!("failed to load {cursor}"))?;
    let filter = FilterConfiguration::default().with_show_completed(config.show_completed);
    out.push('\n');
    out.push_str(&service.with_month_view(cursor, &filter, |view| {
        render::render_month(view, today)
    }));

    runtime
        .block_on(service.load_projects())
        .context("failed to load projects")?;
    out.push('\n');
    out.push_str(&render::render_projects(&service.project_list()));

    out.push('\n');
    out.push_str(&render::render_alerts(&service.deadline_alerts(today)));
    debug!(elapsed_ms = %start.elapsed().as_millis(), "rendered report");
    Ok(out)
}

pub fn run(config: AppConfig) -> Result<()> {
    info!("starting planboard");
    let today = Local::now().date_naive();
    let text = report(&config, today)?;
    print!("{text}");
    Ok(())
}
