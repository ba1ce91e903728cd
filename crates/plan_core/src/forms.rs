//! Drafts collected by the create forms. Each draft validates before it is
//! turned into a record, so invalid input never reaches the backend.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::record::{
    split_tags, CalendarType, ContentType, PhaseStatus, Priority, ProjectMember, ProjectPhase,
    ProjectRecord, ProjectStatus, Progress, Role, TaskRecord, TaskStatus, TaskType, User,
    Visibility,
};

pub const DEFAULT_PHASE_NAME: &str = "New phase";

fn require_text(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PlannerError::Validation {
            field,
            reason: "must not be blank",
        });
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub content_type: ContentType,
    pub due_date: Option<NaiveDate>,
    pub calendar_type: CalendarType,
    pub visibility: Visibility,
    pub project_id: Option<String>,
    /// Defaults to the creator.
    pub assigned_to: Option<String>,
    /// Comma separated, as typed.
    pub tags: String,
    pub estimated_hours: Option<f64>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_text(&self.title, "title")?;
        if matches!(self.estimated_hours, Some(hours) if !(hours >= 0.0)) {
            return Err(PlannerError::Validation {
                field: "estimatedHours",
                reason: "must be zero or more",
            });
        }
        Ok(())
    }

    /// The store assigns the id on create.
    pub fn into_record(self, creator: &User, now: DateTime<Utc>) -> Result<TaskRecord> {
        self.validate()?;
        let mut task = TaskRecord::new(String::new(), self.title.trim(), creator.id.as_str());
        task.description = non_blank(self.description);
        task.status = TaskStatus::Todo;
        task.task_type = TaskType::Task;
        task.priority = self.priority;
        task.content_type = self.content_type;
        task.due_date = self.due_date;
        task.calendar_type = self.calendar_type;
        task.visibility = self.visibility;
        task.project_id = self.project_id;
        task.assigned_to = Some(self.assigned_to.unwrap_or_else(|| creator.id.clone()));
        task.tags = split_tags(&self.tags);
        task.estimated_hours = self.estimated_hours;
        task.created_at = Some(now);
        task.updated_at = Some(now);
        Ok(task)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub is_all_day: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub meeting_url: Option<String>,
    pub attendees: Option<String>,
    pub priority: Priority,
    pub calendar_type: CalendarType,
    pub visibility: Visibility,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_text(&self.title, "title")?;
        if self.date.is_none() {
            return Err(PlannerError::Validation {
                field: "date",
                reason: "an event needs a date",
            });
        }
        if !self.is_all_day {
            if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
                if end < start {
                    return Err(PlannerError::Validation {
                        field: "endTime",
                        reason: "must not precede the start time",
                    });
                }
            }
        }
        Ok(())
    }

    pub fn into_record(self, creator: &User, now: DateTime<Utc>) -> Result<TaskRecord> {
        self.validate()?;
        let mut event = TaskRecord::new(String::new(), self.title.trim(), creator.id.as_str());
        event.description = non_blank(self.description);
        event.status = TaskStatus::Todo;
        event.content_type = ContentType::Event;
        event.task_type = TaskType::Event;
        event.is_event = true;
        event.is_all_day = self.is_all_day;
        if !self.is_all_day {
            event.start_time = self.start_time;
            event.end_time = self.end_time;
        }
        event.due_date = self.date;
        event.location = non_blank(self.location);
        event.meeting_url = non_blank(self.meeting_url);
        event.attendees = non_blank(self.attendees);
        event.priority = self.priority;
        event.calendar_type = self.calendar_type;
        event.visibility = self.visibility;
        event.assigned_to = Some(creator.id.clone());
        event.created_at = Some(now);
        event.updated_at = Some(now);
        Ok(event)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectDraft {
    pub name: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_text(&self.name, "name")?;
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(PlannerError::Validation {
                    field: "endDate",
                    reason: "must not precede the start date",
                });
            }
        }
        Ok(())
    }

    /// Active, empty progress, the creator as owner and only member.
    pub fn into_record(self, creator: &User, now: DateTime<Utc>) -> Result<ProjectRecord> {
        self.validate()?;
        Ok(ProjectRecord {
            id: String::new(),
            name: self.name.trim().to_string(),
            description: non_blank(self.description),
            status: ProjectStatus::Active,
            priority: self.priority,
            start_date: self.start_date,
            end_date: self.end_date,
            progress: Progress::new(0),
            budget: self.budget,
            spent_budget: None,
            owner_id: creator.id.clone(),
            team_members: vec![creator.id.clone()],
            created_by: Some(creator.id.clone()),
            created_at: Some(now),
            updated_at: Some(now),
        })
    }
}

/// Membership row created for the owner next to a new project.
pub fn owner_membership(project: &ProjectRecord, now: DateTime<Utc>) -> ProjectMember {
    ProjectMember {
        id: String::new(),
        project_id: project.id.clone(),
        user_id: project.owner_id.clone(),
        role: Role::Owner,
        joined_at: Some(now),
    }
}

/// Edits to an existing project. Unset fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent_budget: Option<f64>,
}

impl ProjectPatch {
    pub fn status(status: ProjectStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Rejects a blank name or an end date before the start date, and trims
    /// the text fields.
    pub fn normalize(mut self) -> Result<Self> {
        if let Some(name) = &self.name {
            require_text(name, "name")?;
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(PlannerError::Validation {
                    field: "endDate",
                    reason: "must not precede the start date",
                });
            }
        }
        self.name = self.name.map(|name| name.trim().to_string());
        self.description = self.description.map(|text| text.trim().to_string());
        Ok(self)
    }

    pub fn apply(&self, project: &mut ProjectRecord) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(description) = &self.description {
            project.description = non_blank(Some(description.clone()));
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(priority) = self.priority {
            project.priority = priority;
        }
        if self.start_date.is_some() {
            project.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            project.end_date = self.end_date;
        }
        if let Some(progress) = self.progress {
            project.progress = progress;
        }
        if self.budget.is_some() {
            project.budget = self.budget;
        }
        if self.spent_budget.is_some() {
            project.spent_budget = self.spent_budget;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhaseDraft {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for PhaseDraft {
    fn default() -> Self {
        Self {
            name: DEFAULT_PHASE_NAME.to_string(),
            description: None,
            start_date: None,
            end_date: None,
        }
    }
}

impl PhaseDraft {
    pub fn validate(&self) -> Result<()> {
        require_text(&self.name, "name")
    }

    /// Planned, appended after the `existing` phases.
    pub fn into_phase(self, project_id: &str, existing: usize) -> Result<ProjectPhase> {
        self.validate()?;
        Ok(ProjectPhase {
            id: String::new(),
            project_id: project_id.to_string(),
            name: self.name.trim().to_string(),
            description: non_blank(self.description),
            start_date: self.start_date,
            end_date: self.end_date,
            status: PhaseStatus::Planned,
            order_index: u32::try_from(existing).unwrap_or(u32::MAX),
        })
    }
}
