use std::time::Instant;

use chrono::{NaiveDate, Utc, Weekday};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::backend::{Collection, Condition, Direction, Query, Session};
use crate::calendar::{MonthCursor, MonthView};
use crate::error::{PlannerError, Result};
use crate::filter::{self, FilterConfiguration};
use crate::forms::{self, EventDraft, PhaseDraft, ProjectDraft, ProjectPatch, TaskDraft};
use crate::notifications::{self, Notification, NotificationSink};
use crate::record::{
    order_phases, ContentTask, ProjectPhase, ProjectRecord, ProjectStatus, TaskRecord,
    TaskStatus, TimeEntry, User,
};
use crate::stats::{DashboardStats, ProjectDetailStats};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Records from the last successful load. Failed loads leave it untouched.
#[derive(Debug, Clone, Default)]
struct Cache {
    tasks: Vec<TaskRecord>,
    /// Recent projects behind the dashboard figures.
    projects: Vec<ProjectRecord>,
    /// Every project the user owns or belongs to.
    project_list: Vec<ProjectRecord>,
    time_entries: Vec<TimeEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub project: ProjectRecord,
    pub members: Vec<User>,
    pub phases: Vec<ProjectPhase>,
    pub tasks: Vec<TaskRecord>,
    pub time_entries: Vec<TimeEntry>,
    pub stats: ProjectDetailStats,
}

pub struct PlannerService {
    session: Session,
    week_start: Weekday,
    deadline_warning_days: u32,
    recent_task_limit: usize,
    recent_project_limit: usize,
    cache: RwLock<Cache>,
    notification_sink: Option<Box<dyn NotificationSink>>,
}

pub struct PlannerServiceBuilder {
    session: Session,
    week_start: Weekday,
    deadline_warning_days: u32,
    recent_task_limit: usize,
    recent_project_limit: usize,
    notification_sink: Option<Box<dyn NotificationSink>>,
}

impl PlannerServiceBuilder {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            week_start: Weekday::Sun,
            deadline_warning_days: 3,
            recent_task_limit: 10,
            recent_project_limit: 5,
            notification_sink: None,
        }
    }

    pub fn week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn deadline_warning_days(mut self, days: u32) -> Self {
        self.deadline_warning_days = days;
        self
    }

    pub fn dashboard_limits(mut self, tasks: usize, projects: usize) -> Self {
        self.recent_task_limit = tasks;
        self.recent_project_limit = projects;
        self
    }

    pub fn with_notification_sink(mut self, sink: Box<dyn NotificationSink>) -> Self {
        self.notification_sink = Some(sink);
        self
    }

    pub fn build(self) -> PlannerService {
        PlannerService {
            session: self.session,
            week_start: self.week_start,
            deadline_warning_days: self.deadline_warning_days,
            recent_task_limit: self.recent_task_limit,
            recent_project_limit: self.recent_project_limit,
            cache: RwLock::new(Cache::default()),
            notification_sink: self.notification_sink,
        }
    }
}

impl PlannerService {
    pub fn builder(session: Session) -> PlannerServiceBuilder {
        PlannerServiceBuilder::new(session)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn tasks(&self) -> Vec<TaskRecord> {
        self.cache.read().tasks.clone()
    }

    pub fn projects(&self) -> Vec<ProjectRecord> {
        self.cache.read().projects.clone()
    }

    pub fn project_list(&self) -> Vec<ProjectRecord> {
        self.cache.read().project_list.clone()
    }

    pub fn time_entries(&self) -> Vec<TimeEntry> {
        self.cache.read().time_entries.clone()
    }

    /// Tasks the user can see that fall due in `cursor`'s month, plus their
    /// content tasks for the same days. Replaces the cached tasks.
    pub async fn load_month(&self, cursor: MonthCursor) -> Result<usize> {
        let start = Instant::now();
        let user = self.session.current_user().await?;
        let (first, last) = cursor.date_range();
        let in_month = || {
            Condition::between(
                "dueDate",
                first.format(DATE_FORMAT).to_string(),
                last.format(DATE_FORMAT).to_string(),
            )
        };
        let visible_to_me = Condition::or([
            Condition::eq("assignedTo", user.id.as_str()),
            Condition::eq("createdBy", user.id.as_str()),
            Condition::eq("visibility", "team"),
            Condition::eq("visibility", "public"),
        ]);
        let task_query = Query::filter(Condition::and([visible_to_me, in_month()]))
            .order_by("dueDate", Direction::Asc);
        let content_query = Query::filter(Condition::and([
            Condition::eq("createdBy", user.id.as_str()),
            in_month(),
        ]))
        .order_by("dueDate", Direction::Asc);

        let mut tasks: Vec<TaskRecord> = self.fetch(Collection::Tasks, &task_query).await?;
        let content: Vec<ContentTask> = self.fetch(Collection::ContentTasks, &content_query).await?;
        tasks.extend(content.into_iter().map(TaskRecord::from));
        tasks.sort_by_key(|task| task.due_date);

        let count = tasks.len();
        self.cache.write().tasks = tasks;
        tracing::info!(
            month = %cursor,
            count,
            elapsed_ms = %start.elapsed().as_millis(),
            "loaded month"
        );
        Ok(count)
    }

    /// Recent tasks, content tasks and projects created by the user, and all
    /// their time entries. Replaces the cached tasks, projects and time
    /// entries only when every query succeeds.
    pub async fn load_dashboard(&self) -> Result<()> {
        let start = Instant::now();
        let user = self.session.current_user().await?;
        let recent = |limit: usize| {
            Query::filter(Condition::eq("createdBy", user.id.as_str()))
                .order_by("createdAt", Direction::Desc)
                .limit(limit)
        };

        let mut tasks: Vec<TaskRecord> = self
            .fetch(Collection::Tasks, &recent(self.recent_task_limit))
            .await?;
        let content: Vec<ContentTask> = self
            .fetch(Collection::ContentTasks, &recent(self.recent_task_limit))
            .await?;
        let content_count = content.len();
        tasks.extend(content.into_iter().map(TaskRecord::from));
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let projects: Vec<ProjectRecord> = self
            .fetch(Collection::Projects, &recent(self.recent_project_limit))
            .await?;
        let time_entries: Vec<TimeEntry> = self
            .fetch(
                Collection::TimeEntries,
                &Query::filter(Condition::eq("userId", user.id.as_str()))
                    .order_by("startTime", Direction::Desc),
            )
            .await?;

        tracing::info!(
            tasks = tasks.len(),
            content = content_count,
            projects = projects.len(),
            time_entries = time_entries.len(),
            elapsed_ms = %start.elapsed().as_millis(),
            "loaded dashboard"
        );
        let mut cache = self.cache.write();
        cache.tasks = tasks;
        cache.projects = projects;
        cache.time_entries = time_entries;
        Ok(())
    }

    /// Every project the user owns or is a team member of, most recently
    /// updated first. Replaces the cached project list.
    pub async fn load_projects(&self) -> Result<usize> {
        let start = Instant::now();
        let user = self.session.current_user().await?;
        let query = Query::filter(Condition::or([
            Condition::eq("ownerId", user.id.as_str()),
            Condition::contains("teamMembers", user.id.as_str()),
        ]))
        .order_by("updatedAt", Direction::Desc);

        let projects: Vec<ProjectRecord> = self.fetch(Collection::Projects, &query).await?;
        let count = projects.len();
        self.cache.write().project_list = projects;
        tracing::info!(count, elapsed_ms = %start.elapsed().as_millis(), "loaded projects");
        Ok(count)
    }

    /// Builds the month view over the cached tasks and hands it to `render`.
    pub fn with_month_view<R>(
        &self,
        cursor: MonthCursor,
        config: &FilterConfiguration,
        render: impl FnOnce(&MonthView<'_>) -> R,
    ) -> R {
        let cache = self.cache.read();
        let view = MonthView::build(&cache.tasks, cursor, config, self.week_start);
        render(&view)
    }

    pub fn filtered_tasks(&self, config: &FilterConfiguration) -> Vec<TaskRecord> {
        let cache = self.cache.read();
        filter::filter(&cache.tasks, config)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn dashboard(&self, today: NaiveDate) -> DashboardStats {
        let cache = self.cache.read();
        DashboardStats::compute(&cache.tasks, &cache.projects, &cache.time_entries, today)
    }

    /// Searches the list from [`PlannerService::load_projects`].
    pub fn projects_matching(
        &self,
        search: &str,
        status: Option<ProjectStatus>,
    ) -> Vec<ProjectRecord> {
        let cache = self.cache.read();
        filter::filter_projects(&cache.project_list, search, status)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn create_task(&self, draft: TaskDraft) -> Result<TaskRecord> {
        draft.validate()?;
        let user = self.session.current_user().await?;
        let record = draft.into_record(&user, Utc::now())?;
        let created = self.store(Collection::Tasks, &record).await?;
        tracing::info!(id = %created.id, title = %created.title, "created task");
        self.cache.write().tasks.push(created.clone());
        Ok(created)
    }

    pub async fn create_event(&self, draft: EventDraft) -> Result<TaskRecord> {
        draft.validate()?;
        let user = self.session.current_user().await?;
        let record = draft.into_record(&user, Utc::now())?;
        let created = self.store(Collection::Tasks, &record).await?;
        tracing::info!(id = %created.id, title = %created.title, "created event");
        self.cache.write().tasks.push(created.clone());
        Ok(created)
    }

    /// Creates the project and the owner's membership row. When the
    /// membership cannot be stored the project is deleted again.
    pub async fn create_project(&self, draft: ProjectDraft) -> Result<ProjectRecord> {
        draft.validate()?;
        let user = self.session.current_user().await?;
        let now = Utc::now();
        let record = draft.into_record(&user, now)?;
        let created = self.store(Collection::Projects, &record).await?;
        if let Err(err) = self
            .store(
                Collection::ProjectMembers,
                &forms::owner_membership(&created, now),
            )
            .await
        {
            let cleanup = self.session.delete(Collection::Projects, &created.id).await;
            if let Err(cleanup) = cleanup {
                tracing::error!(
                    id = %created.id,
                    %cleanup,
                    "left a project without an owner membership"
                );
            }
            return Err(err);
        }
        tracing::info!(id = %created.id, name = %created.name, "created project");
        let mut cache = self.cache.write();
        cache.projects.push(created.clone());
        cache.project_list.insert(0, created.clone());
        Ok(created)
    }

    pub async fn set_task_status(&self, id: &str, status: TaskStatus) -> Result<()> {
        let now = Utc::now();
        self.patch(
            Collection::Tasks,
            id,
            json!({ "status": status, "updatedAt": now }),
        )
        .await?;

        let completed = {
            let mut cache = self.cache.write();
            cache
                .tasks
                .iter_mut()
                .find(|task| task.id == id)
                .and_then(|task| {
                    let was_completed = task.is_completed();
                    task.status = status;
                    task.updated_at = Some(now);
                    (status.is_terminal() && !was_completed).then(|| task.clone())
                })
        };
        if let (Some(task), Some(sink)) = (completed, &self.notification_sink) {
            sink.schedule(notifications::task_completed(&task, now));
        }
        tracing::debug!(id, ?status, "updated task status");
        Ok(())
    }

    pub async fn delete_task(&self, id: &str) -> Result<()> {
        self.session
            .delete(Collection::Tasks, id)
            .await
            .map_err(|err| Self::log_failure(Collection::Tasks, err))?;
        self.cache.write().tasks.retain(|task| task.id != id);
        tracing::debug!(id, "deleted task");
        Ok(())
    }

    pub async fn set_project_status(&self, id: &str, status: ProjectStatus) -> Result<()> {
        self.update_project(id, ProjectPatch::status(status)).await
    }

    /// Stores the edited fields with a fresh `updatedAt` and applies them to
    /// every cached copy of the project.
    pub async fn update_project(&self, id: &str, patch: ProjectPatch) -> Result<()> {
        let patch = patch.normalize()?;
        let now = Utc::now();
        let mut wire = serde_json::to_value(&patch)?;
        if let Some(fields) = wire.as_object_mut() {
            fields.insert("updatedAt".to_string(), json!(now));
        }
        self.patch(Collection::Projects, id, wire).await?;

        let mut guard = self.cache.write();
        let cache = &mut *guard;
        for project in cache
            .projects
            .iter_mut()
            .chain(cache.project_list.iter_mut())
            .filter(|project| project.id == id)
        {
            patch.apply(project);
            project.updated_at = Some(now);
        }
        tracing::debug!(id, "updated project");
        Ok(())
    }

    pub async fn project_detail(&self, project_id: &str) -> Result<ProjectDetail> {
        let start = Instant::now();
        let by_project = || Query::filter(Condition::eq("projectId", project_id));

        let cached = {
            let cache = self.cache.read();
            cache
                .projects
                .iter()
                .chain(cache.project_list.iter())
                .find(|project| project.id == project_id)
                .cloned()
        };
        let project = match cached {
            Some(project) => project,
            None => self
                .fetch::<ProjectRecord>(
                    Collection::Projects,
                    &Query::filter(Condition::eq("id", project_id)).limit(1),
                )
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| PlannerError::NotFound {
                    collection: Collection::Projects,
                    id: project_id.to_string(),
                })?,
        };

        let mut phases: Vec<ProjectPhase> = self
            .fetch(
                Collection::ProjectPhases,
                &by_project().order_by("orderIndex", Direction::Asc),
            )
            .await?;
        order_phases(&mut phases);
        let tasks: Vec<TaskRecord> = self
            .fetch(
                Collection::Tasks,
                &by_project().order_by("createdAt", Direction::Desc),
            )
            .await?;
        let time_entries: Vec<TimeEntry> = if tasks.is_empty() {
            Vec::new()
        } else {
            let task_ids = tasks.iter().map(|task| task.id.clone());
            self.fetch(
                Collection::TimeEntries,
                &Query::filter(Condition::one_of("taskId", task_ids))
                    .order_by("startTime", Direction::Desc),
            )
            .await?
        };
        let members: Vec<User> = if project.team_members.is_empty() {
            Vec::new()
        } else {
            self.fetch(
                Collection::Users,
                &Query::filter(Condition::one_of(
                    "id",
                    project.team_members.iter().map(String::as_str),
                )),
            )
            .await?
        };

        let stats = ProjectDetailStats::compute(&tasks, &time_entries);
        tracing::info!(
            project_id,
            members = members.len(),
            phases = phases.len(),
            tasks = tasks.len(),
            elapsed_ms = %start.elapsed().as_millis(),
            "loaded project detail"
        );
        Ok(ProjectDetail {
            project,
            members,
            phases,
            tasks,
            time_entries,
            stats,
        })
    }

    pub async fn add_phase(&self, project_id: &str, draft: PhaseDraft) -> Result<ProjectPhase> {
        draft.validate()?;
        let existing: Vec<ProjectPhase> = self
            .fetch(
                Collection::ProjectPhases,
                &Query::filter(Condition::eq("projectId", project_id)),
            )
            .await?;
        let phase = draft.into_phase(project_id, existing.len())?;
        let created = self.store(Collection::ProjectPhases, &phase).await?;
        tracing::debug!(project_id, id = %created.id, order = created.order_index, "added phase");
        Ok(created)
    }

    pub async fn toggle_phase(&self, phase: &ProjectPhase) -> Result<ProjectPhase> {
        let status = phase.status.toggled();
        self.patch(
            Collection::ProjectPhases,
            &phase.id,
            json!({ "status": status }),
        )
        .await?;
        Ok(ProjectPhase {
            status,
            ..phase.clone()
        })
    }

    /// Schedules a reminder for each cached open task due within the warning
    /// window and returns them.
    pub fn deadline_alerts(&self, today: NaiveDate) -> Vec<Notification> {
        let alerts = {
            let cache = self.cache.read();
            notifications::deadline_notifications(&cache.tasks, today, self.deadline_warning_days)
        };
        if let Some(sink) = &self.notification_sink {
            for alert in &alerts {
                sink.schedule(alert.clone());
            }
        }
        tracing::debug!(count = alerts.len(), %today, "computed deadline alerts");
        alerts
    }
}

impl PlannerService {
    async fn fetch<T: DeserializeOwned>(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<T>> {
        self.session
            .list(collection, query)
            .await
            .map_err(|err| Self::log_failure(collection, err))
    }

    async fn store<T>(&self, collection: Collection, record: &T) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        self.session
            .create(collection, record)
            .await
            .map_err(|err| Self::log_failure(collection, err))
    }

    async fn patch(&self, collection: Collection, id: &str, patch: serde_json::Value) -> Result<()> {
        self.session
            .update(collection, id, patch)
            .await
            .map_err(|err| Self::log_failure(collection, err))
    }

    fn log_failure(collection: Collection, err: PlannerError) -> PlannerError {
        if err.is_backend() {
            tracing::warn!(%collection, %err, "backend call failed; keeping cached records");
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryStore, StaticAuth};
    use crate::record::{Role, User};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Collecting(Arc<Mutex<Vec<Notification>>>);

    impl NotificationSink for Collecting {
        fn schedule(&self, notification: Notification) {
            self.0.lock().push(notification);
        }
    }

    fn user() -> User {
        User {
            id: "u1".into(),
            email: "ana@example.com".into(),
            display_name: None,
            role: Role::Manager,
        }
    }

    fn service_with(store: Arc<InMemoryStore>) -> (PlannerService, Arc<Mutex<Vec<Notification>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let session = Session::new(Arc::new(StaticAuth::signed_in(user())), store);
        let service = PlannerService::builder(session)
            .deadline_warning_days(2)
            .with_notification_sink(Box::new(Collecting(seen.clone())))
            .build();
        (service, seen)
    }

    #[tokio::test]
    async fn completing_a_task_notifies_once() {
        let store = Arc::new(InMemoryStore::new());
        let (service, seen) = service_with(store.clone());
        let mut draft = TaskDraft::new("Edit video");
        draft.due_date = NaiveDate::from_ymd_opt(2024, 6, 4);
        let task = service.create_task(draft).await.unwrap();

        service
            .set_task_status(&task.id, TaskStatus::Completed)
            .await
            .unwrap();
        service
            .set_task_status(&task.id, TaskStatus::Completed)
            .await
            .unwrap();

        assert_eq!(seen.lock().len(), 1);
        assert!(service.tasks()[0].is_completed());
        assert!(service.tasks()[0].updated_at.is_some());
    }

    #[tokio::test]
    async fn validation_runs_before_the_backend() {
        let store = Arc::new(InMemoryStore::new());
        store.set_offline(true);
        let (service, _) = service_with(store);
        let err = service.create_task(TaskDraft::new(" ")).await.unwrap_err();
        assert!(matches!(err, PlannerError::Validation { .. }));
    }

    #[tokio::test]
    async fn deadline_alerts_reach_the_sink() {
        let store = Arc::new(InMemoryStore::new());
        let (service, seen) = service_with(store);
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        for (title, day) in [("soon", 11), ("later", 20)] {
            let mut draft = TaskDraft::new(title);
            draft.due_date = NaiveDate::from_ymd_opt(2024, 6, day);
            service.create_task(draft).await.unwrap();
        }

        let alerts = service.deadline_alerts(today);
        assert_eq!(alerts.len(), 1);
        assert_eq!(seen.lock().as_slice(), alerts.as_slice());
    }
}
