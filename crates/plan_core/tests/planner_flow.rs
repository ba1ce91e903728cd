use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use plan_core::backend::RecordStore;
use plan_core::filter::CalendarSelection;
use plan_core::forms::{EventDraft, PhaseDraft, ProjectDraft, ProjectPatch, TaskDraft};
use plan_core::memory::{InMemoryStore, StaticAuth};
use plan_core::record::{CalendarType, PhaseStatus, Progress, ProjectStatus, Role, TaskStatus, User};
use plan_core::{
    Collection, FilterConfiguration, MonthCursor, PlannerError, PlannerService, Query, Result,
    Session,
};
use serde_json::{json, Value};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn ana() -> User {
    User {
        id: "u1".into(),
        email: "ana@example.com".into(),
        display_name: Some("Ana".into()),
        role: Role::Manager,
    }
}

fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store.seed(
        Collection::Tasks,
        [
            json!({"id": "t1", "title": "Plan shoot", "createdBy": "u1", "dueDate": "2024-06-05",
                   "status": "todo", "calendarType": "team", "visibility": "private",
                   "createdAt": "2024-05-01T09:00:00Z"}),
            json!({"id": "t2", "title": "Publish recap", "createdBy": "u1", "dueDate": "2024-06-05",
                   "status": "completed", "calendarType": "personal", "visibility": "private",
                   "createdAt": "2024-05-02T09:00:00Z"}),
            json!({"id": "t3", "title": "Team offsite", "createdBy": "u2", "dueDate": "2024-06-18",
                   "status": "in_progress", "calendarType": "shared", "visibility": "team"}),
            json!({"id": "t4", "title": "Someone else's draft", "createdBy": "u2",
                   "dueDate": "2024-06-07", "visibility": "private"}),
            json!({"id": "t5", "title": "July kickoff", "createdBy": "u1", "dueDate": "2024-07-01",
                   "visibility": "team"}),
            json!({"id": "t6", "title": "Broken date", "createdBy": "u1", "dueDate": "06/09/2024",
                   "visibility": "team", "projectId": "p1"}),
        ],
    );
    store.seed(
        Collection::ContentTasks,
        [json!({"id": "c1", "title": "Launch article", "createdBy": "u1", "status": "in_review",
                "contentType": "article", "dueDate": "2024-06-21"})],
    );
    store.seed(
        Collection::Projects,
        [json!({"id": "p1", "name": "Summer campaign", "ownerId": "u1", "createdBy": "u1",
                "status": "active", "teamMembers": ["u1", "u2"], "progress": 40,
                "createdAt": "2024-05-01T09:00:00Z"})],
    );
    store.seed(
        Collection::TimeEntries,
        [
            json!({"id": "e1", "taskId": "t6", "userId": "u1", "startTime": "2024-06-03T09:00:00Z",
                   "durationMinutes": 90}),
            json!({"id": "e2", "taskId": "t1", "userId": "u1", "startTime": "2024-06-04T09:00:00Z",
                   "durationMinutes": 30}),
        ],
    );
    store.seed(
        Collection::Users,
        [
            json!({"id": "u1", "email": "ana@example.com", "displayName": "Ana", "role": "manager"}),
            json!({"id": "u2", "email": "ben@example.com", "role": "editor"}),
            json!({"id": "u3", "email": "cleo@example.com"}),
        ],
    );
    store
}

fn service(store: Arc<InMemoryStore>) -> PlannerService {
    let session = Session::new(Arc::new(StaticAuth::signed_in(ana())), store);
    PlannerService::builder(session)
        .week_start(Weekday::Sun)
        .build()
}

#[tokio::test]
async fn month_load_filters_and_buckets() {
    let store = seeded_store();
    let service = service(store.clone());
    let june = MonthCursor::new(2024, 6).expect("june");

    let loaded = service.load_month(june).await.expect("load month");
    // t1, t2 (mine), t3 (team), c1 (my content); not t4, t5, t6.
    assert_eq!(loaded, 4);

    let everything = FilterConfiguration::default();
    let bucket_ids = service.with_month_view(june, &everything, |view| {
        assert_eq!(view.cells.len(), 6 + 30);
        view.tasks_on(date(2024, 6, 5))
            .iter()
            .map(|task| task.id.clone())
            .collect::<Vec<_>>()
    });
    assert_eq!(bucket_ids, vec!["t1", "t2"]);

    let team_only = FilterConfiguration::default()
        .with_calendar(CalendarSelection::Only(CalendarType::Team))
        .with_show_completed(false);
    let visible: Vec<_> = service
        .filtered_tasks(&team_only)
        .into_iter()
        .map(|task| task.id)
        .collect();
    assert_eq!(visible, vec!["t1", "c1"]);

    let adapted = service
        .tasks()
        .into_iter()
        .find(|task| task.id == "c1")
        .expect("content task adapted into the month");
    assert_eq!(adapted.status, TaskStatus::Review);
}

#[tokio::test]
async fn backend_failure_keeps_the_stale_cache() {
    let store = seeded_store();
    let service = service(store.clone());
    let june = MonthCursor::new(2024, 6).expect("june");
    service.load_month(june).await.expect("first load");
    let before = service.tasks();

    store.set_offline(true);
    let err = service
        .load_month(june.next())
        .await
        .expect_err("offline store should fail");
    assert!(matches!(err, PlannerError::BackendUnavailable(_)));
    assert_eq!(service.tasks(), before);

    let err = service
        .create_task(TaskDraft::new("Draft copy"))
        .await
        .expect_err("create while offline");
    assert!(err.is_backend());
    assert_eq!(service.tasks().len(), before.len());
}

#[tokio::test]
async fn dashboard_rolls_up_recent_records() {
    let service = service(seeded_store());
    service.load_dashboard().await.expect("load dashboard");

    let stats = service.dashboard(date(2024, 6, 10));
    // Created by u1: t1, t2, t5, t6 (unparsable due date reads as none) and
    // the content task c1, which is in review.
    assert_eq!(stats.total_tasks, 5);
    assert_eq!(stats.completed_tasks, 1);
    assert_eq!(stats.in_progress_tasks, 1);
    assert_eq!(stats.overdue_tasks, 1);
    assert_eq!(stats.completion_rate, 20);
    assert_eq!(stats.total_projects, 1);
    assert_eq!(stats.active_projects, 1);
    assert_eq!(stats.team_members, 2);
    assert_eq!(stats.hours_logged, 2.0);
}

#[tokio::test]
async fn dashboard_counts_content_tasks() {
    let store = Arc::new(InMemoryStore::new());
    store.seed(
        Collection::ContentTasks,
        [
            json!({"id": "c1", "title": "Launch post", "createdBy": "u1", "status": "published",
                   "dueDate": "2024-06-01", "createdAt": "2024-05-20T09:00:00Z"}),
            json!({"id": "c2", "title": "Teaser reel", "createdBy": "u1", "status": "draft",
                   "contentType": "video", "dueDate": "2024-06-01",
                   "createdAt": "2024-05-21T09:00:00Z"}),
            json!({"id": "c3", "title": "Not mine", "createdBy": "u2", "dueDate": "2024-06-01"}),
        ],
    );
    let service = service(store);
    service.load_dashboard().await.expect("load dashboard");

    let stats = service.dashboard(date(2024, 6, 10));
    assert_eq!(stats.total_tasks, 2);
    assert_eq!(stats.completed_tasks, 1);
    assert_eq!(stats.overdue_tasks, 1);
    assert_eq!(stats.completion_rate, 50);
    let ids: Vec<_> = service.tasks().into_iter().map(|task| task.id).collect();
    assert_eq!(ids, vec!["c2", "c1"]);
}

#[tokio::test]
async fn null_fields_do_not_drop_records() {
    let store = Arc::new(InMemoryStore::new());
    store.seed(
        Collection::Tasks,
        [json!({"id": "t1", "title": "Caption copy", "createdBy": "u1", "dueDate": "2024-06-12",
                "status": null, "priority": null, "calendarType": null, "visibility": null,
                "isAllDay": null, "actualHours": null, "storyPoints": null,
                "createdAt": "2024-06-01T09:00:00Z"})],
    );
    store.seed(
        Collection::Projects,
        [json!({"id": "p1", "name": "Rebrand", "ownerId": "u1", "createdBy": "u1",
                "progress": null, "status": null, "teamMembers": null})],
    );
    let service = service(store);

    let loaded = service
        .load_month(MonthCursor::new(2024, 6).expect("june"))
        .await
        .expect("load month");
    assert_eq!(loaded, 1);
    assert_eq!(service.tasks()[0].status, TaskStatus::Todo);

    service.load_dashboard().await.expect("load dashboard");
    let stats = service.dashboard(date(2024, 6, 10));
    assert_eq!(stats.total_tasks, 1);
    assert_eq!(stats.total_projects, 1);
    assert_eq!(stats.active_projects, 1);
    assert_eq!(service.projects()[0].progress.percent(), 0);
}

#[tokio::test]
async fn project_list_includes_shared_projects() {
    let store = Arc::new(InMemoryStore::new());
    store.seed(
        Collection::Projects,
        (1..=6).map(|n| {
            json!({"id": format!("own{n}"), "name": format!("Own {n}"), "ownerId": "u1",
                   "createdBy": "u1", "teamMembers": ["u1"],
                   "createdAt": format!("2024-05-0{n}T09:00:00Z"),
                   "updatedAt": format!("2024-05-0{n}T09:00:00Z")})
        }),
    );
    store.seed(
        Collection::Projects,
        [
            json!({"id": "shared", "name": "Partner launch", "ownerId": "u2", "createdBy": "u2",
                   "teamMembers": ["u2", "u1"], "updatedAt": "2024-06-01T09:00:00Z"}),
            json!({"id": "other", "name": "Partner audit", "ownerId": "u2", "createdBy": "u2",
                   "teamMembers": ["u2", "u3"]}),
        ],
    );
    let service = service(store);

    assert_eq!(service.load_projects().await.expect("load projects"), 7);
    let list = service.project_list();
    assert_eq!(list[0].id, "shared");
    assert_eq!(list[1].id, "own6");

    service.load_dashboard().await.expect("load dashboard");
    assert_eq!(service.projects().len(), 5);
    assert_eq!(service.project_list().len(), 7);

    let found: Vec<_> = service
        .projects_matching("partner", None)
        .into_iter()
        .map(|project| project.id)
        .collect();
    assert_eq!(found, vec!["shared"]);
}

#[tokio::test]
async fn signed_out_sessions_cannot_load() {
    let session = Session::new(Arc::new(StaticAuth::signed_out()), seeded_store());
    let service = PlannerService::builder(session).build();
    let err = service
        .load_month(MonthCursor::new(2024, 6).expect("june"))
        .await
        .expect_err("no user");
    assert!(matches!(err, PlannerError::Unauthenticated));
}

#[tokio::test]
async fn creating_records_applies_defaults() {
    let store = seeded_store();
    let service = service(store.clone());

    let mut draft = EventDraft::new("Client call", date(2024, 6, 12));
    draft.is_all_day = true;
    let event = service.create_event(draft).await.expect("create event");
    assert!(event.is_event);
    assert!(!event.id.is_empty());

    let project = service
        .create_project(ProjectDraft::new("Autumn rebrand"))
        .await
        .expect("create project");
    assert_eq!(project.owner_id, "u1");
    assert_eq!(store.len(Collection::ProjectMembers), 1);
    assert_eq!(service.projects_matching("rebrand", None).len(), 1);

    let err = service
        .create_project(ProjectDraft::new("  "))
        .await
        .expect_err("blank name");
    assert!(matches!(err, PlannerError::Validation { field: "name", .. }));
    assert_eq!(store.len(Collection::Projects), 2);
}

#[tokio::test]
async fn project_detail_collects_phases_tasks_and_hours() {
    let store = seeded_store();
    let service = service(store.clone());

    let first = service
        .add_phase("p1", PhaseDraft::default())
        .await
        .expect("first phase");
    let second = service
        .add_phase(
            "p1",
            PhaseDraft {
                name: "Production".into(),
                ..PhaseDraft::default()
            },
        )
        .await
        .expect("second phase");
    assert_eq!((first.order_index, second.order_index), (0, 1));

    let toggled = service.toggle_phase(&first).await.expect("toggle");
    assert_eq!(toggled.status, PhaseStatus::Completed);

    let detail = service.project_detail("p1").await.expect("detail");
    assert_eq!(detail.project.name, "Summer campaign");
    let names: Vec<_> = detail.phases.iter().map(|phase| phase.name.as_str()).collect();
    assert_eq!(names, vec!["New phase", "Production"]);
    assert_eq!(detail.phases[0].status, PhaseStatus::Completed);
    assert_eq!(detail.tasks.len(), 1);
    assert_eq!(detail.tasks[0].due_date, None);
    assert_eq!(detail.stats.total_hours, 1.5);

    let missing = service.project_detail("nope").await.expect_err("unknown project");
    assert!(matches!(missing, PlannerError::NotFound { .. }));
}

#[tokio::test]
async fn project_detail_lists_members_and_planned_hours() {
    let store = seeded_store();
    store.seed(
        Collection::Tasks,
        [
            json!({"id": "t7", "title": "Cut trailer", "createdBy": "u2", "projectId": "p1",
                   "visibility": "private", "estimatedHours": 2,
                   "createdAt": "2024-05-20T09:00:00Z"}),
            json!({"id": "t8", "title": "Book studio", "createdBy": "u1", "projectId": "p1",
                   "visibility": "private", "estimatedHours": 4, "status": "completed",
                   "createdAt": "2024-05-22T09:00:00Z"}),
        ],
    );
    let service = service(store);

    let detail = service.project_detail("p1").await.expect("detail");
    let members: Vec<_> = detail.members.iter().map(|user| user.name()).collect();
    assert_eq!(members, vec!["Ana", "ben@example.com"]);
    let tasks: Vec<_> = detail.tasks.iter().map(|task| task.id.as_str()).collect();
    assert_eq!(tasks, vec!["t8", "t7", "t6"]);
    assert_eq!(detail.stats.planned_hours, 6.0);
    assert_eq!(detail.stats.total_hours, 1.5);
    assert_eq!(detail.stats.time_progress, 25);
    assert_eq!(detail.stats.completion_rate, 33);
}

#[tokio::test]
async fn project_edits_reach_the_backend_and_the_cache() {
    let store = seeded_store();
    let service = service(store.clone());
    service.load_dashboard().await.expect("load dashboard");
    service.load_projects().await.expect("load projects");

    service
        .update_project(
            "p1",
            ProjectPatch {
                name: Some(" Summer launch ".into()),
                progress: Some(Progress::new(75)),
                ..ProjectPatch::default()
            },
        )
        .await
        .expect("update project");
    service
        .set_project_status("p1", ProjectStatus::OnHold)
        .await
        .expect("hold project");

    let stored = store
        .list(Collection::Projects, &Query::all())
        .await
        .expect("list projects");
    assert_eq!(stored[0]["name"], "Summer launch");
    assert_eq!(stored[0]["progress"], 75);
    assert_eq!(stored[0]["status"], "on_hold");
    assert!(stored[0]["updatedAt"].is_string());

    for project in service.projects().into_iter().chain(service.project_list()) {
        assert_eq!(project.name, "Summer launch");
        assert_eq!(project.progress.percent(), 75);
        assert_eq!(project.status, ProjectStatus::OnHold);
        assert!(project.updated_at.is_some());
    }

    let err = service
        .update_project(
            "p1",
            ProjectPatch {
                name: Some("   ".into()),
                ..ProjectPatch::default()
            },
        )
        .await
        .expect_err("blank name");
    assert!(matches!(err, PlannerError::Validation { field: "name", .. }));
}

/// Accepts everything except new project memberships.
struct MembershipsRejected(InMemoryStore);

#[async_trait]
impl RecordStore for MembershipsRejected {
    async fn list(&self, collection: Collection, query: &Query) -> Result<Vec<Value>> {
        self.0.list(collection, query).await
    }

    async fn create(&self, collection: Collection, record: Value) -> Result<Value> {
        if collection == Collection::ProjectMembers {
            return Err(PlannerError::backend("projectMembers refused the write"));
        }
        self.0.create(collection, record).await
    }

    async fn update(&self, collection: Collection, id: &str, patch: Value) -> Result<()> {
        self.0.update(collection, id, patch).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.0.delete(collection, id).await
    }
}

#[tokio::test]
async fn failed_membership_removes_the_new_project() {
    let store = Arc::new(MembershipsRejected(InMemoryStore::new()));
    let session = Session::new(Arc::new(StaticAuth::signed_in(ana())), store.clone());
    let service = PlannerService::builder(session).build();

    let err = service
        .create_project(ProjectDraft::new("Autumn rebrand"))
        .await
        .expect_err("membership write fails");
    assert!(err.is_backend());
    assert!(store.0.is_empty(Collection::Projects));
    assert!(store.0.is_empty(Collection::ProjectMembers));
    assert!(service.projects().is_empty());
    assert!(service.project_list().is_empty());
}

#[tokio::test]
async fn status_changes_and_deletes_patch_the_cache() {
    let store = seeded_store();
    let service = service(store.clone());
    service
        .load_month(MonthCursor::new(2024, 6).expect("june"))
        .await
        .expect("load");

    service
        .set_task_status("t1", TaskStatus::Completed)
        .await
        .expect("complete t1");
    assert!(service
        .tasks()
        .iter()
        .any(|task| task.id == "t1" && task.is_completed()));

    service.delete_task("t3").await.expect("delete t3");
    assert!(service.tasks().iter().all(|task| task.id != "t3"));
    assert_eq!(store.len(Collection::Tasks), 5);

    let err = service
        .set_task_status("gone", TaskStatus::Todo)
        .await
        .expect_err("unknown task");
    assert!(matches!(err, PlannerError::NotFound { .. }));
}
