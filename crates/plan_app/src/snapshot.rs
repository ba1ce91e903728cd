//! JSON snapshot of a backend: the signed-in user plus raw records per
//! collection, in the backend's camelCase shape.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use plan_core::memory::{InMemoryStore, StaticAuth};
use plan_core::record::User;
use plan_core::{Collection, Session};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub user: User,
    #[serde(default)]
    pub tasks: Vec<Value>,
    #[serde(default)]
    pub content_tasks: Vec<Value>,
    #[serde(default)]
    pub projects: Vec<Value>,
    #[serde(default)]
    pub project_phases: Vec<Value>,
    #[serde(default)]
    pub project_members: Vec<Value>,
    #[serde(default)]
    pub time_entries: Vec<Value>,
    #[serde(default)]
    pub users: Vec<Value>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))
    }

    /// Seeds an in-memory backend and signs the snapshot user in.
    pub fn into_session(self) -> Session {
        let store = InMemoryStore::new();
        for (collection, records) in [
            (Collection::Tasks, self.tasks),
            (Collection::ContentTasks, self.content_tasks),
            (Collection::Projects, self.projects),
            (Collection::ProjectPhases, self.project_phases),
            (Collection::ProjectMembers, self.project_members),
            (Collection::TimeEntries, self.time_entries),
            (Collection::Users, self.users),
        ] {
            tracing::debug!(%collection, count = records.len(), "seeding collection");
            store.seed(collection, records);
        }
        Session::new(Arc::new(StaticAuth::signed_in(self.user)), Arc::new(store))
    }
}
