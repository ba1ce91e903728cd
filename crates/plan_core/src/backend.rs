//! Boundary with the managed backend: authentication, record storage and the
//! query language used to list records.
//!
//! Records cross this boundary as JSON objects with camelCase field names.
//! [`Session`] bundles both handles and decodes records into the typed model.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PlannerError, Result};
use crate::record::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Tasks,
    ContentTasks,
    Projects,
    ProjectPhases,
    ProjectMembers,
    TimeEntries,
    Users,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Tasks => "tasks",
            Collection::ContentTasks => "contentTasks",
            Collection::Projects => "projects",
            Collection::ProjectPhases => "projectPhases",
            Collection::ProjectMembers => "projectMembers",
            Collection::TimeEntries => "timeEntries",
            Collection::Users => "users",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Eq {
        field: String,
        value: Value,
    },
    In {
        field: String,
        values: Vec<Value>,
    },
    /// The array stored under `field` holds `value`.
    Contains {
        field: String,
        value: Value,
    },
    /// Inclusive bounds; a missing bound is open.
    Range {
        field: String,
        gte: Option<Value>,
        lte: Option<Value>,
    },
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

impl Condition {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn one_of<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Condition::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn between(field: impl Into<String>, gte: impl Into<Value>, lte: impl Into<Value>) -> Self {
        Condition::Range {
            field: field.into(),
            gte: Some(gte.into()),
            lte: Some(lte.into()),
        }
    }

    pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::And(conditions.into_iter().collect())
    }

    pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Or(conditions.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub condition: Option<Condition>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(condition: Condition) -> Self {
        Self {
            condition: Some(condition),
            ..Self::default()
        }
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list(&self, collection: Collection, query: &Query) -> Result<Vec<Value>>;
    async fn create(&self, collection: Collection, record: Value) -> Result<Value>;
    async fn update(&self, collection: Collection, id: &str, patch: Value) -> Result<()>;
    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_loading: bool,
}

pub type AuthCallback = Box<dyn Fn(&AuthState) + Send + Sync>;

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Fails with [`PlannerError::Unauthenticated`] when nobody is signed in.
    async fn current_user(&self) -> Result<User>;

    /// Delivers the current state immediately, then every change until the
    /// returned handle is dropped or unsubscribed.
    fn on_auth_state_changed(&self, callback: AuthCallback) -> Subscription;
}

/// Handle returned by [`AuthProvider::on_auth_state_changed`].
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Explicit backend context threaded into every query.
#[derive(Clone)]
pub struct Session {
    auth: Arc<dyn AuthProvider>,
    store: Arc<dyn RecordStore>,
}

impl Session {
    pub fn new(auth: Arc<dyn AuthProvider>, store: Arc<dyn RecordStore>) -> Self {
        Self { auth, store }
    }

    pub fn auth(&self) -> &dyn AuthProvider {
        self.auth.as_ref()
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub async fn current_user(&self) -> Result<User> {
        self.auth.current_user().await
    }

    /// Lists and decodes records. Records that fail to decode are skipped so
    /// one bad row cannot blank a whole view.
    pub async fn list<T: DeserializeOwned>(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<T>> {
        let raw = self.store.list(collection, query).await?;
        let total = raw.len();
        let decoded: Vec<T> = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<T>(value) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!(%collection, %err, "skipping undecodable record");
                    None
                }
            })
            .collect();
        tracing::debug!(%collection, total, decoded = decoded.len(), "listed records");
        Ok(decoded)
    }

    pub async fn create<T>(&self, collection: Collection, record: &T) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let payload = serde_json::to_value(record)?;
        let created = self.store.create(collection, payload).await?;
        Ok(serde_json::from_value(created)?)
    }

    pub async fn update(&self, collection: Collection, id: &str, patch: Value) -> Result<()> {
        self.store.update(collection, id, patch).await
    }

    pub async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.store.delete(collection, id).await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

pub(crate) fn require_object(record: &Value) -> Result<&serde_json::Map<String, Value>> {
    record
        .as_object()
        .ok_or_else(|| PlannerError::backend("records must be JSON objects"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn dropping_subscription_cancels_once() {
        let cancelled = Arc::new(AtomicUsize::new(0));
        let counter = cancelled.clone();
        let subscription = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        drop(subscription);
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);

        let counter = cancelled.clone();
        Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unsubscribe();
        assert_eq!(cancelled.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn query_builder_composes_conditions() {
        let query = Query::filter(Condition::and([
            Condition::or([
                Condition::eq("assignedTo", "u1"),
                Condition::eq("visibility", "public"),
            ]),
            Condition::between("dueDate", "2024-06-01", "2024-06-30"),
        ]))
        .order_by("dueDate", Direction::Asc)
        .limit(10);

        assert_eq!(query.limit, Some(10));
        assert_eq!(
            query.order_by,
            Some(OrderBy {
                field: "dueDate".into(),
                direction: Direction::Asc
            })
        );
        let Some(Condition::And(parts)) = &query.condition else {
            panic!("expected AND at the root");
        };
        assert_eq!(parts.len(), 2);
        assert!(matches!(&parts[0], Condition::Or(alternatives) if alternatives.len() == 2));
    }

    #[test]
    fn collections_use_backend_names() {
        assert_eq!(Collection::ProjectPhases.to_string(), "projectPhases");
        assert_eq!(Collection::Tasks.as_str(), "tasks");
    }
}
