//! In-process backend used by tests and the `planboard` binary.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::backend::{
    require_object, AuthCallback, AuthProvider, AuthState, Collection, Condition, Direction,
    Query, RecordStore, Subscription,
};
use crate::error::{PlannerError, Result};
use crate::record::User;

#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
    offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, collection: Collection, records: impl IntoIterator<Item = Value>) {
        self.collections
            .write()
            .entry(collection)
            .or_default()
            .extend(records);
    }

    pub fn seed_typed<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<()> {
        let values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.seed(collection, values);
        Ok(())
    }

    /// While offline every call fails with [`PlannerError::BackendUnavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::SeqCst);
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .get(&collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }

    fn ensure_online(&self, collection: Collection) -> Result<()> {
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(PlannerError::backend(format!("{collection} is unreachable")));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn list(&self, collection: Collection, query: &Query) -> Result<Vec<Value>> {
        self.ensure_online(collection)?;
        let collections = self.collections.read();
        let mut rows: Vec<Value> = collections
            .get(&collection)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        query
                            .condition
                            .as_ref()
                            .map_or(true, |condition| matches(condition, row))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(collections);

        if let Some(order) = &query.order_by {
            rows.sort_by(|a, b| {
                let ordering = compare_field(a.get(&order.field), b.get(&order.field));
                match order.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn create(&self, collection: Collection, mut record: Value) -> Result<Value> {
        self.ensure_online(collection)?;
        require_object(&record)?;
        if let Some(fields) = record.as_object_mut() {
            let has_id = fields
                .get("id")
                .and_then(Value::as_str)
                .map_or(false, |id| !id.is_empty());
            if !has_id {
                fields.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
            }
        }
        self.collections
            .write()
            .entry(collection)
            .or_default()
            .push(record.clone());
        tracing::debug!(%collection, id = ?record.get("id"), "created record");
        Ok(record)
    }

    async fn update(&self, collection: Collection, id: &str, patch: Value) -> Result<()> {
        self.ensure_online(collection)?;
        let patch = require_object(&patch)?;
        let mut collections = self.collections.write();
        let row = collections
            .get_mut(&collection)
            .and_then(|rows| rows.iter_mut().find(|row| record_id(row) == Some(id)))
            .ok_or_else(|| PlannerError::NotFound {
                collection,
                id: id.to_string(),
            })?;
        if let Some(fields) = row.as_object_mut() {
            for (key, value) in patch {
                fields.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.ensure_online(collection)?;
        let mut collections = self.collections.write();
        let rows = collections.entry(collection).or_default();
        let before = rows.len();
        rows.retain(|row| record_id(row) != Some(id));
        if rows.len() == before {
            return Err(PlannerError::NotFound {
                collection,
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

fn record_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

fn matches(condition: &Condition, row: &Value) -> bool {
    match condition {
        Condition::Eq { field, value } => row.get(field) == Some(value),
        Condition::In { field, values } => row
            .get(field)
            .map_or(false, |actual| values.contains(actual)),
        Condition::Contains { field, value } => row
            .get(field)
            .and_then(Value::as_array)
            .map_or(false, |items| items.contains(value)),
        Condition::Range { field, gte, lte } => {
            let Some(actual) = row.get(field).filter(|value| !value.is_null()) else {
                return false;
            };
            let above = gte.as_ref().map_or(true, |bound| {
                matches!(compare(actual, bound), Some(Ordering::Greater | Ordering::Equal))
            });
            let below = lte.as_ref().map_or(true, |bound| {
                matches!(compare(actual, bound), Some(Ordering::Less | Ordering::Equal))
            });
            above && below
        }
        Condition::And(parts) => parts.iter().all(|part| matches(part, row)),
        Condition::Or(parts) => parts.iter().any(|part| matches(part, row)),
    }
}

/// Values of different kinds do not compare.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Missing and null values sort first.
fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|value| !value.is_null());
    let b = b.filter(|value| !value.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare(a, b).unwrap_or(Ordering::Equal),
    }
}

type Listener = Arc<dyn Fn(&AuthState) + Send + Sync>;

/// Auth provider with a fixed user that can be swapped at runtime.
pub struct StaticAuth {
    user: RwLock<Option<User>>,
    listeners: Arc<Mutex<Vec<(u64, Listener)>>>,
    next_listener: AtomicU64,
}

impl StaticAuth {
    pub fn signed_in(user: User) -> Self {
        Self::with_user(Some(user))
    }

    pub fn signed_out() -> Self {
        Self::with_user(None)
    }

    fn with_user(user: Option<User>) -> Self {
        Self {
            user: RwLock::new(user),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener: AtomicU64::new(0),
        }
    }

    pub fn sign_in(&self, user: User) {
        *self.user.write() = Some(user);
        self.broadcast();
    }

    pub fn sign_out(&self) {
        *self.user.write() = None;
        self.broadcast();
    }

    fn state(&self) -> AuthState {
        AuthState {
            user: self.user.read().clone(),
            is_loading: false,
        }
    }

    fn broadcast(&self) {
        let state = self.state();
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&state);
        }
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn current_user(&self) -> Result<User> {
        self.user.read().clone().ok_or(PlannerError::Unauthenticated)
    }

    fn on_auth_state_changed(&self, callback: AuthCallback) -> Subscription {
        let listener: Listener = Arc::from(callback);
        let id = self.next_listener.fetch_add(1, AtomicOrdering::SeqCst);
        self.listeners.lock().push((id, listener.clone()));
        listener(&self.state());

        let listeners = Arc::clone(&self.listeners);
        Subscription::new(move || {
            listeners.lock().retain(|(candidate, _)| *candidate != id);
        })
    }
}
