// ── Command catalog ──
//
// Per operation kind, the catalog supplies everything the coordinator
// needs: the endpoint, the retry class, the optional optimistic
// projector, and the dependent keys to invalidate on success.

pub mod drone;
pub mod rbac;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dronedeck_api::Method;

use crate::model::CacheKey;

// ── OperationKind ───────────────────────────────────────────────────

/// Name of a mutation operation ("takeoff", "assign_role", ...).
///
/// Cheap to clone and hash; used as the catalog lookup key and carried
/// through pending operations and errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationKind(Arc<str>);

impl OperationKind {
    pub fn new(kind: impl AsRef<str>) -> Self {
        Self(Arc::from(kind.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OperationKind {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ── PathTemplate ────────────────────────────────────────────────────

/// Endpoint path with `{id}` / `{collection}` placeholders rendered
/// from the target cache key.
#[derive(Debug, Clone)]
pub struct PathTemplate(String);

impl PathTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn render(&self, key: &CacheKey) -> String {
        self.0
            .replace("{id}", &key.id.to_string())
            .replace("{collection}", key.collection.as_str())
    }
}

// ── CommandSpec ─────────────────────────────────────────────────────

/// Pure function predicting the post-mutation value from the current
/// value and the requested change. Must be side-effect-free: it is
/// called speculatively, before the server has seen the request.
pub type Projector<T, R> = Arc<dyn Fn(&T, &R) -> T + Send + Sync>;

/// How a settled mutation reconciles the cache with the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reconcile {
    /// Write the server's authoritative response value.
    #[default]
    Replace,
    /// Mark the entry stale and let the next reader refetch.
    Invalidate,
}

/// Everything the coordinator needs to run one operation kind.
#[derive(Clone)]
pub struct CommandSpec<T, R> {
    pub method: Method,
    pub endpoint: PathTemplate,
    /// Idempotent kinds may be retried on transient failure;
    /// non-idempotent kinds (creates, relative moves) never are.
    pub idempotent: bool,
    pub reconcile: Reconcile,
    /// Absent for kinds with no safe prediction — the coordinator then
    /// skips the optimistic write and goes straight to the server.
    pub projector: Option<Projector<T, R>>,
    /// Invalidated after a successful settle (e.g. aggregate stats).
    pub dependent_keys: Vec<CacheKey>,
}

impl<T, R> CommandSpec<T, R> {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: PathTemplate::new(endpoint),
            idempotent: false,
            reconcile: Reconcile::Replace,
            projector: None,
            dependent_keys: Vec::new(),
        }
    }

    pub fn idempotent(mut self) -> Self {
        self.idempotent = true;
        self
    }

    pub fn reconcile(mut self, mode: Reconcile) -> Self {
        self.reconcile = mode;
        self
    }

    pub fn project(mut self, projector: Projector<T, R>) -> Self {
        self.projector = Some(projector);
        self
    }

    pub fn invalidates(mut self, key: CacheKey) -> Self {
        self.dependent_keys.push(key);
        self
    }
}

// ── CommandCatalog ──────────────────────────────────────────────────

/// Lookup table from operation kind to [`CommandSpec`].
pub struct CommandCatalog<T, R> {
    specs: HashMap<OperationKind, CommandSpec<T, R>>,
}

impl<T, R> CommandCatalog<T, R> {
    pub fn new() -> Self {
        Self {
            specs: HashMap::new(),
        }
    }

    pub fn with(mut self, kind: impl Into<OperationKind>, spec: CommandSpec<T, R>) -> Self {
        self.specs.insert(kind.into(), spec);
        self
    }

    pub fn get(&self, kind: &OperationKind) -> Option<&CommandSpec<T, R>> {
        self.specs.get(kind)
    }

    pub fn kinds(&self) -> Vec<OperationKind> {
        self.specs.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl<T, R> Default for CommandCatalog<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for OperationKind {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
