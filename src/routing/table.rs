//! Route table: declaration, compilation and lookup.
//!
//! # Responsibilities
//! - Hold route records in declaration order
//! - Reject invalid tables at startup (empty, duplicate, malformed)
//! - Resolve a target path to the first matching record
//!
//! # Design Decisions
//! - Immutable after construction
//! - O(n) scan in declaration order (acceptable for typical route counts)
//! - Query and fragment are stripped before matching

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::config::{ConfigurationError, ValidationError};
use crate::routing::matcher::PathPattern;

/// Error returned by a component factory.
pub type FactoryError = Box<dyn std::error::Error + Send + Sync>;

type FactoryFn<C> = dyn Fn() -> BoxFuture<'static, Result<C, FactoryError>> + Send + Sync;

/// Deferred construction of a view component.
///
/// The factory is only invoked when its route becomes active.
pub struct ComponentFactory<C> {
    make: Arc<FactoryFn<C>>,
}

impl<C: 'static> ComponentFactory<C> {
    /// Wrap an async constructor.
    pub fn new<F, Fut>(make: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<C, FactoryError>> + Send + 'static,
    {
        Self {
            make: Arc::new(move || make().boxed()),
        }
    }

    /// Wrap a synchronous, infallible constructor.
    pub fn from_fn<F>(make: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: Send,
    {
        Self::new(move || {
            let component = make();
            async move { Ok(component) }
        })
    }

    /// Build the component.
    pub async fn load(&self) -> Result<C, FactoryError> {
        (self.make)().await
    }
}

impl<C> Clone for ComponentFactory<C> {
    fn clone(&self) -> Self {
        Self {
            make: Arc::clone(&self.make),
        }
    }
}

impl<C> fmt::Debug for ComponentFactory<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ComponentFactory(..)")
    }
}

/// Declarative mapping from a path pattern to a named component factory.
#[derive(Debug, Clone)]
pub struct RouteRecord<C> {
    pub path: String,
    pub name: String,
    pub component: ComponentFactory<C>,
}

impl<C> RouteRecord<C> {
    pub fn new(path: impl Into<String>, name: impl Into<String>, component: ComponentFactory<C>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            component,
        }
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Name of the matched record.
    pub name: String,
    /// Pattern of the matched record, as declared.
    pub pattern: String,
    /// The concrete path that was matched (no query or fragment).
    pub path: String,
    /// Values captured by `:name` segments.
    pub params: BTreeMap<String, String>,
    /// Decoded query string. The last value wins for repeated keys.
    pub query: BTreeMap<String, String>,
}

#[derive(Debug)]
struct CompiledRoute<C> {
    record: RouteRecord<C>,
    pattern: PathPattern,
}

/// Ordered set of route records. First match wins.
#[derive(Debug)]
pub struct RouteTable<C> {
    routes: Vec<CompiledRoute<C>>,
}

impl<C> RouteTable<C> {
    /// Compile the declared records.
    ///
    /// Fails if the list is empty, if any pattern is malformed, or if two
    /// records share a name or a path pattern. Patterns that differ only in
    /// parameter names count as the same pattern. All problems are reported.
    pub fn register(records: Vec<RouteRecord<C>>) -> Result<Self, ConfigurationError> {
        let mut errors = Vec::new();
        if records.is_empty() {
            errors.push(ValidationError::NoRoutes);
        }

        let mut names = HashSet::new();
        let mut shapes = HashSet::new();
        let mut routes = Vec::with_capacity(records.len());

        for record in records {
            if record.name.trim().is_empty() {
                errors.push(ValidationError::EmptyName {
                    path: record.path.clone(),
                });
            } else if !names.insert(record.name.clone()) {
                errors.push(ValidationError::DuplicateName(record.name.clone()));
            }

            match PathPattern::parse(&record.path) {
                Ok(pattern) => {
                    if !shapes.insert(pattern.shape()) {
                        errors.push(ValidationError::DuplicatePath(record.path.clone()));
                    }
                    routes.push(CompiledRoute { record, pattern });
                }
                Err(reason) => errors.push(ValidationError::InvalidPattern {
                    pattern: record.path.clone(),
                    reason,
                }),
            }
        }

        if !errors.is_empty() {
            return Err(ConfigurationError::Validation(errors));
        }

        tracing::debug!(routes = routes.len(), "Route table compiled");
        Ok(Self { routes })
    }

    /// Find the first record matching `target`.
    ///
    /// `target` may carry a query string and a fragment; both are ignored
    /// for matching and the query is decoded into the result.
    pub fn resolve(&self, target: &str) -> Option<(&RouteRecord<C>, RouteMatch)> {
        let (path, query) = split_target(target);

        self.routes.iter().find_map(|route| {
            route.pattern.matches(path).map(|params| {
                let matched = RouteMatch {
                    name: route.record.name.clone(),
                    pattern: route.record.path.clone(),
                    path: path.to_string(),
                    params,
                    query: decode_query(query),
                };
                (&route.record, matched)
            })
        })
    }

    /// Look up a record by name.
    pub fn get(&self, name: &str) -> Option<&RouteRecord<C>> {
        self.routes
            .iter()
            .map(|route| &route.record)
            .find(|record| record.name == name)
    }

    /// Build the path of a named route.
    pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
        self.routes
            .iter()
            .find(|route| route.record.name == name)
            .and_then(|route| route.pattern.render(params))
    }

    /// Records in match-priority order.
    pub fn records(&self) -> impl Iterator<Item = &RouteRecord<C>> {
        self.routes.iter().map(|route| &route.record)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Split `path?query#fragment` into path and query.
fn split_target(target: &str) -> (&str, &str) {
    let without_fragment = target.split_once('#').map_or(target, |(head, _)| head);
    match without_fragment.split_once('?') {
        Some((path, query)) => (path, query),
        None => (without_fragment, ""),
    }
}

fn decode_query(query: &str) -> BTreeMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}
