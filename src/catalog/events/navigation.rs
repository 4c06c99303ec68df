//! # Navigation
//!
//! Resolves a path into the view that handles it, plus the context that view
//! reads its inputs from: path segments and named route parameters.

use super::route::{Route, CATALOG_ROOT};
use anyhow::Result;
use regex::Regex;
use std::collections::HashMap;

/// Which view controller handles a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    List,
    Detail,
    Form,
}

/// Route table, matched in order; `:name` captures one segment
const ROUTE_TABLE: [(&str, ViewKind); 5] = [
    ("", ViewKind::List),
    ("api-interfaces", ViewKind::List),
    ("api-interfaces/new", ViewKind::Form),
    ("api-interfaces/:id", ViewKind::Detail),
    ("api-interfaces/:id/edit", ViewKind::Form),
];

/// Navigation context handed to a view on activation
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationContext {
    view: ViewKind,
    path: String,
    segments: Vec<String>,
    params: HashMap<String, String>,
}

impl NavigationContext {
    /// Create a context for `path` without parameters
    pub fn new(view: ViewKind, path: &str) -> Self {
        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            view,
            path: path.to_string(),
            segments,
            params: HashMap::new(),
        }
    }

    /// Builder-style parameter setter
    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Raw value of a named route parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// The `id` parameter parsed as an integer
    ///
    /// A value that is not an integer counts as absent.
    pub fn id(&self) -> Option<i64> {
        let raw = self.param("id")?;
        match raw.trim().parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!("Ignoring non-numeric id parameter '{}'", raw);
                None
            }
        }
    }

    /// Whether the path contains `segment` as a whole segment
    pub fn has_segment(&self, segment: &str) -> bool {
        self.segments.iter().any(|s| s == segment)
    }
}

struct CompiledRoute {
    pattern: Regex,
    view: ViewKind,
}

/// Path to view resolver built from the route table
pub struct Router {
    routes: Vec<CompiledRoute>,
}

impl Router {
    pub fn new() -> Result<Self> {
        let routes = ROUTE_TABLE
            .iter()
            .map(|(pattern, view)| {
                Ok(CompiledRoute {
                    pattern: Self::compile(pattern)?,
                    view: *view,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { routes })
    }

    fn compile(pattern: &str) -> Result<Regex> {
        let body = pattern
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => format!("(?P<{name}>[^/]+)"),
                None => regex::escape(segment),
            })
            .collect::<Vec<_>>()
            .join("/");
        Ok(Regex::new(&format!("^{body}$"))?)
    }

    /// Resolve a path; anything unmatched lands on the list view
    pub fn resolve(&self, path: &str) -> NavigationContext {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_matches('/');

        for route in &self.routes {
            if let Some(captures) = route.pattern.captures(trimmed) {
                let mut context = NavigationContext::new(route.view, path);
                for name in route.pattern.capture_names().flatten() {
                    if let Some(value) = captures.name(name) {
                        context = context.with_param(name, value.as_str());
                    }
                }
                tracing::debug!("Resolved '{}' to {:?}", path, route.view);
                return context;
            }
        }

        tracing::debug!("No route matches '{}', redirecting to list", path);
        NavigationContext::new(ViewKind::List, CATALOG_ROOT)
    }

    /// Resolve a navigation target
    pub fn resolve_route(&self, route: Route) -> NavigationContext {
        self.resolve(&route.path())
    }
}
