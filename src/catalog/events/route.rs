//! # Routes
//!
//! Navigation targets a controller can request, and their canonical paths.

use std::fmt;

/// Root path of the catalog views
pub const CATALOG_ROOT: &str = "/api-interfaces";

/// A navigation target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Catalog list
    List,
    /// Empty form for a new interface
    Create,
    /// Read-only view of one interface
    Detail(i64),
    /// Form prefilled with one interface
    Edit(i64),
}

impl Route {
    /// Canonical path for this route
    pub fn path(&self) -> String {
        match self {
            Route::List => CATALOG_ROOT.to_string(),
            Route::Create => format!("{CATALOG_ROOT}/new"),
            Route::Detail(id) => format!("{CATALOG_ROOT}/{id}"),
            Route::Edit(id) => format!("{CATALOG_ROOT}/{id}/edit"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_should_render_canonical_paths() {
        assert_eq!(Route::List.path(), "/api-interfaces");
        assert_eq!(Route::Create.path(), "/api-interfaces/new");
        assert_eq!(Route::Detail(4).path(), "/api-interfaces/4");
        assert_eq!(Route::Edit(4).to_string(), "/api-interfaces/4/edit");
    }
}
