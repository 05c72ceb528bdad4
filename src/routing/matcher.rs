//! Route matching module
//!
//! An ordered table of method + path rules. Path rules are exact or prefix
//! strings, nothing more.

use hyper::Method;

/// Path matching rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatch {
    /// Path must equal the string
    Exact(&'static str),
    /// Path must start with the string
    Prefix(&'static str),
}

/// What a matched route dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    ListNotes,
    CreateNote,
    GetNote,
    UpdateNote,
    DeleteNote,
    GetUsers,
    CreateUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub path: PathMatch,
    pub action: RouteAction,
}

impl Route {
    pub const fn new(method: Method, path: PathMatch, action: RouteAction) -> Self {
        Self {
            method,
            path,
            action,
        }
    }
}

/// The fixed route table, in evaluation order
pub fn default_routes() -> Vec<Route> {
    vec![
        Route::new(Method::GET, PathMatch::Exact("/notes"), RouteAction::ListNotes),
        Route::new(Method::POST, PathMatch::Exact("/notes"), RouteAction::CreateNote),
        Route::new(Method::GET, PathMatch::Prefix("/notes/"), RouteAction::GetNote),
        Route::new(Method::PUT, PathMatch::Prefix("/notes/"), RouteAction::UpdateNote),
        Route::new(Method::DELETE, PathMatch::Prefix("/notes/"), RouteAction::DeleteNote),
        Route::new(Method::GET, PathMatch::Exact("/users"), RouteAction::GetUsers),
        Route::new(Method::POST, PathMatch::Exact("/users"), RouteAction::CreateUser),
    ]
}

/// Find the first matching route for a given method and path
pub fn match_route<'a>(method: &Method, path: &str, routes: &'a [Route]) -> Option<&'a Route> {
    routes
        .iter()
        .find(|route| route.method == *method && match_path(route.path, path))
}

/// Check if a path matches a rule
pub fn match_path(rule: PathMatch, path: &str) -> bool {
    match rule {
        PathMatch::Exact(exact) => path == exact,
        PathMatch::Prefix(prefix) => path.starts_with(prefix),
    }
}
