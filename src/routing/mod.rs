//! Routing module
//!
//! Ordered, first-match-wins route table keyed on method and path.

mod matcher;

pub use matcher::{default_routes, match_path, match_route, PathMatch, Route, RouteAction};
