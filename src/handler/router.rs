//! Request routing dispatch module
//!
//! Entry point for request processing: route matching, handler dispatch, and
//! conversion of unhandled failures into a generic server error.

use std::sync::Arc;

use crate::config::HttpConfig;
use crate::error::{Error, Result};
use crate::handler::notes;
use crate::handler::users::UsersHandler;
use crate::http::{ApiRequest, ApiResponse, ResponseHeaders};
use crate::logger;
use crate::routing::{self, Route, RouteAction};
use crate::store::UserStore;

pub struct Dispatcher {
    routes: Vec<Route>,
    users: UsersHandler,
    headers: ResponseHeaders,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn UserStore>, http: &HttpConfig) -> Self {
        Self {
            routes: routing::default_routes(),
            users: UsersHandler::new(store),
            headers: ResponseHeaders::from_config(http),
        }
    }

    /// Main entry point: always produces an envelope
    ///
    /// Errors from [`dispatch`](Self::dispatch) are logged and answered with 500.
    pub async fn handle(&self, request: &ApiRequest) -> ApiResponse {
        match self.dispatch(request).await {
            Ok(response) => response,
            Err(e) => self.failure(&request.http_method, &request.path, &e),
        }
    }

    /// Serverless invocation: raw proxy event in, envelope out
    ///
    /// Only an unparseable event is an error; everything after that is
    /// answered by [`handle`](Self::handle).
    pub async fn handle_event(&self, raw: &str) -> Result<ApiResponse> {
        let request = ApiRequest::from_event(raw)?;
        Ok(self.handle(&request).await)
    }

    /// Log an unhandled failure and answer it with a generic 500
    pub fn failure(&self, method: &str, path: &str, err: &Error) -> ApiResponse {
        logger::log_handler_error(method, path, err);
        ApiResponse::internal_error(&self.headers)
    }

    /// Match the request against the route table and run the handler
    ///
    /// Routing misses are a 404 envelope, never an error.
    pub async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let matched = request
            .method()
            .and_then(|method| routing::match_route(&method, &request.path, &self.routes));

        let Some(route) = matched else {
            return Ok(ApiResponse::not_found(&self.headers));
        };

        let headers = &self.headers;
        match route.action {
            RouteAction::ListNotes => Ok(notes::list_notes(headers)),
            RouteAction::CreateNote => Ok(notes::create_note(headers)),
            RouteAction::GetNote => Ok(notes::get_note(
                notes::extract_note_id(&request.path),
                headers,
            )),
            RouteAction::UpdateNote => Ok(notes::update_note(
                notes::extract_note_id(&request.path),
                headers,
            )),
            RouteAction::DeleteNote => Ok(notes::delete_note(
                notes::extract_note_id(&request.path),
                headers,
            )),
            RouteAction::GetUsers => self.users.get_users(request, headers).await,
            RouteAction::CreateUser => self.users.create_user(request, headers).await,
        }
    }
}
