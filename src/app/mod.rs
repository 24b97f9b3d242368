//! Application shell.
//!
//! # Responsibilities
//! - Declare the route table (`/` → `Logs`)
//! - Bind activated views to the shared HTTP client
//! - Render fetched log pages as text
//!
//! # Flow
//! ```text
//! navigation target ("/?status=404")
//!     → Router::navigate (route match + lazy view construction)
//!     → View::render (LogsApi::fetch through the interceptor pipeline)
//!     → text on stdout
//! ```

use std::fmt::{self, Write as _};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use thiserror::Error;

use crate::config::ConfigurationError;
use crate::http::{HttpClient, HttpError};
use crate::logs::{LogFilter, LogsApi, LogsPage};
use crate::routing::{ComponentFactory, HistoryMode, NavigationError, RouteMatch, RouteRecord, RouteTable, Router};

/// Errors surfaced while showing a route.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Http(#[from] HttpError),
}

/// Everything an activated view may use.
#[derive(Debug, Clone)]
pub struct ViewContext {
    pub client: Arc<HttpClient>,
    pub route: RouteMatch,
}

/// A routable screen.
pub trait View: Send + Sync + fmt::Debug {
    fn render<'a>(&'a self, ctx: &'a ViewContext) -> BoxFuture<'a, Result<String, HttpError>>;
}

/// Component type held by the route table.
pub type ViewHandle = Arc<dyn View>;

/// The access-log listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogsView;

impl View for LogsView {
    fn render<'a>(&'a self, ctx: &'a ViewContext) -> BoxFuture<'a, Result<String, HttpError>> {
        async move {
            let filter = LogFilter::from_query(&ctx.route.query);
            let page = LogsApi::new(ctx.client.clone()).fetch(&filter).await?;
            Ok(render_page(&page, &filter))
        }
        .boxed()
    }
}

/// The application's route declarations.
pub fn routes() -> Vec<RouteRecord<ViewHandle>> {
    vec![RouteRecord::new(
        "/",
        "Logs",
        ComponentFactory::from_fn(|| Arc::new(LogsView) as ViewHandle),
    )]
}

/// Register [`routes`] and build a router over them.
pub fn build_router(history_mode: HistoryMode) -> Result<Router<ViewHandle>, ConfigurationError> {
    Ok(Router::new(RouteTable::register(routes())?, history_mode))
}

/// Append the set filter fields to `path` as a query string.
pub fn navigation_target(path: &str, filter: &LogFilter) -> String {
    let pairs = filter.query_pairs();
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{}{}{}", path, separator, query)
}

/// Navigate to `target` and render the activated view.
pub async fn show(
    router: &mut Router<ViewHandle>,
    client: Arc<HttpClient>,
    target: &str,
) -> Result<String, AppError> {
    let activation = router.navigate(target).await?;
    let ctx = ViewContext {
        client,
        route: activation.route,
    };
    Ok(activation.component.render(&ctx).await?)
}

/// Text listing of one page.
pub fn render_page(page: &LogsPage, filter: &LogFilter) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} of {} entries (offset {}, limit {})",
        page.logs.len(),
        page.total,
        filter.offset,
        filter.limit
    );
    for entry in &page.logs {
        let _ = writeln!(
            out,
            "{} {:<15} {:>3} {:<6} {} {}B {:.3}s",
            entry.time.to_rfc3339(),
            entry.client_ip,
            entry.status,
            entry.method,
            entry.path,
            entry.body_bytes,
            entry.req_time
        );
    }
    out
}
