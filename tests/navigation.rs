//! Router + view tests against a mock log backend.

use std::sync::Arc;

use logview_client::app::{self, AppError};
use logview_client::logs::LogFilter;
use logview_client::routing::{History, HistoryMode, NavigationPhase};

mod common;

#[tokio::test]
async fn test_root_renders_logs() {
    let addr = common::start_log_backend().await;
    let client = Arc::new(common::client_for(addr));
    let mut router = app::build_router(HistoryMode::Browser).unwrap();

    let target = app::navigation_target(
        "/",
        &LogFilter {
            status: Some(404),
            ..Default::default()
        },
    );
    let text = app::show(&mut router, client, &target).await.unwrap();

    assert!(text.starts_with("1 of 1 entries"));
    assert!(text.contains("/missing"));
    assert!(matches!(router.phase(), NavigationPhase::Active(ref r) if r.name == "Logs"));
}

#[tokio::test]
async fn test_unknown_route_keeps_previous_state() {
    let addr = common::start_log_backend().await;
    let client = Arc::new(common::client_for(addr));
    let mut router = app::build_router(HistoryMode::Hash).unwrap();

    app::show(&mut router, client.clone(), "/").await.unwrap();
    let before = router.state().clone();

    let err = app::show(&mut router, client, "/missing").await.unwrap_err();
    assert!(matches!(err, AppError::Navigation(ref e) if e.is_not_found()));
    assert_eq!(router.state(), &before);
    assert_eq!(router.history().current().unwrap().href, "/#/");
}

#[tokio::test]
async fn test_fetch_failure_surfaces_after_activation() {
    let mut client = logview_client::http::HttpClient::new(common::transport());
    client.configure("http://127.0.0.1:9");
    let mut router = app::build_router(HistoryMode::Browser).unwrap();

    let err = app::show(&mut router, Arc::new(client), "/").await.unwrap_err();
    assert!(matches!(err, AppError::Http(ref e) if e.is_request_error()));
    assert_eq!(router.state().current_path.as_deref(), Some("/"));
}
