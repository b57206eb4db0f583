//! Attack wiring under load: users, iterations, run time, failure
//! accounting and the job-tracker page mix.

use std::time::Duration;

use goose::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jobtracker_loadtest::attack;
use jobtracker_loadtest::config::Config;
use jobtracker_loadtest::profiles::{page_transaction, Page, ProfileKind};

fn config_for(server: &MockServer, users: usize) -> Config {
    let mut cfg = Config::default();
    cfg.web.host = server.uri();
    cfg.run.users = users;
    cfg.run.spawn_rate = 100.0;
    cfg.run.stats_interval_seconds = 0;
    cfg
}

/// Test: every user makes exactly `iterations` passes over its scenario
///
/// 3 users, 2 iterations, one transaction without waits: 6 requests.
#[tokio::test(flavor = "multi_thread")]
async fn test_users_and_iterations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(6)
        .mount(&server)
        .await;

    let mut cfg = config_for(&server, 3);
    cfg.run.iterations = Some(2);
    let landing = page_transaction(&Page::new("landing", "/", 1)).unwrap();
    let scenario = scenario!("landing only").register_transaction(landing);

    let summary = attack::run(&cfg, vec![scenario]).await.unwrap();

    assert_eq!(summary.total_requests, 6);
    assert_eq!(summary.total_failures, 0);
    assert_eq!(summary.exit_code(cfg.report.fail_exit_code), 0);
}

/// Test: failed requests are counted per request and set the exit code
#[tokio::test(flavor = "multi_thread")]
async fn test_failures_are_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut cfg = config_for(&server, 2);
    cfg.run.iterations = Some(1);
    cfg.report.fail_exit_code = 3;
    let scenario = scenario!("landing and login")
        .register_transaction(page_transaction(&Page::new("landing", "/", 1)).unwrap())
        .register_transaction(page_transaction(&Page::new("login", "/login", 1)).unwrap());

    let summary = attack::run(&cfg, vec![scenario]).await.unwrap();

    assert_eq!(summary.total_requests, 4);
    assert_eq!(summary.total_failures, 2);
    let login = summary
        .requests
        .iter()
        .find(|r| r.name.ends_with("/login"))
        .unwrap();
    assert_eq!(login.failures, login.requests);
    assert!(summary.has_failures());
    assert_eq!(summary.exit_code(cfg.report.fail_exit_code), 3);
}

/// Test: job-tracker users stay on its pages and stop at the run time
///
/// Supabase is not configured, so its transaction never sends anything.
#[tokio::test(flavor = "multi_thread")]
async fn test_job_tracker_run_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let mut cfg = config_for(&server, 3);
    cfg.run.time = Some(Duration::from_secs(4));
    let scenarios = vec![ProfileKind::JobTracker.build(&cfg).unwrap()];

    let summary = attack::run(&cfg, scenarios).await.unwrap();

    assert!(summary.total_requests >= 1);
    assert_eq!(summary.total_failures, 0);
    assert!(summary.duration_secs < 30);

    let received = server.received_requests().await.unwrap();
    assert!(received.len() >= summary.total_requests);
    let allowed = ["/", "/login", "/register", "/app/dashboard"];
    for request in &received {
        assert!(
            allowed.contains(&request.url.path()),
            "unexpected request to {}",
            request.url
        );
    }
}
