use rvis_core::{CrawlError, Termination, TracingCrawlReporter};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::integration::common::{
    SESSION_COOKIE, TOKEN, crawler, landing_page, landing_url, results_page,
};

const FORM_PATH: &str = "/mgov-rvis/home/map";

async fn mount_landing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(FORM_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", format!("{SESSION_COOKIE}; Path=/"))
                .set_body_string(landing_page()),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("POST"))
        .and(path(FORM_PATH))
        .and(header("cookie", SESSION_COOKIE))
        .and(body_string_contains(format!("&p={page}&").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn crawls_until_empty_page() {
    let server = MockServer::start().await;
    mount_landing(&server).await;
    mount_page(&server, 1, results_page(&["Clinic A", "Clinic B"])).await;
    mount_page(&server, 2, results_page(&["Clinic C"])).await;
    mount_page(&server, 3, results_page(&[])).await;

    let mut service = crawler(&server);
    let summary = service.run(&TracingCrawlReporter).await;

    assert_eq!(summary.pages, 2);
    assert_eq!(summary.records, 3);
    assert!(matches!(summary.termination, Termination::Exhausted { page: 3 }));
    assert!(summary.is_complete());

    let sink = service.into_sink();
    assert_eq!(sink.batches.len(), 2);
    let names: Vec<_> = sink.batches.concat().into_iter().map(|r| r.name).collect();
    assert_eq!(names, ["Clinic A", "Clinic B", "Clinic C"]);
    assert_eq!(sink.batches[0][1].lat, Some(23.1));
}

#[tokio::test]
async fn submits_full_form_with_referer() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    let referer = landing_url(&server);
    Mock::given(method("POST"))
        .and(path(FORM_PATH))
        .and(header("referer", referer.as_str()))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains(
            format!("_csrf={TOKEN}&p=1&countySel=&townSel=&villageSel=").as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let mut service = crawler(&server);
    let summary = service.run(&TracingCrawlReporter).await;

    assert_eq!(summary.pages, 0);
    assert!(matches!(summary.termination, Termination::Exhausted { page: 1 }));
    assert_eq!(service.session().token(), Some(TOKEN));
    assert_eq!(
        service.session().transport().cookie_header(&referer).as_deref(),
        Some(SESSION_COOKIE)
    );
}

#[tokio::test]
async fn server_error_aborts_and_keeps_earlier_pages() {
    let server = MockServer::start().await;
    mount_landing(&server).await;
    mount_page(&server, 1, results_page(&["Clinic A"])).await;
    Mock::given(method("POST"))
        .and(path(FORM_PATH))
        .and(body_string_contains("&p=2&"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut service = crawler(&server);
    let summary = service.run(&TracingCrawlReporter).await;

    assert_eq!(summary.pages, 1);
    assert_eq!(summary.records, 1);
    assert!(matches!(
        summary.termination,
        Termination::Aborted(CrawlError::HttpStatus { status: 500, .. })
    ));
    assert_eq!(service.into_sink().batches.len(), 1);
}

#[tokio::test]
async fn landing_without_token_aborts_before_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FORM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>closed</html>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut service = crawler(&server);
    let summary = service.run(&TracingCrawlReporter).await;

    assert_eq!(summary.pages, 0);
    assert!(matches!(
        summary.termination,
        Termination::Aborted(CrawlError::TokenMissing { .. })
    ));
}
