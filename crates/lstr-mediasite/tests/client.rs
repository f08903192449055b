//! Integration tests for `MediasiteClient` and the Mediasite reporter using
//! wiremock HTTP mocks.

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use lstr_core::{Platform, Recurrence, ReportRequest, SummaryRecord};
use lstr_mediasite::{run_report, ExportFormat, MediasiteClient, MediasiteError, PollPolicy};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use wiremock::matchers::{body_partial_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REPORT_XML: &str = r"<PresentationReport>
  <ResultSummary>
    <PresentationsAvailable>118</PresentationsAvailable>
    <TotalTimeWatched>1.05:44:37</TotalTimeWatched>
    <PresentationsWatched>57</PresentationsWatched>
    <TotalViews>402</TotalViews>
    <TotalUsers>133</TotalUsers>
    <PeakConnections>21</PeakConnections>
  </ResultSummary>
</PresentationReport>";

fn test_client(server: &MockServer) -> MediasiteClient {
    MediasiteClient::with_base_url(&format!("{}/Api/v1", server.uri()), "key", "user", "pass", 5)
        .expect("client construction should not fail")
}

fn instant_policy() -> PollPolicy {
    PollPolicy {
        interval: Duration::ZERO,
        max_attempts: 5,
    }
}

fn job_body(status: &str) -> serde_json::Value {
    json!({ "Id": "job", "Status": status })
}

async fn mount_report_lookup(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/Api/v1/PresentationReports"))
        .and(query_param("$top", "1"))
        .and(query_param("$filter", "Name eq 'BBA Weekly'"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "value": [{ "Id": "r-1", "Name": "BBA Weekly" }] })),
        )
        .mount(server)
        .await;
}

async fn mount_execute(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path_regex(r"/Api/v1/PresentationReports\('r-1'\)/Execute$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "JobLink": format!("{}/Api/v1/jobs/execute-1", server.uri()),
            "ResultId": "result-9"
        })))
        .mount(server)
        .await;
}

async fn mount_export(server: &MockServer, format: &str, slug: &str) {
    Mock::given(method("POST"))
        .and(path_regex(r"/Api/v1/PresentationReports\('r-1'\)/Export$"))
        .and(body_partial_json(json!({ "ResultId": "result-9", "FileFormat": format })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "JobLink": format!("{}/Api/v1/jobs/export-{slug}", server.uri()),
            "DownloadLink": format!("{}/downloads/{slug}", server.uri())
        })))
        .mount(server)
        .await;
}

async fn mount_job(server: &MockServer, job: &str, status: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/Api/v1/jobs/{job}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_body(status)))
        .mount(server)
        .await;
}

fn weekly_request(dir: &std::path::Path) -> ReportRequest {
    ReportRequest::new(
        Platform::Mediasite,
        Recurrence::Weekly,
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        "bba",
        dir,
    )
    .with_identifier("BBA Weekly")
}

#[tokio::test]
async fn requests_carry_api_key_accept_and_basic_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Api/v1/PresentationReports"))
        .and(header("sfapikey", "key"))
        .and(header("accept", "application/json"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "value": [{ "Id": "r-77" }] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let id = test_client(&server)
        .find_presentation_report("Anything")
        .await
        .expect("lookup should succeed");
    assert_eq!(id, "r-77");
}

#[tokio::test]
async fn unknown_report_name_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Api/v1/PresentationReports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .find_presentation_report("Missing")
        .await
        .unwrap_err();
    assert!(matches!(err, MediasiteError::ReportNotFound(ref n) if n == "Missing"));
}

#[tokio::test]
async fn non_success_status_becomes_transport_error_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .find_presentation_report("BBA Weekly")
        .await
        .unwrap_err();
    assert!(
        matches!(err, MediasiteError::Transport { status: 401, ref body, .. } if body == "bad credentials"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn await_job_polls_until_successful() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Api/v1/jobs/j-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_body("Working")))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Api/v1/jobs/j-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_body("Successful")))
        .expect(1)
        .mount(&server)
        .await;

    let link = format!("{}/Api/v1/jobs/j-1", server.uri());
    let outcome = test_client(&server)
        .await_job(&link, &instant_policy())
        .await
        .expect("job should succeed");
    assert_eq!(outcome.waits, 2);
}

#[tokio::test]
async fn await_job_stops_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Api/v1/jobs/j-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_body("Working")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Api/v1/jobs/j-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_body("Failed")))
        .expect(1)
        .mount(&server)
        .await;

    let link = format!("{}/Api/v1/jobs/j-2", server.uri());
    let err = test_client(&server)
        .await_job(&link, &instant_policy())
        .await
        .unwrap_err();
    assert!(matches!(err, MediasiteError::JobFailed { ref status, .. } if status == "Failed"));
}

#[tokio::test]
async fn generate_and_fetch_streams_into_nested_directory() {
    let server = MockServer::start().await;
    mount_export(&server, "XML", "xml").await;
    mount_job(&server, "export-xml", "Successful").await;
    Mock::given(method("GET"))
        .and(path("/downloads/xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REPORT_XML))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("nested/deeper/report.xml");
    let artifact = test_client(&server)
        .generate_and_fetch("r-1", "result-9", ExportFormat::Xml, &dest, &instant_policy())
        .await
        .expect("download should succeed");

    assert_eq!(artifact.path, dest);
    assert_eq!(artifact.format, ExportFormat::Xml);
    assert_eq!(artifact.bytes, REPORT_XML.len() as u64);
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), REPORT_XML);
}

#[tokio::test]
async fn generate_and_fetch_surfaces_download_failure() {
    let server = MockServer::start().await;
    mount_export(&server, "Excel", "excel").await;
    mount_job(&server, "export-excel", "Successful").await;
    Mock::given(method("GET"))
        .and(path("/downloads/excel"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = test_client(&server)
        .generate_and_fetch(
            "r-1",
            "result-9",
            ExportFormat::Excel,
            &dir.path().join("r.excel.xml"),
            &instant_policy(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MediasiteError::Transport { status: 404, .. }));
}

/// Serves one raw HTTP response: the head, then each body chunk after
/// `gap`, then closes the connection. A `content_length` larger than the
/// chunks simulates a transfer cut short.
async fn spawn_raw_download(content_length: usize, chunks: Vec<&'static [u8]>, gap: Duration) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = vec![0u8; 4096];
        let mut read = 0;
        while !request[..read].windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut request[read..]).await.unwrap();
            if n == 0 {
                return;
            }
            read += n;
        }
        let head = format!("HTTP/1.1 200 OK\r\nContent-Length: {content_length}\r\n\r\n");
        socket.write_all(head.as_bytes()).await.unwrap();
        for chunk in chunks {
            tokio::time::sleep(gap).await;
            if socket.write_all(chunk).await.is_err() {
                return;
            }
        }
        socket.shutdown().await.ok();
    });
    format!("http://{addr}")
}

async fn mount_export_at(server: &MockServer, download_base: &str) {
    Mock::given(method("POST"))
        .and(path_regex(r"/Api/v1/PresentationReports\('r-1'\)/Export$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "JobLink": format!("{}/Api/v1/jobs/export-excel", server.uri()),
            "DownloadLink": format!("{download_base}/downloads/excel")
        })))
        .mount(server)
        .await;
    mount_job(server, "export-excel", "Successful").await;
}

#[tokio::test]
async fn generate_and_fetch_rejects_truncated_download() {
    let server = MockServer::start().await;
    let download = spawn_raw_download(1000, vec![&b"<partial>"[..]], Duration::ZERO).await;
    mount_export_at(&server, &download).await;

    let dir = tempfile::tempdir().unwrap();
    let err = test_client(&server)
        .generate_and_fetch(
            "r-1",
            "result-9",
            ExportFormat::Excel,
            &dir.path().join("r.excel.xml"),
            &instant_policy(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MediasiteError::Download { .. }), "got: {err:?}");
}

#[tokio::test]
async fn slow_download_outlasting_the_timeout_completes_while_data_flows() {
    let server = MockServer::start().await;
    let chunks: Vec<&'static [u8]> = vec![
        &b"<Workbook>"[..],
        &b"<Row/>"[..],
        &b"<Row/>"[..],
        &b"</Workbook>"[..],
    ];
    let total: usize = chunks.iter().map(|c| c.len()).sum();
    let download = spawn_raw_download(total, chunks, Duration::from_millis(400)).await;
    mount_export_at(&server, &download).await;

    let client =
        MediasiteClient::with_base_url(&format!("{}/Api/v1", server.uri()), "key", "user", "pass", 1)
            .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("r.excel.xml");
    let artifact = client
        .generate_and_fetch("r-1", "result-9", ExportFormat::Excel, &dest, &instant_policy())
        .await
        .expect("download should finish");

    assert_eq!(artifact.bytes, total as u64);
    assert_eq!(
        std::fs::read_to_string(&dest).unwrap(),
        "<Workbook><Row/><Row/></Workbook>"
    );
}

#[tokio::test]
async fn generate_and_fetch_reports_unwritable_destination() {
    let server = MockServer::start().await;
    mount_export(&server, "XML", "xml").await;
    mount_job(&server, "export-xml", "Successful").await;
    Mock::given(method("GET"))
        .and(path("/downloads/xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REPORT_XML))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    // A regular file where a directory is expected.
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"x").unwrap();

    let err = test_client(&server)
        .generate_and_fetch(
            "r-1",
            "result-9",
            ExportFormat::Xml,
            &blocker.join("report.xml"),
            &instant_policy(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MediasiteError::Download { .. }), "got: {err:?}");
}

#[tokio::test]
async fn run_report_downloads_both_exports_and_reduces_summary() {
    let server = MockServer::start().await;
    mount_report_lookup(&server).await;
    mount_execute(&server).await;
    mount_job(&server, "execute-1", "Successful").await;
    mount_export(&server, "Excel", "excel").await;
    mount_export(&server, "XML", "xml").await;
    mount_job(&server, "export-excel", "Successful").await;
    mount_job(&server, "export-xml", "Successful").await;
    Mock::given(method("GET"))
        .and(path("/downloads/excel"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<Workbook/>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/downloads/xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REPORT_XML))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let request = weekly_request(dir.path());
    let result = run_report(&test_client(&server), &request, &instant_policy())
        .await
        .expect("report should run");

    assert_eq!(
        result.excel_export.path,
        dir.path().join("mediasite_report_weekly_bba_10-19-2026.excel.xml")
    );
    assert_eq!(
        result.xml_export.path,
        dir.path().join("mediasite_report_weekly_bba_10-19-2026.xml")
    );
    assert_eq!(result.watch_time.hours, 29);
    assert_eq!(result.summary.total_views, "402");

    let metrics: HashMap<&str, String> = result.metrics().into_iter().collect();
    assert_eq!(metrics["mediasite_results_time_watched_hours"], "29");
    assert_eq!(metrics["mediasite_results_time_watched_minutes"], "44");
    assert_eq!(metrics["mediasite_results_time_watched_seconds"], "37");
    assert_eq!(metrics["mediasite_results_number_presentations"], "118");
    assert_eq!(metrics["mediasite_results_active_users_peak"], "21");
}

#[tokio::test]
async fn failed_execution_job_stops_before_any_export() {
    let server = MockServer::start().await;
    mount_report_lookup(&server).await;
    mount_execute(&server).await;
    mount_job(&server, "execute-1", "Cancelled").await;
    Mock::given(method("POST"))
        .and(path_regex(r"/Export$"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = run_report(&test_client(&server), &weekly_request(dir.path()), &instant_policy())
        .await
        .unwrap_err();
    assert!(matches!(err, MediasiteError::JobFailed { ref status, .. } if status == "Cancelled"));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}
