use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use lantern::config::StaticFilesConfig;
use lantern::handler::{FileServeResult, Handler, StaticFiles};
use lantern::http::parser::parse_http_request;
use lantern::http::response::StatusCode;

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

fn site() -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "lantern-static-{}-{}",
        std::process::id(),
        NEXT_DIR.fetch_add(1, Ordering::SeqCst)
    ));
    std::fs::create_dir_all(dir.join("docs")).unwrap();
    std::fs::write(dir.join("page.html"), b"<h1>page</h1>\n").unwrap();
    std::fs::write(dir.join("old.htm"), b"<h1>old</h1>").unwrap();
    std::fs::write(dir.join("notes.txt"), b"plain").unwrap();
    std::fs::write(dir.join("LOUD.HTML"), b"shouting").unwrap();
    std::fs::write(dir.join("index.html"), b"<h1>home</h1>").unwrap();
    std::fs::write(dir.join("docs/guide.html"), b"<h1>guide</h1>").unwrap();
    std::fs::create_dir_all(dir.join("folder.html")).unwrap();
    dir
}

fn files(root: PathBuf, index: Option<&str>) -> StaticFiles {
    StaticFiles::new(&StaticFilesConfig {
        root,
        index: index.map(str::to_string),
        ..StaticFilesConfig::default()
    })
}

#[test]
fn test_file_name_strips_one_leading_slash() {
    let files = files(PathBuf::from("."), None);

    assert_eq!(files.file_name("/page.html"), "page.html");
    assert_eq!(files.file_name("page.html"), "page.html");
    assert_eq!(files.file_name("//page.html"), "/page.html");
    assert_eq!(files.file_name("/"), "");
}

#[test]
fn test_file_name_default_document() {
    let files = files(PathBuf::from("."), Some("index.html"));

    assert_eq!(files.file_name("/"), "index.html");
    assert_eq!(files.file_name(""), "index.html");
    assert_eq!(files.file_name("/a.html"), "a.html");
}

#[tokio::test]
async fn test_existing_html_file_is_served_verbatim() {
    let files = files(site(), None);

    assert_eq!(
        files.resolve("/page.html").await,
        FileServeResult::Ok(b"<h1>page</h1>\n".to_vec())
    );
    assert_eq!(
        files.resolve("/old.htm").await,
        FileServeResult::Ok(b"<h1>old</h1>".to_vec())
    );
    assert_eq!(
        files.resolve("/docs/guide.html").await,
        FileServeResult::Ok(b"<h1>guide</h1>".to_vec())
    );
}

#[tokio::test]
async fn test_existing_txt_file_is_forbidden_not_missing() {
    let files = files(site(), None);

    assert_eq!(files.resolve("/notes.txt").await, FileServeResult::Forbidden);
    // Extension matching is case-sensitive
    assert_eq!(files.resolve("/LOUD.HTML").await, FileServeResult::Forbidden);
}

#[tokio::test]
async fn test_missing_or_non_regular_targets_are_not_found() {
    let files = files(site(), None);

    assert_eq!(files.resolve("/missing.html").await, FileServeResult::NotFound);
    assert_eq!(files.resolve("/missing.txt").await, FileServeResult::NotFound);
    assert_eq!(files.resolve("/docs").await, FileServeResult::NotFound);
    assert_eq!(files.resolve("/folder.html").await, FileServeResult::NotFound);
    // No default document: the empty name is the root directory
    assert_eq!(files.resolve("/").await, FileServeResult::NotFound);
}

#[tokio::test]
async fn test_default_document_substitution() {
    let files = files(site(), Some("index.html"));

    assert_eq!(
        files.resolve("/").await,
        FileServeResult::Ok(b"<h1>home</h1>".to_vec())
    );
}

#[tokio::test]
async fn test_handler_status_codes() {
    let files = files(site(), None);

    let cases = [
        ("GET /page.html HTTP/1.0\r\n\r\n", StatusCode::Ok),
        ("GET /notes.txt HTTP/1.0\r\n\r\n", StatusCode::Forbidden),
        ("GET /nope.html HTTP/1.0\r\n\r\n", StatusCode::NotFound),
        ("POST /page.html HTTP/1.0\r\n\r\n", StatusCode::Forbidden),
        ("HEAD /page.html HTTP/1.0\r\n\r\n", StatusCode::Forbidden),
    ];

    for (raw, expected) in cases {
        let request = parse_http_request(raw.as_bytes()).unwrap();
        let response = files.handle(&request).await;
        assert_eq!(response.status, expected, "{raw:?}");
    }
}

#[tokio::test]
async fn test_handler_ok_has_matching_content_length() {
    let files = files(site(), None);
    let request = parse_http_request(b"GET /page.html HTTP/1.0\r\n\r\n").unwrap();

    let response = files.handle(&request).await;

    assert_eq!(response.body, b"<h1>page</h1>\n".to_vec());
    assert_eq!(response.headers.get("content-length"), Some("14"));
    assert_eq!(
        response.headers.get("content-type"),
        Some("text/html; charset=UTF-8")
    );
}

#[tokio::test]
async fn test_wrong_method_gets_empty_forbidden() {
    let files = files(site(), None);
    let request = parse_http_request(b"DELETE /page.html HTTP/1.0\r\n\r\n").unwrap();

    let response = files.handle(&request).await;

    assert_eq!(response.status, StatusCode::Forbidden);
    assert!(response.body.is_empty());
}
