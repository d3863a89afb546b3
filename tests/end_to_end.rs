//! Uploader and Viewer driven against a live server on an ephemeral port

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast::error::TryRecvError, watch};

use pdf_search::config::Config;
use pdf_search::extract::{ExtractError, TextExtractor};
use pdf_search::routes;
use pdf_search::state::AppState;
use pdf_search::{
    HttpClient, NotificationBus, PdfUploaded, SelectedFile, UploadStatus, Uploader, Viewer,
    ViewerState,
};

/// Treats the upload as UTF-8 text with pages separated by form feeds
struct FormFeedExtractor;

impl TextExtractor for FormFeedExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
        let text = std::str::from_utf8(bytes).map_err(|e| ExtractError::Parse(e.to_string()))?;
        Ok(text.split('\x0c').map(str::to_string).collect())
    }
}

async fn spawn_server() -> String {
    let state = AppState::with_extractor(Config::default(), Arc::new(FormFeedExtractor));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, routes::app(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn next_state(rx: &mut watch::Receiver<ViewerState>) -> ViewerState {
    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("viewer did not update in time")
        .unwrap();
    let state = rx.borrow_and_update().clone();
    state
}

fn block_count(html: &str) -> usize {
    html.matches(r#"<div class="page">"#).count()
}

#[tokio::test]
async fn upload_announces_and_viewer_loads_document() {
    let api = Arc::new(HttpClient::new(&spawn_server().await));
    let bus = NotificationBus::new();
    let uploader = Uploader::new(api.clone(), bus.clone());
    let viewer = Viewer::new(api);
    let _subscription = viewer.attach(&bus);
    let mut changes = viewer.subscribe();

    uploader.select(SelectedFile::new(
        "a.pdf",
        "Tax form instructions\x0cSchedule B\x0cTax form worksheet",
    ));
    let status = uploader.submit().await;

    assert_eq!(
        status,
        UploadStatus::Uploaded {
            filename: "a.pdf".to_string(),
            pages_processed: 3
        }
    );
    assert!(uploader.status_message().contains('3'));

    match next_state(&mut changes).await {
        ViewerState::ShowingDocument { filename, pages } => {
            assert_eq!(filename, "a.pdf");
            assert_eq!(pages.iter().map(|p| p.page_number).collect::<Vec<_>>(), [1, 2, 3]);
            assert_eq!(pages[1].content, "Schedule B");
        }
        other => panic!("expected document, got {other:?}"),
    }

    let html = viewer.render_html();
    assert_eq!(block_count(&html), 3);
    assert!(html.contains("Page 1"));
    assert!(html.contains("Schedule B"));
}

#[tokio::test]
async fn search_replaces_document_with_results() {
    let api = Arc::new(HttpClient::new(&spawn_server().await));
    let bus = NotificationBus::new();
    let uploader = Uploader::new(api.clone(), bus.clone());
    let viewer = Viewer::new(api);
    let _subscription = viewer.attach(&bus);
    let mut changes = viewer.subscribe();

    uploader.select(SelectedFile::new(
        "a.pdf",
        "Tax form instructions\x0cSchedule B\x0cTax form worksheet",
    ));
    uploader.submit().await;
    next_state(&mut changes).await;

    viewer.set_query("tax form");
    viewer.search_content().await;

    match viewer.state() {
        ViewerState::ShowingResults { query, results } => {
            assert_eq!(query, "tax form");
            assert_eq!(results.len(), 2);
            assert_eq!(results[0].page_number, 1);
            assert_eq!(results[1].page_number, 3);
            assert!(results.iter().all(|r| r.document_name == "a.pdf"));
        }
        other => panic!("expected results, got {other:?}"),
    }

    let html = viewer.render_html();
    assert_eq!(block_count(&html), 2);
    assert!(html.find("a.pdf - Page 1").unwrap() < html.find("a.pdf - Page 3").unwrap());
}

#[tokio::test]
async fn rejected_upload_leaves_viewer_alone() {
    let api = Arc::new(HttpClient::new(&spawn_server().await));
    let bus = NotificationBus::new();
    let mut notices = bus.subscribe();
    let uploader = Uploader::new(api.clone(), bus.clone());
    let viewer = Viewer::new(api);
    let _subscription = viewer.attach(&bus);

    uploader.select(SelectedFile::new("notes.txt", "plain text"));
    let status = uploader.submit().await;

    assert_eq!(
        status,
        UploadStatus::Rejected {
            detail: "File must be a PDF".to_string()
        }
    );
    assert_eq!(uploader.status_message(), "Error: File must be a PDF");
    assert_eq!(notices.try_recv(), Err(TryRecvError::Empty));
    assert_eq!(viewer.state(), ViewerState::Empty);
}

#[tokio::test]
async fn unreachable_backend_renders_errors() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = Arc::new(HttpClient::new(&format!("http://{}", addr)));
    let bus = NotificationBus::new();
    let mut notices = bus.subscribe();
    let uploader = Uploader::new(api.clone(), bus);
    let viewer = Viewer::new(api);

    viewer.load_document("missing.pdf").await;
    match viewer.state() {
        ViewerState::ShowingError { message } => {
            assert!(message.starts_with("Error loading document: "));
            assert!(message.len() > "Error loading document: ".len());
        }
        other => panic!("expected error, got {other:?}"),
    }
    assert_eq!(block_count(&viewer.render_html()), 0);

    uploader.select(SelectedFile::new("a.pdf", "text"));
    assert!(matches!(uploader.submit().await, UploadStatus::Failed { .. }));
    assert!(uploader.status_message().starts_with("Error: "));
    assert_eq!(notices.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn uploaded_markup_is_rendered_as_text() {
    let api = Arc::new(HttpClient::new(&spawn_server().await));
    let bus = NotificationBus::new();
    let uploader = Uploader::new(api.clone(), bus.clone());
    let viewer = Viewer::new(api);
    let _subscription = viewer.attach(&bus);
    let mut changes = viewer.subscribe();

    uploader.select(SelectedFile::new("x.pdf", "<script>alert(1)</script> invoice"));
    uploader.submit().await;
    next_state(&mut changes).await;

    let html = viewer.render_html();
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));

    viewer.set_query("invoice");
    viewer.search_content().await;
    assert!(!viewer.render_html().contains("<script>"));
}

#[tokio::test]
async fn several_uploaders_feed_one_viewer() {
    let api = Arc::new(HttpClient::new(&spawn_server().await));
    let bus = NotificationBus::new();
    let first = Uploader::new(api.clone(), bus.clone());
    let second = Uploader::new(api.clone(), bus.clone());
    let viewer = Viewer::new(api);
    let _subscription = viewer.attach(&bus);
    let mut changes = viewer.subscribe();

    first.select(SelectedFile::new("one.pdf", "only page"));
    first.submit().await;
    match next_state(&mut changes).await {
        ViewerState::ShowingDocument { filename, .. } => assert_eq!(filename, "one.pdf"),
        other => panic!("expected document, got {other:?}"),
    }

    second.select(SelectedFile::new("two.pdf", "page a\x0cpage b"));
    second.submit().await;
    match next_state(&mut changes).await {
        ViewerState::ShowingDocument { filename, pages } => {
            assert_eq!(filename, "two.pdf");
            assert_eq!(pages.len(), 2);
        }
        other => panic!("expected document, got {other:?}"),
    }
}

#[tokio::test]
async fn notification_payload_matches_receipt() {
    let api = Arc::new(HttpClient::new(&spawn_server().await));
    let bus = NotificationBus::new();
    let mut notices = bus.subscribe();
    let uploader = Uploader::new(api, bus);

    uploader.select(SelectedFile::new("report.pdf", "p1\x0cp2"));
    uploader.submit().await;

    assert_eq!(
        notices.try_recv().unwrap(),
        PdfUploaded {
            filename: "report.pdf".to_string()
        }
    );
    assert_eq!(notices.try_recv(), Err(TryRecvError::Empty));
}
