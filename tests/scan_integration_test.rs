use axum::Router;
use axum::http::{StatusCode, header};
use axum::response::Html;
use axum::routing::get;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use site_sweep::{Scan, SearchMode, Termination};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

/// Serve a router on a loopback port and return its base URL
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn page(body: &str) -> Html<String> {
    Html(format!("<html><body>{body}</body></html>"))
}

/// A white PNG with four word-sized dark blocks, enough to trip the
/// visual text detector
fn text_like_png() -> Vec<u8> {
    let mut canvas = GrayImage::from_pixel(420, 100, Luma([255u8]));
    for i in 0..4i32 {
        let rect = Rect::at(15 + i * 100, 40).of_size(60, 20);
        draw_filled_rect_mut(&mut canvas, rect, Luma([0u8]));
    }

    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(canvas)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[tokio::test]
async fn test_finds_phrase_in_page_text() {
    let app = Router::new()
        .route(
            "/",
            get(|| async { page(r##"<p>Hello world</p><a href="/a">next</a><a href="#top">top</a>"##) }),
        )
        .route("/a", get(|| async { page("<p>nothing here</p>") }));
    let base = serve(app).await;

    let outcome = Scan::new(&format!("{base}/"), "hello")
        .with_max_pages(2)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.pages_scanned, 2);
    assert_eq!(outcome.termination, Termination::Completed);
    assert_eq!(outcome.results.len(), 1);

    let result = &outcome.results[0];
    assert_eq!(result.url, format!("{base}/"));
    assert_eq!(result.text_count, 1);
    assert!(result.found_in_text());
    assert_eq!(result.ocr_count, 0);
    assert!(!result.visual_text_detected);
}

#[tokio::test]
async fn test_budget_caps_the_crawl() {
    let app = Router::new()
        .route("/", get(|| async { page(r#"<a href="/p1">on</a>"#) }))
        .route("/p1", get(|| async { page(r#"<a href="/p2">on</a>"#) }))
        .route("/p2", get(|| async { page(r#"<a href="/p3">on</a>"#) }))
        .route("/p3", get(|| async { page("<p>end</p>") }));
    let base = serve(app).await;

    let outcome = Scan::new(&base, "anything")
        .with_max_pages(2)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.pages_scanned, 2);
    assert_eq!(outcome.termination, Termination::BudgetExhausted);
}

#[tokio::test]
async fn test_cycles_are_visited_once() {
    let app = Router::new()
        .route(
            "/",
            get(|| async { page(r#"<a href="/">self</a><a href="/a">over</a>"#) }),
        )
        .route(
            "/a",
            get(|| async { page(r#"<a href="/">back</a><a href="/a">self</a>"#) }),
        );
    let base = serve(app).await;

    let outcome = Scan::new(&base, "anything")
        .with_max_pages(10)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.pages_scanned, 2);
    assert_eq!(outcome.termination, Termination::Completed);
}

#[tokio::test]
async fn test_stays_on_the_seed_origin() {
    let app = Router::new()
        .route(
            "/",
            get(|| async {
                page(
                    r#"<p>kids</p>
                       <a href="https://elsewhere.example.org/kids">away</a>
                       <a href="/about">about</a>"#,
                )
            }),
        )
        .route("/about", get(|| async { page("<p>more kids</p>") }));
    let base = serve(app).await;

    let outcome = Scan::new(&base, "kids")
        .with_max_pages(10)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.pages_scanned, 2);
    assert_eq!(outcome.termination, Termination::Completed);
    assert_eq!(outcome.results.len(), 2);
    for result in &outcome.results {
        assert!(result.url.starts_with(&base));
    }
}

#[tokio::test]
async fn test_error_pages_still_get_scanned() {
    let app = Router::new().route(
        "/",
        get(|| async { (StatusCode::NOT_FOUND, page("<p>lost kids page</p>")) }),
    );
    let base = serve(app).await;

    let outcome = Scan::new(&base, "kids").run().await.unwrap();

    assert_eq!(outcome.pages_scanned, 1);
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].text_count, 1);
}

#[tokio::test]
async fn test_broken_images_never_fail_the_scan() {
    let app = Router::new().route(
        "/",
        get(|| async { page(r#"<img src="/missing.png"><img src="/also-gone.jpg">"#) }),
    );
    let base = serve(app).await;

    let outcome = Scan::new(&base, "kids")
        .with_mode(SearchMode::ImagesOnly)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.pages_scanned, 1);
    assert!(outcome.results.is_empty());
    assert_eq!(outcome.termination, Termination::Completed);
}

#[tokio::test]
async fn test_visual_detection_flags_text_like_images() {
    let png = text_like_png();
    let app = Router::new()
        .route("/", get(|| async { page(r#"<img src="/banner.png">"#) }))
        .route(
            "/banner.png",
            get(move || {
                let bytes = png.clone();
                async move { ([(header::CONTENT_TYPE, "image/png")], bytes) }
            }),
        );
    let base = serve(app).await;

    let outcome = Scan::new(&base, "zxqv")
        .with_mode(SearchMode::ImagesOnly)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.pages_scanned, 1);
    assert_eq!(outcome.results.len(), 1);

    let result = &outcome.results[0];
    assert!(result.visual_text_detected);
    assert_eq!(result.text_count, 0);
    assert_eq!(result.ocr_count, 0);
}

#[tokio::test]
async fn test_text_and_images_mode_counts_both() {
    let png = text_like_png();
    let app = Router::new()
        .route(
            "/",
            get(|| async { page(r#"<p>kids kids kidskids</p><img src="/banner.png">"#) }),
        )
        .route(
            "/banner.png",
            get(move || {
                let bytes = png.clone();
                async move { ([(header::CONTENT_TYPE, "image/png")], bytes) }
            }),
        );
    let base = serve(app).await;

    let outcome = Scan::new(&base, "kids")
        .with_mode(SearchMode::TextAndImages)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.results.len(), 1);

    let result = &outcome.results[0];
    assert_eq!(result.text_count, 4);
    assert!(result.visual_text_detected);
    assert_eq!(result.total_count(), 4);
}

#[tokio::test]
async fn test_images_only_mode_ignores_page_text() {
    let app = Router::new()
        .route(
            "/",
            get(|| async { page(r#"<p>kids everywhere</p><a href="/a">on</a>"#) }),
        )
        .route("/a", get(|| async { page("<p>kids again</p>") }));
    let base = serve(app).await;

    let outcome = Scan::new(&base, "kids")
        .with_mode(SearchMode::ImagesOnly)
        .with_max_pages(10)
        .run()
        .await
        .unwrap();

    // Text matches are ignored, but link discovery still walks the site.
    assert_eq!(outcome.pages_scanned, 2);
    assert!(outcome.results.is_empty());
}

#[tokio::test]
async fn test_progress_reports_every_page_in_order() {
    let app = Router::new()
        .route("/", get(|| async { page(r#"<a href="/p1">on</a>"#) }))
        .route("/p1", get(|| async { page(r#"<a href="/p2">on</a>"#) }))
        .route("/p2", get(|| async { page("<p>end</p>") }));
    let base = serve(app).await;

    let events: Arc<Mutex<Vec<(usize, usize, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();

    let outcome = Scan::new(&base, "anything")
        .with_max_pages(5)
        .on_progress(move |progress| {
            sink.lock()
                .unwrap()
                .push((progress.scanned, progress.budget, progress.url.clone()));
        })
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.pages_scanned, 3);

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].0, 1);
    assert_eq!(events[0].1, 5);
    assert_eq!(events[0].2, format!("{base}/"));
    for (i, event) in events.iter().enumerate() {
        assert_eq!(event.0, i + 1);
        assert_eq!(event.1, 5);
    }
}

#[tokio::test]
async fn test_cancellation_stops_between_pages() {
    let app = Router::new()
        .route("/", get(|| async { page(r#"<a href="/p1">on</a>"#) }))
        .route("/p1", get(|| async { page(r#"<a href="/p2">on</a>"#) }))
        .route("/p2", get(|| async { page("<p>end</p>") }));
    let base = serve(app).await;

    let scan = Scan::new(&base, "anything").with_max_pages(10);
    let cancel = scan.cancel_token();

    let outcome = scan
        .on_progress(move |_| cancel.cancel())
        .run()
        .await
        .unwrap();

    // The page in flight finishes, then the token is noticed.
    assert_eq!(outcome.pages_scanned, 1);
    assert_eq!(outcome.termination, Termination::Cancelled);
}

#[tokio::test]
async fn test_config_file_drives_the_scan() {
    let app = Router::new()
        .route(
            "/",
            get(|| async { page(r#"<p>kids</p><a href="/about">about</a>"#) }),
        )
        .route("/about", get(|| async { page("<p>more kids here</p>") }));
    let base = serve(app).await;

    let config_path =
        std::env::temp_dir().join(format!("site-sweep-config-{}.json", std::process::id()));
    std::fs::write(
        &config_path,
        format!(r#"{{"seed_url": "{base}", "phrase": "kids", "max_pages": 5}}"#),
    )
    .unwrap();

    // Seed, phrase and budget come from the file; the timeout from the builder.
    let outcome = Scan::with_config_file(&config_path)
        .unwrap()
        .with_timeout_secs(5)
        .run()
        .await
        .unwrap();

    let _ = std::fs::remove_file(&config_path);

    assert_eq!(outcome.pages_scanned, 2);
    assert_eq!(outcome.termination, Termination::Completed);
    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.results[0].text_count, 1);
}
