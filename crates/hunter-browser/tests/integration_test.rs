use hunter_browser::{BrowserEngine, FetchOptions, PageFetcher};
use hunter_core::{BrowserConfig, CredentialsConfig};

fn engine() -> BrowserEngine {
    BrowserEngine::new(
        BrowserConfig::default(),
        CredentialsConfig::default(),
        "linkedin.com",
    )
    .unwrap()
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_fetch_renders_markdown() {
    let engine = engine();

    let page = engine
        .fetch("https://example.com", &FetchOptions::wait_for("h1"))
        .await
        .unwrap();
    assert!(page.html.contains("<h1>"));
    assert!(page.markdown.contains("# Example Domain"));
    assert_eq!(page.title, "Example Domain");
    assert!(page.url.starts_with("https://example.com"));

    engine.close().await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_missing_selector_times_out() {
    let engine = engine();

    let options = FetchOptions {
        wait_for_selector: Some("#does-not-exist".to_string()),
        timeout: Some(std::time::Duration::from_secs(2)),
    };
    assert!(engine.fetch("https://example.com", &options).await.is_err());

    engine.close().await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_forced_login_without_credentials_fails() {
    let engine = engine();
    assert!(engine.reauthenticate(true).await.is_err());
    engine.close().await.unwrap();
}
