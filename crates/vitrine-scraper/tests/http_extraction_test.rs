use httpmock::prelude::*;
use vitrine_core::{AppConfig, SiteConfig};
use vitrine_scraper::{extract_many, extract_one, make_reusable_extractor, ErrorKind};

const PAGE: &str = r#"<html><body>
  <div class="product-info-main">
    <h1 class="page-title"><span class="base">Vagabond Vol. 1</span></h1>
    <div class="price-box">
      <span class="old-price"><span class="price">R$ 44,90</span></span>
      <span class="special-price"><span class="price">R$ 35,92</span></span>
    </div>
    <div class="stock unavailable"><span>Esgotado</span></div>
  </div>
  <table id="product-attribute-specs-table">
    <tr><th>Referência</th><td data-th="Referência">VAGAB001</td></tr>
  </table>
</body></html>"#;

/// Configuration whose store domain is the local mock server.
fn local_config() -> AppConfig {
    AppConfig {
        site: SiteConfig {
            domain: "127.0.0.1".to_string(),
            base_url: "http://127.0.0.1".to_string(),
            ..SiteConfig::default()
        },
        ..AppConfig::default()
    }
}

#[tokio::test]
async fn test_extract_one_over_http() {
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/vagabond-vol-1");
        then.status(200)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(PAGE);
    });

    let record = extract_one(&server.url("/vagabond-vol-1"), &local_config())
        .await
        .expect("record");

    page.assert();
    assert_eq!(record.title(), "Vagabond Vol. 1");
    assert!((record.full_price() - 44.90).abs() < 1e-9);
    assert!((record.current_price() - 35.92).abs() < 1e-9);
    assert!(!record.in_stock());
    assert_eq!(record.id(), "VAGAB001");
}

#[tokio::test]
async fn test_extract_one_reports_http_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/removido");
        then.status(410);
    });

    let err = extract_one(&server.url("/removido"), &local_config())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ScrapingFailed);
    assert_eq!(err.status(), Some(410));
}

#[tokio::test]
async fn test_extract_many_over_http_in_order() {
    let server = MockServer::start();
    let found = server.mock(|when, then| {
        when.method(GET).path("/vagabond-vol-1");
        then.status(200).body(PAGE);
    });
    let empty = server.mock(|when, then| {
        when.method(GET).path("/busca");
        then.status(200).body("<html><h1>Resultados da busca</h1></html>");
    });

    let urls = vec![
        server.url("/vagabond-vol-1"),
        "https://panini.com.br/vagabond-vol-1".to_string(),
        server.url("/busca"),
    ];
    let batch = extract_many(&urls, &local_config()).await;

    found.assert();
    empty.assert();
    assert_eq!(batch.total_processed(), 3);
    assert_eq!(batch.success_count(), 1);
    let kinds: Vec<_> = batch.failures().iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![ErrorKind::InvalidUrl, ErrorKind::ProductNotFound]);
}

#[tokio::test]
async fn test_unbuildable_client_still_classifies_urls() {
    let mut config = local_config();
    config
        .http
        .headers
        .insert("Bad Header".to_string(), "x".to_string());
    assert!(make_reusable_extractor(&config).is_err());

    let batch = extract_many(&["not-a-url", "http://127.0.0.1/x"], &config).await;
    let kinds: Vec<_> = batch.failures().iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![ErrorKind::InvalidUrl, ErrorKind::ScrapingFailed]);

    let err = extract_one("not-a-url", &config).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidUrl);
}
