//! Integration tests for mirror-fallback fetching against local stub
//! mirrors.

use argorag_core::config::IngestConfig;
use argorag_core::error::ArgoragError;
use argorag_ingest::MirrorFetcher;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Spawn a stub mirror answering every file request with a fixed status
/// and body, counting hits.
async fn spawn_mirror(status: StatusCode, body: &'static str, hits: Arc<AtomicUsize>) -> String {
    let app = Router::new().route(
        "/dac/{*file}",
        get(move || {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                (status, body)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/dac", addr)
}

fn config(mirrors: Vec<String>, cache_dir: &TempDir) -> IngestConfig {
    IngestConfig {
        mirrors,
        cache_dir: cache_dir.path().to_path_buf(),
        fetch_timeout: Duration::from_secs(5),
        ..IngestConfig::default()
    }
}

#[tokio::test]
async fn test_first_successful_mirror_short_circuits() {
    let hits_404 = Arc::new(AtomicUsize::new(0));
    let hits_ok = Arc::new(AtomicUsize::new(0));
    let hits_spare = Arc::new(AtomicUsize::new(0));

    let m1 = spawn_mirror(StatusCode::NOT_FOUND, "", hits_404.clone()).await;
    let m2 = spawn_mirror(StatusCode::OK, "netcdf bytes", hits_ok.clone()).await;
    let m3 = spawn_mirror(StatusCode::OK, "never served", hits_spare.clone()).await;

    let cache = TempDir::new().unwrap();
    let fetcher = MirrorFetcher::new(&config(vec![m1, m2, m3], &cache)).unwrap();

    let path = fetcher.fetch("aoml/4902911/profiles/R4902911_001.nc").await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "netcdf bytes");
    assert_eq!(hits_404.load(Ordering::SeqCst), 1);
    assert_eq!(hits_ok.load(Ordering::SeqCst), 1);
    // Remaining mirrors are never tried after the first success
    assert_eq!(hits_spare.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cache_hit_makes_no_network_requests() {
    let hits = Arc::new(AtomicUsize::new(0));
    let mirror = spawn_mirror(StatusCode::OK, "netcdf bytes", hits.clone()).await;

    let cache = TempDir::new().unwrap();
    let fetcher = MirrorFetcher::new(&config(vec![mirror], &cache)).unwrap();

    let first = fetcher.fetch("aoml/4902911/profiles/R4902911_001.nc").await.unwrap();
    let second = fetcher.fetch("aoml/4902911/profiles/R4902911_001.nc").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_all_mirrors_exhausted_is_fetch_error() {
    let hits_a = Arc::new(AtomicUsize::new(0));
    let hits_b = Arc::new(AtomicUsize::new(0));

    let m1 = spawn_mirror(StatusCode::NOT_FOUND, "", hits_a.clone()).await;
    let m2 = spawn_mirror(StatusCode::INTERNAL_SERVER_ERROR, "", hits_b.clone()).await;

    let cache = TempDir::new().unwrap();
    let fetcher = MirrorFetcher::new(&config(vec![m1, m2], &cache)).unwrap();

    let err = fetcher.fetch("aoml/4902911/profiles/R4902911_001.nc").await.unwrap_err();
    match err {
        ArgoragError::Fetch { file, mirrors_tried } => {
            assert_eq!(file, "aoml/4902911/profiles/R4902911_001.nc");
            assert_eq!(mirrors_tried, 2);
        }
        other => panic!("expected Fetch error, got {:?}", other),
    }

    // A failed fetch leaves no cache entry a later check would accept
    assert!(std::fs::read_dir(cache.path()).unwrap().next().is_none());
}
