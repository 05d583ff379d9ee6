//! End-to-end dataset build against a stub mirror serving real NetCDF
//! content: fetch, parse, and flatten, skipping entries the archive does
//! not have.

use argorag_core::config::IngestConfig;
use argorag_core::models::IndexEntry;
use argorag_ingest::{DatasetBuilder, MirrorFetcher};
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use chrono::{TimeZone, Utc};
use std::time::Duration;
use tempfile::TempDir;

const KNOWN_FILE: &str = "aoml/4902911/profiles/R4902911_001.nc";

/// Build a small profile file without PSAL and return its bytes.
fn profile_bytes() -> Vec<u8> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("profile.nc");
    {
        let mut file = netcdf::create(&path).unwrap();
        file.add_dimension("N_LEVELS", 3).unwrap();

        let mut pres = file.add_variable::<f64>("PRES", &["N_LEVELS"]).unwrap();
        pres.put_values(&[5.0, 10.0, 20.0], ..).unwrap();

        let mut temp = file.add_variable::<f64>("TEMP", &["N_LEVELS"]).unwrap();
        temp.put_values(&[18.2, 17.9, 16.5], ..).unwrap();
    }
    std::fs::read(&path).unwrap()
}

/// Spawn a stub mirror that serves `KNOWN_FILE` and 404s everything else.
async fn spawn_mirror(body: Vec<u8>) -> String {
    let app = Router::new().route(
        "/dac/{*file}",
        get(move |Path(file): Path<String>| {
            let body = body.clone();
            async move {
                if file == KNOWN_FILE {
                    (StatusCode::OK, body).into_response()
                } else {
                    StatusCode::NOT_FOUND.into_response()
                }
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

fn entry(file: &str) -> IndexEntry {
    IndexEntry {
        file: file.to_string(),
        date: Some(Utc.with_ymd_and_hms(2023, 1, 5, 9, 30, 12).unwrap()),
        date_update: None,
        latitude: Some(-14.5),
        longitude: Some(72.25),
        ocean: Some("I".to_string()),
        profiler_type: Some("846".to_string()),
        institution: Some("AO".to_string()),
    }
}

#[tokio::test]
async fn test_build_skips_missing_files_and_flattens_the_rest() {
    let mirror = spawn_mirror(profile_bytes()).await;
    let cache = TempDir::new().unwrap();

    let config = IngestConfig {
        mirrors: vec![mirror],
        cache_dir: cache.path().to_path_buf(),
        fetch_timeout: Duration::from_secs(5),
        ..IngestConfig::default()
    };
    let fetcher = MirrorFetcher::new(&config).unwrap();
    let builder = DatasetBuilder::new(&fetcher);

    let entries = vec![
        entry(KNOWN_FILE),
        entry("aoml/4902911/profiles/R4902911_999.nc"),
        entry(""),
    ];

    let output = builder.build(&entries).await;

    // One entry fetched and parsed, one skipped on 404, the empty file
    // reference ignored entirely
    assert_eq!(output.processed, 1);
    assert_eq!(output.skipped, 1);

    // One row per pressure sample, salinity null throughout (no PSAL)
    assert_eq!(output.records.len(), 3);
    assert!(output.records.iter().all(|r| r.salinity.is_none()));
    assert!(output.records.iter().all(|r| r.float_file == KNOWN_FILE));
    assert_eq!(output.records[0].pressure, 5.0);
    assert_eq!(output.records[0].temperature, Some(18.2));

    // The parsed series is retained for depth-series persistence
    assert!(output.series.contains_key(KNOWN_FILE));
}
