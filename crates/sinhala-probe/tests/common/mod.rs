//! Shared driver for the live suites.
//!
//! Every case launches its own browser, opens the translator and runs one
//! catalog entry. Point `SINHALA_PROBE_URL` at a mirror and `CHROMIUM_PATH`
//! at a local binary as needed.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use sinhala_probe::{launch_session, run_case, Catalog, ProbeConfig};

/// Run one case end to end and panic with its verdict on failure
pub async fn run_live(case_id: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("sinhala_probe=info")
        .with_test_writer()
        .try_init();

    let catalog = Catalog::load().expect("embedded catalog should parse");
    let sample = catalog
        .by_id(case_id)
        .unwrap_or_else(|| panic!("{case_id} is not in the catalog"));
    let config = ProbeConfig::default().apply_env();

    let mut session = launch_session(config).await.expect("browser should launch");
    let report = run_case(&mut session, sample).await;
    session.close().await.expect("browser should close");

    let report = report.expect("case should run to completion");
    assert!(report.passed(), "{}", report.verdict);
}

/// Declare one ignored `#[tokio::test]` per case id
macro_rules! live_cases {
    ($($name:ident => $id:literal),+ $(,)?) => {
        $(
            #[tokio::test]
            #[ignore = "drives the live translator site in a real browser"]
            async fn $name() {
                common::run_live($id).await;
            }
        )+
    };
}
