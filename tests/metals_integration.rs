//! Integration tests against the live metals.dev API.
//!
//! All tests are `#[ignore]` because they require network access and an API
//! key in `METALS_DEV_API_KEY` (a `.env` file is honored).
//!
//! Run with:
//! ```bash
//! cargo test --test metals_integration -- --ignored
//! ```

use std::time::Duration;

use futures_util::StreamExt;
use tokio::time::timeout;

use bullion::prelude::*;

const TEST_TIMEOUT: Duration = Duration::from_secs(30);

fn client() -> BullionClient {
    dotenvy::dotenv().ok();
    BullionClient::from_env()
        .retry_policy(RetryPolicy::Idempotent)
        .build()
        .expect("client should build")
}

#[tokio::test]
#[ignore]
async fn test_latest_quote() {
    let quote = client().quotes().latest().await.expect("latest should succeed");

    for metal in Metal::ALL {
        let price = quote.price(metal).expect("every metal is quoted");
        assert!(price > 0.0, "{} price should be positive", metal);
    }
    assert_eq!(quote.rate(&CurrencyCode::usd()), Some(1.0));

    let inr = quote.convert(Metal::Gold, &DisplaySelection::default());
    assert!(inr.is_ok(), "INR/g conversion should be available: {:?}", inr);
}

#[tokio::test]
#[ignore]
async fn test_recent_history() {
    let series = client().history().recent().await.expect("time series should succeed");
    assert!(!series.is_empty());

    let rows = series.rows(&DisplaySelection::new("USD", MassUnit::TroyOunce));
    let dates: Vec<_> = rows.iter().map(HistoryRow::date).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted, "rows should be newest first");
}

#[tokio::test]
#[ignore]
async fn test_bad_key_surfaces_as_fallback() {
    let client = BullionClient::builder()
        .api_key("not-a-real-key")
        .build()
        .expect("client should build");
    let mut dashboard = client.into_dashboard(DisplaySelection::default());
    dashboard.start();

    let event = {
        let events = dashboard.live().events();
        tokio::pin!(events);
        timeout(TEST_TIMEOUT, events.next())
            .await
            .expect("timed out waiting for first refresh")
            .expect("event stream closed")
    };

    assert!(matches!(event, LiveEvent::Fallback(_)));
    let snap = dashboard.live_snapshot().await;
    assert_eq!(snap.quote, Some(fallback_quote()));
    assert!(snap.error.is_some());

    dashboard.stop().await;
}
