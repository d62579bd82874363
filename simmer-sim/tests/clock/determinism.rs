//! Same seed, same timeline.

use simmer_sim::{LatencySpec, Providers, RandomProvider, SimClock, SimProviders, TimeProvider};
use std::time::Duration;

/// Sleep for five sampled latencies and report the logical timestamps.
async fn sampled_timeline(seed: u64) -> Vec<Duration> {
    let clock = SimClock::new();
    let providers = SimProviders::new(&clock, seed);

    let inner = providers.clone();
    clock
        .run_until_complete(async move {
            let spec = LatencySpec::default();
            let mut stamps = Vec::new();
            for _ in 0..5 {
                let latency = inner.random().sample_latency(&spec);
                inner.time().sleep(latency).await.expect("clock alive");
                stamps.push(inner.time().now());
            }
            stamps
        })
        .await
}

#[tokio::test]
async fn test_same_seed_same_timeline() {
    let first = sampled_timeline(42).await;
    let second = sampled_timeline(42).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_timeline_bounded_by_latency_spec() {
    let stamps = sampled_timeline(9).await;
    assert_eq!(stamps.len(), 5);
    for pair in stamps.windows(2) {
        assert!(pair[1] >= pair[0]);
        assert!(pair[1] - pair[0] < Duration::from_millis(2000));
    }
}
