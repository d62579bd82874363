use simmer_sim::SimClock;
use std::time::Duration;

#[tokio::test]
async fn test_basic_sleep() {
    let clock = SimClock::new();

    let sleep_future = clock.sleep(Duration::from_millis(100));

    // Nothing has fired yet
    assert_eq!(clock.now(), Duration::ZERO);
    assert_eq!(clock.pending_timer_count(), 1);

    clock.run_until_empty();

    assert_eq!(clock.now(), Duration::from_millis(100));
    sleep_future.await.unwrap();
}

#[tokio::test]
async fn test_multiple_sleeps_sequential() {
    let clock = SimClock::new();

    let sleep1 = clock.sleep(Duration::from_millis(50));
    clock.run_until_empty();
    sleep1.await.unwrap();
    assert_eq!(clock.now(), Duration::from_millis(50));

    // Later sleeps are relative to the current logical time
    let sleep2 = clock.sleep(Duration::from_millis(30));
    clock.run_until_empty();
    sleep2.await.unwrap();
    assert_eq!(clock.now(), Duration::from_millis(80));
}

#[tokio::test]
async fn test_multiple_sleeps_concurrent() {
    let clock = SimClock::new();

    let sleep1 = clock.sleep(Duration::from_millis(100));
    let sleep2 = clock.sleep(Duration::from_millis(50));
    let sleep3 = clock.sleep(Duration::from_millis(150));
    assert_eq!(clock.pending_timer_count(), 3);

    clock.run_until_empty();
    assert_eq!(clock.now(), Duration::from_millis(150));

    let (result1, result2, result3) = tokio::join!(sleep1, sleep2, sleep3);
    assert!(result1.is_ok());
    assert!(result2.is_ok());
    assert!(result3.is_ok());
}

#[tokio::test]
async fn test_sleep_zero_duration() {
    let clock = SimClock::new();

    let sleep_future = clock.sleep(Duration::ZERO);
    clock.run_until_empty();

    assert_eq!(clock.now(), Duration::ZERO);
    sleep_future.await.unwrap();
}

#[tokio::test]
async fn test_run_until_complete_chains_sleeps() {
    let clock = SimClock::new();
    let weak = clock.downgrade();

    let output = clock
        .run_until_complete(async move {
            for _ in 0..4 {
                weak.sleep(Duration::from_millis(250))?.await?;
            }
            Ok::<_, simmer_sim::TimeError>("done")
        })
        .await;

    assert_eq!(output, Ok("done"));
    assert_eq!(clock.now(), Duration::from_secs(1));
    assert_eq!(clock.timers_fired(), 4);
}

#[tokio::test]
async fn test_run_until_complete_without_sleeps() {
    let clock = SimClock::new();
    let value = clock.run_until_complete(async { 7 }).await;
    assert_eq!(value, 7);
    assert_eq!(clock.now(), Duration::ZERO);
}
