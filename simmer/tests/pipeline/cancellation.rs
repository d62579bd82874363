use std::time::Duration;

use simmer::{OperationError, Pipeline, RecordingSink, SimulatedOperation};
use simmer_sim::{ScriptedRandomProvider, SimClock, SimProviders};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_cancel_mid_pipeline() {
    let clock = SimClock::new();
    let providers = SimProviders::with_random(
        &clock,
        ScriptedRandomProvider::new().with_latencies([1000, 1000, 1000]),
    );
    let sink = RecordingSink::new();

    let make = |name: &'static str| {
        SimulatedOperation::builder(name, providers.clone())
            .sink(sink.shared())
            .announce(move |_| format!("start {name}"))
            .produce(|_: &()| Ok(()))
    };
    let pipeline = Pipeline::start("slow", make("a"))
        .then(make("b"))
        .then(make("c"));

    let token = CancellationToken::new();
    let result = clock
        .run_until_complete(async {
            let cancel_later = async {
                let _ = clock.sleep(Duration::from_millis(1500)).await;
                token.cancel();
            };
            let (result, ()) = tokio::join!(pipeline.run_with_cancel((), &token), cancel_later);
            result
        })
        .await;

    assert_eq!(result, Err(OperationError::Cancelled));
    assert_eq!(sink.lines(), vec!["start a", "start b"]);
    // The cancelled stage's timer was abandoned, not waited out
    assert_eq!(clock.now(), Duration::from_millis(1500));
    assert!(!clock.has_pending_timers());
}

#[tokio::test]
async fn test_precancelled_run_stops_at_first_stage() {
    let clock = SimClock::new();
    let providers = SimProviders::new(&clock, 1);

    let produced = std::rc::Rc::new(std::cell::Cell::new(false));
    let flag = produced.clone();
    let op = SimulatedOperation::builder("only", providers).produce(move |_: &()| {
        flag.set(true);
        Ok(())
    });
    let pipeline = Pipeline::start("precancelled", op);

    let token = CancellationToken::new();
    token.cancel();

    let result = clock
        .run_until_complete(pipeline.run_with_cancel((), &token))
        .await;
    assert_eq!(result, Err(OperationError::Cancelled));
    assert!(!produced.get());
    assert_eq!(clock.now(), Duration::ZERO);
}
