use std::time::Duration;

use simmer::orders::fulfillment_pipeline;
use simmer::{
    HarnessConfig, HarnessContext, InMemoryCatalog, OperationError, Order, OrderLine, OutcomeRule,
    Pipeline, RecordingSink, SharedSink, SimulatedOperation,
};
use simmer_core::RandomProvider;
use simmer_sim::{ScriptedRandomProvider, SimClock, SimProviders};

/// An operation that announces its name when invoked and appends it to the input.
fn step<R: RandomProvider + 'static>(
    providers: &SimProviders<R>,
    sink: SharedSink,
    name: &'static str,
) -> SimulatedOperation<SimProviders<R>, String, String> {
    SimulatedOperation::builder(name, providers.clone())
        .sink(sink)
        .announce(move |_| format!("start {name}"))
        .produce(move |trail: &String| Ok(format!("{trail}{name}")))
}

#[tokio::test]
async fn test_stages_run_in_order() {
    let clock = SimClock::new();
    let providers = SimProviders::with_random(
        &clock,
        ScriptedRandomProvider::new().with_latencies([300, 200, 100]),
    );
    let sink = RecordingSink::new();

    let pipeline = Pipeline::start("abc", step(&providers, sink.shared(), "a"))
        .then(step(&providers, sink.shared(), "b"))
        .then(step(&providers, sink.shared(), "c"));

    assert_eq!(pipeline.stage_names(), ["a", "b", "c"]);

    let result = clock.run_until_complete(pipeline.run(String::new())).await;
    assert_eq!(result, Ok("abc".to_string()));
    assert_eq!(sink.lines(), vec!["start a", "start b", "start c"]);
    // Sequential stages add their latencies
    assert_eq!(clock.now(), Duration::from_millis(600));
}

#[tokio::test]
async fn test_failure_short_circuits() {
    let clock = SimClock::new();
    let random = ScriptedRandomProvider::new().with_latencies([100, 100, 100]);
    let providers = SimProviders::with_random(&clock, random.clone());
    let sink = RecordingSink::new();

    let failing = SimulatedOperation::builder("b", providers.clone())
        .sink(sink.shared())
        .announce(|_| "start b".to_string())
        .outcome(OutcomeRule::predicate(|_: &String| Ok(false)))
        .reject_with(|trail: &String| format!("b refused after {trail}"))
        .produce(|trail: &String| Ok(trail.clone()));

    let pipeline = Pipeline::start("abc", step(&providers, sink.shared(), "a"))
        .then(failing)
        .then(step(&providers, sink.shared(), "c"));

    let result = clock.run_until_complete(pipeline.run(String::new())).await;

    assert_eq!(result, Err(OperationError::rejected("b refused after a")));
    assert!(!sink.contains("start c"));
    // The third latency was never drawn
    assert_eq!(random.latency_draws(), 2);
    assert_eq!(random.remaining(), 1);
}

#[tokio::test]
async fn test_internal_fault_passes_through() {
    let clock = SimClock::new();
    let providers = SimProviders::new(&clock, 3);
    let sink = RecordingSink::new();

    let broken = SimulatedOperation::builder("broken", providers.clone())
        .produce(|_: &String| -> Result<String, simmer::InternalError> {
            Err(simmer::InternalError::new("lookup table missing"))
        });

    let pipeline =
        Pipeline::start("faulty", broken).then(step(&providers, sink.shared(), "after"));

    let err = clock
        .run_until_complete(pipeline.run(String::new()))
        .await
        .unwrap_err();
    assert_eq!(err, OperationError::internal("lookup table missing"));
    assert!(sink.lines().is_empty());
}

#[tokio::test]
async fn test_adapter_reshapes_output() {
    let clock = SimClock::new();
    let providers = SimProviders::new(&clock, 11);

    let count = SimulatedOperation::builder("count", providers.clone())
        .produce(|s: &String| Ok(s.len()));
    let double = SimulatedOperation::builder("double", providers.clone())
        .produce(|n: &u64| Ok(n * 2));

    let pipeline = Pipeline::start("measure", count).then_adapted(double, |len: usize| len as u64);

    let result = clock
        .run_until_complete(pipeline.run("simmer".to_string()))
        .await;
    assert_eq!(result, Ok(12));
}

#[tokio::test]
async fn test_nested_pipeline_is_one_stage() {
    let clock = SimClock::new();
    let providers = SimProviders::new(&clock, 5);
    let sink = RecordingSink::new();

    let inner = Pipeline::start("inner", step(&providers, sink.shared(), "b"))
        .then(step(&providers, sink.shared(), "c"));
    let outer = Pipeline::start("outer", step(&providers, sink.shared(), "a"))
        .then(inner)
        .then(step(&providers, sink.shared(), "d"));

    assert_eq!(outer.stage_names(), ["a", "inner", "d"]);
    assert_eq!(outer.len(), 3);
    assert!(!outer.is_empty());

    let result = clock.run_until_complete(outer.run(String::new())).await;
    assert_eq!(result, Ok("abcd".to_string()));
}

#[tokio::test]
async fn test_pipeline_can_run_again() {
    let clock = SimClock::new();
    let providers = SimProviders::new(&clock, 8);
    let sink = RecordingSink::new();

    let pipeline = Pipeline::start("twice", step(&providers, sink.shared(), "x"));

    let first = clock.run_until_complete(pipeline.run("1".to_string())).await;
    let second = clock.run_until_complete(pipeline.run("2".to_string())).await;
    assert_eq!(first, Ok("1x".to_string()));
    assert_eq!(second, Ok("2x".to_string()));
}

#[tokio::test]
async fn test_concurrent_runs_do_not_interfere() {
    let clock = SimClock::new();
    // Draw order: first run's inventory, second run's inventory, then the
    // first run's payment and shipping
    let random = ScriptedRandomProvider::new().with_latencies([100, 50, 200, 300]);
    let ctx = HarnessContext::new(
        SimProviders::with_random(&clock, random.clone()),
        HarnessConfig::default(),
    )
    .with_sink(RecordingSink::new().shared());
    let pipeline = fulfillment_pipeline(&ctx, InMemoryCatalog::storefront());

    let pants = Order {
        items: vec![OrderLine::new("pants", 1)],
        giftcard_balance: 20.0,
    };
    let bags = Order {
        items: vec![OrderLine::new("bags", 9999)],
        giftcard_balance: 1_000_000.0,
    };

    let (shipped, sold_out) = clock
        .run_until_complete(async {
            tokio::join!(pipeline.run(pants.clone()), pipeline.run(bags))
        })
        .await;

    assert_eq!(shipped.map(|shipment| shipment.order), Ok(pants));
    assert_eq!(
        sold_out,
        Err(OperationError::rejected(
            "The order could not be completed because some items are sold out."
        ))
    );
    // Runs overlap: the clock ends at the slower run (100 + 200 + 300), not the sum of both
    assert_eq!(clock.now(), Duration::from_millis(600));
    assert_eq!(random.latency_draws(), 4);
}
