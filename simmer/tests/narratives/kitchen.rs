use std::time::Duration;

use simmer::kitchen::{
    bean_dinner_pipeline, cook_bean_souffle, cook_full_dinner, plan_and_cook_dinner, DINNER_SERVED,
};
use simmer::{HarnessConfig, HarnessContext, OperationError, RecordingSink, TokioProviders};
use simmer_sim::{ScriptedRandomProvider, SimClock, SimProviders};

fn context(
    clock: &SimClock,
    random: ScriptedRandomProvider,
) -> (HarnessContext<SimProviders<ScriptedRandomProvider>>, RecordingSink) {
    let sink = RecordingSink::new();
    let ctx = HarnessContext::new(
        SimProviders::with_random(clock, random),
        HarnessConfig::default(),
    )
    .with_sink(sink.shared());
    (ctx, sink)
}

#[tokio::test]
async fn test_plan_and_cook_dinner() {
    let clock = SimClock::new();
    let (ctx, sink) = context(&clock, ScriptedRandomProvider::new().with_indices([0]));

    let dinner = plan_and_cook_dinner(&ctx);
    assert_eq!(
        dinner.stage_names(),
        ["brainstorm_dinner", "bean_dinner"]
    );

    let served = clock.run_until_complete(dinner.run(())).await;
    assert_eq!(served, Ok(DINNER_SERVED.to_string()));
    assert_eq!(
        sink.lines(),
        vec![
            "I have to decide what's for dinner...",
            "Should I make salad...?",
            "Should I make ramen...?",
            "Should I make eggs...?",
            "Should I make chicken...?",
            "I bought kidney beans because they were on sale.",
            "Time to soak the beans.",
            "... The kidney beans are softened.",
            "Time to cook the beans.",
            "... The beans are cooked!",
        ]
    );
}

#[tokio::test]
async fn test_bad_bean_pick_stops_dinner() {
    let clock = SimClock::new();
    let (ctx, sink) = context(&clock, ScriptedRandomProvider::new().with_indices([42]));

    let err = clock
        .run_until_complete(bean_dinner_pipeline(&ctx).run(()))
        .await
        .unwrap_err();

    assert!(err.is_internal());
    assert!(!sink.contains("Time to soak the beans."));
}

#[tokio::test]
async fn test_souffle_follows_script() {
    let clock = SimClock::new();
    let (ctx, sink) = context(
        &clock,
        ScriptedRandomProvider::new().with_outcomes([false, true]),
    );
    let souffle = cook_bean_souffle(&ctx);

    let ruined = clock.run_until_complete(souffle.invoke(())).await;
    let baked = clock.run_until_complete(souffle.invoke(())).await;

    assert_eq!(ruined, Err(OperationError::rejected("Dinner is ruined!")));
    assert_eq!(baked, Ok("Bean Souffle".to_string()));
    assert_eq!(
        sink.lines(),
        vec![
            "Fingers crossed... Putting the Bean Souffle in the oven",
            "Fingers crossed... Putting the Bean Souffle in the oven",
        ]
    );
}

#[tokio::test]
async fn test_souffle_probability_from_config() {
    let clock = SimClock::new();
    let config = HarnessConfig {
        souffle_success_probability: 1.0,
        ..HarnessConfig::default()
    };
    let ctx = HarnessContext::new(SimProviders::new(&clock, 77), config);
    let souffle = cook_bean_souffle(&ctx);

    for _ in 0..10 {
        let result = clock.run_until_complete(souffle.invoke(())).await;
        assert_eq!(result, Ok("Bean Souffle".to_string()));
    }
}

#[tokio::test]
async fn test_full_dinner_runs_concurrently() {
    let clock = SimClock::new();
    let (ctx, _sink) = context(
        &clock,
        ScriptedRandomProvider::new().with_latencies([400, 100, 300, 200]),
    );

    let dishes = clock.run_until_complete(cook_full_dinner(&ctx)).await;

    assert_eq!(
        dishes,
        Ok(vec![
            "beans".to_string(),
            "broccoli".to_string(),
            "rice".to_string(),
            "chicken".to_string(),
        ])
    );
    // Concurrent dishes finish with the slowest one
    assert_eq!(clock.now(), Duration::from_millis(400));
}

#[tokio::test(start_paused = true)]
async fn test_full_dinner_on_tokio_time() {
    let ctx = HarnessContext::new(TokioProviders::new(), HarnessConfig::default())
        .with_sink(RecordingSink::new().shared());
    let start = tokio::time::Instant::now();

    let dishes = cook_full_dinner(&ctx).await.unwrap();

    assert_eq!(dishes, ["beans", "broccoli", "rice", "chicken"]);
    assert!(start.elapsed() < Duration::from_millis(2000));
}
