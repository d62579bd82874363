use simmer::orders::{check_inventory, fulfillment_pipeline, process_payment};
use simmer::{
    HarnessConfig, HarnessContext, InMemoryCatalog, OperationError, Order, OrderLine,
    RecordingSink,
};
use simmer_sim::{ScriptedRandomProvider, SimClock, SimProviders};

fn order(items: &[(&str, u32)], giftcard_balance: f64) -> Order {
    Order {
        items: items
            .iter()
            .map(|(item, quantity)| OrderLine::new(*item, *quantity))
            .collect(),
        giftcard_balance,
    }
}

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
async fn test_order_total() {
    let clock = SimClock::new();
    let (ctx, _sink) = context(&clock, ScriptedRandomProvider::new());
    let inventory = check_inventory(&ctx, InMemoryCatalog::storefront());

    let priced = clock
        .run_until_complete(inventory.invoke(order(&[("sunglasses", 2), ("pants", 1)], 100.0)))
        .await
        .unwrap();

    assert!((priced.total - 27.97).abs() < 1e-9);
}

#[tokio::test]
async fn test_sold_out_never_reaches_payment() {
    let clock = SimClock::new();
    let random = ScriptedRandomProvider::new();
    let (ctx, sink) = context(&clock, random.clone());
    let pipeline = fulfillment_pipeline(&ctx, InMemoryCatalog::storefront());

    let result = clock
        .run_until_complete(pipeline.run(order(&[("bags", 9999)], 1_000_000.0)))
        .await;

    assert_eq!(
        result,
        Err(OperationError::rejected(
            "The order could not be completed because some items are sold out."
        ))
    );
    assert!(!sink.contains("Payment processed"));
    assert!(!sink.contains("Generating shipping label."));
    // Only the inventory stage ever sampled a latency
    assert_eq!(random.latency_draws(), 1);
}

#[tokio::test]
async fn test_insufficient_giftcard() {
    let clock = SimClock::new();
    let (ctx, sink) = context(&clock, ScriptedRandomProvider::new());
    let pipeline = fulfillment_pipeline(&ctx, InMemoryCatalog::storefront());

    let result = clock
        .run_until_complete(pipeline.run(order(&[("sunglasses", 2), ("pants", 1)], 10.0)))
        .await;

    assert_eq!(
        result,
        Err(OperationError::rejected(
            "Cannot process order: giftcard balance was insufficient."
        ))
    );
    assert!(sink.contains("The total cost of the order is 27.97."));
    assert!(!sink.contains("Generating shipping label."));
}

#[tokio::test]
async fn test_order_ships() {
    let clock = SimClock::new();
    let (ctx, sink) = context(&clock, ScriptedRandomProvider::new());
    let pipeline = fulfillment_pipeline(&ctx, InMemoryCatalog::storefront());
    let placed = order(&[("sunglasses", 2), ("pants", 1)], 100.0);

    let shipment = clock
        .run_until_complete(pipeline.run(placed.clone()))
        .await
        .unwrap();

    assert_eq!(shipment.order, placed);
    assert!(shipment.tracking_number < 1_000_000);
    assert!(sink.contains(" - Remaining Balance: 72.03"));
    assert_eq!(
        sink.lines().last().map(String::as_str),
        Some("Generating shipping label.")
    );
}

#[tokio::test]
async fn test_unknown_item_is_internal() {
    let clock = SimClock::new();
    let (ctx, _sink) = context(&clock, ScriptedRandomProvider::new());
    let pipeline = fulfillment_pipeline(&ctx, InMemoryCatalog::storefront());

    let err = clock
        .run_until_complete(pipeline.run(order(&[("hats", 1)], 100.0)))
        .await
        .unwrap_err();

    assert!(err.is_internal());
    assert_eq!(
        err,
        OperationError::internal("item 'hats' is not in the catalog")
    );
}

#[tokio::test]
async fn test_payment_rejection_ignores_random_outcomes() {
    // Predicate rules never consult the random provider for the outcome
    let clock = SimClock::new();
    let random = ScriptedRandomProvider::new().with_outcomes([true]);
    let (ctx, _sink) = context(&clock, random.clone());

    let priced = simmer::PricedOrder {
        order: order(&[("bags", 1)], 1.0),
        total: 12.99,
    };
    let result = clock
        .run_until_complete(process_payment(&ctx).invoke(priced))
        .await;

    assert!(result.unwrap_err().is_simulation());
    assert_eq!(random.outcome_draws(), 0);
}

#[tokio::test]
async fn test_same_seed_same_tracking_number() {
    let mut tracking = Vec::new();
    for _ in 0..2 {
        let clock = SimClock::new();
        let ctx = HarnessContext::new(SimProviders::new(&clock, 2024), HarnessConfig::default());
        let pipeline = fulfillment_pipeline(&ctx, InMemoryCatalog::storefront());

        let shipment = clock
            .run_until_complete(pipeline.run(order(&[("pants", 3)], 50.0)))
            .await
            .unwrap();
        tracking.push((shipment.tracking_number, clock.now()));
    }
    assert_eq!(tracking[0], tracking[1]);
}
