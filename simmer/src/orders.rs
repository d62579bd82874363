//! Online order fulfillment: inventory, payment, shipping.
//!
//! Each step validates the value handed to it by the previous one and either
//! passes an enriched value along or rejects the order. No stock or balance
//! is ever mutated; every run reads the same catalog snapshot.

use std::fmt;

use serde::{Deserialize, Serialize};
use simmer_core::{Providers, RandomProvider};

use crate::catalog::Catalog;
use crate::context::HarnessContext;
use crate::operation::{OutcomeRule, SimulatedOperation};
use crate::pipeline::Pipeline;

/// Exclusive upper bound of generated tracking numbers.
pub const TRACKING_NUMBER_LIMIT: u32 = 1_000_000;

/// One item and how many of it to buy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Catalog item name.
    pub item: String,
    /// Units requested.
    pub quantity: u32,
}

impl OrderLine {
    /// Create an order line.
    pub fn new(item: impl Into<String>, quantity: u32) -> Self {
        Self {
            item: item.into(),
            quantity,
        }
    }
}

/// A customer order paid for with a giftcard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Requested items.
    pub items: Vec<OrderLine>,
    /// Balance left on the giftcard.
    pub giftcard_balance: f64,
}

/// An order whose items are all in stock, with its total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedOrder {
    /// The original order.
    pub order: Order,
    /// Sum of `quantity * cost` over every line.
    pub total: f64,
}

/// An order that has been paid for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaidOrder {
    /// The original order.
    pub order: Order,
    /// Giftcard balance after paying the total.
    pub remaining_balance: f64,
}

/// A shipped order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    /// The original order.
    pub order: Order,
    /// Carrier tracking number in `[0, 1_000_000)`.
    pub tracking_number: u32,
}

impl fmt::Display for Shipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The order has been shipped. The tracking number is: {}.",
            self.tracking_number
        )
    }
}

/// Ask a distributor for more of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockRequest {
    /// Item to restock.
    pub item: String,
    /// Distributor to ask.
    pub distributor: String,
}

impl RestockRequest {
    /// Create a restock request.
    pub fn new(item: impl Into<String>, distributor: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            distributor: distributor.into(),
        }
    }
}

/// Check every line of the order against the catalog and price it.
///
/// An item missing from the catalog is an internal fault; an item with too
/// little stock rejects the whole order.
pub fn check_inventory<P, C>(
    ctx: &HarnessContext<P>,
    catalog: C,
) -> SimulatedOperation<P, Order, PricedOrder>
where
    P: Providers,
    C: Catalog + Clone + 'static,
{
    let sink = ctx.sink().clone();
    let pricing = catalog.clone();
    ctx.operation("check_inventory")
        .outcome(OutcomeRule::predicate(move |order: &Order| {
            for line in &order.items {
                if catalog.lookup(&line.item)?.stock < line.quantity {
                    return Ok(false);
                }
            }
            Ok(true)
        }))
        .reject_with(|_| {
            "The order could not be completed because some items are sold out.".to_string()
        })
        .produce(move |order: &Order| {
            let mut total = 0.0;
            for line in &order.items {
                total += f64::from(line.quantity) * pricing.lookup(&line.item)?.cost;
            }
            sink.emit(&format!(
                "All of the items are in stock. The total cost of the order is {total:.2}."
            ));
            Ok(PricedOrder {
                order: order.clone(),
                total,
            })
        })
}

/// Charge the order total to the giftcard.
pub fn process_payment<P: Providers>(
    ctx: &HarnessContext<P>,
) -> SimulatedOperation<P, PricedOrder, PaidOrder> {
    let sink = ctx.sink().clone();
    ctx.operation("process_payment")
        .outcome(OutcomeRule::predicate(|priced: &PricedOrder| {
            Ok(priced.order.giftcard_balance >= priced.total)
        }))
        .reject_with(|_| "Cannot process order: giftcard balance was insufficient.".to_string())
        .produce(move |priced: &PricedOrder| {
            let remaining_balance = priced.order.giftcard_balance - priced.total;
            sink.emit("Payment processed with giftcard.");
            sink.emit(&format!(" - Remaining Balance: {remaining_balance:.2}"));
            Ok(PaidOrder {
                order: priced.order.clone(),
                remaining_balance,
            })
        })
}

/// Print a shipping label and hand the order to the carrier.
pub fn ship_order<P: Providers>(
    ctx: &HarnessContext<P>,
) -> SimulatedOperation<P, PaidOrder, Shipment> {
    let random = ctx.random().clone();
    ctx.operation("ship_order")
        .announce(|_| "Generating shipping label.".to_string())
        .produce(move |paid: &PaidOrder| {
            Ok(Shipment {
                order: paid.order.clone(),
                tracking_number: random.random_range(0..TRACKING_NUMBER_LIMIT),
            })
        })
}

/// Ask a distributor whether it can restock an item.
///
/// Resolves to the item name when the distributor has it.
pub fn check_distributor_stock<P: Providers>(
    ctx: &HarnessContext<P>,
) -> SimulatedOperation<P, RestockRequest, String> {
    let sink = ctx.sink().clone();
    ctx.operation("check_distributor_stock")
        .announce(|request: &RestockRequest| {
            format!(
                "Checking availability of {} at {}...",
                request.item, request.distributor
            )
        })
        .outcome(OutcomeRule::probabilistic(
            ctx.config().distributor_success_probability,
        ))
        .reject_with(|request: &RestockRequest| {
            format!(
                "Error: {} are unavailable from {} at this time.",
                request.item, request.distributor
            )
        })
        .produce(move |request: &RestockRequest| {
            sink.emit(&format!(
                "{} are in stock at {}",
                request.item, request.distributor
            ));
            Ok(request.item.clone())
        })
}

/// Inventory, then payment, then shipping.
pub fn fulfillment_pipeline<P, C>(ctx: &HarnessContext<P>, catalog: C) -> Pipeline<Order, Shipment>
where
    P: Providers,
    C: Catalog + Clone + 'static,
{
    Pipeline::start("fulfillment", check_inventory(ctx, catalog))
        .then(process_payment(ctx))
        .then(ship_order(ctx))
}
