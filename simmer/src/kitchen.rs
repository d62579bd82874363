//! Cooking dinner, one simulated operation at a time.
//!
//! Every dish is a [`SimulatedOperation`]: it takes a random amount of time,
//! then succeeds, fails, or depends on what it was handed. Multi-step recipes
//! are [`Pipeline`]s, so "decide, shop, soak, cook" reads top to bottom
//! instead of as a pyramid of nested callbacks.

use simmer_core::{InternalError, OperationResult, Providers, RandomProvider};

use crate::context::HarnessContext;
use crate::operation::{OutcomeRule, SimulatedOperation};
use crate::pipeline::Pipeline;

/// Bean varieties on sale at the shop.
pub const BEAN_TYPES: [&str; 5] = ["kidney", "fava", "pinto", "black", "garbanzo"];

/// Final line of a successful bean dinner.
pub const DINNER_SERVED: &str = "Dinner is served!";

/// One step of deciding what to cook: wait, then think out loud.
fn musing<P: Providers>(
    ctx: &HarnessContext<P>,
    name: &str,
    thought: &'static str,
) -> SimulatedOperation<P, (), ()> {
    let sink = ctx.sink().clone();
    ctx.operation(name).produce(move |_| {
        sink.emit(thought);
        Ok(())
    })
}

/// Deliberate over four dishes before settling on beans.
///
/// Each deliberation is its own stage; the last resolves `"beans"`.
pub fn brainstorm_dinner<P: Providers>(ctx: &HarnessContext<P>) -> Pipeline<(), String> {
    let sink = ctx.sink().clone();
    let opening = ctx
        .operation("consider_salad")
        .announce(|_| "I have to decide what's for dinner...".to_string())
        .produce(move |_: &()| {
            sink.emit("Should I make salad...?");
            Ok(())
        });

    let sink = ctx.sink().clone();
    let decision = ctx.operation("consider_chicken").produce(move |_: &()| {
        sink.emit("Should I make chicken...?");
        Ok("beans".to_string())
    });

    Pipeline::start("brainstorm_dinner", opening)
        .then(musing(ctx, "consider_ramen", "Should I make ramen...?"))
        .then(musing(ctx, "consider_eggs", "Should I make eggs...?"))
        .then(decision)
}

/// Buy whichever bean variety happens to be on sale.
///
/// The variety is drawn from the random provider after the trip; a draw
/// outside [`BEAN_TYPES`] is an internal fault.
pub fn shop_for_beans<P: Providers>(ctx: &HarnessContext<P>) -> SimulatedOperation<P, (), String> {
    let sink = ctx.sink().clone();
    let random = ctx.random().clone();
    ctx.operation("shop_for_beans").produce(move |_| {
        let index = random.sample_index(BEAN_TYPES.len());
        let bean = BEAN_TYPES
            .get(index)
            .ok_or_else(|| InternalError::new(format!("no bean variety at index {index}")))?;
        sink.emit(&format!("I bought {bean} beans because they were on sale."));
        Ok(bean.to_string())
    })
}

/// Soak the beans; they always soften.
pub fn soak_the_beans<P: Providers>(
    ctx: &HarnessContext<P>,
) -> SimulatedOperation<P, String, bool> {
    let sink = ctx.sink().clone();
    ctx.operation("soak_the_beans")
        .announce(|_| "Time to soak the beans.".to_string())
        .produce(move |bean: &String| {
            sink.emit(&format!("... The {bean} beans are softened."));
            Ok(true)
        })
}

/// Cook the beans, which only works once they are softened.
pub fn cook_the_beans<P: Providers>(
    ctx: &HarnessContext<P>,
) -> SimulatedOperation<P, bool, String> {
    let sink = ctx.sink().clone();
    ctx.operation("cook_the_beans")
        .announce(|_| "Time to cook the beans.".to_string())
        .outcome(OutcomeRule::predicate(|softened: &bool| Ok(*softened)))
        .reject_with(|_| "The beans were not softened, so they could not be cooked.".to_string())
        .produce(move |_| {
            sink.emit("... The beans are cooked!");
            Ok(DINNER_SERVED.to_string())
        })
}

/// A souffle whose fate is a coin flip.
pub fn cook_bean_souffle<P: Providers>(
    ctx: &HarnessContext<P>,
) -> SimulatedOperation<P, (), String> {
    ctx.operation("cook_bean_souffle")
        .announce(|_| "Fingers crossed... Putting the Bean Souffle in the oven".to_string())
        .outcome(OutcomeRule::probabilistic(
            ctx.config().souffle_success_probability,
        ))
        .reject_with(|_| "Dinner is ruined!".to_string())
        .produce(|_| Ok("Bean Souffle".to_string()))
}

fn side_dish<P: Providers>(
    ctx: &HarnessContext<P>,
    name: &str,
    dish: &'static str,
) -> SimulatedOperation<P, (), String> {
    ctx.operation(name).produce(move |_| Ok(dish.to_string()))
}

/// Cook the beans side dish.
pub fn cook_beans<P: Providers>(ctx: &HarnessContext<P>) -> SimulatedOperation<P, (), String> {
    side_dish(ctx, "cook_beans", "beans")
}

/// Steam the broccoli.
pub fn steam_broccoli<P: Providers>(ctx: &HarnessContext<P>) -> SimulatedOperation<P, (), String> {
    side_dish(ctx, "steam_broccoli", "broccoli")
}

/// Cook the rice.
pub fn cook_rice<P: Providers>(ctx: &HarnessContext<P>) -> SimulatedOperation<P, (), String> {
    side_dish(ctx, "cook_rice", "rice")
}

/// Bake the chicken.
pub fn bake_chicken<P: Providers>(ctx: &HarnessContext<P>) -> SimulatedOperation<P, (), String> {
    side_dish(ctx, "bake_chicken", "chicken")
}

/// Shop, soak, cook.
pub fn bean_dinner_pipeline<P: Providers>(ctx: &HarnessContext<P>) -> Pipeline<(), String> {
    Pipeline::start("bean_dinner", shop_for_beans(ctx))
        .then(soak_the_beans(ctx))
        .then(cook_the_beans(ctx))
}

/// Brainstorm first, then run the bean dinner as a nested pipeline.
///
/// The brainstorm's answer is always beans, so it is dropped by the adapter.
pub fn plan_and_cook_dinner<P: Providers>(ctx: &HarnessContext<P>) -> Pipeline<(), String> {
    Pipeline::start("plan_and_cook_dinner", brainstorm_dinner(ctx))
        .then_adapted(bean_dinner_pipeline(ctx), |_decision: String| ())
}

/// Cook four side dishes at the same time.
///
/// The dishes are independent invocations awaited together, not pipeline
/// stages; the result lists them in a fixed order regardless of which
/// finished first.
pub async fn cook_full_dinner<P: Providers>(
    ctx: &HarnessContext<P>,
) -> OperationResult<Vec<String>> {
    let beans = cook_beans(ctx);
    let broccoli = steam_broccoli(ctx);
    let rice = cook_rice(ctx);
    let chicken = bake_chicken(ctx);

    let (beans, broccoli, rice, chicken) = tokio::try_join!(
        beans.invoke(()),
        broccoli.invoke(()),
        rice.invoke(()),
        chicken.invoke(()),
    )?;
    Ok(vec![beans, broccoli, rice, chicken])
}
