//! Command-line runner for the simmer narratives.
//!
//! ```text
//! simmer --seed 7 dinner
//! simmer souffle
//! simmer feast
//! simmer order --item sunglasses=2 --item pants=1 --giftcard 100
//! simmer restock --item bags --distributor Acme
//! simmer --timeout-ms 1500 dinner
//! ```
//!
//! Operations wait on real Tokio time. Pass `--seed` (or set `seed` in the
//! config file) to make every random draw reproducible.

use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use simmer::{
    kitchen, orders, ConsoleSink, HarnessConfig, HarnessContext, InMemoryCatalog, OperationResult,
    Order, OrderLine, Providers, RestockRequest, TokioProviders, TokioTimeProvider,
};
use simmer_sim::SimRandomProvider;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "simmer")]
#[command(about = "Simulated slow, fallible operations chained into pipelines", long_about = None)]
struct Args {
    /// Random seed for reproducible runs (overrides the config file)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Exclusive upper bound of every operation's latency, in milliseconds
    #[arg(long, global = true)]
    max_latency_ms: Option<u64>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Give up on the run after this many milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decide what to cook, then shop for, soak and cook beans
    Dinner,
    /// Bake a bean souffle that may or may not survive
    Souffle,
    /// Cook four side dishes at once
    Feast,
    /// Check inventory, pay with a giftcard and ship an order
    Order {
        /// Item to buy as NAME=QTY (repeatable)
        #[arg(long = "item", value_parser = parse_order_line, required = true)]
        items: Vec<OrderLine>,

        /// Giftcard balance
        #[arg(long)]
        giftcard: f64,
    },
    /// Ask a distributor whether it can restock an item
    Restock {
        /// Item to restock
        #[arg(long)]
        item: String,

        /// Distributor to ask
        #[arg(long)]
        distributor: String,
    },
}

fn parse_order_line(raw: &str) -> Result<OrderLine, String> {
    let (item, quantity) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=QTY, got '{raw}'"))?;
    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid quantity in '{raw}': {e}"))?;
    Ok(OrderLine::new(item.trim(), quantity))
}

/// Real Tokio time with seeded, reproducible randomness.
#[derive(Clone)]
struct SeededTokioProviders {
    time: TokioTimeProvider,
    random: SimRandomProvider,
}

impl SeededTokioProviders {
    fn new(seed: u64) -> Self {
        Self {
            time: TokioTimeProvider::new(),
            random: SimRandomProvider::new(seed),
        }
    }
}

impl Providers for SeededTokioProviders {
    type Time = TokioTimeProvider;
    type Random = SimRandomProvider;

    fn time(&self) -> &Self::Time {
        &self.time
    }

    fn random(&self) -> &Self::Random {
        &self.random
    }
}

fn load_config(args: &Args) -> Result<HarnessConfig, simmer::ConfigError> {
    let mut config = match &args.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(max_latency_ms) = args.max_latency_ms {
        config.max_latency_ms = max_latency_ms;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.run_timeout_ms = Some(timeout_ms);
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        seed = ?config.seed,
        max_latency_ms = config.max_latency_ms,
        run_timeout_ms = ?config.run_timeout_ms,
        command = ?args.command,
        "Starting simmer"
    );

    let result = match config.seed {
        Some(seed) => {
            let ctx = HarnessContext::new(SeededTokioProviders::new(seed), config);
            run(ctx.with_sink(Rc::new(ConsoleSink)), args.command).await
        }
        None => {
            let ctx = HarnessContext::new(TokioProviders::new(), config);
            run(ctx.with_sink(Rc::new(ConsoleSink)), args.command).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_internal() {
                tracing::error!(error = %e, "Run failed");
            }
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run<P: Providers>(ctx: HarnessContext<P>, command: Command) -> OperationResult<()> {
    match ctx.config().run_timeout() {
        Some(limit) => ctx.within(limit, run_command(&ctx, command)).await,
        None => run_command(&ctx, command).await,
    }
}

async fn run_command<P: Providers>(
    ctx: &HarnessContext<P>,
    command: Command,
) -> OperationResult<()> {
    match command {
        Command::Dinner => {
            let served = kitchen::plan_and_cook_dinner(ctx).run(()).await?;
            println!("{served}");
        }
        Command::Souffle => {
            let dish = kitchen::cook_bean_souffle(ctx).invoke(()).await?;
            println!("{dish} is ready!");
        }
        Command::Feast => {
            let dishes = kitchen::cook_full_dinner(ctx).await?;
            println!("Dinner is served: {}", dishes.join(", "));
        }
        Command::Order { items, giftcard } => {
            let order = Order {
                items,
                giftcard_balance: giftcard,
            };
            let shipment = orders::fulfillment_pipeline(ctx, InMemoryCatalog::storefront())
                .run(order)
                .await?;
            println!("{shipment}");
        }
        Command::Restock { item, distributor } => {
            let restocked = orders::check_distributor_stock(ctx)
                .invoke(RestockRequest::new(item, distributor))
                .await?;
            println!("Restocked {restocked}.");
        }
    }
    Ok(())
}
