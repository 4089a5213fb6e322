use clap::{Parser, Subcommand, builder::PossibleValuesParser};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::{
    api,
    cart::Cart,
    feed,
    menu::{Catalog, Category},
    order::{self, OrderType, PaymentMethod},
    sim::{self, SimConfig},
    state::AppState,
};

/// Simple CLI to interact with the POS engine
#[derive(Parser)]
#[command(name = "POS Engine CLI")]
#[command(version = "0.1", about = "A single-location restaurant point of sale engine")]
struct Cli {
    /// JSON menu catalog; the built-in sample menu is used when absent
    #[arg(long, global = true)]
    menu_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the menu catalog
    Menu {
        /// Only show one section of the menu
        #[arg(long, value_parser = PossibleValuesParser::new(["starters", "mains", "desserts", "beverages"]))]
        category: Option<String>,
    },

    /// Build a one-shot order in memory and print the bill
    Order {
        /// DINE-IN or TAKEAWAY
        #[arg(long, default_value = "dine-in", value_parser = PossibleValuesParser::new(["dine-in", "takeaway"]))]
        order_type: String,

        /// Settle the bill with this method after checkout
        #[arg(long, value_parser = PossibleValuesParser::new(["cash", "card", "upi"]))]
        pay: Option<String>,

        /// Menu item ids; repeat an id to raise its quantity
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Run the HTTP API server
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: String,
    },

    /// Drive a randomized service rush against a running server
    Simulate {
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        api_base: String,

        /// Stop after this many seconds; runs until ctrl-c when absent
        #[arg(long)]
        run_secs: Option<u64>,

        /// Poisson arrival rate of guests per second
        #[arg(long, default_value_t = 1.0)]
        rate_hz: f64,

        /// Average number of items per simulated order
        #[arg(long, default_value_t = 3.0)]
        mean_items: f64,
    },

    /// Tail the order event feed of a running server
    Feed {
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        api_base: String,
    },
}

fn load_catalog(menu_file: Option<&PathBuf>) -> anyhow::Result<Catalog> {
    match menu_file {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let catalog = Catalog::from_json(&json)?;
            anyhow::ensure!(!catalog.is_empty(), "catalog file has no items");
            Ok(catalog)
        }
        None => Ok(Catalog::sample()),
    }
}

fn print_menu(catalog: &Catalog, category: Option<Category>) {
    println!("------ Menu ------");
    let sections: &[Category] = match category {
        Some(ref c) => std::slice::from_ref(c),
        None => Category::supported(),
    };
    for section in sections {
        println!("{}:", section);
        for item in catalog.by_category(*section) {
            let marker = if item.available { " " } else { "*" };
            println!("{} {:<20} {:<24} ₹{:.2}", marker, item.id, item.name, item.price);
        }
    }
    println!("------------------");
}

fn print_bill(cart: &Cart) {
    println!("------ Order Cart ------");
    for line in cart.lines() {
        println!(
            "{:<24} x{:<3} ₹{:.2}",
            line.item.name,
            line.quantity,
            line.line_total()
        );
    }
    let totals = cart.totals().rounded();
    println!("------------------------");
    println!("Subtotal:  ₹{:.2}", totals.subtotal);
    println!("GST (18%): ₹{:.2}", totals.gst);
    if totals.discount > rust_decimal::Decimal::ZERO {
        println!("Discount: -₹{:.2}", totals.discount);
    }
    println!("Total:     ₹{:.2}", totals.total);
}

fn handle_order(
    catalog: &Catalog,
    order_type_str: String,
    pay: Option<String>,
    items: Vec<String>,
) -> anyhow::Result<()> {
    let order_type = match order_type_str.as_str() {
        "dine-in" => OrderType::DineIn,
        "takeaway" => OrderType::Takeaway,
        _ => unreachable!(),
    };

    let mut cart = Cart::new();
    for id in &items {
        match catalog.get(id) {
            Some(item) => cart.add_item(item),
            None => anyhow::bail!("unknown menu item: `{}`", id),
        }
    }

    print_bill(&cart);
    let mut placed = order::create_order(&cart, order_type)?;
    println!("Order {} ({}) placed.", placed.id, placed.order_type);

    if let Some(method_str) = pay {
        let method = match method_str.as_str() {
            "cash" => PaymentMethod::Cash,
            "card" => PaymentMethod::Card,
            "upi" => PaymentMethod::Upi,
            _ => unreachable!(),
        };
        let receipt = order::select_payment(&mut placed, method);
        cart.clear();
        println!("Paid ₹{:.2} via {}. Order completed.", receipt.total, receipt.method);
    }
    Ok(())
}

async fn handle_serve(catalog: Catalog, addr: String) -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let state = AppState::new(catalog);
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("pos engine listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl+C handler");
}

fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let tc = token.clone();
    //spawn once to listen for ctrl-c
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl+C handler");
        tc.cancel();
    });
    token
}

pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let catalog = load_catalog(cli.menu_file.as_ref())?;
    match cli.command {
        Commands::Menu { category } => {
            // PossibleValuesParser already vetted the string
            let category = category.map(|c| c.parse::<Category>().unwrap());
            print_menu(&catalog, category);
            Ok(())
        }
        Commands::Order {
            order_type,
            pay,
            items,
        } => handle_order(&catalog, order_type, pay, items),
        Commands::Serve { addr } => handle_serve(catalog, addr).await,
        Commands::Simulate {
            api_base,
            run_secs,
            rate_hz,
            mean_items,
        } => {
            let cfg = SimConfig {
                api_base,
                run_secs,
                rate_hz,
                mean_items,
            };
            sim::run_simulation(cfg, shutdown_token()).await
        }
        Commands::Feed { api_base } => {
            feed::run_feed(&api_base).await?;
            Ok(())
        }
    }
}
