mod menu;

pub use menu::Menu;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;

use crate::application::InventoryService;
use crate::domain::{Product, ProductId, SALE_DATE_FORMAT, SaleSummary, format_cents, parse_price};

/// Stockbook - inventory and sales ledger
#[derive(Parser)]
#[command(name = "stockbook")]
#[command(about = "A single-store inventory and sales ledger")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "STOCKBOOK_DB", default_value = "stockbook.db")]
    pub database: String,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and its tables
    Init,

    /// Product catalog commands
    #[command(subcommand)]
    Product(ProductCommands),

    /// Sell units of a product
    Sell {
        /// Product ID
        id: ProductId,

        /// Units to sell
        quantity: i64,
    },

    /// Show all sales, newest first
    Sales,

    /// Export data to CSV or JSON
    Export {
        /// What to export: products, sales, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Interactive menu
    Menu,
}

#[derive(Subcommand)]
pub enum ProductCommands {
    /// Add a new product
    Add {
        /// Product name
        name: String,

        /// Unit price (e.g., "2.50")
        #[arg(short, long)]
        price: String,

        /// Units in stock
        #[arg(short, long)]
        quantity: i64,
    },

    /// List all products
    List,

    /// Show a single product
    Show {
        /// Product ID
        id: ProductId,
    },

    /// Overwrite a product's price and stock
    Update {
        /// Product ID
        id: ProductId,

        /// New unit price
        #[arg(short, long)]
        price: String,

        /// New units in stock
        #[arg(short, long)]
        quantity: i64,
    },

    /// Overwrite a product's stock only
    Stock {
        /// Product ID
        id: ProductId,

        /// New units in stock
        quantity: i64,
    },

    /// Delete a product (its past sales are kept)
    Delete {
        /// Product ID
        id: ProductId,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let service = InventoryService::open(&self.database).await?;
        let result = run_command(&service, &self.database, self.command).await;
        service.close().await;
        result
    }
}

async fn run_command(service: &InventoryService, database: &str, command: Commands) -> Result<()> {
    match command {
        Commands::Init => {
            println!("Database initialized: {}", database);
        }

        Commands::Product(product_cmd) => {
            run_product_command(service, product_cmd).await?;
        }

        Commands::Sell { id, quantity } => {
            let receipt = service.sell(id, quantity).await?;
            println!(
                "Sold {} x {}: total {} (sale #{}, {} left in stock)",
                receipt.sale.quantity_sold,
                receipt.product_name,
                format_cents(receipt.total_cents()),
                receipt.sale.id,
                receipt.remaining_stock
            );
        }

        Commands::Sales => {
            let summary = service.sales_summary().await?;
            write_sales_summary(&mut std::io::stdout().lock(), &summary)?;
        }

        Commands::Export {
            export_type,
            output,
        } => {
            run_export_command(service, &export_type, output.as_deref()).await?;
        }

        Commands::Menu => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            Menu::new(service, stdin.lock(), stdout.lock()).run().await?;
        }
    }

    Ok(())
}

async fn run_product_command(service: &InventoryService, cmd: ProductCommands) -> Result<()> {
    match cmd {
        ProductCommands::Add {
            name,
            price,
            quantity,
        } => {
            let price_cents = parse_price(&price).context("Invalid price. Use '2.50' or '3'")?;
            let product = service.add_product(&name, price_cents, quantity).await?;
            println!(
                "Added product #{}: {} at {} ({} in stock)",
                product.id,
                product.name,
                format_cents(product.price_cents),
                product.quantity
            );
        }

        ProductCommands::List => {
            let products = service.list_products().await?;
            write_products(&mut std::io::stdout().lock(), &products)?;
        }

        ProductCommands::Show { id } => {
            let product = service.get_product(id).await?;
            println!("Product #{}", product.id);
            println!("  Name:     {}", product.name);
            println!("  Price:    {}", format_cents(product.price_cents));
            println!("  Quantity: {}", product.quantity);
        }

        ProductCommands::Update {
            id,
            price,
            quantity,
        } => {
            let price_cents = parse_price(&price).context("Invalid price. Use '2.50' or '3'")?;
            if service.update_product(id, price_cents, quantity).await? {
                println!("Updated product #{}", id);
            } else {
                println!("No product with ID {}; nothing changed", id);
            }
        }

        ProductCommands::Stock { id, quantity } => {
            if service.set_quantity(id, quantity).await? {
                println!("Product #{} now has {} in stock", id, quantity);
            } else {
                println!("No product with ID {}; nothing changed", id);
            }
        }

        ProductCommands::Delete { id } => {
            if service.delete_product(id).await? {
                println!("Deleted product #{}", id);
            } else {
                println!("No product with ID {}; nothing changed", id);
            }
        }
    }
    Ok(())
}

async fn run_export_command(
    service: &InventoryService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::stdout;

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "products" => {
            let count = exporter.export_products_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} products", count);
            }
        }
        "sales" => {
            let count = exporter.export_sales_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} sales", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported full database: {} products, {} sales",
                    snapshot.products.len(),
                    snapshot.sales.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: products, sales, full",
                export_type
            );
        }
    }

    Ok(())
}

/// Write the product catalog as a table.
pub(crate) fn write_products<W: Write>(out: &mut W, products: &[Product]) -> std::io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found.");
    }

    writeln!(out, "{:<6} {:<24} {:>10} {:>8}", "ID", "NAME", "PRICE", "QTY")?;
    writeln!(out, "{}", "-".repeat(51))?;
    for product in products {
        writeln!(
            out,
            "{:<6} {:<24} {:>10} {:>8}",
            product.id,
            product.name,
            format_cents(product.price_cents),
            product.quantity
        )?;
    }
    Ok(())
}

/// Write the sales summary as a table with a totals line.
pub(crate) fn write_sales_summary<W: Write>(
    out: &mut W,
    summary: &[SaleSummary],
) -> std::io::Result<()> {
    if summary.is_empty() {
        return writeln!(out, "No sales recorded.");
    }

    writeln!(
        out,
        "{:<6} {:<24} {:>6} {:>10}  {:<19}",
        "SALE", "PRODUCT", "QTY", "TOTAL", "DATE"
    )?;
    writeln!(out, "{}", "-".repeat(70))?;
    for entry in summary {
        let product = entry
            .product_name
            .clone()
            .unwrap_or_else(|| format!("(deleted #{})", entry.product_id));
        writeln!(
            out,
            "{:<6} {:<24} {:>6} {:>10}  {:<19}",
            entry.sale_id,
            product,
            entry.quantity_sold,
            format_cents(entry.total_cents),
            entry.sale_date.format(SALE_DATE_FORMAT)
        )?;
    }

    let units = checked_total(summary.iter().map(|e| e.quantity_sold))
        .map(|units| units.to_string());
    let revenue = checked_total(summary.iter().map(|e| e.total_cents)).map(format_cents);
    writeln!(out, "{}", "-".repeat(70))?;
    writeln!(
        out,
        "{} sale(s), {} unit(s), revenue {}",
        summary.len(),
        units.as_deref().unwrap_or("overflow"),
        revenue.as_deref().unwrap_or("overflow")
    )
}

/// Sum that reports `None` instead of wrapping past `i64::MAX`.
fn checked_total(values: impl Iterator<Item = i64>) -> Option<i64> {
    values.fold(Some(0i64), |acc, value| acc?.checked_add(value))
}
