use std::io::{BufRead, Write};

use thiserror::Error;

use crate::application::{AppError, InventoryService};
use crate::domain::{Cents, ProductId, format_cents, parse_price};

use super::{write_products, write_sales_summary};

const BANNER: &str = "
========= Stockbook =========
1. Add new product
2. View products
3. Update product
4. Delete product
5. Make sale
6. View sales summary
7. Exit
";

#[derive(Error, Debug)]
enum MenuError {
    #[error("end of input")]
    EndOfInput,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    App(#[from] AppError),
}

/// Line-oriented interactive menu over any reader/writer pair.
///
/// Operation errors are printed and the loop continues. Exit (choice 7)
/// or end of input ends the loop; closing the store is left to the caller.
pub struct Menu<'a, R, W> {
    service: &'a InventoryService,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(service: &'a InventoryService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            write!(self.output, "{}", BANNER)?;
            let choice = match self.prompt("Enter your choice (1-7): ") {
                Ok(choice) => choice,
                Err(MenuError::EndOfInput) => break,
                Err(err) => return Err(err.into()),
            };

            let outcome = match choice.as_str() {
                "1" => self.add_product().await,
                "2" => self.view_products().await,
                "3" => self.update_product().await,
                "4" => self.delete_product().await,
                "5" => self.make_sale().await,
                "6" => self.view_sales_summary().await,
                "7" => {
                    writeln!(self.output, "Goodbye!")?;
                    break;
                }
                _ => {
                    writeln!(self.output, "Invalid choice, try again.")?;
                    continue;
                }
            };

            match outcome {
                Ok(()) => {}
                Err(MenuError::App(err)) => writeln!(self.output, "Error: {}", err)?,
                Err(MenuError::EndOfInput) => break,
                Err(MenuError::Io(err)) => return Err(err.into()),
            }
        }

        self.output.flush()?;
        Ok(())
    }

    async fn add_product(&mut self) -> Result<(), MenuError> {
        let name = self.prompt("Enter product name: ")?;
        let price_cents = self.prompt_price("Enter product price: ")?;
        let quantity = self.prompt_int("Enter product quantity: ")?;

        let product = self
            .service
            .add_product(&name, price_cents, quantity)
            .await?;
        writeln!(self.output, "Product added with ID {}.", product.id)?;
        Ok(())
    }

    async fn view_products(&mut self) -> Result<(), MenuError> {
        let products = self.service.list_products().await?;
        writeln!(self.output, "\nInventory:")?;
        write_products(&mut self.output, &products)?;
        Ok(())
    }

    async fn update_product(&mut self) -> Result<(), MenuError> {
        self.view_products().await?;
        let id: ProductId = self.prompt_int("Enter product ID to update: ")?;
        let price_cents = self.prompt_price("Enter new price: ")?;
        let quantity = self.prompt_int("Enter new quantity: ")?;

        if self.service.update_product(id, price_cents, quantity).await? {
            writeln!(self.output, "Product updated.")?;
        } else {
            writeln!(self.output, "No product with ID {}; nothing changed.", id)?;
        }
        Ok(())
    }

    async fn delete_product(&mut self) -> Result<(), MenuError> {
        self.view_products().await?;
        let id: ProductId = self.prompt_int("Enter product ID to delete: ")?;

        if self.service.delete_product(id).await? {
            writeln!(self.output, "Product deleted.")?;
        } else {
            writeln!(self.output, "No product with ID {}; nothing changed.", id)?;
        }
        Ok(())
    }

    async fn make_sale(&mut self) -> Result<(), MenuError> {
        self.view_products().await?;
        let id: ProductId = self.prompt_int("Enter product ID to sell: ")?;
        let quantity = self.prompt_int("Enter quantity to sell: ")?;

        let receipt = self.service.sell(id, quantity).await?;
        writeln!(
            self.output,
            "Sale complete! Total: {}",
            format_cents(receipt.total_cents())
        )?;
        Ok(())
    }

    async fn view_sales_summary(&mut self) -> Result<(), MenuError> {
        let summary = self.service.sales_summary().await?;
        writeln!(self.output, "\nSales summary:")?;
        write_sales_summary(&mut self.output, &summary)?;
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> Result<String, MenuError> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(MenuError::EndOfInput);
        }
        Ok(line.trim().to_string())
    }

    fn prompt_int(&mut self, label: &str) -> Result<i64, MenuError> {
        let raw = self.prompt(label)?;
        raw.parse().map_err(|_| {
            MenuError::App(AppError::Validation(format!(
                "'{}' is not a whole number",
                raw
            )))
        })
    }

    fn prompt_price(&mut self, label: &str) -> Result<Cents, MenuError> {
        let raw = self.prompt(label)?;
        Ok(parse_price(&raw).map_err(AppError::from)?)
    }
}
