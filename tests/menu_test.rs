mod common;

use anyhow::Result;
use common::test_service;
use stockbook::application::InventoryService;
use stockbook::cli::Menu;

async fn run_script(service: &InventoryService, script: &str) -> Result<String> {
    let mut output = Vec::new();
    Menu::new(service, script.as_bytes(), &mut output)
        .run()
        .await?;
    Ok(String::from_utf8(output)?)
}

#[tokio::test]
async fn test_menu_add_sell_and_summary() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let script = "1\nMilk\n2.50\n10\n5\n1\n3\n5\n1\n20\n6\n7\n";
    let output = run_script(&service, script).await?;

    assert!(output.contains("Product added with ID 1."));
    assert!(output.contains("Sale complete! Total: 7.50"));
    assert!(output.contains("Error: Not enough stock for 'Milk'"));
    assert!(output.contains("Sales summary:"));
    assert!(output.contains("1 sale(s), 3 unit(s), revenue 7.50"));
    assert!(output.trim_end().ends_with("Goodbye!"));

    assert_eq!(service.get_product(1).await?.quantity, 7);
    assert_eq!(service.list_sales().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_menu_update_and_delete() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let milk = service.add_product("Milk", 250, 10).await?;
    let bread = service.add_product("Bread", 120, 5).await?;

    let script = format!(
        "3\n{}\n3.00\n12\n4\n{}\n4\n99\n7\n",
        milk.id, bread.id
    );
    let output = run_script(&service, &script).await?;

    assert!(output.contains("Product updated."));
    assert!(output.contains("Product deleted."));
    assert!(output.contains("No product with ID 99; nothing changed."));

    let products = service.list_products().await?;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].price_cents, 300);
    assert_eq!(products[0].quantity, 12);

    Ok(())
}

#[tokio::test]
async fn test_menu_reports_bad_input_and_keeps_going() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // Invalid choice, bad price, bad quantity, then end of input without choosing exit
    let script = "9\n1\nTea\nabc\n1\nTea\n1.00\nlots\n2\n";
    let output = run_script(&service, script).await?;

    assert!(output.contains("Invalid choice, try again."));
    assert!(output.contains("Error: Invalid input: 'abc' is not a valid price"));
    assert!(output.contains("Error: Invalid input: 'lots' is not a whole number"));
    assert!(output.contains("No products found."));
    assert!(!output.contains("Goodbye!"));

    assert!(service.list_products().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_menu_sale_of_unknown_product() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let output = run_script(&service, "5\n42\n1\n7\n").await?;

    assert!(output.contains("Error: Product not found: 42"));
    assert!(service.list_sales().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_menu_summary_totals_past_i64_range() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let gold = service
        .add_product("Gold", 5_000_000_000_000_000_000, 2)
        .await?;
    service.sell(gold.id, 1).await?;
    service.sell(gold.id, 1).await?;

    let output = run_script(&service, "6\n7\n").await?;

    assert!(output.contains("2 sale(s), 2 unit(s), revenue overflow"));
    assert!(output.trim_end().ends_with("Goodbye!"));

    Ok(())
}
