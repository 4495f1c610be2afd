mod common;

use anyhow::Result;
use common::{StandardProducts, test_service};
use stockbook::io::{DatabaseSnapshot, Exporter};

#[tokio::test]
async fn test_export_products_csv() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StandardProducts::create(&service).await?;

    let mut buffer = Vec::new();
    let count = Exporter::new(&service)
        .export_products_csv(&mut buffer)
        .await?;
    assert_eq!(count, 3);

    let csv = String::from_utf8(buffer)?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "id,name,price,quantity");
    assert_eq!(lines[1], "1,Milk,2.50,10");
    assert_eq!(lines[2], "2,Bread,1.20,5");
    assert_eq!(lines[3], "3,Eggs,3.00,0");

    Ok(())
}

#[tokio::test]
async fn test_export_sales_csv_newest_first() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let products = StandardProducts::create(&service).await?;
    service.sell(products[0].id, 3).await?;
    service.sell(products[1].id, 2).await?;
    service.delete_product(products[1].id).await?;

    let mut buffer = Vec::new();
    let count = Exporter::new(&service).export_sales_csv(&mut buffer).await?;
    assert_eq!(count, 2);

    let csv = String::from_utf8(buffer)?;
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let records: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;

    // Bread sale came second, and Bread has been deleted since
    assert_eq!(&records[0][1], "2");
    assert_eq!(&records[0][2], "");
    assert_eq!(&records[0][4], "2.40");
    assert_eq!(&records[1][2], "Milk");
    assert_eq!(&records[1][3], "3");
    assert_eq!(&records[1][4], "7.50");

    Ok(())
}

#[tokio::test]
async fn test_export_full_json() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let products = StandardProducts::create(&service).await?;
    service.sell(products[0].id, 1).await?;

    let mut buffer = Vec::new();
    let snapshot = Exporter::new(&service).export_full_json(&mut buffer).await?;
    assert_eq!(snapshot.products.len(), 3);
    assert_eq!(snapshot.sales.len(), 1);

    let parsed: DatabaseSnapshot = serde_json::from_slice(&buffer)?;
    assert_eq!(parsed.products[0].quantity, 9);
    assert_eq!(parsed.sales[0].total_cents, 250);
    assert_eq!(parsed.version, env!("CARGO_PKG_VERSION"));

    Ok(())
}
