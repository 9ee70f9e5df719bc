// src/seed_catalog.rs
// Fills the configured store with random shipments, then times a first-page listing.
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Instant;

use shipment_catalog::app::CrudCoordinator;
use shipment_catalog::domain::{ShipmentInput, ShipmentStatus};
use shipment_catalog::infra::{config::CatalogConfig, logging};
use shipment_catalog::{CatalogService, FilterChange};

const CARGO: &[&str] = &[
    "Laptops", "Ceramic vases", "Office chairs", "Wine crates", "Textbooks", "Server racks",
    "Glass panels", "Bicycle parts", "Medical kits", "Coffee beans",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let num_items: usize = std::env::args()
        .nth(1)
        .map(|raw| raw.parse::<usize>())
        .transpose()
        .map_err(|e| anyhow::anyhow!("item count must be a positive integer: {}", e))?
        .unwrap_or(50);

    let config = CatalogConfig::from_env()?;
    let store = config.open_store().await?;
    println!(
        "--- Seeding {} shipments into the '{}' store ---",
        num_items,
        store.backend()
    );

    let crud = CrudCoordinator::new(store.clone());
    let mut rng = rand::thread_rng();

    let start_time = Instant::now();
    for i in 0..num_items {
        let cargo = CARGO.choose(&mut rng).copied().unwrap_or("Parcel");
        let status = ShipmentStatus::ALL
            .choose(&mut rng)
            .copied()
            .unwrap_or_default();
        let input = ShipmentInput {
            title: format!("{} #{}", cargo, i + 1),
            status,
            is_fragile: rng.gen_bool(0.3),
            weight_kg: (rng.gen_range(0.5..500.0_f64) * 10.0).round() / 10.0,
            distance_km: (rng.gen_range(1.0..3_000.0_f64) * 10.0).round() / 10.0,
        };
        crud.create(&input).await?;
    }
    let insert_time = start_time.elapsed();

    let mut catalog = CatalogService::new(store, config.session.clone(), config.page_size)?;
    let list_start = Instant::now();
    catalog.refresh().await?;
    let list_time = list_start.elapsed();

    let search_start = Instant::now();
    catalog.set_filter(FilterChange::search("glass")).await?;
    let search_time = search_start.elapsed();
    let glass = catalog.controller().page().total_count;

    println!("\n--- Results ---");
    println!(
        "Inserted {} shipments in {} ms ({:.2} ms each)",
        num_items,
        insert_time.as_millis(),
        insert_time.as_micros() as f64 / 1_000.0 / num_items.max(1) as f64
    );
    println!("First page read: {} µs", list_time.as_micros());
    println!("Search 'glass' ({} matches): {} µs", glass, search_time.as_micros());
    Ok(())
}
