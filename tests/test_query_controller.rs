//! Listing behaviour of the query controller against an in-process store:
//! superseded reads, sort toggling, page moves and recovery after rows disappear.

mod common;

use common::{fleet, titles, CountingStore};
use shipment_catalog::app::{Applied, QueryController, SessionConfig};
use shipment_catalog::domain::{FilterChange, ShipmentId, ShipmentStatus, SortColumn, SortDirection};
use shipment_catalog::storage::ShipmentStore;
use std::sync::Arc;

fn controller(store: &Arc<CountingStore>) -> QueryController {
    let store: Arc<dyn ShipmentStore> = store.clone();
    QueryController::new(store, SessionConfig::default(), 5).unwrap()
}

#[tokio::test]
async fn first_page_is_newest_first() {
    let store = CountingStore::with_records(fleet());
    let mut ctl = controller(&store);

    ctl.refresh().await.unwrap();

    assert_eq!(ctl.page().total_count, 12);
    assert_eq!(
        titles(ctl.page()),
        vec!["Ceramic vases", "Glassware", "Coffee beans", "Medical kits", "Bicycle parts"]
    );
    let summary = ctl.summary();
    assert_eq!(summary.page_number, 1);
    assert_eq!(summary.page_count, 3);
    assert!(!summary.has_prev);
    assert!(summary.has_next);
    assert!(!ctl.is_loading());
}

#[tokio::test]
async fn older_response_arriving_last_is_discarded() {
    let store = CountingStore::with_records(fleet());
    let mut ctl = controller(&store);

    let glass = ctl.set_filter(FilterChange::search("glass"));
    let crates = ctl.set_filter(FilterChange::search("crate"));
    assert!(ctl.is_loading());

    // Both reads are in flight at once; the newer one lands first.
    let (glass_outcome, crates_outcome) = tokio::join!(glass.resolve(), crates.resolve());

    assert!(matches!(ctl.apply(crates_outcome), Applied::Page));
    assert!(matches!(ctl.apply(glass_outcome), Applied::Stale));

    assert_eq!(titles(ctl.page()), vec!["Wine crates"]);
    assert_eq!(ctl.page().total_count, 1);
    assert_eq!(ctl.query().search_term(), "crate");
    assert!(!ctl.is_loading());
}

#[tokio::test]
async fn older_response_arriving_first_is_discarded_too() {
    let store = CountingStore::with_records(fleet());
    let mut ctl = controller(&store);

    let glass = ctl.set_filter(FilterChange::search("glass"));
    let crates = ctl.set_filter(FilterChange::search("crate"));

    assert!(matches!(ctl.apply(glass.resolve().await), Applied::Stale));
    // Still waiting for the latest read.
    assert!(ctl.is_loading());
    assert!(ctl.page().records.is_empty());

    assert!(matches!(ctl.apply(crates.resolve().await), Applied::Page));
    assert_eq!(titles(ctl.page()), vec!["Wine crates"]);
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let store = CountingStore::with_records(fleet());
    let mut ctl = controller(&store);

    let ticket = ctl.set_filter(FilterChange::search("GLASS"));
    ctl.settle(ticket).await.unwrap();

    assert_eq!(
        titles(ctl.page()),
        vec!["Glassware", "Stained glass", "Glass panels"]
    );
}

#[tokio::test]
async fn toggling_the_same_column_flips_direction() {
    let store = CountingStore::with_records(fleet());
    let mut ctl = controller(&store);

    let ticket = ctl.toggle_sort(SortColumn::Title);
    ctl.settle(ticket).await.unwrap();
    assert_eq!(ctl.query().sort_direction(), SortDirection::Ascending);
    assert_eq!(
        titles(ctl.page()),
        vec!["Bicycle parts", "Ceramic vases", "Coffee beans", "Glass panels", "Glassware"]
    );

    let ticket = ctl.toggle_sort(SortColumn::Title);
    ctl.settle(ticket).await.unwrap();
    assert_eq!(ctl.query().sort_direction(), SortDirection::Descending);
    assert_eq!(
        titles(ctl.page()),
        vec!["Wine crates", "Textbooks", "Stained glass", "Server racks", "Office chairs"]
    );

    // A different column starts ascending again.
    let ticket = ctl.toggle_sort(SortColumn::WeightKg);
    ctl.settle(ticket).await.unwrap();
    assert_eq!(ctl.query().sort_column(), SortColumn::WeightKg);
    assert_eq!(ctl.query().sort_direction(), SortDirection::Ascending);
    assert_eq!(
        titles(ctl.page()),
        vec!["Medical kits", "Glassware", "Laptops", "Bicycle parts", "Stained glass"]
    );
}

#[tokio::test]
async fn filter_change_returns_to_first_page() {
    let store = CountingStore::with_records(fleet());
    let mut ctl = controller(&store);
    ctl.refresh().await.unwrap();

    let ticket = ctl.next_page().expect("second page exists");
    ctl.settle(ticket).await.unwrap();
    assert_eq!(ctl.query().page_index(), 1);

    let ticket = ctl.set_filter(FilterChange::status(Some(ShipmentStatus::InTransit)));
    assert_eq!(ctl.query().page_index(), 0);
    assert_eq!(ticket.request().offset, 0);
    ctl.settle(ticket).await.unwrap();

    assert_eq!(ctl.page().total_count, 4);
    assert!(ctl
        .page()
        .records
        .iter()
        .all(|r| r.status == ShipmentStatus::InTransit));

    // An explicit null clears the status filter again.
    let change: FilterChange = serde_json::from_str(r#"{"filter_status": null}"#).unwrap();
    let ticket = ctl.set_filter(change);
    ctl.settle(ticket).await.unwrap();
    assert_eq!(ctl.query().filter_status(), None);
    assert_eq!(ctl.page().total_count, 12);
}

#[tokio::test]
async fn paging_stops_at_both_ends_without_reading() {
    let store = CountingStore::with_records(fleet());
    let mut ctl = controller(&store);
    ctl.refresh().await.unwrap();

    assert!(ctl.prev_page().is_none());

    for expected in [1, 2] {
        let ticket = ctl.next_page().expect("another page exists");
        assert_eq!(ticket.request().offset, expected * 5);
        ctl.settle(ticket).await.unwrap();
    }
    assert_eq!(titles(ctl.page()), vec!["Laptops", "Glass panels"]);
    assert!(!ctl.summary().has_next);

    let reads = store.lists();
    assert!(ctl.next_page().is_none());
    assert_eq!(store.lists(), reads);
    assert_eq!(ctl.query().page_index(), 2);

    let ticket = ctl.prev_page().expect("previous page exists");
    ctl.settle(ticket).await.unwrap();
    assert_eq!(ctl.query().page_index(), 1);
}

#[tokio::test]
async fn failed_read_keeps_the_previous_page() {
    let store = CountingStore::with_records(fleet());
    let mut ctl = controller(&store);
    ctl.refresh().await.unwrap();
    let shown = ctl.page().clone();

    store.fail_reads(true);
    let outcome = ctl
        .set_filter(FilterChange::search("glass"))
        .resolve()
        .await;
    let applied = ctl.apply(outcome);
    let Applied::Failed(err) = applied else {
        panic!("expected the read to fail");
    };

    assert_eq!(err.to_string(), "connection refused");
    assert_eq!(ctl.page(), &shown);
    assert!(!ctl.is_loading());
    assert_eq!(ctl.view().last_error.as_deref(), Some("connection refused"));

    store.fail_reads(false);
    ctl.refresh().await.unwrap();
    assert!(ctl.last_error().is_none());
    assert_eq!(ctl.page().total_count, 3);
}

#[tokio::test]
async fn page_past_the_end_is_pulled_back_after_rows_vanish() {
    let store = CountingStore::with_records(fleet());
    let mut ctl = controller(&store);
    ctl.refresh().await.unwrap();
    for _ in 0..2 {
        let ticket = ctl.next_page().unwrap();
        ctl.settle(ticket).await.unwrap();
    }
    assert_eq!(ctl.query().page_index(), 2);

    // Someone else removes the only two rows on the last page.
    store.inner.delete(ShipmentId(1)).await.unwrap();
    store.inner.delete(ShipmentId(2)).await.unwrap();

    let reads = store.lists();
    ctl.refresh().await.unwrap();

    assert_eq!(store.lists(), reads + 2);
    assert_eq!(ctl.query().page_index(), 1);
    assert_eq!(ctl.page().total_count, 10);
    assert_eq!(
        titles(ctl.page()),
        vec!["Stained glass", "Server racks", "Textbooks", "Wine crates", "Office chairs"]
    );
}

#[tokio::test]
async fn empty_result_lands_on_first_page() {
    let store = CountingStore::with_records(fleet());
    let mut ctl = controller(&store);

    let ticket = ctl.set_filter(FilterChange::search("zeppelin"));
    let applied = ctl.apply(ticket.resolve().await);

    assert!(matches!(applied, Applied::Page));
    assert_eq!(ctl.query().page_index(), 0);
    assert!(ctl.page().records.is_empty());
    assert_eq!(ctl.summary().page_count, 0);
    assert!(ctl.next_page().is_none());
}

#[test]
fn zero_page_size_is_rejected() {
    let store: Arc<dyn ShipmentStore> = CountingStore::with_records(Vec::new());
    assert!(QueryController::new(store, SessionConfig::default(), 0).is_err());
}
