mod common;

use common::{Reply, harness, points};
use stock_trend::{
    models::range::Range,
    providers::FailureKind,
    selection::{Effects, SelectionWarning},
};

fn names(set: &indexmap::IndexSet<String>) -> Vec<&str> {
    set.iter().map(String::as_str).collect()
}

#[tokio::test]
async fn load_fetches_series_and_quote_for_last_selected() {
    let mut h = harness(&["AAPL", "TSLA"], Range::OneMonth);
    h.session.load().await;

    assert_eq!(h.session.series().len(), 40);
    assert!(!h.session.loading());
    let live = h.session.live_quote().expect("quote fetched");
    assert_eq!(live.symbol, "TSLA");
    assert_eq!(h.quotes.asked(), vec!["TSLA"]);
}

#[tokio::test]
async fn adding_twice_warns_and_keeps_one_entry() {
    let mut h = harness(&["TSLA"], Range::OneDay);

    let first = h.session.add_symbol("AAPL").await.unwrap();
    assert!(first.refetch_series);
    let calls_after_first = h.primary.call_count();

    let second = h.session.add_symbol("AAPL").await;
    assert_eq!(second, Err(SelectionWarning::AlreadyTracked("AAPL".into())));
    assert_eq!(names(h.session.tracked()), vec!["TSLA", "AAPL"]);
    assert_eq!(h.primary.call_count(), calls_after_first, "rejected add must not refetch");
}

#[tokio::test]
async fn add_refetches_every_tracked_symbol() {
    let mut h = harness(&["TSLA"], Range::OneDay);
    h.session.add_symbol("nvda").await.unwrap();

    assert_eq!(h.primary.calls_for("TSLA"), 1);
    assert_eq!(h.primary.calls_for("NVDA"), 1);
    assert_eq!(h.session.series().len(), 40);
}

#[tokio::test]
async fn chart_click_narrows_selection_and_targets_quote() {
    let mut h = harness(&["AAPL", "TSLA"], Range::OneMonth);
    h.session.load().await;
    let series_calls = h.primary.call_count();

    let effects = h.session.select_from_chart_click("TSLA").await.unwrap();

    assert_eq!(
        effects,
        Effects {
            refetch_series: false,
            refresh_quote: true
        }
    );
    assert_eq!(names(h.session.selected()), vec!["TSLA"]);
    assert_eq!(h.quotes.asked().last().map(String::as_str), Some("TSLA"));
    assert_eq!(h.primary.call_count(), series_calls, "selection changes do not refetch history");
}

#[tokio::test]
async fn toggle_twice_restores_membership() {
    let mut h = harness(&["AAPL", "TSLA"], Range::OneMonth);

    h.session.toggle_select("TSLA").await.unwrap();
    assert_eq!(names(h.session.selected()), vec!["AAPL"]);
    assert_eq!(h.session.live_quote().unwrap().symbol, "AAPL");

    h.session.toggle_select("TSLA").await.unwrap();
    assert!(h.session.selected().contains("TSLA"));
    assert_eq!(h.session.live_quote().unwrap().symbol, "TSLA");
}

#[tokio::test]
async fn failed_quote_clears_previous_quote() {
    let mut h = harness(&["AAPL", "TSLA"], Range::OneMonth);
    h.session.load().await;
    assert!(h.session.live_quote().is_some());

    h.quotes.failing.lock().unwrap().push("AAPL".to_string());
    h.session.select_from_chart_click("AAPL").await.unwrap();
    assert!(h.session.live_quote().is_none());
}

#[tokio::test]
async fn deselecting_everything_clears_the_quote() {
    let mut h = harness(&["AAPL"], Range::OneMonth);
    h.session.load().await;
    h.session.toggle_select("AAPL").await.unwrap();
    assert!(h.session.selected().is_empty());
    assert!(h.session.live_quote().is_none());
}

#[tokio::test]
async fn range_change_refetches_with_new_range() {
    let mut h = harness(&["AAPL"], Range::OneDay);
    h.session.set_range(Range::FiveYears).await.unwrap();

    let calls = h.primary.calls.lock().unwrap().clone();
    assert_eq!(calls, vec![("AAPL".to_string(), Range::FiveYears)]);
    assert_eq!(h.session.range(), Range::FiveYears);
}

#[tokio::test]
async fn total_failure_keeps_previous_series() {
    let mut h = harness(&["AAPL", "TSLA"], Range::OneMonth);
    h.session.load().await;
    assert_eq!(h.session.series().len(), 40);

    h.primary.set("AAPL", Reply::Fail(FailureKind::Transport));
    h.primary.set("TSLA", Reply::Fail(FailureKind::Transport));
    h.session.set_range(Range::SixMonths).await.unwrap();

    assert_eq!(h.session.series().len(), 40, "stale series stays on display");
    assert_eq!(h.session.failed_symbols(), ["AAPL", "TSLA"]);
}

#[tokio::test]
async fn partial_failure_replaces_series() {
    let mut h = harness(&["AAPL", "TSLA"], Range::OneMonth);
    h.session.load().await;

    h.primary.set("TSLA", Reply::Fail(FailureKind::EmptyResult));
    h.session.set_range(Range::OneYear).await.unwrap();

    assert_eq!(h.session.series().len(), 20);
    assert!(h.session.series().iter().all(|p| p.symbol == "AAPL"));
    assert_eq!(h.session.failed_symbols(), ["TSLA"]);
}

#[tokio::test]
async fn stale_cycle_is_discarded() {
    let mut h = harness(&["AAPL"], Range::OneMonth);

    let older = h.session.begin_series_fetch();
    h.primary.set("AAPL", points(3));
    let newer = h.session.begin_series_fetch();
    assert!(h.session.loading());

    let aggregator = h.session.aggregator().clone();
    let newer_done = newer.run(&aggregator).await;
    h.primary.set("AAPL", points(30));
    let older_done = older.run(&aggregator).await;

    assert!(h.session.complete_series_fetch(newer_done));
    assert!(!h.session.loading());
    assert!(!h.session.complete_series_fetch(older_done));
    assert_eq!(h.session.series().len(), 3);
}

#[tokio::test]
async fn removing_the_quote_target_moves_the_quote() {
    let mut h = harness(&["AAPL", "TSLA"], Range::OneMonth);
    h.session.load().await;

    let effects = h.session.remove_symbol("TSLA").await.unwrap();
    assert!(effects.refetch_series && effects.refresh_quote);
    assert_eq!(names(h.session.tracked()), vec!["AAPL"]);
    assert_eq!(h.session.live_quote().unwrap().symbol, "AAPL");
    assert!(h.session.series().iter().all(|p| p.symbol == "AAPL"));
}

#[tokio::test]
async fn suggestions_respect_minimum_length_and_name_the_quote() {
    let mut h = harness(&["AAPL"], Range::OneMonth);

    assert!(h.session.suggest("T").await.is_empty());
    assert_eq!(h.search.call_count(), 0);

    let found = h.session.suggest("TE").await;
    assert_eq!(found.len(), 2);
    assert_eq!(h.search.call_count(), 1);

    h.session.pick_suggestion("TSLA").await.unwrap();
    assert!(h.session.suggestions().is_empty());
    assert_eq!(names(h.session.tracked()), vec!["AAPL", "TSLA"]);

    h.session.toggle_select("TSLA").await.unwrap();
    assert_eq!(h.session.live_quote().unwrap().display_name, "Tesla, Inc.");
}

#[tokio::test]
async fn picking_a_tracked_suggestion_warns() {
    let mut h = harness(&["AAPL"], Range::OneMonth);
    h.session.suggest("apple").await;
    assert_eq!(
        h.session.pick_suggestion("AAPL").await,
        Err(SelectionWarning::AlreadyTracked("AAPL".into()))
    );
    assert!(h.session.suggestions().is_empty());
}

#[tokio::test]
async fn view_serializes_for_the_presentation_layer() {
    let mut h = harness(&["AAPL"], Range::FiveDays);
    h.session.load().await;

    let json = serde_json::to_value(h.session.view()).unwrap();
    assert_eq!(json["range"], "5d");
    assert_eq!(json["tracked"][0], "AAPL");
    assert_eq!(json["loading"], false);
    assert_eq!(json["series"][0]["date"], "2024-02-01");
    assert_eq!(json["live_quote"]["symbol"], "AAPL");
}

#[tokio::test]
async fn failed_refetch_after_removal_drops_the_removed_symbol() {
    let mut h = harness(&["AAPL", "TSLA"], Range::OneMonth);
    h.session.load().await;
    assert_eq!(h.session.series().len(), 40);

    h.primary.set("AAPL", Reply::Fail(FailureKind::Transport));
    h.session.remove_symbol("TSLA").await.unwrap();

    assert_eq!(h.session.failed_symbols(), ["AAPL"]);
    assert_eq!(h.session.series().len(), 20, "AAPL's earlier points stay on display");
    assert!(h.session.series().iter().all(|p| p.symbol == "AAPL"));
    let json = serde_json::to_value(h.session.view()).unwrap();
    assert!(
        json["series"]
            .as_array()
            .unwrap()
            .iter()
            .all(|p| p["symbol"] == "AAPL")
    );
}

#[tokio::test]
async fn manual_refresh_requeries_the_current_target() {
    let mut h = harness(&["AAPL", "TSLA"], Range::OneMonth);
    h.session.load().await;

    h.quotes.failing.lock().unwrap().push("TSLA".to_string());
    h.session.refresh_live_quote().await;
    assert!(h.session.live_quote().is_none());

    h.quotes.failing.lock().unwrap().clear();
    h.session.refresh_live_quote().await;
    assert_eq!(h.session.live_quote().unwrap().symbol, "TSLA");
    assert_eq!(h.quotes.asked(), vec!["TSLA", "TSLA", "TSLA"]);
}

#[tokio::test]
async fn symbols_that_would_alter_the_request_are_rejected() {
    let mut h = harness(&["AAPL"], Range::OneMonth);

    let result = h.session.add_symbol("AAPL?range=5y").await;
    assert_eq!(
        result,
        Err(SelectionWarning::InvalidSymbol("AAPL?RANGE=5Y".into()))
    );
    assert_eq!(names(h.session.tracked()), vec!["AAPL"]);
    assert_eq!(h.primary.call_count(), 0);
}
