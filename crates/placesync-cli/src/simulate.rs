//! `simulate` command: drives the debounced pipeline with scripted keystrokes
//! and reconciles a map surface that only logs what it is asked to do.

use std::sync::Arc;
use std::time::Duration;

use placesync_core::{AppConfig, MarkerKey, SearchableRecord};
use placesync_map::{Bounds, MapSurface, MarkerClick, MarkerReconciler, ResultView};
use placesync_search::{PlaceProvider, SearchAggregator, SearchState};
use tokio::sync::watch;

use crate::SourceFiles;

/// Slack added after the debounce window before waiting on the pipeline.
const SETTLE_MARGIN: Duration = Duration::from_millis(50);

/// Map surface that records marker operations as log lines.
#[derive(Debug, Default)]
pub(crate) struct LoggingSurface {
    next_handle: u64,
}

impl MapSurface for LoggingSurface {
    type Handle = u64;

    fn add_marker(
        &mut self,
        key: &MarkerKey,
        record: &SearchableRecord,
        label: &str,
        _on_click: MarkerClick,
    ) -> u64 {
        self.next_handle += 1;
        tracing::info!(
            %key,
            handle = self.next_handle,
            label,
            latitude = ?record.latitude,
            longitude = ?record.longitude,
            "add marker"
        );
        self.next_handle
    }

    fn remove_marker(&mut self, key: &MarkerKey, handle: u64) {
        tracing::info!(%key, handle, "remove marker");
    }

    fn clear_markers(&mut self) {
        tracing::info!("clear markers");
    }

    fn update_marker_label(&mut self, key: &MarkerKey, handle: &u64, label: &str) {
        tracing::info!(%key, handle, label, "relabel marker");
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        let (center_lat, center_lng) = bounds.center();
        tracing::info!(
            center_lat,
            center_lng,
            south = bounds.south,
            west = bounds.west,
            north = bounds.north,
            east = bounds.east,
            "fit bounds"
        );
    }
}

/// Wait for a session newer than generation `before` to settle.
///
/// The published state is not searching both before the debounced search
/// starts and after it finishes, so the generation has to move too.
async fn wait_until_settled<P: PlaceProvider>(
    aggregator: &SearchAggregator<P>,
    rx: &mut watch::Receiver<SearchState>,
    before: u64,
    limit: Duration,
) -> anyhow::Result<SearchState> {
    let settled = rx.wait_for(|state| aggregator.generation() > before && !state.is_searching);
    let state = tokio::time::timeout(limit, settled)
        .await
        .map_err(|_| anyhow::anyhow!("search did not settle within {limit:?}"))?
        .map_err(|e| anyhow::anyhow!("search pipeline closed: {e}"))?;
    Ok(SearchState::clone(&state))
}

pub(crate) async fn run_simulate(
    config: &AppConfig,
    keystrokes: &[String],
    sources: &SourceFiles,
    gap: Duration,
    select: &[String],
) -> anyhow::Result<()> {
    let (local, public) = sources.load()?;
    let aggregator = Arc::new(
        SearchAggregator::from_config(config, local, public)
            .map_err(|e| anyhow::anyhow!("failed to build search provider: {e}"))?,
    );
    let mut rx = aggregator.subscribe();
    let before = aggregator.generation();

    for (i, keystroke) in keystrokes.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(gap).await;
        }
        tracing::info!(keystroke = %keystroke, "input");
        aggregator.input(keystroke);
    }

    tokio::time::sleep(aggregator.debounce() + SETTLE_MARGIN).await;
    let settle = Duration::from_secs(config.provider_timeout_secs + 1);
    let state = wait_until_settled(&aggregator, &mut rx, before, settle).await?;
    let page = ResultView::from_config(config).page_of(&state.results);

    let mut surface = LoggingSurface::default();
    let mut reconciler = MarkerReconciler::new(Arc::new(|key: &MarkerKey| {
        tracing::info!(%key, "marker clicked");
    }));
    let report = reconciler.sync_geometry(&mut surface, &page.records());

    let selection: Vec<MarkerKey> = select
        .iter()
        .filter_map(|wanted| {
            let found = state
                .results
                .iter()
                .map(placesync_core::MergedResult::key)
                .find(|key| key.as_str() == wanted.as_str());
            if found.is_none() {
                tracing::warn!(key = %wanted, "selected key is not in the results");
            }
            found
        })
        .collect();
    let relabeled = reconciler.update_selection(&mut surface, selection);

    println!(
        "{} results ({} on page {}/{}), markers: {} shown, {} added, {} removed, {} relabeled",
        state.results.len(),
        page.items.len(),
        page.page + 1,
        page.page_count,
        reconciler.len(),
        report.added,
        report.removed,
        relabeled,
    );
    if let Some(advisory) = &state.error {
        eprintln!("warning: {advisory}");
    }
    let recent = aggregator.recent_queries();
    if !recent.is_empty() {
        println!("recent: {}", recent.join(", "));
    }

    aggregator.teardown();
    reconciler.clear(&mut surface);
    Ok(())
}

#[cfg(test)]
mod tests {
    use placesync_core::{Category, SourceTag};
    use placesync_search::{AggregatorOptions, CollectionAdapter, ConfiguredProvider};

    use super::*;

    #[tokio::test]
    async fn settles_on_the_session_started_after_input() {
        let aggregator = Arc::new(SearchAggregator::new(
            CollectionAdapter::local(vec![SearchableRecord::new(
                SourceTag::Local,
                "1",
                "Cafe Onion",
                "",
                Category::Cafe,
            )]),
            CollectionAdapter::public(vec![]),
            ConfiguredProvider::Disabled,
            AggregatorOptions {
                debounce: Duration::from_millis(20),
                recent_capacity: 5,
            },
        ));
        let mut rx = aggregator.subscribe();
        let before = aggregator.generation();

        aggregator.input("onion");
        assert!(!aggregator.state().is_searching, "debounce has not fired yet");

        let state = wait_until_settled(&aggregator, &mut rx, before, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(state.results.len(), 1);
        assert!(state.error.is_some(), "disabled provider leaves an advisory");
        assert_eq!(aggregator.current_session(), None);
    }

    #[tokio::test]
    async fn times_out_when_nothing_new_starts() {
        let aggregator = SearchAggregator::new(
            CollectionAdapter::local(vec![]),
            CollectionAdapter::public(vec![]),
            ConfiguredProvider::Disabled,
            AggregatorOptions::default(),
        );
        let mut rx = aggregator.subscribe();
        let before = aggregator.generation();

        let err = wait_until_settled(&aggregator, &mut rx, before, Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("did not settle"), "{err}");
    }
}
