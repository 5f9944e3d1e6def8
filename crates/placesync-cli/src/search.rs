//! One-shot `search` command.

use placesync_core::{AppConfig, Category};
use placesync_map::ResultView;
use placesync_search::{SearchAggregator, SessionOutcome};

use crate::SourceFiles;

/// Run a single search session and print the requested page as JSON.
///
/// A failing external provider is not an error here: the saved places are
/// still printed and the advisory goes to stderr.
pub(crate) async fn run_search(
    config: &AppConfig,
    keyword: &str,
    sources: &SourceFiles,
    category: Option<Category>,
    page: usize,
) -> anyhow::Result<()> {
    let (local, public) = sources.load()?;
    let aggregator = SearchAggregator::from_config(config, local, public)
        .map_err(|e| anyhow::anyhow!("failed to build search provider: {e}"))?;

    match aggregator.search(keyword).await {
        SessionOutcome::Cleared => {
            anyhow::bail!("keyword is blank");
        }
        outcome => tracing::info!(keyword, ?outcome, "search finished"),
    }

    let state = aggregator.state();
    let mut view = ResultView::from_config(config);
    view.set_category(category);
    view.set_page(page);
    let page = view.page_of(&state.results);

    println!("{}", serde_json::to_string_pretty(&page)?);
    if let Some(advisory) = &state.error {
        eprintln!("warning: {advisory}");
    }
    Ok(())
}
