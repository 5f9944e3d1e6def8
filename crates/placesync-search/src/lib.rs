//! Place search pipeline.
//!
//! Merges results from the user's saved places, publicly shared places and an
//! external mapping provider, suppresses external entries that duplicate a
//! saved place, debounces keystrokes, and publishes only the newest session's
//! results.

pub mod aggregator;
pub mod debounce;
pub mod error;
pub mod matcher;
pub mod merge;
pub mod recent;
pub mod sources;

pub use aggregator::{AggregatorOptions, SearchAggregator, SearchState, SessionOutcome};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use error::ProviderError;
pub use matcher::{is_same_duplicate, DUPLICATE_THRESHOLD_DEGREES};
pub use merge::merge;
pub use recent::RecentQueries;
pub use sources::{
    CollectionAdapter, ConfiguredProvider, ExternalAdapter, ExternalOutcome, KeywordSearchClient,
    PlaceProvider, TextSearchClient, TextSearchOptions,
};
