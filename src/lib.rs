pub mod autocomplete;
pub mod debounce;
pub mod error;
pub mod fetch;
pub mod mcp;
pub mod model;
pub mod normalize;
pub mod query;
pub mod results;
pub mod session;
pub mod suggest;
pub mod table;

use std::sync::Arc;

use autocomplete::{AutocompleteEvent, Key, MountedAutocomplete};
use error::FlightError;
use fetch::FlightSource;
use query::ResultsQuery;
use results::ResultsPage;

pub async fn search<S: FlightSource>(
    source: &S,
    query: ResultsQuery,
) -> Result<ResultsPage, FlightError> {
    query.validate()?;
    let request = query.request();
    let mut page = ResultsPage::new();
    let ticket = page.begin(query);
    let outcome = fetch::load_flights(source, request.as_ref()).await;
    page.finish(ticket, outcome);
    Ok(page)
}

pub async fn suggest_destinations<S>(source: Arc<S>, text: &str) -> Vec<String>
where
    S: FlightSource + Send + Sync + 'static,
{
    let mut field = MountedAutocomplete::mount(source, "");
    field.type_text(text);
    field.settle_all().await;
    field.widget().suggestions().to_vec()
}

/// Replaces partial destination text with the first suggestion, picked with
/// the keyboard the way a user would. Returns `None` if nothing matches.
pub async fn resolve_destination<S>(source: Arc<S>, text: &str) -> Option<String>
where
    S: FlightSource + Send + Sync + 'static,
{
    let mut field = MountedAutocomplete::mount(source, "");
    field.type_text(text);
    field.settle_all().await;

    field.key(Key::ArrowDown);
    field
        .key(Key::Enter)
        .into_iter()
        .find_map(|event| match event {
            AutocompleteEvent::Selected(city) => Some(city),
            AutocompleteEvent::Changed(_) => None,
        })
}
