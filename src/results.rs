use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, error};

use crate::error::FlightError;
use crate::model::Flight;
use crate::query::ResultsQuery;

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGroup<'a> {
    pub date: &'a str,
    pub flights: Vec<&'a Flight>,
}

// ISO dates sort lexicographically.
pub fn group_by_date<'a, I>(flights: I) -> Vec<DayGroup<'a>>
where
    I: IntoIterator<Item = &'a Flight>,
{
    let mut by_date: BTreeMap<&'a str, Vec<&'a Flight>> = BTreeMap::new();
    for flight in flights {
        by_date
            .entry(flight.departure_date.as_str())
            .or_default()
            .push(flight);
    }
    by_date
        .into_iter()
        .map(|(date, flights)| DayGroup { date, flights })
        .collect()
}

pub fn flatten_groups<'a>(groups: &[DayGroup<'a>]) -> Vec<&'a Flight> {
    groups
        .iter()
        .flat_map(|g| g.flights.iter().copied())
        .collect()
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size)
}

pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Loading,
    Empty,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// Each `begin` supersedes every earlier fetch; `finish` only commits the
/// outcome of the latest one, and nothing after `unmount`.
#[derive(Debug)]
pub struct ResultsPage {
    query: Option<ResultsQuery>,
    generation: u64,
    mounted: bool,
    loading: bool,
    flights: Vec<Flight>,
    ordered: Vec<Flight>,
    page: usize,
    page_size: usize,
}

impl Default for ResultsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsPage {
    pub fn new() -> Self {
        Self::with_page_size(PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            query: None,
            generation: 0,
            mounted: true,
            loading: false,
            flights: Vec::new(),
            ordered: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn begin(&mut self, query: ResultsQuery) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.page = 1;
        self.query = Some(query);
        FetchTicket {
            generation: self.generation,
        }
    }

    pub fn finish(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Vec<Flight>, FlightError>,
    ) -> bool {
        if !self.mounted || ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale flight response"
            );
            return false;
        }

        let flights = match outcome {
            Ok(flights) => flights,
            Err(e) => {
                error!(error = %e, "flight search failed");
                Vec::new()
            }
        };

        self.ordered = flatten_groups(&group_by_date(&flights))
            .into_iter()
            .cloned()
            .collect();
        self.flights = flights;
        self.page = 1;
        self.loading = false;
        true
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn query(&self) -> Option<&ResultsQuery> {
        self.query.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn state(&self) -> ViewState {
        if self.loading {
            ViewState::Loading
        } else if self.flights.is_empty() {
            ViewState::Empty
        } else {
            ViewState::Results
        }
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn ordered(&self) -> &[Flight] {
        &self.ordered
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.ordered.len(), self.page_size)
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn first_page(&mut self) {
        self.page = 1;
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn current_flights(&self) -> &[Flight] {
        page_slice(&self.ordered, self.page, self.page_size)
    }

    /// A day split across a page boundary shows up on both pages.
    pub fn visible_groups(&self) -> Vec<DayGroup<'_>> {
        group_by_date(self.current_flights())
    }

    pub fn view(&self) -> PageView<'_> {
        PageView {
            state: self.state(),
            total: self.flights.len(),
            page: self.page,
            total_pages: self.total_pages(),
            days: if self.loading {
                Vec::new()
            } else {
                self.visible_groups()
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView<'a> {
    pub state: ViewState,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub days: Vec<DayGroup<'a>>,
}
