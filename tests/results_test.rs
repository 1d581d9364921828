use aerodesk::error::FlightError;
use aerodesk::model::Flight;
use aerodesk::query::ResultsQuery;
use aerodesk::results::{
    flatten_groups, group_by_date, page_slice, total_pages, ResultsPage, ViewState, PAGE_SIZE,
};

fn flight(id: i64, date: &str) -> Flight {
    Flight {
        id: Some(id),
        flight_number: format!("AR{id:04}"),
        origin: "Buenos Aires".into(),
        destination: "Córdoba".into(),
        departure_date: date.into(),
        departure_time: Some("08:30:00".into()),
        arrival_date: None,
        arrival_time: Some("09:45:00".into()),
        price: 100.0 + id as f64,
        seats_available: 40,
        airline: Some("Aerolíneas".into()),
        aircraft_type: Some("B737".into()),
        flight_status: None,
    }
}

fn cordoba_march() -> ResultsQuery {
    ResultsQuery::new("", "Córdoba", "", Some("2025-03".into()))
}

/// 23 flights over three dates, deliberately interleaved.
fn twenty_three() -> Vec<Flight> {
    let dates = ["2025-03-12", "2025-03-10", "2025-03-11"];
    (0..23).map(|i| flight(i, dates[i as usize % 3])).collect()
}

fn ids(flights: &[Flight]) -> Vec<i64> {
    flights.iter().filter_map(|f| f.id).collect()
}

#[test]
fn groups_sorted_by_date_keeping_server_order() {
    let flights = vec![
        flight(1, "2025-03-11"),
        flight(2, "2025-03-10"),
        flight(3, "2025-03-11"),
        flight(4, "2025-03-10"),
    ];
    let groups = group_by_date(&flights);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].date, "2025-03-10");
    assert_eq!(groups[1].date, "2025-03-11");
    let first: Vec<i64> = groups[0].flights.iter().filter_map(|f| f.id).collect();
    let second: Vec<i64> = groups[1].flights.iter().filter_map(|f| f.id).collect();
    assert_eq!(first, vec![2, 4]);
    assert_eq!(second, vec![1, 3]);

    let flat: Vec<i64> = flatten_groups(&groups).iter().filter_map(|f| f.id).collect();
    assert_eq!(flat, vec![2, 4, 1, 3]);
}

#[test]
fn page_math() {
    assert_eq!(total_pages(0, 10), 0);
    assert_eq!(total_pages(10, 10), 1);
    assert_eq!(total_pages(23, 10), 3);

    let items: Vec<u32> = (0..23).collect();
    assert_eq!(page_slice(&items, 1, 10).len(), 10);
    assert_eq!(page_slice(&items, 3, 10), &[20, 21, 22]);
    assert!(page_slice(&items, 4, 10).is_empty());
    assert!(page_slice(&items, 0, 10).is_empty());
}

#[test]
fn twenty_three_flights_span_three_pages_exactly_once() {
    let mut page = ResultsPage::new();
    let ticket = page.begin(cordoba_march());
    assert!(page.finish(ticket, Ok(twenty_three())));

    assert_eq!(PAGE_SIZE, 10);
    assert_eq!(page.total_pages(), 3);

    let mut seen = Vec::new();
    for n in 1..=page.total_pages() {
        page.set_page(n);
        seen.extend(ids(page.current_flights()));
    }
    assert_eq!(seen, ids(page.ordered()));

    let mut sorted = seen.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), 23);
}

#[test]
fn displayed_set_is_exactly_the_server_response() {
    let response = twenty_three();
    let mut page = ResultsPage::new();
    let ticket = page.begin(cordoba_march());
    page.finish(ticket, Ok(response.clone()));
    assert_eq!(page.flights(), response.as_slice());
}

#[test]
fn visible_groups_are_ascending_and_merge_same_day() {
    let mut page = ResultsPage::new();
    let ticket = page.begin(cordoba_march());
    page.finish(ticket, Ok(twenty_three()));

    for n in 1..=page.total_pages() {
        page.set_page(n);
        let groups = page.visible_groups();
        let dates: Vec<&str> = groups.iter().map(|g| g.date).collect();
        let mut sorted = dates.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(dates, sorted, "page {n} groups must be unique and ascending");
    }
}

#[test]
fn day_straddling_a_page_boundary_appears_on_both_pages() {
    // 2025-03-10 takes 8 slots, so 2025-03-11 (7 flights) starts on page 1
    // and continues on page 2.
    let mut page = ResultsPage::new();
    let ticket = page.begin(cordoba_march());
    page.finish(ticket, Ok(twenty_three()));

    page.set_page(1);
    let first: Vec<String> = page.visible_groups().iter().map(|g| g.date.to_string()).collect();
    page.set_page(2);
    let second: Vec<String> = page.visible_groups().iter().map(|g| g.date.to_string()).collect();

    assert_eq!(first, ["2025-03-10", "2025-03-11"]);
    assert_eq!(second.first().map(String::as_str), Some("2025-03-11"));
}

#[test]
fn page_navigation_is_clamped() {
    let mut page = ResultsPage::new();
    let ticket = page.begin(cordoba_march());
    page.finish(ticket, Ok(twenty_three()));

    page.prev_page();
    assert_eq!(page.page(), 1);
    page.next_page();
    page.next_page();
    page.next_page();
    assert_eq!(page.page(), 3);
    page.set_page(99);
    assert_eq!(page.page(), 3);
    page.first_page();
    assert_eq!(page.page(), 1);
}

#[test]
fn new_query_resets_page_before_response() {
    let mut page = ResultsPage::new();
    let ticket = page.begin(cordoba_march());
    page.finish(ticket, Ok(twenty_three()));
    page.set_page(3);

    page.begin(ResultsQuery::new("", "Salta", "", Some("2025-03".into())));
    assert_eq!(page.page(), 1);
    assert_eq!(page.state(), ViewState::Loading);
}

#[test]
fn stale_response_is_ignored() {
    let mut page = ResultsPage::new();
    let old = page.begin(cordoba_march());
    let new = page.begin(ResultsQuery::new("", "Salta", "", Some("2025-03".into())));

    assert!(page.finish(new, Ok(vec![flight(1, "2025-03-10")])));
    assert!(!page.finish(old, Ok(twenty_three())));

    assert_eq!(ids(page.flights()), vec![1]);
    assert_eq!(page.query().map(|q| q.destination.as_str()), Some("Salta"));
}

#[test]
fn stale_response_arriving_first_does_not_clear_loading() {
    let mut page = ResultsPage::new();
    let old = page.begin(cordoba_march());
    let new = page.begin(cordoba_march());

    assert!(!page.finish(old, Ok(twenty_three())));
    assert_eq!(page.state(), ViewState::Loading);
    assert!(page.finish(new, Ok(Vec::new())));
    assert_eq!(page.state(), ViewState::Empty);
}

#[test]
fn nothing_commits_after_unmount() {
    let mut page = ResultsPage::new();
    let ticket = page.begin(cordoba_march());
    page.unmount();
    assert!(!page.finish(ticket, Ok(twenty_three())));
    assert!(page.flights().is_empty());
}

#[test]
fn fetch_error_looks_like_no_results() {
    let mut page = ResultsPage::new();
    let ticket = page.begin(cordoba_march());
    assert!(page.finish(ticket, Err(FlightError::Timeout)));
    assert_eq!(page.state(), ViewState::Empty);
    assert!(!page.is_loading());
    assert_eq!(page.total_pages(), 0);
}

#[test]
fn loading_suppresses_empty_state() {
    let mut page = ResultsPage::new();
    page.begin(cordoba_march());
    assert_eq!(page.state(), ViewState::Loading);
    let view = page.view();
    assert_eq!(view.state, ViewState::Loading);
    assert!(view.days.is_empty());
}

#[test]
fn view_serializes_day_sections() {
    let mut page = ResultsPage::new();
    let ticket = page.begin(cordoba_march());
    page.finish(ticket, Ok(vec![flight(7, "2025-03-10")]));

    let json = serde_json::to_value(page.view()).unwrap();
    assert_eq!(json["state"], "results");
    assert_eq!(json["total"], 1);
    assert_eq!(json["totalPages"], 1);
    assert_eq!(json["days"][0]["date"], "2025-03-10");
    assert_eq!(json["days"][0]["flights"][0]["flightNumber"], "AR0007");
}
