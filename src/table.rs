use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::model::Flight;
use crate::results::{DayGroup, ResultsPage, ViewState};

pub const EMPTY_MESSAGE: &str = "No flights found matching those criteria. Try different values.";

// "$1,234.5"
pub fn format_price(price: f64) -> String {
    let cents = (price.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if price < 0.0 && cents > 0 { "-" } else { "" };
    match frac {
        0 => format!("{sign}${grouped}"),
        f if f % 10 == 0 => format!("{sign}${grouped}.{}", f / 10),
        f => format!("{sign}${grouped}.{f:02}"),
    }
}

pub fn day_title(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%A, %d %B").to_string(),
        Err(_) => date.to_string(),
    }
}

fn short_time(time: Option<&str>) -> String {
    match time {
        // 08:30:00 -> 08:30
        Some(t) if t.len() == 8 && t.as_bytes()[5] == b':' => t[..5].to_string(),
        Some(t) if !t.is_empty() => t.to_string(),
        _ => "—".to_string(),
    }
}

fn day_table(flights: &[&Flight]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Departs", "Arrives", "Airline", "Flight", "Aircraft", "Price", "Seats",
        ]);

    for flight in flights {
        let departs = format!(
            "{}\n{}",
            short_time(flight.departure_time.as_deref()),
            flight.origin
        );
        let arrives = format!(
            "{}\n{}",
            short_time(flight.arrival_time.as_deref()),
            flight.destination
        );
        let airline = flight
            .airline
            .clone()
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| "—".to_string());
        let aircraft = flight.aircraft_type.clone().unwrap_or_default();

        table.add_row(vec![
            departs,
            arrives,
            airline,
            flight.flight_number.clone(),
            aircraft,
            format_price(flight.price),
            format!("{} seats", flight.seats_available),
        ]);
    }

    table
}

pub fn render_day(group: &DayGroup<'_>) -> String {
    format!("{}\n{}", day_title(group.date), day_table(&group.flights))
}

pub fn summary_line(page: &ResultsPage) -> String {
    if page.is_loading() {
        return "Loading…".to_string();
    }
    format!(
        "{} results in {} pages",
        page.flights().len(),
        page.total_pages()
    )
}

pub fn render_page(page: &ResultsPage) -> String {
    let mut out = vec![summary_line(page)];

    match page.state() {
        ViewState::Loading => {}
        ViewState::Empty => out.push(EMPTY_MESSAGE.to_string()),
        ViewState::Results => {
            for group in page.visible_groups() {
                out.push(render_day(&group));
            }
            if page.total_pages() > 1 {
                out.push(format!("Page {} of {}", page.page(), page.total_pages()));
            }
        }
    }

    out.join("\n\n")
}
