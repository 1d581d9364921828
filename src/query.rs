use chrono::{Datelike, Local, NaiveDate};

use crate::error::FlightError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsQuery {
    pub origin: String,
    pub destination: String,
    pub from_date: String,
    pub ym: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    Exact {
        origin: String,
        destination: String,
        from_date: String,
    },
    ByMonth {
        destination: String,
        ym: String,
    },
}

pub fn current_year_month() -> String {
    year_month_of(Local::now().date_naive())
}

pub fn year_month_of(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

fn present(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn validate_date(date: &str) -> Result<(), FlightError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| FlightError::InvalidDate(date.to_string()))
}

fn validate_month(ym: &str) -> Result<(), FlightError> {
    let (year, month) = ym
        .split_once('-')
        .ok_or_else(|| FlightError::InvalidMonth(ym.to_string()))?;
    if year.len() != 4 || month.len() != 2 {
        return Err(FlightError::InvalidMonth(ym.to_string()));
    }
    let year: i32 = year
        .parse()
        .map_err(|_| FlightError::InvalidMonth(ym.to_string()))?;
    let month: u32 = month
        .parse()
        .map_err(|_| FlightError::InvalidMonth(ym.to_string()))?;
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|_| ())
        .ok_or_else(|| FlightError::InvalidMonth(ym.to_string()))
}

impl ResultsQuery {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        from_date: impl Into<String>,
        ym: Option<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            from_date: from_date.into(),
            ym: ym
                .filter(|y| !y.trim().is_empty())
                .unwrap_or_else(current_year_month),
        }
    }

    // Accepts a bare query string, a leading `?` or a full URL.
    pub fn from_query_string(qs: &str) -> Self {
        let qs = qs.split_once('?').map_or(qs, |(_, rest)| rest);
        let qs = qs.split_once('#').map_or(qs, |(q, _)| q);

        let mut origin = String::new();
        let mut destination = String::new();
        let mut from_date = String::new();
        let mut ym = None;

        for (key, value) in form_urlencoded::parse(qs.as_bytes()) {
            match key.as_ref() {
                "origin" => origin = value.into_owned(),
                "destination" => destination = value.into_owned(),
                "fromDate" => from_date = value.into_owned(),
                "ym" => ym = Some(value.into_owned()),
                _ => {}
            }
        }

        Self::new(origin, destination, from_date, ym)
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in [
            ("origin", &self.origin),
            ("destination", &self.destination),
            ("fromDate", &self.from_date),
            ("ym", &self.ym),
        ] {
            if let Some(v) = present(value) {
                serializer.append_pair(key, v);
            }
        }
        serializer.finish()
    }

    pub fn request(&self) -> Option<SearchRequest> {
        let destination = present(&self.destination)?;

        if let (Some(origin), Some(from_date)) = (present(&self.origin), present(&self.from_date)) {
            return Some(SearchRequest::Exact {
                origin: origin.to_string(),
                destination: destination.to_string(),
                from_date: from_date.to_string(),
            });
        }

        present(&self.ym).map(|ym| SearchRequest::ByMonth {
            destination: destination.to_string(),
            ym: ym.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), FlightError> {
        match self.request() {
            Some(SearchRequest::Exact { from_date, .. }) => validate_date(&from_date),
            Some(SearchRequest::ByMonth { ym, .. }) => validate_month(&ym),
            None => Ok(()),
        }
    }
}

impl SearchRequest {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Exact { .. } => "/flights/search",
            Self::ByMonth { .. } => "/flights/search/by-destination-and-month",
        }
    }

    pub fn to_url_params(&self) -> Vec<(String, String)> {
        match self {
            Self::Exact {
                origin,
                destination,
                from_date,
            } => vec![
                ("origin".to_string(), origin.clone()),
                ("destination".to_string(), destination.clone()),
                ("fromDate".to_string(), from_date.clone()),
            ],
            Self::ByMonth { destination, ym } => vec![
                ("destination".to_string(), destination.clone()),
                ("ym".to_string(), ym.clone()),
            ],
        }
    }
}
