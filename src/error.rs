use std::fmt;

#[derive(Debug)]
pub enum FlightError {
    Timeout,
    ConnectionFailed(String),
    DnsResolution(String),
    ProxyError(String),
    RateLimited,
    Unauthorized,
    HttpStatus(u16),
    TlsError(String),
    Parse(String),
    InvalidDate(String),
    InvalidMonth(String),
    Validation(String),
    Session(String),
}

impl fmt::Display for FlightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(
                f,
                "request timed out — the booking backend may be slow or unreachable. \
                 Try increasing --timeout or check that the API is running"
            ),
            Self::ConnectionFailed(detail) => write!(
                f,
                "connection failed — check that the booking API is reachable ({detail})"
            ),
            Self::DnsResolution(host) => write!(
                f,
                "DNS resolution failed for {host} — check the --api URL"
            ),
            Self::ProxyError(detail) => write!(
                f,
                "proxy error — check your --proxy URL is correct ({detail})"
            ),
            Self::RateLimited => write!(
                f,
                "rate limited by the booking API (HTTP 429) — wait a moment before retrying"
            ),
            Self::Unauthorized => write!(
                f,
                "the booking API rejected the request (HTTP 401) — check --token"
            ),
            Self::HttpStatus(status) => write!(
                f,
                "unexpected HTTP status {status} from the booking API"
            ),
            Self::TlsError(detail) => write!(
                f,
                "TLS/SSL error — connection to the booking API failed ({detail})"
            ),
            Self::Parse(detail) => write!(
                f,
                "failed to parse the booking API response — {detail}"
            ),
            Self::InvalidDate(date) => write!(
                f,
                "invalid date \"{date}\" — must be YYYY-MM-DD format (e.g. 2025-03-14)"
            ),
            Self::InvalidMonth(ym) => write!(
                f,
                "invalid month \"{ym}\" — must be YYYY-MM format (e.g. 2025-03)"
            ),
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::Session(detail) => write!(f, "session storage error — {detail}"),
        }
    }
}

impl std::error::Error for FlightError {}

impl From<serde_json::Error> for FlightError {
    fn from(err: serde_json::Error) -> Self {
        FlightError::Parse(err.to_string())
    }
}

pub fn from_http_error(err: wreq::Error) -> FlightError {
    let msg = err.to_string();
    let lower = msg.to_lowercase();

    if err.is_timeout() {
        return FlightError::Timeout;
    }

    if err.is_connect() {
        if lower.contains("dns") || lower.contains("resolve") || lower.contains("getaddrinfo") {
            return FlightError::DnsResolution(msg);
        }
        return FlightError::ConnectionFailed(msg);
    }

    if lower.contains("proxy") || lower.contains("socks") {
        return FlightError::ProxyError(msg);
    }

    if lower.contains("tls") || lower.contains("ssl") || lower.contains("certificate") {
        return FlightError::TlsError(msg);
    }

    if lower.contains("builder error") && lower.contains("uri") {
        return FlightError::Validation(format!("invalid API URL ({msg})"));
    }

    FlightError::ConnectionFailed(msg)
}

pub fn exit_code(err: &FlightError) -> i32 {
    match err {
        FlightError::InvalidDate(_)
        | FlightError::InvalidMonth(_)
        | FlightError::Validation(_) => 2,
        FlightError::Timeout
        | FlightError::ConnectionFailed(_)
        | FlightError::DnsResolution(_)
        | FlightError::TlsError(_)
        | FlightError::ProxyError(_) => 3,
        FlightError::RateLimited | FlightError::Unauthorized => 4,
        FlightError::HttpStatus(_) => 5,
        FlightError::Parse(_) => 6,
        FlightError::Session(_) => 7,
    }
}

pub fn error_kind(err: &FlightError) -> &'static str {
    match err {
        FlightError::InvalidDate(_) => "invalid_date",
        FlightError::InvalidMonth(_) => "invalid_month",
        FlightError::Validation(_) => "validation_error",
        FlightError::Timeout => "timeout",
        FlightError::ConnectionFailed(_) => "connection_failed",
        FlightError::DnsResolution(_) => "dns_error",
        FlightError::TlsError(_) => "tls_error",
        FlightError::ProxyError(_) => "proxy_error",
        FlightError::RateLimited => "rate_limited",
        FlightError::Unauthorized => "unauthorized",
        FlightError::HttpStatus(_) => "http_error",
        FlightError::Parse(_) => "parse_error",
        FlightError::Session(_) => "session_error",
    }
}
