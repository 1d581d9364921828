use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use aerodesk::error::{self, FlightError};
use aerodesk::fetch::{ApiClient, FetchOptions, DEFAULT_API_URL};
use aerodesk::query::ResultsQuery;
use aerodesk::results::ResultsPage;
use aerodesk::session::{Session, SessionStore};
use aerodesk::table;

#[derive(Parser)]
#[command(
    name = "aerodesk",
    about = "Search the airline booking backend from the terminal",
    version,
    after_help = "\
Examples:
  aerodesk search -o \"Buenos Aires\" -d Bariloche -f 2025-03-14
  aerodesk search -d Córdoba --ym 2025-03
  aerodesk search --query \"destination=C%C3%B3rdoba&ym=2025-03\" --json --pretty
  aerodesk destinations bar
  aerodesk search -d cord --resolve --page 2"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct ApiArgs {
    #[arg(
        long,
        env = "AERODESK_API",
        default_value = DEFAULT_API_URL,
        value_name = "URL",
        help = "Base URL of the booking API"
    )]
    api: String,

    #[arg(long, env = "AERODESK_PROXY", value_name = "URL", help = "HTTP or SOCKS5 proxy")]
    proxy: Option<String>,

    #[arg(long, default_value = "30", value_name = "SECS", help = "Request timeout")]
    timeout: u64,

    #[arg(
        long,
        env = "AERODESK_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true,
        help = "Bearer token sent with every request"
    )]
    token: Option<String>,
}

impl ApiArgs {
    fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            base_url: self.api.clone(),
            proxy: self.proxy.clone(),
            timeout: self.timeout,
            token: self.token.clone(),
        }
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(
        about = "Search for flights",
        long_about = "Search for flights by origin, destination and date.\n\
            With -o/-d/-f an exact search is made. With only -d, every flight to that \
            destination in the --ym month is listed (default: current month).",
        after_help = "\
Examples:
  Exact:        aerodesk search -o \"Buenos Aires\" -d Bariloche -f 2025-03-14
  Whole month:  aerodesk search -d Córdoba --ym 2025-03
  From the web: aerodesk search --query \"origin=Rosario&destination=Salta&fromDate=2025-04-01\"
  Fuzzy city:   aerodesk search -d cord --resolve
  JSON output:  aerodesk search -d Córdoba --json --pretty"
    )]
    Search(SearchArgs),
    #[command(about = "Suggest destination cities for partial text")]
    Destinations(DestinationsArgs),
    #[command(about = "Sign in with a demo account")]
    Login(LoginArgs),
    #[command(about = "Forget the stored session")]
    Logout,
    #[command(about = "Show the stored session")]
    Whoami,
    #[command(about = "Start MCP server for AI agents (stdio transport)")]
    Mcp(ApiArgs),
}

#[derive(clap::Args)]
struct SearchArgs {
    #[arg(short, long, value_name = "CITY", help = "Origin city")]
    origin: Option<String>,

    #[arg(short, long, value_name = "CITY", help = "Destination city")]
    destination: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_name = "YYYY-MM-DD",
        help = "Earliest departure date (exact search)"
    )]
    from_date: Option<String>,

    #[arg(
        long,
        value_name = "YYYY-MM",
        help = "Month to list when only a destination is given"
    )]
    ym: Option<String>,

    #[arg(
        long,
        value_name = "QS",
        conflicts_with_all = ["origin", "destination", "from_date", "ym"],
        help = "Web UI query string (origin=..&destination=..&fromDate=..&ym=..)"
    )]
    query: Option<String>,

    #[arg(long, default_value = "1", value_name = "N", help = "Results page (10 flights per page)")]
    page: usize,

    #[arg(long, help = "Replace the destination with its first suggested city")]
    resolve: bool,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, help = "Output as pretty-printed JSON")]
    pretty: bool,

    #[command(flatten)]
    api: ApiArgs,
}

#[derive(clap::Args)]
struct DestinationsArgs {
    #[arg(value_name = "TEXT", help = "Partial city name (at least 2 characters)")]
    text: String,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[command(flatten)]
    api: ApiArgs,
}

#[derive(clap::Args)]
struct LoginArgs {
    #[arg(long, value_name = "EMAIL")]
    email: String,

    #[arg(long, value_name = "PASSWORD")]
    password: String,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn die(err: &FlightError, json_mode: bool) -> ! {
    if json_mode {
        let json = serde_json::json!({
            "error": {
                "kind": error::error_kind(err),
                "message": err.to_string(),
            }
        });
        println!("{json}");
    } else {
        eprintln!("error: {err}");
    }
    process::exit(error::exit_code(err));
}

fn build_query(args: &SearchArgs) -> ResultsQuery {
    match args.query {
        Some(ref qs) => ResultsQuery::from_query_string(qs),
        None => ResultsQuery::new(
            args.origin.clone().unwrap_or_default(),
            args.destination.clone().unwrap_or_default(),
            args.from_date.clone().unwrap_or_default(),
            args.ym.clone(),
        ),
    }
}

fn print_page(page: &ResultsPage, args: &SearchArgs) {
    if args.json || args.pretty {
        let view = page.view();
        let output = if args.pretty {
            serde_json::to_string_pretty(&view)
        } else {
            serde_json::to_string(&view)
        };
        match output {
            Ok(s) => println!("{s}"),
            Err(e) => die(&FlightError::from(e), true),
        }
    } else {
        println!("{}", table::render_page(page));
    }
}

async fn run_search(args: SearchArgs) {
    let json_mode = args.json || args.pretty;

    let client = match ApiClient::new(&args.api.fetch_options()) {
        Ok(c) => Arc::new(c),
        Err(e) => die(&e, json_mode),
    };

    let mut query = build_query(&args);

    if args.resolve && !query.destination.trim().is_empty() {
        match aerodesk::resolve_destination(client.clone(), &query.destination).await {
            Some(city) => {
                if !json_mode {
                    eprintln!("destination: {city}");
                }
                query.destination = city;
            }
            None => die(
                &FlightError::Validation(format!(
                    "no known destination matches \"{}\"",
                    query.destination
                )),
                json_mode,
            ),
        }
    }

    let mut page = match aerodesk::search(client.as_ref(), query).await {
        Ok(p) => p,
        Err(e) => die(&e, json_mode),
    };
    page.set_page(args.page);

    print_page(&page, &args);
}

async fn run_destinations(args: DestinationsArgs) {
    let client = match ApiClient::new(&args.api.fetch_options()) {
        Ok(c) => Arc::new(c),
        Err(e) => die(&e, args.json),
    };

    let cities = aerodesk::suggest_destinations(client, &args.text).await;

    if args.json {
        println!("{}", serde_json::Value::from(cities));
    } else if cities.is_empty() {
        println!("No matching destinations.");
    } else {
        for city in cities {
            println!("{city}");
        }
    }
}

fn run_login(args: LoginArgs) {
    let store = SessionStore::new(SessionStore::default_path());
    let Some(session) = Session::sign_in(&args.email, &args.password) else {
        die(&FlightError::Validation("incorrect credentials".into()), false);
    };
    if let Err(e) = store.save(&session) {
        die(&e, false);
    }
    let role = if session.is_admin { "admin" } else { "customer" };
    println!("Signed in as {} ({role})", args.email);
}

fn run_logout() {
    let store = SessionStore::new(SessionStore::default_path());
    if let Err(e) = store.clear() {
        die(&e, false);
    }
    println!("Signed out");
}

fn run_whoami() {
    let session = SessionStore::new(SessionStore::default_path()).load();
    match session.user {
        Some(user) => {
            let role = if session.is_admin { "admin" } else { "customer" };
            println!("{} <{}> ({role})", user.name, user.email);
        }
        None => println!("Not signed in"),
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => run_search(args).await,
        Commands::Destinations(args) => run_destinations(args).await,
        Commands::Login(args) => run_login(args),
        Commands::Logout => run_logout(),
        Commands::Whoami => run_whoami(),
        Commands::Mcp(api) => {
            if let Err(e) = aerodesk::mcp::run(api.fetch_options()).await {
                eprintln!("error: MCP server failed: {e}");
                process::exit(1);
            }
        }
    }
}
