use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};
use serde::Deserialize;
use tracing::error;

use crate::fetch::{ApiClient, FetchOptions};
use crate::query::ResultsQuery;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct SearchArgs {
    #[schemars(description = "Origin city as stored by the airline. Example: Buenos Aires")]
    origin: Option<String>,
    #[schemars(description = "Destination city. Example: Córdoba")]
    destination: String,
    #[schemars(
        description = "Earliest departure date in YYYY-MM-DD format. Requires origin. Example: 2025-03-14"
    )]
    from_date: Option<String>,
    #[schemars(
        description = "Month to list when origin/from_date are omitted, YYYY-MM. Default: current month"
    )]
    ym: Option<String>,
    #[schemars(description = "Results page to return (10 flights per page). Default: 1")]
    page: Option<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct SuggestArgs {
    #[schemars(
        description = "Partial city name, at least 2 characters. Accents and case are ignored. Example: cord"
    )]
    query: String,
}

fn tool_error(msg: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(msg.into())]))
}

#[derive(Clone)]
struct AerodeskMcp {
    client: Arc<ApiClient>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl AerodeskMcp {
    fn new(client: ApiClient) -> Self {
        Self {
            client: Arc::new(client),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Search the airline's flights and return one page of results as JSON, grouped by departure day. Give origin, destination and from_date for an exact search, or just destination (and optionally ym) to list a whole month. Use suggest_destinations first if unsure of a city's spelling."
    )]
    async fn search_flights(
        &self,
        Parameters(args): Parameters<SearchArgs>,
    ) -> Result<CallToolResult, McpError> {
        let query = ResultsQuery::new(
            args.origin.unwrap_or_default(),
            args.destination,
            args.from_date.unwrap_or_default(),
            args.ym,
        );

        let mut page = match crate::search(self.client.as_ref(), query).await {
            Ok(page) => page,
            Err(e) => return tool_error(e.to_string()),
        };
        if let Some(n) = args.page {
            page.set_page(n);
        }

        match serde_json::to_string(&page.view()) {
            Ok(json) => Ok(CallToolResult::success(vec![Content::text(json)])),
            Err(e) => {
                error!(error = %e, "failed to serialize results page");
                tool_error(format!("failed to serialize results: {e}"))
            }
        }
    }

    #[tool(
        description = "Suggest up to 8 known destination cities containing the given text. Matching ignores accents and case. Returns a JSON array of city names."
    )]
    async fn suggest_destinations(
        &self,
        Parameters(args): Parameters<SuggestArgs>,
    ) -> Result<CallToolResult, McpError> {
        let cities = crate::suggest_destinations(self.client.clone(), &args.query).await;
        match serde_json::to_string(&cities) {
            Ok(json) => Ok(CallToolResult::success(vec![Content::text(json)])),
            Err(e) => tool_error(format!("failed to serialize suggestions: {e}")),
        }
    }
}

#[tool_handler]
impl ServerHandler for AerodeskMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "aerodesk".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Airline flight search. Workflow: (1) suggest_destinations to find the exact city name. (2) search_flights with that destination; add origin and from_date for an exact search, otherwise a month is listed. Results are paged 10 at a time.".into(),
            ),
        }
    }
}

pub async fn run(options: FetchOptions) -> Result<(), Box<dyn std::error::Error>> {
    let client = ApiClient::new(&options)?;
    let service = AerodeskMcp::new(client)
        .serve(rmcp::transport::stdio())
        .await?;
    service.waiting().await?;
    Ok(())
}
