//! JSON output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::geo::{RouteResult, SearchResult};

/// JSON formatter - pretty-printed, same shape as the HTTP API
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "JSON, same shape as the HTTP API"
    }

    fn format_search(&self, _query: &str, results: &[SearchResult]) -> Result<String> {
        Ok(serde_json::to_string_pretty(results)?)
    }

    fn format_route(&self, route: &RouteResult) -> Result<String> {
        Ok(serde_json::to_string_pretty(route)?)
    }
}
