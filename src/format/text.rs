//! Human-readable text output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::geo::{RouteResult, SearchResult};

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format_search(&self, query: &str, results: &[SearchResult]) -> Result<String> {
        if results.is_empty() {
            return Ok(format!("No results for \"{}\"\n", query));
        }

        let mut output = format!("Results for \"{}\":\n", query);
        for (i, result) in results.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} ({:.6}, {:.6})",
                i + 1,
                result.address,
                result.latitude,
                result.longitude
            ));
            if let Some(km) = result.distance_km {
                output.push_str(&format!(" - {:.1} km", km));
            }
            output.push('\n');
        }
        Ok(output)
    }

    fn format_route(&self, route: &RouteResult) -> Result<String> {
        let mut output = String::new();
        output.push_str(&format!("Distance: {:.1} km\n", route.distance_km));
        output.push_str(&format!("Duration: {} min\n", route.duration_minutes));
        output.push_str(&format!("Points: {}\n", route.geometry.len()));

        if let (Some(first), Some(last)) = (route.geometry.first(), route.geometry.last()) {
            output.push_str(&format!(
                "From: ({:.6}, {:.6})\nTo: ({:.6}, {:.6})\n",
                first.latitude, first.longitude, last.latitude, last.longitude
            ));
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures;

    #[test]
    fn test_text_search() {
        let output = TextFormatter
            .format_search("terminal", &fixtures::results())
            .unwrap();

        assert!(output.starts_with("Results for \"terminal\":"));
        assert!(output.contains("1. Terminal Bandeira"));
        assert!(output.contains("0.6 km"));
    }

    #[test]
    fn test_text_search_empty() {
        let output = TextFormatter.format_search("xy", &[]).unwrap();
        assert_eq!(output, "No results for \"xy\"\n");
    }

    #[test]
    fn test_text_route() {
        let output = TextFormatter.format_route(&fixtures::route()).unwrap();
        assert!(output.contains("Distance: 3.2 km"));
        assert!(output.contains("Duration: 42 min"));
        assert!(output.contains("Points: 3"));
        assert!(output.contains("From: (-23.550500, -46.633300)"));
    }
}
