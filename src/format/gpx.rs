//! GPX output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::geo::{RouteResult, SearchResult};

/// GPX formatter - waypoints for search results, a track for routes
pub struct GpxFormatter;

const HEADER: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    "\n",
    r#"<gpx version="1.1" creator="mob-acesso">"#,
    "\n"
);

/// Escape the five XML special characters
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoints (search) or track (route)"
    }

    fn format_search(&self, query: &str, results: &[SearchResult]) -> Result<String> {
        let mut gpx = String::from(HEADER);

        gpx.push_str("  <metadata>\n");
        gpx.push_str(&format!("    <name>{}</name>\n", escape(query)));
        gpx.push_str("  </metadata>\n");

        for result in results {
            gpx.push_str(&format!(
                r#"  <wpt lat="{}" lon="{}">"#,
                result.latitude, result.longitude
            ));
            gpx.push('\n');
            gpx.push_str(&format!("    <name>{}</name>\n", escape(&result.address)));
            if let Some(km) = result.distance_km {
                gpx.push_str(&format!("    <desc>{:.1} km away</desc>\n", km));
            }
            gpx.push_str("  </wpt>\n");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }

    fn format_route(&self, route: &RouteResult) -> Result<String> {
        let mut gpx = String::from(HEADER);

        gpx.push_str("  <trk>\n");
        gpx.push_str(&format!(
            "    <name>{:.1} km, {} min</name>\n",
            route.distance_km, route.duration_minutes
        ));
        gpx.push_str("    <trkseg>\n");
        for point in &route.geometry {
            gpx.push_str(&format!(
                "      <trkpt lat=\"{}\" lon=\"{}\"/>\n",
                point.latitude, point.longitude
            ));
        }
        gpx.push_str("    </trkseg>\n");
        gpx.push_str("  </trk>\n");

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}
