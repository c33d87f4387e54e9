//! Map markers and the standalone Leaflet page for verified sites.
//!
//! The page and the marker popup are handlebars templates, so every value
//! interpolated with `{{...}}` is HTML-escaped by the registry.

use handlebars::Handlebars;
use serde::Serialize;
use wwtp_core::{Coordinate, VerifiedCandidate};

use crate::error::ExportError;

pub const MAP_ZOOM: u8 = 10;
pub const REASONING_EXCERPT_CHARS: usize = 150;
/// Zoom of the Google Maps viewer link in each popup.
pub const VIEWER_ZOOM: u8 = 18;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const SATELLITE_TILES: &str = "https://mt1.google.com/vt/lyrs=s&x={x}&y={y}&z={z}";
const ROAD_TILES: &str = "https://mt1.google.com/vt/lyrs=m&x={x}&y={y}&z={z}";

const VIEWER_BASE: &str = "https://www.google.com/maps/@?api=1&map_action=map";

const TOOLTIP_TEMPLATE: &str = "{{name}} ({{capacity}})";

const POPUP_TEMPLATE: &str = "<div style=\"width: 250px;\">\
<h4 style=\"margin-bottom: 5px;\">{{name}}</h4>\
<hr style=\"margin: 5px 0;\">\
<p style=\"margin: 3px 0;\"><b>Status:</b> {{status}}</p>\
<p style=\"margin: 3px 0;\"><b>Capacity:</b> {{capacity}}</p>\
<p style=\"margin: 3px 0;\"><b>Address:</b> {{address}}</p>\
<p style=\"margin: 3px 0;\"><b>Confidence:</b> {{confidence}}</p>\
<a href=\"{{imagery_url}}\" target=\"_blank\" rel=\"noopener\" \
style=\"color: blue; text-decoration: underline;\">View Satellite Image</a> | \
<a href=\"{{viewer_url}}\" target=\"_blank\" rel=\"noopener\" \
style=\"color: blue; text-decoration: underline;\">Open in Google Maps</a>\
<hr style=\"margin: 5px 0;\">\
<p style=\"margin: 3px 0; font-size: 12px;\"><b>Analysis:</b> {{analysis}}</p>\
</div>";

// Tile URLs and the marker JSON go inside <script>, where entities are not
// decoded, so they use the raw `{{{...}}}` form.
const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Verified WWTP locations</title>
<link rel="stylesheet" href="{{leaflet_css}}">
<script src="{{leaflet_js}}"></script>
<style>html, body, #map { height: 100%; margin: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
const center = [{{lat}}, {{lng}}];
const markers = {{{markers_json}}};
const satellite = L.tileLayer("{{{satellite_tiles}}}", { attribution: "Google Satellite", maxZoom: 20 });
const road = L.tileLayer("{{{road_tiles}}}", { attribution: "Google Maps", maxZoom: 20 });
const map = L.map("map", { center: center, zoom: {{zoom}}, layers: [satellite] });
L.control.layers({ "Satellite View": satellite, "Map View": road }).addTo(map);
for (const m of markers) {
  L.marker([m.lat, m.lng]).bindTooltip(m.tooltip).bindPopup(m.popup, { maxWidth: 300 }).addTo(map);
}
</script>
</body>
</html>
"#;

/// Everything needed to draw one verified site. `tooltip` and `popup` are
/// rendered HTML.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lng: f64,
    pub tooltip: String,
    pub popup: String,
}

#[derive(Serialize)]
struct MarkerContext<'a> {
    name: &'a str,
    capacity: &'a str,
    status: &'a str,
    address: &'a str,
    confidence: String,
    imagery_url: &'a str,
    viewer_url: String,
    analysis: String,
}

impl<'a> From<&'a VerifiedCandidate> for MarkerContext<'a> {
    fn from(v: &'a VerifiedCandidate) -> Self {
        Self {
            name: &v.candidate.name,
            capacity: &v.verdict.capacity_estimate,
            status: &v.status_label,
            address: v.candidate.address.as_deref().unwrap_or_default(),
            confidence: v.verdict.confidence.to_string(),
            imagery_url: &v.imagery_url,
            viewer_url: viewer_url(v.candidate.coordinate),
            analysis: excerpt(&v.verdict.reasoning, REASONING_EXCERPT_CHARS),
        }
    }
}

#[derive(Serialize)]
struct PageContext<'a> {
    lat: f64,
    lng: f64,
    zoom: u8,
    leaflet_css: &'a str,
    leaflet_js: &'a str,
    satellite_tiles: &'a str,
    road_tiles: &'a str,
    markers_json: String,
}

/// Template registry for the map page and its markers.
pub struct MapTemplates {
    handlebars: Handlebars<'static>,
}

impl MapTemplates {
    /// # Errors
    ///
    /// Returns [`ExportError::Template`] if a built-in template fails to parse.
    pub fn new() -> Result<Self, ExportError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        for (name, source) in [
            ("tooltip", TOOLTIP_TEMPLATE),
            ("popup", POPUP_TEMPLATE),
            ("page", PAGE_TEMPLATE),
        ] {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| ExportError::Template(e.to_string()))?;
        }
        Ok(Self { handlebars })
    }

    /// # Errors
    ///
    /// Returns [`ExportError::Template`] if rendering fails.
    pub fn marker(&self, verified: &VerifiedCandidate) -> Result<MapMarker, ExportError> {
        let ctx = MarkerContext::from(verified);
        Ok(MapMarker {
            lat: verified.candidate.coordinate.lat(),
            lng: verified.candidate.coordinate.lng(),
            tooltip: self.render("tooltip", &ctx)?,
            popup: self.render("popup", &ctx)?,
        })
    }

    /// One marker per verified candidate, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Template`] if any marker fails to render.
    pub fn markers(&self, verified: &[VerifiedCandidate]) -> Result<Vec<MapMarker>, ExportError> {
        verified.iter().map(|v| self.marker(v)).collect()
    }

    /// Renders a self-contained HTML page centred on `center` with switchable
    /// satellite and road layers and one marker per entry.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Markers`] if the markers cannot be serialized,
    /// or [`ExportError::Template`] if rendering fails.
    pub fn render_page(
        &self,
        center: Coordinate,
        markers: &[MapMarker],
    ) -> Result<String, ExportError> {
        // `</` would close the script element early.
        let markers_json = serde_json::to_string(markers)?.replace("</", "<\\/");
        let ctx = PageContext {
            lat: center.lat(),
            lng: center.lng(),
            zoom: MAP_ZOOM,
            leaflet_css: LEAFLET_CSS,
            leaflet_js: LEAFLET_JS,
            satellite_tiles: SATELLITE_TILES,
            road_tiles: ROAD_TILES,
            markers_json,
        };
        self.render("page", &ctx)
    }

    fn render<T: Serialize>(&self, name: &str, ctx: &T) -> Result<String, ExportError> {
        self.handlebars
            .render(name, ctx)
            .map_err(|e| ExportError::Template(e.to_string()))
    }
}

/// Keyless Google Maps link to `site` on the satellite basemap.
fn viewer_url(site: Coordinate) -> String {
    format!(
        "{VIEWER_BASE}&center={},{}&zoom={VIEWER_ZOOM}&basemap=satellite",
        site.lat(),
        site.lng()
    )
}

/// First `max_chars` characters, with `...` appended when anything was cut.
fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wwtp_core::{Candidate, Confidence, Decision, Verdict, WaterPresence};

    fn verified(name: &str, reasoning: &str) -> VerifiedCandidate {
        VerifiedCandidate {
            candidate: Candidate {
                provider_id: "A".to_string(),
                name: name.to_string(),
                coordinate: Coordinate::new(12.95, 77.64).unwrap(),
                address: Some("Bellandur, Bengaluru".to_string()),
            },
            verdict: Verdict {
                decision: Decision::Maybe,
                water_present: WaterPresence::Yes,
                reasoning: reasoning.to_string(),
                confidence: Confidence::Medium,
                capacity_estimate: "25 MLD".to_string(),
            },
            status_label: "Verified — Water Present (Medium)".to_string(),
            imagery_url: "https://maps.test/staticmap?center=12.95%2C77.64&zoom=18".to_string(),
        }
    }

    fn templates() -> MapTemplates {
        MapTemplates::new().unwrap()
    }

    #[test]
    fn tooltip_names_site_and_capacity() {
        let marker = templates().marker(&verified("Bellandur STP", "Tanks")).unwrap();
        assert_eq!(marker.tooltip, "Bellandur STP (25 MLD)");
        assert!((marker.lat - 12.95).abs() < f64::EPSILON);
    }

    #[test]
    fn popup_lists_details_and_escapes_data() {
        let site = verified("A & B <Works>", "Water \"visible\"");
        let marker = templates().marker(&site).unwrap();
        assert!(marker.tooltip.starts_with("A &amp; B &lt;Works&gt;"));
        assert!(marker.popup.contains("<b>Status:</b> Verified — Water Present (Medium)"));
        assert!(marker.popup.contains("<b>Confidence:</b> Medium"));
        assert!(marker.popup.contains("<b>Address:</b> Bellandur, Bengaluru"));
        assert!(marker
            .popup
            .contains(&format!("href=\"{}\"", handlebars::html_escape(&site.imagery_url))));
        assert!(!marker.popup.contains("&zoom=18"));
        assert!(marker.popup.contains("Water &quot;visible&quot;"));
        assert!(!marker.popup.contains("<Works>"));
    }

    #[test]
    fn popup_links_keyless_viewer_at_site() {
        let marker = templates().marker(&verified("Site", "Tanks")).unwrap();
        let url = viewer_url(Coordinate::new(12.95, 77.64).unwrap());
        assert!(url.contains("center=12.95,77.64"));
        assert!(url.contains("basemap=satellite"));
        assert!(!url.contains("key="));
        assert!(marker
            .popup
            .contains(&format!("href=\"{}\"", handlebars::html_escape(&url))));
        assert!(marker.popup.contains("Open in Google Maps"));
    }

    #[test]
    fn missing_address_renders_empty() {
        let mut site = verified("Site", "Tanks");
        site.candidate.address = None;
        let marker = templates().marker(&site).unwrap();
        assert!(marker.popup.contains("<b>Address:</b> </p>"));
    }

    #[test]
    fn long_reasoning_is_cut_to_excerpt() {
        let reasoning = "é".repeat(200);
        let marker = templates().marker(&verified("Site", &reasoning)).unwrap();
        let expected = format!("{}...", "é".repeat(REASONING_EXCERPT_CHARS));
        assert!(marker.popup.contains(&expected));
        assert!(!marker.popup.contains(&"é".repeat(REASONING_EXCERPT_CHARS + 1)));
    }

    #[test]
    fn short_reasoning_is_kept_whole() {
        assert_eq!(excerpt("short", 150), "short");
    }

    #[test]
    fn page_centres_on_search_and_embeds_markers() {
        let templates = templates();
        let center = Coordinate::new(12.97, 77.59).unwrap();
        let markers = templates
            .markers(&[verified("Bellandur STP", "Tanks")])
            .unwrap();
        let html = templates.render_page(center, &markers).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("const center = [12.97, 77.59];"));
        assert!(html.contains("zoom: 10"));
        assert!(html.contains(SATELLITE_TILES));
        assert!(html.contains(ROAD_TILES));
        assert!(html.contains(&format!("href=\"{LEAFLET_CSS}\"")));
        assert!(html.contains("\"tooltip\":\"Bellandur STP (25 MLD)\""));
        assert!(!html.contains("</div>\""));
    }

    #[test]
    fn marker_data_cannot_close_the_script() {
        let center = Coordinate::new(0.0, 0.0).unwrap();
        let html = templates()
            .render_page(
                center,
                &[MapMarker {
                    lat: 0.0,
                    lng: 0.0,
                    tooltip: "x".to_string(),
                    popup: "</script><script>alert(1)</script>".to_string(),
                }],
            )
            .unwrap();
        assert_eq!(html.matches("</script>").count(), 2);
    }
}
