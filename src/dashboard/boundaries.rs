use serde_json::Value;
use tracing::{info, warn};

/// Fetch a GeoJSON boundary file. Any failure is logged and yields `None`
/// so the caller can drop the map and keep the rest of the view.
pub async fn fetch_boundaries(client: &reqwest::Client, url: &str) -> Option<Value> {
    info!("Fetching boundaries from {url}");

    let response = match client.get(url).send().await.and_then(|r| r.error_for_status()) {
        Ok(response) => response,
        Err(e) => {
            warn!("Boundary fetch failed, map omitted: {e}");
            return None;
        }
    };

    match response.json::<Value>().await {
        Ok(geojson) if geojson.get("features").is_some() => Some(geojson),
        Ok(_) => {
            warn!("Boundary file at {url} has no features, map omitted");
            None
        }
        Err(e) => {
            warn!("Boundary file at {url} is not valid JSON, map omitted: {e}");
            None
        }
    }
}
