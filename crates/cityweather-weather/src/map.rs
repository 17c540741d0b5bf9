//! Map view for the weather page: an OpenStreetMap tile layer centred on the
//! report's coordinates with a single marker.

use cityweather_core::Coordinates;

use crate::types::CurrentWeather;

/// Web Mercator cannot represent the poles
const MAX_LATITUDE: f64 = 85.051_128_78;
const SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub tile_url: String,
    pub zoom: u8,
    pub attribution: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            zoom: 10,
            attribution: "© OpenStreetMap contributors".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

impl TileLayer {
    /// Expand the template for one tile. `{s}` rotates through a/b/c by tile position.
    pub fn tile_url(&self, tile: TileCoord) -> String {
        let subdomain = SUBDOMAINS[((tile.x + tile.y) as usize) % SUBDOMAINS.len()];
        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: Coordinates,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub marker: Marker,
    pub tiles: TileLayer,
}

impl MapView {
    /// `None` when the report carries no coordinates.
    pub fn for_weather(weather: &CurrentWeather, settings: &MapSettings) -> Option<Self> {
        let center = weather.coordinates?;
        Some(Self {
            center,
            zoom: settings.zoom,
            marker: Marker {
                position: center,
                popup: weather.location_label(),
            },
            tiles: TileLayer {
                url_template: settings.tile_url.clone(),
                attribution: settings.attribution.clone(),
            },
        })
    }

    pub fn center_tile(&self) -> TileCoord {
        tile_for(self.center, self.zoom)
    }

    pub fn center_tile_url(&self) -> String {
        self.tiles.tile_url(self.center_tile())
    }

    /// Link to the same view on openstreetmap.org
    pub fn browse_url(&self) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={lat:.4}&mlon={lon:.4}#map={zoom}/{lat:.4}/{lon:.4}",
            lat = self.center.lat,
            lon = self.center.lon,
            zoom = self.zoom
        )
    }
}

/// Slippy-map tile containing `coords` at `zoom`.
pub fn tile_for(coords: Coordinates, zoom: u8) -> TileCoord {
    let n = 2f64.powi(i32::from(zoom));
    let max_index = n - 1.0;

    let lon = coords.lon.clamp(-180.0, 180.0);
    let lat = coords.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

    let x = ((lon + 180.0) / 360.0 * n).floor().clamp(0.0, max_index);
    let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * n)
        .floor()
        .clamp(0.0, max_index);

    TileCoord {
        z: zoom,
        x: x as u32,
        y: y as u32,
    }
}
