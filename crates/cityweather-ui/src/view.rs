//! Plain-text rendering of the two screens.

use std::fmt::Write;

use crate::models::cities_table::CitiesTableState;
use crate::models::weather_page::WeatherPageState;

const APP_TITLE: &str = "Weather App";
const WEATHER_TITLE: &str = "Weather Info";

pub fn render_cities(state: &CitiesTableState, input: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{APP_TITLE}");
    let _ = writeln!(out, "Search: {input}");
    out.push('\n');

    if state.show_spinner() {
        let _ = writeln!(out, "Loading...");
    } else {
        let rows: Vec<[String; 4]> = state
            .cities()
            .iter()
            .enumerate()
            .map(|(i, c)| {
                [
                    (i + 1).to_string(),
                    c.name.clone(),
                    c.country.clone(),
                    c.timezone.clone(),
                ]
            })
            .collect();
        write_table(&mut out, ["#", "City", "Country", "Timezone"], &rows);

        if state.loading() {
            let _ = writeln!(out, "Loading more...");
        }
    }

    if let Some(error) = state.error_message() {
        let _ = writeln!(out, "{error}");
    }
    if let Some(end) = state.end_of_list_message() {
        let _ = writeln!(out, "{end}");
    }
    out
}

fn write_table(out: &mut String, header: [&str; 4], rows: &[[String; 4]]) {
    let mut widths = header.map(|h| h.chars().count());
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 4]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let _ = writeln!(out, "{}", line(header));
    let _ = writeln!(out, "{}", rule.join("  "));
    for row in rows {
        let _ = writeln!(out, "{}", line(row.each_ref().map(String::as_str)));
    }
}

pub fn render_weather(state: &WeatherPageState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{WEATHER_TITLE}");

    if let Some(weather) = state.weather() {
        let _ = writeln!(out, "Theme: {}", weather.condition.theme().name());
    }
    out.push('\n');

    if state.loading() {
        let _ = writeln!(out, "Loading...");
    }
    if let Some(error) = state.error_message() {
        let _ = writeln!(out, "{error}");
    }

    let Some(weather) = state.weather() else {
        return out;
    };

    let _ = writeln!(
        out,
        "{}{}",
        weather.rounded_temperature(),
        weather.units.temperature_suffix()
    );
    let _ = writeln!(out, "{}", weather.description);
    let _ = writeln!(out, "{}", weather.location_label());
    let _ = writeln!(out, "Image: {}", weather.condition.image_url());

    let (wind, wind_unit) = weather.wind_display();
    let suffix = weather.units.temperature_suffix();
    if let Some(feels_like) = weather.rounded_feels_like() {
        let _ = writeln!(out, "Feels like: {feels_like}{suffix}");
    }
    let _ = writeln!(out, "Humidity: {}%", weather.humidity);
    let _ = writeln!(out, "Wind: {wind:.1} {wind_unit}");
    let _ = writeln!(
        out,
        "Low: {}{suffix}  High: {}{suffix}",
        weather.temp_min, weather.temp_max
    );
    let _ = writeln!(out, "Updated: {}", weather.fetched_at.format("%H:%M UTC"));

    if let Some(map) = state.map() {
        out.push('\n');
        let _ = writeln!(
            out,
            "Map: {:.4}, {:.4} (zoom {})",
            map.center.lat, map.center.lon, map.zoom
        );
        let _ = writeln!(out, "Tile: {}", map.center_tile_url());
        let _ = writeln!(out, "Marker: {}", map.marker.popup);
        let _ = writeln!(out, "Open: {}", map.browse_url());
        let _ = writeln!(out, "{}", map.tiles.attribution);
    }
    out
}
