use cityweather_core::Coordinates;
use serde::{Deserialize, Serialize};

/// One page request against the city dataset.
///
/// Pages are 1-based; `offset()` is what the API calls `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub page: u32,
    pub rows: u32,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, page: u32, rows: u32) -> Self {
        Self {
            term: term.into(),
            page,
            rows,
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.rows)
    }
}

/// A city as shown in the search table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub record_id: String,
    pub name: String,
    pub country: String,
    pub timezone: String,
    pub population: Option<u64>,
    pub coordinates: Option<Coordinates>,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub records: Vec<CityRecord>,
    /// Total matches reported by the dataset (`nhits`)
    pub total_hits: u64,
    /// Offset the page was requested at
    pub offset: u64,
}

impl SearchPage {
    /// True when another page may hold records.
    ///
    /// An empty page always ends the list, as does reaching `total_hits`.
    pub fn has_more(&self) -> bool {
        !self.records.is_empty() && self.offset + (self.records.len() as u64) < self.total_hits
    }
}

// OpenDataSoft records API (v1) response shapes

#[derive(Debug, Deserialize)]
pub(crate) struct ApiSearchResponse {
    #[serde(default)]
    pub nhits: u64,
    #[serde(default)]
    pub records: Vec<ApiRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiRecord {
    pub recordid: String,
    #[serde(default)]
    pub fields: ApiFields,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiFields {
    pub name: Option<String>,
    pub ascii_name: Option<String>,
    pub cou_name_en: Option<String>,
    pub country_code: Option<String>,
    pub timezone: Option<String>,
    pub population: Option<u64>,
    /// `[lat, lon]`
    pub coordinates: Option<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: Option<String>,
}

impl From<ApiRecord> for CityRecord {
    fn from(record: ApiRecord) -> Self {
        let fields = record.fields;
        Self {
            record_id: record.recordid,
            name: fields.name.or(fields.ascii_name).unwrap_or_default(),
            country: fields.cou_name_en.or(fields.country_code).unwrap_or_default(),
            timezone: fields.timezone.unwrap_or_default(),
            population: fields.population,
            coordinates: fields.coordinates.map(|[lat, lon]| Coordinates { lat, lon }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> CityRecord {
        CityRecord {
            record_id: name.to_lowercase(),
            name: name.to_string(),
            country: "France".to_string(),
            timezone: "Europe/Paris".to_string(),
            population: None,
            coordinates: None,
        }
    }

    #[test]
    fn test_offset_is_zero_based() {
        assert_eq!(SearchQuery::new("", 1, 20).offset(), 0);
        assert_eq!(SearchQuery::new("", 2, 20).offset(), 20);
        assert_eq!(SearchQuery::new("", 5, 10).offset(), 40);
        assert_eq!(SearchQuery::new("", 0, 20).offset(), 0);
    }

    #[test]
    fn test_has_more() {
        let empty = SearchPage {
            records: vec![],
            total_hits: 100,
            offset: 20,
        };
        assert!(!empty.has_more());

        let middle = SearchPage {
            records: vec![record("Paris"), record("Lyon")],
            total_hits: 10,
            offset: 0,
        };
        assert!(middle.has_more());

        let last = SearchPage {
            records: vec![record("Paris"), record("Lyon")],
            total_hits: 4,
            offset: 2,
        };
        assert!(!last.has_more());
    }

    #[test]
    fn test_record_mapping_with_fallbacks() {
        let api: ApiRecord = serde_json::from_value(serde_json::json!({
            "recordid": "abc",
            "fields": {
                "ascii_name": "Sao Paulo",
                "country_code": "BR",
                "coordinates": [-23.55, -46.63]
            }
        }))
        .unwrap();

        let city = CityRecord::from(api);
        assert_eq!(city.name, "Sao Paulo");
        assert_eq!(city.country, "BR");
        assert_eq!(city.timezone, "");
        assert_eq!(
            city.coordinates,
            Some(Coordinates {
                lat: -23.55,
                lon: -46.63
            })
        );
    }

    #[test]
    fn test_record_without_fields() {
        let api: ApiRecord =
            serde_json::from_value(serde_json::json!({ "recordid": "xyz" })).unwrap();
        let city = CityRecord::from(api);
        assert_eq!(city.record_id, "xyz");
        assert!(city.name.is_empty());
        assert!(city.population.is_none());
    }
}
