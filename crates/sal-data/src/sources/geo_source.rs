//! World geometry for the globe

use std::path::Path;
use std::str::FromStr;

use geo::Contains;
use geo_types::{Geometry, MultiPolygon, Point};
use geojson::{feature::Id, Feature, GeoJson};
use tracing::{info, warn};

use crate::DataError;

/// One country outline, keyed by its ISO numeric code
#[derive(Debug, Clone, PartialEq)]
pub struct CountryShape {
    /// Three-digit ISO numeric code (`"840"`)
    pub id: String,
    pub name: String,
    /// Outline in longitude/latitude degrees
    pub geometry: MultiPolygon<f64>,
}

/// All country outlines of a world GeoJSON file
#[derive(Debug, Clone, Default)]
pub struct WorldGeometry {
    countries: Vec<CountryShape>,
}

impl WorldGeometry {
    pub fn new(countries: Vec<CountryShape>) -> Self {
        Self { countries }
    }

    /// Read a GeoJSON file on the blocking pool
    pub async fn load(path: &Path) -> Result<Self, DataError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let text = std::fs::read_to_string(&path)?;
            let world = Self::from_geojson_str(&text)?;
            info!(path = %path.display(), countries = world.len(), "loaded world geometry");
            Ok::<_, DataError>(world)
        })
        .await?
    }

    /// Parse a `FeatureCollection`. Features without a usable id or polygon
    /// geometry are skipped.
    pub fn from_geojson_str(text: &str) -> Result<Self, DataError> {
        let features = match GeoJson::from_str(text)? {
            GeoJson::FeatureCollection(collection) => collection.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(_) => {
                return Err(DataError::GeoJson("expected a FeatureCollection".to_string()));
            }
        };

        let countries = features
            .into_iter()
            .filter_map(|feature| match country_from_feature(feature) {
                Ok(country) => Some(country),
                Err(reason) => {
                    warn!(%reason, "skipping world feature");
                    None
                }
            })
            .collect();

        Ok(Self { countries })
    }

    pub fn countries(&self) -> &[CountryShape] {
        &self.countries
    }

    pub fn get(&self, id: &str) -> Option<&CountryShape> {
        self.countries.iter().find(|c| c.id == id)
    }

    /// Country containing the given longitude/latitude
    pub fn country_at(&self, lon: f64, lat: f64) -> Option<&CountryShape> {
        let point = Point::new(lon, lat);
        self.countries.iter().find(|c| c.geometry.contains(&point))
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

fn country_from_feature(feature: Feature) -> Result<CountryShape, String> {
    let raw_id = match &feature.id {
        Some(Id::String(s)) => Some(s.clone()),
        Some(Id::Number(n)) => Some(n.to_string()),
        None => feature.property("id").map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
    };
    let id = raw_id
        .as_deref()
        .and_then(normalize_numeric_id)
        .ok_or_else(|| format!("feature without numeric id ({:?})", raw_id))?;

    let name = feature
        .property("name")
        .and_then(|v| v.as_str())
        .unwrap_or(id.as_str())
        .to_string();

    let value = feature
        .geometry
        .map(|g| g.value)
        .ok_or_else(|| format!("feature {} has no geometry", id))?;
    let geometry = Geometry::<f64>::try_from(value).map_err(|e| format!("feature {}: {}", id, e))?;

    let polygons = polygons_of(geometry);
    if polygons.0.is_empty() {
        return Err(format!("feature {} has no polygons", id));
    }

    Ok(CountryShape {
        id,
        name,
        geometry: polygons,
    })
}

fn polygons_of(geometry: Geometry<f64>) -> MultiPolygon<f64> {
    match geometry {
        Geometry::Polygon(polygon) => MultiPolygon(vec![polygon]),
        Geometry::MultiPolygon(multi) => multi,
        Geometry::GeometryCollection(collection) => MultiPolygon(
            collection
                .0
                .into_iter()
                .flat_map(|g| polygons_of(g).0)
                .collect(),
        ),
        _ => MultiPolygon(Vec::new()),
    }
}

/// `4`, `"4"` and `"004"` all become `"004"`
fn normalize_numeric_id(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let digits = raw.strip_suffix(".0").unwrap_or(raw);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(format!("{:0>3}", digits))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": 840,
                "properties": {"name": "United States"},
                "geometry": {"type": "Polygon", "coordinates": [[[-120, 30], [-70, 30], [-70, 48], [-120, 48], [-120, 30]]]}
            },
            {
                "type": "Feature",
                "properties": {"id": "36", "name": "Australia"},
                "geometry": {"type": "MultiPolygon", "coordinates": [[[[115, -35], [150, -35], [150, -12], [115, -12], [115, -35]]]]}
            },
            {
                "type": "Feature",
                "properties": {"name": "Somewhere"},
                "geometry": {"type": "Point", "coordinates": [0, 0]}
            },
            {
                "type": "Feature",
                "id": "010",
                "properties": {"name": "Antarctica"},
                "geometry": {"type": "LineString", "coordinates": [[0, -80], [10, -80]]}
            }
        ]
    }"#;

    #[test]
    fn test_parse_world() {
        let world = WorldGeometry::from_geojson_str(WORLD).unwrap();
        assert_eq!(world.len(), 2);
        assert_eq!(world.get("840").unwrap().name, "United States");
        assert_eq!(world.get("036").unwrap().name, "Australia");
    }

    #[test]
    fn test_country_at() {
        let world = WorldGeometry::from_geojson_str(WORLD).unwrap();
        assert_eq!(world.country_at(-100.0, 40.0).map(|c| c.id.as_str()), Some("840"));
        assert_eq!(world.country_at(135.0, -25.0).map(|c| c.id.as_str()), Some("036"));
        assert!(world.country_at(0.0, 0.0).is_none());
    }

    #[test]
    fn test_normalize_numeric_id() {
        assert_eq!(normalize_numeric_id("4").as_deref(), Some("004"));
        assert_eq!(normalize_numeric_id("840").as_deref(), Some("840"));
        assert_eq!(normalize_numeric_id("36.0").as_deref(), Some("036"));
        assert_eq!(normalize_numeric_id("-99"), None);
        assert_eq!(normalize_numeric_id("US"), None);
    }

    #[test]
    fn test_rejects_bare_geometry() {
        let text = r#"{"type": "Point", "coordinates": [0, 0]}"#;
        assert!(matches!(WorldGeometry::from_geojson_str(text), Err(DataError::GeoJson(_))));
    }
}
