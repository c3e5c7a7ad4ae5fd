//! Location record decoding
//!
//! A [`LocationRecord`] is the immutable value produced by one successful
//! query. The engine returns a nested document (country, city, continent,
//! location, postal, subdivisions); decoding flattens it field by field
//! into the record. String attributes the database does not carry decode
//! to the empty string and numeric attributes to zero, so a record is
//! always fully populated once a network matched. An address with no
//! matching network yields no record at all, never an empty one.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Character-set identifier for record strings. The engine's data section
/// stores all strings as UTF-8.
pub const CHARSET_UTF8: i32 = 1;

/// Geolocation data for a single queried address
///
/// Confidence scores are 0-100 percentages per field group; the accuracy
/// radius is in kilometers around the coordinates. The 3-letter country
/// code and telephone area code are legacy attributes that modern
/// databases no longer populate; they decode to their defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocationRecord {
    /// ISO 3166-1 alpha-2 country code, e.g. "US"
    pub country_code: String,
    /// ISO 3166-1 alpha-3 country code (legacy, usually empty)
    pub country_code3: String,
    /// English country name
    pub country_name: String,
    /// Region code: ISO 3166-2 code of the most specific subdivision
    pub region: String,
    /// English city name
    pub city: String,
    /// Postal code
    pub postal_code: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Telephone area code (legacy, usually zero)
    pub area_code: i32,
    /// Character set of the string fields, see [`CHARSET_UTF8`]
    pub charset: i32,
    /// Two-letter continent code, e.g. "NA"
    pub continent_code: String,
    /// Confidence that the country is correct (0-100)
    pub country_confidence: u8,
    /// Confidence that the region is correct (0-100)
    pub region_confidence: u8,
    /// Confidence that the city is correct (0-100)
    pub city_confidence: u8,
    /// Confidence that the postal code is correct (0-100)
    pub postal_confidence: u8,
    /// Radius in kilometers within which the address is expected to lie
    pub accuracy_radius: i32,
}

// Engine document schema. Unknown keys are skipped during deserialization,
// missing keys become None, so the same model covers country-, city- and
// enterprise-level databases.

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EngineDocument {
    city: Option<NamedPlace>,
    continent: Option<Continent>,
    country: Option<Country>,
    location: Option<Location>,
    postal: Option<Postal>,
    subdivisions: Option<Vec<Subdivision>>,
}

#[derive(Debug, Deserialize)]
struct NamedPlace {
    confidence: Option<u16>,
    names: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct Continent {
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Country {
    confidence: Option<u16>,
    iso_code: Option<String>,
    names: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct Location {
    accuracy_radius: Option<u16>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Postal {
    code: Option<String>,
    confidence: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct Subdivision {
    confidence: Option<u16>,
    iso_code: Option<String>,
}

fn english_name(names: Option<BTreeMap<String, String>>) -> String {
    names
        .and_then(|mut n| n.remove("en"))
        .unwrap_or_default()
}

/// Narrow an engine confidence value to the record's byte range.
fn confidence(value: Option<u16>) -> u8 {
    value.unwrap_or(0).min(u8::MAX as u16) as u8
}

impl LocationRecord {
    /// Copy every available engine field into a flat record.
    pub(crate) fn decode(doc: EngineDocument) -> LocationRecord {
        let mut record = LocationRecord {
            charset: CHARSET_UTF8,
            ..LocationRecord::default()
        };

        if let Some(country) = doc.country {
            record.country_code = country.iso_code.unwrap_or_default();
            record.country_name = english_name(country.names);
            record.country_confidence = confidence(country.confidence);
        }
        if let Some(subdivisions) = doc.subdivisions {
            // The most specific subdivision is listed last.
            if let Some(subdivision) = subdivisions.into_iter().next_back() {
                record.region = subdivision.iso_code.unwrap_or_default();
                record.region_confidence = confidence(subdivision.confidence);
            }
        }
        if let Some(city) = doc.city {
            record.city = english_name(city.names);
            record.city_confidence = confidence(city.confidence);
        }
        if let Some(postal) = doc.postal {
            record.postal_code = postal.code.unwrap_or_default();
            record.postal_confidence = confidence(postal.confidence);
        }
        if let Some(location) = doc.location {
            record.latitude = location.latitude.unwrap_or(0.0);
            record.longitude = location.longitude.unwrap_or(0.0);
            record.accuracy_radius = location.accuracy_radius.unwrap_or(0) as i32;
        }
        if let Some(continent) = doc.continent {
            record.continent_code = continent.code.unwrap_or_default();
        }

        record
    }
}
