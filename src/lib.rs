//! Geodb - IP Geolocation Database Lookups
//!
//! Geodb binds a geolocation database to a small, safe query surface:
//! open a database file, resolve IPv4/IPv6 addresses to structured
//! location records (country, region, city, coordinates, confidence
//! scores), close the database. The on-disk format and the search
//! algorithm belong to the underlying MMDB lookup engine; this crate
//! handles the lifecycle, the address-family dispatch and the
//! field-by-field record decoding.
//!
//! # Quick Start
//!
//! ```
//! use geodb::{CacheMode, Database};
//!
//! let db = Database::open("tests/data/GeoIP2-Enterprise-Test.mmdb", CacheMode::MemoryCache)?;
//!
//! // Raw 4-byte IPv4 address
//! if let Some(record) = db.record_by_ip(&[8, 8, 8, 8]) {
//!     println!("{} / {} ({})", record.country_code, record.city, record.continent_code);
//! }
//!
//! // Or a parsed address of either family
//! let addr = "2001:4860:4860::8888".parse()?;
//! if let Some(record) = db.record_by_addr(addr) {
//!     assert_eq!(record.country_code, "US");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Lifecycle
//!
//! A [`Database`] is either open or closed. [`Database::open`] fails with
//! an [`OpenError`] when the file is missing, unreadable or corrupt and
//! never returns a partial handle. [`Database::close`] is idempotent, and
//! dropping the handle releases the resource as well.
//!
//! An address the database cannot resolve is not an error: the query
//! methods return `None`. Malformed address lengths are treated the same
//! way.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Database handle, cache modes and the record resolver
pub mod database;
/// Error types for handle creation
pub mod error;
/// Location record type and decoding
pub mod record;

pub use crate::database::{ipv4_to_u32, CacheMode, Database, DatabaseEdition};
pub use crate::error::{OpenError, Result};
pub use crate::record::{LocationRecord, CHARSET_UTF8};

/// Library version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
