//! Database handle and record resolver
//!
//! A [`Database`] owns one open geolocation database and resolves IP
//! addresses to [`LocationRecord`]s. The lifecycle is open, query any
//! number of times, close. Closing is explicit and idempotent; dropping
//! the handle releases the underlying resource as well, so an engine
//! resource can never outlive its handle.
//!
//! The on-disk format, the search tree traversal and the data decoding
//! all live in the engine crate. This module confines itself to the
//! binding work: selecting the open path for the requested cache mode,
//! dispatching a query by address family, and flattening the engine's
//! result document into a record.

use crate::error::{OpenError, Result};
use crate::record::{EngineDocument, LocationRecord};
use maxminddb::{MaxMindDBError, Metadata, Mmap, Reader};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;

/// Caching strategy selected when opening a database
///
/// `MemoryCache` reads the whole file into a heap buffer up front. The
/// remaining modes share a read-only memory map: pages are faulted in on
/// demand, which serves both the read-per-query and index-only-cache
/// intents with the engine's single mapped open path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// No up-front caching, read through a memory map per query
    #[default]
    Standard,
    /// Load the entire database into process memory
    MemoryCache,
    /// Keep index structures resident, read the rest on demand
    IndexCache,
    /// Memory-map the database file
    MmapCache,
}

/// Database type/edition identifier parsed from the database metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseEdition {
    /// Country-level data
    Country,
    /// City-level data
    City,
    /// Enterprise data (city-level plus confidence attributes)
    Enterprise,
    /// Autonomous system numbers
    Asn,
    /// ISP data
    Isp,
    /// Connection type data
    ConnectionType,
    /// Domain data
    Domain,
    /// Anonymous IP / proxy data
    AnonymousIp,
    /// Unrecognized edition, or the handle is closed
    Unknown,
}

impl DatabaseEdition {
    /// Map the free-form metadata type string to an edition.
    fn from_database_type(database_type: &str) -> DatabaseEdition {
        let lower = database_type.to_ascii_lowercase();
        if lower.contains("enterprise") {
            DatabaseEdition::Enterprise
        } else if lower.contains("city") {
            DatabaseEdition::City
        } else if lower.contains("country") {
            DatabaseEdition::Country
        } else if lower.contains("asn") {
            DatabaseEdition::Asn
        } else if lower.contains("isp") {
            DatabaseEdition::Isp
        } else if lower.contains("connection") {
            DatabaseEdition::ConnectionType
        } else if lower.contains("domain") {
            DatabaseEdition::Domain
        } else if lower.contains("anonymous") {
            DatabaseEdition::AnonymousIp
        } else {
            DatabaseEdition::Unknown
        }
    }
}

/// Engine storage - either a heap buffer or a memory-mapped file
enum Engine {
    Buffer(Reader<Vec<u8>>),
    Mapped(Reader<Mmap>),
}

impl Engine {
    fn lookup(&self, addr: IpAddr) -> std::result::Result<EngineDocument, MaxMindDBError> {
        match self {
            Engine::Buffer(reader) => reader.lookup(addr),
            Engine::Mapped(reader) => reader.lookup(addr),
        }
    }

    fn metadata(&self) -> &Metadata {
        match self {
            Engine::Buffer(reader) => &reader.metadata,
            Engine::Mapped(reader) => &reader.metadata,
        }
    }
}

/// Pack four IPv4 octets into the engine's numeric key, big-endian.
///
/// Byte 0 is the most significant: `[8, 8, 8, 8]` packs to `134744072`.
pub fn ipv4_to_u32(octets: [u8; 4]) -> u32 {
    (octets[0] as u32) << 24
        | (octets[1] as u32) << 16
        | (octets[2] as u32) << 8
        | (octets[3] as u32)
}

/// Handle to one open geolocation database
///
/// Queries take `&self` and the engine's reader is `Send + Sync`, so one
/// handle may serve concurrent lookups from multiple threads. [`close`]
/// takes `&mut self` and therefore requires exclusive access.
///
/// Each query is one synchronous call with no cancellation; a caller
/// wanting a bounded-time lookup must wrap the call at a higher layer.
///
/// [`close`]: Database::close
///
/// # Examples
///
/// ```
/// use geodb::{CacheMode, Database};
///
/// let db = Database::open("tests/data/GeoIP2-Enterprise-Test.mmdb", CacheMode::Standard)?;
/// if let Some(record) = db.record_by_ip(&[8, 8, 8, 8]) {
///     assert_eq!(record.country_code, "US");
/// }
/// # Ok::<(), geodb::OpenError>(())
/// ```
pub struct Database {
    engine: Option<Engine>,
}

impl Database {
    /// Open the database file at `path` with the given cache mode
    ///
    /// Fails with [`OpenError`] when the file is missing, unreadable or
    /// not a valid database. A failed open never yields a handle, so
    /// there is nothing to release on the error path.
    pub fn open<P: AsRef<Path>>(path: P, mode: CacheMode) -> Result<Database> {
        let engine = match mode {
            CacheMode::MemoryCache => Engine::Buffer(Reader::open_readfile(path)?),
            CacheMode::Standard | CacheMode::IndexCache | CacheMode::MmapCache => {
                Engine::Mapped(Reader::open_mmap(path)?)
            }
        };
        Ok(Database {
            engine: Some(engine),
        })
    }

    /// Release the underlying database resource
    ///
    /// Idempotent: calling it again is a no-op. Queries on a closed
    /// handle return `None`, [`info`] returns an empty string and
    /// [`edition`] returns [`DatabaseEdition::Unknown`]. Dropping the
    /// handle closes it too.
    ///
    /// [`info`]: Database::info
    /// [`edition`]: Database::edition
    pub fn close(&mut self) {
        self.engine = None;
    }

    /// Whether the handle is still open
    pub fn is_open(&self) -> bool {
        self.engine.is_some()
    }

    /// Human-readable description of the database edition and build
    ///
    /// Never fails; returns an empty string when the handle is closed.
    pub fn info(&self) -> String {
        let engine = match &self.engine {
            Some(engine) => engine,
            None => return String::new(),
        };
        let meta = engine.metadata();
        let mut info = format!(
            "{} {}.{} build {}",
            meta.database_type,
            meta.binary_format_major_version,
            meta.binary_format_minor_version,
            meta.build_epoch
        );
        if let Some(description) = meta.description.get("en") {
            info.push_str("; ");
            info.push_str(description);
        }
        info
    }

    /// Database type/edition identifier from the metadata
    pub fn edition(&self) -> DatabaseEdition {
        match &self.engine {
            Some(engine) => DatabaseEdition::from_database_type(&engine.metadata().database_type),
            None => DatabaseEdition::Unknown,
        }
    }

    /// Resolve a raw IP address to a location record
    ///
    /// `ip` must be a 4-byte IPv4 or a 16-byte IPv6 address. A 4-byte
    /// address is packed into the engine's big-endian numeric key via
    /// [`ipv4_to_u32`]; a 16-byte address is queried with its binary
    /// form directly. Any other length is treated as unresolvable and
    /// yields `None` rather than an error.
    ///
    /// Returns `None` when no network in the database covers the
    /// address. A returned record always came from a matching network;
    /// individual attributes the database lacks are empty or zero.
    pub fn record_by_ip(&self, ip: &[u8]) -> Option<LocationRecord> {
        match ip.len() {
            4 => {
                let octets: [u8; 4] = ip.try_into().ok()?;
                let key = ipv4_to_u32(octets);
                self.query(IpAddr::V4(Ipv4Addr::from(key)))
            }
            16 => {
                let octets: [u8; 16] = ip.try_into().ok()?;
                self.query(IpAddr::V6(Ipv6Addr::from(octets)))
            }
            _ => None,
        }
    }

    /// Resolve a parsed address, forwarding its raw octets to
    /// [`record_by_ip`]
    ///
    /// [`record_by_ip`]: Database::record_by_ip
    pub fn record_by_addr(&self, addr: IpAddr) -> Option<LocationRecord> {
        match addr {
            IpAddr::V4(v4) => self.record_by_ip(&v4.octets()),
            IpAddr::V6(v6) => self.record_by_ip(&v6.octets()),
        }
    }

    fn query(&self, addr: IpAddr) -> Option<LocationRecord> {
        let engine = self.engine.as_ref()?;
        match engine.lookup(addr) {
            Ok(doc) => Some(LocationRecord::decode(doc)),
            // A miss and an undecodable entry are both plain absence.
            Err(_) => None,
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("open", &self.is_open())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ipv4_key_packs_big_endian() {
        assert_eq!(ipv4_to_u32([8, 8, 8, 8]), 134744072);
        assert_eq!(ipv4_to_u32([0, 0, 0, 0]), 0);
        assert_eq!(ipv4_to_u32([255, 255, 255, 255]), u32::MAX);
        assert_eq!(ipv4_to_u32([1, 2, 3, 4]), 16909060);
        assert_eq!(ipv4_to_u32([192, 168, 0, 1]), 3232235521);
    }

    proptest! {
        #[test]
        fn ipv4_key_matches_be_packing(octets in any::<[u8; 4]>()) {
            prop_assert_eq!(ipv4_to_u32(octets), u32::from_be_bytes(octets));
        }

        #[test]
        fn ipv4_key_round_trips_through_addr(octets in any::<[u8; 4]>()) {
            let addr = Ipv4Addr::from(ipv4_to_u32(octets));
            prop_assert_eq!(addr.octets(), octets);
        }
    }

    #[test]
    fn edition_from_database_type() {
        use DatabaseEdition::*;
        let cases = [
            ("GeoLite2-Country", Country),
            ("GeoIP2-City", City),
            ("GeoIP2-Enterprise", Enterprise),
            ("GeoIP2-Enterprise-Test", Enterprise),
            ("GeoLite2-ASN", Asn),
            ("GeoIP2-ISP", Isp),
            ("GeoIP2-Connection-Type", ConnectionType),
            ("GeoIP2-Domain", Domain),
            ("GeoIP2-Anonymous-IP", AnonymousIp),
            ("something-else", Unknown),
            ("", Unknown),
        ];
        for (input, expected) in cases {
            assert_eq!(
                DatabaseEdition::from_database_type(input),
                expected,
                "database_type {:?}",
                input
            );
        }
    }

    #[test]
    fn default_cache_mode_is_standard() {
        assert_eq!(CacheMode::default(), CacheMode::Standard);
    }

    #[test]
    fn handle_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Database>();
    }
}
