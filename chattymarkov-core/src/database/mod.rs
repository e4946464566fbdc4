//! Storage contract and backends for the chain engine.
//!
//! The engine only ever talks to a `Database`; everything else in this
//! module is one way of providing that capability:
//! - `memory`: volatile in-process map
//! - `json`: memory map persisted to a JSON file
//! - `redis`: networked redis store (blocking client)
//!
//! Backends are usually picked at runtime through
//! `build_database_connection` and a connection string of the form
//! `scheme://resource[;key=value;...]`.

use std::collections::HashMap;

use once_cell::sync::Lazy;

pub mod json;
pub mod memory;
pub mod redis;

use self::json::JsonFileDatabase;
use self::memory::MemoryDatabase;
use self::redis::RedisDatabase;

/// Set-valued key-store capability required by the chain engine.
///
/// Each key scopes an unordered set of words; the engine relies on
/// set-like membership (`add`), uniform random picks (`random`) and a
/// scalar escape hatch (`get`/`set`) that the chain algorithm itself
/// never uses.
///
/// ## Contract
/// - `add` is idempotent and creates the set on first write
/// - `random` returns `None` for an absent key or an empty set
/// - A key holding a value of the wrong shape is treated as
///   "no value"/no-op, never as an error
/// - Under concurrent writers (callers serialize through their own
///   lock or the store itself), `add` must not lose updates or create
///   duplicate members, and `random` must observe either an old or a
///   new membership view, never a corrupted one
///
/// Operations take `&mut self` because networked backends hold a
/// connection; callers sharing one backend wrap it in a lock.
pub trait Database: Send {
	/// Inserts `element` into the set stored under `key` if absent.
	///
	/// # Returns
	/// `true` if the element was inserted, `false` if it was already a
	/// member or the key holds a non-set value (both defined no-ops).
	fn add(&mut self, key: &str, element: &str) -> Result<bool, Box<dyn std::error::Error>>;

	/// Picks a uniformly random member of the set stored under `key`.
	///
	/// # Returns
	/// `None` if the key is absent, its set is empty, or the key holds
	/// a non-set value.
	fn random(&mut self, key: &str) -> Result<Option<String>, Box<dyn std::error::Error>>;

	/// Gets the scalar value associated to `key`, if any.
	fn get(&mut self, key: &str) -> Result<Option<String>, Box<dyn std::error::Error>>;

	/// Sets `value` as the scalar value of `key`, replacing whatever
	/// was stored there.
	fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>>;
}

impl std::fmt::Debug for dyn Database {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("dyn Database")
	}
}

impl Database for Box<dyn Database> {
	fn add(&mut self, key: &str, element: &str) -> Result<bool, Box<dyn std::error::Error>> {
		(**self).add(key, element)
	}

	fn random(&mut self, key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
		(**self).random(key)
	}

	fn get(&mut self, key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
		(**self).get(key)
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
		(**self).set(key, value)
	}
}

/// Builder registered for one connection-string scheme.
///
/// Receives everything after `://` (resource plus `;`-separated
/// parameters) and returns a ready backend.
type DatabaseBuilder = fn(&str) -> Result<Box<dyn Database>, Box<dyn std::error::Error>>;

/// Scheme registration table, populated once at first use.
static DATABASE_SCHEMES: Lazy<HashMap<&'static str, DatabaseBuilder>> = Lazy::new(|| {
	let mut schemes: HashMap<&'static str, DatabaseBuilder> = HashMap::new();
	schemes.insert("memory", |_resource| Ok(Box::new(MemoryDatabase::new())));
	schemes.insert("json", |resource| {
		Ok(Box::new(JsonFileDatabase::open(resource)?))
	});
	schemes.insert("redis", |resource| {
		Ok(Box::new(RedisDatabase::from_resource(resource)?))
	});
	schemes
});

/// Builds a backend from a connection string.
///
/// # Parameters
/// - `connect_string`: `scheme://resource[;key=value;...]`, where
///   `scheme` selects a registered backend and the rest is
///   backend-specific. Examples: `memory://`, `json:///tmp/db.json`,
///   `redis://localhost:6379;db=3`, `redis:///run/redis.sock;db=1`.
///
/// # Errors
/// Fails with a descriptive message if the string lacks `://` or the
/// scheme is not registered. Errors surface at engine construction,
/// never from `learn`/`generate`.
pub fn build_database_connection(
	connect_string: &str,
) -> Result<Box<dyn Database>, Box<dyn std::error::Error>> {
	let (scheme, resource) = connect_string.split_once("://").ok_or_else(|| {
		format!(
			"Invalid connection string '{}'. Must be of the form \
			 scheme://[resource[;param1=value1;param2=value2...]]",
			connect_string
		)
	})?;

	let builder = DATABASE_SCHEMES
		.get(scheme)
		.ok_or_else(|| format!("Database scheme '{}' is unknown", scheme))?;
	builder(resource)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_missing_scheme_marker_is_rejected() {
		let error = build_database_connection("memory").unwrap_err();
		assert!(error.to_string().contains("Invalid connection string"));
	}

	#[test]
	fn test_unknown_scheme_is_rejected() {
		let error = build_database_connection("sqlite:///tmp/db").unwrap_err();
		assert!(error.to_string().contains("unknown"));
	}

	#[test]
	fn test_memory_scheme_builds_a_working_backend() {
		let mut db = build_database_connection("memory://").unwrap();
		assert!(db.add("foo", "bar").unwrap());
		assert_eq!(db.random("foo").unwrap().as_deref(), Some("bar"));
	}
}
