use std::collections::HashMap;

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::Database;

/// One stored value: either a transition set or a scalar.
///
/// Untagged so that the JSON form stays the natural one: sets are
/// arrays, scalars are plain strings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum Entry {
	Set(Vec<String>),
	Scalar(String),
}

/// Volatile in-memory backend.
///
/// Just a map from key to `Entry`, built either from scratch or from a
/// pre-existing map. Nothing is saved when the value is dropped; the
/// JSON backend wraps this one to add persistence.
///
/// ## Invariants
/// - A `Set` entry never contains duplicate members
/// - Members keep insertion order, which carries no meaning; picks are
///   uniform over the current members
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryDatabase {
	db: HashMap<String, Entry>,
}

impl MemoryDatabase {
	/// Creates an empty database.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a database over a pre-existing map.
	pub fn from_map(db: HashMap<String, Entry>) -> Self {
		Self { db }
	}

	/// Number of stored keys.
	pub fn len(&self) -> usize {
		self.db.len()
	}

	/// `true` if nothing has been stored yet.
	pub fn is_empty(&self) -> bool {
		self.db.is_empty()
	}

	/// Read-only view of the underlying map.
	pub fn entries(&self) -> &HashMap<String, Entry> {
		&self.db
	}
}

impl Database for MemoryDatabase {
	fn add(&mut self, key: &str, element: &str) -> Result<bool, Box<dyn std::error::Error>> {
		let entry = self
			.db
			.entry(key.to_owned())
			.or_insert_with(|| Entry::Set(Vec::new()));

		match entry {
			Entry::Set(set) => {
				if set.iter().any(|member| member == element) {
					Ok(false)
				} else {
					set.push(element.to_owned());
					Ok(true)
				}
			}
			// Key already holds a scalar: defined no-op.
			Entry::Scalar(_) => Ok(false),
		}
	}

	fn random(&mut self, key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
		match self.db.get(key) {
			Some(Entry::Set(set)) => Ok(set.choose(&mut rand::rng()).cloned()),
			_ => Ok(None),
		}
	}

	fn get(&mut self, key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
		match self.db.get(key) {
			Some(Entry::Scalar(value)) => Ok(Some(value.clone())),
			_ => Ok(None),
		}
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
		self.db
			.insert(key.to_owned(), Entry::Scalar(value.to_owned()));
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_add() {
		let mut db = MemoryDatabase::new();
		assert!(db.add("foo", "bar").unwrap());
		assert_eq!(
			db.entries().get("foo"),
			Some(&Entry::Set(vec!["bar".to_owned()]))
		);
	}

	#[test]
	fn test_add_is_idempotent() {
		let mut db = MemoryDatabase::new();
		assert!(db.add("foo", "bar").unwrap());
		assert!(!db.add("foo", "bar").unwrap());
		assert_eq!(
			db.entries().get("foo"),
			Some(&Entry::Set(vec!["bar".to_owned()]))
		);
	}

	#[test]
	fn test_random_on_missing_key() {
		let mut db = MemoryDatabase::new();
		assert_eq!(db.random("missing").unwrap(), None);
	}

	#[test]
	fn test_random_picks_a_member() {
		let mut db = MemoryDatabase::new();
		db.add("foo", "bar").unwrap();
		db.add("foo", "baz").unwrap();
		for _ in 0..20 {
			let pick = db.random("foo").unwrap().unwrap();
			assert!(pick == "bar" || pick == "baz");
		}
	}

	#[test]
	fn test_get_set_scalar() {
		let mut db = MemoryDatabase::new();
		assert_eq!(db.get("counter").unwrap(), None);
		db.set("counter", "41").unwrap();
		db.set("counter", "42").unwrap();
		assert_eq!(db.get("counter").unwrap().as_deref(), Some("42"));
	}

	#[test]
	fn test_type_anomalies_are_absorbed() {
		let mut db = MemoryDatabase::new();
		db.set("scalar", "value").unwrap();
		// Set operations over a scalar key: no value, no-op.
		assert!(!db.add("scalar", "member").unwrap());
		assert_eq!(db.random("scalar").unwrap(), None);
		// Scalar read over a set key: no value.
		db.add("set", "member").unwrap();
		assert_eq!(db.get("set").unwrap(), None);
	}
}
