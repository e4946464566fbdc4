use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use super::memory::{Entry, MemoryDatabase};
use super::Database;

/// JSON-file-backed backend.
///
/// JSON files are actually not really suitable for a key-value store;
/// loading and storing can be slow if the engine is learning a lot.
/// Still handy for small corpora that must survive restarts.
///
/// Wraps a `MemoryDatabase` loaded from `filepath` at construction.
/// Nothing is written back until `flush` is called; dropping the value
/// flushes as a last resort and logs a warning on failure.
#[derive(Debug)]
pub struct JsonFileDatabase {
	inner: MemoryDatabase,
	filepath: PathBuf,
}

impl JsonFileDatabase {
	/// Opens the database stored at `filepath`.
	///
	/// A missing file yields an empty database; the file will be
	/// created on the first `flush`.
	///
	/// # Errors
	/// Fails if the file exists but cannot be read or is not a JSON
	/// object of sets and scalars.
	pub fn open<P: AsRef<Path>>(filepath: P) -> Result<Self, Box<dyn std::error::Error>> {
		let filepath = filepath.as_ref().to_path_buf();
		let inner = if filepath.exists() {
			let reader = BufReader::new(File::open(&filepath)?);
			let db: HashMap<String, Entry> = serde_json::from_reader(reader)?;
			MemoryDatabase::from_map(db)
		} else {
			MemoryDatabase::new()
		};
		Ok(Self { inner, filepath })
	}

	/// The file this database persists to.
	pub fn filepath(&self) -> &Path {
		&self.filepath
	}

	/// Writes the current state back to the file.
	pub fn flush(&self) -> Result<(), Box<dyn std::error::Error>> {
		let writer = BufWriter::new(File::create(&self.filepath)?);
		serde_json::to_writer(writer, self.inner.entries())?;
		Ok(())
	}
}

impl Database for JsonFileDatabase {
	fn add(&mut self, key: &str, element: &str) -> Result<bool, Box<dyn std::error::Error>> {
		self.inner.add(key, element)
	}

	fn random(&mut self, key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
		self.inner.random(key)
	}

	fn get(&mut self, key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
		self.inner.get(key)
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
		self.inner.set(key, value)
	}
}

impl Drop for JsonFileDatabase {
	fn drop(&mut self) {
		if let Err(error) = self.flush() {
			log::warn!(
				"failed to flush database to {}: {}",
				self.filepath.display(),
				error
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::env;

	fn temp_path(name: &str) -> PathBuf {
		env::temp_dir().join(format!("chattymarkov-{}-{}.json", name, std::process::id()))
	}

	#[test]
	fn test_missing_file_starts_empty() {
		let path = temp_path("missing");
		let _ = std::fs::remove_file(&path);
		let db = JsonFileDatabase::open(&path).unwrap();
		assert!(db.inner.is_empty());
		drop(db);
		// Dropping flushed, so the file now exists.
		assert!(path.exists());
		std::fs::remove_file(&path).unwrap();
	}

	#[test]
	fn test_flush_and_reload_round_trip() {
		let path = temp_path("roundtrip");
		let _ = std::fs::remove_file(&path);
		{
			let mut db = JsonFileDatabase::open(&path).unwrap();
			db.add("foo", "bar").unwrap();
			db.add("foo", "baz").unwrap();
			db.set("counter", "42").unwrap();
			db.flush().unwrap();
		}
		let mut db = JsonFileDatabase::open(&path).unwrap();
		let pick = db.random("foo").unwrap().unwrap();
		assert!(pick == "bar" || pick == "baz");
		assert_eq!(db.get("counter").unwrap().as_deref(), Some("42"));
		std::fs::remove_file(&path).unwrap();
	}

	#[test]
	fn test_rejects_malformed_file() {
		let path = temp_path("malformed");
		std::fs::write(&path, b"not json at all").unwrap();
		assert!(JsonFileDatabase::open(&path).is_err());
		std::fs::remove_file(&path).unwrap();
	}
}
