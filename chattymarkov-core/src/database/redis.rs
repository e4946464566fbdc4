use std::path::{Path, PathBuf};

use redis::{Commands, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

use super::Database;

/// Networked redis backend.
///
/// Talks to a redis server over TCP or a unix socket using the
/// blocking client; transition sets map directly onto redis sets
/// (SADD / SRANDMEMBER) and the scalar escape hatch onto GET / SET.
///
/// Construction never touches the network: the connection is
/// established lazily on the first operation, so an unreachable server
/// fails the `learn`/`generate` call that first needs it, not the
/// engine's construction.
///
/// ## Contract notes
/// - WRONGTYPE replies (a key holding a non-set value, or the
///   opposite) are absorbed as "no value"/no-op
/// - Concurrency is the server's: SADD and SRANDMEMBER are atomic on
///   the redis side, so concurrent engines sharing one server are safe
pub struct RedisDatabase {
	client: redis::Client,
	connection: Option<redis::Connection>,
	host: Option<String>,
	port: Option<u16>,
	db: i64,
	unix_socket_path: Option<PathBuf>,
	password: Option<String>,
}

impl std::fmt::Debug for RedisDatabase {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RedisDatabase")
			.field("host", &self.host)
			.field("port", &self.port)
			.field("db", &self.db)
			.field("unix_socket_path", &self.unix_socket_path)
			.finish()
	}
}

impl RedisDatabase {
	/// Creates a backend for a TCP connection to `host:port`.
	///
	/// # Errors
	/// Fails on invalid connection parameters; the server itself is
	/// only contacted on first use.
	pub fn tcp(
		host: &str,
		port: u16,
		db: i64,
		password: Option<String>,
	) -> Result<Self, Box<dyn std::error::Error>> {
		let client = redis::Client::open(ConnectionInfo {
			addr: ConnectionAddr::Tcp(host.to_owned(), port),
			redis: RedisConnectionInfo {
				db,
				password: password.clone(),
				..Default::default()
			},
		})?;
		Ok(Self {
			client,
			connection: None,
			host: Some(host.to_owned()),
			port: Some(port),
			db,
			unix_socket_path: None,
			password,
		})
	}

	/// Creates a backend for a unix-socket connection to `path`.
	pub fn unix<P: AsRef<Path>>(
		path: P,
		db: i64,
		password: Option<String>,
	) -> Result<Self, Box<dyn std::error::Error>> {
		let path = path.as_ref().to_path_buf();
		let client = redis::Client::open(ConnectionInfo {
			addr: ConnectionAddr::Unix(path.clone()),
			redis: RedisConnectionInfo {
				db,
				password: password.clone(),
				..Default::default()
			},
		})?;
		Ok(Self {
			client,
			connection: None,
			host: None,
			port: None,
			db,
			unix_socket_path: Some(path),
			password,
		})
	}

	/// Builds a backend from the resource part of a `redis://`
	/// connection string.
	///
	/// # Grammar
	/// `connection[;key=value;...]` where `connection` is either
	/// `host:port` or an absolute unix-socket path, and the recognized
	/// parameters are `db` (numeric database index) and `password`.
	/// Unrecognized parameters are ignored.
	///
	/// # Errors
	/// Fails on a malformed `host:port`, a non-numeric port or a
	/// non-numeric `db` index.
	pub fn from_resource(resource: &str) -> Result<Self, Box<dyn std::error::Error>> {
		let mut parts = resource.split(';');
		// `split` always yields at least one item.
		let connection = parts.next().unwrap_or_default();

		let mut db: i64 = 0;
		let mut password: Option<String> = None;
		for param in parts {
			if let Some((key, value)) = param.split_once('=') {
				match key {
					"db" => {
						db = value
							.parse()
							.map_err(|_| format!("Invalid redis database index '{}'", value))?;
					}
					"password" => password = Some(value.to_owned()),
					_ => {}
				}
			}
		}

		if connection.starts_with('/') {
			// UNIX socket connection
			Self::unix(connection, db, password)
		} else {
			// TCP connection
			let (host, port) = connection.split_once(':').ok_or_else(|| {
				format!(
					"Invalid redis resource '{}', expected host:port or an \
					 absolute unix-socket path",
					connection
				)
			})?;
			if host.is_empty() {
				return Err(format!("Invalid redis resource '{}', empty host", connection).into());
			}
			let port: u16 = port
				.parse()
				.map_err(|_| format!("Invalid redis port '{}'", port))?;
			Self::tcp(host, port, db, password)
		}
	}

	pub fn host(&self) -> Option<&str> {
		self.host.as_deref()
	}

	pub fn port(&self) -> Option<u16> {
		self.port
	}

	pub fn db(&self) -> i64 {
		self.db
	}

	pub fn unix_socket_path(&self) -> Option<&Path> {
		self.unix_socket_path.as_deref()
	}

	pub fn password(&self) -> Option<&str> {
		self.password.as_deref()
	}

	/// Returns the live connection, establishing it on first use.
	fn connection(&mut self) -> Result<&mut redis::Connection, redis::RedisError> {
		if self.connection.is_none() {
			self.connection = Some(self.client.get_connection()?);
		}
		// Just filled above
		Ok(self.connection.as_mut().unwrap())
	}
}

/// Maps a WRONGTYPE reply to the contract's "no value" result.
fn absorb_wrong_type<T>(
	result: Result<T, redis::RedisError>,
	fallback: T,
) -> Result<T, Box<dyn std::error::Error>> {
	match result {
		Ok(value) => Ok(value),
		Err(error) if error.kind() == redis::ErrorKind::TypeError => Ok(fallback),
		Err(error) => Err(error.into()),
	}
}

impl Database for RedisDatabase {
	fn add(&mut self, key: &str, element: &str) -> Result<bool, Box<dyn std::error::Error>> {
		let added: Result<i64, _> = self.connection()?.sadd(key, element);
		Ok(absorb_wrong_type(added, 0)? > 0)
	}

	fn random(&mut self, key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
		let element: Result<Option<String>, _> = self.connection()?.srandmember(key);
		absorb_wrong_type(element, None)
	}

	fn get(&mut self, key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
		let element: Result<Option<String>, _> = self.connection()?.get(key);
		absorb_wrong_type(element, None)
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
		let done: Result<(), _> = self.connection()?.set(key, value);
		Ok(done?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_tcp_resource() {
		let db = RedisDatabase::from_resource("host:1234;db=3").unwrap();
		assert_eq!(db.host(), Some("host"));
		assert_eq!(db.port(), Some(1234));
		assert_eq!(db.db(), 3);
		assert_eq!(db.unix_socket_path(), None);
	}

	#[test]
	fn test_unix_socket_resource() {
		let db = RedisDatabase::from_resource("/tmp/x.sock;db=1").unwrap();
		assert_eq!(db.unix_socket_path(), Some(Path::new("/tmp/x.sock")));
		assert_eq!(db.db(), 1);
		assert_eq!(db.host(), None);
		assert_eq!(db.port(), None);
	}

	#[test]
	fn test_password_parameter() {
		let db = RedisDatabase::from_resource("1.2.3.4:8765;db=3;password=foobar").unwrap();
		assert_eq!(db.host(), Some("1.2.3.4"));
		assert_eq!(db.port(), Some(8765));
		assert_eq!(db.db(), 3);
		assert_eq!(db.password(), Some("foobar"));
	}

	#[test]
	fn test_db_defaults_to_zero() {
		let db = RedisDatabase::from_resource("/path/to/socket.sock").unwrap();
		assert_eq!(db.db(), 0);
	}

	#[test]
	fn test_malformed_resources_are_rejected() {
		assert!(RedisDatabase::from_resource("justahost").is_err());
		assert!(RedisDatabase::from_resource("host:notaport").is_err());
		assert!(RedisDatabase::from_resource(":1234").is_err());
		assert!(RedisDatabase::from_resource("host:1234;db=three").is_err());
	}
}
