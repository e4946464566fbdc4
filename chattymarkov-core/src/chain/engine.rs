use super::generator::Generator;
use super::key::KeyCodec;
use super::learner::Learner;
use crate::database::{self, Database};

/// Engine configuration, immutable after construction.
///
/// # Fields
/// - `prefix`: leading segment of every storage key.
/// - `separator`: field separator used when encoding keys. Must never
///   appear in learned text.
/// - `stop_word`: sentinel appended while learning and checked while
///   generating to end a sentence. Must never appear in learned text.
///
/// The defaults use two distinct non-printable sentinels, so any
/// ordinary text is safe to learn. Callers supplying custom sentinels
/// are responsible for keeping them out of the learned corpus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainConfig {
	pub prefix: String,
	pub separator: char,
	pub stop_word: String,
}

impl Default for ChainConfig {
	fn default() -> Self {
		Self {
			prefix: "chattymarkov".to_owned(),
			separator: '\u{1}',
			stop_word: "\u{2}".to_owned(),
		}
	}
}

/// ChattyMarkov engine.
///
/// Defines an interface between a user and a storage backend in order
/// to learn sentences and generate random ones through a second-order
/// markov chain.
///
/// # Responsibilities
/// - Compose the key codec, the learner and the generator over one
///   bound backend
/// - Map a connection string to a backend at construction time, so an
///   invalid descriptor fails construction and never `learn`/`generate`
///
/// The engine is generic over the storage capability and is never
/// specialized per backend; `connect` binds the boxed flavor produced
/// by the connection-string factory.
#[derive(Debug)]
pub struct ChattyMarkov<D: Database = Box<dyn Database>> {
	db: D,
	codec: KeyCodec,
	stop_word: String,
}

impl ChattyMarkov<Box<dyn Database>> {
	/// Connects to the backend described by `connect_string`, with the
	/// default configuration.
	///
	/// # Errors
	/// Fails if the connection string is malformed or names an unknown
	/// backend scheme. See `database::build_database_connection`.
	pub fn connect(connect_string: &str) -> Result<Self, Box<dyn std::error::Error>> {
		Self::connect_with_config(connect_string, ChainConfig::default())
	}

	/// Connects to the backend described by `connect_string` using a
	/// custom `config`.
	pub fn connect_with_config(
		connect_string: &str,
		config: ChainConfig,
	) -> Result<Self, Box<dyn std::error::Error>> {
		let db = database::build_database_connection(connect_string)?;
		Ok(Self::new_with_config(db, config))
	}
}

impl<D: Database> ChattyMarkov<D> {
	/// Binds an already-constructed backend with the default
	/// configuration.
	pub fn new(db: D) -> Self {
		Self::new_with_config(db, ChainConfig::default())
	}

	/// Binds an already-constructed backend using a custom `config`.
	pub fn new_with_config(db: D, config: ChainConfig) -> Self {
		Self {
			db,
			codec: KeyCodec::new(&config.prefix, config.separator),
			stop_word: config.stop_word,
		}
	}

	/// Learns from a message under the default (empty) namespace.
	///
	/// See `learn_in`.
	pub fn learn(&mut self, msg: &str) -> Result<(), Box<dyn std::error::Error>> {
		self.learn_in(msg, "")
	}

	/// Learns from a message under `extra_prefix`.
	///
	/// Memorises every (context, next word) transition of `msg` in the
	/// bound backend. Empty messages are accepted as silent no-ops.
	///
	/// # Parameters
	/// - `msg`: the sentence to learn from.
	/// - `extra_prefix`: extra namespace, to learn several independent
	///   corpora under one backend. `""` for the default vocabulary.
	///
	/// # Errors
	/// A backend failure aborts this call as a unit; no retry is
	/// performed and already-written transitions are kept.
	pub fn learn_in(
		&mut self,
		msg: &str,
		extra_prefix: &str,
	) -> Result<(), Box<dyn std::error::Error>> {
		Learner::new(&self.codec, &self.stop_word, &mut self.db).learn(msg, extra_prefix)
	}

	/// Generates a message from the default (empty) namespace.
	///
	/// See `generate_in`.
	pub fn generate(&mut self) -> Result<String, Box<dyn std::error::Error>> {
		self.generate_in("")
	}

	/// Generates a message by browsing the backend randomly, as one
	/// browses a markov graph, constructing a random sentence from what
	/// the engine has learned so far under `extra_prefix`.
	///
	/// # Returns
	/// The generated sentence. An engine that has learned nothing under
	/// this namespace returns an empty string; this is not an error.
	pub fn generate_in(
		&mut self,
		extra_prefix: &str,
	) -> Result<String, Box<dyn std::error::Error>> {
		Generator::new(&self.codec, &self.stop_word, &mut self.db).generate(extra_prefix)
	}

	/// The engine prefix.
	pub fn prefix(&self) -> &str {
		self.codec.prefix()
	}

	/// Read-only access to the bound backend.
	pub fn database(&self) -> &D {
		&self.db
	}

	/// Mutable access to the bound backend, for the scalar `get`/`set`
	/// escape hatch.
	pub fn database_mut(&mut self) -> &mut D {
		&mut self.db
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::database::memory::MemoryDatabase;
	use std::collections::HashSet;

	fn engine() -> ChattyMarkov<MemoryDatabase> {
		ChattyMarkov::new(MemoryDatabase::new())
	}

	#[test]
	fn test_learn_empty_is_a_noop() {
		let mut markov = engine();
		markov.learn("").unwrap();
		markov.learn("   ").unwrap();
		assert!(markov.database().is_empty());
	}

	#[test]
	fn test_single_path_round_trip() {
		// One learned path, one candidate at each step: the only
		// possible non-empty output is the learned sentence itself.
		let mut markov = engine();
		markov.learn("a b c").unwrap();
		for _ in 0..10 {
			assert_eq!(markov.generate().unwrap(), "a b c");
		}
	}

	#[test]
	fn test_learning_twice_is_idempotent() {
		let mut markov = engine();
		markov.learn("a b c").unwrap();
		let snapshot = markov.database().clone();
		markov.learn("a b c").unwrap();
		assert_eq!(markov.database(), &snapshot);
	}

	#[test]
	fn test_no_fabricated_transitions() {
		let sentences = [
			"my favorite animal is the crocodile",
			"the word animal is six letters long",
		];
		let mut markov = engine();
		let mut learned_pairs = HashSet::new();
		for sentence in &sentences {
			markov.learn(sentence).unwrap();
			let words: Vec<&str> = sentence.split_whitespace().collect();
			for pair in words.windows(2) {
				learned_pairs.insert((pair[0].to_owned(), pair[1].to_owned()));
			}
		}

		for _ in 0..50 {
			let generated = markov.generate().unwrap();
			let words: Vec<&str> = generated.split_whitespace().collect();
			assert!(!words.is_empty());
			for pair in words.windows(2) {
				assert!(
					learned_pairs.contains(&(pair[0].to_owned(), pair[1].to_owned())),
					"fabricated transition {:?} in {:?}",
					pair,
					generated
				);
			}
		}
	}

	#[test]
	fn test_generate_on_empty_backend() {
		let mut markov = engine();
		assert_eq!(markov.generate().unwrap(), "");
	}

	#[test]
	fn test_namespaces_are_isolated() {
		// Contradictory continuations for the same literal context must
		// never leak across namespaces.
		let mut markov = engine();
		markov.learn_in("the cat purrs", "cats").unwrap();
		markov.learn_in("the cat barks", "dogs").unwrap();

		for _ in 0..25 {
			assert_eq!(markov.generate_in("cats").unwrap(), "the cat purrs");
			assert_eq!(markov.generate_in("dogs").unwrap(), "the cat barks");
		}
		// Nothing was learned under the default namespace.
		assert_eq!(markov.generate().unwrap(), "");
	}

	#[test]
	fn test_custom_config() {
		let config = ChainConfig {
			prefix: "corpus".to_owned(),
			separator: '|',
			stop_word: "<end>".to_owned(),
		};
		let mut markov = ChattyMarkov::new_with_config(MemoryDatabase::new(), config);
		markov.learn("hello world").unwrap();
		assert_eq!(markov.prefix(), "corpus");
		assert_eq!(markov.generate().unwrap(), "hello world");
	}

	#[test]
	fn test_connect_rejects_bad_descriptors() {
		assert!(ChattyMarkov::connect("not-a-descriptor").is_err());
		assert!(ChattyMarkov::connect("carrier-pigeon://coop").is_err());
	}

	#[test]
	fn test_connect_memory_round_trip() {
		let mut markov = ChattyMarkov::connect("memory://").unwrap();
		markov.learn("boxed backends work too").unwrap();
		assert_eq!(markov.generate().unwrap(), "boxed backends work too");
	}
}
