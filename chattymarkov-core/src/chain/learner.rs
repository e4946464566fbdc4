use super::context::Context;
use super::key::KeyCodec;
use crate::database::Database;

/// One learning pass over a sentence.
///
/// A `Learner` borrows the engine's codec and backend for the duration
/// of a single `learn` call. It derives every (context, next word)
/// observation from the sentence and writes it through the backend.
///
/// ## Invariants
/// - Backend calls are issued strictly in sequence; each key depends on
///   the context mutated by the previous step
/// - Every learned chain is capped with the stop word, so generation
///   over this data always terminates
pub(crate) struct Learner<'a, D: Database> {
	codec: &'a KeyCodec,
	stop_word: &'a str,
	db: &'a mut D,
}

impl<'a, D: Database> Learner<'a, D> {
	pub(crate) fn new(codec: &'a KeyCodec, stop_word: &'a str, db: &'a mut D) -> Self {
		Self { codec, stop_word, db }
	}

	/// Learns from `msg` under `extra_prefix`.
	///
	/// # Behavior
	/// - Splits `msg` on whitespace and appends the stop word as a
	///   final pseudo-word.
	/// - Walks the words left to right with a rolling context, recording
	///   "given this context, this word can follow" for each position.
	/// - The initial context is empty, so sentence starts are recorded
	///   too and generation can start cold.
	///
	/// Empty or whitespace-only messages are a silent no-op: the
	/// backend is not touched at all.
	///
	/// # Errors
	/// Propagates the first backend error, aborting the pass.
	pub(crate) fn learn(
		&mut self,
		msg: &str,
		extra_prefix: &str,
	) -> Result<(), Box<dyn std::error::Error>> {
		let words: Vec<&str> = msg.split_whitespace().collect();
		if words.is_empty() {
			return Ok(());
		}

		let mut context = Context::new();
		for word in words.into_iter().chain(std::iter::once(self.stop_word)) {
			let key = self.codec.make_key(extra_prefix, &context);
			self.db.add(&key, word)?;
			context.shift(word);
		}
		Ok(())
	}
}
