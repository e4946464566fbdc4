use super::context::Context;
use super::key::KeyCodec;
use crate::database::Database;

/// One random-walk generation pass.
///
/// A `Generator` borrows the engine's codec and backend for the
/// duration of a single `generate` call and replays the learned
/// transition statistics as a random walk starting from the empty
/// context.
pub(crate) struct Generator<'a, D: Database> {
	codec: &'a KeyCodec,
	stop_word: &'a str,
	db: &'a mut D,
}

impl<'a, D: Database> Generator<'a, D> {
	pub(crate) fn new(codec: &'a KeyCodec, stop_word: &'a str, db: &'a mut D) -> Self {
		Self { codec, stop_word, db }
	}

	/// Generates a sentence from the learned transitions under
	/// `extra_prefix`.
	///
	/// # Behavior
	/// - Starts from the empty context and repeatedly picks a uniform
	///   random member of the current context's transition set.
	/// - Stops on the stop word, on an empty pick, or when the backend
	///   has no value for the current context.
	/// - Joins the emitted words with single spaces.
	///
	/// The walk always terminates over data populated by the learner,
	/// because every learned chain was capped with the stop word. An
	/// unpopulated backend yields an empty sentence, which is valid.
	///
	/// # Errors
	/// Propagates the first backend error, aborting the walk.
	pub(crate) fn generate(
		&mut self,
		extra_prefix: &str,
	) -> Result<String, Box<dyn std::error::Error>> {
		let mut context = Context::new();
		let mut out: Vec<String> = Vec::new();

		loop {
			let key = self.codec.make_key(extra_prefix, &context);
			match self.db.random(&key)? {
				Some(word) if !word.is_empty() && word != self.stop_word => {
					context.shift(&word);
					out.push(word);
				}
				_ => break,
			}
		}
		Ok(out.join(" "))
	}
}
