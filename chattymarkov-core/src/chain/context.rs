use std::mem;

/// Rolling two-word context of the markov chain.
///
/// A `Context` holds the two most recently consumed (while learning) or
/// emitted (while generating) words. The empty string denotes "no word
/// yet", so the initial context is `("", "")` at the start of every
/// sentence.
///
/// ## Invariants
/// - Neither word ever contains the engine separator or the stop word;
///   both come from learned text, which excludes the sentinels.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Context {
	previous: String,
	last: String,
}

impl Context {
	/// Creates the empty context used at sentence start.
	pub fn new() -> Self {
		Self::default()
	}

	/// The word before last, or `""` if none yet.
	pub fn previous(&self) -> &str {
		&self.previous
	}

	/// The most recent word, or `""` if none yet.
	pub fn last(&self) -> &str {
		&self.last
	}

	/// Shifts the context after consuming or emitting `word`.
	///
	/// The last word becomes the previous one and `word` becomes the
	/// last one, so the context always reflects the two most recent
	/// words of the walk.
	pub fn shift(&mut self, word: &str) {
		self.previous = mem::take(&mut self.last);
		self.last = word.to_owned();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_starts_empty() {
		let context = Context::new();
		assert_eq!(context.previous(), "");
		assert_eq!(context.last(), "");
	}

	#[test]
	fn test_shift_keeps_two_most_recent() {
		let mut context = Context::new();
		context.shift("a");
		assert_eq!((context.previous(), context.last()), ("", "a"));
		context.shift("b");
		assert_eq!((context.previous(), context.last()), ("a", "b"));
		context.shift("c");
		assert_eq!((context.previous(), context.last()), ("b", "c"));
	}
}
