use super::context::Context;

/// Deterministic key encoder for backend storage.
///
/// A `KeyCodec` turns a (prefix, extra namespace, context) triple into
/// the string key under which the matching transition set is stored.
/// It is a pure function of its inputs and holds no backend state.
///
/// ## Responsibilities
/// - Join, in order, the engine prefix, the optional extra namespace
///   and the two context words, all separated by the separator character
/// - Guarantee that distinct triples map to distinct keys
///
/// ## Invariants
/// - The separator never occurs in learned text, so the context words
///   cannot forge a field boundary
/// - The extra-namespace segment is omitted entirely when empty, which
///   keeps the empty namespace distinct from every non-empty one
#[derive(Clone, Debug)]
pub struct KeyCodec {
	/// Leading segment of every key, separating vocabularies that
	/// share one backend.
	prefix: String,
	/// Field separator. Must never appear in learned words.
	separator: char,
}

impl KeyCodec {
	/// Creates a codec for the given prefix and separator.
	pub fn new(prefix: &str, separator: char) -> Self {
		Self {
			prefix: prefix.to_owned(),
			separator,
		}
	}

	/// The engine prefix this codec was built with.
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	/// The field separator this codec was built with.
	pub fn separator(&self) -> char {
		self.separator
	}

	/// Builds the storage key for `context` under `extra_prefix`.
	///
	/// # Parameters
	/// - `extra_prefix`: extra namespace segment, `""` for the default
	///   vocabulary. Callers supplying a non-empty value are responsible
	///   for keeping the separator out of it.
	/// - `context`: the rolling context to encode.
	///
	/// # Returns
	/// The key string. Equal inputs always produce equal keys; any
	/// differing component produces a different key.
	pub fn make_key(&self, extra_prefix: &str, context: &Context) -> String {
		let mut key = String::with_capacity(
			self.prefix.len()
				+ extra_prefix.len()
				+ context.previous().len()
				+ context.last().len()
				+ 3,
		);
		key.push_str(&self.prefix);
		if !extra_prefix.is_empty() {
			key.push(self.separator);
			key.push_str(extra_prefix);
		}
		key.push(self.separator);
		key.push_str(context.previous());
		key.push(self.separator);
		key.push_str(context.last());
		key
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn context(previous: &str, last: &str) -> Context {
		let mut context = Context::new();
		context.shift(previous);
		context.shift(last);
		context
	}

	#[test]
	fn test_deterministic() {
		let codec = KeyCodec::new("chattymarkov", '\u{1}');
		let a = codec.make_key("", &context("hello", "world"));
		let b = codec.make_key("", &context("hello", "world"));
		assert_eq!(a, b);
	}

	#[test]
	fn test_distinct_contexts_distinct_keys() {
		let codec = KeyCodec::new("chattymarkov", '\u{1}');
		let reference = codec.make_key("", &context("hello", "world"));
		assert_ne!(reference, codec.make_key("", &context("hello", "there")));
		assert_ne!(reference, codec.make_key("", &context("bye", "world")));
		assert_ne!(reference, codec.make_key("", &Context::new()));
	}

	#[test]
	fn test_empty_context_is_a_valid_key() {
		let codec = KeyCodec::new("chattymarkov", '\u{1}');
		let key = codec.make_key("", &Context::new());
		assert_eq!(key, "chattymarkov\u{1}\u{1}");
	}

	#[test]
	fn test_namespaces_do_not_collide() {
		let codec = KeyCodec::new("chattymarkov", '\u{1}');
		let plain = codec.make_key("", &context("hello", "world"));
		let scoped = codec.make_key("corpus", &context("hello", "world"));
		assert_ne!(plain, scoped);
		assert_ne!(scoped, codec.make_key("other", &context("hello", "world")));
	}

	#[test]
	fn test_prefix_separates_engines() {
		let one = KeyCodec::new("one", '\u{1}');
		let two = KeyCodec::new("two", '\u{1}');
		let ctx = context("a", "b");
		assert_ne!(one.make_key("", &ctx), two.make_key("", &ctx));
	}
}
