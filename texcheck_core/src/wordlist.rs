use crate::TexCheckResult;
use crate::stack::Stack;

/// Number of hash buckets. A reasonably large prime.
pub const HASH_SIZE: usize = 1009;

/// One stored word together with its optional auxiliary payload (a wipe
/// template for `wipe_arg`, a character set for `no_char_next`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
	pub word: String,
	pub payload: Option<String>,
}

/// Fixed-size chained hash index over the entries of a [`WordList`]. Chains
/// hold indices into the list's backing stack.
#[derive(Debug, Clone)]
struct HashIndex {
	buckets: Vec<Vec<usize>>,
}

impl HashIndex {
	fn new() -> Self {
		Self {
			buckets: vec![Vec::new(); HASH_SIZE],
		}
	}

	fn clear(&mut self) {
		for bucket in &mut self.buckets {
			bucket.clear();
		}
	}

	fn bucket(&self, word: &str) -> &[usize] {
		&self.buckets[hash_word(word)]
	}

	fn insert(&mut self, word: &str, index: usize) {
		self.buckets[hash_word(word)].push(index);
	}
}

/// Rotate-and-xor over the bytes of `word`.
fn hash_word(word: &str) -> usize {
	let hash = word
		.bytes()
		.fold(0u32, |hash, byte| hash.rotate_left(5) ^ u32::from(byte));
	hash as usize % HASH_SIZE
}

/// A set of words with exact-match, O(1) average lookup.
///
/// Entries keep their insertion order, which matters to callers that walk
/// the list (dash length tables, dots contexts, user patterns). `max_len`
/// is the byte length of the longest entry and bounds backward scans such as
/// abbreviation matching.
#[derive(Debug, Clone)]
pub struct WordList {
	entries: Stack<WordEntry>,
	index: HashIndex,
	max_len: usize,
}

impl Default for WordList {
	fn default() -> Self {
		Self::new()
	}
}

impl WordList {
	pub fn new() -> Self {
		Self {
			entries: Stack::new("word list"),
			index: HashIndex::new(),
			max_len: 0,
		}
	}

	/// Build a list from plain words, ignoring duplicates.
	pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> TexCheckResult<Self> {
		let mut list = Self::new();
		for word in words {
			list.insert(word, None)?;
		}
		Ok(list)
	}

	/// Insert `word` with an optional payload. Returns `false` when the word
	/// was already present, in which case nothing changes.
	pub fn insert(&mut self, word: &str, payload: Option<&str>) -> TexCheckResult<bool> {
		if word.is_empty() || self.has(word).is_some() {
			return Ok(false);
		}

		let index = self.entries.used();
		self.entries.push(WordEntry {
			word: word.to_string(),
			payload: payload.map(str::to_string),
		})?;
		self.index.insert(word, index);
		self.max_len = self.max_len.max(word.len());

		Ok(true)
	}

	/// Look up `word`, returning the stored entry.
	pub fn has(&self, word: &str) -> Option<&WordEntry> {
		self.index
			.bucket(word)
			.iter()
			.map(|&index| &self.entries[index])
			.find(|entry| entry.word == word)
	}

	/// Shorthand for `has(word).is_some()`.
	pub fn contains(&self, word: &str) -> bool {
		self.has(word).is_some()
	}

	/// Lower-case every entry in place. Entries that collapse onto an
	/// existing word are dropped.
	pub fn to_lower(&mut self) -> TexCheckResult<()> {
		self.rewrite(|word| word.to_lowercase())
	}

	/// Replace every occurrence of `from` with `to` in all entries, for
	/// callers adapting a loaded list to another quote or punctuation glyph.
	/// The scanner never calls this.
	pub fn replace_in_all(&mut self, from: char, to: char) -> TexCheckResult<()> {
		self.rewrite(|word| word.replace(from, &to.to_string()))
	}

	fn rewrite(&mut self, edit: impl Fn(&str) -> String) -> TexCheckResult<()> {
		let old = std::mem::take(self.entries.items_mut());
		self.index.clear();
		self.max_len = 0;

		for entry in old {
			let word = edit(&entry.word);
			self.insert(&word, entry.payload.as_deref())?;
		}

		Ok(())
	}

	/// Length in bytes of the longest entry.
	pub fn max_len(&self) -> usize {
		self.max_len
	}

	pub fn len(&self) -> usize {
		self.entries.used()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &WordEntry> {
		self.entries.iter()
	}

	/// Words in insertion order.
	pub fn words(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|entry| entry.word.as_str())
	}
}
