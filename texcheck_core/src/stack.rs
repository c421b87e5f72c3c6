use derive_more::Deref;

use crate::TexCheckError;
use crate::TexCheckResult;

/// Number of slots reserved the first time a stack grows.
pub const INITIAL_CAPACITY: usize = 256;

/// An owning LIFO with fallible growth.
///
/// Index `0` is the bottom of the stack. Capacity starts at
/// [`INITIAL_CAPACITY`] on the first push and doubles afterwards; it never
/// shrinks. Allocation failure is reported as
/// [`TexCheckError::StackExhausted`] instead of aborting, so callers can turn
/// it into a fatal program fault with a readable message.
#[derive(Debug, Clone, Deref)]
pub struct Stack<T> {
	#[deref(forward)]
	items: Vec<T>,
	/// Name used in the exhaustion error.
	what: &'static str,
}

impl<T> Stack<T> {
	pub fn new(what: &'static str) -> Self {
		Self {
			items: Vec::new(),
			what,
		}
	}

	/// Push `item` on top of the stack.
	pub fn push(&mut self, item: T) -> TexCheckResult<()> {
		if self.items.len() == self.items.capacity() {
			let additional = self.items.capacity().max(INITIAL_CAPACITY);
			self.items
				.try_reserve_exact(additional)
				.map_err(|_| TexCheckError::StackExhausted { what: self.what })?;
		}

		self.items.push(item);
		Ok(())
	}

	/// Remove and return the top item.
	pub fn pop(&mut self) -> Option<T> {
		self.items.pop()
	}

	/// Borrow the top item without removing it.
	pub fn top(&self) -> Option<&T> {
		self.items.last()
	}

	/// Mutably borrow the top item.
	pub fn top_mut(&mut self) -> Option<&mut T> {
		self.items.last_mut()
	}

	/// Number of reserved slots.
	pub fn size(&self) -> usize {
		self.items.capacity()
	}

	/// Number of occupied slots.
	pub fn used(&self) -> usize {
		self.items.len()
	}

	pub(crate) fn items_mut(&mut self) -> &mut Vec<T> {
		&mut self.items
	}
}
