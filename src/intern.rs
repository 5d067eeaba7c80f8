//! Term canonicalization.
//!
//! The parser emits plain term values. Callers that want to share equal terms
//! can pass them through a [`Canonicalize`] implementation of their choosing.
use crate::Term;
use std::{
	collections::HashMap,
	sync::{Arc, Weak},
};

/// Term canonicalizer.
pub trait Canonicalize {
	/// Returns the previously seen term equal to `term`, or registers `term`.
	fn canonicalize(&mut self, term: Term) -> Arc<Term>;
}

/// Term pool keyed by canonical string form.
///
/// The pool only holds weak references: a term is evicted once every
/// `Arc` handed out for it is dropped and [`TermPool::purge`] runs.
#[derive(Default)]
pub struct TermPool {
	terms: HashMap<String, Weak<Term>>,
}

impl TermPool {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of entries, including dead ones not yet purged.
	pub fn len(&self) -> usize {
		self.terms.len()
	}

	pub fn is_empty(&self) -> bool {
		self.terms.is_empty()
	}

	pub fn get(&self, key: &str) -> Option<Arc<Term>> {
		self.terms.get(key).and_then(Weak::upgrade)
	}

	/// Removes the entries whose term is no longer referenced.
	///
	/// Returns the number of removed entries.
	pub fn purge(&mut self) -> usize {
		let before = self.terms.len();
		self.terms.retain(|_, term| term.strong_count() > 0);
		let removed = before - self.terms.len();
		if removed > 0 {
			log::debug!("purged {removed} dead terms");
		}

		removed
	}
}

impl Canonicalize for TermPool {
	fn canonicalize(&mut self, term: Term) -> Arc<Term> {
		let key = term.to_string();
		if let Some(existing) = self.get(&key) {
			return existing;
		}

		let term = Arc::new(term);
		self.terms.insert(key, Arc::downgrade(&term));
		term
	}
}
