//! Turtle tokenizer and parser.
//!
//! Turns a Turtle document into an ordered list of fully resolved triples:
//! prefixed names are expanded, relative references are resolved against the
//! current base IRI, unquoted literals are typed and collections are expanded
//! into `rdf:first`/`rdf:rest` chains.
//!
//! ```
//! use turtle_syntax::{Subject, Term};
//!
//! let doc = turtle_syntax::parse(
//! 	"@prefix ex: <http://example.org/> .
//! 	ex:s ex:p ex:o .",
//! )
//! .unwrap();
//!
//! let triple = doc.iter().next().unwrap().value();
//! assert_eq!(triple.subject, Subject::Iri("http://example.org/s".to_string()));
//! assert_eq!(triple.object, Term::Iri("http://example.org/o".to_string()));
//! ```
use langtag::LangTagBuf;
use locspan::Meta;
use std::fmt;

pub mod intern;
pub mod lexing;
pub mod parsing;
pub mod vocab;

pub use lexing::{Lexer, Position, Token};
pub use parsing::{BoxedError, ErrorKind, Options, Parse, Parser, PrefixPolicy};

use lexing::DisplayStringLiteral;

/// Blank node identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlankId {
	/// Explicit `_:label`, without the `_:`.
	Label(String),

	/// Generated by the parser for list cells.
	Fresh(usize),
}

impl fmt::Display for BlankId {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Label(label) => write!(f, "_:{label}"),
			Self::Fresh(n) => write!(f, "_:#{n}"),
		}
	}
}

/// Literal value.
///
/// A literal has either a datatype or a language tag, never both.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
	TypedString(String, String),
	LangString(String, LangTagBuf),
}

impl Literal {
	/// Plain string literal, typed `xsd:string`.
	pub fn string(value: impl Into<String>) -> Self {
		Self::TypedString(value.into(), vocab::XSD_STRING.to_string())
	}

	pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
		Self::TypedString(value.into(), datatype.into())
	}

	pub fn value(&self) -> &str {
		match self {
			Self::TypedString(value, _) | Self::LangString(value, _) => value,
		}
	}

	/// Datatype IRI. Language-tagged strings are `rdf:langString`.
	pub fn datatype(&self) -> &str {
		match self {
			Self::TypedString(_, datatype) => datatype,
			Self::LangString(_, _) => vocab::RDF_LANG_STRING,
		}
	}

	pub fn language(&self) -> Option<&LangTagBuf> {
		match self {
			Self::TypedString(_, _) => None,
			Self::LangString(_, tag) => Some(tag),
		}
	}
}

impl fmt::Display for Literal {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::TypedString(value, datatype) => {
				write!(f, "\"{}\"", DisplayStringLiteral(value))?;
				if datatype != vocab::XSD_STRING {
					write!(f, "^^<{datatype}>")?;
				}

				Ok(())
			}
			Self::LangString(value, tag) => write!(f, "\"{}\"@{tag}", DisplayStringLiteral(value)),
		}
	}
}

/// Subject.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Subject {
	Iri(String),
	Blank(BlankId),
}

impl fmt::Display for Subject {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Iri(iri) => write!(f, "<{iri}>"),
			Self::Blank(id) => id.fmt(f),
		}
	}
}

/// RDF term, as found in object position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
	Iri(String),
	Blank(BlankId),
	Literal(Literal),
}

impl Term {
	pub fn as_iri(&self) -> Option<&str> {
		match self {
			Self::Iri(iri) => Some(iri),
			_ => None,
		}
	}

	pub fn as_blank(&self) -> Option<&BlankId> {
		match self {
			Self::Blank(id) => Some(id),
			_ => None,
		}
	}

	pub fn as_literal(&self) -> Option<&Literal> {
		match self {
			Self::Literal(lit) => Some(lit),
			_ => None,
		}
	}
}

impl From<Subject> for Term {
	fn from(subject: Subject) -> Self {
		match subject {
			Subject::Iri(iri) => Self::Iri(iri),
			Subject::Blank(id) => Self::Blank(id),
		}
	}
}

impl fmt::Display for Term {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Iri(iri) => write!(f, "<{iri}>"),
			Self::Blank(id) => id.fmt(f),
			Self::Literal(lit) => lit.fmt(f),
		}
	}
}

/// RDF triple.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triple {
	pub subject: Subject,
	pub predicate: String,
	pub object: Term,
}

impl Triple {
	pub fn new(subject: Subject, predicate: impl Into<String>, object: Term) -> Self {
		Self {
			subject,
			predicate: predicate.into(),
			object,
		}
	}
}

impl fmt::Display for Triple {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
	}
}

/// Turtle document, as the list of its triples in parse order.
#[derive(Clone, Debug, Default)]
pub struct Document {
	pub triples: Vec<Meta<Triple, Position>>,
}

impl Document {
	pub fn iter(&self) -> std::slice::Iter<Meta<Triple, Position>> {
		self.triples.iter()
	}

	pub fn len(&self) -> usize {
		self.triples.len()
	}

	pub fn is_empty(&self) -> bool {
		self.triples.is_empty()
	}
}

impl<'a> IntoIterator for &'a Document {
	type Item = &'a Meta<Triple, Position>;
	type IntoIter = std::slice::Iter<'a, Meta<Triple, Position>>;

	fn into_iter(self) -> Self::IntoIter {
		self.triples.iter()
	}
}

impl IntoIterator for Document {
	type Item = Meta<Triple, Position>;
	type IntoIter = std::vec::IntoIter<Meta<Triple, Position>>;

	fn into_iter(self) -> Self::IntoIter {
		self.triples.into_iter()
	}
}

/// Parses a Turtle document with the default options.
pub fn parse(input: &str) -> Result<Document, BoxedError<lexing::Error>> {
	Document::parse_str(input).map(|Meta(doc, _)| doc)
}
