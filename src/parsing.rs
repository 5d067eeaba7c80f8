use crate::{
	lexing::{self, Annotation, Directive, Lexer, Position, Reference, Token, Tokens},
	vocab, BlankId, Document, Literal, Subject, Term, Triple,
};
use decoded_char::DecodedChar;
use iref::IriRefBuf;
use locspan::Meta;
use std::{collections::HashMap, convert::Infallible, fmt};

/// What the grammar required where an unexpected token was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expected {
	Directive,
	Subject,
	Predicate,
	Object,
	ListEnd,
}

impl fmt::Display for Expected {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Directive => write!(f, "directive"),
			Self::Subject => write!(f, "subject"),
			Self::Predicate => write!(f, "predicate"),
			Self::Object => write!(f, "object"),
			Self::ListEnd => write!(f, "`)`"),
		}
	}
}

#[derive(Debug)]
pub enum Error<E> {
	Lexer(E),
	Unexpected {
		expected: Expected,
		found: Option<Token>,
	},
	MalformedDirective {
		directive: Directive,
		found: Option<Token>,
	},
	UnterminatedStatement(Option<Token>),
	UndefinedPrefix(String),
	NestingLimit(usize),
}

pub type BoxedError<E> = Box<Meta<Error<E>, Position>>;

impl<E> Error<E> {
	fn from_lexer(Meta(e, pos): Meta<E, Position>) -> BoxedError<E> {
		Box::new(Meta(Self::Lexer(e), pos))
	}

	fn at(self, pos: Position) -> BoxedError<E> {
		Box::new(Meta(self, pos))
	}
}

/// Error category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
	/// Unrecognized character, malformed label, tag, number or unterminated literal.
	Lexical,

	/// Token of the wrong kind where the grammar required another.
	UnexpectedToken,

	/// Malformed `@prefix`/`@base` syntax.
	UndeclaredDirective,

	/// Statement not terminated by a `.`.
	UnterminatedStatement,

	/// Prefix not declared, under `PrefixPolicy::Strict`.
	UndefinedPrefix,

	/// Collections nested deeper than `MAX_COLLECTION_DEPTH`.
	NestingLimit,
}

impl<S> Error<lexing::Error<S>> {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Lexer(lexing::Error::UnknownDirective(_)) => ErrorKind::UndeclaredDirective,
			Self::Lexer(_) => ErrorKind::Lexical,
			Self::Unexpected { .. } => ErrorKind::UnexpectedToken,
			Self::MalformedDirective { .. } => ErrorKind::UndeclaredDirective,
			Self::UnterminatedStatement(_) => ErrorKind::UnterminatedStatement,
			Self::UndefinedPrefix(_) => ErrorKind::UndefinedPrefix,
			Self::NestingLimit(_) => ErrorKind::NestingLimit,
		}
	}
}

struct DisplayFound<'a>(&'a Option<Token>);

impl<'a> fmt::Display for DisplayFound<'a> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self.0 {
			Some(token) => token.fmt(f),
			None => write!(f, "end of file"),
		}
	}
}

impl<E: fmt::Display> fmt::Display for Error<E> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Lexer(e) => e.fmt(f),
			Self::Unexpected { expected, found } => {
				write!(f, "unexpected {}, expected {expected}", DisplayFound(found))
			}
			Self::MalformedDirective { directive, found } => {
				write!(f, "malformed `{directive}` directive: unexpected {}", DisplayFound(found))
			}
			Self::UnterminatedStatement(found) => {
				write!(f, "expected `.` to end the statement, found {}", DisplayFound(found))
			}
			Self::UndefinedPrefix(prefix) => write!(f, "undefined prefix `{prefix}:`"),
			Self::NestingLimit(max) => write!(f, "collections nested deeper than {max} levels"),
		}
	}
}

impl<E: 'static + std::error::Error> std::error::Error for Error<E> {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Lexer(e) => Some(e),
			_ => None,
		}
	}
}

/// Maximum number of collections open at the same time.
pub const MAX_COLLECTION_DEPTH: usize = 128;

/// How prefixed names with an undeclared prefix are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PrefixPolicy {
	/// The name is kept as is, and taken to be an absolute IRI.
	#[default]
	PassThrough,

	/// The name is an `UndefinedPrefix` error.
	Strict,
}

/// Parser options.
#[derive(Clone, Debug, Default)]
pub struct Options {
	/// Base IRI in effect before the first `@base`.
	pub base_iri: Option<String>,

	/// Prefixes bound before the document starts.
	pub prefixes: Vec<(String, String)>,

	pub prefix_policy: PrefixPolicy,
}

impl Options {
	pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
		self.base_iri = Some(base_iri.into());
		self
	}

	pub fn with_prefix(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
		self.prefixes.push((prefix.into(), namespace.into()));
		self
	}

	pub fn strict(mut self) -> Self {
		self.prefix_policy = PrefixPolicy::Strict;
		self
	}
}

/// Turtle parser.
///
/// Holds the prefix map, the current base IRI and the triples produced so far.
/// A parser is meant for a single document.
pub struct Parser<L> {
	lexer: L,
	prefix_policy: PrefixPolicy,
	prefixes: HashMap<String, String>,
	base: Option<String>,
	fresh: usize,
	depth: usize,
	triples: Vec<Meta<Triple, Position>>,
}

impl<L: Tokens> Parser<L> {
	pub fn new(lexer: L) -> Self {
		Self::with_options(lexer, Options::default())
	}

	pub fn with_options(lexer: L, options: Options) -> Self {
		Self {
			lexer,
			prefix_policy: options.prefix_policy,
			prefixes: options.prefixes.into_iter().collect(),
			base: options.base_iri,
			fresh: 0,
			depth: 0,
			triples: Vec::new(),
		}
	}

	/// Current base IRI.
	pub fn base_iri(&self) -> Option<&str> {
		self.base.as_deref()
	}

	pub fn prefixes(&self) -> &HashMap<String, String> {
		&self.prefixes
	}

	/// Takes the triples produced so far.
	pub fn take_triples(&mut self) -> Vec<Meta<Triple, Position>> {
		std::mem::take(&mut self.triples)
	}

	#[allow(clippy::type_complexity)]
	fn peek(&mut self) -> Result<Meta<Option<&Token>, Position>, BoxedError<L::Error>> {
		self.lexer.peek().map_err(Error::from_lexer)
	}

	#[allow(clippy::type_complexity, clippy::should_implement_trait)]
	fn next(&mut self) -> Result<Meta<Option<Token>, Position>, BoxedError<L::Error>> {
		self.lexer.next().map_err(Error::from_lexer)
	}

	fn fresh_blank(&mut self) -> BlankId {
		let id = BlankId::Fresh(self.fresh);
		self.fresh += 1;
		id
	}

	fn emit(&mut self, triple: Triple, pos: Position) {
		log::trace!("{triple}");
		self.triples.push(Meta(triple, pos))
	}

	/// Resolves an IRI reference.
	///
	/// References with a scheme are kept, others are appended to the base IRI.
	pub fn resolve(&self, iri_ref: &IriRefBuf) -> String {
		match (iri_ref.scheme(), &self.base) {
			(None, Some(base)) => format!("{base}{}", iri_ref.as_str()),
			_ => iri_ref.as_str().to_string(),
		}
	}

	/// Expands a prefixed name.
	///
	/// `:local` is relative to the base IRI. The empty prefix binding is only
	/// used when no base is set.
	pub fn expand(&self, name: &str, pos: Position) -> Result<String, BoxedError<L::Error>> {
		let (prefix, local) = name.split_once(':').unwrap_or(("", name));

		if prefix.is_empty() {
			if let Some(base) = &self.base {
				return Ok(format!("{base}{local}"));
			}
		}

		match self.prefixes.get(prefix) {
			Some(namespace) => Ok(format!("{namespace}{local}")),
			None => match (prefix.is_empty(), self.prefix_policy) {
				(_, PrefixPolicy::Strict) => Err(Error::UndefinedPrefix(prefix.to_string()).at(pos)),
				(true, PrefixPolicy::PassThrough) => Ok(local.to_string()),
				(false, PrefixPolicy::PassThrough) => Ok(name.to_string()),
			},
		}
	}

	fn resolve_reference(&self, reference: Reference, pos: Position) -> Result<String, BoxedError<L::Error>> {
		match reference {
			Reference::Iri(iri_ref) => Ok(self.resolve(&iri_ref)),
			Reference::Name(name) => self.expand(&name, pos),
		}
	}

	fn parse_literal(
		&self,
		value: String,
		annotation: Option<Annotation>,
		pos: Position,
	) -> Result<Literal, BoxedError<L::Error>> {
		match annotation {
			None => Ok(Literal::string(value)),
			Some(Annotation::LangTag(tag)) => Ok(Literal::LangString(value, tag)),
			Some(Annotation::Datatype(datatype)) => Ok(Literal::TypedString(
				value,
				self.resolve_reference(datatype, pos)?,
			)),
		}
	}

	/// Parses a `@prefix`, `@base`, `PREFIX` or `BASE` directive.
	fn parse_directive(&mut self) -> Result<(), BoxedError<L::Error>> {
		let directive = match self.next()? {
			Meta(Some(Token::Directive(directive)), _) => directive,
			Meta(unexpected, pos) => {
				return Err(Error::Unexpected {
					expected: Expected::Directive,
					found: unexpected,
				}
				.at(pos))
			}
		};

		if directive.is_prefix() {
			let prefix = match self.next()? {
				Meta(Some(Token::Name(name)), pos) => {
					let prefix = name
						.strip_suffix(':')
						.filter(|p| !p.contains(':'))
						.map(str::to_string);

					match prefix {
						Some(prefix) => prefix,
						None => {
							return Err(Error::MalformedDirective {
								directive,
								found: Some(Token::Name(name)),
							}
							.at(pos))
						}
					}
				}
				Meta(found, pos) => return Err(Error::MalformedDirective { directive, found }.at(pos)),
			};

			let namespace = match self.next()? {
				Meta(Some(Token::Iri(iri_ref)), _) => self.resolve(&iri_ref),
				Meta(found, pos) => return Err(Error::MalformedDirective { directive, found }.at(pos)),
			};

			self.end_directive(directive)?;
			log::debug!("prefix `{prefix}:` bound to <{namespace}>");
			self.prefixes.insert(prefix, namespace);
		} else {
			let base = match self.next()? {
				Meta(Some(Token::Iri(iri_ref)), _) => self.resolve(&iri_ref),
				Meta(found, pos) => return Err(Error::MalformedDirective { directive, found }.at(pos)),
			};

			self.end_directive(directive)?;
			log::debug!("base IRI set to <{base}>");
			self.base = Some(base);
		}

		Ok(())
	}

	fn end_directive(&mut self, directive: Directive) -> Result<(), BoxedError<L::Error>> {
		if directive.is_sparql() {
			if matches!(self.peek()?, Meta(Some(Token::Dot), _)) {
				self.next()?;
			}

			return Ok(());
		}

		match self.next()? {
			Meta(Some(Token::Dot), _) => Ok(()),
			Meta(found, pos) => Err(Error::MalformedDirective { directive, found }.at(pos)),
		}
	}

	/// Parses a statement: a subject, its predicate-object list, and the final `.`.
	fn parse_statement(&mut self) -> Result<(), BoxedError<L::Error>> {
		let Meta(subject, subject_pos) = Subject::parse(self)?;
		self.parse_predicate_object_list(&subject, subject_pos)?;

		match self.next()? {
			Meta(Some(Token::Dot), _) => Ok(()),
			Meta(found, pos) => Err(Error::UnterminatedStatement(found).at(pos)),
		}
	}

	fn parse_predicate_object_list(
		&mut self,
		subject: &Subject,
		subject_pos: Position,
	) -> Result<(), BoxedError<L::Error>> {
		loop {
			let Meta(predicate, _) = self.parse_predicate()?;

			loop {
				let Meta(object, object_pos) = Term::parse(self)?;
				self.emit(
					Triple::new(subject.clone(), predicate.clone(), object),
					subject_pos.until(object_pos),
				);

				if !matches!(self.peek()?, Meta(Some(Token::Comma), _)) {
					break;
				}

				self.next()?;
			}

			if !matches!(self.peek()?, Meta(Some(Token::Semicolon), _)) {
				break Ok(());
			}

			while matches!(self.peek()?, Meta(Some(Token::Semicolon), _)) {
				self.next()?;
			}

			if matches!(self.peek()?, Meta(Some(Token::Dot) | None, _)) {
				break Ok(());
			}
		}
	}

	fn parse_predicate(&mut self) -> Result<Meta<String, Position>, BoxedError<L::Error>> {
		match self.next()? {
			Meta(Some(Token::Iri(iri_ref)), pos) => Ok(Meta(self.resolve(&iri_ref), pos)),
			Meta(Some(Token::Name(name)), pos) => {
				if name == "a" {
					Ok(Meta(vocab::RDF_TYPE.to_string(), pos))
				} else if name.contains(':') {
					Ok(Meta(self.expand(&name, pos)?, pos))
				} else {
					Err(Error::Unexpected {
						expected: Expected::Predicate,
						found: Some(Token::Name(name)),
					}
					.at(pos))
				}
			}
			Meta(unexpected, pos) => Err(Error::Unexpected {
				expected: Expected::Predicate,
				found: unexpected,
			}
			.at(pos)),
		}
	}

	/// Parses the rest of a collection, after the opening `(`.
	///
	/// Each member gets a fresh list cell. The result is the head cell, or
	/// `rdf:nil` for the empty collection.
	fn parse_collection(&mut self, open: Position) -> Result<Meta<Subject, Position>, BoxedError<L::Error>> {
		if self.depth == MAX_COLLECTION_DEPTH {
			return Err(Error::NestingLimit(MAX_COLLECTION_DEPTH).at(open));
		}

		self.depth += 1;
		let result = self.parse_collection_members(open);
		self.depth -= 1;
		result
	}

	fn parse_collection_members(
		&mut self,
		open: Position,
	) -> Result<Meta<Subject, Position>, BoxedError<L::Error>> {
		let mut head = None;
		let mut current: Option<BlankId> = None;

		let close = loop {
			match self.peek()? {
				Meta(Some(Token::ListClose), _) => {
					let Meta(_, pos) = self.next()?;
					break pos;
				}
				Meta(None, pos) => {
					return Err(Error::Unexpected {
						expected: Expected::ListEnd,
						found: None,
					}
					.at(pos))
				}
				Meta(Some(_), _) => {
					let cell = self.fresh_blank();
					let Meta(member, pos) = Term::parse(self)?;

					match current.take() {
						Some(previous) => self.emit(
							Triple::new(
								Subject::Blank(previous),
								vocab::RDF_REST,
								Term::Blank(cell.clone()),
							),
							pos,
						),
						None => head = Some(cell.clone()),
					}

					self.emit(
						Triple::new(Subject::Blank(cell.clone()), vocab::RDF_FIRST, member),
						pos,
					);

					current = Some(cell);
				}
			}
		};

		if let Some(last) = current {
			self.emit(
				Triple::new(
					Subject::Blank(last),
					vocab::RDF_REST,
					Term::Iri(vocab::RDF_NIL.to_string()),
				),
				close,
			);
		}

		let subject = match head {
			Some(id) => Subject::Blank(id),
			None => Subject::Iri(vocab::RDF_NIL.to_string()),
		};

		Ok(Meta(subject, open.until(close)))
	}
}

pub trait Parse: Sized {
	#[allow(clippy::type_complexity)]
	fn parse<L: Tokens>(parser: &mut Parser<L>) -> Result<Meta<Self, Position>, BoxedError<L::Error>>;

	#[allow(clippy::type_complexity)]
	fn parse_str(string: &str) -> Result<Meta<Self, Position>, BoxedError<lexing::Error>> {
		Self::parse_str_with(string, Options::default())
	}

	#[allow(clippy::type_complexity)]
	fn parse_str_with(
		string: &str,
		options: Options,
	) -> Result<Meta<Self, Position>, BoxedError<lexing::Error>> {
		let chars = string
			.chars()
			.map(|c| Ok::<_, Infallible>(DecodedChar::from_utf8(c)));
		let mut parser = Parser::with_options(Lexer::new(chars), options);
		Self::parse(&mut parser)
	}
}

impl Parse for Subject {
	fn parse<L: Tokens>(parser: &mut Parser<L>) -> Result<Meta<Self, Position>, BoxedError<L::Error>> {
		match parser.next()? {
			Meta(Some(Token::Iri(iri_ref)), pos) => Ok(Meta(Self::Iri(parser.resolve(&iri_ref)), pos)),
			Meta(Some(Token::Name(name)), pos) if name.contains(':') => {
				Ok(Meta(Self::Iri(parser.expand(&name, pos)?), pos))
			}
			Meta(Some(Token::BlankNodeLabel(label)), pos) => {
				Ok(Meta(Self::Blank(BlankId::Label(label)), pos))
			}
			Meta(Some(Token::ListOpen), pos) => parser.parse_collection(pos),
			Meta(unexpected, pos) => Err(Error::Unexpected {
				expected: Expected::Subject,
				found: unexpected,
			}
			.at(pos)),
		}
	}
}

impl Parse for Term {
	fn parse<L: Tokens>(parser: &mut Parser<L>) -> Result<Meta<Self, Position>, BoxedError<L::Error>> {
		match parser.next()? {
			Meta(Some(Token::Iri(iri_ref)), pos) => Ok(Meta(Self::Iri(parser.resolve(&iri_ref)), pos)),
			Meta(Some(Token::Name(name)), pos) => {
				if name == "true" || name == "false" {
					Ok(Meta(Self::Literal(Literal::typed(name, vocab::XSD_BOOLEAN)), pos))
				} else if name.contains(':') {
					Ok(Meta(Self::Iri(parser.expand(&name, pos)?), pos))
				} else {
					Err(Error::Unexpected {
						expected: Expected::Object,
						found: Some(Token::Name(name)),
					}
					.at(pos))
				}
			}
			Meta(Some(Token::StringLiteral(value, annotation)), pos) => {
				let literal = parser.parse_literal(value, annotation, pos)?;
				Ok(Meta(Self::Literal(literal), pos))
			}
			Meta(Some(Token::Numeric(n)), pos) => {
				let datatype = n.datatype();
				Ok(Meta(Self::Literal(Literal::typed(n.into_string(), datatype)), pos))
			}
			Meta(Some(Token::BlankNodeLabel(label)), pos) => {
				Ok(Meta(Self::Blank(BlankId::Label(label)), pos))
			}
			Meta(Some(Token::ListOpen), pos) => {
				let Meta(head, pos) = parser.parse_collection(pos)?;
				Ok(Meta(head.into(), pos))
			}
			Meta(unexpected, pos) => Err(Error::Unexpected {
				expected: Expected::Object,
				found: unexpected,
			}
			.at(pos)),
		}
	}
}

impl Parse for Document {
	fn parse<L: Tokens>(parser: &mut Parser<L>) -> Result<Meta<Self, Position>, BoxedError<L::Error>> {
		let mut start: Option<Position> = None;

		let end = loop {
			let pos = match parser.peek()? {
				Meta(None, end) => break end,
				Meta(Some(Token::Directive(_)), pos) => {
					parser.parse_directive()?;
					pos
				}
				Meta(Some(_), pos) => {
					parser.parse_statement()?;
					pos
				}
			};

			start.get_or_insert(pos);
		};

		let pos = match start {
			Some(start) => start.until(end),
			None => end,
		};

		Ok(Meta(
			Document {
				triples: parser.take_triples(),
			},
			pos,
		))
	}
}
