use crate::vocab;
use decoded_char::DecodedChar;
use iref::IriRefBuf;
use langtag::LangTagBuf;
use locspan::{Meta, Span};
use std::{collections::VecDeque, convert::Infallible, fmt};

/// Location of a token in the source document.
///
/// Lines and columns start at 1. The span holds byte offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
	pub line: usize,
	pub column: usize,
	pub span: Span,
}

impl Position {
	pub fn new(line: usize, column: usize, span: Span) -> Self {
		Self { line, column, span }
	}

	/// Extends this position up to the end of `other`.
	pub fn until(self, other: Position) -> Self {
		Self {
			span: Span::new(self.span.start(), other.span.end()),
			..self
		}
	}
}

impl Default for Position {
	fn default() -> Self {
		Self::new(1, 1, Span::default())
	}
}

impl fmt::Display for Position {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "line {}, column {}", self.line, self.column)
	}
}

/// Fallible tokens iterator with lookahead.
pub trait Tokens {
	type Error;

	#[allow(clippy::type_complexity)]
	fn peek(&mut self) -> Result<Meta<Option<&Token>, Position>, Meta<Self::Error, Position>>;

	#[allow(clippy::type_complexity)]
	fn next(&mut self) -> Result<Meta<Option<Token>, Position>, Meta<Self::Error, Position>>;
}

/// Delimited construct left open at the end of the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
	Iri,
	String,
}

impl fmt::Display for Delimiter {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Iri => write!(f, "IRI"),
			Self::String => write!(f, "string literal"),
		}
	}
}

/// Lexing error.
#[derive(Debug)]
pub enum Error<E = Infallible> {
	InvalidLangTag(String),
	InvalidCodepoint(u32),
	InvalidIriRef(String),
	InvalidBlankNodeLabel,
	InvalidName(String),
	InvalidNumber(String),
	InvalidDatatype,
	UnknownDirective(String),
	Unterminated(Delimiter),
	Unexpected(Option<char>),
	Stream(E),
}

impl<E: fmt::Display> fmt::Display for Error<E> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::InvalidLangTag(tag) => write!(f, "invalid language tag `{tag}`"),
			Self::InvalidCodepoint(c) => write!(f, "invalid character code point {c:x}"),
			Self::InvalidIriRef(iri_ref) => {
				write!(f, "invalid IRI reference <{iri_ref}>")
			}
			Self::InvalidBlankNodeLabel => write!(f, "invalid blank node label"),
			Self::InvalidName(name) => write!(f, "invalid name `{name}`"),
			Self::InvalidNumber(number) => write!(f, "invalid numeric literal `{number}`"),
			Self::InvalidDatatype => write!(f, "expected a datatype IRI after `^^`"),
			Self::UnknownDirective(name) => write!(f, "unknown directive `@{name}`"),
			Self::Unterminated(d) => write!(f, "unterminated {d}"),
			Self::Unexpected(None) => write!(f, "unexpected end of file"),
			Self::Unexpected(Some(c)) => write!(f, "unexpected character `{c}`"),
			Self::Stream(e) => e.fmt(f),
		}
	}
}

impl<E: 'static + std::error::Error> std::error::Error for Error<E> {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Stream(e) => Some(e),
			_ => None,
		}
	}
}

/// Directive keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
	/// `@prefix`
	Prefix,

	/// `@base`
	Base,

	/// `PREFIX`, without the leading `@`.
	SparqlPrefix,

	/// `BASE`, without the leading `@`.
	SparqlBase,
}

impl Directive {
	pub fn is_prefix(&self) -> bool {
		matches!(self, Self::Prefix | Self::SparqlPrefix)
	}

	/// SPARQL-style directives are not terminated by a dot.
	pub fn is_sparql(&self) -> bool {
		matches!(self, Self::SparqlPrefix | Self::SparqlBase)
	}
}

impl fmt::Display for Directive {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Prefix => write!(f, "@prefix"),
			Self::Base => write!(f, "@base"),
			Self::SparqlPrefix => write!(f, "PREFIX"),
			Self::SparqlBase => write!(f, "BASE"),
		}
	}
}

/// Reference to an IRI, either written out or as a prefixed name.
#[derive(Clone, Debug, PartialEq)]
pub enum Reference {
	Iri(IriRefBuf),
	Name(String),
}

impl fmt::Display for Reference {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Iri(iri) => write!(f, "<{iri}>"),
			Self::Name(name) => name.fmt(f),
		}
	}
}

/// Language tag or datatype following a string literal.
#[derive(Clone, Debug, PartialEq)]
pub enum Annotation {
	LangTag(LangTagBuf),
	Datatype(Reference),
}

/// Unquoted numeric literal, typed by its lexical shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Numeric {
	Integer(String),
	Decimal(String),
}

impl Numeric {
	pub fn as_str(&self) -> &str {
		match self {
			Self::Integer(s) | Self::Decimal(s) => s,
		}
	}

	pub fn datatype(&self) -> &'static str {
		match self {
			Self::Integer(_) => vocab::XSD_INTEGER,
			Self::Decimal(_) => vocab::XSD_DECIMAL,
		}
	}

	pub fn into_string(self) -> String {
		match self {
			Self::Integer(s) | Self::Decimal(s) => s,
		}
	}
}

/// Token.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
	Iri(IriRefBuf),

	/// Bareword: a prefixed name, `a`, `true` or `false`.
	///
	/// The parser decides what it denotes from the grammar position.
	Name(String),

	StringLiteral(String, Option<Annotation>),
	Numeric(Numeric),

	/// Blank node label, without the leading `_:`.
	BlankNodeLabel(String),

	Directive(Directive),
	ListOpen,
	ListClose,
	Dot,
	Comma,
	Semicolon,
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Iri(iri) => write!(f, "IRI <{iri}>"),
			Self::Name(name) => write!(f, "name `{name}`"),
			Self::StringLiteral(string, _) => {
				write!(f, "string literal \"{}\"", DisplayStringLiteral(string))
			}
			Self::Numeric(n) => write!(f, "numeric literal `{}`", n.as_str()),
			Self::BlankNodeLabel(label) => write!(f, "blank node label `_:{label}`"),
			Self::Directive(d) => write!(f, "directive `{d}`"),
			Self::ListOpen => write!(f, "opening parenthesis `(`"),
			Self::ListClose => write!(f, "closing parenthesis `)`"),
			Self::Dot => write!(f, "dot `.`"),
			Self::Comma => write!(f, "comma `,`"),
			Self::Semicolon => write!(f, "semicolon `;`"),
		}
	}
}

/// Wrapper to display string literals.
pub struct DisplayStringLiteral<'a>(pub &'a str);

impl<'a> fmt::Display for DisplayStringLiteral<'a> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for c in self.0.chars() {
			match c {
				'"' => write!(f, "\\u0022"),
				'\\' => write!(f, "\\u005c"),
				'\n' => write!(f, "\\n"),
				'\r' => write!(f, "\\r"),
				'\t' => write!(f, "\\t"),
				'\u{08}' => write!(f, "\\b"),
				'\u{0c}' => write!(f, "\\f"),
				c => c.fmt(f),
			}?
		}

		Ok(())
	}
}

/// Characters iterator with a lookahead buffer.
struct Chars<C> {
	inner: C,
	lookahead: VecDeque<DecodedChar>,
}

impl<E, C: Iterator<Item = Result<DecodedChar, E>>> Chars<C> {
	fn peek_nth(&mut self, n: usize) -> Result<Option<DecodedChar>, Error<E>> {
		while self.lookahead.len() <= n {
			match self.inner.next() {
				Some(Ok(c)) => self.lookahead.push_back(c),
				Some(Err(e)) => return Err(Error::Stream(e)),
				None => return Ok(None),
			}
		}

		Ok(Some(self.lookahead[n]))
	}

	fn next(&mut self) -> Result<Option<DecodedChar>, Error<E>> {
		match self.lookahead.pop_front() {
			Some(c) => Ok(Some(c)),
			None => self.inner.next().transpose().map_err(Error::Stream),
		}
	}
}

/// Lexer cursor.
struct Cursor {
	offset: usize,
	line: usize,
	column: usize,
}

impl Cursor {
	fn here(&self) -> Position {
		Position::new(
			self.line,
			self.column + 1,
			Span::new(self.offset, self.offset),
		)
	}

	/// Moves over `c` and returns its position.
	fn advance(&mut self, c: DecodedChar) -> Position {
		let pos = Position::new(
			self.line,
			self.column + 1,
			Span::new(self.offset, self.offset + c.len()),
		);

		self.offset += c.len();
		if *c == '\n' {
			self.line += 1;
			self.column = 0;
		} else {
			self.column += 1;
		}

		pos
	}
}

/// Lexer.
///
/// Changes a character iterator into a `Token` iterator.
pub struct Lexer<C: Iterator<Item = Result<DecodedChar, E>>, E> {
	chars: Chars<C>,
	cursor: Cursor,
	begin: Position,
	last: Position,
	lookahead: Option<Meta<Token, Position>>,
}

impl<C: Iterator<Item = Result<DecodedChar, E>>, E> Lexer<C, E> {
	pub fn new(chars: C) -> Self {
		Self {
			chars: Chars {
				inner: chars,
				lookahead: VecDeque::new(),
			},
			cursor: Cursor {
				offset: 0,
				line: 1,
				column: 0,
			},
			begin: Position::default(),
			last: Position::default(),
			lookahead: None,
		}
	}
}

/// Tokenizes a string.
pub fn tokenize(
	input: &str,
) -> impl Iterator<Item = Result<Meta<Token, Position>, Meta<Error, Position>>> + '_ {
	Lexer::new(
		input
			.chars()
			.map(|c| Ok::<_, Infallible>(DecodedChar::from_utf8(c))),
	)
}

impl<E, C: Iterator<Item = Result<DecodedChar, E>>> Lexer<C, E> {
	fn peek_nth_char(&mut self, n: usize) -> Result<Option<char>, Meta<Error<E>, Position>> {
		let here = self.cursor.here();
		self.chars
			.peek_nth(n)
			.map(|c| c.map(DecodedChar::into_char))
			.map_err(|e| Meta(e, here))
	}

	fn peek_char(&mut self) -> Result<Option<char>, Meta<Error<E>, Position>> {
		self.peek_nth_char(0)
	}

	fn next_char(&mut self) -> Result<Option<char>, Meta<Error<E>, Position>> {
		let here = self.cursor.here();
		match self.chars.next().map_err(|e| Meta(e, here))? {
			Some(c) => {
				self.last = self.cursor.advance(c);
				Ok(Some(c.into_char()))
			}
			None => Ok(None),
		}
	}

	fn expect_char(&mut self) -> Result<char, Meta<Error<E>, Position>> {
		self.next_char()?
			.ok_or_else(|| Meta(Error::Unexpected(None), self.cursor.here()))
	}

	/// Position of the token being lexed, up to the cursor.
	fn current(&self) -> Position {
		Position::new(
			self.begin.line,
			self.begin.column,
			Span::new(self.begin.span.start(), self.cursor.offset),
		)
	}

	fn skip_whitespaces(&mut self) -> Result<(), Meta<Error<E>, Position>> {
		while let Some(c) = self.peek_char()? {
			if c.is_whitespace() {
				self.next_char()?;
			} else if c == '#' {
				self.next_comment()?;
			} else {
				break;
			}
		}

		Ok(())
	}

	/// Parses the rest of a comment, after the first `#` character.
	///
	/// Comments run to the end of the line, or to the end of the file
	/// if there is no end of line after the comment marker.
	fn next_comment(&mut self) -> Result<(), Meta<Error<E>, Position>> {
		loop {
			if matches!(self.next_char()?, None | Some('\n')) {
				break Ok(());
			}
		}
	}

	/// Reads characters up to the next delimiter.
	fn next_word(&mut self) -> Result<String, Meta<Error<E>, Position>> {
		let mut word = String::new();
		while let Some(c) = self.peek_char()? {
			if is_delimiter(c) {
				break;
			}

			word.push(self.expect_char()?);
		}

		Ok(word)
	}

	/// Parses the rest of a lang tag, after the first `@` character.
	fn next_langtag(&mut self) -> Result<LangTagBuf, Meta<Error<E>, Position>> {
		let tag = self.next_word()?;

		let mut subtags = tag.split('-');
		let primary = subtags.next().unwrap_or_default();
		let well_formed = !primary.is_empty()
			&& primary.chars().all(|c| c.is_ascii_alphabetic())
			&& subtags.all(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()));

		if !well_formed {
			return Err(Meta(Error::InvalidLangTag(tag), self.current()));
		}

		let pos = self.current();
		LangTagBuf::new(tag.clone()).map_err(|_| Meta(Error::InvalidLangTag(tag), pos))
	}

	/// Parses an IRI, starting after the first `<` until the closing `>`.
	fn next_iri(&mut self) -> Result<IriRefBuf, Meta<Error<E>, Position>> {
		let mut iri = String::new();

		loop {
			match self.next_char()? {
				Some('>') => break,
				Some('\\') => {
					let start = self.last;
					let c = match self.next_char()? {
						Some('u') => self.next_uchar(start, 4)?,
						Some('U') => self.next_uchar(start, 8)?,
						unexpected => {
							return Err(Meta(Error::Unexpected(unexpected), self.last))
						}
					};

					iri.push(c)
				}
				Some(c) => {
					if matches!(
						c,
						'\u{00}'..='\u{20}' | '<' | '"' | '{' | '}' | '|' | '^' | '`'
					) {
						return Err(Meta(Error::Unexpected(Some(c)), self.last));
					}

					iri.push(c)
				}
				None => return Err(Meta(Error::Unterminated(Delimiter::Iri), self.current())),
			}
		}

		match IriRefBuf::new(iri) {
			Ok(iri) => Ok(iri),
			Err(e) => Err(Meta(Error::InvalidIriRef(e.0), self.current())),
		}
	}

	fn next_uchar(&mut self, start: Position, len: u8) -> Result<char, Meta<Error<E>, Position>> {
		let mut codepoint = 0;

		for _ in 0..len {
			let c = self.expect_char()?;
			match c.to_digit(16) {
				Some(d) => codepoint = codepoint << 4 | d,
				None => return Err(Meta(Error::Unexpected(Some(c)), self.last)),
			}
		}

		match char::try_from(codepoint) {
			Ok(c) => Ok(c),
			Err(_) => Err(Meta(
				Error::InvalidCodepoint(codepoint),
				start.until(self.last),
			)),
		}
	}

	fn next_escape(&mut self) -> Result<char, Meta<Error<E>, Position>> {
		let start = self.last;
		match self.next_char()? {
			Some('u') => self.next_uchar(start, 4),
			Some('U') => self.next_uchar(start, 8),
			Some('t') => Ok('\t'),
			Some('b') => Ok('\u{08}'),
			Some('n') => Ok('\n'),
			Some('r') => Ok('\r'),
			Some('f') => Ok('\u{0c}'),
			Some('\'') => Ok('\''),
			Some('"') => Ok('"'),
			Some('\\') => Ok('\\'),
			unexpected => Err(Meta(Error::Unexpected(unexpected), self.last)),
		}
	}

	/// Checks for `"""` ahead of the cursor.
	fn at_triple_quote(&mut self) -> Result<bool, Meta<Error<E>, Position>> {
		Ok(self.peek_nth_char(0)? == Some('"') && self.peek_nth_char(1)? == Some('"'))
	}

	/// Parses a string literal, starting after the first `"` until the closing `"`.
	///
	/// Handles both the short form and the long `"""` form.
	fn next_string_literal(&mut self) -> Result<String, Meta<Error<E>, Position>> {
		let long = self.at_triple_quote()?;
		if long {
			self.next_char()?;
			self.next_char()?;
		}

		let mut string = String::new();

		loop {
			match self.next_char()? {
				Some('"') => {
					if !long {
						break;
					}

					if self.at_triple_quote()? && self.peek_nth_char(2)? != Some('"') {
						self.next_char()?;
						self.next_char()?;
						break;
					}

					string.push('"')
				}
				Some('\\') => string.push(self.next_escape()?),
				Some(c) => {
					if !long && matches!(c, '\n' | '\r') {
						return Err(Meta(
							Error::Unterminated(Delimiter::String),
							self.current(),
						));
					}

					string.push(c)
				}
				None => {
					return Err(Meta(
						Error::Unterminated(Delimiter::String),
						self.current(),
					))
				}
			}
		}

		Ok(string)
	}

	/// Parses the optional language tag or datatype right after a string literal.
	fn next_annotation(&mut self) -> Result<Option<Annotation>, Meta<Error<E>, Position>> {
		match self.peek_char()? {
			Some('@') => {
				self.next_char()?;
				Ok(Some(Annotation::LangTag(self.next_langtag()?)))
			}
			Some('^') => {
				self.next_char()?;
				match self.next_char()? {
					Some('^') => (),
					unexpected => return Err(Meta(Error::Unexpected(unexpected), self.last)),
				}

				let datatype = match self.peek_char()? {
					Some('<') => {
						self.next_char()?;
						Reference::Iri(self.next_iri()?)
					}
					Some(c) if is_name_start(c) => {
						let name = self.next_word()?;
						if !name.contains(':') {
							return Err(Meta(Error::InvalidDatatype, self.current()));
						}

						Reference::Name(name)
					}
					_ => return Err(Meta(Error::InvalidDatatype, self.cursor.here())),
				};

				Ok(Some(Annotation::Datatype(datatype)))
			}
			_ => Ok(None),
		}
	}

	/// Parses a blank node label, starting after the first `_`.
	fn next_blank_node_label(&mut self) -> Result<String, Meta<Error<E>, Position>> {
		match self.next_char()? {
			Some(':') => {
				let label = self.next_word()?;
				if label.is_empty() {
					Err(Meta(Error::InvalidBlankNodeLabel, self.current()))
				} else {
					Ok(label)
				}
			}
			_ => Err(Meta(Error::InvalidBlankNodeLabel, self.current())),
		}
	}

	/// Parses a directive name, starting after the `@`.
	fn next_directive(&mut self) -> Result<Directive, Meta<Error<E>, Position>> {
		let name = self.next_word()?;
		match name.as_str() {
			"prefix" => Ok(Directive::Prefix),
			"base" => Ok(Directive::Base),
			_ => Err(Meta(Error::UnknownDirective(name), self.current())),
		}
	}

	/// Parses a bareword.
	fn next_name(&mut self) -> Result<Token, Meta<Error<E>, Position>> {
		let name = self.next_word()?;

		if name.contains(':') || matches!(name.as_str(), "a" | "true" | "false") {
			Ok(Token::Name(name))
		} else if name.eq_ignore_ascii_case("prefix") {
			Ok(Token::Directive(Directive::SparqlPrefix))
		} else if name.eq_ignore_ascii_case("base") {
			Ok(Token::Directive(Directive::SparqlBase))
		} else {
			Err(Meta(Error::InvalidName(name), self.current()))
		}
	}

	fn next_digits(&mut self, number: &mut String) -> Result<usize, Meta<Error<E>, Position>> {
		let mut count = 0;
		while let Some(c) = self.peek_char()? {
			if !c.is_ascii_digit() {
				break;
			}

			number.push(self.expect_char()?);
			count += 1;
		}

		Ok(count)
	}

	/// Checks for an exponent (`e`, optional sign, digit) `n` characters ahead.
	fn at_exponent(&mut self, n: usize) -> Result<bool, Meta<Error<E>, Position>> {
		if !matches!(self.peek_nth_char(n)?, Some('e' | 'E')) {
			return Ok(false);
		}

		let digit = match self.peek_nth_char(n + 1)? {
			Some('+' | '-') => self.peek_nth_char(n + 2)?,
			c => c,
		};

		Ok(digit.is_some_and(|c| c.is_ascii_digit()))
	}

	/// Parses a numeric literal.
	///
	/// A `.` only belongs to the number when a digit or an exponent follows it,
	/// otherwise it is left for the statement terminator.
	fn next_numeric(&mut self) -> Result<Numeric, Meta<Error<E>, Position>> {
		let mut number = String::new();
		let mut decimal = false;

		if let Some(sign @ ('+' | '-')) = self.peek_char()? {
			self.next_char()?;
			number.push(sign);
		}

		if self.next_digits(&mut number)? == 0 {
			return Err(Meta(Error::InvalidNumber(number), self.current()));
		}

		if self.peek_nth_char(0)? == Some('.')
			&& (self.peek_nth_char(1)?.is_some_and(|c| c.is_ascii_digit()) || self.at_exponent(1)?)
		{
			number.push(self.expect_char()?);
			self.next_digits(&mut number)?;
			decimal = true;
		}

		if let Some(e @ ('e' | 'E')) = self.peek_char()? {
			self.next_char()?;
			number.push(e);
			if let Some(sign @ ('+' | '-')) = self.peek_char()? {
				self.next_char()?;
				number.push(sign);
			}

			if self.next_digits(&mut number)? == 0 {
				return Err(Meta(Error::InvalidNumber(number), self.current()));
			}

			decimal = true;
		}

		match self.peek_char()? {
			Some(c) if !is_delimiter(c) => {
				self.next_char()?;
				Err(Meta(Error::Unexpected(Some(c)), self.last))
			}
			_ if decimal => Ok(Numeric::Decimal(number)),
			_ => Ok(Numeric::Integer(number)),
		}
	}

	pub fn consume(&mut self) -> Result<Meta<Option<Token>, Position>, Meta<Error<E>, Position>> {
		self.skip_whitespaces()?;
		self.begin = self.cursor.here();

		let token = match self.peek_char()? {
			None => return Ok(Meta(None, self.begin)),
			Some('<') => {
				self.next_char()?;
				Token::Iri(self.next_iri()?)
			}
			Some('"') => {
				self.next_char()?;
				let string = self.next_string_literal()?;
				Token::StringLiteral(string, self.next_annotation()?)
			}
			Some('_') => {
				self.next_char()?;
				Token::BlankNodeLabel(self.next_blank_node_label()?)
			}
			Some('@') => {
				self.next_char()?;
				Token::Directive(self.next_directive()?)
			}
			Some(c @ ('.' | ',' | ';' | '(' | ')')) => {
				self.next_char()?;
				match c {
					'.' => Token::Dot,
					',' => Token::Comma,
					';' => Token::Semicolon,
					'(' => Token::ListOpen,
					_ => Token::ListClose,
				}
			}
			Some('+' | '-' | '0'..='9') => Token::Numeric(self.next_numeric()?),
			Some(c) if is_name_start(c) => self.next_name()?,
			Some(c) => {
				self.next_char()?;
				return Err(Meta(Error::Unexpected(Some(c)), self.last));
			}
		};

		Ok(Meta(Some(token), self.current()))
	}

	#[allow(clippy::type_complexity)]
	pub fn peek(&mut self) -> Result<Meta<Option<&Token>, Position>, Meta<Error<E>, Position>> {
		if self.lookahead.is_none() {
			if let Meta(Some(token), pos) = self.consume()? {
				self.lookahead = Some(Meta(token, pos));
			}
		}

		match &self.lookahead {
			Some(Meta(token, pos)) => Ok(Meta(Some(token), *pos)),
			None => Ok(Meta(None, self.cursor.here())),
		}
	}

	#[allow(clippy::type_complexity, clippy::should_implement_trait)]
	pub fn next(&mut self) -> Result<Meta<Option<Token>, Position>, Meta<Error<E>, Position>> {
		match self.lookahead.take() {
			Some(Meta(token, pos)) => Ok(Meta(Some(token), pos)),
			None => self.consume(),
		}
	}
}

impl<E, C: Iterator<Item = Result<DecodedChar, E>>> Tokens for Lexer<C, E> {
	type Error = Error<E>;

	fn peek(&mut self) -> Result<Meta<Option<&Token>, Position>, Meta<Error<E>, Position>> {
		self.peek()
	}

	fn next(&mut self) -> Result<Meta<Option<Token>, Position>, Meta<Error<E>, Position>> {
		self.next()
	}
}

impl<E, C: Iterator<Item = Result<DecodedChar, E>>> Iterator for Lexer<C, E> {
	type Item = Result<Meta<Token, Position>, Meta<Error<E>, Position>>;

	fn next(&mut self) -> Option<Self::Item> {
		match self.next() {
			Ok(Meta(Some(token), pos)) => Some(Ok(Meta(token, pos))),
			Ok(Meta(None, _)) => None,
			Err(e) => Some(Err(e)),
		}
	}
}

fn is_name_start(c: char) -> bool {
	c.is_alphabetic() || c == ':'
}

fn is_delimiter(c: char) -> bool {
	c.is_whitespace()
		|| matches!(
			c,
			'.' | ',' | ';' | '(' | ')' | '[' | ']' | '<' | '>' | '"' | '#'
		)
}
