use decoded_char::DecodedChar;
use locspan::Meta;
use std::convert::Infallible;
use turtle_syntax::{
	parsing::MAX_COLLECTION_DEPTH, vocab, BlankId, Document, ErrorKind, Lexer, Literal, Options,
	Parse, Parser, Subject, Term, Triple,
};

fn triples(input: &str) -> Vec<Triple> {
	match turtle_syntax::parse(input) {
		Ok(doc) => doc.into_iter().map(|Meta(t, _)| t).collect(),
		Err(e) => {
			let Meta(e, pos) = *e;
			panic!("parse error: {e} at {pos}")
		}
	}
}

fn error_kind(input: &str) -> ErrorKind {
	match turtle_syntax::parse(input) {
		Ok(doc) => panic!("parsed into {} triples", doc.len()),
		Err(e) => e.value().kind(),
	}
}

fn iri(s: &str) -> Term {
	Term::Iri(s.to_string())
}

#[test]
fn prefixed_names() {
	let triples = triples("@prefix ex: <http://example.org/> .\nex:s ex:p ex:o .");
	assert_eq!(
		triples,
		vec![Triple::new(
			Subject::Iri("http://example.org/s".to_string()),
			"http://example.org/p",
			iri("http://example.org/o")
		)]
	)
}

#[test]
fn base_relative_names() {
	let triples = triples("@base <http://example.org/> .\n:s :p :o .");
	assert_eq!(
		triples,
		vec![Triple::new(
			Subject::Iri("http://example.org/s".to_string()),
			"http://example.org/p",
			iri("http://example.org/o")
		)]
	)
}

#[test]
fn base_applies_to_later_statements_only() {
	let triples = triples(
		"@base <http://a.example/> .
		:s :p :o .
		@base <http://b.example/> .
		:s :p <o> .",
	);
	assert_eq!(triples[0].predicate, "http://a.example/p");
	assert_eq!(triples[1].predicate, "http://b.example/p");
	assert_eq!(triples[1].object, iri("http://b.example/o"));
}

#[test]
fn last_prefix_declaration_wins() {
	let triples = triples(
		"@prefix ex: <http://one.example/> .
		@prefix ex: <http://two.example/> .
		ex:s ex:p ex:o .",
	);
	assert_eq!(triples[0].predicate, "http://two.example/p")
}

#[test]
fn base_takes_precedence_over_empty_prefix() {
	let triples = triples(
		"@prefix : <http://a.example/> .
		@base <http://b.example/> .
		:s :p :o .",
	);
	assert_eq!(triples[0].subject, Subject::Iri("http://b.example/s".to_string()));
	assert_eq!(triples[0].predicate, "http://b.example/p")
}

#[test]
fn empty_prefix_without_base() {
	let triples = triples(
		"@prefix : <http://ns.example/> .
		:s :p :o .",
	);
	assert_eq!(triples[0].predicate, "http://ns.example/p")
}

#[test]
fn sparql_style_directives() {
	let triples = triples(
		"PREFIX ex: <http://example.org/>
		base <http://base.example/>
		ex:s ex:p <o> .",
	);
	assert_eq!(triples[0].object, iri("http://base.example/o"))
}

#[test]
fn parser_state_after_directives() {
	let chars = "@prefix ex: <http://example.org/> .\nBASE <http://base.example/>\n"
		.chars()
		.map(|c| Ok::<_, Infallible>(DecodedChar::from_utf8(c)));
	let mut parser = Parser::new(Lexer::new(chars));
	assert_eq!(parser.base_iri(), None);

	let Meta(doc, _) = Document::parse(&mut parser).unwrap();
	assert!(doc.is_empty());
	assert_eq!(parser.base_iri(), Some("http://base.example/"));
	assert_eq!(
		parser.prefixes().get("ex").map(String::as_str),
		Some("http://example.org/")
	)
}

#[test]
fn unregistered_prefix_passes_through() {
	let triples = triples("urn:s http:p mailto:someone .");
	assert_eq!(triples[0].subject, Subject::Iri("urn:s".to_string()));
	assert_eq!(triples[0].predicate, "http:p");
	assert_eq!(triples[0].object, iri("mailto:someone"))
}

#[test]
fn strict_prefixes() {
	let result = Document::parse_str_with("ex:s ex:p ex:o .", Options::default().strict());
	match result {
		Ok(_) => panic!("undeclared prefix accepted"),
		Err(e) => assert_eq!(e.value().kind(), ErrorKind::UndefinedPrefix),
	}
}

#[test]
fn options_predeclare_prefixes_and_base() {
	let options = Options::default()
		.with_prefix("ex", "http://example.org/")
		.with_base_iri("http://base.example/")
		.strict();
	let Meta(doc, _) =
		Document::parse_str_with("ex:s ex:p <o> .", options).expect("parse error");
	let triple = doc.iter().next().unwrap().value();
	assert_eq!(triple.subject, Subject::Iri("http://example.org/s".to_string()));
	assert_eq!(triple.object, iri("http://base.example/o"))
}

#[test]
fn a_keyword() {
	let triples = triples("<http://example.org/s> a <http://example.org/C> .");
	assert_eq!(triples[0].predicate, vocab::RDF_TYPE)
}

#[test]
fn a_is_not_a_subject() {
	assert_eq!(error_kind("a <http://example.org/p> <http://example.org/o> ."), ErrorKind::UnexpectedToken)
}

#[test]
fn unquoted_literals_are_typed() {
	let triples = triples("<s:s> <p:p> true, false, 42, -7, 3.14, 1e3 .");
	let literals: Vec<_> = triples.iter().map(|t| t.object.as_literal().unwrap().clone()).collect();
	assert_eq!(
		literals,
		vec![
			Literal::typed("true", vocab::XSD_BOOLEAN),
			Literal::typed("false", vocab::XSD_BOOLEAN),
			Literal::typed("42", vocab::XSD_INTEGER),
			Literal::typed("-7", vocab::XSD_INTEGER),
			Literal::typed("3.14", vocab::XSD_DECIMAL),
			Literal::typed("1e3", vocab::XSD_DECIMAL),
		]
	)
}

#[test]
fn integer_before_statement_dot() {
	let triples = triples("<s:s> <p:p> 42.");
	assert_eq!(triples[0].object, Term::Literal(Literal::typed("42", vocab::XSD_INTEGER)))
}

#[test]
fn quoted_literals() {
	let triples = triples(
		"@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
		<s:s> <p:p> \"plain\", \"hello\"@en-GB, \"5\"^^xsd:int, \"6\"^^<http://example.org/dt> .",
	);
	let literals: Vec<_> = triples.iter().map(|t| t.object.as_literal().unwrap()).collect();

	assert_eq!(literals[0], &Literal::string("plain"));
	assert_eq!(literals[0].datatype(), vocab::XSD_STRING);

	assert_eq!(literals[1].value(), "hello");
	assert_eq!(literals[1].language().map(|tag| tag.to_string()), Some("en-GB".to_string()));
	assert_eq!(literals[1].datatype(), vocab::RDF_LANG_STRING);

	assert_eq!(literals[2].datatype(), "http://www.w3.org/2001/XMLSchema#int");
	assert!(literals[2].language().is_none());
	assert_eq!(literals[3].datatype(), "http://example.org/dt");
}

#[test]
fn semicolon_shares_subject() {
	let triples = triples(
		"@prefix ex: <http://example.org/> .
		ex:s ex:p1 ex:o1 ; ex:p2 ex:o2 .",
	);
	assert_eq!(triples.len(), 2);
	assert_eq!(triples[0].subject, triples[1].subject);
	assert_eq!(triples[0].predicate, "http://example.org/p1");
	assert_eq!(triples[1].predicate, "http://example.org/p2");
}

#[test]
fn comma_shares_subject_and_predicate() {
	let triples = triples(
		"@prefix ex: <http://example.org/> .
		ex:s ex:p ex:o1, ex:o2, ex:o3 .",
	);
	assert_eq!(triples.len(), 3);
	assert!(triples.iter().all(|t| t.predicate == "http://example.org/p"));
	assert_eq!(triples[2].object, iri("http://example.org/o3"))
}

#[test]
fn blank_node_labels_are_stable() {
	let triples = triples(
		"@prefix ex: <http://example.org/> .
		_:x ex:p _:y .
		_:y ex:p _:x .",
	);
	assert_eq!(triples[0].subject, Subject::Blank(BlankId::Label("x".to_string())));
	assert_eq!(Term::from(triples[0].subject.clone()), triples[1].object);
	assert_eq!(Term::from(triples[1].subject.clone()), triples[0].object);
}

#[test]
fn empty_collection_is_nil() {
	let triples = triples("<s:s> <p:p> () .");
	assert_eq!(triples.len(), 1);
	assert_eq!(triples[0].object, iri(vocab::RDF_NIL))
}

#[test]
fn collection_chain() {
	let triples = triples("<s:s> <p:p> (1 2) .");
	assert_eq!(triples.len(), 5);

	let cells: Vec<_> = triples
		.iter()
		.filter(|t| t.predicate == vocab::RDF_FIRST)
		.map(|t| t.subject.clone())
		.collect();
	assert_eq!(cells.len(), 2);
	assert_ne!(cells[0], cells[1]);

	let rest = |cell: &Subject| {
		triples
			.iter()
			.find(|t| &t.subject == cell && t.predicate == vocab::RDF_REST)
			.map(|t| t.object.clone())
			.unwrap()
	};
	assert_eq!(rest(&cells[0]), Term::from(cells[1].clone()));
	assert_eq!(rest(&cells[1]), iri(vocab::RDF_NIL));

	let main = triples.last().unwrap();
	assert_eq!(main.subject, Subject::Iri("s:s".to_string()));
	assert_eq!(main.object, Term::from(cells[0].clone()));
	assert_eq!(main.object.as_blank(), Some(&BlankId::Fresh(0)));
}

#[test]
fn nested_collections() {
	let triples = triples("<s:s> <p:p> ((\"a\") ()) .");
	let firsts: Vec<_> = triples
		.iter()
		.filter(|t| t.predicate == vocab::RDF_FIRST)
		.map(|t| t.object.clone())
		.collect();

	assert_eq!(firsts.len(), 3);
	assert!(firsts.contains(&Term::Literal(Literal::string("a"))));
	assert!(firsts.contains(&iri(vocab::RDF_NIL)));
}

#[test]
fn nesting_limit() {
	let nested = |depth: usize| format!("<s:s> <p:p> {}{} .", "(".repeat(depth), ")".repeat(depth));

	assert_eq!(triples(&nested(MAX_COLLECTION_DEPTH)).len(), 2 * MAX_COLLECTION_DEPTH - 1);
	assert_eq!(error_kind(&nested(MAX_COLLECTION_DEPTH + 1)), ErrorKind::NestingLimit);
	assert_eq!(error_kind(&nested(100_000)), ErrorKind::NestingLimit)
}

#[test]
fn collection_as_subject() {
	let triples = triples("(<a:a>) <p:p> <o:o> .");
	let main = triples.last().unwrap();
	assert_eq!(main.subject, Subject::Blank(BlankId::Fresh(0)));
	assert_eq!(main.object, iri("o:o"));
}

#[test]
fn collection_chain_shape_survives_reparsing() {
	let first = triples("<s:s> <p:p> (<a:a> <b:b> <c:c>) .");
	let text: String = first.iter().map(|t| format!("{t}\n")).collect::<String>().replace("_:#", "_:g");
	let second = triples(&text);

	assert_eq!(first.len(), second.len());
	for (a, b) in first.iter().zip(&second) {
		assert_eq!(a.predicate, b.predicate);
		assert_eq!(
			std::mem::discriminant(&a.object),
			std::mem::discriminant(&b.object)
		);
	}
}

#[test]
fn positions() {
	let doc = turtle_syntax::parse("@prefix ex: <http://example.org/> .\n  ex:s ex:p ex:o .").unwrap();
	let Meta(_, pos) = doc.iter().next().unwrap();
	assert_eq!(pos.line, 2);
	assert_eq!(pos.column, 3);
}

#[test]
fn errors_carry_positions() {
	let Meta(e, pos) = *turtle_syntax::parse("<s:s> <p:p>\n  \"abc").unwrap_err();
	assert_eq!(e.kind(), ErrorKind::Lexical);
	assert_eq!(pos.line, 2);
	assert_eq!(pos.column, 3);
}

#[test]
fn grammar_errors() {
	assert_eq!(error_kind("<s:s> <p:p> ."), ErrorKind::UnexpectedToken);
	assert_eq!(error_kind("<s:s> \"p\" <o:o> ."), ErrorKind::UnexpectedToken);
	assert_eq!(error_kind("<s:s> <p:p> <o:o> <x:x> ."), ErrorKind::UnterminatedStatement);
	assert_eq!(error_kind("@prefix ex: <http://example.org/>\nex:s ex:p ex:o ."), ErrorKind::UndeclaredDirective);
	assert_eq!(error_kind("@base ex:b ."), ErrorKind::UndeclaredDirective);
	assert_eq!(error_kind("@prefx ex: <http://example.org/> ."), ErrorKind::UndeclaredDirective);
	assert_eq!(error_kind("<s:s> <p:p> foo ."), ErrorKind::Lexical);
}
