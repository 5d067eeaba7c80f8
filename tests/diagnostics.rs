use codespan_reporting::{
	diagnostic::{Diagnostic, Label},
	files::SimpleFile,
	term::{self, termcolor::NoColor},
};
use locspan::Meta;

/// Renders the parse error of `input` the way a command line tool would.
fn render(input: &str) -> String {
	let Meta(e, pos) = match turtle_syntax::parse(input) {
		Ok(doc) => panic!("parsed into {} triples", doc.len()),
		Err(e) => *e,
	};

	let file = SimpleFile::new("input.ttl", input);
	let diagnostic = Diagnostic::error()
		.with_message(e.to_string())
		.with_labels(vec![Label::primary((), pos.span.start()..pos.span.end())]);

	let mut writer = NoColor::new(Vec::new());
	term::emit(&mut writer, &term::Config::default(), &file, &diagnostic).unwrap();
	String::from_utf8(writer.into_inner()).unwrap()
}

#[test]
fn lexical_error_location() {
	let output = render("<s:s> <p:p>\n  \"abc");
	assert!(output.contains("unterminated string literal"), "{output}");
	assert!(output.contains("input.ttl:2:3"), "{output}")
}

#[test]
fn grammar_error_location() {
	let output = render("@prefix ex: <http://example.org/> .\nex:s ex:p .");
	assert!(output.contains("expected object"), "{output}");
	assert!(output.contains("input.ttl:2:11"), "{output}")
}
