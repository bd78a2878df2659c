mod state;
mod structural;
mod value;

use std::sync::Arc;

use tracing::debug;

use crate::ast::Document;
use crate::diagnostic::{Diagnostic, sort_diagnostics};
use crate::scanner::{Scanner, Token};

pub(crate) use structural::ACTIONS_GROUP;

use state::ParseState;

/// Parser entry point.
///
/// Parsing never fails outright: malformed input yields a partial [`Document`] plus
/// Error-severity diagnostics, one per independent problem.
pub struct Parser<'a> {
    file: Arc<str>,
    source: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(file: impl Into<Arc<str>>, source: &'a str) -> Self {
        Parser {
            file: file.into(),
            source,
        }
    }

    /// Scan and parse the source. Diagnostics from both stages are sorted by position.
    pub fn parse(&self) -> (Document, Vec<Diagnostic>) {
        let mut scanner = Scanner::new(self.file.clone(), self.source);
        let (document, mut diagnostics) =
            ParseState::new(scanner.by_ref(), self.file.clone()).parse_document();
        diagnostics.extend(scanner.take_diagnostics());
        sort_diagnostics(&mut diagnostics);
        debug!(
            file = %self.file,
            blocks = document.blocks.len(),
            diagnostics = diagnostics.len(),
            "parsed"
        );
        (document, diagnostics)
    }
}

/// Parse an already scanned token stream. Scanner diagnostics are not included.
pub fn parse_tokens(
    file: impl Into<Arc<str>>,
    tokens: impl IntoIterator<Item = Token>,
) -> (Document, Vec<Diagnostic>) {
    let file = file.into();
    ParseState::new(tokens.into_iter(), file).parse_document()
}

pub fn parse(file: impl Into<Arc<str>>, source: &str) -> (Document, Vec<Diagnostic>) {
    Parser::new(file, source).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{MapEntry, Scalar, Value};

    fn parse_ok(source: &str) -> Document {
        let (document, diagnostics) = parse("test.sdl", source);
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
        document
    }

    fn messages(source: &str) -> Vec<String> {
        parse("test.sdl", source)
            .1
            .into_iter()
            .map(|d| format!("{}:{} {}", d.position.line, d.position.column, d.message))
            .collect()
    }

    #[test]
    fn parses_service_with_attributes_actions_and_children() {
        let document = parse_ok(
            r#"
service "users" {
  version = "1.2"
  timeout = 30
  public = true
  GET /users -> Users.List
  POST "/users" -> "create"

  resource "db" {
    type = "postgres"
  }
}
"#,
        );
        assert_eq!(document.blocks.len(), 1);
        let service = &document.blocks[0];
        assert_eq!(service.kind, "service");
        assert_eq!(service.label.as_deref(), Some("users"));
        assert_eq!(service.attributes.len(), 3);
        assert_eq!(service.attributes[1].value, Value::number("30"));
        assert_eq!(service.attributes[2].value, Value::boolean(true));
        assert_eq!(service.actions.len(), 2);
        assert_eq!(service.actions[0].method, "GET");
        assert_eq!(service.actions[0].target, "/users");
        assert_eq!(service.actions[0].handler, "Users.List");
        assert_eq!(service.actions[1].target, "/users");
        assert_eq!(service.actions[1].handler, "create");
        assert_eq!(service.blocks[0].kind, "resource");
        assert_eq!(service.position.line, 2);
        assert_eq!(service.actions[0].position.line, 6);
    }

    #[test]
    fn action_spellings_flatten_in_written_order() {
        let document = parse_ok(
            "service \"a\" {\n  action = GET /one -> One\n  actions {\n    PUT /two -> Two\n    DELETE /three -> Three\n  }\n  PATCH /four -> Four\n}\n",
        );
        let methods: Vec<_> = document.blocks[0]
            .actions
            .iter()
            .map(|a| a.method.as_str())
            .collect();
        assert_eq!(methods, vec!["GET", "PUT", "DELETE", "PATCH"]);
        assert!(document.blocks[0].blocks.is_empty());
    }

    #[test]
    fn single_line_block_with_action_attribute() {
        let document = parse_ok("service \"a\" { action = GET /x -> H }");
        let action = &document.blocks[0].actions[0];
        assert_eq!((action.method.as_str(), action.target.as_str()), ("GET", "/x"));
        assert_eq!(action.handler, "H");
    }

    #[test]
    fn lists_and_maps() {
        let document = parse_ok(
            "service \"a\" {\n  tags = [\"x\", \"y\",\n  ]\n  env = { A = \"1\", B: 2\n    C = [true] }\n  empty = []\n}\n",
        );
        let service = &document.blocks[0];
        assert_eq!(
            service.attributes[0].value,
            Value::List(vec![Value::string("x"), Value::string("y")])
        );
        let Value::Map(entries) = &service.attributes[1].value else {
            panic!("expected map");
        };
        let keys: Vec<_> = entries.iter().map(|e: &MapEntry| e.key.as_str()).collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
        assert_eq!(entries[1].value, Value::Scalar(Scalar::Number("2".into())));
        assert_eq!(service.attributes[2].value, Value::List(vec![]));
    }

    #[test]
    fn duplicate_attribute_keys_are_not_a_syntax_error() {
        let document = parse_ok("config {\n  a = 1\n  a = 2\n}\n");
        assert_eq!(document.blocks[0].attributes.len(), 2);
    }

    #[test]
    fn empty_document_is_valid() {
        let document = parse_ok("\n\n# only a comment\n");
        assert!(document.is_empty());
        assert_eq!(document.trailing_comments, vec!["# only a comment".to_string()]);
    }

    #[test]
    fn comments_attach_to_the_following_node() {
        let document = parse_ok(
            "# the api\nservice \"a\" {\n  # version\n  version = \"1\" # pinned\n  GET /x -> H # root\n  # dangling\n}\n",
        );
        let service = &document.blocks[0];
        assert_eq!(service.comments, vec!["# the api".to_string()]);
        assert_eq!(service.attributes[0].comments, vec!["# version".to_string()]);
        assert_eq!(
            service.attributes[0].trailing_comment.as_deref(),
            Some("# pinned")
        );
        assert_eq!(service.actions[0].trailing_comment.as_deref(), Some("# root"));
        assert_eq!(service.trailing_comments, vec!["# dangling".to_string()]);
    }

    #[test]
    fn reports_several_errors_in_one_pass() {
        let source = "service \"a\" {\n  version = \n  GET /x H\n  ok = 1\n}\nresource \"b\" {\n  type = \"x\"\n}\n";
        let (document, diagnostics) = parse("test.sdl", source);
        assert_eq!(diagnostics.len(), 2, "{:?}", diagnostics);
        assert!(diagnostics[0].message.starts_with("expected a value"));
        assert_eq!(diagnostics[0].position.line, 2);
        assert!(diagnostics[1].message.starts_with("expected '->'"));
        assert_eq!(diagnostics[1].position.line, 3);
        assert_eq!(document.blocks.len(), 2);
        assert_eq!(document.blocks[0].attributes[0].key, "ok");
        assert_eq!(document.blocks[1].attributes[0].key, "type");
    }

    #[test]
    fn invalid_characters_are_reported_once() {
        let diagnostics = messages("service \"a\" {\n  @ = 1\n  b = 2\n}\n");
        assert_eq!(diagnostics, vec!["2:3 unexpected character '@'".to_string()]);
    }

    #[test]
    fn unclosed_block_points_at_its_start() {
        let diagnostics = messages("service \"a\" {\n  version = \"1\"\n");
        assert_eq!(
            diagnostics,
            vec!["1:1 unclosed block `service \"a\"`: expected '}'".to_string()]
        );
    }

    #[test]
    fn stray_closing_brace_and_top_level_attribute() {
        let diagnostics = messages("}\nname = 1\nconfig {}\n");
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].starts_with("1:1 unexpected '}'"));
        assert!(diagnostics[1].starts_with("2:6 expected '{' to open block `name`"));
    }

    #[test]
    fn broken_multiline_list_recovers_after_closing_bracket() {
        let source = "config {\n  a = [\n    1,\n    = ,\n    3,\n  ]\n  b = 2\n}\n";
        let (document, diagnostics) = parse("test.sdl", source);
        assert_eq!(diagnostics.len(), 1, "{:?}", diagnostics);
        assert_eq!(document.blocks[0].attributes.len(), 1);
        assert_eq!(document.blocks[0].attributes[0].key, "b");
    }

    #[test]
    fn unclosed_list_leaves_the_block_close_alone() {
        let source = "service \"a\" {\n  tags = [\"x\"\n  version = \"1\"\n}\nservice \"b\" {\n  version = \"2\"\n}\n";
        let (document, diagnostics) = parse("test.sdl", source);
        assert_eq!(diagnostics.len(), 1, "{:?}", diagnostics);
        assert_eq!(
            (diagnostics[0].position.line, diagnostics[0].position.column),
            (3, 3)
        );
        assert!(diagnostics[0].message.starts_with("expected ',' or ']'"));

        assert_eq!(document.blocks.len(), 2);
        assert!(document.blocks[0].blocks.is_empty());
        assert_eq!(document.blocks[1].label.as_deref(), Some("b"));
        assert_eq!(document.blocks[1].attributes[0].key, "version");
    }

    #[test]
    fn stray_bracket_inside_a_map_does_not_close_it() {
        let source = "config {\n  m = { a = ] }\n  b = 2\n}\n";
        let (document, diagnostics) = parse("test.sdl", source);
        assert_eq!(diagnostics.len(), 1, "{:?}", diagnostics);
        assert_eq!(document.blocks.len(), 1);
        assert_eq!(document.blocks[0].attributes.len(), 1);
        assert_eq!(document.blocks[0].attributes[0].key, "b");
    }

    #[test]
    fn statements_must_end_at_a_newline() {
        let diagnostics = messages("config {\n  a = 1 b = 2\n}\n");
        assert_eq!(diagnostics, vec!["2:9 expected end of line, found identifier `b`".to_string()]);
    }

    #[test]
    fn parse_tokens_accepts_a_prescanned_stream() {
        let (tokens, _) = crate::scanner::tokenize(Arc::from("t.sdl"), "config {}\n");
        let (document, diagnostics) = parse_tokens("t.sdl", tokens);
        assert!(diagnostics.is_empty());
        assert_eq!(document.blocks[0].kind, "config");
    }
}
