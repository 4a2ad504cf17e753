//! View syntax grammar.
//!
//! There is no tokenizer: host code and tags are recognized in a single pass
//! by the productions below. Ambiguous characters are resolved by ordered
//! choice. A `/` is tried as a comment, then as a regex literal, then taken
//! as an operator; a `<` is tried as each kind of tag, then taken as an
//! operator. Everything else the grammar does not care about is kept as an
//! opaque span of host code.
//!
//! Productions are plain functions so they can refer to each other
//! recursively.

use crate::combinator::{
    and, any_char, attempt, char_class, end_of_input, exclude, first_of, literal_char,
    literal_string, one_or_more, optional, or_else, sequence, spanned, typed, zero_or_more,
    Failure, Outcome,
};
use crate::span::Span;
use crate::tree::{Attribute, Data, Delimiter, Node, Tag};

/// Characters that end a run of opaque host code.
const CODE_DELIMITERS: &[&str] = &["/", "#", "\"", "'", "`", "(", ")", "[", "]", "{", "}", "<"];

fn is_identifier(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '-')
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// One character, or a backslash and the character it escapes.
fn escaped_or(delimiters: &'static [&'static str]) -> impl Fn(&str, usize) -> Outcome<Span> {
    or_else(spanned(and(literal_char('\\'), any_char)), exclude(delimiters))
}

/// Whitespace and `#...#` comments.
pub fn separator(input: &str, position: usize) -> Outcome<Vec<Node>> {
    zero_or_more(or_else(
        typed(
            spanned(one_or_more(char_class("whitespace", is_separator))),
            Node::Verbatim,
        ),
        comment,
    ))(input, position)
}

/// `#content#`.
pub fn comment(input: &str, position: usize) -> Outcome<Node> {
    typed(
        sequence((
            literal_char('#'),
            spanned(zero_or_more(escaped_or(&["#"]))),
            literal_char('#'),
        )),
        |(_, content, _)| Node::Comment(content),
    )(input, position)
}

/// An identifier run, a quoted string, or a bracketed expression.
pub fn value(input: &str, position: usize) -> Outcome<Node> {
    first_of((
        typed(
            spanned(one_or_more(char_class("identifier", is_identifier))),
            Node::Code,
        ),
        quoted('"', &["\""]),
        quoted('\'', &["'"]),
        quoted('`', &["`"]),
        group(Delimiter::Paren),
        group(Delimiter::Bracket),
        group(Delimiter::Brace),
    ))(input, position)
}

fn quoted(
    quote: char,
    delimiters: &'static [&'static str],
) -> impl Fn(&str, usize) -> Outcome<Node> {
    typed(
        spanned(sequence((
            literal_char(quote),
            zero_or_more(escaped_or(delimiters)),
            literal_char(quote),
        ))),
        Node::Verbatim,
    )
}

fn group(delimiter: Delimiter) -> impl Fn(&str, usize) -> Outcome<Node> {
    typed(
        sequence((
            literal_char(delimiter.open()),
            expression,
            literal_char(delimiter.close()),
        )),
        move |(_, body, _)| Node::Group { delimiter, body },
    )
}

/// `name`, `name=value`, each followed by a separator.
pub fn attributes(input: &str, position: usize) -> Outcome<Vec<Attribute>> {
    zero_or_more(typed(
        sequence((value, optional(and(literal_char('='), value)), separator)),
        |(name, value, _)| Attribute {
            name,
            value: value.map(|(_, value)| value),
        },
    ))(input, position)
}

/// Literal text inside a tag body.
pub fn text(input: &str, position: usize) -> Outcome<Node> {
    typed(spanned(one_or_more(escaped_or(&["{", "<"]))), Node::Text)(input, position)
}

/// `{expression}` inside a tag body.
pub fn interpolation(input: &str, position: usize) -> Outcome<Node> {
    typed(
        sequence((literal_char('{'), expression, literal_char('}'))),
        |(_, body, _)| Node::Interpolation(body),
    )(input, position)
}

/// Tag bodies: nested tags, text, and interpolations.
pub fn children(input: &str, position: usize) -> Outcome<Vec<Node>> {
    zero_or_more(first_of((
        attempt(node),
        attempt(node_data),
        attempt(node_data_children),
        attempt(fragment),
        text,
        interpolation,
    )))(input, position)
}

/// `<>children</>`.
pub fn fragment(input: &str, position: usize) -> Outcome<Node> {
    typed(
        sequence((literal_string("<>"), children, literal_string("</>"))),
        |(_, children, _)| Node::Fragment(children),
    )(input, position)
}

fn opening(input: &str, position: usize) -> Outcome<Tag> {
    typed(
        sequence((literal_char('<'), separator, value, separator)),
        |(_, leading, name, trailing)| Tag {
            leading,
            name: Box::new(name),
            trailing,
        },
    )(input, position)
}

/// `<Name*>`.
pub fn node(input: &str, position: usize) -> Outcome<Node> {
    typed(and(opening, literal_string("*>")), |(tag, _)| {
        Node::Reference(tag)
    })(input, position)
}

/// `<name attributes/>` or `<name value/>`.
pub fn node_data(input: &str, position: usize) -> Outcome<Node> {
    typed(
        sequence((
            opening,
            or_else(
                attempt(typed(attributes, Data::Attributes)),
                typed(value, |value| Data::Expression(Box::new(value))),
            ),
            literal_string("/>"),
        )),
        |(tag, data, _)| Node::Data { tag, data },
    )(input, position)
}

/// `<name attributes>children</name>`.
///
/// The closing name is skipped, not compared with the opening one.
pub fn node_data_children(input: &str, position: usize) -> Outcome<Node> {
    typed(
        sequence((
            opening,
            attributes,
            literal_char('>'),
            children,
            literal_string("</"),
            zero_or_more(exclude(&[">"])),
            literal_char('>'),
        )),
        |(tag, attributes, _, children, _, _, _)| Node::DataChildren {
            tag,
            attributes,
            children,
        },
    )(input, position)
}

/// Host code with embedded views.
pub fn expression(input: &str, position: usize) -> Outcome<Vec<Node>> {
    zero_or_more(first_of((
        // Line comment
        typed(
            spanned(and(literal_string("//"), zero_or_more(exclude(&["\n"])))),
            Node::Verbatim,
        ),
        // Block comment
        typed(
            spanned(sequence((
                literal_string("/*"),
                zero_or_more(exclude(&["*/"])),
                literal_string("*/"),
            ))),
            Node::Verbatim,
        ),
        // Regex literal
        attempt(typed(
            spanned(sequence((
                literal_char('/'),
                one_or_more(or_else(
                    spanned(and(literal_char('\\'), exclude(&["\n"]))),
                    exclude(&["/", "\n"]),
                )),
                literal_char('/'),
            ))),
            Node::Verbatim,
        )),
        comment,
        value,
        attempt(node),
        attempt(node_data),
        attempt(node_data_children),
        attempt(fragment),
        // Division and less-than
        typed(literal_char('/'), Node::Verbatim),
        typed(literal_char('<'), Node::Verbatim),
        // Stops at the opening bracket of a view; brackets around nested
        // expressions are left for the enclosing group to close.
        typed(spanned(one_or_more(exclude(CODE_DELIMITERS))), Node::Code),
    )))(input, position)
}

/// A whole file: an expression that reaches the end of input.
pub fn main(input: &str, position: usize) -> Outcome<Vec<Node>> {
    typed(and(expression, end_of_input), |(nodes, _)| nodes)(input, position)
}

/// Parse a whole file into its top-level nodes.
pub fn parse(input: &str) -> Result<Vec<Node>, Failure> {
    main(input, 0).map(|(nodes, _)| nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Kind;

    fn kinds(input: &str) -> Vec<Option<Kind>> {
        parse(input).unwrap().iter().map(Node::kind).collect()
    }

    #[test]
    fn test_plain_code() {
        let nodes = parse("const x = a < b;").unwrap();
        assert!(nodes.iter().all(|node| node.kind().is_none()));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), Ok(Vec::new()));
    }

    #[test]
    fn test_tag_kinds() {
        assert_eq!(kinds("<Foo*>"), vec![Some(Kind::Node)]);
        assert_eq!(kinds("<div/>"), vec![Some(Kind::NodeData)]);
        assert_eq!(kinds("<p>hi</p>"), vec![Some(Kind::NodeDataChildren)]);
        assert_eq!(kinds("<></>"), vec![Some(Kind::Fragment)]);
    }

    #[test]
    fn test_comment_content_span() {
        let source = "#note#";
        let (node, next) = comment(source, 0).unwrap();
        assert_eq!(node, Node::Comment(Span::new(1, 5)));
        assert_eq!(next, 6);
    }

    #[test]
    fn test_comment_escape() {
        let (node, _) = comment("#a\\#b#", 0).unwrap();
        assert_eq!(node, Node::Comment(Span::new(1, 5)));
    }

    #[test]
    fn test_value_forms() {
        assert_eq!(value("a.b-c$ ", 0).unwrap().0, Node::Code(Span::new(0, 6)));
        assert_eq!(value("'it\\'s'", 0).unwrap().1, 7);
        let (group, _) = value("{a}", 0).unwrap();
        assert!(matches!(group, Node::Group { delimiter: Delimiter::Brace, .. }));
    }

    #[test]
    fn test_attributes() {
        let (attributes, next) = attributes("a=\"1\" b c={x} /", 0).unwrap();
        assert_eq!(attributes.len(), 3);
        assert!(attributes[1].value.is_none());
        assert!(attributes[2].value.is_some());
        assert_eq!(next, 14);
    }

    #[test]
    fn test_regex_and_division() {
        let nodes = parse("a / b / c").unwrap();
        // The whole `/ b /` is taken as a regex literal.
        assert!(nodes.contains(&Node::Verbatim(Span::new(2, 7))));

        let nodes = parse("x = 1 / 2\n").unwrap();
        assert!(nodes.contains(&Node::Verbatim(Span::new(6, 7))));
    }

    #[test]
    fn test_less_than_is_an_operator() {
        let nodes = parse("a < b").unwrap();
        assert!(nodes.contains(&Node::Verbatim(Span::new(2, 3))));
    }

    #[test]
    fn test_children() {
        let nodes = parse("<div>a{b}<br/></div>").unwrap();
        let Node::DataChildren { children, .. } = &nodes[0] else {
            panic!("expected a tag with children");
        };
        let kinds: Vec<_> = children.iter().map(Node::kind).collect();
        assert_eq!(
            kinds,
            vec![Some(Kind::Text), Some(Kind::Interpolation), Some(Kind::NodeData)]
        );
    }

    #[test]
    fn test_closing_name_not_checked() {
        assert!(parse("<div>x</span>").is_ok());
    }

    #[test]
    fn test_data_expression_value() {
        let nodes = parse("<div {x}/>").unwrap();
        let Node::Data { data, .. } = &nodes[0] else {
            panic!("expected a self-closing tag");
        };
        assert!(matches!(data, Data::Attributes(attributes) if attributes.len() == 1));
    }

    #[test]
    fn test_unterminated_string_fails_at_end() {
        let failure = parse("<div test=\"/>").unwrap_err();
        assert_eq!(failure.expected, "\"\"\"");
        assert_eq!(failure.position, 13);
    }

    #[test]
    fn test_unbalanced_brace_fails() {
        let failure = parse("f({)").unwrap_err();
        assert_eq!(failure.expected, "\"}\"");
    }
}
