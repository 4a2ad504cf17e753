//! Parse tree.
//!
//! The tree mirrors the source closely enough that generating every node
//! with no view syntax in it reproduces the input byte for byte. Leaves are
//! spans into the input.

use crate::span::Span;
use std::fmt;

/// A parse tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Source copied as-is: strings, host comments, regexes, operators.
    Verbatim(Span),
    /// An identifier run or opaque host code.
    Code(Span),
    /// A bracketed expression.
    Group {
        delimiter: Delimiter,
        body: Vec<Node>,
    },
    /// A `#...#` comment; the span excludes the `#` markers.
    Comment(Span),
    /// Literal text between tags.
    Text(Span),
    /// `{expression}` inside a tag's children.
    Interpolation(Vec<Node>),
    /// `<Name*>`: a bare reference to a view.
    Reference(Tag),
    /// `<name attributes/>`.
    Data { tag: Tag, data: Data },
    /// `<name attributes>children</name>`.
    DataChildren {
        tag: Tag,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
    },
    /// `<>children</>`.
    Fragment(Vec<Node>),
}

impl Node {
    /// The kind of a view node, or `None` for plain host code.
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Node::Verbatim(_) | Node::Code(_) | Node::Group { .. } => None,
            Node::Comment(_) => Some(Kind::Comment),
            Node::Text(_) => Some(Kind::Text),
            Node::Interpolation(_) => Some(Kind::Interpolation),
            Node::Reference(_) => Some(Kind::Node),
            Node::Data { .. } => Some(Kind::NodeData),
            Node::DataChildren { .. } => Some(Kind::NodeDataChildren),
            Node::Fragment(_) => Some(Kind::Fragment),
        }
    }

    /// Whether this is a tag or fragment.
    pub fn is_view(&self) -> bool {
        matches!(
            self.kind(),
            Some(Kind::Node | Kind::NodeData | Kind::NodeDataChildren | Kind::Fragment)
        )
    }
}

/// The opening part shared by every tag: `<`, name, and the separators
/// around the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Whitespace and comments between `<` and the name.
    pub leading: Vec<Node>,
    pub name: Box<Node>,
    /// Whitespace and comments after the name.
    pub trailing: Vec<Node>,
}

/// What a self-closing tag passes to its constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Data {
    Attributes(Vec<Attribute>),
    /// A single value used as the whole argument.
    Expression(Box<Node>),
}

impl Data {
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Data::Attributes(_) => Some(Kind::Attributes),
            Data::Expression(value) => value.kind(),
        }
    }
}

/// One `name` or `name=value` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: Node,
    /// `None` is the boolean shorthand.
    pub value: Option<Node>,
}

/// Bracket pair around a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Paren,
    Bracket,
    Brace,
}

impl Delimiter {
    pub const fn open(self) -> char {
        match self {
            Delimiter::Paren => '(',
            Delimiter::Bracket => '[',
            Delimiter::Brace => '{',
        }
    }

    pub const fn close(self) -> char {
        match self {
            Delimiter::Paren => ')',
            Delimiter::Bracket => ']',
            Delimiter::Brace => '}',
        }
    }
}

/// Tagged node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Comment,
    Attributes,
    Text,
    Interpolation,
    Node,
    NodeData,
    NodeDataChildren,
    Fragment,
}

impl Kind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Comment => "comment",
            Kind::Attributes => "attributes",
            Kind::Text => "text",
            Kind::Interpolation => "interpolation",
            Kind::Node => "node",
            Kind::NodeData => "nodeData",
            Kind::NodeDataChildren => "nodeDataChildren",
            Kind::Fragment => "fragment",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count the tags and fragments in a tree, including nested ones.
pub fn count_views(nodes: &[Node]) -> usize {
    nodes.iter().map(count_node).sum()
}

fn count_node(node: &Node) -> usize {
    let own = usize::from(node.is_view());
    let nested = match node {
        Node::Verbatim(_) | Node::Code(_) | Node::Comment(_) | Node::Text(_) => 0,
        Node::Group { body, .. } => count_views(body),
        Node::Interpolation(body) | Node::Fragment(body) => count_views(body),
        Node::Reference(tag) => count_tag(tag),
        Node::Data { tag, data } => {
            count_tag(tag)
                + match data {
                    Data::Attributes(attributes) => count_attributes(attributes),
                    Data::Expression(value) => count_node(value),
                }
        }
        Node::DataChildren {
            tag,
            attributes,
            children,
        } => count_tag(tag) + count_attributes(attributes) + count_views(children),
    };
    own + nested
}

fn count_tag(tag: &Tag) -> usize {
    count_node(&tag.name)
}

fn count_attributes(attributes: &[Attribute]) -> usize {
    attributes
        .iter()
        .map(|attribute| count_node(&attribute.name) + attribute.value.as_ref().map_or(0, count_node))
        .sum()
}
