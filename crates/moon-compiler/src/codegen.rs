//! JavaScript code generator.
//!
//! Host code is copied through unchanged. Every view becomes a call into the
//! runtime: `<div a="1">x</div>` turns into
//! `Moon.view.components.div({"a":"1",children:[...]})`.

use crate::names::{is_builtin, normalize_attribute_name};
use crate::span::Span;
use crate::tree::{Attribute, Data, Delimiter, Node, Tag};

/// Names the generated code refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeNames {
    /// Namespace holding `text` and the built-in element constructors.
    pub components: String,
    /// Function that flattens interpolated children.
    pub normalize_children: String,
    /// Object merge function used for spread attributes.
    pub merge: String,
}

impl Default for RuntimeNames {
    fn default() -> Self {
        Self {
            components: "Moon.view.components".to_string(),
            normalize_children: "Moon.view.normalizeChildren".to_string(),
            merge: "Object.assign".to_string(),
        }
    }
}

/// Code generation options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodegenOptions {
    pub runtime: RuntimeNames,
}

impl CodegenOptions {
    #[must_use]
    pub fn with_runtime(mut self, runtime: RuntimeNames) -> Self {
        self.runtime = runtime;
        self
    }
}

/// Generated props or children, plus what the next entry must be prefixed
/// with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedList {
    pub output: String,
    /// `","` once there is an entry to follow, otherwise empty.
    pub separator: &'static str,
    /// `output` is a complete merge call, not object-literal entries.
    pub is_expression: bool,
}

/// The code generator.
pub struct Codegen<'a> {
    /// Source the tree's spans point into.
    source: &'a str,
    options: &'a CodegenOptions,
    /// Output buffer.
    output: String,
}

impl<'a> Codegen<'a> {
    /// Create a new code generator.
    pub fn new(source: &'a str, options: &'a CodegenOptions) -> Self {
        Self {
            source,
            options,
            output: String::with_capacity(source.len()),
        }
    }

    /// Generate JavaScript source code.
    pub fn generate(mut self, nodes: &[Node]) -> String {
        self.emit_nodes(nodes);
        self.output
    }

    // =========================================================================
    // Output Helpers
    // =========================================================================

    fn emit(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn emit_span(&mut self, span: Span) {
        self.output.push_str(span.slice(self.source));
    }

    fn render_node(&self, node: &Node) -> String {
        let mut nested = Codegen {
            source: self.source,
            options: self.options,
            output: String::new(),
        };
        nested.emit_node(node);
        nested.output
    }

    fn render_nodes(&self, nodes: &[Node]) -> String {
        Codegen {
            source: self.source,
            options: self.options,
            output: String::new(),
        }
        .generate(nodes)
    }

    /// Generate a value, dropping one level of surrounding braces.
    fn unwrap_braces(&self, node: &Node) -> String {
        match node {
            Node::Group {
                delimiter: Delimiter::Brace,
                body,
            } => self.render_nodes(body),
            _ => self.render_node(node),
        }
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    fn emit_nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.emit_node(node);
        }
    }

    fn emit_node(&mut self, node: &Node) {
        match node {
            Node::Verbatim(span) | Node::Code(span) => self.emit_span(*span),
            Node::Group { delimiter, body } => {
                self.output.push(delimiter.open());
                self.emit_nodes(body);
                self.output.push(delimiter.close());
            }
            Node::Comment(content) => {
                self.emit("/*");
                self.emit_span(*content);
                self.emit("*/");
            }
            Node::Text(span) => {
                let (text, _) = self.generate_text(*span);
                self.emit(&text);
            }
            Node::Interpolation(body) => {
                let data = self.render_nodes(body);
                let components = &self.options.runtime.components;
                let call = format!("{components}.text({{data:{data}}})");
                self.emit(&call);
            }
            Node::Reference(tag) => self.emit_tag(tag),
            Node::Data { tag, data } => {
                let argument = self.data_argument(data);
                self.emit_tag(tag);
                self.output.push('(');
                self.emit(&argument);
                self.output.push(')');
            }
            Node::DataChildren {
                tag,
                attributes,
                children,
            } => {
                let props = self.props_with_children(attributes, children);
                self.emit_tag(tag);
                self.output.push('(');
                self.emit(&props);
                self.output.push(')');
            }
            Node::Fragment(children) => {
                let list = self.generate_child_list(children);
                self.output.push('[');
                self.emit(&list.output);
                self.output.push(']');
            }
        }
    }

    /// Separators are re-emitted around the resolved name.
    fn emit_tag(&mut self, tag: &Tag) {
        let name = self.generate_name(&tag.name);
        self.emit_nodes(&tag.leading);
        self.emit(&name);
        self.emit_nodes(&tag.trailing);
    }

    /// Resolve a tag name to the expression that constructs it.
    pub fn generate_name(&self, name: &Node) -> String {
        if let Node::Group {
            delimiter: Delimiter::Brace,
            body,
        } = name
        {
            return format!("({})", self.render_nodes(body));
        }

        let generated = self.render_node(name);
        if is_builtin(&generated) {
            format!("{}.{generated}", self.options.runtime.components)
        } else {
            generated
        }
    }

    fn data_argument(&self, data: &Data) -> String {
        match data {
            Data::Attributes(attributes) => {
                if let Some(expression) = self.data_expression(attributes) {
                    return expression;
                }
                let list = self.generate_attributes(attributes);
                if list.is_expression {
                    list.output
                } else {
                    format!("{{{}}}", list.output)
                }
            }
            Data::Expression(value) => self.render_node(value),
        }
    }

    fn props_with_children(&self, attributes: &[Attribute], children: &[Node]) -> String {
        let data = self.generate_attributes(attributes);

        if children.is_empty() {
            return if data.is_expression {
                data.output
            } else {
                format!("{{{}}}", data.output)
            };
        }

        let children = self.generate_child_list(children);
        if data.is_expression {
            format!(
                "{}({{}}, {}, {{children:[{}]}})",
                self.options.runtime.merge, data.output, children.output
            )
        } else {
            format!(
                "{{{}{}children:[{}]}}",
                data.output, data.separator, children.output
            )
        }
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// `<name {expr}/>` passes `expr` itself rather than an attribute object.
    fn data_expression(&self, attributes: &[Attribute]) -> Option<String> {
        let [attribute] = attributes else {
            return None;
        };
        if attribute.value.is_some() {
            return None;
        }

        let name = self.render_node(&attribute.name);
        let opens_group = name.starts_with(['{', '(', '[']);
        if !opens_group || name.starts_with("{...") {
            return None;
        }
        Some(self.unwrap_braces(&attribute.name))
    }

    /// Generate the props for an attribute list.
    ///
    /// Spreads turn the whole list into one merge call whose arguments keep
    /// source order, so later attributes override earlier ones.
    pub fn generate_attributes(&self, attributes: &[Attribute]) -> GeneratedList {
        let mut arguments: Vec<String> = Vec::new();
        let mut entries: Vec<String> = Vec::new();
        let mut has_spread = false;

        for attribute in attributes {
            let raw = self.unwrap_braces(&attribute.name);
            let name = normalize_attribute_name(&raw);

            if let Some(rest) = name.strip_prefix("...") {
                let spread = if rest.is_empty() {
                    attribute
                        .value
                        .as_ref()
                        .map(|value| self.unwrap_braces(value))
                        .unwrap_or_default()
                } else {
                    rest.to_string()
                };
                if spread.trim().is_empty() {
                    continue;
                }
                if !entries.is_empty() {
                    arguments.push(format!("{{{}}}", entries.join(",")));
                    entries.clear();
                }
                arguments.push(spread);
                has_spread = true;
                continue;
            }

            let value = match &attribute.value {
                None => "true".to_string(),
                Some(value) if self.is_likely_object_literal(value) => self.render_node(value),
                Some(value) => self.unwrap_braces(value),
            };
            entries.push(format!("\"{name}\":{value}"));
        }

        if has_spread {
            if !entries.is_empty() {
                arguments.push(format!("{{{}}}", entries.join(",")));
            }
            GeneratedList {
                output: format!(
                    "{}({{}}, {})",
                    self.options.runtime.merge,
                    arguments.join(", ")
                ),
                separator: ",",
                is_expression: true,
            }
        } else {
            GeneratedList {
                separator: if entries.is_empty() { "" } else { "," },
                output: entries.join(","),
                is_expression: false,
            }
        }
    }

    /// A braced value with a `:` and no `?` in its top-level code reads as
    /// an object literal rather than a ternary.
    ///
    /// Nested groups and strings are not inspected.
    fn is_likely_object_literal(&self, value: &Node) -> bool {
        let Node::Group {
            delimiter: Delimiter::Brace,
            body,
        } = value
        else {
            return false;
        };

        let mut has_colon = false;
        let mut has_question = false;
        for part in body {
            if let Node::Code(span) = part {
                let code = span.slice(self.source);
                has_colon |= code.contains(':');
                has_question |= code.contains('?');
            }
        }
        has_colon && !has_question
    }

    // =========================================================================
    // Children
    // =========================================================================

    /// Generate a comma-separated child list with nested fragments flattened.
    pub fn generate_child_list(&self, children: &[Node]) -> GeneratedList {
        let mut output = String::new();
        let mut separator = "";
        self.write_children(children, &mut output, &mut separator);
        GeneratedList {
            output,
            separator,
            is_expression: false,
        }
    }

    fn write_children(&self, children: &[Node], output: &mut String, separator: &mut &'static str) {
        for child in children {
            match child {
                Node::Text(span) => {
                    let (text, is_layout) = self.generate_text(*span);
                    if !is_layout {
                        output.push_str(separator);
                        *separator = ",";
                    }
                    output.push_str(&text);
                }
                Node::Fragment(nested) => self.write_children(nested, output, separator),
                Node::Interpolation(body) => {
                    output.push_str(separator);
                    output.push_str("...");
                    output.push_str(&self.options.runtime.normalize_children);
                    output.push('(');
                    output.push_str(&self.render_nodes(body));
                    output.push(')');
                    *separator = ",";
                }
                _ => {
                    output.push_str(separator);
                    output.push_str(&self.render_node(child));
                    *separator = ",";
                }
            }
        }
    }

    /// Generate a text child. Returns the code and whether the text was
    /// only layout whitespace, which is kept verbatim to preserve line
    /// numbers.
    fn generate_text(&self, span: Span) -> (String, bool) {
        let raw = span.slice(self.source);
        if raw.contains('\n') && raw.chars().all(char::is_whitespace) {
            return (raw.to_string(), true);
        }

        let mut text = String::with_capacity(raw.len() + 32);
        text.push_str(&self.options.runtime.components);
        text.push_str(".text({data:\"");
        let mut escaped = false;
        for c in raw.chars() {
            if escaped {
                text.push(c);
                escaped = false;
                continue;
            }
            match c {
                '\\' => {
                    text.push(c);
                    escaped = true;
                }
                '"' => text.push_str("\\\""),
                '\n' => text.push_str("\\n\\\n"),
                '\r' => text.push_str("\\r"),
                c => text.push(c),
            }
        }
        text.push_str("\"})");
        (text, false)
    }
}
