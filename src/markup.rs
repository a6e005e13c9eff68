//! In-memory markup tree
//!
//! A small element arena with the lookups the menu needs from a host page:
//! find by class, find by tag, parse a fragment, strip tags. It backs the
//! native surface so that the menu can be driven and inspected without a
//! browser. Lookups never fail; an absent element is `None` or an empty `Vec`.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{MenuError, MenuResult};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Handle to a node inside a [`Markup`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// Arena of elements and text nodes under a synthetic document root
#[derive(Debug, Clone)]
pub struct Markup {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
}

impl Default for Markup {
    fn default() -> Self {
        Self::new()
    }
}

impl Markup {
    /// Create an empty document
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Element {
                    tag: "#document".to_string(),
                    attrs: Vec::new(),
                },
            }],
            free: Vec::new(),
        }
    }

    /// Parse a full document body
    pub fn parse(html: &str) -> MenuResult<Self> {
        let mut markup = Self::new();
        let root = markup.root();
        Parser::new(&mut markup, html).run(root)?;
        Ok(markup)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    // ========================
    // Node creation
    // ========================

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let node = Node {
            parent: None,
            children: Vec::new(),
            kind,
        };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Return `id` and its subtree to the arena. Only for nodes whose handles
    /// never left this module.
    fn release(&mut self, id: NodeId) {
        self.detach(id);
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            stack.append(&mut self.nodes[node.0].children);
            self.nodes[node.0].parent = None;
            self.nodes[node.0].kind = NodeKind::Text(String::new());
            self.free.push(node);
        }
    }

    /// Slots allocated in the arena, free ones included
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        })
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    /// Parse `html` into a detached element and return its first top-level
    /// element, like setting a scratch `div`'s inner HTML and taking its first
    /// child.
    pub fn parse_fragment(&mut self, html: &str) -> MenuResult<Option<NodeId>> {
        let scratch = self.create_element("div");
        Parser::new(self, html.trim()).run(scratch)?;
        let first = self.element_children(scratch).into_iter().next();
        if let Some(first) = first {
            self.detach(first);
        }
        self.release(scratch);
        Ok(first)
    }

    // ========================
    // Tree access
    // ========================

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Element { .. })
    }

    /// Lowercase tag name, `None` for text nodes
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    // ========================
    // Attributes, classes, style
    // ========================

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id.0].kind {
            match attrs.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id.0].kind {
            attrs.retain(|(key, _)| key != name);
        }
    }

    pub fn classes(&self, id: NodeId) -> Vec<&str> {
        self.attr(id, "class")
            .map(|class| class.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).contains(&class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) || !self.is_element(id) {
            return;
        }
        let mut classes: Vec<String> = self.classes(id).into_iter().map(String::from).collect();
        classes.push(class.to_string());
        self.set_attr(id, "class", &classes.join(" "));
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if !self.has_class(id, class) {
            return;
        }
        let classes: Vec<String> = self
            .classes(id)
            .into_iter()
            .filter(|existing| *existing != class)
            .map(String::from)
            .collect();
        self.set_attr(id, "class", &classes.join(" "));
    }

    /// Replace the whole class attribute
    pub fn set_class_name(&mut self, id: NodeId, class: &str) {
        self.set_attr(id, "class", class);
    }

    /// Inline style property, `None` when unset
    pub fn style(&self, id: NodeId, property: &str) -> Option<String> {
        parse_style(self.attr(id, "style")?)
            .into_iter()
            .find(|(key, _)| key == property)
            .map(|(_, value)| value)
    }

    /// Set an inline style property; an empty value removes it
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        let mut declarations = self.attr(id, "style").map(parse_style).unwrap_or_default();
        declarations.retain(|(key, _)| key != property);
        if !value.is_empty() {
            declarations.push((property.to_string(), value.to_string()));
        }
        if declarations.is_empty() {
            self.remove_attr(id, "style");
        } else {
            let style = declarations
                .iter()
                .map(|(key, value)| format!("{key}: {value};"))
                .collect::<Vec<_>>()
                .join(" ");
            self.set_attr(id, "style", &style);
        }
    }

    // ========================
    // Mutation
    // ========================

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != id);
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(0, child);
    }

    /// Insert `child` as the next sibling of `reference`; no-op if
    /// `reference` is detached
    pub fn insert_after(&mut self, reference: NodeId, child: NodeId) {
        let Some(parent) = self.parent(reference) else {
            return;
        };
        self.detach(child);
        let siblings = &mut self.nodes[parent.0].children;
        let position = siblings
            .iter()
            .position(|sibling| *sibling == reference)
            .map_or(siblings.len(), |index| index + 1);
        siblings.insert(position, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Remove a node from the document
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
    }

    /// Replace all children of `id` with a single text node. A lone text
    /// child is rewritten in place; anything else is released.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let [only] = self.nodes[id.0].children[..] {
            if let NodeKind::Text(existing) = &mut self.nodes[only.0].kind {
                existing.clear();
                existing.push_str(text);
                return;
            }
        }
        for child in self.nodes[id.0].children.clone() {
            self.release(child);
        }
        let node = self.create_text(text);
        self.append_child(id, node);
    }

    /// Parse `html` and insert the resulting nodes right after `reference`
    pub fn insert_html_after(&mut self, reference: NodeId, html: &str) -> MenuResult<Vec<NodeId>> {
        let scratch = self.create_element("div");
        Parser::new(self, html).run(scratch)?;
        let inserted: Vec<NodeId> = self.children(scratch).to_vec();
        let mut anchor = reference;
        for node in &inserted {
            self.insert_after(anchor, *node);
            anchor = *node;
        }
        self.release(scratch);
        Ok(inserted)
    }

    // ========================
    // Queries
    // ========================

    /// Descendants of `scope` (or of the document) in document order,
    /// excluding `scope` itself
    fn descendants(&self, scope: Option<NodeId>) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .children(scope.unwrap_or(self.root()))
            .iter()
            .rev()
            .copied()
            .collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    pub fn find_first_by_class(&self, class: &str, scope: Option<NodeId>) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.has_class(*id, class))
    }

    pub fn find_first_by_tag(&self, tag: &str, scope: Option<NodeId>) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.tag(*id) == Some(tag))
    }

    pub fn find_all_by_tag(&self, tag: &str, scope: Option<NodeId>) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.tag(*id) == Some(tag))
            .collect()
    }

    // ========================
    // Serialization
    // ========================

    pub fn text(&self, id: NodeId) -> String {
        match &self.node(id).kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Element { .. } => self
                .children(id)
                .iter()
                .map(|child| self.text(*child))
                .collect(),
        }
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.write_html(*child, &mut out);
        }
        out
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    /// Serialize the whole document
    pub fn to_html(&self) -> String {
        self.inner_html(self.root())
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        match &self.node(id).kind {
            NodeKind::Text(text) => {
                let raw = self
                    .parent(id)
                    .and_then(|parent| self.tag(parent))
                    .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
                if raw {
                    out.push_str(text);
                } else {
                    escape_text(text, out);
                }
            }
            NodeKind::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (key, value) in attrs {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&value.replace('"', "&quot;"));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for child in self.children(id) {
                    self.write_html(*child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (key, value) = declaration.split_once(':')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}

/// Escape `text` for use as element content
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_text(text, &mut out);
    out
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

/// Resolve character references in text. Unknown or malformed references are
/// kept as written.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        let decoded = rest[1..]
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| Some((decode_reference(&rest[1..end + 1])?, end + 2)));
        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => code.parse().ok()?,
        };
        return char::from_u32(value);
    }
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => return None,
    })
}

/// Remove markup from a label.
///
/// Matches greedily from the first `<` to the last `>` of each line, so a
/// label followed by a badge (`Products<span>3</span>`) reduces to the bare
/// label text.
pub fn strip_tags(text: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new("<.*>").expect("static pattern"));
    tag.replace_all(text, "").into_owned()
}

struct Parser<'a> {
    markup: &'a mut Markup,
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(markup: &'a mut Markup, src: &'a str) -> Self {
        Self { markup, src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn error(&self, message: &str) -> MenuError {
        MenuError::MarkupParse(format!("{message} at byte {}", self.pos))
    }

    fn run(mut self, container: NodeId) -> MenuResult<()> {
        let mut stack = vec![container];

        while self.pos < self.src.len() {
            let rest = self.rest();
            let current = *stack.last().unwrap_or(&container);

            if rest.starts_with("<!--") {
                let end = rest.find("-->").ok_or_else(|| self.error("unterminated comment"))?;
                self.pos += end + 3;
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                let end = rest.find('>').ok_or_else(|| self.error("unterminated declaration"))?;
                self.pos += end + 1;
            } else if rest.starts_with("</") {
                let end = rest.find('>').ok_or_else(|| self.error("unterminated closing tag"))?;
                let name = rest[2..end].trim().to_ascii_lowercase();
                self.pos += end + 1;
                // Unmatched closing tags are ignored; matched ones close every
                // element opened after them.
                if let Some(index) = stack
                    .iter()
                    .rposition(|id| *id != container && self.markup.tag(*id) == Some(name.as_str()))
                {
                    stack.truncate(index);
                }
            } else if rest.starts_with('<')
                && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                let (element, self_closing) = self.open_tag()?;
                self.markup.append_child(current, element);
                let tag = self.markup.tag(element).unwrap_or_default().to_string();
                if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
                    self.raw_text(element, &tag)?;
                } else if !self_closing && !VOID_ELEMENTS.contains(&tag.as_str()) {
                    stack.push(element);
                }
            } else {
                let skip = rest.chars().next().map_or(1, char::len_utf8);
                let end = rest[skip..].find('<').map_or(rest.len(), |index| index + skip);
                let text = self.markup.create_text(&decode_entities(&rest[..end]));
                self.markup.append_child(current, text);
                self.pos += end;
            }
        }
        Ok(())
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn read_name(&mut self) -> String {
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '>' || c == '/' || c == '=')
            .unwrap_or(rest.len());
        self.pos += end;
        rest[..end].to_ascii_lowercase()
    }

    fn open_tag(&mut self) -> MenuResult<(NodeId, bool)> {
        self.pos += 1;
        let tag = self.read_name();
        let element = self.markup.create_element(&tag);

        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                return Err(self.error(&format!("unterminated <{tag}> tag")));
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok((element, true));
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return Ok((element, false));
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }

            let name = self.read_name();
            if name.is_empty() {
                return Err(self.error("malformed attribute"));
            }
            self.skip_whitespace();
            let value = if self.rest().starts_with('=') {
                self.pos += 1;
                self.skip_whitespace();
                self.attr_value()?
            } else {
                String::new()
            };
            self.markup.set_attr(element, &name, &value);
        }
    }

    fn attr_value(&mut self) -> MenuResult<String> {
        let rest = self.rest();
        match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let end = rest[1..]
                    .find(quote)
                    .ok_or_else(|| self.error("unterminated attribute value"))?;
                self.pos += end + 2;
                Ok(rest[1..end + 1].replace("&quot;", "\""))
            }
            _ => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                self.pos += end;
                Ok(rest[..end].to_string())
            }
        }
    }

    fn raw_text(&mut self, element: NodeId, tag: &str) -> MenuResult<()> {
        let closing = format!("</{tag}");
        let rest = self.rest();
        let end = rest
            .to_ascii_lowercase()
            .find(&closing)
            .ok_or_else(|| self.error(&format!("unterminated <{tag}> element")))?;
        if end > 0 {
            let text = self.markup.create_text(&rest[..end]);
            self.markup.append_child(element, text);
        }
        let close = rest[end..].find('>').map_or(rest.len(), |index| end + index + 1);
        self.pos += close;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAV: &str = r#"
        <div class="off-canvas">
          <nav class="off-canvas-nav">
            <ul>
              <li><a href="/a">A</a></li>
              <li><a href="/b">B</a>
                <ul>
                  <li><a href="/b/1">C1</a></li>
                  <li><a href="/b/2">C2</a></li>
                </ul>
              </li>
            </ul>
          </nav>
        </div>"#;

    #[test]
    fn test_find_by_class_and_tag() {
        let markup = Markup::parse(NAV).unwrap();
        let nav = markup.find_first_by_class("off-canvas-nav", None).unwrap();
        assert_eq!(markup.tag(nav), Some("nav"));

        let lists = markup.find_all_by_tag("ul", Some(nav));
        assert_eq!(lists.len(), 2);
        assert_eq!(markup.find_first_by_tag("ul", None), Some(lists[0]));

        let items = markup.find_all_by_tag("li", Some(lists[1]));
        assert_eq!(items.len(), 2);
        assert_eq!(markup.text(items[1]), "C2");
    }

    #[test]
    fn test_not_found_is_absent() {
        let markup = Markup::parse(NAV).unwrap();
        assert!(markup.find_first_by_class("icon-open-container", None).is_none());
        assert!(markup.find_first_by_tag("table", None).is_none());
        assert!(markup.find_all_by_tag("ol", None).is_empty());
    }

    #[test]
    fn test_scope_excludes_itself() {
        let markup = Markup::parse("<ul class=\"x\"><li class=\"x\">1</li></ul>").unwrap();
        let list = markup.find_first_by_tag("ul", None).unwrap();
        let item = markup.find_first_by_class("x", Some(list)).unwrap();
        assert_eq!(markup.tag(item), Some("li"));
    }

    #[test]
    fn test_parse_fragment_takes_first_element() {
        let mut markup = Markup::new();
        let fragment = markup
            .parse_fragment("  <div class=\"a\"><span>x</span></div><p>ignored</p> ")
            .unwrap()
            .unwrap();
        assert_eq!(markup.tag(fragment), Some("div"));
        assert_eq!(markup.parent(fragment), None);
        assert_eq!(markup.inner_html(fragment), "<span>x</span>");
        assert!(markup.find_first_by_tag("div", None).is_none());
    }

    #[test]
    fn test_parse_fragment_without_elements() {
        let mut markup = Markup::new();
        assert_eq!(markup.parse_fragment("just text").unwrap(), None);
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("Products"), "Products");
        assert_eq!(
            strip_tags("Products<span class=\"children-item-counter\">3</span>"),
            "Products"
        );
        assert_eq!(strip_tags("<b>bold</b>"), "");
        assert_eq!(strip_tags(""), "");
    }

    #[test]
    fn test_classes_and_style() {
        let mut markup = Markup::parse("<ul class=\"list-level-1\"></ul>").unwrap();
        let list = markup.find_first_by_tag("ul", None).unwrap();

        markup.add_class(list, "show");
        markup.add_class(list, "show");
        assert_eq!(markup.attr(list, "class"), Some("list-level-1 show"));

        markup.remove_class(list, "show");
        assert!(!markup.has_class(list, "show"));

        markup.set_style(list, "top", "48px");
        markup.set_style(list, "visibility", "hidden");
        assert_eq!(markup.style(list, "top").as_deref(), Some("48px"));
        markup.set_style(list, "top", "");
        assert_eq!(markup.style(list, "top"), None);
        assert_eq!(markup.attr(list, "style"), Some("visibility: hidden;"));
    }

    #[test]
    fn test_insert_html_after_and_serialize() {
        let mut markup = Markup::parse("<li><a href=\"/b\">B</a><ul></ul></li>").unwrap();
        let link = markup.find_first_by_tag("a", None).unwrap();
        markup.insert_html_after(link, "<a href='#'></a>").unwrap();
        assert_eq!(
            markup.to_html(),
            "<li><a href=\"/b\">B</a><a href=\"#\"></a><ul></ul></li>"
        );
    }

    #[test]
    fn test_void_and_self_closing() {
        let markup = Markup::parse("<p>a<br>b<img src=x /><span/>c</p>").unwrap();
        let paragraph = markup.find_first_by_tag("p", None).unwrap();
        assert_eq!(markup.element_children(paragraph).len(), 3);
        assert_eq!(markup.text(paragraph), "abc");
    }

    #[test]
    fn test_comments_skipped_and_raw_text() {
        let markup =
            Markup::parse("<!-- menu --><div><script>if (a < b) {}</script></div>").unwrap();
        let script = markup.find_first_by_tag("script", None).unwrap();
        assert_eq!(markup.text(script), "if (a < b) {}");
    }

    #[test]
    fn test_malformed_markup() {
        assert!(matches!(
            Markup::parse("<div class=\"x"),
            Err(MenuError::MarkupParse(_))
        ));
        assert!(Markup::parse("<!-- open").is_err());
    }

    #[test]
    fn test_remove_detaches_subtree() {
        let mut markup = Markup::parse(NAV).unwrap();
        let lists = markup.find_all_by_tag("ul", None);
        let inner_item = markup.find_first_by_tag("li", Some(lists[1])).unwrap();

        markup.remove(lists[1]);
        assert_eq!(markup.find_all_by_tag("ul", None).len(), 1);
        assert_eq!(markup.parent(lists[1]), None);
        assert_eq!(markup.parent(inner_item), Some(lists[1]));
    }

    #[test]
    fn test_set_text_reuses_node() {
        let mut markup = Markup::parse("<h4>Menu</h4>").unwrap();
        let heading = markup.find_first_by_tag("h4", None).unwrap();
        let before = markup.arena_len();

        for title in ["Shop", "Shoes", "<b>&"] {
            markup.set_text(heading, title);
        }
        assert_eq!(markup.text(heading), "<b>&");
        assert_eq!(markup.arena_len(), before);

        let badge = markup.create_element("span");
        markup.append_child(heading, badge);
        markup.set_text(heading, "Menu");
        assert_eq!(markup.children(heading).len(), 1);
        assert_eq!(markup.text(heading), "Menu");
    }

    #[test]
    fn test_scratch_nodes_recycled() {
        let mut markup = Markup::new();
        let before = markup.arena_len();

        // scratch div, paragraph, text
        markup.parse_fragment("<p>a</p>").unwrap();
        assert_eq!(markup.arena_len(), before + 3);
        // the second scratch div takes the slot the first one freed
        markup.parse_fragment("<p>b</p>").unwrap();
        assert_eq!(markup.arena_len(), before + 5);
    }

    #[test]
    fn test_text_entities() {
        assert_eq!(decode_entities("A &amp; B &#9776; &#x41; &lt;x&gt;"), "A & B \u{2630} A <x>");
        assert_eq!(decode_entities("Fish & Chips &bogus; &"), "Fish & Chips &bogus; &");

        let mut markup = Markup::parse("<p>A &amp; B</p>").unwrap();
        let paragraph = markup.find_first_by_tag("p", None).unwrap();
        assert_eq!(markup.text(paragraph), "A & B");
        assert_eq!(markup.inner_html(paragraph), "A &amp; B");

        markup.set_text(paragraph, "<b>");
        assert_eq!(markup.to_html(), "<p>&lt;b&gt;</p>");
    }
}
