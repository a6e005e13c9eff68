//! DOM accessors
//!
//! Thin lookups over `web_sys`. "Not found" is `None` or an empty `Vec`,
//! never an error.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, NodeList};

use crate::error::{MenuError, MenuResult};
use crate::hierarchy::{Decorate, ListSource, NEXT_LEVEL_INDICATOR};

pub use crate::markup::strip_tags;

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub(crate) fn js_error(value: JsValue) -> MenuError {
    MenuError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

fn query(document: &Document, selector: &str, scope: Option<&Element>) -> Option<HtmlElement> {
    let found = match scope {
        Some(scope) => scope.query_selector(selector),
        None => document.query_selector(selector),
    };
    found.ok().flatten()?.dyn_into::<HtmlElement>().ok()
}

fn query_all(document: &Document, selector: &str, scope: Option<&Element>) -> Vec<HtmlElement> {
    let found: Option<NodeList> = match scope {
        Some(scope) => scope.query_selector_all(selector).ok(),
        None => document.query_selector_all(selector).ok(),
    };
    let Some(list) = found else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

pub fn find_first_by_class(
    document: &Document,
    class: &str,
    scope: Option<&Element>,
) -> Option<HtmlElement> {
    query(document, &format!(".{class}"), scope)
}

pub fn find_first_by_tag(
    document: &Document,
    tag: &str,
    scope: Option<&Element>,
) -> Option<HtmlElement> {
    query(document, tag, scope)
}

pub fn find_all_by_tag(document: &Document, tag: &str, scope: Option<&Element>) -> Vec<HtmlElement> {
    query_all(document, tag, scope)
}

/// First element of `html`, parsed through a detached `div`
pub fn parse_fragment(document: &Document, html: &str) -> Option<HtmlElement> {
    let scratch = document.create_element("div").ok()?;
    scratch.set_inner_html(html.trim());
    scratch.first_element_child()?.dyn_into::<HtmlElement>().ok()
}

/// The live document, walked by the hierarchy classifier
pub struct BrowserDocument {
    document: Document,
}

impl BrowserDocument {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl ListSource for BrowserDocument {
    type Handle = Element;

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_ascii_lowercase()
    }

    fn element_children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length())
            .filter_map(|index| children.item(index))
            .collect()
    }

    fn inner_html(&self, node: &Element) -> String {
        node.inner_html()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }
}

impl Decorate for BrowserDocument {
    fn add_class(&mut self, node: &Element, class: &str) {
        if let Err(e) = node.class_list().add_1(class) {
            log::warn!("could not add class {}: {:?}", class, e);
        }
    }

    fn insert_indicator_after(&mut self, node: &Element) -> MenuResult<Option<Element>> {
        node.insert_adjacent_html("afterend", NEXT_LEVEL_INDICATOR)
            .map_err(js_error)?;
        Ok(node.next_element_sibling())
    }

    fn append_counter(&mut self, node: &Element, class: &str, count: usize) -> MenuResult<()> {
        let counter = self.document.create_element("span").map_err(js_error)?;
        counter.class_list().add_1(class).map_err(js_error)?;
        counter.set_text_content(Some(count.to_string().as_str()));
        node.append_child(&counter).map_err(js_error)?;
        Ok(())
    }
}
