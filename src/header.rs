//! Menu header template

use crate::config::CssClasses;
use crate::markup::escape_html;

/// Header markup inserted at the top of the menu container on every open.
///
/// Slot order matters: back control, title, close control. The title is
/// inserted as text.
pub fn render_header(classes: &CssClasses, title: &str) -> String {
    format!(
        concat!(
            r#"<div class="{header}">"#,
            r#"<button aria-label="Back" type="button"><div class="{back}"></div></button>"#,
            r#"<h4 class="{title_class}">{title}</h4>"#,
            r#"<button aria-label="Close" type="button"><div class="{close}"></div></button>"#,
            "</div>"
        ),
        header = classes.header,
        back = classes.icon_back,
        title_class = classes.title,
        title = escape_html(title),
        close = classes.icon_close,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Markup;

    #[test]
    fn test_header_slots() {
        let mut markup = Markup::new();
        let header = markup
            .parse_fragment(&render_header(&CssClasses::default(), ""))
            .unwrap()
            .unwrap();
        let slots = markup.element_children(header);
        assert_eq!(slots.len(), 3);
        assert!(markup.find_first_by_class("icon-back", Some(slots[0])).is_some());
        assert!(markup.has_class(slots[1], "off-canvas-title"));
        assert!(markup.find_first_by_class("icon-close", Some(slots[2])).is_some());
    }

    #[test]
    fn test_title_slot_filled() {
        let classes = CssClasses::default();
        let mut markup = Markup::new();
        let rendered = markup
            .parse_fragment(&render_header(&classes, "Menu"))
            .unwrap()
            .unwrap();
        assert!(markup.has_class(rendered, "off-canvas-header"));
        let title = markup.find_first_by_class("off-canvas-title", Some(rendered)).unwrap();
        assert_eq!(markup.text(title), "Menu");
    }

    #[test]
    fn test_title_escaped() {
        let html = render_header(&CssClasses::default(), "Q&A <new>");
        assert!(html.contains(">Q&amp;A &lt;new&gt;</h4>"));

        let mut markup = Markup::new();
        let header = markup.parse_fragment(&html).unwrap().unwrap();
        let title = markup.find_first_by_class("off-canvas-title", Some(header)).unwrap();
        assert_eq!(markup.text(title), "Q&A <new>");
    }
}
