//! Minimal server-side document: a page is a sequence of raw markup and
//! addressable elements whose contents can be replaced by id.

pub const TOAST_ID: &str = "toast-interactive";
pub const VIDEO_BUTTON_ID: &str = "demo";
pub const CARDS_CONTAINER_ID: &str = "skeleton-container";
pub const VOTING_FORM_ID: &str = "form_voting";
pub const PRODUCT_SELECT_ID: &str = "select_product";
pub const RESULTS_ID: &str = "results";

#[derive(Debug, Clone)]
pub struct Element {
    pub id: String,
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub inner_html: String,
}

impl Element {
    pub fn new(tag: &'static str, id: &str) -> Self {
        Element {
            id: id.to_string(),
            tag,
            attrs: Vec::new(),
            inner_html: String::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn inner(mut self, html: impl Into<String>) -> Self {
        self.inner_html = html.into();
        self
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        out.push_str(" id=\"");
        out.push_str(&escape_html(&self.id));
        out.push('"');
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
        out.push('>');
        out.push_str(&self.inner_html);
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

#[derive(Debug, Clone)]
enum Node {
    Markup(String),
    Element(Element),
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    title: String,
    head: String,
    body: Vec<Node>,
}

impl Document {
    pub fn new(title: &str) -> Self {
        Document {
            title: title.to_string(),
            ..Document::default()
        }
    }

    pub fn push_head(&mut self, html: impl Into<String>) {
        self.head.push_str(&html.into());
    }

    pub fn push_markup(&mut self, html: impl Into<String>) {
        self.body.push(Node::Markup(html.into()));
    }

    pub fn push_element(&mut self, element: Element) {
        self.body.push(Node::Element(element));
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.body.iter_mut().find_map(|node| match node {
            Node::Element(el) if el.id == id => Some(el),
            _ => None,
        })
    }

    /// Replaces the contents of element `id`. Returns false, leaving the
    /// document untouched, when no such element exists.
    pub fn set_inner_html(&mut self, id: &str, html: String) -> bool {
        match self.element_mut(id) {
            Some(el) => {
                el.inner_html = html;
                true
            }
            None => false,
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(4096);
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>");
        out.push_str(&escape_html(&self.title));
        out.push_str("</title>\n");
        out.push_str(&self.head);
        out.push_str("</head>\n<body>\n");
        for node in &self.body {
            match node {
                Node::Markup(html) => out.push_str(html),
                Node::Element(el) => el.write_html(&mut out),
            }
            out.push('\n');
        }
        out.push_str("</body>\n</html>\n");
        out
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Encodes `value` as a JavaScript string literal safe to inline in a
/// `<script>` block.
pub fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace("</", "<\\/")
}
