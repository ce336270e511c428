//! XML data model

/// XML document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }
}

/// XML element. Attributes are not modeled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub children: Vec<Content>,
    /// Explicitly empty: written as a self-closing tag
    pub empty: bool,
}

/// XML content node
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    Element(Element),
    Text(String),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            empty: false,
        }
    }

    /// Element children in document order, skipping text
    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            Content::Element(element) => Some(element),
            Content::Text(_) => None,
        })
    }

    /// Concatenation of all descendant text in document order
    pub fn inner_text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Content::Text(text) => out.push_str(text),
                Content::Element(element) => element.collect_text(out),
            }
        }
    }

    pub fn push_element(&mut self, element: Self) {
        self.empty = false;
        self.children.push(Content::Element(element));
    }

    /// Append a text node; empty strings add nothing
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.empty = false;
            self.children.push(Content::Text(text));
        }
    }

    /// Drop all content and mark the element explicitly empty
    pub fn mark_empty(&mut self) {
        self.children.clear();
        self.empty = true;
    }
}
