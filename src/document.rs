//! In-memory page being composed.
//!
//! A [`PageDocument`] holds the head and body markup of one page while the
//! components fill it in. Components address regions either by insertion
//! point (start or end of `<head>`/`<body>`) or by the `id` of a mount element
//! somewhere in the markup.
//!
//! Mount lookup is a small tag matcher, not a full HTML parser. It finds the
//! element that carries `id="..."`, then walks forward counting nested tags of
//! the same name until the matching close tag. That is enough for the
//! hand-authored pages and fragments it runs against.

/// Where fragment markup is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPoint {
    Head,
    Body,
}

/// Position inside the insertion point, named after `insertAdjacentHTML`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionMode {
    AfterBegin,
    BeforeEnd,
}

#[derive(Debug, Clone, Default)]
pub struct PageDocument {
    pub head: String,
    pub body: String,
}

/// Byte offsets of an element's inner content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InnerSpan {
    start: usize,
    end: usize,
}

impl PageDocument {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            head: String::new(),
            body: body.into(),
        }
    }

    pub fn insert(&mut self, point: InsertionPoint, mode: InsertionMode, markup: &str) {
        let target = match point {
            InsertionPoint::Head => &mut self.head,
            InsertionPoint::Body => &mut self.body,
        };
        match mode {
            InsertionMode::AfterBegin => target.insert_str(0, markup),
            InsertionMode::BeforeEnd => target.push_str(markup),
        }
    }

    /// Whether an element with this id exists in the body.
    pub fn has_mount(&self, id: &str) -> bool {
        find_inner(&self.body, id).is_some()
    }

    /// Append markup at the end of the element's content, keeping what is there.
    /// Returns `false` when the element is missing.
    pub fn append_inner(&mut self, id: &str, markup: &str) -> bool {
        match find_inner(&self.body, id) {
            Some(span) => {
                self.body.insert_str(span.end, markup);
                true
            }
            None => false,
        }
    }

    /// Replace the element's whole content. Returns `false` when the element is missing.
    pub fn replace_inner(&mut self, id: &str, markup: &str) -> bool {
        match find_inner(&self.body, id) {
            Some(span) => {
                self.body.replace_range(span.start..span.end, markup);
                true
            }
            None => false,
        }
    }

    /// Inner markup of the element, if present.
    pub fn inner(&self, id: &str) -> Option<&str> {
        find_inner(&self.body, id).map(|span| &self.body[span.start..span.end])
    }
}

fn find_inner(html: &str, id: &str) -> Option<InnerSpan> {
    for quote in ['"', '\''] {
        let needle = format!("id={quote}{id}{quote}");
        let mut from = 0;
        while let Some(rel) = html[from..].find(&needle) {
            let pos = from + rel;
            from = pos + needle.len();
            let preceded_by_space = html[..pos]
                .chars()
                .next_back()
                .is_some_and(char::is_whitespace);
            if !preceded_by_space {
                continue;
            }
            if let Some(span) = element_inner(html, pos) {
                return Some(span);
            }
        }
    }
    None
}

/// Resolve the element whose opening tag contains byte offset `attr_pos`.
fn element_inner(html: &str, attr_pos: usize) -> Option<InnerSpan> {
    let open = html[..attr_pos].rfind('<')?;
    let name: String = html[open + 1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect::<String>()
        .to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }
    let gt = attr_pos + html[attr_pos..].find('>')?;
    let start = gt + 1;
    if html[..gt].ends_with('/') {
        return Some(InnerSpan { start, end: start });
    }

    let lower = html.to_ascii_lowercase();
    let open_pat = format!("<{name}");
    let close_pat = format!("</{name}");
    let mut depth = 1usize;
    let mut cursor = start;
    loop {
        let next_open = find_tag(&lower, &open_pat, cursor);
        let next_close = find_tag(&lower, &close_pat, cursor)?;
        match next_open {
            Some(o) if o < next_close => {
                depth += 1;
                cursor = o + open_pat.len();
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(InnerSpan {
                        start,
                        end: next_close,
                    });
                }
                cursor = next_close + close_pat.len();
            }
        }
    }
}

/// Find `pat` at or after `from` where it is followed by a tag-name boundary.
fn find_tag(lower: &str, pat: &str, from: usize) -> Option<usize> {
    let mut cursor = from;
    while let Some(rel) = lower[cursor..].find(pat) {
        let pos = cursor + rel;
        let after = lower[pos + pat.len()..].chars().next();
        if matches!(after, Some(c) if c.is_whitespace() || c == '>' || c == '/') {
            return Some(pos);
        }
        cursor = pos + pat.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_at_body_start_and_end() {
        let mut doc = PageDocument::new("<main></main>");
        doc.insert(InsertionPoint::Body, InsertionMode::AfterBegin, "<header></header>");
        doc.insert(InsertionPoint::Body, InsertionMode::BeforeEnd, "<footer></footer>");
        assert_eq!(doc.body, "<header></header><main></main><footer></footer>");
    }

    #[test]
    fn insert_into_head() {
        let mut doc = PageDocument::new("");
        doc.insert(InsertionPoint::Head, InsertionMode::BeforeEnd, "<link rel=\"icon\">");
        doc.insert(InsertionPoint::Head, InsertionMode::BeforeEnd, "<script></script>");
        assert_eq!(doc.head, "<link rel=\"icon\"><script></script>");
    }

    #[test]
    fn replace_inner_of_empty_container() {
        let mut doc =
            PageDocument::new(r#"<section><div id="projects-container"></div></section>"#);
        assert!(doc.replace_inner("projects-container", "<p>x</p>"));
        assert_eq!(
            doc.body,
            r#"<section><div id="projects-container"><p>x</p></div></section>"#
        );
    }

    #[test]
    fn replace_inner_handles_nested_same_tag() {
        let mut doc = PageDocument::new(
            r#"<div id="a" class="grid"><div>old</div><div>old</div></div><div>keep</div>"#,
        );
        assert!(doc.replace_inner("a", "new"));
        assert_eq!(doc.body, r#"<div id="a" class="grid">new</div><div>keep</div>"#);
    }

    #[test]
    fn append_inner_keeps_existing_content() {
        let mut doc = PageDocument::new(
            r#"<nav><div id="nav-links" class="flex"><span>x</span></div></nav>"#,
        );
        assert!(doc.append_inner("nav-links", "<a>y</a>"));
        assert_eq!(doc.inner("nav-links"), Some("<span>x</span><a>y</a>"));
    }

    #[test]
    fn missing_mount_is_reported() {
        let mut doc = PageDocument::new("<main></main>");
        assert!(!doc.has_mount("projects-container"));
        assert!(!doc.replace_inner("projects-container", "x"));
        assert_eq!(doc.body, "<main></main>");
    }

    #[test]
    fn data_attribute_is_not_an_id() {
        let doc = PageDocument::new(r#"<div data-id="nav-links"></div>"#);
        assert!(!doc.has_mount("nav-links"));
    }

    #[test]
    fn single_quoted_id_and_similar_tag_names() {
        let doc = PageDocument::new("<div id='m'><divider></divider>in</div>");
        assert_eq!(doc.inner("m"), Some("<divider></divider>in"));
    }

    #[test]
    fn self_closing_mount_is_empty() {
        let doc = PageDocument::new(r#"<span id="s"/>after"#);
        assert_eq!(doc.inner("s"), Some(""));
    }
}
