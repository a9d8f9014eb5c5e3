//! Permissive HTML tokenizer and tree builder.
//!
//! Student markup is frequently broken, so the parser never fails. Unclosed
//! elements close at end of input, stray end tags are dropped, an unterminated
//! comment swallows the remainder and a `<` that does not open a tag is text.

use crate::dom::document::{Document, Element, NodeId, NodeKind};

const RAW_TEXT_TAGS: &[&str] = &["script", "style"];
const ESCAPABLE_RAW_TEXT_TAGS: &[&str] = &["textarea", "title"];
const METADATA_TAGS: &[&str] = &["title", "meta", "link", "base", "style"];

/// Elements whose start tag closes an open `<p>`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "main", "menu", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// Parse a complete document, synthesizing `html`, `head` and `body`.
pub fn parse_document(markup: &str) -> Document {
    let mut doc = parse_fragment(markup);
    normalize(&mut doc);
    doc
}

/// Parse markup into a tree rooted at the document node, as written.
pub fn parse_fragment(markup: &str) -> Document {
    let mut doc = Document::new();
    let mut builder = TreeBuilder {
        stack: vec![doc.root()],
    };
    builder.run(&mut doc, markup);
    doc
}

struct TreeBuilder {
    stack: Vec<NodeId>,
}

impl TreeBuilder {
    fn current(&self) -> NodeId {
        self.stack[self.stack.len() - 1]
    }

    fn run(&mut self, doc: &mut Document, html: &str) {
        let bytes = html.as_bytes();
        let mut i = 0usize;
        let mut text_start = 0usize;

        while i < bytes.len() {
            if bytes[i] != b'<' {
                i += 1;
                continue;
            }

            let next = match self.markup_at(doc, html, i, text_start) {
                Some(next) => next,
                None => {
                    // Not a tag; keep scanning as text.
                    i += 1;
                    continue;
                }
            };
            i = next;
            text_start = next;
        }

        self.flush_text(doc, html, text_start, bytes.len());
    }

    /// Try to consume markup starting at `at`. Returns the offset after it,
    /// or `None` when the `<` is literal text.
    fn markup_at(
        &mut self,
        doc: &mut Document,
        html: &str,
        at: usize,
        text_start: usize,
    ) -> Option<usize> {
        let bytes = html.as_bytes();

        if starts_with_at(bytes, at, b"<!--") {
            self.flush_text(doc, html, text_start, at);
            let body_start = at + 4;
            return match find_subslice(bytes, body_start, b"-->") {
                Some(end) => {
                    let body = html.get(body_start..end).unwrap_or_default();
                    doc.push_node(Some(self.current()), NodeKind::Comment(body.to_string()));
                    Some(end + 3)
                }
                None => {
                    let body = html.get(body_start..).unwrap_or_default();
                    doc.push_node(Some(self.current()), NodeKind::Comment(body.to_string()));
                    Some(bytes.len())
                }
            };
        }

        if starts_with_at(bytes, at, b"<!") || starts_with_at(bytes, at, b"<?") {
            let end = find_byte(bytes, at, b'>')?;
            self.flush_text(doc, html, text_start, at);
            let body = html.get(at + 2..end).unwrap_or_default().trim();
            let is_doctype = body
                .get(..7)
                .map_or(false, |keyword| keyword.eq_ignore_ascii_case("doctype"));
            if is_doctype {
                let name = body.get(7..).unwrap_or_default().trim().to_ascii_lowercase();
                doc.push_node(Some(self.current()), NodeKind::Doctype(name));
            }
            return Some(end + 1);
        }

        if starts_with_at(bytes, at, b"</") {
            if !bytes.get(at + 2).map_or(false, u8::is_ascii_alphabetic) {
                return None;
            }
            let (tag, next) = parse_end_tag(html, at)?;
            self.flush_text(doc, html, text_start, at);
            self.close_element(doc, &tag);
            return Some(next);
        }

        if !bytes.get(at + 1).map_or(false, u8::is_ascii_alphabetic) {
            return None;
        }

        let (tag, attrs, self_closing, mut next) = parse_start_tag(html, at)?;
        self.flush_text(doc, html, text_start, at);
        self.apply_implicit_closes(doc, &tag);

        let mut element = Element::new(tag.clone());
        element.attrs = attrs;
        let node = doc.append_element(self.current(), element);

        let raw = RAW_TEXT_TAGS.contains(&tag.as_str());
        let escapable = ESCAPABLE_RAW_TEXT_TAGS.contains(&tag.as_str());
        if (raw || escapable) && !self_closing {
            let close = find_case_insensitive_end_tag(bytes, next, tag.as_bytes());
            let body_end = close.unwrap_or(bytes.len());
            let body = html.get(next..body_end).unwrap_or_default();
            if !body.is_empty() {
                let text = if escapable {
                    decode_character_references(body)
                } else {
                    body.to_string()
                };
                doc.append_text(node, text);
            }
            next = match close {
                Some(close) => parse_end_tag(html, close).map_or(bytes.len(), |(_, n)| n),
                None => bytes.len(),
            };
            return Some(next);
        }

        if !self_closing && !is_void_tag(&tag) {
            self.stack.push(node);
        }
        Some(next)
    }

    fn flush_text(&self, doc: &mut Document, html: &str, start: usize, end: usize) {
        if start >= end {
            return;
        }
        if let Some(text) = html.get(start..end) {
            doc.append_text(self.current(), decode_character_references(text));
        }
    }

    fn open_tag(&self, doc: &Document, depth_from_top: usize) -> Option<String> {
        let idx = self.stack.len().checked_sub(1 + depth_from_top)?;
        if idx == 0 {
            return None;
        }
        doc.tag_name(self.stack[idx]).map(str::to_string)
    }

    /// Pop up to and including the nearest open `tag`, stopping at `boundaries`.
    fn close_open(&mut self, doc: &Document, tags: &[&str], boundaries: &[&str]) {
        let mut depth = 0;
        while let Some(open) = self.open_tag(doc, depth) {
            if boundaries.contains(&open.as_str()) {
                return;
            }
            if tags.contains(&open.as_str()) {
                self.stack.truncate(self.stack.len() - 1 - depth);
                return;
            }
            depth += 1;
        }
    }

    fn apply_implicit_closes(&mut self, doc: &Document, tag: &str) {
        if CLOSES_PARAGRAPH.contains(&tag) && self.open_tag(doc, 0).as_deref() == Some("p") {
            self.stack.pop();
        }
        match tag {
            "li" => self.close_open(doc, &["li"], &["ul", "ol", "menu"]),
            "dt" | "dd" => self.close_open(doc, &["dt", "dd"], &["dl"]),
            "option" => self.close_open(doc, &["option"], &["select", "datalist", "optgroup"]),
            "tr" => self.close_open(doc, &["tr"], &["table", "thead", "tbody", "tfoot"]),
            "td" | "th" => self.close_open(doc, &["td", "th"], &["tr", "table"]),
            _ => {}
        }
    }

    fn close_element(&mut self, doc: &Document, tag: &str) {
        let position = self
            .stack
            .iter()
            .skip(1)
            .rposition(|node| doc.tag_name(*node) == Some(tag));
        // Stray end tags with no open element are dropped.
        if let Some(position) = position {
            self.stack.truncate(position + 1);
        }
    }
}

/// Browser-style structure fix-up: one `html` holding `head` then `body`.
fn normalize(doc: &mut Document) {
    let root = doc.root();
    let root_children: Vec<NodeId> = doc.children(root).to_vec();

    let html = root_children
        .iter()
        .copied()
        .find(|c| doc.tag_name(*c) == Some("html"))
        .unwrap_or_else(|| doc.append_element(root, Element::new("html")));

    for child in root_children {
        if child == html {
            continue;
        }
        let (is_doctype, is_blank_text) = match doc.kind(child) {
            NodeKind::Doctype(_) => (true, false),
            NodeKind::Text(text) => (false, text.trim().is_empty()),
            _ => (false, false),
        };
        if is_blank_text {
            doc.detach(child);
        } else if !is_doctype {
            doc.reparent(child, html, None);
        }
    }

    let html_children: Vec<NodeId> = doc.children(html).to_vec();
    let existing_head = html_children
        .iter()
        .copied()
        .find(|c| doc.tag_name(*c) == Some("head"));
    let existing_body = html_children
        .iter()
        .copied()
        .find(|c| doc.tag_name(*c) == Some("body"));

    let head = existing_head.unwrap_or_else(|| {
        let head = doc.append_element(html, Element::new("head"));
        doc.reparent(head, html, Some(0));
        head
    });
    let body = existing_body.unwrap_or_else(|| doc.append_element(html, Element::new("body")));

    let mut seen_body = false;
    let mut seen_content = false;
    let mut body_insert = 0usize;
    for child in html_children {
        if child == head {
            continue;
        }
        if child == body {
            seen_body = true;
            continue;
        }
        let (is_blank_text, is_metadata) = match doc.kind(child) {
            NodeKind::Text(text) => (text.trim().is_empty(), false),
            NodeKind::Element(element) => (false, METADATA_TAGS.contains(&element.tag.as_str())),
            _ => (false, false),
        };
        if is_blank_text {
            doc.detach(child);
        } else if is_metadata && !seen_content && !seen_body {
            doc.reparent(child, head, None);
        } else if seen_body {
            seen_content = true;
            doc.reparent(child, body, None);
        } else {
            seen_content = true;
            doc.reparent(child, body, Some(body_insert));
            body_insert += 1;
        }
    }
}

fn parse_start_tag(html: &str, at: usize) -> Option<(String, Vec<(String, String)>, bool, usize)> {
    let bytes = html.as_bytes();
    let mut i = at + 1;

    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let tag = html.get(tag_start..i)?.to_ascii_lowercase();
    if tag.is_empty() {
        return None;
    }

    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;

    loop {
        skip_ws(bytes, &mut i);
        if i >= bytes.len() {
            return None;
        }
        if bytes[i] == b'>' {
            i += 1;
            break;
        }
        if bytes[i] == b'/' {
            i += 1;
            if bytes.get(i) == Some(&b'>') {
                self_closing = true;
                i += 1;
                break;
            }
            continue;
        }

        let name_start = i;
        while i < bytes.len() && is_attr_name_char(bytes[i]) {
            i += 1;
        }
        if name_start == i {
            // Lone `=` or similar junk inside a tag.
            i += 1;
            continue;
        }
        let name = html.get(name_start..i)?.to_ascii_lowercase();

        skip_ws(bytes, &mut i);
        let value = if bytes.get(i) == Some(&b'=') {
            i += 1;
            skip_ws(bytes, &mut i);
            parse_attr_value(html, bytes, &mut i)?
        } else {
            String::new()
        };

        // First occurrence wins, as in browsers.
        if !attrs.iter().any(|(key, _)| *key == name) {
            attrs.push((name, value));
        }
    }

    Some((tag, attrs, self_closing, i))
}

fn parse_end_tag(html: &str, at: usize) -> Option<(String, usize)> {
    let bytes = html.as_bytes();
    let mut i = at + 2;
    skip_ws(bytes, &mut i);

    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let tag = html.get(tag_start..i)?.to_ascii_lowercase();
    let end = find_byte(bytes, i, b'>')?;
    Some((tag, end + 1))
}

fn parse_attr_value(html: &str, bytes: &[u8], i: &mut usize) -> Option<String> {
    if *i >= bytes.len() {
        return None;
    }

    if bytes[*i] == b'\'' || bytes[*i] == b'"' {
        let quote = bytes[*i];
        *i += 1;
        let start = *i;
        while *i < bytes.len() && bytes[*i] != quote {
            *i += 1;
        }
        if *i >= bytes.len() {
            return None;
        }
        let value = html.get(start..*i)?;
        *i += 1;
        return Some(decode_character_references(value));
    }

    let start = *i;
    while *i < bytes.len() && !bytes[*i].is_ascii_whitespace() && bytes[*i] != b'>' {
        *i += 1;
    }
    Some(decode_character_references(html.get(start..*i)?))
}

pub(crate) fn decode_character_references(src: &str) -> String {
    if !src.contains('&') {
        return src.to_string();
    }

    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let token_len = after
            .char_indices()
            .take(32)
            .find(|(_, ch)| !(ch.is_ascii_alphanumeric() || *ch == '#'))
            .map(|(idx, _)| idx);

        let decoded = match token_len {
            Some(len) if after[len..].starts_with(';') => {
                decode_reference(&after[..len]).map(|ch| (ch, len + 1))
            }
            _ => None,
        };

        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(token: &str) -> Option<char> {
    if let Some(numeric) = token.strip_prefix('#') {
        let codepoint = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(codepoint);
    }
    match token {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        "copy" => Some('©'),
        "reg" => Some('®'),
        "trade" => Some('™'),
        "euro" => Some('€'),
        "pound" => Some('£'),
        "hellip" => Some('…'),
        "mdash" => Some('\u{2014}'),
        "ndash" => Some('\u{2013}'),
        "larr" => Some('←'),
        "rarr" => Some('→'),
        "times" => Some('×'),
        "middot" => Some('·'),
        "laquo" => Some('«'),
        "raquo" => Some('»'),
        "ldquo" => Some('\u{201C}'),
        "rdquo" => Some('\u{201D}'),
        "lsquo" => Some('\u{2018}'),
        "rsquo" => Some('\u{2019}'),
        _ => None,
    }
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn is_tag_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn is_attr_name_char(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'/' | b'>' | b'=' | b'"' | b'\'' | b'<')
}

pub(crate) fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn starts_with_at(bytes: &[u8], at: usize, needle: &[u8]) -> bool {
    bytes.len() >= at + needle.len() && &bytes[at..at + needle.len()] == needle
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|b| *b == needle)
        .map(|pos| from + pos)
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from > bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| from + pos)
}

fn find_case_insensitive_end_tag(bytes: &[u8], from: usize, tag: &[u8]) -> Option<usize> {
    let mut i = from;
    while i + 2 + tag.len() <= bytes.len() {
        if bytes[i] == b'<'
            && bytes[i + 1] == b'/'
            && bytes[i + 2..i + 2 + tag.len()].eq_ignore_ascii_case(tag)
        {
            let after = bytes.get(i + 2 + tag.len()).copied();
            if matches!(after, None | Some(b'>') | Some(b' ' | b'\t' | b'\n' | b'\r' | b'/')) {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(doc: &Document, parent: NodeId) -> Vec<String> {
        doc.element_children(parent)
            .into_iter()
            .filter_map(|c| doc.tag_name(c).map(str::to_string))
            .collect()
    }

    #[test]
    fn synthesizes_html_head_body() {
        let doc = parse_document("<title>Hi</title><h1>Hello</h1>");
        let html = doc.query("html").unwrap().unwrap();
        assert_eq!(tags(&doc, html), vec!["head", "body"]);
        let head = doc.query("head").unwrap().unwrap();
        assert_eq!(tags(&doc, head), vec!["title"]);
        assert!(doc.exists("body > h1").unwrap());
    }

    #[test]
    fn keeps_existing_structure() {
        let doc = parse_document(
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"></head><body><p>x</p></body></html>",
        );
        assert_eq!(doc.doctype(), Some("html"));
        assert_eq!(doc.count("html").unwrap(), 1);
        assert_eq!(doc.count("head").unwrap(), 1);
        assert_eq!(doc.count("body").unwrap(), 1);
        let html = doc.query("html").unwrap().unwrap();
        assert_eq!(doc.attr(html, "lang"), Some("en"));
    }

    #[test]
    fn unclosed_tags_close_at_end_of_input() {
        let doc = parse_document("<div><section><p>open");
        assert!(doc.exists("div section p").unwrap());
        let p = doc.query("p").unwrap().unwrap();
        assert_eq!(doc.trimmed_text(p), "open");
    }

    #[test]
    fn stray_end_tags_are_ignored() {
        let doc = parse_document("<div>a</span>b</div>");
        let div = doc.query("div").unwrap().unwrap();
        assert_eq!(doc.text(div), "ab");
    }

    #[test]
    fn unterminated_comment_swallows_rest() {
        let doc = parse_document("<h1>Title</h1><!-- never closed <h2>Lost</h2>");
        assert!(doc.exists("h1").unwrap());
        assert!(!doc.exists("h2").unwrap());
    }

    #[test]
    fn lone_angle_bracket_is_text() {
        let doc = parse_document("<p>1 < 2 and 3 <= 4</p>");
        let p = doc.query("p").unwrap().unwrap();
        assert_eq!(doc.text(p), "1 < 2 and 3 <= 4");
    }

    #[test]
    fn list_items_close_implicitly() {
        let doc = parse_document("<ul><li>one<li>two<li>three</ul>");
        assert_eq!(doc.count("ul > li").unwrap(), 3);
    }

    #[test]
    fn paragraph_closed_by_block() {
        let doc = parse_document("<p>intro<div>block</div>");
        assert!(!doc.exists("p div").unwrap());
    }

    #[test]
    fn script_body_is_raw_text() {
        let doc = parse_document("<script>if (a < b && c) { x = '<p>'; }</script>");
        assert!(!doc.exists("p").unwrap());
        let script = doc.query("script").unwrap().unwrap();
        assert!(doc.text(script).contains("a < b && c"));
    }

    #[test]
    fn entities_are_decoded() {
        let doc = parse_document("<p title=\"a &amp; b\">&lt;tag&gt; &#169; &copy; &bogus;</p>");
        let p = doc.query("p").unwrap().unwrap();
        assert_eq!(doc.attr(p, "title"), Some("a & b"));
        assert_eq!(doc.text(p), "<tag> © © &bogus;");
    }

    #[test]
    fn void_and_self_closing_elements() {
        let doc = parse_document("<p><img src=\"a.png\" alt=\"\"><br/>text</p>");
        let p = doc.query("p").unwrap().unwrap();
        assert_eq!(tags(&doc, p), vec!["img", "br"]);
        let img = doc.query("img").unwrap().unwrap();
        assert!(doc.has_attr(img, "alt"));
        assert_eq!(doc.attr(img, "alt"), Some(""));
    }

    #[test]
    fn fragment_is_not_normalized() {
        let doc = parse_fragment("<li>a</li><li>b</li>");
        assert!(!doc.exists("body").unwrap());
        assert_eq!(doc.count("li").unwrap(), 2);
    }
}
