use std::collections::BTreeMap;

use super::dom::{Dom, Element, NodeId, is_void_tag};
use super::*;

/// Parses a server-rendered page into a fresh [`Dom`]. Scripts are kept as
/// inert text; the controller supplies all behavior.
pub(crate) fn parse_html(html: &str) -> Result<Dom> {
    let mut dom = Dom::new();
    let root = dom.root;
    parse_into(&mut dom, root, html)?;
    Ok(dom)
}

/// Appends the nodes described by `html` under `parent`.
///
/// The tree builder is deliberately small: end tags close the innermost
/// matching open element, stray end tags are dropped, and void elements
/// never take children.
pub(crate) fn parse_into(dom: &mut Dom, parent: NodeId, html: &str) -> Result<()> {
    let mut reader = Reader { src: html, pos: 0 };
    let mut open = vec![parent];

    while let Some(token) = reader.next_token()? {
        let current = open.last().copied().unwrap_or(parent);
        match token {
            Token::Text(text) => {
                dom.append_text(current, decode_entities(text));
            }
            Token::Close(tag) => {
                if let Some(depth) = open.iter().skip(1).rposition(|node| dom.is_tag(*node, &tag)) {
                    open.truncate(depth + 1);
                }
            }
            Token::Open {
                tag,
                attrs,
                self_closing,
            } => {
                let mut element = Element::new(&tag, attrs);
                if is_raw_text_tag(&tag) && !self_closing {
                    let raw = reader.raw_text(&tag)?;
                    let body = if tag == "textarea" {
                        // A single newline right after <textarea> is not content.
                        let text = decode_entities(raw.strip_prefix('\n').unwrap_or(raw));
                        element.value = text.clone();
                        text
                    } else {
                        raw.to_string()
                    };
                    let node = dom.append_element(current, element);
                    if !body.is_empty() {
                        dom.append_text(node, body);
                    }
                    continue;
                }
                let node = dom.append_element(current, element);
                if !self_closing && !is_void_tag(&tag) {
                    open.push(node);
                }
            }
        }
    }
    Ok(())
}

enum Token<'a> {
    Text(&'a str),
    Open {
        tag: String,
        attrs: BTreeMap<String, String>,
        self_closing: bool,
    },
    Close(String),
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn rest(&self) -> &'a str {
        self.src.get(self.pos..).unwrap_or_default()
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|ch: char| !keep(ch)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(|ch| ch.is_ascii_whitespace());
    }

    /// Comments and declarations are skipped; a `<` that does not open a
    /// tag is text.
    fn next_token(&mut self) -> Result<Option<Token<'a>>> {
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Ok(None);
            }
            if let Some(comment) = rest.strip_prefix("<!--") {
                let end = comment
                    .find("-->")
                    .ok_or_else(|| Error::HtmlParse("unclosed HTML comment".into()))?;
                self.pos += "<!--".len() + end + "-->".len();
                continue;
            }
            if rest.starts_with("<!") || rest.starts_with("<?") {
                let end = rest
                    .find('>')
                    .ok_or_else(|| Error::HtmlParse("unclosed declaration".into()))?;
                self.pos += end + 1;
                continue;
            }

            let bytes = rest.as_bytes();
            if bytes[0] == b'<' && bytes.get(1) == Some(&b'/') && bytes.get(2).is_some_and(u8::is_ascii_alphabetic) {
                self.pos += 2;
                let tag = self.take_while(is_name_char).to_ascii_lowercase();
                let end = self
                    .rest()
                    .find('>')
                    .ok_or_else(|| Error::HtmlParse(format!("unclosed end tag </{tag}")))?;
                self.pos += end + 1;
                return Ok(Some(Token::Close(tag)));
            }
            if bytes[0] == b'<' && bytes.get(1).is_some_and(u8::is_ascii_alphabetic) {
                self.pos += 1;
                return self.start_tag().map(Some);
            }

            let first = rest.chars().next().map_or(1, char::len_utf8);
            let end = rest[first..].find('<').map_or(rest.len(), |at| at + first);
            self.pos += end;
            return Ok(Some(Token::Text(&rest[..end])));
        }
    }

    fn start_tag(&mut self) -> Result<Token<'a>> {
        let tag = self.take_while(is_name_char).to_ascii_lowercase();
        let mut attrs = BTreeMap::new();
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                return Err(Error::HtmlParse(format!("unclosed start tag <{tag}")));
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok(Token::Open {
                    tag,
                    attrs,
                    self_closing: true,
                });
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return Ok(Token::Open {
                    tag,
                    attrs,
                    self_closing: false,
                });
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }

            let name = self.take_while(is_name_char).to_ascii_lowercase();
            if name.is_empty() {
                return Err(Error::HtmlParse(format!("invalid attribute in <{tag}>")));
            }
            self.skip_whitespace();
            let value = if self.rest().starts_with('=') {
                self.pos += 1;
                self.skip_whitespace();
                decode_entities(self.attr_value()?)
            } else {
                String::new()
            };
            // The first occurrence of a repeated attribute wins.
            attrs.entry(name).or_insert(value);
        }
    }

    fn attr_value(&mut self) -> Result<&'a str> {
        let rest = self.rest();
        match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &rest[1..];
                let end = body
                    .find(quote)
                    .ok_or_else(|| Error::HtmlParse("unclosed quoted attribute value".into()))?;
                self.pos += end + 2;
                Ok(&body[..end])
            }
            Some(_) => Ok(self.take_while(|ch| !ch.is_ascii_whitespace() && ch != '>')),
            None => Err(Error::HtmlParse("missing attribute value".into())),
        }
    }

    /// Body of a raw-text element up to its end tag, which is consumed.
    fn raw_text(&mut self, tag: &str) -> Result<&'a str> {
        let rest = self.rest();
        // ASCII lowercasing keeps byte offsets intact.
        let end = rest
            .to_ascii_lowercase()
            .find(&format!("</{tag}"))
            .ok_or_else(|| Error::HtmlParse(format!("unclosed <{tag}>")))?;
        let after = rest[end..]
            .find('>')
            .ok_or_else(|| Error::HtmlParse(format!("unclosed end tag </{tag}")))?;
        self.pos += end + after + 1;
        Ok(&rest[..end])
    }
}

fn is_raw_text_tag(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea" | "title")
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | ':')
}

/// Decodes numeric references and the named ones server templates emit.
/// Unknown or malformed references are kept verbatim.
pub(crate) fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_reference(rest) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &rest[consumed..];
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

/// `reference` starts at the `&`. Returns the character and the number of
/// bytes the reference spans.
fn decode_reference(reference: &str) -> Option<(char, usize)> {
    let semi = reference.find(';')?;
    let name = &reference[1..semi];
    if name.is_empty() || name.len() > 10 || !name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '#') {
        return None;
    }
    let ch = match name.strip_prefix('#') {
        Some(number) => {
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)?
        }
        None => match name {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            "nbsp" => '\u{a0}',
            "hellip" => '…',
            "middot" => '·',
            "laquo" => '«',
            "raquo" => '»',
            "yen" => '¥',
            "copy" => '©',
            _ => return None,
        },
    };
    Some((ch, semi + 1))
}
