use super::dom::{Dom, NodeId};
use super::*;

/// A parsed, comma-separated selector list.
///
/// Grammar: tag, `#id`, `.class`, `[attr]`, `[attr=v]`, `[attr^=v]`,
/// `[attr*=v]`, `:checked`, `:not(<list>)`, descendant and child
/// combinators. Anything else is rejected with
/// [`Error::UnsupportedSelector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorList(Vec<Complex>);

/// The subject compound plus the compounds to its left, nearest first.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    subject: Compound,
    ancestors: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
    checked: bool,
    negations: Vec<SelectorList>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrTest {
    name: String,
    op: Option<(AttrOp, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Prefix,
    Substring,
}

impl SelectorList {
    pub(crate) fn parse(selector: &str) -> Result<Self> {
        let mut parser = Parser::new(selector);
        let list = parser.list(None)?;
        if parser.peek().is_some() {
            return Err(parser.error());
        }
        Ok(list)
    }

    pub(crate) fn matches(&self, dom: &Dom, node: NodeId) -> bool {
        self.0.iter().any(|complex| complex.matches(dom, node))
    }
}

impl Complex {
    fn matches(&self, dom: &Dom, node: NodeId) -> bool {
        self.subject.matches(dom, node) && ancestors_match(dom, node, &self.ancestors)
    }
}

/// Tries every qualifying ancestor for the next compound, so `.a > .b .c`
/// still matches when the nearest `.b` is not the one under `.a`.
fn ancestors_match(dom: &Dom, node: NodeId, chain: &[(Combinator, Compound)]) -> bool {
    let Some(((combinator, compound), rest)) = chain.split_first() else {
        return true;
    };
    let mut cursor = dom.parent(node);
    while let Some(candidate) = cursor {
        if compound.matches(dom, candidate) && ancestors_match(dom, candidate, rest) {
            return true;
        }
        if *combinator == Combinator::Child {
            return false;
        }
        cursor = dom.parent(candidate);
    }
    false
}

impl Compound {
    fn matches(&self, dom: &Dom, node: NodeId) -> bool {
        let Some(element) = dom.element(node) else {
            return false;
        };
        if self.tag.as_ref().is_some_and(|tag| element.tag != *tag) {
            return false;
        }
        if self
            .id
            .as_deref()
            .is_some_and(|id| element.attr("id") != Some(id))
        {
            return false;
        }
        if self.checked && !element.checked {
            return false;
        }
        self.classes.iter().all(|class| element.has_class(class))
            && self.attrs.iter().all(|test| test.matches(element.attr(&test.name)))
            && !self.negations.iter().any(|list| list.matches(dom, node))
    }
}

impl AttrTest {
    fn matches(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match &self.op {
            None => true,
            Some((AttrOp::Equals, expected)) => actual == expected,
            Some((AttrOp::Prefix, expected)) => !expected.is_empty() && actual.starts_with(expected.as_str()),
            Some((AttrOp::Substring, expected)) => !expected.is_empty() && actual.contains(expected.as_str()),
        }
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self) -> Error {
        Error::UnsupportedSelector(self.source.to_string())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            return true;
        }
        false
    }

    /// Returns whether any whitespace was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    /// Stops before `closing` without consuming it; `None` means end of input.
    fn list(&mut self, closing: Option<char>) -> Result<SelectorList> {
        let mut complexes = vec![self.complex()?];
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    complexes.push(self.complex()?);
                }
                next if next == closing => return Ok(SelectorList(complexes)),
                _ => return Err(self.error()),
            }
        }
    }

    fn complex(&mut self) -> Result<Complex> {
        self.skip_whitespace();
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let spaced = self.skip_whitespace();
            let combinator = match self.peek() {
                Some('>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(ch) if spaced && starts_compound(ch) => Combinator::Descendant,
                _ => break,
            };
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }

        let subject = compounds.pop().ok_or_else(|| self.error())?;
        let mut ancestors = Vec::with_capacity(compounds.len());
        while let (Some(compound), Some(combinator)) = (compounds.pop(), combinators.pop()) {
            ancestors.push((combinator, compound));
        }
        Ok(Complex { subject, ancestors })
    }

    fn compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::default();
        if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    let id = self.ident()?;
                    if compound.id.replace(id).is_some() {
                        return Err(self.error());
                    }
                }
                Some('.') => {
                    self.pos += 1;
                    let class = self.ident()?;
                    compound.classes.push(class);
                }
                Some('[') => {
                    self.pos += 1;
                    let test = self.attr_test()?;
                    compound.attrs.push(test);
                }
                Some(':') => {
                    self.pos += 1;
                    self.pseudo_class(&mut compound)?;
                }
                _ => break,
            }
        }
        if compound == Compound::default() {
            return Err(self.error());
        }
        Ok(compound)
    }

    fn ident(&mut self) -> Result<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error());
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attr_test(&mut self) -> Result<AttrTest> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();
        let op = match self.bump() {
            Some(']') => return Ok(AttrTest { name, op: None }),
            Some('=') => AttrOp::Equals,
            Some('^') if self.eat('=') => AttrOp::Prefix,
            Some('*') if self.eat('=') => AttrOp::Substring,
            _ => return Err(self.error()),
        };
        self.skip_whitespace();
        let value = self.attr_value()?;
        self.skip_whitespace();
        if !self.eat(']') {
            return Err(self.error());
        }
        Ok(AttrTest {
            name,
            op: Some((op, value)),
        })
    }

    fn attr_value(&mut self) -> Result<String> {
        let Some(quote @ ('"' | '\'')) = self.peek() else {
            return self.ident();
        };
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(ch) if ch == quote => return Ok(value),
                Some(ch) => value.push(ch),
                None => return Err(self.error()),
            }
        }
    }

    fn pseudo_class(&mut self, compound: &mut Compound) -> Result<()> {
        match self.ident()?.as_str() {
            "checked" => compound.checked = true,
            "not" => {
                if !self.eat('(') {
                    return Err(self.error());
                }
                let inner = self.list(Some(')'))?;
                self.pos += 1;
                compound.negations.push(inner);
            }
            _ => return Err(self.error()),
        }
        Ok(())
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

fn starts_compound(ch: char) -> bool {
    is_ident_char(ch) || matches!(ch, '#' | '.' | '[' | ':')
}
