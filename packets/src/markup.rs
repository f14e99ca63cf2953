use anyhow::{Context, anyhow, bail};
use std::fmt;
use std::str::FromStr;

/// Deepest element nesting `Element::parse` accepts.
pub const MAX_DEPTH: usize = 64;

/// One node of a protocol document.
///
/// Only element structure and attributes carry meaning on the wire, so text
/// content is dropped while reading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attrs.push((name.into(), value.to_string()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Required attribute parsed into `T`.
    pub fn parse_attr<T>(&self, name: &str) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let raw = self
            .attr(name)
            .ok_or_else(|| anyhow!("<{}> is missing attribute '{}'", self.tag, name))?;
        raw.trim()
            .parse()
            .with_context(|| format!("<{}> attribute '{}' = {:?}", self.tag, name, raw))
    }

    /// Optional attribute; absent or unparsable values yield `None`.
    pub fn parse_attr_opt<T: FromStr>(&self, name: &str) -> Option<T> {
        self.attr(name).and_then(|v| v.trim().parse().ok())
    }

    /// All descendants with the given tag, in document order.
    pub fn descendants(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        collect_descendants(self, tag, &mut found);
        found
    }

    pub fn first(&self, tag: &str) -> Option<&Element> {
        for child in &self.children {
            if child.tag == tag {
                return Some(child);
            }
            if let Some(found) = child.first(tag) {
                return Some(found);
            }
        }
        None
    }

    /// Reads a single document. The prolog and comments are skipped.
    pub fn parse(input: &str) -> anyhow::Result<Element> {
        let mut reader = Reader {
            src: input.as_bytes(),
            pos: 0,
            depth: 0,
        };
        reader.skip_misc()?;
        let root = reader.element()?;
        reader.skip_misc()?;
        if reader.pos < reader.src.len() {
            bail!("trailing content after root element at byte {}", reader.pos);
        }
        Ok(root)
    }
}

fn collect_descendants<'a>(el: &'a Element, tag: &str, out: &mut Vec<&'a Element>) {
    for child in &el.children {
        if child.tag == tag {
            out.push(child);
        }
        collect_descendants(child, tag, out);
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attrs {
            write!(f, " {}=\"{}\"", name, escape(value))?;
        }
        if self.children.is_empty() {
            return write!(f, "/>");
        }
        write!(f, ">")?;
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn unescape(raw: &str) -> anyhow::Result<String> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let end = rest[start..]
            .find(';')
            .ok_or_else(|| anyhow!("unterminated entity in {:?}", raw))?;
        let entity = &rest[start + 1..start + end];
        match entity {
            "amp" => out.push('&'),
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            other => bail!("unknown entity &{};", other),
        }
        rest = &rest[start + end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

struct Reader<'a> {
    src: &'a [u8],
    pos: usize,
    depth: usize,
}

impl Reader<'_> {
    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.src[self.pos..].starts_with(s.as_bytes())
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn skip_until(&mut self, end: &str) -> anyhow::Result<()> {
        match find(&self.src[self.pos..], end.as_bytes()) {
            Some(offset) => {
                self.pos += offset + end.len();
                Ok(())
            }
            None => bail!("expected '{}' before end of input", end),
        }
    }

    fn skip_misc(&mut self) -> anyhow::Result<()> {
        loop {
            self.skip_ws();
            if self.starts_with("<?") {
                self.skip_until("?>")?;
            } else if self.starts_with("<!--") {
                self.skip_until("-->")?;
            } else if self.starts_with("<!") {
                self.skip_until(">")?;
            } else {
                return Ok(());
            }
        }
    }

    fn expect(&mut self, b: u8) -> anyhow::Result<()> {
        match self.peek() {
            Some(found) if found == b => {
                self.pos += 1;
                Ok(())
            }
            Some(found) => bail!(
                "expected '{}' at byte {}, found '{}'",
                b as char,
                self.pos,
                found as char
            ),
            None => bail!("expected '{}' at end of input", b as char),
        }
    }

    fn name(&mut self) -> anyhow::Result<String> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':'))
        {
            self.pos += 1;
        }
        if start == self.pos {
            bail!("expected a name at byte {}", start);
        }
        Ok(String::from_utf8_lossy(&self.src[start..self.pos]).into_owned())
    }

    fn element(&mut self) -> anyhow::Result<Element> {
        if self.depth >= MAX_DEPTH {
            bail!("elements nested deeper than {} at byte {}", MAX_DEPTH, self.pos);
        }
        self.depth += 1;
        let el = self.element_body();
        self.depth -= 1;
        el
    }

    fn element_body(&mut self) -> anyhow::Result<Element> {
        self.expect(b'<')?;
        let mut el = Element::new(self.name()?);

        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'/') => {
                    self.pos += 1;
                    self.expect(b'>')?;
                    return Ok(el);
                }
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {
                    let name = self.name()?;
                    self.skip_ws();
                    self.expect(b'=')?;
                    self.skip_ws();
                    let quote = match self.peek() {
                        Some(q @ (b'"' | b'\'')) => q,
                        _ => bail!("unquoted value for attribute '{}'", name),
                    };
                    self.pos += 1;
                    let start = self.pos;
                    while matches!(self.peek(), Some(b) if b != quote) {
                        self.pos += 1;
                    }
                    let raw = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
                    self.expect(quote)?;
                    el.attrs.push((name, unescape(&raw)?));
                }
                None => bail!("unterminated start tag <{}>", el.tag),
            }
        }

        loop {
            // Text content is not part of the protocol.
            while matches!(self.peek(), Some(b) if b != b'<') {
                self.pos += 1;
            }
            if self.peek().is_none() {
                bail!("missing closing tag </{}>", el.tag);
            }
            if self.starts_with("</") {
                self.pos += 2;
                let name = self.name()?;
                if name != el.tag {
                    bail!("mismatched closing tag </{}> for <{}>", name, el.tag);
                }
                self.skip_ws();
                self.expect(b'>')?;
                return Ok(el);
            }
            if self.starts_with("<!--") || self.starts_with("<?") {
                self.skip_misc()?;
                continue;
            }
            let child = self.element()?;
            el.children.push(child);
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
