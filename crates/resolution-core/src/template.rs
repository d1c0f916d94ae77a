use crate::error::TemplateError;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A URL with `{name}` placeholders, as configured by providers for
/// reference and payment links.
///
/// `{{` and `}}` stand for literal braces. Rendering fails on any
/// placeholder that has no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl UrlTemplate {
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, '{')) | None => {
                                return Err(TemplateError::UnbalancedBrace(offset))
                            }
                            Some((_, c)) => name.push(c),
                        }
                    }
                    if name.is_empty() {
                        return Err(TemplateError::UnknownPlaceholder(name));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name));
                }
                '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(TemplateError::UnbalancedBrace(offset)),
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn has_placeholder(&self, name: &str) -> bool {
        self.placeholders().any(|placeholder| placeholder == name)
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Fails on the first placeholder not listed in `known`.
    pub fn ensure_known(&self, known: &[&str]) -> Result<(), TemplateError> {
        match self.placeholders().find(|name| !known.contains(name)) {
            Some(unknown) => Err(TemplateError::UnknownPlaceholder(unknown.to_string())),
            None => Ok(()),
        }
    }

    /// Substitutes every placeholder with its value; values are inserted as given.
    pub fn render(&self, values: &[(&str, &str)]) -> Result<String, TemplateError> {
        let mut rendered = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Placeholder(name) => {
                    let value = values
                        .iter()
                        .find(|(key, _)| key == name)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| TemplateError::UnknownPlaceholder(name.clone()))?;
                    rendered.push_str(value);
                }
            }
        }
        Ok(rendered)
    }
}

impl Display for UrlTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
