//! # Struct Tag Syntax
//!
//! Parsing and serialization of Go struct tags
//! (`key:"name,opt1,opt2" other:"value"`).
//!
//! Parsing is lossless: whitespace between entries is retained and fragments
//! that do not follow the `key:"value"` convention are kept verbatim as
//! [`TagItem::Malformed`], so `parse(raw).to_string() == raw` for any input.

use crate::golit;
use derive_more::Display;
use std::fmt;

/// Why a fragment of a struct tag was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TagErrorKind {
    /// The fragment does not start with a key.
    #[display("bad syntax for struct tag key")]
    KeySyntax,
    /// The key is not followed by `:`.
    #[display("bad syntax for struct tag pair")]
    PairSyntax,
    /// The value is not a valid quoted string.
    #[display("bad syntax for struct tag value")]
    ValueSyntax,
}

/// A rejected fragment, located by its byte offset in the raw tag.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{kind} at offset {offset}")]
pub struct TagError {
    /// Byte offset of the fragment inside the raw tag string.
    pub offset: usize,
    /// Failure category.
    pub kind: TagErrorKind,
}

impl std::error::Error for TagError {}

/// One well-formed `key:"value"` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    key: String,
    name: String,
    options: Vec<String>,
    /// The quoted value exactly as it appeared in the source, while unchanged.
    quoted: Option<String>,
}

impl Tag {
    /// Creates a tag from its parts.
    pub fn new(key: impl Into<String>, name: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            options,
            quoted: None,
        }
    }

    fn from_value(key: &str, value: &str, quoted: &str) -> Self {
        let mut parts = value.split(',');
        let name = parts.next().unwrap_or_default().to_string();
        Self {
            key: key.to_string(),
            name,
            options: parts.map(str::to_string).collect(),
            quoted: Some(quoted.to_string()),
        }
    }

    /// The tag key, e.g. `json`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The part of the value before the first comma.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The comma-separated options following the name.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The full unquoted value.
    pub fn value(&self) -> String {
        if self.options.is_empty() {
            self.name.clone()
        } else {
            format!("{},{}", self.name, self.options.join(","))
        }
    }

    /// Replaces the name. Returns whether the name actually changed.
    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name == self.name {
            return false;
        }
        self.name = name;
        self.quoted = None;
        true
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.quoted {
            Some(quoted) => write!(f, "{}:{}", self.key, quoted),
            None => write!(f, "{}:{}", self.key, golit::quote(&self.value())),
        }
    }
}

/// An element of a tag string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagItem {
    /// A parsed `key:"value"` entry.
    Tag(Tag),
    /// A fragment kept verbatim because it could not be parsed.
    Malformed {
        /// Raw text of the fragment.
        text: String,
        /// Reason it was rejected.
        error: TagError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    leading: String,
    item: TagItem,
}

/// An ordered, lossless view of a struct tag string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList {
    entries: Vec<Entry>,
    trailing: String,
}

impl TagList {
    /// Parses a raw tag string (without the surrounding literal delimiters).
    ///
    /// Never fails; malformed fragments become [`TagItem::Malformed`].
    pub fn parse(raw: &str) -> Self {
        let bytes = raw.as_bytes();
        let mut entries = Vec::new();
        let mut pos = 0;

        loop {
            let ws_start = pos;
            while pos < bytes.len() && bytes[pos] == b' ' {
                pos += 1;
            }
            if pos == bytes.len() {
                return Self {
                    entries,
                    trailing: raw[ws_start..].to_string(),
                };
            }

            let leading = raw[ws_start..pos].to_string();
            let item = match scan_tag(raw, pos) {
                Ok((tag, end)) => {
                    pos = end;
                    TagItem::Tag(tag)
                }
                Err(kind) => {
                    let end = skip_fragment(bytes, pos);
                    let item = TagItem::Malformed {
                        text: raw[pos..end].to_string(),
                        error: TagError { offset: pos, kind },
                    };
                    pos = end;
                    item
                }
            };
            entries.push(Entry { leading, item });
        }
    }

    /// Parses a raw tag string, failing on the first malformed fragment.
    pub fn parse_strict(raw: &str) -> Result<Self, TagError> {
        let list = Self::parse(raw);
        let first = list.errors().next().cloned();
        match first {
            Some(err) => Err(err),
            None => Ok(list),
        }
    }

    /// All items in source order.
    pub fn items(&self) -> impl Iterator<Item = &TagItem> {
        self.entries.iter().map(|e| &e.item)
    }

    /// Well-formed entries in source order.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.items().filter_map(|item| match item {
            TagItem::Tag(tag) => Some(tag),
            TagItem::Malformed { .. } => None,
        })
    }

    /// Mutable access to the well-formed entries.
    pub fn tags_mut(&mut self) -> impl Iterator<Item = &mut Tag> {
        self.entries.iter_mut().filter_map(|e| match &mut e.item {
            TagItem::Tag(tag) => Some(tag),
            TagItem::Malformed { .. } => None,
        })
    }

    /// Errors of the malformed fragments, in source order.
    pub fn errors(&self) -> impl Iterator<Item = &TagError> {
        self.items().filter_map(|item| match item {
            TagItem::Malformed { error, .. } => Some(error),
            TagItem::Tag(_) => None,
        })
    }

    /// First entry with the given key.
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.tags().find(|t| t.key() == key)
    }

    /// Number of items, malformed fragments included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tag string holds no items.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for TagList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            f.write_str(&entry.leading)?;
            match &entry.item {
                TagItem::Tag(tag) => write!(f, "{}", tag)?,
                TagItem::Malformed { text, .. } => f.write_str(text)?,
            }
        }
        f.write_str(&self.trailing)
    }
}

/// Scans one `key:"value"` pair starting at `start`, returning the tag and the end offset.
fn scan_tag(raw: &str, start: usize) -> Result<(Tag, usize), TagErrorKind> {
    let bytes = raw.as_bytes();

    // A space, a quote or a control character ends the key.
    let mut i = start;
    while i < bytes.len() && bytes[i] > b' ' && bytes[i] != b':' && bytes[i] != b'"' && bytes[i] != 0x7f
    {
        i += 1;
    }
    if i == start {
        return Err(TagErrorKind::KeySyntax);
    }
    if i + 1 >= bytes.len() || bytes[i] != b':' {
        return Err(TagErrorKind::PairSyntax);
    }
    if bytes[i + 1] != b'"' {
        return Err(TagErrorKind::ValueSyntax);
    }
    let key = &raw[start..i];

    let value_start = i + 1;
    let mut j = value_start + 1;
    while j < bytes.len() && bytes[j] != b'"' {
        if bytes[j] == b'\\' {
            j += 1;
        }
        j += 1;
    }
    if j >= bytes.len() {
        return Err(TagErrorKind::ValueSyntax);
    }

    let quoted = &raw[value_start..=j];
    let value = golit::unquote(quoted).ok_or(TagErrorKind::ValueSyntax)?;
    Ok((Tag::from_value(key, &value, quoted), j + 1))
}

/// Finds the end of a malformed fragment: the next space outside a quoted run.
fn skip_fragment(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    let mut in_quote = false;
    while i < bytes.len() {
        let b = bytes[i];
        if in_quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == b'"' {
                in_quote = false;
            }
        } else if b == b' ' {
            break;
        } else if b == b'"' {
            in_quote = true;
        }
        i += 1;
    }
    i.min(bytes.len())
}
