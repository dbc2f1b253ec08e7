//! Line-preserving model of one XMP sidecar file
//!
//! Lightroom writes the develop settings of a photo as attributes of a single
//! `<rdf:Description ...>` element, one `category:Key="value"` attribute per
//! line. Everything before the opener and after the closing `>` is kept as an
//! opaque header and footer, and every attribute line keeps its raw text until
//! it is explicitly rewritten, so an untouched file renders back byte-for-byte.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::{Result, SidecarError};
use crate::timestamp::parse_capture_time;
use crate::value::Value;
use crate::{CRS, EXIF, SIDECAR_EXTENSION};

const DESCRIPTION_OPENER: &str = "<rdf:Description ";
const DEFAULT_INDENT: &str = "   ";

const RAW_FILE_NAME: &str = "RawFileName";
const DATE_TIME_ORIGINAL: &str = "DateTimeOriginal";

#[derive(Debug, Clone, PartialEq)]
struct BodyLine {
    indent: String,
    content: Content,
    /// Line terminator as found in the file; empty on the closing line
    eol: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Content {
    Pair {
        category: String,
        key: String,
        raw: String,
        value: Value,
    },
    Opaque(String),
}

impl BodyLine {
    fn parse(indent: &str, text: &str, eol: &str) -> Self {
        let content = match split_pair(text) {
            Some((category, key, raw)) => Content::Pair {
                category: category.to_string(),
                key: key.to_string(),
                raw: raw.to_string(),
                value: Value::parse(raw),
            },
            None => Content::Opaque(text.to_string()),
        };

        Self {
            indent: indent.to_string(),
            content,
            eol: eol.to_string(),
        }
    }

    fn is_pair(&self, cat: &str, k: &str) -> bool {
        matches!(&self.content, Content::Pair { category, key, .. } if category == cat && key == k)
    }

    fn is_blank(&self) -> bool {
        matches!(&self.content, Content::Opaque(text) if text.trim().is_empty())
    }
}

/// Split `crs:Exposure2012="+0.50"` into its category, key and raw value.
fn split_pair(text: &str) -> Option<(&str, &str, &str)> {
    let (category, rest) = text.split_once(':')?;
    let (key, raw) = rest.split_once('=')?;

    let well_formed = !category.is_empty()
        && !key.is_empty()
        && !category.contains(char::is_whitespace)
        && !key.contains(char::is_whitespace)
        && raw.len() >= 2
        && raw.starts_with('"')
        && raw.ends_with('"')
        && !raw[1..raw.len() - 1].contains('"');

    well_formed.then_some((category, key, raw))
}

#[derive(Debug, Clone)]
pub struct Sidecar {
    header: String,
    lines: Vec<BodyLine>,
    footer: String,
    source: Option<PathBuf>,
}

impl Sidecar {
    /// Parse sidecar text.
    pub fn parse(text: &str) -> Result<Self> {
        let header_end = find_opener(text).ok_or(SidecarError::MissingDescription)?;
        let header = text[..header_end].to_string();

        let mut lines = Vec::new();
        let mut offset = header_end;

        for chunk in text[header_end..].split_inclusive('\n') {
            let line = chunk.trim_end_matches(['\n', '\r']);
            let eol = &chunk[line.len()..];

            if let Some(stripped) = line.strip_suffix('>') {
                let body = stripped.strip_suffix('/').unwrap_or(stripped);
                let (indent, content) = split_indent(body);
                lines.push(BodyLine::parse(indent, content, ""));

                let footer = text[offset + body.len()..].to_string();
                debug!(lines = lines.len(), "parsed sidecar description block");
                return Ok(Self {
                    header,
                    lines,
                    footer,
                    source: None,
                });
            }

            let (indent, content) = split_indent(line);
            lines.push(BodyLine::parse(indent, content, eol));
            offset += chunk.len();
        }

        Err(SidecarError::UnterminatedDescription)
    }

    /// Read and parse a sidecar file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SidecarError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut sidecar = Self::parse(&text)?;
        sidecar.source = Some(path.to_path_buf());
        Ok(sidecar)
    }

    /// Path this sidecar was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn get(&self, category: &str, key: &str) -> Option<&Value> {
        self.lines.iter().find_map(|line| match &line.content {
            Content::Pair { category: c, key: k, value, .. } if c == category && k == key => {
                Some(value)
            }
            _ => None,
        })
    }

    pub fn get_number(&self, category: &str, key: &str) -> Option<f64> {
        self.get(category, key).and_then(Value::as_number)
    }

    /// The value text with quotes removed, whatever its type.
    pub fn get_str(&self, category: &str, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match &line.content {
            Content::Pair { category: c, key: k, raw, .. } if c == category && k == key => {
                Some(&raw[1..raw.len() - 1])
            }
            _ => None,
        })
    }

    /// Store a value, rewriting the existing attribute line or appending a new
    /// one at the end of the description block.
    pub fn set<V: Into<Value>>(&mut self, category: &str, key: &str, value: V) {
        let value = value.into();
        let raw = value.to_attribute();

        if let Some(line) = self.lines.iter_mut().find(|l| l.is_pair(category, key)) {
            line.content = Content::Pair {
                category: category.to_string(),
                key: key.to_string(),
                raw,
                value,
            };
            return;
        }

        let indent = self
            .lines
            .iter()
            .rev()
            .find(|l| matches!(l.content, Content::Pair { .. }) && !l.indent.is_empty())
            .map(|l| l.indent.clone())
            .unwrap_or_else(|| DEFAULT_INDENT.to_string());
        let eol = self
            .lines
            .iter()
            .map(|l| l.eol.as_str())
            .find(|e| !e.is_empty())
            .unwrap_or("\n")
            .to_string();

        let new_line = BodyLine {
            indent,
            content: Content::Pair {
                category: category.to_string(),
                key: key.to_string(),
                raw,
                value,
            },
            eol: String::new(),
        };

        // A closing '>' on its own line stays on its own line
        let closing_on_own_line =
            self.lines.len() > 1 && self.lines.last().map_or(false, BodyLine::is_blank);

        if closing_on_own_line {
            let at = self.lines.len() - 1;
            self.lines.insert(at, BodyLine { eol, ..new_line });
        } else {
            if let Some(last) = self.lines.last_mut() {
                last.eol = eol;
            }
            self.lines.push(new_line);
        }
    }

    /// Number of attributes in a category
    pub fn count_in(&self, category: &str) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(&l.content, Content::Pair { category: c, .. } if c == category))
            .count()
    }

    /// True if the file carries develop settings beyond the raw file name
    /// Lightroom stores for every imported photo.
    pub fn has_edits(&self) -> bool {
        self.count_in(CRS) > 1
    }

    pub fn capture_timestamp(&self) -> Result<NaiveDateTime> {
        let raw = self
            .get_str(EXIF, DATE_TIME_ORIGINAL)
            .ok_or(SidecarError::MissingField {
                category: EXIF,
                key: DATE_TIME_ORIGINAL,
            })?;

        parse_capture_time(raw).ok_or_else(|| SidecarError::InvalidTimestamp(raw.to_string()))
    }

    pub fn raw_file_name(&self) -> Option<&str> {
        self.get_str(CRS, RAW_FILE_NAME).filter(|name| !name.is_empty())
    }

    /// Name of the sidecar Lightroom expects next to the raw file.
    pub fn output_file_name(&self) -> Result<String> {
        let raw = self.raw_file_name().ok_or(SidecarError::MissingField {
            category: CRS,
            key: RAW_FILE_NAME,
        })?;

        Ok(sidecar_name_for(raw))
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.header.len() + self.footer.len() + self.lines.len() * 40);
        out.push_str(&self.header);
        for line in &self.lines {
            out.push_str(&line.indent);
            match &line.content {
                Content::Pair { category, key, raw, .. } => {
                    out.push_str(category);
                    out.push(':');
                    out.push_str(key);
                    out.push('=');
                    out.push_str(raw);
                }
                Content::Opaque(text) => out.push_str(text),
            }
            out.push_str(&line.eol);
        }
        out.push_str(&self.footer);
        out
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.render()).map_err(|source| SidecarError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl fmt::Display for Sidecar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// `DSC_0001.NEF` -> `DSC_0001.xmp`
pub fn sidecar_name_for(file_name: &str) -> String {
    Path::new(file_name)
        .with_extension(SIDECAR_EXTENSION)
        .to_string_lossy()
        .into_owned()
}

/// Byte offset just past the `<rdf:Description ` opener.
fn find_opener(text: &str) -> Option<usize> {
    let mut offset = 0;
    for chunk in text.split_inclusive('\n') {
        if chunk.trim_start().starts_with(DESCRIPTION_OPENER) {
            let at = chunk.find(DESCRIPTION_OPENER)?;
            return Some(offset + at + DESCRIPTION_OPENER.len());
        }
        offset += chunk.len();
    }
    None
}

fn split_indent(line: &str) -> (&str, &str) {
    let content = line.trim_start();
    (&line[..line.len() - content.len()], content)
}
