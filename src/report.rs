//! Recording manifests, feature tables and extraction error logs.

use crate::analysis::RecordingFeatures;
use crate::result::{Family, FeatureMap};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which families a run extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    All,
    Only(Family),
}

impl Scope {
    pub fn families(self) -> Vec<Family> {
        match self {
            Scope::All => Family::ALL.to_vec(),
            Scope::Only(family) => vec![family],
        }
    }

    /// Output fields for this scope.
    pub fn fields(self, features: &RecordingFeatures) -> FeatureMap {
        match self {
            Scope::All => features.to_map(),
            Scope::Only(family) => features.family(family),
        }
    }

    /// Whether a recording counts as successfully processed.
    ///
    /// A single family uses [`RecordingFeatures::succeeded`]; `All`
    /// succeeds when any field holds a value.
    pub fn succeeded(self, features: &RecordingFeatures) -> bool {
        match self {
            Scope::All => features.to_map().any_present(),
            Scope::Only(family) => features.succeeded(family),
        }
    }

    /// Human-readable name, e.g. `"HNR"`.
    pub fn title(self) -> &'static str {
        match self {
            Scope::All => "Feature",
            Scope::Only(family) => family.title(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => write!(f, "all"),
            Scope::Only(family) => write!(f, "{family}"),
        }
    }
}

impl FromStr for Scope {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Scope::All)
        } else {
            s.parse().map(Scope::Only)
        }
    }
}

/// A table of recordings with one ID column.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    id_index: usize,
}

impl Manifest {
    /// Read a manifest file.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read and `Error::Manifest`
    /// if it is empty or has no `id_column`.
    pub fn read<P: AsRef<Path>>(path: P, id_column: &str) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, id_column)
    }

    /// Parse tab-separated text, falling back to commas when tabs yield a
    /// single column. Header names are trimmed; short rows are padded and
    /// rows with more fields than the header are rejected.
    ///
    /// # Example
    /// ```
    /// use glottis::report::Manifest;
    ///
    /// let m = Manifest::parse("id,label\nrec1,0\nrec2,1\n", "id").unwrap();
    /// assert_eq!(m.ids().collect::<Vec<_>>(), vec!["rec1", "rec2"]);
    /// ```
    pub fn parse(text: &str, id_column: &str) -> crate::Result<Self> {
        let mut table = parse_delimited(text, '\t');
        if table.first().is_some_and(|h| h.len() == 1) {
            table = parse_delimited(text, ',');
        }

        let mut lines = table.into_iter();
        let headers: Vec<String> = lines
            .next()
            .ok_or_else(|| crate::Error::Manifest("manifest is empty".into()))?
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();
        let id_index = headers
            .iter()
            .position(|h| h == id_column)
            .ok_or_else(|| crate::Error::Manifest(format!("missing id column `{id_column}`")))?;

        let width = headers.len();
        let mut rows = Vec::new();
        for (i, mut row) in lines.enumerate() {
            if row.len() == 1 && row[0].trim().is_empty() {
                continue;
            }
            if row.len() > width {
                return Err(crate::Error::Manifest(format!(
                    "record {} has {} fields, header has {width}",
                    i + 1,
                    row.len()
                )));
            }
            row.resize(width, String::new());
            rows.push(row);
        }

        Ok(Self {
            headers,
            rows,
            id_index,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Trimmed recording ID of every row, in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row[self.id_index].trim())
    }
}

fn parse_delimited(text: &str, delimiter: char) -> Vec<Vec<String>> {
    text.lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(|line| split_record(line, delimiter))
        .collect()
}

/// Split one record, honouring double-quoted fields with `""` escapes.
fn split_record(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' if quoted => quoted = false,
            '"' if field.is_empty() => quoted = true,
            c if c == delimiter && !quoted => fields.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }
    fields.push(field);
    fields
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Features of one recording, keyed by its ID.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub id: String,
    pub path: PathBuf,
    pub features: FeatureMap,
}

/// Write the manifest joined with extracted features as CSV.
///
/// Columns are the manifest columns, `audio_id`, `audio_path`, then every
/// feature field in first-seen order. Every manifest row is kept; rows
/// without features get empty cells, as do absent feature values.
pub fn write_features_csv<W: Write>(
    mut out: W,
    manifest: &Manifest,
    rows: &[FeatureRow],
) -> crate::Result<()> {
    let mut feature_names: Vec<&str> = Vec::new();
    for row in rows {
        for name in row.features.names() {
            if !feature_names.contains(&name) {
                feature_names.push(name);
            }
        }
    }

    let header: Vec<String> = manifest
        .headers()
        .iter()
        .map(String::as_str)
        .chain(["audio_id", "audio_path"])
        .chain(feature_names.iter().copied())
        .map(escape_field)
        .collect();
    writeln!(out, "{}", header.join(","))?;

    for (record, id) in manifest.rows().iter().zip(manifest.ids()) {
        let matched = rows.iter().find(|r| r.id == id);
        let mut cells: Vec<String> = record.iter().map(|c| escape_field(c)).collect();
        match matched {
            Some(row) => {
                cells.push(escape_field(&row.id));
                cells.push(escape_field(&row.path.display().to_string()));
                cells.extend(feature_names.iter().map(|name| {
                    row.features
                        .value(name)
                        .map(|v| v.to_string())
                        .unwrap_or_default()
                }));
            }
            None => cells.extend(std::iter::repeat_n(String::new(), 2 + feature_names.len())),
        }
        writeln!(out, "{}", cells.join(","))?;
    }
    out.flush()?;
    Ok(())
}

/// Per-recording extraction failures.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    entries: Vec<(String, String)>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: impl Into<String>, message: impl fmt::Display) {
        self.entries.push((id.into(), message.to_string()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write a titled log: header, a rule of 50 `=`, then `id: message`
    /// lines.
    pub fn write<W: Write>(&self, mut out: W, title: &str) -> crate::Result<()> {
        writeln!(out, "{title} Extraction Errors Log")?;
        writeln!(out, "{}", "=".repeat(50))?;
        writeln!(out)?;
        for (id, message) in &self.entries {
            writeln!(out, "{id}: {message}")?;
        }
        out.flush()?;
        Ok(())
    }
}
