//! YAML front-matter splitting for markdown sources.

use std::collections::BTreeMap;

use super::error::FetchError;
use super::types::ParsedDocument;

const DELIMITER: &str = "---";

/// Splits `raw` into front-matter metadata and body.
///
/// A document that does not open with a `---` line has no front-matter and
/// the whole payload is its body.
pub fn parse_document(raw: &str) -> Result<ParsedDocument, FetchError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let Some(rest) = strip_delimiter_line(raw) else {
        return Ok(ParsedDocument {
            metadata: BTreeMap::new(),
            body: raw.to_string(),
        });
    };

    let (header, body) =
        split_at_closing_delimiter(rest).ok_or(FetchError::UnterminatedFrontMatter)?;

    Ok(ParsedDocument {
        metadata: parse_metadata(header)?,
        body: body.to_string(),
    })
}

/// Returns the text after an opening `---` line.
fn strip_delimiter_line(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(DELIMITER)?;
    if let Some(after) = rest.strip_prefix("\r\n") {
        return Some(after);
    }
    rest.strip_prefix('\n')
}

/// Finds the closing `---` line and returns (header, body).
fn split_at_closing_delimiter(text: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            let header = &text[..offset];
            let body = &text[offset + line.len()..];
            return Some((header, body));
        }
        offset += line.len();
    }
    None
}

fn parse_metadata(header: &str) -> Result<BTreeMap<String, String>, FetchError> {
    if header.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let value: serde_yaml::Value = serde_yaml::from_str(header)?;
    let mapping = match value {
        serde_yaml::Value::Null => return Ok(BTreeMap::new()),
        serde_yaml::Value::Mapping(mapping) => mapping,
        _ => return Err(FetchError::FrontMatterNotMapping),
    };

    let mut metadata = BTreeMap::new();
    for (key, value) in mapping {
        let Some(key) = scalar_to_string(&key) else {
            continue;
        };
        let value = match scalar_to_string(&value) {
            Some(text) => text,
            None => serde_yaml::to_string(&value)?.trim_end().to_string(),
        };
        metadata.insert(key, value);
    }
    Ok(metadata)
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        _ => None,
    }
}
