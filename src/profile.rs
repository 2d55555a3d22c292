//! User interest profiles, loaded once and shared read-only by every partition.
//!
//! The profile file is either one JSON object keyed by user id, or NDJSON with one
//! user object per line carrying its own `user_id`. The format is sniffed from the
//! first two lines. An optional mapping file (`{ real_id: anonymized_id }`) makes
//! lookups by real id resolve through the anonymized id space.
//!
//! Nothing here is fatal: an unreadable profile file yields an empty map, an
//! unreadable mapping file falls back to identity lookup.

use crate::record::user_key;
use crate::util::open_with_backoff;
use ahash::AHashMap;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

#[derive(Clone, Debug, Default)]
pub struct ProfileMap {
    interests: AHashMap<String, Vec<String>>,
}

impl ProfileMap {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load profiles, degrading to an empty map (or identity mapping) on read errors.
    pub fn load(profile_path: &Path, mapping_path: Option<&Path>) -> Self {
        let entries = match read_profile_entries(profile_path) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("cannot read profile file {}: {:#}", profile_path.display(), e);
                return Self::empty();
            }
        };

        let mapping = match mapping_path {
            Some(p) => match read_mapping(p) {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!("cannot read mapping file {}, using identity ids: {:#}", p.display(), e);
                    Map::new()
                }
            },
            None => Map::new(),
        };

        Self::from_sources(&entries, &mapping)
    }

    /// Build from an already-parsed profile object and mapping object.
    /// An empty mapping means identity lookup.
    pub fn from_sources(entries: &Map<String, Value>, mapping: &Map<String, Value>) -> Self {
        let mut interests = AHashMap::new();
        if mapping.is_empty() {
            for (uid, entry) in entries {
                if let Some(list) = interests_from_entry(entry) {
                    interests.insert(uid.clone(), list);
                }
            }
        } else {
            for (real_id, anon_id) in mapping {
                let list = match entries.get(&user_key(anon_id)) {
                    Some(entry) => match interests_from_entry(entry) {
                        Some(list) => list,
                        None => continue,
                    },
                    None => Vec::new(),
                };
                interests.insert(real_id.clone(), list);
            }
        }
        Self { interests }
    }

    /// Interests for `user_id`; empty when the user is unknown.
    pub fn interests_of(&self, user_id: &str) -> &[String] {
        self.interests.get(user_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.interests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interests.is_empty()
    }
}

/// `user_interests`, else `interests`. Non-object entries yield `None`; a non-list
/// value yields an empty list. Non-string list items are dropped.
fn interests_from_entry(entry: &Value) -> Option<Vec<String>> {
    let obj = entry.as_object()?;
    let raw = obj.get("user_interests").or_else(|| obj.get("interests"));
    let list = match raw.and_then(Value::as_array) {
        Some(items) => items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect(),
        None => Vec::new(),
    };
    Some(list)
}

fn read_profile_entries(path: &Path) -> Result<Map<String, Value>> {
    let f = open_with_backoff(path, 16, 50).with_context(|| format!("open {}", path.display()))?;
    let mut rdr = BufReader::new(f);

    let mut first = String::new();
    rdr.read_line(&mut first)?;
    if first.trim().is_empty() {
        return Ok(Map::new());
    }
    let mut second = String::new();
    rdr.read_line(&mut second)?;

    let first_is_object = matches!(serde_json::from_str::<Value>(first.trim()), Ok(Value::Object(_)));
    if first_is_object && !second.trim().is_empty() {
        let mut out = Map::new();
        for line in [first, second].into_iter().map(Ok::<String, io::Error>).chain(rdr.lines()) {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(line) else { continue };
            let uid = obj.get("user_id").filter(|v| !v.is_null()).map(user_key).unwrap_or_default();
            if !uid.is_empty() {
                out.insert(uid, Value::Object(obj));
            }
        }
        return Ok(out);
    }

    drop(rdr);
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    match serde_json::from_str::<Value>(&text).with_context(|| format!("parse {}", path.display()))? {
        Value::Object(m) => Ok(m),
        _ => Ok(Map::new()),
    }
}

fn read_mapping(path: &Path) -> Result<Map<String, Value>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    match serde_json::from_str::<Value>(&text).with_context(|| format!("parse {}", path.display()))? {
        Value::Object(m) => Ok(m),
        _ => Ok(Map::new()),
    }
}
