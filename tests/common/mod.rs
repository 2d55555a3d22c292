#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Newest timestamp in the test corpora. Every other date is a whole number of days before it.
pub const ANCHOR: &str = "Wed Dec 20 10:35:09 +0800 2023";

/// `created_at` strings by age in days relative to [`ANCHOR`] (weekdays are real).
pub fn days_ago(days: u32) -> &'static str {
    match days {
        0 => ANCHOR,
        1 => "Tue Dec 19 10:35:09 +0800 2023",
        2 => "Mon Dec 18 10:35:09 +0800 2023",
        3 => "Sun Dec 17 10:35:09 +0800 2023",
        6 => "Thu Dec 14 10:35:09 +0800 2023",
        7 => "Wed Dec 13 10:35:09 +0800 2023",
        8 => "Tue Dec 12 10:35:09 +0800 2023",
        10 => "Sun Dec 10 10:35:09 +0800 2023",
        20 => "Thu Nov 30 10:35:09 +0800 2023",
        29 => "Tue Nov 21 10:35:09 +0800 2023",
        30 => "Mon Nov 20 10:35:09 +0800 2023",
        45 => "Sun Nov 05 10:35:09 +0800 2023",
        other => panic!("no fixture date for {other} days"),
    }
}

pub fn user(id: &str, name: &str) -> Value {
    json!({ "id": id, "screen_name": name })
}

/// A top-level or nested comment without replies.
pub fn comment(id: &str, uid: &str, text: &str) -> Value {
    json!({ "id": id, "user": user(uid, &format!("name_{uid}")), "text_raw": text })
}

/// A sub-comment replying to `reply_to`.
pub fn reply(id: &str, uid: &str, text: &str, reply_to: &str) -> Value {
    let mut c = comment(id, uid, text);
    c["reply_comment"] = json!({ "id": reply_to });
    c
}

pub fn with_subs(mut top: Value, subs: Vec<Value>) -> Value {
    top["comments"] = Value::Array(subs);
    top
}

pub fn repost(id: &str, uid: &str, text: &str) -> Value {
    json!({ "id": id, "user": user(uid, &format!("name_{uid}")), "text_law": text })
}

pub fn post(id: &str, author: &str, created_at: &str, comments: Vec<Value>, reposts: Vec<Value>) -> Value {
    json!({
        "id": id,
        "user": user(author, &format!("name_{author}")),
        "created_at": created_at,
        "text_raw": format!("post {id}"),
        "comments": comments,
        "reposts": reposts,
    })
}

/// A small post with one comment by `commenter`.
pub fn simple_post(id: &str, author: &str, created_at: &str, commenter: &str) -> Value {
    post(id, author, created_at, vec![comment(&format!("{id}-c"), commenter, "nice")], vec![])
}

pub fn write_jsonl(path: &Path, records: &[Value]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(path).unwrap();
    for r in records {
        writeln!(f, "{}", r).unwrap();
    }
}

pub fn write_raw_lines(path: &Path, lines: &[&str]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(path).unwrap();
    for l in lines {
        writeln!(f, "{}", l).unwrap();
    }
}

/// Write a compressed `.zst` file containing the provided records, one per line.
pub fn write_zst_jsonl(path: &Path, records: &[Value]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for r in records {
        writeln!(&mut enc, "{}", r).unwrap();
    }
    enc.finish().unwrap();
}

pub fn write_json(path: &Path, v: &Value) {
    fs::write(path, serde_json::to_string_pretty(v).unwrap()).unwrap();
}

/// Read an output container back as a vector of trees.
pub fn read_array(path: &Path) -> Vec<Value> {
    let text = fs::read_to_string(path).unwrap();
    match serde_json::from_str::<Value>(&text).unwrap() {
        Value::Array(items) => items,
        other => panic!("expected a JSON array in {}, got {other}", path.display()),
    }
}

/// Output paths for one run inside `dir`: (train, val, test).
pub fn out_paths(dir: &Path) -> (PathBuf, PathBuf, PathBuf) {
    (dir.join("train.json"), dir.join("val.json"), dir.join("test.json"))
}

/// Ids of root posts in an output container.
pub fn root_ids(trees: &[Value]) -> Vec<String> {
    trees.iter().map(|t| t["id"].as_str().unwrap().to_string()).collect()
}

/// Every node of `tree`, breadth-first.
pub fn flatten(tree: &Value) -> Vec<&Value> {
    let mut out = vec![tree];
    let mut i = 0;
    while i < out.len() {
        let node = out[i];
        if let Some(replies) = node["replies"].as_array() {
            out.extend(replies.iter());
        }
        i += 1;
    }
    out
}
