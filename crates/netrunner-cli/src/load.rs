//! Reading CLI inputs from disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use netrunner_core::{AlgorithmResult, FrameSpec, LabelMapping, NetFrame};
use netrunner_table::Frame;

/// A JSON array of records.
pub fn read_frame(path: &Path) -> Result<Frame> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Frame::from_json_str(&text).with_context(|| format!("parse table {}", path.display()))
}

pub fn read_spec(path: &Path) -> Result<FrameSpec> {
    FrameSpec::from_path(path).with_context(|| format!("load spec {}", path.display()))
}

pub fn read_labels(path: &Path) -> Result<LabelMapping> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    LabelMapping::from_json_str(&text).with_context(|| format!("parse labels {}", path.display()))
}

pub fn read_result(path: &Path) -> Result<AlgorithmResult> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    AlgorithmResult::from_json(&value).with_context(|| format!("algorithm result {}", path.display()))
}

/// Table plus spec, with optional `column=separator` explodes applied before
/// anything is indexed.
pub fn build_engine(table: &Path, spec: &Path, explode: &[(String, String)]) -> Result<NetFrame> {
    let mut frame = read_frame(table)?;
    for (column, separator) in explode {
        frame.explode(column, separator)?;
    }
    let spec = read_spec(spec)?;
    let nf = NetFrame::from_spec(frame, &spec)?;
    tracing::info!(
        table = %table.display(),
        nodes = nf.node_index().len(),
        edges = nf.edge_index().len(),
        "built engine"
    );
    Ok(nf)
}

/// `name=value` as used by `--overlay` and `--explode`.
pub fn parse_key_value(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected `name=value`, got `{raw}`"))?;
    if key.is_empty() {
        return Err(anyhow!("empty name in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

pub fn parse_overlay(raw: &str) -> Result<(String, PathBuf)> {
    let (name, path) = parse_key_value(raw)?;
    Ok((name, PathBuf::from(path)))
}

/// Pretty JSON to `out`, or to stdout when no path is given.
pub fn write_json<T: serde::Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
        }
        None => println!("{text}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_splits_on_first_equals() {
        assert_eq!(
            parse_key_value("kings=a=b").unwrap(),
            ("kings".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn explode_argument_keeps_separator() {
        let (column, sep) = parse_key_value("king=,").unwrap();
        assert_eq!(column, "king");
        assert_eq!(sep, ",");
    }
}
