//! Canonical JSON for round artifacts.
//!
//! Object keys are emitted in byte order, arrays as given, with no whitespace
//! and no trailing newline. Two writers that agree on the value agree on the
//! bytes, which is what the run record hashes.
//!
//! Files are replaced atomically: bytes go to a sibling temp file that is
//! synced and renamed over the target. When the rename fails the target is
//! written in place instead.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde_json::Value;

use crate::IoResult;

/// Convert a serde_json `Value` to canonical JSON bytes.
pub fn to_canonical_json_bytes(v: &Value) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    write_canonical_value(v, &mut out)?;
    Ok(out)
}

/// Canonical bytes of any serializable value (goes through `Value`).
pub fn canonical_json_bytes<T: Serialize>(value: &T) -> IoResult<Vec<u8>> {
    let v = serde_json::to_value(value)?;
    Ok(to_canonical_json_bytes(&v)?)
}

/// Serialize `value` canonically and write it atomically to `path`.
pub fn write_canonical<T: Serialize>(path: &Path, value: &T) -> IoResult<()> {
    let v = serde_json::to_value(value)?;
    write_canonical_file(path, &v)?;
    tracing::debug!(path = %path.display(), "wrote canonical artifact");
    Ok(())
}

/// Replace `path` with the canonical bytes of `v`.
pub fn write_canonical_file(path: &Path, v: &Value) -> io::Result<()> {
    let bytes = to_canonical_json_bytes(v).map_err(io::Error::from)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        Some(_) => PathBuf::from("."),
        None => return Err(io::Error::new(io::ErrorKind::InvalidInput, "path has no parent")),
    };
    fs::create_dir_all(&parent)?;

    let tmp = temp_sibling(path);
    let mut tf = OpenOptions::new().write(true).create_new(true).open(&tmp)?;
    tf.write_all(&bytes)?;
    tf.sync_all()?;
    drop(tf);

    if fs::rename(&tmp, path).is_err() {
        let res: io::Result<()> = (|| {
            let mut f = OpenOptions::new().write(true).create(true).truncate(true).open(path)?;
            f.write_all(&bytes)?;
            f.sync_all()
        })();
        let _ = fs::remove_file(&tmp);
        res?;
    }
    let _ = fsync_dir(&parent);
    Ok(())
}

fn write_canonical_value(v: &Value, out: &mut Vec<u8>) -> Result<(), serde_json::Error> {
    match v {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => out.extend_from_slice(n.to_string().as_bytes()),
        // serde_json does the string escaping.
        Value::String(s) => serde_json::to_writer(&mut *out, s)?,
        Value::Array(arr) => {
            out.push(b'[');
            for (i, elem) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_canonical_value(elem, out)?;
            }
            out.push(b']');
        }
        Value::Object(map) => {
            out.push(b'{');
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            for (i, (k, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                serde_json::to_writer(&mut *out, k)?;
                out.push(b':');
                write_canonical_value(val, out)?;
            }
            out.push(b'}');
        }
    }
    Ok(())
}

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// `<name>.<pid>.<seq>.tmp` beside `target`.
fn temp_sibling(target: &Path) -> PathBuf {
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let name = target.file_name().map_or_else(|| "artifact".into(), |n| n.to_string_lossy());
    target.with_file_name(format!("{name}.{}.{seq}.tmp", std::process::id()))
}

#[cfg(unix)]
fn fsync_dir(dir: &Path) -> io::Result<()> {
    OpenOptions::new().read(true).open(dir)?.sync_all()
}

#[cfg(not(unix))]
#[inline]
fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_keys_sort_bytewise() {
        let v = json!({
            "map": { "10": {"address": "b"}, "2": {"address": "a"} },
            "tickets": [3, -1, 0]
        });
        let s = String::from_utf8(to_canonical_json_bytes(&v).unwrap()).unwrap();
        assert_eq!(s, r#"{"map":{"10":{"address":"b"},"2":{"address":"a"}},"tickets":[3,-1,0]}"#);
    }

    #[test]
    fn strings_are_escaped_and_no_trailing_newline() {
        let bytes = to_canonical_json_bytes(&json!({"label": "no \"winner\""})).unwrap();
        assert_eq!(bytes, br#"{"label":"no \"winner\""}"#);
        assert!(!bytes.ends_with(b"\n"));
    }

    #[test]
    fn atomic_write_replaces_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/draw.json");
        write_canonical_file(&path, &json!({"b": 1, "a": 2})).unwrap();
        write_canonical_file(&path, &json!({"z": [1]})).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"z":[1]}"#);

        let leftovers = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }
}
