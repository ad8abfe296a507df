use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};

use crate::error::{ConsolidateError, FileParseError};
use crate::report::Reporter;

/// Name of the consolidated file; never read back as input.
pub const OUTPUT_FILE_NAME: &str = "leads.json";

/// Field added to singleton records.
pub const SOURCE_FIELD: &str = "_source";

/// What a scan of the data folder produced, before anything is written.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub records: Vec<Value>,
    pub files_read: usize,
    pub files_failed: usize,
}

/// Result of a run that wrote `leads.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub records: usize,
    pub files_read: usize,
    pub files_failed: usize,
    pub output: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Consolidator {
    data_dir: PathBuf,
    output: PathBuf,
}

impl Consolidator {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let output = data_dir.join(OUTPUT_FILE_NAME);
        Self { data_dir, output }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Read every input file and merge the records in file-name order.
    ///
    /// Unreadable or malformed files are reported and skipped; only a
    /// missing folder, a failing directory listing or a reporter that can no
    /// longer write aborts the scan.
    pub fn scan<R: Reporter + ?Sized>(&self, reporter: &mut R) -> Result<ScanOutcome, ConsolidateError> {
        if !self.data_dir.is_dir() {
            return Err(ConsolidateError::DirectoryNotFound { path: self.data_dir.clone() });
        }

        let files = collect_json_files(&self.data_dir)?;
        info!("Found {} input file(s) in {}", files.len(), self.data_dir.display());
        reporter.start(files.len())?;

        let mut outcome = ScanOutcome::default();
        for path in &files {
            let name = file_name(path);
            match read_records(path) {
                Ok(records) => {
                    debug!("{name}: {} record(s)", records.len());
                    outcome.records.extend(records);
                    outcome.files_read += 1;
                    reporter.file_ok(&name)?;
                }
                Err(err) => {
                    info!("Skipping {}: {err}", path.display());
                    outcome.files_failed += 1;
                    reporter.file_failed(&name, &err)?;
                }
            }
        }
        reporter.finish()?;

        Ok(outcome)
    }

    /// Scan, then write `leads.json` unless nothing was found.
    ///
    /// The reporter sees the summary on success and the notice for either
    /// "nothing to do" condition; other errors are left to the caller.
    pub fn run<R: Reporter + ?Sized>(&self, reporter: &mut R) -> Result<Summary, ConsolidateError> {
        info!("Consolidating {}", self.data_dir.display());
        let result = self.scan(reporter).and_then(|outcome| self.write(outcome));

        match &result {
            Ok(summary) => reporter.summary(summary)?,
            Err(err) if err.is_nothing_to_do() => {
                info!("{err}");
                reporter.nothing_to_do(err)?;
            }
            Err(_) => {}
        }
        result
    }

    fn write(&self, outcome: ScanOutcome) -> Result<Summary, ConsolidateError> {
        if outcome.records.is_empty() {
            return Err(ConsolidateError::NoRecordsFound);
        }

        write_records(&self.output, &outcome.records).map_err(|source| ConsolidateError::Write {
            path: self.output.clone(),
            source,
        })?;
        info!("Wrote {} record(s) to {}", outcome.records.len(), self.output.display());

        Ok(Summary {
            records: outcome.records.len(),
            files_read: outcome.files_read,
            files_failed: outcome.files_failed,
            output: self.output.clone(),
        })
    }
}

/// Entries of `dir` named `*.json`, sorted by name, without `leads.json`.
pub fn collect_json_files(dir: &Path) -> Result<Vec<PathBuf>, ConsolidateError> {
    let list_err = |source| ConsolidateError::ListDir { path: dir.to_path_buf(), source };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let name = entry.file_name();
        if !name.as_encoded_bytes().ends_with(b".json") {
            continue;
        }
        if name == OUTPUT_FILE_NAME {
            debug!("Ignoring previous {OUTPUT_FILE_NAME}");
            continue;
        }
        files.push(entry.path());
    }
    files.sort_unstable_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Load one file and turn its contents into output records.
pub fn read_records(path: &Path) -> Result<Vec<Value>, FileParseError> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    into_records(value, &file_name(path))
}

/// Arrays are spread, objects get a `_source` field, primitives are refused.
pub fn into_records(value: Value, source: &str) -> Result<Vec<Value>, FileParseError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => {
            obj.insert(SOURCE_FIELD.to_string(), Value::String(source.to_string()));
            Ok(vec![Value::Object(obj)])
        }
        other => Err(FileParseError::NotAnnotatable { kind: json_kind(&other) }),
    }
}

/// Write `records` as a JSON array, two-space indent, non-ASCII kept as is.
pub fn write_records(path: &Path, records: &[Value]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut ser = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"  "));
    records.serialize(&mut ser)?;
    writer.flush()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn arrays_are_spread_untouched() {
        let records = into_records(json!([{"x": 1}, {"x": 2}]), "a.json").unwrap();
        assert_eq!(records, vec![json!({"x": 1}), json!({"x": 2})]);
    }

    #[test]
    fn objects_get_source_as_last_key() {
        let records = into_records(json!({"z": 1, "a": 2}), "b.json").unwrap();
        assert_eq!(records, vec![json!({"z": 1, "a": 2, "_source": "b.json"})]);

        let keys: Vec<&str> = records[0].as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "_source"]);
    }

    #[test]
    fn existing_source_is_overwritten_in_place() {
        let records = into_records(json!({"_source": "old", "n": 1}), "new.json").unwrap();
        let obj = records[0].as_object().unwrap();
        assert_eq!(obj["_source"], json!("new.json"));
        assert_eq!(obj.keys().next().map(String::as_str), Some("_source"));
    }

    #[test]
    fn primitives_are_refused() {
        for (value, kind) in [
            (json!(42), "number"),
            (json!("lead"), "string"),
            (json!(true), "boolean"),
            (Value::Null, "null"),
        ] {
            match into_records(value, "p.json") {
                Err(FileParseError::NotAnnotatable { kind: k }) => assert_eq!(k, kind),
                other => panic!("expected NotAnnotatable, got {other:?}"),
            }
        }
    }

    #[test]
    fn listing_is_sorted_and_skips_output_and_other_extensions() {
        let dir = tempdir().unwrap();
        for name in ["b.json", "a.json", "leads.json", "notes.txt", "c.json.bak", "C.json"] {
            fs::write(dir.path().join(name), "[]").unwrap();
        }

        let names: Vec<String> = collect_json_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| file_name(p))
            .collect();
        assert_eq!(names, vec!["C.json", "a.json", "b.json"]);
    }

    #[test]
    fn unreadable_and_malformed_files_are_file_errors() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(read_records(&bad), Err(FileParseError::Json(_))));

        let missing = dir.path().join("gone.json");
        assert!(matches!(read_records(&missing), Err(FileParseError::Read(_))));
    }

    #[test]
    fn written_output_uses_two_space_indent() {
        let dir = tempdir().unwrap();
        let out = dir.path().join(OUTPUT_FILE_NAME);
        write_records(&out, &[json!({"x": 1}), json!([])]).unwrap();

        let text = fs::read_to_string(&out).unwrap();
        assert_eq!(text, "[\n  {\n    \"x\": 1\n  },\n  []\n]");
    }
}
