use mask_core::{CursorEdit, EditType, MaskConfig, MaskModifiers, MaskResult, apply_mask};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const MASK_FORMAT: &str = "mask-case-v1";
const EDIT_FORMAT: &str = "mask-edit-v1";

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
enum FixtureStatus {
    #[default]
    Active,
    Xfail,
    Skip,
}

#[derive(Debug, Deserialize)]
struct MaskFixtureFile {
    format: String,
    #[serde(default)]
    status: FixtureStatus,
    reason: Option<String>,
    pattern: String,
    #[serde(default)]
    modifiers: Vec<String>,
    #[serde(rename = "case", default)]
    cases: Vec<MaskCase>,
}

#[derive(Debug, Deserialize)]
struct MaskCase {
    raw: String,
    masked: String,
    unmasked: String,
}

#[derive(Debug, Deserialize)]
struct EditFixtureFile {
    format: String,
    #[serde(default)]
    status: FixtureStatus,
    reason: Option<String>,
    pattern: String,
    #[serde(default)]
    modifiers: Vec<String>,
    #[serde(rename = "edit", default)]
    edits: Vec<EditCase>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
enum EditKind {
    Insert,
    Delete,
    Unknown,
}

impl From<EditKind> for EditType {
    fn from(kind: EditKind) -> Self {
        match kind {
            EditKind::Insert => EditType::Insert,
            EditKind::Delete => EditType::Delete,
            EditKind::Unknown => EditType::Unknown,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EditCase {
    previous: String,
    raw: String,
    origin: usize,
    kind: EditKind,
    masked: String,
    cursor: usize,
}

struct FixtureFilter {
    raw: Option<String>,
}

impl FixtureFilter {
    fn matches(&self, name: &str) -> bool {
        let Some(filter) = &self.raw else {
            return true;
        };
        name.contains(filter)
    }
}

fn fixture_filter() -> FixtureFilter {
    FixtureFilter {
        raw: env::var("MASKFIELD_FIXTURE").ok(),
    }
}

fn fixture_root(kind: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(kind)
}

/// `(name, path, contents)` for every `.toml` file under `kind`, sorted by name.
fn load_fixture_files(kind: &str) -> Vec<(String, PathBuf, String)> {
    let root = fixture_root(kind);
    let mut entries: Vec<_> = fs::read_dir(&root)
        .unwrap_or_else(|err| panic!("failed to read fixture root {root:?}: {err}"))
        .filter_map(Result::ok)
        .collect();
    entries.sort_by_key(|entry| entry.file_name());

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            continue;
        }
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        if name.starts_with('.') {
            continue;
        }
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("failed to read fixture {path:?}: {err}"));
        files.push((name, path, content));
    }
    files
}

fn modifiers_of(names: &[String], path: &Path) -> MaskModifiers {
    MaskModifiers::from_names(names)
        .unwrap_or_else(|err| panic!("bad modifiers in {}: {err}", path.display()))
}

fn check_status(status: FixtureStatus, reason: &Option<String>, path: &Path) {
    if status != FixtureStatus::Active && reason.as_deref().is_none_or(str::is_empty) {
        panic!("fixture {} is {status:?} without a reason", path.display());
    }
}

fn enforce_expected(name: &str, path: &Path, status: FixtureStatus, reason: &Option<String>, failures: &[String]) {
    match status {
        FixtureStatus::Active => {
            if !failures.is_empty() {
                panic!(
                    "mismatch in fixture '{name}'\npath: {}\n{}",
                    path.display(),
                    failures.join("\n")
                );
            }
        }
        FixtureStatus::Xfail => {
            if failures.is_empty() {
                panic!(
                    "fixture '{name}' matched every case but is marked xfail; reason: {}\npath: {}",
                    reason.as_deref().unwrap_or("<missing reason>"),
                    path.display()
                );
            }
        }
        FixtureStatus::Skip => {}
    }
}

#[test]
fn golden_mask_cases() {
    let filter = fixture_filter();
    let mut ran = 0usize;
    for (name, path, content) in load_fixture_files("masks") {
        if !filter.matches(&name) {
            continue;
        }
        let fixture: MaskFixtureFile = toml::from_str(&content)
            .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
        assert_eq!(
            fixture.format,
            MASK_FORMAT,
            "unsupported fixture format in {}",
            path.display()
        );
        check_status(fixture.status, &fixture.reason, &path);
        assert!(!fixture.cases.is_empty(), "no cases in {}", path.display());
        ran += 1;
        if fixture.status == FixtureStatus::Skip {
            continue;
        }

        let config = MaskConfig::new(fixture.pattern.clone(), modifiers_of(&fixture.modifiers, &path));
        let mut failures = Vec::new();
        for (i, case) in fixture.cases.iter().enumerate() {
            let actual = config.apply(&case.raw);
            let expected = MaskResult {
                masked: case.masked.clone(),
                unmasked: case.unmasked.clone(),
            };
            if actual != expected {
                failures.push(format!(
                    "case {i} raw={:?}\n  expected: {expected:?}\n  actual:   {actual:?}",
                    case.raw
                ));
            }
        }
        enforce_expected(&name, &path, fixture.status, &fixture.reason, &failures);
    }
    assert!(ran > 0, "no fixtures matched filter");
}

#[test]
fn golden_mask_cases_remask_stably() {
    // Masking the unmasked value again yields the same display and data.
    let filter = fixture_filter();
    for (name, path, content) in load_fixture_files("masks") {
        if !filter.matches(&name) {
            continue;
        }
        let fixture: MaskFixtureFile = toml::from_str(&content)
            .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
        if fixture.status != FixtureStatus::Active {
            continue;
        }
        let config = MaskConfig::new(fixture.pattern.clone(), modifiers_of(&fixture.modifiers, &path));
        for case in &fixture.cases {
            let first = apply_mask(&case.raw, config.tokens(), config.modifiers());
            let again = apply_mask(&first.unmasked, config.tokens(), config.modifiers());
            assert_eq!(again, first, "fixture '{name}' raw={:?}", case.raw);
        }
    }
}

#[test]
fn golden_edit_cases() {
    let filter = fixture_filter();
    let mut ran = 0usize;
    for (name, path, content) in load_fixture_files("edits") {
        if !filter.matches(&name) {
            continue;
        }
        let fixture: EditFixtureFile = toml::from_str(&content)
            .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
        assert_eq!(
            fixture.format,
            EDIT_FORMAT,
            "unsupported fixture format in {}",
            path.display()
        );
        check_status(fixture.status, &fixture.reason, &path);
        assert!(!fixture.edits.is_empty(), "no edits in {}", path.display());
        ran += 1;
        if fixture.status == FixtureStatus::Skip {
            continue;
        }

        let config = MaskConfig::new(fixture.pattern.clone(), modifiers_of(&fixture.modifiers, &path));
        let mut failures = Vec::new();
        for (i, case) in fixture.edits.iter().enumerate() {
            let edit = CursorEdit::new(
                case.previous.clone(),
                case.raw.clone(),
                case.origin,
                case.kind.into(),
            );
            let outcome = config.apply_edit(&edit);
            // No active mask means the native caret stays where it is.
            let cursor = outcome.cursor.unwrap_or(case.origin);
            if outcome.masked != case.masked || cursor != case.cursor {
                failures.push(format!(
                    "edit {i} {:?} -> {:?} at {} ({:?})\n  expected: {:?} caret {}\n  actual:   {:?} caret {}",
                    case.previous,
                    case.raw,
                    case.origin,
                    case.kind,
                    case.masked,
                    case.cursor,
                    outcome.masked,
                    cursor
                ));
            }
        }
        enforce_expected(&name, &path, fixture.status, &fixture.reason, &failures);
    }
    assert!(ran > 0, "no fixtures matched filter");
}
