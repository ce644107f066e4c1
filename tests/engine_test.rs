//! Integration tests for folder validation
//!
//! Builds small content-addressed stores on disk and checks classification,
//! counting and exclusion across worker counts and multiple roots.

use refcheck::prelude::*;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const EMPTY_HASH: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
const X_HASH: &str = "2d711642b726b04401627ca9fbac32f5c8530fb1903cc4db02258717921a4881";
const NO_TEMPLATES: &[&str] = &[];

fn sha256_hex(content: &[u8]) -> String {
    format!("{:x}", Sha256::digest(content))
}

/// Store an intact blob the way restic lays out its data directory.
fn write_blob(root: &Path, content: &[u8]) -> PathBuf {
    let name = sha256_hex(content);
    let dir = root.join("data").join(&name[..2]);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(&name);
    fs::write(&path, content).unwrap();
    path
}

/// 20 intact, 5 corrupted, 3 invalid names, 2 junk files.
fn populated_store() -> TempDir {
    let dir = TempDir::new().unwrap();
    for i in 0..20 {
        write_blob(dir.path(), format!("blob {}", i).as_bytes());
    }
    for i in 0..5 {
        let path = write_blob(dir.path(), format!("tampered {}", i).as_bytes());
        fs::write(&path, format!("tampered {} with extra bytes", i)).unwrap();
    }
    let uppercase = "A".repeat(64);
    for name in ["README", "index.tmp", uppercase.as_str()] {
        fs::write(dir.path().join(name), b"not content addressed").unwrap();
    }
    fs::create_dir_all(dir.path().join("junk")).unwrap();
    fs::write(dir.path().join("junk").join(".DS_Store"), b"finder").unwrap();
    fs::write(dir.path().join("junk").join("Thumbs.db"), b"explorer").unwrap();
    dir
}

fn counts(report: &Report) -> (usize, usize, usize, usize) {
    (
        report.total_files,
        report.intact_files,
        report.corrupted_files,
        report.invalid_files,
    )
}

/// Empty file named after the empty digest, same name holding "x", and a
/// file whose name is not a digest.
#[test]
fn test_end_to_end_scenario() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(EMPTY_HASH), b"").unwrap();
    let sub = dir.path().join("copy");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join(EMPTY_HASH), b"x").unwrap();
    fs::write(dir.path().join("not-a-hash"), b"").unwrap();

    let report = process_folder(dir.path(), &ExclusionFilter::none(), &Options::new(4)).unwrap();

    assert_eq!(counts(&report), (3, 1, 1, 1));
    assert_eq!(report.corrupted_file_list.len(), 1);
    assert_eq!(report.corrupted_file_list[0].actual_hash, X_HASH);
    assert_eq!(report.corrupted_file_list[0].expected_hash, EMPTY_HASH);
    assert_eq!(report.invalid_file_list, vec![dir.path().join("not-a-hash")]);
}

#[test]
fn test_counts_identical_across_worker_counts() {
    let store = populated_store();
    let filter = ExclusionFilter::none();

    let mut seen = Vec::new();
    for workers in [1, 4, 16] {
        let report = process_folder(store.path(), &filter, &Options::new(workers)).unwrap();
        assert_eq!(
            report.intact_files + report.corrupted_files + report.invalid_files,
            report.total_files
        );
        assert_eq!(report.corrupted_file_list.len(), report.corrupted_files);
        assert_eq!(report.invalid_file_list.len(), report.invalid_files);
        seen.push(counts(&report));
    }

    assert_eq!(seen[0], (30, 20, 5, 5));
    assert!(seen.iter().all(|c| *c == seen[0]), "{:?}", seen);
}

#[test]
fn test_corrupted_reports_true_digest() {
    let store = populated_store();
    let report = process_folder(store.path(), &ExclusionFilter::none(), &Options::new(4)).unwrap();

    for corrupted in &report.corrupted_file_list {
        let content = fs::read(&corrupted.file_path).unwrap();
        assert_eq!(corrupted.actual_hash, sha256_hex(&content));
        assert_ne!(corrupted.actual_hash, corrupted.expected_hash);
        assert_eq!(
            corrupted.file_path.file_name().unwrap().to_str().unwrap(),
            corrupted.expected_hash
        );
    }
}

#[test]
fn test_uppercase_digest_name_is_invalid() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(EMPTY_HASH.to_uppercase()), b"").unwrap();

    let report = process_folder(dir.path(), &ExclusionFilter::none(), &Options::new(1)).unwrap();
    assert_eq!(counts(&report), (1, 0, 0, 1));
}

#[test]
fn test_excluded_files_never_counted() {
    let store = populated_store();
    let templates = TemplateSet::from_iter([("windows", [r"Thumbs\.db"])]);
    let filter = ExclusionFilter::build(&["README", r"\.tmp$"], &["darwin", "windows"], &templates)
        .unwrap();
    // "darwin" is unknown in this template set and contributes nothing.
    let report = process_folder(store.path(), &filter, &Options::new(4)).unwrap();

    assert_eq!(counts(&report), (27, 20, 5, 2));
    let listed: Vec<String> = report
        .invalid_file_list
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    assert!(listed.iter().all(|p| !p.contains("README") && !p.ends_with(".tmp")));
    assert!(listed.iter().any(|p| p.ends_with(".DS_Store")));
}

#[test]
fn test_builtin_templates_exclude_store_metadata() {
    let store = populated_store();
    fs::write(store.path().join("config"), b"repository config").unwrap();

    let filter = ExclusionFilter::build(NO_TEMPLATES, &["restic", "darwin"], &TemplateSet::builtin())
        .unwrap();
    let report = process_folder(store.path(), &filter, &Options::new(2)).unwrap();

    // config and .DS_Store are skipped; Thumbs.db is still an invalid name.
    assert_eq!(counts(&report), (29, 20, 5, 4));
}

#[test]
fn test_empty_exclusion_set_excludes_nothing() {
    let store = populated_store();
    let filter = ExclusionFilter::build(NO_TEMPLATES, NO_TEMPLATES, &TemplateSet::builtin()).unwrap();

    let filtered = process_folder(store.path(), &filter, &Options::new(4)).unwrap();
    let unfiltered = process_folder(store.path(), &ExclusionFilter::none(), &Options::new(4)).unwrap();
    assert_eq!(counts(&filtered), counts(&unfiltered));
}

#[test]
fn test_empty_folder() {
    let dir = TempDir::new().unwrap();
    let report = process_folder(dir.path(), &ExclusionFilter::none(), &Options::new(4)).unwrap();
    assert_eq!(counts(&report), (0, 0, 0, 0));
    assert_eq!(report.errored_files, 0);
}

#[test]
fn test_missing_root_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");

    let err = process_folder(&missing, &ExclusionFilter::none(), &Options::new(2)).unwrap_err();
    assert!(matches!(err, Error::Walk { .. }), "{:?}", err);
}

#[test]
fn test_multiple_roots_in_order() {
    let first = populated_store();
    let second = TempDir::new().unwrap();
    write_blob(second.path(), b"only blob");

    let roots = [first.path(), second.path()];
    let reports = process_all(&roots, &ExclusionFilter::none(), &Options::new(4)).unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].folder_path, first.path());
    assert_eq!(reports[1].folder_path, second.path());
    assert_eq!(counts(&reports[1]), (1, 1, 0, 0));
}

#[test]
fn test_second_root_missing_fails_whole_run() {
    let first = populated_store();
    let missing = first.path().join("nope");

    let roots = [first.path().to_path_buf(), missing.clone()];
    let err = process_all(&roots, &ExclusionFilter::none(), &Options::new(4)).unwrap_err();
    match err {
        Error::Walk { root, .. } => assert_eq!(root, missing),
        other => panic!("expected walk error, got {:?}", other),
    }
}

#[test]
fn test_zero_workers_is_configuration_error() {
    let store = populated_store();
    let err = process_all(&[store.path()], &ExclusionFilter::none(), &Options::new(0)).unwrap_err();
    assert!(matches!(err, Error::InvalidWorkerCount));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped_not_counted() {
    use std::os::unix::fs::PermissionsExt;

    let store = populated_store();
    let locked = write_blob(store.path(), b"locked blob");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits; nothing to observe in that case.
    if fs::File::open(&locked).is_ok() {
        return;
    }

    let report = process_folder(store.path(), &ExclusionFilter::none(), &Options::new(4)).unwrap();
    assert_eq!(counts(&report), (30, 20, 5, 5));
    assert_eq!(report.errored_files, 1);
    assert_eq!(report.errored_file_list[0].file_path, locked);
}
