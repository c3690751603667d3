// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const SAMPLE: &str = r#"[
  {
    "directory": "/build/amd64-generic/tmp/portage/chromeos-base/codelab-9999/work/build/out/Default",
    "command": "clang++ -c ../../codelab/codelab.cc -o obj/codelab.o",
    "file": "../../codelab/codelab.cc",
    "output": "obj/codelab.o"
  },
  {
    "directory": "/mnt/host/source/src/platform2/codelab",
    "command": "clang++ -c /mnt/host/source/src/platform2/codelab/main.cc",
    "file": "/mnt/host/source/src/platform2/codelab/main.cc"
  }
]"#;

#[test]
fn parses_standard_format() {
    let db = CompilationDatabase::from_slice(SAMPLE.as_bytes()).unwrap();
    assert_eq!(db.len(), 2);
    assert_eq!(db.entries[0].output, Some(PathBuf::from("obj/codelab.o")));
    assert_eq!(db.entries[1].output, None);
}

#[test]
fn empty_array_is_valid() {
    let db = CompilationDatabase::from_slice(b"[]").unwrap();
    assert!(db.is_empty());
}

#[test]
fn accepts_arguments_form() {
    let json = r#"[{"directory": "/d", "arguments": ["cc", "-c", "a.c"], "file": "a.c"}]"#;
    let db = CompilationDatabase::from_slice(json.as_bytes()).unwrap();
    assert_eq!(db.entries[0].arguments, vec!["cc", "-c", "a.c"]);
    assert!(db.entries[0].command.is_empty());
}

#[test]
fn rejects_non_array() {
    assert!(CompilationDatabase::from_slice(br#"{"file": "a.c"}"#).is_err());
    assert!(CompilationDatabase::from_slice(b"not json").is_err());
}

#[test]
fn resolves_relative_files_against_directory() {
    let db = CompilationDatabase::from_slice(SAMPLE.as_bytes()).unwrap();
    let files: Vec<PathBuf> = db.referenced_files().collect();
    assert_eq!(
        files[0],
        PathBuf::from(
            "/build/amd64-generic/tmp/portage/chromeos-base/codelab-9999/work/build/out/Default/../../codelab/codelab.cc"
        )
    );
    assert_eq!(files[1], PathBuf::from("/mnt/host/source/src/platform2/codelab/main.cc"));
}

#[test]
fn missing_files_uses_predicate() {
    let db = CompilationDatabase::from_slice(SAMPLE.as_bytes()).unwrap();
    let missing = db.missing_files(|p| p.ends_with("main.cc"));
    assert_eq!(missing.len(), 1);
    assert!(missing[0].ends_with("codelab.cc"));
}

#[test]
fn serializes_back_to_standard_keys() {
    let db = CompilationDatabase {
        entries: vec![CompileCommand {
            directory: PathBuf::from("/d"),
            command: "cc -c a.c".to_string(),
            arguments: Vec::new(),
            file: PathBuf::from("a.c"),
            output: None,
        }],
    };
    let json = serde_json::to_string(&db).unwrap();
    assert_eq!(json, r#"[{"directory":"/d","command":"cc -c a.c","file":"a.c"}]"#);
}
