// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn board() -> Board {
    Board::Named("amd64-generic".to_string())
}

fn atom() -> Atom {
    Atom::new("chromeos-base", "codelab")
}

fn all_errors() -> Vec<CompdbError> {
    vec![
        CompdbError::RemoveCache { cache: PathBuf::from("/build/x/.configured"), source: None },
        CompdbError::RunEbuild { board: board(), atom: atom(), source: None },
        CompdbError::NotGenerated { atom: atom(), source: None },
        CompdbError::CopyFailed {
            destination: PathBuf::from("/src/platform2/codelab/compile_commands.json"),
            source: None,
        },
    ]
}

#[test]
fn kinds_are_distinct() {
    let kinds: std::collections::HashSet<_> = all_errors().iter().map(CompdbError::kind).collect();
    assert_eq!(kinds.len(), 4);
}

#[test]
fn every_kind_has_a_message_and_one_remedy() {
    for err in all_errors() {
        assert!(err.user_message().starts_with("Failed to generate cross reference"));
        assert!(err.remedy().is_some(), "{:?} has no remedy", err.kind());
    }
}

#[test]
fn remove_cache_message_names_the_file() {
    let err = CompdbError::RemoveCache { cache: PathBuf::from("/build/x/.configured"), source: None };
    assert!(err.user_message().contains("/build/x/.configured"));
    assert_eq!(err.remedy(), Some(Remedy::OpenDocs));
}

#[test]
fn run_ebuild_message_suggests_build_commands() {
    let err = CompdbError::RunEbuild { board: board(), atom: atom(), source: None };
    let msg = err.user_message();
    assert!(msg.contains("cros_workon --board=amd64-generic start codelab"), "{msg}");
    assert!(msg.contains("emerge-amd64-generic chromeos-base/codelab"), "{msg}");
}

#[test]
fn run_ebuild_with_rejected_credentials_mentions_password() {
    let err = CompdbError::RunEbuild {
        board: board(),
        atom: atom(),
        source: Some(CompdbCause::Exec(ExecError::InvalidCredential { command: "sudo x".to_string() })),
    };
    assert!(err.user_message().contains("password"));
    assert_eq!(err.kind(), CompdbErrorKind::RunEbuild);
}

#[test]
fn not_generated_suggests_filing_a_bug() {
    let err = CompdbError::NotGenerated { atom: atom(), source: None };
    assert_eq!(err.remedy(), Some(Remedy::FileBug));
}

#[test]
fn detail_includes_cause_chain() {
    let err = CompdbError::CopyFailed {
        destination: PathBuf::from("/dst"),
        source: Some(CompdbCause::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "permission denied",
        ))),
    };
    assert_eq!(err.detail(), "failed to copy compilation database to /dst: permission denied");
}

#[test]
fn kind_display() {
    assert_eq!(CompdbErrorKind::RemoveCache.to_string(), "remove_cache");
    assert_eq!(CompdbErrorKind::CopyFailed.to_string(), "copy_failed");
}
