// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cide-core: data model shared by the compdb pipeline and its adapters

pub mod board;
pub mod compdb;
pub mod package;
pub mod source_root;

pub use board::{Board, HOST_BOARD_NAME};
pub use compdb::{CompdbParseError, CompilationDatabase, CompileCommand, COMPDB_FILE_NAME};
pub use package::{Atom, AtomParseError, PackageInfo};
pub use source_root::{SourceRoot, CHROOT_DIR_NAME, CHROOT_SOURCE_MOUNT};
