// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cide-compdb: generate and install compilation databases for ChromiumOS
//! packages

pub mod controller;
pub mod ebuild;
pub mod error;
pub mod job;
pub mod resolver;
pub mod service;

pub use controller::{
    is_build_file, is_source_file, CompdbController, ControllerDeps, GenerationState, Outcome,
    SkipReason, STATUS_TASK,
};
pub use ebuild::{ChrootMode, Ebuild, COMPDB_ONLY_FLAGS, FULL_BUILD_FLAGS};
pub use error::{CompdbCause, CompdbError, CompdbErrorKind};
pub use job::JobManager;
pub use resolver::{MappingSource, PackageResolver};
pub use service::{publish, CompdbService};
