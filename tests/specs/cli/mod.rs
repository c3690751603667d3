// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod board;
#[cfg(unix)]
mod generate;
mod help;
mod resolve;
mod watch;
