// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod board;
pub mod generate;
pub mod resolve;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use cide_adapters::{LocalProcessAdapter, NotifyAdapter, StatusSink};
use cide_compdb::{CompdbController, CompdbService, ControllerDeps, PackageResolver};
use cide_core::{Board, SourceRoot};

use crate::config::{Config, ConfiguredBoard};
use crate::env;
use crate::output::OutputFormat;

pub type Controller<N> = CompdbController<LocalProcessAdapter, N, ConfiguredBoard>;

/// Settings shared by every command.
pub struct Context {
    pub config_dir: PathBuf,
    pub config: Config,
    pub format: OutputFormat,
}

impl Context {
    pub fn load(format: OutputFormat) -> Result<Self> {
        let config_dir = env::config_dir()?;
        let config = Config::load(&config_dir)?;
        Ok(Self { config_dir, config, format })
    }

    pub fn resolver(&self) -> PackageResolver {
        let resolver = PackageResolver::new(self.config.mapping.into());
        match &self.config.source_root {
            Some(root) => resolver.with_source_root(SourceRoot::new(root)),
            None => resolver,
        }
    }

    /// Board precedence: command-line flag, then `CIDE_BOARD`, then config.
    pub fn boards(&self, flag: Option<Board>) -> ConfiguredBoard {
        ConfiguredBoard::new(flag.or_else(env::board_override), &self.config_dir)
    }

    pub fn controller<N: NotifyAdapter>(
        &self,
        notifier: N,
        status: Arc<dyn StatusSink>,
        board: Option<Board>,
    ) -> Controller<N> {
        let service = CompdbService::new(Arc::new(LocalProcessAdapter::new()), env::chroot_mode())
            .log_to(Arc::clone(&status));
        CompdbController::new(ControllerDeps {
            resolver: self.resolver(),
            service,
            notifier,
            boards: self.boards(board),
            status,
        })
    }
}

/// Parse a `--board` value.
pub fn parse_board(s: &str) -> Result<Board, String> {
    Board::parse(s).ok_or_else(|| "board name must not be empty".to_string())
}
