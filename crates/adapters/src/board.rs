// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Board selection.

use async_trait::async_trait;
use cide_core::Board;

/// Supplies the board generation requests are made for.
#[async_trait]
pub trait BoardProvider: Send + Sync + 'static {
    /// The configured board, or `None` when no board is available (for
    /// example the user dismissed the selection flow). Callers skip work
    /// rather than fail when this is `None`.
    async fn board(&self) -> Option<Board>;
}

/// Always answers with the same board (or none).
#[derive(Debug, Clone, Default)]
pub struct FixedBoard(pub Option<Board>);

impl FixedBoard {
    pub fn new(board: Board) -> Self {
        Self(Some(board))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

#[async_trait]
impl BoardProvider for FixedBoard {
    async fn board(&self) -> Option<Board> {
        self.0.clone()
    }
}
