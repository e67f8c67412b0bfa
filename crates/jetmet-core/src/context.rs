//! Execution context for trigger modules

use serde::{Deserialize, Serialize};

/// Execution mode that determines logging and bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Verbose per-module logging, produced collections kept in the result
    Debug,

    /// Event-by-event processing with minimal bookkeeping
    Online,

    /// Throughput over a whole event file, events spread across threads
    Bulk,
}

/// Read-only settings shared by every module call of a run
#[derive(Debug, Clone)]
pub struct Context {
    pub mode: ExecutionMode,

    /// Return produced collections with each event result
    pub keep_products: bool,

    /// Modules log per-event summaries at info level
    pub verbose: bool,
}

impl Context {
    pub fn debug() -> Self {
        Self {
            mode: ExecutionMode::Debug,
            keep_products: true,
            verbose: true,
        }
    }

    pub fn online() -> Self {
        Self {
            mode: ExecutionMode::Online,
            keep_products: false,
            verbose: false,
        }
    }

    pub fn bulk() -> Self {
        Self {
            mode: ExecutionMode::Bulk,
            keep_products: false,
            verbose: false,
        }
    }

    pub fn new(mode: ExecutionMode) -> Self {
        match mode {
            ExecutionMode::Debug => Self::debug(),
            ExecutionMode::Online => Self::online(),
            ExecutionMode::Bulk => Self::bulk(),
        }
    }

    /// Keep produced collections regardless of mode
    pub fn with_products(mut self) -> Self {
        self.keep_products = true;
        self
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::online()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_context_keeps_products() {
        let ctx = Context::debug();
        assert_eq!(ctx.mode, ExecutionMode::Debug);
        assert!(ctx.keep_products);
        assert!(ctx.verbose);
    }

    #[test]
    fn test_bulk_context_with_products() {
        let ctx = Context::new(ExecutionMode::Bulk).with_products();
        assert_eq!(ctx.mode, ExecutionMode::Bulk);
        assert!(ctx.keep_products);
        assert!(!ctx.verbose);
    }

    #[test]
    fn test_default_is_online() {
        assert_eq!(Context::default().mode, ExecutionMode::Online);
    }
}
