//! Resolver configuration

use serde::{Deserialize, Serialize};

/// Default bound on driver iterations plus nested resolutions
pub const DEFAULT_MAX_REC_DEPTH: usize = 512;

/// Configuration for synthetic metavariable resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Maximum recursion depth. Every driver iteration and every nested
    /// resolution consumes one level; exceeding it is fatal.
    pub max_rec_depth: usize,
    /// Report stuck type class problems even when errors were already
    /// logged. Stuck problems are often a consequence of earlier errors.
    pub report_stuck_tc: bool,
    /// Append the macro expansion stack to error messages
    pub show_macro_stack: bool,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            max_rec_depth: DEFAULT_MAX_REC_DEPTH,
            report_stuck_tc: true,
            show_macro_stack: false,
        }
    }
}

impl SynthConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_rec_depth(mut self, depth: usize) -> Self {
        self.max_rec_depth = depth;
        self
    }

    #[must_use]
    pub fn report_stuck_tc(mut self, report: bool) -> Self {
        self.report_stuck_tc = report;
        self
    }

    #[must_use]
    pub fn show_macro_stack(mut self, show: bool) -> Self {
        self.show_macro_stack = show;
        self
    }
}
