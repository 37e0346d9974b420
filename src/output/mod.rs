mod json;
mod terminal;

pub use json::output_json;
pub use terminal::{render_classifications, render_evaluation};

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored human-readable report
    Terminal,
    /// Machine-readable report
    Json,
}
