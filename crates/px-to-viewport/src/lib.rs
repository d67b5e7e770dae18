//! Rewrites absolute lengths (`px` by default) in stylesheets into viewport
//! units (`vw` by default), as a plugin over the `px-to-viewport-postcss`
//! tree.
//!
//! ```no_run
//! use px_to_viewport::{processor, PxToViewportOptions};
//!
//! let processor = processor(PxToViewportOptions::default())?;
//! let output = processor.process("h1 { margin: 0 0 20px; }")?;
//! assert_eq!(output.css(), "h1 { margin: 0 0 6.25vw; }");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod converter;
pub mod directives;
pub mod error;
pub mod file_filter;
pub mod landscape;
pub mod plugin;
pub mod prop_list;
pub mod scope;
pub mod selector;
pub mod unit_matcher;

pub use config::{PxToViewportOptions, SerializablePxToViewportOptions};
pub use error::ConfigError;
pub use file_filter::Matcher;
pub use plugin::{PxToViewport, PLUGIN_NAME};
pub use px_to_viewport_postcss::{ProcessOptions, ProcessResult, Processor, ProcessorError};
pub use selector::SelectorPattern;

/// Build a processor running the conversion with `options`.
pub fn processor(options: PxToViewportOptions) -> Result<Processor, ConfigError> {
  Ok(Processor::new().with_plugin(PxToViewport::new(options)?))
}
