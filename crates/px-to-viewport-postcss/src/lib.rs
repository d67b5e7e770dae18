//! A small postcss-compatible stylesheet tree: parser, stringifier,
//! depth-first visitor and a plugin pipeline collecting warnings.

pub mod ast;
pub mod css_syntax_error;
pub mod input;
pub mod parse;
pub mod processor;
pub mod result;
pub mod stringifier;
pub mod visitor;

pub use ast::nodes::*;
pub use ast::{Node, NodeData, NodeRef, RawData, RawValue, Source};
pub use css_syntax_error::CssSyntaxError;
pub use input::{Input, InputOptions, Position};
pub use parse::{parse, parse_with_options, ParseOptions};
pub use processor::{Plugin, ProcessOptions, ProcessResult, Processor, ProcessorError};
pub use result::{Result, Warning, WarningOptions};
pub use stringifier::stringify;
pub use visitor::{walk, Visitor};
