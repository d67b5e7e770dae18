//! Comment directives understood inside stylesheets:
//!
//! - `/* px-to-viewport-ignore-next */` before a declaration skips it.
//! - `/* px-to-viewport-ignore */` after a declaration, on the same line,
//!   skips it.
//! - `/* px-to-viewport-define viewportWidth=750, landscapeWidth=1334 */`
//!   at the top level overrides the reference widths for the rest of the
//!   stylesheet.

use once_cell::sync::Lazy;
use px_to_viewport_postcss::{Node, NodeRef, Result as PostcssResult, WarningOptions};
use regex::Regex;

pub const IGNORE_NEXT: &str = "px-to-viewport-ignore-next";
pub const IGNORE: &str = "px-to-viewport-ignore";

static DEFINE_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^px-to-viewport-define ([a-zA-Z0-9,= ]+)").unwrap());

fn comment_text(node: &NodeRef) -> Option<String> {
  node.borrow().as_comment().map(|comment| comment.text.clone())
}

/// Check the comments around `decl` for ignore directives, consuming the
/// ones that apply. Returns `true` when the declaration must not be
/// converted.
///
/// A trailing ignore comment on its own line does not apply: a warning is
/// recorded, the comment stays and the declaration is converted.
pub fn should_skip(decl: &NodeRef, result: &mut PostcssResult) -> bool {
  if let Some(prev) = Node::prev(decl) {
    if comment_text(&prev).as_deref() == Some(IGNORE_NEXT) {
      Node::remove_self(&prev);
      return true;
    }
  }

  let Some(next) = Node::next(decl) else {
    return false;
  };
  if comment_text(&next).as_deref() != Some(IGNORE) {
    return false;
  }

  let on_own_line = next
    .borrow()
    .raws
    .get_text("before")
    .is_some_and(|before| before.contains('\n'));
  if on_own_line {
    result.warn(
      format!(
        "Unexpected comment /* {} */ must be after declaration at same line.",
        IGNORE
      ),
      WarningOptions::new().node(next.clone()),
    );
    return false;
  }

  Node::remove_self(&next);
  true
}

/// Reference widths set by define directives.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Overrides {
  pub viewport_width: Option<f64>,
  pub landscape_width: Option<f64>,
}

impl Overrides {
  /// Parse the text of a comment. Returns `None` when it is not a define
  /// directive. Unknown keys, items without `=` and values that are not
  /// positive numbers are dropped.
  pub fn parse(text: &str) -> Option<Self> {
    let captures = DEFINE_RE.captures(text)?;
    let body = captures.get(1)?.as_str();

    let mut overrides = Overrides::default();
    for item in body.split(',') {
      let Some((key, value)) = item.split_once('=') else {
        continue;
      };
      let Ok(value) = value.trim().parse::<f64>() else {
        continue;
      };
      if !value.is_finite() || value <= 0.0 {
        continue;
      }

      match key.trim() {
        "viewportWidth" => overrides.viewport_width = Some(value),
        "landscapeWidth" => overrides.landscape_width = Some(value),
        _ => {}
      }
    }

    Some(overrides)
  }

  /// Keys set in `other` replace ours; the rest are kept.
  pub fn merge(&mut self, other: Overrides) {
    if other.viewport_width.is_some() {
      self.viewport_width = other.viewport_width;
    }
    if other.landscape_width.is_some() {
      self.landscape_width = other.landscape_width;
    }
  }

  /// Merge the directive in `text`, if any. Returns whether it was one.
  pub fn apply_comment(&mut self, text: &str) -> bool {
    match Overrides::parse(text) {
      Some(overrides) => {
        self.merge(overrides);
        true
      }
      None => false,
    }
  }

  pub fn viewport_width_or(&self, default: f64) -> f64 {
    self.viewport_width.unwrap_or(default)
  }

  pub fn landscape_width_or(&self, default: f64) -> f64 {
    self.landscape_width.unwrap_or(default)
  }
}
