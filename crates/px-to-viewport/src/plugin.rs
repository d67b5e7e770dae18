use px_to_viewport_postcss::{
  Node, NodeKind, NodeRef, Plugin, ProcessorError, Result as PostcssResult, Visitor,
};

use crate::config::PxToViewportOptions;
use crate::converter::Converter;
use crate::directives::{self, Overrides};
use crate::error::ConfigError;
use crate::file_filter::is_file_excluded;
use crate::landscape::LandscapeDuplicator;
use crate::prop_list::PropListFilter;
use crate::scope::ScopeTracker;
use crate::selector::is_denied;
use crate::unit_matcher::UnitMatcher;

pub const PLUGIN_NAME: &str = "postcss-px-to-viewport";

/// Rewrites lengths in one unit (`px` by default) into viewport units.
///
/// The plugin itself only holds the resolved options and the matchers built
/// from them; every stylesheet gets its own [`ViewportPass`].
#[derive(Debug)]
pub struct PxToViewport {
  options: PxToViewportOptions,
  unit_matcher: UnitMatcher,
  prop_list: PropListFilter,
}

impl PxToViewport {
  pub fn new(options: PxToViewportOptions) -> Result<Self, ConfigError> {
    Ok(Self {
      unit_matcher: UnitMatcher::new(&options.unit_to_convert)?,
      prop_list: PropListFilter::new(&options.prop_list),
      options,
    })
  }

  /// Convert every length of `value` into `unit`, relative to `size`.
  pub fn convert_value(&self, value: &str, unit: &str, size: f64) -> String {
    let converter = Converter {
      unit,
      size,
      precision: self.options.unit_precision,
      min_pixel_value: self.options.min_pixel_value,
    };
    self
      .unit_matcher
      .replace(value, |matched, number| converter.convert(matched, number))
  }
}

impl Plugin for PxToViewport {
  fn name(&self) -> &str {
    PLUGIN_NAME
  }

  fn prepare<'a>(
    &'a self,
    _result: &mut PostcssResult,
  ) -> Result<Box<dyn Visitor + 'a>, ProcessorError> {
    Ok(Box::new(ViewportPass::new(self)))
  }
}

struct RuleFrame {
  denied: bool,
  landscape_rule: Option<NodeRef>,
}

/// State of the conversion of a single stylesheet.
pub struct ViewportPass<'a> {
  plugin: &'a PxToViewport,
  file_excluded: bool,
  rules: Vec<RuleFrame>,
  scope: ScopeTracker,
  landscape: LandscapeDuplicator,
  overrides: Overrides,
}

impl<'a> ViewportPass<'a> {
  pub fn new(plugin: &'a PxToViewport) -> Self {
    Self {
      plugin,
      file_excluded: false,
      rules: Vec::new(),
      scope: ScopeTracker::new(plugin.options.media_query),
      landscape: LandscapeDuplicator::new(),
      overrides: Overrides::default(),
    }
  }

  fn is_idle(&self) -> bool {
    self.file_excluded || self.landscape.is_emitted()
  }

  fn landscape_width(&self) -> f64 {
    self
      .overrides
      .landscape_width_or(self.plugin.options.landscape_width)
  }
}

fn declaration_exists(parent: &NodeRef, prop: &str, value: &str) -> bool {
  parent.borrow().nodes.iter().any(|node| {
    node
      .borrow()
      .as_declaration()
      .is_some_and(|decl| decl.prop == prop && decl.value == value)
  })
}

impl Visitor for ViewportPass<'_> {
  fn once(&mut self, root: &NodeRef, _result: &mut PostcssResult) -> Result<(), ProcessorError> {
    let file = root
      .borrow()
      .source
      .input
      .as_ref()
      .and_then(|input| input.file.clone());
    let options = &self.plugin.options;

    self.file_excluded = is_file_excluded(
      file.as_deref(),
      options.include.as_ref(),
      options.exclude.as_ref(),
    );
    if self.file_excluded {
      tracing::debug!(file = ?file, "skipping excluded stylesheet");
    }
    Ok(())
  }

  fn visit_root_exit(
    &mut self,
    root: &NodeRef,
    _result: &mut PostcssResult,
  ) -> Result<(), ProcessorError> {
    self.landscape.emit(root);
    self.overrides = Overrides::default();
    Ok(())
  }

  fn visit_comment(
    &mut self,
    comment: &NodeRef,
    _result: &mut PostcssResult,
  ) -> Result<(), ProcessorError> {
    let Some(parent) = Node::parent_ref(comment) else {
      return Ok(());
    };
    let at_top_level = parent.borrow().kind() == NodeKind::Root;
    if !at_top_level {
      return Ok(());
    }

    let text = comment.borrow().as_comment().map(|data| data.text.clone());
    if let Some(text) = text {
      if self.overrides.apply_comment(&text) {
        tracing::debug!(overrides = ?self.overrides, "applied define directive");
      }
    }
    Ok(())
  }

  fn visit_at_rule(
    &mut self,
    at_rule: &NodeRef,
    _result: &mut PostcssResult,
  ) -> Result<(), ProcessorError> {
    let params = at_rule
      .borrow()
      .as_at_rule()
      .map(|data| data.params.clone())
      .unwrap_or_default();
    self.scope.enter(&params);
    Ok(())
  }

  fn visit_at_rule_exit(
    &mut self,
    _at_rule: &NodeRef,
    _result: &mut PostcssResult,
  ) -> Result<(), ProcessorError> {
    self.scope.exit();
    Ok(())
  }

  fn visit_rule(&mut self, rule: &NodeRef, _result: &mut PostcssResult) -> Result<(), ProcessorError> {
    if self.is_idle() {
      self.rules.push(RuleFrame {
        denied: false,
        landscape_rule: None,
      });
      return Ok(());
    }

    let selector = rule
      .borrow()
      .as_rule()
      .map(|data| data.selector.clone())
      .unwrap_or_default();
    let denied = is_denied(&selector, &self.plugin.options.selector_black_list);

    let top_level = self.rules.is_empty() && !self.scope.is_inside();
    let landscape_rule =
      (self.plugin.options.landscape && top_level).then(|| LandscapeDuplicator::start_rule(rule));

    self.rules.push(RuleFrame {
      denied,
      landscape_rule,
    });
    Ok(())
  }

  fn visit_rule_exit(
    &mut self,
    _rule: &NodeRef,
    _result: &mut PostcssResult,
  ) -> Result<(), ProcessorError> {
    if let Some(frame) = self.rules.pop() {
      if let Some(landscape_rule) = frame.landscape_rule {
        self.landscape.finish_rule(landscape_rule);
      }
    }
    Ok(())
  }

  fn visit_declaration(
    &mut self,
    decl: &NodeRef,
    result: &mut PostcssResult,
  ) -> Result<(), ProcessorError> {
    if self.is_idle() || self.scope.skips_declarations() {
      return Ok(());
    }
    if self.rules.last().is_some_and(|frame| frame.denied) {
      return Ok(());
    }

    let Some((prop, value)) = decl
      .borrow()
      .as_declaration()
      .map(|data| (data.prop.clone(), data.value.clone()))
    else {
      return Ok(());
    };

    let plugin = self.plugin;
    let options = &plugin.options;
    if !plugin.unit_matcher.mentions_unit(&value) {
      return Ok(());
    }
    if !plugin.prop_list.is_match(&prop) {
      return Ok(());
    }
    if directives::should_skip(decl, result) {
      return Ok(());
    }

    let (unit, size) = if self.scope.is_landscape() {
      (options.landscape_unit.as_str(), self.landscape_width())
    } else {
      (
        options.unit_for(&prop),
        self.overrides.viewport_width_or(options.viewport_width),
      )
    };
    let converted = plugin.convert_value(&value, unit, size);

    let Some(parent) = Node::parent_ref(decl) else {
      return Ok(());
    };
    if declaration_exists(&parent, &prop, &converted) {
      return Ok(());
    }

    if let Some(landscape_rule) = self.rules.last().and_then(|frame| frame.landscape_rule.as_ref()) {
      let landscape_value = plugin.convert_value(&value, &options.landscape_unit, self.landscape_width());
      LandscapeDuplicator::add_declaration(landscape_rule, decl, &landscape_value);
    }

    tracing::trace!(prop = %prop, from = %value, to = %converted, "converted declaration");
    if options.replace {
      Node::set_value(decl, converted);
    } else {
      let copy = Node::clone_node(decl);
      Node::set_value(&copy, converted);
      Node::insert_after(decl, [copy]);
    }
    Ok(())
  }
}
