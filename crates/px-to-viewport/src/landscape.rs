use px_to_viewport_postcss::{Node, NodeRef};

pub const LANDSCAPE_PARAMS: &str = "(orientation: landscape)";

/// Collects landscape copies of top-level rules and appends them to the
/// stylesheet in a single `@media (orientation: landscape)` block.
#[derive(Debug, Default)]
pub struct LandscapeDuplicator {
  queue: Vec<NodeRef>,
  emitted: bool,
}

impl LandscapeDuplicator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Empty copy of `rule`: same selector and formatting, no children.
  pub fn start_rule(rule: &NodeRef) -> NodeRef {
    Node::clone_empty(rule)
  }

  /// Append a copy of `decl` carrying `value` to a landscape rule.
  pub fn add_declaration(landscape_rule: &NodeRef, decl: &NodeRef, value: &str) {
    let copy = Node::clone_node(decl);
    Node::set_value(&copy, value);
    Node::append(landscape_rule, copy);
  }

  /// Queue a landscape rule once its source rule is done. Rules that
  /// received no declarations are dropped.
  pub fn finish_rule(&mut self, landscape_rule: NodeRef) {
    if !landscape_rule.borrow().nodes.is_empty() {
      self.queue.push(landscape_rule);
    }
  }

  pub fn is_emitted(&self) -> bool {
    self.emitted
  }

  /// Append the queued rules to `root` inside one landscape media block.
  /// Does nothing when the queue is empty.
  pub fn emit(&mut self, root: &NodeRef) -> bool {
    if self.queue.is_empty() {
      return false;
    }

    let media = Node::at_rule("media", LANDSCAPE_PARAMS);
    let count = self.queue.len();
    for rule in self.queue.drain(..) {
      Node::append(&media, rule);
    }
    Node::append(root, media);
    self.emitted = true;

    tracing::debug!(rules = count, "appended landscape media block");
    true
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use px_to_viewport_postcss::{parse, stringify};

  use super::*;

  #[test]
  fn emits_one_block_for_all_rules() {
    let root = parse(".a { width: 16px } .b { height: 16px }").unwrap();
    let mut duplicator = LandscapeDuplicator::new();

    for (index, value) in [(0, "1vw"), (1, "2vw")] {
      let rule = root.borrow().nodes[index].clone();
      let decl = rule.borrow().nodes[0].clone();
      let landscape_rule = LandscapeDuplicator::start_rule(&rule);
      LandscapeDuplicator::add_declaration(&landscape_rule, &decl, value);
      duplicator.finish_rule(landscape_rule);
    }
    assert!(duplicator.emit(&root));

    assert_eq!(
      stringify(&root),
      ".a { width: 16px } .b { height: 16px } @media (orientation: landscape) {.a { width: 1vw } .b { height: 2vw } }"
    );
    assert!(duplicator.is_emitted());
    assert!(!duplicator.emit(&root));
  }

  #[test]
  fn drops_empty_rules() {
    let root = parse(".a { width: 15vw }").unwrap();
    let mut duplicator = LandscapeDuplicator::new();
    let rule = root.borrow().nodes[0].clone();

    duplicator.finish_rule(LandscapeDuplicator::start_rule(&rule));

    assert!(!duplicator.emit(&root));
    assert!(!duplicator.is_emitted());
    assert_eq!(stringify(&root), ".a { width: 15vw }");
  }
}
