use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::input::{InputRef, Position};

pub mod nodes;

pub use nodes::{AtRuleData, CommentData, DeclarationData, NodeKind, RootData, RuleData};

/// Shared pointer to a node in the stylesheet tree.
pub type NodeRef = Rc<RefCell<Node>>;

/// Weak pointer used to avoid reference cycles when pointing to a parent node.
pub type WeakNodeRef = Weak<RefCell<Node>>;

/// Common source information available on every node.
#[derive(Clone, Debug, Default)]
pub struct Source {
  pub input: Option<InputRef>,
  pub start: Option<Position>,
  pub end: Option<Position>,
}

/// Raw fragments can be plain strings or `{ value, raw }` pairs, the latter
/// kept when the parser had to clean the lexeme (e.g. trailing spaces of a
/// declaration value). The raw form is only printed while `value` is still
/// the node's current value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawValue {
  Text(String),
  Value { value: String, raw: String },
}

impl RawValue {
  pub fn as_text(&self) -> Option<&str> {
    match self {
      RawValue::Text(s) => Some(s.as_str()),
      RawValue::Value { raw, .. } => Some(raw.as_str()),
    }
  }
}

/// Formatting preserved from the source (`before`, `between`, `after`,
/// `semicolon`, `afterName`, `left`, `right`, `value`, `params`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawData {
  values: BTreeMap<String, RawValue>,
}

impl RawData {
  pub fn get(&self, key: &str) -> Option<&RawValue> {
    self.values.get(key)
  }

  pub fn get_text(&self, key: &str) -> Option<&str> {
    self.values.get(key).and_then(RawValue::as_text)
  }

  pub fn set_text<S: Into<String>>(&mut self, key: &str, value: S) {
    self
      .values
      .insert(key.to_string(), RawValue::Text(value.into()));
  }

  pub fn set_flag(&mut self, key: &str, value: bool) {
    self.set_text(key, if value { "true" } else { "false" });
  }

  pub fn set_value_pair<S: Into<String>, R: Into<String>>(&mut self, key: &str, value: S, raw: R) {
    self.values.insert(
      key.to_string(),
      RawValue::Value {
        value: value.into(),
        raw: raw.into(),
      },
    );
  }
}

/// Strongly-typed payload stored inside each [`Node`].
#[derive(Clone, Debug)]
pub enum NodeData {
  Root(RootData),
  Rule(RuleData),
  AtRule(AtRuleData),
  Declaration(DeclarationData),
  Comment(CommentData),
}

impl NodeData {
  pub fn is_container(&self) -> bool {
    matches!(
      self,
      NodeData::Root(_) | NodeData::Rule(_) | NodeData::AtRule(_)
    )
  }
}

/// Mutable tree node. Containers keep their children in `nodes`; leaves
/// leave it empty.
#[derive(Clone, Debug)]
pub struct Node {
  pub data: NodeData,
  pub parent: Option<WeakNodeRef>,
  pub source: Source,
  pub raws: RawData,
  pub nodes: Vec<NodeRef>,
}

impl Node {
  pub fn new(data: NodeData) -> NodeRef {
    Rc::new(RefCell::new(Self {
      data,
      parent: None,
      source: Source::default(),
      raws: RawData::default(),
      nodes: Vec::new(),
    }))
  }

  pub fn parent(&self) -> Option<NodeRef> {
    self.parent.as_ref().and_then(Weak::upgrade)
  }

  pub fn parent_ref(node: &NodeRef) -> Option<NodeRef> {
    node.borrow().parent()
  }

  pub fn kind(&self) -> NodeKind {
    match &self.data {
      NodeData::Root(_) => NodeKind::Root,
      NodeData::Rule(_) => NodeKind::Rule,
      NodeData::AtRule(_) => NodeKind::AtRule,
      NodeData::Declaration(_) => NodeKind::Declaration,
      NodeData::Comment(_) => NodeKind::Comment,
    }
  }

  pub fn as_rule(&self) -> Option<&RuleData> {
    match &self.data {
      NodeData::Rule(data) => Some(data),
      _ => None,
    }
  }

  pub fn as_at_rule(&self) -> Option<&AtRuleData> {
    match &self.data {
      NodeData::AtRule(data) => Some(data),
      _ => None,
    }
  }

  pub fn as_at_rule_mut(&mut self) -> Option<&mut AtRuleData> {
    match &mut self.data {
      NodeData::AtRule(data) => Some(data),
      _ => None,
    }
  }

  pub fn as_declaration(&self) -> Option<&DeclarationData> {
    match &self.data {
      NodeData::Declaration(data) => Some(data),
      _ => None,
    }
  }

  pub fn as_declaration_mut(&mut self) -> Option<&mut DeclarationData> {
    match &mut self.data {
      NodeData::Declaration(data) => Some(data),
      _ => None,
    }
  }

  pub fn as_comment(&self) -> Option<&CommentData> {
    match &self.data {
      NodeData::Comment(data) => Some(data),
      _ => None,
    }
  }

  pub fn index_of(parent: &NodeRef, child: &NodeRef) -> Option<usize> {
    parent
      .borrow()
      .nodes
      .iter()
      .position(|node| Rc::ptr_eq(node, child))
  }

  fn parent_and_index(node: &NodeRef) -> Option<(NodeRef, usize)> {
    let parent = Node::parent_ref(node)?;
    let index = Node::index_of(&parent, node)?;
    Some((parent, index))
  }

  pub fn index(node: &NodeRef) -> Option<usize> {
    Node::parent_and_index(node).map(|(_, index)| index)
  }

  pub fn append(parent: &NodeRef, child: NodeRef) {
    Node::detach(&child);
    child.borrow_mut().parent = Some(Rc::downgrade(parent));
    parent.borrow_mut().nodes.push(child);
  }

  pub fn insert(parent: &NodeRef, index: usize, child: NodeRef) {
    Node::detach(&child);
    child.borrow_mut().parent = Some(Rc::downgrade(parent));
    parent.borrow_mut().nodes.insert(index, child);
  }

  pub fn remove(parent: &NodeRef, index: usize) -> NodeRef {
    let child = parent.borrow_mut().nodes.remove(index);
    child.borrow_mut().parent = None;
    child
  }

  fn detach(node: &NodeRef) {
    if let Some((parent, index)) = Node::parent_and_index(node) {
      Node::remove(&parent, index);
    }
  }

  /// Remove `node` from its parent. Nodes without a parent are left alone.
  pub fn remove_self(node: &NodeRef) {
    Node::detach(node);
  }

  pub fn insert_after<I>(node: &NodeRef, new_nodes: I)
  where
    I: IntoIterator<Item = NodeRef>,
  {
    let Some((parent, index)) = Node::parent_and_index(node) else {
      return;
    };
    for (offset, child) in new_nodes.into_iter().enumerate() {
      Node::insert(&parent, index + 1 + offset, child);
    }
  }

  fn sibling(node: &NodeRef, offset: isize) -> Option<NodeRef> {
    let (parent, index) = Node::parent_and_index(node)?;
    let target = usize::try_from(index as isize + offset).ok()?;
    let sibling = parent.borrow().nodes.get(target).cloned();
    sibling
  }

  pub fn next(node: &NodeRef) -> Option<NodeRef> {
    Node::sibling(node, 1)
  }

  pub fn prev(node: &NodeRef) -> Option<NodeRef> {
    Node::sibling(node, -1)
  }

  pub fn root(node: &NodeRef) -> NodeRef {
    let mut current = node.clone();
    loop {
      let parent = current.borrow().parent();
      match parent {
        Some(next) => current = next,
        None => return current,
      }
    }
  }

  /// Deep copy of `node` and its descendants. The copy has no parent.
  pub fn clone_node(node: &NodeRef) -> NodeRef {
    let copy = Node::clone_empty(node);
    let children = node.borrow().nodes.clone();
    for child in children {
      Node::append(&copy, Node::clone_node(&child));
    }
    copy
  }

  /// Copy of `node` carrying its data, raws and source but none of its
  /// children.
  pub fn clone_empty(node: &NodeRef) -> NodeRef {
    let inner = node.borrow();
    Rc::new(RefCell::new(Node {
      data: inner.data.clone(),
      parent: None,
      source: inner.source.clone(),
      raws: inner.raws.clone(),
      nodes: Vec::new(),
    }))
  }
}

impl fmt::Display for Node {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.data {
      NodeData::Root(_) => write!(f, "[object Root]"),
      NodeData::Rule(data) => write!(f, "[object Rule selector={}]", data.selector),
      NodeData::AtRule(data) => write!(f, "[object AtRule name={}]", data.name),
      NodeData::Declaration(data) => {
        write!(f, "[object Declaration {}: {}]", data.prop, data.value)
      }
      NodeData::Comment(data) => write!(f, "[object Comment text={}]", data.text),
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn rule_with_decls() -> (NodeRef, NodeRef, NodeRef) {
    let rule = Node::rule(".a");
    let first = Node::decl("color", "red");
    let second = Node::decl("width", "10px");
    Node::append(&rule, first.clone());
    Node::append(&rule, second.clone());
    (rule, first, second)
  }

  #[test]
  fn siblings_follow_child_order() {
    let (_rule, first, second) = rule_with_decls();

    assert!(Rc::ptr_eq(&Node::next(&first).unwrap(), &second));
    assert!(Rc::ptr_eq(&Node::prev(&second).unwrap(), &first));
    assert!(Node::prev(&first).is_none());
    assert!(Node::next(&second).is_none());
  }

  #[test]
  fn insert_after_places_node_next_to_target() {
    let (rule, first, _second) = rule_with_decls();
    let inserted = Node::decl("color", "blue");

    Node::insert_after(&first, [inserted.clone()]);

    assert_eq!(Node::index(&inserted), Some(1));
    assert_eq!(rule.borrow().nodes.len(), 3);
    assert!(Rc::ptr_eq(&Node::parent_ref(&inserted).unwrap(), &rule));
  }

  #[test]
  fn remove_self_detaches_from_parent() {
    let (rule, first, second) = rule_with_decls();

    Node::remove_self(&first);

    assert!(Node::parent_ref(&first).is_none());
    assert_eq!(Node::index(&second), Some(0));
    assert_eq!(rule.borrow().nodes.len(), 1);
  }

  #[test]
  fn clone_empty_keeps_selector_and_raws_only() {
    let (rule, _, _) = rule_with_decls();
    rule.borrow_mut().raws.set_text("between", " ");

    let copy = Node::clone_empty(&rule);

    let copy = copy.borrow();
    assert_eq!(copy.as_rule().unwrap().selector, ".a");
    assert_eq!(copy.raws.get_text("between"), Some(" "));
    assert!(copy.nodes.is_empty());
    assert!(copy.parent().is_none());
  }

  #[test]
  fn clone_node_copies_descendants() {
    let (rule, _, _) = rule_with_decls();

    let copy = Node::clone_node(&rule);

    assert_eq!(copy.borrow().nodes.len(), 2);
    let child = copy.borrow().nodes[0].clone();
    assert!(Rc::ptr_eq(&Node::parent_ref(&child).unwrap(), &copy));
    assert_eq!(child.borrow().to_string(), "[object Declaration color: red]");
  }
}
