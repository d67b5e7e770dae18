use super::{Node, NodeData, NodeRef};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
  Root,
  Rule,
  AtRule,
  Declaration,
  Comment,
}

#[derive(Clone, Debug, Default)]
pub struct RootData;

#[derive(Clone, Debug)]
pub struct RuleData {
  pub selector: String,
}

#[derive(Clone, Debug)]
pub struct AtRuleData {
  pub name: String,
  pub params: String,
  /// `false` for statements such as `@import x;` that end without a block.
  pub has_block: bool,
}

#[derive(Clone, Debug)]
pub struct DeclarationData {
  pub prop: String,
  pub value: String,
}

#[derive(Clone, Debug)]
pub struct CommentData {
  pub text: String,
}

impl Node {
  pub fn new_root() -> NodeRef {
    Node::new(NodeData::Root(RootData))
  }

  pub fn rule(selector: impl Into<String>) -> NodeRef {
    Node::new(NodeData::Rule(RuleData {
      selector: selector.into(),
    }))
  }

  pub fn at_rule(name: impl Into<String>, params: impl Into<String>) -> NodeRef {
    Node::new(NodeData::AtRule(AtRuleData {
      name: name.into(),
      params: params.into(),
      has_block: true,
    }))
  }

  pub fn decl(prop: impl Into<String>, value: impl Into<String>) -> NodeRef {
    Node::new(NodeData::Declaration(DeclarationData {
      prop: prop.into(),
      value: value.into(),
    }))
  }

  pub fn comment(text: impl Into<String>) -> NodeRef {
    Node::new(NodeData::Comment(CommentData { text: text.into() }))
  }

  /// Replace the value of a declaration node. Other node kinds are left
  /// untouched.
  pub fn set_value(node: &NodeRef, value: impl Into<String>) {
    let mut inner = node.borrow_mut();
    if let Some(data) = inner.as_declaration_mut() {
      data.value = value.into();
    }
  }
}
