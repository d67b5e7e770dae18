use std::rc::Rc;

use crate::ast::{Node, NodeData, NodeKind, NodeRef, RawValue};

fn default_raw(detect: &str) -> &'static str {
  match detect {
    "beforeClose" => "\n",
    "beforeComment" => "\n",
    "beforeDecl" => "\n",
    "beforeOpen" => " ",
    "beforeRule" => "\n",
    "colon" => ": ",
    "commentLeft" => " ",
    "commentRight" => " ",
    "emptyBody" => "",
    "indent" => "    ",
    "semicolon" => "false",
    _ => "",
  }
}

fn strip_to_last_newline(value: &str) -> &str {
  match value.rfind('\n') {
    Some(index) => &value[..=index],
    None => value,
  }
}

fn collapse_non_space(value: &str) -> String {
  value.chars().filter(|c| c.is_whitespace()).collect()
}

/// Serialise `node` and its descendants back to CSS text.
pub fn stringify(node: &NodeRef) -> String {
  let mut stringifier = Stringifier { out: String::new() };
  stringifier.stringify_node(node, false);
  stringifier.out
}

struct Stringifier {
  out: String,
}

impl Stringifier {
  fn stringify_node(&mut self, node: &NodeRef, semicolon: bool) {
    let kind = node.borrow().kind();
    match kind {
      NodeKind::Root => self.root(node),
      NodeKind::Rule => self.rule(node),
      NodeKind::AtRule => self.at_rule(node, semicolon),
      NodeKind::Declaration => self.decl(node, semicolon),
      NodeKind::Comment => self.comment(node),
    }
  }

  fn root(&mut self, node: &NodeRef) {
    self.body(node);
    if let Some(after) = node.borrow().raws.get_text("after") {
      self.out.push_str(after);
    }
  }

  fn rule(&mut self, node: &NodeRef) {
    let selector = raw_value(node, "selector");
    self.block(node, &selector);
  }

  fn at_rule(&mut self, node: &NodeRef, semicolon: bool) {
    let (mut start, has_block) = {
      let inner = node.borrow();
      let Some(data) = inner.as_at_rule() else {
        return;
      };
      let mut start = format!("@{}", data.name);
      match inner.raws.get_text("afterName") {
        Some(after_name) => start.push_str(after_name),
        None if !data.params.is_empty() => start.push(' '),
        None => {}
      }
      (start, data.has_block || !inner.nodes.is_empty())
    };
    start.push_str(&raw_value(node, "params"));

    if has_block {
      self.block(node, &start);
      return;
    }

    self.out.push_str(&start);
    self.out.push_str(&raw(node, Some("between"), "between"));
    if semicolon {
      self.out.push(';');
    }
  }

  fn decl(&mut self, node: &NodeRef, semicolon: bool) {
    let prop = match node.borrow().as_declaration() {
      Some(data) => data.prop.clone(),
      None => return,
    };
    self.out.push_str(&prop);
    self.out.push_str(&raw(node, Some("between"), "colon"));
    self.out.push_str(&raw_value(node, "value"));
    if semicolon {
      self.out.push(';');
    }
  }

  fn comment(&mut self, node: &NodeRef) {
    let left = raw(node, Some("left"), "commentLeft");
    let right = raw(node, Some("right"), "commentRight");
    let text = match node.borrow().as_comment() {
      Some(data) => data.text.clone(),
      None => return,
    };
    self.out.push_str("/*");
    self.out.push_str(&left);
    self.out.push_str(&text);
    self.out.push_str(&right);
    self.out.push_str("*/");
  }

  fn block(&mut self, node: &NodeRef, start: &str) {
    let between = raw(node, Some("between"), "beforeOpen");
    self.out.push_str(start);
    self.out.push_str(&between);
    self.out.push('{');

    let after = if node.borrow().nodes.is_empty() {
      raw(node, Some("after"), "emptyBody")
    } else {
      self.body(node);
      raw(node, Some("after"), "after")
    };
    self.out.push_str(&after);
    self.out.push('}');
  }

  fn body(&mut self, node: &NodeRef) {
    let children = node.borrow().nodes.clone();
    let last = children
      .iter()
      .rposition(|child| child.borrow().kind() != NodeKind::Comment)
      .unwrap_or(0);
    let semicolon = raw(node, Some("semicolon"), "semicolon") == "true";

    for (index, child) in children.iter().enumerate() {
      let before = raw(child, Some("before"), "before");
      self.out.push_str(&before);
      self.stringify_node(child, index != last || semicolon);
    }
  }
}

/// Value of a node field, or its raw form while the field has not changed
/// since parsing.
fn raw_value(node: &NodeRef, prop: &str) -> String {
  let inner = node.borrow();
  let value = match (&inner.data, prop) {
    (NodeData::Rule(data), "selector") => data.selector.as_str(),
    (NodeData::AtRule(data), "params") => data.params.as_str(),
    (NodeData::Declaration(data), "value") => data.value.as_str(),
    _ => "",
  };
  match inner.raws.get(prop) {
    Some(RawValue::Value { value: cleaned, raw }) if cleaned == value => raw.clone(),
    _ => value.to_string(),
  }
}

/// Resolve a raw: the node's own value when present, otherwise a value
/// detected from other nodes in the same tree, otherwise a default.
fn raw(node: &NodeRef, own: Option<&str>, detect: &str) -> String {
  if let Some(own) = own {
    if let Some(value) = node.borrow().raws.get_text(own) {
      return value.to_string();
    }
  }

  let parent = Node::parent_ref(node);
  if detect == "before" {
    match &parent {
      None => return String::new(),
      Some(parent) => {
        let parent = parent.borrow();
        let is_first = parent
          .nodes
          .first()
          .is_some_and(|first| Rc::ptr_eq(first, node));
        if parent.kind() == NodeKind::Root && is_first {
          return String::new();
        }
      }
    }
  }

  if parent.is_none() {
    return default_raw(detect).to_string();
  }

  if detect == "before" || detect == "after" {
    return before_after(node, detect);
  }

  let root = Node::root(node);
  detect_raw(&root, node, detect).unwrap_or_else(|| default_raw(detect).to_string())
}

fn before_after(node: &NodeRef, detect: &str) -> String {
  let kind = node.borrow().kind();
  let mut value = match kind {
    NodeKind::Declaration => raw(node, None, "beforeDecl"),
    NodeKind::Comment => raw(node, None, "beforeComment"),
    _ if detect == "before" => raw(node, None, "beforeRule"),
    _ => raw(node, None, "beforeClose"),
  };

  if value.contains('\n') {
    let mut depth = 0;
    let mut current = Node::parent_ref(node);
    while let Some(parent) = current {
      if parent.borrow().kind() == NodeKind::Root {
        break;
      }
      depth += 1;
      current = Node::parent_ref(&parent);
    }
    let indent = raw(node, None, "indent");
    for _ in 0..depth {
      value.push_str(&indent);
    }
  }

  value
}

fn detect_raw(root: &NodeRef, node: &NodeRef, detect: &str) -> Option<String> {
  match detect {
    "beforeDecl" => {
      match find_descendant(root, &mut |child: &NodeRef| {
        let child = child.borrow();
        (child.kind() == NodeKind::Declaration)
          .then(|| child.raws.get_text("before").map(str::to_string))
          .flatten()
      }) {
        Some(value) => Some(collapse_non_space(strip_to_last_newline(&value))),
        None => Some(raw(node, None, "beforeRule")),
      }
    }
    "beforeComment" => {
      match find_descendant(root, &mut |child: &NodeRef| {
        let child = child.borrow();
        (child.kind() == NodeKind::Comment)
          .then(|| child.raws.get_text("before").map(str::to_string))
          .flatten()
      }) {
        Some(value) => Some(collapse_non_space(strip_to_last_newline(&value))),
        None => Some(raw(node, None, "beforeDecl")),
      }
    }
    "beforeRule" => {
      let first = root.borrow().nodes.first().cloned();
      find_descendant(root, &mut |child: &NodeRef| {
        let is_root_first = first
          .as_ref()
          .is_some_and(|first| Rc::ptr_eq(first, child));
        let child = child.borrow();
        if !child.data.is_container() || is_root_first {
          return None;
        }
        child.raws.get_text("before").map(str::to_string)
      })
      .map(|value| collapse_non_space(strip_to_last_newline(&value)))
    }
    "beforeClose" => find_descendant(root, &mut |child: &NodeRef| {
      let child = child.borrow();
      if child.nodes.is_empty() {
        return None;
      }
      child.raws.get_text("after").map(str::to_string)
    })
    .map(|value| collapse_non_space(strip_to_last_newline(&value))),
    "beforeOpen" => find_descendant(root, &mut |child: &NodeRef| {
      let child = child.borrow();
      if child.kind() == NodeKind::Declaration {
        return None;
      }
      child.raws.get_text("between").map(str::to_string)
    }),
    "colon" => find_descendant(root, &mut |child: &NodeRef| {
      let child = child.borrow();
      if child.kind() != NodeKind::Declaration {
        return None;
      }
      child
        .raws
        .get_text("between")
        .map(|between| between.chars().filter(|c| c.is_whitespace() || *c == ':').collect())
    }),
    "indent" => find_descendant(root, &mut |child: &NodeRef| {
      let parent = Node::parent_ref(child)?;
      let grandparent = Node::parent_ref(&parent)?;
      if Rc::ptr_eq(&parent, root) || !Rc::ptr_eq(&grandparent, root) {
        return None;
      }
      let before = child.borrow().raws.get_text("before").map(str::to_string)?;
      let last_line = before.rsplit('\n').next().unwrap_or_default();
      Some(collapse_non_space(last_line))
    }),
    "emptyBody" => find_descendant(root, &mut |child: &NodeRef| {
      let child = child.borrow();
      if !child.data.is_container() || !child.nodes.is_empty() {
        return None;
      }
      child.raws.get_text("after").map(str::to_string)
    }),
    "semicolon" => find_descendant(root, &mut |child: &NodeRef| {
      let child = child.borrow();
      let ends_with_decl = child
        .nodes
        .last()
        .is_some_and(|last| last.borrow().kind() == NodeKind::Declaration);
      if !ends_with_decl {
        return None;
      }
      child.raws.get_text("semicolon").map(str::to_string)
    }),
    _ => None,
  }
}

/// Pre-order walk over the descendants of `node`, stopping at the first
/// child for which `f` returns a value.
fn find_descendant<T>(node: &NodeRef, f: &mut dyn FnMut(&NodeRef) -> Option<T>) -> Option<T> {
  let children = node.borrow().nodes.clone();
  for child in &children {
    if let Some(found) = f(child) {
      return Some(found);
    }
    if let Some(found) = find_descendant(child, f) {
      return Some(found);
    }
  }
  None
}
