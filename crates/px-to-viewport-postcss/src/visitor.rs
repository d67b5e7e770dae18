use crate::ast::{Node, NodeKind, NodeRef};
use crate::processor::ProcessorError;
use crate::result::Result as PostcssResult;

/// Per-run listener driven by [`walk`]. Every hook defaults to a no-op so
/// implementors only override the node types they care about.
pub trait Visitor {
  fn once(&mut self, _root: &NodeRef, _result: &mut PostcssResult) -> Result<(), ProcessorError> {
    Ok(())
  }

  fn visit_root(&mut self, _root: &NodeRef, _result: &mut PostcssResult) -> Result<(), ProcessorError> {
    Ok(())
  }

  fn visit_root_exit(
    &mut self,
    _root: &NodeRef,
    _result: &mut PostcssResult,
  ) -> Result<(), ProcessorError> {
    Ok(())
  }

  fn visit_rule(&mut self, _rule: &NodeRef, _result: &mut PostcssResult) -> Result<(), ProcessorError> {
    Ok(())
  }

  fn visit_rule_exit(
    &mut self,
    _rule: &NodeRef,
    _result: &mut PostcssResult,
  ) -> Result<(), ProcessorError> {
    Ok(())
  }

  fn visit_at_rule(
    &mut self,
    _at_rule: &NodeRef,
    _result: &mut PostcssResult,
  ) -> Result<(), ProcessorError> {
    Ok(())
  }

  fn visit_at_rule_exit(
    &mut self,
    _at_rule: &NodeRef,
    _result: &mut PostcssResult,
  ) -> Result<(), ProcessorError> {
    Ok(())
  }

  fn visit_declaration(
    &mut self,
    _decl: &NodeRef,
    _result: &mut PostcssResult,
  ) -> Result<(), ProcessorError> {
    Ok(())
  }

  fn visit_comment(
    &mut self,
    _comment: &NodeRef,
    _result: &mut PostcssResult,
  ) -> Result<(), ProcessorError> {
    Ok(())
  }
}

/// Depth-first walk of `root`: `once`, then the root hook, every descendant
/// in document order (containers get an enter and an exit call around their
/// children), then the root exit hook.
///
/// The walk tolerates mutation from inside hooks. Siblings inserted after
/// the current node are visited next, and removing the current node or an
/// earlier sibling does not skip anything.
pub fn walk(
  root: &NodeRef,
  visitor: &mut dyn Visitor,
  result: &mut PostcssResult,
) -> Result<(), ProcessorError> {
  visitor.once(root, result)?;
  visitor.visit_root(root, result)?;
  walk_children(root, visitor, result)?;
  visitor.visit_root_exit(root, result)
}

fn walk_children(
  container: &NodeRef,
  visitor: &mut dyn Visitor,
  result: &mut PostcssResult,
) -> Result<(), ProcessorError> {
  let mut index = 0;
  loop {
    let child = container.borrow().nodes.get(index).cloned();
    let Some(child) = child else {
      break;
    };

    let kind = child.borrow().kind();
    match kind {
      NodeKind::Rule => {
        visitor.visit_rule(&child, result)?;
        walk_children(&child, visitor, result)?;
        visitor.visit_rule_exit(&child, result)?;
      }
      NodeKind::AtRule => {
        visitor.visit_at_rule(&child, result)?;
        walk_children(&child, visitor, result)?;
        visitor.visit_at_rule_exit(&child, result)?;
      }
      NodeKind::Declaration => visitor.visit_declaration(&child, result)?,
      NodeKind::Comment => visitor.visit_comment(&child, result)?,
      NodeKind::Root => {}
    }

    // Re-locate the child: hooks may have removed it or earlier siblings.
    index = match Node::index_of(container, &child) {
      Some(current) => current + 1,
      None => index,
    };
  }
  Ok(())
}
