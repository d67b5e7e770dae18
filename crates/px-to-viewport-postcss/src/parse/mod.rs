//! Stylesheet parser producing a postcss-shaped tree.
//!
//! Every byte of the input ends up either in a node field or in one of its
//! raws, so `stringify(parse(css)) == css` for well-formed input.

use crate::ast::{Node, NodeRef};
use crate::css_syntax_error::CssSyntaxError;
use crate::input::{Input, InputOptions, InputRef};

mod scanner;

use scanner::{find_unnested, is_at_end_stop, is_space, ScanError};

const SEMICOLON: u8 = b';';
const OPEN_CURLY: u8 = b'{';
const CLOSE_CURLY: u8 = b'}';
const SLASH: u8 = b'/';
const ASTERISK: u8 = b'*';
const COLON: u8 = b':';
const AT: u8 = b'@';

#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
  pub from: Option<String>,
}

impl ParseOptions {
  pub fn from_path(mut self, from: impl Into<String>) -> Self {
    self.from = Some(from.into());
    self
  }
}

pub fn parse(css: &str) -> Result<NodeRef, CssSyntaxError> {
  parse_with_options(css, ParseOptions::default())
}

pub fn parse_with_options(css: &str, opts: ParseOptions) -> Result<NodeRef, CssSyntaxError> {
  let input = InputRef::new(Input::new(css, InputOptions { from: opts.from }));
  Parser { input, pos: 0 }.parse()
}

/// How a statement inside a block was terminated.
enum Terminator {
  Semicolon,
  OpenCurly,
  Implicit,
}

struct Parser {
  input: InputRef,
  pos: usize,
}

impl Parser {
  fn parse(mut self) -> Result<NodeRef, CssSyntaxError> {
    let root = Node::new_root();
    self.init(&root, 0);
    self.body(&root, None)?;
    let end = self.input.css().len();
    self.set_end(&root, end);
    Ok(root)
  }

  fn init(&self, node: &NodeRef, offset: usize) {
    let mut inner = node.borrow_mut();
    inner.source.input = Some(self.input.clone());
    inner.source.start = Some(self.input.from_offset(offset));
  }

  fn set_end(&self, node: &NodeRef, offset: usize) {
    node.borrow_mut().source.end = Some(self.input.from_offset(offset));
  }

  fn scan_error(&self, error: ScanError, base: usize) -> CssSyntaxError {
    self.input.error(error.reason, base + error.offset)
  }

  /// Consume whitespace and stray semicolons, returning them verbatim so
  /// they can be kept as the next node's `before` raw.
  fn spaces(&mut self) -> String {
    let input = self.input.clone();
    let bytes = input.css().as_bytes();
    let start = self.pos;
    while let Some(&byte) = bytes.get(self.pos) {
      if !is_space(byte) && byte != SEMICOLON {
        break;
      }
      self.pos += 1;
    }
    input.css()[start..self.pos].to_string()
  }

  /// Parse children into `container` until its closing brace (or the end of
  /// input for the root). `open` is the offset of the opening brace.
  fn body(&mut self, container: &NodeRef, open: Option<usize>) -> Result<(), CssSyntaxError> {
    let input = self.input.clone();
    let bytes = input.css().as_bytes();
    let mut semicolon = false;

    loop {
      let before = self.spaces();
      let Some(&byte) = bytes.get(self.pos) else {
        if let Some(open) = open {
          return Err(input.error("Unclosed block", open));
        }
        container.borrow_mut().raws.set_text("after", before);
        break;
      };

      match byte {
        CLOSE_CURLY => {
          if open.is_none() {
            return Err(input.error("Unexpected }", self.pos));
          }
          container.borrow_mut().raws.set_text("after", before);
          self.set_end(container, self.pos);
          self.pos += 1;
          break;
        }
        SLASH if bytes.get(self.pos + 1) == Some(&ASTERISK) => {
          self.comment(container, before)?;
        }
        _ => {
          semicolon = self.statement(container, before)?;
        }
      }
    }

    if !container.borrow().nodes.is_empty() {
      container.borrow_mut().raws.set_flag("semicolon", semicolon);
    }
    Ok(())
  }

  fn comment(&mut self, container: &NodeRef, before: String) -> Result<(), CssSyntaxError> {
    let input = self.input.clone();
    let css = input.css();
    let start = self.pos;
    let Some(length) = css[start + 2..].find("*/") else {
      return Err(input.error("Unclosed comment", start));
    };
    let content = &css[start + 2..start + 2 + length];
    let end = start + 2 + length + 2;

    let (left, text, right) = if content.trim().is_empty() {
      (content, "", "")
    } else {
      let rest = content.trim_start();
      let text = rest.trim_end();
      (
        &content[..content.len() - rest.len()],
        text,
        &rest[text.len()..],
      )
    };

    let node = Node::comment(text);
    {
      let mut inner = node.borrow_mut();
      inner.raws.set_text("before", before);
      inner.raws.set_text("left", left);
      inner.raws.set_text("right", right);
    }
    self.init(&node, start);
    self.set_end(&node, end - 1);
    Node::append(container, node);
    self.pos = end;
    Ok(())
  }

  /// Parse a rule, at-rule or declaration. Returns whether the statement
  /// was closed by an explicit semicolon.
  fn statement(&mut self, container: &NodeRef, before: String) -> Result<bool, CssSyntaxError> {
    let input = self.input.clone();
    let css = input.css();
    let start = self.pos;

    let stop = find_unnested(css, start, |byte| {
      matches!(byte, SEMICOLON | OPEN_CURLY | CLOSE_CURLY)
    })
    .map_err(|error| self.scan_error(error, 0))?;

    let (end, terminator) = match stop {
      Some(index) if css.as_bytes()[index] == SEMICOLON => (index, Terminator::Semicolon),
      Some(index) if css.as_bytes()[index] == OPEN_CURLY => (index, Terminator::OpenCurly),
      Some(index) => (index, Terminator::Implicit),
      None => (css.len(), Terminator::Implicit),
    };

    match terminator {
      Terminator::OpenCurly => {
        let raw = &css[start..end];
        let node = if raw.as_bytes().first() == Some(&AT) {
          at_rule(raw)
        } else {
          rule(raw)
        };
        node.borrow_mut().raws.set_text("before", before);
        self.init(&node, start);
        Node::append(container, node.clone());
        self.pos = end + 1;
        self.body(&node, Some(end))?;
        Ok(false)
      }
      Terminator::Semicolon => {
        let node = self.leaf(&css[start..end], start)?;
        node.borrow_mut().raws.set_text("before", before);
        self.set_end(&node, end);
        Node::append(container, node);
        self.pos = end + 1;
        Ok(true)
      }
      Terminator::Implicit => {
        // Trailing whitespace belongs to the enclosing block's `after`.
        let raw = css[start..end].trim_end_matches(|c: char| c.is_ascii_whitespace());
        let node = self.leaf(raw, start)?;
        node.borrow_mut().raws.set_text("before", before);
        let last_char = raw.char_indices().last().map_or(0, |(index, _)| index);
        self.set_end(&node, start + last_char);
        Node::append(container, node);
        self.pos = start + raw.len();
        Ok(false)
      }
    }
  }

  /// Declaration or block-less at-rule.
  fn leaf(&self, raw: &str, start: usize) -> Result<NodeRef, CssSyntaxError> {
    if raw.as_bytes().first() == Some(&AT) {
      let node = at_rule(raw);
      if let Some(data) = node.borrow_mut().as_at_rule_mut() {
        data.has_block = false;
      }
      self.init(&node, start);
      return Ok(node);
    }

    let colon = find_unnested(raw, 0, |byte| byte == COLON)
      .map_err(|error| self.scan_error(error, start))?;
    let Some(colon) = colon else {
      return Err(self.input.error("Unknown word", start));
    };

    let prop = raw[..colon].trim_end();
    let value_raw = raw[colon + 1..].trim_start();
    let between = &raw[prop.len()..raw.len() - value_raw.len()];
    let value = value_raw.trim_end();

    let node = Node::decl(prop, value);
    {
      let mut inner = node.borrow_mut();
      inner.raws.set_text("between", between);
      if value != value_raw {
        inner.raws.set_value_pair("value", value, value_raw);
      }
    }
    self.init(&node, start);
    Ok(node)
  }
}

fn rule(raw: &str) -> NodeRef {
  let selector = raw.trim_end();
  let node = Node::rule(selector);
  node
    .borrow_mut()
    .raws
    .set_text("between", &raw[selector.len()..]);
  node
}

fn at_rule(raw: &str) -> NodeRef {
  let body = &raw[1..];
  let name_length = body
    .bytes()
    .position(is_at_end_stop)
    .unwrap_or(body.len());
  let name = &body[..name_length];
  let rest = &body[name_length..];

  let params_raw = rest.trim_start();
  let params = params_raw.trim_end();
  let (after_name, between) = if params.is_empty() {
    ("", rest)
  } else {
    (
      &rest[..rest.len() - params_raw.len()],
      &params_raw[params.len()..],
    )
  };

  let node = Node::at_rule(name, params);
  {
    let mut inner = node.borrow_mut();
    inner.raws.set_text("afterName", after_name);
    inner.raws.set_text("between", between);
  }
  node
}

#[cfg(test)]
mod tests {
  use indoc::indoc;
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::ast::NodeKind;
  use crate::stringifier::stringify;

  fn round_trip(css: &str) {
    let root = parse(css).unwrap();
    assert_eq!(stringify(&root), css);
  }

  #[test]
  fn round_trips_single_line_rules() {
    round_trip(".rule { font-size: 15px }");
    round_trip("h1 { margin: 0 0 20px; font-size: 32px; line-height: 2; letter-spacing: 1px; }");
    round_trip(".a{color:red}.b{color:blue;}");
  }

  #[test]
  fn round_trips_multiline_stylesheets() {
    round_trip(indoc! {"
      /* header */
      @import url(base.css);

      @media (min-width: 500px) {
        .rule {
          font-size: 16px;
          width: 100px; /* px-to-viewport-ignore */
        }
      }
    "});
  }

  #[test]
  fn keeps_strings_and_urls_intact() {
    round_trip(".rule { content: '16px;}'; background: url(a;b.png); font-family: \"x{\" }");
  }

  #[test]
  fn reads_declaration_fields() {
    let root = parse(".rule { margin :  0 0 20px ; }").unwrap();
    let rule = root.borrow().nodes[0].clone();
    let decl = rule.borrow().nodes[0].clone();

    let decl = decl.borrow();
    let data = decl.as_declaration().unwrap();
    assert_eq!(data.prop, "margin");
    assert_eq!(data.value, "0 0 20px");
    assert_eq!(decl.raws.get_text("between"), Some(" :  "));
    assert_eq!(decl.raws.get_text("value"), Some("0 0 20px "));
  }

  #[test]
  fn reads_at_rule_fields() {
    let root = parse("@media (min-width: 500px) { .rule { font-size: 16px } }").unwrap();
    let at_rule = root.borrow().nodes[0].clone();

    let at_rule = at_rule.borrow();
    assert_eq!(at_rule.kind(), NodeKind::AtRule);
    let data = at_rule.as_at_rule().unwrap();
    assert_eq!(data.name, "media");
    assert_eq!(data.params, "(min-width: 500px)");
    assert_eq!(at_rule.raws.get_text("afterName"), Some(" "));
    assert_eq!(at_rule.raws.get_text("between"), Some(" "));
  }

  #[test]
  fn trims_comment_text_into_raws() {
    let root = parse(".a { width: 1px; /*px-to-viewport-ignore*/\n}").unwrap();
    let rule = root.borrow().nodes[0].clone();
    let comment = rule.borrow().nodes[1].clone();

    let comment = comment.borrow();
    assert_eq!(comment.as_comment().unwrap().text, "px-to-viewport-ignore");
    assert_eq!(comment.raws.get_text("before"), Some(" "));
    assert_eq!(comment.raws.get_text("left"), Some(""));
  }

  #[test]
  fn records_source_positions() {
    let root = parse(".a {\n  color: red;\n}").unwrap();
    let rule = root.borrow().nodes[0].clone();
    let decl = rule.borrow().nodes[0].clone();

    let start = decl.borrow().source.start.clone().unwrap();
    assert_eq!((start.line, start.column), (2, 3));
  }

  #[test]
  fn ends_unterminated_declarations_on_a_char_boundary() {
    let css = ".a { width: 20px; font-family: 微软雅黑 }";
    let root = parse(css).unwrap();
    let rule = root.borrow().nodes[0].clone();
    let decl = rule.borrow().nodes[1].clone();

    let end = decl.borrow().source.end.clone().unwrap();
    assert_eq!((end.line, end.column, end.offset), (1, 35, 40));
    assert_eq!(stringify(&root), css);
  }

  #[test]
  fn remembers_file_path() {
    let root = parse_with_options(".a {}", ParseOptions::default().from_path("/mobile/main.css")).unwrap();

    let input = root.borrow().source.input.clone().unwrap();
    assert_eq!(input.file.as_deref(), Some("/mobile/main.css"));
  }

  #[test]
  fn reports_unclosed_blocks() {
    let error = parse(".a { color: red;").unwrap_err();

    assert_eq!(error.reason, "Unclosed block");
    assert_eq!((error.line, error.column), (1, 4));
  }

  #[test]
  fn reports_unexpected_close() {
    let error = parse(".a {} }").unwrap_err();

    assert_eq!(error.reason, "Unexpected }");
  }

  #[test]
  fn reports_unclosed_comments_and_strings() {
    assert_eq!(parse("/* open").unwrap_err().reason, "Unclosed comment");
    assert_eq!(parse(".a { content: 'x }").unwrap_err().reason, "Unclosed string");
  }

  #[test]
  fn reports_declarations_without_colon() {
    assert_eq!(parse(".a { color red; }").unwrap_err().reason, "Unknown word");
  }
}
