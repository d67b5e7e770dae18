const SINGLE_QUOTE: u8 = b'\'';
const DOUBLE_QUOTE: u8 = b'"';
const BACKSLASH: u8 = b'\\';
const SLASH: u8 = b'/';
const ASTERISK: u8 = b'*';
const OPEN_PARENTHESES: u8 = b'(';
const CLOSE_PARENTHESES: u8 = b')';
const OPEN_SQUARE: u8 = b'[';
const CLOSE_SQUARE: u8 = b']';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanError {
  pub reason: &'static str,
  pub offset: usize,
}

pub fn is_space(code: u8) -> bool {
  matches!(code, b' ' | b'\n' | b'\t' | b'\r' | 0x0C)
}

pub fn is_at_end_stop(code: u8) -> bool {
  matches!(
    code,
    b'\t'
      | b'\n'
      | b'\r'
      | b' '
      | b'"'
      | b'#'
      | b'\''
      | b'('
      | b')'
      | b'/'
      | b';'
      | 0x0c
      | b'['
      | b'\\'
      | b']'
      | b'{'
      | b'}'
  )
}

/// Find the first byte at or after `from` accepted by `stop` that is not
/// inside a string, a comment, parentheses or square brackets.
pub fn find_unnested<F>(text: &str, from: usize, stop: F) -> Result<Option<usize>, ScanError>
where
  F: Fn(u8) -> bool,
{
  let bytes = text.as_bytes();
  let mut depth = 0usize;
  let mut index = from;

  while let Some(&code) = bytes.get(index) {
    match code {
      SINGLE_QUOTE | DOUBLE_QUOTE => {
        index = skip_string(bytes, index)?;
        continue;
      }
      SLASH if bytes.get(index + 1) == Some(&ASTERISK) => {
        let Some(length) = text[index + 2..].find("*/") else {
          return Err(ScanError {
            reason: "Unclosed comment",
            offset: index,
          });
        };
        index += 2 + length + 2;
        continue;
      }
      BACKSLASH => {
        index += 2;
        continue;
      }
      OPEN_PARENTHESES | OPEN_SQUARE => depth += 1,
      CLOSE_PARENTHESES | CLOSE_SQUARE if depth > 0 => depth -= 1,
      _ if depth == 0 && stop(code) => return Ok(Some(index)),
      _ => {}
    }
    index += 1;
  }

  Ok(None)
}

/// Returns the offset just past the closing quote of the string opened at
/// `start`.
fn skip_string(bytes: &[u8], start: usize) -> Result<usize, ScanError> {
  let quote = bytes[start];
  let mut index = start + 1;
  while let Some(&code) = bytes.get(index) {
    if code == BACKSLASH {
      index += 2;
      continue;
    }
    if code == quote {
      return Ok(index + 1);
    }
    index += 1;
  }

  Err(ScanError {
    reason: "Unclosed string",
    offset: start,
  })
}
