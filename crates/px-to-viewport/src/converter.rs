/// `Math.round` semantics: halves round towards positive infinity.
fn round_half_up(value: f64) -> f64 {
  let floor = value.floor();
  if value - floor >= 0.5 {
    floor + 1.0
  } else {
    floor
  }
}

/// Truncate `number` one digit past `precision`, then round that last digit
/// half-up. Not the same as rounding `number` directly: `x.xxxxx49` with
/// more digits behind it never rounds up.
pub fn to_fixed(number: f64, precision: u32) -> f64 {
  let multiplier = 10f64.powi(precision as i32 + 1);
  let whole = (number * multiplier).floor();
  round_half_up(whole / 10.0) * 10.0 / multiplier
}

/// Converts a single length into a viewport unit relative to a reference
/// size.
#[derive(Clone, Copy, Debug)]
pub struct Converter<'a> {
  pub unit: &'a str,
  pub size: f64,
  pub precision: u32,
  pub min_pixel_value: f64,
}

impl Converter<'_> {
  /// Returns the replacement for `matched`, whose numeric part is `number`.
  /// Lengths at or below the minimum are returned unchanged and a zero
  /// result is written without a unit.
  pub fn convert(&self, matched: &str, number: &str) -> String {
    let Ok(pixels) = number.parse::<f64>() else {
      return matched.to_string();
    };
    if pixels <= self.min_pixel_value {
      return matched.to_string();
    }

    let value = to_fixed(pixels / self.size * 100.0, self.precision);
    if value == 0.0 {
      return "0".to_string();
    }
    format!("{}{}", value, self.unit)
  }
}
