use std::panic::{AssertUnwindSafe, catch_unwind};

use regex::Regex;

/// Run `f`, turning a panic into its message.
///
/// Used at every boundary where a panic must degrade the output of a render
/// instead of unwinding into the caller.
pub fn catch_panic<T, F>(f: F) -> Result<T, String>
where
  F: FnOnce() -> T,
{
  catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
    payload
      .downcast_ref::<String>()
      .cloned()
      .or_else(|| payload.downcast_ref::<&str>().map(|s| (*s).to_owned()))
      .unwrap_or_else(|| "unknown panic payload".to_owned())
  })
}

/// Compile a regex, logging and falling back to one that never matches.
pub fn regex_or_never(pattern: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| {
    log::error!("Failed to compile regex {pattern:?}: {e}");
    never_matching_regex()
  })
}

/// A regex that can never match anything.
#[allow(
  clippy::expect_used,
  reason = "This pattern is guaranteed to be valid"
)]
pub fn never_matching_regex() -> Regex {
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_catch_panic_passes_value_through() {
    assert_eq!(catch_panic(|| 41 + 1), Ok(42));
  }

  #[test]
  #[allow(clippy::panic)]
  fn test_catch_panic_reports_message() {
    let result: Result<(), String> = catch_panic(|| panic!("boom {}", 7));
    assert_eq!(result, Err("boom 7".to_owned()));

    let result: Result<(), String> = catch_panic(|| panic!("static boom"));
    assert_eq!(result, Err("static boom".to_owned()));
  }

  #[test]
  fn test_never_matching_regex() {
    let re = never_matching_regex();
    assert!(!re.is_match(""));
    assert!(!re.is_match("anything at all"));
  }
}
