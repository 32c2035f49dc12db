//! Small utility helpers used across modules.

/// Trimmed text, or `None` when nothing but whitespace is left.
pub fn non_blank(s: &str) -> Option<&str> {
  let t = s.trim();
  if t.is_empty() { None } else { Some(t) }
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn non_blank_trims() {
    assert_eq!(non_blank("  hi \n"), Some("hi"));
    assert_eq!(non_blank(" \t "), None);
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    let s = "词汇词汇词汇";
    let t = trunc_for_log(s, 4);
    assert!(t.starts_with("词"));
    assert!(t.ends_with("(18 bytes total)"));
    assert_eq!(trunc_for_log("short", 10), "short");
  }
}
