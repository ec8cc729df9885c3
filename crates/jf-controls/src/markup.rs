//! Label markup helpers.

/// Line-break markup understood by panel labels.
pub const NEWLINE: &str = "<br>";

/// Replace newline sequences (`\n`, `\r`, `\r\n`, `\n\r`) with the panel's
/// line-break markup.
pub fn normalize_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => {
                if chars.peek() == Some(&'\r') {
                    chars.next();
                }
                out.push_str(NEWLINE);
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str(NEWLINE);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Wrap text in color markup. `color_hex` is of the form `#FFFFFF`.
pub fn colored_text(text: &str, color_hex: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("<FONT color=\"{color_hex}\">{text}</FONT>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_newline_sequences_collapse_to_markup() {
        assert_eq!(normalize_newlines("a\nb"), "a<br>b");
        assert_eq!(normalize_newlines("a\rb"), "a<br>b");
        assert_eq!(normalize_newlines("a\r\nb"), "a<br>b");
        assert_eq!(normalize_newlines("a\n\rb"), "a<br>b");
        assert_eq!(normalize_newlines("a\n\nb"), "a<br><br>b");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(normalize_newlines("hello"), "hello");
    }

    #[test]
    fn colored_text_wraps_non_empty_only() {
        assert_eq!(colored_text("", "#FF0000"), "");
        assert_eq!(
            colored_text("on", "#FF0000"),
            "<FONT color=\"#FF0000\">on</FONT>"
        );
    }
}
