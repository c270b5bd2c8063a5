//! Page text normalization.
//!
//! Statement pages come out of text extraction with arbitrary line breaks and
//! ragged runs of whitespace depending on the layout variant. The catalog
//! patterns are written against a single normalized line per page.

/// Collapse a raw page into one normalized line: every newline becomes a
/// single space, then every maximal run of two-or-more whitespace characters
/// collapses to exactly one space. A lone whitespace character other than a
/// newline passes through unchanged.
///
/// Pure and idempotent; the output never contains a newline and is never
/// longer than the input.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut run_len = 0usize;
    let mut run_char = ' ';

    for c in raw.chars() {
        let c = if c == '\n' { ' ' } else { c };
        if c.is_whitespace() {
            if run_len == 0 {
                run_char = c;
            }
            run_len += 1;
        } else {
            match run_len {
                0 => {}
                1 => out.push(run_char),
                _ => out.push(' '),
            }
            run_len = 0;
            out.push(c);
        }
    }
    match run_len {
        0 => {}
        1 => out.push(run_char),
        _ => out.push(' '),
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_newlines_with_spaces() {
        assert_eq!(normalize("a\nb"), "a b");
        assert_eq!(normalize("a\r\nb"), "a b");
    }

    #[test]
    fn test_collapses_whitespace_runs() {
        assert_eq!(normalize("a   b"), "a b");
        assert_eq!(normalize("a \t b"), "a b");
        assert_eq!(normalize("a\n\n\nb"), "a b");
    }

    #[test]
    fn test_single_whitespace_passes_through() {
        assert_eq!(normalize("a b"), "a b");
        assert_eq!(normalize("a\tb"), "a\tb");
        assert_eq!(normalize("a b "), "a b ");
    }

    #[test]
    fn test_output_is_newline_free() {
        let inputs = ["", "\n", "a\nb\nc", "x\r\n\r\ny", "  \n  ", "\n\n\n"];
        for input in inputs {
            assert!(!normalize(input).contains('\n'), "input: {:?}", input);
        }
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "",
            "plain text",
            "Customer #: 10023  (ACME SUPPLY)\nPhone 2",
            "  leading and trailing  ",
            "a\tb\nc   d",
            "x\r\n\r\ny",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_never_longer_than_input() {
        let inputs = ["a   b", "\n\n", "x y z", "", "a\t\t\tb"];
        for input in inputs {
            assert!(normalize(input).len() <= input.len(), "input: {:?}", input);
        }
    }
}
