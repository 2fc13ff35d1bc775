//! Identifier casing conversion.
//!
//! Vue templates accept both `myProp` and `my-prop` for the same member, and
//! both `FooBar` and `foo-bar` for the same component tag.

/// Converts a camel/Pascal-case identifier to kebab-case.
///
/// A run of capitals is one word unless its last capital starts a new
/// lowercase word: `HTMLInput` becomes `html-input`. Input that is already
/// kebab-case passes through untouched.
pub fn kebabize(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_uppercase() {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let mut run_end = i;
        while run_end < chars.len() && chars[run_end].is_ascii_uppercase() {
            run_end += 1;
        }
        // The capital right before a lowercase letter belongs to the next word.
        if run_end < chars.len() && chars[run_end].is_ascii_lowercase() {
            run_end -= 1;
        }
        let run_end = run_end.max(i + 1);

        if i > 0 {
            out.push('-');
        }
        out.extend(chars[i..run_end].iter().map(char::to_ascii_lowercase));
        i = run_end;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(kebabize("fooBar"), "foo-bar");
        assert_eq!(kebabize("myProp"), "my-prop");
        assert_eq!(kebabize("modelValueChanged"), "model-value-changed");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(kebabize("FooBar"), "foo-bar");
        assert_eq!(kebabize("Btn"), "btn");
    }

    #[test]
    fn test_single_word_unchanged() {
        assert_eq!(kebabize("foo"), "foo");
        assert_eq!(kebabize("label"), "label");
    }

    #[test]
    fn test_acronyms() {
        assert_eq!(kebabize("HTMLInput"), "html-input");
        assert_eq!(kebabize("fooBAR"), "foo-bar");
        assert_eq!(kebabize("ABc"), "a-bc");
    }

    #[test]
    fn test_digits_and_hyphens_pass_through() {
        assert_eq!(kebabize("h1Title"), "h1-title");
        assert_eq!(kebabize("already-kebab"), "already-kebab");
        assert_eq!(kebabize("update:modelValue"), "update:model-value");
    }

    #[test]
    fn test_empty() {
        assert_eq!(kebabize(""), "");
    }
}
