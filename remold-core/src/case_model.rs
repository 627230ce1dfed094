use regex::Regex;
use std::sync::OnceLock;

/// The recognized identifier spellings, in the order variants are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    LowerCamel,
    UpperCamel,
    LowerSnake,
    ScreamingSnake,
}

impl Style {
    pub const ALL: [Style; 4] = [
        Style::LowerCamel,
        Style::UpperCamel,
        Style::LowerSnake,
        Style::ScreamingSnake,
    ];
}

fn word_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w+").expect("word-run pattern"))
}

/// Split an identifier into its words plus the separator it uses.
///
/// Underscore names split on `_` (empty parts preserved). Anything else is
/// scanned as camel case: an uppercase code point starts a new word when the
/// previous code point is lowercase or the next one is, which keeps runs of
/// capitals together (`HTTPResponse` -> `HTTP`, `Response`).
pub fn split_name(name: &str) -> (&'static str, Vec<String>) {
    if name.contains('_') {
        return ("_", name.split('_').map(str::to_string).collect());
    }

    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev_lower = chars[i - 1].is_lowercase();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev_lower || next_lower {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    ("", words)
}

/// First letter uppercased, remainder lowercased.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}

/// Render a single identifier in the given style.
pub fn to_style(name: &str, style: Style) -> String {
    let (_, words) = split_name(name);
    if words.is_empty() {
        return String::new();
    }
    match style {
        Style::LowerCamel => {
            words[0].to_lowercase()
                + &words[1..]
                    .iter()
                    .map(|w| capitalize(w))
                    .collect::<String>()
        },
        Style::UpperCamel => words.iter().map(|w| capitalize(w)).collect(),
        Style::LowerSnake => words
            .iter()
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join("_"),
        Style::ScreamingSnake => words
            .iter()
            .map(|w| w.to_uppercase())
            .collect::<Vec<_>>()
            .join("_"),
    }
}

/// Apply a style to every word-like run in an expression, leaving all other
/// text (regex syntax, punctuation, whitespace) untouched.
pub fn transform_expr(expr: &str, style: Style) -> String {
    word_run()
        .replace_all(expr, |caps: &regex::Captures<'_>| to_style(&caps[0], style))
        .into_owned()
}

/// All four case variants of an expression, in fixed order.
///
/// This operates on source strings, before any pattern compilation.
pub fn all_case_variants(expr: &str) -> Vec<String> {
    Style::ALL
        .iter()
        .map(|&style| transform_expr(expr, style))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_underscore_name() {
        let (sep, words) = split_name("foo_bar_baz");
        assert_eq!(sep, "_");
        assert_eq!(words, vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn split_preserves_empty_parts() {
        let (sep, words) = split_name("_leading");
        assert_eq!(sep, "_");
        assert_eq!(words, vec!["", "leading"]);
    }

    #[test]
    fn split_camel_name() {
        let (sep, words) = split_name("fooBarBaz");
        assert_eq!(sep, "");
        assert_eq!(words, vec!["foo", "Bar", "Baz"]);
    }

    #[test]
    fn split_keeps_capital_runs_together() {
        let (_, words) = split_name("HTTPResponse");
        assert_eq!(words, vec!["HTTP", "Response"]);

        let (_, words) = split_name("parseHTTPResponse");
        assert_eq!(words, vec!["parse", "HTTP", "Response"]);
    }

    #[test]
    fn split_single_word() {
        let (sep, words) = split_name("word");
        assert_eq!(sep, "");
        assert_eq!(words, vec!["word"]);
    }

    #[test]
    fn style_rendering() {
        assert_eq!(to_style("foo_bar", Style::LowerCamel), "fooBar");
        assert_eq!(to_style("foo_bar", Style::UpperCamel), "FooBar");
        assert_eq!(to_style("fooBar", Style::LowerSnake), "foo_bar");
        assert_eq!(to_style("fooBar", Style::ScreamingSnake), "FOO_BAR");
    }

    #[test]
    fn variants_in_fixed_order() {
        assert_eq!(
            all_case_variants("foo_bar"),
            vec!["fooBar", "FooBar", "foo_bar", "FOO_BAR"]
        );
    }

    #[test]
    fn transform_leaves_non_word_text_alone() {
        assert_eq!(
            transform_expr("get_value\\(\\)", Style::UpperCamel),
            "GetValue\\(\\)"
        );
        assert_eq!(
            transform_expr("one_two three_four", Style::LowerCamel),
            "oneTwo threeFour"
        );
    }

    #[test]
    fn unicode_words() {
        let (_, words) = split_name("überMaß");
        assert_eq!(words, vec!["über", "Maß"]);
        assert_eq!(to_style("überMaß", Style::ScreamingSnake), "ÜBER_MASS");
    }

    #[test]
    fn capitalize_handles_empty() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("aBC"), "Abc");
    }
}
