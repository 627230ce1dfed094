use crate::case_model::all_case_variants;
use crate::error::{Error, Result};
use regex::bytes::{Captures, Regex, RegexBuilder};

/// One compiled replacement rule: a byte regex plus a replacement template
/// with `\1`-style back-references. Rule order is significant; it is the
/// tie-break when matches of different rules overlap.
#[derive(Debug, Clone)]
pub struct Rule {
    pub regex: Regex,
    pub replacement: Vec<u8>,
}

impl Rule {
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// Options applied while parsing and compiling a rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleFlags {
    /// Escape patterns so every metacharacter matches itself.
    pub literal: bool,
    /// Wrap each pattern in `\b ... \b`.
    pub word_breaks: bool,
    /// Compile case-insensitively. Mutually exclusive with `preserve_case`.
    pub insensitive: bool,
    /// Let `.` match newlines.
    pub dotall: bool,
    /// Expand each rule into its four case variants as additional rules.
    pub preserve_case: bool,
}

/// Parse a rule set from pattern text.
///
/// Each non-blank, non-comment line is `<pattern>\t<replacement>`. Comment
/// lines start with `#` after optional whitespace. Case-variant expansion
/// happens on the source strings, before compilation; duplicates are removed
/// and the result is sorted so expansion is deterministic.
pub fn parse_patterns(pattern_text: &str, flags: RuleFlags) -> Result<Vec<Rule>> {
    if flags.insensitive && flags.preserve_case {
        return Err(Error::Usage(
            "cannot use --insensitive and --preserve-case at once".to_string(),
        ));
    }

    let mut rules = Vec::new();
    for line in pattern_text.lines() {
        if line.trim_start().starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 2 {
            return Err(Error::PatternParse(format!(
                "expected 'pattern<TAB>replacement', got: '{line}'"
            )));
        }
        let (pattern, replacement) = (fields[0], fields[1]);

        let pattern = if flags.literal {
            regex::escape(pattern)
        } else {
            pattern.to_string()
        };

        let mut pairs: Vec<(String, String)> = Vec::new();
        if flags.preserve_case {
            pairs.extend(
                all_case_variants(&pattern)
                    .into_iter()
                    .zip(all_case_variants(replacement)),
            );
        }
        pairs.push((pattern, replacement.to_string()));
        // Dedup to avoid spurious overlap warnings from identical variants.
        pairs.sort();
        pairs.dedup();

        for (pattern, replacement) in pairs {
            let pattern = if flags.word_breaks {
                format!(r"\b{pattern}\b")
            } else {
                pattern
            };
            let regex = RegexBuilder::new(&pattern)
                .case_insensitive(flags.insensitive)
                .dot_matches_new_line(flags.dotall)
                .build()
                .map_err(|e| Error::PatternParse(format!("{e}")))?;
            rules.push(Rule {
                regex,
                replacement: replacement.into_bytes(),
            });
        }
    }

    if rules.is_empty() {
        return Err(Error::PatternParse(
            "no rules found in pattern text".to_string(),
        ));
    }
    Ok(rules)
}

/// Expand a replacement template against the capture groups of one match,
/// appending the result to `out`.
///
/// Supports `\1`..`\99`, `\g<name>`, `\g<1>`, and the escapes `\n`, `\t`,
/// `\r`, `\\`. A reference to a group that did not participate expands to
/// nothing. Any other escape is kept literally.
pub fn expand_replacement(caps: &Captures<'_>, template: &[u8], out: &mut Vec<u8>) {
    let mut i = 0;
    while i < template.len() {
        if template[i] != b'\\' {
            out.push(template[i]);
            i += 1;
            continue;
        }
        let Some(&next) = template.get(i + 1) else {
            out.push(b'\\');
            break;
        };
        match next {
            b'0'..=b'9' => {
                let mut j = i + 1;
                while j < template.len() && template[j].is_ascii_digit() {
                    j += 1;
                }
                let index: usize = std::str::from_utf8(&template[i + 1..j])
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(usize::MAX);
                if let Some(m) = caps.get(index) {
                    out.extend_from_slice(m.as_bytes());
                }
                i = j;
            },
            b'g' if template.get(i + 2) == Some(&b'<') => {
                let Some(close) = template[i + 3..].iter().position(|&b| b == b'>') else {
                    out.extend_from_slice(b"\\g");
                    i += 2;
                    continue;
                };
                let name = &template[i + 3..i + 3 + close];
                if let Ok(name) = std::str::from_utf8(name) {
                    let group = if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
                        name.parse::<usize>().ok().and_then(|idx| caps.get(idx))
                    } else {
                        caps.name(name)
                    };
                    if let Some(m) = group {
                        out.extend_from_slice(m.as_bytes());
                    }
                }
                i += 3 + close + 1;
            },
            b'n' => {
                out.push(b'\n');
                i += 2;
            },
            b't' => {
                out.push(b'\t');
                i += 2;
            },
            b'r' => {
                out.push(b'\r');
                i += 2;
            },
            b'\\' => {
                out.push(b'\\');
                i += 2;
            },
            other => {
                out.push(b'\\');
                out.push(other);
                i += 2;
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_str(rule: &Rule, input: &[u8]) -> Vec<u8> {
        let caps = rule.regex.captures(input).unwrap();
        let mut out = Vec::new();
        expand_replacement(&caps, &rule.replacement, &mut out);
        out
    }

    #[test]
    fn parses_simple_rules() {
        let rules = parse_patterns("foo\tbar\nbaz\tqux\n", RuleFlags::default()).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].pattern(), "foo");
        assert_eq!(rules[0].replacement, b"bar");
    }

    #[test]
    fn skips_comments_and_blanks() {
        let text = "# a comment\n\n   # indented comment\nfoo\tbar\n";
        let rules = parse_patterns(text, RuleFlags::default()).unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = parse_patterns("no_tab_here\n", RuleFlags::default()).unwrap_err();
        assert!(matches!(err, Error::PatternParse(_)));

        let err = parse_patterns("a\tb\tc\n", RuleFlags::default()).unwrap_err();
        assert!(matches!(err, Error::PatternParse(_)));
    }

    #[test]
    fn rejects_empty_rule_set() {
        let err = parse_patterns("# only a comment\n", RuleFlags::default()).unwrap_err();
        assert!(matches!(err, Error::PatternParse(_)));
    }

    #[test]
    fn rejects_bad_regex() {
        let err = parse_patterns("foo(\tbar\n", RuleFlags::default()).unwrap_err();
        assert!(matches!(err, Error::PatternParse(_)));
    }

    #[test]
    fn rejects_insensitive_with_preserve_case() {
        let flags = RuleFlags {
            insensitive: true,
            preserve_case: true,
            ..Default::default()
        };
        let err = parse_patterns("foo\tbar\n", flags).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }

    #[test]
    fn literal_mode_escapes_metacharacters() {
        let flags = RuleFlags {
            literal: true,
            ..Default::default()
        };
        let rules = parse_patterns("a.b\tx\n", flags).unwrap();
        assert!(rules[0].regex.is_match(b"a.b"));
        assert!(!rules[0].regex.is_match(b"aXb"));
    }

    #[test]
    fn word_breaks_wrap_pattern() {
        let flags = RuleFlags {
            word_breaks: true,
            ..Default::default()
        };
        let rules = parse_patterns("foo\tbar\n", flags).unwrap();
        assert!(rules[0].regex.is_match(b"a foo b"));
        assert!(!rules[0].regex.is_match(b"foobar"));
    }

    #[test]
    fn preserve_case_expands_variants() {
        let flags = RuleFlags {
            preserve_case: true,
            ..Default::default()
        };
        let rules = parse_patterns("foo_bar\txxx_yyy\n", flags).unwrap();
        let patterns: Vec<&str> = rules.iter().map(Rule::pattern).collect();
        assert!(patterns.contains(&"fooBar"));
        assert!(patterns.contains(&"FooBar"));
        assert!(patterns.contains(&"foo_bar"));
        assert!(patterns.contains(&"FOO_BAR"));
        // Original equals the lower_underscore variant, so four rules total.
        assert_eq!(rules.len(), 4);
    }

    #[test]
    fn preserve_case_keeps_original_spelling() {
        let flags = RuleFlags {
            preserve_case: true,
            ..Default::default()
        };
        // An original that is not itself one of the four variants survives
        // alongside them.
        let rules = parse_patterns("FOOBar\tNEWName\n", flags).unwrap();
        let patterns: Vec<&str> = rules.iter().map(Rule::pattern).collect();
        assert!(patterns.contains(&"FOOBar"));
        assert_eq!(rules.len(), 5);
    }

    #[test]
    fn case_insensitive_flag() {
        let flags = RuleFlags {
            insensitive: true,
            ..Default::default()
        };
        let rules = parse_patterns("foo\tbar\n", flags).unwrap();
        assert!(rules[0].regex.is_match(b"FOO"));
    }

    #[test]
    fn dotall_flag() {
        let flags = RuleFlags {
            dotall: true,
            ..Default::default()
        };
        let rules = parse_patterns("a.b\tx\n", flags).unwrap();
        assert!(rules[0].regex.is_match(b"a\nb"));
    }

    #[test]
    fn expands_numeric_backrefs() {
        let rules = parse_patterns("figure ([0-9]+)\tFigure \\1\n", RuleFlags::default()).unwrap();
        assert_eq!(expand_str(&rules[0], b"figure 23"), b"Figure 23");
    }

    #[test]
    fn expands_named_groups() {
        let rules =
            parse_patterns("(?P<num>[0-9]+)\t[\\g<num>]\n", RuleFlags::default()).unwrap();
        assert_eq!(expand_str(&rules[0], b"42"), b"[42]");
    }

    #[test]
    fn expands_group_zero_and_escapes() {
        let rules = parse_patterns("ab\t<\\0>\\n\\t\\\\\n", RuleFlags::default()).unwrap();
        assert_eq!(expand_str(&rules[0], b"ab"), b"<ab>\n\t\\");
    }

    #[test]
    fn missing_group_expands_to_nothing() {
        let rules = parse_patterns("a(b)?c\t[\\1]\n", RuleFlags::default()).unwrap();
        assert_eq!(expand_str(&rules[0], b"ac"), b"[]");
        assert_eq!(expand_str(&rules[0], b"abc"), b"[b]");
    }

    #[test]
    fn unknown_escape_kept_literally() {
        let rules = parse_patterns("a\t\\q\n", RuleFlags::default()).unwrap();
        assert_eq!(expand_str(&rules[0], b"a"), b"\\q");
    }
}
