use crate::logging::Log;
use crate::pattern::{expand_replacement, Rule};
use bstr::ByteSlice;
use regex::bytes::Captures;

/// Counters for one replacement pass: candidates found across all rules, and
/// matches actually applied after overlap resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchCounts {
    pub found: usize,
    pub valid: usize,
}

impl MatchCounts {
    pub fn add(&mut self, other: MatchCounts) {
        self.found += other.found;
        self.valid += other.valid;
    }
}

struct Candidate<'a> {
    rule: usize,
    caps: Captures<'a>,
    start: usize,
    end: usize,
}

fn overlaps(a: &Candidate<'_>, b: &Candidate<'_>) -> bool {
    a.start < b.end && b.start < a.end
}

fn overlap_warning(
    source_name: Option<&str>,
    rules: &[Rule],
    dropped: &Candidate<'_>,
    kept: &Candidate<'_>,
    side: &str,
) -> String {
    let prefix = match source_name {
        Some(name) => format!("- {name}: "),
        None => "- ".to_string(),
    };
    format!(
        "{prefix}Skipping overlapping match '{}' of '{}' that overlaps '{}' of '{}' on its {side}",
        dropped.caps[0].to_str_lossy(),
        rules[dropped.rule].pattern(),
        kept.caps[0].to_str_lossy(),
        rules[kept.rule].pattern(),
    )
}

/// Replace all occurrences in the input given an ordered rule set,
/// simultaneously, so that no replacement affects any other.
///
/// Every rule is matched against the original input; the candidates are then
/// pruned to a disjoint selection (earlier rules win conflicts, each dropped
/// candidate is logged) and applied in one left-to-right pass.
pub fn multi_replace(
    input: &[u8],
    rules: &[Rule],
    source_name: Option<&str>,
    log: &dyn Log,
) -> (Vec<u8>, MatchCounts) {
    let mut candidates: Vec<Candidate<'_>> = Vec::new();
    for (rule, r) in rules.iter().enumerate() {
        for caps in r.regex.captures_iter(input) {
            let m = caps.get(0).map(|m| (m.start(), m.end()));
            let Some((start, end)) = m else { continue };
            if start == end {
                continue;
            }
            candidates.push(Candidate {
                rule,
                caps,
                start,
                end,
            });
        }
    }
    let found = candidates.len();

    // Insert each candidate into a start-sorted selection, dropping any that
    // overlaps its would-be neighbor on either side. Candidates arrive in
    // rule order, so the rule listed first wins every conflict.
    let mut selection: Vec<Candidate<'_>> = Vec::new();
    let mut starts: Vec<usize> = Vec::new();
    'candidates: for candidate in candidates {
        let index = starts.partition_point(|&s| s < candidate.start);
        if index > 0 {
            let prev = &selection[index - 1];
            if overlaps(prev, &candidate) {
                log.log(&overlap_warning(source_name, rules, &candidate, prev, "left"));
                continue 'candidates;
            }
        }
        if index < selection.len() {
            let next = &selection[index];
            if overlaps(next, &candidate) {
                log.log(&overlap_warning(source_name, rules, &candidate, next, "right"));
                continue 'candidates;
            }
        }
        starts.insert(index, candidate.start);
        selection.insert(index, candidate);
    }
    let valid = selection.len();

    let mut out = Vec::with_capacity(input.len());
    let mut pos = 0;
    for candidate in &selection {
        out.extend_from_slice(&input[pos..candidate.start]);
        expand_replacement(&candidate.caps, &rules[candidate.rule].replacement, &mut out);
        pos = candidate.end;
    }
    out.extend_from_slice(&input[pos..]);

    (out, MatchCounts { found, valid })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{MemoryLog, NullLog};
    use crate::pattern::{parse_patterns, RuleFlags};

    fn rules(text: &str) -> Vec<Rule> {
        parse_patterns(text, RuleFlags::default()).unwrap()
    }

    fn replace(input: &[u8], rule_text: &str) -> (Vec<u8>, MatchCounts) {
        multi_replace(input, &rules(rule_text), None, &NullLog)
    }

    #[test]
    fn independent_patterns() {
        let (out, counts) = replace(b"foo bar baz", "foo\tX\nbar\tY\n");
        assert_eq!(out, b"X Y baz");
        assert_eq!(counts, MatchCounts { found: 2, valid: 2 });
    }

    #[test]
    fn overlap_drops_later_rule() {
        let (out, counts) = replace(b"foobar", "foobar\tL\nfoo\tS\n");
        assert_eq!(out, b"L");
        assert_eq!(counts, MatchCounts { found: 2, valid: 1 });
    }

    #[test]
    fn overlap_is_deterministic_by_rule_order() {
        // Same patterns, opposite order: the earlier rule wins.
        let (out, _) = replace(b"foobar", "foo\tS\nfoobar\tL\n");
        assert_eq!(out, b"Sbar");
    }

    #[test]
    fn swap_is_simultaneous() {
        let (out, counts) = replace(b"a b a b", "a\tb\nb\ta\n");
        assert_eq!(out, b"b a b a");
        assert_eq!(counts, MatchCounts { found: 4, valid: 4 });
    }

    #[test]
    fn backrefs_expand_per_match() {
        let (out, _) = replace(
            b"See figure 1 and figure 23",
            "figure ([0-9]+)\tFigure \\1\n",
        );
        assert_eq!(out, b"See Figure 1 and Figure 23");
    }

    #[test]
    fn non_matching_rule_changes_nothing() {
        let base = replace(b"some text here", "text\twords\n");
        let extended = replace(b"some text here", "text\twords\nabsent\tX\n");
        assert_eq!(base.0, extended.0);
    }

    #[test]
    fn replacements_never_cascade() {
        // Sequential application would turn "ab" into "cc"; simultaneous
        // application must not rematch inside a replacement.
        let (out, _) = replace(b"ab", "a\tb\nb\tc\n");
        assert_eq!(out, b"bc");
    }

    #[test]
    fn overlap_warnings_name_both_rules() {
        let log = MemoryLog::new();
        let rule_set = rules("foobar\tL\nfoo\tS\n");
        multi_replace(b"foobar", &rule_set, Some("test.txt"), &log);
        let messages = log.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("test.txt"));
        assert!(messages[0].contains("'foo'"));
        assert!(messages[0].contains("'foobar'"));
    }

    #[test]
    fn empty_input() {
        let (out, counts) = replace(b"", "foo\tbar\n");
        assert_eq!(out, b"");
        assert_eq!(counts, MatchCounts::default());
    }

    #[test]
    fn zero_width_matches_are_ignored() {
        let (out, counts) = replace(b"xyz", "a*\tQ\n");
        assert_eq!(out, b"xyz");
        assert_eq!(counts.valid, 0);
    }

    #[test]
    fn invalid_utf8_content_is_tolerated() {
        let input = b"\xff\xfe foo \xff";
        let (out, counts) = replace(input, "foo\tbar\n");
        assert_eq!(out, b"\xff\xfe bar \xff");
        assert_eq!(counts.valid, 1);
    }

    #[test]
    fn counts_accumulate() {
        let mut total = MatchCounts::default();
        total.add(MatchCounts { found: 2, valid: 1 });
        total.add(MatchCounts { found: 3, valid: 3 });
        assert_eq!(total, MatchCounts { found: 5, valid: 4 });
    }
}
