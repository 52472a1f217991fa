pub mod passes;

use passes::{
    attach_and_truncate, is_substantial, normalize_spacing, resolve_links, split_date_prefix,
    strip_bullet, strip_emphasis, strip_markup,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanOptions {
    pub max_len: usize,
    pub keep_date_prefix: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            max_len: 200,
            keep_date_prefix: true,
        }
    }
}

/// Eight-pass pipeline: one raw wikitext line → one readable event, or `None`.
pub fn clean_event_line(line: &str, opts: CleanOptions) -> Option<String> {
    let text = strip_bullet(line)?;

    let (date_prefix, text) = split_date_prefix(text);
    let prefix = date_prefix.filter(|_| opts.keep_date_prefix);

    let text = strip_markup(text);
    let text = resolve_links(&text);
    let text = strip_emphasis(&text);
    let text = normalize_spacing(&text);

    if !is_substantial(&text) {
        return None;
    }

    Some(attach_and_truncate(prefix.as_deref(), &text, opts.max_len))
}

/// Clean every line of a section in document order, keeping at most `limit` events.
pub fn extract_month_events(wikitext: &str, limit: usize, opts: CleanOptions) -> Vec<String> {
    wikitext
        .lines()
        .filter_map(|line| clean_event_line(line, opts))
        .take(limit)
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const NO_DATES: CleanOptions = CleanOptions {
        max_len: 200,
        keep_date_prefix: false,
    };

    fn fixture() -> String {
        std::fs::read_to_string("tests/fixtures/january_1997.wikitext").unwrap()
    }

    #[test]
    fn rejects_non_bullets() {
        for line in ["== January ==", "{{Main|January 1997}}", "", "Plain prose line here"] {
            assert_eq!(clean_event_line(line, CleanOptions::default()), None, "{line}");
        }
    }

    #[test]
    fn link_label_wins() {
        let out = clean_event_line("* [[Stockholm|the capital]] hosted an event", NO_DATES).unwrap();
        assert!(out.contains("the capital hosted an event"));
        assert!(!out.contains("Stockholm"));
    }

    #[test]
    fn category_only_line_rejected() {
        assert_eq!(clean_event_line("* [[Category:Foo]]", NO_DATES), None);
    }

    #[test]
    fn keeps_short_date_prefix() {
        let out = clean_event_line(
            "* [[January 5]] - A notable event occurred today in the city",
            CleanOptions::default(),
        )
        .unwrap();
        assert!(out.starts_with("Jan 5 - "));
        assert_eq!(out, "Jan 5 - A notable event occurred today in the city");
    }

    #[test]
    fn drops_date_prefix_when_not_kept() {
        let out = clean_event_line(
            "* [[January 5]] – A notable event occurred today in the city",
            NO_DATES,
        )
        .unwrap();
        assert_eq!(out, "A notable event occurred today in the city");
    }

    #[test]
    fn date_prefix_does_not_count_toward_floor() {
        let opts = CleanOptions::default();
        assert_eq!(clean_event_line("* [[May 1]] – Strike", opts), None);
    }

    #[test]
    fn truncated_lines_end_in_ellipsis() {
        let line = format!("* {}", "word ".repeat(80));
        let out = clean_event_line(&line, CleanOptions { max_len: 50, keep_date_prefix: false }).unwrap();
        assert!(out.ends_with("..."));
        assert!(out.chars().count() <= 50);
        assert!(out.chars().count() >= 8);
    }

    #[test]
    fn exact_length_when_cut_lands_in_word() {
        let line = format!("* {}", "x".repeat(300));
        let out = clean_event_line(&line, CleanOptions::default()).unwrap();
        assert_eq!(out.chars().count(), 200);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn cleaning_is_idempotent() {
        let text = fixture();
        for opts in [NO_DATES, CleanOptions::default(), CleanOptions { max_len: 40, keep_date_prefix: true }] {
            for line in text.lines() {
                let Some(once) = clean_event_line(line, opts) else {
                    continue;
                };
                let twice = clean_event_line(&format!("* {once}"), opts);
                assert_eq!(twice.as_deref(), Some(once.as_str()), "{line}");
            }
        }
    }

    #[test]
    fn lengths_stay_in_bounds() {
        let text = fixture();
        for max_len in [8, 20, 64, 200] {
            let opts = CleanOptions { max_len, keep_date_prefix: true };
            for out in text.lines().filter_map(|l| clean_event_line(l, opts)) {
                let n = out.chars().count();
                assert!(n <= max_len, "{out:?} longer than {max_len}");
                assert!(!out.is_empty());
            }
        }
    }

    #[test]
    fn january_1997_events() {
        let events = extract_month_events(&fixture(), 6, NO_DATES);
        assert_eq!(
            events,
            vec![
                "Kofi Annan of Ghana becomes Secretary-General of the United Nations.",
                "Space Shuttle Atlantis launches on mission STS-81.",
                "Guerrillas release hostages",
                "Yasser Arafat returns to Hebron after more than 30 years, joining celebrations over the handover of the last Israeli-controlled West Bank city.",
                "President Clinton is sworn in for a second term.",
                "Madeleine Albright becomes the first female United States Secretary of State.",
            ]
        );
    }

    #[test]
    fn january_1997_with_dates() {
        let events = extract_month_events(&fixture(), 20, CleanOptions::default());
        assert_eq!(events.len(), 7);
        assert_eq!(events[0], "Jan 1 - Kofi Annan of Ghana becomes Secretary-General of the United Nations.");
        assert_eq!(events[2], "Guerrillas release hostages");
        assert_eq!(
            events[6],
            "Jan 26 - Super Bowl XXXI: The Green Bay Packers defeat the New England Patriots 35-21."
        );
    }

    #[test]
    fn zero_limit_yields_nothing() {
        assert!(extract_month_events(&fixture(), 0, NO_DATES).is_empty());
    }
}
