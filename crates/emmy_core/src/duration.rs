//! Compact duration grammar.
//!
//! Durations are written as a run of `<number><scale>` pairs in descending scale
//! order, e.g. `12d`, `25mins`, `8.5ys` or `3mo5ws2days4.045secs`. A trailing number
//! without a scale counts as seconds. Every component is rounded to whole seconds.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

/// Scale suffixes in the order they may appear, with their length in seconds.
///
/// Years and months use the average Gregorian lengths.
pub const DURATION_SCALES: [(&str, u64); 7] = [
    ("y", 31_556_952),
    ("mo", 2_629_746),
    ("w", 604_800),
    ("d", 86_400),
    ("h", 3_600),
    ("m", 60),
    ("s", 1),
];

/// Sample inputs accepted by [`parse_duration`].
pub const DURATION_EXAMPLES: [&str; 4] = ["12d", "25mins", "8.5ys", "3mo 5ws 2days4.045secs"];

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^",
        r"(?:(\d+(?:\.\d+)?)(y)(?:ear)?s?)?",
        r"(?:(\d+(?:\.\d+)?)(mo)(?:nth)?s?)?",
        r"(?:(\d+(?:\.\d+)?)(w)(?:eek)?s?)?",
        r"(?:(\d+(?:\.\d+)?)(d)(?:ay)?s?)?",
        r"(?:(\d+(?:\.\d+)?)(h)(?:r|our)?s?)?",
        r"(?:(\d+(?:\.\d+)?)(m)(?:in|inute)?s?)?",
        r"(?:(\d+(?:\.\d+)?)(?:(s)(?:ec|econd)?s?)?)?",
        r"$",
    ))
    .expect("Valid duration regex")
});

fn scale_seconds(scale: &str) -> u64 {
    DURATION_SCALES
        .iter()
        .find(|(name, _)| *name == scale)
        .map(|(_, seconds)| *seconds)
        .unwrap_or(1)
}

/// Parse a compact duration.
///
/// Matching is case-insensitive and ignores whitespace between components.
/// Returns `None` for empty or malformed input.
///
/// # Examples
///
/// ```
/// use emmy_core::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("12d"), Some(Duration::from_secs(12 * 86_400)));
/// assert_eq!(parse_duration("1h30m"), Some(Duration::from_secs(5_400)));
/// assert_eq!(parse_duration("90"), Some(Duration::from_secs(90)));
/// assert_eq!(parse_duration("soon"), None);
/// ```
pub fn parse_duration(input: &str) -> Option<Duration> {
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    if sanitized.is_empty() {
        return None;
    }

    let captures = DURATION_PATTERN.captures(&sanitized)?;
    let mut total = 0u64;
    for component in 0..DURATION_SCALES.len() {
        let Some(amount) = captures.get(component * 2 + 1) else {
            continue;
        };
        let scale = captures
            .get(component * 2 + 2)
            .map(|m| m.as_str())
            .unwrap_or("s");
        let amount: f64 = amount.as_str().parse().ok()?;
        let seconds = (amount * scale_seconds(scale) as f64).round() as u64;
        total = total.saturating_add(seconds);
    }
    Some(Duration::from_secs(total))
}

/// Scale completions for a partially typed duration.
///
/// Only scales that may still follow the last one typed are offered, and only when
/// the input ends in a bare number.
///
/// # Examples
///
/// ```
/// use emmy_core::duration_scale_suggestions;
///
/// assert_eq!(duration_scale_suggestions("123ws4"), vec!["123ws4d", "123ws4h", "123ws4m", "123ws4s"]);
/// assert!(duration_scale_suggestions("123mo").is_empty());
/// ```
pub fn duration_scale_suggestions(partial: &str) -> Vec<String> {
    let current = partial.to_lowercase();
    let sanitized: String = current.chars().filter(|c| !c.is_whitespace()).collect();
    if sanitized.is_empty() {
        return Vec::new();
    }
    let Some(captures) = DURATION_PATTERN.captures(&sanitized) else {
        return Vec::new();
    };

    let group_count = DURATION_SCALES.len() * 2;
    let mut missing = 0;
    let mut last_scale = None;
    for index in (1..=group_count).rev() {
        match captures.get(index) {
            None => missing += 1,
            Some(group) => {
                let text = group.as_str();
                if last_scale.is_none() && DURATION_SCALES.iter().any(|(name, _)| *name == text) {
                    last_scale = Some(text);
                }
            }
        }
    }

    // An odd number of empty groups means a number is waiting for its scale
    if missing % 2 == 0 {
        return Vec::new();
    }
    let start = last_scale
        .and_then(|scale| DURATION_SCALES.iter().position(|(name, _)| *name == scale))
        .map(|position| position + 1)
        .unwrap_or(0);
    DURATION_SCALES[start..]
        .iter()
        .map(|(name, _)| format!("{}{}", current, name))
        .collect()
}

fn components(duration: Duration) -> [(u64, &'static str); 7] {
    let mut remaining = duration.as_secs();
    let mut parts = [(0u64, ""); 7];
    for (slot, (name, seconds)) in parts.iter_mut().zip(DURATION_SCALES.iter()) {
        *slot = (remaining / seconds, *name);
        remaining %= seconds;
    }
    parts
}

/// Render a duration in the compact grammar, e.g. `1d2h5s`.
///
/// # Examples
///
/// ```
/// use emmy_core::short_duration;
/// use std::time::Duration;
///
/// assert_eq!(short_duration(Duration::from_secs(93_605)), "1d2h5s");
/// assert_eq!(short_duration(Duration::ZERO), "0s");
/// ```
pub fn short_duration(duration: Duration) -> String {
    let rendered: String = components(duration)
        .iter()
        .filter(|(amount, _)| *amount != 0)
        .map(|(amount, scale)| format!("{}{}", amount, scale))
        .collect();
    if rendered.is_empty() {
        "0s".to_string()
    } else {
        rendered
    }
}

/// Render a duration in words, e.g. `1 day, 2 hours, 5 seconds`.
///
/// # Examples
///
/// ```
/// use emmy_core::long_duration;
/// use std::time::Duration;
///
/// assert_eq!(long_duration(Duration::from_secs(3_661)), "1 hour, 1 minute, 1 second");
/// ```
pub fn long_duration(duration: Duration) -> String {
    const WORDS: [&str; 7] = ["year", "month", "week", "day", "hour", "minute", "second"];
    let rendered: Vec<String> = components(duration)
        .iter()
        .zip(WORDS)
        .filter(|((amount, _), _)| *amount != 0)
        .map(|((amount, _), word)| {
            let plural = if *amount > 1 { "s" } else { "" };
            format!("{} {}{}", amount, word, plural)
        })
        .collect();
    if rendered.is_empty() {
        "0 seconds".to_string()
    } else {
        rendered.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_suffixes() {
        assert_eq!(parse_duration("25mins"), Some(Duration::from_secs(1_500)));
        assert_eq!(parse_duration("2days"), Some(Duration::from_secs(172_800)));
        assert_eq!(parse_duration("3hours"), Some(Duration::from_secs(10_800)));
    }

    #[test]
    fn test_parse_fractional_rounds_to_seconds() {
        assert_eq!(parse_duration("4.045secs"), Some(Duration::from_secs(4)));
        assert_eq!(parse_duration("1.5m"), Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_parse_ignores_whitespace_and_case() {
        let expected = 3 * 2_629_746 + 5 * 604_800 + 2 * 86_400 + 4;
        assert_eq!(
            parse_duration("3MO 5ws 2days4.045secs"),
            Some(Duration::from_secs(expected))
        );
    }

    #[test]
    fn test_parse_rejects_out_of_order_scales() {
        assert_eq!(parse_duration("5m2h"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("   "), None);
    }

    #[test]
    fn test_suggestions_for_bare_number() {
        assert_eq!(
            duration_scale_suggestions("123"),
            vec!["123y", "123mo", "123w", "123d", "123h", "123m", "123s"]
        );
    }

    #[test]
    fn test_suggestions_after_hours() {
        assert_eq!(duration_scale_suggestions("123ws4h56"), vec!["123ws4h56m", "123ws4h56s"]);
    }

    #[test]
    fn test_short_round_trip() {
        let duration = Duration::from_secs(31_556_952 + 2 * 3_600 + 7);
        let short = short_duration(duration);
        assert_eq!(short, "1y2h7s");
        assert_eq!(parse_duration(&short), Some(duration));
    }

    #[test]
    fn test_long_pluralises() {
        assert_eq!(long_duration(Duration::from_secs(2 * 604_800)), "2 weeks");
        assert_eq!(long_duration(Duration::ZERO), "0 seconds");
    }
}
