// src/experience.rs
//! Free-text experience requirement ("3-5 Yrs", "10+ yrs", "Fresher") to
//! numeric bounds and seniority tags.

use crate::types::{Experience, MaxYears, SeniorityTag};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static OPEN_ENDED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*\+").expect("static regex"));
static RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*-\s*(\d+)\s*yrs").expect("static regex"));
static SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*yr(?:s)?").expect("static regex"));

/// Normalize an experience string. Never fails: text that matches no rule
/// yields no bounds and no tags.
pub fn normalize(raw: &str) -> Experience {
    let text = raw.trim().to_lowercase();

    let (min, max, mut tags) = if let Some(parsed) = fresher(&text) {
        parsed
    } else if let Some(parsed) = open_ended(&text) {
        parsed
    } else if let Some(parsed) = range(&text) {
        parsed
    } else if let Some(parsed) = single(&text) {
        parsed
    } else {
        return Experience::default();
    };

    if tags.is_empty() {
        tags.insert(fallback_tag(min));
    }

    Experience {
        min_years: Some(min),
        max_years: Some(max),
        tags,
    }
}

type Parsed = (u32, MaxYears, BTreeSet<SeniorityTag>);

fn fresher(text: &str) -> Option<Parsed> {
    if text.contains("fresher") || text.contains("0-1 yrs") || text == "0 yrs" {
        Some((
            0,
            MaxYears::Years(0),
            tags(&[SeniorityTag::EntryLevel, SeniorityTag::Fresher]),
        ))
    } else {
        None
    }
}

fn open_ended(text: &str) -> Option<Parsed> {
    if !text.contains('+') {
        return None;
    }
    let min = capture_years(&OPEN_ENDED, text, 1)?;
    let level = if min >= 10 {
        tags(&[SeniorityTag::SeniorLevel, SeniorityTag::LeadLevel])
    } else {
        tags(&[SeniorityTag::MidSeniorLevel])
    };
    Some((min, MaxYears::Unbounded, level))
}

fn range(text: &str) -> Option<Parsed> {
    let a = capture_years(&RANGE, text, 1)?;
    let b = capture_years(&RANGE, text, 2)?;
    let (min, max) = if a <= b { (a, b) } else { (b, a) };
    let level = match max {
        0..=2 => tags(&[SeniorityTag::EntryLevel, SeniorityTag::JuniorLevel]),
        3..=5 => tags(&[SeniorityTag::JuniorLevel, SeniorityTag::MidLevel]),
        6..=10 => tags(&[SeniorityTag::MidLevel, SeniorityTag::MidSeniorLevel]),
        _ => tags(&[SeniorityTag::SeniorLevel]),
    };
    Some((min, MaxYears::Years(max), level))
}

fn single(text: &str) -> Option<Parsed> {
    let years = capture_years(&SINGLE, text, 1)?;
    let level = match years {
        0 => tags(&[SeniorityTag::EntryLevel, SeniorityTag::Fresher]),
        1..=2 => tags(&[SeniorityTag::JuniorLevel]),
        3..=10 => tags(&[SeniorityTag::MidLevel]),
        _ => tags(&[SeniorityTag::SeniorLevel]),
    };
    Some((years, MaxYears::Years(years), level))
}

fn fallback_tag(min: u32) -> SeniorityTag {
    match min {
        0 => SeniorityTag::EntryLevel,
        1..=2 => SeniorityTag::JuniorLevel,
        3..=5 => SeniorityTag::MidLevel,
        6..=10 => SeniorityTag::MidSeniorLevel,
        _ => SeniorityTag::SeniorLevel,
    }
}

fn capture_years(re: &Regex, text: &str, group: usize) -> Option<u32> {
    re.captures(text)?.get(group)?.as_str().parse().ok()
}

fn tags(list: &[SeniorityTag]) -> BTreeSet<SeniorityTag> {
    list.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use SeniorityTag::*;

    fn labels(exp: &Experience) -> Vec<&'static str> {
        exp.tags.iter().map(|t| t.label()).collect()
    }

    #[test]
    fn test_fresher_variants() {
        for raw in ["Fresher", "fresher jobs", "0-1 Yrs", "0 Yrs", " 0 yrs "] {
            let exp = normalize(raw);
            assert_eq!(exp.min_years, Some(0), "{}", raw);
            assert_eq!(exp.max_years, Some(MaxYears::Years(0)), "{}", raw);
            assert!(exp.tags.contains(&EntryLevel), "{}", raw);
            assert!(exp.tags.contains(&Fresher), "{}", raw);
        }
    }

    #[test]
    fn test_open_ended() {
        let exp = normalize("5+ yrs");
        assert_eq!(exp.min_years, Some(5));
        assert_eq!(exp.max_years, Some(MaxYears::Unbounded));
        assert_eq!(exp.max_years.unwrap().legacy_value(), 999);
        assert_eq!(labels(&exp), vec!["Mid-Senior Level"]);

        let exp = normalize("12+ yrs");
        assert_eq!(exp.min_years, Some(12));
        assert_eq!(labels(&exp), vec!["Lead Level", "Senior Level"]);
    }

    #[test]
    fn test_range() {
        let exp = normalize("3-5 Yrs");
        assert_eq!(exp.min_years, Some(3));
        assert_eq!(exp.max_years, Some(MaxYears::Years(5)));
        assert_eq!(labels(&exp), vec!["Junior Level", "Mid Level"]);

        assert_eq!(
            normalize("1-2 Yrs").tags,
            tags(&[EntryLevel, JuniorLevel])
        );
        assert_eq!(
            normalize("4 - 9 yrs").tags,
            tags(&[MidLevel, MidSeniorLevel])
        );
        assert_eq!(normalize("10-15 Yrs").tags, tags(&[SeniorLevel]));
    }

    #[test]
    fn test_range_keeps_min_not_above_max() {
        let exp = normalize("8-4 Yrs");
        assert_eq!(exp.min_years, Some(4));
        assert_eq!(exp.max_years, Some(MaxYears::Years(8)));
    }

    #[test]
    fn test_single_year() {
        let exp = normalize("7 yrs");
        assert_eq!(exp.min_years, Some(7));
        assert_eq!(exp.max_years, Some(MaxYears::Years(7)));
        assert_eq!(labels(&exp), vec!["Mid Level"]);

        assert_eq!(normalize("1 yr").tags, tags(&[JuniorLevel]));
        assert_eq!(normalize("0 yr").tags, tags(&[EntryLevel, Fresher]));
        assert_eq!(normalize("about 0 yrs").tags, tags(&[EntryLevel, Fresher]));
        assert_eq!(normalize("15 Yrs").tags, tags(&[SeniorLevel]));
    }

    #[test]
    fn test_unparseable() {
        for raw in ["garbage", "N/A", "", "+", "Not disclosed"] {
            let exp = normalize(raw);
            assert_eq!(exp, Experience::default(), "{}", raw);
        }
    }

    #[test]
    fn test_plus_without_number_falls_through() {
        let exp = normalize("C++ 2 yrs");
        assert_eq!(exp.min_years, Some(2));
        assert_eq!(exp.max_years, Some(MaxYears::Years(2)));
    }

    #[test]
    fn test_fallback_ladder() {
        assert_eq!(fallback_tag(0), EntryLevel);
        assert_eq!(fallback_tag(2), JuniorLevel);
        assert_eq!(fallback_tag(5), MidLevel);
        assert_eq!(fallback_tag(10), MidSeniorLevel);
        assert_eq!(fallback_tag(11), SeniorLevel);
    }
}
