use crate::error::{Error, ErrorKind, Result};
use exn::ResultExt;
use mpdl_extract::models::{ChapterNumber, ChapterRef};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// An inclusive chapter range whose start never exceeds its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterRange {
    start: ChapterNumber,
    end: ChapterNumber,
}
impl ChapterRange {
    pub fn new(start: impl Into<ChapterNumber>, end: impl Into<ChapterNumber>) -> Result<Self> {
        let (start, end) = (start.into(), end.into());
        if start > end {
            exn::bail!(ErrorKind::ReversedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> ChapterNumber {
        self.start
    }

    pub fn end(&self) -> ChapterNumber {
        self.end
    }

    pub fn contains(&self, number: ChapterNumber) -> bool {
        self.start <= number && number <= self.end
    }
}

/// Which chapters of a listing to process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChapterSelector {
    #[default]
    None,
    Single(ChapterNumber),
    Range(ChapterRange),
}
impl ChapterSelector {
    /// Picks the chapters to process, highest number first.
    ///
    /// `Single` takes the first exact match only; `Range` takes every chapter
    /// inside it.
    pub fn select(&self, mut chapters: Vec<ChapterRef>) -> Vec<ChapterRef> {
        chapters.sort_by(|a, b| b.number.cmp(&a.number));
        match self {
            Self::None => Vec::new(),
            Self::Single(number) => chapters.into_iter().filter(|c| c.number == *number).take(1).collect(),
            Self::Range(range) => chapters.into_iter().filter(|c| range.contains(c.number)).collect(),
        }
    }
}
impl Display for ChapterSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::None => write!(f, "none"),
            Self::Single(number) => write!(f, "{number}"),
            Self::Range(range) => write!(f, "{}-{}", range.start, range.end),
        }
    }
}
impl FromStr for ChapterSelector {
    type Err = Error;

    /// Accepts `""` (nothing), `"N"`, and ranges written `"A-B"`, `"A..B"` or `"A B"`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::None);
        }
        let parse = |part: &str| part.parse::<ChapterNumber>().or_raise(|| ErrorKind::InvalidSelection(s.to_string()));
        let bounds = s.split_once("..").or_else(|| s.split_once('-')).or_else(|| s.split_once(char::is_whitespace));
        match bounds {
            Some((start, end)) => Ok(Self::Range(ChapterRange::new(parse(start)?, parse(end)?)?)),
            None => Ok(Self::Single(parse(s)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpdl_extract::Url;
    use rstest::rstest;

    fn number(s: &str) -> ChapterNumber {
        s.parse().unwrap()
    }

    fn listing(numbers: &[&str]) -> Vec<ChapterRef> {
        numbers
            .iter()
            .map(|n| ChapterRef::new(number(n), Url::parse(&format!("https://example.com/t/v/c{n}")).unwrap()))
            .collect()
    }

    fn range(start: u32, end: u32) -> ChapterSelector {
        ChapterSelector::Range(ChapterRange::new(start, end).unwrap())
    }

    fn selected(selector: ChapterSelector, numbers: &[&str]) -> Vec<String> {
        selector.select(listing(numbers)).iter().map(|c| c.number.to_string()).collect()
    }

    #[rstest]
    #[case("", ChapterSelector::None)]
    #[case("   ", ChapterSelector::None)]
    #[case("5", ChapterSelector::Single(ChapterNumber::from(5)))]
    #[case("1-3", range(1, 3))]
    #[case("1..3", range(1, 3))]
    #[case("1 3", range(1, 3))]
    #[case(" 2 - 4 ", range(2, 4))]
    #[case("7-7", range(7, 7))]
    fn parses_selectors(#[case] input: &str, #[case] expected: ChapterSelector) {
        assert_eq!(input.parse::<ChapterSelector>().unwrap(), expected);
    }

    #[test]
    fn parses_fractional_bounds() {
        let ChapterSelector::Range(range) = "10.5..12".parse().unwrap() else {
            panic!("expected a range");
        };
        assert_eq!(range.start(), number("10.5"));
        assert_eq!(range.end(), number("12"));
    }

    #[rstest]
    #[case("abc")]
    #[case("1-")]
    #[case("1-2-3")]
    #[case("one..two")]
    fn rejects_malformed(#[case] input: &str) {
        let err = input.parse::<ChapterSelector>().unwrap_err();
        assert!(matches!(*err, ErrorKind::InvalidSelection(_)));
    }

    #[test]
    fn rejects_reversed_range() {
        let err = "5-2".parse::<ChapterSelector>().unwrap_err();
        assert!(matches!(*err, ErrorKind::ReversedRange { .. }));
        assert!(ChapterRange::new(3u32, 1u32).is_err());
    }

    #[test]
    fn single_takes_only_the_first_match() {
        assert_eq!(selected(ChapterSelector::Single(number("5")), &["5", "6", "7", "5"]), ["5"]);
    }

    #[test]
    fn single_without_match_selects_nothing() {
        assert!(selected(ChapterSelector::Single(number("9")), &["5", "6", "7"]).is_empty());
    }

    #[test]
    fn range_is_inclusive_and_descending() {
        assert_eq!(selected(range(2, 4), &["1", "2", "3", "3.5", "4", "5"]), ["4", "3.5", "3", "2"]);
    }

    #[test]
    fn none_selects_nothing() {
        assert!(selected(ChapterSelector::None, &["1", "2"]).is_empty());
    }
}
