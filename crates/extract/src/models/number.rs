use crate::consts;
use crate::error::{Error, ErrorKind};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A chapter number; fractional for bonus/split chapters (`10.5`).
///
/// Always finite and non-negative, which makes a total order safe.
#[derive(Debug, Clone, Copy)]
pub struct ChapterNumber(f64);
impl ChapterNumber {
    pub fn new(value: f64) -> Option<Self> {
        // `+ 0.0` folds negative zero into positive zero so Eq and Hash agree.
        (value.is_finite() && value >= 0.0).then_some(Self(value + 0.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}
impl PartialEq for ChapterNumber {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for ChapterNumber {}
impl PartialOrd for ChapterNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for ChapterNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
impl Hash for ChapterNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}
impl From<u32> for ChapterNumber {
    fn from(value: u32) -> Self {
        Self(f64::from(value))
    }
}
impl FromStr for ChapterNumber {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !consts::CHAPTER_NUMBER_REGEX.is_match(s) {
            exn::bail!(ErrorKind::ParseError { field: "chapter", value: s.to_string() });
        }
        match s.parse::<f64>().ok().and_then(Self::new) {
            Some(number) => Ok(number),
            None => exn::bail!(ErrorKind::ParseError { field: "chapter", value: s.to_string() }),
        }
    }
}
impl Display for ChapterNumber {
    // f64's Display already omits a trailing `.0`.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("5", 5.0)]
    #[case(" 12 ", 12.0)]
    #[case("10.5", 10.5)]
    #[case("0", 0.0)]
    fn parses_valid_numbers(#[case] input: &str, #[case] expected: f64) {
        assert_eq!(input.parse::<ChapterNumber>().unwrap().value(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("-1")]
    #[case("1e3")]
    #[case("inf")]
    #[case("NaN")]
    #[case("5 extra")]
    fn rejects_invalid_numbers(#[case] input: &str) {
        assert!(input.parse::<ChapterNumber>().is_err());
    }

    #[rstest]
    #[case(5.0, "5")]
    #[case(10.5, "10.5")]
    #[case(0.0, "0")]
    fn displays_without_trailing_zero(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(ChapterNumber::new(value).unwrap().to_string(), expected);
    }

    #[test]
    fn orders_numerically() {
        let mut numbers: Vec<ChapterNumber> = ["10", "2", "2.5", "1"].iter().map(|s| s.parse().unwrap()).collect();
        numbers.sort();
        let rendered: Vec<String> = numbers.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["1", "2", "2.5", "10"]);
    }

    #[test]
    fn rejects_non_finite_construction() {
        assert!(ChapterNumber::new(f64::NAN).is_none());
        assert!(ChapterNumber::new(f64::INFINITY).is_none());
        assert!(ChapterNumber::new(-0.5).is_none());
        assert_eq!(ChapterNumber::new(-0.0), Some(ChapterNumber::from(0)));
    }
}
