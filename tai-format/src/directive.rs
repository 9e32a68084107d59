//! The directive table

use crate::FormatError;

/// One token of a parsed format string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item<'a> {
    Literal(&'a str),
    Directive(Directive),
}

/// Every directive the renderer knows, one variant per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    // Delegated to the locale
    WeekdayShort,
    WeekdayFull,
    MonthShort,
    MonthFull,
    LocaleDateTime,
    AmPmUpper,
    AmPmLower,
    LocaleDate,
    LocaleTime,

    // Numeric fields
    Century,
    Day,
    DaySpacePadded,
    IsoShortYear,
    IsoYear,
    IsoWeek,
    Hour24,
    Hour12,
    YearDay,
    Hour24SpacePadded,
    Hour12SpacePadded,
    Month,
    Minute,
    EpochSeconds,
    Second,
    WeekdayMondayOne,
    SundayWeek,
    Weekday,
    MondayWeek,
    ShortYear,
    Year,

    // Zone
    UtcOffset,
    ZoneName,

    // Composites
    Date,
    IsoDate,
    Clock12,
    HourMinute,
    Clock24,
    Asctime,

    Newline,
    Tab,
    Percent,
}

pub(crate) const DATE: &[Item<'static>] = &[
    Item::Directive(Directive::Month),
    Item::Literal("/"),
    Item::Directive(Directive::Day),
    Item::Literal("/"),
    Item::Directive(Directive::ShortYear),
];

pub(crate) const ISO_DATE: &[Item<'static>] = &[
    Item::Directive(Directive::Year),
    Item::Literal("-"),
    Item::Directive(Directive::Month),
    Item::Literal("-"),
    Item::Directive(Directive::Day),
];

pub(crate) const CLOCK_12: &[Item<'static>] = &[
    Item::Directive(Directive::Hour12),
    Item::Literal(":"),
    Item::Directive(Directive::Minute),
    Item::Literal(":"),
    Item::Directive(Directive::Second),
    Item::Literal(" "),
    Item::Directive(Directive::AmPmUpper),
];

pub(crate) const HOUR_MINUTE: &[Item<'static>] = &[
    Item::Directive(Directive::Hour24),
    Item::Literal(":"),
    Item::Directive(Directive::Minute),
];

pub(crate) const CLOCK_24: &[Item<'static>] = &[
    Item::Directive(Directive::Hour24),
    Item::Literal(":"),
    Item::Directive(Directive::Minute),
    Item::Literal(":"),
    Item::Directive(Directive::Second),
];

impl Directive {
    /// Look up the directive written as `%c`
    pub fn from_char(c: char) -> Result<Self, FormatError> {
        use Directive::*;

        let directive = match c {
            'a' => WeekdayShort,
            'A' => WeekdayFull,
            'b' | 'h' => MonthShort,
            'B' => MonthFull,
            'c' => LocaleDateTime,
            'C' => Century,
            'd' => Day,
            'D' => Date,
            'e' => DaySpacePadded,
            'F' => IsoDate,
            'g' => IsoShortYear,
            'G' => IsoYear,
            'H' => Hour24,
            'I' => Hour12,
            'j' => YearDay,
            'k' => Hour24SpacePadded,
            'l' => Hour12SpacePadded,
            'm' => Month,
            'M' => Minute,
            'n' => Newline,
            'p' => AmPmUpper,
            'P' => AmPmLower,
            'r' => Clock12,
            'R' => HourMinute,
            's' => EpochSeconds,
            'S' => Second,
            't' => Tab,
            'T' => Clock24,
            'u' => WeekdayMondayOne,
            'U' => SundayWeek,
            'V' => IsoWeek,
            'w' => Weekday,
            'W' => MondayWeek,
            'x' => LocaleDate,
            'X' => LocaleTime,
            'y' => ShortYear,
            'Y' => Year,
            'z' => UtcOffset,
            'Z' => ZoneName,
            '+' => Asctime,
            '%' => Percent,
            'E' | 'O' => {
                return Err(FormatError::UnsupportedDirective {
                    directive: c,
                    reason: "alternative representations are not supported",
                })
            }
            _ => {
                return Err(FormatError::UnsupportedDirective {
                    directive: c,
                    reason: "unknown directive",
                })
            }
        };
        Ok(directive)
    }

    /// Fixed sub-sequence of a composite directive
    pub fn expansion(self) -> Option<&'static [Item<'static>]> {
        match self {
            Directive::Date => Some(DATE),
            Directive::IsoDate => Some(ISO_DATE),
            Directive::Clock12 => Some(CLOCK_12),
            Directive::HourMinute => Some(HOUR_MINUTE),
            Directive::Clock24 => Some(CLOCK_24),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_h_is_month_short() {
        assert_eq!(Directive::from_char('h').unwrap(), Directive::MonthShort);
        assert_eq!(Directive::from_char('b').unwrap(), Directive::MonthShort);
    }

    #[test]
    fn test_alternative_forms_rejected() {
        for c in ['E', 'O'] {
            assert!(matches!(
                Directive::from_char(c),
                Err(FormatError::UnsupportedDirective { directive, .. }) if directive == c
            ));
        }
        assert!(Directive::from_char('Q').is_err());
    }

    #[test]
    fn test_expansions_are_flat() {
        for c in ['D', 'F', 'r', 'R', 'T'] {
            let items = Directive::from_char(c).unwrap().expansion().unwrap();
            for item in items {
                if let Item::Directive(d) = item {
                    assert!(d.expansion().is_none(), "%{} nests {:?}", c, d);
                }
            }
        }
        assert!(Directive::Year.expansion().is_none());
    }
}
