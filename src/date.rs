//! Calendar-independent date.

use std::ops::{Add, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Day index of the first day of the Gregorian calendar (October 15, 1582).
/// Dates before it are reckoned in the Julian calendar.
pub const GREGORIAN_REFORM_JDN: i32 = 2299161;

/// A calendar-independent date, counted as a Julian day number (JDN).
///
/// Any `i32` is accepted, including days before January 1, 4713 BC (Julian
/// calendar), which have negative day numbers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Date {
    jdn: i32,
}

/// A date in the civil calendar: Julian before [`GREGORIAN_REFORM_JDN`],
/// Gregorian from it on.
///
/// `year` is an astronomical year number, i.e. 1 BC is `0`, 2 BC is `-1`, etc.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CivilDate {
    pub year: i32,
    pub month: i32,
    pub day: i32,
}

impl Date {
    /// Creates a `Date` with a Julian day number (JDN).
    pub const fn from_jdn(jdn: i32) -> Self {
        Self { jdn }
    }
    /// Returns the Julian day number (JDN) of the date.
    pub fn jdn(&self) -> i32 {
        self.jdn
    }

    /// Creates a `Date` with a civil calendar date.
    ///
    /// The date is first read as Gregorian; if that lands before the
    /// reform it is re-read as Julian. No validation is done, so
    /// out-of-range days and months simply roll over.
    ///
    /// # Example
    ///
    /// ```
    /// use lunisolar::Date;
    ///
    /// assert_eq!(2451545, Date::from_civil(2000, 1, 1).jdn());
    /// assert_eq!(2299160, Date::from_civil(1582, 10, 4).jdn()); // Julian
    /// assert_eq!(2299161, Date::from_civil(1582, 10, 15).jdn()); // Gregorian
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the day number does not fit in an `i32`, i.e. about 5.8
    /// million years away from the epoch. See [`Date::try_from_civil`].
    pub fn from_civil(year: i32, month: i32, day: i32) -> Self {
        Self::try_from_civil(year, month, day).unwrap_or_else(|| {
            panic!("{year:04}-{month:02}-{day:02} out of the i32 day number range")
        })
    }
    /// Creates a `Date` with a civil calendar date, or `None` if its day
    /// number does not fit in an `i32`.
    ///
    /// # Example
    ///
    /// ```
    /// use lunisolar::Date;
    ///
    /// assert_eq!(Some(Date::from_jdn(2451545)), Date::try_from_civil(2000, 1, 1));
    /// assert_eq!(None, Date::try_from_civil(6_000_000, 1, 1));
    /// ```
    pub fn try_from_civil(year: i32, month: i32, day: i32) -> Option<Self> {
        let (year, month, day) = (i64::from(year), i64::from(month), i64::from(day));
        let a = (14 - month).div_euclid(12);
        let y = year + 4800 - a;
        let m = month + 12 * a - 3;

        let base = day + (153 * m + 2).div_euclid(5) + 365 * y + y.div_euclid(4);
        let mut jdn = base - y.div_euclid(100) + y.div_euclid(400) - 32045;
        if jdn < i64::from(GREGORIAN_REFORM_JDN) {
            jdn = base - 32083;
        }
        i32::try_from(jdn).map(Self::from_jdn).ok()
    }
    /// Represents the date in the civil calendar.
    ///
    /// # Example
    ///
    /// ```
    /// use lunisolar::{CivilDate, Date};
    ///
    /// let date = Date::from_jdn(2451545);
    /// assert_eq!(CivilDate { year: 2000, month: 1, day: 1 }, date.civil());
    /// ```
    pub fn civil(&self) -> CivilDate {
        let jdn = i64::from(self.jdn);
        let (b, c) = match self.calendar() {
            Calendar::Gregorian => {
                let a = jdn + 32044;
                let b = (4 * a + 3).div_euclid(146097);
                (b, a - (b * 146097).div_euclid(4))
            }
            Calendar::Julian => (0, jdn + 32082),
        };
        let d = (4 * c + 3).div_euclid(1461);
        let e = c - (1461 * d).div_euclid(4);
        let m = (5 * e + 2).div_euclid(153);
        // any i32 day number is within ±5.9 million years
        CivilDate {
            year: (b * 100 + d - 4800 + m.div_euclid(10)) as i32,
            month: (m + 3 - 12 * m.div_euclid(10)) as i32,
            day: (e - (153 * m + 2).div_euclid(5) + 1) as i32,
        }
    }
    /// Returns which calendar [`Date::civil`] reckons this date in.
    pub fn calendar(&self) -> Calendar {
        if self.jdn < GREGORIAN_REFORM_JDN {
            Calendar::Julian
        } else {
            Calendar::Gregorian
        }
    }
}

impl From<CivilDate> for Date {
    fn from(c: CivilDate) -> Date {
        Date::from_civil(c.year, c.month, c.day)
    }
}

impl Add<i32> for Date {
    type Output = Date;
    fn add(self, rhs: i32) -> Self::Output {
        Date::from_jdn(self.jdn + rhs)
    }
}
impl Sub<Date> for Date {
    type Output = i32;
    fn sub(self, rhs: Date) -> Self::Output {
        self.jdn - rhs.jdn
    }
}

/// The civil calendar a date is reckoned in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Calendar {
    Julian,
    Gregorian,
}
