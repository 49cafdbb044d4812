//! Lunisolar calendar
//!
//! Months begin on the local date of the new moon (朔), and month 11 is the
//! month containing the winter solstice (冬至). When two consecutive month
//! 11s are 13 months apart, the first month after month 11 without a major
//! term (中氣) is the leap month (閏月) and repeats the number of the month
//! before it.
//!
//! New moons and solar longitudes come from the series in [`ephemeris`], so
//! results depend on the timezone given as [`TzOffset`].

use std::ops::RangeInclusive;

use tracing::{debug, trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::date::{CivilDate, Date};
use crate::error::LunarError;
use crate::time_scales::TzOffset;

pub mod ephemeris;

use ephemeris::{SYNODIC_MONTH, major_term, nearest_new_moon_index, new_moon_date};

/// Upper bound of the new moons scanned for a leap month.
const LEAP_SCAN_LIMIT: i32 = 14;

/// Years the conversions accept. Further out the ΔT fit is off by months and
/// month starts are no longer found reliably.
pub const YEARS: RangeInclusive<i32> = -10_000..=10_000;

/// A date in the lunisolar calendar.
///
/// # Example
///
/// ```
/// use lunisolar::Date;
/// use lunisolar::lunar::{LunarDate, Month::*};
/// use lunisolar::time_scales::TzOffset;
///
/// let date = Date::from_civil(2017, 7, 23);
/// let lunar = LunarDate::from_date(date, TzOffset::UTC7);
///
/// assert_eq!(LunarDate::new(2017, Leap(6), 1), lunar);
/// assert_eq!(Ok(date), lunar.to_date(TzOffset::UTC7));
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LunarDate {
    pub year: i32,
    pub month: Month,
    /// Day of month, `1..=30` for dates produced by this crate.
    pub day: i32,
}

/// Month name, `Common` for a regular month and `Leap` for a leap month.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Month {
    Common(u32),
    Leap(u32),
}
impl Month {
    /// Returns the month number, whether leap or not.
    pub fn num(&self) -> u32 {
        use Month::*;
        *match self {
            Common(v) | Leap(v) => v,
        }
    }
    /// `true` for a leap month, `false` for a common one.
    pub fn is_leap(&self) -> bool {
        matches!(self, Self::Leap(_))
    }
}

/// Start of a month.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct NewMoon {
    pub month: Month,
    pub date: Date,
}

impl LunarDate {
    pub fn new(year: i32, month: Month, day: i32) -> Self {
        Self { year, month, day }
    }
    pub fn is_leap_month(&self) -> bool {
        self.month.is_leap()
    }

    /// Converts a date into the lunisolar calendar.
    ///
    /// # Panics
    ///
    /// Panics if the civil year of `date` is not in [`YEARS`].
    pub fn from_date(date: Date, tz: TzOffset) -> Self {
        let (annus, start) = Annus::locate(date, tz);

        let day = date - start + 1;
        let diff = (start - annus.start).div_euclid(29);
        let mut num = diff + 11;
        let mut leap = false;
        if let Some(leap_offset) = annus.leap_offset {
            let leap_offset = leap_offset as i32;
            if diff >= leap_offset {
                num = diff + 10;
                leap = diff == leap_offset;
            }
        }
        if num > 12 {
            num -= 12;
        }
        let year = if num >= 11 && diff < 4 {
            annus.annus - 1
        } else {
            annus.annus
        };

        let num = num as u32;
        let month = if leap { Month::Leap(num) } else { Month::Common(num) };
        trace!(jdn = date.jdn(), year, ?month, day, "solar to lunar");
        Self { year, month, day }
    }

    /// Converts the lunisolar date back into a [`Date`].
    ///
    /// Month and day are not range checked, and roll over into the
    /// following months. A leap month is only accepted if it exists in that
    /// year, and the year must be in [`YEARS`].
    ///
    /// # Example
    ///
    /// ```
    /// use lunisolar::{Date, LunarError};
    /// use lunisolar::lunar::{LunarDate, Month::*};
    /// use lunisolar::time_scales::TzOffset;
    ///
    /// let lunar = LunarDate::new(2018, Common(6), 6);
    /// assert_eq!(Ok(Date::from_civil(2018, 7, 18)), lunar.to_date(TzOffset::UTC7));
    ///
    /// let lunar = LunarDate::new(2018, Leap(6), 6);
    /// assert_eq!(
    ///     Err(LunarError::NoLeapMonth { year: 2018 }),
    ///     lunar.to_date(TzOffset::UTC7)
    /// );
    /// ```
    pub fn to_date(&self, tz: TzOffset) -> Result<Date, LunarError> {
        let out_of_range = LunarError::OutOfRange { year: self.year };
        if !YEARS.contains(&self.year) {
            return Err(out_of_range);
        }
        let num = self.month.num();
        let annus = Annus::new(if num < 11 { self.year } else { self.year + 1 }, tz);
        let k = nearest_new_moon_index(annus.start);
        let mut off = (num as i32 - 11).rem_euclid(12);

        match (annus.leap_month(), annus.leap_offset) {
            (Some(leap), Some(leap_offset)) => {
                if self.month.is_leap() && num != leap {
                    return Err(LunarError::LeapMonthMismatch {
                        year: self.year,
                        requested: num,
                        leap,
                    });
                }
                if self.month.is_leap() || off >= leap_offset as i32 {
                    off += 1;
                }
            }
            _ if self.month.is_leap() => {
                return Err(LunarError::NoLeapMonth { year: self.year });
            }
            _ => {}
        }

        let start = new_moon_date(k + off, tz);
        self.day
            .checked_sub(1)
            .and_then(|d| start.jdn().checked_add(d))
            .map(Date::from_jdn)
            .ok_or(out_of_range)
    }
}

/// Converts a civil date into the lunisolar calendar.
///
/// Panics outside [`YEARS`], like [`LunarDate::from_date`].
///
/// # Example
///
/// ```
/// use lunisolar::CivilDate;
/// use lunisolar::lunar::{self, LunarDate, Month::*};
/// use lunisolar::time_scales::TzOffset;
///
/// let civil = CivilDate { year: 2018, month: 7, day: 18 };
/// assert_eq!(
///     LunarDate::new(2018, Common(6), 6),
///     lunar::solar_to_lunar(civil, TzOffset::UTC7)
/// );
/// ```
pub fn solar_to_lunar(civil: CivilDate, tz: TzOffset) -> LunarDate {
    LunarDate::from_date(civil.into(), tz)
}

/// Converts a lunisolar date into the civil calendar.
///
/// Fails if a leap month is requested that the lunar year does not have, or
/// if the date is out of range.
pub fn lunar_to_solar(lunar: LunarDate, tz: TzOffset) -> Result<CivilDate, LunarError> {
    lunar.to_date(tz).map(|date| date.civil())
}

/// 「歲」: the span from the month 11 containing one winter solstice to the
/// month 11 containing the next.
///
/// Numbered by the civil year most of it falls in, e.g. annus 2017 runs from
/// 2016-11-29 to 2017-12-18 (UTC+7).
///
/// # Example
///
/// ```
/// use lunisolar::Date;
/// use lunisolar::lunar::Annus;
/// use lunisolar::time_scales::TzOffset;
///
/// let annus = Annus::new(2017, TzOffset::UTC7);
///
/// assert_eq!(Date::from_civil(2016, 11, 29), annus.start);
/// assert_eq!(Some(6), annus.leap_month());
/// assert_eq!(13, annus.month_count());
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Annus {
    pub annus: i32,
    pub tz: TzOffset,
    /// First day of month 11 in civil year `annus - 1`.
    pub start: Date,
    /// First day of month 11 in civil year `annus`.
    pub end: Date,
    /// Months from `start` to the leap month, if there is one.
    pub leap_offset: Option<u32>,
}

impl Annus {
    pub fn new(annus: i32, tz: TzOffset) -> Self {
        let start = month11_start(annus - 1, tz);
        let end = month11_start(annus, tz);
        Self::between(annus, start, end, tz)
    }

    /// Returns the annus containing `date`, i.e. `start <= date < end`.
    ///
    /// Panics if the civil year of `date` is not in [`YEARS`].
    ///
    /// # Example
    ///
    /// ```
    /// use lunisolar::Date;
    /// use lunisolar::lunar::Annus;
    /// use lunisolar::time_scales::TzOffset;
    ///
    /// let date = Date::from_civil(1999, 12, 31);
    /// let annus = Annus::from_date(date, TzOffset::UTC8);
    ///
    /// assert_eq!(2000, annus.annus);
    /// ```
    pub fn from_date(date: Date, tz: TzOffset) -> Self {
        let (annus, month_start) = Self::locate(date, tz);
        // a month 11 starting in December is located as the end of the
        // earlier annus
        if month_start >= annus.end {
            Self::new(annus.annus + 1, tz)
        } else {
            annus
        }
    }

    fn between(annus: i32, start: Date, end: Date, tz: TzOffset) -> Self {
        let leap_offset = (end - start > 365).then(|| leap_month_offset(start, tz));
        Self {
            annus,
            tz,
            start,
            end,
            leap_offset,
        }
    }

    /// Finds the annus used for numbering the month of `date`, together with
    /// the first day of that month. The annus may end on that very day.
    fn locate(date: Date, tz: TzOffset) -> (Self, Date) {
        let year = date.civil().year;
        assert!(YEARS.contains(&year), "year {year} not in {YEARS:?}");

        let mut k = ephemeris::preceding_new_moon_index(date);
        let mut month_start = new_moon_date(k + 1, tz);
        // the estimate itself can be one too large
        while month_start > date {
            month_start = new_moon_date(k, tz);
            k -= 1;
        }

        let m11 = month11_start(year, tz);
        let annus = if m11 >= month_start {
            Self::between(year, month11_start(year - 1, tz), m11, tz)
        } else {
            Self::between(year + 1, m11, month11_start(year + 1, tz), tz)
        };
        (annus, month_start)
    }

    /// Returns the number of the leap month, if any.
    pub fn leap_month(&self) -> Option<u32> {
        self.leap_offset.map(|off| (off + 9) % 12 + 1)
    }

    pub fn month_count(&self) -> u32 {
        if self.leap_offset.is_some() { 13 } else { 12 }
    }

    /// Lists the first day of every month, followed by the next month 11
    /// to mark the end of the annus.
    ///
    /// # Example
    ///
    /// ```
    /// use lunisolar::Date;
    /// use lunisolar::lunar::{Annus, Month::*};
    /// use lunisolar::time_scales::TzOffset;
    ///
    /// let months = Annus::new(2017, TzOffset::UTC7).months();
    ///
    /// assert_eq!(Leap(6), months[8].month);
    /// assert_eq!(Date::from_civil(2017, 7, 23), months[8].date);
    /// ```
    pub fn months(&self) -> Vec<NewMoon> {
        let k = nearest_new_moon_index(self.start);
        let count = self.month_count();
        let mut months = Vec::with_capacity(count as usize + 1);
        let mut num = 10;
        for off in 0..=count {
            let month = if Some(off) == self.leap_offset {
                Month::Leap(num)
            } else {
                num = num % 12 + 1;
                Month::Common(num)
            };
            months.push(NewMoon {
                month,
                date: new_moon_date(k + off as i32, self.tz),
            });
        }
        months
    }
}

/// Finds the first day of month 11, the month containing the winter
/// solstice, in the civil year `year`.
///
/// # Example
///
/// ```
/// use lunisolar::Date;
/// use lunisolar::lunar;
/// use lunisolar::time_scales::TzOffset;
///
/// let date = lunar::month11_start(2017, TzOffset::UTC7);
/// assert_eq!(Date::from_civil(2017, 12, 18), date);
/// ```
pub fn month11_start(year: i32, tz: TzOffset) -> Date {
    let off = Date::from_civil(year, 12, 31).jdn() - 2415021;
    let k = (off as f64 / SYNODIC_MONTH).floor() as i32;

    let new_moon = new_moon_date(k, tz);
    // new moon after the solstice: month 11 is the one before
    if major_term(new_moon, tz) >= 9 {
        trace!(year, k, "month 11 begins one new moon earlier");
        return new_moon_date(k - 1, tz);
    }
    new_moon
}

/// Finds the leap month of the annus starting on `a11`, as the number of
/// months after month 11.
///
/// Only meaningful when the annus has 13 months. The scan stops at the
/// first month whose start lies in the same sector as the next month's
/// start, i.e. a month without a major term.
pub fn leap_month_offset(a11: Date, tz: TzOffset) -> u32 {
    let k = nearest_new_moon_index(a11);
    let sector = |i: i32| major_term(new_moon_date(k + i, tz), tz);

    let mut last = sector(1);
    for i in 2..=LEAP_SCAN_LIMIT {
        let arc = sector(i);
        if arc == last {
            debug!(a11 = a11.jdn(), offset = i - 1, "leap month located");
            return (i - 1) as u32;
        }
        last = arc;
    }
    warn!(
        a11 = a11.jdn(),
        limit = LEAP_SCAN_LIMIT,
        "no month without a major term found"
    );
    (LEAP_SCAN_LIMIT - 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const TZ: TzOffset = TzOffset::UTC7;

    fn ymd(year: i32, month: i32, day: i32) -> Date {
        Date::from_civil(year, month, day)
    }

    #[test]
    fn month11_starts() {
        for (year, std) in [
            (2016, 2457722),
            (2017, 2458106),
            (2019, 2458814),
            (2020, 2459198),
            (2022, 2459908),
            (2023, 2460292),
        ] {
            assert_eq!(std, month11_start(year, TZ).jdn(), "{year}");
        }
    }

    #[test]
    fn leap_month_offsets() {
        for (annus, std) in [(2017, 8), (2020, 6), (2023, 4)] {
            let a11 = month11_start(annus - 1, TZ);
            assert_eq!(std, leap_month_offset(a11, TZ), "{annus}");
        }
    }

    #[test]
    fn leap_scan_limit() {
        // 12-month years have no month without a major term within the scan
        for annus in [2000, 2018] {
            let a11 = month11_start(annus - 1, TZ);
            assert_eq!(12, Annus::new(annus, TZ).month_count());
            assert_eq!(13, leap_month_offset(a11, TZ), "{annus}");
        }
    }

    #[test]
    fn leap_months() {
        for (annus, std) in [
            (2000, None),
            (2017, Some(6)),
            (2018, None),
            (2020, Some(4)),
            (2023, Some(2)),
            (2025, Some(6)),
            (2034, Some(11)),
        ] {
            assert_eq!(std, Annus::new(annus, TZ).leap_month(), "{annus}");
        }
    }

    #[test]
    fn leap_month_numbering() {
        let mut annus = Annus::new(2017, TZ);
        for (off, std) in [(1, 11), (2, 12), (3, 1), (8, 6), (12, 10)] {
            annus.leap_offset = Some(off);
            assert_eq!(Some(std), annus.leap_month(), "offset {off}");
        }
    }

    #[test]
    fn from_date() {
        let dataset = [
            (2017, ymd(2017, 1, 27)),
            (2017, ymd(2017, 12, 17)),
            (2018, ymd(2017, 12, 18)),
            (2000, ymd(2000, 1, 1)),
        ];
        for (std, date) in dataset {
            assert_eq!(std, Annus::from_date(date, TZ).annus, "{date:?}");
        }
    }

    #[test]
    fn months() {
        let annus = Annus::new(2000, TzOffset::UTC8);
        let stds = [
            (11, ymd(1999, 12, 8)),
            (12, ymd(2000, 1, 7)),
            (1, ymd(2000, 2, 5)),
            (2, ymd(2000, 3, 6)),
            (3, ymd(2000, 4, 5)),
            (4, ymd(2000, 5, 4)),
            (5, ymd(2000, 6, 2)),
            (6, ymd(2000, 7, 2)),
            (7, ymd(2000, 7, 31)),
            (8, ymd(2000, 8, 29)),
            (9, ymd(2000, 9, 28)),
            (10, ymd(2000, 10, 27)),
            (11, ymd(2000, 11, 26)),
        ];
        let months = annus.months();
        assert_eq!(stds.len(), months.len());
        for (std, month) in stds.iter().zip(&months) {
            assert_eq!(Month::Common(std.0), month.month);
            assert_eq!(std.1, month.date);
        }
    }

    #[test]
    fn months_with_leap() {
        let stds = [
            (11, ymd(2016, 11, 29)),
            (12, ymd(2016, 12, 29)),
            (1, ymd(2017, 1, 28)),
            (2, ymd(2017, 2, 26)),
            (3, ymd(2017, 3, 28)),
            (4, ymd(2017, 4, 26)),
            (5, ymd(2017, 5, 26)),
            (6, ymd(2017, 6, 24)),
            (-6, ymd(2017, 7, 23)),
            (7, ymd(2017, 8, 22)),
            (8, ymd(2017, 9, 20)),
            (9, ymd(2017, 10, 20)),
            (10, ymd(2017, 11, 18)),
            (11, ymd(2017, 12, 18)),
        ];
        for tz in [TzOffset::UTC7, TzOffset::UTC8] {
            let annus = Annus::new(2017, tz);
            let months = annus.months();
            for (std, month) in stds.iter().zip(&months) {
                let std_month = if std.0 > 0 {
                    Month::Common(std.0 as u32)
                } else {
                    Month::Leap(-std.0 as u32)
                };
                assert_eq!((std_month, std.1), (month.month, month.date));
            }
            assert_eq!(stds.len(), months.len());
            assert_eq!(annus.end, months[13].date);
        }
    }

    #[test]
    fn dates() {
        use Month::*;
        let data = [
            (ymd(2016, 11, 29), (2016, Common(11), 1)),
            (ymd(2017, 1, 27), (2016, Common(12), 30)),
            (ymd(2017, 1, 28), (2017, Common(1), 1)),
            (ymd(2017, 7, 22), (2017, Common(6), 29)),
            (ymd(2017, 7, 23), (2017, Leap(6), 1)),
            (ymd(2017, 8, 21), (2017, Leap(6), 30)),
            (ymd(2017, 8, 22), (2017, Common(7), 1)),
            (ymd(2017, 12, 17), (2017, Common(10), 30)),
            (ymd(2017, 12, 18), (2017, Common(11), 1)),
            (ymd(2000, 1, 1), (1999, Common(11), 25)),
            (ymd(2000, 2, 5), (2000, Common(1), 1)),
        ];
        for (date, (y, m, d)) in data {
            let lunar = LunarDate::from_date(date, TZ);
            assert_eq!(LunarDate::new(y, m, d), lunar, "{:?}", date.civil());
            assert_eq!(Ok(date), lunar.to_date(TZ));
        }

        // the day before a new moon, where the mean estimate points past it
        let utc9 = TzOffset::from_hours(9.0);
        let data = [
            (ymd(2009, 3, 25), TzOffset::UTC8, (2009, Common(2), 29)),
            (ymd(2009, 3, 26), TzOffset::UTC8, (2009, Common(2), 30)),
            (ymd(2009, 3, 26), utc9, (2009, Common(2), 30)),
            (ymd(2009, 3, 26), TZ, (2009, Common(3), 1)),
            (ymd(2009, 3, 27), TzOffset::UTC8, (2009, Common(3), 1)),
            (ymd(2009, 3, 27), utc9, (2009, Common(3), 1)),
            (ymd(1947, 3, 22), TzOffset::UTC8, (1947, Common(2), 30)),
            (ymd(1947, 3, 22), TZ, (1947, Leap(2), 1)),
            (ymd(1877, 4, 13), TZ, (1877, Common(2), 30)),
        ];
        for (date, tz, (y, m, d)) in data {
            let lunar = LunarDate::from_date(date, tz);
            assert_eq!(LunarDate::new(y, m, d), lunar, "{:?} {tz:?}", date.civil());
            assert_eq!(Ok(date), lunar.to_date(tz));
        }
    }

    #[test]
    fn year_range() {
        use Month::*;
        for (date, (y, m, d)) in [
            (ymd(-10_000, 6, 1), (-10_000, Common(4), 2)),
            (ymd(10_000, 6, 1), (10_000, Common(5), 7)),
        ] {
            let lunar = LunarDate::from_date(date, TZ);
            assert_eq!(LunarDate::new(y, m, d), lunar, "{:?}", date.civil());
            assert_eq!(Ok(date), lunar.to_date(TZ));
        }
        for year in [-10_001, 10_001, i32::MIN, i32::MAX] {
            assert_eq!(
                Err(LunarError::OutOfRange { year }),
                LunarDate::new(year, Common(1), 1).to_date(TZ)
            );
        }
        for day in [i32::MIN, i32::MAX] {
            assert_eq!(
                Err(LunarError::OutOfRange { year: 2017 }),
                LunarDate::new(2017, Common(1), day).to_date(TZ)
            );
        }
    }

    #[test]
    #[should_panic(expected = "year 10001 not in")]
    fn from_date_out_of_range() {
        LunarDate::from_date(ymd(10_001, 1, 1), TZ);
    }

    #[test]
    fn invalid_leap_months() {
        use Month::*;
        assert_eq!(
            Err(LunarError::LeapMonthMismatch {
                year: 2017,
                requested: 5,
                leap: 6
            }),
            LunarDate::new(2017, Leap(5), 1).to_date(TZ)
        );
        assert_eq!(
            Err(LunarError::NoLeapMonth { year: 2018 }),
            LunarDate::new(2018, Leap(6), 1).to_date(TZ)
        );
    }
}
