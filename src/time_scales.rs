//! Time scales and timezones used by the lunisolar computations.
//!
//! Instants are represented in Julian date (JD), i.e. fractional days since
//! noon of January 1, 4713 BC (Julian calendar), which shares its origin with
//! [`Date`](crate::Date) day numbers.

use crate::date::Date;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [Terristrial time](https://en.wikipedia.org/wiki/Terrestrial_Time),
/// represented in Julian date (JD).
///
/// The mean new-moon series is evaluated in this uniform time scale and must
/// be corrected by [`delta_t`] before a civil date is read off it.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Tt(pub f64);

/// [Universal time](https://en.wikipedia.org/wiki/Universal_Time), the actual
/// civil time used for determining the date at a given time point.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Ut(pub f64);

impl Ut {
    /// Converts a TT instant into UT, given the ΔT correction in days.
    pub fn from_tt(tt: Tt, delta_t_days: f64) -> Self {
        Ut(tt.0 - delta_t_days)
    }
    /// Returns the date at the time point in the timezone `tz`.
    ///
    /// # Example
    ///
    /// ```
    /// use lunisolar::time_scales::{TzOffset, Ut};
    ///
    /// // 2000-01-01T16:30Z
    /// let ut = Ut(2451545.1875);
    /// assert_eq!(2451545, ut.date_in_timezone(TzOffset::UTC7).jdn());
    /// assert_eq!(2451546, ut.date_in_timezone(TzOffset::UTC8).jdn());
    /// ```
    pub fn date_in_timezone(&self, tz: TzOffset) -> Date {
        Date::from_jdn((self.0 + 0.5 + tz.0 / 24.0).floor() as i32)
    }
}

/// A timezone, as a number of hours ahead (east) of UTC.
///
/// For Vietnam (UTC+7), this is `TzOffset(7.0)`.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TzOffset(pub f64);

impl TzOffset {
    pub const UTC: TzOffset = TzOffset(0.0);
    /// Indochina time, used by the Vietnamese calendar.
    pub const UTC7: TzOffset = TzOffset(7.0);
    /// China standard time, used by the Chinese calendar.
    pub const UTC8: TzOffset = TzOffset(8.0);

    pub fn from_hours(hours: f64) -> Self {
        TzOffset(hours)
    }
    /// For Beijing time (UTC+8), `minutes` should be +480.
    pub fn from_minutes(minutes: i32) -> Self {
        TzOffset(minutes as f64 / 60.0)
    }
    pub fn hours(&self) -> f64 {
        self.0
    }

    /// Returns the UT instant of local midnight starting `date`.
    ///
    /// # Example
    ///
    /// ```
    /// use lunisolar::Date;
    /// use lunisolar::time_scales::TzOffset;
    ///
    /// let date = Date::from_jdn(2451545);
    /// assert_eq!(2451544.5, TzOffset::UTC.midnight_of(date).0);
    /// ```
    pub fn midnight_of(&self, date: Date) -> Ut {
        Ut(date.jdn() as f64 - 0.5 - self.0 / 24.0)
    }
}

impl From<f64> for TzOffset {
    fn from(hours: f64) -> Self {
        TzOffset(hours)
    }
}

/// Estimates ΔT (TT − UT) in days.
///
/// `t` is in Julian centuries from 1900 January 0.5. Dates before about
/// 800 AD (`t < -11`) use a quartic fit, later ones a quadratic.
pub fn delta_t(t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    if t < -11.0 {
        0.001 + 0.000839 * t + 0.0002261 * t2 - 0.00000845 * t3 - 0.000000081 * t * t3
    } else {
        -0.000278 + 0.000265 * t + 0.000262 * t2
    }
}
