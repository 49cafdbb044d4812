//! Approximate ephemeris of the new moons (朔) and the sun's longitude, after
//! Jean Meeus, *Astronomical Algorithms* (1998).
//!
//! Everything here is a closed-form series evaluated in `f64`. The terms are
//! kept in a fixed order and grouping, since a change in rounding can move a
//! new moon or a major term (中氣) across local midnight.

use std::f64::consts::PI;

use crate::date::Date;
use crate::time_scales::{self, Tt, TzOffset, Ut};

/// Mean length of a synodic month in days.
pub const SYNODIC_MONTH: f64 = 29.530588853;
/// The new moon of 1900-01-01T13:52Z, which has index `k = 0`.
pub const NEW_MOON_EPOCH: f64 = 2415021.076998695;
/// Constant term of the mean new-moon polynomial.
const MEAN_NEW_MOON_EPOCH: f64 = 2415020.75933;
/// J2000.0 (2000-01-01T12:00 TT).
const J2000: f64 = 2451545.0;

const DEG_TO_RAD: f64 = PI / 180.0;

/// Computes the `k`-th new moon after the one of 1900-01-01 (negative `k`
/// for earlier ones).
///
/// # Example
///
/// ```
/// use lunisolar::lunar::ephemeris;
///
/// let ut = ephemeris::new_moon(0);
/// assert!((ut.0 - 2415021.0770).abs() < 1e-4);
/// ```
pub fn new_moon(k: i32) -> Ut {
    let k = k as f64;
    let t = k / 1236.85; // Julian centuries from 1900 January 0.5
    let t2 = t * t;
    let t3 = t2 * t;

    let mut jd1 = MEAN_NEW_MOON_EPOCH + 29.53058868 * k + 0.0001178 * t2 - 0.000000155 * t3;
    jd1 = jd1 + 0.00033 * ((166.56 + 132.87 * t - 0.009173 * t2) * DEG_TO_RAD).sin();

    // sun's mean anomaly, moon's mean anomaly, moon's argument of latitude
    let m = 359.2242 + 29.10535608 * k - 0.0000333 * t2 - 0.00000347 * t3;
    let mpr = 306.0253 + 385.81691806 * k + 0.0107306 * t2 + 0.00001236 * t3;
    let f = 21.2964 + 390.67050646 * k - 0.0016528 * t2 - 0.00000239 * t3;

    let mut c1 = (0.1734 - 0.000393 * t) * (m * DEG_TO_RAD).sin()
        + 0.0021 * (2.0 * DEG_TO_RAD * m).sin();
    c1 = c1 - 0.4068 * (mpr * DEG_TO_RAD).sin() + 0.0161 * (DEG_TO_RAD * 2.0 * mpr).sin();
    c1 = c1 - 0.0004 * (DEG_TO_RAD * 3.0 * mpr).sin();
    c1 = c1 + 0.0104 * (DEG_TO_RAD * 2.0 * f).sin() - 0.0051 * (DEG_TO_RAD * (m + mpr)).sin();
    c1 = c1 - 0.0074 * (DEG_TO_RAD * (m - mpr)).sin() + 0.0004 * (DEG_TO_RAD * (2.0 * f + m)).sin();
    c1 = c1 - 0.0004 * (DEG_TO_RAD * (2.0 * f - m)).sin()
        - 0.0006 * (DEG_TO_RAD * (2.0 * f + mpr)).sin();
    c1 = c1 + 0.001 * (DEG_TO_RAD * (2.0 * f - mpr)).sin()
        + 0.0005 * (DEG_TO_RAD * (2.0 * mpr + m)).sin();

    Ut::from_tt(Tt(jd1 + c1), time_scales::delta_t(t))
}

/// Returns the date, in timezone `tz`, of the `k`-th new moon.
pub fn new_moon_date(k: i32, tz: TzOffset) -> Date {
    new_moon(k).date_in_timezone(tz)
}

/// Estimates the index of the last new moon on or before `date`.
///
/// Being based on the mean synodic month, the estimate can be one too
/// large; callers check [`new_moon_date`] against `date`.
pub fn preceding_new_moon_index(date: Date) -> i32 {
    ((date.jdn() as f64 - NEW_MOON_EPOCH) / SYNODIC_MONTH).floor() as i32
}

/// Estimates the index of the new moon nearest to `date`.
pub fn nearest_new_moon_index(date: Date) -> i32 {
    ((date.jdn() as f64 - NEW_MOON_EPOCH) / SYNODIC_MONTH + 0.5).floor() as i32
}

/// Computes the apparent ecliptic longitude of the sun at `ut`, in radians
/// within `0.0..2π`.
pub fn sun_longitude(ut: Ut) -> f64 {
    let t = (ut.0 - J2000) / 36525.0; // Julian centuries from J2000.0
    let t2 = t * t;
    let m = 357.5291 + 35999.0503 * t - 0.0001559 * t2 - 0.00000048 * t * t2; // mean anomaly
    let l0 = 280.46645 + 36000.76983 * t + 0.0003032 * t2; // mean longitude

    let mut dl = (1.9146 - 0.004817 * t - 0.000014 * t2) * (DEG_TO_RAD * m).sin();
    dl = dl
        + (0.019993 - 0.000101 * t) * (DEG_TO_RAD * 2.0 * m).sin()
        + 0.00029 * (DEG_TO_RAD * 3.0 * m).sin();

    let mut l = l0 + dl;
    l = l * DEG_TO_RAD;
    l - PI * 2.0 * (l / (PI * 2.0)).floor()
}

/// Returns the 30° sector of the sun's longitude at local midnight starting
/// `date`, in `0..=11`.
///
/// Sector 0 begins at the vernal equinox (春分); the winter solstice (冬至)
/// begins sector 9.
pub fn major_term(date: Date, tz: TzOffset) -> u32 {
    (sun_longitude(tz.midnight_of(date)) / PI * 6.0).floor() as u32
}
