//! Utilities for converting between civil dates and a lunisolar calendar.
//!
//! The lunisolar calendar is computed from approximate new moons and solar
//! longitudes in a given timezone, following the rules of the Chinese and
//! Vietnamese calendars: month 11 contains the winter solstice, and a year of
//! 13 months repeats its first month without a major term as a leap month.
//!
//! Civil dates are Julian before October 15, 1582 and Gregorian from then on.
//!
//! # Examples
//!
//! Basic usage with [`Date`]:
//!
//! ```
//! use lunisolar::{CivilDate, Date};
//!
//! let date = Date::from_civil(2000, 1, 1);
//!
//! assert_eq!(2451545, date.jdn());
//! assert_eq!(CivilDate { year: 1999, month: 12, day: 31 }, (date + -1).civil());
//! ```
//!
//! Lunisolar calendar, in Vietnam (UTC+7):
//!
//! ```
//! use lunisolar::Date;
//! use lunisolar::lunar::{LunarDate, Month::*};
//! use lunisolar::time_scales::TzOffset;
//!
//! let date = Date::from_civil(2018, 7, 18);
//! let lunar = LunarDate::from_date(date, TzOffset::UTC7);
//!
//! assert_eq!(LunarDate::new(2018, Common(6), 6), lunar);
//! assert_eq!(Ok(date), lunar.to_date(TzOffset::UTC7));
//! ```
//!
//! The new moons and solar terms are series approximations and may be off by
//! a day when they fall close to local midnight.

pub mod date;
pub mod error;
pub mod lunar;
pub mod time_scales;

pub use date::{CivilDate, Date};
pub use error::LunarError;
pub use lunar::{LunarDate, Month, lunar_to_solar, solar_to_lunar};
