//! Errors reported when converting out of the lunisolar calendar.

/// A lunisolar date that does not exist.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum LunarError {
    /// A leap month was requested in a year of 12 months.
    #[error("lunar year {year} has no leap month")]
    NoLeapMonth { year: i32 },

    /// A leap month was requested, but the year's leap month is another one.
    #[error("leap month of lunar year {year} is {leap}, not {requested}")]
    LeapMonthMismatch {
        year: i32,
        /// The month requested as leap month.
        requested: u32,
        /// The actual leap month of the year.
        leap: u32,
    },

    /// The year is outside [`YEARS`](crate::lunar::YEARS), or the day rolls
    /// over past the `i32` day numbers.
    #[error("lunar date in year {year} is out of range")]
    OutOfRange { year: i32 },
}
