//! Calendar year used by every report.

use chrono::{DateTime, Datelike, NaiveDate, SubsecRound, TimeZone, Utc};
use chrono_tz::Tz;

/// A calendar year in the reporting time zone.
///
/// Bounds are `Jan 1 00:00:00` and `Dec 31 23:59:59` local time, both
/// inclusive, compared at whole-second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingYear {
    year: i32,
    tz: Tz,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ReportingYear {
    /// Builds the year, or `None` if its bounds cannot be represented.
    #[must_use]
    pub fn new(year: i32, tz: Tz) -> Option<Self> {
        let start = tz.with_ymd_and_hms(year, 1, 1, 0, 0, 0).earliest()?;
        let end = tz.with_ymd_and_hms(year, 12, 31, 23, 59, 59).latest()?;
        Some(Self {
            year,
            tz,
            start: start.with_timezone(&Utc),
            end: end.with_timezone(&Utc),
        })
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Reporting time zone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// First instant of the year.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Last whole second of the year.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns true if `instant` falls within the year.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let instant = instant.trunc_subsecs(0);
        self.start <= instant && instant <= self.end
    }

    /// Month index (0-11) of `instant`, or `None` outside the year.
    #[must_use]
    pub fn month_index(&self, instant: DateTime<Utc>) -> Option<usize> {
        self.contains(instant)
            .then(|| instant.with_timezone(&self.tz).month0() as usize)
    }
}

/// Start of `date` in `tz` as a UTC instant.
///
/// On a day that starts inside a DST gap, returns `None`.
#[must_use]
pub fn local_midnight(date: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}
