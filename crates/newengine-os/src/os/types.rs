pub type ProcessId = u32;

/// Opaque handle to a loaded dynamic library, owned by the backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LibraryHandle(pub u64);

/// Raw symbol address resolved from a [`LibraryHandle`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SymbolAddress(pub usize);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Month {
    January = 1,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// 1-based month number.
    #[inline]
    pub fn from_number(n: u32) -> Option<Month> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i as usize).copied())
    }

    #[inline]
    pub fn number(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Date {
    pub year: i64,
    pub month: Month,
    pub day: u32,
    pub weekday: Weekday,
    pub dst: bool,
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Time {
    pub hour: u32,
    pub min: u32,
    pub sec: u32,
}

#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct TimeZoneInfo {
    /// Offset from UTC in minutes.
    pub bias: i32,
    pub name: String,
}

const SECS_PER_DAY: i64 = 86_400;

impl Date {
    pub fn from_unix_secs(secs: i64) -> Date {
        let days = secs.div_euclid(SECS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        // 1970-01-01 was a Thursday.
        let weekday = Weekday::ALL[(days + 4).rem_euclid(7) as usize];
        Date {
            year,
            month: Month::from_number(month).unwrap_or(Month::January),
            day,
            weekday,
            dst: false,
        }
    }
}

impl Default for Date {
    fn default() -> Self {
        Date::from_unix_secs(0)
    }
}

impl Time {
    pub fn from_unix_secs(secs: i64) -> Time {
        let in_day = secs.rem_euclid(SECS_PER_DAY) as u32;
        Time {
            hour: in_day / 3600,
            min: (in_day % 3600) / 60,
            sec: in_day % 60,
        }
    }
}

/// Days since 1970-01-01 to proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum PowerState {
    #[default]
    Unknown,
    OnBattery,
    NoBattery,
    Charging,
    Charged,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SystemDir {
    Desktop,
    Dcim,
    Documents,
    Downloads,
    Movies,
    Music,
    Pictures,
    Ringtones,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ExecOptions {
    /// Wait for the child and capture its stdout.
    pub blocking: bool,
    /// Merge stderr into the captured output (blocking only).
    pub read_stderr: bool,
}

impl ExecOptions {
    #[inline]
    pub fn blocking() -> Self {
        Self {
            blocking: true,
            read_stderr: false,
        }
    }

    #[inline]
    pub fn spawn() -> Self {
        Self {
            blocking: false,
            read_stderr: false,
        }
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct ExecOutput {
    /// Set for spawned children, which stay killable through the backend.
    pub pid: Option<ProcessId>,
    pub output: String,
    pub exit_code: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_is_thursday_first_of_january() {
        let d = Date::from_unix_secs(0);
        assert_eq!((d.year, d.month, d.day), (1970, Month::January, 1));
        assert_eq!(d.weekday, Weekday::Thursday);
        assert_eq!(Time::from_unix_secs(0), Time::default());
    }

    #[test]
    fn test_leap_day_and_recent_timestamp() {
        let d = Date::from_unix_secs(951_782_400);
        assert_eq!((d.year, d.month, d.day), (2000, Month::February, 29));
        assert_eq!(d.weekday, Weekday::Tuesday);

        let d = Date::from_unix_secs(1_700_000_000);
        assert_eq!((d.year, d.month, d.day), (2023, Month::November, 14));
        assert_eq!(d.weekday, Weekday::Tuesday);
        assert_eq!(
            Time::from_unix_secs(1_700_000_000),
            Time {
                hour: 22,
                min: 13,
                sec: 20
            }
        );
    }

    #[test]
    fn test_before_epoch() {
        let d = Date::from_unix_secs(-86_400);
        assert_eq!((d.year, d.month, d.day), (1969, Month::December, 31));
        assert_eq!(d.weekday, Weekday::Wednesday);
    }

    #[test]
    fn test_month_numbers() {
        assert_eq!(Month::from_number(0), None);
        assert_eq!(Month::from_number(12), Some(Month::December));
        assert_eq!(Month::from_number(13), None);
        assert_eq!(Month::March.number(), 3);
    }
}
