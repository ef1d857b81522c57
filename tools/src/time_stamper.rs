// Pick timestamps off the front of log lines
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;

pub struct TimeStamper {
    patterns: Vec<Regex>,
    unmatched: usize,
}

const MONTHS: &str = "Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec";

// Syslog lines carry no year
const SYSLOG_YEAR: i32 = 2000;

impl Default for TimeStamper {
    fn default() -> Self {
        let src_patterns = [
            // 2024-03-01T12:34:56.789 or 2024-03-01 12:34:56
            r"^(?P<date>\d{4}-\d{2}-\d{2})[T ](?P<clock>[0-2][0-9]:[0-5][0-9]:[0-6][0-9](?:\.\d{1,9})?)",
            // Apr  4 22:21:15.813
            r"^(?P<month>Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec) (?P<day>[ 0-9]{2}) (?P<clock>[0-2][0-9]:[0-5][0-9]:[0-6][0-9](?:\.\d{3})?)\b",
        ];

        let mut s = Self {
            patterns: Vec::default(),
            unmatched: 0,
        };

        for p in src_patterns {
            s.push(p);
        }
        s
    }
}

impl TimeStamper {
    pub fn push(&mut self, matcher: &str) {
        match Regex::new(matcher) {
            Ok(re) => {
                self.patterns.push(re);
            },
            Err(e) => log::error!("Error parsing timestamp pattern {matcher:?}: {e}"),
        }
    }

    fn parse_clock(clock: &str) -> Option<NaiveTime> {
        let fmt = if clock.contains('.') { "%H:%M:%S%.f" } else { "%H:%M:%S" };
        NaiveTime::parse_from_str(clock, fmt).ok()
    }

    fn parse_time(line: &str, re: &Regex) -> Option<NaiveDateTime> {
        let caps = re.captures(line)?;
        let clock = Self::parse_clock(caps.name("clock")?.as_str())?;

        let date = if let Some(date) = caps.name("date") {
            NaiveDate::parse_from_str(date.as_str(), "%Y-%m-%d").ok()?
        } else {
            let m = caps.name("month")?.as_str();
            // Find month name string and convert to 1..12
            let month = MONTHS.find(m)? as u32 / 4 + 1;
            let day = caps.name("day")?.as_str().trim().parse::<u32>().ok()?;
            NaiveDate::from_ymd_opt(SYSLOG_YEAR, month, day)?
        };

        Some(NaiveDateTime::new(date, clock))
    }

    /// Epoch milliseconds for the line's leading timestamp, read as UTC.
    pub fn time(&mut self, line: &str) -> Option<i64> {
        for m in &self.patterns {
            if let Some(ts) = TimeStamper::parse_time(line, m) {
                return Some(Utc.from_utc_datetime(&ts).timestamp_millis())
            }
        }

        self.unmatched += 1;
        None
    }

    pub fn unmatched(&self) -> usize {
        self.unmatched
    }
}

#[test]
fn test_iso_timestamp() {
    let mut stamper = TimeStamper::default();
    assert_eq!(stamper.time("1970-01-01T00:00:01.250 started"), Some(1_250));
    assert_eq!(stamper.time("2023-11-14 22:13:20 ready"), Some(1_700_000_000_000));
    assert_eq!(stamper.unmatched(), 0);
}

#[test]
fn test_syslog_timestamp() {
    use chrono::{Datelike, Timelike};
    let mut stamper = TimeStamper::default();
    let line = "Apr  7 22:21:15.813 some log data here";

    let millis = stamper.time(line).unwrap();
    let time = Utc.timestamp_millis_opt(millis).unwrap();
    assert_eq!(time.year(), SYSLOG_YEAR);
    assert_eq!(time.month(), 4);
    assert_eq!(time.day(), 7);
    assert_eq!(time.hour(), 22);
    assert_eq!(time.minute(), 21);
    assert_eq!(time.second(), 15);
    assert_eq!(time.timestamp_subsec_millis(), 813);

    assert!(stamper.time("Dec 31 23:59:59 no millis").is_some());
}

#[test]
fn test_timestamp_fail() {
    let mut stamper = TimeStamper::default();

    // All these timestamps are invalid
    let lines = vec![
        "APR  7 22:21:15.813 ",
        "April 7 22:21:15.813 ",
        "Apr  32 22:21:15.813 ",
        "Foo  2 22:21:15.813 ",
        "Foo  2 24:21:15.813 ",
        "2024-13-01T00:00:00 bad month",
        "  { no timestamp here ...",
    ];

    for line in &lines {
        assert!(stamper.time(line).is_none(), "{line}");
    }
    assert_eq!(stamper.unmatched(), lines.len());
}
