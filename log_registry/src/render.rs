// Turn a buffer of records into document text.

use chrono::{Local, TimeZone, Utc};

use crate::config::{RenderOptions, TimeZoneChoice};
use crate::record::LogRecord;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

pub struct TimestampFormatter {
    zone: TimeZoneChoice,
    padding: String,
}

impl TimestampFormatter {
    pub fn new(zone: TimeZoneChoice) -> Self {
        let mut formatter = Self {
            zone,
            padding: String::new(),
        };
        let width = formatter.format(0).map_or(0, |s| s.chars().count());
        formatter.padding = " ".repeat(width);
        formatter
    }

    /// `None` when chrono can't represent `millis` in the chosen zone.
    pub fn format(&self, millis: i64) -> Option<String> {
        match self.zone {
            TimeZoneChoice::Utc => Utc
                .timestamp_millis_opt(millis)
                .single()
                .map(|t| t.format(TIMESTAMP_FORMAT).to_string()),
            TimeZoneChoice::Local => Local
                .timestamp_millis_opt(millis)
                .single()
                .map(|t| t.format(TIMESTAMP_FORMAT).to_string()),
        }
    }

    /// Blank stand-in for records without a timestamp, as wide as a real one.
    pub fn padding(&self) -> &str {
        &self.padding
    }

    fn column(&self, timestamp: Option<i64>) -> String {
        timestamp
            .and_then(|ts| self.format(ts))
            .unwrap_or_else(|| self.padding.clone())
    }
}

pub fn render<'a, I>(records: I, options: RenderOptions, zone: TimeZoneChoice) -> String
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    if options.timestamps {
        render_timestamped(records, &TimestampFormatter::new(zone))
    } else {
        render_plain(records)
    }
}

/// Messages back to back, no separator.
pub fn render_plain<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    records.into_iter().map(|r| r.message.as_str()).collect()
}

pub fn render_timestamped<'a, I>(records: I, formatter: &TimestampFormatter) -> String
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let mut out = String::new();
    for record in records {
        out.push_str(&formatter.column(record.timestamp));
        out.push('\t');
        out.push_str(&record.message);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_concatenates_verbatim() {
        let records = vec![
            LogRecord::new(1, "first\n"),
            LogRecord::untimed("no newline"),
            LogRecord::new(2, "third\n"),
        ];
        assert_eq!(render_plain(&records), "first\nno newlinethird\n");
        assert_eq!(render_plain(&Vec::<LogRecord>::new()), "");
    }

    #[test]
    fn utc_timestamp_column() {
        let fmt = TimestampFormatter::new(TimeZoneChoice::Utc);
        let records = vec![
            LogRecord::new(0, "epoch\n"),
            LogRecord::new(1_700_000_000_123, "later\n"),
        ];
        assert_eq!(
            render_timestamped(&records, &fmt),
            "1970-01-01T00:00:00.000+00:00\tepoch\n2023-11-14T22:13:20.123+00:00\tlater\n"
        );
    }

    #[test]
    fn missing_timestamp_is_padded_to_width() {
        let fmt = TimestampFormatter::new(TimeZoneChoice::Utc);
        let width = fmt.format(0).unwrap().len();
        assert_eq!(fmt.padding().len(), width);
        assert!(fmt.padding().chars().all(|c| c == ' '));

        let records = vec![LogRecord::untimed("bare\n")];
        let out = render_timestamped(&records, &fmt);
        assert_eq!(out, format!("{}\tbare\n", " ".repeat(width)));
    }

    #[test]
    fn local_padding_matches_local_width() {
        let fmt = TimestampFormatter::new(TimeZoneChoice::Local);
        let stamp = fmt.format(1_600_000_000_000).unwrap();
        assert_eq!(fmt.padding().chars().count(), stamp.chars().count());
    }

    #[test]
    fn unrepresentable_timestamp_renders_as_padding() {
        let fmt = TimestampFormatter::new(TimeZoneChoice::Utc);
        assert_eq!(fmt.format(i64::MAX), None);
        let records = vec![LogRecord::new(i64::MAX, "overflow\n")];
        assert_eq!(
            render_timestamped(&records, &fmt),
            format!("{}\toverflow\n", fmt.padding())
        );
    }

    #[test]
    fn render_dispatches_on_options() {
        let records = vec![LogRecord::new(0, "x\n")];
        assert_eq!(render(&records, RenderOptions::default(), TimeZoneChoice::Utc), "x\n");
        assert_eq!(
            render(&records, RenderOptions::timestamped(), TimeZoneChoice::Utc),
            "1970-01-01T00:00:00.000+00:00\tx\n"
        );
    }
}
