//! Timeline grouping of posts by year and date

use chrono::{Datelike, NaiveDate};

use super::Post;

/// Posts published on a single date
#[derive(Debug, Clone)]
pub struct DayGroup<'a> {
    /// The shared publication date
    pub date: NaiveDate,
    /// Short month label, e.g. "May"
    pub month_label: String,
    /// Zero-padded day of month, e.g. "03"
    pub day_label: String,
    /// Posts on this date, in manifest order
    pub posts: Vec<&'a Post>,
}

/// One year of the timeline, newest date first
#[derive(Debug, Clone)]
pub struct YearGroup<'a> {
    pub year: i32,
    pub days: Vec<DayGroup<'a>>,
}

/// Group posts into a year / date timeline, both levels newest-first.
/// Posts without a parseable date are dropped from the timeline.
pub fn timeline(posts: &[Post]) -> Vec<YearGroup<'_>> {
    let mut dated: Vec<(NaiveDate, &Post)> = posts
        .iter()
        .filter_map(|p| p.parsed_date().map(|d| (d, p)))
        .collect();

    // Newest first; ties keep manifest order (sort is stable)
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    let mut years: Vec<YearGroup<'_>> = Vec::new();
    for (date, post) in dated {
        if years.last().map(|y| y.year) != Some(date.year()) {
            years.push(YearGroup {
                year: date.year(),
                days: Vec::new(),
            });
        }
        let year = years.last_mut().unwrap();

        if year.days.last().map(|d| d.date) != Some(date) {
            year.days.push(DayGroup {
                date,
                month_label: date.format("%b").to_string(),
                day_label: date.format("%d").to_string(),
                posts: Vec::new(),
            });
        }
        year.days.last_mut().unwrap().posts.push(post);
    }

    years
}
