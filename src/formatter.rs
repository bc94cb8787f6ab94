// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plain-text activity table.

use crate::models::DetailedActivity;
use crate::time_utils::{date_part, format_hms};

/// Which optional columns to show.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnOpts {
    pub power: bool,
    pub time: bool,
    pub all: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

struct Column {
    header: &'static str,
    align: Align,
    render: fn(&DetailedActivity) -> String,
}

/// Renders activities as aligned columns, one line per activity after a
/// header line.
pub struct ActivityFormatter {
    columns: Vec<Column>,
}

impl ActivityFormatter {
    pub fn new(opts: ColumnOpts) -> Self {
        let power = opts.all || opts.power;
        let time = opts.all || opts.time;

        let candidates = [
            (true, Column::right("#     Date", date)),
            (true, Column::right("ID", id)),
            (true, Column::right("Type", activity_type)),
            (opts.all, Column::right("ExID", external_id)),
            (true, Column::right("Dist", distance)),
            (true, Column::right("Elev", elevation)),
            (power, Column::right("Work", work)),
            (power, Column::right("AP", average_power)),
            (time, Column::right("Time", moving_time)),
            (true, Column::left("Gear", gear)),
            (true, Column::left("Name", name)),
        ];

        Self {
            columns: candidates
                .into_iter()
                .filter_map(|(show, col)| show.then_some(col))
                .collect(),
        }
    }

    /// Header plus one line per activity, padded to the widest cell of each
    /// column and joined by two spaces. Trailing padding is dropped.
    pub fn format(&self, activities: &[DetailedActivity]) -> Vec<String> {
        let mut rows: Vec<Vec<String>> = Vec::with_capacity(activities.len() + 1);
        rows.push(self.columns.iter().map(|c| c.header.to_string()).collect());
        rows.extend(
            activities
                .iter()
                .map(|da| self.columns.iter().map(|c| (c.render)(da)).collect()),
        );

        let mut widths = vec![0usize; self.columns.len()];
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        rows.iter()
            .map(|row| {
                row.iter()
                    .zip(&self.columns)
                    .zip(&widths)
                    .map(|((cell, col), &width)| pad(cell, width, col.align))
                    .collect::<Vec<_>>()
                    .join("  ")
                    .trim_end()
                    .to_string()
            })
            .collect()
    }
}

impl Column {
    fn left(header: &'static str, render: fn(&DetailedActivity) -> String) -> Self {
        Self {
            header,
            align: Align::Left,
            render,
        }
    }

    fn right(header: &'static str, render: fn(&DetailedActivity) -> String) -> Self {
        Self {
            header,
            align: Align::Right,
            render,
        }
    }
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(cell.chars().count()));
    match align {
        Align::Left => format!("{}{}", cell, fill),
        Align::Right => format!("{}{}", fill, cell),
    }
}

fn date(da: &DetailedActivity) -> String {
    date_part(&da.activity.start_date_local).to_string()
}

fn id(da: &DetailedActivity) -> String {
    da.activity.id.to_string()
}

fn activity_type(da: &DetailedActivity) -> String {
    da.activity.activity_type.clone()
}

fn external_id(da: &DetailedActivity) -> String {
    match da.activity.external_id.as_deref() {
        Some(ext) if !ext.is_empty() => ext.to_string(),
        _ => "-".to_string(),
    }
}

fn distance(da: &DetailedActivity) -> String {
    format!("{:4.1}", da.activity.distance / 1000.0)
}

fn elevation(da: &DetailedActivity) -> String {
    format!("{:4.0}", da.activity.total_elevation_gain)
}

fn work(da: &DetailedActivity) -> String {
    if da.activity.device_watts {
        format!("{:4.0}", da.activity.kilojoules)
    } else {
        "-".to_string()
    }
}

fn average_power(da: &DetailedActivity) -> String {
    if da.activity.device_watts {
        format!("{:4.0}", da.activity.average_watts)
    } else {
        "-".to_string()
    }
}

fn moving_time(da: &DetailedActivity) -> String {
    format_hms(da.activity.moving_time)
}

fn gear(da: &DetailedActivity) -> String {
    da.gear.name.clone()
}

fn name(da: &DetailedActivity) -> String {
    da.activity.name.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, Gear};
    use chrono::DateTime;

    fn ride() -> DetailedActivity {
        DetailedActivity {
            activity: Activity {
                id: 42,
                name: "Morning Ride".to_string(),
                activity_type: "Ride".to_string(),
                distance: 24931.4,
                total_elevation_gain: 512.4,
                moving_time: 4500,
                start_date_local: "2024-01-15T08:30:00Z".to_string(),
                start_date: DateTime::from_timestamp(1705336200, 0).unwrap(),
                gear_id: Some("b1".to_string()),
                external_id: Some("garmin_1".to_string()),
                kilojoules: 780.7,
                average_watts: 175.2,
                device_watts: true,
            },
            gear: Gear {
                id: "b1".to_string(),
                name: "Tarmac".to_string(),
            },
        }
    }

    fn walk() -> DetailedActivity {
        DetailedActivity {
            activity: Activity {
                id: 7,
                name: "Café stroll".to_string(),
                activity_type: "Walk".to_string(),
                distance: 1500.0,
                total_elevation_gain: 3.0,
                moving_time: 59,
                start_date_local: "2024-01-16T12:00:00Z".to_string(),
                start_date: DateTime::from_timestamp(1705406400, 0).unwrap(),
                gear_id: None,
                external_id: None,
                kilojoules: 0.0,
                average_watts: 0.0,
                device_watts: false,
            },
            gear: Gear::placeholder(),
        }
    }

    #[test]
    fn test_default_columns() {
        let lines = ActivityFormatter::new(ColumnOpts::default()).format(&[ride(), walk()]);
        assert_eq!(
            lines,
            vec![
                "#     Date  ID  Type  Dist  Elev  Gear    Name",
                "2024-01-15  42  Ride  24.9   512  Tarmac  Morning Ride",
                "2024-01-16   7  Walk   1.5     3  -       Café stroll",
            ]
        );
    }

    #[test]
    fn test_power_columns_without_meter() {
        let opts = ColumnOpts {
            power: true,
            ..Default::default()
        };
        let lines = ActivityFormatter::new(opts).format(&[ride(), walk()]);
        assert!(lines[0].contains("Work    AP"));
        assert!(lines[1].contains(" 781   175"));
        assert!(lines[2].contains("   -     -"));
        assert!(!lines[0].contains("Time"));
    }

    #[test]
    fn test_all_columns() {
        let opts = ColumnOpts {
            all: true,
            ..Default::default()
        };
        let lines = ActivityFormatter::new(opts).format(&[ride(), walk()]);
        assert!(lines[0].starts_with("#     Date  ID  Type      ExID  Dist  Elev  Work    AP      Time"));
        assert!(lines[1].contains("01:15:00"));
        assert!(lines[2].contains("00:00:59"));
        assert!(lines[2].contains("         -"));
    }

    #[test]
    fn test_header_only_for_no_activities() {
        let lines = ActivityFormatter::new(ColumnOpts::default()).format(&[]);
        assert_eq!(lines, vec!["#     Date  ID  Type  Dist  Elev  Gear  Name"]);
    }
}
