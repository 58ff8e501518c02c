//! CSV document in the ads platform's offline-conversion upload layout.
//!
//! Fields are comma-joined without quoting. Click ids and rendered times
//! never contain commas; conversion names are the caller's responsibility.

use callvalue_core::{OffsetStyle, ValuedConversion};

use crate::format_value;

pub const CSV_HEADER: &str =
    "Google Click ID,Conversion Name,Conversion Time,Conversion Value,Conversion Currency";

/// Header plus one line per conversion, joined with `\n` and no trailing newline.
#[must_use]
pub fn render_csv(conversions: &[ValuedConversion], conversion_name: &str) -> String {
    std::iter::once(CSV_HEADER.to_owned())
        .chain(conversions.iter().map(|c| {
            let time = c.formatted_time(OffsetStyle::Compact);
            let value = format_value(c.value);
            [
                c.gclid.as_str(),
                conversion_name,
                time.as_str(),
                value.as_str(),
                c.currency,
            ]
            .join(",")
        }))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use callvalue_core::{conversion_time_from_start, Tier};
    use rust_decimal::Decimal;

    use super::*;

    fn conversion(gclid: &str, start: Option<&str>, value: Decimal) -> ValuedConversion {
        ValuedConversion {
            gclid: gclid.to_owned(),
            conversion_time: conversion_time_from_start(start),
            value,
            currency: "USD",
            tier: Tier::Good,
            product: "10".to_owned(),
            product_price: Decimal::new(1995, 0),
            campaign: None,
            source: None,
            duration_secs: None,
            lead_score: 70.0,
            call_id: "CAL1".to_owned(),
            phone: None,
        }
    }

    #[test]
    fn empty_input_is_header_only() {
        assert_eq!(render_csv(&[], "Phone Call Lead"), CSV_HEADER);
    }

    #[test]
    fn renders_rows_with_compact_offset_and_two_decimals() {
        let rows = [
            conversion("CjwKAAA", Some("2024-03-15T14:30:00-04:00"), Decimal::new(99_750, 2)),
            conversion("CjwKBBB", Some("2024-03-15T20:00:00Z"), Decimal::new(1995, 0)),
        ];
        let csv = render_csv(&rows, "Phone Call Lead");

        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            "CjwKAAA,Phone Call Lead,2024-03-15 11:30:00-0700,997.50,USD"
        );
        assert_eq!(
            lines[2],
            "CjwKBBB,Phone Call Lead,2024-03-15 13:00:00-0700,1995.00,USD"
        );
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn missing_time_leaves_field_empty() {
        let csv = render_csv(&[conversion("g", None, Decimal::new(5, 1))], "Lead");
        assert!(csv.ends_with("g,Lead,,0.50,USD"));
    }
}
