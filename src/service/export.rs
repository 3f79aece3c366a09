//! CSV export of lead and review records.
//!
//! One header row, then one row per record. Fields containing a comma,
//! quote, CR or LF are quoted with inner quotes doubled. Timestamps are
//! RFC 3339 and absent values are empty fields.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::{Contact, Review, Subscriber};

/// Column order of the subscriber export.
pub const SUBSCRIBER_COLUMNS: [&str; 6] = [
    "email",
    "name",
    "status",
    "source",
    "subscribed_at",
    "unsubscribed_at",
];

/// Column order of the contact export.
pub const CONTACT_COLUMNS: [&str; 7] = [
    "name",
    "email",
    "phone",
    "service_interest",
    "message",
    "status",
    "created_at",
];

/// Column order of the review export.
pub const REVIEW_COLUMNS: [&str; 8] = [
    "customer_name",
    "location",
    "rating",
    "service_type",
    "content",
    "status",
    "submitted_at",
    "published_at",
];

fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn opt_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(timestamp).unwrap_or_default()
}

fn build_csv<T>(header: &[&str], records: &[T], row: impl Fn(&T) -> Vec<String>) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(header.join(","));
    for record in records {
        let fields: Vec<String> = row(record).iter().map(|f| csv_escape(f)).collect();
        lines.push(fields.join(","));
    }
    let mut csv = lines.join("\n");
    csv.push('\n');
    csv
}

/// Subscribers as CSV, in [`SUBSCRIBER_COLUMNS`] order.
#[must_use]
pub fn subscribers_csv(subscribers: &[Subscriber]) -> String {
    build_csv(&SUBSCRIBER_COLUMNS, subscribers, |s| {
        vec![
            s.email.clone(),
            s.name.clone().unwrap_or_default(),
            s.status_label().to_string(),
            s.source.clone().unwrap_or_default(),
            timestamp(s.subscribed_at),
            opt_timestamp(s.unsubscribed_at),
        ]
    })
}

/// Contacts as CSV, in [`CONTACT_COLUMNS`] order.
#[must_use]
pub fn contacts_csv(contacts: &[Contact]) -> String {
    build_csv(&CONTACT_COLUMNS, contacts, |c| {
        vec![
            c.name.clone(),
            c.email.clone(),
            c.phone.clone().unwrap_or_default(),
            c.service_interest.clone().unwrap_or_default(),
            c.message.clone(),
            c.status.as_str().to_string(),
            timestamp(c.created_at),
        ]
    })
}

/// Reviews as CSV, in [`REVIEW_COLUMNS`] order.
#[must_use]
pub fn reviews_csv(reviews: &[Review]) -> String {
    build_csv(&REVIEW_COLUMNS, reviews, |r| {
        vec![
            r.customer_name.clone(),
            r.location.clone().unwrap_or_default(),
            r.rating.to_string(),
            r.service_type.clone().unwrap_or_default(),
            r.content.clone(),
            r.status.as_str().to_string(),
            timestamp(r.submitted_at),
            opt_timestamp(r.published_at),
        ]
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{ContactStatus, ReviewStatus};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0)
            .single()
            .unwrap_or_default()
    }

    #[test]
    fn escaping_quotes_only_when_needed() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hei\""), "\"say \"\"hei\"\"\"");
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
        assert_eq!(csv_escape("cr\rhere"), "\"cr\rhere\"");
    }

    #[test]
    fn subscriber_rows_follow_column_order() {
        let subscribers = vec![
            Subscriber {
                id: Uuid::new_v4(),
                email: "a@b.fi".to_string(),
                name: Some("Aino".to_string()),
                is_active: true,
                source: Some("footer".to_string()),
                subscribed_at: at(),
                unsubscribed_at: None,
            },
            Subscriber {
                id: Uuid::new_v4(),
                email: "c@d.fi".to_string(),
                name: None,
                is_active: false,
                source: None,
                subscribed_at: at(),
                unsubscribed_at: Some(at()),
            },
        ];
        let csv = subscribers_csv(&subscribers);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "email,name,status,source,subscribed_at,unsubscribed_at",
                "a@b.fi,Aino,active,footer,2026-03-01T09:30:00Z,",
                "c@d.fi,,unsubscribed,,2026-03-01T09:30:00Z,2026-03-01T09:30:00Z",
            ]
        );
    }

    #[test]
    fn contact_message_with_comma_is_quoted() {
        let contacts = vec![Contact {
            id: Uuid::new_v4(),
            name: "Aino".to_string(),
            email: "a@b.fi".to_string(),
            phone: Some("+358 40 123".to_string()),
            service_interest: None,
            message: "Hello, world".to_string(),
            status: ContactStatus::Contacted,
            created_at: at(),
        }];
        let csv = contacts_csv(&contacts);
        assert_eq!(
            csv.lines().nth(1),
            Some("Aino,a@b.fi,+358 40 123,,\"Hello, world\",contacted,2026-03-01T09:30:00Z")
        );
    }

    #[test]
    fn empty_export_is_header_only() {
        let csv = reviews_csv(&[]);
        assert_eq!(csv, format!("{}\n", REVIEW_COLUMNS.join(",")));
    }

    #[test]
    fn review_rows_follow_column_order() {
        let review = Review {
            id: Uuid::new_v4(),
            customer_name: "Mikko".to_string(),
            location: None,
            rating: 5,
            content: "Great".to_string(),
            service_type: Some("sauna-renovation".to_string()),
            status: ReviewStatus::Approved,
            submitted_at: at(),
            published_at: Some(at()),
        };
        let csv = reviews_csv(&[review]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "customer_name,location,rating,service_type,content,status,submitted_at,published_at",
                "Mikko,,5,sauna-renovation,Great,approved,2026-03-01T09:30:00Z,2026-03-01T09:30:00Z",
            ]
        );
    }
}
