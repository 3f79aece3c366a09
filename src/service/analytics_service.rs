//! Analytics service: dashboard aggregates over a date range.
//!
//! All reads are issued concurrently and reshaped in process into totals,
//! zero-filled daily buckets and a per-service breakdown.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Contact, PostStatus, Review, ReviewStatus, Subscriber};
use crate::error::SiteError;
use crate::persistence::{
    BlogPostFilter, ContactFilter, DateRange, ReviewFilter, SiteStore, SubscriberFilter,
};

/// Days covered when no range is given, today included.
pub const DEFAULT_RANGE_DAYS: u64 = 30;

/// Longest range the dashboard accepts, in days.
pub const MAX_RANGE_DAYS: i64 = 366;

/// Bucket label for contacts without a service interest.
const UNSPECIFIED: &str = "unspecified";

/// Dashboard query (calendar days, UTC).
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsQuery {
    /// First day, inclusive. Defaults to 29 days before `to`.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Last day, inclusive. Defaults to today.
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

/// Headline numbers for the range.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardTotals {
    /// Contact submissions.
    pub contacts: usize,
    /// Newsletter sign-ups.
    pub new_subscribers: usize,
    /// Active subscribers, all time.
    pub active_subscribers: i64,
    /// Reviews awaiting moderation.
    pub pending_reviews: usize,
    /// Approved reviews.
    pub approved_reviews: usize,
    /// Rejected reviews.
    pub rejected_reviews: usize,
    /// Mean rating of approved reviews, two decimals.
    pub average_rating: Option<f64>,
    /// Posts published in the range.
    pub published_posts: usize,
}

/// Counts for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DailyBucket {
    /// The day.
    pub date: NaiveDate,
    /// Contact submissions that day.
    pub contacts: usize,
    /// Sign-ups that day.
    pub subscribers: usize,
}

/// Contacts per service interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ServiceCount {
    /// Service slug or `"unspecified"`.
    pub service: String,
    /// Number of contacts.
    pub count: usize,
}

/// Dashboard payload.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Dashboard {
    /// First day covered.
    pub from: NaiveDate,
    /// Last day covered.
    pub to: NaiveDate,
    /// Headline numbers.
    pub totals: DashboardTotals,
    /// One bucket per day, `from..=to`.
    pub daily: Vec<DailyBucket>,
    /// Contacts grouped by service, largest first.
    pub contacts_by_service: Vec<ServiceCount>,
}

/// Builds the admin dashboard.
#[derive(Debug, Clone)]
pub struct AnalyticsService {
    store: Arc<dyn SiteStore>,
}

impl AnalyticsService {
    /// Creates a new `AnalyticsService`.
    #[must_use]
    pub fn new(store: Arc<dyn SiteStore>) -> Self {
        Self { store }
    }

    /// Aggregates the dashboard for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidRequest`] when `from` is after `to` or
    /// the range is longer than [`MAX_RANGE_DAYS`], and a storage error on
    /// database failure.
    pub async fn dashboard(&self, query: AnalyticsQuery) -> Result<Dashboard, SiteError> {
        let (from, to) = resolve_range(query, Utc::now().date_naive())?;
        let range = DateRange {
            from: Some(start_of(from)),
            to: Some(end_of(to)),
        };

        let contact_filter = ContactFilter {
            from: range.from,
            to: range.to,
            ..ContactFilter::default()
        };
        let subscriber_filter = SubscriberFilter {
            from: range.from,
            to: range.to,
            ..SubscriberFilter::default()
        };
        let review_filter = ReviewFilter {
            from: range.from,
            to: range.to,
            ..ReviewFilter::default()
        };
        let post_filter = BlogPostFilter {
            status: Some(PostStatus::Published),
        };

        let (contacts, subscribers, reviews, posts, active_subscribers) = tokio::try_join!(
            self.store.list_contacts(&contact_filter),
            self.store.list_subscribers(&subscriber_filter),
            self.store.list_reviews(&review_filter),
            self.store.list_blog_posts(&post_filter),
            self.store.count_active_subscribers(),
        )?;

        let published_posts = posts
            .iter()
            .filter(|p| p.published_at.is_some_and(|at| range.contains(at)))
            .count();

        let dashboard = Dashboard {
            from,
            to,
            totals: DashboardTotals {
                contacts: contacts.len(),
                new_subscribers: subscribers.len(),
                active_subscribers,
                pending_reviews: count_status(&reviews, ReviewStatus::Pending),
                approved_reviews: count_status(&reviews, ReviewStatus::Approved),
                rejected_reviews: count_status(&reviews, ReviewStatus::Rejected),
                average_rating: average_rating(&reviews),
                published_posts,
            },
            daily: daily_buckets(from, to, &contacts, &subscribers),
            contacts_by_service: contacts_by_service(&contacts),
        };
        tracing::debug!(%from, %to, contacts = dashboard.totals.contacts, "dashboard built");
        Ok(dashboard)
    }
}

fn resolve_range(query: AnalyticsQuery, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), SiteError> {
    let to = query.to.unwrap_or(today);
    let from = match query.from {
        Some(from) => from,
        None => to
            .checked_sub_days(Days::new(DEFAULT_RANGE_DAYS - 1))
            .unwrap_or(NaiveDate::MIN),
    };
    if from > to {
        return Err(SiteError::InvalidRequest(format!(
            "from ({from}) must not be after to ({to})"
        )));
    }
    if (to - from).num_days() >= MAX_RANGE_DAYS {
        return Err(SiteError::InvalidRequest(format!(
            "range must not exceed {MAX_RANGE_DAYS} days"
        )));
    }
    Ok((from, to))
}

fn start_of(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Last representable instant of `day`.
fn end_of(day: NaiveDate) -> DateTime<Utc> {
    day.succ_opt()
        .map_or(DateTime::<Utc>::MAX_UTC, |next| {
            start_of(next) - chrono::Duration::nanoseconds(1)
        })
}

fn count_status(reviews: &[Review], status: ReviewStatus) -> usize {
    reviews.iter().filter(|r| r.status == status).count()
}

fn average_rating(reviews: &[Review]) -> Option<f64> {
    let ratings: Vec<f64> = reviews
        .iter()
        .filter(|r| r.status == ReviewStatus::Approved)
        .map(|r| f64::from(r.rating))
        .collect();
    if ratings.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}

fn daily_buckets(
    from: NaiveDate,
    to: NaiveDate,
    contacts: &[Contact],
    subscribers: &[Subscriber],
) -> Vec<DailyBucket> {
    let mut buckets: BTreeMap<NaiveDate, DailyBucket> = from
        .iter_days()
        .take_while(|day| *day <= to)
        .map(|date| {
            (
                date,
                DailyBucket {
                    date,
                    contacts: 0,
                    subscribers: 0,
                },
            )
        })
        .collect();
    for contact in contacts {
        if let Some(bucket) = buckets.get_mut(&contact.created_at.date_naive()) {
            bucket.contacts += 1;
        }
    }
    for subscriber in subscribers {
        if let Some(bucket) = buckets.get_mut(&subscriber.subscribed_at.date_naive()) {
            bucket.subscribers += 1;
        }
    }
    buckets.into_values().collect()
}

fn contacts_by_service(contacts: &[Contact]) -> Vec<ServiceCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for contact in contacts {
        let service = contact.service_interest.as_deref().unwrap_or(UNSPECIFIED);
        *counts.entry(service).or_default() += 1;
    }
    let mut out: Vec<ServiceCount> = counts
        .into_iter()
        .map(|(service, count)| ServiceCount {
            service: service.to_string(),
            count,
        })
        .collect();
    // BTreeMap order already sorts names; the stable sort keeps it per count.
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}
