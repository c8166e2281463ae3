//! Subscription status and user profile.

pub mod handlers;
pub mod repository;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::account::SubscriptionRow;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionSummary {
    pub subscription: SubscriptionRow,
    pub trial_days_remaining: i64,
    pub is_trial_active: bool,
    pub is_subscribed: bool,
}

impl SubscriptionSummary {
    pub fn at(subscription: SubscriptionRow, now: DateTime<Utc>) -> Self {
        let trial_days_remaining = trial_days_remaining(subscription.trial_end_date, now);
        let is_trial_active =
            subscription.subscription_status == "trial" && trial_days_remaining > 0;
        let is_subscribed = subscription.subscription_status == "active";
        Self {
            subscription,
            trial_days_remaining,
            is_trial_active,
            is_subscribed,
        }
    }
}

/// Whole days left until `trial_end`, rounded up; never negative.
pub fn trial_days_remaining(trial_end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = (trial_end - now).num_seconds();
    if secs <= 0 {
        0
    } else {
        (secs + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
    }
}
