//! Subscription check tool definition.
//!
//! A stub that reports every user as subscribed to the monthly plan. The
//! renewal date is one month after "today", read from an injectable clock.

use chrono::{Months, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};

use super::common::user_id_field;
use crate::domains::tools::envelope::ResponseEnvelope;
use crate::domains::tools::error::RegistryError;
use crate::domains::tools::handlers::{ToolDefinition, ToolHandler};
use crate::domains::tools::schema::Schema;
use crate::domains::tools::validator::ValidatedInput;

/// Source of the current date.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Clock reading the current UTC date.
pub fn system_clock() -> Clock {
    Arc::new(|| Utc::now().date_naive())
}

/// Parameters for the subscription check tool.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckSubscriptionParams {
    pub user_id: String,
}

/// Subscription check tool.
pub struct CheckSubscriptionTool {
    clock: Clock,
}

impl CheckSubscriptionTool {
    /// Plan every stubbed subscription is on.
    pub const PLAN: &'static str = "Pro-Monthly";

    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    /// Renewal date for a subscription checked on `today`.
    ///
    /// Month-end dates clamp to the last day of the next month.
    pub fn renewal_date(today: NaiveDate) -> NaiveDate {
        today.checked_add_months(Months::new(1)).unwrap_or(today)
    }
}

impl Default for CheckSubscriptionTool {
    fn default() -> Self {
        Self::new(system_clock())
    }
}

#[async_trait::async_trait]
impl ToolHandler for CheckSubscriptionTool {
    #[instrument(skip_all)]
    async fn execute(&self, input: ValidatedInput) -> anyhow::Result<ResponseEnvelope> {
        let params: CheckSubscriptionParams = input.parse()?;
        info!("Subscription check for user: {}", params.user_id);

        let renews_on = Self::renewal_date((self.clock)());
        Ok(ResponseEnvelope::json(json!({
            "active": true,
            "plan": Self::PLAN,
            "renews_on": renews_on.format("%Y-%m-%d").to_string()
        })))
    }
}

impl ToolDefinition for CheckSubscriptionTool {
    const NAME: &'static str = "check_subscription";
    const DESCRIPTION: &'static str =
        "Checks if a user has an active subscription (stub for now).";

    fn schema() -> Result<Schema, RegistryError> {
        Schema::builder().required("user_id", user_id_field()).build()
    }
}
