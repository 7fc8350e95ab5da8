//! Badge and icon mapping.
//!
//! Every function here is total: values outside the known set map to the
//! neutral default rather than failing.

use serde::Serialize;

use crate::record::{ClaimStatus, ClientStatus, Impact, InsightKind, PolicyStatus, Priority, Trend};

pub const NEUTRAL_BADGE: &str = "bg-gray-100 text-gray-800";

const GREEN_BADGE: &str = "bg-green-100 text-green-800";
const ORANGE_BADGE: &str = "bg-orange-100 text-orange-800";
const YELLOW_BADGE: &str = "bg-yellow-100 text-yellow-800";
const RED_BADGE: &str = "bg-red-100 text-red-800";

/// Icon name plus the color class it is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub name: &'static str,
    pub color: &'static str,
}

impl Icon {
    const fn new(name: &'static str, color: &'static str) -> Self {
        Self { name, color }
    }
}

/// Types that render as a colored badge
pub trait Badge {
    fn badge_class(&self) -> &'static str;
}

impl Badge for ClaimStatus {
    fn badge_class(&self) -> &'static str {
        match self {
            ClaimStatus::Approved => GREEN_BADGE,
            ClaimStatus::Pending => ORANGE_BADGE,
            ClaimStatus::Review => YELLOW_BADGE,
            ClaimStatus::Rejected => RED_BADGE,
            ClaimStatus::Other(_) => NEUTRAL_BADGE,
        }
    }
}

impl Badge for PolicyStatus {
    fn badge_class(&self) -> &'static str {
        match self {
            PolicyStatus::Active => GREEN_BADGE,
            PolicyStatus::Pending => YELLOW_BADGE,
            PolicyStatus::Expired => RED_BADGE,
            PolicyStatus::Other(_) => NEUTRAL_BADGE,
        }
    }
}

impl Badge for ClientStatus {
    fn badge_class(&self) -> &'static str {
        match self {
            ClientStatus::Active => GREEN_BADGE,
            ClientStatus::Pending => YELLOW_BADGE,
            // inactive shares the neutral palette
            ClientStatus::Inactive | ClientStatus::Other(_) => NEUTRAL_BADGE,
        }
    }
}

impl Badge for Priority {
    fn badge_class(&self) -> &'static str {
        match self {
            Priority::High => RED_BADGE,
            Priority::Medium => YELLOW_BADGE,
            Priority::Low => GREEN_BADGE,
            Priority::Other(_) => NEUTRAL_BADGE,
        }
    }
}

impl Badge for Impact {
    fn badge_class(&self) -> &'static str {
        match self {
            Impact::High => RED_BADGE,
            Impact::Medium => YELLOW_BADGE,
            Impact::Low => GREEN_BADGE,
            Impact::Other(_) => NEUTRAL_BADGE,
        }
    }
}

pub fn claim_status_icon(status: &ClaimStatus) -> Icon {
    match status {
        ClaimStatus::Approved => Icon::new("check-circle", "text-green-600"),
        ClaimStatus::Pending => Icon::new("clock", "text-orange-600"),
        ClaimStatus::Review => Icon::new("alert-triangle", "text-yellow-600"),
        ClaimStatus::Rejected | ClaimStatus::Other(_) => Icon::new("clock", "text-gray-600"),
    }
}

pub fn insight_icon(kind: &InsightKind) -> Icon {
    match kind {
        InsightKind::Trend => Icon::new("trending-up", "text-blue-600"),
        InsightKind::Anomaly => Icon::new("alert-triangle", "text-yellow-600"),
        InsightKind::Recommendation => Icon::new("target", "text-green-600"),
        InsightKind::Prediction => Icon::new("brain", "text-purple-600"),
        InsightKind::Other(_) => Icon::new("brain", "text-gray-600"),
    }
}

/// Anything that is not `up` is drawn as a falling trend
pub fn trend_icon(trend: &Trend) -> Icon {
    match trend {
        Trend::Up => Icon::new("trending-up", "text-green-600"),
        Trend::Down | Trend::Other(_) => Icon::new("trending-down", "text-red-600"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_status_badges_cover_the_fixed_set() {
        assert_eq!(ClaimStatus::Approved.badge_class(), "bg-green-100 text-green-800");
        assert_eq!(ClaimStatus::Pending.badge_class(), "bg-orange-100 text-orange-800");
        assert_eq!(ClaimStatus::Review.badge_class(), "bg-yellow-100 text-yellow-800");
        assert_eq!(ClaimStatus::Rejected.badge_class(), "bg-red-100 text-red-800");
    }

    #[test]
    fn unmapped_values_fall_back_to_neutral() {
        assert_eq!(ClaimStatus::from("escalated").badge_class(), NEUTRAL_BADGE);
        assert_eq!(PolicyStatus::from("lapsed").badge_class(), NEUTRAL_BADGE);
        assert_eq!(ClientStatus::from("").badge_class(), NEUTRAL_BADGE);
        assert_eq!(Priority::from("urgent").badge_class(), NEUTRAL_BADGE);
        assert_eq!(Impact::from("HIGH").badge_class(), NEUTRAL_BADGE);
    }

    #[test]
    fn policy_and_client_badges() {
        assert_eq!(PolicyStatus::Active.badge_class(), GREEN_BADGE);
        assert_eq!(PolicyStatus::Pending.badge_class(), YELLOW_BADGE);
        assert_eq!(PolicyStatus::Expired.badge_class(), RED_BADGE);
        assert_eq!(ClientStatus::Active.badge_class(), GREEN_BADGE);
        assert_eq!(ClientStatus::Pending.badge_class(), YELLOW_BADGE);
        assert_eq!(ClientStatus::Inactive.badge_class(), NEUTRAL_BADGE);
    }

    #[test]
    fn priority_and_impact_share_a_palette() {
        for (priority, impact) in [
            (Priority::High, Impact::High),
            (Priority::Medium, Impact::Medium),
            (Priority::Low, Impact::Low),
        ] {
            assert_eq!(priority.badge_class(), impact.badge_class());
        }
        assert_eq!(Priority::High.badge_class(), RED_BADGE);
    }

    #[test]
    fn icons_fall_back_to_gray() {
        assert_eq!(claim_status_icon(&ClaimStatus::Review).name, "alert-triangle");
        assert_eq!(
            claim_status_icon(&ClaimStatus::from("unknown")),
            Icon::new("clock", "text-gray-600")
        );
        assert_eq!(insight_icon(&InsightKind::Prediction).color, "text-purple-600");
        assert_eq!(
            insight_icon(&InsightKind::from("forecast")),
            Icon::new("brain", "text-gray-600")
        );
        assert_eq!(trend_icon(&Trend::from("flat")).name, "trending-down");
    }
}
