use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Declares a status-like enum whose known values map to unit variants while
/// anything else is kept verbatim in `Other`, so unmapped values survive a
/// serde round trip and still reach the badge fallback.
macro_rules! status_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $text,)+
                    Self::Other(raw) => raw,
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($text => Self::$variant,)+
                    _ => Self::Other(raw),
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::from(raw.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

status_enum!(
    /// Lifecycle status of a claim
    ClaimStatus {
        Pending => "pending",
        Approved => "approved",
        Review => "review",
        Rejected => "rejected",
    }
);

status_enum!(
    /// Lifecycle status of a policy
    PolicyStatus {
        Active => "active",
        Pending => "pending",
        Expired => "expired",
    }
);

status_enum!(
    /// Relationship status of a client
    ClientStatus {
        Active => "active",
        Pending => "pending",
        Inactive => "inactive",
    }
);

status_enum!(
    /// Urgency of an upcoming back-office task
    Priority {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
);

status_enum!(
    /// Expected business impact of an AI insight
    Impact {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
);

status_enum!(
    InsightKind {
        Trend => "trend",
        Anomaly => "anomaly",
        Recommendation => "recommendation",
        Prediction => "prediction",
    }
);

status_enum!(
    /// Direction of a metric compared with the previous period
    Trend {
        Up => "up",
        Down => "down",
    }
);

/// A domain item that is displayed as a card and can be selected
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;

    /// Display fields searched by the page filter
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match over the display fields
    fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Mock "AI" verdict attached to a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Risk score in [0, 100]
    pub risk_score: u8,
    /// Fraud probability percentage in [0, 50]
    pub fraud_probability: u8,
    pub recommendation: String,
    /// Confidence percentage in [85, 100)
    pub confidence: u8,
    /// Human readable duration, e.g. "2.4s"
    pub processing_time: String,
    #[serde(default)]
    pub key_findings: Vec<String>,
    #[serde(default)]
    pub analyzed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,
    pub client: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
    pub status: ClaimStatus,
    pub date: String,
    /// Processing progress percentage, never above 100
    pub progress: u8,
    pub description: String,
    #[serde(default)]
    pub ai_processing: bool,
    #[serde(default)]
    pub ai_analysis: Option<AnalysisResult>,
}

impl Record for Claim {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.client.as_str(),
            self.kind.as_str(),
            self.description.as_str(),
            self.status.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub client: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub premium: String,
    pub status: PolicyStatus,
    pub renewal_date: String,
    pub coverage: String,
}

impl Record for Policy {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.client.as_str(), self.kind.as_str(), self.status.as_str()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub policies: u32,
    pub total_premium: String,
    pub status: ClientStatus,
    pub join_date: String,
}

impl Client {
    /// Avatar fallback text: the first letter of every name part
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}

impl Record for Client {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.name.as_str(), self.email.as_str(), self.phone.as_str()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    pub upload_date: String,
    pub category: String,
}

impl Record for Document {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.name.as_str(), self.kind.as_str(), self.category.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let status: ClaimStatus = serde_json::from_str("\"escalated\"").unwrap();
        assert_eq!(status, ClaimStatus::Other("escalated".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"escalated\"");

        let known: ClaimStatus = serde_json::from_str("\"review\"").unwrap();
        assert_eq!(known, ClaimStatus::Review);
    }

    #[test]
    fn client_initials_take_each_name_part() {
        let client = Client {
            id: "CLI-009".to_string(),
            name: "Mary Ann Lee".to_string(),
            email: "mal@email.com".to_string(),
            phone: "+1 (555) 000-0000".to_string(),
            policies: 1,
            total_premium: "$900".to_string(),
            status: ClientStatus::Active,
            join_date: "2024-02-01".to_string(),
        };
        assert_eq!(client.initials(), "MAL");
    }

    #[test]
    fn search_is_case_insensitive_and_blank_matches_everything() {
        let document = Document {
            id: "DOC-001".to_string(),
            name: "Policy Agreement - John Smith".to_string(),
            kind: "PDF".to_string(),
            size: "2.4 MB".to_string(),
            upload_date: "2024-01-15".to_string(),
            category: "Policy Documents".to_string(),
        };
        assert!(document.matches("john"));
        assert!(document.matches("pdf"));
        assert!(document.matches("   "));
        assert!(!document.matches("medical"));
    }
}
