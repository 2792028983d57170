use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Kind of entity a like points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Post,
    Comment,
}

/// Per-type storage details for a likeable entity.
#[derive(Debug)]
pub struct TargetTable {
    pub table: &'static str,
    pub count_column: &'static str,
    pub not_found: &'static str,
}

static POST_TARGET: TargetTable = TargetTable {
    table: "posts",
    count_column: "likes_count",
    not_found: "post not found",
};

static COMMENT_TARGET: TargetTable = TargetTable {
    table: "comments",
    count_column: "likes_count",
    not_found: "comment not found",
};

impl TargetType {
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "post" => Some(Self::Post),
            "comment" => Some(Self::Comment),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }

    pub fn table(&self) -> &'static TargetTable {
        match self {
            Self::Post => &POST_TARGET,
            Self::Comment => &COMMENT_TARGET,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: Uuid,
    pub target_type: TargetType,
    pub target_id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Result of a like or unlike: the affected record and the adjusted counter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeTransition {
    pub like: Like,
    pub likes_count: i64,
}
