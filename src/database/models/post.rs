use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A post as stored and as rendered to clients. Field order is the JSON field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub user_id: i64,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl PostChanges {
    pub(crate) fn apply(self, post: &mut Post, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(body) = self.body {
            post.body = body;
        }
        post.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Post {
        let now = Utc::now();
        Post {
            id: 1,
            title: "post".to_string(),
            body: "here's the post".to_string(),
            user_id: 7,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn apply_only_touches_given_fields() {
        let mut post = sample();
        let changes = PostChanges {
            title: Some("post1".to_string()),
            body: None,
        };
        changes.apply(&mut post, Utc::now());
        assert_eq!(post.title, "post1");
        assert_eq!(post.body, "here's the post");
        assert_eq!(post.user_id, 7);
    }

    #[test]
    fn serializes_fields_in_declaration_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        let id = json.find("\"id\"").unwrap();
        let title = json.find("\"title\"").unwrap();
        let body = json.find("\"body\"").unwrap();
        let user_id = json.find("\"user_id\"").unwrap();
        assert!(id < title && title < body && body < user_id);
    }
}
