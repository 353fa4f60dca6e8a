use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ports::Caller;

/// User entity - an account that can author and like posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub fullname: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(email: String, fullname: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            fullname,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// The identity this user presents once authenticated.
    pub fn as_caller(&self) -> Caller {
        Caller {
            id: self.id,
            email: self.email.clone(),
            fullname: self.fullname.clone(),
        }
    }
}
