use serde::{Deserialize, Serialize};

/// Authenticated session as persisted in the local key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub expires_at_epoch_ms: i64,
    pub user_identifier: String,
}

impl Session {
    pub fn is_valid_at(&self, now_epoch_ms: i64) -> bool {
        now_epoch_ms < self.expires_at_epoch_ms
    }

    pub fn remaining_ms(&self, now_epoch_ms: i64) -> i64 {
        self.expires_at_epoch_ms.saturating_sub(now_epoch_ms).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at_epoch_ms: i64) -> Session {
        Session {
            token: "tok".to_string(),
            expires_at_epoch_ms,
            user_identifier: "ops@coldchain.io".to_string(),
        }
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let s = session(1_000);
        assert!(s.is_valid_at(999));
        assert!(!s.is_valid_at(1_000));
        assert!(!s.is_valid_at(1_001));
    }

    #[test]
    fn remaining_never_negative() {
        assert_eq!(session(1_000).remaining_ms(400), 600);
        assert_eq!(session(1_000).remaining_ms(5_000), 0);
    }
}
