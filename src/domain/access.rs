use super::errors::DomainError;

/// The authenticated identity behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Option<i32>,
    pub is_admin: bool,
}

impl Caller {
    pub fn new(user_id: Option<i32>, role: Option<&str>) -> Self {
        Self {
            user_id: user_id.filter(|id| *id > 0),
            is_admin: role.is_some_and(|r| r.trim().eq_ignore_ascii_case("admin")),
        }
    }

    /// Resolves which user an operation acts on.
    ///
    /// A caller may name another user only when they are an admin.
    /// Non-positive ids count as absent.
    pub fn resolve_target_user(&self, requested: Option<i32>) -> Result<i32, DomainError> {
        let requested = requested.filter(|id| *id > 0);

        match (self.user_id, requested) {
            (Some(own), None) => Ok(own),
            (Some(own), Some(other)) if own == other => Ok(own),
            (_, Some(other)) if self.is_admin => Ok(other),
            (_, Some(_)) => Err(DomainError::PermissionDenied(
                "You are not allowed to act on behalf of another user.".to_string(),
            )),
            (None, None) => Err(DomainError::validation("A valid userId is required.")),
        }
    }

    pub fn ensure_can_view_order(&self, owner_id: i32) -> Result<(), DomainError> {
        if self.is_admin || self.user_id == Some(owner_id) {
            Ok(())
        } else {
            Err(DomainError::PermissionDenied(
                "You are not allowed to view this order.".to_string(),
            ))
        }
    }

    pub fn ensure_admin(&self) -> Result<(), DomainError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(DomainError::PermissionDenied(
                "Admin access required".to_string(),
            ))
        }
    }
}
