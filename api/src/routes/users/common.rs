use db::models::user::Model as User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Checkbox semantics: present and truthy means admin.
    pub admin: Option<String>,
}

impl CreateUserForm {
    pub fn is_admin(&self) -> bool {
        matches!(
            self.admin.as_deref().map(str::trim),
            Some("on" | "true" | "1" | "yes")
        )
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub admin: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            admin: user.admin,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}
