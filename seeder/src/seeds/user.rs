use crate::seed::Seeder;
use fake::{
    Fake,
    faker::internet::en::{SafeEmail, Username},
};
use sea_orm::DatabaseConnection;
use services::{
    ServiceError, ServiceResult,
    user_service::{CreateUser, UserService},
};

pub struct UserSeeder;

#[async_trait::async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> ServiceResult<()> {
        let fixed = [
            ("admin", "admin@example.com", true),
            ("user", "user@example.com", false),
        ];
        let random = (0..10).map(|_| (Username().fake::<String>(), SafeEmail().fake::<String>()));

        let accounts = fixed
            .into_iter()
            .map(|(u, e, admin)| (u.to_owned(), e.to_owned(), admin))
            .chain(random.map(|(u, e)| (u, e, false)));

        for (username, email, admin) in accounts {
            let input = CreateUser {
                username,
                email,
                password: "password123".into(),
                admin,
            };
            match UserService::create_user(db, input).await {
                // Re-seeding or a repeated fake username.
                Ok(_) | Err(ServiceError::Validation(_)) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}
