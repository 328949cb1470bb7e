use crate::seed::Seeder;
use fake::{
    Fake,
    faker::lorem::en::{Paragraph, Sentence},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, seq::SliceRandom};
use sea_orm::DatabaseConnection;
use services::{
    ServiceResult,
    ticket_service::{CreateTicket, TicketService},
    user_service::UserService,
};

pub struct TicketSeeder;

const PRIORITIES: [&str; 4] = ["LOW", "MEDIUM", "HIGH", "CRITICAL"];
const STATUSES: [&str; 4] = ["OPEN", "IN_PROGRESS", "RESOLVED", "CLOSED"];

#[async_trait::async_trait]
impl Seeder for TicketSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> ServiceResult<()> {
        let mut rng = StdRng::from_entropy();
        let users = UserService::assignable_users(db).await?;
        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();

        for _ in 0..40 {
            let Some(&creator) = ids.choose(&mut rng) else {
                return Ok(());
            };
            let assigned_to = if rng.gen_bool(0.6) {
                ids.choose(&mut rng).map(|id| id.to_string())
            } else {
                None
            };

            let title: String = Sentence(3..7).fake();
            let description: String = Paragraph(1..3).fake();
            let input = CreateTicket {
                title: title.trim_end_matches('.').to_owned(),
                description,
                priority: PRIORITIES.choose(&mut rng).map(|p| p.to_string()),
                status: STATUSES.choose(&mut rng).map(|s| s.to_string()),
                assigned_to,
            };

            TicketService::create_ticket(db, input, creator).await?;
        }

        Ok(())
    }
}
