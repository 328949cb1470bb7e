use crate::seed::Seeder;
use fake::{Fake, faker::lorem::en::Sentence};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, seq::SliceRandom};
use sea_orm::DatabaseConnection;
use services::{
    ServiceResult, comment_service::CommentService, ticket_service::TicketService,
    user_service::UserService,
};

pub struct CommentSeeder;

#[async_trait::async_trait]
impl Seeder for CommentSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> ServiceResult<()> {
        let mut rng = StdRng::from_entropy();
        let authors: Vec<i64> = UserService::assignable_users(db)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();
        let tickets = TicketService::list_tickets(db, None, None).await?;

        for ticket in tickets {
            for _ in 0..rng.gen_range(0..4) {
                // Mostly the people involved, sometimes a bystander.
                let author = if rng.gen_bool(0.7) {
                    ticket.assigned_to_id.unwrap_or(ticket.created_by_id)
                } else {
                    match authors.choose(&mut rng) {
                        Some(&id) => id,
                        None => ticket.created_by_id,
                    }
                };
                let body: String = Sentence(4..12).fake();
                CommentService::add_comment(db, ticket.id, &body, author).await?;
            }
        }

        Ok(())
    }
}
