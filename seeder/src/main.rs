use crate::seed::{Seeder, run_seeder};
use crate::seeds::{comments::CommentSeeder, tickets::TicketSeeder, user::UserSeeder};
use migration::{Migrator, MigratorTrait};

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let db = db::connect().await.expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    for (seeder, name) in [
        (Box::new(UserSeeder) as Box<dyn Seeder + Send + Sync>, "User"),
        (Box::new(TicketSeeder), "Ticket"),
        (Box::new(CommentSeeder), "Comment"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
