use rocket::{routes, Build, Rocket};

pub mod github;
pub use github::{github_webhook, health, GitHubSecret};

use crate::{bot::Bot, slack::Deliver};

/// Where produced notifications are sent before being returned to GitHub.
pub struct Delivery(pub Box<dyn Deliver>);

pub fn rocket(bot: Bot, secret: GitHubSecret, delivery: Box<dyn Deliver>) -> Rocket<Build> {
    rocket::build()
        .mount("/", routes![github_webhook, health])
        .manage(bot)
        .manage(secret)
        .manage(Delivery(delivery))
}
