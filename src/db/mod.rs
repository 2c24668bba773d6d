use mongodb::{Client, Database};
use rocket::fairing::AdHoc;

use crate::config::AppConfig;

pub fn init(config: &AppConfig) -> AdHoc {
    let uri = config.mongodb_uri.clone();
    let name = config.database_name.clone();

    AdHoc::on_ignite("MongoDB", |rocket| async move {
        match connect(&uri, &name).await {
            Ok(database) => {
                info!("✓ MongoDB connected successfully");
                rocket.manage(database)
            }
            Err(e) => {
                error!("✗ Failed to connect to MongoDB: {}", e);
                rocket
            }
        }
    })
}

async fn connect(uri: &str, name: &str) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(uri).await?;

    // Test connection
    client
        .database("admin")
        .run_command(mongodb::bson::doc! {"ping": 1}, None)
        .await?;

    Ok(client.database(name))
}

pub type DbConn = Database;
