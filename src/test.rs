//! Helpers shared by the route tests.

use std::sync::Arc;

use argon2::Argon2;
use axum_test::TestServerConfig;
use uuid::Uuid;

pub use axum_test::TestServer;
pub use serde_json::json;

pub use crate::Database;
use crate::{
	config::{Config, ReviewPolicy},
	mail::{test::MemoryMailer, Mailer},
	State,
};

fn config() -> Config {
	let mut config = Config::from_lookup(|key| match key {
		"DATABASE_URL" => Some("postgres://localhost/unused".into()),
		_ => None,
	})
	.unwrap();

	config.rate_limit = false;
	config
}

fn server(database: Database, config: Config, mailer: Arc<dyn Mailer>) -> TestServer {
	let state = State {
		database,
		hasher: Argon2::default(),
		config: Arc::new(config),
		mailer,
	};

	TestServer::new_with_config(
		crate::app(state, None),
		TestServerConfig {
			save_cookies: true,
			..Default::default()
		},
	)
	.unwrap()
}

pub fn app(database: Database) -> TestServer {
	server(database, config(), Arc::new(MemoryMailer::default()))
}

pub fn app_with_mailer(database: Database) -> (TestServer, Arc<MemoryMailer>) {
	let mailer = Arc::new(MemoryMailer::default());

	(server(database, config(), mailer.clone()), mailer)
}

pub fn app_with_reviews(database: Database, reviews: ReviewPolicy) -> TestServer {
	server(
		database,
		Config {
			reviews,
			..config()
		},
		Arc::new(MemoryMailer::default()),
	)
}

/// Registers an account with the password `hunter2hunter`, keeping its session
/// cookie, and returns the new user's id.
pub async fn register(app: &TestServer, email: &str, username: &str) -> Uuid {
	let response = app
		.post("/auth/register")
		.json(&json!({
			"email": email,
			"username": username,
			"password": "hunter2hunter",
		}))
		.await;

	assert_eq!(response.status_code(), 200);

	let me = app.get("/auth/me").await.json::<serde_json::Value>();

	me["id"].as_str().unwrap().parse().unwrap()
}

/// Lists a campground as the current user and returns its id.
pub async fn create_campground(app: &TestServer) -> String {
	let response = app
		.post("/campgrounds")
		.json(&json!({
			"name": "Pine Ridge",
			"price": "12.50",
			"description": "Quiet sites under the pines.",
			"location": "Bend, Oregon",
			"lat": 44.05,
			"lng": -121.31,
			"image_url": "https://img.example/pine.jpg",
		}))
		.await;

	assert_eq!(response.status_code(), 200);

	response.json::<serde_json::Value>()["id"]
		.as_str()
		.unwrap()
		.to_string()
}
