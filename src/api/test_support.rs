use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::test::TestRequest;

use crate::auth::jwt::generate_access_token;
use crate::bootstrap::seed_default_users;
use crate::config::Config;
use crate::leave::RequestService;
use crate::store::MemoryStore;

pub const TEST_SECRET: &str = "test-secret";

pub fn token_for(user_id: u64, secret: &str) -> String {
    generate_access_token(user_id, format!("user {user_id}"), secret, 300).unwrap()
}

/// Config and service over a seeded in-memory store. Build the app with
/// [`build_app`](crate::routes::build_app).
pub struct TestApp {
    pub config: Config,
    pub service: RequestService,
}

impl TestApp {
    pub async fn seeded() -> Self {
        let store = Arc::new(MemoryStore::new());
        seed_default_users(store.as_ref()).await.unwrap();
        let config =
            Config::from_lookup(|key| (key == "JWT_SECRET").then(|| TEST_SECRET.to_string()))
                .unwrap();

        Self {
            config,
            service: RequestService::new(store),
        }
    }

    /// The rate limiter keys on the peer address, which test requests lack.
    pub fn anonymous(&self, req: TestRequest) -> TestRequest {
        req.peer_addr(SocketAddr::from(([127, 0, 0, 1], 40000)))
    }

    pub fn request(&self, req: TestRequest, user_id: u64) -> TestRequest {
        self.anonymous(req).insert_header((
            "Authorization",
            format!("Bearer {}", token_for(user_id, TEST_SECRET)),
        ))
    }
}
