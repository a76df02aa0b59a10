#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::HashScheme;
use auth::PasswordHasher;
use chrono::Utc;
use identity_service::domain::credentials::ports::RevocationStore;
use identity_service::domain::credentials::service::AuthService;
use identity_service::domain::user::models::CredentialMethod;
use identity_service::domain::user::models::EmailAddress;
use identity_service::domain::user::models::Role;
use identity_service::domain::user::models::User;
use identity_service::domain::user::models::UserId;
use identity_service::domain::user::ports::UserRepository;
use identity_service::domain::user::service::UserService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::revocation::InMemoryRevocationStore;
use identity_service::user::errors::UserError;
use serde_json::json;
use serde_json::Value;
use tokio::sync::RwLock;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const DEFAULT_PICTURE: &str = "https://img.example.com/default.png";

/// User store kept in memory so HTTP tests run without a database.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub repository: Arc<InMemoryUserRepository>,
    pub revocations: Arc<InMemoryRevocationStore>,
}

impl TestApp {
    /// Spawn the application with revocation not enforced by the gate
    pub async fn spawn() -> Self {
        Self::spawn_with(false).await
    }

    /// Spawn the application in a background task and return TestApp
    pub async fn spawn_with(enforce_revocation: bool) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let password_hasher = PasswordHasher::with_scheme(HashScheme::Bcrypt { cost: 4 });
        let authenticator = Arc::new(
            Authenticator::new(JWT_SECRET).with_password_hasher(password_hasher.clone()),
        );
        let repository = Arc::new(InMemoryUserRepository::default());
        let revocations = Arc::new(InMemoryRevocationStore::new());

        let user_service = Arc::new(
            UserService::new(Arc::clone(&repository), password_hasher)
                .with_default_picture(DEFAULT_PICTURE),
        );
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&repository),
            Arc::clone(&user_service),
            Arc::clone(&revocations),
            Arc::clone(&authenticator),
        ));

        let gate_revocations: Option<Arc<dyn RevocationStore>> = if enforce_revocation {
            Some(revocations.clone())
        } else {
            None
        };

        let router = create_router(
            user_service,
            auth_service,
            Arc::clone(&authenticator),
            gate_revocations,
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            authenticator,
            repository,
            revocations,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a password account through the public route and return its id
    pub async fn create_password_user(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/users")
            .json(&json!({
                "email": email,
                "name": "Test User",
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Log in and return the full response body
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the access token
    pub async fn access_token(&self, email: &str, password: &str) -> String {
        let body: Value = self
            .login(email, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");
        body["data"]["accessToken"].as_str().unwrap().to_string()
    }

    /// Insert a federated account directly into the store
    pub async fn seed_federated_user(&self, email: &str, subject: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            credential: CredentialMethod::Federated {
                subject: subject.to_string(),
            },
            role: Role::User,
            name: "Federated".to_string(),
            given_name: String::new(),
            family_name: String::new(),
            picture: String::new(),
            email_verified: true,
            created_at: now,
            updated_at: now,
        };
        self.repository.create(user).await.unwrap()
    }
}
