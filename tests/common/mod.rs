//! Shared fixtures for the integration tests: an in-memory repository, a
//! mock content store seeded from `content/`, and request helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, body::Body, http::Response};
use chrono::Utc;
use devsage::{
    AppState, create_router,
    auth::Claims,
    config::{AppConfig, Env},
    models::{CustomQuestion, QaPair, User},
    registry::ContentRegistry,
    repository::Repository,
    storage::MockContentStore,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::de::DeserializeOwned;
use std::{
    sync::{Arc, Mutex},
    time::SystemTime,
};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
pub const TEST_USER_ID: Uuid = Uuid::from_u128(1);

pub const JS_QUESTIONS: &str = include_str!("../../content/interview-questions/js.json");
pub const DSA_QUESTIONS: &str = include_str!("../../content/interview-questions/dsa.json");
pub const OOP_ABOUT: &str = include_str!("../../content/documents/oop/about.mdx");

// --- In-memory Repository ---

#[derive(Default)]
pub struct InMemoryRepo {
    pub users: Mutex<Vec<User>>,
    pub questions: Mutex<Vec<CustomQuestion>>,
}

impl InMemoryRepo {
    pub fn with_user(user: User) -> Self {
        Self {
            users: Mutex::new(vec![user]),
            questions: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl Repository for InMemoryRepo {
    async fn get_user(&self, id: Uuid) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    async fn create_user(&self, user: User) -> Option<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.id == user.id) {
            return None;
        }
        users.push(user.clone());
        Some(user)
    }

    async fn count_custom_questions(&self, user_id: Uuid) -> i64 {
        self.questions
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.user_id == user_id)
            .count() as i64
    }

    async fn get_custom_questions(&self, user_id: Uuid) -> Vec<CustomQuestion> {
        let mut own: Vec<CustomQuestion> = self
            .questions
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.user_id == user_id)
            .cloned()
            .collect();
        own.reverse();
        own
    }

    async fn add_custom_question(
        &self,
        user_id: Uuid,
        topic: String,
        question: QaPair,
    ) -> Option<CustomQuestion> {
        let created = CustomQuestion {
            id: Uuid::new_v4(),
            user_id,
            topic,
            question,
            created_at: Utc::now(),
        };
        self.questions.lock().unwrap().push(created.clone());
        Some(created)
    }

    async fn delete_custom_question(&self, id: Uuid, user_id: Uuid) -> bool {
        let mut questions = self.questions.lock().unwrap();
        let before = questions.len();
        questions.retain(|q| !(q.id == id && q.user_id == user_id));
        questions.len() < before
    }
}

// --- State Builders ---

pub fn test_user() -> User {
    User {
        id: TEST_USER_ID,
        email: "ada@example.com".to_string(),
        username: Some("ada".to_string()),
        full_name: Some("Ada Lovelace".to_string()),
        image_url: None,
        role: "member".to_string(),
    }
}

pub fn seeded_store() -> MockContentStore {
    MockContentStore::new()
        .with("interview-questions/js.json", JS_QUESTIONS)
        .with("interview-questions/dsa.json", DSA_QUESTIONS)
        .with("documents/oop/about.mdx", OOP_ABOUT)
        .with("interview-questions/react.json", "{ not json")
}

pub fn test_config(env: Env) -> AppConfig {
    AppConfig {
        env,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        ..AppConfig::default()
    }
}

pub fn build_state(env: Env, repo: InMemoryRepo, store: MockContentStore) -> AppState {
    AppState {
        registry: Arc::new(ContentRegistry::builtin().expect("builtin manifest is valid")),
        repo: Arc::new(repo),
        storage: Arc::new(store),
        config: test_config(env),
    }
}

pub fn app() -> Router {
    create_router(build_state(
        Env::Local,
        InMemoryRepo::with_user(test_user()),
        seeded_store(),
    ))
}

// --- Request Helpers ---

pub fn create_token(user_id: Uuid, exp_offset: i64) -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: user_id,
        iat: now as usize,
        exp: (now + exp_offset) as usize,
    };

    let key = EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

pub async fn body_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
