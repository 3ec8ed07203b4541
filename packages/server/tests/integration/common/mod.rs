#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::Client;
use reqwest::header::HeaderMap;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde_json::Value;
use tempfile::TempDir;

use ::common::RetryPolicy;
use quiz_server::config::{AppConfig, CorsConfig, DatabaseConfig, QuizConfig, ServerConfig};
use quiz_server::entity::score;
use quiz_server::quiz::{Feedback, LineChooser};
use quiz_server::seed::{apply_seed, parse_seed};
use quiz_server::state::AppState;

/// Quiz content every test starts with.
///
/// `xmas` has three active questions at sort orders 10, 20 and 30 with one
/// inactive question between them. `empty` has no questions at all.
pub const FIXTURE_SEED: &str = r#"
[[quizzes]]
id = "xmas"
name = "Christmas Quiz"

[[quizzes.questions]]
sort_order = 10
question = "What colour is Rudolph's nose?"
answers = ["Blue", "Red", "Green", "Gold"]
correct_answer = 2

[[quizzes.questions]]
sort_order = 20
question = "How many reindeer pull the sleigh, not counting Rudolph?"
answers = ["Six", "Seven", "Eight", "Nine"]
correct_answer = 3

[[quizzes.questions]]
sort_order = 25
question = "Retired question"
answers = ["a", "b", "c", "d"]
correct_answer = 4
active = false

[[quizzes.questions]]
sort_order = 30
question = "Where did the Christmas tree tradition begin?"
answers = ["Germany", "England", "Norway", "Finland"]
correct_answer = 1

[[quizzes]]
id = "empty"
name = "Nothing Here"
"#;

/// Correct option for each active question of `xmas`, in order.
pub const XMAS_CORRECT: [u8; 3] = [2, 3, 1];

pub mod routes {
    pub const NEXT: &str = "/api/v1/play/next";
    pub const ANSWER: &str = "/api/v1/play/answer";

    pub fn quiz(quiz_id: &str) -> String {
        format!("/api/v1/quizzes/{quiz_id}")
    }

    pub fn contestants(quiz_id: &str, group: &str) -> String {
        format!("/api/v1/quizzes/{quiz_id}/groups/{group}/contestants")
    }

    pub fn group_scoreboard(quiz_id: &str, group: &str) -> String {
        format!("/api/v1/quizzes/{quiz_id}/groups/{group}/scoreboard")
    }

    pub fn scoreboard(contestant_id: &str) -> String {
        format!("/api/v1/scoreboard?c={contestant_id}")
    }
}

/// Always picks the first feedback line.
pub struct FirstLine;

impl LineChooser for FirstLine {
    fn choose(&self, _len: usize) -> usize {
        0
    }
}

/// A running test server backed by its own SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    /// Client with a cookie store, like a browser.
    pub client: Client,
    pub db: DatabaseConnection,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    pub headers: HeaderMap,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            headers,
            text,
            body,
        }
    }

    pub fn code(&self) -> &str {
        self.body["code"].as_str().unwrap_or_default()
    }
}

pub fn test_config(db_url: String) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
        },
        database: DatabaseConfig {
            url: db_url,
            max_connections: 5,
            min_connections: 3,
            read_retry: RetryPolicy::none(),
        },
        quiz: QuizConfig::default(),
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("quiz.db").display());
        let config = test_config(db_url);

        let db = quiz_server::database::init_db(&config.database)
            .await
            .expect("Failed to initialize test database");
        let seed = parse_seed(FIXTURE_SEED).expect("Fixture seed is invalid");
        apply_seed(&db, &seed).await.expect("Failed to seed test database");

        let feedback = Feedback::new(config.quiz.feedback.clone(), Arc::new(FirstLine));
        let app = quiz_server::build_router(AppState::new(db.clone(), config, feedback));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            addr,
            client,
            db,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// POST with a fresh client, so no cookie from earlier requests is sent.
    pub async fn post_without_cookie(&self, path: &str, body: &Value) -> TestResponse {
        let res = Client::new()
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    /// Register a contestant and return the contestant id.
    pub async fn register(&self, quiz_id: &str, group: &str, name: &str) -> String {
        let res = self
            .post(
                &routes::contestants(quiz_id, group),
                &serde_json::json!({ "name": name }),
            )
            .await;
        assert!(
            res.status == 201 || res.status == 200,
            "register failed: {}",
            res.text
        );
        res.body["contestant_id"]
            .as_str()
            .expect("Registration should contain contestant_id")
            .to_string()
    }

    /// Fetch the next question, reporting `last_answered`.
    pub async fn next(&self, contestant_id: &str, last_answered: Option<u32>) -> TestResponse {
        self.post(
            routes::NEXT,
            &serde_json::json!({
                "contestant_id": contestant_id,
                "last_answered": last_answered,
            }),
        )
        .await
    }

    pub async fn answer(&self, contestant_id: &str, question: u32, answer: u8) -> TestResponse {
        self.post(
            routes::ANSWER,
            &serde_json::json!({
                "contestant_id": contestant_id,
                "question": question,
                "answer": answer,
            }),
        )
        .await
    }

    /// Play `xmas` to the end, answering each question with the given options.
    pub async fn play_xmas(&self, contestant_id: &str, answers: [u8; 3]) {
        for (i, option) in answers.into_iter().enumerate() {
            let number = i as u32 + 1;
            let last = if number == 1 { None } else { Some(number - 1) };
            let next = self.next(contestant_id, last).await;
            assert_eq!(next.status, 200, "next failed: {}", next.text);
            let res = self.answer(contestant_id, number, option).await;
            assert_eq!(res.status, 200, "answer failed: {}", res.text);
        }
    }

    pub async fn score_row(&self, contestant_id: &str) -> score::Model {
        use sea_orm::{ColumnTrait, QueryFilter};
        score::Entity::find()
            .filter(score::Column::ContestantId.eq(contestant_id))
            .one(&self.db)
            .await
            .expect("Failed to query score")
            .expect("Score row should exist")
    }

    pub async fn score_count(&self) -> usize {
        score::Entity::find()
            .all(&self.db)
            .await
            .expect("Failed to query scores")
            .len()
    }
}
