use serde_json::json;

use crate::common::{TestApp, XMAS_CORRECT, routes};

mod registering {
    use super::*;

    #[tokio::test]
    async fn new_contestant_gets_id_and_cookie() {
        let app = TestApp::spawn().await;

        let res = app
            .post(&routes::contestants("xmas", "office"), &json!({"name": "Alice"}))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let id = res.body["contestant_id"].as_str().unwrap();
        assert_eq!(id.len(), 64);
        assert_eq!(res.body["resumed"], false);

        let cookie = res
            .headers
            .get("set-cookie")
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(cookie.starts_with(&format!("contestant-id={id}")));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("SameSite=Lax"));
    }

    #[tokio::test]
    async fn quiz_and_group_are_case_insensitive() {
        let app = TestApp::spawn().await;

        let lower = app.register("xmas", "office", "Alice").await;
        let res = app
            .post(&routes::contestants("XMAS", "Office"), &json!({"name": "Alice"}))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["contestant_id"], lower);
        assert_eq!(app.score_count().await, 1);
    }

    #[tokio::test]
    async fn names_are_case_sensitive() {
        let app = TestApp::spawn().await;

        let a = app.register("xmas", "office", "alice").await;
        let b = app.register("xmas", "office", "Alice").await;

        assert_ne!(a, b);
        assert_eq!(app.score_count().await, 2);
    }

    #[tokio::test]
    async fn hyphens_cannot_shift_between_fields() {
        let app = TestApp::spawn().await;

        let first = app
            .post(&routes::contestants("xmas", "team"), &json!({"name": "Al-xmas"}))
            .await;
        let second = app
            .post(&routes::contestants("xmas", "xmas-team"), &json!({"name": "Al"}))
            .await;

        assert_eq!(first.status, 201, "{}", first.text);
        assert_eq!(second.status, 201, "{}", second.text);
        assert_ne!(first.body["contestant_id"], second.body["contestant_id"]);
        assert_eq!(app.score_count().await, 2);
    }

    #[tokio::test]
    async fn same_name_in_other_group_is_a_different_contestant() {
        let app = TestApp::spawn().await;

        let a = app.register("xmas", "office", "Alice").await;
        let b = app.register("xmas", "family", "Alice").await;

        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn unknown_quiz_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .post(&routes::contestants("easter", "office"), &json!({"name": "Alice"}))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "NOT_FOUND");
        assert_eq!(app.score_count().await, 0);
    }
}

mod idempotence {
    use super::*;

    #[tokio::test]
    async fn registering_twice_before_answering_resumes() {
        let app = TestApp::spawn().await;

        let first = app
            .post(&routes::contestants("xmas", "office"), &json!({"name": "Alice"}))
            .await;
        let second = app
            .post(&routes::contestants("xmas", "office"), &json!({"name": "Alice"}))
            .await;

        assert_eq!(first.status, 201);
        assert_eq!(second.status, 200);
        assert_eq!(second.body["resumed"], true);
        assert_eq!(first.body["contestant_id"], second.body["contestant_id"]);
        assert_eq!(app.score_count().await, 1);
    }

    #[tokio::test]
    async fn starting_without_answering_still_resumes() {
        let app = TestApp::spawn().await;

        let id = app.register("xmas", "office", "Alice").await;
        assert_eq!(app.next(&id, None).await.status, 200);

        let again = app.register("xmas", "office", "Alice").await;
        assert_eq!(again, id);
    }

    #[tokio::test]
    async fn concurrent_registrations_create_one_record() {
        let app = TestApp::spawn().await;
        let path = routes::contestants("xmas", "office");
        let body = json!({"name": "Alice"});

        let (a, b, c) = tokio::join!(
            app.post(&path, &body),
            app.post(&path, &body),
            app.post(&path, &body),
        );

        for res in [&a, &b, &c] {
            assert!(res.status == 201 || res.status == 200, "{}", res.text);
        }
        assert_eq!(a.body["contestant_id"], b.body["contestant_id"]);
        assert_eq!(b.body["contestant_id"], c.body["contestant_id"]);
        assert_eq!(app.score_count().await, 1);
    }
}

mod exclusivity {
    use super::*;

    #[tokio::test]
    async fn cannot_register_again_after_answering() {
        let app = TestApp::spawn().await;

        let id = app.register("xmas", "office", "Alice").await;
        app.next(&id, None).await;
        let graded = app.answer(&id, 1, XMAS_CORRECT[0]).await;
        assert_eq!(graded.status, 200, "{}", graded.text);

        let res = app
            .post(&routes::contestants("xmas", "office"), &json!({"name": "Alice"}))
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.code(), "ALREADY_REGISTERED");
        assert_eq!(app.score_count().await, 1);
    }
}

mod request_validation {
    use super::*;

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post(&routes::contestants("xmas", "office"), &json!({"name": "   "}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn overlong_name_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                &routes::contestants("xmas", "office"),
                &json!({"name": "x".repeat(65)}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_name_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post(&routes::contestants("xmas", "office"), &json!({}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }
}
