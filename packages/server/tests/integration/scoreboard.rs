use chrono::{Duration, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, IntoActiveModel};

use crate::common::{TestApp, XMAS_CORRECT, routes};

/// Overwrite a contestant's timestamps so elapsed times are predictable.
async fn set_times(app: &TestApp, id: &str, elapsed_secs: Option<i64>) {
    let start = Utc.with_ymd_and_hms(2025, 12, 24, 19, 0, 0).unwrap();
    let mut row = app.score_row(id).await.into_active_model();
    row.started = Set(Some(start));
    row.finished = Set(elapsed_secs.map(|s| start + Duration::seconds(s)));
    row.update(&app.db).await.expect("Failed to update times");
}

fn names(body: &serde_json::Value) -> Vec<String> {
    body["scores"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect()
}

mod group_ranking {
    use super::*;

    #[tokio::test]
    async fn ranks_by_correct_answers_then_elapsed_time() {
        let app = TestApp::spawn().await;

        let a = app.register("xmas", "office", "A").await;
        let b = app.register("xmas", "office", "B").await;
        let c = app.register("xmas", "office", "C").await;
        app.play_xmas(&a, XMAS_CORRECT).await;
        app.play_xmas(&b, XMAS_CORRECT).await;
        app.play_xmas(&c, [XMAS_CORRECT[0], XMAS_CORRECT[1], 4]).await;
        set_times(&app, &a, Some(120)).await;
        set_times(&app, &b, Some(90)).await;
        set_times(&app, &c, Some(10)).await;

        let res = app.get(&routes::group_scoreboard("xmas", "office")).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(names(&res.body), vec!["B", "A", "C"]);
        let top = &res.body["scores"][0];
        assert_eq!(top["position"], 1);
        assert_eq!(top["correct_answers"], 3);
        assert_eq!(top["elapsed_seconds"], 90);
        assert_eq!(top["time_taken"], "00:01:30");
        assert_eq!(res.body["scores"][2]["correct_answers"], 2);
    }

    #[tokio::test]
    async fn unfinished_contestants_rank_after_finished_with_same_score() {
        let app = TestApp::spawn().await;

        let done = app.register("xmas", "office", "Done").await;
        let playing = app.register("xmas", "office", "Playing").await;
        app.play_xmas(&done, [XMAS_CORRECT[0], 4, 4]).await;
        app.next(&playing, None).await;
        app.answer(&playing, 1, XMAS_CORRECT[0]).await;

        let res = app.get(&routes::group_scoreboard("xmas", "office")).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(names(&res.body), vec!["Done", "Playing"]);
        let playing_row = &res.body["scores"][1];
        assert_eq!(playing_row["finished"], false);
        assert!(playing_row["elapsed_seconds"].is_null());
        assert!(playing_row["time_taken"].is_null());
    }

    #[tokio::test]
    async fn groups_are_ranked_independently() {
        let app = TestApp::spawn().await;

        app.register("xmas", "office", "Alice").await;
        app.register("xmas", "family", "Bob").await;

        let res = app.get(&routes::group_scoreboard("XMAS", "Office")).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["group"], "office");
        assert_eq!(names(&res.body), vec!["Alice"]);
    }

    #[tokio::test]
    async fn empty_group_has_no_scores() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::group_scoreboard("xmas", "nobody")).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["scores"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn unknown_quiz_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::group_scoreboard("easter", "office")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "NOT_FOUND");
    }
}

mod contestant_view {
    use super::*;

    #[tokio::test]
    async fn includes_own_row_and_quiz_details() {
        let app = TestApp::spawn().await;

        let alice = app.register("xmas", "office", "Alice").await;
        let bob = app.register("xmas", "office", "Bob").await;
        app.play_xmas(&alice, XMAS_CORRECT).await;
        app.play_xmas(&bob, [4, 4, 4]).await;

        let res = app.get(&routes::scoreboard(&bob)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["quiz_id"], "xmas");
        assert_eq!(res.body["quiz_title"], "Christmas Quiz");
        assert_eq!(res.body["group"], "office");
        assert_eq!(res.body["total_questions"], 3);
        assert_eq!(res.body["contestant"]["name"], "Bob");
        assert_eq!(res.body["contestant"]["position"], 2);
        assert_eq!(res.body["contestant"]["finished"], true);
        assert_eq!(names(&res.body), vec!["Alice", "Bob"]);
    }

    #[tokio::test]
    async fn unknown_contestant_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::scoreboard(&"b".repeat(64))).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn malformed_id_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::scoreboard("not-an-id")).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }
}

mod quiz_summary {
    use super::*;

    #[tokio::test]
    async fn counts_only_active_questions() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::quiz("XMAS")).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["quiz_id"], "xmas");
        assert_eq!(res.body["name"], "Christmas Quiz");
        assert_eq!(res.body["total_questions"], 3);
    }

    #[tokio::test]
    async fn unknown_quiz_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::quiz("easter")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = TestApp::spawn().await;

        let res = app.get("/api-docs/openapi.json").await;

        assert_eq!(res.status, 200);
        assert!(res.body["paths"]["/api/v1/play/answer"].is_object());
    }
}
