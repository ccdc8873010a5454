use crate::fixtures::TestApp;
use crate::fixtures::test_app::noop_backends;

async fn app_with_tracks() -> TestApp {
    let (diarizer, asr) = noop_backends();
    let app = TestApp::spawn(diarizer, asr).await;
    app.write_track("talk", 0, &[(1000, 2000, "zero")]);
    app.write_track("talk", 1, &[(3000, 4000, "one")]);
    app.write_track("talk", 2, &[(5000, 6000, "two")]);
    app
}

#[tokio::test]
async fn precise_edit_updates_only_target_track() {
    let app = app_with_tracks().await;
    let before0 = std::fs::read(app.workdir("talk").join("0.vtt")).unwrap();
    let before2 = std::fs::read(app.workdir("talk").join("2.vtt")).unwrap();

    let resp = app
        .client
        .post(app.url("/api/transcript/talk/edits"))
        .json(&serde_json::json!({
            "changes": [{"vttFile": "1.vtt", "captionIdx": 0, "text": "Edited"}]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["applied"], 1);
    assert!(body["failed"].as_array().unwrap().is_empty());

    assert!(app.read_file("talk/1.vtt").contains("Edited"));
    assert_eq!(std::fs::read(app.workdir("talk").join("0.vtt")).unwrap(), before0);
    assert_eq!(std::fs::read(app.workdir("talk").join("2.vtt")).unwrap(), before2);
}

#[tokio::test]
async fn precise_edit_accepts_stringified_index() {
    let app = app_with_tracks().await;

    let resp = app
        .client
        .post(app.url("/api/transcript/talk/edits"))
        .json(&serde_json::json!({
            "changes": [{"vttFile": "0.vtt", "captionIdx": "0", "text": "Z"}]
        }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["applied"], 1);
    assert!(app.read_file("talk/0.vtt").contains("Z"));
}

#[tokio::test]
async fn tolerance_edit_matches_nearest_caption() {
    let app = app_with_tracks().await;

    // Timecode string and bare-seconds forms both resolve.
    let resp = app
        .client
        .post(app.url("/api/transcript/talk/edits"))
        .json(&serde_json::json!({
            "changes": [
                {"start": "00:00:03.100", "end": "00:00:03.900", "text": "O"},
                {"start": 1.1, "end": 1.8, "text": "Z"}
            ]
        }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["applied"], 2);

    assert!(app.read_file("talk/0.vtt").contains("Z"));
    assert!(app.read_file("talk/1.vtt").contains("O"));
    assert!(app.read_file("talk/2.vtt").contains("two"));
}

#[tokio::test]
async fn tolerance_exceeded_reports_failure_and_mutates_nothing() {
    let app = app_with_tracks().await;
    let before: Vec<Vec<u8>> = (0..3)
        .map(|i| std::fs::read(app.workdir("talk").join(format!("{i}.vtt"))).unwrap())
        .collect();

    let resp = app
        .client
        .post(app.url("/api/transcript/talk/edits"))
        .json(&serde_json::json!({
            "changes": [{"start": 10.0, "end": 10.5, "text": "X"}]
        }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["applied"], 0);
    assert_eq!(body["failed"].as_array().unwrap().len(), 1);

    for (i, bytes) in before.iter().enumerate() {
        assert_eq!(
            &std::fs::read(app.workdir("talk").join(format!("{i}.vtt"))).unwrap(),
            bytes
        );
    }
}

#[tokio::test]
async fn mixed_batch_applies_partially() {
    let app = app_with_tracks().await;

    let resp = app
        .client
        .post(app.url("/api/transcript/talk/edits"))
        .json(&serde_json::json!({
            "changes": [
                {"vttFile": "0.vtt", "captionIdx": 0, "text": "ok"},
                {"vttFile": "0.vtt", "captionIdx": 7, "text": "out of range"},
                {"vttFile": "9.vtt", "captionIdx": 0, "text": "missing track"}
            ]
        }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["applied"], 1);

    let failed = body["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 2);
    assert_eq!(failed[0]["index"], 1);
    assert!(failed[0]["reason"].as_str().unwrap().contains("out of range"));
    assert_eq!(failed[1]["index"], 2);
}

#[tokio::test]
async fn edits_for_missing_transcript_return_404() {
    let (diarizer, asr) = noop_backends();
    let app = TestApp::spawn(diarizer, asr).await;

    let resp = app
        .client
        .post(app.url("/api/transcript/ghost/edits"))
        .json(&serde_json::json!({
            "changes": [{"start": 1.0, "end": 2.0, "text": "X"}]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn empty_batch_is_rejected() {
    let app = app_with_tracks().await;

    let resp = app
        .client
        .post(app.url("/api/transcript/talk/edits"))
        .json(&serde_json::json!({"changes": []}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}
