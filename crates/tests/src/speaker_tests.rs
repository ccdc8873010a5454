use crate::fixtures::TestApp;
use crate::fixtures::test_app::noop_backends;

#[tokio::test]
async fn update_speakers_rerenders_cached_transcript() {
    let (diarizer, asr) = noop_backends();
    let app = TestApp::spawn(diarizer, asr).await;

    std::fs::write(app.dir.join("talk.mp4"), b"stub media").unwrap();
    app.write_artifact("talk", &[("SPEAKER_00", 2000, 4000)]);
    app.write_track("talk", 0, &[(0, 1500, "Hello.")]);

    let resp = app
        .client
        .post(app.url("/api/transcript/talk/speakers"))
        .json(&serde_json::json!({"speakers": {"Speaker 1": "Alice"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);

    assert!(app.exists("talk/talk-speakers.json"));
    let html = app.read_file("talk.html");
    assert!(html.contains("Alice"));
    assert!(html.contains("talk.mp4"));
}

#[tokio::test]
async fn update_speakers_requires_mapping() {
    let (diarizer, asr) = noop_backends();
    let app = TestApp::spawn(diarizer, asr).await;
    app.write_track("talk", 0, &[(0, 1500, "Hello.")]);

    let resp = app
        .client
        .post(app.url("/api/transcript/talk/speakers"))
        .json(&serde_json::json!({"speakers": {}}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn health_and_file_listing() {
    let (diarizer, asr) = noop_backends();
    let app = TestApp::spawn(diarizer, asr).await;
    std::fs::write(app.dir.join("a.wav"), b"x").unwrap();

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let health: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(health["status"], "ok");

    let files: serde_json::Value = app
        .client
        .get(app.url("/api/file"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = files
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"a.wav"));
}
