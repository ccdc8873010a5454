use std::sync::Arc;

use crate::fixtures::{RefusingAsr, RefusingDiarizer, ScriptedAsr, ScriptedDiarizer, TestApp};

#[tokio::test]
async fn full_run_renders_speaker_labeled_transcript() {
    let diarizer = Arc::new(ScriptedDiarizer::new(vec![
        ("SPEAKER_00", 2000, 4000),
        ("SPEAKER_01", 4100, 6000),
    ]));
    let asr = Arc::new(ScriptedAsr::new(vec![
        (0, vec![(0, 1500, "Hello from speaker one.")]),
        (1, vec![(0, 1700, "And hello from speaker two.")]),
    ]));
    let app = TestApp::spawn(diarizer, asr).await;

    let job = app
        .upload("meeting.wav", TestApp::wav_bytes(5000), &["Alice", "Bob"])
        .await;
    assert_eq!(job["status"], "starting");
    let job = app.wait_for_job(job["id"].as_str().unwrap()).await;

    assert_eq!(job["status"], "completed");
    assert_eq!(job["progress"], 100);
    assert_eq!(job["result"], "/files/meeting.html");

    // Durable cache artifacts stay
    assert!(app.exists("meeting/meeting-diarization.txt"));
    assert!(app.exists("meeting/0.vtt"));
    assert!(app.exists("meeting/1.vtt"));

    // Intermediates are gone
    assert!(!app.exists("meeting/meeting.cache.wav"));
    assert!(!app.exists("meeting/meeting-spaced.wav"));
    assert!(!app.exists("meeting/0.wav"));
    assert!(!app.exists("meeting/1.wav"));

    // Rendered transcript carries names, text and precise edit identifiers
    let html = app.read_file("meeting.html");
    assert!(html.contains("Alice"));
    assert!(html.contains("Bob"));
    assert!(html.contains("Hello from speaker one."));
    assert!(html.contains("data-vtt-file=\"0.vtt\""));
    assert!(html.contains("data-caption-idx=\"0\""));
    // Segment 1 starts at 4100 on the spaced timeline; with the 2000ms
    // spacer its first caption lands at 2100 absolute.
    assert!(html.contains("#00:00:02.100"));

    // And it is served
    let resp = app
        .client
        .get(app.url("/files/meeting.html"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn reusable_cache_skips_collaborators_entirely() {
    // Backends fail loudly if reached: completion proves the skip.
    let app = TestApp::spawn(Arc::new(RefusingDiarizer), Arc::new(RefusingAsr)).await;

    std::fs::write(app.dir.join("meeting.wav"), TestApp::wav_bytes(3000)).unwrap();
    app.write_artifact("meeting", &[("SPEAKER_00", 2000, 4000)]);
    app.write_track("meeting", 0, &[(0, 1500, "Cached caption text.")]);

    let resp = app
        .client
        .post(app.url("/api/rerun"))
        .json(&serde_json::json!({"filename": "meeting.wav"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let job: serde_json::Value = resp.json().await.unwrap();
    let job = app.wait_for_job(job["id"].as_str().unwrap()).await;

    assert_eq!(job["status"], "completed");
    let html = app.read_file("meeting.html");
    assert!(html.contains("Cached caption text."));
}

#[tokio::test]
async fn artifact_without_tracks_forces_full_run_with_cached_diarization() {
    // A lone diarization artifact is not reusable; the full pipeline runs
    // but still skips re-diarization (the refusing diarizer stays silent).
    let asr = Arc::new(ScriptedAsr::new(vec![(0, vec![(0, 900, "Fresh caption.")])]));
    let app = TestApp::spawn(Arc::new(RefusingDiarizer), asr).await;

    app.write_artifact("meeting", &[("SPEAKER_00", 2000, 4000)]);

    let job = app
        .upload("meeting.wav", TestApp::wav_bytes(5000), &[])
        .await;
    let job = app.wait_for_job(job["id"].as_str().unwrap()).await;

    assert_eq!(job["status"], "completed");
    assert!(app.exists("meeting/0.vtt"));
    assert!(app.read_file("meeting.html").contains("Fresh caption."));
}

#[tokio::test]
async fn rerun_rejects_non_media_files() {
    let app = TestApp::spawn(Arc::new(RefusingDiarizer), Arc::new(RefusingAsr)).await;
    std::fs::write(app.dir.join("notes.txt"), b"not media").unwrap();

    let resp = app
        .client
        .post(app.url("/api/rerun"))
        .json(&serde_json::json!({"filename": "notes.txt"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}
