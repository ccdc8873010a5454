use std::sync::Arc;

use crate::fixtures::test_app::noop_backends;
use crate::fixtures::{FailingAsr, FailingDiarizer, RefusingAsr, ScriptedDiarizer, TestApp};

#[tokio::test]
async fn diarizer_failure_reaches_error_with_frozen_progress() {
    let app = TestApp::spawn(Arc::new(FailingDiarizer), Arc::new(RefusingAsr)).await;

    let job = app
        .upload("meeting.wav", TestApp::wav_bytes(3000), &[])
        .await;
    let job = app.wait_for_job(job["id"].as_str().unwrap()).await;

    assert_eq!(job["status"], "error");
    // Frozen at the last update before the diarization call
    assert_eq!(job["progress"], 20);
    assert!(job["message"].as_str().unwrap().contains("diarization"));
    // Raw collaborator error preserved for diagnostics
    assert!(
        job["error"]
            .as_str()
            .unwrap()
            .contains("pyannote model not found")
    );
    assert!(job["result"].is_null());
}

#[tokio::test]
async fn asr_failure_reaches_error_with_raw_output() {
    let diarizer = Arc::new(ScriptedDiarizer::new(vec![("SPEAKER_00", 2000, 4000)]));
    let app = TestApp::spawn(diarizer, Arc::new(FailingAsr)).await;

    let job = app
        .upload("meeting.wav", TestApp::wav_bytes(5000), &[])
        .await;
    let job = app.wait_for_job(job["id"].as_str().unwrap()).await;

    assert_eq!(job["status"], "error");
    assert_eq!(job["progress"], 30);
    assert!(job["message"].as_str().unwrap().contains("transcription"));
    assert!(
        job["error"]
            .as_str()
            .unwrap()
            .contains("whisper ran out of memory")
    );
}

#[tokio::test]
async fn missing_source_fails_before_touching_artifacts() {
    let (diarizer, asr) = noop_backends();
    let app = TestApp::spawn(diarizer, asr).await;

    let resp = app
        .client
        .post(app.url("/api/rerun"))
        .json(&serde_json::json!({"filename": "ghost.wav"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    assert!(!app.exists("ghost"));
}

#[tokio::test]
async fn unknown_job_returns_404() {
    let (diarizer, asr) = noop_backends();
    let app = TestApp::spawn(diarizer, asr).await;

    let resp = app
        .client
        .get(app.url("/api/job/no-such-job"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}
