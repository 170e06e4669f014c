use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;

use fittrack_core::metrics::{
    pipeline_runs_total, track_cache_hit_total, track_cache_miss_total, track_loads_total, Metrics,
};
use fittrack_core::models::{ElapsedDuration, Gender, Pace, UserProfile};
use fittrack_core::report::write_activity_report;
use fittrack_core::route::{render_html, ArtifactSink, RouteArtifact};
use fittrack_core::{
    ActivityRequest, CalorieStrategy, FileTrackSource, TrackError, TrackLoader, TrackingConfig,
    TrackingPipeline,
};
use tempdir::TempDir;

// 3 samples, 10 s apart, +0.01° latitude each
fn write_log(dir: &Path) -> PathBuf {
    let path = dir.join("coord.csv");
    let body = "\
time,lat,lon
2024-03-01T07:00:00.000Z,{\"lat\":13.7500,lon:100.5000}
2024-03-01T07:00:10.000Z,{\"lat\":13.7600,lon:100.5000}
2024-03-01T07:00:20.000Z,{\"lat\":13.7700,lon:100.5000}
";
    std::fs::write(&path, body).expect("write log");
    path
}

fn config(dir: &TempDir) -> TrackingConfig {
    TrackingConfig {
        log_path: write_log(dir.path()),
        artifact_dir: dir.path().join("templates"),
        ..TrackingConfig::default()
    }
}

fn request(session: &str, secs: u32) -> ActivityRequest {
    ActivityRequest {
        session_id: session.to_string(),
        duration: ElapsedDuration::new(0, 0, secs),
        profile: UserProfile::new(Gender::Male, 30, 70.0, 175.0),
    }
}

#[test]
fn end_to_end_three_samples() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = TempDir::new("fittrack_e2e").unwrap();
    let pipeline = TrackingPipeline::new(config(&dir)).unwrap();

    let out = pipeline.run(&request("s1", 20)).expect("pipeline run");
    let r = &out.result;

    assert!(r.distance_km > 0.0);
    assert!((r.distance_km - 2.21).abs() < 0.011, "distance {}", r.distance_km);
    // 2.21 km in 20 s is far above 7 mph → fast-run tier → Brisk
    assert_eq!(r.pace, Pace::Brisk);
    assert!(r.calories_per_hour >= 0.0);
    assert!(r.steps > 0);

    assert_eq!(out.time_limit, "0:00:20");
    assert_eq!(out.artifact.path.len(), 3);
    assert!(out.artifact_path.exists());
    assert_eq!(pipeline_runs_total(pipeline.metrics()).get(), 1);
}

#[test]
fn time_limit_spans_the_configured_log() {
    let dir = TempDir::new("fittrack_limit").unwrap();
    let pipeline = TrackingPipeline::new(config(&dir)).unwrap();

    assert_eq!(pipeline.time_limit().unwrap(), chrono::Duration::seconds(20));
    assert_eq!(track_loads_total(pipeline.metrics()).get(), 1);
}

#[test]
fn report_for_a_run_names_the_map() {
    let dir = TempDir::new("fittrack_report").unwrap();
    let pipeline = TrackingPipeline::new(config(&dir)).unwrap();
    let out = pipeline.run(&request("reporter", 20)).unwrap();

    let mut buf = Vec::new();
    write_activity_report(&mut buf, &out).unwrap();
    let text = String::from_utf8(buf).unwrap();

    assert!(text.starts_with("--- Activity Report ---\n"));
    assert!(text.contains(&format!("Steps: {}\n", out.result.steps)));
    assert!(text.contains("Time limit: 0:00:20\n"));
    assert!(text.ends_with(&format!("Map: {}\n", out.artifact_path.display())));
}

#[test]
fn zero_duration_gives_zero_distance_and_steps() {
    let dir = TempDir::new("fittrack_zero").unwrap();
    let pipeline = TrackingPipeline::new(config(&dir)).unwrap();

    let out = pipeline.run(&request("s1", 0)).unwrap();
    assert_eq!(out.result.distance_km, 0.0);
    assert_eq!(out.result.steps, 0);
    assert_eq!(out.result.calories_per_hour, 0.0);
    assert_eq!(out.result.pace, Pace::Slow);
    assert_eq!(out.artifact.path.len(), 1);
}

#[test]
fn calorie_strategy_is_configurable() {
    let dir = TempDir::new("fittrack_strategy").unwrap();
    let b = TrackingPipeline::new(config(&dir)).unwrap();
    let a = TrackingPipeline::new(TrackingConfig {
        calories: CalorieStrategy::MetBmrScaled,
        ..config(&dir)
    })
    .unwrap();

    let ra = a.run(&request("a", 20)).unwrap().result;
    let rb = b.run(&request("b", 20)).unwrap().result;
    assert_eq!(ra.distance_km, rb.distance_km);
    assert_eq!(ra.steps, rb.steps);
    assert!(ra.calories_per_hour != rb.calories_per_hour);
}

#[test]
fn invalid_gender_is_surfaced() {
    let dir = TempDir::new("fittrack_gender").unwrap();
    let pipeline = TrackingPipeline::new(config(&dir)).unwrap();
    let mut req = request("s1", 20);
    req.profile.gender = "Unknown".to_string();

    let err = pipeline.run(&req).unwrap_err();
    assert!(matches!(err, TrackError::InvalidArgument(_)), "got {err:?}");
}

#[test]
fn empty_log_is_an_error() {
    let dir = TempDir::new("fittrack_empty").unwrap();
    let log_path = dir.path().join("empty.csv");
    std::fs::write(&log_path, "time,lat,lon\n").unwrap();
    let pipeline = TrackingPipeline::new(TrackingConfig {
        log_path,
        artifact_dir: dir.path().to_path_buf(),
        ..TrackingConfig::default()
    })
    .unwrap();

    assert!(matches!(pipeline.run(&request("s1", 20)), Err(TrackError::EmptyLog(_))));
}

#[test]
fn naive_mode_rereads_log_every_run() {
    let dir = TempDir::new("fittrack_naive").unwrap();
    let pipeline = TrackingPipeline::new(config(&dir)).unwrap();
    pipeline.run(&request("s1", 20)).unwrap();
    pipeline.run(&request("s1", 10)).unwrap();

    assert_eq!(track_loads_total(pipeline.metrics()).get(), 2);
    assert_eq!(track_cache_hit_total(pipeline.metrics()).get(), 0);
}

#[test]
fn cached_mode_loads_once() {
    let dir = TempDir::new("fittrack_cached").unwrap();
    let pipeline = TrackingPipeline::new(TrackingConfig { cache_log: true, ..config(&dir) }).unwrap();

    let first = pipeline.run(&request("s1", 20)).unwrap();
    let second = pipeline.run(&request("s1", 20)).unwrap();
    assert_eq!(first.result, second.result);

    let m = pipeline.metrics();
    assert_eq!(track_loads_total(m).get(), 1);
    assert_eq!(track_cache_miss_total(m).get(), 1);
    assert_eq!(track_cache_hit_total(m).get(), 1);
    assert!(m.render().contains("fittrack_track_cache_hit_total 1"));
}

#[test]
fn concurrent_sessions_keep_their_own_artifacts() {
    let dir = TempDir::new("fittrack_concurrent").unwrap();
    let pipeline = Arc::new(TrackingPipeline::new(config(&dir)).unwrap());

    let handles: Vec<_> = [("alice", 10u32), ("bob", 20u32)]
        .into_iter()
        .map(|(session, secs)| {
            let p = Arc::clone(&pipeline);
            thread::spawn(move || {
                let mut outs = Vec::new();
                for _ in 0..10 {
                    outs.push(p.run(&request(session, secs)).expect("run"));
                }
                outs
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let alice = results[0].last().unwrap();
    let bob = results[1].last().unwrap();

    assert_ne!(alice.artifact_path, bob.artifact_path);
    assert_eq!(alice.artifact.path.len(), 2);
    assert_eq!(bob.artifact.path.len(), 3);
    assert_eq!(
        std::fs::read_to_string(&alice.artifact_path).unwrap(),
        render_html(&alice.artifact).unwrap()
    );
    assert_eq!(
        std::fs::read_to_string(&bob.artifact_path).unwrap(),
        render_html(&bob.artifact).unwrap()
    );
}

struct RecordingSink {
    seen: Mutex<Vec<(String, RouteArtifact)>>,
}

impl ArtifactSink for RecordingSink {
    fn publish(&self, session_id: &str, artifact: &RouteArtifact) -> fittrack_core::Result<PathBuf> {
        self.seen
            .lock()
            .unwrap()
            .push((session_id.to_string(), artifact.clone()));
        Ok(PathBuf::from(format!("memory://{session_id}")))
    }
}

#[test]
fn custom_source_and_sink_can_be_injected() {
    let dir = TempDir::new("fittrack_inject").unwrap();
    let cfg = config(&dir);
    let metrics = Arc::new(Metrics::new().unwrap());
    let source = Box::new(FileTrackSource::new(TrackLoader::default(), Arc::clone(&metrics)));
    let sink = Arc::new(RecordingSink { seen: Mutex::new(Vec::new()) });

    struct Shared(Arc<RecordingSink>);
    impl ArtifactSink for Shared {
        fn publish(&self, s: &str, a: &RouteArtifact) -> fittrack_core::Result<PathBuf> {
            self.0.publish(s, a)
        }
    }

    let pipeline = TrackingPipeline::with_parts(cfg, source, Box::new(Shared(Arc::clone(&sink))), metrics);
    let out = pipeline.run(&request("carol", 20)).unwrap();

    assert_eq!(out.artifact_path, PathBuf::from("memory://carol"));
    let seen = sink.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "carol");
    assert_eq!(seen[0].1, out.artifact);
}
