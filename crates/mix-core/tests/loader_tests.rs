// Media load pipeline against the offline loader.

use glam::Vec2;
use mix_core::offline::{OfflineHost, OfflineLoader};
use mix_core::{load_media, LoadStage, MediaHandle, SourceSpec};
use tokio_test::block_on;

fn spec(url: &str) -> SourceSpec {
    SourceSpec::new("bells", url, Vec2::splat(0.5))
}

#[test]
fn ready_media_reports_duration() {
    let host = OfflineHost::new();
    let loader = OfflineLoader::new(host.clock(), 30.0).with_duration("bells.ogg", 12.5);
    let loaded = block_on(load_media(&loader, &spec("bells.ogg"))).unwrap();
    assert_eq!(loaded.duration, 12.5);
    assert_eq!(loaded.media.duration(), 12.5);

    let other = block_on(load_media(&loader, &spec("drone.ogg"))).unwrap();
    assert_eq!(other.duration, 30.0);
}

#[test]
fn missing_media_fails_at_open() {
    let host = OfflineHost::new();
    let loader = OfflineLoader::new(host.clock(), 30.0).with_missing("gone.ogg");
    let err = block_on(load_media(&loader, &spec("gone.ogg"))).err().unwrap();
    assert_eq!(err.stage, LoadStage::Open);
    assert_eq!(err.source_label, "bells");
    assert!(err.reason.contains("gone.ogg"));
}

#[test]
fn undecodable_media_fails_at_ready() {
    let host = OfflineHost::new();
    let loader = OfflineLoader::new(host.clock(), 30.0).with_duration("bad.ogg", f64::NAN);
    let err = block_on(load_media(&loader, &spec("bad.ogg"))).err().unwrap();
    assert_eq!(err.stage, LoadStage::Ready);
    assert!(err.to_string().contains("ready"));
}
