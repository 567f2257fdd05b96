// Headless run of the mix engine: an offline audio graph, a listener walking
// a circle through the scene (with a stretch steered by GPS fixes), and
// periodic logging of what it would hear.

use anyhow::Context;
use glam::Vec2;
use mix_core::constants::{BASELINE_TICK_HZ, RESYNC_TICK_HZ};
use mix_core::offline::{OfflineHost, OfflineLoader};
use mix_core::{
    load_media, AudioGraphHost, GeoBounds, MixEngine, Options, SourceSpec, TransportState,
    WaypointPath,
};

const CANVAS: Vec2 = Vec2::new(1280.0, 720.0);
const CONTENT: Vec2 = Vec2::new(1600.0, 900.0);
const RUN_SECS: f32 = 24.0;
const PAUSE_AT_SECS: f32 = 12.0;
const RESUME_AT_SECS: f32 = 15.0;
const GPS_FROM_SECS: f32 = 18.0;
const GPS_UNTIL_SECS: f32 = 21.0;

/// Area the content image covers on the ground.
const PARK: GeoBounds = GeoBounds {
    north: 51.5080,
    south: 51.5040,
    east: -0.1250,
    west: -0.1330,
};

/// Simulated fix walking diagonally across the park, south-west to north-east.
fn gps_fix(t: f32) -> (f64, f64) {
    let frac = ((t - GPS_FROM_SECS) / (GPS_UNTIL_SECS - GPS_FROM_SECS)).clamp(0.0, 1.0) as f64;
    let along = 0.2 + 0.6 * frac;
    let lat = PARK.south + (PARK.north - PARK.south) * along;
    let lon = PARK.west + (PARK.east - PARK.west) * along;
    (lat, lon)
}

fn scene() -> Vec<SourceSpec> {
    let mut bells = SourceSpec::new("bells", "audio/bells.ogg", Vec2::new(0.2, 0.3));
    bells.volume = 0.9;
    let mut drone = SourceSpec::new("drone", "audio/drone.ogg", Vec2::new(0.5, 0.5));
    drone.volume = 0.6;
    let voices = SourceSpec::new("voices", "audio/voices.ogg", Vec2::new(0.8, 0.35));
    let mut rain = SourceSpec::new("rain", "audio/rain.ogg", Vec2::new(0.65, 0.8));
    rain.pan = -0.3;
    let missing = SourceSpec::new("missing", "audio/missing.ogg", Vec2::new(0.1, 0.9));
    vec![bells, drone, voices, rain, missing]
}

fn report(engine: &MixEngine<OfflineHost>, t: f32) {
    let listener = engine.effective_listener();
    let gains: Vec<String> = engine
        .views()
        .iter()
        .map(|v| {
            format!(
                "{}={:.2}{}",
                v.label,
                v.current_gain,
                if v.is_active { "*" } else { "" }
            )
        })
        .collect();
    log::info!(
        "t={:5.2}s {:?} listener=({:.0},{:.0}) {}",
        t,
        engine.transport(),
        listener.x,
        listener.y,
        gains.join(" ")
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut host = OfflineHost::new();
    let mut engine =
        MixEngine::new(&mut host, Options::default(), 0x5eed).context("building mix engine")?;
    engine.set_content_geometry(CANVAS, CONTENT);

    let loader = OfflineLoader::new(host.clock(), 60.0)
        .with_duration("audio/bells.ogg", 45.0)
        .with_missing("audio/missing.ogg");
    for spec in scene() {
        match pollster::block_on(load_media(&loader, &spec)) {
            Ok(loaded) => {
                engine.add_source(&mut host, &spec, loaded)?;
            }
            Err(e) => log::warn!("[native] {e}"),
        }
    }

    let mut path = WaypointPath::circle(Vec2::new(0.5, 0.5), 0.3, 32, 0.08);
    let dt = 1.0 / BASELINE_TICK_HZ;
    let resync_every = 1.0 / RESYNC_TICK_HZ;
    let mut resync_acc = 0.0;
    let mut report_acc = 0.0;
    let mut corrected = 0;
    let mut resumed = false;
    let mut t = 0.0;

    engine.play(&mut host);
    while t < RUN_SECS {
        host.advance(dt as f64);
        t += dt;

        let rel = if (GPS_FROM_SECS..GPS_UNTIL_SECS).contains(&t) {
            let (lat, lon) = gps_fix(t);
            PARK.to_content_relative(lat, lon)
        } else {
            path.advance(dt)
        };
        if let Some(rel) = rel {
            engine.set_listener_relative(rel);
        }
        if t >= PAUSE_AT_SECS && engine.transport() == TransportState::Playing && !resumed {
            engine.pause(&mut host);
        }
        if t >= RESUME_AT_SECS && !resumed {
            resumed = true;
            engine.play(&mut host);
        }

        engine.tick(&mut host, dt);

        resync_acc += dt;
        if resync_acc >= resync_every {
            resync_acc -= resync_every;
            corrected += engine.resync();
        }
        report_acc += dt;
        if report_acc >= 1.0 {
            report_acc -= 1.0;
            report(&engine, t);
        }
    }

    engine.stop(&mut host);
    host.advance(engine.options().mix.fade_duration as f64);
    engine.tick(&mut host, dt);
    log::info!(
        "[native] finished at {:.2}s audio time, {:?}, {} resync corrections",
        host.current_time(),
        engine.transport(),
        corrected
    );
    Ok(())
}
