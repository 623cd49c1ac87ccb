//! session — a simulated play session driving the session_log framework.
//!
//! A ball bounces inside a box for a few hundred frames.  Every frame logs its
//! position to `Gameplay`; bounces are logged to `Events` as whole rows; a
//! streaming `Telemetry` store is exported on a background thread at the end.
//!
//! ```text
//! cargo run -p session -- [config.json] [output_dir]
//! RUST_LOG=debug cargo run -p session
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sl_core::{HashedSessionIds, HostClock, HostLifecycle, LogValue, SystemClock, Vec3};
use sl_manager::{LoggingManager, ManagerConfig};
use sl_output::{ExportConfig, TableExporter};
use sl_store::{LogStoreBuilder, MetaColumns};

// ── Constants ─────────────────────────────────────────────────────────────────

const FRAMES:     u32 = 600;
const DT:         f32 = 1.0 / 60.0;
const BOX_HALF:   f32 = 5.0;
const GRAVITY:    f32 = -9.81;
const DEVICE_ID:  &str = "demo-device";

// ── Ball ──────────────────────────────────────────────────────────────────────

struct Ball {
    pos: Vec3,
    vel: Vec3,
}

impl Ball {
    /// Advance one frame; returns the axis it bounced on, if any.
    fn step(&mut self) -> Option<&'static str> {
        self.vel.y += GRAVITY * DT;
        self.pos.x += self.vel.x * DT;
        self.pos.y += self.vel.y * DT;
        self.pos.z += self.vel.z * DT;

        let mut hit = None;
        for (axis, p, v) in [
            ("x", &mut self.pos.x, &mut self.vel.x),
            ("y", &mut self.pos.y, &mut self.vel.y),
            ("z", &mut self.pos.z, &mut self.vel.z),
        ] {
            if p.abs() > BOX_HALF {
                *p = p.signum() * BOX_HALF;
                *v = -*v * 0.9;
                hit = Some(axis);
            }
        }
        hit
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let mut config = match args.next() {
        Some(path) => ManagerConfig::load(Path::new(&path))
            .with_context(|| format!("loading config from {path}"))?,
        None => ManagerConfig::default(),
    };
    let out_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("session_log_demo"));
    config.save_dir = out_dir.clone();
    config.device_id = DEVICE_ID.to_owned();

    let clock = Arc::new(SystemClock::new());
    let manager = LoggingManager::new(
        config,
        clock.clone() as Arc<dyn HostClock>,
        Arc::new(HashedSessionIds::new(DEVICE_ID)),
    )?;
    manager.set_email("demo@example.com")?;

    let mut telemetry = LogStoreBuilder::new("Telemetry")
        .streaming(true)
        .meta_columns(MetaColumns::None)
        .clock(clock.clone() as Arc<dyn HostClock>)
        .build();
    telemetry.add_columns(["frame", "speed", "frame_us"])?;

    manager.on_start();
    info!(session_id = %manager.session_id()?, frames = FRAMES, "session started");

    let mut ball = Ball { pos: Vec3::new(0.0, 4.0, 0.0), vel: Vec3::new(2.5, 0.0, -1.5) };
    let mut bounces = 0_u32;
    for frame in 0..FRAMES {
        let started = Instant::now();
        manager.on_frame();

        let bounced = ball.step();
        manager.log("Gameplay", "position", ball.pos)?;
        if let Some(axis) = bounced {
            bounces += 1;
            manager.log_row("Events", [
                ("event", LogValue::from("bounce")),
                ("axis", LogValue::from(axis)),
                ("count", LogValue::from(bounces)),
                ("position", LogValue::from(ball.pos)),
            ])?;
        }

        let speed = (ball.vel.x.powi(2) + ball.vel.y.powi(2) + ball.vel.z.powi(2)).sqrt();
        telemetry.add_field("frame", frame)?;
        telemetry.add_field("speed", speed)?;
        telemetry.add_field("frame_us", started.elapsed().as_micros() as u64)?;
        telemetry.terminate_row()?;
    }

    let export = ExportConfig::in_dir(&out_dir);
    let job = TableExporter::new(&export, telemetry.label()).spawn_write_all(&mut telemetry)?;

    for (label, result) in manager.save_all_logs()? {
        match result {
            Ok(Some(path)) => info!(label = %label, path = %path.display(), "saved"),
            Ok(None) => info!(label = %label, "csv saving disabled"),
            Err(e) => return Err(e).with_context(|| format!("saving {label}")),
        }
    }
    let path = job.wait()?;
    info!(path = %path.display(), rows = telemetry.nb_lines(), "telemetry saved");
    info!(bounces, "done");
    Ok(())
}
