//! Command line front end for spotmark.
//!
//! Reads a JSON config naming the target images and a directory of captured
//! frames, replays the frames through a detection session, and prints overlay
//! updates as JSON lines.

use clap::Parser;
use serde::{Deserialize, Serialize};
use spotmark::io::load_gray_image;
use spotmark::{
    BoxError, DetectionLoop, DetectorConfig, ErrorSink, Frame, FrameSource, OverlaySink, Rect,
    Template,
};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str = r#"{
  "target_images": ["assets/target.png"],
  "frames_dir": "captures/session-01",
  "output_path": "events.jsonl",
  "confidence": 80,
  "box_width": 50,
  "box_height": 70,
  "disappear_delay": 2.0,
  "cycle_interval_ms": 50
}
"#;

#[derive(Parser, Debug)]
#[command(author, version, about = "Spotmark CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for the detection session.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ConfigFile {
    target_images: Vec<String>,
    frames_dir: String,
    output_path: Option<String>,
    confidence: u8,
    box_width: u32,
    box_height: u32,
    /// Seconds since the last sighting before a vanished region is dropped.
    disappear_delay: f64,
    cycle_interval_ms: Option<u64>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let cfg = DetectorConfig::default();
        Self {
            target_images: Vec::new(),
            frames_dir: String::new(),
            output_path: None,
            confidence: cfg.confidence_percent,
            box_width: cfg.overlay_width,
            box_height: cfg.overlay_height,
            disappear_delay: cfg.disappear_delay.as_secs_f64(),
            cycle_interval_ms: None,
        }
    }
}

impl ConfigFile {
    fn detector_config(&self) -> Result<DetectorConfig, BoxError> {
        if !self.disappear_delay.is_finite() || self.disappear_delay < 0.0 {
            return Err("disappear_delay must be a non-negative number of seconds".into());
        }
        Ok(DetectorConfig {
            confidence_percent: self.confidence,
            overlay_width: self.box_width,
            overlay_height: self.box_height,
            disappear_delay: Duration::from_secs_f64(self.disappear_delay),
            cycle_interval: self.cycle_interval_ms.map(Duration::from_millis),
            ..DetectorConfig::default()
        })
    }
}

/// Replays image files from a directory in file-name order.
struct DirFrameSource {
    paths: std::vec::IntoIter<PathBuf>,
}

impl DirFrameSource {
    fn new(dir: &Path) -> Result<Self, BoxError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let ext = path.extension().and_then(|ext| ext.to_str());
            if matches!(ext, Some("png") | Some("jpg") | Some("jpeg")) {
                paths.push(path);
            }
        }
        if paths.is_empty() {
            return Err(format!("no frame images found in {}", dir.display()).into());
        }
        paths.sort();
        Ok(Self {
            paths: paths.into_iter(),
        })
    }
}

impl FrameSource for DirFrameSource {
    fn capture(&mut self) -> Result<Option<Frame>, BoxError> {
        match self.paths.next() {
            Some(path) => {
                let img = load_gray_image(&path)?;
                Ok(Some(Frame::from_image(img, Instant::now())))
            }
            None => Ok(None),
        }
    }
}

#[derive(Debug, Serialize)]
struct RectRecord {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl From<&Rect> for RectRecord {
    fn from(rect: &Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

#[derive(Debug, Serialize)]
struct OverlayEvent {
    event: &'static str,
    rects: Vec<RectRecord>,
}

/// Writes one JSON line per overlay change.
struct JsonlOverlaySink {
    out: Box<dyn Write>,
}

impl JsonlOverlaySink {
    fn stdout() -> Self {
        Self {
            out: Box::new(io::stdout()),
        }
    }

    fn to_file(path: &str) -> io::Result<Self> {
        let file = fs::File::create(path)?;
        Ok(Self {
            out: Box::new(BufWriter::new(file)),
        })
    }

    fn write_event(&mut self, event: &OverlayEvent) {
        if let Ok(line) = serde_json::to_string(event) {
            if writeln!(self.out, "{line}")
                .and_then(|()| self.out.flush())
                .is_err()
            {
                eprintln!("warning: failed to write overlay event");
            }
        }
    }
}

impl OverlaySink for JsonlOverlaySink {
    fn update_rects(&mut self, rects: &[Rect]) {
        self.write_event(&OverlayEvent {
            event: "update",
            rects: rects.iter().map(RectRecord::from).collect(),
        });
    }

    fn clear(&mut self) {
        self.write_event(&OverlayEvent {
            event: "clear",
            rects: Vec::new(),
        });
    }
}

struct StderrErrorSink;

impl ErrorSink for StderrErrorSink {
    fn report(&mut self, message: &str) {
        eprintln!("error: {message}");
    }
}

fn load_templates(paths: &[String]) -> Result<Vec<Template>, BoxError> {
    let mut templates = Vec::with_capacity(paths.len());
    for (id, path) in paths.iter().enumerate() {
        let img = load_gray_image(path)?;
        templates.push(Template::from_image(id, img));
    }
    Ok(templates)
}

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("spotmark=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let file: ConfigFile = serde_json::from_str(&config_text)?;
    if file.frames_dir.is_empty() {
        return Err("frames_dir must be set in the config".into());
    }

    let config = file.detector_config()?;
    let templates = load_templates(&file.target_images)?;
    tracing::info!(templates = templates.len(), "session configured");

    let source = DirFrameSource::new(Path::new(&file.frames_dir))?;
    let overlay = match file.output_path.as_deref() {
        Some(path) => JsonlOverlaySink::to_file(path)?,
        None => JsonlOverlaySink::stdout(),
    };

    let mut session = DetectionLoop::new(config, &templates, source, overlay, StderrErrorSink)?;
    session.run()?;
    Ok(())
}
