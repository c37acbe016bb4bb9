//! Build script for hearth-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates hearth.toml at compile time
//! - Embeds the frame assets and generates `hearth_config.rs`

use std::env;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Largest frame the firmware can hold
const MAX_FRAME_BYTES: i64 = 1024;
/// Frame store capacity
const MAX_FRAMES: usize = 16;
/// Banner lines that fit on the panel
const MAX_BANNER_LINES: usize = 6;
/// Width of one banner glyph in pixels
const BANNER_GLYPH_WIDTH: i64 = 6;

fn main() {
    setup_linker();
    let config = load_config();
    let settings = validate_config(&config);
    let assets = collect_assets(&settings);
    generate(&settings, &assets);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and parse hearth.toml
fn load_config() -> toml::Value {
    println!("cargo:rerun-if-changed=hearth.toml");

    let config_path = Path::new("hearth.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: hearth.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a hearth.toml configuration file.         ║\n\
            ║  Please create one in the hearth-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read hearth.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in hearth.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Abort the build with a list of problems
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Validated settings, ready for code generation
struct Settings {
    address: i64,
    width: i64,
    height: i64,
    contrast: i64,
    flip: bool,
    max_chunk: i64,
    frequency: i64,
    sda: i64,
    scl: i64,
    frame_interval_ms: i64,
    playback: String,
    mirror: bool,
    log_every: i64,
    asset_dir: PathBuf,
    format: String,
    banner_enabled: bool,
    banner_hold_ms: i64,
    banner_lines: Option<Vec<String>>,
    led_pin: i64,
    led_blinks: i64,
    blink_period_ms: i64,
}

impl Settings {
    fn frame_len(&self) -> i64 {
        self.width * self.height / 8
    }

    /// Bytes per asset file in its on-disk layout
    fn asset_len(&self) -> i64 {
        match self.format.as_str() {
            "hmsb" => (self.width + 7) / 8 * self.height,
            _ => self.frame_len(),
        }
    }
}

/// One `[section]` of hearth.toml; missing keys take their defaults
struct Section<'a> {
    name: &'static str,
    table: Option<&'a toml::value::Table>,
}

impl<'a> Section<'a> {
    fn new(config: &'a toml::Value, name: &'static str, errors: &mut Vec<String>) -> Self {
        let table = match config.get(name) {
            Some(toml::Value::Table(t)) => Some(t),
            Some(_) => {
                errors.push(format!("[{}] must be a table", name));
                None
            }
            None => None,
        };
        Self { name, table }
    }

    fn get(&self, key: &str) -> Option<&'a toml::Value> {
        self.table.and_then(|t| t.get(key))
    }

    fn int(&self, key: &str, default: i64, range: (i64, i64), errors: &mut Vec<String>) -> i64 {
        match self.get(key) {
            None => default,
            Some(toml::Value::Integer(v)) if *v >= range.0 && *v <= range.1 => *v,
            Some(toml::Value::Integer(_)) => {
                errors.push(format!(
                    "[{}] {} must be {}-{}",
                    self.name, key, range.0, range.1
                ));
                default
            }
            Some(_) => {
                errors.push(format!("[{}] {} must be an integer", self.name, key));
                default
            }
        }
    }

    fn bool(&self, key: &str, default: bool, errors: &mut Vec<String>) -> bool {
        match self.get(key) {
            None => default,
            Some(toml::Value::Boolean(v)) => *v,
            Some(_) => {
                errors.push(format!("[{}] {} must be true or false", self.name, key));
                default
            }
        }
    }

    fn choice(
        &self,
        key: &str,
        default: &str,
        allowed: &[&str],
        errors: &mut Vec<String>,
    ) -> String {
        match self.get(key) {
            None => default.to_string(),
            Some(toml::Value::String(v)) if allowed.contains(&v.as_str()) => v.clone(),
            Some(_) => {
                errors.push(format!(
                    "[{}] {} must be one of: {}",
                    self.name,
                    key,
                    allowed.join(", ")
                ));
                default.to_string()
            }
        }
    }

    fn string(&self, key: &str, default: &str, errors: &mut Vec<String>) -> String {
        match self.get(key) {
            None => default.to_string(),
            Some(toml::Value::String(v)) => v.clone(),
            Some(_) => {
                errors.push(format!("[{}] {} must be a string", self.name, key));
                default.to_string()
            }
        }
    }

    fn strings(&self, key: &str, errors: &mut Vec<String>) -> Option<Vec<String>> {
        match self.get(key) {
            None => None,
            Some(toml::Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(|item| match item {
                        toml::Value::String(s) => Some(s.clone()),
                        _ => {
                            errors.push(format!("[{}] {} must contain strings", self.name, key));
                            None
                        }
                    })
                    .collect(),
            ),
            Some(_) => {
                errors.push(format!("[{}] {} must be an array", self.name, key));
                Some(Vec::new())
            }
        }
    }
}

/// Validate hearth.toml and resolve defaults
fn validate_config(config: &toml::Value) -> Settings {
    let mut errors = Vec::new();

    let display = Section::new(config, "display", &mut errors);
    let i2c = Section::new(config, "i2c", &mut errors);
    let animation = Section::new(config, "animation", &mut errors);
    let assets = Section::new(config, "assets", &mut errors);
    let banner = Section::new(config, "banner", &mut errors);
    let selftest = Section::new(config, "selftest", &mut errors);

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());

    let settings = Settings {
        address: display.int("address", 0x3C, (0x03, 0x77), &mut errors),
        width: display.int("width", 128, (1, 128), &mut errors),
        height: display.int("height", 64, (16, 64), &mut errors),
        contrast: display.int("contrast", 255, (0, 255), &mut errors),
        flip: display.bool("flip", true, &mut errors),
        max_chunk: display.int("max_chunk", 128, (1, 128), &mut errors),
        frequency: i2c.int("frequency", 400_000, (100_000, 1_000_000), &mut errors),
        sda: i2c.int("sda", 4, (0, 29), &mut errors),
        scl: i2c.int("scl", 5, (0, 29), &mut errors),
        frame_interval_ms: animation.int("frame_interval_ms", 100, (1, 60_000), &mut errors),
        playback: animation.choice("playback", "pingpong", &["cycle", "pingpong"], &mut errors),
        mirror: animation.bool("mirror", true, &mut errors),
        log_every: animation.int("log_every", 100, (0, u32::MAX as i64), &mut errors),
        asset_dir: manifest_dir.join(assets.string("dir", "assets", &mut errors)),
        format: assets.choice("format", "vlsb", &["vlsb", "hmsb"], &mut errors),
        banner_enabled: banner.bool("enabled", true, &mut errors),
        banner_hold_ms: banner.int("hold_ms", 20_000, (0, 600_000), &mut errors),
        banner_lines: banner.strings("lines", &mut errors),
        led_pin: selftest.int("led", 25, (0, 29), &mut errors),
        led_blinks: selftest.int("led_blinks", 3, (0, 255), &mut errors),
        blink_period_ms: selftest.int("blink_period_ms", 200, (1, 10_000), &mut errors),
    };

    if settings.height % 8 != 0 {
        errors.push("[display] height must be a multiple of 8".to_string());
    }
    if settings.frame_len() > MAX_FRAME_BYTES {
        errors.push(format!(
            "[display] width * height / 8 must not exceed {}",
            MAX_FRAME_BYTES
        ));
    }
    if ![100_000, 400_000, 1_000_000].contains(&settings.frequency) {
        errors.push("[i2c] frequency must be 100000, 400000 or 1000000".to_string());
    }
    if i2c_peripheral(settings.sda, settings.scl).is_none() {
        errors.push(format!(
            "[i2c] GPIO{}/GPIO{} is not an SDA/SCL pair",
            settings.sda, settings.scl
        ));
    }
    if settings.led_pin == settings.sda || settings.led_pin == settings.scl {
        errors.push("[selftest] led pin is used by the I2C bus".to_string());
    }
    let banner_lines = settings.banner_lines.as_deref().unwrap_or_default();
    if banner_lines.len() > MAX_BANNER_LINES {
        errors.push(format!(
            "[banner] at most {} lines fit on the panel",
            MAX_BANNER_LINES
        ));
    }
    let max_chars = settings.width / BANNER_GLYPH_WIDTH;
    for (i, line) in banner_lines.iter().enumerate() {
        if !line.is_ascii() {
            errors.push(format!("[banner] line {} must be ASCII", i + 1));
        } else if line.len() as i64 > max_chars {
            errors.push(format!(
                "[banner] line {} is longer than {} characters",
                i + 1,
                max_chars
            ));
        }
    }

    if !errors.is_empty() {
        fail("Invalid configuration in hearth.toml", &errors);
    }

    println!("cargo:warning=hearth.toml validated successfully");
    settings
}

/// I2C peripheral for an SDA/SCL pin pair
///
/// SDA sits on GPIO 4n (I2C0) or 4n+2 (I2C1), with SCL on the next pin.
fn i2c_peripheral(sda: i64, scl: i64) -> Option<&'static str> {
    if scl != sda + 1 {
        return None;
    }
    match sda % 4 {
        0 => Some("I2C0"),
        2 => Some("I2C1"),
        _ => None,
    }
}

/// Asset files in lexical name order
fn collect_assets(settings: &Settings) -> Vec<PathBuf> {
    println!("cargo:rerun-if-changed={}", settings.asset_dir.display());

    let entries = match fs::read_dir(&settings.asset_dir) {
        Ok(entries) => entries,
        Err(e) => fail(
            "Cannot read the asset directory",
            &[
                settings.asset_dir.display().to_string(),
                e.to_string(),
            ],
        ),
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut errors = Vec::new();
    let expected = settings.asset_len();

    if paths.is_empty() {
        errors.push("no frame files found".to_string());
    }
    let frames = paths.len() * if settings.mirror { 2 } else { 1 };
    if frames > MAX_FRAMES {
        errors.push(format!(
            "{} frames after mirroring, at most {} fit",
            frames, MAX_FRAMES
        ));
    }

    for path in &paths {
        println!("cargo:rerun-if-changed={}", path.display());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match fs::metadata(path) {
            Ok(meta) if meta.len() as i64 == expected => {}
            Ok(meta) => errors.push(format!(
                "{} is {} bytes, expected {}",
                name,
                meta.len(),
                expected
            )),
            Err(e) => errors.push(format!("{}: {}", name, e)),
        }
    }

    if !errors.is_empty() {
        fail("Invalid frame assets", &errors);
    }

    paths
}

/// Write `$OUT_DIR/hearth_config.rs`
fn generate(settings: &Settings, assets: &[PathBuf]) {
    let mut out = String::new();
    let peripheral = i2c_peripheral(settings.sda, settings.scl).unwrap_or("I2C0");
    let playback = if settings.playback == "cycle" {
        "Cycle"
    } else {
        "PingPong"
    };
    let format = if settings.format == "hmsb" {
        "Hmsb"
    } else {
        "Vlsb"
    };

    writeln!(out, "// Generated by build.rs from hearth.toml").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "pub const DISPLAY: DisplayConfig = DisplayConfig {{").unwrap();
    writeln!(out, "    address: {:#04x},", settings.address).unwrap();
    writeln!(out, "    width: {},", settings.width).unwrap();
    writeln!(out, "    height: {},", settings.height).unwrap();
    writeln!(out, "    contrast: {},", settings.contrast).unwrap();
    writeln!(out, "    flip: {},", settings.flip).unwrap();
    writeln!(out, "    max_chunk: {},", settings.max_chunk).unwrap();
    writeln!(out, "}};").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "pub const ANIMATION: AnimationConfig = AnimationConfig {{").unwrap();
    writeln!(out, "    frame_interval_ms: {},", settings.frame_interval_ms).unwrap();
    writeln!(out, "    playback: Playback::{},", playback).unwrap();
    writeln!(out, "    mirror: {},", settings.mirror).unwrap();
    writeln!(out, "    format: AssetFormat::{},", format).unwrap();
    writeln!(out, "    log_every: {},", settings.log_every).unwrap();
    writeln!(out, "}};").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "pub const I2C_FREQUENCY: u32 = {};", settings.frequency).unwrap();
    writeln!(out, "pub const BANNER_ENABLED: bool = {};", settings.banner_enabled).unwrap();
    writeln!(out, "pub const BANNER_HOLD_MS: u64 = {};", settings.banner_hold_ms).unwrap();
    match &settings.banner_lines {
        Some(lines) => writeln!(out, "pub const BANNER_LINES: &[&str] = &{:?};", lines).unwrap(),
        None => writeln!(
            out,
            "pub const BANNER_LINES: &[&str] = hearth_display::banner::DEFAULT_LINES;"
        )
        .unwrap(),
    }
    writeln!(out, "pub const LED_BLINKS: u8 = {};", settings.led_blinks).unwrap();
    writeln!(out, "pub const BLINK_PERIOD_MS: u32 = {};", settings.blink_period_ms).unwrap();
    writeln!(out).unwrap();
    writeln!(out, "pub static ASSETS: &[&[u8]] = &[").unwrap();
    for path in assets {
        writeln!(out, "    include_bytes!({:?}),", path.display().to_string()).unwrap();
    }
    writeln!(out, "];").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "/// Take (I2C peripheral, SCL, SDA) from `Peripherals`").unwrap();
    writeln!(out, "macro_rules! take_i2c {{").unwrap();
    writeln!(
        out,
        "    ($p:expr) => {{ ($p.{}, $p.PIN_{}, $p.PIN_{}) }};",
        peripheral, settings.scl, settings.sda
    )
    .unwrap();
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "/// Take the status LED pin from `Peripherals`").unwrap();
    writeln!(out, "macro_rules! take_led {{").unwrap();
    writeln!(out, "    ($p:expr) => {{ $p.PIN_{} }};", settings.led_pin).unwrap();
    writeln!(out, "}}").unwrap();

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("hearth_config.rs"), out).unwrap();
}
