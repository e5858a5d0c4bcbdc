use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;

use rawmeta::config::AppConfig;
use rawmeta::store::MetadataStore;
use rawmeta::tags::{self, Namespace};
use rawmeta::{processor, walker};

/// Extract metadata from camera RAW and JPEG files.
#[derive(Parser, Debug)]
#[command(name = "rawmeta", version, about)]
struct Cli {
    /// File or directory to scan (overrides the configured scan directory)
    path: Option<PathBuf>,

    /// Print full records as JSON instead of one-line summaries
    #[arg(long)]
    json: bool,

    /// Print the tag dictionary for a namespace (ifd, exif, nikon, canon,
    /// olympus, sony, fuji) and exit
    #[arg(long, value_name = "NAMESPACE")]
    describe_tags: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::new()?;

    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    if let Some(name) = &cli.describe_tags {
        return describe_tags(name);
    }

    let store = MetadataStore::with_retry(
        config.open_retry_attempts,
        std::time::Duration::from_millis(config.open_retry_backoff_ms),
    );

    if let Some(path) = &cli.path {
        if path.is_file() {
            let record = store.get_or_decode(path);
            print_records(&[record], cli.json)?;
            return Ok(());
        }
        config.scan_directory = path.to_string_lossy().to_string();
    }

    info!("Scanning {}", config.scan_directory);
    let (paths_tx, paths_rx) = crossbeam_channel::unbounded();
    let root = PathBuf::from(&config.scan_directory);
    let allowed = config.allowed_extensions.clone();
    let walker_handle =
        std::thread::spawn(move || walker::start_walking(&root, &allowed, &paths_tx));

    let decoded = processor::start_processing(&config, paths_rx, &store)?;
    match walker_handle.join() {
        Ok(result) => {
            result?;
        }
        Err(_) => anyhow::bail!("walker thread panicked"),
    }

    info!("Decoded {} files", decoded);
    print_records(&store.records(), cli.json)?;
    Ok(())
}

fn describe_tags(name: &str) -> Result<()> {
    let ns = Namespace::parse(name)
        .ok_or_else(|| anyhow::anyhow!("unknown tag namespace: {}", name))?;
    let dict = tags::dictionary(ns);
    let mut ids: Vec<&u16> = dict.keys().collect();
    ids.sort();
    for id in ids {
        println!("0x{:04X}  {}", id, dict[id]);
    }
    Ok(())
}

fn print_records(records: &[rawmeta::ImageMetadata], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }
    for r in records {
        match &r.error {
            Some(e) => println!("{}: error: {}", r.file_path, e),
            None => println!(
                "{}: {} {} {}x{} {} {} {} {}",
                r.file_path,
                r.make,
                r.model,
                r.width,
                r.height,
                r.exposure_time,
                r.aperture,
                r.focal_length,
                r.lens
            ),
        }
    }
    Ok(())
}
