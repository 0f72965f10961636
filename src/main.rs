use anyhow::{Context, Result};
use autotag::composite::BackgroundCycle;
use autotag::config::{AugmentationConfig, Polarity};
use autotag::output::{PreviewWriter, SampleLog, SampleRecorder};
use autotag::session::load_classes;
use autotag::{Advance, Session, SynthConfig};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Class library: one directory per class, one frame directory per video
    #[arg(short, long)]
    input: PathBuf,

    /// Directory of background images (.jpg/.png)
    #[arg(short, long = "bg")]
    backgrounds: PathBuf,

    /// Directory for annotated preview images
    /// If not provided, labels are only kept in memory and summarized
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Samples to generate per class
    #[arg(long, default_value_t = 1000)]
    samples_per_class: usize,

    /// Maximum hue shift (OpenCV hue units, 0..180)
    #[arg(long, default_value_t = 10)]
    hue_shift: u8,

    /// Maximum saturation shift in percent
    #[arg(long, default_value_t = 15)]
    saturation_shift: u8,

    /// Maximum value shift in percent
    #[arg(long, default_value_t = 15)]
    value_shift: u8,

    /// Binarization threshold on the grayscale frame
    #[arg(long, default_value_t = 250)]
    threshold: u8,

    /// Object is brighter than the backdrop
    #[arg(long)]
    bright_object: bool,

    /// Random seed; drawn from the OS when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn synth_config(&self) -> SynthConfig {
        SynthConfig {
            augment: AugmentationConfig {
                hue_shift_max: self.hue_shift,
                saturation_shift_max: self.saturation_shift,
                value_shift_max: self.value_shift,
                threshold: self.threshold,
                polarity: if self.bright_object {
                    Polarity::BrightObject
                } else {
                    Polarity::DarkObject
                },
            },
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("autotag starting");
    tracing::info!("Input: {}", args.input.display());
    tracing::info!("Backgrounds: {}", args.backgrounds.display());
    tracing::info!("Samples per class: {}", args.samples_per_class);

    let classes = load_classes(&args.input)
        .with_context(|| format!("Failed to load classes from {}", args.input.display()))?;
    if classes.is_empty() {
        anyhow::bail!("No class directories found in {}", args.input.display());
    }

    let backgrounds = BackgroundCycle::from_dir(&args.backgrounds)
        .with_context(|| format!("Failed to load backgrounds from {}", args.backgrounds.display()))?;

    let mut recorder: Box<dyn SampleRecorder> = if let Some(dir) = &args.output {
        Box::new(PreviewWriter::new(dir).context("Failed to initialize preview output")?)
    } else {
        tracing::info!("No output directory, keeping labels in memory");
        Box::new(SampleLog::new())
    };

    let mut rng = match args.seed {
        Some(seed) => {
            tracing::info!("Seed: {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let mut session = Session::new(classes, backgrounds, args.samples_per_class);
    let config = args.synth_config();

    run_session(&mut session, recorder.as_mut(), &config, &mut rng)?;

    for ((name, count), exhausted) in session
        .class_names()
        .zip(session.counts())
        .zip(session.exhausted())
    {
        if *exhausted {
            tracing::warn!("{}: {} samples (no usable frames)", name, count);
        } else {
            tracing::info!("{}: {} samples", name, count);
        }
    }

    Ok(())
}

fn run_session(
    session: &mut Session,
    recorder: &mut dyn SampleRecorder,
    config: &SynthConfig,
    rng: &mut StdRng,
) -> Result<()> {
    let mut frame_count = 0u64;
    let mut skipped = 0u64;
    let mut total_synth_time = Duration::ZERO;
    let mut total_record_time = Duration::ZERO;

    tracing::info!("Starting sample generation");

    loop {
        let synth_start = Instant::now();
        let outcome = session.advance(config, rng).context("Failed to advance session")?;
        total_synth_time += synth_start.elapsed();

        match outcome {
            Advance::Finished => break,
            Advance::Skipped { .. } => skipped += 1,
            Advance::Sample(sample) => {
                let record_start = Instant::now();
                recorder
                    .record_sample(&sample.record())
                    .context("Failed to record sample")?;
                total_record_time += record_start.elapsed();
            }
        }

        frame_count += 1;

        // Log stats every 30 frames
        if frame_count % 30 == 0 {
            let avg_synth_ms = total_synth_time.as_secs_f64() * 1000.0 / frame_count as f64;
            let avg_record_ms = total_record_time.as_secs_f64() * 1000.0 / frame_count as f64;

            tracing::info!(
                "Frame {}: samples={}, skipped={}, synth={:.1}ms, record={:.1}ms",
                frame_count,
                recorder.sample_count(),
                skipped,
                avg_synth_ms,
                avg_record_ms
            );
        }
    }

    tracing::info!(
        "Done: {} samples from {} frames ({} skipped)",
        session.total_samples(),
        frame_count,
        skipped
    );

    Ok(())
}
