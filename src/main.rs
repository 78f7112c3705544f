mod cli;

use clap::Parser;
use env_filter::Builder as EnvFilterBuilder;
use std::path::PathBuf;
use std::sync::Arc;

use cli::{CliArgs, Command};
use viva::{
    list_input_devices, load_settings, save_artifact_wav, similarity, AppSettings, CpalInput,
    NoSpeechCapability, PracticeSession, Question,
};

struct ConsoleLogger {
    filter: env_filter::Filter,
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if self.filter.matches(record) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging(debug: bool) {
    let mut builder = EnvFilterBuilder::new();

    let fallback = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    match std::env::var("RUST_LOG") {
        Ok(spec) if !spec.trim().is_empty() => {
            if builder.try_parse(&spec).is_err() {
                eprintln!("Ignoring invalid RUST_LOG value '{spec}'");
                builder.filter_level(fallback);
            }
        }
        _ => {
            builder.filter_level(fallback);
        }
    }

    let filter = builder.build();
    log::set_max_level(filter.filter());
    let _ = log::set_boxed_logger(Box::new(ConsoleLogger { filter }));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.debug);

    let settings = args
        .settings
        .map(load_settings)
        .unwrap_or_else(AppSettings::default);

    match args.command {
        Command::Devices => {
            for device in list_input_devices()? {
                println!("{}", device.name);
            }
            Ok(())
        }
        Command::Score { a, b } => {
            println!("{:.3}", similarity(&a, &b));
            Ok(())
        }
        Command::Practice {
            reference,
            question,
            save_wav,
        } => run_practice(settings, reference, question, save_wav).await,
    }
}

async fn run_practice(
    settings: AppSettings,
    reference: String,
    question: Option<String>,
    save_wav: Option<PathBuf>,
) -> anyhow::Result<()> {
    let question = Question {
        id: 0,
        title: question.unwrap_or_else(|| "Practice question".to_string()),
        content: String::new(),
        difficulty: None,
        options: Vec::new(),
        correct_answer: None,
        explanation: Some(reference),
    };

    let mut session = PracticeSession::new(
        Arc::new(CpalInput::new()),
        Arc::new(NoSpeechCapability),
        settings,
    );

    println!("{}", question.title);
    session.begin(question).await?;
    println!("Recording... press Enter to stop.");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    let attempt = session.end().await?;

    let artifact = attempt.artifact.as_ref();
    println!(
        "Captured {} bytes of audio",
        artifact.map(|a| a.data.len()).unwrap_or(0)
    );
    if attempt.transcript.is_empty() {
        println!("No transcript available on this platform");
    } else {
        println!("Transcript: {}", attempt.transcript);
    }
    println!("Score: {:.3}", attempt.score.unwrap_or(0.0));

    if let (Some(path), Some(artifact)) = (save_wav, artifact) {
        save_artifact_wav(&path, artifact)?;
        println!("Saved recording to {}", path.display());
    }

    Ok(())
}
