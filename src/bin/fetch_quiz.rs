use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use quizgen::{
    generate_quiz, Config, Difficulty, Document, DocumentFormat, GeminiClient, QuestionCount,
    QuizError, QuizSettings,
};

const DEFAULT_OUTPUT_DIR: &str = "output";

/// Generate a quiz from a document and save it as JSON, without taking it.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// document to build the quiz from (pdf, docx or txt)
    file: PathBuf,
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=10))]
    questions: u8,
    #[arg(short, long, value_enum, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    let config = Config::from_env()?;
    let client = GeminiClient::new(&config);

    if DocumentFormat::from_path(&args.file).is_none() {
        return Err(anyhow!(
            "unsupported file type: {}, expected pdf, docx or txt",
            args.file.display()
        ));
    }
    let document = Document::read(&args.file)
        .context(format!("failed to read {}", args.file.display()))?;

    let count = QuestionCount::new(args.questions)
        .ok_or_else(|| anyhow!("number of questions must be between 1 and 10"))?;
    let settings = QuizSettings::new(count, args.difficulty);

    let quiz = match generate_quiz(&client, &document, &settings) {
        Ok(quiz) => quiz,
        Err(e) => {
            if let QuizError::Parse { raw, .. } = &e {
                eprintln!("model response was:\n{}", raw);
            }
            return Err(e).context(format!("could not generate a quiz from {}", document.name()));
        }
    };

    create_output_dir(&args.output_dir).context("failed to create output directory")?;
    let output = output_path(&args.output_dir, &args.file);
    quiz.save(&output)?;

    println!(
        "created {} questions in {}",
        quiz.len().to_string().bold(),
        output.display().to_string().bold()
    );

    Ok(())
}

fn output_path(output_dir: &Path, document: &Path) -> PathBuf {
    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "quiz".to_string());
    output_dir.join(format!("{}.json", stem))
}

fn create_output_dir(output_dir: &Path) -> anyhow::Result<()> {
    if !output_dir.is_dir() {
        fs::create_dir_all(output_dir)?;
    }
    Ok(())
}
