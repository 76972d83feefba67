use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process,
    thread,
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use log::debug;
use quizgen::{
    error_chain, generate_quiz, Config, Difficulty, Document, DocumentFormat, GeminiClient, Phase,
    QuestionCount, Quiz, QuizError, QuizSession, QuizSettings, SessionError,
};

#[derive(Parser, Debug)]
#[command(name = "quizgen")]
#[command(version, about = "Generate a multiple-choice quiz from a document and take it")]
struct Args {
    /// document to build the quiz from (pdf, docx or txt)
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=10))]
    questions: u8,
    #[arg(short, long, value_enum, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,
    /// play a quiz exported by `fetch_quiz` instead of generating one;
    /// no GOOGLE_API_KEY is needed in this mode
    #[arg(long, value_name = "JSON", conflicts_with = "file")]
    quiz: Option<PathBuf>,
    /// how long feedback stays up before the next question
    #[arg(long, default_value_t = 1500)]
    pause_ms: u64,
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let pause = Duration::from_millis(args.pause_ms);
    let mut session = QuizSession::new();

    if let Some(path) = &args.quiz {
        let quiz = Quiz::load(path).context(format!("failed to load quiz from {}", path.display()))?;
        session.load_quiz(quiz);
        return run_session(&mut session, &mut input, pause);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.to_string().bright_red());
            process::exit(1);
        }
    };
    let client = GeminiClient::new(&config);
    debug!("using model {}", client.model());

    let count = QuestionCount::new(args.questions)
        .ok_or_else(|| anyhow!("number of questions must be between 1 and 10"))?;
    let settings = QuizSettings::new(count, args.difficulty);

    println!("{}", "Quiz Generator from a Document".cyan().bold());
    let mut next_path = args.file.clone();
    let mut last_path = args.file.clone();

    loop {
        let path = match next_path.take() {
            Some(path) => path,
            None => match prompt_for_path(&mut input, last_path.as_deref())? {
                Some(path) => path,
                None => return Ok(()),
            },
        };
        last_path = Some(path.clone());

        let document = match load_document(&path) {
            Ok(document) => document,
            Err(e) => {
                eprintln!("{}", format!("{:#}", e).bright_red());
                continue;
            }
        };

        println!("{}", "Uploading file and generating questions...".cyan());
        match generate_quiz(&client, &document, &settings) {
            Ok(quiz) => {
                session.load_quiz(quiz);
            }
            Err(e) => {
                report_error(&e);
                continue;
            }
        }

        run_session(&mut session, &mut input, pause)?;
        if session.phase() != Phase::Complete {
            // input closed mid-quiz
            return Ok(());
        }

        if !confirm(&mut input, "Create Another Quiz? [y/N] ")? {
            return Ok(());
        }
        session.restart()?;
    }
}

/// Upload control: only the accepted formats get through.
fn load_document(path: &Path) -> Result<Document> {
    if DocumentFormat::from_path(path).is_none() {
        let supported = DocumentFormat::ALL
            .iter()
            .map(|f| f.extension().to_uppercase())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(anyhow!(
            "Unsupported file type: {}. Supported types are {}.",
            path.display(),
            supported
        ));
    }

    Document::read(path).context(format!("failed to read {}", path.display()))
}

fn report_error(error: &QuizError) {
    eprintln!("{}", error_chain(error).bright_red());
    match error {
        QuizError::Parse { raw, .. } => eprintln!("{}", raw),
        QuizError::EmptyResponse {
            feedback: Some(feedback),
        } => eprintln!("Prompt feedback: {}", feedback),
        _ => {}
    }
}

fn run_session(session: &mut QuizSession, input: &mut impl BufRead, pause: Duration) -> Result<()> {
    while let Some(question) = session.current_question() {
        println!();
        println!(
            "{}",
            format!("Score: {} / {}", session.score(), session.total()).cyan()
        );
        println!(
            "{} {}",
            format!("Question {}:", session.current_index() + 1).bold(),
            question.mcq
        );
        for (label, text) in &question.options {
            println!("  {}) {}", label.bold(), text);
        }

        let Some(line) = read_prompt(input, "Select your answer: ")? else {
            return Ok(());
        };
        let line = line.trim();

        let chosen = if line.is_empty() {
            None
        } else {
            match question.option_for(line) {
                Some(text) => Some(text.to_string()),
                // nothing to pick from, take the answer as typed
                None if question.options.is_empty() => Some(line.to_string()),
                None => {
                    println!("{}", format!("'{}' is not one of the options.", line).yellow());
                    continue;
                }
            }
        };

        match session.submit_answer(chosen.as_deref()) {
            Ok(grade) => {
                if grade.correct {
                    println!("{}", "Correct!".bright_green());
                } else {
                    println!(
                        "{}",
                        format!("Incorrect. The correct answer was: {}.", grade.expected).bright_red()
                    );
                }
                thread::sleep(pause);
            }
            Err(SessionError::NoAnswerSelected) => {
                println!("{}", SessionError::NoAnswerSelected.to_string().yellow());
            }
            Err(e) => return Err(e.into()),
        }
    }

    if session.phase() == Phase::Complete {
        println!();
        println!("{}", "Quiz Complete!".bright_green().bold());
        println!(
            "Your Final Score: {}",
            format!("{} / {}", session.score(), session.total()).bold()
        );
    }

    Ok(())
}

fn prompt_for_path(input: &mut impl BufRead, last: Option<&Path>) -> Result<Option<PathBuf>> {
    let prompt = match last {
        Some(path) => format!("Choose a file [{}]: ", path.display()),
        None => "Choose a file: ".to_string(),
    };

    loop {
        let Some(line) = read_prompt(input, &prompt)? else {
            return Ok(None);
        };
        match (line.trim(), last) {
            ("", Some(path)) => return Ok(Some(path.to_path_buf())),
            ("", None) => println!("{}", "Please upload a file first.".yellow()),
            (path, _) => return Ok(Some(PathBuf::from(path))),
        }
    }
}

fn confirm(input: &mut impl BufRead, prompt: &str) -> Result<bool> {
    let answer = read_prompt(input, prompt)?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// `None` once the input is closed.
fn read_prompt(input: &mut impl BufRead, prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt.cyan());
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        println!();
        return Ok(None);
    }
    Ok(Some(line))
}
