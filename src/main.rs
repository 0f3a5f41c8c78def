mod caption;
mod error;
mod parser;
mod practice;
mod session;
mod vocab;

use crate::caption::{Caption, Timestamp, Transcript};
use crate::error::PracticeError;
use crate::session::Session;

use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

fn main() {
    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Practice English listening with subtitled audio lessons")]
struct Cli {
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase log verbosity (-v info, -vv debug, -vvv trace)."
    )]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a subtitle file and summarise what loaded
    Info {
        #[arg(
            value_name = "FILE",
            default_value = "-",
            help = "The subtitle file to read. If not supplied, it is read from standard input."
        )]
        input: String,
    },
    /// Print one page of captions with their timings
    Show {
        #[arg(value_name = "FILE", default_value = "-")]
        input: String,
        #[arg(
            short,
            long,
            default_value_t = 1,
            help = "1-based page number; out-of-range pages are clamped."
        )]
        page: usize,
        #[arg(long, default_value_t = session::DEFAULT_PAGE_SIZE, help = "Captions per page.")]
        page_size: usize,
    },
    /// Resolve a playback position to the caption playing at that moment
    Locate {
        #[arg(value_name = "FILE", default_value = "-")]
        input: String,
        #[arg(short, long, value_name = "SECONDS", help = "Elapsed playback time.")]
        time: f64,
    },
    /// Print captions whose text matches a regular expression
    Search {
        #[arg(value_name = "PATTERN")]
        pattern: String,
        #[arg(value_name = "FILE", default_value = "-")]
        input: String,
    },
    /// Fill-in-the-blank practice on one caption
    Cloze {
        #[arg(value_name = "FILE", default_value = "-")]
        input: String,
        #[arg(
            short,
            long,
            help = "Caption index to practise. Picked at random when omitted."
        )]
        index: Option<usize>,
        #[arg(long, help = "Seed the mask selection for a reproducible exercise.")]
        seed: Option<u64>,
        #[arg(long, help = "Also print the masked words.")]
        reveal: bool,
    },
    /// Dictation practice: type the caption you heard and get graded
    Dictation {
        #[arg(value_name = "FILE", help = "The subtitle file to read.")]
        input: String,
        #[arg(
            short,
            long,
            help = "Caption index to dictate. Picked at random when omitted."
        )]
        index: Option<usize>,
        #[arg(long, help = "Seed the caption pick.")]
        seed: Option<u64>,
    },
    /// Interactive practice shell over one lesson
    Practice {
        #[arg(value_name = "FILE", help = "The subtitle file to read.")]
        input: String,
        #[arg(long, help = "Seed the exercise randomness.")]
        seed: Option<u64>,
    },
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    setup_logger(cli.verbose);

    match cli.command {
        Command::Info { input } => cmd_info(&input),
        Command::Show {
            input,
            page,
            page_size,
        } => cmd_show(&input, page, page_size),
        Command::Locate { input, time } => cmd_locate(&input, time),
        Command::Search { pattern, input } => cmd_search(&input, &pattern),
        Command::Cloze {
            input,
            index,
            seed,
            reveal,
        } => cmd_cloze(&input, index, seed, reveal),
        Command::Dictation { input, index, seed } => cmd_dictation(&input, index, seed),
        Command::Practice { input, seed } => cmd_practice(&input, seed),
    }
}

fn setup_logger(level: u8) {
    let log_level = match level {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    pretty_env_logger::formatted_builder()
        .filter_level(log_level)
        .init();
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path).context(format!("Failed to open input file: '{}'", path))
    }
}

fn parse_file(path: &str) -> Result<parser::ParseReport> {
    let data = read_input(path)?;
    Ok(parser::parse(&data))
}

fn load_session(path: &str) -> Result<Session> {
    let report = parse_file(path)?;
    if !report.dropped.is_empty() {
        log::info!(
            "{} of {} blocks dropped",
            report.dropped.len(),
            report.block_count()
        );
    }
    let mut session = Session::new();
    session.load(Transcript::new(report.captions));
    Ok(session)
}

fn print_caption(index: usize, caption: &Caption) {
    println!(
        "{:>4}  [{} --> {}]  {}",
        index,
        Timestamp(caption.start),
        Timestamp(caption.end),
        caption.text
    );
}

fn cmd_info(input: &str) -> Result<()> {
    let report = parse_file(input)?;

    println!("{} captions loaded", report.captions.len());
    if !report.dropped.is_empty() {
        println!(
            "{} of {} blocks were malformed and dropped",
            report.dropped.len(),
            report.block_count()
        );
    }
    if let (Some(first), Some(last)) = (report.captions.first(), report.captions.last()) {
        println!(
            "covers {} --> {}",
            Timestamp(first.start),
            Timestamp(last.end)
        );
    }
    let words: usize = report.captions.iter().map(|c| c.words().len()).sum();
    println!("{} words of dialogue", words);
    Ok(())
}

fn cmd_show(input: &str, page: usize, page_size: usize) -> Result<()> {
    let session = load_session(input)?;
    if session.transcript().is_empty() {
        println!("0 captions loaded");
        return Ok(());
    }

    let (start, end) = session.page(page, page_size)?;
    for (offset, caption) in session.transcript().captions()[start..=end].iter().enumerate() {
        print_caption(start + offset, caption);
    }
    Ok(())
}

fn cmd_locate(input: &str, time: f64) -> Result<()> {
    let mut session = load_session(input)?;
    if session.transcript().is_empty() {
        println!("0 captions loaded");
        return Ok(());
    }

    let index = session.sync(time)?;
    if let Some(caption) = session.current() {
        print_caption(index, caption);
    }
    Ok(())
}

fn cmd_search(input: &str, pattern: &str) -> Result<()> {
    let session = load_session(input)?;
    search_transcript(session.transcript(), pattern)
}

fn search_transcript(transcript: &Transcript, pattern: &str) -> Result<()> {
    let regex = Regex::new(pattern).context("Invalid regex.")?;
    let mut matched = 0;
    for (index, caption) in transcript.iter().enumerate() {
        if regex.is_match(&caption.text) {
            print_caption(index, caption);
            matched += 1;
        }
    }
    if matched == 0 {
        println!("no captions match /{}/", pattern);
    }
    Ok(())
}

fn pick<'a>(
    session: &'a Session,
    index: Option<usize>,
    rng: &mut StdRng,
) -> Result<(usize, &'a Caption)> {
    let captions = session.transcript().captions();
    if captions.is_empty() {
        return Err(PracticeError::NoTranscript.into());
    }
    let index = match index {
        Some(index) => index,
        None => rng.gen_range(0..captions.len()),
    };
    let caption = captions.get(index).ok_or(PracticeError::IndexOutOfRange {
        index,
        len: captions.len(),
    })?;
    Ok((index, caption))
}

fn cmd_cloze(input: &str, index: Option<usize>, seed: Option<u64>, reveal: bool) -> Result<()> {
    let session = load_session(input)?;
    if session.transcript().is_empty() {
        println!("0 captions loaded");
        return Ok(());
    }

    let mut rng = make_rng(seed);
    let (index, caption) = pick(&session, index, &mut rng)?;
    let exercise = practice::cloze(caption, &mut rng);

    println!(
        "{:>4}  [{} --> {}]",
        index,
        Timestamp(caption.start),
        Timestamp(caption.end)
    );
    println!("{}", exercise.prompt);
    if !exercise.has_blanks() {
        println!("(nothing to fill in this time)");
    } else if reveal {
        let answers: Vec<String> = exercise
            .blanks
            .iter()
            .map(|b| format!("word {}: {}", b.position + 1, b.answer))
            .collect();
        println!("answers: {}", answers.join(", "));
    }
    Ok(())
}

fn cmd_dictation(input: &str, index: Option<usize>, seed: Option<u64>) -> Result<()> {
    let session = load_session(input)?;
    if session.transcript().is_empty() {
        println!("0 captions loaded");
        return Ok(());
    }

    let mut rng = make_rng(seed);
    let (index, caption) = pick(&session, index, &mut rng)?;

    println!(
        "Play caption {} ({} --> {}) and type what you hear.",
        index,
        Timestamp(caption.start),
        Timestamp(caption.end)
    );
    let attempt = match prompt_user("> ")? {
        Some(attempt) => attempt,
        None => return Ok(()),
    };

    if practice::check_dictation(&caption.text, &attempt) {
        println!("Correct!");
    } else {
        println!("Not quite. The line was:");
        println!("{}", caption.text);
    }
    Ok(())
}

fn cmd_practice(input: &str, seed: Option<u64>) -> Result<()> {
    let report = parse_file(input)?;
    println!("{} captions loaded", report.captions.len());

    let mut session = Session::new();
    session.load(Transcript::new(report.captions));
    let mut rng = make_rng(seed);

    println!("Type 'help' for commands.");
    loop {
        let line = match prompt_user("> ")? {
            Some(line) => line,
            None => break,
        };
        match handle_command(&mut session, &mut rng, line.trim()) {
            Ok(true) => (),
            Ok(false) => break,
            Err(err) => println!("error: {}", err),
        }
    }
    Ok(())
}

fn handle_command(session: &mut Session, rng: &mut StdRng, line: &str) -> Result<bool> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim();

    match command {
        "" => (),
        "help" => print_help(),
        "quit" | "q" | "exit" => return Ok(false),
        "show" => {
            let page = if rest.is_empty() {
                1
            } else {
                rest.parse().context("page must be a number")?
            };
            let (start, end) = session.page(page, session::DEFAULT_PAGE_SIZE)?;
            for (offset, caption) in session.transcript().captions()[start..=end]
                .iter()
                .enumerate()
            {
                print_caption(start + offset, caption);
            }
        }
        "seek" => {
            let index: usize = rest.parse().context("seek takes a caption index")?;
            let caption = session.seek(index)?;
            print_caption(index, caption);
        }
        "time" => {
            let time: f64 = rest.parse().context("time takes elapsed seconds")?;
            let index = session.sync(time)?;
            if let Some(caption) = session.current() {
                print_caption(index, caption);
            }
        }
        "where" => match session.cursor() {
            Some(cursor) => {
                println!("at {} (caption {})", Timestamp(cursor.time), cursor.index);
                if let Some(caption) = session.current() {
                    print_caption(cursor.index, caption);
                }
            }
            None => println!("no transcript loaded"),
        },
        "load" => {
            if rest.is_empty() {
                println!("usage: load <file>");
            } else {
                let report = parse_file(rest)?;
                println!("{} captions loaded", report.captions.len());
                session.load(Transcript::new(report.captions));
            }
        }
        "find" => search_transcript(session.transcript(), rest)?,
        "word" => {
            let mut args = rest.splitn(2, char::is_whitespace);
            let op = args.next().unwrap_or("");
            let word = args.next().unwrap_or("").trim();
            match op {
                "add" if !word.is_empty() => {
                    if session.add_word(word) {
                        println!("added '{}'", word);
                    } else {
                        println!("'{}' is already collected", word);
                    }
                }
                "rm" if !word.is_empty() => {
                    if session.remove_word(word) {
                        println!("removed '{}'", word);
                    } else {
                        println!("'{}' is not in the vocabulary", word);
                    }
                }
                _ => println!("usage: word add|rm <word>"),
            }
        }
        "vocab" => {
            if session.vocabulary().is_empty() {
                println!("no words collected yet");
            } else {
                for word in session.vocabulary().words() {
                    println!("- {}", word);
                }
            }
        }
        "note" => {
            if rest.is_empty() {
                println!("usage: note <text>");
            } else {
                session.add_note(rest.to_string());
                println!("saved");
            }
        }
        "notes" => {
            if session.note_count() == 0 {
                println!("no notes yet");
            } else {
                for (i, note) in session.recent_notes().iter().enumerate() {
                    println!("{}. {}", i + 1, note);
                }
                if session.note_count() > session::RECENT_NOTES {
                    println!("({} older notes not shown)", session.note_count() - session::RECENT_NOTES);
                }
            }
        }
        "export" => {
            let path = if rest.is_empty() {
                vocab::EXPORT_FILE_NAME
            } else {
                rest
            };
            vocab::export(session.vocabulary(), path)?;
            println!("{} words written to {}", session.vocabulary().len(), path);
        }
        "cloze" => {
            let caption = session.current().ok_or(PracticeError::NoTranscript)?;
            let exercise = practice::cloze(caption, rng);
            println!("{}", exercise.prompt);
            if exercise.has_blanks() {
                if prompt_user("press enter to reveal ")?.is_none() {
                    return Ok(false);
                }
                println!("{}", caption.text);
            } else {
                println!("(nothing to fill in this time)");
            }
        }
        "dict" => {
            let caption = practice::pick_caption(session.transcript().captions(), rng)
                .ok_or(PracticeError::NoTranscript)?;
            println!(
                "Play {} --> {} and type what you hear.",
                Timestamp(caption.start),
                Timestamp(caption.end)
            );
            let attempt = match prompt_user("dictation> ")? {
                Some(attempt) => attempt,
                None => return Ok(false),
            };
            if practice::check_dictation(&caption.text, &attempt) {
                println!("Correct!");
            } else {
                println!("Not quite. The line was:");
                println!("{}", caption.text);
            }
        }
        _ => println!("unknown command '{}', try 'help'", command),
    }
    Ok(true)
}

fn print_help() {
    println!("show [page]      print a page of captions");
    println!("load <file>      replace the transcript with another lesson");
    println!("seek <index>     jump to a caption");
    println!("time <seconds>   follow the audio position");
    println!("where            current position");
    println!("find <regex>     search caption text");
    println!("word add <w>     collect a word");
    println!("word rm <w>      drop a word");
    println!("vocab            list collected words");
    println!("export [file]    write vocabulary (default {})", vocab::EXPORT_FILE_NAME);
    println!("note <text>      save a note");
    println!("notes            show recent notes");
    println!("cloze            fill-in-the-blank on the current caption");
    println!("dict             dictation on a random caption");
    println!("quit             leave");
}

fn prompt_user(msg: &str) -> Result<Option<String>> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Failed to read from stdin")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end().to_string()))
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
