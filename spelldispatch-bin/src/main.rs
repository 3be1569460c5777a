use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::mpsc;

use gumdrop::Options;
use serde::Serialize;
use smol_str::SmolStr;
use unic_segment::WordBoundIndices;

use spelldispatch::backend::BackendRegistry;
use spelldispatch::{Actions, ConsumerId, Engine, EngineConfig, Notification};

trait OutputWriter {
    fn write_correction(&mut self, word: &str, is_correct: bool);
    fn write_suggestions(&mut self, word: &str, suggestions: &[SmolStr], actions: Actions);
    fn finish(&mut self);
}

struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write_correction(&mut self, word: &str, is_correct: bool) {
        println!(
            "Input: {}\t\t[{}]",
            &word,
            if is_correct { "CORRECT" } else { "INCORRECT" }
        );
    }

    fn write_suggestions(&mut self, _word: &str, suggestions: &[SmolStr], actions: Actions) {
        for sugg in suggestions {
            println!("{}", sugg);
        }
        if !actions.is_empty() {
            println!("({})", actions.names().collect::<Vec<_>>().join(", "));
        }
        println!();
    }

    fn finish(&mut self) {}
}

#[derive(Serialize)]
struct SuggestionRequest {
    word: String,
    is_correct: bool,
    suggestions: Vec<SmolStr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    actions: Option<Actions>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonWriter {
    results: Vec<SuggestionRequest>,
}

impl JsonWriter {
    pub fn new() -> JsonWriter {
        JsonWriter { results: vec![] }
    }
}

impl OutputWriter for JsonWriter {
    fn write_correction(&mut self, word: &str, is_correct: bool) {
        self.results.push(SuggestionRequest {
            word: word.to_owned(),
            is_correct,
            suggestions: vec![],
            actions: None,
        });
    }

    fn write_suggestions(&mut self, _word: &str, suggestions: &[SmolStr], actions: Actions) {
        if let Some(last) = self.results.last_mut() {
            last.suggestions = suggestions.to_vec();
            last.actions = Some(actions);
        }
    }

    fn finish(&mut self) {
        match serde_json::to_string_pretty(self) {
            Ok(v) => println!("{}", v),
            Err(e) => eprintln!("{}", e),
        }
    }
}

#[derive(Debug, Options)]
struct Args {
    #[options(help = "print help message")]
    help: bool,

    #[options(command)]
    command: Option<Command>,
}

#[derive(Debug, Options)]
enum Command {
    #[options(help = "spell-check text, one consumer per input")]
    Check(CheckArgs),

    #[options(help = "get suggestions for provided words")]
    Suggest(SuggestArgs),
}

#[derive(Debug, Options)]
struct CheckArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "word list to check against")]
    dictionary: Option<PathBuf>,

    #[options(help = "JSON engine configuration")]
    config: Option<PathBuf>,

    #[options(no_short, help = "capacity of the misspelling cache")]
    cache: Option<usize>,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "texts to be checked")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct SuggestArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "word list to check against")]
    dictionary: Option<PathBuf>,

    #[options(help = "JSON engine configuration")]
    config: Option<PathBuf>,

    #[options(short = "S", help = "always show suggestions even if word is correct")]
    always_suggest: bool,

    #[options(short = "n", help = "maximum number of results")]
    nbest: Option<usize>,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "words to be processed")]
    inputs: Vec<String>,
}

fn read_inputs(inputs: Vec<String>) -> anyhow::Result<Vec<String>> {
    if !inputs.is_empty() {
        return Ok(inputs);
    }

    eprintln!("Reading from stdin...");
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer
        .lines()
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect())
}

fn load_config(
    config: Option<PathBuf>,
    dictionary: Option<PathBuf>,
) -> anyhow::Result<EngineConfig> {
    let mut config = match config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };

    if let Some(path) = dictionary {
        config.dictionary = Some(path);
        config.backend = Some("wordlist".into());
    }

    Ok(config)
}

fn make_writer(use_json: bool) -> Box<dyn OutputWriter> {
    if use_json {
        Box::new(JsonWriter::new())
    } else {
        Box::new(StdoutWriter)
    }
}

/// Collects notifications until every consumer in `consumers` completed.
fn collect(
    rx: &mpsc::Receiver<Notification>,
    consumers: &[ConsumerId],
) -> anyhow::Result<Vec<Notification>> {
    let mut remaining = consumers.len();
    let mut out = vec![];

    while remaining > 0 {
        let notification = rx.recv()?;
        if let Notification::Completed { consumer } = notification {
            if consumers.contains(&consumer) {
                remaining -= 1;
            }
            continue;
        }
        out.push(notification);
    }

    Ok(out)
}

fn check(args: CheckArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config, args.dictionary)?;
    if let Some(v) = args.cache {
        config.cache_capacity = v;
    }

    let inputs = read_inputs(args.inputs)?;
    let (tx, rx) = mpsc::channel();
    let engine = Engine::with_registry(config, &BackendRegistry::with_defaults(), tx)?;

    let mut consumers = Vec::with_capacity(inputs.len());
    for input in inputs.iter() {
        let consumer = engine.register_consumer();
        for (offset, word) in WordBoundIndices::new(input) {
            if word.chars().any(char::is_alphanumeric) {
                engine.spell(consumer, word, offset as i64);
            }
        }
        engine.complete(consumer);
        consumers.push(consumer);
    }

    let notifications = collect(&rx, &consumers)?;
    engine.shutdown();

    let mut writer = make_writer(args.use_json);
    for consumer in consumers {
        for notification in notifications.iter() {
            match notification {
                Notification::Misspelled {
                    consumer: c,
                    word,
                    is_misspelled,
                    ..
                } if *c == consumer => writer.write_correction(word, !is_misspelled),
                _ => {}
            }
        }
    }
    writer.finish();

    Ok(())
}

fn suggest(args: SuggestArgs) -> anyhow::Result<()> {
    let config = load_config(args.config, args.dictionary)?;
    let nbest = args.nbest.unwrap_or(config.max_suggestions);

    let words = read_inputs(args.inputs)?;
    let (tx, rx) = mpsc::channel();
    let engine = Engine::with_registry(config, &BackendRegistry::with_defaults(), tx)?;

    let consumer = engine.register_consumer();
    for word in words.iter() {
        engine.spell(consumer, word, 0);
        engine.request_suggestions(consumer, word, nbest);
    }
    engine.complete(consumer);

    let notifications = collect(&rx, &[consumer])?;
    engine.shutdown();

    let mut writer = make_writer(args.use_json);
    let mut is_correct = true;
    for notification in notifications.iter() {
        match notification {
            Notification::Misspelled {
                word,
                is_misspelled,
                ..
            } => {
                is_correct = !is_misspelled;
                writer.write_correction(word, is_correct);
            }
            Notification::SuggestionsFound {
                word,
                suggestions,
                actions,
                ..
            } if args.always_suggest || !is_correct => {
                writer.write_suggestions(word, suggestions, *actions);
            }
            _ => {}
        }
    }
    writer.finish();

    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse_args_default_or_exit();

    match args.command {
        None => Ok(()),
        Some(Command::Check(args)) => check(args),
        Some(Command::Suggest(args)) => suggest(args),
    }
}
