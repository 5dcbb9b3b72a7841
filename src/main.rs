use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use chordify_cli::audio;
use chordify_cli::chordify::ChordCreator;
use chordify_cli::config::Config;
use chordify_cli::console;
use chordify_cli::model::melody::Melody;
use chordify_cli::pattern::melody::{format_melody, parse_melody};
use chordify_cli::rules::{decode, TriadBaroque, TriadBaroqueCypher};
use chordify_cli::storage;
use chordify_cli::theory::estimate::{KeyEstimator, ProfileEstimator};
use chordify_cli::theory::key::Key;

fn parse_key(raw: &str) -> Result<Key, String> {
    raw.parse().map_err(|e: chordify_cli::theory::key::KeyParseError| e.to_string())
}

fn melody_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("file")
            .value_name("FILE")
            .value_parser(value_parser!(PathBuf))
            .help("Melody file (.yaml, .json or .txt notation)"),
    )
    .arg(
        Arg::new("notes")
            .short('n')
            .long("notes")
            .value_name("TEXT")
            .conflicts_with("file")
            .help("Inline melody, e.g. \"B:1:10 F A G#\""),
    )
}

fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write the result to FILE (format from extension)")
}

fn secret_arg() -> Arg {
    Arg::new("secret")
        .short('s')
        .long("secret")
        .value_name("KEY")
        .value_parser(parse_key)
        .help("Cypher key (default from CHORDIFY_SECRET_KEY or A minor)")
}

fn cli() -> Command {
    Command::new("chordify")
        .about("Harmonize melodies into triad progressions and hide them in chord voicings")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print progress messages"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Only print the result"),
        )
        .subcommand(
            melody_args(Command::new("chords").about("Harmonize a melody"))
                .arg(
                    Arg::new("key")
                        .short('k')
                        .long("key")
                        .value_name("KEY")
                        .value_parser(parse_key)
                        .help("Key to harmonize in (default: melody file key, else estimated)"),
                )
                .arg(output_arg()),
        )
        .subcommand(
            melody_args(Command::new("encode").about("Hide a melody in a chord progression"))
                .arg(secret_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("decode")
                .about("Recover the melody hidden in a progression file")
                .arg(
                    Arg::new("file")
                        .value_name("FILE")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Progression file written by encode"),
                )
                .arg(secret_arg())
                .arg(output_arg()),
        )
        .subcommand(melody_args(
            Command::new("estimate").about("Estimate the key of a melody"),
        ))
        .subcommand(Command::new("keys").about("List the standard keys and their scales"))
        .subcommand(
            Command::new("play")
                .about("Play a progression file")
                .arg(
                    Arg::new("file")
                        .value_name("FILE")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("bpm")
                        .short('b')
                        .long("bpm")
                        .value_name("BPM")
                        .value_parser(value_parser!(u32).range(1..))
                        .help("Tempo (default from CHORDIFY_BPM or 90)"),
                ),
        )
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    console::set_verbose(matches.get_flag("verbose"));
    let quiet = matches.get_flag("quiet");
    let config = Config::from_env()?;

    match matches.subcommand() {
        Some(("chords", sub)) => run_chords(sub, &config, quiet),
        Some(("encode", sub)) => run_encode(sub, &config, quiet),
        Some(("decode", sub)) => run_decode(sub, &config, quiet),
        Some(("estimate", sub)) => run_estimate(sub, &config),
        Some(("keys", _)) => run_keys(),
        Some(("play", sub)) => run_play(sub, &config),
        Some((other, _)) => Err(anyhow!("unknown command: {}", other)),
        None => Err(anyhow!("no command given (try --help)")),
    }
}

fn load_melody(sub: &ArgMatches, config: &Config) -> Result<Melody> {
    if let Some(text) = sub.get_one::<String>("notes") {
        let notes = parse_melody(text).context("parsing --notes")?;
        if notes.is_empty() {
            bail!("--notes contains no notes");
        }
        return Ok(Melody::new(notes));
    }
    match sub.get_one::<PathBuf>("file") {
        Some(path) => storage::melody::open(path, config.format),
        None => bail!("give a melody FILE or --notes TEXT"),
    }
}

fn run_chords(sub: &ArgMatches, config: &Config, quiet: bool) -> Result<()> {
    let melody = load_melody(sub, config)?;
    let key = sub.get_one::<Key>("key").copied().or(melody.key);
    let creator = ChordCreator::new(&melody.notes, key)?;
    let progression = creator.chordify(&TriadBaroque)?;

    if !quiet {
        println!("key: {}", creator.key());
    }
    print!("{}", progression.list());
    if let Some(path) = sub.get_one::<PathBuf>("output") {
        storage::progression::save(&progression, path, config.format)?;
        console::info(format!("wrote {}", path.display()));
    }
    Ok(())
}

fn run_encode(sub: &ArgMatches, config: &Config, quiet: bool) -> Result<()> {
    let melody = load_melody(sub, config)?;
    let secret = sub
        .get_one::<Key>("secret")
        .copied()
        .unwrap_or(config.secret_key);
    let cypher = TriadBaroqueCypher::new(secret);
    let creator = ChordCreator::new(&melody.notes, melody.key)?;
    let progression = creator.chordify(&cypher)?;

    if !quiet {
        println!("carrier key: {}", creator.key());
    }
    print!("{}", progression.list());
    if let Some(path) = sub.get_one::<PathBuf>("output") {
        storage::progression::save(&progression, path, config.format)?;
        console::info(format!("wrote {}", path.display()));
    }
    Ok(())
}

fn run_decode(sub: &ArgMatches, config: &Config, quiet: bool) -> Result<()> {
    let path = sub
        .get_one::<PathBuf>("file")
        .ok_or_else(|| anyhow!("usage: decode <FILE>"))?;
    let secret = sub
        .get_one::<Key>("secret")
        .copied()
        .unwrap_or(config.secret_key);
    let progression = storage::progression::open(path, config.format)?;
    let notes = decode(&progression.chords, &secret)
        .with_context(|| format!("decoding {}", path.display()))?;

    if !quiet {
        println!("secret key: {}", secret);
    }
    println!("{}", format_melody(&notes));
    if let Some(out) = sub.get_one::<PathBuf>("output") {
        storage::melody::save(&Melody::new(notes).with_key(secret), out, config.format)?;
        console::info(format!("wrote {}", out.display()));
    }
    Ok(())
}

fn run_estimate(sub: &ArgMatches, config: &Config) -> Result<()> {
    let melody = load_melody(sub, config)?;
    let key = ProfileEstimator
        .estimate(&melody.notes)
        .ok_or_else(|| anyhow!("cannot estimate a key without notes"))?;
    println!("{}", key);
    if console::verbose() {
        let mut scores = ProfileEstimator::scores(&melody.notes);
        scores.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (candidate, score) in scores.iter().take(4) {
            console::info(format!("{:<10} {:.3}", candidate.to_string(), score));
        }
    }
    Ok(())
}

fn run_keys() -> Result<()> {
    for key in Key::standard() {
        let scale: Vec<String> = key.scale().iter().map(|p| p.to_string()).collect();
        println!("{:<10} {}", key.to_string(), scale.join(" "));
    }
    Ok(())
}

fn run_play(sub: &ArgMatches, config: &Config) -> Result<()> {
    let path = sub
        .get_one::<PathBuf>("file")
        .ok_or_else(|| anyhow!("usage: play <FILE>"))?;
    let bpm = sub.get_one::<u32>("bpm").copied().unwrap_or(config.bpm);
    let progression = storage::progression::open(path, config.format)?;
    audio::play(&progression.chords, bpm)
}
