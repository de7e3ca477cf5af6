use clap::{value_parser, Arg, Command, ValueHint};
use cyclops_cli::input::Input;
use cyclops_cli::runner::Runner;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::default()
        .filter_level(log::LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or(
            "CYCLOPS_LOG",
            "error,cyclops_core=info,cyclops_cli=info",
        ))
        .init();

    let matches = Command::new("cyclops")
        .version(clap::crate_version!())
        .about("De novo sequencing of cyclic peptides from integer mass spectra")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("table")
                .short('t')
                .long("table")
                .global(true)
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help(
                    "Path to a JSON mass table (object of single-character residue \
                     to integer mass) replacing the built-in standard table",
                )
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .help("Emit results as JSON instead of plain text"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .global(true)
                .value_parser(value_parser!(usize))
                .help("Number of worker threads for candidate scoring (default = # of CPUs)")
                .value_hint(ValueHint::Other),
        )
        .subcommand(
            Command::new("sequence")
                .about(
                    "Find the cyclic peptide whose theoretical spectrum best explains \
                     an experimental one",
                )
                .arg(
                    Arg::new("input")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help(
                            "Path to the problem text (defaults to stdin): leaderboard \
                             width on the first line, spectrum masses on the second",
                        )
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("score")
                .about("Score one linear peptide against an experimental spectrum")
                .arg(
                    Arg::new("input")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help(
                            "Path to the problem text (defaults to stdin): peptide \
                             symbols on the first line, spectrum masses on the second",
                        )
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .get_matches();

    let threads = matches
        .get_one::<usize>("threads")
        .copied()
        .unwrap_or_else(num_cpus::get);

    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .expect("configure rayon pool");

    let line = match matches.subcommand() {
        Some(("sequence", matches)) => Runner::new(Input::from_arguments(matches)?).sequence()?,
        Some(("score", matches)) => Runner::new(Input::from_arguments(matches)?).score()?,
        _ => unreachable!("clap enforces a subcommand"),
    };

    println!("{}", line);
    Ok(())
}
