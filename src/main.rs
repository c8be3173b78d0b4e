use std::{fs::File, io, path::PathBuf, time::Instant};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{info, LevelFilter};
use tsp_firefly::{logging, Error, Params, Result, Solver, Tsp};

fn cli() -> Command {
    Command::new("tsp-firefly")
        .about("Approximates a Euclidean TSP tour with a firefly search and 2-opt moves")
        .arg(
            Arg::new("input")
                .long("input")
                .value_name("PATH")
                .help("Read points from a file instead of stdin")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Input format")
                .value_parser(["kattis", "tsplib"])
                .default_value("kattis"),
        )
        .arg(
            Arg::new("params")
                .long("params")
                .value_name("PATH")
                .help("JSON file with search parameters; flags below override it")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Random seed; drawn from OS entropy when omitted")
                .value_parser(value_parser!(u64)),
        )
        .arg(Arg::new("beta0").long("beta0").value_parser(value_parser!(f64)))
        .arg(Arg::new("gamma").long("gamma").value_parser(value_parser!(f64)))
        .arg(
            Arg::new("population")
                .long("population")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("generations")
                .long("generations")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("summary")
                .long("summary")
                .help("Print the total distance after the tour")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .help("off, error, warn, info, debug or trace")
                .default_value("warn"),
        )
}

fn params_from(matches: &ArgMatches) -> Result<Params> {
    let mut params = match matches.get_one::<PathBuf>("params") {
        Some(path) => Params::from_path(path)?,
        None => Params::default(),
    };
    if let Some(&beta0) = matches.get_one::<f64>("beta0") {
        params.beta0 = beta0;
    }
    if let Some(&gamma) = matches.get_one::<f64>("gamma") {
        params.gamma = gamma;
    }
    if let Some(&population) = matches.get_one::<usize>("population") {
        params.population_size = population;
    }
    if let Some(&generations) = matches.get_one::<usize>("generations") {
        params.generation_count = generations;
    }
    Ok(params)
}

fn read_tsp(matches: &ArgMatches) -> Result<Tsp> {
    let tsplib = matches.get_one::<String>("format").map(String::as_str) == Some("tsplib");
    match matches.get_one::<PathBuf>("input") {
        Some(path) if tsplib => Tsp::parse_tsp_file(File::open(path)?),
        Some(path) => Tsp::parse_kattis(File::open(path)?),
        None if tsplib => Tsp::parse_tsp_file(io::stdin().lock()),
        None => Tsp::parse_kattis(io::stdin().lock()),
    }
}

fn main() -> Result<()> {
    let now = Instant::now();
    let matches = cli().get_matches();

    let level = matches
        .get_one::<String>("log-level")
        .map_or(Ok(LevelFilter::Warn), |s| s.parse::<LevelFilter>())
        .map_err(|e| Error::invalid_params(format!("log level: {e}")))?;
    logging::init_logger(level)?;

    let params = params_from(&matches)?;
    let seed = matches
        .get_one::<u64>("seed")
        .copied()
        .unwrap_or_else(rand::random);
    let t = read_tsp(&matches)?;
    info!("input: n={} seed={seed}", t.n());

    let mut s = Solver::new(&t, params, seed)?;
    s.run();
    let best = s.solution();
    for x in best.seq() {
        println!("{}", x);
    }
    if matches.get_flag("summary") {
        println!("Total distance: {}", best.cost());
    }

    info!(
        "output: n={} cost={:.4} time={:.2}s",
        best.len(),
        best.cost(),
        now.elapsed().as_secs_f32()
    );
    Ok(())
}
