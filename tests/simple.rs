use std::{fs::File, path::Path};

use tsp_firefly::{solve, total_distance, Error, Params, Solver, Tsp};

fn is_permutation(seq: &[usize], n: usize) -> bool {
    let mut v = seq.to_vec();
    v.sort_unstable();
    v == (0..n).collect::<Vec<_>>()
}

#[test]
fn unit_square() {
    let t = Tsp::new(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]).unwrap();
    let params = Params {
        population_size: 24,
        generation_count: 100,
        ..Params::default()
    };
    for seed in 0..4 {
        let best = solve(&t, params, seed).unwrap();
        assert_eq!(best.cost(), 4.0, "seed {seed}: {:?}", best.seq());
        assert_eq!(total_distance(best.seq(), t.points()), 4.0);
    }
}

#[test]
fn two_points() {
    let t = Tsp::new(vec![(0.0, 0.0), (5.0, 0.0)]).unwrap();
    let params = Params {
        population_size: 4,
        generation_count: 10,
        ..Params::default()
    };
    let best = solve(&t, params, 1).unwrap();
    assert_eq!(best.cost(), 10.0);
    assert!(is_permutation(best.seq(), 2));
}

#[test]
fn zero_generations_keeps_initial_population() {
    let t = File::open(Path::new("tests/data/sample.in"))
        .map_err(Error::from)
        .and_then(Tsp::parse_kattis)
        .unwrap();
    let params = Params {
        generation_count: 0,
        ..Params::default()
    };
    let mut s = Solver::new(&t, params, 99).unwrap();
    let initial = s.population().to_vec();
    assert_eq!(s.run(), 0);
    assert_eq!(s.population(), &initial[..]);

    let min = initial
        .iter()
        .map(|x| x.cost())
        .fold(f64::INFINITY, f64::min);
    assert_eq!(s.solution().cost(), min);
}

#[test]
fn search_never_loses_the_best_tour() {
    let t = File::open(Path::new("tests/data/sample.tsp"))
        .map_err(Error::from)
        .and_then(Tsp::parse_tsp_file)
        .unwrap();
    let params = Params {
        population_size: 12,
        generation_count: 50,
        ..Params::default()
    };
    let start = Solver::new(&t, Params { generation_count: 0, ..params }, 4234).unwrap();
    let mut s = Solver::new(&t, params, 4234).unwrap();
    s.run();

    assert!(s.solution().cost() <= start.solution().cost());
    assert_eq!(s.population().len(), 12);
    for tour in s.population() {
        assert!(is_permutation(tour.seq(), t.n()));
        assert_eq!(tour.cost(), total_distance(tour.seq(), t.points()));
    }
}

#[test]
fn same_seed_same_tour() {
    let t = File::open(Path::new("tests/data/sample.in"))
        .map_err(Error::from)
        .and_then(Tsp::parse_kattis)
        .unwrap();
    let params = Params {
        generation_count: 30,
        ..Params::default()
    };
    let a = solve(&t, params, 7).unwrap();
    let b = solve(&t, params, 7).unwrap();
    assert_eq!(a.seq(), b.seq());
}

#[test]
fn parsers_agree() {
    let kattis = File::open(Path::new("tests/data/sample.in"))
        .map_err(Error::from)
        .and_then(Tsp::parse_kattis)
        .unwrap();
    let tsplib = File::open(Path::new("tests/data/sample.tsp"))
        .map_err(Error::from)
        .and_then(Tsp::parse_tsp_file)
        .unwrap();
    assert_eq!(kattis.n(), 10);
    assert_eq!(kattis.points(), tsplib.points());
}

#[test]
fn bad_input() {
    assert!(matches!(
        Tsp::parse_tsp_file("NODE_COORD_SECTION\n1 0 0\n2 1\nEOF\n".as_bytes()),
        Err(Error::Parse { line: 3, .. })
    ));
    assert!(matches!(
        Tsp::parse_tsp_file("NAME : empty\nEOF\n".as_bytes()),
        Err(Error::InsufficientPoints { n: 0 })
    ));
}
