use tsp_firefly::{solve, Params, Result, Tsp};

const POINTS: [(f64, f64); 10] = [
    (95.0129, 61.5432),
    (23.1139, 79.1937),
    (60.6843, 92.1813),
    (48.5982, 73.8207),
    (89.1299, 17.6266),
    (76.2097, 40.5706),
    (45.6468, 93.5470),
    (1.8504, 91.6904),
    (82.1407, 41.0270),
    (44.4703, 89.3650),
];

fn main() -> Result<()> {
    let tsp = Tsp::new(POINTS.to_vec())?;
    let params = Params {
        beta0: 5.0,
        gamma: 0.1,
        population_size: 50,
        generation_count: 10,
    };
    let best = solve(&tsp, params, rand::random())?;
    println!("Best path found: {:?}", best.seq());
    println!("Total distance: {}", best.cost());
    Ok(())
}
