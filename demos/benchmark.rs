use rand::{rngs::SmallRng, Rng, SeedableRng};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use statrs::statistics::{Data, Distribution, Max, Min};
use tsp_firefly::{Params, Result, Solver, Tour, Tsp};

fn random_instance(n: usize, seed: u64) -> Result<Tsp> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let points = (0..n)
        .map(|_| (rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0)))
        .collect();
    Tsp::new(points)
}

fn main() -> Result<()> {
    let params = Params {
        generation_count: 200,
        ..Params::default()
    };

    let mut means: Vec<f64> = Vec::new();
    for (n, instance_seed) in [(10, 1), (25, 2), (50, 3), (100, 4)] {
        let tsp = random_instance(n, instance_seed)?;
        let naive = Tour::nearest_neighbor(&tsp).cost();
        let (cnts, scores): (Vec<_>, Vec<_>) = (0..12)
            .into_par_iter()
            .map(|seed| -> Result<(f64, f64)> {
                let mut s = Solver::new(&tsp, params, seed)?;
                let cnt = s.run();
                let val = s.solution().cost();
                Ok((cnt as f64, (naive - val) / naive))
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .unzip();
        let cnt_data = Data::new(cnts);
        let score_data = Data::new(scores);
        means.push(score_data.mean().unwrap_or(f64::NAN));

        println!(
            "{:>6}: [moves] min={:>6} max={:>6} mean={:>6.0} stdev={:>6.0} [gain vs nn] min={:.03} max={:.03} mean={:.03} stdev={:.03}",
            n,
            cnt_data.min(),
            cnt_data.max(),
            cnt_data.mean().unwrap_or(f64::NAN),
            cnt_data.std_dev().unwrap_or(f64::NAN),
            score_data.min(),
            score_data.max(),
            score_data.mean().unwrap_or(f64::NAN),
            score_data.std_dev().unwrap_or(f64::NAN)
        );
    }
    let mean_data = Data::new(means);
    println!(
        "mean: {:.03} stdev={:.03}",
        mean_data.mean().unwrap_or(f64::NAN),
        mean_data.std_dev().unwrap_or(f64::NAN)
    );
    Ok(())
}
