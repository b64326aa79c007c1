//! Fixtures shared by the unit tests of every module.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::distance::Metric;

/// 100 integer points on a 100x100 grid, as `f64` pairs.
pub(crate) fn grid_points() -> Vec<[f64; 2]> {
    let coords: Vec<[i32; 2]> = vec![
        [54, 1],
        [97, 21],
        [65, 35],
        [33, 54],
        [95, 39],
        [54, 3],
        [53, 54],
        [84, 72],
        [33, 34],
        [43, 15],
        [52, 83],
        [81, 23],
        [1, 61],
        [38, 74],
        [11, 91],
        [24, 56],
        [90, 31],
        [25, 57],
        [46, 61],
        [29, 69],
        [49, 60],
        [4, 98],
        [71, 15],
        [60, 25],
        [38, 84],
        [52, 38],
        [94, 51],
        [13, 25],
        [77, 73],
        [88, 87],
        [6, 27],
        [58, 22],
        [53, 28],
        [27, 91],
        [96, 98],
        [93, 14],
        [22, 93],
        [45, 94],
        [18, 28],
        [35, 15],
        [19, 81],
        [20, 81],
        [67, 53],
        [43, 3],
        [47, 66],
        [48, 34],
        [46, 12],
        [32, 38],
        [43, 12],
        [39, 94],
        [88, 62],
        [66, 14],
        [84, 30],
        [72, 81],
        [41, 92],
        [26, 4],
        [6, 76],
        [47, 21],
        [57, 70],
        [71, 82],
        [50, 68],
        [96, 18],
        [40, 31],
        [78, 53],
        [71, 90],
        [32, 14],
        [55, 6],
        [32, 88],
        [62, 32],
        [21, 67],
        [73, 81],
        [44, 64],
        [29, 50],
        [70, 5],
        [6, 22],
        [68, 3],
        [11, 23],
        [20, 42],
        [21, 73],
        [63, 86],
        [9, 40],
        [99, 2],
        [99, 76],
        [56, 77],
        [83, 6],
        [21, 72],
        [78, 30],
        [75, 53],
        [41, 11],
        [95, 20],
        [30, 38],
        [96, 82],
        [65, 48],
        [33, 18],
        [87, 28],
        [10, 10],
        [40, 34],
        [10, 20],
        [47, 29],
        [46, 78],
    ];

    coords
        .into_iter()
        .map(|[x, y]| [x.into(), y.into()])
        .collect()
}

/// `n` points drawn uniformly from the unit hypercube of dimension `dim`.
pub(crate) fn random_points(rng: &mut StdRng, n: usize, dim: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|_| (0..dim).map(|_| rng.gen::<f64>()).collect())
        .collect()
}

pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Indices of the `k` points closest to `query` by exhaustive scan, sorted.
pub(crate) fn brute_force<P: AsRef<[f64]>>(
    points: &[P],
    query: &[f64],
    k: usize,
    metric: &impl Metric<f64>,
) -> Vec<usize> {
    let mut distances: Vec<(f64, usize)> = points
        .iter()
        .enumerate()
        .map(|(i, point)| (metric.distance(point.as_ref(), query), i))
        .collect();
    distances.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut indices: Vec<usize> = distances.into_iter().take(k).map(|(_, i)| i).collect();
    indices.sort();
    indices
}
