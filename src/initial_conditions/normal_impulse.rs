use crate::grid::*;

/// Generate normal like distribution over the grid with spike in the
/// middle, all values are in [0, 1].
pub fn normal_ic(grid: &mut Grid, variance: f64, chunk_size: usize) {
    let width_f = grid.cols() as f64;
    let height_f = grid.rows() as f64;
    let sigma_sq: f64 = (width_f / variance) * (width_f / variance);
    let ic_gen = |row: usize, col: usize| {
        let x = (col as f64) - (width_f / 2.0);
        let y = (row as f64) - (height_f / 2.0);
        let r = (x * x + y * y).sqrt();
        let exp = -r * r / (2.0 * sigma_sq);
        exp.exp()
    };
    grid.par_set_values(ic_gen, chunk_size);
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn spike_in_the_middle() {
        let mut g = Grid::allocate(11, 11).unwrap();
        normal_ic(&mut g, 4.0, 10);
        let peak = g.get(5, 5);
        assert!(g.buffer().iter().all(|v| *v > 0.0 && *v <= peak));
        float_cmp::assert_approx_eq!(f64, g.get(4, 5), g.get(7, 5), ulps = 2);
    }
}
