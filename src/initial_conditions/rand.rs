use crate::grid::*;
use rand::prelude::*;
use rayon::prelude::*;

/// Uniform random integers in `[0, max_val)`, drawn independently by
/// every chunk.
pub fn rand_ic(grid: &mut Grid, max_val: i32, chunk_size: usize) {
    let max_val = max_val.max(1);
    grid.buffer_mut().par_chunks_mut(chunk_size.max(1)).for_each(
        |chunk: &mut [f64]| {
            let mut rng = rand::thread_rng();
            chunk.iter_mut().for_each(|value_mut| {
                *value_mut = rng.gen_range(0..max_val) as f64;
            })
        },
    );
}
