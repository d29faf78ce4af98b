use crate::plate::*;
use crate::solver::stencil::*;

/// Iterate a plate to equilibrium in the calling thread.
///
/// Same update and termination rule as the parallel solver, which must
/// reproduce this result bit for bit.
pub fn solve(plate: &mut Plate) {
    if !plate.has_interior() {
        log::debug!("{}: no interior cells, nothing to do", plate.params.name);
        return;
    }

    let (rows, cols) = (plate.rows(), plate.cols());
    let tolerance = plate.params.tolerance;
    let stencil = FivePointStencil::new(plate.params.diffusion_coefficient());

    let mut max_change = f64::INFINITY;
    while max_change > tolerance {
        profiling::scope!("serial sweep");
        let (current, next) = plate.grids.split_mut();
        let interior = &mut next.buffer_mut()[cols..(rows - 1) * cols];
        max_change = stencil.sweep_band(current.buffer(), interior, cols, 1);
        plate.grids.swap();
        plate.iterations += 1;
        log::trace!(
            "{}: iteration {} max change {}",
            plate.params.name,
            plate.iterations,
            max_change
        );
    }
}
