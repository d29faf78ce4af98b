/// Explicit five point heat stencil.
///
/// `next = center + c * (up + right + down + left - 4 * center)`
/// with `c = time_step * diffusivity / spacing^2`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FivePointStencil {
    coefficient: f64,
}

impl FivePointStencil {
    pub fn new(coefficient: f64) -> Self {
        FivePointStencil { coefficient }
    }

    #[inline(always)]
    pub fn apply(
        &self,
        center: f64,
        up: f64,
        right: f64,
        down: f64,
        left: f64,
    ) -> f64 {
        center
            + self.coefficient * (up + right + down + left - 4.0 * center)
    }

    /// Update a band of consecutive interior rows.
    ///
    /// `current` is the whole grid, `next_band` is the slice of the next
    /// grid holding rows `first_row..first_row + next_band.len() / cols`.
    /// Border columns of the band are left untouched.
    /// Returns the largest absolute change in the band.
    pub fn sweep_band(
        &self,
        current: &[f64],
        next_band: &mut [f64],
        cols: usize,
        first_row: usize,
    ) -> f64 {
        debug_assert!(cols >= 3);
        debug_assert!(first_row >= 1);
        debug_assert_eq!(next_band.len() % cols, 0);
        debug_assert!(
            (first_row + next_band.len() / cols + 1) * cols <= current.len()
        );

        let mut max_change = 0.0;
        for (b, next_row) in next_band.chunks_exact_mut(cols).enumerate() {
            let i = first_row + b;
            let up = &current[(i - 1) * cols..i * cols];
            let row = &current[i * cols..(i + 1) * cols];
            let down = &current[(i + 1) * cols..(i + 2) * cols];
            for j in 1..cols - 1 {
                let center = row[j];
                let value =
                    self.apply(center, up[j], row[j + 1], down[j], row[j - 1]);
                next_row[j] = value;
                // NaN changes never win
                let change = (center - value).abs();
                if change > max_change {
                    max_change = change;
                }
            }
        }
        max_change
    }
}
