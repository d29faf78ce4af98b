pub mod normal_impulse;
pub mod rand;
use crate::grid::*;
use crate::util::*;
use clap::ValueEnum;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum ICType {
    #[default]
    Zero,
    Rand {
        max_val: i32,
    },
    Impulse {
        variance: f64,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum, Default)]
pub enum ClapICType {
    #[default]
    Zero,
    Rand,
    Impulse,
}

impl ClapICType {
    pub fn to_ic_type(&self, dial: f64) -> ICType {
        match self {
            ClapICType::Zero => ICType::Zero,
            ClapICType::Rand => ICType::Rand {
                max_val: dial as i32,
            },
            ClapICType::Impulse => ICType::Impulse { variance: dial },
        }
    }
}

/// Fill the interior of `grid`, then pin every border cell to
/// `border_temperature`.
pub fn generate_ic(
    grid: &mut Grid,
    ic_type: ICType,
    border_temperature: f64,
    chunk_size: usize,
) {
    match ic_type {
        // Grids are allocated zero filled
        ICType::Zero => {}
        ICType::Rand { max_val } => {
            rand::rand_ic(grid, max_val, chunk_size);
        }
        ICType::Impulse { variance } => {
            normal_impulse::normal_ic(grid, variance, chunk_size);
        }
    }
    set_border(grid, border_temperature);
}

pub fn set_border(grid: &mut Grid, temperature: f64) {
    let (rows, cols) = (grid.rows(), grid.cols());
    for row in 0..rows {
        for col in 0..cols {
            if is_border(row, col, rows, cols) {
                grid.set(row, col, temperature);
            }
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn border_only() {
        let mut g = Grid::allocate(4, 5).unwrap();
        generate_ic(&mut g, ICType::Zero, 100.0, 3);
        for r in 0..4 {
            for c in 0..5 {
                let expected = if is_border(r, c, 4, 5) { 100.0 } else { 0.0 };
                assert_eq!(g.get(r, c), expected);
            }
        }
    }

    #[test]
    fn dial_mapping() {
        assert_eq!(ClapICType::Zero.to_ic_type(3.0), ICType::Zero);
        assert_eq!(
            ClapICType::Rand.to_ic_type(50.0),
            ICType::Rand { max_val: 50 }
        );
        assert_eq!(
            ClapICType::Impulse.to_ic_type(4.0),
            ICType::Impulse { variance: 4.0 }
        );
    }
}
