use crate::error::*;
use crate::grid::*;
use std::path::Path;

/// Lowest and highest finite cell value.
fn finite_range(grid: &Grid) -> Option<(f64, f64)> {
    grid.buffer()
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Render a grid with the TURBO gradient, one pixel per cell, rows
/// top to bottom. Values are scaled to the grid's own range,
/// non finite cells are drawn with the low end of the gradient.
pub fn heat_map(grid: &Grid) -> Result<image::RgbImage> {
    let dimension_error = || Error::Dimensions {
        rows: grid.rows(),
        cols: grid.cols(),
    };
    let width = u32::try_from(grid.cols()).map_err(|_| dimension_error())?;
    let height = u32::try_from(grid.rows()).map_err(|_| dimension_error())?;

    let (lo, hi) = finite_range(grid).unwrap_or((0.0, 0.0));
    let scale = if hi > lo { 1.0 / (hi - lo) } else { 0.0 };
    let gradient = colorous::TURBO;

    let mut img = image::RgbImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let v = grid.get(y as usize, x as usize);
        let r = if v.is_finite() { (v - lo) * scale } else { 0.0 };
        *pixel = image::Rgb(gradient.eval_continuous(r).as_array());
    }
    Ok(img)
}

pub fn write_heat_map<P: AsRef<Path>>(path: &P, grid: &Grid) -> Result<()> {
    profiling::scope!("image::write_heat_map");
    let path = path.as_ref();
    log::debug!("Writing: {:?}", path);
    heat_map(grid)?.save(path).map_err(|source| Error::Image {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn heat_map_extremes() {
        let mut g = Grid::allocate(3, 4).unwrap();
        g.fill(10.0, 5);
        g.set(0, 3, 20.0);
        g.set(2, 1, f64::NAN);
        let img = heat_map(&g).unwrap();
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 3);

        let low = image::Rgb(colorous::TURBO.eval_continuous(0.0).as_array());
        let high = image::Rgb(colorous::TURBO.eval_continuous(1.0).as_array());
        assert_eq!(*img.get_pixel(0, 0), low);
        assert_eq!(*img.get_pixel(3, 0), high);
        assert_eq!(*img.get_pixel(1, 2), low);
    }

    #[test]
    fn flat_grid() {
        let mut g = Grid::allocate(2, 2).unwrap();
        g.fill(5.0, 1);
        let img = heat_map(&g).unwrap();
        let first = *img.get_pixel(0, 0);
        assert!(img.pixels().all(|p| *p == first));
    }
}
