//! Per plate results: the summary table row, the converged snapshot and
//! optionally a heat map image.

use crate::error::*;
use crate::plate::*;
use crate::snapshot;
use std::ffi::OsString;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

/// Significant digits of `format_g`.
const PRECISION: usize = 6;

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Shortest float rendering in the style of C's `%g`:
/// six significant digits, trailing zeros removed, scientific notation
/// for exponents below -4 or from 6 up.
pub fn format_g(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_owned();
    }

    // Exponent after rounding to the target precision
    let scientific = format!("{:.*e}", PRECISION - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return scientific,
    };

    if exponent < -4 || exponent >= PRECISION as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (PRECISION as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_owned()
    }
}

/// Days since 1970-01-01 to a proleptic Gregorian `(year, month, day)`,
/// month and day starting at 1.
fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Simulated time as `YYYY/MM/DD\tHH:MM:SS`, counted from a zero epoch:
/// years since 1970, zero based month and day.
pub fn format_duration(seconds: u64) -> String {
    let days = (seconds / 86_400) as i64;
    let in_day = seconds % 86_400;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{:04}/{:02}/{:02}\t{:02}:{:02}:{:02}",
        year - 1970,
        month - 1,
        day - 1,
        in_day / 3600,
        (in_day / 60) % 60,
        in_day % 60
    )
}

/// `name` with its last extension replaced by `-<iterations>.<extension>`.
fn derived_name(name: &str, iterations: u64, extension: &str) -> PathBuf {
    let mut result: OsString = Path::new(name).with_extension("").into();
    result.push(format!("-{}.{}", iterations, extension));
    result.into()
}

/// `<name-without-extension>-<iterations>.bin`
pub fn output_snapshot_name(name: &str, iterations: u64) -> PathBuf {
    derived_name(name, iterations, "bin")
}

/// `<name-without-extension>-<iterations>.png`
pub fn output_image_name(name: &str, iterations: u64) -> PathBuf {
    derived_name(name, iterations, "png")
}

/// One tab separated summary line, without line terminator.
pub fn summary_row(plate: &Plate) -> String {
    let params = &plate.params;
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
        params.name,
        params.time_step,
        format_g(params.diffusivity),
        format_g(params.spacing),
        format_g(params.tolerance),
        plate.iterations,
        format_duration(plate.elapsed_seconds())
    )
}

/// Writes the results of every plate of a batch.
pub struct Reporter<W: Write> {
    summary: W,
    summary_path: PathBuf,
    prefix: PathBuf,
    write_images: bool,
}

impl Reporter<std::io::BufWriter<std::fs::File>> {
    /// Create (or truncate) the summary file.
    pub fn create<P: AsRef<Path>, Q: Into<PathBuf>>(
        summary_path: P,
        prefix: Q,
        write_images: bool,
    ) -> Result<Self> {
        let summary_path = summary_path.as_ref();
        let file = std::fs::File::create(summary_path)
            .map_err(|e| Error::io(summary_path, e))?;
        Ok(Reporter::new(
            std::io::BufWriter::new(file),
            summary_path,
            prefix,
            write_images,
        ))
    }
}

impl<W: Write> Reporter<W> {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(
        summary: W,
        summary_path: P,
        prefix: Q,
        write_images: bool,
    ) -> Self {
        Reporter {
            summary,
            summary_path: summary_path.into(),
            prefix: prefix.into(),
            write_images,
        }
    }

    pub fn snapshot_path(&self, plate: &Plate) -> PathBuf {
        self.prefix
            .join(output_snapshot_name(&plate.params.name, plate.iterations))
    }

    pub fn image_path(&self, plate: &Plate) -> PathBuf {
        self.prefix
            .join(output_image_name(&plate.params.name, plate.iterations))
    }

    /// Append the summary row, flushed so finished plates survive a later
    /// failure, then write the converged grid.
    pub fn report(&mut self, plate: &Plate) -> Result<()> {
        profiling::scope!("report");
        writeln!(self.summary, "{}", summary_row(plate))
            .and_then(|_| self.summary.flush())
            .map_err(|e| Error::io(&self.summary_path, e))?;

        snapshot::write_grid(self.snapshot_path(plate), plate.current())?;
        if self.write_images {
            let image_path = self.image_path(plate);
            crate::image::write_heat_map(&image_path, plate.current())?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.summary
    }
}
