//! Job manifest: one plate per line,
//! `<name> <time_step> <diffusivity> <spacing> <tolerance>`.
//! Blank lines and `#` comments are skipped.

use crate::error::*;
use crate::plate::*;
use std::io::prelude::*;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const FIELDS: usize = 5;

type ParseResult<T> = std::result::Result<T, String>;

fn field<T: FromStr>(value: &str, what: &str) -> ParseResult<T> {
    value
        .parse::<T>()
        .map_err(|_| format!("invalid {} '{}'", what, value))
}

/// Parse one manifest line, `Ok(None)` for lines without a record.
pub fn parse_record(line: &str) -> ParseResult<Option<PlateParams>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != FIELDS {
        return Err(format!(
            "expected {} fields, found {}",
            FIELDS,
            fields.len()
        ));
    }

    let params = PlateParams {
        name: fields[0].to_owned(),
        time_step: field(fields[1], "time step")?,
        diffusivity: field(fields[2], "diffusivity")?,
        spacing: field(fields[3], "spacing")?,
        tolerance: field(fields[4], "tolerance")?,
    };

    if !(params.diffusivity > 0.0) {
        return Err(format!(
            "diffusivity must be positive, got {}",
            params.diffusivity
        ));
    }
    if !(params.spacing > 0.0) {
        return Err(format!(
            "spacing must be positive, got {}",
            params.spacing
        ));
    }
    // Also rejects NaN, which would never converge
    if !(params.tolerance >= 0.0) {
        return Err(format!(
            "tolerance must be zero or more, got {}",
            params.tolerance
        ));
    }
    Ok(Some(params))
}

/// Iterator over the plate records of a manifest, in file order.
pub struct JobManifest<R> {
    path: PathBuf,
    lines: std::io::Lines<R>,
    line: usize,
}

impl JobManifest<std::io::BufReader<std::fs::File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::from_reader(std::io::BufReader::new(file), path))
    }
}

impl<R: BufRead> JobManifest<R> {
    /// `path` is only used for error messages.
    pub fn from_reader<P: Into<PathBuf>>(reader: R, path: P) -> Self {
        JobManifest {
            path: path.into(),
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for JobManifest<R> {
    type Item = Result<PlateParams>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(Error::io(&self.path, e))),
            };
            self.line += 1;
            match parse_record(&text) {
                Ok(Some(params)) => return Some(Ok(params)),
                Ok(None) => continue,
                Err(reason) => {
                    return Some(Err(Error::Manifest {
                        path: self.path.clone(),
                        line: self.line,
                        reason,
                    }))
                }
            }
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_record_test() {
        let p = parse_record("plate001.bin 1200 127 1000 2")
            .unwrap()
            .unwrap();
        assert_eq!(p.name, "plate001.bin");
        assert_eq!(p.time_step, 1200);
        assert_eq!(p.diffusivity, 127.0);
        assert_eq!(p.spacing, 1000.0);
        assert_eq!(p.tolerance, 2.0);

        let p = parse_record("\tp.bin  60 1e-3\t0.5 0 ").unwrap().unwrap();
        assert_eq!(p.diffusivity, 0.001);
        assert_eq!(p.tolerance, 0.0);
    }

    #[test]
    fn skipped_lines() {
        assert_eq!(parse_record(""), Ok(None));
        assert_eq!(parse_record("   \t"), Ok(None));
        assert_eq!(parse_record("# plate001.bin 1 1 1 1"), Ok(None));
    }

    #[test]
    fn malformed_records() {
        assert!(parse_record("p.bin 1 1 1").is_err());
        assert!(parse_record("p.bin 1 1 1 1 1").is_err());
        assert!(parse_record("p.bin -1 1 1 1").is_err());
        assert!(parse_record("p.bin 1.5 1 1 1").is_err());
        assert!(parse_record("p.bin 1 abc 1 1").is_err());
        assert!(parse_record("p.bin 1 1 0 1").is_err());
        assert!(parse_record("p.bin 1 -2 1 1").is_err());
        assert!(parse_record("p.bin 1 1 1 -0.5").is_err());
        assert!(parse_record("p.bin 1 1 1 NaN").is_err());
    }

    #[test]
    fn infinite_tolerance_accepted() {
        let p = parse_record("p.bin 1 1 1 inf").unwrap().unwrap();
        assert!(p.tolerance.is_infinite());
    }

    #[test]
    fn iterate_in_order() {
        let text = "# job\na.bin 1 1 1 1\n\nb.bin 2 2 2 2\n";
        let names: Vec<String> =
            JobManifest::from_reader(Cursor::new(text), "job.txt")
                .map(|r| r.unwrap().name)
                .collect();
        assert_eq!(names, vec!["a.bin", "b.bin"]);
    }

    #[test]
    fn error_reports_line() {
        let text = "a.bin 1 1 1 1\n\nb.bin 2 2\nc.bin 1 1 1 1\n";
        let mut manifest =
            JobManifest::from_reader(Cursor::new(text), "job.txt");
        assert!(manifest.next().unwrap().is_ok());
        match manifest.next() {
            Some(Err(Error::Manifest { path, line, .. })) => {
                assert_eq!(path, PathBuf::from("job.txt"));
                assert_eq!(line, 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_manifest() {
        assert!(matches!(
            JobManifest::open("/nonexistent/heatplate/job.txt"),
            Err(Error::Io { .. })
        ));
    }
}
