//! Monthly row data structure and parsing logic for Hidroweb `vazoes` files.
//!
//! After a block of free-text header lines the file is a semicolon delimited
//! table with one row per month:
//!
//! ```text
//! EstacaoCodigo;NivelConsistencia;Data;Hora;MediaDiaria;...;Vazao01;...;Vazao31;Vazao01Status;...
//! 10100000;1;01/03/2021;01/01/1900 00:00:00;1;...;1234,5;...
//! ```

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use chrono::NaiveDate;
use csv::ByteRecord;

use crate::error::StationError;

pub const DAYS_PER_ROW: usize = 31;

const QUALITY_COLUMN: usize = 1;
const ANCHOR_COLUMN: usize = 2;
const FIRST_VALUE_COLUMN: usize = 16;
const MIN_COLUMNS: usize = FIRST_VALUE_COLUMN + DAYS_PER_ROW;

/// One month of daily values exactly as it appears in the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMonthlyRow {
    /// `NivelConsistencia`: 1 is provisional, 2 is consistent. `None` when the
    /// cell could not be read, which ranks below any flag.
    pub quality: Option<u8>,
    /// Date stamped on the row, nominally the first of the month.
    pub anchor: Option<NaiveDate>,
    /// Slot `k` holds day `k + 1`.
    pub values: [Option<f64>; DAYS_PER_ROW],
}

impl RawMonthlyRow {
    pub fn from_record(record: &ByteRecord) -> Self {
        let quality = cell(record, QUALITY_COLUMN).and_then(|s| parse_quality(&s));
        let anchor = cell(record, ANCHOR_COLUMN).and_then(|s| parse_anchor(&s));

        let mut values = [None; DAYS_PER_ROW];
        for (i, slot) in values.iter_mut().enumerate() {
            *slot = cell(record, FIRST_VALUE_COLUMN + i).and_then(|s| parse_value(&s));
        }

        RawMonthlyRow {
            quality,
            anchor,
            values,
        }
    }
}

/// Reads every monthly row of a station file, skipping `header_lines` lines
/// of preamble. The line after the preamble must be the column header row.
pub fn read_monthly_rows(
    path: &Path,
    header_lines: usize,
) -> Result<Vec<RawMonthlyRow>, StationError> {
    let file = File::open(path).map_err(|e| StationError::io(path, e))?;
    let mut reader = BufReader::new(file);

    let mut line = Vec::new();
    for _ in 0..header_lines {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(|e| StationError::io(path, e))?;
        if read == 0 {
            return Err(StationError::MissingHeader {
                path: path.to_path_buf(),
                header_lines,
            });
        }
    }

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header_len = csv_reader
        .byte_headers()
        .map_err(|e| StationError::csv(path, e))?
        .len();
    if header_len == 0 {
        return Err(StationError::MissingHeader {
            path: path.to_path_buf(),
            header_lines,
        });
    }
    if header_len < MIN_COLUMNS {
        return Err(StationError::ShortHeader {
            path: path.to_path_buf(),
            expected: MIN_COLUMNS,
            got: header_len,
        });
    }

    let mut rows = Vec::new();
    for record in csv_reader.byte_records() {
        let record = record.map_err(|e| StationError::csv(path, e))?;
        rows.push(RawMonthlyRow::from_record(&record));
    }

    Ok(rows)
}

// Source files are Latin-1, so cells are decoded lossily.
fn cell(record: &ByteRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_quality(s: &str) -> Option<u8> {
    s.parse().ok()
}

/// Parses a day-first `dd/mm/yyyy` date, ignoring any trailing time.
pub fn parse_anchor(s: &str) -> Option<NaiveDate> {
    let date = s.split_whitespace().next()?;
    NaiveDate::parse_from_str(date, "%d/%m/%Y").ok()
}

/// Parses a decimal-comma number such as `1234,5`.
pub fn parse_value(s: &str) -> Option<f64> {
    s.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

// -- Tests ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn data_line(quality: &str, anchor: &str, values: &[&str]) -> String {
        let mut fields = vec![
            "10100000".to_string(),
            quality.to_string(),
            anchor.to_string(),
        ];
        fields.extend((3..FIRST_VALUE_COLUMN).map(|_| String::new()));
        fields.extend(values.iter().map(|v| v.to_string()));
        fields.join(";")
    }

    fn header_line() -> String {
        let mut fields: Vec<String> = [
            "EstacaoCodigo",
            "NivelConsistencia",
            "Data",
            "Hora",
            "MediaDiaria",
            "MetodoObtencaoVazoes",
            "Maxima",
            "Minima",
            "Media",
            "DiaMaxima",
            "DiaMinima",
            "MaximaStatus",
            "MinimaStatus",
            "MediaStatus",
            "MediaAnual",
            "MediaAnualStatus",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        fields.extend((1..=31).map(|d| format!("Vazao{:02}", d)));
        fields.extend((1..=31).map(|d| format!("Vazao{:02}Status", d)));
        fields.join(";")
    }

    fn write_file(preamble: usize, body: &[String]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for _ in 0..preamble {
            // Latin-1 bytes for "Agência Nacional de Águas"
            file.write_all(b"//  Ag\xeancia Nacional de \xc1guas\r\n").unwrap();
        }
        for line in body {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn should_parse_decimal_comma() {
        assert_eq!(parse_value("1234,5"), Some(1234.5));
        assert_eq!(parse_value(" 3,2 "), Some(3.2));
        assert_eq!(parse_value("7"), Some(7.0));
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value(""), None);
    }

    #[test]
    fn should_parse_anchor_day_first() {
        assert_eq!(
            parse_anchor("01/03/2021"),
            NaiveDate::from_ymd_opt(2021, 3, 1)
        );
        assert_eq!(
            parse_anchor("31/03/2021 00:00:00"),
            NaiveDate::from_ymd_opt(2021, 3, 31)
        );
        assert_eq!(parse_anchor("2021-03-01"), None);
        assert_eq!(parse_anchor("31/02/2021"), None);
    }

    #[test]
    fn should_parse_record() {
        let mut values = vec!["5,0"; 31];
        values[1] = "x";
        values[30] = "";
        let line = data_line("2", "01/03/2021", &values);
        let record = ByteRecord::from(line.split(';').collect::<Vec<_>>());

        let row = RawMonthlyRow::from_record(&record);

        assert_eq!(row.quality, Some(2));
        assert_eq!(row.anchor, NaiveDate::from_ymd_opt(2021, 3, 1));
        assert_eq!(row.values[0], Some(5.0));
        assert_eq!(row.values[1], None);
        assert_eq!(row.values[30], None);
    }

    #[test]
    fn should_read_file_after_preamble() {
        let body = vec![
            header_line(),
            data_line("1", "01/03/2021", &["1,5"; 31]),
            String::new(),
            data_line("2", "01/04/2021", &["2,5"; 31]),
        ];
        let file = write_file(13, &body);

        let rows = read_monthly_rows(file.path(), 13).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].quality, Some(1));
        assert_eq!(rows[1].anchor, NaiveDate::from_ymd_opt(2021, 4, 1));
        assert_eq!(rows[1].values[30], Some(2.5));
    }

    #[test]
    fn should_treat_missing_cells_in_short_rows_as_missing() {
        let body = vec![header_line(), data_line("1", "01/03/2021", &["4,0"; 10])];
        let file = write_file(13, &body);

        let rows = read_monthly_rows(file.path(), 13).unwrap();

        assert_eq!(rows[0].values[9], Some(4.0));
        assert_eq!(rows[0].values[10], None);
    }

    #[test]
    fn should_reject_short_header() {
        let body = vec!["EstacaoCodigo;NivelConsistencia;Data".to_string()];
        let file = write_file(13, &body);

        let err = read_monthly_rows(file.path(), 13).unwrap_err();

        assert!(matches!(
            err,
            StationError::ShortHeader {
                expected: 47,
                got: 3,
                ..
            }
        ));
    }

    #[test]
    fn should_reject_truncated_preamble() {
        let file = write_file(5, &[]);

        let err = read_monthly_rows(file.path(), 13).unwrap_err();

        assert!(matches!(err, StationError::MissingHeader { .. }));
    }

    #[test]
    fn should_fail_on_missing_file() {
        let err = read_monthly_rows(Path::new("does/not/exist.txt"), 13).unwrap_err();
        assert!(matches!(err, StationError::Io { .. }));
    }
}
