//! Export the sales-allocation ranking to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts. The file handle lives only inside this function, so it is closed
//! on every exit path, including errors mid-write.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::AllocationRow;
use crate::error::{AppError, ErrorKind};

/// Write the region x channel x drug revenue ranking to a CSV file.
pub fn write_allocation_csv(path: &Path, rows: &[AllocationRow]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to create allocation CSV '{}': {e}", path.display()),
        )
    })?;

    writeln!(file, "region,channel,drug_name,revenue")
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to write allocation CSV header: {e}")))?;

    for row in rows {
        writeln!(
            file,
            "{},{},{},{:.2}",
            row.region, row.channel, row.drug, row.revenue
        )
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to write allocation CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_ranked_rows() {
        let mut path = std::env::temp_dir();
        path.push(format!("rx-sales-alloc-{}.csv", std::process::id()));

        let rows = vec![
            AllocationRow {
                region: "North".to_string(),
                channel: "Retail".to_string(),
                drug: "Drug A".to_string(),
                revenue: 150.0,
            },
            AllocationRow {
                region: "South".to_string(),
                channel: "Hospital".to_string(),
                drug: "Drug B".to_string(),
                revenue: 99.5,
            },
        ];

        write_allocation_csv(&path, &rows).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "region,channel,drug_name,revenue");
        assert_eq!(lines[1], "North,Retail,Drug A,150.00");
        assert_eq!(lines[2], "South,Hospital,Drug B,99.50");
    }
}
