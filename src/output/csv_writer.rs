//! CSV export of collected company records

use crate::record::CompanyRecord;
use crate::ScrapeError;
use std::fs;
use std::path::Path;

/// Column header, in output order
pub const HEADER: [&str; 4] = ["company_name", "tags", "overview", "website"];

/// Writes `records` to `path`, replacing any existing file
///
/// Columns are `company_name,tags,overview,website`; tags are joined with
/// `tags_separator`. Fields containing delimiters, quotes or line breaks are
/// quoted per RFC 4180. Missing parent directories are created.
///
/// # Returns
///
/// The number of data rows written.
pub fn write_csv(
    records: &[CompanyRecord],
    path: &Path,
    tags_separator: &str,
) -> Result<usize, ScrapeError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let write_error = |source: csv::Error| ScrapeError::Write {
        path: path.display().to_string(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(write_error)?;
    writer.write_record(HEADER).map_err(write_error)?;

    for record in records {
        writer
            .write_record([
                record.name.as_str(),
                record.joined_tags(tags_separator).as_str(),
                record.overview.as_str(),
                record.website.as_str(),
            ])
            .map_err(write_error)?;
    }

    writer.flush().map_err(|e| write_error(e.into()))?;

    tracing::info!("Saved {} companies to {}", records.len(), path.display());
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(name: &str, tags: &[&str], overview: &str, website: &str) -> CompanyRecord {
        CompanyRecord {
            slug: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            overview: overview.to_string(),
            website: website.to_string(),
        }
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        assert_eq!(reader.headers().unwrap().iter().collect::<Vec<_>>(), HEADER);
        reader
            .records()
            .map(|row| row.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_round_trip_with_delimiters_and_quotes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("companies.csv");
        let records = vec![
            record(
                "Wind River",
                &["Cyber", "Land"],
                r#"Software, services and "edge" computing"#,
                "https://www.windriver.com",
            ),
            record("Acme, Ltd", &[], "Line one\nline two", ""),
        ];

        let written = write_csv(&records, &path, "; ").unwrap();
        assert_eq!(written, 2);

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            vec![
                "Wind River",
                "Cyber; Land",
                r#"Software, services and "edge" computing"#,
                "https://www.windriver.com"
            ]
        );
        assert_eq!(rows[1], vec!["Acme, Ltd", "", "Line one\nline two", ""]);
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("companies.csv");
        fs::write(&path, "stale,content\n1,2\n3,4\n5,6\n").unwrap();

        write_csv(&[record("Only One", &[], "", "")], &path, "; ").unwrap();

        assert_eq!(read_rows(&path).len(), 1);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("processed").join("out.csv");

        write_csv(&[], &path, "; ").unwrap();

        assert!(path.exists());
        assert!(read_rows(&path).is_empty());
    }

    #[test]
    fn test_unwritable_path_is_write_error() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened as the output file
        let result = write_csv(&[], dir.path(), "; ");
        assert!(matches!(result, Err(ScrapeError::Write { .. })));
    }
}
