use crate::config::Config;
use crate::error::{Error, Result};
use crate::extract::RecordExtractor;
use crate::types::{CsvSource, PullRequestRecord};
use async_stream::stream;
use futures::Stream;
use jwalk::WalkDir;

/// Batch processor for archived event CSV files.
///
/// Discovers every `.csv` file under the configured input directory and
/// yields one classified record per qualifying row. Rows that are malformed,
/// lack a pull request, or fail the relevance filter are skipped, never
/// surfaced as errors; a single skip count goes to stderr at the end.
pub struct BatchProcessor {
    config: Config,
}

impl BatchProcessor {
    /// Create a new processor with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Process the batch and return a stream of classified records
    pub fn process(&self) -> impl Stream<Item = Result<PullRequestRecord>> {
        let config = self.config.clone();
        let config_for_discovery = config.clone();
        Box::pin(stream! {
            let extractor = match RecordExtractor::new(&config) {
                Ok(extractor) => extractor,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            // Discovery runs in the blocking thread pool; jwalk is fast but
            // synchronous
            let files = match tokio::task::spawn_blocking(move || {
                Self::discover_files_internal(&config_for_discovery)
            }).await {
                Ok(Ok(files)) => files,
                Ok(Err(e)) => {
                    yield Err(e);
                    return;
                }
                Err(e) => {
                    yield Err(Error::Io(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        format!("Task join error: {}", e)
                    )));
                    return;
                }
            };

            let mut emitted = 0usize;
            let mut skipped = 0usize;

            'files: for file in files {
                let content = match tokio::fs::read_to_string(&file.path).await {
                    Ok(content) => content,
                    Err(e) => {
                        yield Err(Error::Io(e));
                        continue;
                    }
                };

                let mut reader = csv::ReaderBuilder::new()
                    .flexible(true)
                    .from_reader(content.as_bytes());

                let payload_index = match reader.headers() {
                    Ok(headers) => headers.iter().position(|h| h == "payload"),
                    Err(e) => {
                        yield Err(Error::Csv(e));
                        continue;
                    }
                };

                let Some(payload_index) = payload_index else {
                    eprintln!(
                        "Warning: no payload column in {}, skipping file",
                        file.relative_path
                    );
                    continue;
                };

                for row in reader.records() {
                    // A malformed row is a per-row skip, never a batch abort
                    let row = match row {
                        Ok(row) => row,
                        Err(_) => {
                            skipped += 1;
                            continue;
                        }
                    };

                    let payload = row.get(payload_index).unwrap_or("{}");
                    match extractor.extract(payload) {
                        Some(record) => {
                            emitted += 1;
                            yield Ok(record);
                            if let Some(limit) = config.limit {
                                if emitted >= limit {
                                    break 'files;
                                }
                            }
                        }
                        None => skipped += 1,
                    }
                }
            }

            if skipped > 0 {
                eprintln!("Skipped {} rows without a qualifying pull request", skipped);
            }
        })
    }

    /// Discover all CSV files under the input directory, sorted by relative
    /// path for deterministic output ordering.
    /// Uses jwalk for fast parallel filesystem traversal
    fn discover_files_internal(config: &Config) -> Result<Vec<CsvSource>> {
        let mut files = Vec::new();

        for entry_result in WalkDir::new(&config.input_dir).into_iter() {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(_) => continue,
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().map(|ext| ext == "csv").unwrap_or(false) {
                let relative_path = path
                    .strip_prefix(&config.input_dir)
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_else(|_| path.to_string_lossy().to_string());

                files.push(CsvSource {
                    path: path.to_path_buf(),
                    relative_path,
                });
            }
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(files)
    }
}
