//! File pipeline.
//!
//! Streams input files line by line through a [`LineScorer`] and writes every
//! retained line, with its weight appended, to
//! `<destination>/<input stem><extension>`. The output file is truncated when
//! a file starts and filled strictly in input order. Input is decoded with
//! the configured encoding; output is always UTF-8.
//!
//! Lines whose configured fields are missing are skipped with a warning and
//! counted; they never abort the run. I/O failures do abort it, after the
//! lines already scored have been flushed.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::scoring::LineScorer;
use sieve_types::ScoringConfig;

/// Pipeline error type.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The input path does not exist.
    #[error("path or file {} does not exist", .0.display())]
    MissingInput(PathBuf),

    /// The destination directory could not be created.
    #[error("failed to create destination {}: {source}", .path.display())]
    Destination {
        /// Destination directory.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The output path names the input file itself.
    #[error("output for {} would overwrite the input", .0.display())]
    OverwritesInput(PathBuf),

    /// Two inputs of one directory map to the same output file.
    #[error(
        "{} and {} would both be written to {}",
        .first.display(),
        .second.display(),
        .output.display()
    )]
    OutputCollision {
        /// Shared output path.
        output: PathBuf,
        /// Input listed first.
        first: PathBuf,
        /// Input listed second.
        second: PathBuf,
    },

    /// An input file or directory could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// Input path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An output file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl PipelineError {
    /// Process exit status for this error.
    pub const fn exit_code(&self) -> u8 {
        match self {
            PipelineError::MissingInput(_) => 1,
            _ => 13,
        }
    }
}

/// Error from [`score_stream`], split by side so callers can attach paths.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Reading the input failed.
    #[error("read failed: {0}")]
    Read(#[source] io::Error),
    /// Writing the output failed.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

/// Per-run settings that are not part of the scoring configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Directory receiving the output files.
    pub destination: PathBuf,
    /// Output extension with its leading dot.
    pub extension: String,
    /// Input text encoding; must be ASCII compatible.
    pub encoding: &'static Encoding,
}

/// Line counters for one stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Lines read, blank ones included.
    pub lines_read: u64,
    /// Lines written to the output.
    pub lines_retained: u64,
    /// Lines skipped because a configured field was missing.
    pub lines_skipped: u64,
}

/// Outcome of one analysed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Input file.
    pub input: PathBuf,
    /// Output file.
    pub output: PathBuf,
    /// Line counters.
    pub stats: StreamStats,
}

/// Output path for `input`: its stem plus the extension, inside the destination.
pub fn output_path(input: &Path, settings: &RunSettings) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| "output".into());
    settings
        .destination
        .join(format!("{stem}{}", settings.extension))
}

/// Scores every line of `reader` and writes retained ones to `writer`.
///
/// Each line is decoded with `encoding` (malformed bytes replaced) and
/// trimmed; the trimmed line is what gets scored and written. Blank lines
/// are skipped silently. Lines are split on `\n`, so `encoding` must be
/// ASCII compatible.
pub fn score_stream<R, W>(
    mut reader: R,
    writer: &mut W,
    scorer: &mut LineScorer<'_>,
    encoding: &'static Encoding,
) -> Result<StreamStats, StreamError>
where
    R: BufRead,
    W: Write,
{
    let separator = scorer.config().separator.as_str();
    let mut stats = StreamStats::default();
    let mut buf = Vec::with_capacity(1024);

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).map_err(StreamError::Read)? == 0 {
            break;
        }
        stats.lines_read += 1;

        let (decoded, malformed) = encoding.decode_without_bom_handling(&buf);
        if malformed {
            debug!(line = stats.lines_read, encoding = encoding.name(), "malformed bytes replaced");
        }

        let line = decoded.trim();
        if line.is_empty() {
            continue;
        }

        match scorer.score_line(line) {
            Ok(Some(weight)) => {
                writeln!(writer, "{line}{separator}{weight}").map_err(StreamError::Write)?;
                stats.lines_retained += 1;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(line = stats.lines_read, error = %e, "skipping line");
                stats.lines_skipped += 1;
            }
        }
    }

    Ok(stats)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Analyses one input file.
///
/// # Errors
///
/// Besides I/O failures, returns [`PipelineError::OverwritesInput`] without
/// touching anything when the output path resolves to `input` itself.
pub fn analyse_file(
    input: &Path,
    config: &ScoringConfig,
    settings: &RunSettings,
) -> Result<FileReport, PipelineError> {
    info!(file = %input.display(), "started parsing file");
    let output = output_path(input, settings);
    if same_file(input, &output) {
        return Err(PipelineError::OverwritesInput(input.to_path_buf()));
    }
    info!(output = %output.display(), "result will be saved");

    let read_error = |source| PipelineError::Read {
        path: input.to_path_buf(),
        source,
    };
    let write_error = |source| PipelineError::Write {
        path: output.clone(),
        source,
    };

    let reader = File::open(input).map(BufReader::new).map_err(read_error)?;
    let mut writer = File::create(&output).map(BufWriter::new).map_err(write_error)?;

    let mut scorer = LineScorer::new(config);
    let result = score_stream(reader, &mut writer, &mut scorer, settings.encoding);
    let flushed = writer.flush();

    let stats = result.map_err(|e| match e {
        StreamError::Read(source) => read_error(source),
        StreamError::Write(source) => write_error(source),
    })?;
    flushed.map_err(write_error)?;

    info!(
        rows_saved = stats.lines_retained,
        rows_skipped = stats.lines_skipped,
        file = %input.display(),
        "analysis completed"
    );

    Ok(FileReport {
        input: input.to_path_buf(),
        output,
        stats,
    })
}

/// Analyses a file, or every regular file directly inside a directory.
///
/// Directory entries are processed in name order. Files that already carry
/// the output extension are left alone so a destination inside the input
/// directory is not fed back into the run. If two entries would share an
/// output file (`a.csv` and `a.txt`) the run fails before any file is
/// written.
pub fn analyse_path(
    input: &Path,
    config: &ScoringConfig,
    settings: &RunSettings,
) -> Result<Vec<FileReport>, PipelineError> {
    if !input.exists() {
        return Err(PipelineError::MissingInput(input.to_path_buf()));
    }

    fs::create_dir_all(&settings.destination).map_err(|source| PipelineError::Destination {
        path: settings.destination.clone(),
        source,
    })?;
    debug!(destination = %settings.destination.display(), "destination ready");

    if input.is_file() {
        return analyse_file(input, config, settings).map(|report| vec![report]);
    }

    let output_ext = settings.extension.strip_prefix('.').map(OsStr::new);
    let read_error = |source| PipelineError::Read {
        path: input.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(input).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if !path.is_file() {
            continue;
        }
        if output_ext.is_some() && path.extension() == output_ext {
            debug!(file = %path.display(), "skipping previous output");
            continue;
        }
        files.push(path);
    }
    files.sort();
    debug!(count = files.len(), dir = %input.display(), "input directory listed");

    let mut outputs: FxHashMap<PathBuf, &Path> = FxHashMap::default();
    for path in &files {
        let output = output_path(path, settings);
        if let Some(first) = outputs.get(&output) {
            return Err(PipelineError::OutputCollision {
                first: first.to_path_buf(),
                second: path.clone(),
                output,
            });
        }
        outputs.insert(output, path.as_path());
    }

    files
        .iter()
        .map(|path| analyse_file(path, config, settings))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_8, WINDOWS_1251};
    use sieve_types::{Distance, Domain, IgnoreSymbols, MatchMode, Rule, Suffix};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn config() -> ScoringConfig {
        ScoringConfig {
            separator: "|".into(),
            text_fields: vec![1],
            domain_field: 0,
            rule: Rule::new("cheap", 1.0),
            ignore: IgnoreSymbols::new(),
            suffixes: vec![Suffix::new("buy", 2.0, Distance::new(1, 0), MatchMode::Exact)],
            domains: vec![Domain::from_pattern("ru", 3.0)],
            default_domain_weight: 1.0,
        }
    }

    fn settings(destination: &Path) -> RunSettings {
        RunSettings {
            destination: destination.to_path_buf(),
            extension: ".ggs".into(),
            encoding: UTF_8,
        }
    }

    fn run_with(config: &ScoringConfig, input: &[u8], encoding: &'static Encoding) -> (String, StreamStats) {
        let mut scorer = LineScorer::new(config);
        let mut out = Vec::new();
        let stats = score_stream(Cursor::new(input), &mut out, &mut scorer, encoding).expect("in-memory io");
        (String::from_utf8(out).expect("utf8 output"), stats)
    }

    fn run(input: &[u8]) -> (String, StreamStats) {
        run_with(&config(), input, UTF_8)
    }

    #[test]
    fn retains_only_scored_lines_in_order() {
        let (out, stats) = run(
            b"http://a.ru|buy cheap meds now\nhttp://b.com|nothing here\nhttp://c.com|cheap\n",
        );
        assert_eq!(out, "http://a.ru|buy cheap meds now|9\nhttp://c.com|cheap|1\n");
        assert_eq!(
            stats,
            StreamStats {
                lines_read: 3,
                lines_retained: 2,
                lines_skipped: 0,
            }
        );
    }

    #[test]
    fn lines_are_trimmed_and_crlf_handled() {
        let (out, _) = run(b"  http://a.ru|cheap  \r\n");
        assert_eq!(out, "http://a.ru|cheap|3\n");
    }

    #[test]
    fn last_line_without_newline() {
        let (out, stats) = run(b"x|cheap");
        assert_eq!(out, "x|cheap|1\n");
        assert_eq!(stats.lines_read, 1);
    }

    #[test]
    fn blank_lines_are_not_skips() {
        let (out, stats) = run(b"\n   \nx|cheap\n");
        assert_eq!(out, "x|cheap|1\n");
        assert_eq!(stats.lines_read, 3);
        assert_eq!(stats.lines_skipped, 0);
    }

    #[test]
    fn short_lines_are_skipped_and_counted() {
        let (out, stats) = run(b"only-one-field\nx|cheap\n");
        assert_eq!(out, "x|cheap|1\n");
        assert_eq!(stats.lines_skipped, 1);
        assert_eq!(stats.lines_retained, 1);
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let (out, stats) = run(b"x|cheap \xff\xfe\n");
        assert_eq!(stats.lines_retained, 1);
        assert!(out.starts_with("x|cheap \u{FFFD}"));
    }

    #[test]
    fn windows_1251_input_is_decoded() {
        let mut config = config();
        config.rule = Rule::new("ДЕШЕВО", 1.0);
        // "x|купить дешево" in windows-1251.
        let input = b"x|\xea\xf3\xef\xe8\xf2\xfc \xe4\xe5\xf8\xe5\xe2\xee\n";

        let (out, _) = run_with(&config, input, WINDOWS_1251);
        assert_eq!(out, "x|купить дешево|1\n");

        let (out, _) = run_with(&config, input, UTF_8);
        assert!(out.is_empty());
    }

    #[test]
    fn output_path_uses_stem_and_extension() {
        let settings = settings(Path::new("/out"));
        assert_eq!(
            output_path(Path::new("/data/records.txt"), &settings),
            PathBuf::from("/out/records.ggs")
        );
        assert_eq!(
            output_path(Path::new("/data/archive.tar.gz"), &settings),
            PathBuf::from("/out/archive.tar.ggs")
        );
    }

    #[test]
    fn missing_input_exit_code() {
        let err = analyse_path(Path::new("/definitely/not/here"), &config(), &settings(Path::new(".")))
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingInput(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn refuses_to_overwrite_its_own_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("records.ggs");
        fs::write(&input, "x|cheap\n").unwrap();

        let err = analyse_path(&input, &config(), &settings(dir.path())).unwrap_err();
        assert!(matches!(err, PipelineError::OverwritesInput(_)));
        assert_eq!(err.exit_code(), 13);
        assert_eq!(fs::read_to_string(&input).unwrap(), "x|cheap\n");
    }

    #[test]
    fn same_stem_in_directory_is_rejected_before_writing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("a.csv"), "x|cheap one\n").unwrap();
        fs::write(input.join("a.txt"), "x|cheap two\n").unwrap();
        let out = dir.path().join("out");

        let err = analyse_path(&input, &config(), &settings(&out)).unwrap_err();
        match err {
            PipelineError::OutputCollision { output, first, second } => {
                assert_eq!(output, out.join("a.ggs"));
                assert_eq!(first, input.join("a.csv"));
                assert_eq!(second, input.join("a.txt"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!out.join("a.ggs").exists());
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_reported_as_write() {
        let config = config();
        let mut scorer = LineScorer::new(&config);
        let err = score_stream(Cursor::new(b"x|cheap\n"), &mut FailingWriter, &mut scorer, UTF_8)
            .unwrap_err();
        assert!(matches!(err, StreamError::Write(_)));
    }
}
