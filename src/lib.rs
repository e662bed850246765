pub mod args;
pub mod config;
pub mod errors;
pub mod extract;
pub mod report;

pub use args::{Cli, Commands, PipeArgs, ScanArgs};
pub use config::{ContentConfig, ScannerConfig};
pub use errors::{Result, ScanError};
pub use extract::{
    inline_classes, is_candidate, occurrences_from_content, occurrences_from_file,
    quoted_classes, ExtractorKind, RawToken, TokenOccurrence,
};
pub use report::{Report, ReportBuilder};

use indexmap::{IndexMap, IndexSet};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Security configuration
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Maximum file size in bytes (default: 10MB)
    pub max_file_size: u64,
    /// Allow symbolic links
    pub allow_symlinks: bool,
    /// Working directory for path traversal checks
    pub working_directory: PathBuf,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024, // 10MB
            allow_symlinks: false,
            working_directory: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

/// Main scan configuration
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub verbose: bool,
    pub jobs: Option<usize>,
    pub security: SecurityConfig,
}

impl From<&ScanArgs> for ScanOptions {
    fn from(args: &ScanArgs) -> Self {
        Self {
            verbose: args.verbose,
            jobs: args.jobs,
            security: SecurityConfig::default(),
        }
    }
}

/// Performance statistics
#[derive(Debug, Clone)]
pub struct PerformanceStats {
    pub total_duration: Duration,
    pub extraction_duration: Duration,
    pub files_per_second: f64,
    pub bytes_processed: u64,
}

/// Result of the scanning process
#[derive(Debug)]
pub struct ScanResult {
    /// Unique candidate tokens, in first-appearance order
    pub tokens: Vec<String>,
    pub report: serde_json::Value,
    pub total_tokens: usize,
    pub total_files_processed: usize,
    pub performance_stats: Option<PerformanceStats>,
}

/// Main scan entry point
pub async fn scan(args: ScanArgs) -> Result<ScanResult> {
    let start_time = Instant::now();

    // Validate arguments
    args.validate().map_err(ScanError::InvalidInput)?;

    // Create options
    let options = ScanOptions::from(&args);

    // Security: Validate output paths are safe
    validate_output_path(&args.output_tokens, &options.security)?;
    validate_output_path(&args.output_report, &options.security)?;

    // Load the scanner configuration if provided
    let config = match &args.config {
        Some(config_path) => ScannerConfig::from_file(config_path)?,
        None => ScannerConfig::default(),
    };
    config.validate()?;

    if options.verbose {
        eprintln!("Starting utility-class scan...");
        eprintln!("Input files: {}", args.input.len());
        eprintln!("Output tokens: {}", args.output_tokens.display());
        eprintln!("Output report: {}", args.output_report.display());
        eprintln!(
            "Security: max file size = {} MB",
            options.security.max_file_size / (1024 * 1024)
        );
    }

    // Collect readable input files
    let files = collect_input_files(&args.input, &args.exclude, &options.security)?;

    if files.is_empty() {
        return Err(ScanError::NoFilesFound);
    }

    if options.verbose {
        eprintln!("Found {} files to process", files.len());
        let total_size: u64 = files.iter().map(|f| f.1).sum();
        eprintln!("Total size: {:.2} MB", total_size as f64 / (1024.0 * 1024.0));
    }

    // Create multi-progress container for better progress reporting
    let multi_progress = if !options.verbose {
        MultiProgress::new()
    } else {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    };

    // Create main progress bar
    let progress_bar = if !options.verbose {
        let pb = multi_progress.add(ProgressBar::new(files.len() as u64));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})")
                .unwrap()
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        pb.set_message("Starting scan...");
        Some(pb)
    } else {
        None
    };

    // Extract occurrences from all files with progress tracking
    let extraction_start = Instant::now();

    let file_paths: Vec<PathBuf> = files.iter().map(|(path, _)| path.clone()).collect();
    let bytes_processed: u64 = files.iter().map(|f| f.1).sum();

    let occurrences = extract_occurrences_with_progress(
        &file_paths,
        &config,
        options.jobs,
        progress_bar.as_ref(),
    )?;

    let extraction_duration = extraction_start.elapsed();

    // Update progress bar
    if let Some(ref pb) = progress_bar {
        pb.set_message("Aggregating candidates...");
        pb.set_position(files.len() as u64);
    }

    // Collect unique candidate tokens with their locations
    let mut tokens: IndexSet<String> = IndexSet::new();
    let mut token_locations: IndexMap<String, Vec<String>> = IndexMap::new();

    for occurrence in &occurrences {
        if !is_candidate(&occurrence.value) {
            continue;
        }
        tokens.insert(occurrence.value.clone());
        token_locations
            .entry(occurrence.value.clone())
            .or_default()
            .push(format!(
                "{}:{}:{}",
                occurrence.file_path, occurrence.line, occurrence.column
            ));
    }

    if options.verbose {
        eprintln!(
            "Extracted {} unique candidates from {} total occurrences",
            tokens.len(),
            occurrences.len()
        );
    }

    // Build the report
    let report = ReportBuilder::new()
        .with_files_processed(files.len())
        .with_tokens_extracted(tokens.len())
        .with_token_info(token_locations)
        .build();

    // Calculate final statistics
    let total_duration = start_time.elapsed();
    let stats = PerformanceStats {
        total_duration,
        extraction_duration,
        files_per_second: files.len() as f64 / total_duration.as_secs_f64(),
        bytes_processed,
    };

    let result = ScanResult {
        tokens: tokens.into_iter().collect(),
        report: report.to_json(),
        total_tokens: report.metadata.tokens_extracted,
        total_files_processed: files.len(),
        performance_stats: Some(stats.clone()),
    };

    if let Some(pb) = progress_bar {
        pb.finish_with_message(format!("✓ Complete ({:.1} files/sec)", stats.files_per_second));
    }

    // Write output files if not in dry-run mode
    if !args.dry_run {
        write_output_files(&args, &result)?;
    }

    if options.verbose {
        eprintln!("\nScan complete:");
        eprintln!("  - Processed {} files", result.total_files_processed);
        eprintln!("  - Extracted {} unique candidates", result.total_tokens);
        eprintln!("\nPerformance:");
        eprintln!("  - Total time: {:.2}s", stats.total_duration.as_secs_f64());
        eprintln!("  - Extraction: {:.2}s", stats.extraction_duration.as_secs_f64());
        eprintln!("  - Processing rate: {:.1} files/sec", stats.files_per_second);
        eprintln!(
            "  - Data processed: {:.2} MB",
            stats.bytes_processed as f64 / (1024.0 * 1024.0)
        );
    }

    Ok(result)
}

/// Validate that a path is safe (no path traversal)
fn validate_output_path(path: &Path, security: &SecurityConfig) -> Result<()> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let working_dir = security
        .working_directory
        .canonicalize()
        .unwrap_or_else(|_| security.working_directory.clone());

    // Check if path is within working directory
    if !canonical.starts_with(&working_dir) && path.is_relative() {
        return Err(ScanError::SecurityError(format!(
            "Output path '{}' appears to use path traversal",
            path.display()
        )));
    }

    Ok(())
}

/// Check if a file is safe to read
fn validate_input_file(path: &Path, security: &SecurityConfig) -> Result<()> {
    // Check for symlinks if not allowed
    if !security.allow_symlinks && path.is_symlink() {
        return Err(ScanError::SecurityError(format!(
            "Symbolic link not allowed: {}",
            path.display()
        )));
    }

    // If it's a symlink and we allow them, validate the target
    if security.allow_symlinks && path.is_symlink() {
        let target = fs::read_link(path).map_err(|e| {
            ScanError::SecurityError(format!(
                "Cannot read symlink target for '{}': {}",
                path.display(),
                e
            ))
        })?;

        // Ensure target is within working directory
        let canonical_target = target.canonicalize().unwrap_or_else(|_| target.clone());
        let working_dir = security
            .working_directory
            .canonicalize()
            .unwrap_or_else(|_| security.working_directory.clone());

        if !canonical_target.starts_with(&working_dir) {
            return Err(ScanError::SecurityError(format!(
                "Symlink target '{}' is outside working directory",
                target.display()
            )));
        }
    }

    // Check file size
    let metadata = fs::metadata(path).map_err(|e| {
        ScanError::SecurityError(format!(
            "Cannot read file metadata for '{}': {}",
            path.display(),
            e
        ))
    })?;

    if metadata.len() > security.max_file_size {
        return Err(ScanError::SecurityError(format!(
            "File '{}' exceeds maximum size limit ({} MB > {} MB)",
            path.display(),
            metadata.len() / (1024 * 1024),
            security.max_file_size / (1024 * 1024)
        )));
    }

    Ok(())
}

/// Collect the given input files with security checks.
///
/// Glob expansion is the host build tool's job; inputs arrive as explicit
/// paths and are only filtered here.
fn collect_input_files(
    paths: &[PathBuf],
    exclude_patterns: &[String],
    security: &SecurityConfig,
) -> Result<Vec<(PathBuf, u64)>> {
    let mut files = Vec::new();
    let mut seen = std::collections::HashSet::new();
    let mut skipped_count = 0;

    for path in paths {
        // Skip if excluded
        if should_exclude(path, exclude_patterns)? {
            continue;
        }

        // Skip directories
        if path.is_dir() {
            continue;
        }

        // Security validation
        match validate_input_file(path, security) {
            Ok(_) => {}
            Err(e) => {
                eprintln!("Warning: Skipping file - {}", e);
                skipped_count += 1;
                continue;
            }
        }

        // Get file size for statistics
        let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        // Add only if not already seen
        if seen.insert(path.clone()) {
            files.push((path.clone(), size));
        }
    }

    if skipped_count > 0 {
        eprintln!("Skipped {} files due to security constraints", skipped_count);
    }

    Ok(files)
}

/// Check if a path should be excluded
fn should_exclude(path: &Path, exclude_patterns: &[String]) -> Result<bool> {
    for pattern in exclude_patterns {
        let pattern = glob::Pattern::new(pattern)?;
        if pattern.matches_path(path) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Write the scan results to output files with atomic writes
fn write_output_files(args: &ScanArgs, result: &ScanResult) -> Result<()> {
    // Create parent directories if they don't exist
    if let Some(parent) = args.output_tokens.parent() {
        fs::create_dir_all(parent)?;
    }
    if let Some(parent) = args.output_report.parent() {
        fs::create_dir_all(parent)?;
    }

    // Write token list atomically, one candidate per line
    let mut token_content = result.tokens.join("\n");
    if !token_content.is_empty() {
        token_content.push('\n');
    }

    write_atomic(&args.output_tokens, &token_content).map_err(|e| ScanError::OutputError {
        path: args.output_tokens.display().to_string(),
        message: e.to_string(),
    })?;

    // Write report file atomically
    let report_content = serde_json::to_string_pretty(&result.report)?;

    write_atomic(&args.output_report, &report_content).map_err(|e| ScanError::OutputError {
        path: args.output_report.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(())
}

/// Write file atomically by writing to temp file then renaming
fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> std::io::Result<()> {
    use std::io::Write;

    let path = path.as_ref();
    let temp_path = path.with_extension(".tmp");

    // Write to temporary file
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?; // Ensure data is flushed to disk

    // Atomically rename temp file to final name
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Extract token occurrences from files with progress reporting
fn extract_occurrences_with_progress(
    files: &[PathBuf],
    config: &ScannerConfig,
    jobs: Option<usize>,
    progress_bar: Option<&ProgressBar>,
) -> Result<Vec<TokenOccurrence>> {
    use rayon::prelude::*;
    use std::sync::{Arc, Mutex};

    // Configure thread pool if specified
    if let Some(num_jobs) = jobs {
        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(num_jobs)
            .build_global();
    }

    // Create a shared counter for progress
    let processed = Arc::new(Mutex::new(0usize));

    // Process files in parallel with progress updates
    let results: std::result::Result<Vec<_>, _> = files
        .par_iter()
        .map(|file_path| {
            // Early termination for empty files
            if let Ok(metadata) = fs::metadata(file_path) {
                if metadata.len() == 0 {
                    if let Some(pb) = progress_bar {
                        let mut count = processed.lock().unwrap();
                        *count += 1;
                        pb.set_position(*count as u64);
                        pb.set_message(format!(
                            "Skipped empty: {}",
                            file_path.file_name().unwrap_or_default().to_string_lossy()
                        ));
                    }
                    return Ok(Vec::new());
                }
            }

            let rule = config.rule_for_path(file_path);
            let result = occurrences_from_file(file_path, rule);

            // Update progress
            if let Some(pb) = progress_bar {
                let mut count = processed.lock().unwrap();
                *count += 1;
                pb.set_position(*count as u64);
                pb.set_message(format!(
                    "Processing: {}",
                    file_path.file_name().unwrap_or_default().to_string_lossy()
                ));
            }

            result
        })
        .collect();

    // Flatten results and deduplicate identical occurrences
    let mut all_occurrences = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for file_results in results? {
        for occurrence in file_results {
            let key = (
                occurrence.value.clone(),
                occurrence.file_path.clone(),
                occurrence.line,
                occurrence.column,
            );
            if seen.insert(key) {
                all_occurrences.push(occurrence);
            }
        }
    }

    Ok(all_occurrences)
}

/// Handle pipe command - read source content from stdin, write candidates to stdout
pub async fn handle_pipe_command(args: PipeArgs) -> Result<()> {
    use tokio::io::{self, AsyncReadExt, AsyncWriteExt};

    // Read source content from stdin asynchronously
    let mut input = String::new();
    let mut stdin = io::stdin();
    stdin
        .read_to_string(&mut input)
        .await
        .map_err(|e| ScanError::InputError(format!("Failed to read from stdin: {}", e)))?;

    // If input is empty, output nothing
    if input.trim().is_empty() {
        return Ok(());
    }

    // Resolve the extraction rule for the requested file type
    let config = ScannerConfig::default();
    let rule = config.rule_for(&args.file_type);

    let occurrences = occurrences_from_content(&input, "stdin", rule);

    // Collect unique candidate tokens with their locations
    let mut tokens: IndexSet<String> = IndexSet::new();
    let mut token_locations: IndexMap<String, Vec<String>> = IndexMap::new();

    for occurrence in &occurrences {
        if !is_candidate(&occurrence.value) {
            continue;
        }
        tokens.insert(occurrence.value.clone());
        token_locations
            .entry(occurrence.value.clone())
            .or_default()
            .push(format!(
                "{}:{}:{}",
                occurrence.file_path, occurrence.line, occurrence.column
            ));
    }

    // If no candidates found, output nothing
    if tokens.is_empty() {
        return Ok(());
    }

    let output = if args.json {
        let report = ReportBuilder::new()
            .with_files_processed(1)
            .with_tokens_extracted(tokens.len())
            .with_token_info(token_locations)
            .build();
        report.to_pretty_json()?
    } else {
        let mut lines = tokens.into_iter().collect::<Vec<_>>().join("\n");
        lines.push('\n');
        lines
    };

    // Write candidates to stdout asynchronously
    let mut stdout = io::stdout();
    stdout
        .write_all(output.as_bytes())
        .await
        .map_err(|e| ScanError::OutputError {
            path: "stdout".to_string(),
            message: e.to_string(),
        })?;

    // Ensure output is flushed
    stdout.flush().await.map_err(|e| ScanError::OutputError {
        path: "stdout".to_string(),
        message: e.to_string(),
    })?;

    Ok(())
}
