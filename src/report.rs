use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata for the generated report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Version of the report format
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: DateTime<Utc>,

    /// Number of files processed
    pub files_processed: usize,

    /// Number of unique candidate tokens extracted
    pub tokens_extracted: usize,

    /// Scanner version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanner_version: Option<String>,
}

/// Detailed token information in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTokenInfo {
    /// Number of occurrences of this token
    pub count: usize,

    /// Locations where this token was found (file:line:column)
    pub files: Vec<String>,
}

/// Complete report structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Metadata about the scan
    pub metadata: ReportMetadata,

    /// Map of candidate tokens to their usage information
    pub tokens: IndexMap<String, ReportTokenInfo>,

    /// Statistics about the scan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ReportStatistics>,
}

/// Statistics about the scanning process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStatistics {
    /// Number of files handed to the scanner
    pub files_matched: usize,

    /// Number of files actually containing candidates
    pub files_with_tokens: usize,

    /// Processing time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,

    /// Most frequently seen tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_tokens: Option<Vec<TopToken>>,
}

/// Information about frequently seen tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopToken {
    pub name: String,
    pub count: usize,
    pub file_count: usize,
}

impl Report {
    /// Create a new report with default metadata
    pub fn new() -> Self {
        Self {
            metadata: ReportMetadata {
                version: "1.0.0".to_string(),
                generated_at: Utc::now(),
                files_processed: 0,
                tokens_extracted: 0,
                scanner_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            },
            tokens: IndexMap::new(),
            statistics: None,
        }
    }

    /// Add or update token information
    pub fn add_token(&mut self, token: String, location: String) {
        let entry = self.tokens.entry(token).or_insert_with(|| ReportTokenInfo {
            count: 0,
            files: Vec::new(),
        });

        entry.count += 1;
        if !entry.files.contains(&location) {
            entry.files.push(location);
        }
    }

    /// Calculate and set statistics
    pub fn calculate_statistics(&mut self, processing_time_ms: Option<u64>) {
        // Count files that produced tokens; locations are file:line:column
        let mut files_with_tokens = std::collections::HashSet::new();
        for token_info in self.tokens.values() {
            for location in &token_info.files {
                if let Some(path) = location.split(':').next() {
                    files_with_tokens.insert(path.to_string());
                }
            }
        }

        let mut token_list: Vec<_> = self
            .tokens
            .iter()
            .map(|(name, info)| TopToken {
                name: name.clone(),
                count: info.count,
                file_count: info.files.len(),
            })
            .collect();

        token_list.sort_by(|a, b| b.count.cmp(&a.count));
        let top_tokens = token_list.into_iter().take(10).collect();

        self.statistics = Some(ReportStatistics {
            files_matched: self.metadata.files_processed,
            files_with_tokens: files_with_tokens.len(),
            processing_time_ms,
            top_tokens: Some(top_tokens),
        });
    }

    /// Convert report to JSON value
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }

    /// Convert report to pretty JSON string
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert report to compact JSON string
    pub fn to_compact_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder pattern for creating reports
pub struct ReportBuilder {
    report: Report,
    start_time: Option<std::time::Instant>,
}

impl ReportBuilder {
    /// Create a new report builder
    pub fn new() -> Self {
        Self {
            report: Report::new(),
            start_time: Some(std::time::Instant::now()),
        }
    }

    /// Set the number of files processed
    pub fn with_files_processed(mut self, count: usize) -> Self {
        self.report.metadata.files_processed = count;
        self
    }

    /// Set the number of tokens extracted
    pub fn with_tokens_extracted(mut self, count: usize) -> Self {
        self.report.metadata.tokens_extracted = count;
        self
    }

    /// Add token information from a location map
    pub fn with_token_info(mut self, tokens: IndexMap<String, Vec<String>>) -> Self {
        for (token, locations) in tokens {
            let info = ReportTokenInfo {
                count: locations.len(),
                files: locations,
            };
            self.report.tokens.insert(token, info);
        }
        self
    }

    /// Build the final report with statistics
    pub fn build(mut self) -> Report {
        let processing_time = self.start_time.map(|t| t.elapsed().as_millis() as u64);
        self.report.calculate_statistics(processing_time);
        self.report
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_creation() {
        let report = Report::new();
        assert_eq!(report.metadata.version, "1.0.0");
        assert_eq!(report.tokens.len(), 0);
        assert!(report.statistics.is_none());
    }

    #[test]
    fn test_add_token() {
        let mut report = Report::new();
        report.add_token("bg-blue-500".to_string(), "src/app.rs:10:15".to_string());
        report.add_token("bg-blue-500".to_string(), "src/app.rs:20:10".to_string());
        report.add_token("text-white".to_string(), "src/app.rs:10:30".to_string());

        assert_eq!(report.tokens.len(), 2);
        assert_eq!(report.tokens["bg-blue-500"].count, 2);
        assert_eq!(report.tokens["text-white"].count, 1);
    }

    #[test]
    fn test_report_builder() {
        let mut tokens = IndexMap::new();
        tokens.insert(
            "p-4".to_string(),
            vec!["src/app.rs:1:1".to_string(), "src/app.rs:2:1".to_string()],
        );
        tokens.insert("m-2".to_string(), vec!["src/other.rs:5:10".to_string()]);

        let report = ReportBuilder::new()
            .with_files_processed(10)
            .with_tokens_extracted(2)
            .with_token_info(tokens)
            .build();

        assert_eq!(report.metadata.files_processed, 10);
        assert_eq!(report.metadata.tokens_extracted, 2);
        assert!(report.statistics.is_some());

        let stats = report.statistics.unwrap();
        assert_eq!(stats.files_matched, 10);
        assert_eq!(stats.files_with_tokens, 2);
    }

    #[test]
    fn test_json_serialization() {
        let report = Report::new();
        let json = report.to_json();

        assert!(json["metadata"].is_object());
        assert_eq!(json["metadata"]["version"], "1.0.0");
        assert!(json["tokens"].is_object());
    }

    #[test]
    fn test_top_tokens() {
        let mut report = Report::new();

        for i in 0..5 {
            report.add_token("frequent".to_string(), format!("file{}:1:1", i));
        }
        for i in 0..3 {
            report.add_token("moderate".to_string(), format!("file{}:1:1", i));
        }
        report.add_token("rare".to_string(), "file1:1:1".to_string());

        report.calculate_statistics(None);

        let stats = report.statistics.unwrap();
        let top_tokens = stats.top_tokens.unwrap();

        assert_eq!(top_tokens[0].name, "frequent");
        assert_eq!(top_tokens[0].count, 5);
        assert_eq!(top_tokens[1].name, "moderate");
        assert_eq!(top_tokens[1].count, 3);
    }
}
