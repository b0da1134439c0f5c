//! Rule set resolution.
//!
//! Expands rule patterns into files, reads them and loads them into an
//! engine, consulting the [`FailurePolicy`] whenever a file fails.

use crate::error::{CheckError, Result};
use crate::pattern::RulePattern;
use crate::policy::FailurePolicy;
use rulecheck_core::{LoadError, ParseContext, RuleEngine};
use rulecheck_fs::FileSystem;
use std::io;
use std::path::{Path, PathBuf};

/// Largest rule file the resolver will read (1 MiB).
pub const MAX_RULE_FILE_SIZE: u64 = 1024 * 1024;

/// A rule file left out of the engine under a lenient policy.
#[derive(Debug)]
pub struct SkippedFile {
    pub file: PathBuf,
    pub error: LoadError,
}

/// Outcome of a successful resolution.
///
/// `engine` is `None` when no file loaded; a checker built from such a
/// resolution reports nothing.
#[derive(Debug)]
pub struct Resolution<E> {
    pub engine: Option<E>,
    pub loaded: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
}

impl<E> Resolution<E> {
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}

/// Loads rule files matched by patterns into an engine.
#[derive(Debug)]
pub struct RuleSetResolver<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    parse_ctx: &'a ParseContext,
    policy: &'a FailurePolicy,
}

impl<'a, F: FileSystem + ?Sized> RuleSetResolver<'a, F> {
    pub fn new(fs: &'a F, parse_ctx: &'a ParseContext, policy: &'a FailurePolicy) -> Self {
        Self {
            fs,
            parse_ctx,
            policy,
        }
    }

    /// Resolves `patterns` left to right into `engine`.
    ///
    /// # Errors
    ///
    /// - [`CheckError::NoMatchingFiles`] when a valid pattern matches nothing,
    ///   under every policy
    /// - [`CheckError::RuleLoad`] when a read or load failure is fatal under
    ///   the policy
    ///
    /// Malformed patterns are logged and skipped.
    pub fn resolve<E: RuleEngine>(&self, patterns: &[RulePattern], mut engine: E) -> Result<Resolution<E>> {
        let mut loaded = Vec::new();
        let mut skipped = Vec::new();

        for pattern in patterns {
            let files = match self.fs.glob(pattern.as_str()) {
                Ok(files) => files,
                Err(e) => {
                    tracing::warn!(pattern = %pattern, error = %e, "skipping malformed rule pattern");
                    continue;
                }
            };

            if files.is_empty() {
                return Err(CheckError::NoMatchingFiles {
                    pattern: pattern.to_string(),
                });
            }

            for file in files {
                let outcome = self
                    .read(&file)
                    .and_then(|content| engine.load(self.parse_ctx, &file, &content));

                match outcome {
                    Ok(()) => {
                        tracing::debug!(file = %file.display(), "loaded rule file");
                        loaded.push(file);
                    }
                    Err(error) => {
                        let fired = self.policy.fatal_conditions(&error);
                        if !fired.is_empty() {
                            tracing::debug!(
                                file = %file.display(),
                                conditions = ?fired,
                                "rule file failure is fatal"
                            );
                            return Err(CheckError::RuleLoad { file, source: error });
                        }
                        tracing::warn!(file = %file.display(), error = %error, "skip rule file");
                        skipped.push(SkippedFile { file, error });
                    }
                }
            }
        }

        tracing::info!(
            loaded = loaded.len(),
            skipped = skipped.len(),
            "resolved rule files"
        );

        Ok(Resolution {
            engine: if loaded.is_empty() { None } else { Some(engine) },
            loaded,
            skipped,
        })
    }

    fn read(&self, file: &Path) -> std::result::Result<String, LoadError> {
        let to_load_error = |source: io::Error| LoadError::Read {
            file: file.to_path_buf(),
            source,
        };

        let metadata = self.fs.metadata(file).map_err(to_load_error)?;
        if metadata.size > MAX_RULE_FILE_SIZE {
            return Err(to_load_error(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "rule file is {} bytes, the limit is {} bytes",
                    metadata.size, MAX_RULE_FILE_SIZE
                ),
            )));
        }

        self.fs.read_to_string(file).map_err(to_load_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulecheck_core::{RunContext, RunOutput, SourceUnit};
    use rulecheck_fs::MemoryFileSystem;
    use std::sync::{Arc, Mutex};

    /// Records what it was asked to load; content "import" and "dsl" fail.
    #[derive(Debug, Default)]
    struct RecordingEngine {
        files: Vec<PathBuf>,
        attempts: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl RuleEngine for RecordingEngine {
        fn load(
            &mut self,
            _ctx: &ParseContext,
            filename: &Path,
            content: &str,
        ) -> std::result::Result<(), LoadError> {
            self.attempts.lock().unwrap().push(filename.to_path_buf());
            match content {
                "import" => Err(LoadError::Import {
                    file: filename.to_path_buf(),
                    package: "missing".to_string(),
                }),
                "dsl" => Err(LoadError::dsl(filename, Some(1), "bad rule")),
                _ => {
                    self.files.push(filename.to_path_buf());
                    Ok(())
                }
            }
        }

        fn run(&self, _ctx: &RunContext<'_>, _unit: &SourceUnit) -> RunOutput {
            RunOutput::default()
        }
    }

    fn resolve(
        fs: &MemoryFileSystem,
        flag: &str,
        policy: &str,
    ) -> Result<Resolution<RecordingEngine>> {
        let ctx = ParseContext::new();
        let policy = FailurePolicy::parse(policy).unwrap();
        let resolver = RuleSetResolver::new(fs, &ctx, &policy);
        resolver.resolve(&RulePattern::parse_list(flag), RecordingEngine::default())
    }

    #[test]
    fn test_loads_matches_in_order() {
        let fs = MemoryFileSystem::new("/p")
            .with_file("rules-b.toml", "ok")
            .with_file("rules-a.toml", "ok")
            .with_file("extra.toml", "ok");

        let resolution = resolve(&fs, "rules-*.toml, extra.toml", "").unwrap();
        let engine = resolution.engine.unwrap();
        assert_eq!(
            engine.files,
            vec![
                PathBuf::from("rules-a.toml"),
                PathBuf::from("rules-b.toml"),
                PathBuf::from("extra.toml")
            ]
        );
        assert_eq!(resolution.loaded, engine.files);
    }

    #[test]
    fn test_malformed_pattern_is_skipped() {
        let fs = MemoryFileSystem::new("/p").with_file("a.toml", "ok");
        let resolution = resolve(&fs, "rules-[.toml,a.toml", "all").unwrap();
        assert_eq!(resolution.loaded_count(), 1);
    }

    #[test]
    fn test_no_match_is_fatal_under_lenient_policy() {
        let fs = MemoryFileSystem::new("/p").with_file("a.toml", "ok");
        let err = resolve(&fs, "a.toml, missing-*.toml", "").unwrap_err();
        assert!(matches!(err, CheckError::NoMatchingFiles { ref pattern } if pattern == "missing-*.toml"));
        assert_eq!(err.to_string(), "no file matching 'missing-*.toml'");
    }

    #[test]
    fn test_skipped_files_are_not_loaded() {
        let fs = MemoryFileSystem::new("/p")
            .with_file("a.toml", "dsl")
            .with_file("b.toml", "import")
            .with_file("c.toml", "ok");

        let resolution = resolve(&fs, "*.toml", "").unwrap();
        assert_eq!(resolution.loaded, vec![PathBuf::from("c.toml")]);
        assert_eq!(resolution.skipped.len(), 2);
        assert!(resolution.skipped[1].error.is_import());
    }

    #[test]
    fn test_all_files_skipped_means_no_engine() {
        let fs = MemoryFileSystem::new("/p").with_file("a.toml", "dsl");
        let resolution = resolve(&fs, "a.toml", "import").unwrap();
        assert!(resolution.engine.is_none());
        assert_eq!(resolution.loaded_count(), 0);
    }

    #[test]
    fn test_fatal_failure_names_file() {
        let fs = MemoryFileSystem::new("/p")
            .with_file("a.toml", "ok")
            .with_file("b.toml", "import");

        let err = resolve(&fs, "*.toml", "import").unwrap_err();
        assert_eq!(err.file(), Some(Path::new("b.toml")));
        assert!(err.to_string().contains("b.toml"));
    }

    #[test]
    fn test_read_failure_is_not_submitted() {
        let fs = MemoryFileSystem::new("/p")
            .with_file("bad.toml", vec![0xff, 0xfe])
            .with_file("good.toml", "ok");

        let resolution = resolve(&fs, "*.toml", "import").unwrap();
        let engine = resolution.engine.unwrap();
        assert_eq!(engine.files, vec![PathBuf::from("good.toml")]);
        assert!(matches!(resolution.skipped[0].error, LoadError::Read { .. }));

        // Read failures are not import failures
        let err = resolve(&fs, "*.toml", "dsl").unwrap_err();
        assert_eq!(err.file(), Some(Path::new("bad.toml")));
    }

    #[test]
    fn test_oversized_file_is_a_read_failure() {
        let big = "x".repeat(MAX_RULE_FILE_SIZE as usize + 1);
        let fs = MemoryFileSystem::new("/p").with_file("big.toml", big);

        let resolution = resolve(&fs, "big.toml", "").unwrap();
        assert!(resolution.engine.is_none());
        assert!(resolution.skipped[0].error.to_string().contains("limit"));
    }

    #[test]
    fn test_fatal_failure_stops_loading() {
        let fs = MemoryFileSystem::new("/p")
            .with_file("a.toml", "import")
            .with_file("b.toml", "ok");
        let ctx = ParseContext::new();
        let policy = FailurePolicy::parse("import").unwrap();
        let engine = RecordingEngine::default();
        let attempts = Arc::clone(&engine.attempts);

        let err = RuleSetResolver::new(&fs, &ctx, &policy)
            .resolve(&RulePattern::parse_list("*.toml"), engine)
            .unwrap_err();

        assert_eq!(err.file(), Some(Path::new("a.toml")));
        assert_eq!(*attempts.lock().unwrap(), vec![PathBuf::from("a.toml")]);
    }
}
