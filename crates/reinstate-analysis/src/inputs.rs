//! Per-subject input resolution and the timing/label readers.

use std::path::{Path, PathBuf};

use reinstate_core::config::ReinstateConfig;
use reinstate_core::errors::InputError;
use reinstate_core::types::{AnalysisType, MemoryLabels, RunKind, SubjectId, Trial, TrialTiming};

/// Every file one subject run reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectInputs {
    pub subject: SubjectId,
    pub analysis: AnalysisType,
    /// Memory, pre-rest, and post-rest runs, in `RunKind` order.
    pub runs: [PathBuf; 3],
    pub trial_timing: PathBuf,
    pub memory_regressors: PathBuf,
    pub brain_mask: PathBuf,
}

impl SubjectInputs {
    /// Build the input paths for `subject`. The rest-run override table is
    /// consulted here and nowhere else.
    pub fn resolve(config: &ReinstateConfig, subject: &SubjectId, analysis: &AnalysisType) -> Self {
        let preproc = config.paths.effective_preproc_dir();
        let timing = config.paths.effective_timing_dir();
        let subjects = &config.subjects;

        let task = |kind: RunKind| match kind {
            RunKind::Memory => format!("memory_run-{}", subjects.effective_memory_run()),
            RunKind::RestPre => format!("rest_run-{}", subjects.effective_pre_rest_run()),
            RunKind::RestPost => format!("rest_run-{}", subjects.effective_post_rest_run(subject)),
        };
        let run_path = |kind: RunKind| {
            preproc.join(format!(
                "{}_task-{}_filtered_func_data.nii.gz",
                subject.imaging_id(),
                task(kind)
            ))
        };

        Self {
            subject: subject.clone(),
            analysis: analysis.clone(),
            runs: RunKind::ALL.map(run_path),
            trial_timing: timing.join(format!("{}_trial_timing.txt", subject.timing_id())),
            memory_regressors: timing.join(format!("{}_memory_regressors.csv", subject.timing_id())),
            brain_mask: config.paths.effective_brain_mask(),
        }
    }

    pub fn run(&self, kind: RunKind) -> &Path {
        &self.runs[kind.index()]
    }

    /// Every path, for existence checks.
    pub fn all_paths(&self) -> impl Iterator<Item = &Path> {
        self.runs
            .iter()
            .chain([&self.trial_timing, &self.memory_regressors, &self.brain_mask])
            .map(PathBuf::as_path)
    }

    /// Fail on the first path for which `exists` is false.
    pub fn check_exist(&self, exists: impl Fn(&Path) -> bool) -> Result<(), InputError> {
        match self.all_paths().find(|p| !exists(*p)) {
            Some(path) => Err(InputError::MissingInputFile {
                subject: self.subject.imaging_id(),
                path: path.to_path_buf(),
            }),
            None => Ok(()),
        }
    }
}

/// Read a whitespace-separated trial timing table: one trial per line,
/// onset then duration. Extra columns are ignored; blank lines and `#`
/// comments are skipped.
pub fn load_trial_timing(path: &Path) -> Result<TrialTiming, InputError> {
    let content = std::fs::read_to_string(path).map_err(|e| InputError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_trial_timing(&path.display().to_string(), &content)
}

pub fn parse_trial_timing(source_name: &str, content: &str) -> Result<TrialTiming, InputError> {
    let mut trials = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let malformed = |message: String| InputError::MalformedTiming {
            source_name: source_name.to_string(),
            trial: trials.len(),
            message,
        };
        let mut fields = line.split_whitespace().map(str::parse::<f64>);
        let (onset, duration) = match (fields.next(), fields.next()) {
            (Some(Ok(onset)), Some(Ok(duration))) => (onset, duration),
            (Some(_), None) => return Err(malformed("expected onset and duration".to_string())),
            _ => return Err(malformed(format!("unparseable line '{line}'"))),
        };
        trials.push(Trial::new(onset, duration));
    }
    TrialTiming::new(source_name, trials)
}

/// Read the `column` of a memory-regressor CSV as trial labels.
/// Empty cells and `nan` are unlabeled trials.
pub fn load_memory_labels(path: &Path, column: &str) -> Result<MemoryLabels, InputError> {
    let read_error = |e: csv::Error| InputError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(read_error)?;

    let index = reader
        .headers()
        .map_err(read_error)?
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| InputError::MissingLabelColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        })?;

    let source_name = path.display().to_string();
    let mut codes = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(read_error)?;
        let cell = record.get(index).unwrap_or("");
        let code = if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
            f64::NAN
        } else {
            cell.parse::<f64>().map_err(|_| InputError::MalformedLabels {
                source_name: source_name.clone(),
                row,
                message: format!("'{cell}' is not a number"),
            })?
        };
        codes.push(code);
    }
    MemoryLabels::from_codes(&source_name, &codes)
}
