//! End-to-end subject run: resolve inputs, load, searchlight, persist.

use std::path::{Path, PathBuf};
use std::time::Instant;

use ndarray::{Array4, Axis};
use reinstate_core::config::ReinstateConfig;
use reinstate_core::errors::{PipelineError, ReinstateErrorCode, VolumeError};
use reinstate_core::events::{
    ErrorEvent, EventDispatcher, OutputWrittenEvent, PhaseCompleteEvent, PhaseStartedEvent,
    RunCompleteEvent, RunStartedEvent, SearchlightPhase,
};
use reinstate_core::tracing::metrics;
use reinstate_core::types::{AnalysisType, RunKind, ScoringStrategy, SubjectId};
use serde::Serialize;

use crate::assembly::{assemble_outcome_volumes, tally, OutcomeVolume};
use crate::inputs::{load_memory_labels, load_trial_timing, SubjectInputs};
use crate::kernel::{NeighborhoodKernel, SearchlightContext};
use crate::searchlight::{Searchlight, SearchlightParams};
use crate::segmentation::TrialSegmenter;
use crate::volume::{binarize, zscore_over_time, Resampler, Volume3, Volume4, VolumeStore};

/// What one subject run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub subject: String,
    pub analysis: String,
    pub strategy: ScoringStrategy,
    /// In-mask searchlight centers.
    pub centers: usize,
    pub scored: usize,
    pub skipped: usize,
    pub outputs: Vec<PathBuf>,
    pub duration_ms: u64,
}

/// Runs the reinstatement searchlight for one subject and analysis type.
pub struct SubjectPipeline<'a> {
    config: &'a ReinstateConfig,
    store: &'a dyn VolumeStore,
    resampler: &'a dyn Resampler,
    events: EventDispatcher,
}

/// Volumes loaded for one run, before distribution.
struct LoadedInputs {
    context: SearchlightContext,
    runs: Vec<Volume4>,
    standard_mask: Volume3,
    native_mask: ndarray::Array3<bool>,
}

impl<'a> SubjectPipeline<'a> {
    pub fn new(
        config: &'a ReinstateConfig,
        store: &'a dyn VolumeStore,
        resampler: &'a dyn Resampler,
    ) -> Self {
        Self {
            config,
            store,
            resampler,
            events: EventDispatcher::new(),
        }
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    /// Run every phase. Any error aborts the run; there is no partial
    /// summary.
    pub fn run(
        &self,
        subject: &SubjectId,
        analysis: &AnalysisType,
    ) -> Result<RunSummary, PipelineError> {
        let span = tracing::info_span!(
            "subject_run",
            { metrics::SUBJECT } = %subject,
            { metrics::ANALYSIS } = %analysis
        );
        let _guard = span.enter();

        let strategy = self.config.scoring.effective_strategy();
        self.events.emit_run_started(&RunStartedEvent {
            subject: subject.imaging_id(),
            analysis: analysis.name().to_string(),
            strategy,
        });

        let result = self.run_phases(subject, analysis, strategy);
        if let Err(e) = &result {
            tracing::error!(error = %e, code = e.error_code(), "subject run failed");
            self.events.emit_error(&ErrorEvent {
                message: e.diagnostic(),
                error_code: e.error_code().to_string(),
            });
        }
        result
    }

    fn run_phases(
        &self,
        subject: &SubjectId,
        analysis: &AnalysisType,
        strategy: ScoringStrategy,
    ) -> Result<RunSummary, PipelineError> {
        let started = Instant::now();
        let inputs = SubjectInputs::resolve(self.config, subject, analysis);
        let loaded = self.load(&inputs)?;

        let native_affine = loaded.runs[RunKind::Memory.index()].affine;
        let mut searchlight = Searchlight::new(SearchlightParams::from_config(
            &self.config.searchlight,
        ))?
        .with_events(self.events.clone());

        let run_data: Vec<Array4<f64>> = loaded.runs.into_iter().map(|v| v.data).collect();
        let native_mask = loaded.native_mask;
        self.phase(SearchlightPhase::Distribute, || {
            searchlight.distribute(run_data, native_mask)
        })?;
        self.phase(SearchlightPhase::Broadcast, || {
            searchlight.broadcast(loaded.context)
        })?;

        let kernel = NeighborhoodKernel::from_config(self.config);
        let pool_size = self.config.searchlight.effective_pool_size();
        let results = self.phase(SearchlightPhase::Run, || {
            searchlight.run_searchlight(&kernel, pool_size)
        })?;

        let (volumes, counts) = self.phase(SearchlightPhase::Collect, || {
            Ok::<_, PipelineError>((assemble_outcome_volumes(&results, strategy), tally(&results)))
        })?;
        tracing::info!(
            { metrics::NEIGHBORHOOD_COUNT } = counts.centers,
            { metrics::SKIPPED_COUNT } = counts.skipped,
            "searchlight results collected"
        );

        let outputs = self.phase(SearchlightPhase::Persist, || {
            self.persist(subject, analysis, &volumes, &native_affine, &loaded.standard_mask)
        })?;

        let duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            { metrics::RUN_DURATION_MS } = duration_ms,
            scored = counts.scored,
            outputs = outputs.len(),
            "subject run complete"
        );
        self.events.emit_run_complete(&RunCompleteEvent {
            scored: counts.scored,
            skipped: counts.skipped,
            outputs: outputs.len(),
            duration_ms,
        });

        Ok(RunSummary {
            subject: subject.imaging_id(),
            analysis: analysis.name().to_string(),
            strategy,
            centers: counts.centers,
            scored: counts.scored,
            skipped: counts.skipped,
            outputs,
            duration_ms,
        })
    }

    /// Resolve and read every input, preprocess the runs, and bring the
    /// standard-space mask onto the native grid.
    fn load(&self, inputs: &SubjectInputs) -> Result<LoadedInputs, PipelineError> {
        let text_inputs = [inputs.trial_timing.as_path(), inputs.memory_regressors.as_path()];
        inputs.check_exist(|p| {
            if text_inputs.iter().any(|t| *t == p) {
                p.is_file()
            } else {
                self.store.exists(p)
            }
        })?;

        let timing = load_trial_timing(&inputs.trial_timing)?;
        let labels = load_memory_labels(&inputs.memory_regressors, inputs.analysis.memory_column())?;
        let timing_source = inputs.trial_timing.display().to_string();
        let context = SearchlightContext::from_sources(
            timing,
            &timing_source,
            labels,
            &inputs.memory_regressors.display().to_string(),
        )?;

        let zscore = self.config.acquisition.effective_zscore_runs();
        let mut runs = Vec::with_capacity(RunKind::ALL.len());
        for kind in RunKind::ALL {
            let mut run = self.store.load_run(inputs.run(kind))?;
            if zscore {
                zscore_over_time(&mut run.data);
            }
            tracing::debug!(run = kind.name(), shape = ?run.data.shape(), "run loaded");
            runs.push(run);
        }

        let native_shape = runs[RunKind::Memory.index()].spatial_shape();
        for run in &runs[1..] {
            if run.spatial_shape() != native_shape {
                return Err(VolumeError::ShapeMismatch {
                    expected: native_shape.to_vec(),
                    found: run.spatial_shape().to_vec(),
                }
                .into());
            }
        }

        let n_samples = runs[RunKind::Memory.index()].data.len_of(Axis(3));
        TrialSegmenter::new(self.config.acquisition.effective_tr())
            .check_spans(&timing_source, context.timing(), n_samples)?;

        let standard_mask = self.store.load_image(&inputs.brain_mask)?;
        let native_affine = runs[RunKind::Memory.index()].affine;
        let resampled = self
            .resampler
            .resample(&standard_mask, &native_affine, native_shape)?;
        let native_mask = binarize(
            resampled.data.view(),
            self.config.acquisition.effective_mask_threshold(),
        );
        tracing::info!(
            trials = context.timing().len(),
            mask_voxels = native_mask.iter().filter(|m| **m).count(),
            "inputs loaded"
        );

        Ok(LoadedInputs {
            context,
            runs,
            standard_mask,
            native_mask,
        })
    }

    /// Write every outcome volume, resampled onto the standard mask grid.
    fn persist(
        &self,
        subject: &SubjectId,
        analysis: &AnalysisType,
        volumes: &[OutcomeVolume],
        native_affine: &nalgebra::Matrix4<f64>,
        standard_mask: &Volume3,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let output_dir = self.config.paths.effective_output_dir();
        std::fs::create_dir_all(&output_dir).map_err(|e| VolumeError::Write {
            path: output_dir.clone(),
            message: e.to_string(),
        })?;

        let mut outputs = Vec::with_capacity(volumes.len());
        for volume in volumes {
            let native = Volume3::new(volume.data.clone(), *native_affine);
            let standard = self.resampler.resample(
                &native,
                &standard_mask.affine,
                standard_mask.spatial_shape(),
            )?;
            let path = output_path(
                &output_dir,
                subject,
                analysis,
                volume.label.name(),
                self.config.output.effective_suffix(),
            );
            self.store.save_image(&standard, &path)?;
            tracing::info!({ metrics::OUTPUT_PATH } = %path.display(), "result volume written");
            self.events.emit_output_written(&OutputWrittenEvent {
                label: volume.label,
                path: path.clone(),
            });
            outputs.push(path);
        }
        Ok(outputs)
    }

    /// Emit start/complete events around one phase.
    fn phase<T, E>(
        &self,
        phase: SearchlightPhase,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        self.events.emit_phase_started(&PhaseStartedEvent { phase });
        let started = Instant::now();
        let output = f()?;
        let duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!({ metrics::PHASE } = phase.name(), duration_ms, "phase complete");
        self.events
            .emit_phase_complete(&PhaseCompleteEvent { phase, duration_ms });
        Ok(output)
    }
}

/// `<output_dir>/<sub>_<analysis>_<label>_<suffix>.nii.gz`
pub fn output_path(
    output_dir: &Path,
    subject: &SubjectId,
    analysis: &AnalysisType,
    label: &str,
    suffix: &str,
) -> PathBuf {
    output_dir.join(format!(
        "{}_{}_{}_{}.nii.gz",
        subject.imaging_id(),
        analysis.name(),
        label,
        suffix
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_naming() {
        let subject = SubjectId::parse("141").unwrap();
        let analysis = AnalysisType::parse("trialwise_recognition").unwrap();
        let path = output_path(
            Path::new("/out"),
            &subject,
            &analysis,
            "difference",
            "summed_zscore_v2",
        );
        assert_eq!(
            path,
            PathBuf::from("/out/sub-141_trialwise_recognition_difference_summed_zscore_v2.nii.gz")
        );
    }
}
