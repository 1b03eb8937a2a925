//! End-to-end subject runs over synthetic data.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ndarray::{Array3, Array4};
use nifti::writer::WriterOptions;
use nifti::NiftiHeader;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use reinstate_analysis::inputs::SubjectInputs;
use reinstate_analysis::volume::{
    scaling_affine, InMemoryVolumeStore, NearestNeighbourResampler, NiftiStore, Volume3, Volume4,
    VolumeStore,
};
use reinstate_analysis::SubjectPipeline;
use reinstate_core::config::ReinstateConfig;
use reinstate_core::errors::{InputError, PipelineError, ReinstateErrorCode};
use reinstate_core::events::{EventDispatcher, OutputWrittenEvent, PhaseCompleteEvent, ReinstateEventHandler};
use reinstate_core::types::{AnalysisType, RunKind, ScoringStrategy, SubjectId};

const DIM: usize = 8;
const SAMPLES: usize = 12;

fn config(base: &Path, strategy: ScoringStrategy, pool_size: usize) -> ReinstateConfig {
    let mut config = ReinstateConfig::from_toml(
        r#"
[searchlight]
radius = 1
max_block_edge = 3
min_voxels = 10

[scoring]
n_perm = 20
"#,
    )
    .unwrap();
    config.paths.base_dir = Some(base.to_path_buf());
    config.scoring.strategy = Some(strategy);
    config.searchlight.pool_size = Some(pool_size);
    config
}

fn write_behaviour(base: &Path, subject: &SubjectId) {
    let dir = base.join("Ginsburg_Timing_Info");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join(format!("{}_trial_timing.txt", subject.timing_id())),
        "0 4\n4 4\n8 4\n12 4\n",
    )
    .unwrap();
    std::fs::write(
        dir.join(format!("{}_memory_regressors.csv", subject.timing_id())),
        "trial,recognition,coarse\n1,1,1\n2,0,\n3,1,0\n4,0,1\n",
    )
    .unwrap();
}

fn synthetic_run(seed: u64) -> Array4<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Array4::from_shape_simple_fn((DIM, DIM, DIM, SAMPLES), || rng.gen::<f64>())
}

/// Populate an in-memory store with the three runs and an all-brain mask.
fn in_memory_inputs(config: &ReinstateConfig, subject: &SubjectId, analysis: &AnalysisType) -> InMemoryVolumeStore {
    let store = InMemoryVolumeStore::new();
    let inputs = SubjectInputs::resolve(config, subject, analysis);
    for kind in RunKind::ALL {
        store.insert_run(
            inputs.run(kind),
            Volume4::new(synthetic_run(kind.index() as u64), scaling_affine([3.0, 3.0, 3.0])),
        );
    }
    store.insert_image(
        &inputs.brain_mask,
        Volume3::new(Array3::from_elem((DIM, DIM, DIM), 1.0), scaling_affine([3.0, 3.0, 3.0])),
    );
    store
}

#[derive(Default)]
struct Recorder {
    phases: AtomicUsize,
    outputs: AtomicUsize,
}

impl ReinstateEventHandler for Recorder {
    fn on_phase_complete(&self, _event: &PhaseCompleteEvent) {
        self.phases.fetch_add(1, Ordering::SeqCst);
    }

    fn on_output_written(&self, _event: &OutputWrittenEvent) {
        self.outputs.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_corrected_run_writes_three_volumes() {
    let dir = tempfile::TempDir::new().unwrap();
    let subject = SubjectId::parse("002").unwrap();
    let analysis = AnalysisType::parse("trialwise_recognition").unwrap();
    let config = config(dir.path(), ScoringStrategy::Corrected, 2);
    write_behaviour(dir.path(), &subject);
    let store = in_memory_inputs(&config, &subject, &analysis);

    let recorder = Arc::new(Recorder::default());
    let mut events = EventDispatcher::new();
    events.register(recorder.clone());

    let summary = SubjectPipeline::new(&config, &store, &NearestNeighbourResampler)
        .with_events(events)
        .run(&subject, &analysis)
        .unwrap();

    assert_eq!(summary.centers, DIM * DIM * DIM);
    assert_eq!(summary.skipped, 8);
    assert_eq!(summary.scored, DIM * DIM * DIM - 8);
    assert_eq!(summary.outputs.len(), 3);
    assert_eq!(recorder.phases.load(Ordering::SeqCst), 5);
    assert_eq!(recorder.outputs.load(Ordering::SeqCst), 3);

    let expected = dir
        .path()
        .join("similarity_searchlight")
        .join("sub-002_trialwise_recognition_difference_summed_zscore_v2.nii.gz");
    assert!(summary.outputs.contains(&expected));

    let difference = store.load_image(&expected).unwrap();
    assert_eq!(difference.data.dim(), (DIM, DIM, DIM));
    assert_eq!(difference.data[[0, 0, 0]], 0.0);
    assert!(difference.data.iter().all(|v| v.is_finite()));
}

#[test]
fn test_uncorrected_run_writes_pre_and_post_volumes() {
    let dir = tempfile::TempDir::new().unwrap();
    let subject = SubjectId::parse("002").unwrap();
    let analysis = AnalysisType::parse("trialwise_coarse").unwrap();
    let config = config(dir.path(), ScoringStrategy::Uncorrected, 1);
    write_behaviour(dir.path(), &subject);
    let store = in_memory_inputs(&config, &subject, &analysis);

    let summary = SubjectPipeline::new(&config, &store, &NearestNeighbourResampler)
        .run(&subject, &analysis)
        .unwrap();

    let names: Vec<String> = summary
        .outputs
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    assert_eq!(
        names,
        vec![
            "sub-002_trialwise_coarse_difference_pre_summed_zscore_v2.nii.gz".to_string(),
            "sub-002_trialwise_coarse_difference_post_summed_zscore_v2.nii.gz".to_string(),
        ]
    );
}

#[test]
fn test_pool_size_does_not_change_outputs() {
    let subject = SubjectId::parse("002").unwrap();
    let analysis = AnalysisType::parse("trialwise_recognition").unwrap();

    let mut maps = Vec::new();
    for pool_size in [1, 3] {
        let dir = tempfile::TempDir::new().unwrap();
        let config = config(dir.path(), ScoringStrategy::Corrected, pool_size);
        write_behaviour(dir.path(), &subject);
        let store = in_memory_inputs(&config, &subject, &analysis);
        let summary = SubjectPipeline::new(&config, &store, &NearestNeighbourResampler)
            .run(&subject, &analysis)
            .unwrap();
        let images: Vec<Array3<f64>> = summary
            .outputs
            .iter()
            .map(|p| store.load_image(p).unwrap().data)
            .collect();
        maps.push(images);
    }
    assert_eq!(maps[0], maps[1]);
}

#[test]
fn test_missing_run_is_fatal() {
    let dir = tempfile::TempDir::new().unwrap();
    let subject = SubjectId::parse("141").unwrap();
    let analysis = AnalysisType::parse("trialwise_recognition").unwrap();
    let config = config(dir.path(), ScoringStrategy::Corrected, 1);
    write_behaviour(dir.path(), &subject);

    // Populate rest run 2, but subject 141 uses rest run 3.
    let store = InMemoryVolumeStore::new();
    let preproc = dir.path().join("mvpa_preproc_files");
    for task in ["memory_run-1", "rest_run-1", "rest_run-2"] {
        store.insert_run(
            preproc.join(format!("sub-141_task-{task}_filtered_func_data.nii.gz")),
            Volume4::new(synthetic_run(1), scaling_affine([3.0, 3.0, 3.0])),
        );
    }

    let err = SubjectPipeline::new(&config, &store, &NearestNeighbourResampler)
        .run(&subject, &analysis)
        .unwrap_err();
    match err {
        PipelineError::Input(InputError::MissingInputFile { subject, path }) => {
            assert_eq!(subject, "sub-141");
            assert!(path.ends_with("sub-141_task-rest_run-3_filtered_func_data.nii.gz"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_label_count_mismatch_is_fatal() {
    let dir = tempfile::TempDir::new().unwrap();
    let subject = SubjectId::parse("002").unwrap();
    let analysis = AnalysisType::parse("trialwise_recognition").unwrap();
    let config = config(dir.path(), ScoringStrategy::Corrected, 1);
    write_behaviour(dir.path(), &subject);
    std::fs::write(
        dir.path()
            .join("Ginsburg_Timing_Info")
            .join("EL002_memory_regressors.csv"),
        "recognition\n1\n0\n",
    )
    .unwrap();
    let store = in_memory_inputs(&config, &subject, &analysis);

    let err = SubjectPipeline::new(&config, &store, &NearestNeighbourResampler)
        .run(&subject, &analysis)
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Input(InputError::TrialCountMismatch { timing: 4, labels: 2, .. })
    ));
    let diagnostic = err.diagnostic();
    assert!(diagnostic.contains("EL002_trial_timing.txt"), "{diagnostic}");
    assert!(diagnostic.contains("EL002_memory_regressors.csv"), "{diagnostic}");
}

#[test]
fn test_trial_past_end_of_run_names_timing_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let subject = SubjectId::parse("002").unwrap();
    let analysis = AnalysisType::parse("trialwise_recognition").unwrap();
    let config = config(dir.path(), ScoringStrategy::Corrected, 1);
    write_behaviour(dir.path(), &subject);
    // Onset 30 at TR 2 starts at sample 15; the runs have 12 samples.
    std::fs::write(
        dir.path()
            .join("Ginsburg_Timing_Info")
            .join("EL002_trial_timing.txt"),
        "0 4\n4 4\n8 4\n30 4\n",
    )
    .unwrap();
    let store = in_memory_inputs(&config, &subject, &analysis);

    let err = SubjectPipeline::new(&config, &store, &NearestNeighbourResampler)
        .run(&subject, &analysis)
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Input(InputError::MalformedTiming { trial: 3, .. })
    ));
    let diagnostic = err.diagnostic();
    assert!(diagnostic.contains("EL002_trial_timing.txt"), "{diagnostic}");
}

/// Write a 4-D run with an identity-scaled sform.
fn write_nifti_run(path: &Path, data: &Array4<f64>) {
    let header = NiftiHeader {
        sform_code: 1,
        srow_x: [2.0, 0.0, 0.0, 0.0],
        srow_y: [0.0, 2.0, 0.0, 0.0],
        srow_z: [0.0, 0.0, 2.0, 0.0],
        pixdim: [1.0, 2.0, 2.0, 2.0, 2.0, 1.0, 1.0, 1.0],
        ..NiftiHeader::default()
    };
    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(data)
        .unwrap();
}

#[test]
fn test_nifti_files_end_to_end() {
    let dir = tempfile::TempDir::new().unwrap();
    let subject = SubjectId::parse("002").unwrap();
    let analysis = AnalysisType::parse("trialwise_recognition").unwrap();
    let config = config(dir.path(), ScoringStrategy::Corrected, 2);
    write_behaviour(dir.path(), &subject);

    let inputs = SubjectInputs::resolve(&config, &subject, &analysis);
    std::fs::create_dir_all(dir.path().join("mvpa_preproc_files")).unwrap();
    for kind in RunKind::ALL {
        write_nifti_run(inputs.run(kind), &synthetic_run(10 + kind.index() as u64));
    }
    NiftiStore
        .save_image(
            &Volume3::new(Array3::from_elem((DIM, DIM, DIM), 1.0), scaling_affine([2.0, 2.0, 2.0])),
            &inputs.brain_mask,
        )
        .unwrap();

    let summary = SubjectPipeline::new(&config, &NiftiStore, &NearestNeighbourResampler)
        .run(&subject, &analysis)
        .unwrap();

    assert_eq!(summary.outputs.len(), 3);
    for path in &summary.outputs {
        assert!(path.is_file());
        let map = NiftiStore.load_image(path).unwrap();
        assert_eq!(map.data.dim(), (DIM, DIM, DIM));
        assert_eq!(map.voxel_size(), [2.0, 2.0, 2.0]);
    }
}
