use crate::core::io::adjacency::{AdjacencyFile, AdjacencyStore};
use crate::core::io::pair_list::PairListFile;
use crate::core::io::report::ReportRow;
use crate::core::io::solvent_table::{SolventTable, SolventTableFile};
use crate::core::io::traits::InputFile;
use crate::core::models::request::PairRequest;
use crate::engine::assembler::{self, ConsistencyFault};
use crate::engine::batch::{self, BatchContext};
use crate::engine::config::PipelineConfig;
use crate::engine::error::{EngineError, ReferenceKind, UnknownReference};
use crate::engine::extractor::ResultExtractor;
use crate::engine::invoker::Estimator;
use crate::engine::planner::{self, BatchPlan};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::results::{ErrorLog, ResultTable};
use crate::engine::staging::StagingArea;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// Locations of the three input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub adjacency: PathBuf,
    pub solvent_table: PathBuf,
    pub pair_list: PathBuf,
}

/// The parsed inputs of a run.
#[derive(Debug, Clone)]
pub struct PipelineInputs {
    pub adjacency: AdjacencyStore,
    pub solvents: SolventTable,
    pub requests: Vec<PairRequest>,
}

impl PipelineInputs {
    pub fn load(paths: &InputPaths, identifier_prefix: &str) -> Result<Self, EngineError> {
        info!("Loading adjacency lists from {:?}", &paths.adjacency);
        let adjacency = AdjacencyFile::with_prefix(identifier_prefix)
            .read_from_path(&paths.adjacency)
            .map_err(|source| EngineError::AdjacencyLoad {
                path: paths.adjacency.clone(),
                source,
            })?;

        info!("Loading solvent parameters from {:?}", &paths.solvent_table);
        let solvents = SolventTableFile
            .read_from_path(&paths.solvent_table)
            .map_err(|source| EngineError::TableLoad {
                kind: "solvent table",
                path: paths.solvent_table.clone(),
                source,
            })?;

        info!("Loading solvent/solute pairs from {:?}", &paths.pair_list);
        let requests = PairListFile
            .read_from_path(&paths.pair_list)
            .map_err(|source| EngineError::TableLoad {
                kind: "pair list",
                path: paths.pair_list.clone(),
                source,
            })?;

        info!(
            solutes = adjacency.len(),
            solvents = solvents.len(),
            requests = requests.len(),
            "Inputs loaded."
        );
        Ok(Self {
            adjacency,
            solvents,
            requests,
        })
    }

    /// Checks that every request joins against both lookup files.
    ///
    /// All unknown names are collected (once each, in order of first use) so a
    /// single failed run shows every problem.
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut unknown: Vec<UnknownReference> = Vec::new();
        let mut index: HashMap<(ReferenceKind, &str), usize> = HashMap::new();

        for request in &self.requests {
            let checks = [
                (
                    ReferenceKind::Solvent,
                    request.solvent.as_str(),
                    self.solvents.contains(request.solvent.as_str()),
                ),
                (
                    ReferenceKind::Solute,
                    request.solute.as_str(),
                    self.adjacency.contains(request.solute.as_str()),
                ),
            ];
            for (kind, name, known) in checks {
                if known {
                    continue;
                }
                match index.get(&(kind, name)) {
                    Some(&pos) => unknown[pos].occurrences += 1,
                    None => {
                        index.insert((kind, name), unknown.len());
                        unknown.push(UnknownReference {
                            kind,
                            name: name.to_string(),
                            first_row: request.row,
                            occurrences: 1,
                        });
                    }
                }
            }
        }

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(EngineError::UnresolvedReferences { unknown })
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub requests: usize,
    pub batches: usize,
    pub failed_batches: usize,
    pub resolved_values: usize,
}

#[derive(Debug)]
pub struct RunReport {
    pub rows: Vec<ReportRow>,
    pub errors: ErrorLog,
    pub faults: Vec<ConsistencyFault>,
    pub unresolved: usize,
    pub stats: RunStats,
    pub staging_dir: Option<PathBuf>, // Set when staging files were kept
}

/// Validates the inputs and groups the requests, without invoking anything.
pub fn prepare(inputs: &PipelineInputs) -> Result<BatchPlan, EngineError> {
    inputs.validate()?;
    Ok(planner::plan(&inputs.requests))
}

#[instrument(skip_all, name = "solvation_workflow")]
pub fn run(
    inputs: &PipelineInputs,
    config: &PipelineConfig,
    estimator: &dyn Estimator,
    reporter: &ProgressReporter,
) -> Result<RunReport, EngineError> {
    // === Phase 1: Preconditions and planning ===
    let plan = reporter.phase("Validating inputs", || prepare(inputs))?;
    info!(
        batches = plan.len(),
        solutes = plan.total_solutes(),
        "Planned one estimator batch per solvent."
    );

    // === Phase 2: Sequential batches ===
    let mut staging = StagingArea::create(&config.staging)?;
    let extractor = ResultExtractor::new(&config.identifier_prefix);
    let ctx = BatchContext {
        estimator,
        extractor: &extractor,
        adjacency: &inputs.adjacency,
        output_file: &config.estimator.output_file,
    };

    let mut results = ResultTable::new();
    let mut errors = ErrorLog::new();
    let mut stats = RunStats {
        requests: inputs.requests.len(),
        batches: plan.len(),
        ..RunStats::default()
    };

    reporter.report(Progress::BatchesPlanned {
        total: plan.len() as u64,
    });
    for (index, group) in plan.groups().enumerate() {
        let solvent = inputs.solvents.get(group.solvent.as_str()).ok_or_else(|| {
            EngineError::Internal(format!(
                "solvent '{}' passed validation but is not in the table",
                group.solvent
            ))
        })?;
        reporter.report(Progress::BatchStart {
            index,
            solvent: group.solvent.to_string(),
            solutes: group.solutes.len(),
        });

        let workdir = staging.batch_dir(&group.solvent)?;
        let outcome = batch::run_batch(&ctx, solvent, group, &workdir, &mut results, &mut errors)?;
        if outcome.failed {
            stats.failed_batches += 1;
        }
        stats.resolved_values += outcome.resolved;

        reporter.report(Progress::BatchFinish {
            solvent: group.solvent.to_string(),
            resolved: outcome.resolved,
            failed: outcome.failed,
        });
    }

    if staging.is_kept() {
        reporter.report(Progress::Message(format!(
            "Staging files kept in {}",
            staging.path().display()
        )));
    }

    // === Phase 3: Assembly in request order ===
    let assembly = reporter.phase("Assembling report", || {
        assembler::assemble(
            &inputs.requests,
            &results,
            &errors,
            config.missing_result_policy,
        )
    })?;

    if !errors.is_empty() {
        warn!(
            "{} of {} batch(es) reported errors.",
            stats.failed_batches, stats.batches
        );
    }
    info!(
        rows = assembly.rows.len(),
        faults = assembly.faults.len(),
        "Workflow complete."
    );

    Ok(RunReport {
        rows: assembly.rows,
        errors,
        faults: assembly.faults,
        unresolved: assembly.unresolved,
        stats,
        staging_dir: staging.is_kept().then(|| staging.path().to_path_buf()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::estimator::EstimatorInput;
    use crate::engine::config::{MissingResultPolicy, PipelineConfigBuilder};
    use crate::engine::invoker::{EstimatorOutput, InvocationError};
    use crate::engine::results::BatchErrorKind;
    use std::cell::RefCell;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::{TempDir, tempdir};

    const ADJACENCY: &str = "\
InChI=A
1 C u0 p0 c0

InChI=B
1 O u0 p2 c0

InChI=C
1 N u0 p1 c0
";

    const SOLVENTS: &str = "\
Solvents,c,e,s,a,b,l
water,0,0,0,0,0,1
ethanol,0.1,0.2,0.3,0.4,0.5,0.6
octanol,0.01,0.02,0.03,0.04,0.05,0.06
";

    enum Reply {
        Output(EstimatorOutput),
        TimedOut,
    }

    /// Answers each solvent with a canned reply and records every input it sees.
    #[derive(Default)]
    struct ScriptedEstimator {
        replies: HashMap<String, Reply>,
        calls: RefCell<Vec<(String, String)>>,
    }

    impl ScriptedEstimator {
        fn reply(mut self, solvent: &str, reply: Reply) -> Self {
            self.replies.insert(solvent.to_string(), reply);
            self
        }

        fn output(self, solvent: &str, text: &str) -> Self {
            self.reply(
                solvent,
                Reply::Output(EstimatorOutput {
                    output: Some(text.to_string()),
                    exit_code: Some(0),
                    ..EstimatorOutput::default()
                }),
            )
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.borrow().clone()
        }
    }

    impl Estimator for ScriptedEstimator {
        fn invoke(
            &self,
            input: &EstimatorInput,
            workdir: &Path,
        ) -> Result<EstimatorOutput, InvocationError> {
            assert!(workdir.is_dir());
            self.calls
                .borrow_mut()
                .push((input.solvent().to_string(), input.text().to_string()));
            match self.replies.get(input.solvent().as_str()) {
                Some(Reply::Output(output)) => Ok(output.clone()),
                Some(Reply::TimedOut) => Err(InvocationError::Timeout {
                    timeout: Duration::from_secs(5),
                }),
                None => Ok(EstimatorOutput::default()),
            }
        }
    }

    fn inputs(pairs: &str) -> PipelineInputs {
        PipelineInputs {
            adjacency: AdjacencyFile::default().read_from_str(ADJACENCY).unwrap(),
            solvents: SolventTableFile.read_from_str(SOLVENTS).unwrap(),
            requests: PairListFile.read_from_str(pairs).unwrap(),
        }
    }

    fn config(staging: &TempDir, policy: MissingResultPolicy) -> PipelineConfig {
        PipelineConfigBuilder::new()
            .program("java")
            .main_class("AbrahamMain")
            .staging_root(Some(staging.path().to_path_buf()))
            .missing_result_policy(policy)
            .build()
            .unwrap()
    }

    fn run_with(
        pairs: &str,
        estimator: &ScriptedEstimator,
        policy: MissingResultPolicy,
    ) -> Result<RunReport, EngineError> {
        let staging = tempdir().unwrap();
        run(
            &inputs(pairs),
            &config(&staging, policy),
            estimator,
            &ProgressReporter::new(),
        )
    }

    fn triples(rows: &[ReportRow]) -> Vec<(&str, &str, &str)> {
        rows.iter()
            .map(|r| (r.solvent.as_str(), r.solute.as_str(), r.log_k.as_str()))
            .collect()
    }

    #[test]
    fn single_solvent_batch_resolves_every_request() {
        let estimator = ScriptedEstimator::default().output(
            "water",
            "Solvent: water\nInChI=A 1.23\nInChI=B 4.56\n",
        );

        let report = run_with(
            "Solvent,Solute\nwater,InChI=A\nwater,InChI=B\n",
            &estimator,
            MissingResultPolicy::Report,
        )
        .unwrap();

        assert_eq!(
            triples(&report.rows),
            vec![("water", "InChI=A", "1.23"), ("water", "InChI=B", "4.56")]
        );
        assert!(report.errors.is_empty());
        assert!(report.faults.is_empty());
        assert_eq!(report.stats.batches, 1);
        assert_eq!(report.stats.resolved_values, 2);

        let calls = estimator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].1,
            "SolventParameters: 0 0 0 0 0 1   water\n\n\
             InChI=A\n1 C u0 p0 c0\n\n\
             InChI=B\n1 O u0 p2 c0\n\n"
        );
    }

    #[test]
    fn one_invocation_per_distinct_solvent() {
        let estimator = ScriptedEstimator::default()
            .output("water", "Solvent: water\nInChI=A 1.0\nInChI=C 3.0\n")
            .output("octanol", "Solvent: octanol\nInChI=B 2.0\n");

        let report = run_with(
            "Solvent,Solute\nwater,InChI=A\noctanol,InChI=B\nwater,InChI=C\nwater,InChI=A\n",
            &estimator,
            MissingResultPolicy::Report,
        )
        .unwrap();

        assert_eq!(estimator.calls().len(), 2);
        assert_eq!(
            triples(&report.rows),
            vec![
                ("water", "InChI=A", "1.0"),
                ("octanol", "InChI=B", "2.0"),
                ("water", "InChI=C", "3.0"),
                ("water", "InChI=A", "1.0"),
            ]
        );
    }

    #[test]
    fn diagnostics_are_logged_without_stopping_other_batches() {
        let estimator = ScriptedEstimator::default()
            .output("water", "Solvent: water\nInChI=A 1.23\n")
            .reply(
                "ethanol",
                Reply::Output(EstimatorOutput {
                    diagnostics: "java.lang.NullPointerException\n".to_string(),
                    exit_code: Some(1),
                    ..EstimatorOutput::default()
                }),
            );

        let report = run_with(
            "Solvent,Solute\nethanol,InChI=B\nwater,InChI=A\n",
            &estimator,
            MissingResultPolicy::Report,
        )
        .unwrap();

        assert_eq!(triples(&report.rows), vec![("water", "InChI=A", "1.23")]);
        assert_eq!(report.unresolved, 1);
        assert_eq!(report.stats.failed_batches, 1);
        assert!(report.errors.iter().all(|e| e.solvent.as_str() == "ethanol"));
        let first = report.errors.iter().next().unwrap();
        assert!(matches!(first.kind, BatchErrorKind::Diagnostics(_)));
        assert!(first.to_string().contains("dissolved in ethanol"));
    }

    #[test]
    fn values_written_alongside_diagnostics_are_kept() {
        let estimator = ScriptedEstimator::default().reply(
            "water",
            Reply::Output(EstimatorOutput {
                diagnostics: "warning: slow convergence\n".to_string(),
                exit_code: Some(0),
                output: Some("Solvent: water\nInChI=A 0.75\n".to_string()),
                stdout: String::new(),
            }),
        );

        let report = run_with(
            "Solvent,Solute\nwater,InChI=A\n",
            &estimator,
            MissingResultPolicy::Report,
        )
        .unwrap();

        assert_eq!(triples(&report.rows), vec![("water", "InChI=A", "0.75")]);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn unknown_references_stop_the_run_before_any_invocation() {
        let estimator = ScriptedEstimator::default();

        let err = run_with(
            "Solvent,Solute\nwater,InChI=Z\nbenzene,InChI=A\nwater,InChI=Z\n",
            &estimator,
            MissingResultPolicy::Report,
        )
        .unwrap_err();

        assert!(estimator.calls().is_empty());
        match err {
            EngineError::UnresolvedReferences { unknown } => {
                assert_eq!(unknown.len(), 2);
                assert_eq!(unknown[0].kind, ReferenceKind::Solute);
                assert_eq!(unknown[0].name, "InChI=Z");
                assert_eq!(unknown[0].first_row, 1);
                assert_eq!(unknown[0].occurrences, 2);
                assert_eq!(unknown[1].kind, ReferenceKind::Solvent);
                assert_eq!(unknown[1].name, "benzene");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn mismatched_solvent_header_fails_only_that_batch() {
        let estimator = ScriptedEstimator::default()
            .output("water", "Solvent: water\nInChI=A 1.0\n")
            .output("octanol", "Solvent: propanol\nInChI=B 2.0\n");

        let report = run_with(
            "Solvent,Solute\noctanol,InChI=B\nwater,InChI=A\n",
            &estimator,
            MissingResultPolicy::Report,
        )
        .unwrap();

        assert_eq!(triples(&report.rows), vec![("water", "InChI=A", "1.0")]);
        let error = report.errors.iter().next().unwrap();
        assert_eq!(error.solvent.as_str(), "octanol");
        assert!(matches!(error.kind, BatchErrorKind::Extraction(_)));
    }

    #[test]
    fn timeouts_and_missing_output_are_batch_errors() {
        let estimator = ScriptedEstimator::default()
            .reply("water", Reply::TimedOut)
            .reply("octanol", Reply::Output(EstimatorOutput::default()));

        let report = run_with(
            "Solvent,Solute\nwater,InChI=A\noctanol,InChI=B\n",
            &estimator,
            MissingResultPolicy::Report,
        )
        .unwrap();

        assert!(report.rows.is_empty());
        assert_eq!(report.stats.failed_batches, 2);
        let kinds: Vec<_> = report.errors.iter().map(|e| &e.kind).collect();
        assert!(kinds.iter().any(|k| matches!(k, BatchErrorKind::Invocation(_))));
        assert!(kinds.iter().any(|k| matches!(k, BatchErrorKind::MissingOutput(_))));
    }

    #[test]
    fn silently_missing_value_is_a_consistency_fault() {
        let estimator =
            ScriptedEstimator::default().output("water", "Solvent: water\nInChI=A 1.0\n");
        let pairs = "Solvent,Solute\nwater,InChI=A\nwater,InChI=B\n";

        let report = run_with(pairs, &estimator, MissingResultPolicy::Report).unwrap();
        assert_eq!(triples(&report.rows), vec![("water", "InChI=A", "1.0")]);
        assert_eq!(report.faults.len(), 1);
        assert_eq!(report.faults[0].solute.as_str(), "InChI=B");
        assert_eq!(report.faults[0].row, 2);

        let err = run_with(pairs, &estimator, MissingResultPolicy::Abort).unwrap_err();
        assert!(matches!(err, EngineError::MissingResult(_)));
    }

    #[test]
    fn progress_events_bracket_each_batch() {
        let estimator = ScriptedEstimator::default()
            .output("water", "Solvent: water\nInChI=A 1.0\n")
            .output("octanol", "Solvent: octanol\nInChI=B 2.0\n");
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));
        let staging = tempdir().unwrap();

        run(
            &inputs("Solvent,Solute\nwater,InChI=A\noctanol,InChI=B\n"),
            &config(&staging, MissingResultPolicy::Report),
            &estimator,
            &reporter,
        )
        .unwrap();

        let events = events.lock().unwrap();
        assert!(events.contains(&Progress::BatchesPlanned { total: 2 }));
        let starts = events
            .iter()
            .filter(|e| matches!(e, Progress::BatchStart { .. }))
            .count();
        let finishes = events
            .iter()
            .filter(|e| matches!(e, Progress::BatchFinish { failed: false, .. }))
            .count();
        assert_eq!((starts, finishes), (2, 2));
    }

    #[test]
    fn solvent_table_row_order_does_not_change_batches_or_report() {
        let pairs = "Solvent,Solute\noctanol,InChI=B\nwater,InChI=A\nethanol,InChI=C\nwater,InChI=B\n";
        let mut lines: Vec<&str> = SOLVENTS.lines().collect();
        lines[1..].reverse();
        let reversed = format!("{}\n", lines.join("\n"));

        let forward = inputs(pairs);
        let backward = PipelineInputs {
            solvents: SolventTableFile.read_from_str(&reversed).unwrap(),
            ..inputs(pairs)
        };

        let solute_sets = |plan: &BatchPlan| {
            let mut sets: Vec<(String, Vec<String>)> = plan
                .groups()
                .map(|g| {
                    let mut solutes: Vec<String> =
                        g.solutes.iter().map(ToString::to_string).collect();
                    solutes.sort();
                    (g.solvent.to_string(), solutes)
                })
                .collect();
            sets.sort();
            sets
        };
        assert_eq!(
            solute_sets(&prepare(&forward).unwrap()),
            solute_sets(&prepare(&backward).unwrap())
        );

        let estimator = ScriptedEstimator::default()
            .output("water", "Solvent: water\nInChI=A 1.0\nInChI=B 1.5\n")
            .output("ethanol", "Solvent: ethanol\nInChI=C 2.0\n")
            .output("octanol", "Solvent: octanol\nInChI=B 3.0\n");
        let staging = tempdir().unwrap();
        let config = config(&staging, MissingResultPolicy::Report);
        let first = run(&forward, &config, &estimator, &ProgressReporter::new()).unwrap();
        let second = run(&backward, &config, &estimator, &ProgressReporter::new()).unwrap();

        assert_eq!(triples(&first.rows), triples(&second.rows));
        assert_eq!(
            triples(&first.rows),
            vec![
                ("octanol", "InChI=B", "3.0"),
                ("water", "InChI=A", "1.0"),
                ("ethanol", "InChI=C", "2.0"),
                ("water", "InChI=B", "1.5"),
            ]
        );
    }

    #[test]
    fn staging_is_removed_unless_kept() {
        let estimator =
            ScriptedEstimator::default().output("water", "Solvent: water\nInChI=A 1.0\n");
        let staging = tempdir().unwrap();
        let pairs = "Solvent,Solute\nwater,InChI=A\n";

        let report = run(
            &inputs(pairs),
            &config(&staging, MissingResultPolicy::Report),
            &estimator,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert!(report.staging_dir.is_none());
        assert_eq!(std::fs::read_dir(staging.path()).unwrap().count(), 0);

        let mut kept = config(&staging, MissingResultPolicy::Report);
        kept.staging.keep = true;
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&messages);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::Message(msg) = event {
                sink.lock().unwrap().push(msg);
            }
        }));
        let report = run(&inputs(pairs), &kept, &estimator, &reporter).unwrap();
        let dir = report.staging_dir.unwrap();
        assert!(dir.is_dir());
        assert!(dir.starts_with(staging.path()));
        assert_eq!(
            *messages.lock().unwrap(),
            vec![format!("Staging files kept in {}", dir.display())]
        );
    }

    #[test]
    fn load_reports_which_file_failed() {
        let dir = tempdir().unwrap();
        let paths = InputPaths {
            adjacency: dir.path().join("adjList.txt"),
            solvent_table: dir.path().join("Solvent Database.csv"),
            pair_list: dir.path().join("Solvent-Solute list.csv"),
        };
        std::fs::write(&paths.adjacency, ADJACENCY).unwrap();
        std::fs::write(&paths.solvent_table, "Solvents,c,e\nwater,0,0\n").unwrap();
        std::fs::write(&paths.pair_list, "Solvent,Solute\nwater,InChI=A\n").unwrap();

        let err = PipelineInputs::load(&paths, "InChI=").unwrap_err();
        assert!(
            matches!(err, EngineError::TableLoad { kind: "solvent table", ref path, .. } if path == &paths.solvent_table)
        );

        std::fs::write(&paths.solvent_table, SOLVENTS).unwrap();
        let inputs = PipelineInputs::load(&paths, "InChI=").unwrap();
        assert_eq!(inputs.requests.len(), 1);
        assert_eq!(prepare(&inputs).unwrap().len(), 1);
    }
}
