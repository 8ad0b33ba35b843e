use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use revision_bisect::{
    locate_fix, locate_introduction, max_probes, BuildConfig, ProbeAdapter, ProbeError,
    RevisionSource, Signal,
};

mod display;
mod git;
mod helper;

use display::SearchGoal;
use git::GitRepo;
use helper::{HelperBuild, HelperRepro, DEFAULT_BUILD_CMD, DEFAULT_REPRO_CMD};

/// Locates the revision at which a fuzzer-reported failure was introduced,
/// or (with --find-fix) the revision at which it was fixed.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Name of the project whose fuzz target reported the failure
    #[arg(long)]
    project_name: String,

    /// Oldest revision of the search range
    #[arg(long)]
    commit_old: String,

    /// Newest revision of the search range
    #[arg(long)]
    commit_new: String,

    /// Name of the fuzz target to build and run
    #[arg(long)]
    fuzzer_name: String,

    /// Failure-triggering input to reproduce with
    #[arg(long)]
    test_case: PathBuf,

    /// Local clone of the project repository (the shared working copy)
    #[arg(long)]
    repo: PathBuf,

    /// Directory the build/reproduce commands run from
    #[arg(long, default_value = ".")]
    oss_fuzz_dir: PathBuf,

    /// Fuzzing engine to build with
    #[arg(long, default_value = "libfuzzer")]
    engine: String,

    /// The default is "address"; "dataflow" for the "dataflow" engine
    #[arg(long, default_value = "address")]
    sanitizer: String,

    #[arg(long, default_value = "x86_64")]
    architecture: String,

    /// Search for the revision that fixed the failure instead
    #[arg(long)]
    find_fix: bool,

    /// Wall-clock budget for one reproduction run, in seconds (0 = none)
    #[arg(long, default_value_t = 0)]
    timeout: u64,

    /// Override for the build command template ({project}, {fuzzer},
    /// {engine}, {sanitizer}, {architecture}, {revision} placeholders)
    #[arg(long)]
    build_cmd: Option<String>,

    /// Override for the reproduce command template ({project}, {fuzzer},
    /// {testcase}, {revision} placeholders)
    #[arg(long)]
    repro_cmd: Option<String>,

    /// Dump the full bisection state after every probe
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let code = run(args)?;
    std::process::exit(code);
}

fn run(args: Args) -> Result<i32> {
    let repo = GitRepo::new(args.repo.clone());
    let revisions = repo
        .enumerate(&args.commit_old, &args.commit_new)
        .context("failed to resolve the revision range")?;
    eprintln!(
        "bisecting {} revisions between {} and {}",
        revisions.len(),
        args.commit_old,
        args.commit_new
    );

    let config = BuildConfig {
        engine: args.engine.clone(),
        sanitizer: args.sanitizer.clone(),
        architecture: args.architecture.clone(),
    };
    let build = HelperBuild::new(
        args.project_name.clone(),
        args.fuzzer_name.clone(),
        args.oss_fuzz_dir.clone(),
        args.build_cmd.clone().unwrap_or_else(|| DEFAULT_BUILD_CMD.to_string()),
    );
    let timeout = (args.timeout > 0).then(|| Duration::from_secs(args.timeout));
    let repro = HelperRepro::new(
        args.oss_fuzz_dir.clone(),
        args.repro_cmd.clone().unwrap_or_else(|| DEFAULT_REPRO_CMD.to_string()),
        timeout,
    );
    let mut adapter = ProbeAdapter::new(repo, build, repro, config, args.test_case.clone());

    let goal = if args.find_fix {
        SearchGoal::Fix
    } else {
        SearchGoal::Introduction
    };
    // The baseline comes from the endpoint assumed to exhibit the failure:
    // the newest revision for an introduction search, the oldest for a fix
    // search.
    let reference = match goal {
        SearchGoal::Introduction => revisions.len() - 1,
        SearchGoal::Fix => 0,
    };
    let reference_id = revisions
        .get(reference)
        .expect("reference endpoint inside revision list")
        .to_string();

    eprintln!("capturing baseline signal at revision {reference_id}");
    let baseline = adapter
        .observe(&revisions, reference)
        .context("failed to capture the baseline signal")?;
    if baseline == Signal::Clean {
        eprintln!("no crash at reference revision {reference_id}; nothing to search for");
        return Ok(display::report(
            goal,
            revision_bisect::BisectionOutcome::NeverReproduced,
            &revisions,
        ));
    }
    eprintln!("baseline signal: {baseline}");

    let pb = display::probe_bar(max_probes(revisions.len()));
    let mut probes = 0u64;
    let mut last_failing = None;

    let result = {
        let revisions = &revisions;
        let pb = &pb;
        let run_probe = |idx: usize| -> std::result::Result<bool, ProbeError> {
            probes += 1;
            let id = revisions.get(idx).unwrap_or("?");
            pb.println(format!("probing revision {id} ({}/{})", idx + 1, revisions.len()));
            let matched = adapter.probe(revisions, idx, baseline)?;
            if matched {
                last_failing = Some(idx);
            }
            pb.println(format!(
                "revision {id}: {}",
                if matched {
                    "failure matches baseline"
                } else {
                    "no matching failure"
                }
            ));
            if args.verbose {
                display::render_range(revisions, idx, last_failing);
            }
            pb.inc(1);
            Ok(matched)
        };
        if args.find_fix {
            locate_fix(revisions.len(), run_probe)
        } else {
            locate_introduction(revisions.len(), run_probe)
        }
    };
    pb.finish_and_clear();

    let outcome = result.context("bisection aborted")?;
    eprintln!("{probes} probes performed");
    Ok(display::report(goal, outcome, &revisions))
}
