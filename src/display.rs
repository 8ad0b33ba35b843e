use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use revision_bisect::{BisectionOutcome, RevisionList};

/// What the run is searching for; picks the wording of the final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchGoal {
    Introduction,
    Fix,
}

pub fn probe_bar(max_probes: u64) -> ProgressBar {
    let pb = ProgressBar::new(max_probes);
    pb.set_draw_target(ProgressDrawTarget::stderr_with_hz(5));
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] probe {pos}/{len}",
        )
        .unwrap(),
    );
    pb
}

/// Dumps the whole range with the current probe and the most recent failing
/// revision marked, newest first.
pub fn render_range(revisions: &RevisionList, current: usize, last_failing: Option<usize>) {
    eprintln!();
    eprintln!("bisection state (newest first):");
    for idx in (0..revisions.len()).rev() {
        let id = revisions.get(idx).unwrap_or("?");
        let marker = if idx == current {
            "  <- probing"
        } else if Some(idx) == last_failing {
            "  <- most recent failing"
        } else {
            ""
        };
        eprintln!("  {id}{marker}");
    }
}

/// Prints the final report and returns the process exit code: 0 when a
/// boundary revision was determined, 2 when the range could not be
/// localized.
pub fn report(goal: SearchGoal, outcome: BisectionOutcome, revisions: &RevisionList) -> i32 {
    let (old, new) = (revisions.oldest(), revisions.newest());
    match (goal, outcome) {
        (SearchGoal::Introduction, BisectionOutcome::FoundAt(idx)) => {
            let id = revisions.get(idx).unwrap_or("?");
            println!("failure introduced at revision {id}");
            0
        }
        (SearchGoal::Fix, BisectionOutcome::FoundAt(idx)) => {
            let id = revisions.get(idx).unwrap_or("?");
            println!("failure fixed at revision {id}");
            0
        }
        (SearchGoal::Introduction, BisectionOutcome::PresentAcrossRange) => {
            println!("failure present across full range {old}..{new}; introduced at or before {old}");
            2
        }
        (SearchGoal::Fix, BisectionOutcome::PresentAcrossRange) => {
            println!("failure still present at {new}; not fixed within range {old}..{new}");
            2
        }
        (_, BisectionOutcome::NeverReproduced) => {
            println!("failure not reproducible across range {old}..{new}");
            2
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn revs() -> RevisionList {
        RevisionList::new(vec!["r0".to_string(), "r1".to_string(), "r2".to_string()]).unwrap()
    }

    #[test]
    fn test_exit_codes() {
        let revisions = revs();
        assert_eq!(
            report(SearchGoal::Introduction, BisectionOutcome::FoundAt(1), &revisions),
            0
        );
        assert_eq!(
            report(SearchGoal::Fix, BisectionOutcome::FoundAt(2), &revisions),
            0
        );
        assert_eq!(
            report(
                SearchGoal::Introduction,
                BisectionOutcome::PresentAcrossRange,
                &revisions
            ),
            2
        );
        assert_eq!(
            report(
                SearchGoal::Introduction,
                BisectionOutcome::NeverReproduced,
                &revisions
            ),
            2
        );
    }
}
