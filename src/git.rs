use std::path::PathBuf;
use std::process::{Command, Output};

use revision_bisect::{CheckoutError, RangeError, RevisionList, RevisionSource};

/// Revision source backed by a local git clone.
///
/// All probes share this one working copy; `checkout` mutates it in place,
/// so the caller serializes probes.
pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    pub fn new(path: PathBuf) -> Self {
        GitRepo { path }
    }

    fn git(&self, args: &[&str]) -> Result<Output, std::io::Error> {
        Command::new("git").arg("-C").arg(&self.path).args(args).output()
    }

    fn rev_parse(&self, id: &str) -> Result<Option<String>, RangeError> {
        let out = self
            .git(&["rev-parse", "--verify", "--quiet", &format!("{id}^{{commit}}")])
            .map_err(|e| RangeError::Enumeration {
                reason: format!("failed to run git: {e}"),
            })?;
        if !out.status.success() {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&out.stdout).trim().to_string()))
    }
}

impl RevisionSource for GitRepo {
    /// `[old] + git rev-list --reverse --first-parent old..new`: inclusive of
    /// both endpoints, oldest first.
    fn enumerate(&self, old: &str, new: &str) -> Result<RevisionList, RangeError> {
        let old_sha = self.rev_parse(old)?.ok_or_else(|| RangeError::UnknownRevision {
            id: old.to_string(),
        })?;
        let new_sha = self.rev_parse(new)?.ok_or_else(|| RangeError::UnknownRevision {
            id: new.to_string(),
        })?;

        let ancestry = self
            .git(&["merge-base", "--is-ancestor", &old_sha, &new_sha])
            .map_err(|e| RangeError::Enumeration {
                reason: format!("failed to run git: {e}"),
            })?;
        if !ancestry.status.success() {
            return Err(RangeError::NotAncestor {
                old: old.to_string(),
                new: new.to_string(),
            });
        }

        let out = self
            .git(&[
                "rev-list",
                "--reverse",
                "--first-parent",
                &format!("{old_sha}..{new_sha}"),
            ])
            .map_err(|e| RangeError::Enumeration {
                reason: format!("failed to run git: {e}"),
            })?;
        if !out.status.success() {
            return Err(RangeError::Enumeration {
                reason: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }

        let mut revisions = vec![old_sha];
        revisions.extend(
            String::from_utf8_lossy(&out.stdout)
                .lines()
                .map(str::to_string),
        );
        RevisionList::new(revisions)
    }

    fn checkout(&mut self, revision: &str) -> Result<(), CheckoutError> {
        let out = self
            .git(&["checkout", "--force", "--quiet", revision])
            .map_err(|e| CheckoutError {
                revision: revision.to_string(),
                reason: format!("failed to run git: {e}"),
            })?;
        if !out.status.success() {
            return Err(CheckoutError {
                revision: revision.to_string(),
                reason: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
