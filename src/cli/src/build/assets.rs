/* src/cli/src/build/assets.rs */

// Copies the public directory into dist verbatim. Absence of the
// directory is fine; a site without static assets is still a site.

use std::path::Path;

use anyhow::{Context, Result};

pub struct CopySummary {
  pub files: usize,
  pub bytes: u64,
}

pub fn copy_public_dir(public: &Path, dist: &Path) -> Result<CopySummary> {
  let mut summary = CopySummary { files: 0, bytes: 0 };
  if !public.is_dir() {
    return Ok(summary);
  }
  copy_recursive(public, dist, &mut summary)?;
  Ok(summary)
}

fn copy_recursive(from: &Path, to: &Path, summary: &mut CopySummary) -> Result<()> {
  std::fs::create_dir_all(to).with_context(|| format!("failed to create {}", to.display()))?;
  for entry in
    std::fs::read_dir(from).with_context(|| format!("failed to read {}", from.display()))?
  {
    let entry = entry?;
    let src = entry.path();
    let dst = to.join(entry.file_name());
    if src.is_dir() {
      copy_recursive(&src, &dst, summary)?;
    } else {
      let bytes = std::fs::copy(&src, &dst)
        .with_context(|| format!("failed to copy {} to {}", src.display(), dst.display()))?;
      summary.files += 1;
      summary.bytes += bytes;
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn copies_nested_files() {
    let dir = tempfile::tempdir().unwrap();
    let public = dir.path().join("public");
    std::fs::create_dir_all(public.join("img")).unwrap();
    std::fs::write(public.join("robots.txt"), "User-agent: *\n").unwrap();
    std::fs::write(public.join("img/logo.svg"), "<svg/>").unwrap();

    let dist = dir.path().join("dist");
    let summary = copy_public_dir(&public, &dist).unwrap();
    assert_eq!(summary.files, 2);
    assert!(dist.join("robots.txt").is_file());
    assert!(dist.join("img/logo.svg").is_file());
  }

  #[test]
  fn missing_public_dir_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let summary =
      copy_public_dir(&dir.path().join("public"), &dir.path().join("dist")).unwrap();
    assert_eq!(summary.files, 0);
  }
}
