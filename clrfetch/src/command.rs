use crate::download::DownloadManager;
use crate::unpack::unpack_to_product_directory;
use crate::{FetchEnv, REPOSITORY_ID, REPOSITORY_TYPE};
use anyhow::Result;
use azdo::Build;
use console::style;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildSelectError {
    #[error("there is no build corresponding to source_version: {0}")]
    NotFound(String),
    #[error("there is more than one build corresponding to source_version: {0}")]
    Ambiguous(String),
}

/// Picks the build whose recorded commit equals `source_version`. The
/// service guarantees at most one such build per branch; anything else is
/// an error, never a silent first-match.
pub fn select_build<'a>(
    builds: &'a [Build],
    source_version: &str,
) -> Result<&'a Build, BuildSelectError> {
    let mut matches = builds
        .iter()
        .filter(|build| build.source_version == source_version);
    let build = matches
        .next()
        .ok_or_else(|| BuildSelectError::NotFound(source_version.into()))?;
    if matches.next().is_some() {
        return Err(BuildSelectError::Ambiguous(source_version.into()));
    }
    Ok(build)
}

pub fn fetch(env: &FetchEnv) -> Result<()> {
    let artifact_name = env.artifact_name();
    let archive = env.zip_path();

    if archive.is_file() {
        log::info!("using cached artifact {}", archive.display());
        println!(
            "{} Download `{}` [CACHED]",
            style("[1/2]").bold(),
            artifact_name
        );
    } else {
        println!("{} Download `{}`", style("[1/2]").bold(), artifact_name);
        let client = azdo::Client::new(env.organization_url(), env.token().map(str::to_string));
        let project = env.project().to_string();
        let builds = client.builds(&project, env.branch(), REPOSITORY_ID, REPOSITORY_TYPE)?;
        let build = select_build(&builds, env.source_version())?;
        log::info!("selected build {} for {}", build.id, env.source_version());
        let artifact = client.artifact(&project, build.id, &artifact_name)?;
        DownloadManager::new(env).download(&artifact.resource.download_url, &archive)?;
    }

    let product_dir = env.product_dir();
    println!(
        "{} Unpack to `{}`",
        style("[2/2]").bold(),
        product_dir.display()
    );
    unpack_to_product_directory(&archive, &product_dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unpack::UnpackError;
    use crate::{Arch, BuildType, Os, Project};
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    const COMMIT: &str = "4b67a3a5ae74f3dd4cbac0b729bf7d4ef77e2542";
    const OTHER: &str = "c43e9e04a61dc7b829316d689c1d1a5e19dc5ae1";

    fn build(id: u64, source_version: &str) -> Build {
        Build {
            id,
            source_version: source_version.into(),
            source_branch: Some("refs/heads/master".into()),
        }
    }

    #[test]
    fn test_select_unique() {
        let builds = [build(1, OTHER), build(2, COMMIT), build(3, OTHER)];
        let selected = select_build(&builds, COMMIT).unwrap();
        assert_eq!(selected.id, 2);
    }

    #[test]
    fn test_select_not_found() {
        let builds = [build(1, OTHER)];
        let err = select_build(&builds, COMMIT).unwrap_err();
        assert!(matches!(err, BuildSelectError::NotFound(_)));
        assert!(err.to_string().contains(COMMIT));
    }

    #[test]
    fn test_select_ambiguous() {
        let builds = [build(1, COMMIT), build(2, COMMIT)];
        let err = select_build(&builds, COMMIT).unwrap_err();
        assert!(matches!(err, BuildSelectError::Ambiguous(_)));
        assert!(err.to_string().contains(COMMIT));
    }

    fn seeded_env(work_dir: &Path, coreclr_dir: &Path) -> FetchEnv {
        FetchEnv {
            arch: Arch::X64,
            os: Os::Linux,
            build_type: BuildType::Checked,
            project: Project::Public,
            branch: "refs/heads/master".into(),
            source_version: COMMIT.into(),
            token: None,
            coreclr_dir: coreclr_dir.into(),
            work_dir: work_dir.into(),
            // Unroutable on purpose; a cache hit must not talk to the
            // network at all.
            organization_url: "http://127.0.0.1:1".into(),
        }
    }

    #[test]
    fn test_fetch_cache_hit_skips_download() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let coreclr = tmp.path().join("coreclr");
        let env = seeded_env(tmp.path(), &coreclr);

        let mut zip = ZipWriter::new(File::create(env.zip_path())?);
        zip.add_directory("payload/", FileOptions::default())?;
        zip.start_file("payload/System.Private.CoreLib.dll", FileOptions::default())?;
        zip.write_all(b"MZ")?;
        zip.finish()?;

        fetch(&env)?;
        let product = coreclr.join("bin").join("Product").join("Linux.x64.Checked");
        assert_eq!(
            std::fs::read(product.join("System.Private.CoreLib.dll"))?,
            b"MZ"
        );
        assert!(env.zip_path().is_file());

        // A second run trips over the product directory before any other
        // work happens.
        let err = fetch(&env).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<UnpackError>(),
            Some(UnpackError::ProductDirExists(_))
        ));
        Ok(())
    }
}
