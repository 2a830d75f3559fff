use clap::Parser;
use std::path::PathBuf;

pub mod command;
mod download;
mod unpack;

/// Azure DevOps organization the coreclr pipelines run in.
pub const ORGANIZATION_URL: &str = "https://dev.azure.com/dnceng";
/// Upstream repository the builds are queued for.
pub const REPOSITORY_ID: &str = "dotnet/coreclr";
pub const REPOSITORY_TYPE: &str = "GitHub";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Arch {
    Arm,
    Arm64,
    X64,
    X86,
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Arm => write!(f, "arm"),
            Self::Arm64 => write!(f, "arm64"),
            Self::X64 => write!(f, "x64"),
            Self::X86 => write!(f, "x86"),
        }
    }
}

impl std::str::FromStr for Arch {
    type Err = anyhow::Error;

    fn from_str(arch: &str) -> anyhow::Result<Self> {
        Ok(match arch {
            "arm" => Self::Arm,
            "arm64" => Self::Arm64,
            "x64" => Self::X64,
            "x86" => Self::X86,
            _ => anyhow::bail!("unsupported arch {}", arch),
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Os {
    WindowsNt,
    Linux,
    LinuxMusl,
    Osx,
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::WindowsNt => write!(f, "Windows_NT"),
            Self::Linux => write!(f, "Linux"),
            Self::LinuxMusl => write!(f, "Linux_musl"),
            Self::Osx => write!(f, "OSX"),
        }
    }
}

impl std::str::FromStr for Os {
    type Err = anyhow::Error;

    fn from_str(os: &str) -> anyhow::Result<Self> {
        Ok(match os {
            "Windows_NT" => Self::WindowsNt,
            "Linux" => Self::Linux,
            "Linux_musl" => Self::LinuxMusl,
            "OSX" => Self::Osx,
            _ => anyhow::bail!("unsupported os {}", os),
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildType {
    Debug,
    Checked,
    Release,
}

impl std::fmt::Display for BuildType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Debug => write!(f, "Debug"),
            Self::Checked => write!(f, "Checked"),
            Self::Release => write!(f, "Release"),
        }
    }
}

impl std::str::FromStr for BuildType {
    type Err = anyhow::Error;

    fn from_str(build_type: &str) -> anyhow::Result<Self> {
        Ok(match build_type {
            "Debug" => Self::Debug,
            "Checked" => Self::Checked,
            "Release" => Self::Release,
            _ => anyhow::bail!("unsupported build type {}", build_type),
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Project {
    Public,
    Internal,
}

impl std::fmt::Display for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

impl std::str::FromStr for Project {
    type Err = anyhow::Error;

    fn from_str(project: &str) -> anyhow::Result<Self> {
        Ok(match project {
            "public" => Self::Public,
            "internal" => Self::Internal,
            _ => anyhow::bail!("unsupported project {}", project),
        })
    }
}

#[derive(Parser)]
pub struct FetchArgs {
    /// Architecture the artifact was built for. Can be one of
    /// `arm`, `arm64`, `x64` or `x86`.
    #[clap(long = "build_arch")]
    build_arch: Arch,
    /// Operating system the artifact was built for. Can be one of
    /// `Windows_NT`, `Linux`, `Linux_musl` or `OSX`.
    #[clap(long = "build_os")]
    build_os: Os,
    /// Build configuration. Can be one of `Debug`, `Checked` or
    /// `Release`.
    #[clap(long = "build_type", default_value = "Checked")]
    build_type: BuildType,
    /// Azure DevOps project the build ran in. Can be `public` or
    /// `internal`.
    #[clap(long = "project_name", default_value = "public")]
    project_name: Project,
    /// Branch the build was queued for.
    #[clap(long = "branch_name", default_value = "refs/heads/master")]
    branch_name: String,
    /// Commit hash the build was queued for.
    #[clap(long = "source_version")]
    source_version: String,
    /// Personal access token used to authenticate against the
    /// service. Falls back to the `CLRFETCH_PAT` environment
    /// variable.
    #[clap(long = "personal_access_token")]
    personal_access_token: Option<String>,
    /// Local coreclr checkout under which `bin/Product` is created.
    #[clap(long = "coreclr_directory")]
    coreclr_directory: PathBuf,
}

pub struct FetchEnv {
    arch: Arch,
    os: Os,
    build_type: BuildType,
    project: Project,
    branch: String,
    source_version: String,
    token: Option<String>,
    coreclr_dir: PathBuf,
    work_dir: PathBuf,
    organization_url: String,
}

impl FetchEnv {
    pub fn new(args: FetchArgs, work_dir: PathBuf) -> Self {
        let token = args
            .personal_access_token
            .or_else(|| std::env::var("CLRFETCH_PAT").ok());
        Self {
            arch: args.build_arch,
            os: args.build_os,
            build_type: args.build_type,
            project: args.project_name,
            branch: args.branch_name,
            source_version: args.source_version,
            token,
            coreclr_dir: args.coreclr_directory,
            work_dir,
            organization_url: ORGANIZATION_URL.into(),
        }
    }

    pub fn project(&self) -> Project {
        self.project
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn source_version(&self) -> &str {
        &self.source_version
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn organization_url(&self) -> &str {
        &self.organization_url
    }

    /// Name of the artifact on the service, e.g. `Linux_x64_checked_build`.
    pub fn artifact_name(&self) -> String {
        format!(
            "{}_{}_{}_build",
            self.os,
            self.arch,
            self.build_type.to_string().to_lowercase()
        )
    }

    /// Local zip the artifact is downloaded to. The commit hash keys the
    /// file, so a rerun with identical parameters reuses it.
    pub fn zip_path(&self) -> PathBuf {
        self.work_dir.join(format!(
            "bin-Product-{}.{}.{}-{}.zip",
            self.os, self.arch, self.build_type, self.source_version
        ))
    }

    pub fn product_dir(&self) -> PathBuf {
        self.coreclr_dir
            .join("bin")
            .join("Product")
            .join(format!("{}.{}.{}", self.os, self.arch, self.build_type))
    }
}
