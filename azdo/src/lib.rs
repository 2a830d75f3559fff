use anyhow::Result;
use serde::Deserialize;

const API_VERSION: &str = "7.1";

/// Client for the Build api of a single Azure DevOps organization.
///
/// The organization url is injected at construction so callers (and tests)
/// decide which endpoint is used. An absent token means unauthenticated
/// requests, which the service rejects for private projects.
pub struct Client {
    http: reqwest::blocking::Client,
    organization_url: String,
    token: Option<String>,
}

impl Client {
    pub fn new(organization_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            organization_url: organization_url.into(),
            token,
        }
    }

    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<reqwest::blocking::Response> {
        let mut req = self
            .http
            .get(url)
            .query(&[("api-version", API_VERSION)])
            .query(query);
        if let Some(token) = &self.token {
            req = req.basic_auth("", Some(token));
        }
        let resp = req.send()?;
        anyhow::ensure!(
            resp.status().is_success(),
            "GET {} returned status code {}",
            url,
            resp.status()
        );
        Ok(resp)
    }

    /// Lists the builds of `project` for a branch of an upstream repository.
    ///
    /// The api cannot filter by commit hash; callers filter the returned
    /// records themselves.
    pub fn builds(
        &self,
        project: &str,
        branch: &str,
        repository: &str,
        repository_type: &str,
    ) -> Result<Vec<Build>> {
        let url = format!("{}/{}/_apis/build/builds", self.organization_url, project);
        log::debug!("listing builds of {} for {}", repository, branch);
        let list: BuildList = self
            .get(
                &url,
                &[
                    ("branchName", branch),
                    ("repositoryId", repository),
                    ("repositoryType", repository_type),
                ],
            )?
            .json()?;
        Ok(list.value)
    }

    /// Resolves the metadata of a named artifact of a build. The returned
    /// resource carries the payload download url.
    pub fn artifact(&self, project: &str, build_id: u64, artifact_name: &str) -> Result<Artifact> {
        let url = format!(
            "{}/{}/_apis/build/builds/{}/artifacts",
            self.organization_url, project, build_id
        );
        log::debug!("resolving artifact {} of build {}", artifact_name, build_id);
        Ok(self.get(&url, &[("artifactName", artifact_name)])?.json()?)
    }
}

#[derive(Deserialize)]
struct BuildList {
    value: Vec<Build>,
}

/// One execution record of a pipeline.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: u64,
    pub source_version: String,
    #[serde(default)]
    pub source_branch: Option<String>,
}

/// A named output of a build.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub name: String,
    pub resource: ArtifactResource,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactResource {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub download_url: String,
}
