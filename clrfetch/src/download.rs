use crate::FetchEnv;
use anyhow::Result;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use reqwest::blocking::Client;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub struct DownloadManager<'a> {
    env: &'a FetchEnv,
    client: Client,
}

impl<'a> DownloadManager<'a> {
    pub fn new(env: &'a FetchEnv) -> Self {
        Self {
            env,
            client: Client::new(),
        }
    }

    /// Streams `url` to `dest` with a single authenticated GET. No retry
    /// and no resume; a failed transfer leaves whatever was written.
    pub fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stdout())
        .with_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix:.bold} [{elapsed}] {wide_bar:.green} {bytes}/{total_bytes} {msg}")?
                .progress_chars("█▇▆▅▄▃▂▁  ")
        );
        let file_name = dest.file_name().unwrap().to_str().unwrap().to_string();
        pb.set_prefix(file_name);
        pb.set_message("downloading");

        let mut req = self.client.get(url);
        if let Some(token) = self.env.token() {
            // The payload endpoint wants basic auth with an empty user name
            // and the access token as password.
            let credentials = BASE64_STANDARD.encode(format!(":{}", token));
            req = req.header("Authorization", format!("Basic {}", credentials));
        }
        let mut resp = req.send()?;
        anyhow::ensure!(
            resp.status().is_success(),
            "GET {} returned status code {}",
            url,
            resp.status()
        );
        let len = resp.content_length().unwrap_or_default();
        pb.set_length(len);

        let dest = BufWriter::new(File::create(dest)?);
        std::io::copy(&mut resp, &mut pb.wrap_write(dest))?;
        pb.finish_with_message("downloaded");

        Ok(())
    }
}
