use anyhow::{Context, Result};
use cfg_if::cfg_if;

use crate::logging::printlog;

/// Where scene and media bytes come from.
#[allow(async_fn_in_trait)]
pub trait AssetSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP on the web, the filesystem natively.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultAssets;

impl AssetSource for DefaultAssets {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        load_binary(url).await
    }
}

pub async fn load_binary(url: &str) -> Result<Vec<u8>> {
    printlog(&format!("Fetching {}", url));
    cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            let data = reqwest::get(url)
                .await
                .with_context(|| format!("Request for {} failed", url))?
                .error_for_status()?
                .bytes()
                .await?
                .to_vec();
        } else {
            // Native builds treat the prefix as a directory
            let data = std::fs::read(url).with_context(|| format!("Failed to read {}", url))?;
        }
    }
    Ok(data)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_local_files() {
        let path = std::env::temp_dir().join("exhibit_viewer_assets_test.bin");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        let data = pollster::block_on(DefaultAssets.fetch(path.to_str().unwrap())).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = pollster::block_on(load_binary("/definitely/not/here/home.08.glb"));
        assert!(result.is_err());
    }
}
