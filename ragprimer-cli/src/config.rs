use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Which embedding backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// all-MiniLM-L6-v2 through fastembed, no API key needed
    Local,
    /// OpenAI-compatible embeddings API
    Openai,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub embedder: EmbedderKind,
    pub embedding_model: String,
    pub chat_model: String,
    pub openai_base_url: String,
    pub openai_api_key: Option<String>,
    pub temperature: f32,

    pub chunk_size: usize,
    pub chunk_overlap: usize,

    pub data_dir: PathBuf,
    pub extension: String,
    pub store_dir: PathBuf,
    pub collection: String,
    pub top_k: usize,
}

impl Settings {
    /// Defaults, then `ragprimer.toml` (or `file`), then `RAGPRIMER_*` variables.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("ragprimer").required(false),
        };

        let builder = Config::builder()
            .set_default("embedder", "local")?
            .set_default("embedding_model", "text-embedding-3-small")?
            .set_default("chat_model", "gpt-4o-mini")?
            .set_default("openai_base_url", "https://api.openai.com/v1")?
            .set_default("openai_api_key", None::<String>)?
            .set_default("temperature", 0.7)?
            .set_default("chunk_size", 1000)?
            .set_default("chunk_overlap", 20)?
            .set_default("data_dir", "./data/new_articles")?
            .set_default("extension", "txt")?
            .set_default("store_dir", "./db/chroma_persistent_storage")?
            .set_default("collection", "document_qa_collection")?
            .set_default("top_k", 3)?
            .add_source(file_source)
            .add_source(Environment::with_prefix("RAGPRIMER").try_parsing(true));

        let mut settings: Settings = builder.build()?.try_deserialize()?;

        if settings.openai_api_key.as_deref().map_or(true, str::is_empty) {
            settings.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(
            &path,
            "embedder = \"openai\"\nchunk_size = 500\ncollection = \"my_story\"\n",
        )
        .unwrap();

        let settings = Settings::load(Some(path.as_path())).unwrap();

        assert_eq!(settings.embedder, EmbedderKind::Openai);
        assert_eq!(settings.chunk_size, 500);
        assert_eq!(settings.chunk_overlap, 20);
        assert_eq!(settings.collection, "my_story");
        assert_eq!(settings.chat_model, "gpt-4o-mini");
        assert_eq!(settings.store_dir, PathBuf::from("./db/chroma_persistent_storage"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(Settings::load(Some(dir.path().join("absent.toml").as_path())).is_err());
    }
}
