//! # Configuração da Rotulagem em Lote
//!
//! Tudo que o lote precisa vem daqui ou dos argumentos de linha de comando:
//! caminhos de entrada/saída, gazetteers opcionais e o tamanho da amostra.
//!
//! ```json
//! {
//!   "input": "data/telegram_data.csv",
//!   "output": "data/telegram_data_conll.txt",
//!   "gazetteers": "config/gazetteers.json",
//!   "sample": 500,
//!   "parallel": true
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::corpus::SampleSize;
use crate::error::{NerError, Result};
use crate::gazetteer::GazetteerSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelingConfig {
    /// CSV gerado pelo coletor.
    pub input: PathBuf,
    /// Arquivo CoNLL de saída.
    pub output: PathBuf,
    /// JSON com gazetteers próprios; `None` usa as listas canônicas.
    pub gazetteers: Option<PathBuf>,
    pub sample: SampleSize,
    /// Rotula as mensagens em paralelo (rayon). A ordem da saída não muda.
    pub parallel: bool,
    /// Omite mensagens sem nenhum token em vez de emitir um bloco vazio.
    pub skip_empty: bool,
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/telegram_data.csv"),
            output: PathBuf::from("data/telegram_data_conll.txt"),
            gazetteers: None,
            sample: SampleSize::All,
            parallel: false,
            skip_empty: false,
        }
    }
}

impl LabelingConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| NerError::io(path, e))?;
        serde_json::from_str(&raw).map_err(|e| NerError::json(path, e))
    }

    /// Carrega os gazetteers configurados, ou os padrões.
    pub fn load_gazetteers(&self) -> Result<GazetteerSet> {
        match &self.gazetteers {
            Some(path) => GazetteerSet::from_json_file(path),
            None => Ok(GazetteerSet::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"sample": "all", "parallel": true}}"#).unwrap();

        let config = LabelingConfig::from_json_file(file.path()).unwrap();
        assert!(config.parallel);
        assert_eq!(config.sample, SampleSize::All);
        assert_eq!(config.output, PathBuf::from("data/telegram_data_conll.txt"));
        assert!(config.load_gazetteers().unwrap().locations.contains("ቦሌ"));
    }

    #[test]
    fn test_numeric_sample() {
        let config: LabelingConfig = serde_json::from_str(r#"{"sample": 25}"#).unwrap();
        assert_eq!(config.sample, SampleSize::Count(25));
    }

    #[test]
    fn test_missing_gazetteer_file_is_reported() {
        let config = LabelingConfig {
            gazetteers: Some(PathBuf::from("/nao/existe.json")),
            ..LabelingConfig::default()
        };
        assert!(matches!(config.load_gazetteers(), Err(NerError::Io { .. })));
    }
}
