//! # Erros do pipeline
//!
//! As etapas de normalização, tokenização e rotulagem são funções totais e
//! nunca falham. Os únicos pontos falíveis são as bordas de I/O: leitura do
//! CSV coletado, leitura de configuração/gazetteers e escrita do arquivo CoNLL.

use std::path::PathBuf;

/// Erro unificado das bordas de I/O do crate.
#[derive(Debug, thiserror::Error)]
pub enum NerError {
    /// Falha ao ler ou escrever um arquivo (inclui a escrita do CoNLL, que não é repetida).
    #[error("erro de I/O em {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV de mensagens malformado.
    #[error("CSV inválido: {0}")]
    Csv(#[from] csv::Error),

    /// JSON de configuração ou de gazetteers malformado.
    #[error("JSON inválido em {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Tamanho de amostra que não é "all" nem um inteiro.
    #[error("tamanho de amostra inválido: {0:?} (use \"all\" ou um inteiro)")]
    InvalidSampleSize(String),
}

impl NerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NerError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        NerError::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, NerError>;
