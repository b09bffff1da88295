//! # Mensagens Coletadas dos Canais
//!
//! O coletor de mensagens (fora deste crate) grava um CSV com uma linha por
//! mensagem:
//!
//! | Coluna           | Campo              |
//! |------------------|--------------------|
//! | Channel Title    | `channel_title`    |
//! | Channel Username | `channel_username` |
//! | ID               | `id`               |
//! | Sender           | `sender`           |
//! | Message          | `message`          |
//! | Date             | `date`             |
//! | Views            | `views`            |
//!
//! Os metadados atravessam o pipeline intactos; apenas `message` é rotulado.
//! Células vazias de `Message` viram `None` e são tratadas como texto vazio.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NerError, Result};

/// Uma linha do CSV do coletor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(rename = "Channel Title")]
    pub channel_title: String,
    #[serde(rename = "Channel Username")]
    pub channel_username: String,
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Sender")]
    pub sender: Option<String>,
    #[serde(rename = "Message")]
    pub message: Option<String>,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Views")]
    pub views: Option<u64>,
    /// Só existe nas exportações com mídia baixada.
    #[serde(rename = "Media Path", default)]
    pub media_path: Option<String>,
}

impl MessageRecord {
    /// O texto da mensagem, com `None` virando `""`.
    pub fn text(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

/// Lê todas as mensagens de um CSV do coletor.
pub fn read_messages(path: impl AsRef<Path>) -> Result<Vec<MessageRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| NerError::io(path, e))?;
    let records = read_messages_from(file)?;
    tracing::debug!(path = %path.display(), total = records.len(), "mensagens lidas");
    Ok(records)
}

/// Igual a [`read_messages`], a partir de qualquer leitor.
pub fn read_messages_from<R: std::io::Read>(reader: R) -> Result<Vec<MessageRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    reader
        .deserialize::<MessageRecord>()
        .map(|row| row.map_err(NerError::from))
        .collect()
}

/// Quantas mensagens rotular: todas ou as N primeiras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "SampleRepr", into = "SampleRepr")]
pub enum SampleSize {
    #[default]
    All,
    Count(usize),
}

impl SampleSize {
    /// Limita um iterador ao tamanho da amostra, mantendo a ordem original.
    pub fn apply<I: Iterator>(self, iter: I) -> std::iter::Take<I> {
        match self {
            SampleSize::All => iter.take(usize::MAX),
            SampleSize::Count(n) => iter.take(n),
        }
    }
}

impl FromStr for SampleSize {
    type Err = NerError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(SampleSize::All);
        }
        s.parse::<usize>()
            .map(SampleSize::Count)
            .map_err(|_| NerError::InvalidSampleSize(s.to_string()))
    }
}

impl fmt::Display for SampleSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleSize::All => write!(f, "all"),
            SampleSize::Count(n) => write!(f, "{n}"),
        }
    }
}

/// No JSON, a amostra é `"all"` ou um inteiro.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SampleRepr {
    Count(usize),
    Text(String),
}

impl TryFrom<SampleRepr> for SampleSize {
    type Error = NerError;

    fn try_from(repr: SampleRepr) -> Result<Self> {
        match repr {
            SampleRepr::Count(n) => Ok(SampleSize::Count(n)),
            SampleRepr::Text(s) => s.parse(),
        }
    }
}

impl From<SampleSize> for SampleRepr {
    fn from(size: SampleSize) -> Self {
        match size {
            SampleSize::All => SampleRepr::Text("all".to_string()),
            SampleSize::Count(n) => SampleRepr::Count(n),
        }
    }
}

/// Mensagens de exemplo para a interface web, no estilo dos canais.
pub fn demo_texts() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "Calçados",
            "Nike Air Force 1 🔥🔥 Size #3940#41#42#43 ዋጋ 3500 ብር አድራሻ ቦሌ መድሀኔአለም ሞል",
        ),
        (
            "Cozinha",
            "Electric Kettle 2L ✅ ዋጋ፦ 1,800 ብር ☎️ 0911000000 መገናኛ ታወር 2ኛ ፎቅ",
        ),
        (
            "Roupas",
            "ምርጥ የልብስ ማስቀመጫ Rack 🧥 Price 2500 birr 📍 ሜክሲኮ ኬኬር ህንፃ",
        ),
        ("Sem entidades", "ሰላም 😊 ይህ ሙከራ ነው"),
    ]
}
