//! # Tokenizador Bilíngue (Amárico/Inglês)
//!
//! Divide o texto normalizado em tokens respeitando o script de cada trecho.
//! As mensagens dos canais misturam amárico (script etíope) com nomes de marcas
//! e produtos em inglês ("Nike", "Air", "USB"), então um único tokenizador não serve.
//!
//! ## Estratégia
//!
//! 1. Uma varredura da esquerda para a direita particiona o texto em *runs*
//!    máximos: ou só caracteres etíopes, ou só "outros" (espaços incluídos).
//! 2. Runs etíopes vão para o [`WordSegmenter`] do script.
//! 3. Os demais passam pelo padrão genérico `\w+`; espaços e pontuação somem.
//!
//! A ordem de leitura é preservada: spans de entidades são intervalos de índices
//! sobre a sequência resultante.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use etner_core::tokenizer::tokenize;
//!
//! let tokens = tokenize("ይህ test ነው");
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, ["ይህ", "test", "ነው"]);
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::normalizer::{is_ethiopic, is_ethiopic_punctuation};

static WORD_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("regex de palavra válida"));

/// Qual estratégia de segmentação produziu o token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
    /// Segmentador do script etíope.
    Ethiopic,
    /// Padrão genérico de fronteira de palavra.
    Other,
}

/// Um token da sequência.
///
/// Não carrega offsets: a única posição relevante é o `index` na sequência,
/// sobre o qual os spans de entidades são definidos.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// O texto do token (ex: "ዋጋ", "nike", "1500").
    pub text: String,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
    pub script: Script,
}

impl Token {
    pub fn new(text: impl Into<String>, index: usize, script: Script) -> Self {
        Self {
            text: text.into(),
            index,
            script,
        }
    }
}

/// Capacidade de segmentar um run de script etíope em palavras.
pub trait WordSegmenter: Send + Sync {
    fn segment(&self, run: &str) -> Vec<String>;
}

/// Segmentador padrão: fronteiras de palavra UAX #29, com a pontuação etíope
/// (፡ ። ፣ ...) tratada como separador.
#[derive(Debug, Clone, Copy, Default)]
pub struct EthiopicSegmenter;

impl WordSegmenter for EthiopicSegmenter {
    fn segment(&self, run: &str) -> Vec<String> {
        run.split(is_ethiopic_punctuation)
            .flat_map(|piece| piece.unicode_words())
            .map(str::to_string)
            .collect()
    }
}

/// Um trecho contíguo de um único script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRun<'a> {
    pub text: &'a str,
    pub script: Script,
}

/// Particiona o texto em runs máximos de mesmo script, numa única varredura.
pub fn script_runs(text: &str) -> Vec<ScriptRun<'_>> {
    let mut runs = Vec::new();
    let mut current: Option<(usize, Script)> = None;

    for (pos, ch) in text.char_indices() {
        let script = if is_ethiopic(ch) {
            Script::Ethiopic
        } else {
            Script::Other
        };
        match current {
            Some((_, s)) if s == script => {}
            Some((start, s)) => {
                runs.push(ScriptRun {
                    text: &text[start..pos],
                    script: s,
                });
                current = Some((pos, script));
            }
            None => current = Some((pos, script)),
        }
    }

    if let Some((start, script)) = current {
        runs.push(ScriptRun {
            text: &text[start..],
            script,
        });
    }
    runs
}

/// Tokenizador parametrizado pelo segmentador etíope.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer<S: WordSegmenter = EthiopicSegmenter> {
    segmenter: S,
}

impl<S: WordSegmenter> Tokenizer<S> {
    pub fn with_segmenter(segmenter: S) -> Self {
        Self { segmenter }
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();

        for run in script_runs(text) {
            match run.script {
                Script::Ethiopic => tokens.extend(
                    self.segmenter
                        .segment(run.text)
                        .into_iter()
                        .map(|w| Token::new(w, 0, Script::Ethiopic)),
                ),
                Script::Other => tokens.extend(generic_words(run.text)),
            }
        }

        // Re-indexa os tokens
        for (i, token) in tokens.iter_mut().enumerate() {
            token.index = i;
        }
        tokens
    }
}

static DEFAULT_TOKENIZER: Tokenizer = Tokenizer {
    segmenter: EthiopicSegmenter,
};

/// Tokeniza com o segmentador etíope padrão.
pub fn tokenize(text: &str) -> Vec<Token> {
    DEFAULT_TOKENIZER.tokenize(text)
}

/// Tokeniza usando apenas o padrão genérico, sem despacho por script.
pub fn tokenize_generic(text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = generic_words(text).collect();
    for (i, token) in tokens.iter_mut().enumerate() {
        token.index = i;
    }
    tokens
}

fn generic_words(text: &str) -> impl Iterator<Item = Token> + '_ {
    WORD_BOUNDARY
        .find_iter(text)
        .map(|m| Token::new(m.as_str(), 0, Script::Other))
}

/// Textos dos tokens, para quem só precisa das palavras.
pub fn token_texts(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.text.as_str()).collect()
}
