//! # Exportação CoNLL
//!
//! Formato de duas colunas estilo CoNLL-2003, sem cabeçalho:
//!
//! ```text
//! ዋጋ B-PRICE
//! 1500 I-PRICE
//! ብር I-PRICE
//!
//! nike B-Product
//! ```
//!
//! Cada mensagem vira um bloco `"<token> <tag>"` por linha terminado por uma
//! linha vazia; os blocos são unidos com mais uma quebra de linha.

use std::path::Path;

use crate::error::{NerError, Result};
use crate::rule_based::RuleEngine;
use crate::tagger::TaggedToken;
use crate::tokenizer::Token;

/// Bloco de uma mensagem. Uma mensagem sem tokens gera o bloco vazio.
pub fn to_conll_block(tagged: &[TaggedToken]) -> String {
    let mut lines: Vec<String> = tagged
        .iter()
        .map(|t| format!("{} {}", t.token.text, t.tag))
        .collect();
    lines.push(String::new());
    lines.join("\n")
}

/// Documento completo a partir de blocos já renderizados, na ordem dada.
pub fn join_blocks<I, S>(blocks: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    blocks
        .into_iter()
        .map(|b| b.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rotula várias sequências de tokens e monta o documento CoNLL.
pub fn label_messages<'a, I>(engine: &RuleEngine, sequences: I) -> String
where
    I: IntoIterator<Item = &'a [Token]>,
{
    join_blocks(
        sequences
            .into_iter()
            .map(|tokens| to_conll_block(&engine.tag(tokens))),
    )
}

/// Grava o documento em UTF-8. Falhas de escrita sobem para o chamador, sem retry.
pub fn write_conll(path: impl AsRef<Path>, document: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| NerError::io(parent, e))?;
    }
    std::fs::write(path, document).map_err(|e| NerError::io(path, e))?;
    tracing::info!(path = %path.display(), bytes = document.len(), "CoNLL salvo");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::{EntityKind, Tag};
    use crate::tokenizer::{tokenize, Script};

    fn tagged(pairs: &[(&str, Tag)]) -> Vec<TaggedToken> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (w, tag))| TaggedToken {
                token: Token::new(*w, i, Script::Other),
                tag: *tag,
            })
            .collect()
    }

    #[test]
    fn test_block_layout() {
        let block = to_conll_block(&tagged(&[
            ("ዋጋ", Tag::Begin(EntityKind::Price)),
            ("100", Tag::Inside(EntityKind::Price)),
            ("ነው", Tag::Outside),
        ]));
        assert_eq!(block, "ዋጋ B-PRICE\n100 I-PRICE\nነው O\n");
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(to_conll_block(&[]), "");
    }

    #[test]
    fn test_messages_are_separated_by_blank_line() {
        let engine = RuleEngine::default();
        let first = tokenize("ዋጋ 100 ብር");
        let second = tokenize("ቦሌ");
        let doc = label_messages(&engine, [first.as_slice(), second.as_slice()]);
        assert_eq!(doc, "ዋጋ B-PRICE\n100 I-PRICE\nብር I-PRICE\n\nቦሌ B-LOC\n");
    }

    #[test]
    fn test_write_conll_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("out_conll.txt");
        write_conll(&path, "ቦሌ B-LOC\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ቦሌ B-LOC\n");
    }

    #[test]
    fn test_write_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // um diretório no lugar do arquivo
        let result = write_conll(dir.path(), "x O\n");
        assert!(matches!(result, Err(NerError::Io { .. })));
    }
}
