//! # Pipeline de Rotulagem: Orquestrador com Eventos Observáveis
//!
//! Conecta normalizador → tokenizador → motor de regras e, opcionalmente,
//! emite eventos em cada passo via um canal Rust (`mpsc`), permitindo que o
//! servidor WebSocket transmita o progresso para o cliente.
//!
//! Para lotes (CSV → CoNLL) há [`NerPipeline::label_texts`] e a versão
//! paralela [`NerPipeline::label_texts_par`]; ambas mantêm a ordem de entrada.

use std::sync::mpsc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::LabelingConfig;
use crate::conll::{join_blocks, to_conll_block, write_conll};
use crate::corpus::{read_messages, MessageRecord};
use crate::error::Result;
use crate::gazetteer::GazetteerSet;
use crate::normalizer::{EthiopicNormalizer, Normalizer, ScriptNormalizer};
use crate::rule_based::RuleEngine;
use crate::tagger::{tokens_to_entities, Entity, EntityKind, TaggedToken};
use crate::tokenizer::{EthiopicSegmenter, Token, Tokenizer, WordSegmenter};

/// Eventos emitidos pelo pipeline durante o processamento de uma mensagem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PipelineEvent {
    /// **Passo 1**: texto normalizado.
    Normalized { text: String },
    /// **Passo 2**: tokenização concluída.
    TokenizationDone { tokens: Vec<Token>, total: usize },
    /// **Passo 3**: um span foi encontrado e aplicado.
    SpanFound {
        kind: EntityKind,
        start: usize,
        end: usize,
        text: String,
    },
    /// **Passo 3**: um span conflitava com tags já atribuídas e foi descartado.
    SpanDropped {
        kind: EntityKind,
        start: usize,
        end: usize,
        text: String,
    },
    /// **Passo 4**: tag definitiva de um token.
    TagAssigned {
        token_index: usize,
        token_text: String,
        tag: String,
    },
    /// **Conclusão**.
    Done {
        message: LabeledMessage,
        processing_ms: u64,
    },
}

/// Resultado completo de uma mensagem.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabeledMessage {
    pub normalized: String,
    pub tagged_tokens: Vec<TaggedToken>,
    pub entities: Vec<Entity>,
}

impl LabeledMessage {
    pub fn to_conll_block(&self) -> String {
        to_conll_block(&self.tagged_tokens)
    }
}

/// Totais de uma rotulagem em lote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub messages: usize,
    pub tokens: usize,
    pub entities: usize,
}

/// O pipeline principal. Estado imutável: pode ser compartilhado entre threads.
#[derive(Debug, Clone)]
pub struct NerPipeline<N: ScriptNormalizer = EthiopicNormalizer, S: WordSegmenter = EthiopicSegmenter> {
    normalizer: Normalizer<N>,
    tokenizer: Tokenizer<S>,
    rule_engine: RuleEngine,
}

impl NerPipeline {
    /// Pipeline padrão com os gazetteers canônicos.
    pub fn new() -> Self {
        Self::with_gazetteers(GazetteerSet::default())
    }

    pub fn with_gazetteers(gazetteers: GazetteerSet) -> Self {
        Self::from_parts(Normalizer::default(), Tokenizer::default(), gazetteers)
    }
}

impl Default for NerPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: ScriptNormalizer, S: WordSegmenter> NerPipeline<N, S> {
    /// Monta o pipeline com estágios próprios. Os termos dos gazetteers passam
    /// pelo mesmo `normalizer` das mensagens antes de virar regras.
    pub fn from_parts(normalizer: Normalizer<N>, tokenizer: Tokenizer<S>, gazetteers: GazetteerSet) -> Self {
        let gazetteers = gazetteers.canonicalized(|term| normalizer.normalize(term));
        Self {
            rule_engine: RuleEngine::new(gazetteers),
            normalizer,
            tokenizer,
        }
    }

    pub fn rule_engine(&self) -> &RuleEngine {
        &self.rule_engine
    }

    /// Normaliza e tokeniza, sem rotular.
    pub fn tokens(&self, text: &str) -> Vec<Token> {
        self.tokenizer.tokenize(&self.normalizer.normalize(text))
    }

    /// Processa uma mensagem de forma síncrona.
    pub fn analyze(&self, text: &str) -> LabeledMessage {
        self.run(text, |_| {})
    }

    /// Executa o pipeline enviando eventos de progresso.
    ///
    /// # Fluxo de Eventos
    /// 1. `Normalized`
    /// 2. `TokenizationDone`
    /// 3. `SpanFound` / `SpanDropped` (loop, na ordem Product → Location → Price)
    /// 4. `TagAssigned` (loop)
    /// 5. `Done`
    pub fn analyze_streaming(&self, text: &str, tx: mpsc::Sender<PipelineEvent>) {
        let start = Instant::now();
        let message = self.run(text, |event| {
            let _ = tx.send(event);
        });
        let _ = tx.send(PipelineEvent::Done {
            message,
            processing_ms: start.elapsed().as_millis() as u64,
        });
    }

    fn run(&self, text: &str, mut emit: impl FnMut(PipelineEvent)) -> LabeledMessage {
        // === Passo 1: Normalização ===
        let normalized = self.normalizer.normalize(text);
        emit(PipelineEvent::Normalized {
            text: normalized.clone(),
        });

        // === Passo 2: Tokenização ===
        let tokens = self.tokenizer.tokenize(&normalized);
        emit(PipelineEvent::TokenizationDone {
            tokens: tokens.clone(),
            total: tokens.len(),
        });

        // === Passo 3: Spans e resolução de conflitos ===
        let words: Vec<String> = tokens.iter().map(|t| t.text.to_lowercase()).collect();
        let (tags, decisions) = self.rule_engine.resolve(&words);
        for decision in decisions {
            let span = decision.span;
            let text = words[span.start..span.end].join(" ");
            emit(if decision.applied {
                PipelineEvent::SpanFound {
                    kind: span.kind,
                    start: span.start,
                    end: span.end,
                    text,
                }
            } else {
                PipelineEvent::SpanDropped {
                    kind: span.kind,
                    start: span.start,
                    end: span.end,
                    text,
                }
            });
        }

        // === Passo 4: Tags finais ===
        let tagged_tokens: Vec<TaggedToken> = tokens
            .into_iter()
            .zip(words)
            .zip(tags)
            .map(|((token, lower), tag)| {
                emit(PipelineEvent::TagAssigned {
                    token_index: token.index,
                    token_text: lower.clone(),
                    tag: tag.label(),
                });
                TaggedToken {
                    token: Token { text: lower, ..token },
                    tag,
                }
            })
            .collect();

        let entities = tokens_to_entities(&tagged_tokens);
        LabeledMessage {
            normalized,
            tagged_tokens,
            entities,
        }
    }

    /// Rotula as mensagens em ordem e devolve o documento CoNLL.
    pub fn label_texts<'a, I>(&self, texts: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        join_blocks(texts.into_iter().map(|t| self.analyze(t).to_conll_block()))
    }

    /// Igual a [`label_texts`](Self::label_texts), avaliando em paralelo.
    /// Os blocos são concatenados na ordem de entrada.
    pub fn label_texts_par(&self, texts: &[&str]) -> String {
        let blocks: Vec<String> = texts
            .par_iter()
            .map(|t| self.analyze(t).to_conll_block())
            .collect();
        join_blocks(blocks)
    }

    fn label_messages(&self, texts: &[&str], parallel: bool) -> Vec<LabeledMessage> {
        if parallel {
            texts.par_iter().map(|t| self.analyze(t)).collect()
        } else {
            texts.iter().map(|t| self.analyze(t)).collect()
        }
    }

    /// Rotula registros do coletor segundo a configuração e devolve o documento e os totais.
    pub fn label_records(&self, records: &[MessageRecord], config: &LabelingConfig) -> (String, BatchSummary) {
        let texts: Vec<&str> = config
            .sample
            .apply(records.iter())
            .map(MessageRecord::text)
            .collect();

        let labeled = self.label_messages(&texts, config.parallel);
        let kept: Vec<&LabeledMessage> = labeled
            .iter()
            .filter(|m| !(config.skip_empty && m.tagged_tokens.is_empty()))
            .collect();

        let summary = BatchSummary {
            messages: kept.len(),
            tokens: kept.iter().map(|m| m.tagged_tokens.len()).sum(),
            entities: kept.iter().map(|m| m.entities.len()).sum(),
        };
        let document = join_blocks(kept.iter().map(|m| m.to_conll_block()));
        tracing::debug!(
            sampled = texts.len(),
            kept = summary.messages,
            parallel = config.parallel,
            "lote rotulado"
        );
        (document, summary)
    }
}

/// Lote completo: CSV → rotulagem → arquivo CoNLL.
pub fn label_corpus(config: &LabelingConfig) -> Result<BatchSummary> {
    let pipeline = NerPipeline::with_gazetteers(config.load_gazetteers()?);
    let records = read_messages(&config.input)?;
    let (document, summary) = pipeline.label_records(&records, config);
    write_conll(&config.output, &document)?;
    Ok(summary)
}
