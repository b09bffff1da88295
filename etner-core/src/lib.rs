//! # etner-core: Rotulagem NER de Mensagens de E-commerce (Amárico/Inglês)
//!
//! Este crate prepara mensagens cruas de canais de venda etíopes para o
//! treinamento de um modelo de reconhecimento de entidades. As mensagens misturam
//! amárico e inglês, emoji, tabelas de tamanhos e preços.
//!
//! ## Arquitetura do Sistema
//!
//! O dado flui da esquerda para a direita, sem estado entre mensagens:
//!
//! 1.  **Entrada**: Texto bruto (String), possivelmente vazio.
//! 2.  **Normalização** ([`normalizer`]): remove tamanhos, emoji e ruído; unifica glifos.
//! 3.  **Tokenização** ([`tokenizer`]): runs por script, cada um com sua estratégia.
//! 4.  **Rotulagem** ([`rule_based`]): gazetteers ([`gazetteer`]) e padrão de preço → tags BIO ([`tagger`]).
//! 5.  **Saída**: blocos CoNLL ([`conll`]).
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use etner_core::NerPipeline;
//!
//! let pipeline = NerPipeline::new();
//! let message = pipeline.analyze("Nike Air 🔥 ዋጋ 3500 ብር ቦሌ");
//!
//! for tagged in &message.tagged_tokens {
//!     println!("{} {}", tagged.token.text, tagged.tag);
//! }
//! assert_eq!(message.entities.len(), 3);
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: Orquestrador que conecta os estágios e o lote CSV → CoNLL.
//! - [`corpus`]: Registros do coletor de mensagens e amostragem.
//! - [`config`]: Configuração do lote.

pub mod config;
pub mod conll;
pub mod corpus;
pub mod error;
pub mod gazetteer;
pub mod normalizer;
pub mod pipeline;
pub mod rule_based;
pub mod tagger;
pub mod tokenizer;

pub use error::NerError;
pub use gazetteer::{GazetteerConfig, GazetteerSet};
pub use pipeline::{LabeledMessage, NerPipeline, PipelineEvent};
pub use rule_based::RuleEngine;
pub use tagger::{EntityKind, EntitySpan, Tag, TaggedToken};
pub use tokenizer::Token;
