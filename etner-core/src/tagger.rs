//! # Esquema de Tags BIO e Tipos de Entidade
//!
//! Define o esquema de anotação **BIO** (Beginning-Inside-Outside) utilizado
//! para rotular tokens das mensagens de e-commerce.
//!
//! ## Tipos de Entidades
//!
//! | Rótulo  | Significado        | Exemplos                    |
//! |---------|--------------------|-----------------------------|
//! | Product | Produto ou marca   | nike, ጫማ, blender           |
//! | LOC     | Local / endereço   | ቦሌ, ሞል, መገናኛ               |
//! | PRICE   | Preço              | ዋጋ 1500 ብር                  |
//! | O       | Fora de entidade   | (qualquer outra palavra)    |
//!
//! ## Esquema BIO
//!
//! - `B-TAG`: Begin: primeiro token de uma entidade
//! - `I-TAG`: Inside: tokens subsequentes da mesma entidade
//! - `O`: Outside: não é parte de nenhuma entidade

use serde::{Deserialize, Serialize};

use crate::tokenizer::Token;

/// Tipos de entidade reconhecidos pelo rotulador.
///
/// A ordem das variantes é a ordem de precedência na atribuição de tags:
/// Product vence Location, que vence Price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// **Produto**: itens, marcas e categorias. Ex: "nike", "ልብስ", "kettle".
    Product,
    /// **Local**: bairros, shoppings, referências de endereço. Ex: "ቦሌ", "ሞል".
    Location,
    /// **Preço**: palavra-chave de preço seguida de valores/moeda. Ex: "ዋጋ 500 ብር".
    Price,
}

impl EntityKind {
    /// Nome do tipo como aparece na tag (ex: "LOC" em "B-LOC")
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Product => "Product",
            EntityKind::Location => "LOC",
            EntityKind::Price => "PRICE",
        }
    }

    /// Tenta parsear a partir do nome usado nas tags (ex: "LOC" → Some(Location))
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "Product" => Some(EntityKind::Product),
            "LOC" => Some(EntityKind::Location),
            "PRICE" => Some(EntityKind::Price),
            _ => None,
        }
    }
}

/// Tag BIO aplicada a um token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// **Begin**: Marca o INÍCIO de uma entidade. Ex: **ዋጋ** (B-PRICE) 500.
    Begin(EntityKind),
    /// **Inside**: Marca a CONTINUAÇÃO de uma entidade. Ex: ዋጋ **500** (I-PRICE).
    Inside(EntityKind),
    /// **Outside**: O token não faz parte de nenhuma entidade.
    Outside,
}

impl Tag {
    /// Representação textual da tag (ex: "B-Product", "I-LOC", "O")
    pub fn label(&self) -> String {
        match self {
            Tag::Begin(kind) => format!("B-{}", kind.name()),
            Tag::Inside(kind) => format!("I-{}", kind.name()),
            Tag::Outside => "O".to_string(),
        }
    }

    /// Verifica se a transição tag_prev → self é válida no esquema BIO
    ///
    /// Regras:
    /// - `I-X` só pode seguir `B-X` ou `I-X` (mesmo tipo)
    /// - `B-X` e `O` podem seguir qualquer tag
    pub fn is_valid_transition(prev: &Tag, next: &Tag) -> bool {
        match next {
            Tag::Inside(kind) => match prev {
                Tag::Begin(prev_kind) | Tag::Inside(prev_kind) => prev_kind == kind,
                _ => false,
            },
            _ => true,
        }
    }

    /// Parseia uma tag a partir de string (ex: "B-PRICE" → Begin(Price))
    pub fn from_label(s: &str) -> Option<Self> {
        if s == "O" {
            return Some(Tag::Outside);
        }
        let (prefix, name) = s.split_once('-')?;
        let kind = EntityKind::from_name(name)?;
        match prefix {
            "B" => Some(Tag::Begin(kind)),
            "I" => Some(Tag::Inside(kind)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Uma sequência inteira é bem formada se nenhuma `I-X` aparece depois de `O`
/// ou de uma tag de outro tipo (nem no início da mensagem).
pub fn is_well_formed(tags: &[Tag]) -> bool {
    let mut prev = Tag::Outside;
    for tag in tags {
        if !Tag::is_valid_transition(&prev, tag) {
            return false;
        }
        prev = *tag;
    }
    true
}

/// Um token com sua tag BIO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub token: Token,
    pub tag: Tag,
}

/// Uma entidade: intervalo semiaberto `[start, end)` de índices de tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub kind: EntityKind,
    /// Índice do primeiro token (inclusivo)
    pub start: usize,
    /// Índice final (exclusivo)
    pub end: usize,
}

impl EntitySpan {
    pub fn new(kind: EntityKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }
}

/// Uma entidade reconstruída a partir das tags, com o texto dos tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Tokens unidos por espaço (ex: "ዋጋ 500 ብር")
    pub text: String,
    pub span: EntitySpan,
}

/// Converte uma sequência de tokens classificados (BIO) em entidades.
///
/// - Inicia uma nova entidade ao encontrar `B-X`.
/// - Continua enquanto encontrar `I-X` do **mesmo** tipo.
/// - Finaliza ao encontrar `O`, `B-Y` ou `I-Y`.
///
/// # Exemplo
/// `[B-PRICE, I-PRICE, O, B-LOC]` -> `[Entity(PRICE), Entity(LOC)]`
pub fn tokens_to_entities(tagged: &[TaggedToken]) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut i = 0;

    while i < tagged.len() {
        if let Tag::Begin(kind) = tagged[i].tag {
            let mut j = i + 1;
            while j < tagged.len() && tagged[j].tag == Tag::Inside(kind) {
                j += 1;
            }

            let text = tagged[i..j]
                .iter()
                .map(|t| t.token.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            entities.push(Entity {
                text,
                span: EntitySpan::new(kind, i, j),
            });
            i = j;
        } else {
            i += 1;
        }
    }

    entities
}
