//! # Motor de Regras: Gazetteers e Padrão de Preço
//!
//! A rotulagem é puramente por dicionário e padrão, sem modelo estatístico.
//! Três varreduras independentes encontram spans sobre a mesma sequência:
//!
//! - **Dicionário** (Product e Location): cada run máximo de tokens
//!   consecutivos presentes no gazetteer vira um único span.
//! - **Preço**: uma palavra-chave ("ዋጋ", "price", ...) seguida de pelo menos
//!   um número ou unidade de moeda.
//!
//! Depois os spans são aplicados na ordem Product → Location → Price. Um span
//! só é aplicado se todos os seus tokens ainda estão `O`; caso contrário é
//! descartado inteiro. O primeiro tipo atribuído vence e spans nunca se sobrescrevem.
//!
//! O rotulador em Python de onde vieram as listas olhava apenas o primeiro
//! token do span e deixava um span posterior sobrescrever o interior de outro,
//! o que pode gerar `I-X` depois de `B-Y`. Aqui o intervalo inteiro precisa
//! estar livre; com as listas padrão as duas regras dão o mesmo resultado.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::gazetteer::{Gazetteer, GazetteerSet};
use crate::tagger::{EntityKind, EntitySpan, Tag, TaggedToken};
use crate::tokenizer::Token;

/// Resultado de uma aplicação de span na sequência de tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanDecision {
    pub span: EntitySpan,
    /// `false` quando algum token do span já tinha tag.
    pub applied: bool,
}

/// Motor de regras com gazetteers e o padrão de preço.
///
/// Os gazetteers ficam atrás de um `Arc`: o motor é barato de clonar e pode
/// ser compartilhado entre threads sem lock.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    gazetteers: Arc<GazetteerSet>,
}

impl RuleEngine {
    pub fn new(gazetteers: GazetteerSet) -> Self {
        Self {
            gazetteers: Arc::new(gazetteers),
        }
    }

    pub fn gazetteers(&self) -> &GazetteerSet {
        &self.gazetteers
    }

    /// Spans de todas as varreduras, na ordem de precedência.
    pub fn find_spans(&self, words: &[String]) -> Vec<EntitySpan> {
        let mut spans = find_dictionary_spans(words, &self.gazetteers.products, EntityKind::Product);
        spans.extend(find_dictionary_spans(
            words,
            &self.gazetteers.locations,
            EntityKind::Location,
        ));
        spans.extend(find_price_spans(
            words,
            &self.gazetteers.price_keywords,
            &self.gazetteers.currency_units,
        ));
        spans
    }

    /// Aplica os spans e registra quais foram aceitos ou descartados.
    pub fn resolve(&self, words: &[String]) -> (Vec<Tag>, Vec<SpanDecision>) {
        let spans = self.find_spans(words);
        let mut tags = vec![Tag::Outside; words.len()];
        let mut decisions = Vec::with_capacity(spans.len());

        for span in spans {
            let applied = assign_span(&mut tags, &span);
            if !applied {
                tracing::trace!(?span, "span descartado por conflito");
            }
            decisions.push(SpanDecision { span, applied });
        }
        (tags, decisions)
    }

    /// Rotula uma sequência de tokens. O resultado tem o mesmo tamanho da entrada.
    pub fn label_tokens(&self, tokens: &[Token]) -> Vec<Tag> {
        let words: Vec<String> = tokens.iter().map(|t| t.text.to_lowercase()).collect();
        self.resolve(&words).0
    }

    /// Variante para quem tem apenas as palavras.
    pub fn label_words<S: AsRef<str>>(&self, words: &[S]) -> Vec<Tag> {
        let words: Vec<String> = words.iter().map(|w| w.as_ref().to_lowercase()).collect();
        self.resolve(&words).0
    }

    /// Tokens em minúsculas junto com suas tags, prontos para o CoNLL.
    pub fn tag(&self, tokens: &[Token]) -> Vec<TaggedToken> {
        let tags = self.label_tokens(tokens);
        tokens
            .iter()
            .zip(tags)
            .map(|(token, tag)| TaggedToken {
                token: Token {
                    text: token.text.to_lowercase(),
                    ..token.clone()
                },
                tag,
            })
            .collect()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(GazetteerSet::default())
    }
}

/// Marca `B-X`/`I-X` se todo o intervalo ainda está livre.
fn assign_span(tags: &mut [Tag], span: &EntitySpan) -> bool {
    let Some(range) = tags.get(span.start..span.end) else {
        return false;
    };
    if range.is_empty() || range.iter().any(|t| *t != Tag::Outside) {
        return false;
    }
    tags[span.start] = Tag::Begin(span.kind);
    for tag in &mut tags[span.start + 1..span.end] {
        *tag = Tag::Inside(span.kind);
    }
    true
}

/// Une cada run máximo de tokens consecutivos do gazetteer em um span.
///
/// Tokens vizinhos que casam são tratados como a mesma menção, mesmo que
/// sejam termos sem relação ("nike" "blender").
pub fn find_dictionary_spans(words: &[String], gazetteer: &Gazetteer, kind: EntityKind) -> Vec<EntitySpan> {
    let mut spans = Vec::new();
    let mut i = 0;
    while i < words.len() {
        if gazetteer.contains(&words[i]) {
            let start = i;
            while i < words.len() && gazetteer.contains(&words[i]) {
                i += 1;
            }
            spans.push(EntitySpan::new(kind, start, i));
        } else {
            i += 1;
        }
    }
    spans
}

/// Palavra-chave de preço seguida de números/moedas. A palavra-chave sozinha não conta.
pub fn find_price_spans(words: &[String], keywords: &Gazetteer, currency_units: &Gazetteer) -> Vec<EntitySpan> {
    let mut spans = Vec::new();
    for (i, word) in words.iter().enumerate() {
        if !keywords.contains(word) {
            continue;
        }
        let mut j = i + 1;
        while j < words.len() && (is_price_number(&words[j]) || currency_units.contains(&words[j])) {
            j += 1;
        }
        if j > i + 1 {
            spans.push(EntitySpan::new(EntityKind::Price, i, j));
        }
    }
    spans
}

/// Dígitos ASCII ou numerais etíopes (U+1369–U+137C), com no máximo um
/// separador decimal (`.` ou `,`) entre dois grupos.
pub fn is_price_number(word: &str) -> bool {
    let mut parts = word.splitn(2, ['.', ',']);
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(is_price_digit);
    match (parts.next(), parts.next()) {
        (Some(int), None) => all_digits(int),
        (Some(int), Some(frac)) => all_digits(int) && all_digits(frac),
        _ => false,
    }
}

fn is_price_digit(c: char) -> bool {
    c.is_ascii_digit() || ('\u{1369}'..='\u{137C}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gazetteer::GazetteerConfig;
    use crate::tagger::is_well_formed;
    use crate::tokenizer::tokenize;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;
    use rstest::rstest;

    use EntityKind::*;

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|w| w.to_string()).collect()
    }

    fn engine() -> RuleEngine {
        RuleEngine::default()
    }

    #[test]
    fn test_price_keyword_number_currency() {
        let tags = engine().label_words(&["ዋጋ", "100", "ብር"]);
        assert_eq!(tags, [Tag::Begin(Price), Tag::Inside(Price), Tag::Inside(Price)]);
    }

    #[test]
    fn test_price_and_location_do_not_overlap() {
        // "ብር" é unidade de moeda, "ሞል" é local
        let ws = words(&["ዋጋ", "ብር", "ሞል"]);
        let set = GazetteerSet::default();
        let prices = find_price_spans(&ws, &set.price_keywords, &set.currency_units);
        assert_eq!(prices, [EntitySpan::new(Price, 0, 2)]);
        let locations = find_dictionary_spans(&ws, &set.locations, Location);
        assert_eq!(locations, [EntitySpan::new(Location, 2, 3)]);

        let tags = engine().label_words(&ws);
        assert_eq!(tags, [Tag::Begin(Price), Tag::Inside(Price), Tag::Begin(Location)]);
    }

    #[test]
    fn test_bare_keyword_is_not_a_price() {
        let tags = engine().label_words(&["ዋጋ", "ጥሩ"]);
        assert_eq!(tags, [Tag::Outside, Tag::Outside]);
        assert_eq!(engine().label_words(&["price"]), [Tag::Outside]);
    }

    #[test]
    fn test_location_wins_over_price_at_same_start() {
        let mut config = GazetteerConfig::default();
        config.locations.push("ዋጋ".into());
        let engine = RuleEngine::new(GazetteerSet::from_config(&config));

        let tags = engine.label_words(&["ዋጋ", "100"]);
        assert_eq!(tags, [Tag::Begin(Location), Tag::Outside]);
    }

    #[test]
    fn test_product_wins_over_location() {
        let mut config = GazetteerConfig::default();
        config.locations.push("nike".into());
        let engine = RuleEngine::new(GazetteerSet::from_config(&config));

        assert_eq!(engine.label_words(&["Nike"]), [Tag::Begin(Product)]);
    }

    #[test]
    fn test_consecutive_hits_merge_into_one_span() {
        let tags = engine().label_words(&["nike", "air", "force", "ቦሌ"]);
        assert_eq!(
            tags,
            [
                Tag::Begin(Product),
                Tag::Inside(Product),
                Tag::Inside(Product),
                Tag::Begin(Location),
            ]
        );
    }

    #[test]
    fn test_partially_overlapping_span_is_dropped() {
        // Location [0, 2) começa livre mas invade o Product [1, 2)
        let config = GazetteerConfig {
            products: vec!["b".into()],
            locations: vec!["a".into(), "b".into()],
            price_keywords: vec![],
            currency_units: vec![],
        };
        let engine = RuleEngine::new(GazetteerSet::from_config(&config));
        let (tags, decisions) = engine.resolve(&words(&["a", "b", "c"]));

        assert_eq!(tags, [Tag::Outside, Tag::Begin(Product), Tag::Outside]);
        assert_eq!(
            decisions,
            [
                SpanDecision { span: EntitySpan::new(Product, 1, 2), applied: true },
                SpanDecision { span: EntitySpan::new(Location, 0, 2), applied: false },
            ]
        );
    }

    #[test]
    fn test_nested_price_spans_keep_the_first() {
        // "ዋጋ" abre [0, 3) e "ብር" abre [1, 3): o segundo é descartado
        let (tags, decisions) = engine().resolve(&words(&["ዋጋ", "ብር", "100"]));
        assert_eq!(tags, [Tag::Begin(Price), Tag::Inside(Price), Tag::Inside(Price)]);
        assert_eq!(decisions.iter().filter(|d| d.applied).count(), 1);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let tokens = tokenize("NIKE Price 2500 Birr");
        let tagged = engine().tag(&tokens);
        let labels: Vec<String> = tagged.iter().map(|t| t.tag.label()).collect();
        assert_eq!(labels, ["B-Product", "B-PRICE", "I-PRICE", "I-PRICE"]);
        assert_eq!(tagged[0].token.text, "nike");
    }

    #[test]
    fn test_unicode_numerics_do_not_continue_a_price() {
        let tags = engine().label_words(&["ዋጋ", "100", "½"]);
        assert_eq!(tags, [Tag::Begin(Price), Tag::Inside(Price), Tag::Outside]);
        assert_eq!(engine().label_words(&["price", "Ⅻ"]), [Tag::Outside, Tag::Outside]);
    }

    #[test]
    fn test_shared_engine_exposes_its_gazetteers() {
        let engine = engine();
        let clone = engine.clone();
        assert!(std::ptr::eq(engine.gazetteers(), clone.gazetteers()));
        assert!(clone.gazetteers().locations.contains("ቦሌ"));
    }

    #[test]
    fn test_empty_sequence() {
        assert!(engine().label_tokens(&[]).is_empty());
    }

    #[rstest]
    #[case("1500", true)]
    #[case("12.50", true)]
    #[case("12,50", true)]
    #[case("፻", true)]
    #[case("፲፭", true)]
    #[case("½", false)]
    #[case("²", false)]
    #[case("Ⅻ", false)]
    #[case("١٢", false)]
    #[case("1.2.3", false)]
    #[case("12.", false)]
    #[case(".5", false)]
    #[case("12k", false)]
    #[case("", false)]
    fn test_is_price_number(#[case] word: &str, #[case] expected: bool) {
        assert_eq!(is_price_number(word), expected);
    }

    #[quickcheck]
    fn prop_tags_are_well_formed(picks: Vec<u8>) -> TestResult {
        const VOCAB: &[&str] = &[
            "ዋጋ", "ብር", "birr", "100", "2.5", "ሞል", "ቦሌ", "nike", "air", "ጫማ", "ከ", "በ", "ነው", "test",
        ];
        if picks.is_empty() {
            return TestResult::discard();
        }
        let ws: Vec<&str> = picks.iter().map(|p| VOCAB[*p as usize % VOCAB.len()]).collect();
        let tags = engine().label_words(&ws);
        TestResult::from_bool(tags.len() == ws.len() && is_well_formed(&tags))
    }
}
