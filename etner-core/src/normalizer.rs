//! # Normalizador de Mensagens
//!
//! Limpa o texto cru coletado dos canais antes da tokenização. As etapas são
//! aplicadas sempre na mesma ordem, cada uma sobre a saída da anterior:
//!
//! 1. **Tamanhos**: remove declarações como `Size #3940#41#42#43` ou `Size L#XL`.
//! 2. **Normalização canônica** ([`ScriptNormalizer`]): decomposição Unicode,
//!    remoção de diacríticos e unificação de variantes de glifos etíopes.
//! 3. **Emoji**: remove pictogramas, bandeiras e dingbats.
//! 4. **Pontuação**: `. _ ! ? ; : , - " ' ( ) { } [ ]` e a pontuação etíope
//!    viram um espaço; qualquer outro caractere fora do conjunto alvo é descartado.
//! 5. **Trim**: apenas as bordas; espaços internos são preservados.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use etner_core::normalizer::normalize;
//!
//! let clean = normalize("Size #3940#41#42#43 ይህ ሙከራ ነው 😊");
//! assert_eq!(clean, "ይህ ሙከራ ነው");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// "Size" seguido de grupos de `#`/caracteres de palavra.
static SIZE_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsize\s*[#\w]+").expect("regex de tamanho válida"));

/// Blocos de emoji: emoticons, símbolos e pictogramas, transporte/mapas,
/// indicadores regionais (bandeiras), dingbats, símbolos suplementares.
static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        "[",
        r"\x{1F600}-\x{1F64F}",
        r"\x{1F300}-\x{1F5FF}",
        r"\x{1F680}-\x{1F6FF}",
        r"\x{1F1E0}-\x{1F1FF}",
        r"\x{2600}-\x{26FF}",
        r"\x{2702}-\x{27B0}",
        r"\x{1F900}-\x{1F9FF}",
        r"\x{1FA70}-\x{1FAFF}",
        r"\x{200D}",
        r"\x{FE0E}\x{FE0F}",
        "]",
    ))
    .expect("regex de emoji válida")
});

/// Pontuação que vira espaço no passo 4.
const PUNCTUATION: &[char] = &[
    '.', '_', '!', '?', ';', ':', ',', '-', '"', '\'', '(', ')', '{', '}', '[', ']',
];

/// Verifica se o caractere pertence ao bloco Unicode etíope (U+1200–U+137F).
pub fn is_ethiopic(c: char) -> bool {
    ('\u{1200}'..='\u{137F}').contains(&c)
}

/// Pontuação etíope (፡ ። ፣ ፤ ፥ ፦ ፧ ፨), que fica dentro do bloco mas separa palavras.
pub fn is_ethiopic_punctuation(c: char) -> bool {
    ('\u{1360}'..='\u{1368}').contains(&c)
}

/// Capacidade de normalização canônica para o script alvo.
///
/// O pipeline só depende deste contrato: "unificar variantes equivalentes e
/// remover diacríticos". Outras implementações (ex: para tigrínia) podem ser
/// plugadas no [`Normalizer`].
pub trait ScriptNormalizer: Send + Sync {
    fn normalize(&self, text: &str) -> String;
}

/// Normalização padrão para o amárico.
///
/// - Decomposição de compatibilidade (NFKD), descarte de marcas combinantes
///   (inclusive U+135D–U+135F) e recomposição (NFC).
/// - Unificação de homófonos: ሐ/ኀ → ሀ, ሠ → ሰ, ዐ → አ, ፀ → ጸ, e as quartas
///   formas ሃ/ሓ/ኃ → ሀ, ኣ/ዓ → አ.
#[derive(Debug, Clone, Copy, Default)]
pub struct EthiopicNormalizer;

impl ScriptNormalizer for EthiopicNormalizer {
    fn normalize(&self, text: &str) -> String {
        let stripped: String = text.nfkd().filter(|c| !is_combining_mark(*c)).collect();
        stripped.nfc().map(unify_homophone).collect()
    }
}

/// Mapeia uma variante de glifo etíope para a forma canônica.
///
/// Todo destino é um ponto fixo do mapeamento, então aplicar duas vezes não muda nada.
fn unify_homophone(c: char) -> char {
    let shifted = |offset: i64| char::from_u32((c as u32 as i64 + offset) as u32).unwrap_or(c);
    match c {
        'ሃ' | 'ሓ' | 'ኃ' => 'ሀ',
        'ኣ' | 'ዓ' => 'አ',
        '\u{1210}'..='\u{1216}' => shifted(-0x10),
        '\u{1280}'..='\u{1286}' => shifted(-0x80),
        '\u{1220}'..='\u{1227}' => shifted(0x10),
        '\u{12D0}'..='\u{12D6}' => shifted(-0x30),
        '\u{1340}'..='\u{1346}' => shifted(-0x08),
        _ => c,
    }
}

/// O normalizador de mensagens, parametrizado pela capacidade de script.
#[derive(Debug, Clone, Default)]
pub struct Normalizer<N: ScriptNormalizer = EthiopicNormalizer> {
    script: N,
}

impl<N: ScriptNormalizer> Normalizer<N> {
    pub fn with_script(script: N) -> Self {
        Self { script }
    }

    /// Executa os cinco passos. Nunca falha; entrada vazia devolve `""`.
    pub fn normalize(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let text = strip_size_declarations(text);
        let text = self.script.normalize(&text);
        let text = strip_emoji(&text);
        let text = fold_punctuation(&text);
        // a pontuação pode expor um novo "Size" (ex: "Size.42")
        let text = strip_size_declarations(&text);

        text.trim().to_string()
    }

    /// Mensagens sem texto (célula vazia no CSV) viram `""`.
    pub fn normalize_opt(&self, text: Option<&str>) -> String {
        self.normalize(text.unwrap_or_default())
    }
}

static DEFAULT_NORMALIZER: Normalizer = Normalizer {
    script: EthiopicNormalizer,
};

/// Normaliza com a configuração padrão (amárico).
pub fn normalize(text: &str) -> String {
    DEFAULT_NORMALIZER.normalize(text)
}

pub fn strip_size_declarations(text: &str) -> String {
    SIZE_DECLARATION.replace_all(text, "").into_owned()
}

pub fn strip_emoji(text: &str) -> String {
    EMOJI.replace_all(text, "").into_owned()
}

/// Pontuação → espaço; o que não for etíope, ASCII alfanumérico ou espaço é descartado.
fn fold_punctuation(text: &str) -> String {
    text.chars()
        .filter_map(|c| {
            if PUNCTUATION.contains(&c) || is_ethiopic_punctuation(c) {
                Some(' ')
            } else if is_ethiopic(c) || c.is_ascii_alphanumeric() || c.is_whitespace() {
                Some(c)
            } else {
                None
            }
        })
        .collect()
}

/// Conjunto de caracteres permitido na saída do normalizador.
pub fn is_normalized_char(c: char) -> bool {
    (is_ethiopic(c) && !is_ethiopic_punctuation(c)) || c.is_ascii_alphanumeric() || c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_removes_size_patterns() {
        let normalized = normalize("Size #3940#41#42#43 ይህ ሙከራ ነው");
        assert!(!normalized.contains("Size"));
        assert!(!normalized.contains("#3940#41#42#43"));
        assert!(normalized.contains("ይህ ሙከራ ነው"));
    }

    #[test]
    fn test_removes_size_with_letters() {
        assert_eq!(normalize("Nike Size L#XL ጫማ"), "Nike  ጫማ");
        assert_eq!(normalize("size 42"), "");
    }

    #[test]
    fn test_removes_emojis() {
        let normalized = normalize("ሰላም 😊 ይህ ሙከራ ነው");
        assert!(!normalized.contains('😊'));
        assert!(normalized.contains("ሰላም"));
    }

    #[test]
    fn test_removes_flags_and_dingbats() {
        let normalized = normalize("🇪🇹 ቦሌ ✅ ✈ 🤩");
        assert_eq!(normalized, "ቦሌ");
    }

    #[test]
    fn test_punctuation_becomes_space() {
        assert_eq!(normalize("ዋጋ:1500ብር!"), "ዋጋ 1500ብር");
        assert_eq!(normalize("(Nike)-Air"), "Nike  Air");
    }

    #[test]
    fn test_ethiopic_punctuation_becomes_space() {
        assert_eq!(normalize("ሰላም፡ነው።"), "ሰላም ነው");
    }

    #[test]
    fn test_noise_is_dropped() {
        assert_eq!(normalize("#ቦሌ @shop 50%"), "ቦሌ shop 50");
    }

    #[test]
    fn test_size_exposed_by_punctuation_is_removed() {
        assert_eq!(normalize("ጫማ Size.42"), "ጫማ");
    }

    #[test]
    fn test_homophones_are_unified() {
        assert_eq!(normalize("ሐበሻ"), "ሀበሻ");
        assert_eq!(normalize("ሠላም"), "ሰላም");
        assert_eq!(normalize("ዐማርኛ"), "አማርኛ");
        assert_eq!(normalize("ፀሐይ"), "ጸሀይ");
    }

    #[test]
    fn test_latin_diacritics_are_stripped() {
        assert_eq!(normalize("Café Crème"), "Cafe Creme");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t"), "");
        assert_eq!(DEFAULT_NORMALIZER.normalize_opt(None), "");
    }

    #[test]
    fn test_interior_whitespace_is_kept() {
        assert_eq!(normalize("  ይህ   ሙከራ  "), "ይህ   ሙከራ");
    }

    #[quickcheck]
    fn prop_normalize_is_idempotent(text: String) -> bool {
        let once = normalize(&text);
        normalize(&once) == once
    }

    #[quickcheck]
    fn prop_output_has_only_allowed_chars(text: String) -> bool {
        let out = normalize(&text);
        out.chars().all(is_normalized_char)
            && !EMOJI.is_match(&out)
            && !SIZE_DECLARATION.is_match(&out)
    }

    #[quickcheck]
    fn prop_mixed_script_is_idempotent(words: Vec<u8>) -> bool {
        // monta textos com amárico, inglês, "size", pontuação e emoji
        const PIECES: &[&str] = &[
            "ሰላም", "ዋጋ", "ሐ", "ኣ", "Size", "size", "#41", "L", "42", ".", "-", " ", "😊",
            "🇪🇹", "é", "birr", "፡", "ጫማ",
        ];
        let text: String = words
            .iter()
            .map(|w| PIECES[*w as usize % PIECES.len()])
            .collect();
        let once = normalize(&text);
        normalize(&once) == once && !SIZE_DECLARATION.is_match(&once)
    }
}
