//! # Gazetteers de Produtos, Locais e Preços
//!
//! Listas fixas de termos conhecidos, usadas pelo [`RuleEngine`](crate::rule_based::RuleEngine)
//! para casamento por dicionário. Os termos foram extraídos manualmente das
//! mensagens dos canais de venda (roupas, calçados, utensílios de cozinha) e
//! misturam amárico e inglês.
//!
//! As listas são dados de configuração, não constantes do rotulador: um
//! [`GazetteerSet`] pode vir de [`GazetteerConfig::default`] ou de um arquivo
//! JSON, e várias configurações (ex: uma por mercado) podem coexistir.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NerError, Result};

const PRODUCTS: &[&str] = &[
    "Kitchen", "Hair", "Tape", "Power", "Food", "Brush", "Bottle", "Bath", "Electric", "Silicone",
    "Force", "Stainless", "Waterproof", "Nike", "Adidas", "Skechers", "Reebok", "Air", "leather",
    "Jordan", "Baby", "Gel", "ልብስ", "ልብሶች", "Shoes", "Boots", "Toothbrush", "Bag", "Bags", "Socks",
    "Patch", "Knee", "Massage", "Massager", "Blender", "Cup", "Door", "Table", "Plate",
    "Towel", "Coffee", "Laptop", "Lamp", "USB", "Cap", "Sticker", "Foam", "Water",
    "Steel", "Smart", "Notebook", "LED", "Airforce", "NB",
    "Puma", "Yeezy", "Vans", "loafer", "suede", "terrex", "Goretex", "Frame",
    "Battery", "Mop", "Machine", "Maker", "Rack", "Hand", "Box", "Spray", "Milk",
    "Tool", "Dry", "Home", "Spa", "Kettle", "Roller", "Fan", "Filter", "sun",
    "ጁስ", "ROLEX", "ኬክ", "Base", "Spoon", "Slicer", "Grinder", "pad", "shoe", "ጫማ", "Display",
    "Pan", "Watches", "ፍሪጆች", "Metal", "መአዛን", "Feeder", "Toilet", "Rubber", "pairs", "glasses",
    "mixer", "blade", "tempered", "glass", "bakeware", "የመስታዎት", "ፓትራዎች", "refrigerators", "የፍሪጅ",
    "ማስቀመጫ", "የልብስ", "ማጠቢያ", "ላውንደሪዎች", "protector", "vegetable", "cutter", "cloud", "chelsea",
    "ማሽን", "ማፍያ", "ቡና", "car", "ecco", "zara", "clips", "hanger", "cloth", "ማስጫ", "chekich",
    "የልብስም", "የጫማም", "ማጠብያ", "washing", "balenciaga", "disele",
];

const LOCATIONS: &[&str] = &[
    "አድራሻ", "ሜክሲኮ", "ቦሌ", "አዲስ", "አበባ", "Tera", "ተራ", "ሞል", "ግራንድ", "አድራሻችን", "አልሳም", "ከለላ",
    "መድሀኔአለም", "ኮሜርስ", "ጀርባ", "G07", "ግራውንድ", "የሱቅ", "ቦታ", "Address", "ጀሞ", "መሰናዶ",
    "ፕላዛ", "አፓርታማ", "ፊትለፊት", "አለምነሽ", "መዚድ", "ኬኬር", "ፍሎር", "አይመን", "ህንፃ", "ከ",
    "ዘፍመሽ", "መገናኛ", "ታወር", "ለይ", "ድሪም", "ሀይሎች", "ጦር", "fashion", "ፋሽን",
];

const PRICE_KEYWORDS: &[&str] = &["ዋጋ", "ብር", "በ", "price", "birr", "Prices"];

const CURRENCY_UNITS: &[&str] = &["ብር", "birr"];

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Forma serializável das listas, como aparece no JSON de configuração.
///
/// Campos ausentes no JSON usam a lista canônica.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazetteerConfig {
    pub products: Vec<String>,
    pub locations: Vec<String>,
    pub price_keywords: Vec<String>,
    /// Unidades aceitas como continuação de um preço (ex: "ብር", "birr").
    pub currency_units: Vec<String>,
}

impl Default for GazetteerConfig {
    fn default() -> Self {
        Self {
            products: to_strings(PRODUCTS),
            locations: to_strings(LOCATIONS),
            price_keywords: to_strings(PRICE_KEYWORDS),
            currency_units: to_strings(CURRENCY_UNITS),
        }
    }
}

/// Um conjunto de termos em minúsculas com consulta O(1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gazetteer {
    terms: HashSet<String>,
}

impl Gazetteer {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// `token` já deve estar em minúsculas.
    pub fn contains(&self, token: &str) -> bool {
        self.terms.contains(token)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Reescreve cada termo com `canonical` (e minúsculas).
    pub fn canonicalized(&self, canonical: impl Fn(&str) -> String) -> Self {
        Self::new(self.terms.iter().map(|t| canonical(t)))
    }
}

/// Os quatro dicionários consultados pelo rotulador.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GazetteerSet {
    pub products: Gazetteer,
    pub locations: Gazetteer,
    pub price_keywords: Gazetteer,
    pub currency_units: Gazetteer,
}

impl GazetteerSet {
    pub fn from_config(config: &GazetteerConfig) -> Self {
        Self {
            products: Gazetteer::new(&config.products),
            locations: Gazetteer::new(&config.locations),
            price_keywords: Gazetteer::new(&config.price_keywords),
            currency_units: Gazetteer::new(&config.currency_units),
        }
    }

    /// Passa todos os termos pela mesma forma canônica das mensagens, para que
    /// grafias homófonas (ex: "ህንፃ" e "ህንጻ") casem com os tokens normalizados.
    pub fn canonicalized(&self, canonical: impl Fn(&str) -> String) -> Self {
        Self {
            products: self.products.canonicalized(&canonical),
            locations: self.locations.canonicalized(&canonical),
            price_keywords: self.price_keywords.canonicalized(&canonical),
            currency_units: self.currency_units.canonicalized(&canonical),
        }
    }

    /// Lê um [`GazetteerConfig`] em JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| NerError::io(path, e))?;
        let config: GazetteerConfig =
            serde_json::from_str(&raw).map_err(|e| NerError::json(path, e))?;
        tracing::debug!(
            path = %path.display(),
            products = config.products.len(),
            locations = config.locations.len(),
            "gazetteers carregados"
        );
        Ok(Self::from_config(&config))
    }
}

impl Default for GazetteerSet {
    fn default() -> Self {
        Self::from_config(&GazetteerConfig::default())
    }
}
