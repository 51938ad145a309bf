use std::collections::{BTreeMap, HashMap};

/// A text transform applied identically to search queries and to the
/// fields they are matched against.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, text: &str) -> String;
}

/// Unicode lowercase.
pub struct CaseFold;

impl Normalizer for CaseFold {
    fn normalize(&self, text: &str) -> String {
        text.to_lowercase()
    }
}

/// Maps visually similar glyphs onto one canonical glyph.
pub struct GlyphAliases {
    map: HashMap<char, char>,
}

impl GlyphAliases {
    /// Build from `canonical -> [variants]`. Keys and variants that are not a
    /// single character are ignored.
    pub fn from_table(table: &BTreeMap<String, Vec<String>>) -> Self {
        let mut map = HashMap::new();
        for (canonical, variants) in table {
            let Some(target) = single_char(canonical) else {
                tracing::warn!(alias = %canonical, "ignoring multi-character alias target");
                continue;
            };
            for variant in variants {
                match single_char(variant) {
                    Some(source) if source != target => {
                        map.insert(source, target);
                    }
                    Some(_) => {}
                    None => {
                        tracing::warn!(alias = %variant, "ignoring multi-character alias variant")
                    }
                }
            }
        }
        Self { map }
    }

}

impl Normalizer for GlyphAliases {
    fn normalize(&self, text: &str) -> String {
        text.chars()
            .map(|c| self.map.get(&c).copied().unwrap_or(c))
            .collect()
    }
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Runs steps in order.
pub struct Pipeline {
    steps: Vec<Box<dyn Normalizer>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn then(mut self, step: impl Normalizer + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Aliases run on the raw glyphs, before case folding erases the
    /// difference between e.g. Latin `I` and `i`.
    pub fn with_aliases(table: &BTreeMap<String, Vec<String>>) -> Self {
        Self::new().then(GlyphAliases::from_table(table)).then(CaseFold)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new().then(CaseFold)
    }
}

impl Normalizer for Pipeline {
    fn normalize(&self, text: &str) -> String {
        self.steps
            .iter()
            .fold(text.to_string(), |acc, step| step.normalize(&acc))
    }
}

/// Default Karata glyph aliases: the palochka is routinely typed as a Latin
/// I/l, a digit one, a pipe or a Ukrainian i.
pub fn default_aliases() -> BTreeMap<String, Vec<String>> {
    let mut table = BTreeMap::new();
    table.insert(
        "ӏ".to_string(),
        ["Ӏ", "I", "l", "1", "|", "і"].iter().map(|s| s.to_string()).collect(),
    );
    table.insert("е".to_string(), vec!["ё".to_string()]);
    table.insert("Е".to_string(), vec!["Ё".to_string()]);
    table
}
