use super::state::Condition;

/// Case conversion and noun inflection used to build labels
pub trait TextFormatter {
    /// Split on case changes and separators, capitalize each word, join with `delimiter`
    fn capital_case(&self, input: &str, delimiter: &str) -> String;

    /// Plural form of the last word
    fn pluralize(&self, input: &str) -> String;

    /// Singular form of the last word
    fn singularize(&self, input: &str) -> String;
}

/// Heading shown above a category group, e.g. `"men_shoe"` -> `"Men Shoes"`
pub fn group_heading(formatter: &dyn TextFormatter, kind: &str) -> String {
    formatter.pluralize(&formatter.capital_case(kind, " "))
}

/// Checkbox label of a category, e.g. `"t-shirts"` -> `"T Shirt"`
pub fn category_label(formatter: &dyn TextFormatter, title: &str) -> String {
    formatter.singularize(&formatter.capital_case(title, " "))
}

pub fn condition_label(formatter: &dyn TextFormatter, condition: Condition) -> String {
    formatter.capital_case(condition.as_str(), " ")
}

// (singular, plural)
const IRREGULAR: &[(&str, &str)] = &[
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("person", "people"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("knife", "knives"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("wife", "wives"),
    ("shelf", "shelves"),
    ("half", "halves"),
    ("wolf", "wolves"),
    ("scarf", "scarves"),
    ("thief", "thieves"),
    ("loaf", "loaves"),
    ("potato", "potatoes"),
    ("tomato", "tomatoes"),
    ("hero", "heroes"),
    ("echo", "echoes"),
];

const UNCOUNTABLE: &[&str] = &[
    "apparel",
    "clothing",
    "equipment",
    "footwear",
    "furniture",
    "glasses",
    "information",
    "jeans",
    "jewelry",
    "jewellery",
    "leggings",
    "luggage",
    "merchandise",
    "news",
    "pajamas",
    "pants",
    "series",
    "sheep",
    "shorts",
    "species",
    "sunglasses",
    "swimwear",
    "tights",
    "trousers",
    "underwear",
];

// Singulars ending in `s` that take `-es`
const S_ENDINGS: &[&str] = &[
    "alias", "atlas", "bus", "campus", "canvas", "gas", "iris", "lens", "virus",
];

// Singulars ending in `-ie`, whose plural is not `-y` -> `-ies`
const IE_NOUNS: &[&str] = &[
    "beanie", "bootie", "brownie", "calorie", "cookie", "hoodie", "movie", "onesie", "rookie",
    "selfie", "smoothie", "zombie",
];

/// English rules for the common storefront vocabulary
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishFormatter;

impl EnglishFormatter {
    pub fn new() -> Self {
        Self
    }

    fn inflect_last(input: &str, f: fn(&str) -> String) -> String {
        let start = input
            .rfind(|c: char| !c.is_alphanumeric())
            .map(|i| i + input[i..].chars().next().map_or(1, char::len_utf8))
            .unwrap_or(0);
        let (head, word) = input.split_at(start);
        if word.is_empty() {
            return input.to_string();
        }
        let lower = word.to_lowercase();
        let inflected = f(&lower);
        format!("{}{}", head, restore_case(word, &inflected))
    }
}

impl TextFormatter for EnglishFormatter {
    fn capital_case(&self, input: &str, delimiter: &str) -> String {
        split_words(input)
            .iter()
            .map(|word| capitalize(&word.to_lowercase()))
            .collect::<Vec<_>>()
            .join(delimiter)
    }

    fn pluralize(&self, input: &str) -> String {
        Self::inflect_last(input, plural_of)
    }

    fn singularize(&self, input: &str) -> String {
        Self::inflect_last(input, singular_of)
    }
}

fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in input.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        let boundary = match prev {
            Some(p) => (p.is_lowercase() || p.is_numeric()) && c.is_uppercase(),
            None => false,
        };
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn restore_case(original: &str, inflected: &str) -> String {
    if original.chars().count() > 1 && original.chars().all(|c| !c.is_lowercase()) {
        inflected.to_uppercase()
    } else if original.chars().next().is_some_and(char::is_uppercase) {
        capitalize(inflected)
    } else {
        inflected.to_string()
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn plural_of(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(s, p)| *s == word || *p == word) {
        return plural.to_string();
    }
    if S_ENDINGS.contains(&word) {
        return format!("{}es", word);
    }
    if word.ends_with("ss") || word.ends_with('x') || word.ends_with('z') || word.ends_with("ch") || word.ends_with("sh") {
        return format!("{}es", word);
    }
    if word.ends_with('s') {
        // already plural
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{}ies", stem);
        }
    }
    format!("{}s", word)
}

fn singular_of(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) || S_ENDINGS.contains(&word) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(s, p)| *s == word || *p == word) {
        return singular.to_string();
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("es") {
        if S_ENDINGS.contains(&stem) {
            return stem.to_string();
        }
    }
    if let Some(stem) = word.strip_suffix("ies") {
        // tie, pie, lie
        if stem.chars().count() <= 1 || IE_NOUNS.contains(&format!("{}ie", stem).as_str()) {
            return format!("{}ie", stem);
        }
        return format!("{}y", stem);
    }
    // bus(es), virus(es), but not blouse(s) or house(s)
    if let Some(stem) = word.strip_suffix("uses") {
        if stem.chars().last().is_some_and(|c| !matches!(c, 'a' | 'o' | 'u')) {
            return format!("{}us", stem);
        }
    }
    for suffix in ["sses", "xes", "zes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}
