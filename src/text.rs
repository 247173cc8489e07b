//! Tokenizing and Norwegian-aware stemming of free-text answers.

use std::collections::HashSet;

/// Inflectional endings, longest first. Only the first one that matches is considered.
const SUFFIXES: &[&str] = &[
    "hetene", "elsene", "ingene", "ingen", "inger", "heten", "elsen", "ende", "ene", "ane",
    "het", "ing", "ert", "er", "en", "et", "ar", "a", "e",
];

const MIN_STEM_CHARS: usize = 3;

const MIN_WORD_CHARS: usize = 3;

const STOP_WORDS: &[&str] = &[
    // function words
    "alle", "at", "av", "bare", "begge", "ble", "blei", "bli", "blir", "blitt", "både", "båe",
    "da", "de", "deg", "dei", "deim", "deira", "deires", "dem", "den", "denne", "der", "dere",
    "deres", "det", "dette", "di", "din", "disse", "ditt", "du", "dykk", "dykkar", "då", "eg",
    "ein", "eit", "eitt", "eller", "elles", "en", "enn", "er", "et", "ett", "etter", "for",
    "fordi", "fra", "før", "ha", "hadde", "han", "hans", "har", "hennar", "henne", "hennes",
    "her", "hjå", "ho", "hoe", "honom", "hoss", "hossen", "hun", "hva", "hvem", "hver", "hvilke",
    "hvilken", "hvis", "hvor", "hvordan", "hvorfor", "ikke", "ikkje", "ingen", "ingi", "inkje",
    "inn", "inni", "ja", "jeg", "kan", "kom", "korleis", "korso", "kun", "kunne", "kva", "kvar",
    "kvarhelst", "kven", "kvi", "kvifor", "man", "mange", "me", "med", "medan", "meg", "meget",
    "mellom", "men", "mi", "min", "mine", "mitt", "mot", "mykje", "ned", "nei", "no", "noe",
    "noen", "noka", "noko", "nokon", "nokor", "nokre", "når", "og", "også", "om", "opp", "oss",
    "over", "på", "samme", "seg", "selv", "si", "sia", "sidan", "siden", "sin", "sine", "sitt",
    "sjøl", "skal", "skulle", "slik", "so", "som", "somme", "somt", "så", "sånn", "til", "um",
    "upp", "ut", "uten", "var", "vart", "varte", "ved", "vere", "verte", "vi", "vil", "ville",
    "vore", "vors", "vort", "vår", "være", "vært", "å",
    // auxiliary and filler verbs
    "få", "får", "fikk", "gjøre", "gjør", "gjorde", "må", "måtte", "prøve", "prøvde",
    // redaction placeholders and noise
    "fjernet", "redacted", "sladdet", "xxx", "nbsp",
];

/// Strips the longest matching inflectional suffix if the remaining stem keeps at least
/// three characters; otherwise the word is returned unchanged.
pub fn stem_norwegian(word: &str) -> String {
    let lower = word.to_lowercase();
    match SUFFIXES.iter().find_map(|suffix| lower.strip_suffix(*suffix)) {
        Some(stem) if stem.chars().count() >= MIN_STEM_CHARS => stem.to_string(),
        _ => lower,
    }
}

/// Lowercases, turns every character that is not alphanumeric into a separator and splits.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(String::from)
        .collect()
}

/// Significant words of a text: tokens longer than two characters that are not stop words.
pub fn extract_words(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|token| token.chars().count() >= MIN_WORD_CHARS)
        .filter(|token| !is_stop_word(token))
        .collect()
}

/// Stemmed token set used for keyword matching.
pub fn stem_set(text: &str) -> HashSet<String> {
    tokenize(text)
        .iter()
        .map(|token| stem_norwegian(token))
        .collect()
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definite_and_plural_forms_share_a_stem() {
        assert_eq!(stem_norwegian("søknaden"), "søknad");
        assert_eq!(stem_norwegian("søknader"), "søknad");
        assert_eq!(stem_norwegian("søknad"), "søknad");
        assert_eq!(stem_norwegian("søknadene"), "søknad");
    }

    #[test]
    fn longest_suffix_wins() {
        assert_eq!(stem_norwegian("utbetalingen"), "utbetal");
        assert_eq!(stem_norwegian("utbetalinger"), "utbetal");
        assert_eq!(stem_norwegian("utbetaling"), "utbetal");
    }

    #[test]
    fn short_words_are_not_over_stemmed() {
        assert_eq!(stem_norwegian("ene"), "ene");
        assert_eq!(stem_norwegian("side"), "sid");
        assert_eq!(stem_norwegian("tre"), "tre");
        assert_eq!(stem_norwegian("Feil"), "feil");
    }

    #[test]
    fn a_too_short_stem_keeps_the_word_whole() {
        assert_eq!(stem_norwegian("tende"), "tende");
        assert_eq!(stem_norwegian("ingen"), "ingen");
    }

    #[test]
    fn extract_words_drops_short_tokens_and_stop_words() {
        let words = extract_words("Jeg ville sjekke status på søknaden, og fikk det ikke til!");
        assert_eq!(words, vec!["sjekke", "status", "søknaden"]);
    }

    #[test]
    fn extract_words_keeps_norwegian_letters() {
        let words = extract_words("Første gang: økonomi/lån");
        assert_eq!(words, vec!["første", "gang", "økonomi", "lån"]);
    }

    #[test]
    fn redaction_placeholders_are_noise() {
        assert!(extract_words("[FJERNET] ringte meg").contains(&"ringte".to_string()));
        assert!(!extract_words("[FJERNET] ringte meg").contains(&"fjernet".to_string()));
    }

    #[test]
    fn stem_set_keeps_stop_words_for_matching() {
        let stems = stem_set("Fikk ikke logget inn");
        assert!(stems.contains("logg"));
        assert!(stems.contains("inn"));
    }
}
