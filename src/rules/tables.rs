//! Static ban lists.
//!
//! Category tokens are matched as case-insensitive substrings of the joined
//! category path. Title and form tokens are matched as whole words/phrases.

use crate::model::IngredientForm;

pub const BANNED_CATEGORY_TOKENS: &[&str] = &[
    "pet food",
    "pet care",
    "pets",
    "baby care",
    "nappies",
    "diapers",
    "beauty",
    "cosmetics",
    "toiletries",
    "personal care",
    "cleaning",
    "household",
    "laundry",
    "pharmacy",
];

pub const BANNED_TITLE_TOKENS: &[&str] = &[
    "dog food",
    "cat food",
    "pet food",
    "dog treats",
    "cat treats",
    "shampoo",
    "conditioner",
    "soap",
    "detergent",
    "candle",
    "air freshener",
    "toy",
    "plush",
    "scented",
];

const RAW_BANS: &[&str] = &[
    "powder",
    "powdered",
    "cooked",
    "roast",
    "roasted",
    "rotisserie",
    "smoked",
    "fried",
    "stock",
    "broth",
    "flavour",
    "flavoured",
    "flavor",
    "flavored",
    "seasoning",
    "canned",
    "tinned",
    "dried",
    "jerky",
];

const FRESH_BANS: &[&str] = &[
    "frozen",
    "canned",
    "tinned",
    "dried",
    "dehydrated",
    "powder",
    "powdered",
    "pickled",
    "preserved",
];

const DRY_BANS: &[&str] = &[
    "fresh",
    "frozen",
    "canned",
    "tinned",
    "cooked",
    "ready to eat",
    "microwave",
];

const FROZEN_BANS: &[&str] = &["fresh", "canned", "tinned", "dried", "powder", "powdered"];

const COOKED_BANS: &[&str] = &["raw", "uncooked", "powder", "powdered", "dried"];

const CANNED_BANS: &[&str] = &[
    "fresh",
    "frozen",
    "dried",
    "dehydrated",
    "powder",
    "powdered",
];

const LIQUID_BANS: &[&str] = &[
    "powder", "powdered", "tablet", "tablets", "granules", "capsules", "dried",
];

const POWDER_BANS: &[&str] = &["liquid", "ready to drink", "fresh", "syrup"];

/// Title tokens that contradict the requested form.
pub fn form_banned_tokens(form: IngredientForm) -> &'static [&'static str] {
    match form {
        IngredientForm::Raw => RAW_BANS,
        IngredientForm::Fresh => FRESH_BANS,
        IngredientForm::Dry => DRY_BANS,
        IngredientForm::Frozen => FROZEN_BANS,
        IngredientForm::Cooked => COOKED_BANS,
        IngredientForm::Canned => CANNED_BANS,
        IngredientForm::Liquid => LIQUID_BANS,
        IngredientForm::Powder => POWDER_BANS,
    }
}

/// Finds the first token occurring in `haystack` as a plain substring.
///
/// `haystack` must already be lowercase.
pub fn find_substring<'a>(haystack: &str, tokens: &[&'a str]) -> Option<&'a str> {
    tokens.iter().copied().find(|token| haystack.contains(token))
}

/// Finds the first token occurring in `haystack` on word boundaries.
///
/// `haystack` must already be lowercase.
pub fn find_word<'a>(haystack: &str, tokens: &[&'a str]) -> Option<&'a str> {
    tokens
        .iter()
        .copied()
        .find(|token| contains_word(haystack, token))
}

fn contains_word(haystack: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }

    haystack.match_indices(word).any(|(start, _)| {
        let end = start + word.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_word_respects_boundaries() {
        assert_eq!(find_word("fresh strawberries 400g", &["raw"]), None);
        assert_eq!(find_word("raw prawns", &["raw"]), Some("raw"));
        assert_eq!(find_word("prawns (raw)", &["raw"]), Some("raw"));
        assert_eq!(find_word("chicken stock-powder", &["powder"]), Some("powder"));
    }

    #[test]
    fn test_find_word_matches_phrases() {
        assert_eq!(
            find_word("premium dog food 2kg", BANNED_TITLE_TOKENS),
            Some("dog food")
        );
        assert_eq!(find_word("hotdog foodie pack", &["dog food"]), None);
    }

    #[test]
    fn test_find_substring_is_plain_containment() {
        assert_eq!(
            find_substring("home > household cleaning", BANNED_CATEGORY_TOKENS),
            Some("cleaning")
        );
        assert_eq!(find_substring("meat > poultry", BANNED_CATEGORY_TOKENS), None);
    }

    #[test]
    fn test_every_form_has_bans() {
        let forms = [
            IngredientForm::Raw,
            IngredientForm::Fresh,
            IngredientForm::Dry,
            IngredientForm::Frozen,
            IngredientForm::Cooked,
            IngredientForm::Canned,
            IngredientForm::Liquid,
            IngredientForm::Powder,
        ];
        for form in forms {
            assert!(!form_banned_tokens(form).is_empty(), "{form} has no bans");
        }
    }

    #[test]
    fn test_tokens_are_lowercase() {
        let all = BANNED_CATEGORY_TOKENS
            .iter()
            .chain(BANNED_TITLE_TOKENS.iter());
        for token in all {
            assert_eq!(*token, token.to_lowercase());
        }
    }
}
