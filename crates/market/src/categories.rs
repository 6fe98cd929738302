use common::Category;

/// Quote asset stripped from symbols before keyword matching.
const QUOTE_ASSET: &str = "USDT";

const L1_KEYWORDS: &[&str] = &[
    "BTC", "ETH", "SOL", "ADA", "AVAX", "DOT", "NEAR", "ATOM", "TIA", "SUI",
];
const L2_KEYWORDS: &[&str] = &["MATIC", "ARB", "OP", "IMX", "LRC", "METIS", "STRK"];
const AI_KEYWORDS: &[&str] = &[
    "FET", "AGIX", "OCEAN", "NMR", "GRT", "RNDR", "TAO", "WLD", "AI",
];
const DEFI_KEYWORDS: &[&str] = &[
    "UNI", "AAVE", "CRV", "SNX", "COMP", "MKR", "LDO", "SUSHI", "BAL", "1INCH",
];
const MEME_KEYWORDS: &[&str] = &["DOGE", "SHIB", "PEPE", "FLOKI", "BONK", "WIF", "MEME"];
const GAMING_KEYWORDS: &[&str] = &["AXS", "SAND", "MANA", "ENJ", "GALA", "IMX", "BEAM", "PRIME"];

/// Assign a category to a symbol from its text alone.
///
/// The keyword lists are tested in strict priority order
/// L1 > L2 > AI > DeFi > Meme > Gaming; the first substring match wins and
/// anything unmatched falls through to Infrastructure. The order is a
/// contract: a symbol matching both an L2 and a DeFi keyword is L2.
///
/// Only the first occurrence of the quote asset is stripped, anywhere in
/// the symbol, so e.g. index symbols keep the rest of their text intact.
pub fn categorize(symbol: &str) -> Category {
    let normalized = symbol.to_uppercase().replacen(QUOTE_ASSET, "", 1);
    let matches = |keywords: &[&str]| keywords.iter().any(|kw| normalized.contains(kw));

    if matches(L1_KEYWORDS) {
        Category::L1
    } else if matches(L2_KEYWORDS) {
        Category::L2
    } else if matches(AI_KEYWORDS) {
        Category::Ai
    } else if matches(DEFI_KEYWORDS) {
        Category::DeFi
    } else if matches(MEME_KEYWORDS) {
        Category::Meme
    } else if matches(GAMING_KEYWORDS) {
        Category::Gaming
    } else {
        Category::Infrastructure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_symbol_per_list() {
        assert_eq!(categorize("BTCUSDT"), Category::L1);
        assert_eq!(categorize("ARBUSDT"), Category::L2);
        assert_eq!(categorize("FETUSDT"), Category::Ai);
        assert_eq!(categorize("AAVEUSDT"), Category::DeFi);
        assert_eq!(categorize("PEPEUSDT"), Category::Meme);
        assert_eq!(categorize("AXSUSDT"), Category::Gaming);
    }

    #[test]
    fn unmatched_symbols_are_infrastructure() {
        assert_eq!(categorize("XRPUSDT"), Category::Infrastructure);
        assert_eq!(categorize("LINKUSDT"), Category::Infrastructure);
        assert_eq!(categorize(""), Category::Infrastructure);
        assert_eq!(categorize("???"), Category::Infrastructure);
    }

    #[test]
    fn priority_order_resolves_multi_list_symbols() {
        // Contains both "ARB" (L2) and "AAVE" (DeFi) — L2 is checked first.
        assert_eq!(categorize("ARBAAVEUSDT"), Category::L2);
        // Contains both "UNI" (DeFi) and "BTC" (L1) — L1 wins.
        assert_eq!(categorize("UNIBTCUSDT"), Category::L1);
        // "IMX" sits in both the L2 and Gaming lists; L2 is checked first.
        assert_eq!(categorize("IMXUSDT"), Category::L2);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(categorize("dogeusdt"), Category::Meme);
        assert_eq!(categorize("EthUsdt"), Category::L1);
    }

    #[test]
    fn quote_suffix_stripped_before_matching() {
        // Without stripping, the "USDT" suffix text itself never collides
        // with a keyword, but stripping must not break plain base symbols.
        assert_eq!(categorize("SUI"), Category::L1);
        assert_eq!(categorize("SUIUSDT"), Category::L1);
    }
}
