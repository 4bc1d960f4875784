//! Contextual follow-up suggestions for the chat assistant

/// Pick follow-up suggestions based on keywords in the user message
pub fn for_message(message: &str) -> Vec<String> {
    let lower = message.to_lowercase();

    if lower.contains("reentrancy") {
        return to_strings(&[
            "How to prevent reentrancy attacks?",
            "Best practices for external calls",
            "Using ReentrancyGuard modifier",
        ]);
    }

    if lower.contains("gas") || lower.contains("optimization") {
        return to_strings(&[
            "Gas optimization techniques",
            "Efficient storage patterns",
            "Loop optimization strategies",
        ]);
    }

    if lower.contains("security") || lower.contains("vulnerability") {
        return to_strings(&[
            "Common security vulnerabilities",
            "Access control best practices",
            "Input validation techniques",
        ]);
    }

    to_strings(&[
        "Explain smart contract security",
        "Show gas optimization tips",
        "Best practices for Solidity",
        "How to prevent common vulnerabilities",
    ])
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reentrancy_bucket() {
        let suggestions = for_message("my contract might have a Reentrancy problem");
        assert!(suggestions[0].contains("reentrancy"));
    }

    #[test]
    fn test_gas_bucket() {
        let suggestions = for_message("how do I lower gas costs?");
        assert!(suggestions.iter().any(|s| s.contains("Gas optimization")));
    }

    #[test]
    fn test_default_bucket() {
        let suggestions = for_message("hello there");
        assert_eq!(suggestions.len(), 4);
    }
}
