//! Prompt construction for the ChainGPT chat/audit endpoint

use super::ChatContext;

/// Contract code appended as chat context is truncated to this many chars
const CONTEXT_CODE_LIMIT: usize = 500;

/// Build the audit question sent to the smart-contract auditor model
pub fn build_audit_prompt(source_code: &str) -> String {
    format!(
        "Audit the following smart contract for security vulnerabilities, gas optimization opportunities, and best practices:\n\n\
         {source_code}\n\n\
         Please provide a detailed analysis including:\n\
         1. Security vulnerabilities with severity levels\n\
         2. Gas optimization opportunities\n\
         3. Best practices compliance\n\
         4. Specific recommendations for improvement"
    )
}

/// Build the assistant question, appending optional contract/audit context
pub fn build_chat_question(message: &str, context: &ChatContext) -> String {
    let mut question = message.to_string();

    if let Some(code) = context.contract_code.as_deref() {
        let snippet: String = code.chars().take(CONTEXT_CODE_LIMIT).collect();
        question.push_str(&format!(
            "\n\nContract Context: Here's the smart contract code for reference:\n{snippet}..."
        ));
    }

    if let Some(count) = context.vulnerabilities_found {
        question.push_str(&format!(
            "\n\nAudit Context: This contract has {count} vulnerabilities"
        ));
    }

    question
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_prompt_embeds_source() {
        let prompt = build_audit_prompt("contract Vault {}");
        assert!(prompt.contains("contract Vault {}"));
        assert!(prompt.contains("severity levels"));
    }

    #[test]
    fn test_chat_question_without_context_is_message() {
        let context = ChatContext::default();
        assert_eq!(build_chat_question("what is reentrancy?", &context), "what is reentrancy?");
    }

    #[test]
    fn test_chat_question_truncates_contract_code() {
        let context = ChatContext {
            contract_code: Some("x".repeat(2000)),
            vulnerabilities_found: None,
        };
        let question = build_chat_question("explain", &context);

        assert!(question.contains(&"x".repeat(CONTEXT_CODE_LIMIT)));
        assert!(!question.contains(&"x".repeat(CONTEXT_CODE_LIMIT + 1)));
    }

    #[test]
    fn test_chat_question_appends_audit_context() {
        let context = ChatContext {
            contract_code: None,
            vulnerabilities_found: Some(3),
        };
        let question = build_chat_question("how bad is it?", &context);

        assert!(question.contains("This contract has 3 vulnerabilities"));
    }
}
