//! Grounding prompt assembly.

/// Exact reply the model is told to give when the context is insufficient.
pub const FALLBACK_PHRASE: &str = "Sorry, I don't know how to help with that.";

const INSTRUCTIONS: &str = "You are a very enthusiastic documentation assistant who loves to help people! \
Given the following sections from the documentation, answer the question using only that information, \
outputted in markdown format. If you are unsure and the answer is not explicitly written in the \
documentation, say";

/// Builds the prompt sent to the generation model.
///
/// Sections, in order: instructions with the fallback phrase, the CONTEXT
/// block (one line per document, empty bodies included, input order kept),
/// and the user query verbatim. Pure and deterministic.
pub fn assemble<S: AsRef<str>>(query: &str, contexts: &[S]) -> String {
    let context = contexts
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{instructions} \"{fallback}\"\n\nCONTEXT:\n{context}\n\nUSER QUERY:\n{query}\n",
        instructions = INSTRUCTIONS,
        fallback = FALLBACK_PHRASE,
        context = context,
        query = query,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_appear_in_order() {
        let prompt = assemble("How do I submit?", &["Use the form.", "Deadline is Friday."]);

        let instructions = prompt.find(FALLBACK_PHRASE).expect("fallback phrase");
        let context = prompt.find("CONTEXT:\nUse the form.\nDeadline is Friday.").expect("context");
        let query = prompt.find("USER QUERY:\nHow do I submit?").expect("query");
        assert!(instructions < context && context < query);
    }

    #[test]
    fn empty_bodies_keep_their_line() {
        let prompt = assemble("q", &["first", "", "third"]);
        assert!(prompt.contains("CONTEXT:\nfirst\n\nthird\n"));
    }

    #[test]
    fn identical_input_gives_identical_prompt() {
        let contexts = vec!["a".to_string(), "b".to_string()];
        assert_eq!(assemble("same", &contexts), assemble("same", &contexts));
    }

    #[test]
    fn query_is_quoted_verbatim() {
        let prompt = assemble("  what's `this`?  ", &["ctx"]);
        assert!(prompt.contains("USER QUERY:\n  what's `this`?  \n"));
    }
}
