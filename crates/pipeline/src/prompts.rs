//! Fixed few-shot prompt templates.
//!
//! The response labels below and the schema description format are
//! contracts: the rewrite parser looks the labels up verbatim, and the
//! few-shot examples teach the model the exact shapes. Changing any
//! wording here means re-checking the parsers against real model
//! output.

/// Label introducing the predicted answer type line.
pub const TYPE_LABEL: &str = "Answer Type:";

/// Label introducing the paraphrased question line.
pub const PARAPHRASE_LABEL: &str = "Paraphrased Question:";

/// Name of the function the generated code must define.
pub const ENTRY_FUNCTION: &str = "answer_question";

const REWRITE_PROMPT: &str = r#"You will be provided with two pieces of information. The first being a question and the second being the column names along with data types of a dataset. Your objective is twofold: first, predict the data type of the answer, and second, paraphrase the question aptly such that the next person could generate the code required to answer the question, while keeping the answer type the same as the given question. You are provided two examples below.
Remember not to change what the original question is actually asking.
Reply with exactly two lines: an "Answer Type:" line and a "Paraphrased Question:" line.
The answer type must be one of: bool, category, number, list[category], list[number].

Few Shot Examples:
Question: Is the person with the highest net worth self-made?
Dataset Name: 001_Forbes
Dataset Table Schema: selfMade (bool), finalWorth (int64), city (string), title (string), gender (string), age (float64), rank (int64), philanthropyScore (float64), category (string), source (string), country (string)
Answer Type: bool
Paraphrased Question: Does the billionaire with the maximum final worth have the self made attribute set to true?

Question: Did any children below the age of 18 survive?
Dataset Name: 002_Titanic
Dataset Table Schema: Age (float64), Siblings_Spouses Aboard (int64), Sex (string), Name (string), Pclass (int64), Fare (float64), Survived (bool)
Answer Type: bool
Paraphrased Question: Were there any survivors aged under 18?

Instruction for you to perform:
"#;

const CODEGEN_PROMPT: &str = r#"You will be provided four pieces of information, all as strings.
1. Dataset name:
2. Dataset Table Schema:
3. Question:
4. Expected Answer Type:

Your objective is to write a Lua function that answers the question given the dataset schema. Here is the function you need to define:
function answer_question(dataset, datasetTableSchema, question, expectedAnswerType)
    -- compute the answer here
    return answer
end

The dataset argument exposes a read-only API:
- dataset:nrows() returns the number of rows.
- dataset:columns() returns the list of column names.
- dataset:col(name) returns the values of the named column as a 1-based array; missing values are nil, so always index from 1 to dataset:nrows() and check for nil.

Your answer should only contain the function definition. Assume that the dataset schema (containing column names and their data types in parentheses) is correct. The generated code must not attempt to change the dataset.
Your final answer data type must be one of the following categories:
1. bool: one of true or false.
2. category: a string. For example - CEO, hello, drugstores.
3. number: a numerical value. For example - 20, 23.3223, 414901.
4. list[category]: a list of strings. For example - {'India', 'Japan', 'China'}.
5. list[number]: a list of numbers. For example - {20.0, 30.4, 42.1}.
When the question requests more than one value, the expected answer type might be a list of strings or numbers. Return lists as Lua sequences.

Few Shot Example:
1. Dataset name: 001_Forbes
2. Dataset Table Schema: selfMade (bool), finalWorth (int64), city (string), title (string), gender (string), age (float64), rank (int64), philanthropyScore (float64), category (string), source (string), country (string)
3. Question: Does the individual with the highest final worth value have the selfMade attribute set to true?
4. Expected Answer Type: bool

Answer:
function answer_question(dataset, datasetTableSchema, question, expectedAnswerType)
    local worth = dataset:col("finalWorth")
    local self_made = dataset:col("selfMade")
    local best, best_worth = nil, nil
    for i = 1, dataset:nrows() do
        if worth[i] ~= nil and (best_worth == nil or worth[i] > best_worth) then
            best, best_worth = i, worth[i]
        end
    end
    return self_made[best]
end

Now, complete the following:"#;

/// Render the rewrite prompt for one question.
pub fn render_rewrite_prompt(question: &str, dataset_name: &str, schema: &str) -> String {
    format!(
        "{}Question: {}\nDataset Name: {}\nDataset Table Schema: {}\n",
        REWRITE_PROMPT, question, dataset_name, schema
    )
}

/// Render the codegen prompt for one rewritten question.
pub fn render_codegen_prompt(
    question: &str,
    dataset_name: &str,
    schema: &str,
    answer_type: &str,
) -> String {
    format!(
        "{}\n1. Dataset name: {}\n2. Dataset Table Schema: {}\n3. Question: {}\n4. Expected Answer Type: {}",
        CODEGEN_PROMPT, dataset_name, schema, question, answer_type
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_prompt_embeds_inputs_and_labels() {
        let prompt = render_rewrite_prompt(
            "Is the person with the highest net worth self-made?",
            "001_Forbes",
            "selfMade (bool), finalWorth (int64)",
        );
        assert!(prompt.contains("Question: Is the person with the highest net worth self-made?"));
        assert!(prompt.contains("Dataset Name: 001_Forbes"));
        assert!(prompt.contains("Dataset Table Schema: selfMade (bool), finalWorth (int64)"));
        assert!(prompt.contains(TYPE_LABEL));
        assert!(prompt.contains(PARAPHRASE_LABEL));
    }

    #[test]
    fn test_codegen_prompt_embeds_all_four_fields() {
        let prompt = render_codegen_prompt(
            "Were there any survivors aged under 18?",
            "002_Titanic",
            "Age (float64), Survived (bool)",
            "bool",
        );
        assert!(prompt.contains("1. Dataset name: 002_Titanic"));
        assert!(prompt.contains("2. Dataset Table Schema: Age (float64), Survived (bool)"));
        assert!(prompt.contains("3. Question: Were there any survivors aged under 18?"));
        assert!(prompt.contains("4. Expected Answer Type: bool"));
        assert!(prompt.contains(ENTRY_FUNCTION));
    }

    #[test]
    fn test_prompts_are_distinguishable() {
        // The e2e tests route mock responses by these markers; each
        // must appear in exactly one template.
        let rewrite = render_rewrite_prompt("q", "d", "s");
        let codegen = render_codegen_prompt("q", "d", "s", "bool");
        assert!(rewrite.contains("twofold"));
        assert!(!codegen.contains("twofold"));
        assert!(codegen.contains("complete the following"));
        assert!(!rewrite.contains("complete the following"));
    }
}
