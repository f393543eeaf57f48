//! Prompt construction.
//!
//! Pure assembly of the instruction set sent to the model for each task:
//! a fixed system directive, the caller's content as the user turn, and
//! (for retrieval-grounded answers) the context block. Templates are
//! compile-time constants parameterized only by task-specific
//! enumerations embedded verbatim, so identical input always produces
//! byte-identical output — no randomness, no timestamps.

use crate::types::RetrievedSnippet;

/// Fine-grained prompt/parse identifier.
///
/// The public customer-sentiment task performs two model calls (a
/// single-word label and a numeric score), so the prompt layer is one
/// step finer-grained than [`crate::types::TaskKind`]. The parsed-result
/// variant is a function of this kind alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    AdminSentimentScore,
    CustomerSentimentLabel,
    CustomerSentimentScore,
    TopicCheck,
    RagAnswer,
    ConversationReport,
    IssueClassification,
}

/// One prompt to be built: the kind plus the payload it needs.
#[derive(Debug, Clone)]
pub enum PromptRequest<'a> {
    AdminSentimentScore { message: &'a str },
    CustomerSentimentLabel { message: &'a str },
    CustomerSentimentScore { message: &'a str },
    TopicCheck { message: &'a str, topics: &'a [String] },
    RagAnswer { query: &'a str, snippets: &'a [RetrievedSnippet] },
    ConversationReport { chat: &'a str },
    IssueClassification { text: &'a str },
}

impl PromptRequest<'_> {
    pub fn kind(&self) -> PromptKind {
        match self {
            PromptRequest::AdminSentimentScore { .. } => PromptKind::AdminSentimentScore,
            PromptRequest::CustomerSentimentLabel { .. } => PromptKind::CustomerSentimentLabel,
            PromptRequest::CustomerSentimentScore { .. } => PromptKind::CustomerSentimentScore,
            PromptRequest::TopicCheck { .. } => PromptKind::TopicCheck,
            PromptRequest::RagAnswer { .. } => PromptKind::RagAnswer,
            PromptRequest::ConversationReport { .. } => PromptKind::ConversationReport,
            PromptRequest::IssueClassification { .. } => PromptKind::IssueClassification,
        }
    }
}

/// Complete instruction set for one model call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Fixed per-task instruction.
    pub system: String,
    /// The caller's raw input text.
    pub user: String,
    /// Retrieval context, empty for every task except RAG answers.
    pub context: String,
}

const ADMIN_SENTIMENT_SCORE_DIRECTIVE: &str = "\
Given the following admin message, please evaluate the professionalism \
of the message and provide a score between 0 (unprofessional) and 1 \
(highly professional). Please just provide the score.";

const CUSTOMER_SENTIMENT_LABEL_DIRECTIVE: &str = "\
Given the following customer message, please provide a single word \
that best describes how the customer is feeling.";

const CUSTOMER_SENTIMENT_SCORE_DIRECTIVE: &str = "\
Given the following customer message, please provide the sentiment \
score between 0 (negative) and 1 (positive). Please just provide \
the score.";

const TOPIC_CHECK_DIRECTIVE: &str = "\
You have a list of topics, each represented by a number.

When a user inputs a message, analyse the message and return a \
comma-separated list of numbers corresponding to the topics mentioned \
or matched.

If a topic is not mentioned, do not include its number in the output. \
Ensure the numbers are returned in order, without spaces.

Topics:
";

const RAG_ANSWER_DIRECTIVE: &str = "\
You are a helpful assistant who provides accurate and concise answers. \
Use the provided context to respond intelligently to user queries. \
When no context is provided, answer from general knowledge.";

const CONVERSATION_REPORT_DIRECTIVE: &str = r#"Analyze the given list of messages and generate a JSON response based on the following template:
{
    "overallSummary": "Insightful overview of the conversation and brief outcome of the conversation",
    "agentSummary": "Summary of agent's actions",
    "customerSummary": "Summary of customer's concerns and requests",
    "conversationalInsight": {
        "csatScore": 0,
        "conversationResult": "Outcome of the conversation",
        "customerSentiment": "Positive/Neutral/Negative",
        "overallCallDuration": "00:00"
    },
    "overallPerformance": 0,
    "aiInsight": {
        "introduction": 0,
        "recommendation": 0,
        "thankYouMessage": 0,
        "attitude": 0,
        "communicationSkills": 0
    },
    "timeConsumption": {
        "agent": 0,
        "customer": 0,
        "notTalking": 0
    },
    "topicsDiscussed": {
        "Topic1": 0,
        "Topic2": 0,
        "Topic3": 0,
        "Topic4": 0
    }
}

Guidelines:
CSAT score and overall performance should be percentages (0-100).
Call duration can be used as overallCallDuration.
The conversation result should be condensed into a few short words.
Time consumption should be in percentage.
AI insight should be rated on a scale of 100 and take consideration of the agent's conversation.
Topics discussed should be telco-related, with at least 4 topics and their percentages.
Provide the response as a valid JSON string, without any Markdown formatting."#;

/// Category/subcategory taxonomy for issue classification, embedded
/// verbatim in the directive together with the two-line output contract.
const ISSUE_CLASSIFICATION_DIRECTIVE: &str = r#"You are a helpful assistant that classifies customer inquiries for a telecom company.
Here are the categories and subcategories for classification:

Category: Account & Subscriptions
  1) Change credit limit
  2) Change postpaid plan
  3) Rewards-related issue
  4) Voicemail and missed call alerts activation/deactivation
  5) Stop non-Digi/Celcom charges/subscriptions
  6) Reinstate terminated prepaid line for CelcomDigi
  7) Others

Category: Call, Internet, SMS and OTP issues
  1) Call quality
  2) Coverage
  3) Internet slowness
  4) Unable to receive OTP/TAC

Category: Internet Quota
  1) {Insert details}

Category: Reload & Prepaid
  1) Reload-related issue
  2) Others

Category: Roaming
  1) Unable to use/connect roaming
  2) Others

Category: Switching to CelcomDigi
  1) Resubmit port-in request
  2) Others

Category: Billing
  1) I don't agree with my bill (non-scam related)
  2) I don't agree with my bill (suspected scam)
  3) Others

Category: Fibre
  1) No service
  2) Internet slowness (Fibre)
  3) Others (Fibre)
  4) Relocation request

Category: Products & Offerings
  1) {Provide details}

Category: Report a scam/fraud
  1) Scam call
  2) SMS spam/SMS scam
  3) Scam URL/QR Code
  4) Missed calls from international numbers

Category: SIM & Devices
  1) Blocked device due to non-payment of Digi bill
  2) Others

Classify the following inquiry into the most appropriate category and subcategory. Return the classification in the following format:
Category: <category>
Subcategory: <subcategory>"#;

/// Build the complete instruction set for one model call.
///
/// For RAG answers the context is assembled from the retrieved snippets
/// (joined by newlines, rank order preserved) before the directive is
/// ever sent; zero snippets yield an empty context, not a failure.
pub fn build_prompt(request: &PromptRequest<'_>) -> Prompt {
    match request {
        PromptRequest::AdminSentimentScore { message } => Prompt {
            system: ADMIN_SENTIMENT_SCORE_DIRECTIVE.to_string(),
            user: (*message).to_string(),
            context: String::new(),
        },
        PromptRequest::CustomerSentimentLabel { message } => Prompt {
            system: CUSTOMER_SENTIMENT_LABEL_DIRECTIVE.to_string(),
            user: (*message).to_string(),
            context: String::new(),
        },
        PromptRequest::CustomerSentimentScore { message } => Prompt {
            system: CUSTOMER_SENTIMENT_SCORE_DIRECTIVE.to_string(),
            user: (*message).to_string(),
            context: String::new(),
        },
        PromptRequest::TopicCheck { message, topics } => Prompt {
            system: format!("{}{}", TOPIC_CHECK_DIRECTIVE, topics.join("\n")),
            user: (*message).to_string(),
            context: String::new(),
        },
        PromptRequest::RagAnswer { query, snippets } => Prompt {
            system: RAG_ANSWER_DIRECTIVE.to_string(),
            user: (*query).to_string(),
            context: join_context(snippets),
        },
        PromptRequest::ConversationReport { chat } => Prompt {
            system: CONVERSATION_REPORT_DIRECTIVE.to_string(),
            user: (*chat).to_string(),
            context: String::new(),
        },
        PromptRequest::IssueClassification { text } => Prompt {
            system: ISSUE_CLASSIFICATION_DIRECTIVE.to_string(),
            user: (*text).to_string(),
            context: String::new(),
        },
    }
}

/// Concatenate retrieved snippet texts, newline-separated, rank order
/// preserved. Empty input produces an empty string.
fn join_context(snippets: &[RetrievedSnippet]) -> String {
    snippets
        .iter()
        .map(|snippet| snippet.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_input_builds_identical_prompt() {
        let request = PromptRequest::AdminSentimentScore {
            message: "Dear customer, thanks for reaching out.",
        };
        let first = build_prompt(&request);
        let second = build_prompt(&request);
        assert_eq!(first, second);
    }

    #[test]
    fn topic_list_is_embedded_verbatim_in_order() {
        let topics = vec!["1) Billing".to_string(), "2) Roaming".to_string()];
        let prompt = build_prompt(&PromptRequest::TopicCheck {
            message: "my roaming bill is wrong",
            topics: &topics,
        });
        assert!(prompt.system.contains("Topics:\n1) Billing\n2) Roaming"));
        assert_eq!(prompt.user, "my roaming bill is wrong");
        assert!(prompt.context.is_empty());
    }

    #[test]
    fn rag_context_joins_snippets_by_newline() {
        let snippets = vec![
            RetrievedSnippet::new("First passage.", 0.92),
            RetrievedSnippet::new("Second passage.", 0.85),
        ];
        let prompt = build_prompt(&PromptRequest::RagAnswer {
            query: "what plans are available?",
            snippets: &snippets,
        });
        assert_eq!(prompt.context, "First passage.\nSecond passage.");
    }

    #[test]
    fn rag_with_no_snippets_builds_empty_context() {
        let prompt = build_prompt(&PromptRequest::RagAnswer {
            query: "what plans are available?",
            snippets: &[],
        });
        assert!(prompt.context.is_empty());
        assert!(prompt.system.contains("general knowledge"));
    }

    #[test]
    fn report_directive_embeds_the_json_template() {
        let prompt = build_prompt(&PromptRequest::ConversationReport {
            chat: "agent: hello\ncustomer: hi",
        });
        assert!(prompt.system.contains("\"overallSummary\""));
        assert!(prompt.system.contains("\"topicsDiscussed\""));
        assert!(prompt.system.contains("without any Markdown formatting"));
        // The embedded template itself must be valid JSON.
        let start = prompt.system.find('{').unwrap();
        let end = prompt.system.rfind('}').unwrap();
        let template = &prompt.system[start..=end];
        assert!(serde_json::from_str::<serde_json::Value>(template).is_ok());
    }

    #[test]
    fn classification_directive_states_the_two_line_contract() {
        let prompt = build_prompt(&PromptRequest::IssueClassification {
            text: "I cannot use roaming in Singapore",
        });
        assert!(prompt.system.contains("Category: <category>"));
        assert!(prompt.system.contains("Subcategory: <subcategory>"));
        assert!(prompt.system.contains("Category: Roaming"));
    }

    #[test]
    fn prompt_request_kind_mapping() {
        let request = PromptRequest::CustomerSentimentScore { message: "hi" };
        assert_eq!(request.kind(), PromptKind::CustomerSentimentScore);
    }
}
