/// Vocabulary that marks a message as a clinic-information question. Matched as
/// case-insensitive substrings, so "open" also matches "reopen".
pub const FAQ_KEYWORDS: &[&str] = &[
    "insurance",
    "accepted",
    "billing",
    "payment",
    "cost",
    "price",
    "location",
    "address",
    "directions",
    "parking",
    "where",
    "hours",
    "open",
    "closed",
    "when",
    "bring",
    "documents",
    "need",
    "prepare",
    "preparation",
    "policy",
    "policies",
    "cancellation",
    "cancel",
    "late",
    "covid",
    "what to",
    "how do",
    "do you",
    "can i",
    "is there",
];

pub fn should_attach_context(message: &str) -> bool {
    let message = message.to_lowercase();
    FAQ_KEYWORDS.iter().any(|keyword| message.contains(keyword))
}
