use rand::seq::SliceRandom;

const THINKING_MESSAGES: &[&str] = &[
    "Weighing reach against effort",
    "Consulting the roadmap",
    "Grooming the backlog",
    "Counting story points",
    "Checking sprint capacity",
    "Reading the NPS comments",
    "Sizing the opportunity",
    "Drafting acceptance criteria",
    "Aligning stakeholders",
    "Looking at the funnel",
    "Scoping the MVP",
    "Prioritizing ruthlessly",
];

/// A short status line for the spinner while the model is working
pub fn get_random_thinking_message() -> &'static str {
    THINKING_MESSAGES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Thinking")
}
