//! Built-in intent rules, in priority order

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Intent category a reply was produced for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Nothing was heard
    NoInput,
    Greeting,
    Identity,
    Time,
    Day,
    Thanks,
    Joke,
    Motivation,
    Arithmetic,
    Weather,
    /// Rule from the config file
    Custom,
    Fallback,
}

impl Intent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoInput => "no_input",
            Self::Greeting => "greeting",
            Self::Identity => "identity",
            Self::Time => "time",
            Self::Day => "day",
            Self::Thanks => "thanks",
            Self::Joke => "joke",
            Self::Motivation => "motivation",
            Self::Arithmetic => "arithmetic",
            Self::Weather => "weather",
            Self::Custom => "custom",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reply used when the utterance is blank
pub const NO_INPUT_REPLY: &str = "I didn't hear anything. Want to try again?";

/// Temperature quoted by the weather stand-in
pub const PLACEHOLDER_TEMPERATURE: &str = "25°C";

pub const GREETINGS: &[&str] = &[
    "Hello! I'm here.",
    "Hi there! How can I help?",
    "Hey! Ready to chat?",
    "Hi! Hope you're having a good day!",
];

pub const IDENTITY: &[&str] = &[
    "I'm your local voice assistant.",
    "They call me Talking Friend!",
    "You can call me your voice assistant.",
];

pub const TIMES: &[&str] = &[
    "It's {time}.",
    "Current time is {time}.",
    "Right now, the time is {time}.",
];

pub const DAYS: &[&str] = &[
    "Today is {weekday}.",
    "It's {weekday} today.",
    "The day today is {weekday}.",
    "It's {weekday}, {date}.",
];

pub const THANKS: &[&str] = &["You're welcome!", "No problem!", "Anytime!", "Glad to help!"];

pub const JOKES: &[&str] = &[
    "Why did the computer sneeze? It caught a byte!",
    "Why was the computer cold? It left its Windows open!",
    "Why did the laptop marry the Wi-Fi? They had a strong connection!",
    "Why did the programmer go broke? Because they used up all their cache!",
];

pub const QUOTES: &[&str] = &[
    "Believe you can and you're halfway there.",
    "Every day is a second chance.",
    "Dream big, work hard, stay focused.",
    "Don't watch the clock; do what it does. Keep going.",
];

pub const ANSWERS: &[&str] = &["The answer is {result}."];

pub const WEATHER: &[&str] = &[
    "Currently in {city}, it's sunny with {temp}.",
    "It's partly cloudy in {city} with a temperature of {temp}.",
    "Right now, {city} has clear skies and {temp}.",
];

pub const FALLBACKS: &[&str] = &[
    "I heard: \"{text}\". How can I help next?",
    "You said: \"{text}\". What should we do now?",
    "Got it: \"{text}\". What's next?",
];

/// One built-in rule: a matcher over normalized text and its reply variants
pub struct IntentRule {
    pub intent: Intent,
    pub pattern: Regex,
    pub responses: &'static [&'static str],
}

fn rule(intent: Intent, pattern: &str, responses: &'static [&'static str]) -> IntentRule {
    IntentRule {
        intent,
        pattern: Regex::new(pattern).expect("valid regex"),
        responses,
    }
}

/// Built-in rules; earlier entries win
pub static BUILTIN_RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    vec![
        rule(Intent::Greeting, r"\b(hi|hello|hey)\b", GREETINGS),
        rule(Intent::Identity, r"your name|who are you", IDENTITY),
        rule(Intent::Time, r"\btime\b", TIMES),
        rule(Intent::Day, r"\b(day|today|date)\b", DAYS),
        rule(Intent::Thanks, r"\bthank", THANKS),
        rule(Intent::Joke, r"\bjokes?\b", JOKES),
        rule(Intent::Motivation, r"\b(motivat\w*|quotes?|inspir\w*)\b", QUOTES),
        // the arithmetic matcher lives in `arithmetic`; this only gates on a digit
        rule(Intent::Arithmetic, r"\d", ANSWERS),
        rule(Intent::Weather, r"\bweather in (\w+)", WEATHER),
    ]
});
