use serde_json::{Value, json};

const PLACEHOLDER: &str = "/api/placeholder/200/150";

pub fn why_watch() -> &'static str {
    concat!(
        "A transformative perspective on how small changes in thinking ",
        "can create massive shifts in outcomes."
    )
}

pub fn featured_talk(url: &str) -> Value {
    json!({
        "title": "The Future of Innovation",
        "thumbnail": "/api/placeholder/400/300",
        "url": url,
    })
}

pub fn recommendations() -> Value {
    json!({
        "Psychology & Personal Growth": [
            {
                "title": "The Power of Vulnerability",
                "speaker": "Brené Brown",
                "url": "https://ted.com/talks/brene_brown_the_power_of_vulnerability",
                "thumbnail": PLACEHOLDER
            },
            {
                "title": "Your Body Language May Shape Who You Are",
                "speaker": "Amy Cuddy",
                "url": "https://ted.com/talks/amy_cuddy_your_body_language_may_shape_who_you_are",
                "thumbnail": PLACEHOLDER
            }
        ],
        "Leadership & Innovation": [
            {
                "title": "How Great Leaders Inspire Action",
                "speaker": "Simon Sinek",
                "url": "https://ted.com/talks/simon_sinek_how_great_leaders_inspire_action",
                "thumbnail": PLACEHOLDER
            }
        ]
    })
}

pub fn playlist() -> Value {
    json!([
        {
            "title": "The Puzzle of Motivation",
            "speaker": "Dan Pink",
            "url": "https://ted.com/talks/dan_pink_the_puzzle_of_motivation",
            "thumbnail": PLACEHOLDER,
            "tags": ["motivation", "psychology", "work"]
        },
        {
            "title": "How to Make Stress Your Friend",
            "speaker": "Kelly McGonigal",
            "url": "https://ted.com/talks/kelly_mcgonigal_how_to_make_stress_your_friend",
            "thumbnail": PLACEHOLDER,
            "tags": ["health", "psychology", "stress"]
        },
        {
            "title": "The Happy Secret to Better Work",
            "speaker": "Shawn Achor",
            "url": "https://ted.com/talks/shawn_achor_the_happy_secret_to_better_work",
            "thumbnail": PLACEHOLDER,
            "tags": ["happiness", "productivity", "mindset"]
        }
    ])
}

/// Early revision shape: calendar fields only.
pub fn timeline_calendar() -> Value {
    json!([
        {
            "title": "Machines That Think",
            "year": 2015, "month": 6, "day": 15,
            "thumbnail": PLACEHOLDER,
            "url": "https://ted.com/talks/machines_that_think"
        },
        {
            "title": "The Rise of AI",
            "year": 2017, "month": 3, "day": 22,
            "thumbnail": PLACEHOLDER,
            "url": "https://ted.com/talks/rise_of_ai"
        },
        {
            "title": "How AI Can Save Our Humanity",
            "year": 2019, "month": 11, "day": 8,
            "thumbnail": PLACEHOLDER,
            "url": "https://ted.com/talks/ai_save_humanity"
        },
        {
            "title": "The Future of Human-AI Collaboration",
            "year": 2021, "month": 9, "day": 12,
            "thumbnail": PLACEHOLDER,
            "url": "https://ted.com/talks/future_human_ai"
        }
    ])
}

/// Later revision shape: published date plus timestamp, sent unordered and
/// without thumbnails.
pub fn timeline_published() -> Value {
    json!([
        {
            "title": "How AI Can Save Our Humanity",
            "date_published": "2019-11-08",
            "timestamp": 1_573_171_200,
            "url": "https://ted.com/talks/ai_save_humanity"
        },
        {
            "title": "Machines That Think",
            "date_published": "2015-06-15",
            "timestamp": 1_434_326_400,
            "url": "https://ted.com/talks/machines_that_think"
        },
        {
            "title": "The Future of Human-AI Collaboration",
            "date_published": "2021-09-12",
            "timestamp": 1_631_404_800,
            "url": "https://ted.com/talks/future_human_ai"
        },
        {
            "title": "The Rise of AI",
            "date_published": "2017-03-22",
            "timestamp": 1_490_140_800,
            "url": "https://ted.com/talks/rise_of_ai"
        }
    ])
}
