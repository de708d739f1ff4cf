//! Static directory of support resources and crisis contacts.

use serde::Serialize;

/// Always-available emergency numbers.
pub const EMERGENCY: &str = "911";
pub const SUICIDE_PREVENTION_LIFELINE: &str = "988";
pub const CRISIS_TEXT_LINE: &str = "741741";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Resource {
    pub name: &'static str,
    pub contact: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResourceCategory {
    pub category: &'static str,
    pub items: &'static [Resource],
}

pub fn directory() -> &'static [ResourceCategory] {
    DIRECTORY
}

/// Case-insensitive category lookup.
pub fn by_category(name: &str) -> Option<&'static ResourceCategory> {
    DIRECTORY
        .iter()
        .find(|c| c.category.eq_ignore_ascii_case(name))
}

/// The crisis-support listing, always first in the directory.
pub fn crisis_support() -> &'static ResourceCategory {
    &DIRECTORY[0]
}

static DIRECTORY: &[ResourceCategory] = &[
    ResourceCategory {
        category: "Crisis Support",
        items: &[
            Resource {
                name: "National Suicide Prevention Lifeline",
                contact: "988",
                description: "24/7 crisis support and suicide prevention",
            },
            Resource {
                name: "Crisis Text Line",
                contact: "Text HOME to 741741",
                description: "Free 24/7 crisis counseling via text",
            },
            Resource {
                name: "SAMHSA National Helpline",
                contact: "1-800-662-4357",
                description: "Treatment referral and information service",
            },
        ],
    },
    ResourceCategory {
        category: "Professional Help",
        items: &[
            Resource {
                name: "Psychology Today",
                contact: "psychologytoday.com",
                description: "Find licensed therapists and psychiatrists in your area",
            },
            Resource {
                name: "BetterHelp",
                contact: "betterhelp.com",
                description: "Online therapy platform with licensed professionals",
            },
            Resource {
                name: "NAMI",
                contact: "nami.org",
                description: "Mental health support groups and education",
            },
        ],
    },
    ResourceCategory {
        category: "Self-Help Apps & Tools",
        items: &[
            Resource {
                name: "Headspace",
                contact: "headspace.com",
                description: "Meditation and mindfulness exercises",
            },
            Resource {
                name: "Calm",
                contact: "calm.com",
                description: "Sleep stories, meditation, and relaxation tools",
            },
            Resource {
                name: "Sanvello",
                contact: "sanvello.com",
                description: "Anxiety and mood tracking with coping tools",
            },
        ],
    },
];
