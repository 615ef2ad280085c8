//! Display-string helpers shared by the page handlers: title casing,
//! breadcrumb trails and difficulty badges.

use crate::models::{Breadcrumb, Difficulty, DifficultyLabel};

/// Slugs rendered fully upper-case instead of capitalized.
pub const TITLES_TO_UPPER_CASE: &[&str] = &["oop", "dsa"];

/// format_title_case
///
/// `oop` becomes `OOP`; anything else has each space-separated word
/// capitalized and the rest of the word lowercased (`design patterns` becomes
/// `Design Patterns`).
pub fn format_title_case(title: &str) -> String {
    if TITLES_TO_UPPER_CASE.contains(&title) {
        return title.to_uppercase();
    }

    title
        .split(' ')
        .map(|section| {
            let mut chars = section.chars();
            match chars.next() {
                Some(first) => {
                    let rest = chars.as_str().to_lowercase();
                    first.to_uppercase().collect::<String>() + &rest
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// breadcrumbs
///
/// Builds the trail for a URL path. Empty segments are dropped, dashes become
/// spaces before title casing, and every crumb links to its cumulative route.
pub fn breadcrumbs(path: &str) -> Vec<Breadcrumb> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let last = segments.len().saturating_sub(1);

    segments
        .iter()
        .enumerate()
        .map(|(index, segment)| Breadcrumb {
            label: format_title_case(&segment.replace('-', " ")),
            path: format!("/{}", segments[..=index].join("/")),
            current: index == last,
        })
        .collect()
}

pub fn difficulty_label(difficulty: Difficulty) -> DifficultyLabel {
    let (text, variant) = match difficulty {
        Difficulty::Beginner => ("Easy", "default"),
        Difficulty::Intermediate => ("Intermediate", "secondary"),
        Difficulty::Advanced => ("Hard", "destructive"),
    };
    DifficultyLabel {
        text: text.to_string(),
        variant: variant.to_string(),
    }
}

pub fn format_minutes(minutes: u32) -> String {
    format!("{} mins", minutes)
}
